//! JSON export and import of the project collection

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::project_store::ProjectStore;
use crate::error::StoreError;
use crate::models::{InsertPosition, Project, ProjectDraft};

/// Why a single record was not imported
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportFailure {
    /// Position of the record in the imported document
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub total: usize,
    pub failures: Vec<ImportFailure>,
}

impl std::fmt::Display for ImportReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} of {} imported", self.imported, self.total)
    }
}

/// Pretty-printed JSON array of the projects
pub fn export_json(projects: &[Project]) -> Result<String, StoreError> {
    serde_json::to_string_pretty(projects).map_err(|e| StoreError::Parse(e.to_string()))
}

/// `devtracker-projects-<YYYY-MM-DD>.json`
pub fn export_filename(date: NaiveDate) -> String {
    format!("devtracker-projects-{}.json", date.format("%Y-%m-%d"))
}

/// Write today's export file into `dir` and return its path
pub fn export_to_dir(projects: &[Project], dir: &Path) -> Result<PathBuf, StoreError> {
    let content = export_json(projects)?;
    let path = dir.join(export_filename(Utc::now().date_naive()));
    fs::write(&path, content)?;

    info!("Exported {} projects to {:?}", projects.len(), path);
    Ok(path)
}

/// Split an import document into its records.
///
/// The document is a single object or an array of them. Anything else,
/// including malformed JSON, rejects the whole import.
pub fn parse_import(content: &str) -> Result<Vec<Value>, StoreError> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| StoreError::Parse(e.to_string()))?;

    match document {
        Value::Array(records) => Ok(records),
        record @ Value::Object(_) => Ok(vec![record]),
        other => Err(StoreError::Parse(format!(
            "expected an object or an array of objects, found {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Import every record of `content` through `store.create`.
///
/// Records are created one by one and end up in the store in document
/// order, whichever end new records are inserted at. A record that does not
/// map onto a project, fails validation or is rejected remotely is counted
/// and skipped; the rest still go through.
pub async fn import_json(store: &mut ProjectStore, content: &str) -> Result<ImportReport, StoreError> {
    let records = parse_import(content)?;
    let total = records.len();
    let mut failures = Vec::new();

    let mut records: Vec<(usize, Value)> = records.into_iter().enumerate().collect();
    // Each create lands in front of the previous one
    if store.options().insert_position == InsertPosition::First {
        records.reverse();
    }

    for (index, record) in records {
        let draft: ProjectDraft = match serde_json::from_value(record) {
            Ok(draft) => draft,
            Err(e) => {
                warn!("Skipping import record {}: {}", index, e);
                failures.push(ImportFailure {
                    index,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if let Err(e) = store.create(draft).await {
            warn!("Skipping import record {}: {}", index, e);
            failures.push(ImportFailure {
                index,
                reason: e.to_string(),
            });
        }
    }

    failures.sort_by_key(|f| f.index);
    let report = ImportReport {
        imported: total - failures.len(),
        total,
        failures,
    };
    info!("Import finished: {}", report);
    Ok(report)
}

/// Read an export file and import it
pub async fn import_file(store: &mut ProjectStore, path: &Path) -> Result<ImportReport, StoreError> {
    let content = fs::read_to_string(path)?;
    import_json(store, &content).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryBackend;
    use crate::models::ProjectStatus;
    use crate::services::project_store::StoreOptions;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn store() -> ProjectStore {
        let options = StoreOptions {
            insert_position: InsertPosition::Last,
            ..Default::default()
        };
        ProjectStore::new(Arc::new(MemoryBackend::new()), options)
    }

    #[test]
    fn test_export_filename() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(export_filename(date), "devtracker-projects-2024-03-09.json");
    }

    #[test]
    fn test_parse_import_shapes() {
        assert_eq!(parse_import(r#"{"name":"A"}"#).unwrap().len(), 1);
        assert_eq!(parse_import(r#"[{"name":"A"},{"name":"B"}]"#).unwrap().len(), 2);
        assert!(parse_import("[]").unwrap().is_empty());

        assert!(matches!(parse_import("{ nope"), Err(StoreError::Parse(_))));
        assert!(matches!(parse_import("42"), Err(StoreError::Parse(_))));
    }

    #[tokio::test]
    async fn test_partial_import_reports_counts() {
        let mut store = store();
        let report = import_json(&mut store, r#"[{"name":"A"},{"bad":1},{"name":"B"}]"#)
            .await
            .unwrap();

        assert_eq!(report.to_string(), "2 of 3 imported");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);

        let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_malformed_record_does_not_abort() {
        let mut store = store();
        let report = import_json(
            &mut store,
            r#"[{"name":"A","status":"shipped"},{"name":"B","progress":"half"},{"name":"C"}]"#,
        )
        .await
        .unwrap();

        assert_eq!(report.imported, 1);
        assert_eq!(report.total, 3);
        assert_eq!(store.projects()[0].name, "C");
    }

    #[tokio::test]
    async fn test_malformed_document_processes_nothing() {
        let mut store = store();
        let result = import_json(&mut store, r#"[{"name":"A"}, "#).await;

        assert!(matches!(result, Err(StoreError::Parse(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_single_object_import() {
        let mut store = store();
        let report = import_json(&mut store, r#"{"name":"Solo","status":"on-hold","issues":2}"#)
            .await
            .unwrap();

        assert_eq!(report.to_string(), "1 of 1 imported");
        let project = &store.projects()[0];
        assert_eq!(project.status, ProjectStatus::OnHold);
        assert_eq!(project.issues, 2);
        assert_eq!(project.progress, 0);
    }

    #[tokio::test]
    async fn test_export_import_roundtrip() {
        let mut source = store();
        let mut full = ProjectDraft::new("Full").with_status(ProjectStatus::Deployed);
        full.progress = 80;
        full.primary_url = Some("full.app".to_string());
        full.vercel_dev_url = Some("full-dev.vercel.app".to_string());
        full.custom_platforms.insert("bolt".to_string(), "full.bolt.new".to_string());
        full.credits_used = 30;
        full.initial_budget_credits = 100;
        full.technologies = vec!["rust".to_string(), "svelte".to_string()];
        full.known_bugs = vec!["slow start".to_string()];
        source.create(full).await.unwrap();
        source.create(ProjectDraft::new("Bare")).await.unwrap();

        let dir = tempdir().unwrap();
        let path = export_to_dir(source.projects(), dir.path()).unwrap();
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("devtracker-projects-"));

        let mut target = store();
        let report = import_file(&mut target, &path).await.unwrap();
        assert_eq!(report.to_string(), "2 of 2 imported");

        let before: Vec<ProjectDraft> = source.projects().iter().map(ProjectDraft::from).collect();
        let after: Vec<ProjectDraft> = target.projects().iter().map(ProjectDraft::from).collect();
        assert_eq!(before, after);

        for (old, new) in source.projects().iter().zip(target.projects()) {
            assert_ne!(old.id, new.id);
        }
    }

    #[tokio::test]
    async fn test_roundtrip_keeps_order_with_default_options() {
        let mut source = ProjectStore::new(Arc::new(MemoryBackend::new()), StoreOptions::default());
        source.create(ProjectDraft::new("A")).await.unwrap();
        source.create(ProjectDraft::new("B")).await.unwrap();
        let content = export_json(source.projects()).unwrap();

        let mut target = ProjectStore::new(Arc::new(MemoryBackend::new()), StoreOptions::default());
        let report = import_json(&mut target, &content).await.unwrap();
        assert_eq!(report.to_string(), "2 of 2 imported");

        let before: Vec<&str> = source.projects().iter().map(|p| p.name.as_str()).collect();
        let after: Vec<&str> = target.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(before, vec!["B", "A"]);
        assert_eq!(after, before);

        // Survives a reload from the backend too
        let reloaded: Vec<String> = target.list().await.unwrap().iter().map(|p| p.name.clone()).collect();
        assert_eq!(reloaded, vec!["B", "A"]);
    }

    #[tokio::test]
    async fn test_failures_reported_in_document_order() {
        let mut store = ProjectStore::new(Arc::new(MemoryBackend::new()), StoreOptions::default());
        let report = import_json(&mut store, r#"[{"name":""},{"name":"A"},{"bad":1},{"name":"B"}]"#)
            .await
            .unwrap();

        let indexes: Vec<usize> = report.failures.iter().map(|f| f.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let mut store = store();
        let dir = tempdir().unwrap();
        let result = import_file(&mut store, &dir.path().join("missing.json")).await;
        assert!(matches!(result, Err(StoreError::Io(_))));
    }
}

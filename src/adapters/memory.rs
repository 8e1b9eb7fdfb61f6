//! In-process backend
//!
//! Keeps records in memory behind a mutex. Nothing survives the process.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Mutex;
use tracing::debug;

use super::{new_record_id, sort_projects, RemoteStore};
use crate::error::RemoteError;
use crate::models::{Project, ProjectDraft, ProjectPatch, ProjectQuery};

#[derive(Default)]
pub struct MemoryBackend {
    /// Insertion order
    records: Mutex<Vec<Project>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-filled with already persisted records
    pub fn with_records(records: Vec<Project>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &str) -> Option<Project> {
        self.records
            .lock()
            .ok()
            .and_then(|records| records.iter().find(|p| p.id == id).cloned())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Project>>, RemoteError> {
        self.records
            .lock()
            .map_err(|e| RemoteError::Database(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for MemoryBackend {
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let project = Project::from_draft(new_record_id(), draft.clone(), Utc::now());
        self.lock()?.push(project.clone());
        debug!("Memory backend inserted {}", project.id);
        Ok(project)
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<(), RemoteError> {
        let mut records = self.lock()?;
        let project = records
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RemoteError::Rejected(format!("no project with id {}", id)))?;
        patch.apply(project);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let mut records = self.lock()?;
        let before = records.len();
        records.retain(|p| p.id != id);
        if records.len() == before {
            return Err(RemoteError::Rejected(format!("no project with id {}", id)));
        }
        Ok(())
    }

    async fn query(&self, query: &ProjectQuery) -> Result<Vec<Project>, RemoteError> {
        let mut projects: Vec<Project> = self
            .lock()?
            .iter()
            .filter(|p| query.status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        sort_projects(&mut projects, query.order);
        Ok(projects)
    }
}

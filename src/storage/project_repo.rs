//! Project repository over the local SQLite database

use rusqlite::{params, Connection, OptionalExtension, Row};
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::BTreeMap;
use tracing::warn;

use crate::models::{Project, ProjectQuery, ProjectStatus, QueryOrder};
use super::DatabaseError;

const COLUMNS: &str = "id, name, description, status, progress,
    primary_url, lovable_live_url, lovable_dev_url, netlify_url, netlify_dev_url,
    vercel_url, vercel_dev_url, platform_url, mocha_published_url, deployment, repository,
    custom_platforms_json, credits_used, credits_remaining, initial_budget_credits, issues,
    technologies_json, features_completed_json, features_pending_json, known_bugs_json,
    display_order, created_at, updated_at";

/// Raw row, JSON columns still encoded
struct ProjectRow {
    id: String,
    name: String,
    description: Option<String>,
    status: String,
    progress: i32,
    urls: [Option<String>; 11],
    custom_platforms_json: String,
    counters: [i64; 4],
    lists_json: [String; 4],
    display_order: Option<i64>,
    created_at: String,
    updated_at: String,
}

impl ProjectRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            status: row.get(3)?,
            progress: row.get(4)?,
            urls: [
                row.get(5)?,
                row.get(6)?,
                row.get(7)?,
                row.get(8)?,
                row.get(9)?,
                row.get(10)?,
                row.get(11)?,
                row.get(12)?,
                row.get(13)?,
                row.get(14)?,
                row.get(15)?,
            ],
            custom_platforms_json: row.get(16)?,
            counters: [row.get(17)?, row.get(18)?, row.get(19)?, row.get(20)?],
            lists_json: [row.get(21)?, row.get(22)?, row.get(23)?, row.get(24)?],
            display_order: row.get(25)?,
            created_at: row.get(26)?,
            updated_at: row.get(27)?,
        })
    }

    fn into_project(self) -> Result<Project, DatabaseError> {
        let status = ProjectStatus::from_str(&self.status).unwrap_or_else(|| {
            warn!("Unknown status '{}' on project {}, using planning", self.status, self.id);
            ProjectStatus::Planning
        });

        let custom_platforms: BTreeMap<String, String> =
            serde_json::from_str(&self.custom_platforms_json)?;
        let [technologies, features_completed, features_pending, known_bugs] = self.lists_json;
        let [primary_url, lovable_live_url, lovable_dev_url, netlify_url, netlify_dev_url, vercel_url, vercel_dev_url, platform_url, mocha_published_url, deployment, repository] =
            self.urls;
        let [credits_used, credits_remaining, initial_budget_credits, issues] = self.counters;

        Ok(Project {
            id: self.id,
            name: self.name,
            description: self.description,
            status,
            progress: self.progress,
            primary_url,
            lovable_live_url,
            lovable_dev_url,
            netlify_url,
            netlify_dev_url,
            vercel_url,
            vercel_dev_url,
            platform_url,
            mocha_published_url,
            deployment,
            repository,
            custom_platforms,
            credits_used,
            credits_remaining,
            initial_budget_credits,
            issues,
            technologies: serde_json::from_str(&technologies)?,
            features_completed: serde_json::from_str(&features_completed)?,
            features_pending: serde_json::from_str(&features_pending)?,
            known_bugs: serde_json::from_str(&known_bugs)?,
            display_order: self.display_order,
            created_at: parse_timestamp(&self.created_at),
            updated_at: parse_timestamp(&self.updated_at),
        })
    }
}

fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|d| d.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

/// Fixed-width so that text ordering matches time ordering
fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Repository for project records
pub struct ProjectRepo<'a> {
    conn: &'a Connection,
}

impl<'a> ProjectRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Get projects matching `query`, in the requested order
    pub fn list(&self, query: &ProjectQuery) -> Result<Vec<Project>, DatabaseError> {
        let order_by = match query.order {
            QueryOrder::CreatedDesc => "created_at DESC, rowid DESC",
            QueryOrder::DisplayOrder => {
                "display_order IS NULL, display_order ASC, created_at DESC, rowid DESC"
            }
        };
        let sql = format!(
            "SELECT {} FROM projects WHERE (?1 IS NULL OR status = ?1) ORDER BY {}",
            COLUMNS, order_by
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let status = query.status.map(|s| s.as_str());
        let rows = stmt.query_map(params![status], ProjectRow::read)?;

        let mut projects = Vec::new();
        for row in rows {
            projects.push(row?.into_project()?);
        }
        Ok(projects)
    }

    /// Get a project by ID
    pub fn get(&self, id: &str) -> Result<Option<Project>, DatabaseError> {
        let sql = format!("SELECT {} FROM projects WHERE id = ?", COLUMNS);
        let row = self
            .conn
            .query_row(&sql, [id], ProjectRow::read)
            .optional()?;

        row.map(ProjectRow::into_project).transpose()
    }

    /// Insert a new project. The id must already be assigned.
    pub fn insert(&self, project: &Project) -> Result<(), DatabaseError> {
        let sql = format!(
            "INSERT INTO projects ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
             ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28)",
            COLUMNS
        );
        self.conn.execute(
            &sql,
            params![
                project.id,
                project.name,
                project.description,
                project.status.as_str(),
                project.progress,
                project.primary_url,
                project.lovable_live_url,
                project.lovable_dev_url,
                project.netlify_url,
                project.netlify_dev_url,
                project.vercel_url,
                project.vercel_dev_url,
                project.platform_url,
                project.mocha_published_url,
                project.deployment,
                project.repository,
                serde_json::to_string(&project.custom_platforms)?,
                project.credits_used,
                project.credits_remaining,
                project.initial_budget_credits,
                project.issues,
                serde_json::to_string(&project.technologies)?,
                serde_json::to_string(&project.features_completed)?,
                serde_json::to_string(&project.features_pending)?,
                serde_json::to_string(&project.known_bugs)?,
                project.display_order,
                format_timestamp(&project.created_at),
                format_timestamp(&project.updated_at),
            ],
        )?;
        Ok(())
    }

    /// Overwrite every column of an existing project. Returns false when the id is unknown.
    pub fn save(&self, project: &Project) -> Result<bool, DatabaseError> {
        let count = self.conn.execute(
            "UPDATE projects SET name = ?2, description = ?3, status = ?4, progress = ?5,
                primary_url = ?6, lovable_live_url = ?7, lovable_dev_url = ?8, netlify_url = ?9,
                netlify_dev_url = ?10, vercel_url = ?11, vercel_dev_url = ?12, platform_url = ?13,
                mocha_published_url = ?14, deployment = ?15, repository = ?16,
                custom_platforms_json = ?17, credits_used = ?18, credits_remaining = ?19,
                initial_budget_credits = ?20, issues = ?21, technologies_json = ?22,
                features_completed_json = ?23, features_pending_json = ?24, known_bugs_json = ?25,
                display_order = ?26, updated_at = ?27
             WHERE id = ?1",
            params![
                project.id,
                project.name,
                project.description,
                project.status.as_str(),
                project.progress,
                project.primary_url,
                project.lovable_live_url,
                project.lovable_dev_url,
                project.netlify_url,
                project.netlify_dev_url,
                project.vercel_url,
                project.vercel_dev_url,
                project.platform_url,
                project.mocha_published_url,
                project.deployment,
                project.repository,
                serde_json::to_string(&project.custom_platforms)?,
                project.credits_used,
                project.credits_remaining,
                project.initial_budget_credits,
                project.issues,
                serde_json::to_string(&project.technologies)?,
                serde_json::to_string(&project.features_completed)?,
                serde_json::to_string(&project.features_pending)?,
                serde_json::to_string(&project.known_bugs)?,
                project.display_order,
                format_timestamp(&project.updated_at),
            ],
        )?;
        Ok(count > 0)
    }

    /// Delete a project
    pub fn delete(&self, id: &str) -> Result<bool, DatabaseError> {
        let count = self.conn.execute("DELETE FROM projects WHERE id = ?", [id])?;
        Ok(count > 0)
    }

    pub fn count(&self) -> Result<i64, DatabaseError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?;
        Ok(count)
    }
}

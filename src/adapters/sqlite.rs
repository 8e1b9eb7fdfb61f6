//! Local SQLite backend

use async_trait::async_trait;
use chrono::Utc;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use super::{new_record_id, RemoteStore};
use crate::error::RemoteError;
use crate::models::{Project, ProjectDraft, ProjectPatch, ProjectQuery};
use crate::storage::{open_database, open_in_memory, Database, DatabaseError, ProjectRepo};

impl From<DatabaseError> for RemoteError {
    fn from(err: DatabaseError) -> Self {
        RemoteError::Database(err.to_string())
    }
}

/// Collaborator backed by a local SQLite file
pub struct SqliteBackend {
    db: Mutex<Database>,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let db = open_database(path)?;
        info!("SQLite backend ready at {:?}", path);
        Ok(Self { db: Mutex::new(db) })
    }

    pub fn in_memory() -> Result<Self, DatabaseError> {
        Ok(Self {
            db: Mutex::new(open_in_memory()?),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Database>, RemoteError> {
        self.db
            .lock()
            .map_err(|e| RemoteError::Database(e.to_string()))
    }
}

#[async_trait]
impl RemoteStore for SqliteBackend {
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, RemoteError> {
        let project = Project::from_draft(new_record_id(), draft.clone(), Utc::now());
        let db = self.lock()?;
        ProjectRepo::new(&db.conn).insert(&project)?;
        debug!("Inserted project {} into SQLite", project.id);
        Ok(project)
    }

    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<(), RemoteError> {
        let db = self.lock()?;
        let repo = ProjectRepo::new(&db.conn);
        let mut project = repo
            .get(id)?
            .ok_or_else(|| RemoteError::Rejected(format!("no project with id {}", id)))?;
        patch.apply(&mut project);
        repo.save(&project)?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let db = self.lock()?;
        if ProjectRepo::new(&db.conn).delete(id)? {
            Ok(())
        } else {
            Err(RemoteError::Rejected(format!("no project with id {}", id)))
        }
    }

    async fn query(&self, query: &ProjectQuery) -> Result<Vec<Project>, RemoteError> {
        let db = self.lock()?;
        Ok(ProjectRepo::new(&db.conn).list(query)?)
    }
}

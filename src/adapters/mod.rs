//! Remote collaborator adapters
//!
//! The store talks to its persistence backend only through [`RemoteStore`]:
//! - REST: the hosted backend over HTTP (PostgREST dialect)
//! - SQLite: a local database file for offline use
//! - Memory: in-process, for demos and tests

use async_trait::async_trait;

use crate::error::RemoteError;
use crate::models::{Project, ProjectDraft, ProjectPatch, ProjectQuery, QueryOrder};

pub mod memory;
pub mod rest;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use rest::RestBackend;
pub use sqlite::SqliteBackend;

/// Persistence collaborator scoped to the signed-in user's own records
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Persist a new record and return it with its assigned id
    async fn insert(&self, draft: &ProjectDraft) -> Result<Project, RemoteError>;

    async fn update(&self, id: &str, patch: &ProjectPatch) -> Result<(), RemoteError>;

    async fn delete(&self, id: &str) -> Result<(), RemoteError>;

    async fn query(&self, query: &ProjectQuery) -> Result<Vec<Project>, RemoteError>;
}

/// Sort in place the way the hosted backend orders query results.
///
/// `projects` must be in insertion order; ties on `created_at` keep the most
/// recently inserted record first.
pub(crate) fn sort_projects(projects: &mut [Project], order: QueryOrder) {
    projects.reverse();
    projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if order == QueryOrder::DisplayOrder {
        projects.sort_by_key(|p| (p.display_order.is_none(), p.display_order));
    }
}

/// Generate a short record id
pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..16].to_string()
}

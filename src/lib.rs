//! DevTracker project store
//!
//! Canonical URL resolution for project records and an optimistic,
//! single-owner project store synchronized with a remote collaborator.

pub mod adapters;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;
pub mod utils;

use std::sync::Arc;
use tracing::info;

pub use adapters::{MemoryBackend, RemoteStore, RestBackend, SqliteBackend};
pub use error::{RemoteError, StoreError};
pub use models::{
    AppSettings, BackendSettings, InsertPosition, Project, ProjectDraft, ProjectPatch,
    ProjectQuery, ProjectStatus, ProjectTemplate, QueryOrder,
};
pub use services::{ProjectStore, StoreNotice, StoreOptions, Target, WriteHandle};
pub use utils::url::{normalize_url, open_url, resolve_project_url};

/// Build the remote collaborator described by `settings`
pub fn build_backend(settings: &BackendSettings) -> Result<Arc<dyn RemoteStore>, RemoteError> {
    let backend: Arc<dyn RemoteStore> = match settings {
        BackendSettings::Rest {
            url,
            anon_key,
            access_token,
            user_id,
            table,
        } => {
            info!("Using hosted backend at {}", url);
            Arc::new(RestBackend::new(adapters::rest::RestConfig {
                url: url.clone(),
                anon_key: anon_key.clone(),
                access_token: access_token.clone(),
                user_id: user_id.clone(),
                table: table.clone(),
            })?)
        }
        BackendSettings::Sqlite { path } => {
            info!("Using local SQLite backend");
            Arc::new(SqliteBackend::open(path)?)
        }
        BackendSettings::Memory => {
            info!("Using in-memory backend");
            Arc::new(MemoryBackend::new())
        }
    };
    Ok(backend)
}

/// Create an empty store wired to the configured backend.
///
/// Call [`ProjectStore::list`] afterwards (and on every sign-in) to load the
/// user's projects.
pub fn connect(settings: &AppSettings) -> Result<ProjectStore, RemoteError> {
    let backend = build_backend(&settings.backend)?;
    Ok(ProjectStore::new(backend, StoreOptions::from(settings)))
}

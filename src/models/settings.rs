use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where newly created projects land in the display order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    #[default]
    First,
    Last,
}

/// Which remote collaborator backs the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BackendSettings {
    /// Hosted backend speaking the PostgREST dialect
    Rest {
        url: String,
        anon_key: String,
        #[serde(default)]
        access_token: Option<String>,
        #[serde(default)]
        user_id: Option<String>,
        #[serde(default = "default_table")]
        table: String,
    },
    /// Local SQLite file
    Sqlite { path: PathBuf },
    /// In-process, nothing persisted
    Memory,
}

fn default_table() -> String {
    "projects".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings::Memory
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AppSettings {
    pub backend: BackendSettings,
    pub insert_position: InsertPosition,
    /// When set, `reorder` writes each moved record's `display_order` remotely
    pub persist_display_order: bool,
    pub log_dir: Option<PathBuf>,
}

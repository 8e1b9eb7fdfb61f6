use serde::{Deserialize, Serialize};

use super::project::ProjectStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryOrder {
    /// Newest first, by server-side creation time
    #[default]
    CreatedDesc,
    /// Ascending `display_order`, unordered records last (newest first among them)
    DisplayOrder,
}

/// Filter and ordering for a remote fetch
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProjectQuery {
    pub order: QueryOrder,
    pub status: Option<ProjectStatus>,
}

impl ProjectQuery {
    pub fn ordered_by(order: QueryOrder) -> Self {
        Self { order, status: None }
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }
}

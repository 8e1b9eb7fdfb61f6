use serde::{Deserialize, Serialize};

use super::project::{ProjectDraft, ProjectStatus};

/// Snapshot a new project can be started from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectTemplate {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features_pending: Vec<String>,
    #[serde(default)]
    pub initial_budget_credits: i64,
}

impl ProjectDraft {
    /// Build a draft from a template. The template's own name is only used
    /// when `name` is blank.
    pub fn from_template(template: &ProjectTemplate, name: &str) -> Self {
        let name = if name.trim().is_empty() {
            template.name.clone()
        } else {
            name.to_string()
        };

        Self {
            name,
            description: template.description.clone(),
            status: template.status,
            technologies: template.technologies.clone(),
            features_pending: template.features_pending.clone(),
            initial_budget_credits: template.initial_budget_credits,
            credits_remaining: template.initial_budget_credits,
            ..Default::default()
        }
    }
}

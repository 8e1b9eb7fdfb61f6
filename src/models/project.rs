use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Lifecycle label of a project. Any status may move to any other.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectStatus {
    #[default]
    Planning,
    Development,
    Testing,
    Deployed,
    Maintenance,
    Abandoned,
    Active,
    Completed,
    OnHold,
    Archived,
}

impl ProjectStatus {
    pub const ALL: [ProjectStatus; 10] = [
        ProjectStatus::Planning,
        ProjectStatus::Development,
        ProjectStatus::Testing,
        ProjectStatus::Deployed,
        ProjectStatus::Maintenance,
        ProjectStatus::Abandoned,
        ProjectStatus::Active,
        ProjectStatus::Completed,
        ProjectStatus::OnHold,
        ProjectStatus::Archived,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Planning => "planning",
            ProjectStatus::Development => "development",
            ProjectStatus::Testing => "testing",
            ProjectStatus::Deployed => "deployed",
            ProjectStatus::Maintenance => "maintenance",
            ProjectStatus::Abandoned => "abandoned",
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::OnHold => "on-hold",
            ProjectStatus::Archived => "archived",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.as_str() == s)
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked project as the dashboard sees it.
///
/// `id` is empty until the remote store has accepted the record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default)]
    pub progress: i32,

    #[serde(default, rename = "primaryUrl")]
    pub primary_url: Option<String>,
    #[serde(default)]
    pub lovable_live_url: Option<String>,
    #[serde(default)]
    pub lovable_dev_url: Option<String>,
    #[serde(default)]
    pub netlify_url: Option<String>,
    #[serde(default)]
    pub netlify_dev_url: Option<String>,
    #[serde(default)]
    pub vercel_url: Option<String>,
    #[serde(default)]
    pub vercel_dev_url: Option<String>,
    #[serde(default)]
    pub platform_url: Option<String>,
    #[serde(default)]
    pub mocha_published_url: Option<String>,
    #[serde(default)]
    pub deployment: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    /// User-defined platform name to URL.
    #[serde(default)]
    pub custom_platforms: BTreeMap<String, String>,

    #[serde(default)]
    pub credits_used: i64,
    #[serde(default)]
    pub credits_remaining: i64,
    #[serde(default)]
    pub initial_budget_credits: i64,
    #[serde(default)]
    pub issues: i64,

    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub features_completed: Vec<String>,
    #[serde(default)]
    pub features_pending: Vec<String>,
    #[serde(default)]
    pub known_bugs: Vec<String>,

    #[serde(default)]
    pub display_order: Option<i64>,

    #[serde(default = "Utc::now", rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default = "Utc::now", rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Project {
    fn default() -> Self {
        Self::from_draft(String::new(), ProjectDraft::default(), Utc::now())
    }
}

impl Project {
    /// Materialize a draft under the given id. Both timestamps are set to `now`.
    pub fn from_draft(id: String, draft: ProjectDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            status: draft.status,
            progress: draft.progress,
            primary_url: draft.primary_url,
            lovable_live_url: draft.lovable_live_url,
            lovable_dev_url: draft.lovable_dev_url,
            netlify_url: draft.netlify_url,
            netlify_dev_url: draft.netlify_dev_url,
            vercel_url: draft.vercel_url,
            vercel_dev_url: draft.vercel_dev_url,
            platform_url: draft.platform_url,
            mocha_published_url: draft.mocha_published_url,
            deployment: draft.deployment,
            repository: draft.repository,
            custom_platforms: draft.custom_platforms,
            credits_used: draft.credits_used,
            credits_remaining: draft.credits_remaining,
            initial_budget_credits: draft.initial_budget_credits,
            issues: draft.issues,
            technologies: draft.technologies,
            features_completed: draft.features_completed,
            features_pending: draft.features_pending,
            known_bugs: draft.known_bugs,
            display_order: draft.display_order,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether the remote store has assigned this record an id
    pub fn is_persisted(&self) -> bool {
        !self.id.is_empty()
    }

    /// Progress clamped to 0..=100 for display
    pub fn display_progress(&self) -> i32 {
        self.progress.clamp(0, 100)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Partial project accepted by `create`. Every omitted field takes its default.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ProjectDraft {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: i32,

    #[serde(rename = "primaryUrl")]
    pub primary_url: Option<String>,
    pub lovable_live_url: Option<String>,
    pub lovable_dev_url: Option<String>,
    pub netlify_url: Option<String>,
    pub netlify_dev_url: Option<String>,
    pub vercel_url: Option<String>,
    pub vercel_dev_url: Option<String>,
    pub platform_url: Option<String>,
    pub mocha_published_url: Option<String>,
    pub deployment: Option<String>,
    pub repository: Option<String>,
    pub custom_platforms: BTreeMap<String, String>,

    pub credits_used: i64,
    pub credits_remaining: i64,
    pub initial_budget_credits: i64,
    pub issues: i64,

    pub technologies: Vec<String>,
    pub features_completed: Vec<String>,
    pub features_pending: Vec<String>,
    pub known_bugs: Vec<String>,

    pub display_order: Option<i64>,
}

impl ProjectDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// The trimmed name, or `None` when nothing but whitespace is left
    pub fn validated_name(&self) -> Option<&str> {
        let name = self.name.trim();
        (!name.is_empty()).then_some(name)
    }
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self {
            name: project.name.clone(),
            description: project.description.clone(),
            status: project.status,
            progress: project.progress,
            primary_url: project.primary_url.clone(),
            lovable_live_url: project.lovable_live_url.clone(),
            lovable_dev_url: project.lovable_dev_url.clone(),
            netlify_url: project.netlify_url.clone(),
            netlify_dev_url: project.netlify_dev_url.clone(),
            vercel_url: project.vercel_url.clone(),
            vercel_dev_url: project.vercel_dev_url.clone(),
            platform_url: project.platform_url.clone(),
            mocha_published_url: project.mocha_published_url.clone(),
            deployment: project.deployment.clone(),
            repository: project.repository.clone(),
            custom_platforms: project.custom_platforms.clone(),
            credits_used: project.credits_used,
            credits_remaining: project.credits_remaining,
            initial_budget_credits: project.initial_budget_credits,
            issues: project.issues,
            technologies: project.technologies.clone(),
            features_completed: project.features_completed.clone(),
            features_pending: project.features_pending.clone(),
            known_bugs: project.known_bugs.clone(),
            display_order: project.display_order,
        }
    }
}

/// Field-level patch applied by `update`.
///
/// Only fields that are `Some` are applied and serialized. An empty string
/// clears an optional text field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<i32>,

    #[serde(rename = "primaryUrl", skip_serializing_if = "Option::is_none")]
    pub primary_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lovable_live_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lovable_dev_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netlify_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub netlify_dev_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vercel_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vercel_dev_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mocha_published_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_platforms: Option<BTreeMap<String, String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credits_remaining: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_budget_credits: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub technologies: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_completed: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features_pending: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub known_bugs: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i64>,

    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn set_text(target: &mut Option<String>, value: &Option<String>) {
    if let Some(value) = value {
        *target = if value.trim().is_empty() {
            None
        } else {
            Some(value.clone())
        };
    }
}

fn set_value<T: Clone>(target: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *target = value.clone();
    }
}

impl ProjectPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn display_order(position: i64) -> Self {
        Self {
            display_order: Some(position),
            ..Default::default()
        }
    }

    /// True when the patch carries no field besides the timestamp
    pub fn is_empty(&self) -> bool {
        let probe = Self {
            updated_at: None,
            ..self.clone()
        };
        probe == Self::default()
    }

    /// Apply every present field to `project`, then refresh `updated_at`.
    pub fn apply(&self, project: &mut Project) {
        set_value(&mut project.name, &self.name);
        set_text(&mut project.description, &self.description);
        set_value(&mut project.status, &self.status);
        set_value(&mut project.progress, &self.progress);

        set_text(&mut project.primary_url, &self.primary_url);
        set_text(&mut project.lovable_live_url, &self.lovable_live_url);
        set_text(&mut project.lovable_dev_url, &self.lovable_dev_url);
        set_text(&mut project.netlify_url, &self.netlify_url);
        set_text(&mut project.netlify_dev_url, &self.netlify_dev_url);
        set_text(&mut project.vercel_url, &self.vercel_url);
        set_text(&mut project.vercel_dev_url, &self.vercel_dev_url);
        set_text(&mut project.platform_url, &self.platform_url);
        set_text(&mut project.mocha_published_url, &self.mocha_published_url);
        set_text(&mut project.deployment, &self.deployment);
        set_text(&mut project.repository, &self.repository);
        set_value(&mut project.custom_platforms, &self.custom_platforms);

        set_value(&mut project.credits_used, &self.credits_used);
        set_value(&mut project.credits_remaining, &self.credits_remaining);
        set_value(&mut project.initial_budget_credits, &self.initial_budget_credits);
        set_value(&mut project.issues, &self.issues);

        set_value(&mut project.technologies, &self.technologies);
        set_value(&mut project.features_completed, &self.features_completed);
        set_value(&mut project.features_pending, &self.features_pending);
        set_value(&mut project.known_bugs, &self.known_bugs);

        if self.display_order.is_some() {
            project.display_order = self.display_order;
        }

        project.updated_at = self.updated_at.unwrap_or_else(Utc::now);
    }
}

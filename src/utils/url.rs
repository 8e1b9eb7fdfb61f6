//! Canonical project URL resolution
//!
//! A project can accumulate URLs from many platforms. Every read path that
//! needs "the" URL of a project goes through [`resolve_project_url`], which
//! walks [`CANONICAL_URL_PRIORITY`] and returns the first non-empty field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Project;

static SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").expect("valid scheme regex"));

/// URL-bearing fields of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlField {
    PrimaryUrl,
    LovableLiveUrl,
    LovableDevUrl,
    NetlifyUrl,
    NetlifyDevUrl,
    VercelUrl,
    VercelDevUrl,
    PlatformUrl,
    MochaPublishedUrl,
    Deployment,
    Repository,
}

/// Resolution order for the canonical URL. Users override it by setting `primaryUrl`.
pub const CANONICAL_URL_PRIORITY: [UrlField; 5] = [
    UrlField::PrimaryUrl,
    UrlField::LovableLiveUrl,
    UrlField::LovableDevUrl,
    UrlField::Deployment,
    UrlField::Repository,
];

/// Every fixed URL field in declaration order
pub const ALL_URL_FIELDS: [UrlField; 11] = [
    UrlField::PrimaryUrl,
    UrlField::LovableLiveUrl,
    UrlField::LovableDevUrl,
    UrlField::NetlifyUrl,
    UrlField::NetlifyDevUrl,
    UrlField::VercelUrl,
    UrlField::VercelDevUrl,
    UrlField::PlatformUrl,
    UrlField::MochaPublishedUrl,
    UrlField::Deployment,
    UrlField::Repository,
];

impl UrlField {
    /// JSON key of the field
    pub fn key(&self) -> &'static str {
        match self {
            UrlField::PrimaryUrl => "primaryUrl",
            UrlField::LovableLiveUrl => "lovable_live_url",
            UrlField::LovableDevUrl => "lovable_dev_url",
            UrlField::NetlifyUrl => "netlify_url",
            UrlField::NetlifyDevUrl => "netlify_dev_url",
            UrlField::VercelUrl => "vercel_url",
            UrlField::VercelDevUrl => "vercel_dev_url",
            UrlField::PlatformUrl => "platform_url",
            UrlField::MochaPublishedUrl => "mocha_published_url",
            UrlField::Deployment => "deployment",
            UrlField::Repository => "repository",
        }
    }

    /// Non-empty value of this field, trimmed
    pub fn value<'a>(&self, project: &'a Project) -> Option<&'a str> {
        let raw = match self {
            UrlField::PrimaryUrl => &project.primary_url,
            UrlField::LovableLiveUrl => &project.lovable_live_url,
            UrlField::LovableDevUrl => &project.lovable_dev_url,
            UrlField::NetlifyUrl => &project.netlify_url,
            UrlField::NetlifyDevUrl => &project.netlify_dev_url,
            UrlField::VercelUrl => &project.vercel_url,
            UrlField::VercelDevUrl => &project.vercel_dev_url,
            UrlField::PlatformUrl => &project.platform_url,
            UrlField::MochaPublishedUrl => &project.mocha_published_url,
            UrlField::Deployment => &project.deployment,
            UrlField::Repository => &project.repository,
        };
        raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }
}

/// The canonical URL of a project, or `None` when no priority field is set.
///
/// `None` means "no URL configured" and is not an error.
pub fn resolve_project_url(project: &Project) -> Option<&str> {
    CANONICAL_URL_PRIORITY
        .iter()
        .find_map(|field| field.value(project))
}

/// Prefix `https://` onto a URL that has no scheme. Idempotent.
///
/// Applied at the point of use only; the stored value is left untouched.
pub fn normalize_url(url: &str) -> String {
    let url = url.trim();
    if SCHEME.is_match(url) {
        url.to_string()
    } else {
        format!("https://{}", url.trim_start_matches('/'))
    }
}

/// Resolved and normalized URL, ready to hand to a browser
pub fn open_url(project: &Project) -> Option<String> {
    resolve_project_url(project).map(normalize_url)
}

/// Every configured URL with a label: fixed fields first, then custom platforms
pub fn project_links(project: &Project) -> Vec<(String, String)> {
    let fixed = ALL_URL_FIELDS
        .iter()
        .filter_map(|field| field.value(project).map(|url| (field.key().to_string(), url.to_string())));

    let custom = project
        .custom_platforms
        .iter()
        .map(|(name, url)| (name.trim(), url.trim()))
        .filter(|(name, url)| !name.is_empty() && !url.is_empty())
        .map(|(name, url)| (name.to_string(), url.to_string()));

    fixed.chain(custom).collect()
}

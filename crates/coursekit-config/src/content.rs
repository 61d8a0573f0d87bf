//! Settings for the markdown content pipeline.
//!
//! - `DOCS_ROOT`: directory holding `res/{slug}.md` (default `docs`)
//! - `SITE_NAME`: suffix of resource page titles (default `Coursekit`)
//! - `GITHUB_REPOSITORY`: `owner/repo` used to link bare `#123` references

use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentConfig {
    pub docs_root: PathBuf,
    pub site_name: String,
    pub github_repository: Option<String>,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("docs"),
            site_name: "Coursekit".to_string(),
            github_repository: None,
        }
    }
}

impl ContentConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            docs_root: env::var("DOCS_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.docs_root),
            site_name: env::var("SITE_NAME").unwrap_or(defaults.site_name),
            github_repository: env::var("GITHUB_REPOSITORY")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| s.split_once('/').is_some_and(|(o, r)| !o.is_empty() && !r.is_empty())),
        }
    }
}

//! Browser origins allowed to call the API.
//!
//! - `ALLOWED_ORIGINS`: comma-separated origins (default: the local admin UI)
//! - `CORS_MAX_AGE`: seconds a preflight may be cached (default 600)

use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub max_age_secs: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: parse_origins(DEFAULT_ORIGINS),
            max_age_secs: 600,
        }
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or(defaults.allowed_origins),
            max_age_secs: env::var("CORS_MAX_AGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_age_secs),
        }
    }
}

/// Trailing slashes are dropped; browsers never send them in `Origin`.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://admin.example.com/ ,,http://localhost:5173"),
            vec!["https://admin.example.com", "http://localhost:5173"]
        );
        assert!(parse_origins("").is_empty());
    }
}

//! Loads markdown documents from the documents root and renders them.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ContentError;
use crate::front_matter::FrontMatter;
use crate::markdown::MarkdownRenderer;

/// Slugs published under `/res`.
pub const KNOWN_RESOURCES: &[&str] = &["faq", "tos", "contact", "privacy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceCategory {
    Res,
}

impl ResourceCategory {
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Res => "res",
        }
    }

    pub fn is_known(&self, slug: &str) -> bool {
        match self {
            Self::Res => KNOWN_RESOURCES.contains(&slug),
        }
    }
}

/// A rendered markdown document. Created per request; never cached.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct RenderedDocument {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub content_html: String,
    /// Remaining front-matter keys
    #[schema(value_type = Object)]
    pub extra: BTreeMap<String, Value>,
}

pub struct ContentLoader {
    root: PathBuf,
    renderer: Arc<MarkdownRenderer>,
}

impl ContentLoader {
    pub fn new(root: impl Into<PathBuf>, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            root: root.into(),
            renderer,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn renderer(&self) -> &MarkdownRenderer {
        &self.renderer
    }

    /// Reads `{root}/{category}/{slug}.md`, splits the front matter and
    /// renders the body. Blocking; async callers should use `spawn_blocking`.
    pub fn load(
        &self,
        category: ResourceCategory,
        slug: &str,
    ) -> Result<RenderedDocument, ContentError> {
        if !is_valid_slug(slug) {
            return Err(ContentError::NotFound(slug.to_string()));
        }

        let path = self
            .root
            .join(category.dir_name())
            .join(format!("{}.md", slug));

        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ContentError::NotFound(slug.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let origin = path.display().to_string();
        let (front_matter, body) = FrontMatter::parse(&source, &origin)?;
        let content_html = self.renderer.render(body);

        tracing::debug!(path = %origin, bytes = source.len(), "Rendered document");

        Ok(RenderedDocument {
            slug: slug.to_string(),
            title: front_matter.title,
            description: front_matter.description,
            content_html,
            extra: front_matter.extra,
        })
    }
}

/// Lowercase ASCII words joined by single hyphens; nothing that could
/// leave the category directory.
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= 64
        && slug
            .split('-')
            .all(|part| !part.is_empty() && part.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()))
}

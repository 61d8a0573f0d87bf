//! # Coursekit Content
//!
//! Markdown rendering and document loading.
//!
//! - [`markdown`]: [`MarkdownRenderer`], sanitized GFM to HTML with code highlighting
//! - [`front_matter`]: YAML metadata header parsing
//! - [`loader`]: [`ContentLoader`], reads `{root}/{category}/{slug}.md` into a [`RenderedDocument`]
//!
//! ```ignore
//! use coursekit_content::{ContentLoader, MarkdownRenderer, ResourceCategory};
//!
//! let loader = ContentLoader::new("docs", Arc::new(MarkdownRenderer::new()));
//! let doc = loader.load(ResourceCategory::Res, "faq")?;
//! ```

pub mod error;
pub mod front_matter;
pub mod loader;
pub mod markdown;

pub use error::ContentError;
pub use front_matter::FrontMatter;
pub use loader::{ContentLoader, KNOWN_RESOURCES, RenderedDocument, ResourceCategory};
pub use markdown::MarkdownRenderer;

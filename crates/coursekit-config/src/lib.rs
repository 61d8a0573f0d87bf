//! # Coursekit Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: bearer token verification
//! - [`cors`]: allowed browser origins
//! - [`content`]: markdown documents root and rendering options
//! - [`upload`]: upload directory, public URL and size ceiling
//!
//! ```ignore
//! use coursekit_config::{ContentConfig, CorsConfig, JwtConfig, UploadConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let content_config = ContentConfig::from_env();
//! ```

pub mod content;
pub mod cors;
pub mod jwt;
pub mod upload;

pub use content::ContentConfig;
pub use cors::CorsConfig;
pub use jwt::JwtConfig;
pub use upload::UploadConfig;

//! # Coursekit Core
//!
//! Foundational types shared by every Coursekit crate:
//!
//! - [`errors`]: [`AppError`], the HTTP-mapped error returned by handlers and services
//! - [`pagination`]: zero-based page/size query parameters and response metadata
//! - [`file_storage`]: storage backend abstraction for uploads
//! - [`permissions`]: permission name constants
//! - [`serde`]: custom deserialization helpers
//!
//! ```ignore
//! use coursekit_core::{AppError, PaginationParams};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Course not found"));
//! let params = PaginationParams::new(1, 2);
//! assert_eq!(params.offset(), 2);
//! ```

pub mod errors;
pub mod file_storage;
pub mod pagination;
pub mod permissions;
pub mod serde;

pub use errors::AppError;
pub use pagination::{PaginationMeta, PaginationParams};

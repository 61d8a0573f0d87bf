//! # Coursekit Auth
//!
//! Access token handling for the Coursekit API. Identity is owned by an
//! external provider; this crate verifies the HS256 bearer tokens it issues.
//!
//! - [`roles`]: [`UserRole`] and the permissions each role grants
//! - [`claims`]: the [`Claims`] payload
//! - [`jwt`]: token creation and verification

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use roles::UserRole;

//! Permission constants checked by the request extractors.
//!
//! ```ignore
//! use coursekit_core::permissions;
//!
//! if auth_user.has_permission(permissions::PAGES_MANAGE) {
//!     // mutate pages
//! }
//! ```

/// Create, update and delete courses
pub const COURSES_MANAGE: &str = "courses:manage";
/// Create, update, delete and reorder course modules
pub const MODULES_MANAGE: &str = "modules:manage";
/// Create, update, delete, reorder and bulk-replace pages
pub const PAGES_MANAGE: &str = "pages:manage";
/// Upload files
pub const UPLOADS_CREATE: &str = "uploads:create";
/// See courses (and their pages and modules) that are still drafts
pub const DRAFTS_READ: &str = "drafts:read";

/// Every permission known to the service.
pub const ALL: &[&str] = &[
    COURSES_MANAGE,
    MODULES_MANAGE,
    PAGES_MANAGE,
    UPLOADS_CREATE,
    DRAFTS_READ,
];

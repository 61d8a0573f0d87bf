//! Request extractors for authentication and authorization.
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. [`auth::AuthUser`] verifies the token and exposes its claims
//! 3. Permission extractors (`RequirePagesManage`, ...) reject callers whose
//!    role lacks the permission with 403, before the body is read
//! 4. [`auth::MaybeAuthUser`] serves public reads: anonymous callers only
//!    see published courses
//!
//! ```ignore
//! use crate::middleware::auth::{MaybeAuthUser, RequirePagesManage};
//!
//! async fn list(viewer: MaybeAuthUser) -> impl IntoResponse {
//!     let visibility = viewer.visibility();
//! }
//!
//! async fn reorder(RequirePagesManage(_): RequirePagesManage) -> impl IntoResponse {
//!     // only reached with the pages:manage permission
//! }
//! ```

pub mod auth;

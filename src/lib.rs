//! # Coursekit API
//!
//! A REST API built with Rust, Axum, and PostgreSQL for an admin-edited
//! course catalog: courses, their modules, and a tree of markdown pages per
//! course.
//!
//! ## Overview
//!
//! - **Catalog**: courses in `DRAFT` or `PUBLISHED` state; anonymous and
//!   non-admin callers only ever see published content
//! - **Pages**: nested through `parent_page_id`, ordered among siblings by
//!   `position`
//! - **Reordering**: drag-and-drop batches applied in a single transaction
//! - **Bulk replace**: swap the whole page set of a course atomically
//! - **Rendering**: GitHub-flavored markdown to sanitized HTML with
//!   highlighted code blocks
//! - **Resources**: static markdown documents served as HTML under `/res`
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Auth extractors and permission guards
//! ├── modules/          # Feature modules
//! │   ├── courses/         # Course catalog
//! │   ├── course_modules/  # Ordered modules of a course
//! │   ├── pages/           # Page tree, reorder, bulk replace, rendering
//! │   ├── resources/       # /res pages and their JSON form
//! │   └── uploads/         # Multipart uploads to file storage
//! ├── docs.rs           # OpenAPI document
//! ├── logging.rs        # Tracing setup and request logging
//! ├── metrics.rs        # Prometheus metrics
//! └── router.rs         # Route tree and layers
//! ```
//!
//! Each feature module follows the same layout:
//!
//! - `controller.rs`: HTTP handlers
//! - `service.rs`: Queries and business rules
//! - `router.rs`: Axum router configuration
//!
//! Shared types live in the workspace crates: `coursekit-models` (entities,
//! DTOs, reorder and tree checks), `coursekit-content` (markdown rendering),
//! `coursekit-core` (errors, pagination, file storage) and `coursekit-auth`
//! (roles and tokens).
//!
//! ## Authentication
//!
//! Tokens are HS256 JWTs issued by an external identity provider sharing
//! `JWT_SECRET`; `coursekit-cli issue-token` mints one for development.
//! The `admin` role grants every permission, `user` grants none.
//!
//! ## API Documentation
//!
//! - Swagger UI: `http://localhost:3000/swagger-ui`
//! - Scalar: `http://localhost:3000/scalar`

pub mod docs;
pub mod logging;
pub mod metrics;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use coursekit_auth;
pub use coursekit_config;
pub use coursekit_content;
pub use coursekit_core;
pub use coursekit_db;
pub use coursekit_models;

//! # Coursekit Models
//!
//! Domain models and DTOs for the Coursekit API.
//!
//! # Modules
//!
//! - [`courses`]: Courses and their publication status
//! - [`course_modules`]: Flat, ordered modules of a course
//! - [`pages`]: The page tree of a course, including bulk replacement
//! - [`positions`]: Reorder batches for pages and modules
//! - [`tree`]: Cycle and membership checks for page hierarchies
//! - [`meta`]: The free-form `meta` object and its thumbnail convention
//! - [`ids`]: Typed UUID identifiers
//!
//! # Example
//!
//! ```ignore
//! use coursekit_models::positions::{PagePositionUpdate, resolve_page_positions};
//!
//! let resolved = resolve_page_positions(&updates)?;
//! ```

pub mod course_modules;
pub mod courses;
pub mod ids;
pub mod meta;
pub mod pages;
pub mod positions;
pub mod tree;

pub use course_modules::{CourseModule, CreateModuleDto, UpdateModuleDto};

pub use courses::{Course, CourseStatus, CreateCourseDto, PaginatedCoursesResponse, UpdateCourseDto};

pub use ids::{CourseId, ModuleId, PageId, UserId};

pub use meta::{ThumbnailImage, empty_meta};

pub use pages::{
    CreatePageDto, Page, PageFilterParams, PaginatedPagesResponse, RenderedPage, ReplacePageItem,
    ReplacePagesDto, ReplacePagesResponse, UpdatePageContentDto, UpdatePageDto,
};

pub use positions::{
    ModulePositionUpdate, PagePositionUpdate, PositionError, ReorderResponse, ResolvedPosition,
};

pub use tree::{PageTree, TreeError};

//! Page domain models and DTOs.
//!
//! Pages form a tree per course through `parent_page_id`. Siblings (same
//! course, same parent) are ordered by `position`, ties broken by creation
//! time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use coursekit_core::PaginationMeta;
use coursekit_core::serde::deserialize_optional_uuid;

use crate::ids::{CourseId, PageId};
use crate::meta::{empty_meta, validate_meta};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    pub position: i32,
    pub parent_page_id: Option<PageId>,
    pub course_id: CourseId,
    #[schema(value_type = Object)]
    pub meta: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedPagesResponse {
    pub data: Vec<Page>,
    pub meta: PaginationMeta,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreatePageDto {
    pub course_id: CourseId,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Appended after the last sibling when omitted
    #[validate(range(min = 0, message = "position must be >= 0"))]
    pub position: Option<i32>,
    pub parent_page_id: Option<PageId>,
    #[validate(custom(function = "validate_meta"))]
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
}

/// Full-record replacement of an existing page. The owning course cannot
/// change; a `null` parent moves the page to the root.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePageDto {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub content: String,
    #[validate(range(min = 0, message = "position must be >= 0"))]
    pub position: i32,
    pub parent_page_id: Option<PageId>,
    #[serde(default = "empty_meta")]
    #[validate(custom(function = "validate_meta"))]
    #[schema(value_type = Object)]
    pub meta: Value,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdatePageContentDto {
    pub content: String,
}

/// Query filter for listing pages: absent, empty or `null` selects roots.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageFilterParams {
    /// Parent page; omit (or pass `null`) for root pages
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub parent_id: Option<Uuid>,
}

impl PageFilterParams {
    pub fn parent(&self) -> Option<PageId> {
        self.parent_id.map(PageId::from)
    }
}

/// One page of a bulk replacement. Pages may reference each other as
/// parents through client-chosen ids.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ReplacePageItem {
    /// Generated when omitted
    pub id: Option<PageId>,
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub content: String,
    #[validate(range(min = 0, message = "position must be >= 0"))]
    pub position: i32,
    pub parent_page_id: Option<PageId>,
    #[validate(custom(function = "validate_meta"))]
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ReplacePagesDto {
    #[validate(nested)]
    pub pages: Vec<ReplacePageItem>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReplacePagesResponse {
    pub deleted: u64,
    pub inserted: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RenderedPage {
    pub id: PageId,
    pub title: String,
    pub description: Option<String>,
    pub content_html: String,
}

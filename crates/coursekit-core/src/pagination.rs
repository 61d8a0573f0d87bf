//! Page-based pagination for list endpoints.
//!
//! Pages are zero-indexed: `page=0&size=10` returns the first ten rows,
//! `page=1&size=2` skips two rows and returns the next two.
//!
//! # Example
//!
//! ```ignore
//! use coursekit_core::pagination::{PaginationMeta, PaginationParams};
//!
//! async fn list_courses(
//!     Query(params): Query<PaginationParams>,
//! ) -> Result<Json<PaginatedCoursesResponse>, AppError> {
//!     let courses = fetch_courses(params.size(), params.offset()).await?;
//!     let total = count_courses().await?;
//!
//!     Ok(Json(PaginatedCoursesResponse {
//!         data: courses,
//!         meta: PaginationMeta::new(&params, total),
//!     }))
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound for `size`.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Deserializes an optional string into an optional i64.
///
/// Query strings deliver every value as text, and an empty value
/// (`?page=`) is treated as absent.
fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match Option::<NumberOrString>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::Text(s)) if s.is_empty() => Ok(None),
        Some(NumberOrString::Text(s)) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
    }
}

/// Metadata about a paginated response.
///
/// ```json
/// {
///   "data": [...],
///   "meta": { "total": 42, "page": 1, "size": 10, "has_more": true }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Total number of rows matching the query
    pub total: i64,
    /// Zero-based page index that was served
    pub page: i64,
    /// Page size that was applied
    pub size: i64,
    /// Whether rows exist past this page
    pub has_more: bool,
}

impl PaginationMeta {
    #[must_use]
    pub fn new(params: &PaginationParams, total: i64) -> Self {
        Self {
            total,
            page: params.page(),
            size: params.size(),
            has_more: params.offset() + params.size() < total,
        }
    }
}

/// Query parameters for pagination.
///
/// - `page` is zero-based and clamped to a minimum of 0 (default 0)
/// - `size` is clamped to `[1, MAX_PAGE_SIZE]` (default 10)
#[derive(Debug, Clone, Default, Hash, PartialEq, Eq, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationParams {
    /// Zero-based page index (default: 0)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Rows per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub size: Option<i64>,
}

impl PaginationParams {
    #[must_use]
    pub fn new(page: i64, size: i64) -> Self {
        Self {
            page: Some(page),
            size: Some(size),
        }
    }

    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    #[must_use]
    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    /// Rows to skip: `page * size`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        self.page().saturating_mul(self.size())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = PaginationParams::default();
        assert_eq!(params.page(), 0);
        assert_eq!(params.size(), 10);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_second_page_of_two() {
        let params = PaginationParams::new(1, 2);
        assert_eq!(params.offset(), 2);
        assert_eq!(params.size(), 2);
    }

    #[test]
    fn test_size_boundary_cases() {
        let cases = vec![
            (Some(1), 1),
            (Some(50), 50),
            (Some(100), 100),
            (Some(101), 100),
            (Some(0), 1),
            (Some(-1), 1),
            (None, 10),
        ];

        for (input, expected) in cases {
            let params = PaginationParams {
                page: None,
                size: input,
            };
            assert_eq!(params.size(), expected, "size {:?}", input);
        }
    }

    #[test]
    fn test_negative_page_clamps_to_zero() {
        let params = PaginationParams::new(-3, 10);
        assert_eq!(params.page(), 0);
        assert_eq!(params.offset(), 0);
    }

    #[test]
    fn test_deserialize_strings_and_numbers() {
        let params: PaginationParams = serde_json::from_str(r#"{"page":"2","size":5}"#).unwrap();
        assert_eq!(params.page(), 2);
        assert_eq!(params.size(), 5);
        assert_eq!(params.offset(), 10);
    }

    #[test]
    fn test_deserialize_empty_strings() {
        let params: PaginationParams = serde_json::from_str(r#"{"page":"","size":""}"#).unwrap();
        assert_eq!(params, PaginationParams::default());
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        let result: Result<PaginationParams, _> = serde_json::from_str(r#"{"page":"two"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_meta_has_more() {
        let params = PaginationParams::new(1, 2);
        assert!(PaginationMeta::new(&params, 5).has_more);

        let params = PaginationParams::new(2, 2);
        let meta = PaginationMeta::new(&params, 5);
        assert!(!meta.has_more);
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total, 5);
    }

    #[test]
    fn test_meta_serialize() {
        let meta = PaginationMeta::new(&PaginationParams::new(0, 10), 3);
        let json = serde_json::to_string(&meta).unwrap();
        assert!(json.contains(r#""total":3"#));
        assert!(json.contains(r#""has_more":false"#));
    }
}

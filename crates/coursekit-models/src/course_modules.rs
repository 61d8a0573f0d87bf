//! Course module models. Modules form a flat ordered list per course.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{CourseId, ModuleId};
use crate::meta::validate_meta;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct CourseModule {
    pub id: ModuleId,
    pub title: String,
    pub description: Option<String>,
    pub position: i32,
    pub course_id: CourseId,
    #[schema(value_type = Object)]
    pub meta: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateModuleDto {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    pub description: Option<String>,
    /// Appended after the last module when omitted
    #[validate(range(min = 0, message = "position must be >= 0"))]
    pub position: Option<i32>,
    #[validate(custom(function = "validate_meta"))]
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateModuleDto {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_meta"))]
    #[schema(value_type = Option<Object>)]
    pub meta: Option<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_module_validation() {
        let dto: CreateModuleDto =
            serde_json::from_value(json!({"title": "Week 1", "position": 0})).unwrap();
        assert!(dto.validate().is_ok());

        let dto: CreateModuleDto =
            serde_json::from_value(json!({"title": "Week 1", "position": -1})).unwrap();
        assert!(dto.validate().is_err());

        let dto: CreateModuleDto = serde_json::from_value(json!({"title": ""})).unwrap();
        assert!(dto.validate().is_err());
    }
}

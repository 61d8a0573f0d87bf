//! The free-form `meta` JSON blob carried by courses, modules and pages.
//!
//! The blob is an object. By convention it holds a `thumbnailImage`
//! descriptor used by list views; when present that key must have the
//! [`ThumbnailImage`] shape. All other keys are stored untouched.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::ValidationError;

pub const THUMBNAIL_KEY: &str = "thumbnailImage";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ThumbnailImage {
    pub url: String,
    #[serde(default)]
    pub alt: String,
}

/// Empty object stored when a request omits `meta`.
pub fn empty_meta() -> Value {
    Value::Object(serde_json::Map::new())
}

/// Extracts the thumbnail descriptor, if any.
pub fn thumbnail(meta: &Value) -> Option<ThumbnailImage> {
    meta.get(THUMBNAIL_KEY)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

pub fn validate_meta(meta: &Value) -> Result<(), ValidationError> {
    let Some(object) = meta.as_object() else {
        return Err(ValidationError::new("meta_not_object").with_message("meta must be a JSON object".into()));
    };

    if let Some(thumbnail) = object.get(THUMBNAIL_KEY) {
        let parsed: Result<ThumbnailImage, _> = serde_json::from_value(thumbnail.clone());
        match parsed {
            Ok(image) if !image.url.trim().is_empty() => {}
            _ => {
                return Err(ValidationError::new("thumbnail_image")
                    .with_message("meta.thumbnailImage must be {url, alt} with a non-empty url".into()));
            }
        }
    }

    Ok(())
}

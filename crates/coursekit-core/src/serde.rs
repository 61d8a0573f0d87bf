use serde::{Deserialize, Deserializer};
use uuid::Uuid;

/// Reads an optional UUID where `""` and `"null"` both mean "none".
///
/// Query strings cannot carry a JSON null, so `?parent_id=` and
/// `?parent_id=null` select root pages.
pub fn deserialize_optional_uuid<'de, D>(deserializer: D) -> Result<Option<Uuid>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("null") => Ok(None),
        Some(s) => Uuid::parse_str(&s)
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

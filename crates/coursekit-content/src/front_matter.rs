//! YAML front matter split off the top of a markdown document.
//!
//! A document opens with a `---` line, holds a YAML mapping, and closes with
//! a `---` (or `...`) line. Documents without an opening fence have no front
//! matter. An opening fence without a closing one is malformed.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ContentError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,

    /// Every other key, kept as JSON so it can be returned as-is
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl FrontMatter {
    /// Splits `source` into front matter and body. `origin` names the
    /// document in error messages.
    pub fn parse<'a>(source: &'a str, origin: &str) -> Result<(Self, &'a str), ContentError> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);

        let Some((yaml, body)) = split(source).map_err(|message| ContentError::Parse {
            path: origin.to_string(),
            message,
        })?
        else {
            return Ok((Self::default(), source));
        };

        if yaml.trim().is_empty() {
            return Ok((Self::default(), body));
        }

        let value: serde_yaml::Value =
            serde_yaml::from_str(yaml).map_err(|e| ContentError::Parse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;

        if !value.is_mapping() {
            return Err(ContentError::Parse {
                path: origin.to_string(),
                message: "front matter must be a mapping".to_string(),
            });
        }

        let front_matter = serde_yaml::from_value(value).map_err(|e| ContentError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })?;

        Ok((front_matter, body))
    }
}

fn is_fence(line: &str) -> bool {
    let line = line.trim_end();
    line == "---"
}

fn is_closing_fence(line: &str) -> bool {
    is_fence(line) || line.trim_end() == "..."
}

/// Returns `(yaml, body)` when the document opens with a fence.
fn split(source: &str) -> Result<Option<(&str, &str)>, String> {
    let (first, mut rest) = match source.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (source, ""),
    };
    if !is_fence(first) {
        return Ok(None);
    }

    let yaml_start = source.len() - rest.len();
    let mut offset = yaml_start;

    loop {
        let (line, next) = match rest.split_once('\n') {
            Some((line, next)) => (line, Some(next)),
            None => (rest, None),
        };

        if is_closing_fence(line) {
            let yaml = &source[yaml_start..offset];
            let body = next.unwrap_or("");
            return Ok(Some((yaml, body)));
        }

        match next {
            Some(next) => {
                offset += line.len() + 1;
                rest = next;
            }
            None => return Err("front matter is not closed".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_front_matter() {
        let (fm, body) = FrontMatter::parse("# Title\n\nBody", "doc").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "# Title\n\nBody");
    }

    #[test]
    fn test_typed_fields_and_extra() {
        let source = "---\ntitle: FAQ\ndescription: Common questions\norder: 2\ntags:\n  - help\n---\n# Questions\n";
        let (fm, body) = FrontMatter::parse(source, "faq").unwrap();

        assert_eq!(fm.title.as_deref(), Some("FAQ"));
        assert_eq!(fm.description.as_deref(), Some("Common questions"));
        assert_eq!(fm.extra.get("order"), Some(&json!(2)));
        assert_eq!(fm.extra.get("tags"), Some(&json!(["help"])));
        assert!(!fm.extra.contains_key("title"));
        assert_eq!(body, "# Questions\n");
    }

    #[test]
    fn test_crlf_line_endings() {
        let source = "---\r\ntitle: Terms\r\n---\r\nBody";
        let (fm, body) = FrontMatter::parse(source, "tos").unwrap();
        assert_eq!(fm.title.as_deref(), Some("Terms"));
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody", "doc").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_unterminated_block_is_malformed() {
        let err = FrontMatter::parse("---\ntitle: Oops\n\nBody", "doc").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn test_invalid_yaml_is_malformed() {
        let err = FrontMatter::parse("---\ntitle: [unclosed\n---\nBody", "doc").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }

    #[test]
    fn test_non_mapping_is_malformed() {
        let err = FrontMatter::parse("---\n- a\n- b\n---\nBody", "doc").unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));
    }
}

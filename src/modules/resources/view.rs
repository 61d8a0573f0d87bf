use maud::{DOCTYPE, Markup, PreEscaped, html};

use coursekit_content::RenderedDocument;

/// `{title} | {site}`, or just the site name for untitled documents.
pub fn page_title(document: &RenderedDocument, site_name: &str) -> String {
    match document.title.as_deref() {
        Some(title) if !title.is_empty() => format!("{} | {}", title, site_name),
        _ => site_name.to_string(),
    }
}

/// Full HTML document for a resource. `content_html` is already sanitized
/// by the renderer and is embedded as is.
pub fn resource_page(document: &RenderedDocument, site_name: &str) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (page_title(document, site_name)) }
                @if let Some(description) = &document.description {
                    meta name="description" content=(description);
                }
            }
            body {
                main class="container mx-auto px-4 py-8" {
                    article class="prose max-w-none" {
                        (PreEscaped(&document.content_html))
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn document(title: Option<&str>) -> RenderedDocument {
        RenderedDocument {
            slug: "faq".to_string(),
            title: title.map(str::to_string),
            description: Some("Common questions & answers".to_string()),
            content_html: "<h1><span>FAQ</span></h1>\n".to_string(),
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_page_title() {
        assert_eq!(page_title(&document(Some("FAQ")), "Coursekit"), "FAQ | Coursekit");
        assert_eq!(page_title(&document(None), "Coursekit"), "Coursekit");
        assert_eq!(page_title(&document(Some("")), "Coursekit"), "Coursekit");
    }

    #[test]
    fn test_resource_page_embeds_content() {
        let html = resource_page(&document(Some("FAQ")), "Coursekit").into_string();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>FAQ | Coursekit</title>"));
        assert!(html.contains("<h1><span>FAQ</span></h1>"));
        assert!(html.contains(r#"content="Common questions &amp; answers""#));
    }
}

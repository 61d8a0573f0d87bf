//! Markdown rendering for course pages and resource documents.
//!
//! Rendering runs a fixed sequence of passes over the pulldown-cmark event
//! stream:
//!
//! 1. parse with the GitHub-flavored extensions
//! 2. autolink bare `http(s)://` and `www.` URLs
//! 3. link `@user`, `#123` and `owner/repo#123` references
//! 4. sanitize: drop raw HTML, unlink disallowed URL schemes
//! 5. wrap `h1` contents in a `<span>`
//! 6. mark absolute `http(s)` links `rel="nofollow" target="_blank"`
//! 7. highlight fenced code with syntect and apply the layout classes
//! 8. serialize to HTML
//!
//! The output depends only on the input text and the configured repository.

use std::sync::LazyLock;

use pulldown_cmark::{
    CodeBlockKind, CowStr, Event, HeadingLevel, LinkType, Options, Parser, Tag, TagEnd,
    TextMergeStream, html,
};
use pulldown_cmark_escape::{escape_href, escape_html};
use regex::{Captures, Regex};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

pub const PRE_CLASSES: &str = "!p-0 -mx-4 md:-mx-8 lg:-mx-12 !rounded-box";
pub const CODE_CLASSES: &str = "!px-8 !py-4 md:!px-8 lg:!px-12 hljs";

const LINK_SCHEMES: &[&str] = &["http", "https", "mailto"];
const IMAGE_SCHEMES: &[&str] = &["http", "https"];

const GITHUB: &str = "https://github.com";

/// `owner/repo#123`, `#123` or `@user`.
static REFERENCE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?:(?P<repo>[A-Za-z0-9][A-Za-z0-9-]*/[A-Za-z0-9._-]+)?#(?P<issue>[0-9]+))|@(?P<user>[A-Za-z0-9](?:[A-Za-z0-9]|-[A-Za-z0-9]){0,38})",
    )
    .unwrap()
});

/// Bare URLs as GFM autolinks them; trailing punctuation is trimmed later.
static BARE_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)[^\s<]+").unwrap());

pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    repository: Option<String>,
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        Self::with_repository(None)
    }

    /// `repository` (`owner/repo`) is the target of bare `#123` references.
    pub fn with_repository(repository: Option<String>) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            repository,
        }
    }

    pub fn render(&self, markdown: &str) -> String {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_GFM;
        let events: Vec<Event> = TextMergeStream::new(Parser::new_ext(markdown, options)).collect();

        let events = map_plain_text(events, link_bare_urls);
        let events = map_plain_text(events, |text, out| self.link_text(text, out));
        let events = sanitize(events);
        let events = wrap_top_headings(events);
        let events = mark_external_links(events);
        let events = self.highlight_code_blocks(events);

        let mut output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut output, events.into_iter());
        output
    }

    fn link_text<'a>(&self, text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
        let mut last = 0;

        for caps in REFERENCE_RE.captures_iter(&text) {
            let Some(whole) = caps.get(0) else { continue };
            if !at_word_boundary(&text, whole.start(), whole.end()) {
                continue;
            }
            let Some(url) = self.reference_url(&caps) else {
                continue;
            };

            if whole.start() > last {
                out.push(Event::Text(CowStr::from(text[last..whole.start()].to_string())));
            }
            out.push(Event::Start(Tag::Link {
                link_type: LinkType::Inline,
                dest_url: CowStr::from(url),
                title: CowStr::Borrowed(""),
                id: CowStr::Borrowed(""),
            }));
            out.push(Event::Text(CowStr::from(whole.as_str().to_string())));
            out.push(Event::End(TagEnd::Link));
            last = whole.end();
        }

        if last == 0 {
            out.push(Event::Text(text));
        } else if last < text.len() {
            out.push(Event::Text(CowStr::from(text[last..].to_string())));
        }
    }

    fn reference_url(&self, caps: &Captures<'_>) -> Option<String> {
        if let Some(user) = caps.name("user") {
            return Some(format!("{}/{}", GITHUB, user.as_str()));
        }

        let issue = caps.name("issue")?.as_str();
        let repository = caps
            .name("repo")
            .map(|m| m.as_str())
            .or(self.repository.as_deref())?;
        Some(format!("{}/{}/issues/{}", GITHUB, repository, issue))
    }

    fn highlight_code_blocks<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        let mut block: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => fence_language(&info),
                        CodeBlockKind::Indented => None,
                    };
                    block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = block.take() {
                        let html = self.code_block_html(lang.as_deref(), &code);
                        out.push(Event::Html(CowStr::from(html)));
                    }
                }
                Event::Text(text) if block.is_some() => {
                    if let Some((_, code)) = block.as_mut() {
                        code.push_str(&text);
                    }
                }
                _ if block.is_some() => {}
                other => out.push(other),
            }
        }

        out
    }

    fn code_block_html(&self, lang: Option<&str>, code: &str) -> String {
        let (class, body) = match lang {
            Some(lang) => (
                format!("{} language-{}", CODE_CLASSES, lang),
                self.highlight(lang, code).unwrap_or_else(|| escaped(code)),
            ),
            None => (CODE_CLASSES.to_string(), escaped(code)),
        };

        format!(
            "<pre class=\"{}\"><code class=\"{}\">{}</code></pre>\n",
            PRE_CLASSES, class, body
        )
    }

    /// Class-based highlighting; `None` when the language is unknown.
    fn highlight(&self, lang: &str, code: &str) -> Option<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntax_set, ClassStyle::Spaced);
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::debug!(lang, error = %e, "Highlighting failed, rendering plain");
                return None;
            }
        }
        Some(generator.finalize())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands every text event outside links, images and code blocks to `f`,
/// which pushes its replacement events.
fn map_plain_text<'a>(
    events: Vec<Event<'a>>,
    mut f: impl FnMut(CowStr<'a>, &mut Vec<Event<'a>>),
) -> Vec<Event<'a>> {
    let mut out = Vec::with_capacity(events.len());
    let mut opaque = 0usize;

    for event in events {
        match event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. } | Tag::CodeBlock(_)) => {
                opaque += 1;
                out.push(event);
            }
            Event::End(TagEnd::Link | TagEnd::Image | TagEnd::CodeBlock) => {
                opaque = opaque.saturating_sub(1);
                out.push(event);
            }
            Event::Text(text) if opaque == 0 => f(text, &mut out),
            other => out.push(other),
        }
    }

    out
}

fn link_bare_urls<'a>(text: CowStr<'a>, out: &mut Vec<Event<'a>>) {
    let mut last = 0;

    for found in BARE_URL_RE.find_iter(&text) {
        let url = trim_url_end(found.as_str());
        let www = url.get(..4).is_some_and(|p| p.eq_ignore_ascii_case("www."));
        let scheme_len = if www {
            4
        } else {
            url.find("://").map_or(url.len(), |i| i + 3)
        };
        if url.len() <= scheme_len {
            continue;
        }

        let start = found.start();
        if start > last {
            out.push(Event::Text(CowStr::from(text[last..start].to_string())));
        }
        let href = if www {
            format!("http://{}", url)
        } else {
            url.to_string()
        };
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: CowStr::from(href),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(url.to_string())));
        out.push(Event::End(TagEnd::Link));
        last = start + url.len();
    }

    if last == 0 {
        out.push(Event::Text(text));
    } else if last < text.len() {
        out.push(Event::Text(CowStr::from(text[last..].to_string())));
    }
}

/// Drops trailing punctuation and unbalanced closing parentheses.
fn trim_url_end(url: &str) -> &str {
    let mut end = url.len();
    loop {
        let candidate = &url[..end];
        match candidate.chars().next_back() {
            Some('?' | '!' | '.' | ',' | ':' | ';' | '*' | '_' | '~' | '\'' | '"') => end -= 1,
            Some(')') if candidate.matches(')').count() > candidate.matches('(').count() => {
                end -= 1
            }
            _ => return candidate,
        }
    }
}

/// References must not be glued to surrounding words (`a@b.c`, `x#1`, `#12ab`).
fn at_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();

    let clear_before = before.is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '/' | '@' | '#' | '_' | '.' | '-')));
    let clear_after = after.is_none_or(|c| !(c.is_alphanumeric() || matches!(c, '_' | '/' | '@' | '#')));
    clear_before && clear_after
}

fn sanitize(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    // One entry per open link/image: whether its tags were kept.
    let mut kept = Vec::new();

    for event in events {
        match event {
            Event::Html(_) | Event::InlineHtml(_) => {}
            Event::Start(Tag::HtmlBlock) | Event::End(TagEnd::HtmlBlock) => {}
            Event::Start(Tag::Link { ref dest_url, .. }) => {
                let allowed = url_allowed(dest_url, LINK_SCHEMES);
                kept.push(allowed);
                if allowed {
                    out.push(event);
                }
            }
            Event::Start(Tag::Image { ref dest_url, .. }) => {
                let allowed = url_allowed(dest_url, IMAGE_SCHEMES);
                kept.push(allowed);
                if allowed {
                    out.push(event);
                }
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                if kept.pop().unwrap_or(true) {
                    out.push(event);
                }
            }
            other => out.push(other),
        }
    }

    out
}

/// Relative URLs always pass; absolute ones need an allowed scheme.
fn url_allowed(url: &str, schemes: &[&str]) -> bool {
    match url_scheme(url) {
        Some(scheme) => schemes.iter().any(|s| s.eq_ignore_ascii_case(scheme)),
        None => true,
    }
}

fn url_scheme(url: &str) -> Option<&str> {
    let url = url.trim_start();
    let end = url.find([':', '/', '?', '#'])?;
    if !url[end..].starts_with(':') {
        return None;
    }
    let scheme = &url[..end];
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    // Anything before a colon that is not a scheme is still suspicious.
    Some(if valid { scheme } else { url })
}

fn wrap_top_headings(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len() + 2);

    for event in events {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => {
                out.push(event);
                out.push(Event::Html(CowStr::Borrowed("<span>")));
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                out.push(Event::Html(CowStr::Borrowed("</span>")));
                out.push(event);
            }
            other => out.push(other),
        }
    }

    out
}

fn is_external(url: &str) -> bool {
    url_scheme(url).is_some_and(|s| s.eq_ignore_ascii_case("http") || s.eq_ignore_ascii_case("https"))
}

fn mark_external_links(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let mut out = Vec::with_capacity(events.len());
    let mut external = Vec::new();

    for event in events {
        match event {
            Event::Start(Tag::Link {
                ref dest_url,
                ref title,
                ..
            }) if is_external(dest_url) => {
                let mut tag = String::from("<a href=\"");
                let _ = escape_href(&mut tag, dest_url);
                tag.push_str("\" rel=\"nofollow\" target=\"_blank\"");
                if !title.is_empty() {
                    tag.push_str(" title=\"");
                    let _ = escape_html(&mut tag, title);
                    tag.push('"');
                }
                tag.push('>');
                external.push(true);
                out.push(Event::InlineHtml(CowStr::from(tag)));
            }
            Event::Start(Tag::Link { .. }) => {
                external.push(false);
                out.push(event);
            }
            Event::End(TagEnd::Link) => {
                if external.pop().unwrap_or(false) {
                    out.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                } else {
                    out.push(event);
                }
            }
            other => out.push(other),
        }
    }

    out
}

/// First word of a fence info string, restricted to characters that are
/// safe inside a class attribute.
fn fence_language(info: &str) -> Option<String> {
    let lang = info.split_whitespace().next()?;
    let lang = lang.split(',').next().unwrap_or(lang);
    let cleaned: String = lang
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '+' | '#' | '.'))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

fn escaped(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let _ = escape_html(&mut out, s);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(markdown: &str) -> String {
        MarkdownRenderer::new().render(markdown)
    }

    #[test]
    fn test_render_is_deterministic() {
        let renderer = MarkdownRenderer::with_repository(Some("acme/gis".to_string()));
        let source = "# Intro\n\nSee #4 and @octocat.\n\n```rust\nfn main() {}\n```\n\n| a | b |\n|---|---|\n| 1 | 2 |\n";
        assert_eq!(renderer.render(source), renderer.render(source));
    }

    #[test]
    fn test_h1_is_wrapped_in_span() {
        let html = render("# Hello *World*\n\n## Sub");
        assert!(html.contains("<h1><span>Hello <em>World</em></span></h1>"), "{}", html);
        assert!(html.contains("<h2>Sub</h2>"));
    }

    #[test]
    fn test_raw_html_is_dropped() {
        let html = render("before\n\n<script>alert(1)</script>\n\ninline <script>x()</script> text");
        assert!(!html.contains("<script"), "{}", html);
        assert!(html.contains("before"));
        assert!(html.contains("inline"));
    }

    #[test]
    fn test_disallowed_schemes_are_unlinked() {
        let html = render("[click](javascript:alert(1)) ![img](data:image/png;base64,AAAA)");
        assert!(!html.contains("javascript:"), "{}", html);
        assert!(!html.contains("data:"), "{}", html);
        assert!(html.contains("click"));
    }

    #[test]
    fn test_external_links_are_marked() {
        let html = render("[site](https://example.com) and [local](/local)");
        assert!(html.contains(
            r#"<a href="https://example.com" rel="nofollow" target="_blank">site</a>"#
        ), "{}", html);
        assert!(html.contains(r#"<a href="/local">local</a>"#), "{}", html);
    }

    #[test]
    fn test_mailto_is_not_external() {
        let html = render("[mail](mailto:team@example.com)");
        assert!(html.contains(r#"<a href="mailto:team@example.com">mail</a>"#), "{}", html);
    }

    #[test]
    fn test_code_block_classes_and_highlighting() {
        let html = render("```rust\nfn main() {}\n```");
        assert!(html.contains(&format!(r#"<pre class="{}">"#, PRE_CLASSES)), "{}", html);
        assert!(html.contains(&format!(r#"<code class="{} language-rust">"#, CODE_CLASSES)));
        assert!(html.contains("<span class=\""), "{}", html);
    }

    #[test]
    fn test_unknown_language_renders_plain() {
        let html = render("```nosuchlang\n<b>&</b>\n```");
        assert!(html.contains("language-nosuchlang"));
        assert!(html.contains("&lt;b&gt;&amp;&lt;/b&gt;"), "{}", html);
        assert!(!html.contains("<span class"));
    }

    #[test]
    fn test_indented_code_has_no_language() {
        let html = render("    let x = 1;\n");
        assert!(html.contains(&format!(r#"<code class="{}">let x = 1;"#, CODE_CLASSES)), "{}", html);
    }

    #[test]
    fn test_mentions_link_to_github() {
        let html = render("Thanks @octocat!");
        assert!(html.contains(r#"<a href="https://github.com/octocat" rel="nofollow" target="_blank">@octocat</a>"#), "{}", html);
    }

    #[test]
    fn test_emails_are_not_mentions() {
        let html = render("Write to team@example.org");
        assert!(!html.contains("github.com"), "{}", html);
    }

    #[test]
    fn test_issue_references() {
        let renderer = MarkdownRenderer::with_repository(Some("acme/gis".to_string()));
        let html = renderer.render("Fixed in #12 and rust-lang/rust#99.");
        assert!(html.contains(r#"href="https://github.com/acme/gis/issues/12""#), "{}", html);
        assert!(html.contains(r#"href="https://github.com/rust-lang/rust/issues/99""#), "{}", html);

        let html = render("Fixed in #12.");
        assert!(!html.contains("<a"), "{}", html);
    }

    #[test]
    fn test_references_skip_code_and_links() {
        let html = render("`@octocat` [@octocat](/people)\n\n```\n@octocat\n```");
        assert!(!html.contains("github.com"), "{}", html);
    }

    #[test]
    fn test_gfm_extensions() {
        let html = render("~~gone~~\n\n- [x] done\n\n| a |\n|---|\n| 1 |\n\nhttps://example.com");
        assert!(html.contains("<del>gone</del>"));
        assert!(html.contains("checkbox"));
        assert!(html.contains("<table>"));
        assert!(html.contains(r#"<a href="https://example.com" rel="nofollow" target="_blank">https://example.com</a>"#), "{}", html);
    }

    #[test]
    fn test_bare_urls_are_autolinked() {
        let html = render("Visit https://example.com today");
        assert!(html.contains(
            r#"Visit <a href="https://example.com" rel="nofollow" target="_blank">https://example.com</a> today"#
        ), "{}", html);

        let html = render("Visit www.example.com today");
        assert!(html.contains(
            r#"<a href="http://www.example.com" rel="nofollow" target="_blank">www.example.com</a> today"#
        ), "{}", html);
    }

    #[test]
    fn test_autolink_trims_trailing_punctuation() {
        let html = render("See https://example.com/guide. Or (https://en.wikipedia.org/wiki/Rust_(language)).");
        assert!(html.contains(r#"href="https://example.com/guide""#), "{}", html);
        assert!(html.contains(r#"href="https://en.wikipedia.org/wiki/Rust_(language)""#), "{}", html);
        assert!(html.contains("</a>)."), "{}", html);
    }

    #[test]
    fn test_autolink_skips_code_and_existing_links() {
        let html = render("`https://example.com` [https://example.com](https://example.com) https://example.com/@octocat");
        assert_eq!(html.matches("<a ").count(), 2, "{}", html);
        assert!(html.contains("<code>https://example.com</code>"), "{}", html);
        assert!(!html.contains("github.com"), "{}", html);
    }

    #[test]
    fn test_external_href_is_percent_encoded() {
        let internal = render("[café](/caf%C3%A9)");
        assert!(internal.contains(r#"href="/caf%C3%A9""#), "{}", internal);

        let html = render("[café](https://example.com/café)");
        assert!(html.contains(r#"href="https://example.com/caf%C3%A9" rel="nofollow""#), "{}", html);

        let html = render("<https://example.com/é>");
        assert!(html.contains(r#"href="https://example.com/%C3%A9" rel="nofollow""#), "{}", html);
    }

    #[test]
    fn test_url_scheme() {
        assert_eq!(url_scheme("https://x.y"), Some("https"));
        assert_eq!(url_scheme("/a:b"), None);
        assert_eq!(url_scheme("page#a:b"), None);
        assert_eq!(url_scheme("relative"), None);
        assert!(!url_allowed("JavaScript:alert(1)", LINK_SCHEMES));
        assert!(url_allowed("HTTPS://x.y", IMAGE_SCHEMES));
    }

    #[test]
    fn test_fence_language() {
        assert_eq!(fence_language("rust ignore"), Some("rust".to_string()));
        assert_eq!(fence_language("\"><script>"), Some("script".to_string()));
        assert_eq!(fence_language(""), None);
    }
}

//! Readable-text extraction
//!
//! Two strategies share one entry point, [`extract`]:
//! - Generic: pick the most likely content container, gather its text nodes
//!   and normalize the result
//! - Templated: read the WordPress content container block by block,
//!   rendering tables, headings, paragraphs and list items as plain text

use crate::crawler::SiteTemplate;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

/// Elements whose subtrees never contribute text in generic mode
const SKIPPED_TAGS: &[&str] = &[
    "script", "style", "header", "footer", "nav", "meta", "link", "noscript", "iframe",
];

/// Generic content containers, most specific first
const GENERIC_CONTAINERS: &[&str] = &[
    "article",
    "main",
    r#"[role="main"]"#,
    "div.content",
    "div.document",
    "body",
];

/// WordPress content containers, most specific first
const TEMPLATE_CONTAINERS: &[&str] = &[
    "div.post-content",
    ".entry-content",
    "article",
    ".wp-block-post-content",
];

static DISALLOWED_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[^\w\s.,!?;:()\-–—'"\[\]{}]"#).expect("hardcoded regex pattern is valid")
});

static HORIZONTAL_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\S\n]+").expect("hardcoded regex pattern is valid"));

static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("hardcoded regex pattern is valid"));

/// Extracts readable text from a parsed page
///
/// Deterministic: the same document and template always give the same text.
/// An empty string means nothing usable was found; callers keep the page.
///
/// # Example
///
/// ```
/// use doc_scraper::crawler::{extract, SiteTemplate};
/// use scraper::Html;
///
/// let html = Html::parse_document("<body><nav>Menu</nav><main><p>Hello</p></main></body>");
/// assert_eq!(extract(&html, SiteTemplate::Generic), "Hello");
/// ```
pub fn extract(document: &Html, template: SiteTemplate) -> String {
    match template {
        SiteTemplate::Generic => extract_generic(document),
        SiteTemplate::Templated => extract_templated(document),
    }
}

fn extract_generic(document: &Html) -> String {
    let container =
        first_match(document, GENERIC_CONTAINERS).unwrap_or_else(|| document.root_element());

    let mut pieces = Vec::new();
    collect_text(container, &mut pieces);
    clean_text(&pieces.join("\n"))
}

/// Gathers trimmed text nodes in document order, skipping non-content subtrees
fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let text = text.trim();
                if !text.is_empty() {
                    out.push(text.to_string());
                }
            }
            Node::Element(el) if SKIPPED_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    collect_text(child, out);
                }
            }
            _ => {}
        }
    }
}

/// Normalizes extracted text
///
/// Characters outside the allow-list become spaces, runs of spaces and tabs
/// collapse to one, lines are trimmed and at most one blank line separates
/// paragraphs.
pub fn clean_text(text: &str) -> String {
    let text = DISALLOWED_CHARS.replace_all(text, " ");
    let text = HORIZONTAL_SPACE.replace_all(&text, " ");
    let text = text.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    BLANK_LINES.replace_all(&text, "\n\n").trim().to_string()
}

fn extract_templated(document: &Html) -> String {
    let Some(container) = first_match(document, TEMPLATE_CONTAINERS) else {
        tracing::debug!("No templated content container found");
        return String::new();
    };

    let mut blocks = Vec::new();
    render_blocks(container, &mut blocks);
    blocks.join("\n\n")
}

/// Renders block-level content in document order
///
/// Rendered elements are not descended into, so a paragraph inside a list
/// item or table cell is emitted once, as part of its block.
fn render_blocks(element: ElementRef<'_>, blocks: &mut Vec<String>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        let name = child.value().name();

        let block = match name {
            "table" => render_table(child),
            "p" => element_text(child),
            "li" => prefixed("- ", element_text(child)),
            "script" | "style" | "noscript" => continue,
            _ => match heading_level(name) {
                Some(level) => prefixed(&format!("{} ", "#".repeat(level)), element_text(child)),
                None => {
                    render_blocks(child, blocks);
                    continue;
                }
            },
        };

        if !block.is_empty() {
            blocks.push(block);
        }
    }
}

/// Renders a table as pipe-delimited rows under a dashed header separator
///
/// Rows without `td` cells (including the header row) are dropped from the
/// body. The separator is as wide as the rendered header line.
fn render_table(table: ElementRef<'_>) -> String {
    let (Ok(th), Ok(tr), Ok(td)) = (
        Selector::parse("th"),
        Selector::parse("tr"),
        Selector::parse("td"),
    ) else {
        return String::new();
    };

    let headers: Vec<String> = table.select(&th).map(element_text).collect();
    let rows: Vec<String> = table
        .select(&tr)
        .map(|row| row.select(&td).map(element_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .map(|cells| cells.join(" | "))
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 2);
    if !headers.is_empty() {
        let header = headers.join(" | ");
        let separator = "-".repeat(header.chars().count());
        lines.push(header);
        lines.push(separator);
    }
    lines.extend(rows);
    lines.join("\n")
}

/// Text of an element with whitespace runs collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn prefixed(prefix: &str, text: String) -> String {
    if text.is_empty() {
        text
    } else {
        format!("{}{}", prefix, text)
    }
}

fn heading_level(name: &str) -> Option<usize> {
    name.strip_prefix('h')
        .and_then(|level| level.parse::<usize>().ok())
        .filter(|level| (1..=6).contains(level))
}

/// First element matching any selector, trying selectors in priority order
fn first_match<'a>(document: &'a Html, selectors: &[&str]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| document.select(&selector).next())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generic(html: &str) -> String {
        extract(&Html::parse_document(html), SiteTemplate::Generic)
    }

    fn templated(html: &str) -> String {
        extract(&Html::parse_document(html), SiteTemplate::Templated)
    }

    #[test]
    fn test_generic_skips_chrome() {
        let html = r#"
            <html><head><title>T</title><script>var x = 1;</script></head>
            <body>
                <header>Site header</header>
                <nav>Home | About</nav>
                <main><h1>Guide</h1><p>Install the tool.</p></main>
                <footer>Copyright</footer>
            </body></html>
        "#;
        assert_eq!(generic(html), "Guide\nInstall the tool.");
    }

    #[test]
    fn test_generic_prefers_article_over_main() {
        let html = r#"<body><main><p>Outer</p><article><p>Inner</p></article></main></body>"#;
        assert_eq!(generic(html), "Inner");
    }

    #[test]
    fn test_generic_falls_back_to_body() {
        let html = r#"<body><div><p>First</p><p>Second</p></div><script>ignored()</script></body>"#;
        assert_eq!(generic(html), "First\nSecond");
    }

    #[test]
    fn test_generic_skips_nested_chrome_inside_container() {
        let html = r#"<body><article><nav>Prev Next</nav><p>Body text</p><iframe>frame</iframe></article></body>"#;
        assert_eq!(generic(html), "Body text");
    }

    #[test]
    fn test_clean_text_collapses_whitespace() {
        assert_eq!(clean_text("a   b\t\tc"), "a b c");
        assert_eq!(clean_text("  a\n\n\n\n b  "), "a\n\nb");
    }

    #[test]
    fn test_clean_text_strips_disallowed_chars() {
        assert_eq!(clean_text("price: 5€ & more"), "price: 5 more");
        assert_eq!(clean_text("keep (this), [that] {too}!"), "keep (this), [that] {too}!");
        assert_eq!(clean_text("em—dash – en"), "em—dash – en");
    }

    #[test]
    fn test_clean_text_keeps_unicode_words() {
        assert_eq!(clean_text("Grüße 你好"), "Grüße 你好");
    }

    #[test]
    fn test_templated_table() {
        let html = r#"
            <div class="post-content">
                <table>
                    <tr><th>Name</th><th>Value</th></tr>
                    <tr><td>foo</td><td>bar</td></tr>
                </table>
            </div>
        "#;
        assert_eq!(templated(html), "Name | Value\n------------\nfoo | bar");
    }

    #[test]
    fn test_templated_table_drops_empty_rows() {
        let html = r#"
            <div class="entry-content"><table>
                <thead><tr><th>A</th></tr></thead>
                <tbody><tr></tr><tr><td>1</td></tr><tr><td>2</td></tr></tbody>
            </table></div>
        "#;
        assert_eq!(templated(html), "A\n-\n1\n2");
    }

    #[test]
    fn test_templated_table_without_headers() {
        let html = r#"<article><table><tr><td>x</td><td>y</td></tr></table></article>"#;
        assert_eq!(templated(html), "x | y");
    }

    #[test]
    fn test_templated_blocks_in_document_order() {
        let html = r#"
            <div class="post-content">
                <h2>Setup</h2>
                <p>Run the   installer.</p>
                <ul><li>Step one</li><li>Step <b>two</b></li><li>  </li></ul>
                <h3>Notes</h3>
                <p></p>
            </div>
        "#;
        assert_eq!(
            templated(html),
            "## Setup\n\nRun the installer.\n\n- Step one\n\n- Step two\n\n### Notes"
        );
    }

    #[test]
    fn test_templated_does_not_duplicate_nested_paragraphs() {
        let html = r#"<div class="post-content"><ul><li><p>Only once</p></li></ul></div>"#;
        assert_eq!(templated(html), "- Only once");
    }

    #[test]
    fn test_templated_container_priority() {
        let html = r#"
            <article><p>Article text</p>
                <div class="post-content"><p>Post text</p></div>
            </article>
        "#;
        assert_eq!(templated(html), "Post text");
    }

    #[test]
    fn test_templated_without_container_is_empty() {
        let html = r#"<body><div><p>Loose text</p></div></body>"#;
        assert_eq!(templated(html), "");
    }

    #[test]
    fn test_extract_is_idempotent() {
        let html = Html::parse_document(
            r#"<body><article><h1>T</h1><p>One</p><table><tr><th>H</th></tr><tr><td>d</td></tr></table></article></body>"#,
        );

        for template in [SiteTemplate::Generic, SiteTemplate::Templated] {
            assert_eq!(extract(&html, template), extract(&html, template));
        }
    }

    #[test]
    fn test_heading_level() {
        assert_eq!(heading_level("h1"), Some(1));
        assert_eq!(heading_level("h6"), Some(6));
        assert_eq!(heading_level("h7"), None);
        assert_eq!(heading_level("hr"), None);
        assert_eq!(heading_level("header"), None);
    }
}

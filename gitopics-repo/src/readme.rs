//! README content parsing
//!
//! Turns a rendered README page into a flat text stream. Headers and list
//! items become sentence-like units, code samples are dropped, and the
//! plain-text README layout is handled as a fallback.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// Parse the rendered README page into cleaned text.
///
/// Structured READMEs carry a `div#readme` container with an `article`
/// child; plain-text READMEs are rendered inside a `div[itemprop="text"]`
/// wrapper instead. Returns the empty string when neither yields text.
pub fn parse_readme_page(html: &str) -> String {
    let document = Html::parse_document(html);

    let readme_selector = Selector::parse("div#readme").unwrap();
    if let Some(readme) = document.select(&readme_selector).next() {
        let article_selector = Selector::parse("article").unwrap();
        return match readme.select(&article_selector).next() {
            Some(article) => parse_article(article),
            None => String::new(),
        };
    }

    // readme.txt layout without markdown structure
    let text_selector = Selector::parse("div[itemprop=\"text\"]").unwrap();
    if let Some(text_node) = document.select(&text_selector).next() {
        return element_text(&text_node).trim().to_string();
    }

    debug!("No README container found in page");
    String::new()
}

/// Walk the direct children of the README article in document order.
fn parse_article(article: ElementRef<'_>) -> String {
    let mut tokens: Vec<String> = Vec::new();

    for child in article.children() {
        // Stray whitespace/text siblings between elements carry no structure
        let Some(element) = ElementRef::wrap(child) else {
            continue;
        };

        let tag = element.value().name();

        if tag == "pre" {
            // Code samples contribute no text
            continue;
        }

        if is_header(tag) {
            tokens.push(format!("{}.", element_text(&element)));
        } else if tag == "ul" || tag == "ol" {
            for item in element.children() {
                let Some(list_item) = ElementRef::wrap(item) else {
                    continue;
                };
                tokens.push(format!("{}.", element_text(&list_item)));
            }
        } else {
            tokens.push(element_text(&element));
        }
    }

    tokens.join(" ").trim().to_string()
}

fn is_header(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// Full text content of an element, concatenated across descendants
fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(article_body: &str) -> String {
        format!(
            "<html><body><div id=\"readme\"><article>{}</article></div></body></html>",
            article_body
        )
    }

    #[test]
    fn pre_blocks_contribute_nothing() {
        let html = page("<pre>cargo install gitopics</pre>");
        assert_eq!(parse_readme_page(&html), "");
    }

    #[test]
    fn headers_and_list_items_become_sentences() {
        let html = page(
            "<h2>Usage</h2><ul>\n<li>Install it</li>\n<li>Run it</li>\n</ul>",
        );
        assert_eq!(parse_readme_page(&html), "Usage. Install it. Run it.");
    }

    #[test]
    fn paragraphs_pass_through_verbatim() {
        let html = page("<h1>Tool</h1><p>Does things</p><pre>skip me</pre>");
        assert_eq!(parse_readme_page(&html), "Tool. Does things");
    }

    #[test]
    fn stray_text_nodes_are_skipped() {
        let html = page("\n  <h1>Tool</h1>\n  <p>Body</p>\n");
        assert_eq!(parse_readme_page(&html), "Tool. Body");
    }

    #[test]
    fn nested_markup_text_is_flattened() {
        let html = page("<h2>The <code>run</code> command</h2>");
        assert_eq!(parse_readme_page(&html), "The run command.");
    }

    #[test]
    fn plain_text_layout_is_used_when_no_article_exists() {
        let html = "<html><body><div itemprop=\"text\">\n  Just a readme.txt file\n</div></body></html>";
        assert_eq!(parse_readme_page(html), "Just a readme.txt file");
    }

    #[test]
    fn readme_container_without_article_is_empty() {
        let html = "<html><body><div id=\"readme\"><p>loose</p></div></body></html>";
        assert_eq!(parse_readme_page(html), "");
    }

    #[test]
    fn missing_containers_yield_empty_text() {
        assert_eq!(parse_readme_page("<html><body></body></html>"), "");
    }
}

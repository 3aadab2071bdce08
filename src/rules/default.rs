//! Generic fallback conversion for elements no rule claims.
//!
//! Mechanical Markdown for the common document vocabulary: headings,
//! emphasis, lists, paragraphs, links. Unknown elements pass their children
//! through unchanged.

use scraper::ElementRef;

pub(super) fn render(el: ElementRef<'_>, children: &str) -> String {
    match el.value().name() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = el.value().name()[1..].parse::<usize>().unwrap_or(1);
            let text = children.trim();
            if text.is_empty() {
                String::new()
            } else {
                format!("\n\n{} {}\n\n", "#".repeat(level), text)
            }
        }
        "p" => {
            let text = children.trim();
            if text.is_empty() {
                String::new()
            } else {
                format!("\n\n{}\n\n", text)
            }
        }
        "strong" | "b" => wrap_inline(children, "**"),
        "em" | "i" => wrap_inline(children, "*"),
        "code" => {
            let text = children.trim();
            if text.is_empty() {
                String::new()
            } else {
                format!("`{}`", text)
            }
        }
        "a" => match el.value().attr("href") {
            Some(href) if !href.is_empty() => {
                format!("[{}]({})", children.trim(), href)
            }
            _ => children.to_string(),
        },
        "ul" | "ol" => format!("\n\n{}\n", children.trim_start_matches('\n')),
        "li" => {
            let marker = list_marker(el);
            let text = children.trim();
            format!("{}{}\n", marker, text)
        }
        "blockquote" => {
            let quoted: String = children
                .trim()
                .lines()
                .map(|l| {
                    if l.trim().is_empty() {
                        ">".to_string()
                    } else {
                        format!("> {}", l.trim())
                    }
                })
                .collect::<Vec<_>>()
                .join("\n");
            if quoted.is_empty() {
                String::new()
            } else {
                format!("\n\n{}\n\n", quoted)
            }
        }
        "br" => "\n".to_string(),
        "hr" => "\n\n---\n\n".to_string(),
        // Structural wrappers and anything unrecognized: pass children through
        _ => children.to_string(),
    }
}

fn wrap_inline(children: &str, delimiter: &str) -> String {
    let text = children.trim();
    if text.is_empty() {
        String::new()
    } else {
        format!("{}{}{}", delimiter, text, delimiter)
    }
}

/// `- ` for unordered items, `n. ` for items of an ordered list, numbered
/// by element-sibling position.
fn list_marker(el: ElementRef<'_>) -> String {
    let parent = el.parent().and_then(ElementRef::wrap);
    if parent.is_some_and(|p| p.value().name() == "ol") {
        let position = el
            .prev_siblings()
            .filter_map(ElementRef::wrap)
            .filter(|s| s.value().name() == "li")
            .count()
            + 1;
        format!("{}. ", position)
    } else {
        "- ".to_string()
    }
}

#[cfg(test)]
mod tests {
    use crate::rules::{RenderState, RuleEngine};

    fn render(html: &str) -> String {
        RuleEngine::new().render_document(html, &mut RenderState::default())
    }

    #[test]
    fn test_headings() {
        let md = render("<h1>Top</h1><h3>Deep</h3>");
        assert!(md.contains("# Top"));
        assert!(md.contains("### Deep"));
    }

    #[test]
    fn test_emphasis() {
        let md = render("<p><strong>bold</strong> and <em>italic</em></p>");
        assert!(md.contains("**bold**"));
        assert!(md.contains("*italic*"));
    }

    #[test]
    fn test_inline_code() {
        let md = render("<p>run <code>cargo test</code> now</p>");
        assert!(md.contains("`cargo test`"));
    }

    #[test]
    fn test_unordered_list() {
        let md = render("<ul><li>one</li><li>two</li></ul>");
        assert!(md.contains("- one\n"));
        assert!(md.contains("- two\n"));
    }

    #[test]
    fn test_ordered_list_numbering() {
        let md = render("<ol><li>first</li><li>second</li><li>third</li></ol>");
        assert!(md.contains("1. first\n"));
        assert!(md.contains("2. second\n"));
        assert!(md.contains("3. third\n"));
    }

    #[test]
    fn test_blockquote() {
        let md = render("<blockquote><p>wise words</p></blockquote>");
        assert!(md.contains("> wise words"));
    }

    #[test]
    fn test_horizontal_rule() {
        let md = render("<p>a</p><hr><p>b</p>");
        assert!(md.contains("\n---\n"));
    }

    #[test]
    fn test_unknown_element_passthrough() {
        let md = render("<custom-widget><p>inside</p></custom-widget>");
        assert!(md.contains("inside"));
        assert!(!md.contains("custom-widget"));
    }
}

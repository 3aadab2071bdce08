//! Rule-based HTML-to-Markdown transformation engine.
//!
//! Nodes render bottom-up: children first, then the first registered rule
//! whose predicate matches the node. Rule order is part of the contract —
//! two rules matching the same node must never both fire — so the rules
//! live in one fixed slice and dispatch is a linear first-match scan.

mod default;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};

use crate::heuristics::{is_code_like, is_prose_like};
use crate::model::{PendingImage, Table};

/// URL scheme used by packaged-document internal links.
const INTERNAL_SCHEME: &str = "epub:";

static INTERNAL_FRAGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#cb\d+-\d+$").unwrap());
static LANGUAGE_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"language-(\w+)").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("body").unwrap());
static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").unwrap());
static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").unwrap());

/// How the engine renders image elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageMode {
    /// Render directly as `![alt](source)`
    #[default]
    Inline,

    /// Record a [`PendingImage`] and emit a unique placeholder token for
    /// later out-of-band resolution
    Deferred,
}

/// Mutable per-document rendering state.
///
/// Pending images accumulate in document order across every unit rendered
/// with the same state; the placeholder embeds the accumulation index, which
/// keeps it unique within one document.
#[derive(Debug, Default)]
pub struct RenderState {
    /// Image references deferred for out-of-band resolution
    pub pending_images: Vec<PendingImage>,
}

/// A named node-classification rule: a predicate plus a renderer over the
/// node's already-rendered children.
pub struct Rule {
    /// Stable rule name, for auditing and tests
    pub name: &'static str,

    /// Whether this rule applies to the element
    pub matches: fn(ElementRef<'_>) -> bool,

    /// Produce Markdown for the element
    pub render: fn(&RuleEngine, ElementRef<'_>, &str, &mut RenderState) -> String,
}

/// The registered rules, in precedence order. First match wins; unmatched
/// elements fall through to the generic default renderer.
pub static RULES: &[Rule] = &[
    Rule {
        name: "code-in-pre",
        matches: is_code_in_pre,
        render: render_code_in_pre,
    },
    Rule {
        name: "anchor-in-code",
        matches: is_anchor_in_code,
        render: render_children_only,
    },
    Rule {
        name: "internal-link",
        matches: is_internal_link,
        render: render_internal_link,
    },
    Rule {
        name: "smart-pre",
        matches: |el| el.value().name() == "pre",
        render: render_smart_pre,
    },
    Rule {
        name: "table",
        matches: |el| el.value().name() == "table",
        render: render_table,
    },
    Rule {
        name: "image",
        matches: |el| el.value().name() == "img",
        render: render_image,
    },
    Rule {
        name: "noise",
        matches: |el| matches!(el.value().name(), "script" | "style" | "noscript"),
        render: |_, _, _, _| String::new(),
    },
];

/// Rule-based HTML-to-Markdown renderer.
#[derive(Debug, Default)]
pub struct RuleEngine {
    image_mode: ImageMode,
}

impl RuleEngine {
    /// Create an engine that renders images inline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with the given image mode.
    pub fn with_image_mode(image_mode: ImageMode) -> Self {
        Self { image_mode }
    }

    /// Render a full HTML document to Markdown.
    ///
    /// Renders the `<body>` subtree when one exists so head-only content
    /// (title, meta) stays out of the output; otherwise renders from the
    /// root.
    pub fn render_document(&self, html: &str, state: &mut RenderState) -> String {
        let doc = Html::parse_document(html);
        let root = doc
            .select(&BODY_SELECTOR)
            .next()
            .unwrap_or_else(|| doc.root_element());
        self.render_children(root, state)
    }

    /// Name of the first rule matching the element, if any.
    ///
    /// Exposes dispatch so precedence can be tested in isolation.
    pub fn rule_for(el: ElementRef<'_>) -> Option<&'static str> {
        RULES.iter().find(|r| (r.matches)(el)).map(|r| r.name)
    }

    fn render_children(&self, el: ElementRef<'_>, state: &mut RenderState) -> String {
        let mut out = String::new();
        for child in el.children() {
            match child.value() {
                Node::Text(text) => {
                    out.push_str(&WHITESPACE_RUN.replace_all(text, " "));
                }
                Node::Element(_) => {
                    // children() yields the node we just matched as an element
                    if let Some(child_el) = ElementRef::wrap(child) {
                        out.push_str(&self.render_element(child_el, state));
                    }
                }
                _ => {}
            }
        }
        out
    }

    fn render_element(&self, el: ElementRef<'_>, state: &mut RenderState) -> String {
        let children = self.render_children(el, state);
        match RULES.iter().find(|r| (r.matches)(el)) {
            Some(rule) => (rule.render)(self, el, &children, state),
            None => default::render(el, &children),
        }
    }
}

fn text_content(el: ElementRef<'_>) -> String {
    el.text().collect()
}

fn language_of(el: ElementRef<'_>) -> String {
    let class = el.value().attr("class").unwrap_or("");
    LANGUAGE_CLASS
        .captures(class)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn fenced_block(lang: &str, content: &str) -> String {
    let mut body = content.to_string();
    if !body.is_empty() && !body.ends_with('\n') {
        body.push('\n');
    }
    format!("\n\n```{}\n{}```\n\n", lang, body)
}

fn is_code_in_pre(el: ElementRef<'_>) -> bool {
    el.value().name() == "code"
        && el
            .parent()
            .and_then(ElementRef::wrap)
            .is_some_and(|p| p.value().name() == "pre")
}

fn render_code_in_pre(
    _engine: &RuleEngine,
    el: ElementRef<'_>,
    _children: &str,
    _state: &mut RenderState,
) -> String {
    fenced_block(&language_of(el), &text_content(el))
}

fn has_code_ancestor(el: ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| matches!(a.value().name(), "pre" | "code"))
}

fn is_anchor_in_code(el: ElementRef<'_>) -> bool {
    el.value().name() == "a" && has_code_ancestor(el)
}

fn render_children_only(
    _engine: &RuleEngine,
    _el: ElementRef<'_>,
    children: &str,
    _state: &mut RenderState,
) -> String {
    children.to_string()
}

fn is_internal_link(el: ElementRef<'_>) -> bool {
    if el.value().name() != "a" {
        return false;
    }
    let href = el.value().attr("href").unwrap_or("");
    href.starts_with(INTERNAL_SCHEME) || INTERNAL_FRAGMENT.is_match(href)
}

fn render_internal_link(
    _engine: &RuleEngine,
    _el: ElementRef<'_>,
    children: &str,
    _state: &mut RenderState,
) -> String {
    if children.trim().is_empty() {
        String::new()
    } else {
        children.to_string()
    }
}

fn render_smart_pre(
    _engine: &RuleEngine,
    el: ElementRef<'_>,
    children: &str,
    _state: &mut RenderState,
) -> String {
    // A code child already rendered itself as a fence (with its own
    // language class); the pre must not re-classify that content.
    let has_code_child = el
        .children()
        .filter_map(ElementRef::wrap)
        .any(|c| c.value().name() == "code");
    if has_code_child {
        return children.to_string();
    }

    let content = text_content(el);

    // Prose-looking blocks escape the fence unless they still score as code.
    if is_prose_like(&content) && !is_code_like(&content) {
        return format!("\n\n{}\n\n", content);
    }
    fenced_block(&language_of(el), &content)
}

fn render_table(
    _engine: &RuleEngine,
    el: ElementRef<'_>,
    _children: &str,
    _state: &mut RenderState,
) -> String {
    let mut rows = Vec::new();
    for row in el.select(&ROW_SELECTOR) {
        let cells: Vec<String> = row
            .select(&CELL_SELECTOR)
            .map(|cell| text_content(cell).trim().to_string())
            .collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }

    let table = Table::new(rows);
    if table.is_empty() {
        return String::new();
    }
    format!("\n\n{}\n", table.to_markdown())
}

fn render_image(
    engine: &RuleEngine,
    el: ElementRef<'_>,
    _children: &str,
    state: &mut RenderState,
) -> String {
    let src = el.value().attr("src").unwrap_or("").to_string();
    let alt = el.value().attr("alt").unwrap_or("").to_string();

    match engine.image_mode {
        ImageMode::Inline => format!("![{}]({})", alt, src),
        ImageMode::Deferred => {
            let placeholder = format!("[[TEMP_IMG_{}]]", state.pending_images.len());
            state.pending_images.push(PendingImage {
                placeholder: placeholder.clone(),
                source: src,
                alt,
            });
            placeholder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(html: &str) -> String {
        let engine = RuleEngine::new();
        let mut state = RenderState::default();
        engine.render_document(html, &mut state)
    }

    fn first_rule(html: &str, selector: &str) -> Option<&'static str> {
        let doc = Html::parse_document(html);
        let sel = Selector::parse(selector).unwrap();
        let el = doc.select(&sel).next().unwrap();
        RuleEngine::rule_for(el)
    }

    #[test]
    fn test_rule_precedence_code_in_pre() {
        let html = "<pre><code>let x = 1;</code></pre>";
        assert_eq!(first_rule(html, "code"), Some("code-in-pre"));
        assert_eq!(first_rule(html, "pre"), Some("smart-pre"));
    }

    #[test]
    fn test_rule_precedence_anchor() {
        let html = r##"<pre><a href="#cb1-2">x</a></pre><a href="#cb1-2">y</a>"##;
        assert_eq!(first_rule(html, "pre a"), Some("anchor-in-code"));
        // Outside code context the internal-link rule fires instead.
        let doc = Html::parse_document(html);
        let sel = Selector::parse("a").unwrap();
        let outer = doc.select(&sel).nth(1).unwrap();
        assert_eq!(RuleEngine::rule_for(outer), Some("internal-link"));
    }

    #[test]
    fn test_single_rule_fires_per_node() {
        let html = "<pre><code class=\"language-rust\">fn main() {}</code></pre>";
        let doc = Html::parse_document(html);
        let sel = Selector::parse("code").unwrap();
        let el = doc.select(&sel).next().unwrap();
        let matching: Vec<_> = RULES.iter().filter(|r| (r.matches)(el)).collect();
        assert_eq!(matching.len(), 1);
    }

    #[test]
    fn test_code_in_pre_always_fenced() {
        // Prose-like content inside an explicit code element stays fenced.
        let prose = "これは日本語の説明文です。コードではありません。";
        let html = format!("<pre><code>{}</code></pre>", prose);
        let md = render(&html);
        assert!(md.contains("```"));
        assert!(md.contains(prose));
    }

    #[test]
    fn test_code_language_tag() {
        let html = "<pre><code class=\"language-rust\">fn main() {}</code></pre>";
        let md = render(html);
        assert!(md.contains("```rust\nfn main() {}\n```"));
    }

    #[test]
    fn test_pre_passes_through_code_child_fence() {
        // The code child renders its own fence; the enclosing pre must keep
        // it as-is instead of re-reading content and class from itself.
        let html = "<pre><code class=\"language-python\">印刷(\"こんにちは\")</code></pre>";
        let md = render(html);
        assert!(md.contains("```python\n印刷(\"こんにちは\")\n```"));
    }

    #[test]
    fn test_smart_pre_code_fenced() {
        let html = "<pre>const x = () => a && b;</pre>";
        let md = render(html);
        assert!(md.contains("```\nconst x = () => a && b;\n```"));
    }

    #[test]
    fn test_smart_pre_prose_unfenced() {
        let prose = "長い日本語の文章がそのまま整形済みブロックに入っている場合はコードではない。";
        let html = format!("<pre>{}</pre>", prose);
        let md = render(&html);
        assert!(!md.contains("```"));
        assert!(md.contains(prose));
    }

    #[test]
    fn test_table_rectangularized() {
        let html = "<table><tr><th>Name</th><th>Value</th></tr><tr><td>alpha</td></tr></table>";
        let md = render(html);
        assert!(md.contains("| Name | Value |"));
        assert!(md.contains("| --- | --- |"));
        assert!(md.contains("| alpha |  |"));
    }

    #[test]
    fn test_empty_table_renders_empty() {
        assert_eq!(render("<table></table>").trim(), "");
    }

    #[test]
    fn test_image_inline() {
        let md = render("<p><img src=\"cover.png\" alt=\"Cover\"></p>");
        assert!(md.contains("![Cover](cover.png)"));
    }

    #[test]
    fn test_image_deferred_placeholders_unique() {
        let engine = RuleEngine::with_image_mode(ImageMode::Deferred);
        let mut state = RenderState::default();
        let md = engine.render_document(
            "<p><img src=\"a.png\" alt=\"A\"><img src=\"b.png\"></p>",
            &mut state,
        );
        assert!(md.contains("[[TEMP_IMG_0]]"));
        assert!(md.contains("[[TEMP_IMG_1]]"));
        assert_eq!(state.pending_images.len(), 2);
        assert_eq!(state.pending_images[0].source, "a.png");
        assert_eq!(state.pending_images[0].alt, "A");
        assert_eq!(state.pending_images[1].placeholder, "[[TEMP_IMG_1]]");
    }

    #[test]
    fn test_internal_link_unwrapped() {
        let md = render("<p><a href=\"epub:EPUB/ch2.html\">next chapter</a></p>");
        assert!(md.contains("next chapter"));
        assert!(!md.contains("]("));

        let md = render("<p><a href=\"#cb3-7\">  </a></p>");
        assert!(!md.contains("cb3-7"));
    }

    #[test]
    fn test_external_link_kept() {
        let md = render("<p><a href=\"https://example.com\">site</a></p>");
        assert!(md.contains("[site](https://example.com)"));
    }

    #[test]
    fn test_noise_elements_dropped() {
        let md = render("<p>keep</p><script>alert(1)</script><style>p{}</style><noscript>no</noscript>");
        assert!(md.contains("keep"));
        assert!(!md.contains("alert"));
        assert!(!md.contains("p{}"));
        assert!(!md.contains("no</noscript>"));
        assert!(!md.contains("no\n"));
    }

    #[test]
    fn test_head_content_excluded() {
        let html = "<html><head><title>Doc Title</title></head><body><p>Body text</p></body></html>";
        let md = render(html);
        assert!(md.contains("Body text"));
        assert!(!md.contains("Doc Title"));
    }
}

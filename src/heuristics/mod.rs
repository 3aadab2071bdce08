//! Content-classification primitives shared by both rendering paths.
//!
//! Everything here is a pure function of its input so that classification
//! stays deterministic and testable in isolation.

use fancy_regex::Regex as FancyRegex;
use once_cell::sync::Lazy;
use regex::Regex;

static KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(function|const|let|var|class|import|export|return)\b").unwrap());
static STRUCTURAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[{}\[\]();]").unwrap());
static OPERATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"=>|===|!==|&&|\|\|").unwrap());
static OPEN_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static CLOSE_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"</[^>]+>").unwrap());

/// Score how code-like a text sample is.
///
/// Keyword occurrences score +3, structural punctuation +1, operator-like
/// tokens +2, balanced tag-like substrings +2.
pub fn code_likeness_score(text: &str) -> u32 {
    let mut score = 0;
    if KEYWORDS.is_match(text) {
        score += 3;
    }
    if STRUCTURAL.is_match(text) {
        score += 1;
    }
    if OPERATORS.is_match(text) {
        score += 2;
    }
    if OPEN_TAG.is_match(text) && CLOSE_TAG.is_match(text) {
        score += 2;
    }
    score
}

/// Whether a text sample should be treated as code.
pub fn is_code_like(text: &str) -> bool {
    code_likeness_score(text) >= 4
}

static CJK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "[\u{3000}-\u{303f}\u{3040}-\u{309f}\u{30a0}-\u{30ff}\
         \u{ff00}-\u{ff9f}\u{4e00}-\u{9faf}\u{3400}-\u{4dbf}]",
    )
    .unwrap()
});

/// Whether a block reads as prose rather than code.
///
/// True if the text contains CJK characters, or is longer than 100
/// characters with more than two sentence-terminal punctuation marks.
pub fn is_prose_like(text: &str) -> bool {
    if CJK.is_match(text) {
        return true;
    }
    if text.chars().count() > 100 {
        let terminators = text
            .chars()
            .filter(|c| matches!(c, '.' | '。' | '!' | '！' | '?' | '？'))
            .count();
        return terminators > 2;
    }
    false
}

/// Post-render Markdown cleanup pass.
///
/// Removes marker artifacts the rule engine can leave behind and bounds
/// consecutive blank lines. Applying the pass twice yields the same result
/// as applying it once.
pub struct MarkdownCleaner {
    empty_links: Regex,
    asterisk_line: Regex,
    orphan_asterisk: FancyRegex,
    open_marker_line: Regex,
    close_marker_line: Regex,
    package_link_remnant: Regex,
    excess_blank_lines: Regex,
}

impl MarkdownCleaner {
    /// Build the cleaner with its compiled patterns.
    pub fn new() -> Self {
        Self {
            empty_links: Regex::new(r"\[\s*\]\([^)]*\)").unwrap(),
            asterisk_line: Regex::new(r"(?m)^\s*\*\s*$").unwrap(),
            // A bare asterisk line start not followed by another list item;
            // the lookahead needs fancy-regex.
            orphan_asterisk: FancyRegex::new(r"(?m)^\*\s*\n(?!\*)").unwrap(),
            open_marker_line: Regex::new(r"(?m)^\[\s*\*\s*$").unwrap(),
            close_marker_line: Regex::new(r"(?m)^\s*\*\s*\]$").unwrap(),
            package_link_remnant: Regex::new(r"\(epub:EPUB/[^)]+\)").unwrap(),
            excess_blank_lines: Regex::new(r"\n{3,}").unwrap(),
        }
    }

    /// Run the cleanup pass once.
    ///
    /// The blank-line collapse runs last so that lines emptied by the
    /// marker removals cannot reintroduce runs of blank lines, keeping the
    /// pass idempotent.
    pub fn clean(&self, content: &str) -> String {
        let result = self.empty_links.replace_all(content, "");
        let result = self.asterisk_line.replace_all(&result, "");
        let result = self
            .orphan_asterisk
            .replace_all(&result, "")
            .into_owned();
        let result = self.open_marker_line.replace_all(&result, "");
        let result = self.close_marker_line.replace_all(&result, "");
        let result = self.package_link_remnant.replace_all(&result, "");
        self.excess_blank_lines.replace_all(&result, "\n\n").into_owned()
    }
}

impl Default for MarkdownCleaner {
    fn default() -> Self {
        Self::new()
    }
}

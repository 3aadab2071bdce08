//! Layout reconstruction for paginated documents.
//!
//! Turns a flat, unordered set of positioned text fragments into classified
//! lines and renders them as a Markdown block. Correct only for
//! single-column, top-to-bottom layouts.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::{Line, Page, TextFragment};

/// Vertical tolerance for grouping fragments into one line, in document
/// units.
const LINE_TOLERANCE: i64 = 2;

/// Horizontal distance per indentation level, in document units.
const INDENT_UNIT: f32 = 10.0;

/// Group fragments into lines by vertical position.
///
/// A fragment joins the first previously-registered line whose
/// representative y differs from the fragment's rounded y by less than the
/// tolerance; otherwise it starts a new line keyed by its own rounded y.
/// The first-match scan (not nearest-match) is deliberate: under rounding
/// drift a fragment joins whichever qualifying line was registered first,
/// which is the grouping downstream consumers rely on.
pub fn group_into_lines(fragments: &[TextFragment]) -> Vec<Line> {
    let mut groups: Vec<(i64, Vec<TextFragment>)> = Vec::new();

    for fragment in fragments {
        if fragment.text.trim().is_empty() {
            continue;
        }

        let y = fragment.y.round() as i64;
        let slot = groups
            .iter()
            .position(|(existing_y, _)| (existing_y - y).abs() < LINE_TOLERANCE);

        match slot {
            Some(i) => groups[i].1.push(fragment.clone()),
            None => groups.push((y, vec![fragment.clone()])),
        }
    }

    // Top of page first
    groups.sort_by(|a, b| b.0.cmp(&a.0));

    groups
        .into_iter()
        .map(|(y, mut frags)| {
            frags.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
            let text = frags
                .iter()
                .map(|f| f.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
                .trim()
                .to_string();
            Line {
                fragments: frags,
                y,
                text,
                indent_level: 0,
                heading_level: 0,
                is_bullet: false,
                is_numbered: false,
            }
        })
        .collect()
}

/// Compute each line's indentation level relative to the page's leftmost
/// line.
pub fn detect_indentation(lines: &mut [Line]) {
    let min_x = lines
        .iter()
        .map(Line::start_x)
        .filter(|x| *x > 0.0)
        .fold(f32::INFINITY, f32::min);
    let min_x = if min_x.is_finite() { min_x } else { 0.0 };

    for line in lines.iter_mut() {
        let level = ((line.start_x() - min_x) / INDENT_UNIT).round() as i32;
        line.indent_level = level.max(0);
    }
}

/// Classify heading levels from average fragment height, boldness, and
/// casing.
///
/// The decision table is an ordered if/else chain; the first matching row
/// wins.
pub fn detect_headings(lines: &mut [Line]) {
    for line in lines.iter_mut() {
        let avg = line.avg_height();
        let bold = line.has_bold();

        line.heading_level = if avg > 20.0 || (avg > 16.0 && bold) {
            1
        } else if avg > 16.0 || (avg > 14.0 && bold) {
            2
        } else if avg > 14.0 || (avg > 12.0 && bold) {
            3
        } else if line.is_all_caps() && line.text.chars().count() < 50 {
            3
        } else {
            0
        };
    }
}

static BULLET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^[•·▪▫◦‣⁃]\s*").unwrap(),
        Regex::new(r"^[-–—]\s+").unwrap(),
        Regex::new(r"^\*\s+").unwrap(),
    ]
});

static NUMBERED_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"^\d+[.)]\s*").unwrap(),
        Regex::new(r"(?i)^[a-z][.)]\s*").unwrap(),
        Regex::new(r"^[ivxIVX]+[.)]\s*").unwrap(),
    ]
});

static BULLET_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[•·▪▫◦‣⁃\-–—*]\s*").unwrap());

/// Flag bullet and numbered lead-ins.
///
/// The two flags are computed independently and may both be true for one
/// line.
pub fn detect_lists(lines: &mut [Line]) {
    for line in lines.iter_mut() {
        line.is_bullet = BULLET_PATTERNS.iter().any(|p| p.is_match(&line.text));
        line.is_numbered = NUMBERED_PATTERNS.iter().any(|p| p.is_match(&line.text));
    }
}

/// Run the full classification pipeline over one page's fragments.
pub fn reconstruct_page(number: u32, fragments: &[TextFragment]) -> Page {
    let mut lines = group_into_lines(fragments);
    detect_indentation(&mut lines);
    detect_headings(&mut lines);
    detect_lists(&mut lines);
    Page::new(number, lines)
}

/// Render a page's classified lines as one Markdown block.
///
/// Per-line priority: heading, then bullet (leading marker replaced by
/// `- `), then numbered (text kept verbatim so the source numbering is
/// preserved), then plain text.
pub fn render_page(page: &Page) -> String {
    let mut content = String::new();

    for line in &page.lines {
        if line.heading_level > 0 {
            content.push_str(&"#".repeat(line.heading_level as usize));
            content.push(' ');
            content.push_str(&line.text);
            content.push_str("\n\n");
        } else if line.is_bullet {
            content.push_str("- ");
            content.push_str(&BULLET_MARKER.replace(&line.text, ""));
            content.push('\n');
        } else if line.is_numbered {
            content.push_str(&line.text);
            content.push('\n');
        } else if !line.text.is_empty() {
            content.push_str(&line.text);
            content.push('\n');
        }
    }

    content.trim().to_string()
}

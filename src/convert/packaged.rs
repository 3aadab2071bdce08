//! Conversion driver for packaged (spine-based) documents.

use super::ConversionReport;
use crate::error::Result;
use crate::heuristics::MarkdownCleaner;
use crate::model::{PackageMetadata, PendingImage};
use crate::rules::{ImageMode, RenderState, RuleEngine};

/// External container-reading collaborator for packaged documents.
///
/// Exposes the spine (ordered section identifiers) and the markup text of
/// each section.
pub trait SectionSource {
    /// Package-level metadata.
    fn metadata(&self) -> PackageMetadata;

    /// Spine section identifiers, in reading order.
    fn section_ids(&self) -> Vec<String>;

    /// Markup text for one section.
    fn section_html(&self, id: &str) -> Result<String>;
}

/// Result of a packaged-document conversion.
#[derive(Debug, Clone)]
pub struct PackagedConversion {
    /// The assembled Markdown text
    pub markdown: String,

    /// Deferred image references, in placeholder order, left for the caller
    /// to resolve out of band
    pub pending_images: Vec<PendingImage>,

    /// Side-channel summary for external validation
    pub report: ConversionReport,
}

/// Convert a packaged document to Markdown.
///
/// Sections are processed in spine order with per-section error isolation: a
/// section that fails to read or render is logged and skipped, and the
/// remaining sections still convert. Chapter numbers follow spine position,
/// so a skipped section still consumes its number. Images render as deferred
/// placeholders accumulated across the whole document.
pub fn convert_packaged(source: &dyn SectionSource) -> Result<PackagedConversion> {
    let engine = RuleEngine::with_image_mode(ImageMode::Deferred);
    let mut state = RenderState::default();
    let cleaner = MarkdownCleaner::new();

    let section_ids = source.section_ids();
    let section_count = section_ids.len();
    let mut chapters = Vec::new();

    for (index, id) in section_ids.iter().enumerate() {
        let html = match source.section_html(id) {
            Ok(html) => html,
            Err(err) => {
                log::warn!("skipping section {}: {}", id, err);
                continue;
            }
        };
        let rendered = engine.render_document(&html, &mut state);
        let body = rendered.trim();
        if body.is_empty() {
            continue;
        }
        chapters.push(format!("\n\n## Chapter {}\n\n{}", index + 1, body));
    }

    let mut output = String::new();
    let metadata = source.metadata();
    if metadata.has_content() {
        output.push_str(&metadata.to_markdown());
    }
    output.push_str(&chapters.join("\n\n"));

    let markdown = cleaner.clean(&output).trim().to_string();
    let report = ConversionReport::packaged(markdown.chars().count(), section_count);
    Ok(PackagedConversion {
        markdown,
        pending_images: state.pending_images,
        report,
    })
}

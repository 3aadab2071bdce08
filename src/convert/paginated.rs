//! Conversion driver for paginated documents.

use super::{ConversionReport, PAGE_SEPARATOR};
use crate::error::Result;
use crate::layout;
use crate::model::{outline_to_markdown, OutlineItem, PageDocMetadata, TextFragment};

/// External text-extraction collaborator for paginated documents.
///
/// Produces positioned text fragments one page at a time, in page order.
pub trait PageSource {
    /// Total number of pages.
    fn page_count(&self) -> usize;

    /// Fragments for one page (0-indexed).
    fn fragments(&self, page_index: usize) -> Result<Vec<TextFragment>>;

    /// Document metadata, if the extractor provides any.
    fn metadata(&self) -> PageDocMetadata {
        PageDocMetadata::default()
    }

    /// Document outline (bookmarks), if the extractor provides one.
    fn outline(&self) -> Vec<OutlineItem> {
        Vec::new()
    }
}

/// Result of a paginated-document conversion.
#[derive(Debug, Clone)]
pub struct PaginatedConversion {
    /// The assembled Markdown text
    pub markdown: String,

    /// Side-channel summary for external validation
    pub report: ConversionReport,
}

/// Convert a paginated document to Markdown.
///
/// Pages are processed strictly in order. There is no per-page isolation: a
/// failure while extracting any single page aborts the whole conversion.
/// Empty pages are dropped; the rest join with a horizontal-rule separator,
/// optionally preceded by metadata and outline blocks.
pub fn convert_paginated(source: &dyn PageSource) -> Result<PaginatedConversion> {
    let page_count = source.page_count();
    let mut pages = Vec::new();

    for index in 0..page_count {
        let fragments = source.fragments(index)?;
        let page = layout::reconstruct_page((index + 1) as u32, &fragments);
        let content = layout::render_page(&page);
        if !content.is_empty() {
            pages.push(content);
        }
    }

    let mut output = String::new();

    let metadata = source.metadata();
    if metadata.has_content() {
        output.push_str(&metadata.to_markdown());
        output.push_str("\n\n");
    }

    let outline = source.outline();
    if !outline.is_empty() {
        output.push_str(&outline_to_markdown(&outline));
        output.push_str("\n\n");
    }

    output.push_str(&pages.join(PAGE_SEPARATOR));

    let report = ConversionReport::paginated(output.chars().count(), page_count);
    Ok(PaginatedConversion {
        markdown: output,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    struct StaticSource {
        pages: Vec<Vec<TextFragment>>,
        fail_at: Option<usize>,
        metadata: PageDocMetadata,
        outline: Vec<OutlineItem>,
    }

    impl StaticSource {
        fn new(pages: Vec<Vec<TextFragment>>) -> Self {
            Self {
                pages,
                fail_at: None,
                metadata: PageDocMetadata::default(),
                outline: Vec::new(),
            }
        }
    }

    impl PageSource for StaticSource {
        fn page_count(&self) -> usize {
            self.pages.len()
        }

        fn fragments(&self, page_index: usize) -> Result<Vec<TextFragment>> {
            if self.fail_at == Some(page_index) {
                return Err(Error::UnitExtraction {
                    unit: format!("page {}", page_index + 1),
                    reason: "corrupt content stream".into(),
                });
            }
            Ok(self.pages[page_index].clone())
        }

        fn metadata(&self) -> PageDocMetadata {
            self.metadata.clone()
        }

        fn outline(&self) -> Vec<OutlineItem> {
            self.outline.clone()
        }
    }

    fn frag(text: &str, x: f32, y: f32) -> TextFragment {
        TextFragment::new(text, x, y, 10.0)
    }

    #[test]
    fn test_pages_joined_with_separator() {
        let source = StaticSource::new(vec![
            vec![frag("first page", 10.0, 700.0)],
            vec![frag("second page", 10.0, 700.0)],
        ]);
        let result = convert_paginated(&source).unwrap();
        assert_eq!(result.markdown, "first page\n\n---\n\nsecond page");
        assert_eq!(result.report.page_count, Some(2));
    }

    #[test]
    fn test_empty_pages_dropped() {
        let source = StaticSource::new(vec![
            vec![frag("content", 10.0, 700.0)],
            vec![],
            vec![frag("more", 10.0, 700.0)],
        ]);
        let result = convert_paginated(&source).unwrap();
        assert_eq!(result.markdown, "content\n\n---\n\nmore");
        // The report still counts every source page
        assert_eq!(result.report.page_count, Some(3));
    }

    #[test]
    fn test_page_failure_aborts_conversion() {
        let mut source = StaticSource::new(vec![
            vec![frag("ok", 10.0, 700.0)],
            vec![frag("never reached", 10.0, 700.0)],
        ]);
        source.fail_at = Some(1);
        let result = convert_paginated(&source);
        assert!(result.is_err());
    }

    #[test]
    fn test_metadata_and_outline_prefixed() {
        let mut source = StaticSource::new(vec![vec![frag("body", 10.0, 700.0)]]);
        source.metadata.title = Some("Report".into());
        source.outline.push(OutlineItem::new("Intro"));

        let result = convert_paginated(&source).unwrap();
        let md = &result.markdown;
        assert!(md.starts_with("## Document Metadata\n\n**Title:** Report"));
        assert!(md.contains("## Table of Contents\n\n- Intro"));
        let meta_pos = md.find("## Document Metadata").unwrap();
        let toc_pos = md.find("## Table of Contents").unwrap();
        let body_pos = md.find("body").unwrap();
        assert!(meta_pos < toc_pos && toc_pos < body_pos);
    }

    #[test]
    fn test_report_counts_characters() {
        let source = StaticSource::new(vec![vec![frag("abcde", 10.0, 700.0)]]);
        let result = convert_paginated(&source).unwrap();
        assert_eq!(result.report.character_count, 5);
    }
}

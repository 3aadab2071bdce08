//! Conversion drivers for the three document paths.
//!
//! Each driver obtains content units (pages or sections) from an external
//! collaborator, runs every unit through the matching rendering component
//! strictly in source order, and assembles the final Markdown in memory.
//! Nothing is written to disk here; callers persist the output only after a
//! conversion has fully succeeded.

mod fetched;
mod packaged;
mod paginated;

pub use fetched::{convert_fetched, FetchedConversion};
pub use packaged::{convert_packaged, PackagedConversion, SectionSource};
pub use paginated::{convert_paginated, PageSource, PaginatedConversion};

use serde::Serialize;

/// Separator between rendered pages of a paginated document.
pub const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Auxiliary summary reported after a successful conversion.
///
/// A side channel for external validation — never part of the Markdown
/// output itself.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    /// Character count of the produced Markdown (Unicode scalars)
    pub character_count: usize,

    /// Page count, for paginated documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_count: Option<usize>,

    /// Spine section count, for packaged documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_count: Option<usize>,

    /// Extracted title, for fetched pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Source URL, for fetched pages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ConversionReport {
    pub(crate) fn paginated(character_count: usize, page_count: usize) -> Self {
        Self {
            character_count,
            page_count: Some(page_count),
            section_count: None,
            title: None,
            url: None,
        }
    }

    pub(crate) fn packaged(character_count: usize, section_count: usize) -> Self {
        Self {
            character_count,
            page_count: None,
            section_count: Some(section_count),
            title: None,
            url: None,
        }
    }

    pub(crate) fn fetched(character_count: usize, title: Option<String>, url: String) -> Self {
        Self {
            character_count,
            page_count: None,
            section_count: None,
            title,
            url: Some(url),
        }
    }

    /// The unit count relevant for the length validation check, if this
    /// conversion kind has one.
    pub fn unit_count(&self) -> Option<usize> {
        self.page_count.or(self.section_count)
    }
}

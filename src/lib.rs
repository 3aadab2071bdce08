//! # docmark
//!
//! Document-to-Markdown conversion library.
//!
//! Three conversion paths share one toolkit:
//!
//! - **Paginated** documents: positioned text fragments are reconstructed
//!   into lines, indentation, headings, and lists, then rendered page by
//!   page.
//! - **Packaged** documents: spine sections of markup are rendered through
//!   an ordered rule engine with per-section error isolation.
//! - **Fetched** pages: a best-effort extracted article (or the whole
//!   document as a fallback) is rendered through the same rule engine.
//!
//! Extraction collaborators are traits (`PageSource`, `SectionSource`), so
//! the conversion logic is testable without any real document container.
//!
//! ## Quick Start
//!
//! ```
//! use docmark::convert::{convert_paginated, PageSource};
//! use docmark::model::TextFragment;
//!
//! struct OnePage;
//!
//! impl PageSource for OnePage {
//!     fn page_count(&self) -> usize {
//!         1
//!     }
//!
//!     fn fragments(&self, _page: usize) -> docmark::Result<Vec<TextFragment>> {
//!         Ok(vec![TextFragment::new("Hello", 10.0, 700.0, 12.0)])
//!     }
//! }
//!
//! let result = convert_paginated(&OnePage).unwrap();
//! assert_eq!(result.markdown, "Hello");
//! ```

pub mod convert;
pub mod error;
pub mod heuristics;
pub mod layout;
pub mod model;
pub mod rules;
pub mod validate;

// Re-export commonly used types
pub use convert::{
    convert_fetched, convert_packaged, convert_paginated, ConversionReport, FetchedConversion,
    PackagedConversion, PageSource, PaginatedConversion, SectionSource,
};
pub use error::{Error, Result};
pub use heuristics::MarkdownCleaner;
pub use model::{
    Article, FetchedPage, OutlineItem, PackageMetadata, PageDocMetadata, PendingImage,
    TextFragment,
};
pub use rules::{ImageMode, RenderState, RuleEngine};
pub use validate::{validate, DocumentKind, ValidationReport, ValidationStatus};

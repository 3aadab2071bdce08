//! Metadata and section-level types for the packaged and fetched paths.

use serde::{Deserialize, Serialize};

/// Metadata of a packaged document, as reported by the container reader.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageMetadata {
    /// Document title
    pub title: Option<String>,

    /// Primary author
    pub author: Option<String>,

    /// Publisher
    pub publisher: Option<String>,

    /// Language code
    pub language: Option<String>,
}

impl PackageMetadata {
    /// Whether any field is present.
    pub fn has_content(&self) -> bool {
        self.title.is_some()
            || self.author.is_some()
            || self.publisher.is_some()
            || self.language.is_some()
    }

    /// Render the metadata block that precedes packaged-document content.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("## Metadata\n\n");
        if let Some(ref title) = self.title {
            out.push_str(&format!("**Title:** {}\n", title));
        }
        if let Some(ref author) = self.author {
            out.push_str(&format!("**Author:** {}\n", author));
        }
        if let Some(ref publisher) = self.publisher {
            out.push_str(&format!("**Publisher:** {}\n", publisher));
        }
        if let Some(ref language) = self.language {
            out.push_str(&format!("**Language:** {}\n", language));
        }
        out
    }
}

/// Metadata of a paginated document.
///
/// Values stay exactly as the extractor reported them; dates in particular
/// are opaque strings, not parsed timestamps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageDocMetadata {
    /// Document title
    pub title: Option<String>,
    /// Document author
    pub author: Option<String>,
    /// Document subject
    pub subject: Option<String>,
    /// Keywords
    pub keywords: Option<String>,
    /// Creator application
    pub creator: Option<String>,
    /// Producer application
    pub producer: Option<String>,
    /// Creation date string
    pub created: Option<String>,
    /// Last modification date string
    pub modified: Option<String>,
}

impl PageDocMetadata {
    /// Whether any field is present.
    pub fn has_content(&self) -> bool {
        [
            &self.title,
            &self.author,
            &self.subject,
            &self.keywords,
            &self.creator,
            &self.producer,
            &self.created,
            &self.modified,
        ]
        .iter()
        .any(|f| f.is_some())
    }

    /// Render the metadata block that precedes paginated-document content.
    pub fn to_markdown(&self) -> String {
        let mut out = String::from("## Document Metadata\n\n");
        let fields = [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
            ("Created", &self.created),
            ("Modified", &self.modified),
        ];
        for (label, value) in fields {
            if let Some(v) = value {
                out.push_str(&format!("**{}:** {}\n", label, v));
            }
        }
        out.trim_end().to_string()
    }
}

/// One entry of a paginated document's outline (bookmarks).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineItem {
    /// Item title
    pub title: String,

    /// Nested child items
    #[serde(default)]
    pub children: Vec<OutlineItem>,
}

impl OutlineItem {
    /// Create a leaf outline item.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }
}

/// Render an outline as a `## Table of Contents` block with nested list
/// items indented two spaces per level.
pub(crate) fn outline_to_markdown(items: &[OutlineItem]) -> String {
    fn format_item(item: &OutlineItem, level: usize, out: &mut String) {
        out.push_str(&"  ".repeat(level));
        out.push_str("- ");
        if item.title.is_empty() {
            out.push_str("Untitled");
        } else {
            out.push_str(&item.title);
        }
        out.push('\n');
        for child in &item.children {
            format_item(child, level + 1, out);
        }
    }

    let mut out = String::from("## Table of Contents\n\n");
    for item in items {
        format_item(item, 0, &mut out);
    }
    out.trim_end().to_string()
}

/// An image reference deferred for out-of-band resolution.
///
/// The placeholder token is unique within one document because it embeds the
/// accumulation index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingImage {
    /// Placeholder token substituted into the Markdown output
    pub placeholder: String,

    /// Source reference from the original markup
    pub source: String,

    /// Alternative text
    pub alt: String,
}

/// Best-effort extracted article for a fetched page.
#[derive(Debug, Clone)]
pub struct Article {
    /// Extracted main-content HTML
    pub content_html: String,

    /// Extracted title, if any
    pub title: Option<String>,
}

/// A fetched web page together with the extraction collaborator's result.
///
/// `article == None` is the explicit failure signal meaning "apply the
/// whole-document fallback".
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Source URL
    pub url: String,

    /// Raw HTML text
    pub html: String,

    /// Best-effort extracted article, if extraction succeeded
    pub article: Option<Article>,
}

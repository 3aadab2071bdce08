//! Data model types shared across the conversion paths.

mod fragment;
mod section;
mod table;

pub use fragment::{Line, Page, TextFragment};
pub use section::{Article, FetchedPage, OutlineItem, PageDocMetadata, PackageMetadata, PendingImage};
pub(crate) use section::outline_to_markdown;
pub use table::Table;

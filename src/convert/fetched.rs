//! Conversion driver for fetched web pages.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use super::ConversionReport;
use crate::error::Result;
use crate::heuristics::MarkdownCleaner;
use crate::model::FetchedPage;
use crate::rules::{RenderState, RuleEngine};

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());

/// Result of a fetched-page conversion.
#[derive(Debug, Clone)]
pub struct FetchedConversion {
    /// The assembled Markdown text
    pub markdown: String,

    /// Side-channel summary for external validation
    pub report: ConversionReport,
}

/// Convert a fetched page to Markdown.
///
/// When the extraction collaborator produced an article, only its main
/// content is rendered. Otherwise the whole document body is the fallback,
/// with the title taken from the `<title>` element. Images render inline.
pub fn convert_fetched(page: &FetchedPage) -> Result<FetchedConversion> {
    let engine = RuleEngine::new();
    let mut state = RenderState::default();
    let cleaner = MarkdownCleaner::new();

    let (html, title) = match &page.article {
        Some(article) => (article.content_html.as_str(), article.title.clone()),
        None => (page.html.as_str(), document_title(&page.html)),
    };

    let body = engine.render_document(html, &mut state);

    let mut output = String::new();
    if let Some(ref title) = title {
        if !title.trim().is_empty() {
            output.push_str(&format!("# {}\n\n", title.trim()));
        }
    }
    output.push_str(&body);

    let markdown = cleaner.clean(&output).trim().to_string();
    let report = ConversionReport::fetched(markdown.chars().count(), title, page.url.clone());
    Ok(FetchedConversion { markdown, report })
}

fn document_title(html: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let title = doc
        .select(&TITLE)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())?;
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

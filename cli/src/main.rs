//! docmark CLI - document-to-Markdown conversion tool

mod fetch;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use serde::Deserialize;

use docmark::{
    convert_fetched, convert_packaged, convert_paginated, validate, ConversionReport, DocumentKind,
    Error, OutlineItem, PackageMetadata, PageDocMetadata, PageSource, SectionSource, TextFragment,
    ValidationStatus,
};

#[derive(Parser)]
#[command(name = "docmark")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Convert paginated, packaged, and fetched documents to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert extracted page fragments (JSON) to Markdown
    Pages {
        /// Input JSON file with pages of positioned text fragments
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert packaged-document sections (JSON) to Markdown
    Sections {
        /// Input JSON file with spine sections of markup
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Fetch a web page and convert it to Markdown
    Url {
        /// Page URL (http or https)
        #[arg(value_name = "URL")]
        url: String,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check converted output length against the per-unit expectation
    Validate {
        /// Markdown file to check
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Source document kind
        #[arg(long, value_enum)]
        kind: KindArg,

        /// Number of source units (pages or sections)
        #[arg(long)]
        units: usize,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum KindArg {
    /// Page-based document (500 characters expected per page)
    Paginated,
    /// Spine-based document (1000 characters expected per section)
    Packaged,
}

impl From<KindArg> for DocumentKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Paginated => DocumentKind::Paginated,
            KindArg::Packaged => DocumentKind::Packaged,
        }
    }
}

/// Paginated-document input: pages of positioned text fragments, with
/// optional metadata and outline, as produced by an external extractor.
#[derive(Deserialize)]
struct PaginatedInput {
    #[serde(default)]
    metadata: PageDocMetadata,

    #[serde(default)]
    outline: Vec<OutlineItem>,

    pages: Vec<Vec<TextFragment>>,
}

impl PageSource for PaginatedInput {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn fragments(&self, page_index: usize) -> docmark::Result<Vec<TextFragment>> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or_else(|| Error::UnitExtraction {
                unit: format!("page {}", page_index + 1),
                reason: "missing from input".into(),
            })
    }

    fn metadata(&self) -> PageDocMetadata {
        self.metadata.clone()
    }

    fn outline(&self) -> Vec<OutlineItem> {
        self.outline.clone()
    }
}

/// Packaged-document input: metadata plus spine sections of markup, as
/// produced by an external container reader.
#[derive(Deserialize)]
struct PackagedInput {
    #[serde(default)]
    metadata: PackageMetadata,

    sections: Vec<SectionEntry>,
}

#[derive(Deserialize)]
struct SectionEntry {
    id: String,
    html: String,
}

impl SectionSource for PackagedInput {
    fn metadata(&self) -> PackageMetadata {
        self.metadata.clone()
    }

    fn section_ids(&self) -> Vec<String> {
        self.sections.iter().map(|s| s.id.clone()).collect()
    }

    fn section_html(&self, id: &str) -> docmark::Result<String> {
        self.sections
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.html.clone())
            .ok_or_else(|| Error::UnitExtraction {
                unit: id.to_string(),
                reason: "missing from input".into(),
            })
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Pages { input, output } => cmd_pages(&input, output.as_deref()),
        Commands::Sections { input, output } => cmd_sections(&input, output.as_deref()),
        Commands::Url { url, output } => cmd_url(&url, output.as_deref()),
        Commands::Validate { input, kind, units } => cmd_validate(&input, kind, units),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_pages(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let source: PaginatedInput = read_json(input)?;
    let result = convert_paginated(&source)?;

    write_output(&result.markdown, output)?;
    print_report(&result.report)?;
    advisory_check(DocumentKind::Paginated, &result.report);
    Ok(())
}

fn cmd_sections(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let source: PackagedInput = read_json(input)?;
    let result = convert_packaged(&source)?;

    write_output(&result.markdown, output)?;
    print_report(&result.report)?;
    if !result.pending_images.is_empty() {
        eprintln!(
            "{} {} image reference(s) left as placeholders:",
            "Note:".yellow(),
            result.pending_images.len()
        );
        eprintln!("{}", serde_json::to_string_pretty(&result.pending_images)?);
    }
    advisory_check(DocumentKind::Packaged, &result.report);
    Ok(())
}

fn cmd_url(url: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let page = fetch::fetch_page(url)?;
    let result = convert_fetched(&page)?;

    write_output(&result.markdown, output)?;
    print_report(&result.report)?;
    Ok(())
}

fn cmd_validate(input: &Path, kind: KindArg, units: usize) -> Result<(), Box<dyn std::error::Error>> {
    let markdown = fs::read_to_string(input)?;
    let report = validate(kind.into(), markdown.chars().count(), units);

    println!("{}", serde_json::to_string_pretty(&report)?);
    match report.status {
        ValidationStatus::Ok => eprintln!("{} {}", "OK:".green().bold(), report.message),
        ValidationStatus::Warning => {
            eprintln!("{} {}", "Warning:".yellow().bold(), report.message)
        }
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let value = serde_json::from_str(&text)
        .map_err(|e| Error::Parse(format!("{}: {}", path.display(), e)))?;
    Ok(value)
}

/// Persist (or print) the Markdown. Called only after a conversion has fully
/// succeeded, so a failed run never leaves partial output behind.
fn write_output(markdown: &str, output: Option<&Path>) -> std::io::Result<()> {
    match output {
        Some(path) => {
            fs::write(path, markdown)?;
            eprintln!("{} {}", "Saved to".green(), path.display());
        }
        None => println!("{}", markdown),
    }
    Ok(())
}

fn print_report(report: &ConversionReport) -> serde_json::Result<()> {
    eprintln!("{}", serde_json::to_string(report)?);
    Ok(())
}

fn advisory_check(kind: DocumentKind, report: &ConversionReport) {
    let Some(units) = report.unit_count() else {
        return;
    };
    let validation = validate(kind, report.character_count, units);
    if validation.status == ValidationStatus::Warning {
        eprintln!("{} {}", "Warning:".yellow().bold(), validation.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_paginated_input_roundtrip() {
        let json = r#"{
            "metadata": {"title": "Sample"},
            "pages": [
                [{"text": "Hello", "x": 10.0, "y": 700.0, "height": 12.0}]
            ]
        }"#;
        let input: PaginatedInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.page_count(), 1);
        assert_eq!(input.metadata().title.as_deref(), Some("Sample"));
        let frags = input.fragments(0).unwrap();
        assert_eq!(frags[0].text, "Hello");
    }

    #[test]
    fn test_packaged_input_lookup() {
        let json = r#"{
            "sections": [
                {"id": "ch1", "html": "<p>one</p>"},
                {"id": "ch2", "html": "<p>two</p>"}
            ]
        }"#;
        let input: PackagedInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.section_ids(), vec!["ch1", "ch2"]);
        assert_eq!(input.section_html("ch2").unwrap(), "<p>two</p>");
        assert!(input.section_html("missing").is_err());
    }

    #[test]
    fn test_cmd_pages_end_to_end() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"pages": [[{{"text": "Body text", "x": 10.0, "y": 700.0, "height": 10.0}}]]}}"#
        )
        .unwrap();

        let out = NamedTempFile::new().unwrap();
        cmd_pages(file.path(), Some(out.path())).unwrap();
        let markdown = fs::read_to_string(out.path()).unwrap();
        assert_eq!(markdown, "Body text");
    }

    #[test]
    fn test_cmd_pages_rejects_malformed_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(cmd_pages(file.path(), None).is_err());
    }
}

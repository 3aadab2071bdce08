//! Advisory output-length validation.
//!
//! A heuristic sanity check on conversion output: documents with many pages
//! or sections are expected to produce a proportional amount of text. A
//! shortfall yields a warning, never a failure.

use serde::Serialize;

/// Expected Markdown characters per page of a paginated document.
const PAGINATED_MIN_PER_UNIT: usize = 500;

/// Expected Markdown characters per section of a packaged document.
const PACKAGED_MIN_PER_UNIT: usize = 1000;

/// The kind of source document, which sets the per-unit expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Paginated,
    Packaged,
}

impl DocumentKind {
    fn min_per_unit(self) -> usize {
        match self {
            DocumentKind::Paginated => PAGINATED_MIN_PER_UNIT,
            DocumentKind::Packaged => PACKAGED_MIN_PER_UNIT,
        }
    }
}

/// Outcome of the length check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Ok,
    Warning,
}

/// Advisory validation result.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// `ok` or `warning`
    pub status: ValidationStatus,

    /// Character count of the converted Markdown
    pub character_count: usize,

    /// Minimum the unit count would lead one to expect
    pub expected_minimum: usize,

    /// Human-readable summary
    pub message: String,
}

/// Check converted output length against the per-unit expectation.
pub fn validate(kind: DocumentKind, character_count: usize, unit_count: usize) -> ValidationReport {
    let expected_minimum = unit_count * kind.min_per_unit();
    if character_count >= expected_minimum {
        ValidationReport {
            status: ValidationStatus::Ok,
            character_count,
            expected_minimum,
            message: format!(
                "{} characters from {} units meets the expected minimum of {}",
                character_count, unit_count, expected_minimum
            ),
        }
    } else {
        ValidationReport {
            status: ValidationStatus::Warning,
            character_count,
            expected_minimum,
            message: format!(
                "{} characters from {} units is below the expected minimum of {}; \
                 the source may be image-heavy or extraction may have lost content",
                character_count, unit_count, expected_minimum
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paginated_meets_minimum() {
        let report = validate(DocumentKind::Paginated, 1600, 3);
        assert_eq!(report.status, ValidationStatus::Ok);
        assert_eq!(report.expected_minimum, 1500);
    }

    #[test]
    fn test_paginated_below_minimum() {
        let report = validate(DocumentKind::Paginated, 1400, 3);
        assert_eq!(report.status, ValidationStatus::Warning);
        assert_eq!(report.expected_minimum, 1500);
    }

    #[test]
    fn test_packaged_scale() {
        assert_eq!(
            validate(DocumentKind::Packaged, 5000, 5).status,
            ValidationStatus::Ok
        );
        assert_eq!(
            validate(DocumentKind::Packaged, 4999, 5).status,
            ValidationStatus::Warning
        );
    }

    #[test]
    fn test_zero_units_always_ok() {
        let report = validate(DocumentKind::Paginated, 0, 0);
        assert_eq!(report.status, ValidationStatus::Ok);
    }

    #[test]
    fn test_report_serialization() {
        let report = validate(DocumentKind::Paginated, 100, 1);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"status\":\"warning\""));
        assert!(json.contains("\"expected_minimum\":500"));
    }
}

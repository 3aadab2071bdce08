//! Flattened table representation.

use serde::{Deserialize, Serialize};

/// An extracted table: ordered rows of cell strings.
///
/// Rows are not necessarily the same width at extraction time; rendering
/// pads every row to the widest one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    /// Rows in source order
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Create a table from rows.
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.len()).max().unwrap_or(0)
    }

    /// Render as a pipe-delimited Markdown table.
    ///
    /// The first row becomes the header, followed by a separator row of
    /// `---` cells; every row is padded with empty cells up to the widest
    /// row's width. A zero-row table renders as empty text.
    pub fn to_markdown(&self) -> String {
        if self.rows.is_empty() {
            return String::new();
        }

        let max_cols = self.column_count();
        let mut out = String::new();

        for (i, row) in self.rows.iter().enumerate() {
            out.push('|');
            for col in 0..max_cols {
                let cell = row.get(col).map(String::as_str).unwrap_or("");
                out.push(' ');
                out.push_str(cell);
                out.push_str(" |");
            }
            out.push('\n');

            if i == 0 {
                out.push('|');
                for _ in 0..max_cols {
                    out.push_str(" --- |");
                }
                out.push('\n');
            }
        }

        out
    }
}

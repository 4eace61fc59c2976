//! CSV import of incomes.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Header
//! names are case-sensitive.
//!
//! | Column            | Required | Type    | Notes                                   |
//! |-------------------|----------|---------|-----------------------------------------|
//! | `category`        | yes      | integer | Income category number, `1`–`8`         |
//! | `description`     | yes      | string  |                                         |
//! | `amount`          | yes      | decimal | Gross amount in baht, e.g. `400000.00`  |
//! | `withholding_tax` | no       | decimal | Leave empty or omit for `0`             |
//!
//! ### Example
//!
//! ```csv
//! category,description,amount,withholding_tax
//! 1,Salary,600000,18000
//! 2,Consulting,400000.50,
//! 5,Condo rental,120000,3600
//! ```
//!
//! Rows are only parsed here; amounts and descriptions are validated when
//! each row is added to a plan.

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use taxplan_core::{IncomeCategory, IncomeDraft};

// ---------------------------------------------------------------------------
// Serde-compatible row that mirrors the CSV layout exactly
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CsvRow {
    category: u8,
    description: String,
    amount: Decimal,
    #[serde(default)]
    withholding_tax: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// Bad structure, missing required column or type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `category` outside 1–8. `row` is 1-based, not counting the header.
    #[error("unknown income category {code} on row {row}")]
    InvalidCategory { code: u8, row: usize },

    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<IncomeDraft, CsvLoadError> {
    let category =
        IncomeCategory::try_from(row.category).map_err(|_| CsvLoadError::InvalidCategory {
            code: row.category,
            row: row_number,
        })?;

    Ok(IncomeDraft {
        category,
        description: row.description,
        amount: row.amount,
        withholding_tax: row.withholding_tax.unwrap_or(Decimal::ZERO),
    })
}

/// Parses CSV text into income drafts, in file order.
pub fn load_from_str(input: &str) -> Result<Vec<IncomeDraft>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row = result?;
            convert_row(row, idx + 1)
        })
        .collect()
}

/// Reads `path` and delegates to [`load_from_str`].
pub fn load_from_file(path: &Path) -> Result<Vec<IncomeDraft>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

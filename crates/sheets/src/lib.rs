//! # `askdoc-sheets`: Spreadsheet Extraction Plugin
//!
//! This crate provides text extraction for `.xlsx` uploads as a
//! self-contained plugin for the `askdoc` ecosystem. It implements the
//! `Extractor` trait from the core `askdoc` library.
//!
//! The workbook is rendered as a flat textual dump: sheets in workbook
//! order, one line per row, cells converted to strings and joined by
//! single spaces. No column-type inference beyond string conversion.

use askdoc::extract::{ExtractError, Extractor};
use async_trait::async_trait;
use calamine::{Reader, Xlsx};
use std::io::Cursor;
use thiserror::Error;
use tracing::debug;

/// Custom error types for the spreadsheet extraction process.
#[derive(Error, Debug)]
pub enum SheetExtractError {
    #[error("Failed to parse workbook: {0}")]
    WorkbookParse(String),
}

impl From<SheetExtractError> for ExtractError {
    fn from(err: SheetExtractError) -> Self {
        match err {
            SheetExtractError::WorkbookParse(s) => ExtractError::Parse(s),
        }
    }
}

/// Dumps every sheet of the workbook to text.
fn extract_text_from_workbook(data: &[u8]) -> Result<String, SheetExtractError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(data))
        .map_err(|e| SheetExtractError::WorkbookParse(e.to_string()))?;

    let sheet_names = workbook.sheet_names().to_owned();
    let mut full_text = String::new();
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| SheetExtractError::WorkbookParse(e.to_string()))?;
        for row in range.rows() {
            let line = row
                .iter()
                .map(|cell| cell.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            full_text.push_str(&line);
            full_text.push('\n');
        }
    }
    debug!(sheets = sheet_names.len(), "Extracted workbook text");
    Ok(full_text)
}

/// The `Extractor` implementation for spreadsheet uploads.
pub struct SheetExtractor;

#[async_trait]
impl Extractor for SheetExtractor {
    async fn extract(&self, bytes: &[u8]) -> Result<String, ExtractError> {
        Ok(extract_text_from_workbook(bytes).map_err(ExtractError::from)?)
    }
}

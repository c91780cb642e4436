//! Values that fill placeholders, and the parsers that produce them from uploads.

pub mod resolver;
pub mod spreadsheet;

use std::fmt;
use thiserror::Error;

/// Tabular payload: ordered column names, then ordered rows of cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableData {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// What a placeholder is replaced with.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderValue {
    /// Typed text or the contents of a `.txt` upload.
    Text(String),
    /// Raw bytes of an uploaded picture.
    Image(Vec<u8>),
    /// Rows read from a spreadsheet.
    Table(TableData),
    /// Plain text pulled out of another Word or PowerPoint file.
    Extracted(String),
}

/// Text rendering used where a value has to become a string (slide decks).
impl fmt::Display for PlaceholderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) | Self::Extracted(text) => f.write_str(text),
            Self::Image(_) => f.write_str("[image]"),
            Self::Table(table) => {
                write!(f, "{}", table.columns.join("\t"))?;
                for row in &table.rows {
                    write!(f, "\n{}", row.join("\t"))?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unsupported content type `.{extension}` for {token}")]
    Unsupported { token: String, extension: String },
    #[error("could not read the upload for {token}: {reason}")]
    Parse { token: String, reason: String },
}

//! Turns what the user supplied for each placeholder (an upload, typed text, or
//! nothing) into a [`PlaceholderValue`].

use crate::content::spreadsheet::{parse_csv, parse_xlsx};
use crate::content::{ContentError, PlaceholderValue};
use crate::documents::docx::WordDocument;
use crate::documents::pptx::SlideDeck;
use common::model::place_holder::{FieldKind, PlaceHolder};
use indexmap::IndexMap;
use log::{debug, warn};
use std::collections::HashMap;
use std::error::Error;
use std::path::Path;

type ParseResult = Result<PlaceholderValue, Box<dyn Error + Send + Sync>>;
pub type ContentParser = fn(&[u8]) -> ParseResult;

/// Upload extension (lower case, no dot) -> parser.
pub const CONTENT_PARSERS: &[(&str, ContentParser)] = &[
    ("jpg", parse_image),
    ("jpeg", parse_image),
    ("png", parse_image),
    ("xlsx", parse_xlsx),
    ("csv", parse_csv),
    ("docx", parse_word),
    ("pptx", parse_slides),
    ("txt", parse_text),
];

/// A file attached to one placeholder.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

pub fn parser_for(filename: &str) -> Option<ContentParser> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    CONTENT_PARSERS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, parser)| *parser)
}

/// Parses `upload` into a value for `token`.
pub fn parse_upload(token: &str, upload: &Upload) -> Result<PlaceholderValue, ContentError> {
    let parser = parser_for(&upload.filename).ok_or_else(|| ContentError::Unsupported {
        token: token.to_string(),
        extension: Path::new(&upload.filename)
            .extension()
            .map(|ext| ext.to_string_lossy().into_owned())
            .unwrap_or_default(),
    })?;
    parser(&upload.bytes).map_err(|e| ContentError::Parse {
        token: token.to_string(),
        reason: e.to_string(),
    })
}

/// Value for one placeholder, or `None` when it is left unresolved.
///
/// Text fields take only typed text. Content fields prefer an upload and fall back
/// to typed text. Typed text is trimmed; blank text counts as nothing.
pub fn resolve(
    placeholder: &PlaceHolder,
    upload: Option<&Upload>,
    typed: Option<&str>,
) -> Result<Option<PlaceholderValue>, ContentError> {
    let typed = typed
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(|text| PlaceholderValue::Text(text.to_string()));

    match placeholder.field_kind {
        FieldKind::Text => {
            if upload.is_some() {
                warn!("Ignoring upload for text field {}", placeholder.token);
            }
            Ok(typed)
        }
        FieldKind::Content => match upload {
            Some(upload) => {
                debug!("Parsing {} for {}", upload.filename, placeholder.token);
                parse_upload(&placeholder.token, upload).map(Some)
            }
            None => Ok(typed),
        },
    }
}

/// Resolves every placeholder, keeping discovery order. Unresolved placeholders are
/// simply absent from the result.
pub fn resolve_all(
    placeholders: &[PlaceHolder],
    uploads: &HashMap<String, Upload>,
    typed: &HashMap<String, String>,
) -> Result<IndexMap<String, PlaceholderValue>, ContentError> {
    let mut values = IndexMap::new();
    for placeholder in placeholders {
        let upload = uploads.get(&placeholder.token);
        let text = typed.get(&placeholder.token).map(String::as_str);
        if let Some(value) = resolve(placeholder, upload, text)? {
            values.insert(placeholder.token.clone(), value);
        }
    }
    Ok(values)
}

fn parse_image(bytes: &[u8]) -> ParseResult {
    image::guess_format(bytes)?;
    Ok(PlaceholderValue::Image(bytes.to_vec()))
}

fn parse_word(bytes: &[u8]) -> ParseResult {
    let document = WordDocument::from_bytes(bytes)?;
    Ok(PlaceholderValue::Extracted(document.paragraph_texts().join("\n")))
}

fn parse_slides(bytes: &[u8]) -> ParseResult {
    let deck = SlideDeck::from_bytes(bytes)?;
    Ok(PlaceholderValue::Extracted(deck.shape_texts().join("\n")))
}

fn parse_text(bytes: &[u8]) -> ParseResult {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    Ok(PlaceholderValue::Text(String::from_utf8_lossy(bytes).into_owned()))
}

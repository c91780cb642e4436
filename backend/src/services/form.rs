//! Buffers a multipart request: one `json` part with the request metadata, plus any
//! number of named file parts.

use crate::error::AppError;
use actix_multipart::Multipart;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;

/// Name of the part carrying the JSON metadata.
pub const JSON_FIELD: &str = "json";

#[derive(Debug)]
pub struct FormFile {
    /// Multipart field name.
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadForm {
    json: Option<Vec<u8>>,
    pub files: Vec<FormFile>,
}

impl UploadForm {
    /// Deserializes the `json` part.
    pub fn metadata<T: DeserializeOwned>(&self) -> Result<T, AppError> {
        let raw = self
            .json
            .as_deref()
            .ok_or_else(|| AppError::InvalidRequest(format!("missing `{JSON_FIELD}` part")))?;
        Ok(serde_json::from_slice(raw)?)
    }

    /// Removes and returns the file sent under `field`.
    pub fn take_file(&mut self, field: &str) -> Result<FormFile, AppError> {
        let position = self
            .files
            .iter()
            .position(|file| file.field == field)
            .ok_or_else(|| AppError::InvalidRequest(format!("missing `{field}` part")))?;
        Ok(self.files.remove(position))
    }
}

/// Reads every part of `payload` into memory, failing once more than `limit` bytes
/// have been received.
pub async fn read_form(mut payload: Multipart, limit: usize) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    let mut received = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let (name, filename) = match field.content_disposition() {
            Some(cd) => (
                cd.get_name().map(str::to_string).unwrap_or_default(),
                cd.get_filename().map(str::to_string),
            ),
            None => (String::new(), None),
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk?;
            received += chunk.len();
            if received > limit {
                return Err(AppError::InvalidRequest(format!(
                    "upload exceeds the {} MB limit",
                    limit / (1024 * 1024)
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        // Empty file inputs arrive with no filename and are skipped.
        if name == JSON_FIELD {
            form.json = Some(bytes);
        } else if let Some(filename) = filename.filter(|f| !f.is_empty()) {
            form.files.push(FormFile {
                field: name,
                filename,
                bytes,
            });
        }
    }

    Ok(form)
}

//! Service-wide error type and its HTTP mapping.

use crate::content::ContentError;
use crate::documents::DocumentError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("no template named `{name}` under `{doc_type}`")]
    MissingTemplatePath { doc_type: String, name: String },

    #[error("unknown document type `{0}`")]
    UnknownDocumentType(String),

    #[error("missing placeholders: {}", .0.join(", "))]
    MissingPlaceholders(Vec<String>),

    #[error("unsupported content type `.{extension}` for {token}")]
    UnsupportedContentType { token: String, extension: String },

    #[error("unsupported template type `{0}`; expected .dot, .dotx or .pptx")]
    UnsupportedTemplateType(String),

    #[error("could not read the upload for {token}: {reason}")]
    ContentParse { token: String, reason: String },

    #[error("template registry is unreadable: {0}")]
    RegistryReadFailure(String),

    #[error("template registry could not be written: {0}")]
    RegistryWriteFailure(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ContentError> for AppError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Unsupported { token, extension } => {
                Self::UnsupportedContentType { token, extension }
            }
            ContentError::Parse { token, reason } => Self::ContentParse { token, reason },
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidRequest(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingTemplatePath { .. } => StatusCode::NOT_FOUND,
            Self::MissingPlaceholders(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::UnknownDocumentType(_)
            | Self::UnsupportedContentType { .. }
            | Self::UnsupportedTemplateType(_)
            | Self::ContentParse { .. }
            | Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::RegistryReadFailure(_)
            | Self::RegistryWriteFailure(_)
            | Self::Document(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::MissingPlaceholders(missing) => serde_json::json!({
                "error": self.to_string(),
                "missing": missing,
            }),
            _ => serde_json::json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}

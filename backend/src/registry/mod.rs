//! The template registry: which templates exist, under which document type, and
//! where their files live.
//!
//! The index is a JSON object stored next to the templates
//! (`<dir>/templates_index.json`):
//!
//! ```json
//! {
//!   "Statement of Work": [
//!     { "name": "Default", "file": "templates/Statement_of_Work_Default.dotx" }
//!   ]
//! }
//! ```
//!
//! Both template files and the index are written to a temporary file in the same
//! directory and renamed into place, so a failed save never leaves a truncated index.

use crate::error::AppError;
use common::model::template::{TemplateEntry, TemplateIndex};
use log::{info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const INDEX_FILE: &str = "templates_index.json";

/// Buckets of a fresh registry, in display order.
pub const DEFAULT_DOCUMENT_TYPES: [&str; 3] = [
    "Solution Proposal",
    "Cloud Readiness Assessment",
    "Statement of Work",
];

/// Extensions accepted when registering a template.
pub const TEMPLATE_EXTENSIONS: [&str; 3] = ["dot", "dotx", "pptx"];

#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    dir: PathBuf,
    index: TemplateIndex,
}

impl TemplateRegistry {
    /// Loads the index from `dir`. A missing index gives the default buckets and
    /// creates `dir` if needed.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        let index_path = dir.join(INDEX_FILE);

        let index = match fs::read(&index_path) {
            Ok(raw) => serde_json::from_slice::<TemplateIndex>(&raw).map_err(|e| {
                AppError::RegistryReadFailure(format!("{}: {}", index_path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(&dir).map_err(|e| {
                    AppError::RegistryWriteFailure(format!("{}: {}", dir.display(), e))
                })?;
                info!("No template index in {}, starting with defaults", dir.display());
                default_index()
            }
            Err(e) => {
                return Err(AppError::RegistryReadFailure(format!(
                    "{}: {}",
                    index_path.display(),
                    e
                )));
            }
        };

        Ok(Self { dir, index })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn index(&self) -> &TemplateIndex {
        &self.index
    }

    pub fn document_types(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    pub fn entries(&self, doc_type: &str) -> Result<&[TemplateEntry], AppError> {
        self.index
            .get(doc_type)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::UnknownDocumentType(doc_type.to_string()))
    }

    /// Path of the template registered as `name` under `doc_type`.
    pub fn resolve(&self, doc_type: &str, name: &str) -> Result<PathBuf, AppError> {
        self.index
            .get(doc_type)
            .and_then(|entries| entries.iter().find(|entry| entry.name == name))
            .map(|entry| PathBuf::from(&entry.file))
            .ok_or_else(|| AppError::MissingTemplatePath {
                doc_type: doc_type.to_string(),
                name: name.to_string(),
            })
    }

    /// Stores `bytes` as a template and registers it, replacing any entry of the same
    /// display name in that bucket. The in-memory index only changes once the new
    /// index is on disk.
    pub fn save(
        &mut self,
        bytes: &[u8],
        original_filename: &str,
        doc_type: &str,
        display_name: &str,
    ) -> Result<TemplateEntry, AppError> {
        let extension = Path::new(original_filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .filter(|ext| TEMPLATE_EXTENSIONS.contains(&ext.as_str()))
            .ok_or_else(|| AppError::UnsupportedTemplateType(original_filename.to_string()))?;

        if !self.index.contains_key(doc_type) {
            return Err(AppError::UnknownDocumentType(doc_type.to_string()));
        }
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(AppError::InvalidRequest("display name must not be empty".into()));
        }
        if display_name.contains(['/', '\\']) || display_name.contains("..") {
            return Err(AppError::InvalidRequest(format!(
                "display name `{display_name}` must not contain path separators"
            )));
        }

        let filename = format!(
            "{}_{}.{}",
            doc_type.replace(' ', "_"),
            display_name.replace(' ', "_"),
            extension
        );
        let path = self.dir.join(&filename);
        write_atomically(&self.dir, &path, bytes)?;

        let entry = TemplateEntry {
            name: display_name.to_string(),
            file: path.to_string_lossy().into_owned(),
        };

        let mut index = self.index.clone();
        let bucket = index.entry(doc_type.to_string()).or_default();
        let replaced = bucket.iter().any(|e| e.name == entry.name);
        bucket.retain(|e| e.name != entry.name);
        bucket.push(entry.clone());

        let json = serde_json::to_vec_pretty(&index)
            .map_err(|e| AppError::RegistryWriteFailure(e.to_string()))?;
        write_atomically(&self.dir, &self.dir.join(INDEX_FILE), &json)?;
        self.index = index;

        if replaced {
            warn!("Replaced template '{}' under '{}'", entry.name, doc_type);
        }
        info!("Saved template '{}' under '{}' as {}", entry.name, doc_type, entry.file);
        Ok(entry)
    }
}

fn default_index() -> TemplateIndex {
    DEFAULT_DOCUMENT_TYPES
        .iter()
        .map(|doc_type| (doc_type.to_string(), Vec::new()))
        .collect()
}

/// Writes to a temporary file in `dir`, then renames it over `path`.
fn write_atomically(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    let failure = |e: std::io::Error| AppError::RegistryWriteFailure(format!("{}: {}", path.display(), e));

    fs::create_dir_all(dir).map_err(failure)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(failure)?;
    tmp.write_all(bytes).map_err(failure)?;
    tmp.as_file().sync_all().map_err(failure)?;
    tmp.persist(path).map_err(|e| failure(e.error))?;
    Ok(())
}

//! Multipart form intake: text fields are collected, file fields are
//! spooled to temp files so the media store client can stream them out.

use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use axum::extract::Multipart;
use tempfile::NamedTempFile;

use crate::error::ApiError;

pub struct UploadedFile {
    file: NamedTempFile,
    pub filename: Option<String>,
}

impl UploadedFile {
    /// Local path of the spooled upload; the file is removed on drop
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[derive(Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }
}

pub async fn read_form(mut multipart: Multipart) -> Result<MultipartForm, ApiError> {
    let mut form = MultipartForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Multipart error: {}", e)))?
    {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };

        if field.file_name().is_some() {
            let filename = field.file_name().map(|f| f.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read field: {}", e)))?;
            if bytes.is_empty() {
                continue;
            }

            let mut file = NamedTempFile::new().map_err(|e| {
                tracing::error!("Failed to create temp file: {}", e);
                ApiError::internal_server_error("Failed to store uploaded file")
            })?;
            file.write_all(&bytes).map_err(|e| {
                tracing::error!("Failed to spool upload: {}", e);
                ApiError::internal_server_error("Failed to store uploaded file")
            })?;

            form.files.insert(name, UploadedFile { file, filename });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Failed to read field: {}", e)))?;
            form.fields.insert(name, value);
        }
    }

    Ok(form)
}

use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::ApiError;

#[derive(Debug)]
pub struct UploadedFile {
    pub bytes: Bytes,
    pub content_type: String,
}

/// Multipart body drained into text fields and file parts. A part counts as a
/// file when the client sent a filename with it.
#[derive(Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut mp: Multipart) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();
        while let Some(field) = mp
            .next_field()
            .await
            .map_err(|_| ApiError::Validation("Malformed multipart body".into()))?
        {
            let Some(name) = field.name().map(|s| s.to_string()) else {
                continue;
            };
            if field.file_name().is_some() {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".into());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|_| ApiError::Validation("Malformed multipart body".into()))?;
                form.files.insert(
                    name,
                    UploadedFile {
                        bytes,
                        content_type,
                    },
                );
            } else {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::Validation("Malformed multipart body".into()))?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn required_text(&self, name: &str, label: &str) -> Result<String, ApiError> {
        self.text(name)
            .ok_or_else(|| ApiError::Validation(format!("{label} is required")))
    }

    pub fn file(&self, name: &str) -> Option<&UploadedFile> {
        self.files.get(name)
    }

    pub fn required_file(&self, name: &str, message: &str) -> Result<&UploadedFile, ApiError> {
        self.file(name)
            .ok_or_else(|| ApiError::Validation(message.to_string()))
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(fields: &[(&str, &str)]) -> MultipartForm {
        let mut form = MultipartForm::default();
        for (k, v) in fields {
            form.fields.insert(k.to_string(), v.to_string());
        }
        form
    }

    #[test]
    fn text_trims_and_drops_empty() {
        let form = form_with(&[("name", "  Ada "), ("phone", "   ")]);
        assert_eq!(form.text("name").as_deref(), Some("Ada"));
        assert_eq!(form.text("phone"), None);
        assert_eq!(form.text("missing"), None);
    }

    #[test]
    fn required_text_reports_label() {
        let form = form_with(&[]);
        let err = form.required_text("name", "First name").unwrap_err();
        assert_eq!(err.to_string(), "First name is required");
    }

    #[test]
    fn required_file_uses_given_message() {
        let form = MultipartForm::default();
        let err = form
            .required_file("avatar", "Avatar and resume are required")
            .unwrap_err();
        assert_eq!(err.to_string(), "Avatar and resume are required");
        assert!(!form.has_files());
    }
}

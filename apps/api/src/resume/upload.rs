//! Multipart form parsing for the résumé page and JSON endpoint.

use std::path::Path;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;

use crate::errors::AppError;

/// Field names accepted in the upload form.
pub const RESUME_FIELD: &str = "resume";
pub const MODE_FIELD: &str = "mode";
pub const INTERVIEW_KIND_FIELD: &str = "interview_kind";

#[derive(Debug)]
pub struct ResumeUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Everything one form submission carries. Unknown fields are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub resume: Option<ResumeUpload>,
    pub mode: Option<String>,
    pub interview_kind: Option<String>,
}

pub async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| form_error("Malformed form data", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            RESUME_FIELD => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let content_type = field.content_type().unwrap_or("").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| form_error("Could not read upload", e))?;

                // Browsers send an empty part when no file was chosen.
                if bytes.is_empty() {
                    continue;
                }
                if !is_pdf_upload(&file_name, &content_type) {
                    return Err(AppError::Validation(format!(
                        "Only PDF files are accepted (got '{file_name}')"
                    )));
                }
                form.resume = Some(ResumeUpload { file_name, bytes });
            }
            MODE_FIELD => form.mode = Some(read_text(field).await?),
            INTERVIEW_KIND_FIELD => form.interview_kind = Some(read_text(field).await?),
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map(|s| s.trim().to_string())
        .map_err(|e| form_error("Malformed form field", e))
}

/// Body-limit breaches keep their 413; every other multipart failure is a bad request.
fn form_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{context}: {}", e.body_text()))
    } else {
        AppError::Validation(format!("{context}: {}", e.body_text()))
    }
}

/// A PDF is recognised by its `.pdf` extension or its declared content type.
pub fn is_pdf_upload(file_name: &str, content_type: &str) -> bool {
    let by_extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    by_extension || content_type.eq_ignore_ascii_case("application/pdf")
}

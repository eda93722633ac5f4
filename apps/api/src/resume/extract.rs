//! PDF text extraction. Uploads are staged to a temp file, handed to the PDF
//! loader page by page, and the staging file is removed on every exit path.

use std::io::Write;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::resume::ResumeText;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not stage upload: {0}")]
    Staging(#[from] std::io::Error),

    #[error("could not read PDF: {0}")]
    Loader(String),

    #[error("no extractable text found in PDF")]
    NoText,
}

/// Extracts the text of an uploaded PDF, one page per line group, in page order.
///
/// The loader is CPU-bound and may panic on hostile input, so it runs on the
/// blocking pool; a panic surfaces as `ExtractError::Loader`.
pub async fn extract_resume_text(
    bytes: Bytes,
    staging_dir: &Path,
) -> Result<ResumeText, ExtractError> {
    let staging_dir: PathBuf = staging_dir.to_path_buf();
    tokio::task::spawn_blocking(move || extract_staged(&bytes, &staging_dir))
        .await
        .map_err(|e| ExtractError::Loader(format!("PDF loader aborted: {e}")))?
}

fn extract_staged(bytes: &[u8], staging_dir: &Path) -> Result<ResumeText, ExtractError> {
    // Dropping the guard deletes the file, including during unwinding.
    let mut staged = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".pdf")
        .tempfile_in(staging_dir)?;
    staged.write_all(bytes)?;
    staged.flush()?;
    debug!("Staged {} byte upload at {}", bytes.len(), staged.path().display());

    let pages = pdf_extract::extract_text_by_pages(staged.path())
        .map_err(|e| ExtractError::Loader(e.to_string()))?;
    staged.close()?;

    let text = join_pages(&pages);
    if text.trim().is_empty() {
        return Err(ExtractError::NoText);
    }

    debug!("Extracted {} pages, {} chars", pages.len(), text.len());
    Ok(ResumeText::new(text))
}

/// Newline-joins per-page text in page order.
pub fn join_pages<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(|page| page.as_ref())
        .collect::<Vec<&str>>()
        .join("\n")
}

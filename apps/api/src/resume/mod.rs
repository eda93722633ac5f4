// Résumé intake: multipart upload parsing and PDF text extraction.
// Nothing here outlives the request that produced it.

pub mod extract;
pub mod upload;

/// Plain text extracted from an uploaded résumé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeText(String);

impl ResumeText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//! Extracted email record.

use serde::Serialize;

/// Text extracted from one leaf part: `(content_type, encoding, text)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartText {
    /// Lowercased MIME type, or `"NA"` for a bare payload.
    pub content_type: String,

    /// Transfer encoding, or `"NA"` when absent.
    pub encoding: String,

    /// Plain text, or `None` when the part carries no readable text
    /// (attachments, base64 bodies, empty HTML).
    pub text: Option<String>,
}

impl PartText {
    pub fn new(
        content_type: impl Into<String>,
        encoding: impl Into<String>,
        text: Option<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            encoding: encoding.into(),
            text,
        }
    }
}

/// Structured fields of one message.
///
/// Built fresh for every message and discarded once the report line is
/// written. Header fields are `None` when the header is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractedEmail {
    /// Gmail labels from the `X-Gmail-Labels` header.
    pub labels: Option<String>,
    pub date: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub subject: Option<String>,

    /// One entry per leaf part, in depth-first order.
    pub text: Vec<PartText>,
}

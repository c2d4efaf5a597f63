//! Per-message field and text extraction.

use tracing::trace;

use crate::config::ParsingConfig;
use crate::model::mail::{ExtractedEmail, PartText};
use crate::model::part::{LeafPart, MimeNode, NOT_AVAILABLE};
use crate::model::record::MailRecord;
use crate::parser::flatten::flatten;
use crate::parser::header::HeaderBlock;
use crate::parser::mime::{html_to_text, parse_structure};

/// Header carrying Gmail labels in Takeout exports.
const LABELS_HEADER: &str = "X-Gmail-Labels";

/// Options controlling text extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Deepest MIME nesting level that is descended.
    pub max_mime_depth: usize,
    /// Line width handed to the HTML renderer.
    pub html_width: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::from(&ParsingConfig::default())
    }
}

impl From<&ParsingConfig> for ExtractOptions {
    fn from(config: &ParsingConfig) -> Self {
        Self {
            max_mime_depth: config.max_mime_depth,
            html_width: config.html_width,
        }
    }
}

/// Extracts headers and text parts from one [`MailRecord`].
///
/// The extractor only borrows the record and never mutates it, so calling
/// [`parse_email`](Self::parse_email) repeatedly yields equal results.
pub struct MessageExtractor<'a> {
    record: &'a MailRecord,
    options: ExtractOptions,
}

impl<'a> MessageExtractor<'a> {
    pub fn new(record: &'a MailRecord, options: ExtractOptions) -> Self {
        Self { record, options }
    }

    /// Read the summary headers and all text parts.
    ///
    /// Missing headers are `None`; this never fails.
    pub fn parse_email(&self) -> ExtractedEmail {
        let headers = HeaderBlock::parse(&self.record.contents);
        let field = |name: &str| headers.get(name).map(str::to_string);

        ExtractedEmail {
            labels: field(LABELS_HEADER),
            date: field("Date"),
            from: field("From"),
            to: field("To"),
            subject: field("Subject"),
            text: self.read_email_payload(),
        }
    }

    /// Classify every leaf part of the message, in depth-first order.
    ///
    /// A non-multipart message yields exactly one entry.
    pub fn read_email_payload(&self) -> Vec<PartText> {
        let root = parse_structure(&self.record.contents, self.options.max_mime_depth);
        let parts: Vec<PartText> = match &root {
            MimeNode::Leaf(leaf) => vec![self.classify(leaf)],
            nested => flatten(nested.children())
                .map(|leaf| self.classify(leaf))
                .collect(),
        };
        trace!(
            sequence = self.record.sequence,
            parts = parts.len(),
            "Extracted message parts"
        );
        parts
    }

    /// Turn one leaf into its `(content_type, encoding, text)` entry.
    pub fn classify(&self, leaf: &LeafPart) -> PartText {
        classify_leaf(leaf, self.options.html_width)
    }
}

/// Classification rules for a single leaf part.
///
/// - `text/plain`, not base64: the raw payload, verbatim
/// - `text/html`, not base64: the visible text of the markup
/// - bare payload (`"NA"`): treated as markup
/// - anything else: no text
pub fn classify_leaf(leaf: &LeafPart, html_width: usize) -> PartText {
    let content_type = leaf.content_type();
    let encoding = leaf.encoding();
    let is_base64 = encoding.to_ascii_lowercase().contains("base64");

    let text = if content_type.contains("text/plain") && !is_base64 {
        Some(leaf.payload().to_string())
    } else if content_type.contains("text/html") && !is_base64 {
        html_to_text(leaf.payload(), html_width)
    } else if content_type == NOT_AVAILABLE {
        html_to_text(leaf.payload(), html_width)
    } else {
        None
    };

    PartText::new(content_type, encoding, text)
}

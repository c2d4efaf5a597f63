//! A single message record read from an MBOX archive.

/// One message as stored in the archive.
///
/// Records are owned and immutable; the reader hands out a fresh one for
/// every message, so nothing here is shared across messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailRecord {
    /// Zero-based position of the message in the archive.
    pub sequence: u64,

    /// Byte offset of the `From ` separator line inside the MBOX file.
    pub offset: u64,

    /// The `From ` separator line, without its line terminator.
    pub separator: String,

    /// Raw RFC 5322 message (headers + body), with `>From ` quoting removed.
    pub contents: Vec<u8>,
}

impl MailRecord {
    /// Build a record from raw message bytes that carry no MBOX framing.
    pub fn from_message(sequence: u64, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            sequence,
            offset: 0,
            separator: String::new(),
            contents: contents.into(),
        }
    }
}

//! RFC 5322 header lookup: byte decoding, folding and case-insensitive access.

/// The unfolded header section of one message.
///
/// Values are kept raw: encoded-words are not decoded and the only change
/// made to a folded value is that each line break is replaced by one space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBlock {
    fields: Vec<(String, String)>,
}

impl HeaderBlock {
    /// Parse the header section at the start of a raw message.
    ///
    /// Everything up to the first blank line is considered; the body is
    /// never decoded.
    pub fn parse(raw_message: &[u8]) -> Self {
        let header_end = find_header_end(raw_message).unwrap_or(raw_message.len());
        let text = decode_header_bytes(&raw_message[..header_end]);
        Self {
            fields: unfold_headers(&text),
        }
    }

    /// First value of the named header (case-insensitive), or `None` if the
    /// header is missing.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Decode raw header bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every byte).
fn decode_header_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Unfold headers: join continuation lines (starting with space or tab) with the previous header.
///
/// Returns a list of `(lowercase_name, value)` pairs in message order.
fn unfold_headers(text: &str) -> Vec<(String, String)> {
    let mut result: Vec<(String, String)> = Vec::new();

    for line in text.lines() {
        if line.starts_with(' ') || line.starts_with('\t') {
            if let Some(last) = result.last_mut() {
                if !last.1.is_empty() {
                    last.1.push(' ');
                }
                last.1.push_str(line.trim());
            }
        } else if let Some((name, value)) = line.split_once(':') {
            result.push((name.trim().to_lowercase(), value.trim().to_string()));
        }
    }

    result
}

/// Byte offset where the header section ends (position of the first blank line).
pub(crate) fn find_header_end(data: &[u8]) -> Option<usize> {
    if data.starts_with(b"\n") || data.starts_with(b"\r\n") {
        return Some(0);
    }
    data.windows(2)
        .enumerate()
        .find_map(|(i, w)| match w {
            b"\n\n" => Some(i + 1),
            b"\n\r" if data.get(i + 2) == Some(&b'\n') => Some(i + 1),
            _ => None,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unfold_headers() {
        let text = "Subject: This is a long\n\tsubject line\nFrom: user@example.com\n";
        let headers = unfold_headers(text);
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].0, "subject");
        assert_eq!(headers[0].1, "This is a long subject line");
        assert_eq!(headers[1].1, "user@example.com");
    }

    #[test]
    fn test_get_is_case_insensitive_and_first_wins() {
        let block = HeaderBlock::parse(
            b"X-Gmail-Labels: Inbox,Important\nTo: a@x.com\nto: b@x.com\n\nbody\n",
        );
        assert_eq!(block.get("x-gmail-labels"), Some("Inbox,Important"));
        assert_eq!(block.get("X-GMAIL-LABELS"), Some("Inbox,Important"));
        assert_eq!(block.get("To"), Some("a@x.com"));
        assert_eq!(block.fields.len(), 3);
    }

    #[test]
    fn test_missing_header_is_none() {
        let block = HeaderBlock::parse(b"From: a@x.com\n\nSubject: not a header\n");
        assert_eq!(block.get("Subject"), None);
    }

    #[test]
    fn test_encoded_words_are_kept_raw() {
        let block = HeaderBlock::parse(b"Subject: =?UTF-8?B?SG9sYQ==?=\n\n");
        assert_eq!(block.get("subject"), Some("=?UTF-8?B?SG9sYQ==?="));
    }

    #[test]
    fn test_latin1_header_bytes() {
        let block = HeaderBlock::parse(b"Subject: caf\xe9\n\n");
        assert_eq!(block.get("subject"), Some("café"));
    }

    #[test]
    fn test_find_header_end() {
        let data = b"From: a@b.com\nSubject: Hi\n\nBody\n";
        assert_eq!(find_header_end(data), Some(26));
        let data = b"From: a@b.com\r\nSubject: Hi\r\n\r\nBody\r\n";
        assert_eq!(find_header_end(data), Some(28));
        assert_eq!(find_header_end(b"\nBody"), Some(0));
        assert_eq!(find_header_end(b"From: a@b.com\n"), None);
    }

    #[test]
    fn test_empty_block() {
        let block = HeaderBlock::parse(b"");
        assert!(block.fields.is_empty());
        assert_eq!(block.get("subject"), None);
    }
}

//! MIME structure adapter and HTML-to-text conversion.
//!
//! [`parse_structure`] runs `mail-parser` over one raw message and converts
//! the result into an owned [`MimeNode`] tree. Nothing downstream sees a
//! `mail-parser` type.

use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};
use tracing::{debug, warn};

use crate::model::part::{LeafPart, MimeNode, NOT_AVAILABLE};
use crate::parser::header::find_header_end;

/// Content type assumed for parts without a usable `Content-Type` header.
const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Parse the MIME structure of a raw message (headers + body, no MBOX framing).
///
/// Parts nested deeper than `max_depth` are not descended; they become
/// leaves carrying their own content type. When the message cannot be
/// parsed at all, the root is a [`LeafPart::RawText`] holding the body.
pub fn parse_structure(raw_message: &[u8], max_depth: usize) -> MimeNode {
    let parsed = MessageParser::default().parse(raw_message);

    match parsed.as_ref().and_then(|msg| msg.parts.first().map(|root| (msg, root))) {
        Some((message, root)) => convert_part(message, root, 0, max_depth),
        None => {
            debug!(
                size = raw_message.len(),
                "Unparseable message, using the raw body"
            );
            MimeNode::Leaf(LeafPart::RawText(body_after_headers(raw_message)))
        }
    }
}

fn convert_part(
    message: &Message<'_>,
    part: &MessagePart<'_>,
    depth: usize,
    max_depth: usize,
) -> MimeNode {
    let content_type = content_type_of(part);
    let encoding = part
        .content_transfer_encoding()
        .map(|enc| enc.trim().to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let nested = matches!(part.body, PartType::Multipart(_) | PartType::Message(_));
    if nested && depth >= max_depth {
        warn!(
            depth,
            content_type = %content_type,
            "MIME nesting too deep, keeping part as a leaf"
        );
        let payload = raw_payload(message, part);
        return MimeNode::Leaf(LeafPart::Typed {
            content_type,
            encoding,
            payload,
        });
    }

    match &part.body {
        PartType::Multipart(ids) => MimeNode::Multipart {
            content_type,
            encoding,
            parts: ids
                .iter()
                .filter_map(|&id| message.parts.get(id))
                .map(|child| convert_part(message, child, depth + 1, max_depth))
                .collect(),
        },
        // Offsets of an embedded message's parts are relative to its own raw bytes.
        PartType::Message(inner) => MimeNode::Sequence(
            inner
                .parts
                .first()
                .map(|root| convert_part(inner, root, depth + 1, max_depth))
                .into_iter()
                .collect(),
        ),
        PartType::Text(_) | PartType::Html(_) | PartType::Binary(_) | PartType::InlineBinary(_) => {
            let payload = raw_payload(message, part);
            MimeNode::Leaf(LeafPart::Typed {
                content_type,
                encoding,
                payload,
            })
        }
    }
}

/// Lowercased `type/subtype`, falling back to `text/plain`.
fn content_type_of(part: &MessagePart<'_>) -> String {
    part.content_type()
        .and_then(|ct| {
            ct.subtype()
                .map(|sub| format!("{}/{}", ct.ctype(), sub).to_lowercase())
        })
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string())
}

/// The undecoded body of a part, as text.
///
/// Bytes are read as UTF-8, then in the part's declared charset, then as
/// Windows-1252. Trailing line terminators are dropped.
fn raw_payload(message: &Message<'_>, part: &MessagePart<'_>) -> String {
    let bytes = message
        .raw_message
        .get(part.offset_body..part.offset_end)
        .unwrap_or_default();
    let charset = part.content_type().and_then(|ct| ct.attribute("charset"));
    let text = decode_bytes(bytes, charset);
    text.trim_end_matches(['\r', '\n']).to_string()
}

fn decode_bytes(bytes: &[u8], charset: Option<&str>) -> String {
    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }
    let encoding = charset
        .and_then(|label| encoding_rs::Encoding::for_label(label.as_bytes()))
        .unwrap_or(encoding_rs::WINDOWS_1252);
    let (decoded, _, _) = encoding.decode(bytes);
    decoded.into_owned()
}

/// Everything after the header section, for messages `mail-parser` rejects.
fn body_after_headers(raw_message: &[u8]) -> String {
    let body = match find_header_end(raw_message) {
        Some(end) => {
            let rest = &raw_message[end..];
            rest.strip_prefix(b"\r\n")
                .or_else(|| rest.strip_prefix(b"\n"))
                .unwrap_or(rest)
        }
        None => raw_message,
    };
    decode_bytes(body, None)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

/// Convert HTML to its visible text, words joined by single spaces.
///
/// Returns `None` when the markup has no visible text (empty body, only
/// tags or comments) or when the renderer rejects it.
pub fn html_to_text(html: &str, width: usize) -> Option<String> {
    let rendered = match html2text::config::plain_no_decorate()
        .allow_width_overflow()
        .string_from_read(html.as_bytes(), width.max(1))
    {
        Ok(text) => text,
        Err(e) => {
            debug!(error = %e, "HTML rendering failed");
            return None;
        }
    };

    let words: Vec<&str> = rendered.split_whitespace().collect();
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(node: &MimeNode) -> &LeafPart {
        match node {
            MimeNode::Leaf(leaf) => leaf,
            other => panic!("expected a leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_single_part_defaults_to_text_plain() {
        let node = parse_structure(b"Subject: Hi\n\nhello\n", 10);
        let leaf = leaf(&node);
        assert_eq!(leaf.content_type(), "text/plain");
        assert_eq!(leaf.encoding(), "NA");
        assert_eq!(leaf.payload(), "hello");
    }

    #[test]
    fn test_payload_is_not_decoded() {
        let raw = b"Content-Type: text/plain; charset=utf-8\n\
Content-Transfer-Encoding: quoted-printable\n\nCaf=C3=A9\n";
        let node = parse_structure(raw, 10);
        let leaf = leaf(&node);
        assert_eq!(leaf.encoding(), "quoted-printable");
        assert_eq!(leaf.payload(), "Caf=C3=A9");
    }

    #[test]
    fn test_content_type_is_lowercased() {
        let node = parse_structure(b"Content-Type: Text/HTML\n\n<p>x</p>\n", 10);
        assert_eq!(leaf(&node).content_type(), "text/html");
    }

    #[test]
    fn test_multipart_structure() {
        let raw = b"Content-Type: multipart/mixed; boundary=\"b1\"\n\n\
--b1\nContent-Type: text/plain\n\nA\n\
--b1\nContent-Type: text/html\n\n<p>B</p>\n\
--b1--\n";
        let node = parse_structure(raw, 10);
        let MimeNode::Multipart {
            content_type,
            parts,
            ..
        } = &node
        else {
            panic!("expected multipart, got {node:?}");
        };
        assert_eq!(content_type, "multipart/mixed");
        assert_eq!(parts.len(), 2);
        assert_eq!(leaf(&parts[0]).payload(), "A");
        assert_eq!(leaf(&parts[1]).content_type(), "text/html");
        assert_eq!(leaf(&parts[1]).payload(), "<p>B</p>");
    }

    #[test]
    fn test_depth_bound_keeps_part_as_leaf() {
        let raw = b"Content-Type: multipart/mixed; boundary=\"outer\"\n\n\
--outer\nContent-Type: multipart/alternative; boundary=\"inner\"\n\n\
--inner\nContent-Type: text/plain\n\nA\n\
--inner--\n\
--outer--\n";
        let node = parse_structure(raw, 1);
        let children = node.children();
        assert_eq!(children.len(), 1);
        assert_eq!(leaf(&children[0]).content_type(), "multipart/alternative");
    }

    #[test]
    fn test_unparseable_message_becomes_raw_text() {
        let node = parse_structure(b"", 10);
        assert_eq!(node, MimeNode::Leaf(LeafPart::RawText(String::new())));
    }

    #[test]
    fn test_body_after_headers() {
        assert_eq!(body_after_headers(b"A: b\n\n<p>x</p>\n"), "<p>x</p>");
        assert_eq!(body_after_headers(b"A: b\r\n\r\nbody\r\n"), "body");
        assert_eq!(body_after_headers(b"no headers here"), "no headers here");
    }

    #[test]
    fn test_decode_bytes_charset_fallback() {
        assert_eq!(decode_bytes(b"caf\xe9", Some("iso-8859-1")), "café");
        assert_eq!(decode_bytes(b"caf\xe9", None), "café");
        assert_eq!(decode_bytes("café".as_bytes(), Some("iso-8859-1")), "café");
    }

    #[test]
    fn test_html_to_text_basic() {
        assert_eq!(html_to_text("<p>B</p>", 80).as_deref(), Some("B"));
        let text = html_to_text(
            "<html><body><p>Hello <b>world</b></p><p>Second paragraph</p></body></html>",
            80,
        )
        .expect("text");
        assert_eq!(text, "Hello world Second paragraph");
    }

    #[test]
    fn test_html_to_text_empty_is_none() {
        assert_eq!(html_to_text("", 80), None);
        assert_eq!(html_to_text("   \n", 80), None);
        assert_eq!(html_to_text("<html><body></body></html>", 80), None);
    }

    #[test]
    fn test_html_to_text_entities() {
        assert_eq!(
            html_to_text("Tom &amp; Jerry", 80).as_deref(),
            Some("Tom & Jerry")
        );
    }
}

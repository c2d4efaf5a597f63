//! MIME part tree produced by the MIME adapter.
//!
//! Every record is converted into a [`MimeNode`] tree once; classification
//! only ever looks at [`LeafPart`]s, never at `mail-parser` types.

/// Sentinel reported when a content type or transfer encoding is unknown.
pub const NOT_AVAILABLE: &str = "NA";

/// A node of the MIME structure of one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimeNode {
    /// A part with no further nesting.
    Leaf(LeafPart),

    /// A `multipart/*` part and its children, in document order.
    Multipart {
        content_type: String,
        encoding: String,
        parts: Vec<MimeNode>,
    },

    /// A nested collection without metadata of its own (the payload of an
    /// embedded `message/rfc822` part).
    Sequence(Vec<MimeNode>),
}

/// The unit that gets classified and converted to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafPart {
    /// A bare payload with no content type or encoding attached.
    RawText(String),

    /// A part carrying its own metadata.
    Typed {
        /// Lowercased `type/subtype`.
        content_type: String,
        /// `Content-Transfer-Encoding` value, or [`NOT_AVAILABLE`].
        encoding: String,
        /// Raw, undecoded body.
        payload: String,
    },
}

impl MimeNode {
    /// `true` for nodes whose payload is a sequence of sub-parts.
    pub fn is_multipart(&self) -> bool {
        !matches!(self, MimeNode::Leaf(_))
    }

    /// Child nodes; empty for a leaf.
    pub fn children(&self) -> &[MimeNode] {
        match self {
            MimeNode::Leaf(_) => &[],
            MimeNode::Multipart { parts, .. } => parts,
            MimeNode::Sequence(nodes) => nodes,
        }
    }
}

impl LeafPart {
    /// Content type as reported in the extracted record.
    pub fn content_type(&self) -> &str {
        match self {
            LeafPart::RawText(_) => NOT_AVAILABLE,
            LeafPart::Typed { content_type, .. } => content_type,
        }
    }

    /// Transfer encoding as reported in the extracted record.
    pub fn encoding(&self) -> &str {
        match self {
            LeafPart::RawText(_) => NOT_AVAILABLE,
            LeafPart::Typed { encoding, .. } => encoding,
        }
    }

    /// The raw payload.
    pub fn payload(&self) -> &str {
        match self {
            LeafPart::RawText(text) => text,
            LeafPart::Typed { payload, .. } => payload,
        }
    }
}

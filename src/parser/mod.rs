//! Email parsing: MBOX streaming reader, header lookup, MIME structure and flattening.

pub mod flatten;
pub mod header;
pub mod mbox;
pub mod mime;

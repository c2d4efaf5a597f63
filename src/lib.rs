//! `mboxdump` — print a one-line-per-message summary of an MBOX archive.
//!
//! This crate provides the core library for reading MBOX files, flattening
//! each message's MIME tree and extracting its headers and text parts.

pub mod config;
pub mod error;
pub mod extract;
pub mod model;
pub mod parser;
pub mod report;

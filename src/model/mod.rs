//! Core data model types: archive records, MIME part trees and extracted emails.

pub mod mail;
pub mod part;
pub mod record;

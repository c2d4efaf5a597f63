//! Streaming MBOX reader.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::ParsingConfig;
use crate::error::{MboxError, Result};
use crate::model::record::MailRecord;

/// Streaming MBOX reader.
///
/// Reads through the file line by line and yields one [`MailRecord`] per
/// message, in file order. The whole archive is never loaded in memory.
/// The reader is tolerant of:
///
/// - Mixed `\n` and `\r\n` line endings
/// - `From ` lines not preceded by a blank line (logs a warning)
/// - Garbage before the first separator (skipped, logs a warning)
/// - Truncated messages at EOF
/// - NUL bytes and other binary content in the body
/// - UTF-8 BOM at the start of the file
///
/// Body lines quoted as `>From `, `>>From `, … lose one level of quoting.
pub struct MboxReader {
    path: PathBuf,
    file_size: u64,
    reader: BufReader<File>,
    max_message_size: usize,
    offset: u64,
    sequence: u64,
    pending: Option<PendingMessage>,
    line_buf: Vec<u8>,
    prev_line_was_empty: bool,
    first_line: bool,
    warned_preamble: bool,
    done: bool,
}

/// A message whose end has not been seen yet.
struct PendingMessage {
    offset: u64,
    separator: String,
    contents: Vec<u8>,
    truncated: bool,
}

impl MboxReader {
    /// Open an MBOX file for reading.
    ///
    /// Verifies that the file exists and is readable, but does NOT validate
    /// that it is actually an MBOX.
    pub fn open(path: impl AsRef<Path>, config: &ParsingConfig) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = std::fs::metadata(&path).map_err(|e| MboxError::io(&path, e))?;
        let file = File::open(&path).map_err(|e| MboxError::io(&path, e))?;
        debug!(path = %path.display(), size = metadata.len(), "Opened MBOX");

        Ok(Self {
            path,
            file_size: metadata.len(),
            reader: BufReader::with_capacity(config.read_buffer_size.max(4096), file),
            max_message_size: config.max_message_size,
            offset: 0,
            sequence: 0,
            pending: None,
            line_buf: Vec::with_capacity(4096),
            prev_line_was_empty: true,
            first_line: true,
            warned_preamble: false,
            done: false,
        })
    }

    /// Total size of the underlying file in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    /// Path to the MBOX file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Turn a finished message into a record with the next sequence number.
    fn finish(&mut self, pending: PendingMessage) -> MailRecord {
        let record = MailRecord {
            sequence: self.sequence,
            offset: pending.offset,
            separator: pending.separator,
            contents: pending.contents,
        };
        self.sequence += 1;
        record
    }

    /// Append a body line to the pending message, honoring the size limit.
    ///
    /// The first line that does not fit ends the message: it and every
    /// later line up to the next separator are dropped.
    fn append_line(&mut self, line_offset: u64) {
        let Some(pending) = self.pending.as_mut() else {
            if !is_blank_line(&self.line_buf) && !self.warned_preamble {
                warn!(
                    offset = line_offset,
                    "Skipping content before the first 'From ' separator"
                );
                self.warned_preamble = true;
            }
            return;
        };

        if pending.truncated {
            return;
        }

        let line = unquote_from_line(&self.line_buf);
        if pending.contents.len() + line.len() <= self.max_message_size {
            pending.contents.extend_from_slice(line);
        } else {
            warn!(
                offset = pending.offset,
                limit = self.max_message_size,
                "Message exceeds maximum size, truncating"
            );
            pending.truncated = true;
        }
    }
}

impl Iterator for MboxReader {
    type Item = Result<MailRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.line_buf.clear();
            let line_len = match self.reader.read_until(b'\n', &mut self.line_buf) {
                Ok(n) => n,
                Err(e) => {
                    self.done = true;
                    return Some(Err(MboxError::io(&self.path, e)));
                }
            };

            if line_len == 0 {
                // EOF: flush the last message
                self.done = true;
                let last = self.pending.take()?;
                return Some(Ok(self.finish(last)));
            }

            let line_offset = self.offset;
            self.offset += line_len as u64;

            if self.first_line && self.line_buf.starts_with(UTF8_BOM) {
                self.line_buf.drain(..UTF8_BOM.len());
            }

            let is_separator = is_mbox_separator(&self.line_buf);
            let was_empty = self.prev_line_was_empty;
            let was_first = self.first_line;
            self.prev_line_was_empty = is_blank_line(&self.line_buf);
            self.first_line = false;

            if is_separator {
                if !was_first && !was_empty {
                    warn!(
                        offset = line_offset,
                        "Found 'From ' separator without preceding blank line"
                    );
                }
                let started = PendingMessage {
                    offset: line_offset,
                    separator: separator_text(&self.line_buf),
                    contents: Vec::with_capacity(64 * 1024),
                    truncated: false,
                };
                if let Some(finished) = self.pending.replace(started) {
                    return Some(Ok(self.finish(finished)));
                }
            } else {
                self.append_line(line_offset);
            }
        }
    }
}

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Check whether a line is an MBOX separator (`From ` at the start).
fn is_mbox_separator(line: &[u8]) -> bool {
    line.starts_with(b"From ")
}

/// Check whether a line is blank (empty or only whitespace / CR / LF).
fn is_blank_line(line: &[u8]) -> bool {
    line.iter()
        .all(|&b| b == b'\n' || b == b'\r' || b == b' ' || b == b'\t')
}

/// Remove one level of `>` quoting from a `>From ` body line (mboxrd).
fn unquote_from_line(line: &[u8]) -> &[u8] {
    let quotes = line.iter().take_while(|&&b| b == b'>').count();
    if quotes > 0 && line[quotes..].starts_with(b"From ") {
        &line[1..]
    } else {
        line
    }
}

/// The separator line as text, without its line terminator.
fn separator_text(line: &[u8]) -> String {
    String::from_utf8_lossy(line)
        .trim_end_matches(['\r', '\n'])
        .to_string()
}

//! Summary report: one three-line block per message.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};

use crate::config::{Config, ReportConfig};
use crate::error::Result;
use crate::extract::{ExtractOptions, MessageExtractor};
use crate::model::mail::ExtractedEmail;
use crate::parser::mbox::MboxReader;

/// Format the summary block for one message (no trailing newline).
///
/// ```text
/// Email <index> from <from> to <to>
/// \t<subject>
/// \t<date>
/// ```
///
/// Missing headers render as `placeholder`.
pub fn format_summary(index: u64, email: &ExtractedEmail, placeholder: &str) -> String {
    let show = |value: &Option<String>| value.as_deref().unwrap_or(placeholder).to_string();
    format!(
        "Email {index} from {} to {}\n\t{}\n\t{}",
        show(&email.from),
        show(&email.to),
        show(&email.subject),
        show(&email.date),
    )
}

/// Write the summary block for one message, followed by the JSON record
/// when `dump_records` is enabled.
pub fn write_report(
    out: &mut dyn Write,
    index: u64,
    email: &ExtractedEmail,
    config: &ReportConfig,
) -> Result<()> {
    writeln!(
        out,
        "{}",
        format_summary(index, email, &config.null_placeholder)
    )?;
    if config.dump_records {
        let json = serde_json::to_string_pretty(email).map_err(std::io::Error::other)?;
        writeln!(out, "{json}")?;
    }
    Ok(())
}

/// Read every message of the archive in order and write its report.
///
/// Returns the number of messages processed. The first error aborts the run.
pub fn run(path: &Path, config: &Config, out: &mut dyn Write) -> Result<u64> {
    let reader = MboxReader::open(path, &config.parsing)?;
    let options = ExtractOptions::from(&config.parsing);
    info!(path = %reader.path().display(), size = reader.file_size(), "Reading MBOX");

    let mut count = 0;
    for record in reader {
        let record = record?;
        let email = MessageExtractor::new(&record, options).parse_email();
        debug!(
            sequence = record.sequence,
            offset = record.offset,
            parts = email.text.len(),
            "Processed message"
        );
        write_report(out, record.sequence, &email, &config.report)?;
        count += 1;
    }

    out.flush()?;
    info!(messages = count, "Done");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::mail::PartText;

    fn email() -> ExtractedEmail {
        ExtractedEmail {
            labels: Some("Inbox".into()),
            date: Some("Mon, 1 Jan 2024".into()),
            from: Some("a@x.com".into()),
            to: Some("b@x.com".into()),
            subject: Some("Hi".into()),
            text: vec![PartText::new("text/plain", "NA", Some("hello".into()))],
        }
    }

    #[test]
    fn test_format_summary() {
        assert_eq!(
            format_summary(0, &email(), "None"),
            "Email 0 from a@x.com to b@x.com\n\tHi\n\tMon, 1 Jan 2024"
        );
    }

    #[test]
    fn test_format_summary_missing_headers() {
        let mut email = email();
        email.subject = None;
        email.to = None;
        assert_eq!(
            format_summary(7, &email, "None"),
            "Email 7 from a@x.com to None\n\tNone\n\tMon, 1 Jan 2024"
        );
    }

    #[test]
    fn test_write_report_with_dump() {
        let config = ReportConfig {
            dump_records: true,
            ..ReportConfig::default()
        };
        let mut out = Vec::new();
        write_report(&mut out, 0, &email(), &config).expect("write");
        let text = String::from_utf8(out).expect("utf8");
        let (summary, json) = text.split_once("\n{").expect("json follows summary");
        assert_eq!(summary, "Email 0 from a@x.com to b@x.com\n\tHi\n\tMon, 1 Jan 2024");
        let value: serde_json::Value =
            serde_json::from_str(&format!("{{{json}")).expect("valid json");
        assert_eq!(value["labels"], "Inbox");
        assert_eq!(value["text"][0]["content_type"], "text/plain");
        assert_eq!(value["text"][0]["text"], "hello");
    }

    #[test]
    fn test_write_report_without_dump() {
        let mut out = Vec::new();
        write_report(&mut out, 2, &email(), &ReportConfig::default()).expect("write");
        assert_eq!(
            String::from_utf8(out).expect("utf8"),
            "Email 2 from a@x.com to b@x.com\n\tHi\n\tMon, 1 Jan 2024\n"
        );
    }
}

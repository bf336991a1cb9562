use std::fmt::Write;

use crate::request::Request;

/// Fixed institutional header line, printed at the top of every receipt.
pub const RECEIPT_HEADER: &str = "Consulate General - Civil Registry - Birth Certificate Request";

/// Renders a stored request into a downloadable artifact.
///
/// Rendering is a pure formatting concern; the only contract is that the
/// output carries the header, the display name, the tracking number, and the
/// submission timestamp. Additional formats (e.g. PDF) plug in by
/// implementing this trait externally.
pub trait ReceiptWriter {
    /// File extension without the dot, e.g. `"txt"`.
    fn file_extension(&self) -> &'static str;

    /// Renders the receipt body.
    fn write_receipt(&self, request: &Request) -> String;

    /// Suggested download filename, derived from the display name with
    /// path-unsafe characters stripped.
    fn file_name(&self, request: &Request) -> String {
        receipt_file_name(&request.display_name, self.file_extension())
    }
}

/// The plain-text receipt variant.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextReceipt;

impl ReceiptWriter for PlainTextReceipt {
    fn file_extension(&self) -> &'static str {
        "txt"
    }

    fn write_receipt(&self, request: &Request) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{RECEIPT_HEADER}");
        let _ = writeln!(out);
        let _ = writeln!(out, "Name:            {}", request.display_name);
        let _ = writeln!(out, "Tracking number: {}", request.id);
        let _ = writeln!(out, "Status:          {}", request.status);
        let _ = writeln!(
            out,
            "Submitted:       {}",
            humantime::format_rfc3339_millis(request.created_at())
        );
        if let Some(notes) = &request.notes {
            let _ = writeln!(out, "Notes:           {notes}");
        }
        out
    }
}

/// The spreadsheet receipt variant: a header row plus one data row.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvReceipt;

impl ReceiptWriter for CsvReceipt {
    fn file_extension(&self) -> &'static str {
        "csv"
    }

    fn write_receipt(&self, request: &Request) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", csv_field(RECEIPT_HEADER));
        let _ = writeln!(out, "name,tracking_number,status,submitted,notes");
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&request.display_name),
            request.id,
            request.status,
            humantime::format_rfc3339_millis(request.created_at()),
            csv_field(request.notes.as_deref().unwrap_or("")),
        );
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

/// Derives a download filename from a display name.
///
/// Path separators, shell-hostile punctuation, and control characters are
/// dropped; runs of whitespace become a single `_`; leading dots are stripped
/// so the name can never be a dotfile or a traversal. An empty result falls
/// back to `"receipt"`.
///
/// # Example
///
/// ```
/// use tracknum::receipt_file_name;
///
/// assert_eq!(receipt_file_name("Jane Doe", "txt"), "Jane_Doe.txt");
/// assert_eq!(receipt_file_name("../../etc", "txt"), "etc.txt");
/// ```
pub fn receipt_file_name(display_name: &str, extension: &str) -> String {
    let mut stem = String::with_capacity(display_name.len());
    let mut pending_gap = false;

    for ch in display_name.trim().chars() {
        if ch.is_whitespace() {
            pending_gap = !stem.is_empty();
            continue;
        }
        if ch.is_control() || matches!(ch, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|') {
            continue;
        }
        if pending_gap {
            stem.push('_');
            pending_gap = false;
        }
        stem.push(ch);
    }

    let stem = stem.trim_start_matches('.');
    if stem.is_empty() {
        format!("receipt.{extension}")
    } else {
        format!("{stem}.{extension}")
    }
}

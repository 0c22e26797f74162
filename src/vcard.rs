//! # vCard Module
//!
//! Renders `(name, phone)` pairs into vCard 3.0 records and, inversely,
//! extracts contacts from vCard text.
//!
//! The rendered record shape is byte-exact — real vCard readers depend on the
//! literal keywords and field order, so the template is never reformatted.

use tracing::debug;

use crate::errors::PipelineError;
use crate::phone::normalize;

/// Render one contact into a vCard 3.0 record.
///
/// The phone is normalized to start with `+`. Each record ends with a
/// newline so records concatenate directly into a document body.
pub fn render(name: &str, phone: &str) -> String {
    format!(
        "BEGIN:VCARD\nVERSION:3.0\nFN:{}\nTEL;TYPE=CELL:{}\nEND:VCARD\n",
        name,
        normalize(phone)
    )
}

/// Extract contacts from vCard text, one output line per contact found.
///
/// Scans line by line: `FN:` sets the pending name, any `TEL`-prefixed line
/// yields the substring after its last `:` as the phone. A non-empty phone
/// emits `"{name} - {phone}"` when `include_name` is set and a name is
/// pending, otherwise the phone alone, then clears both for the next card.
/// A `TEL` line with no preceding `FN:` still emits phone-only.
///
/// Zero extractable phones is an `EmptyResult`, never an empty list.
pub fn extract(vcard_text: &str, include_name: bool) -> Result<Vec<String>, PipelineError> {
    let mut lines = Vec::new();
    let mut name: Option<String> = None;

    for line in vcard_text.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("FN:") {
            name = Some(value.to_string());
        } else if line.starts_with("TEL") {
            let phone = line.rsplit(':').next().unwrap_or_default();
            if !phone.is_empty() {
                match name.take() {
                    Some(pending) if include_name => lines.push(format!("{pending} - {phone}")),
                    _ => lines.push(phone.to_string()),
                }
            }
        }
    }

    if lines.is_empty() {
        return Err(PipelineError::EmptyResult);
    }

    debug!(contacts = lines.len(), "Extracted contacts from vCard text");
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_exact_template() {
        let record = render("Alice 1", "+15551234567");
        assert_eq!(
            record,
            "BEGIN:VCARD\nVERSION:3.0\nFN:Alice 1\nTEL;TYPE=CELL:+15551234567\nEND:VCARD\n"
        );
    }

    #[test]
    fn test_render_normalizes_phone() {
        let record = render("Bob 1", "15551234567");
        assert!(record.contains("TEL;TYPE=CELL:+15551234567"));
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let record = render("Alice 1", "+15551234567");
        let lines = extract(&record, true).unwrap();
        assert_eq!(lines, vec!["Alice 1 - +15551234567"]);
    }

    #[test]
    fn test_extract_number_only() {
        let record = render("Alice 1", "+15551234567");
        let lines = extract(&record, false).unwrap();
        assert_eq!(lines, vec!["+15551234567"]);
    }

    #[test]
    fn test_extract_tel_without_name_emits_phone_only() {
        let text = "BEGIN:VCARD\nTEL;TYPE=CELL:+15551234567\nEND:VCARD\n";
        let lines = extract(text, true).unwrap();
        assert_eq!(lines, vec!["+15551234567"]);
    }

    #[test]
    fn test_extract_multiple_cards_in_order() {
        let text = format!(
            "{}{}",
            render("Alice 1", "+15551110001"),
            render("Alice 2", "+15551110002")
        );
        let lines = extract(&text, true).unwrap();
        assert_eq!(
            lines,
            vec!["Alice 1 - +15551110001", "Alice 2 - +15551110002"]
        );
    }

    #[test]
    fn test_extract_no_tel_lines_is_empty_result() {
        let text = "BEGIN:VCARD\nVERSION:3.0\nFN:Nobody\nEND:VCARD\n";
        assert_eq!(extract(text, true).unwrap_err(), PipelineError::EmptyResult);
    }

    #[test]
    fn test_name_resets_between_cards() {
        // Second card has no FN, so it must not inherit the first card's name
        let text = "FN:Alice\nTEL:+15551110001\nTEL:+15551110002\n";
        let lines = extract(text, true).unwrap();
        assert_eq!(lines, vec!["Alice - +15551110001", "+15551110002"]);
    }

    #[test]
    fn test_phone_taken_after_last_colon() {
        let text = "TEL;TYPE=CELL;VALUE=uri:+15551234567\n";
        let lines = extract(text, false).unwrap();
        assert_eq!(lines, vec!["+15551234567"]);
    }
}

use vcfbot::errors::PipelineError;
use vcfbot::pipeline::extract_to_text;
use vcfbot::vcard::{extract, render};

/// The rendered record is byte-exact; real vCard readers depend on the shape.
#[test]
fn test_record_template_is_byte_exact() {
    assert_eq!(
        render("Alice 1", "+15551234567"),
        "BEGIN:VCARD\n\
         VERSION:3.0\n\
         FN:Alice 1\n\
         TEL;TYPE=CELL:+15551234567\n\
         END:VCARD\n"
    );
}

/// Encode then decode with names yields "name - phone".
#[test]
fn test_encode_decode_round_trip_with_name() {
    let record = render("Alice 1", "+15551234567");
    assert_eq!(
        extract(&record, true).unwrap(),
        vec!["Alice 1 - +15551234567"]
    );
}

/// Emission order follows document order across many cards.
#[test]
fn test_extraction_preserves_document_order() {
    let text: String = (1..=5)
        .map(|i| render(&format!("C {i}"), &format!("+1555000000{i}")))
        .collect();

    let lines = extract(&text, false).unwrap();
    assert_eq!(
        lines,
        vec![
            "+15550000001",
            "+15550000002",
            "+15550000003",
            "+15550000004",
            "+15550000005"
        ]
    );
}

/// Cards missing FN still emit their phone, even when names were requested.
#[test]
fn test_nameless_card_falls_back_to_phone_only() {
    let text = "BEGIN:VCARD\nVERSION:3.0\nTEL;TYPE=CELL:+15551234567\nEND:VCARD\n";
    assert_eq!(extract(text, true).unwrap(), vec!["+15551234567"]);
}

/// A vCard with no TEL lines is an explicit empty result.
#[test]
fn test_no_tel_lines_is_empty_result() {
    let text = "BEGIN:VCARD\nVERSION:3.0\nFN:Nobody\nEND:VCARD\n";
    assert_eq!(extract(text, true).unwrap_err(), PipelineError::EmptyResult);
    assert_eq!(
        extract_to_text(text, true).unwrap_err(),
        PipelineError::EmptyResult
    );
}

/// extract_to_text joins lines with newlines, no trailing newline.
#[test]
fn test_extract_to_text_join() {
    let text = format!(
        "{}{}",
        render("A", "+15550000001"),
        render("B", "+15550000002")
    );
    assert_eq!(
        extract_to_text(&text, true).unwrap(),
        "A - +15550000001\nB - +15550000002"
    );
}

/// TEL parameter lists are tolerated; the phone is taken after the last colon.
#[test]
fn test_tel_variants() {
    let text = "TEL;TYPE=HOME;VALUE=uri:tel:+15551234567\nTEL:+15559876543\n";
    assert_eq!(
        extract(text, false).unwrap(),
        vec!["+15551234567", "+15559876543"]
    );
}

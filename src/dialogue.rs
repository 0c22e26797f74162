//! vCard dialogue module for handling conversation state with users.
//!
//! Both conversational forms are linear: the forward form collects filename →
//! contact-naming plan → chunk size → start number → input source → numbers,
//! the reverse form collects an output format → a `.vcf` upload. `/cancel`
//! exits from every state.

use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

use crate::plan::ContactPlan;

/// Represents the conversation state for the vCard forms
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum VcfDialogueState {
    #[default]
    Start,
    // Forward form: numbers -> .vcf files
    WaitingForFilename,
    WaitingForContactName {
        base_name: String,
    },
    WaitingForChunkSize {
        base_name: String,
        plan: ContactPlan,
    },
    WaitingForStartNumber {
        base_name: String,
        plan: ContactPlan,
        chunk_size: usize,
    },
    WaitingForInputMethod {
        base_name: String,
        plan: ContactPlan,
        chunk_size: usize,
        start_index: usize,
    },
    WaitingForNumbers {
        base_name: String,
        plan: ContactPlan,
        chunk_size: usize,
        start_index: usize,
        /// Numbers arrive as an uploaded `.txt` instead of a text message
        from_file: bool,
    },
    // Reverse form: .vcf file -> plain text
    WaitingForVcfOption,
    WaitingForVcfFile {
        include_name: bool,
    },
}

/// Type alias for our vCard dialogue
pub type VcfDialogue = Dialogue<VcfDialogueState, InMemStorage<VcfDialogueState>>;

/// Validates a base filename input
pub fn validate_filename(name: &str) -> Result<String, &'static str> {
    let trimmed = name.trim().trim_end_matches(".vcf").trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.len() > 100 {
        return Err("too_long");
    }

    if trimmed.contains(['/', '\\', ':']) {
        return Err("bad_chars");
    }

    Ok(trimmed.to_string())
}

/// Parses a chunk size input, bounded to keep single documents deliverable
pub fn parse_chunk_size(input: &str, max: usize) -> Result<usize, &'static str> {
    match input.trim().parse::<usize>() {
        Ok(0) => Err("zero"),
        Ok(size) if size > max => Err("too_large"),
        Ok(size) => Ok(size),
        Err(_) => Err("not_a_number"),
    }
}

/// Parses the starting filename suffix; rejects negatives and garbage
pub fn parse_start_index(input: &str) -> Result<usize, &'static str> {
    let trimmed = input.trim();
    if trimmed.starts_with('-') {
        return Err("negative");
    }
    trimmed.parse::<usize>().map_err(|_| "not_a_number")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_validation() {
        // Valid names
        assert_eq!(validate_filename("contacts").unwrap(), "contacts");
        assert_eq!(validate_filename("  my batch  ").unwrap(), "my batch");
        // Extension is stripped, the chunker adds it back per document
        assert_eq!(validate_filename("contacts.vcf").unwrap(), "contacts");

        // Invalid names
        assert!(validate_filename("").is_err());
        assert!(validate_filename("   ").is_err());
        assert!(validate_filename(".vcf").is_err());
        assert!(validate_filename("a/b").is_err());
        assert!(validate_filename(&"a".repeat(101)).is_err());
    }

    #[test]
    fn test_chunk_size_parsing() {
        assert_eq!(parse_chunk_size("100", 1000).unwrap(), 100);
        assert_eq!(parse_chunk_size(" 1 ", 1000).unwrap(), 1);

        assert_eq!(parse_chunk_size("0", 1000).unwrap_err(), "zero");
        assert_eq!(parse_chunk_size("1001", 1000).unwrap_err(), "too_large");
        assert_eq!(parse_chunk_size("ten", 1000).unwrap_err(), "not_a_number");
        assert_eq!(parse_chunk_size("-5", 1000).unwrap_err(), "not_a_number");
    }

    #[test]
    fn test_start_index_parsing() {
        assert_eq!(parse_start_index("1").unwrap(), 1);
        assert_eq!(parse_start_index(" 0 ").unwrap(), 0);

        assert_eq!(parse_start_index("-1").unwrap_err(), "negative");
        assert_eq!(parse_start_index("one").unwrap_err(), "not_a_number");
    }

    #[test]
    fn test_default_state_is_start() {
        assert!(matches!(
            VcfDialogueState::default(),
            VcfDialogueState::Start
        ));
    }
}

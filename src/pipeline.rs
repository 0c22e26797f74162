//! # Pipeline Module
//!
//! Ties the stages together in both directions: numbers → validated →
//! named → rendered → chunked → (maybe) archived, and vCard text → extracted
//! contact lines. Both directions are total functions over their inputs; a
//! failed request never produces partial output.

use tracing::{debug, info};

use crate::archive::{maybe_pack, Delivery};
use crate::chunker::chunk;
use crate::errors::PipelineError;
use crate::phone::{filter_valid, Strictness};
use crate::plan::{ContactAllocator, ContactPlan};
use crate::vcard;

/// Everything the conversational form collects for one generation run
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// Base filename without extension
    pub base_name: String,
    /// Naming plan for generated contacts
    pub plan: ContactPlan,
    /// Maximum records per output document
    pub chunk_size: usize,
    /// Filename suffix of the first document
    pub start_index: usize,
    /// Raw candidate numbers, one per line
    pub raw_numbers: String,
    /// Validation strictness for the candidates
    pub strictness: Strictness,
    /// Document count above which output is archived
    pub archive_threshold: usize,
}

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct GenerateOutcome {
    pub delivery: Delivery,
    pub contact_count: usize,
    pub document_count: usize,
}

/// Run the forward pipeline.
///
/// Validates parameters up front (`InvalidInput`), filters the candidate
/// numbers, assigns display names from the plan, renders and chunks the
/// records, and packs the documents into an archive when the batch is large.
/// An empty post-validation number list is an `EmptyResult`.
pub fn generate(request: &GenerateRequest) -> Result<GenerateOutcome, PipelineError> {
    if request.base_name.trim().is_empty() {
        return Err(PipelineError::InvalidInput(
            "filename must not be empty".to_string(),
        ));
    }
    if request.chunk_size < 1 {
        return Err(PipelineError::InvalidInput(
            "chunk size must be at least 1".to_string(),
        ));
    }

    let numbers = filter_valid(&request.raw_numbers, request.strictness);
    if numbers.is_empty() {
        return Err(PipelineError::EmptyResult);
    }
    debug!(valid = numbers.len(), "Validated candidate numbers");

    let mut allocator = ContactAllocator::new(request.plan.clone());
    let records: Vec<String> = numbers
        .iter()
        .map(|phone| {
            let assignment = allocator.next_assignment();
            vcard::render(&assignment.display_name(), phone)
        })
        .collect();

    let documents = chunk(
        &records,
        request.chunk_size,
        &request.base_name,
        request.start_index,
    );
    let document_count = documents.len();

    let delivery = maybe_pack(documents, &request.base_name, request.archive_threshold)
        .map_err(|e| PipelineError::InvalidInput(e.to_string()))?;

    info!(
        contacts = records.len(),
        documents = document_count,
        archived = matches!(delivery, Delivery::Archive { .. }),
        "Generation pipeline completed"
    );

    Ok(GenerateOutcome {
        delivery,
        contact_count: records.len(),
        document_count,
    })
}

/// Run the reverse pipeline: vCard text to a newline-joined contact listing.
pub fn extract_to_text(vcard_text: &str, include_name: bool) -> Result<String, PipelineError> {
    let lines = vcard::extract(vcard_text, include_name)?;
    Ok(lines.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::OutputDocument;

    fn request(raw_numbers: &str) -> GenerateRequest {
        GenerateRequest {
            base_name: "contacts".to_string(),
            plan: ContactPlan::parse("Contact").unwrap(),
            chunk_size: 2,
            start_index: 1,
            raw_numbers: raw_numbers.to_string(),
            strictness: Strictness::Strict,
            archive_threshold: 500,
        }
    }

    fn files(delivery: Delivery) -> Vec<OutputDocument> {
        match delivery {
            Delivery::Files(documents) => documents,
            other => panic!("expected individual files, got {other:?}"),
        }
    }

    #[test]
    fn test_generate_end_to_end() {
        let outcome = generate(&request("+14155552671\n+442071838750\n+14155552672")).unwrap();
        assert_eq!(outcome.contact_count, 3);
        assert_eq!(outcome.document_count, 2);

        let documents = files(outcome.delivery);
        assert_eq!(documents[0].filename, "contacts_1.vcf");
        assert!(documents[0].body.contains("FN:Contact 1"));
        assert!(documents[0].body.contains("FN:Contact 2"));
        assert!(documents[1].body.contains("FN:Contact 3"));
    }

    #[test]
    fn test_invalid_lines_are_filtered_not_fatal() {
        let outcome = generate(&request("garbage\n+14155552671")).unwrap();
        assert_eq!(outcome.contact_count, 1);
    }

    #[test]
    fn test_no_valid_numbers_is_empty_result() {
        assert_eq!(
            generate(&request("garbage")).unwrap_err(),
            PipelineError::EmptyResult
        );
        assert_eq!(
            generate(&request("")).unwrap_err(),
            PipelineError::EmptyResult
        );
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let mut req = request("+14155552671");
        req.chunk_size = 0;
        assert!(matches!(
            generate(&req),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_empty_base_name_rejected() {
        let mut req = request("+14155552671");
        req.base_name = "  ".to_string();
        assert!(matches!(
            generate(&req),
            Err(PipelineError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_large_batch_is_archived() {
        let mut req = request("+14155552671\n+442071838750");
        req.chunk_size = 1;
        req.archive_threshold = 1;
        let outcome = generate(&req).unwrap();
        assert_eq!(outcome.document_count, 2);
        assert!(matches!(outcome.delivery, Delivery::Archive { .. }));
    }

    #[test]
    fn test_extract_to_text_joins_lines() {
        let text = format!(
            "{}{}",
            crate::vcard::render("Alice 1", "+15551110001"),
            crate::vcard::render("Alice 2", "+15551110002")
        );
        let joined = extract_to_text(&text, false).unwrap();
        assert_eq!(joined, "+15551110001\n+15551110002");
    }

    #[test]
    fn test_extract_to_text_empty_result() {
        assert_eq!(
            extract_to_text("nothing here", true).unwrap_err(),
            PipelineError::EmptyResult
        );
    }
}

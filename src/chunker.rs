//! # File Chunker Module
//!
//! Groups an ordered sequence of rendered vCard records into output documents
//! bounded by a maximum record count, assigning sequential filename suffixes.

use tracing::debug;

/// One output file destined for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDocument {
    /// Filename including extension, e.g. `contacts_3.vcf`
    pub filename: String,
    /// Concatenated rendered records
    pub body: String,
    /// Number of records in this document
    pub record_count: usize,
}

/// Group rendered records into documents of at most `chunk_size` records.
///
/// A document is flushed whenever it reaches `chunk_size` records; the final
/// remainder is flushed even when short. Filenames follow
/// `{base_name}_{index}.vcf` with the first document at exactly `start_index`.
///
/// Concatenating all bodies in order reproduces the input records unchanged.
pub fn chunk(
    records: &[String],
    chunk_size: usize,
    base_name: &str,
    start_index: usize,
) -> Vec<OutputDocument> {
    debug_assert!(chunk_size >= 1);

    let mut documents = Vec::with_capacity(records.len().div_ceil(chunk_size));
    let mut buffer = String::new();
    let mut buffered = 0;
    let mut file_index = start_index;

    for record in records {
        buffer.push_str(record);
        buffered += 1;

        if buffered == chunk_size {
            documents.push(OutputDocument {
                filename: format!("{base_name}_{file_index}.vcf"),
                body: std::mem::take(&mut buffer),
                record_count: buffered,
            });
            buffered = 0;
            file_index += 1;
        }
    }

    if buffered > 0 {
        documents.push(OutputDocument {
            filename: format!("{base_name}_{file_index}.vcf"),
            body: buffer,
            record_count: buffered,
        });
    }

    debug!(
        records = records.len(),
        chunk_size,
        documents = documents.len(),
        "Chunked records into documents"
    );
    documents
}

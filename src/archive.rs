//! # Archive Packer Module
//!
//! Large batches are bundled into a single zip archive instead of being
//! delivered as hundreds of individual documents. This is a delivery-batching
//! concern only: document contents are never altered.

use std::io::{Cursor, Write};

use anyhow::{Context, Result};
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::chunker::OutputDocument;

/// What gets handed to the transport for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Individual documents, sent one by one
    Files(Vec<OutputDocument>),
    /// One `{base}_all.zip` archive holding every document
    Archive { filename: String, bytes: Vec<u8> },
}

/// Bundle documents into a single archive when their count exceeds
/// `threshold`; pass them through unchanged otherwise.
pub fn maybe_pack(
    documents: Vec<OutputDocument>,
    base_name: &str,
    threshold: usize,
) -> Result<Delivery> {
    if documents.len() <= threshold {
        return Ok(Delivery::Files(documents));
    }

    let filename = format!("{base_name}_all.zip");
    info!(
        documents = documents.len(),
        threshold,
        archive = %filename,
        "Document count exceeds threshold, packing into archive"
    );

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for document in &documents {
        writer
            .start_file(document.filename.as_str(), options)
            .with_context(|| format!("Failed to add {} to archive", document.filename))?;
        writer
            .write_all(document.body.as_bytes())
            .with_context(|| format!("Failed to write {} into archive", document.filename))?;
    }

    let cursor = writer.finish().context("Failed to finalize archive")?;
    Ok(Delivery::Archive {
        filename,
        bytes: cursor.into_inner(),
    })
}

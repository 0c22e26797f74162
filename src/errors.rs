//! # Pipeline Error Types Module
//!
//! This module defines custom error types used throughout the vCard pipeline.
//! It provides structured error handling for parameter validation, contact-plan
//! parsing, and empty-result conditions.

/// Custom error types for pipeline operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Malformed numeric parameters or empty filename/label
    InvalidInput(String),
    /// Contact-plan string failed to parse; carries the offending fragment
    MalformedPlan(String),
    /// No valid phone numbers, or no extractable contacts in a vCard
    EmptyResult,
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            PipelineError::MalformedPlan(fragment) => {
                write!(f, "Malformed contact plan near: {fragment}")
            }
            PipelineError::EmptyResult => write!(f, "No contacts produced"),
        }
    }
}

impl std::error::Error for PipelineError {}

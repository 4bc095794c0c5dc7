//! Error types for the extraction pipeline
//!
//! These messages are user-visible: the store pipeline surfaces them
//! verbatim as field errors on the submission form.

use thiserror::Error;

/// Errors that can occur during extraction
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Model output was not a parseable JSON object
    #[error("The description could not be processed, please try rephrasing it")]
    InvalidModelResponse,

    /// No first name could be extracted
    #[error("A first name could not be found in the description")]
    FirstNameMissing,

    /// No last name could be extracted
    #[error("A last name could not be found in the description")]
    LastNameMissing,

    /// No address could be extracted
    #[error("An address could not be found in the description")]
    AddressMissing,

    /// Completion endpoint failure
    #[error("The description could not be processed right now, please try again later")]
    Llm(String),

    /// The LLM call exceeded the configured time budget
    #[error("Processing the description took too long, please try again later")]
    Timeout,

    /// Input exceeds the configured description bound
    #[error("Description too long: {0} chars (max: {1})")]
    DescriptionTooLong(usize, usize),
}

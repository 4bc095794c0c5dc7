//! Castlist Extractor
//!
//! Converts a free-text person description into a structured actor
//! record using an LLM.
//!
//! # Architecture
//!
//! ```text
//! Description → Prompt → CompletionClient → Parser/Validator → ActorDraft
//! ```
//!
//! # Key Features
//!
//! - **Deterministic prompting**: a fixed instruction template with the
//!   description interpolated verbatim
//! - **Strict response validation**: only a bare JSON object is accepted;
//!   mandatory fields are checked in a fixed order
//! - **Lenient optional fields**: unparseable height/weight/age/gender
//!   values become null instead of failing the submission
//! - **Timeout handling**: the LLM call is bounded and a timeout maps to
//!   a generic extraction failure
//!
//! # Example Usage
//!
//! ```no_run
//! use castlist_extractor::{Extractor, ExtractorConfig};
//! use castlist_llm::MockClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockClient::new(
//!     r#"{"first_name": "John", "last_name": "Doe", "address": "New York"}"#,
//! );
//! let extractor = Extractor::new(llm, ExtractorConfig::default());
//!
//! let draft = extractor
//!     .extract("John Doe lives in New York")
//!     .await?;
//!
//! assert_eq!(draft.first_name, "John");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod parser;
mod prompt;


pub use config::ExtractorConfig;
pub use error::ExtractionError;
pub use extractor::Extractor;
pub use parser::parse_actor_response;
pub use prompt::build_extraction_prompt;

// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]
#![allow(clippy::significant_drop_tightening)]

//! Job Posting Extractor
//!
//! Pulls job posting attributes out of free-form email text with ordered
//! regular-expression matching, scores how much was found, and optionally
//! defers the whole job to a remote AI extraction service.
//!
//! # Features
//!
//! - Email normalization (headers, signatures, quoted replies)
//! - Ordered, inspectable pattern lists per field
//! - Keyword defaults for job type and experience level
//! - Heuristic confidence score capped at 0.95
//! - Remote delegation with silent local fallback
//!
//! # Example
//!
//! ```rust
//! use job_extract::JobExtractor;
//!
//! let extractor = JobExtractor::local_only();
//! let result = extractor.extract_local(
//!     "We are hiring a Rust Engineer at Ferrous Systems in Austin, TX. Contact: jobs@ferrous.dev",
//! );
//!
//! assert_eq!(result.email.as_deref(), Some("jobs@ferrous.dev"));
//! assert_eq!(result.domain.as_deref(), Some("ferrous.dev"));
//! assert!(result.confidence_score > 0.5);
//! ```

mod config;
mod error;
mod extract;
mod normalize;
mod patterns;
mod pipeline;
mod remote;
mod score;
pub mod server;
mod types;

pub use config::ExtractorConfig;
pub use error::{ConfigError, ExtractError, RemoteError, Result};
pub use extract::*;
pub use normalize::{collapse_whitespace, normalize, strip_headers};
pub use patterns::{
    Capture, EMAIL_PATTERN, Field, FieldPattern, FieldPatterns, Gazetteer, KeywordDefault,
    PatternList, SKILL_VOCABULARY, US_STATE_CODES, canonical,
};
pub use pipeline::JobExtractor;
pub use remote::{
    AiServiceClient, DEFAULT_AI_SERVICE_URL, DEFAULT_TIMEOUT, Disabled, RemoteExtractor, delegate,
};
pub use score::{BASE_SCORE, MAX_SCORE, confidence_score, score_fields};
pub use types::*;

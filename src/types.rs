//! Core types for extracted job postings

use crate::error::RemoteError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Maximum number of skills kept on a result
pub const MAX_SKILLS: usize = 10;

/// Confidence assigned to every result produced by the remote service
pub const REMOTE_CONFIDENCE: f64 = 0.85;

/// Structured job posting attributes pulled out of free-form text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Job title (e.g., "Senior Python Developer")
    pub job_title: Option<String>,

    /// Hiring company
    pub company_name: Option<String>,

    /// Work location
    pub location: Option<String>,

    /// Skills in first-seen order, distinct, at most ten
    pub required_skills: Vec<String>,

    /// Salary range as it appeared in the text
    pub salary_range: Option<String>,

    /// Employment type (Full-time, Contract, ...)
    pub job_type: Option<String>,

    /// Seniority or years of experience
    pub experience_level: Option<String>,

    /// Heuristic score in `[0.0, 0.95]`
    pub confidence_score: f64,

    /// First email address in the text
    pub email: Option<String>,

    /// Domain part of `email`
    pub domain: Option<String>,

    /// When the result was computed
    pub extracted_at: DateTime<Utc>,
}

impl ExtractionResult {
    /// Number of job fields (excluding contact fields) that were found
    #[must_use]
    pub fn found_fields(&self) -> usize {
        [
            self.job_title.is_some(),
            self.company_name.is_some(),
            self.location.is_some(),
            !self.required_skills.is_empty(),
            self.salary_range.is_some(),
            self.job_type.is_some(),
            self.experience_level.is_some(),
        ]
        .into_iter()
        .filter(|found| *found)
        .count()
    }

    /// Check if no job field was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.found_fields() == 0
    }

    /// Compare two results ignoring `extracted_at`
    #[must_use]
    pub fn same_fields(&self, other: &Self) -> bool {
        Self {
            extracted_at: other.extracted_at,
            ..self.clone()
        } == *other
    }
}

/// Payload returned by the remote extraction service under `data`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteJobData {
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub location: Option<String>,
    pub required_skills: Option<Vec<String>>,

    /// Lower bound, number or string
    pub min_salary: Option<Value>,

    /// Upper bound, number or string
    pub max_salary: Option<Value>,

    pub job_type: Option<String>,
    pub seniority_level: Option<String>,
}

/// Outcome of the delegation step
#[derive(Debug)]
pub enum Delegation {
    /// The remote service produced the data
    Remote(RemoteJobData),

    /// The local pipeline has to run
    LocalFallback(FallbackReason),
}

impl Delegation {
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}

/// Why the local pipeline ran instead of the remote service
#[derive(Debug)]
pub struct FallbackReason(pub RemoteError);

impl FallbackReason {
    #[must_use]
    pub const fn error(&self) -> &RemoteError {
        &self.0
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<RemoteError> for FallbackReason {
    fn from(err: RemoteError) -> Self {
        Self(err)
    }
}

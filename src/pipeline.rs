//! Extraction orchestrator: remote delegation, then the local pipeline

use crate::config::ExtractorConfig;
use crate::error::{ExtractError, Result};
use crate::extract::{FieldExtractors, dedup_skills, domain_of};
use crate::normalize::normalize;
use crate::remote::{AiServiceClient, Disabled, RemoteExtractor, delegate};
use crate::score::score_fields;
use crate::types::{Delegation, ExtractionResult, REMOTE_CONFIDENCE, RemoteJobData};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns free-form text into an [`ExtractionResult`]
#[derive(Clone)]
pub struct JobExtractor {
    extractors: Arc<FieldExtractors>,
    remote: Arc<dyn RemoteExtractor>,
}

impl std::fmt::Debug for JobExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobExtractor")
            .field("extractors", &self.extractors)
            .finish_non_exhaustive()
    }
}

impl JobExtractor {
    /// Build from configuration; a missing service URL disables delegation
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let extractors = FieldExtractors::new(&config.gazetteer)?;

        let remote: Arc<dyn RemoteExtractor> = match &config.ai_service_url {
            Some(url) => Arc::new(
                AiServiceClient::new(url.clone(), config.ai_service_timeout)
                    .map_err(|e| ExtractError::Internal(e.to_string()))?,
            ),
            None => Arc::new(Disabled),
        };

        Ok(Self::with_remote(extractors, remote))
    }

    /// Extractor using `remote` as the delegation target
    #[must_use]
    pub fn with_remote(extractors: FieldExtractors, remote: Arc<dyn RemoteExtractor>) -> Self {
        Self {
            extractors: Arc::new(extractors),
            remote,
        }
    }

    /// Extractor that never calls out, using the default gazetteer
    #[must_use]
    pub fn local_only() -> Self {
        Self::with_remote(FieldExtractors::shared().clone(), Arc::new(Disabled))
    }

    #[must_use]
    pub fn extractors(&self) -> &FieldExtractors {
        &self.extractors
    }

    /// Extract job information from `text`.
    ///
    /// The remote service is tried once; on any failure the local pipeline
    /// runs instead. Only a local pipeline that fails to complete is an error.
    pub async fn extract_job_info(&self, text: &str) -> Result<ExtractionResult> {
        info!("Starting text extraction process");

        match delegate(self.remote.as_ref(), text).await {
            Delegation::Remote(data) => Ok(self.map_remote(data, text)),
            Delegation::LocalFallback(reason) => {
                debug!(reason = %reason, "Running local extraction");
                let extractors = Arc::clone(&self.extractors);
                let owned = text.to_string();

                let result = tokio::task::spawn_blocking(move || local(&extractors, &owned))
                    .await
                    .map_err(|e| ExtractError::Internal(e.to_string()))?;

                info!("Text extraction completed with fallback");
                Ok(result)
            }
        }
    }

    /// Run only the local pipeline: normalize, extract, score
    #[must_use]
    pub fn extract_local(&self, text: &str) -> ExtractionResult {
        local(&self.extractors, text)
    }

    /// Map a remote payload onto a result.
    ///
    /// Contact fields come from the original `text`, not from the payload.
    #[must_use]
    pub fn map_remote(&self, data: RemoteJobData, text: &str) -> ExtractionResult {
        let salary_range = match (
            data.min_salary.as_ref().and_then(salary_bound),
            data.max_salary.as_ref().and_then(salary_bound),
        ) {
            (Some(min), Some(max)) => Some(format!("{min}-{max}")),
            _ => None,
        };

        let email = self.extractors.email(text);
        let domain = email.as_deref().and_then(domain_of);

        ExtractionResult {
            job_title: clean(data.job_title),
            company_name: clean(data.company_name),
            location: clean(data.location),
            required_skills: dedup_skills(data.required_skills.unwrap_or_default()),
            salary_range,
            job_type: clean(data.job_type),
            experience_level: clean(data.seniority_level),
            confidence_score: REMOTE_CONFIDENCE,
            email,
            domain,
            extracted_at: Utc::now(),
        }
    }
}

fn local(extractors: &FieldExtractors, text: &str) -> ExtractionResult {
    let cleaned = normalize(text);
    let fields = extractors.extract_all(&cleaned);
    let confidence_score = score_fields(&fields, &cleaned);
    let email = extractors.email(&cleaned);
    let domain = email.as_deref().and_then(domain_of);

    ExtractionResult {
        job_title: fields.job_title,
        company_name: fields.company_name,
        location: fields.location,
        required_skills: fields.required_skills,
        salary_range: fields.salary_range,
        job_type: fields.job_type,
        experience_level: fields.experience_level,
        confidence_score,
        email,
        domain,
        extracted_at: Utc::now(),
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Numeric zero, blank strings and non-scalar bounds count as absent.
// Integral floats render without a fraction: `1e5` is "100000".
fn salary_bound(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        }
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                (i != 0).then(|| i.to_string())
            } else if let Some(u) = n.as_u64() {
                Some(u.to_string())
            } else {
                n.as_f64().filter(|f| *f != 0.0).map(|f| f.to_string())
            }
        }
        _ => None,
    }
}

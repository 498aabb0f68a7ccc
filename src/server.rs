//! HTTP surface over the extractor

use crate::pipeline::JobExtractor;
use crate::types::ExtractionResult;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Shared state of the HTTP handlers
#[derive(Debug, Clone)]
pub struct AppState {
    pub extractor: Arc<JobExtractor>,
}

/// Body of `POST /extract-text`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextRequest {
    #[serde(default)]
    pub text: Option<String>,

    /// Integer or integer string
    #[serde(default, deserialize_with = "user_id")]
    pub user_id: Option<i64>,
}

fn user_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Int(id)) => Ok(Some(id)),
        Some(Raw::Text(text)) => text
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("userId must be an integer, got {text:?}"))),
    }
}

/// Successful extraction envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractTextResponse {
    pub message: String,
    pub data: ExtractionResult,
}

/// One failed validation rule
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Error envelope
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ApiError {
    Validation {
        error: String,
        details: Vec<FieldError>,
    },
    Internal {
        error: String,
        details: String,
    },
}

impl ApiError {
    fn validation(field: &str, message: impl Into<String>) -> Self {
        Self::Validation {
            error: "Validation failed".into(),
            details: vec![FieldError {
                field: field.into(),
                message: message.into(),
            }],
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

/// Build the router
#[must_use]
pub fn build_app(extractor: JobExtractor) -> Router {
    let state = AppState {
        extractor: Arc::new(extractor),
    };

    Router::new()
        .route("/extract-text", post(extract_text_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Extract job information from a text body
pub async fn extract_text_handler(
    State(state): State<AppState>,
    payload: Result<Json<ExtractTextRequest>, JsonRejection>,
) -> Result<Json<ExtractTextResponse>, ApiError> {
    let Json(request) =
        payload.map_err(|rejection| ApiError::validation("body", rejection.body_text()))?;

    let text = match request.text {
        Some(text) if !text.is_empty() => text,
        _ => return Err(ApiError::validation("text", "Text content is required")),
    };

    let data = state
        .extractor
        .extract_job_info(&text)
        .await
        .map_err(|e| {
            error!(error = %e, "Text extraction error");
            ApiError::Internal {
                error: "Extraction failed".into(),
                details: e.to_string(),
            }
        })?;

    if let Some(user_id) = request.user_id {
        info!(user_id, domain = ?data.domain, "Extraction completed for user");
    }
    info!("Text extraction completed successfully");

    Ok(Json(ExtractTextResponse {
        message: "Extraction completed successfully".into(),
        data,
    }))
}

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        timestamp: Utc::now(),
    })
}

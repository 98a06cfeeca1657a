use crate::storage::{FeedbackRecord, XlsxStorage};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::error;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub feedback_store: Arc<RwLock<XlsxStorage>>,
}

/// Request to submit a feedback entry
#[derive(Debug, Deserialize)]
pub struct SubmitFeedbackRequest {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub topic: String,

    #[serde(default)]
    pub message: String,
}

/// Response after storing a feedback entry
#[derive(Debug, Serialize)]
pub struct SubmitFeedbackResponse {
    pub success: bool,
    pub message: String,
}

/// One feedback entry as returned by the list endpoint
#[derive(Debug, Serialize)]
pub struct FeedbackEntry {
    pub timestamp: String,
    pub name: String,
    pub topic: String,
    pub message: String,
}

impl From<FeedbackRecord> for FeedbackEntry {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            timestamp: record.timestamp,
            name: record.name,
            topic: record.topic,
            message: record.message,
        }
    }
}

/// Response from the list endpoint
#[derive(Debug, Serialize)]
pub struct ListFeedbackResponse {
    pub feedback: Vec<FeedbackEntry>,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl SubmitFeedbackRequest {
    /// Validate the request
    pub fn validate(&self) -> Result<(), String> {
        if self.message.trim().is_empty() {
            return Err("Message is required".to_string());
        }
        Ok(())
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Internal(String),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

use crate::api::models::*;
use crate::storage::FeedbackRecord;
use axum::{Json, extract::State, extract::rejection::JsonRejection};
use tracing::info;

pub async fn submit_feedback_handler(
    State(state): State<AppState>,
    payload: Result<Json<SubmitFeedbackRequest>, JsonRejection>,
) -> Result<Json<SubmitFeedbackResponse>, AppError> {
    // A missing or malformed body is a client error, same as a bad field
    let Json(request) = payload?;

    // Validate
    request.validate().map_err(AppError::BadRequest)?;

    let record = FeedbackRecord::new(&request.name, &request.topic, &request.message);
    info!(name = %record.name, topic = %record.topic, "Adding feedback");

    // Append under the write lock & persist
    {
        let mut store = state.feedback_store.write().await;
        store
            .append(&record)
            .map_err(|e| AppError::Internal(format!("Store feedback failed: {}", e)))?;
    }

    info!("Feedback added");

    Ok(Json(SubmitFeedbackResponse {
        success: true,
        message: "Feedback received and saved successfully".to_string(),
    }))
}

pub async fn list_feedback_handler(
    State(state): State<AppState>,
) -> Result<Json<ListFeedbackResponse>, AppError> {
    let records = {
        let store = state.feedback_store.read().await;
        store
            .list_all()
            .map_err(|e| AppError::Internal(format!("Read feedback failed: {}", e)))?
    };

    info!(count = records.len(), "Listed feedback");

    let feedback: Vec<FeedbackEntry> = records.into_iter().map(FeedbackEntry::from).collect();

    Ok(Json(ListFeedbackResponse { feedback }))
}

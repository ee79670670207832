//! Topic table endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{current_revision, error, respond, success, ApiResult};
use crate::errors::AppError;
use crate::models::{DeleteTopicsRequest, InsertOutcomeResponse, TopicEntity};
use crate::AppState;

/// GET /api/topics - List all stored topics in insertion order.
pub async fn list_topics(State(state): State<AppState>) -> ApiResult<Vec<TopicEntity>> {
    let revision_id = current_revision(&state).await;

    match state.topic_dao.get_one_off_topic_entities().await {
        Ok(topics) => success(topics, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/topics/{id} - Get a single topic.
pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TopicEntity> {
    let revision_id = current_revision(&state).await;

    match state.topic_dao.get_one_off_topic_entity(&id).await {
        Ok(Some(topic)) => success(topic, revision_id),
        Ok(None) => error(
            AppError::NotFound(format!("Topic {} not found", id)),
            revision_id,
        ),
        Err(e) => error(e, revision_id),
    }
}

/// POST /api/topics/insert-or-ignore - Insert topics whose id is not stored yet.
pub async fn insert_or_ignore_topics(
    State(state): State<AppState>,
    Json(topics): Json<Vec<TopicEntity>>,
) -> ApiResult<Vec<InsertOutcomeResponse>> {
    let revision_id = current_revision(&state).await;

    if let Err(e) = validate_topics(&topics) {
        return error(e, revision_id);
    }

    let result = state
        .topic_dao
        .insert_or_ignore_topics(&topics)
        .await
        .map(|outcomes| outcomes.into_iter().map(InsertOutcomeResponse::from).collect());

    respond(&state, result, revision_id).await
}

/// PUT /api/topics - Insert or fully replace topics.
pub async fn upsert_topics(
    State(state): State<AppState>,
    Json(topics): Json<Vec<TopicEntity>>,
) -> ApiResult<usize> {
    let revision_id = current_revision(&state).await;

    if let Err(e) = validate_topics(&topics) {
        return error(e, revision_id);
    }

    let result = state
        .topic_dao
        .upsert_topics(&topics)
        .await
        .map(|_| topics.len());

    respond(&state, result, revision_id).await
}

/// POST /api/topics/delete - Delete topics by id. Unknown ids are ignored.
pub async fn delete_topics(
    State(state): State<AppState>,
    Json(request): Json<DeleteTopicsRequest>,
) -> ApiResult<()> {
    let revision_id = current_revision(&state).await;
    let result = state.topic_dao.delete_topics(&request.ids).await;
    respond(&state, result, revision_id).await
}

fn validate_topics(topics: &[TopicEntity]) -> Result<(), AppError> {
    if let Some(topic) = topics.iter().find(|t| t.id.trim().is_empty()) {
        return Err(AppError::Validation(format!(
            "Topic id is required (topic named '{}')",
            topic.name
        )));
    }
    Ok(())
}

//! Followable topics and interests list endpoints.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{current_revision, error, success, ApiResult};
use crate::errors::AppError;
use crate::models::{FollowableTopic, InterestsItem, TopicSortField};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowableQuery {
    #[serde(default)]
    pub sort_by: Option<String>,
    #[serde(default)]
    pub selected_topic_id: Option<String>,
}

impl FollowableQuery {
    fn sort_field(&self) -> Result<TopicSortField, AppError> {
        match &self.sort_by {
            Some(raw) => raw.parse(),
            None => Ok(TopicSortField::default()),
        }
    }
}

async fn current_followable_topics(
    state: &AppState,
    query: &FollowableQuery,
) -> Result<Vec<FollowableTopic>, AppError> {
    let sort_by = query.sort_field()?;
    state
        .get_followable_topics
        .invoke(sort_by)
        .await
        .first()
        .await
}

/// GET /api/followable-topics?sortBy=name - Topics with their follow state.
pub async fn list_followable_topics(
    State(state): State<AppState>,
    Query(query): Query<FollowableQuery>,
) -> ApiResult<Vec<FollowableTopic>> {
    let revision_id = current_revision(&state).await;

    match current_followable_topics(&state, &query).await {
        Ok(topics) => success(topics, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/interests?sortBy=name&selectedTopicId=1 - Cards for the interests list.
pub async fn list_interests_items(
    State(state): State<AppState>,
    Query(query): Query<FollowableQuery>,
) -> ApiResult<Vec<InterestsItem>> {
    let revision_id = current_revision(&state).await;

    match current_followable_topics(&state, &query).await {
        Ok(topics) => {
            let selected = query.selected_topic_id.as_deref();
            let items = topics
                .iter()
                .map(|topic| InterestsItem::from_followable(topic, selected))
                .collect();
            success(items, revision_id)
        }
        Err(e) => error(e, revision_id),
    }
}

/// GET /api/interests/previews - Canonical card variants for previewing the list.
pub async fn list_interests_previews(
    State(state): State<AppState>,
) -> ApiResult<Vec<InterestsItem>> {
    let revision_id = current_revision(&state).await;
    let items = InterestsItem::previews()
        .into_iter()
        .map(|(_, item)| item)
        .collect();
    success(items, revision_id)
}

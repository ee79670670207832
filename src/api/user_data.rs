//! User preference endpoints.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{current_revision, error, respond, success, ApiResult};
use crate::data::UserDataRepository;
use crate::errors::AppError;
use crate::models::{
    SetBookmarkedRequest, SetFollowedRequest, SetFollowedTopicsRequest, SetViewedRequest,
    UpdatePreferencesRequest, UserData,
};
use crate::AppState;

async fn snapshot(repository: &dyn UserDataRepository) -> Result<UserData, AppError> {
    repository.user_data().await.first().await
}

/// GET /api/user-data - Current user preferences.
pub async fn get_user_data(State(state): State<AppState>) -> ApiResult<UserData> {
    let revision_id = current_revision(&state).await;

    match snapshot(state.user_data_repository.as_ref()).await {
        Ok(data) => success(data, revision_id),
        Err(e) => error(e, revision_id),
    }
}

/// PUT /api/user-data/followed-topics - Replace the followed topic set.
pub async fn set_followed_topics(
    State(state): State<AppState>,
    Json(request): Json<SetFollowedTopicsRequest>,
) -> ApiResult<UserData> {
    let revision_id = current_revision(&state).await;
    let repository = state.user_data_repository.as_ref();

    let result = match repository.set_followed_topic_ids(request.topic_ids).await {
        Ok(()) => snapshot(repository).await,
        Err(e) => Err(e),
    };
    respond(&state, result, revision_id).await
}

/// PUT /api/user-data/followed-topics/{id} - Follow or unfollow one topic.
pub async fn set_topic_followed(
    State(state): State<AppState>,
    Path(topic_id): Path<String>,
    Json(request): Json<SetFollowedRequest>,
) -> ApiResult<UserData> {
    let revision_id = current_revision(&state).await;
    let repository = state.user_data_repository.as_ref();

    let result = match repository
        .set_topic_id_followed(&topic_id, request.followed)
        .await
    {
        Ok(()) => snapshot(repository).await,
        Err(e) => Err(e),
    };
    respond(&state, result, revision_id).await
}

/// PUT /api/user-data/bookmarks/{id} - Bookmark or un-bookmark a news resource.
pub async fn set_news_resource_bookmarked(
    State(state): State<AppState>,
    Path(news_resource_id): Path<String>,
    Json(request): Json<SetBookmarkedRequest>,
) -> ApiResult<UserData> {
    let revision_id = current_revision(&state).await;
    let repository = state.user_data_repository.as_ref();

    let result = match repository
        .set_news_resource_bookmarked(&news_resource_id, request.bookmarked)
        .await
    {
        Ok(()) => snapshot(repository).await,
        Err(e) => Err(e),
    };
    respond(&state, result, revision_id).await
}

/// PUT /api/user-data/viewed/{id} - Mark a news resource as viewed or not.
pub async fn set_news_resource_viewed(
    State(state): State<AppState>,
    Path(news_resource_id): Path<String>,
    Json(request): Json<SetViewedRequest>,
) -> ApiResult<UserData> {
    let revision_id = current_revision(&state).await;
    let repository = state.user_data_repository.as_ref();

    let result = match repository
        .set_news_resource_viewed(&news_resource_id, request.viewed)
        .await
    {
        Ok(()) => snapshot(repository).await,
        Err(e) => Err(e),
    };
    respond(&state, result, revision_id).await
}

/// PUT /api/user-data/preferences - Update display preferences.
pub async fn update_preferences(
    State(state): State<AppState>,
    Json(request): Json<UpdatePreferencesRequest>,
) -> ApiResult<UserData> {
    let revision_id = current_revision(&state).await;
    let repository = state.user_data_repository.as_ref();

    let result = match apply_preferences(repository, &request).await {
        Ok(()) => snapshot(repository).await,
        Err(e) => Err(e),
    };
    respond(&state, result, revision_id).await
}

async fn apply_preferences(
    repository: &dyn UserDataRepository,
    request: &UpdatePreferencesRequest,
) -> Result<(), AppError> {
    if let Some(theme_brand) = request.theme_brand {
        repository.set_theme_brand(theme_brand).await?;
    }
    if let Some(dark_theme_config) = request.dark_theme_config {
        repository.set_dark_theme_config(dark_theme_config).await?;
    }
    if let Some(use_dynamic_color) = request.use_dynamic_color {
        repository.set_dynamic_color_preference(use_dynamic_color).await?;
    }
    if let Some(should_hide_onboarding) = request.should_hide_onboarding {
        repository
            .set_should_hide_onboarding(should_hide_onboarding)
            .await?;
    }
    Ok(())
}

//! REST API module.
//!
//! Every handler answers with the `{success, data, revisionId}` envelope.

mod followable;
mod revision;
mod topics;
mod user_data;

pub use followable::*;
pub use revision::*;
pub use topics::*;
pub use user_data::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::{AppError, AppErrorWithRevision};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub revision_id: i64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, revision_id: i64) -> Self {
        Self {
            success: true,
            data,
            revision_id,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppErrorWithRevision>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, revision_id: i64) -> ApiResult<T> {
    Ok(ApiResponse::new(data, revision_id))
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError, revision_id: i64) -> ApiResult<T> {
    Err(AppErrorWithRevision {
        error: err,
        revision_id,
    })
}

/// Revision to report alongside a response; `0` if it cannot be read.
async fn current_revision(state: &AppState) -> i64 {
    crate::db::get_revision_id(&state.pool).await.unwrap_or(0)
}

/// Answer with `result`, reporting the revision as of after the operation.
async fn respond<T: Serialize>(
    state: &AppState,
    result: Result<T, AppError>,
    revision_before: i64,
) -> ApiResult<T> {
    match result {
        Ok(data) => success(data, current_revision(state).await),
        Err(e) => error(e, revision_before),
    }
}

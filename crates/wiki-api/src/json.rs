//! Read-only JSON views of the same stores the HTML screens use.

use axum::{
    Json,
    extract::{Path, State},
};

use wiki_types::api::HealthResponse;
use wiki_types::models::{Page, PageSummary, Profile};

use crate::auth::AppState;
use crate::error::{ApiError, JsonError, run_db};

/// GET /api/pages
pub async fn list_pages(
    State(state): State<AppState>,
) -> Result<Json<Vec<PageSummary>>, JsonError> {
    let pages = run_db(&state, |db| db.list_pages()).await?;
    Ok(Json(pages))
}

/// GET /api/pages/{title}
pub async fn get_page(
    State(state): State<AppState>,
    Path(title): Path<String>,
) -> Result<Json<Page>, JsonError> {
    run_db(&state, move |db| db.get_page(&title))
        .await?
        .map(Json)
        .ok_or(JsonError(ApiError::NotFound))
}

/// GET /api/profiles
pub async fn list_profiles(State(state): State<AppState>) -> Result<Json<Vec<Profile>>, JsonError> {
    let profiles = run_db(&state, |db| db.list_profiles()).await?;
    Ok(Json(profiles))
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, JsonError> {
    let users = run_db(&state, |db| db.user_count()).await?;
    Ok(Json(HealthResponse {
        status: "ok".into(),
        users,
    }))
}

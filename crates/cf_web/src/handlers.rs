use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use serde_json::{json, Map, Value};
use cf_core::{join_schedule, Resource, ScheduleItem, Speaker};
use crate::{ApiError, AppState};

pub const SERVICE_MESSAGE: &str = "ElmEurope page scraper API";
/// Spelling kept as-is, clients match on it
pub const NOT_FOUND_MESSAGE: &str = "Resourse not found";

pub async fn index() -> impl IntoResponse {
    let services = Resource::ALL
        .iter()
        .map(|resource| {
            (
                resource.as_str().to_string(),
                json!({
                    "uri": resource.uri(),
                    "methods": ["GET"],
                    "description": resource.description(),
                }),
            )
        })
        .collect::<Map<String, Value>>();

    Json(json!({
        "message": SERVICE_MESSAGE,
        "services": services,
    }))
}

pub async fn list_speakers(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Speaker>>, ApiError> {
    let speakers = state.cache.speakers().await?;
    Ok(Json(speakers.as_ref().clone()))
}

pub async fn list_schedule(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ScheduleItem>>, ApiError> {
    let (speakers, items) = futures::try_join!(state.cache.speakers(), state.cache.schedule())?;
    Ok(Json(join_schedule(&speakers, &items)))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": NOT_FOUND_MESSAGE })),
    )
}

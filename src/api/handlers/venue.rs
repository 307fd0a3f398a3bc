use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateVenueRequest, UpdateVenueRequest};
use crate::domain::models::venue::Venue;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn create_venue(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("Venue name must not be empty".into()));
    }

    let venue = Venue::new(
        payload.name,
        payload.address,
        payload.city.unwrap_or_default(),
        payload.website,
    );

    let created = state.venue_repo.create(&venue).await?;
    info!("Venue created: {} ({})", created.name, created.id);
    Ok(Json(created))
}

pub async fn list_venues(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let venues = state.venue_repo.list().await?;
    Ok(Json(venues))
}

pub async fn get_venue(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let venue = state.venue_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;
    Ok(Json(venue))
}

pub async fn update_venue(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateVenueRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut venue = state.venue_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Venue not found".into()))?;

    if let Some(val) = payload.name { venue.name = val; }
    if let Some(val) = payload.address { venue.address = val; }
    if let Some(val) = payload.city { venue.city = val; }
    if let Some(val) = payload.website { venue.website = Some(val); }

    let updated = state.venue_repo.update(&venue).await?;
    info!("Venue updated: {}", id);
    Ok(Json(updated))
}

pub async fn delete_venue(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.venue_repo.delete(&id).await?;
    info!("Venue deleted: {}", id);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

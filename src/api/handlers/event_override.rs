use axum::{extract::{State, Path, Query}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::EventOverrideRequest;
use crate::domain::models::event_override::{
    EventOverride, OverridePatch, OVERRIDE_STATUS_CANCELLED, OVERRIDE_STATUS_NORMAL,
};
use crate::domain::services::dates::{local_today, parse_date_key};
use crate::domain::services::overrides::normalize_override;
use crate::error::AppError;
use std::sync::Arc;
use std::collections::HashMap;
use chrono::NaiveTime;
use tracing::info;

fn validate_override_status(status: &str) -> Result<(), AppError> {
    match status {
        OVERRIDE_STATUS_NORMAL | OVERRIDE_STATUS_CANCELLED => Ok(()),
        other => Err(AppError::Validation(format!("Invalid override status '{}'", other))),
    }
}

fn validate_time(label: &str, time: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected HH:MM)", label)))
}

pub async fn upsert_override(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<EventOverrideRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let status = payload.status.unwrap_or_else(|| OVERRIDE_STATUS_NORMAL.to_string());
    validate_override_status(&status)?;

    // Funnel the raw patch through the allow-list type: unknown keys fall
    // away here, they are not an error.
    let patch: OverridePatch = match payload.patch {
        Some(value) => serde_json::from_value(value)
            .map_err(|_| AppError::Validation("Invalid patch payload".into()))?,
        None => OverridePatch::default(),
    };

    if let Some(ref t) = patch.start_time {
        validate_time("patch start_time", t)?;
    }
    if let Some(ref t) = patch.end_time {
        validate_time("patch end_time", t)?;
    }
    if let Some(ref t) = payload.override_start_time {
        validate_time("override_start_time", t)?;
    }

    // A reschedule may move an occurrence anywhere that isn't already in
    // the past, including earlier within its window.
    if let Some(new_date) = patch.event_date {
        if new_date != payload.date && new_date < local_today(state.tz) {
            return Err(AppError::Invariant(
                "Cannot reschedule an occurrence to a past date".into(),
            ));
        }
    }

    let mut entity = EventOverride::new(event.id.clone(), payload.date);
    entity.status = status;
    entity.override_start_time = payload.override_start_time;
    entity.override_cover_image_url = payload.override_cover_image_url;
    entity.override_notes = payload.override_notes;
    entity.patch_json = if patch.is_empty() {
        None
    } else {
        Some(serde_json::to_string(&patch).map_err(|_| AppError::Internal)?)
    };

    // "No override" and "empty override" are the same state: a row that
    // normalizes to nothing is removed instead of stored, and removing it
    // again is a no-op.
    if normalize_override(&entity).is_empty() {
        state.event_override_repo.clear(&event.id, payload.date).await?;
        info!("Cleared override for event {} on {}", event.id, payload.date);
        return Ok(Json(serde_json::json!({"status": "cleared"})));
    }

    let saved = state.event_override_repo.upsert(&entity).await?;
    info!("Upserted override for event {} on {}", event.id, payload.date);
    Ok(Json(serde_json::to_value(saved).map_err(|_| AppError::Internal)?))
}

pub async fn delete_override(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path((id, date_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let date = parse_date_key(&date_str)?;

    state.event_override_repo.delete(&event.id, date).await?;
    info!("Deleted override for event {} on {}", event.id, date_str);
    Ok(Json(serde_json::json!({"status": "deleted"})))
}

pub async fn list_overrides(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let start_str = params.get("start").ok_or(AppError::Validation("start required".into()))?;
    let end_str = params.get("end").ok_or(AppError::Validation("end required".into()))?;

    let start = parse_date_key(start_str)?;
    let end = parse_date_key(end_str)?;

    let overrides = state.event_override_repo.list_by_range(&event.id, start, end).await?;
    Ok(Json(overrides))
}

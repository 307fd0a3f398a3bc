use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateEventRequest, UpdateEventRequest};
use crate::domain::models::event::{Event, EVENT_STATUSES, STATUS_ACTIVE, STATUS_CANCELLED};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveTime, Utc, Weekday};
use uuid::Uuid;
use tracing::info;

fn validate_status(status: &str) -> Result<(), AppError> {
    if EVENT_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Invalid status '{}'", status)))
    }
}

fn validate_time(label: &str, time: &str) -> Result<(), AppError> {
    NaiveTime::parse_from_str(time, "%H:%M")
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Invalid {} (expected HH:MM)", label)))
}

fn validate_day_of_week(day: &str) -> Result<(), AppError> {
    day.parse::<Weekday>()
        .map(|_| ())
        .map_err(|_| AppError::Validation(format!("Invalid day_of_week '{}'", day)))
}

/// Venue reference and custom location fields are mutually exclusive; the
/// occurrence engine relies on never seeing both.
fn check_venue_exclusivity(event: &Event) -> Result<(), AppError> {
    if event.venue_id.is_some() && (event.venue_name.is_some() || event.venue_address.is_some()) {
        return Err(AppError::Invariant(
            "An event may have either a linked venue or a custom location, not both".into(),
        ));
    }
    Ok(())
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(payload): Json<CreateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.title.trim().is_empty() {
        return Err(AppError::Validation("Title must not be empty".into()));
    }

    let status = payload.status.unwrap_or_else(|| STATUS_ACTIVE.to_string());
    validate_status(&status)?;

    if let Some(ref day) = payload.day_of_week {
        validate_day_of_week(day)?;
    }
    if let Some(ref t) = payload.start_time {
        validate_time("start_time", t)?;
    }
    if let Some(ref t) = payload.end_time {
        validate_time("end_time", t)?;
    }

    if let Some(ref venue_id) = payload.venue_id {
        state.venue_repo.find_by_id(venue_id).await?
            .ok_or(AppError::Validation("Linked venue does not exist".into()))?;
    }

    // Note: recurrence_rule is stored as-is. Unparseable rules are routed to
    // the unknown-schedule bucket at read time instead of being rejected
    // here, so imported legacy rows keep surfacing for cleanup.
    let event = Event {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description.unwrap_or_default(),
        venue_id: payload.venue_id,
        venue_name: payload.venue_name,
        venue_address: payload.venue_address,
        event_date: payload.event_date,
        day_of_week: payload.day_of_week,
        recurrence_rule: payload.recurrence_rule,
        start_time: payload.start_time,
        end_time: payload.end_time,
        is_published: payload.is_published.unwrap_or(false),
        status,
        cover_image_url: payload.cover_image_url,
        is_free: payload.is_free.unwrap_or(true),
        cost: payload.cost,
        capacity: payload.capacity,
        signup_url: payload.signup_url,
        host_notes: payload.host_notes,
        created_at: Utc::now(),
    };

    check_venue_exclusivity(&event)?;

    let created = state.event_repo.create(&event).await?;
    info!("Event created: {} ({})", created.title, created.id);
    Ok(Json(created))
}

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let events = state.event_repo.list().await?;
    Ok(Json(events))
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or_else(|| AppError::NotFound(format!("Event '{}' not found", id)))?;
    Ok(Json(event))
}

pub async fn update_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if let Some(val) = payload.title { event.title = val; }
    if let Some(val) = payload.description { event.description = val; }
    if let Some(val) = payload.venue_id {
        state.venue_repo.find_by_id(&val).await?
            .ok_or(AppError::Validation("Linked venue does not exist".into()))?;
        event.venue_id = Some(val);
    }
    if let Some(val) = payload.venue_name { event.venue_name = Some(val); }
    if let Some(val) = payload.venue_address { event.venue_address = Some(val); }
    if let Some(val) = payload.event_date { event.event_date = Some(val); }
    if let Some(val) = payload.day_of_week {
        validate_day_of_week(&val)?;
        event.day_of_week = Some(val);
    }
    if let Some(val) = payload.recurrence_rule { event.recurrence_rule = Some(val); }
    if let Some(val) = payload.start_time {
        validate_time("start_time", &val)?;
        event.start_time = Some(val);
    }
    if let Some(val) = payload.end_time {
        validate_time("end_time", &val)?;
        event.end_time = Some(val);
    }
    if let Some(val) = payload.is_published { event.is_published = val; }
    if let Some(val) = payload.status {
        validate_status(&val)?;
        event.status = val;
    }
    if let Some(val) = payload.cover_image_url { event.cover_image_url = Some(val); }
    if let Some(val) = payload.is_free { event.is_free = val; }
    if let Some(val) = payload.cost { event.cost = Some(val); }
    if let Some(val) = payload.capacity { event.capacity = Some(val); }
    if let Some(val) = payload.signup_url { event.signup_url = Some(val); }
    if let Some(val) = payload.host_notes { event.host_notes = Some(val); }

    check_venue_exclusivity(&event)?;

    let updated = state.event_repo.update(&event).await?;
    info!("Event updated: {}", id);
    Ok(Json(updated))
}

/// Published events are soft-deleted (status transition keeps overrides and
/// RSVPs attributable); a draft that was never published is removed outright.
pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    if event.is_published {
        event.status = STATUS_CANCELLED.to_string();
        state.event_repo.update(&event).await?;
        info!("Event cancelled: {}", id);
        Ok(Json(serde_json::json!({"status": "cancelled"})))
    } else {
        state.event_repo.delete(&id).await?;
        info!("Draft event deleted: {}", id);
        Ok(Json(serde_json::json!({"status": "deleted"})))
    }
}

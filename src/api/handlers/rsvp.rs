use axum::{extract::{State, Path}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::admin::AdminUser;
use crate::api::dtos::requests::{CreateClaimRequest, CreateRsvpRequest};
use crate::api::dtos::responses::ClaimCreatedResponse;
use crate::domain::models::event::Event;
use crate::domain::models::occurrence::Occurrence;
use crate::domain::models::rsvp::{Rsvp, TimeslotClaim};
use crate::domain::services::calendar::occurrence_ics;
use crate::domain::services::dates::{end_of_day, parse_date_key};
use crate::domain::services::overrides::{merge_occurrence, normalize_override};
use crate::domain::services::recurrence::{occurrences_in_window, Schedule};
use crate::error::AppError;
use std::sync::Arc;
use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

/// Resolve the merged occurrence for (event, date), rejecting dates the
/// event does not occur on and cancelled occurrences. Both the RSVP and
/// claim paths go through this.
async fn resolve_active_occurrence(
    state: &AppState,
    event: &Event,
    date: NaiveDate,
) -> Result<Occurrence, AppError> {
    let schedule = Schedule::for_event(event)
        .map_err(|_| AppError::Validation("Event has no computable schedule".into()))?;
    if schedule.is_unknown() {
        return Err(AppError::Validation("Event has no computable schedule".into()));
    }
    if occurrences_in_window(&schedule, date, date).is_empty() {
        return Err(AppError::Validation("Event does not occur on that date".into()));
    }

    let override_row = state.event_override_repo.find_by_date(&event.id, date).await?;
    let normalized = override_row.as_ref().map(normalize_override);

    let venue = match event.venue_id.as_deref() {
        Some(venue_id) => state.venue_repo.find_by_id(venue_id).await?,
        None => None,
    };

    let occurrence = merge_occurrence(event, venue.as_ref(), date, normalized.as_ref());
    if occurrence.cancelled {
        return Err(AppError::Conflict("This occurrence has been cancelled".into()));
    }
    Ok(occurrence)
}

async fn find_public_event(state: &AppState, id: &str) -> Result<Event, AppError> {
    let event = state.event_repo.find_by_id(id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    if !event.is_published {
        return Err(AppError::NotFound("Event not found".into()));
    }
    Ok(event)
}

pub async fn create_rsvp(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateRsvpRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_public_event(&state, &id).await?;

    if payload.name.trim().is_empty() || payload.email.trim().is_empty() {
        return Err(AppError::Validation("Name and email are required".into()));
    }

    let date = parse_date_key(&payload.date)?;
    let occurrence = resolve_active_occurrence(&state, &event, date).await?;

    let rsvp = Rsvp::new(event.id.clone(), date, payload.name, payload.email);
    let saved = state.rsvp_repo.create(&rsvp).await?;

    // Confirmation mail with a calendar attachment; delivery problems must
    // not undo the stored RSVP.
    let ics = occurrence_ics(&occurrence, state.tz);
    let subject = format!("RSVP confirmed: {}", occurrence.title);
    let body = format!(
        "<p>You're on the list for <strong>{}</strong> on {}.</p>",
        occurrence.title, occurrence.display_date
    );
    if let Err(e) = state.email_service
        .send(&saved.email, &subject, &body, Some("event.ics"), Some(ics.as_bytes()))
        .await
    {
        warn!("Failed to send RSVP confirmation to {}: {}", saved.email, e);
    }

    info!("RSVP created for event {} on {}", event.id, date);
    Ok(Json(saved))
}

pub async fn list_rsvps(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;
    let rsvps = state.rsvp_repo.list_by_event(&event.id).await?;
    Ok(Json(rsvps))
}

pub async fn create_claim(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<CreateClaimRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_public_event(&state, &id).await?;

    if payload.performer_name.trim().is_empty() {
        return Err(AppError::Validation("performer_name is required".into()));
    }
    if payload.slot < 1 {
        return Err(AppError::Validation("Slot numbers start at 1".into()));
    }

    let date = parse_date_key(&payload.date)?;
    let occurrence = resolve_active_occurrence(&state, &event, date).await?;

    if let Some(capacity) = occurrence.capacity {
        if payload.slot > capacity {
            return Err(AppError::Validation(format!(
                "Slot {} is beyond this night's capacity of {}",
                payload.slot, capacity
            )));
        }
    }

    let expires_at = end_of_day(date, state.tz);
    if expires_at < Utc::now() {
        return Err(AppError::Validation("Cannot claim a slot on a past date".into()));
    }

    let claim = TimeslotClaim::new(
        event.id.clone(),
        date,
        payload.slot,
        payload.performer_name,
        expires_at,
    );

    // UNIQUE(event_id, date, slot) turns a double-claim into a 409.
    let saved = state.claim_repo.create(&claim).await?;
    info!("Slot {} claimed for event {} on {}", saved.slot, event.id, date);

    Ok(Json(ClaimCreatedResponse {
        slot: saved.slot,
        token: saved.token,
        expires_at: saved.expires_at.to_rfc3339(),
    }))
}

pub async fn list_claims(
    State(state): State<Arc<AppState>>,
    Path((id, date_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = find_public_event(&state, &id).await?;
    let date = parse_date_key(&date_str)?;
    let claims = state.claim_repo.list_by_event_date(&event.id, date).await?;

    // Tokens are bearer secrets; the public roster only shows who holds
    // which slot.
    let roster: Vec<_> = claims
        .into_iter()
        .map(|c| serde_json::json!({
            "slot": c.slot,
            "performer_name": c.performer_name,
            "status": c.status,
        }))
        .collect();
    Ok(Json(roster))
}

pub async fn release_claim(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.claim_repo.delete_by_token(&token).await?;
    info!("Claim released");
    Ok(Json(serde_json::json!({"status": "released"})))
}

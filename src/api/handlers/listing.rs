use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use crate::state::AppState;
use crate::api::dtos::responses::OccurrencesResponse;
use crate::domain::services::calendar::occurrence_ics;
use crate::domain::services::dates::{add_days, local_today, parse_date_key};
use crate::domain::services::overrides::{build_override_map, merge_occurrence, normalize_override};
use crate::domain::services::recurrence::{occurrences_in_window, Schedule};
use crate::domain::services::series::group_events;
use crate::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use chrono::NaiveDate;
use tracing::warn;

const DEFAULT_WINDOW_DAYS: i64 = 90;

/// Window bounds from query params, defaulting to today..today+90d. Invalid
/// explicit bounds are a caller bug and fail the request, unlike per-event
/// schedule problems which degrade.
fn resolve_window(
    state: &AppState,
    params: &HashMap<String, String>,
) -> Result<(NaiveDate, NaiveDate), AppError> {
    let today = local_today(state.tz);
    let start = match params.get("start") {
        Some(raw) => parse_date_key(raw)?,
        None => today,
    };
    let end = match params.get("end") {
        Some(raw) => parse_date_key(raw)?,
        None => add_days(today, DEFAULT_WINDOW_DAYS),
    };
    Ok((start, end))
}

/// The unified listing view: published events grouped into series with their
/// merged occurrences, plus the unknown-schedule bucket.
pub async fn get_listings(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let (start, end) = resolve_window(&state, &params)?;

    let events = state.event_repo.list_published().await?;
    let venues: HashMap<String, _> = state
        .venue_repo
        .list()
        .await?
        .into_iter()
        .map(|v| (v.id.clone(), v))
        .collect();
    let override_rows = state.event_override_repo.list_in_window(start, end).await?;
    let overrides = build_override_map(&override_rows);

    let grouped = group_events(events, &venues, start, end, &overrides);
    Ok(Json(grouped))
}

/// Merged occurrences of one event. An uncomputable schedule is reported,
/// not an error.
pub async fn get_event_occurrences(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let (start, end) = resolve_window(&state, &params)?;

    let schedule = match Schedule::for_event(&event) {
        Ok(schedule) => schedule,
        Err(err) => {
            warn!("Event {} has an uncomputable schedule: {}", event.id, err);
            return Ok(Json(OccurrencesResponse {
                event_id: event.id,
                occurrences: Vec::new(),
                unknown_schedule: true,
            }));
        }
    };

    if schedule.is_unknown() {
        return Ok(Json(OccurrencesResponse {
            event_id: event.id,
            occurrences: Vec::new(),
            unknown_schedule: true,
        }));
    }

    let dates = occurrences_in_window(&schedule, start, end);
    let override_rows = state.event_override_repo.list_by_range(&event.id, start, end).await?;
    let overrides = build_override_map(&override_rows);

    let venue = match event.venue_id.as_deref() {
        Some(venue_id) => state.venue_repo.find_by_id(venue_id).await?,
        None => None,
    };

    let occurrences = dates
        .iter()
        .map(|date| {
            let ovr = overrides.get(&(event.id.clone(), *date));
            merge_occurrence(&event, venue.as_ref(), *date, ovr)
        })
        .collect();

    Ok(Json(OccurrencesResponse {
        event_id: event.id.clone(),
        occurrences,
        unknown_schedule: false,
    }))
}

/// One occurrence as an .ics download, override-aware.
pub async fn get_occurrence_ics(
    State(state): State<Arc<AppState>>,
    Path((id, date_str)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let event = state.event_repo.find_by_id(&id).await?
        .ok_or(AppError::NotFound("Event not found".into()))?;

    let date = parse_date_key(&date_str)?;

    let schedule = Schedule::for_event(&event)?;
    if occurrences_in_window(&schedule, date, date).is_empty() {
        return Err(AppError::NotFound(format!("No occurrence on {}", date_str)));
    }

    let override_row = state.event_override_repo.find_by_date(&event.id, date).await?;
    let normalized = override_row.as_ref().map(normalize_override);

    let venue = match event.venue_id.as_deref() {
        Some(venue_id) => state.venue_repo.find_by_id(venue_id).await?,
        None => None,
    };

    let occurrence = merge_occurrence(&event, venue.as_ref(), date, normalized.as_ref());
    let ics = occurrence_ics(&occurrence, state.tz);

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}-{}.ics\"", event.id, date_str),
            ),
        ],
        ics,
    ))
}

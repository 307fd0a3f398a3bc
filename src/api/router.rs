use axum::{
    body::Body,
    extract::Request,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use crate::state::AppState;
use crate::api::handlers::{event, event_override, health, listing, rsvp, venue};
use tower_http::{
    trace::TraceLayer,
    classify::ServerErrorsFailureClass,
};
use tracing::{info_span, Span, error, info};
use uuid::Uuid;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health_check))

        // Venues
        .route("/api/v1/venues", get(venue::list_venues).post(venue::create_venue))
        .route("/api/v1/venues/{id}", get(venue::get_venue).put(venue::update_venue).delete(venue::delete_venue))

        // Events
        .route("/api/v1/events", post(event::create_event).get(event::list_events))
        .route("/api/v1/events/{id}", get(event::get_event).put(event::update_event).delete(event::delete_event))

        // Per-occurrence overrides
        .route("/api/v1/events/{id}/overrides", get(event_override::list_overrides).post(event_override::upsert_override))
        .route("/api/v1/events/{id}/overrides/{date}", delete(event_override::delete_override))

        // Public listing surfaces
        .route("/api/v1/listings", get(listing::get_listings))
        .route("/api/v1/events/{id}/occurrences", get(listing::get_event_occurrences))
        .route("/api/v1/events/{id}/occurrences/{date}/calendar.ics", get(listing::get_occurrence_ics))

        // RSVPs & timeslot claims
        .route("/api/v1/events/{id}/rsvps", post(rsvp::create_rsvp).get(rsvp::list_rsvps))
        .route("/api/v1/events/{id}/claims", post(rsvp::create_claim))
        .route("/api/v1/events/{id}/claims/{date}", get(rsvp::list_claims))
        .route("/api/v1/claims/{token}", delete(rsvp::release_claim))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .with_state(state)
}

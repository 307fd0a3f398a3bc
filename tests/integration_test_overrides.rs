mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn create_weekly_event(app: &TestApp) -> String {
    let (status, created) = app.post_admin("/api/v1/events", &json!({
        "title": "Tuesday Night Mic",
        "day_of_week": "Tuesday",
        "start_time": "19:00",
        "end_time": "22:00",
        "venue_name": "The Cellar",
        "venue_address": "12 Stage St",
        "is_published": true
    })).await;
    assert_eq!(status, StatusCode::OK);
    created["id"].as_str().unwrap().to_string()
}

fn occurrence_on<'a>(body: &'a Value, date: &str) -> &'a Value {
    body["occurrences"].as_array().unwrap().iter()
        .find(|o| o["date"] == date)
        .unwrap_or_else(|| panic!("no occurrence on {}", date))
}

#[tokio::test]
async fn test_patch_overrides_one_date_only() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    let (status, _) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "patch": { "start_time": "20:00" }
    })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get_json(
        &format!("/api/v1/events/{}/occurrences?start=2026-03-01&end=2026-03-31", id)
    ).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["occurrences"].as_array().unwrap().len(), 5);

    assert_eq!(occurrence_on(&body, "2026-03-10")["start_time"], "20:00");
    assert_eq!(occurrence_on(&body, "2026-03-03")["start_time"], "19:00");
    assert_eq!(occurrence_on(&body, "2026-03-17")["start_time"], "19:00");
}

#[tokio::test]
async fn test_cancellation_still_applies_patch_fields() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    let (status, _) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "status": "cancelled",
        "patch": { "host_notes": "rescheduling soon" }
    })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get_json(
        &format!("/api/v1/events/{}/occurrences?start=2026-03-01&end=2026-03-31", id)
    ).await;

    let cancelled = occurrence_on(&body, "2026-03-10");
    assert_eq!(cancelled["cancelled"], true);
    assert_eq!(cancelled["host_notes"], "rescheduling soon");
    assert_eq!(occurrence_on(&body, "2026-03-17")["cancelled"], false);
}

#[tokio::test]
async fn test_patch_beats_legacy_columns_per_field() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    let (status, _) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "patch": { "start_time": "20:00" },
        "override_start_time": "18:00",
        "override_notes": "bring two songs"
    })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get_json(
        &format!("/api/v1/events/{}/occurrences?start=2026-03-01&end=2026-03-31", id)
    ).await;

    let occ = occurrence_on(&body, "2026-03-10");
    // Patch wins for start_time; the legacy-only notes column still lands.
    assert_eq!(occ["start_time"], "20:00");
    assert_eq!(occ["host_notes"], "bring two songs");
}

#[tokio::test]
async fn test_unknown_patch_keys_are_dropped_silently() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    let (status, _) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "patch": { "start_time": "20:00", "admin_secret": "nope" }
    })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, rows) = app.get_json(
        &format!("/api/v1/events/{}/overrides?start=2026-03-01&end=2026-03-31", id)
    ).await;
    let stored_patch = rows.as_array().unwrap()[0]["patch_json"].as_str().unwrap();
    assert!(stored_patch.contains("start_time"));
    assert!(!stored_patch.contains("admin_secret"));
}

#[tokio::test]
async fn test_empty_override_upsert_is_idempotent_deletion() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;
    let overrides_uri = format!("/api/v1/events/{}/overrides", id);
    let list_uri = format!("/api/v1/events/{}/overrides?start=2026-03-01&end=2026-03-31", id);

    // Empty upsert on a virgin date stores nothing.
    let (status, body) = app.post_admin(&overrides_uri, &json!({
        "date": "2026-03-10",
        "status": "normal"
    })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cleared");
    let (_, rows) = app.get_json(&list_uri).await;
    assert_eq!(rows.as_array().unwrap().len(), 0);

    // A real override creates a row...
    let (_, _) = app.post_admin(&overrides_uri, &json!({
        "date": "2026-03-10",
        "patch": { "start_time": "20:00" }
    })).await;
    let (_, rows) = app.get_json(&list_uri).await;
    assert_eq!(rows.as_array().unwrap().len(), 1);

    // ...and reverting it to empty deletes the row. Doing it twice ends in
    // the same state.
    for _ in 0..2 {
        let (status, body) = app.post_admin(&overrides_uri, &json!({
            "date": "2026-03-10",
            "status": "normal"
        })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "cleared");
        let (_, rows) = app.get_json(&list_uri).await;
        assert_eq!(rows.as_array().unwrap().len(), 0);
    }
}

#[tokio::test]
async fn test_reschedule_to_past_is_rejected() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    let (status, body) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "patch": { "event_date": "2020-01-01" }
    })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("past"));

    // Nothing was stored.
    let (_, rows) = app.get_json(
        &format!("/api/v1/events/{}/overrides?start=2026-03-01&end=2026-03-31", id)
    ).await;
    assert_eq!(rows.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_reschedule_moves_display_date_keeps_key() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    // A far-future target is safely after "today" whenever this runs.
    let (status, _) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "patch": { "event_date": "2099-06-12" }
    })).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.get_json(
        &format!("/api/v1/events/{}/occurrences?start=2026-03-01&end=2026-03-31", id)
    ).await;

    let occ = occurrence_on(&body, "2026-03-10");
    assert_eq!(occ["display_date"], "2099-06-12");
    assert_eq!(occ["rescheduled"], true);
}

#[tokio::test]
async fn test_delete_override_endpoint() {
    let app = TestApp::new().await;
    let id = create_weekly_event(&app).await;

    let (_, _) = app.post_admin(&format!("/api/v1/events/{}/overrides", id), &json!({
        "date": "2026-03-10",
        "patch": { "start_time": "20:00" }
    })).await;

    let status = delete_as_admin(&app, &format!("/api/v1/events/{}/overrides/2026-03-10", id)).await;
    assert_eq!(status, StatusCode::OK);

    // Deleting the now-absent row is a 404, unlike the idempotent upsert path.
    let status = delete_as_admin(&app, &format!("/api/v1/events/{}/overrides/2026-03-10", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

async fn delete_as_admin(app: &TestApp, uri: &str) -> StatusCode {
    use axum::{body::Body, http::{header, Request}};
    use tower::ServiceExt;
    let response = app.router.clone().oneshot(
        Request::builder().method("DELETE").uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", common::ADMIN_TOKEN))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    response.status()
}

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::{json, Value};

async fn create_event(app: &TestApp, payload: Value) -> String {
    let (status, created) = app.post_admin("/api/v1/events", &payload).await;
    assert_eq!(status, StatusCode::OK, "event create failed: {}", created);
    created["id"].as_str().unwrap().to_string()
}

fn occurrence_dates(series: &Value) -> Vec<String> {
    series["occurrences"].as_array().unwrap().iter()
        .map(|o| o["date"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_weekly_series_expands_to_every_matching_day() {
    let app = TestApp::new().await;
    create_event(&app, json!({
        "title": "Tuesday Night Mic",
        "day_of_week": "Tuesday",
        "start_time": "19:00",
        "is_published": true
    })).await;

    let (status, body) = app.get_json("/api/v1/listings?start=2026-03-01&end=2026-03-31").await;
    assert_eq!(status, StatusCode::OK);

    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["is_one_time"], false);
    assert_eq!(
        occurrence_dates(&series[0]),
        vec!["2026-03-03", "2026-03-10", "2026-03-17", "2026-03-24", "2026-03-31"]
    );
}

#[tokio::test]
async fn test_one_time_event_window_containment() {
    let app = TestApp::new().await;
    create_event(&app, json!({
        "title": "Anniversary Showcase",
        "event_date": "2026-03-10",
        "start_time": "20:00",
        "is_published": true
    })).await;

    let (_, inside) = app.get_json("/api/v1/listings?start=2026-03-01&end=2026-03-31").await;
    let series = inside["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["is_one_time"], true);
    assert_eq!(occurrence_dates(&series[0]), vec!["2026-03-10"]);

    // Out of window: silently excluded, not unknown.
    let (_, outside) = app.get_json("/api/v1/listings?start=2026-04-01&end=2026-04-30").await;
    assert!(outside["series"].as_array().unwrap().is_empty());
    assert!(outside["unknown_events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_and_unparseable_schedules_bucketed() {
    let app = TestApp::new().await;
    let no_schedule = create_event(&app, json!({
        "title": "Mystery Mic",
        "is_published": true
    })).await;
    let bad_rule = create_event(&app, json!({
        "title": "Chaotic Mic",
        "recurrence_rule": "every other thursday, probably",
        "is_published": true
    })).await;
    create_event(&app, json!({
        "title": "Reliable Mic",
        "day_of_week": "Tuesday",
        "is_published": true
    })).await;

    let (_, body) = app.get_json("/api/v1/listings?start=2026-03-01&end=2026-03-31").await;

    let unknown_ids: Vec<&str> = body["unknown_events"].as_array().unwrap().iter()
        .map(|e| e["id"].as_str().unwrap())
        .collect();
    assert_eq!(unknown_ids.len(), 2);
    assert!(unknown_ids.contains(&no_schedule.as_str()));
    assert!(unknown_ids.contains(&bad_rule.as_str()));

    // The bad rows did not take the good one down with them.
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["event"]["title"], "Reliable Mic");
}

#[tokio::test]
async fn test_biweekly_rule_with_until() {
    let app = TestApp::new().await;
    create_event(&app, json!({
        "title": "Biweekly Mic",
        "recurrence_rule": "FREQ=WEEKLY;INTERVAL=2;BYDAY=TU;DTSTART=20260303",
        "is_published": true
    })).await;
    create_event(&app, json!({
        "title": "Retiring Mic",
        "recurrence_rule": "FREQ=WEEKLY;BYDAY=WE;UNTIL=20260311",
        "is_published": true
    })).await;

    let (_, body) = app.get_json("/api/v1/listings?start=2026-03-01&end=2026-03-31").await;
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 2);

    let by_title = |title: &str| {
        series.iter().find(|s| s["event"]["title"] == title)
            .unwrap_or_else(|| panic!("no series titled {}", title))
    };
    assert_eq!(
        occurrence_dates(by_title("Biweekly Mic")),
        vec!["2026-03-03", "2026-03-17", "2026-03-31"]
    );
    // Wednesdays clipped at UNTIL: March 4 and 11 only.
    assert_eq!(occurrence_dates(by_title("Retiring Mic")), vec!["2026-03-04", "2026-03-11"]);
}

#[tokio::test]
async fn test_duplicate_titles_keep_most_complete_record() {
    let app = TestApp::new().await;
    // start_time only: completeness 1.
    create_event(&app, json!({
        "title": "The Big Mic",
        "day_of_week": "Monday",
        "start_time": "19:00",
        "is_published": true
    })).await;
    // recurrence_rule: completeness 2, wins despite arriving second.
    let winner = create_event(&app, json!({
        "title": "  the   BIG mic ",
        "recurrence_rule": "FREQ=WEEKLY;BYDAY=TU",
        "is_published": true
    })).await;

    let (_, body) = app.get_json("/api/v1/listings?start=2026-03-01&end=2026-03-31").await;
    let series = body["series"].as_array().unwrap();
    assert_eq!(series.len(), 1);
    assert_eq!(series[0]["event"]["id"], winner.as_str());
}

#[tokio::test]
async fn test_unpublished_and_cancelled_events_excluded() {
    let app = TestApp::new().await;
    create_event(&app, json!({
        "title": "Draft Mic",
        "day_of_week": "Tuesday"
    })).await;
    create_event(&app, json!({
        "title": "Dead Mic",
        "day_of_week": "Tuesday",
        "is_published": true,
        "status": "cancelled"
    })).await;

    let (_, body) = app.get_json("/api/v1/listings?start=2026-03-01&end=2026-03-31").await;
    assert!(body["series"].as_array().unwrap().is_empty());
    assert!(body["unknown_events"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_window_bounds_fail_hard() {
    let app = TestApp::new().await;
    let (status, _) = app.get_json("/api/v1/listings?start=March+1&end=2026-03-31").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_occurrence_ics_download() {
    let app = TestApp::new().await;
    let id = create_event(&app, json!({
        "title": "Tuesday Night Mic",
        "day_of_week": "Tuesday",
        "start_time": "19:00",
        "end_time": "22:00",
        "venue_name": "The Cellar",
        "is_published": true
    })).await;

    use axum::{body::Body, http::Request};
    use tower::ServiceExt;
    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/events/{}/occurrences/2026-03-10/calendar.ics", id))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/calendar"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let ics = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(ics.contains("SUMMARY:Tuesday Night Mic"));

    // March 11 is a Wednesday; no occurrence, no file.
    let response = app.router.clone().oneshot(
        Request::builder().method("GET")
            .uri(format!("/api/v1/events/{}/occurrences/2026-03-11/calendar.ics", id))
            .body(Body::empty())
            .unwrap()
    ).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

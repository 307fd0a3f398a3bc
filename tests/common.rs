use micboard_backend::{
    api::router::create_router,
    state::AppState,
    config::Config,
    infra::repositories::{
        sqlite_venue_repo::SqliteVenueRepo,
        sqlite_event_repo::SqliteEventRepo,
        sqlite_event_override_repo::SqliteEventOverrideRepo,
        sqlite_rsvp_repo::SqliteRsvpRepo,
        sqlite_claim_repo::SqliteClaimRepo,
    },
    domain::ports::EmailService,
    error::AppError,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use std::str::FromStr;
use async_trait::async_trait;
use tower::ServiceExt;
use serde_json::Value;

pub const ADMIN_TOKEN: &str = "test-admin-token";

pub struct MockEmailService;

#[async_trait]
impl EmailService for MockEmailService {
    async fn send(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_body: &str,
        _attachment_name: Option<&str>,
        _attachment_data: Option<&[u8]>
    ) -> Result<(), AppError> {
        Ok(())
    }
}

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            timezone: "America/New_York".to_string(),
            admin_token: ADMIN_TOKEN.to_string(),
            mail_service_url: "http://localhost".to_string(),
            mail_service_token: "token".to_string(),
        };

        let tz = config.timezone.parse().unwrap();

        let state = Arc::new(AppState {
            config,
            tz,
            venue_repo: Arc::new(SqliteVenueRepo::new(pool.clone())),
            event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
            event_override_repo: Arc::new(SqliteEventOverrideRepo::new(pool.clone())),
            rsvp_repo: Arc::new(SqliteRsvpRepo::new(pool.clone())),
            claim_repo: Arc::new(SqliteClaimRepo::new(pool.clone())),
            email_service: Arc::new(MockEmailService),
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// POST a JSON payload as admin and return the parsed response body.
    pub async fn post_admin(&self, uri: &str, payload: &Value) -> (axum::http::StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder().method("POST").uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn post_public(&self, uri: &str, payload: &Value) -> (axum::http::StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder().method("POST").uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        (status, parse_body(response).await)
    }

    pub async fn get_json(&self, uri: &str) -> (axum::http::StatusCode, Value) {
        let response = self.router.clone().oneshot(
            Request::builder().method("GET").uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", ADMIN_TOKEN))
                .body(Body::empty())
                .unwrap()
        ).await.unwrap();

        let status = response.status();
        (status, parse_body(response).await)
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

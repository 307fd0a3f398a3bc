use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, venue_id, venue_name, venue_address,
                event_date, day_of_week, recurrence_rule, start_time, end_time,
                is_published, status, cover_image_url, is_free, cost, capacity,
                signup_url, host_notes, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.venue_id)
            .bind(&event.venue_name)
            .bind(&event.venue_address)
            .bind(event.event_date)
            .bind(&event.day_of_week)
            .bind(&event.recurrence_rule)
            .bind(&event.start_time)
            .bind(&event.end_time)
            .bind(event.is_published)
            .bind(&event.status)
            .bind(&event.cover_image_url)
            .bind(event.is_free)
            .bind(&event.cost)
            .bind(event.capacity)
            .bind(&event.signup_url)
            .bind(&event.host_notes)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY created_at")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn list_published(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>(
            "SELECT * FROM events WHERE is_published = TRUE AND status != 'cancelled' ORDER BY created_at"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title = $1, description = $2, venue_id = $3, venue_name = $4,
                venue_address = $5, event_date = $6, day_of_week = $7,
                recurrence_rule = $8, start_time = $9, end_time = $10,
                is_published = $11, status = $12, cover_image_url = $13, is_free = $14,
                cost = $15, capacity = $16, signup_url = $17, host_notes = $18
            WHERE id = $19
            RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.venue_id)
            .bind(&event.venue_name)
            .bind(&event.venue_address)
            .bind(event.event_date)
            .bind(&event.day_of_week)
            .bind(&event.recurrence_rule)
            .bind(&event.start_time)
            .bind(&event.end_time)
            .bind(event.is_published)
            .bind(&event.status)
            .bind(&event.cover_image_url)
            .bind(event.is_free)
            .bind(&event.cost)
            .bind(event.capacity)
            .bind(&event.signup_url)
            .bind(&event.host_notes)
            .bind(&event.id)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn delete(&self, id: &str) -> Result<(), AppError> {
        let res = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(AppError::Database)?;

        if res.rows_affected() == 0 {
            return Err(AppError::NotFound("Event not found".into()));
        }
        Ok(())
    }
}

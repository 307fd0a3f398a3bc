use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;

pub struct SqliteEventRepo {
    pool: SqlitePool,
}

impl SqliteEventRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for SqliteEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, venue_id, venue_name, venue_address,
                event_date, day_of_week, recurrence_rule, start_time, end_time,
                is_published, status, cover_image_url, is_free, cost, capacity,
                signup_url, host_notes, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
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
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = ?")
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
            "SELECT * FROM events WHERE is_published = 1 AND status != 'cancelled' ORDER BY created_at"
        )
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title = ?, description = ?, venue_id = ?, venue_name = ?,
                venue_address = ?, event_date = ?, day_of_week = ?,
                recurrence_rule = ?, start_time = ?, end_time = ?,
                is_published = ?, status = ?, cover_image_url = ?, is_free = ?,
                cost = ?, capacity = ?, signup_url = ?, host_notes = ?
            WHERE id = ?
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
        let res = sqlx::query("DELETE FROM events WHERE id = ?")
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

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Career/education timeline entry. Dates stay free-form strings ("2021",
/// "Jan 2022"); `to_date` empty means "present".
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Timeline {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub from_date: String,
    pub to_date: Option<String>,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, title, description, from_date, to_date, created_at";

impl Timeline {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Timeline>> {
        let rows = sqlx::query_as::<_, Timeline>(&format!(
            "SELECT {COLUMNS} FROM timelines ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: &str,
        from_date: &str,
        to_date: Option<&str>,
    ) -> anyhow::Result<Timeline> {
        let row = sqlx::query_as::<_, Timeline>(&format!(
            "INSERT INTO timelines (title, description, from_date, to_date) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(title)
        .bind(description)
        .bind(from_date)
        .bind(to_date)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM timelines WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Contact-form submission from a site visitor.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: Uuid,
    pub sender_name: String,
    pub subject: String,
    pub message: String,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, sender_name, subject, message, created_at";

impl Message {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Message>> {
        let rows = sqlx::query_as::<_, Message>(&format!(
            "SELECT {COLUMNS} FROM messages ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn create(
        db: &PgPool,
        sender_name: &str,
        subject: &str,
        message: &str,
    ) -> anyhow::Result<Message> {
        let row = sqlx::query_as::<_, Message>(&format!(
            "INSERT INTO messages (sender_name, subject, message) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(sender_name)
        .bind(subject)
        .bind(message)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM messages WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

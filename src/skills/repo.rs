use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub title: String,
    pub proficiency: String,
    pub icon_id: String,
    pub icon_url: String,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, title, proficiency, icon_id, icon_url, created_at";

impl Skill {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Skill>> {
        let rows = sqlx::query_as::<_, Skill>(&format!(
            "SELECT {COLUMNS} FROM skills ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Skill>> {
        let row = sqlx::query_as::<_, Skill>(&format!("SELECT {COLUMNS} FROM skills WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        proficiency: &str,
        icon_id: &str,
        icon_url: &str,
    ) -> anyhow::Result<Skill> {
        let row = sqlx::query_as::<_, Skill>(&format!(
            "INSERT INTO skills (title, proficiency, icon_id, icon_url) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        ))
        .bind(title)
        .bind(proficiency)
        .bind(icon_id)
        .bind(icon_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update_proficiency(
        db: &PgPool,
        id: Uuid,
        proficiency: &str,
    ) -> anyhow::Result<Option<Skill>> {
        let row = sqlx::query_as::<_, Skill>(&format!(
            "UPDATE skills SET proficiency = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(proficiency)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// A software application the owner is proficient with, shown on the public
/// site as an icon grid.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SoftwareApplication {
    pub id: Uuid,
    pub name: String,
    pub icon_id: String,
    pub icon_url: String,
    pub created_at: OffsetDateTime,
}

const COLUMNS: &str = "id, name, icon_id, icon_url, created_at";

impl SoftwareApplication {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<SoftwareApplication>> {
        let rows = sqlx::query_as::<_, SoftwareApplication>(&format!(
            "SELECT {COLUMNS} FROM software_applications ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<SoftwareApplication>> {
        let row = sqlx::query_as::<_, SoftwareApplication>(&format!(
            "SELECT {COLUMNS} FROM software_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(
        db: &PgPool,
        name: &str,
        icon_id: &str,
        icon_url: &str,
    ) -> anyhow::Result<SoftwareApplication> {
        let row = sqlx::query_as::<_, SoftwareApplication>(&format!(
            "INSERT INTO software_applications (name, icon_id, icon_url) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(name)
        .bind(icon_id)
        .bind(icon_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM software_applications WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub github_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
    pub image_id: String,
    pub image_url: String,
    pub created_at: OffsetDateTime,
}

pub struct NewProject {
    pub title: String,
    pub description: String,
    pub github_link: String,
    pub project_link: String,
    pub technologies: String,
    pub stack: String,
    pub deployed: String,
    pub image_id: String,
    pub image_url: String,
}

const COLUMNS: &str = "id, title, description, github_link, project_link, \
     technologies, stack, deployed, image_id, image_url, created_at";

impl Project {
    pub async fn list(db: &PgPool) -> anyhow::Result<Vec<Project>> {
        let rows = sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn find(db: &PgPool, id: Uuid) -> anyhow::Result<Option<Project>> {
        let row = sqlx::query_as::<_, Project>(&format!(
            "SELECT {COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, new: &NewProject) -> anyhow::Result<Project> {
        let row = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects \
             (title, description, github_link, project_link, technologies, stack, deployed, \
              image_id, image_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        ))
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.github_link)
        .bind(&new.project_link)
        .bind(&new.technologies)
        .bind(&new.stack)
        .bind(&new.deployed)
        .bind(&new.image_id)
        .bind(&new.image_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn update(db: &PgPool, id: Uuid, new: &NewProject) -> anyhow::Result<Project> {
        let row = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET \
             title = $2, description = $3, github_link = $4, project_link = $5, \
             technologies = $6, stack = $7, deployed = $8, image_id = $9, image_url = $10 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&new.title)
        .bind(&new.description)
        .bind(&new.github_link)
        .bind(&new.project_link)
        .bind(&new.technologies)
        .bind(&new.stack)
        .bind(&new.deployed)
        .bind(&new.image_id)
        .bind(&new.image_url)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}

use axum::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Credential record. The password digest and both reset fields are never
/// serialized into a response body.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub avatar_id: String,
    pub avatar_url: String,
    pub resume_id: String,
    pub resume_url: String,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_hash: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expires_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub password_hash: String,
    pub avatar_id: String,
    pub avatar_url: String,
    pub resume_id: String,
    pub resume_url: String,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
}

/// Non-credential fields writable through profile update.
pub struct ProfilePatch {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub about_me: String,
    pub avatar_id: String,
    pub avatar_url: String,
    pub resume_id: String,
    pub resume_url: String,
    pub portfolio_url: Option<String>,
    pub github_url: Option<String>,
    pub linkedin_url: Option<String>,
    pub instagram_url: Option<String>,
    pub twitter_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
}

const USER_COLUMNS: &str = "id, name, email, phone, about_me, password_hash, \
     avatar_id, avatar_url, resume_id, resume_url, \
     portfolio_url, github_url, linkedin_url, instagram_url, twitter_url, \
     facebook_url, youtube_url, reset_token_hash, reset_token_expires_at, created_at";

impl User {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// The record the public portfolio page renders. Single-owner app: the
    /// first-created user is the site owner.
    pub async fn first_profile(db: &PgPool) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC LIMIT 1"
        ))
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn create(db: &PgPool, new: &NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users \
             (name, email, phone, about_me, password_hash, \
              avatar_id, avatar_url, resume_id, resume_url, \
              portfolio_url, github_url, linkedin_url, instagram_url, twitter_url, \
              facebook_url, youtube_url) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(&new.email)
        .bind(&new.phone)
        .bind(&new.about_me)
        .bind(&new.password_hash)
        .bind(&new.avatar_id)
        .bind(&new.avatar_url)
        .bind(&new.resume_id)
        .bind(&new.resume_url)
        .bind(&new.portfolio_url)
        .bind(&new.github_url)
        .bind(&new.linkedin_url)
        .bind(&new.instagram_url)
        .bind(&new.twitter_url)
        .bind(&new.facebook_url)
        .bind(&new.youtube_url)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn update_profile(
        db: &PgPool,
        id: Uuid,
        patch: &ProfilePatch,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET \
             name = $2, email = $3, phone = $4, about_me = $5, \
             avatar_id = $6, avatar_url = $7, resume_id = $8, resume_url = $9, \
             portfolio_url = $10, github_url = $11, linkedin_url = $12, \
             instagram_url = $13, twitter_url = $14, facebook_url = $15, youtube_url = $16 \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.email)
        .bind(&patch.phone)
        .bind(&patch.about_me)
        .bind(&patch.avatar_id)
        .bind(&patch.avatar_url)
        .bind(&patch.resume_id)
        .bind(&patch.resume_url)
        .bind(&patch.portfolio_url)
        .bind(&patch.github_url)
        .bind(&patch.linkedin_url)
        .bind(&patch.instagram_url)
        .bind(&patch.twitter_url)
        .bind(&patch.facebook_url)
        .bind(&patch.youtube_url)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn set_password(db: &PgPool, id: Uuid, password_hash: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Both reset fields are written together; they are never set one at a time.
    pub async fn set_reset_token(
        db: &PgPool,
        id: Uuid,
        digest: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = $2, reset_token_expires_at = $3 WHERE id = $1",
        )
        .bind(id)
        .bind(digest)
        .bind(expires_at)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn clear_reset_token(db: &PgPool, id: Uuid) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET reset_token_hash = NULL, reset_token_expires_at = NULL WHERE id = $1",
        )
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }

    /// Redeem lookup: matches only an unexpired digest. Expired and unknown
    /// tokens are indistinguishable here by design.
    pub async fn find_by_reset_digest(db: &PgPool, digest: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users \
             WHERE reset_token_hash = $1 AND reset_token_expires_at > now()"
        ))
        .bind(digest)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Completes a password reset in one statement so a token can never be
    /// redeemed twice: the new digest lands and both reset fields clear
    /// atomically.
    pub async fn consume_reset_and_set_password(
        db: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET password_hash = $2, \
             reset_token_hash = NULL, reset_token_expires_at = NULL \
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(db)
        .await?;
        Ok(())
    }
}

/// The credential rows the reset flow touches, abstracted so the flow's
/// guarantees can be exercised without a live database.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()>;
    async fn clear_reset_token(&self, id: Uuid) -> anyhow::Result<()>;
    async fn find_by_reset_digest(&self, digest: &str) -> anyhow::Result<Option<User>>;
    async fn consume_reset_and_set_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()>;
}

#[async_trait]
impl CredentialStore for PgPool {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        User::find_by_email(self, email).await
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        digest: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<()> {
        User::set_reset_token(self, id, digest, expires_at).await
    }

    async fn clear_reset_token(&self, id: Uuid) -> anyhow::Result<()> {
        User::clear_reset_token(self, id).await
    }

    async fn find_by_reset_digest(&self, digest: &str) -> anyhow::Result<Option<User>> {
        User::find_by_reset_digest(self, digest).await
    }

    async fn consume_reset_and_set_password(
        &self,
        id: Uuid,
        password_hash: &str,
    ) -> anyhow::Result<()> {
        User::consume_reset_and_set_password(self, id, password_hash).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "a@x.com".into(),
            phone: "1234567890".into(),
            about_me: "about".into(),
            password_hash: "$argon2id$secret".into(),
            avatar_id: "AVATARS/a.png".into(),
            avatar_url: "https://cdn.local/AVATARS/a.png".into(),
            resume_id: "RESUMES/r.pdf".into(),
            resume_url: "https://cdn.local/RESUMES/r.pdf".into(),
            portfolio_url: None,
            github_url: Some("https://github.com/ada".into()),
            linkedin_url: None,
            instagram_url: None,
            twitter_url: None,
            facebook_url: None,
            youtube_url: None,
            reset_token_hash: Some("deadbeef".into()),
            reset_token_expires_at: Some(OffsetDateTime::now_utc()),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn serialization_never_exposes_secrets() {
        let json = serde_json::to_string(&sample_user()).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$argon2id$secret"));
        assert!(!json.contains("reset_token_hash"));
        assert!(!json.contains("reset_token_expires_at"));
        assert!(!json.contains("deadbeef"));
        assert!(json.contains("a@x.com"));
        assert!(json.contains("github.com/ada"));
    }
}

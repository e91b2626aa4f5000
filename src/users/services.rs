use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::auth::password::{hash_password, verify_password};
use crate::auth::reset;
use crate::error::ApiError;
use crate::mailer::{Email, Mailer};
use crate::users::repo::{CredentialStore, User};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Shared rule for every operation that writes a phone number.
pub(crate) fn validate_phone(phone: &str) -> Result<(), ApiError> {
    if phone.len() < 10 || phone.len() > 15 {
        return Err(ApiError::Validation(
            "Phone number must be 10 to 15 characters".into(),
        ));
    }
    Ok(())
}

/// Shared rule for every operation that sets a password.
pub(crate) fn validate_new_password(password: &str, confirm: &str) -> Result<(), ApiError> {
    if password.len() < 8 {
        return Err(ApiError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if password != confirm {
        return Err(ApiError::Validation(
            "Password and confirm password do not match".into(),
        ));
    }
    Ok(())
}

/// Login check. An unknown email and a wrong password both collapse into the
/// same `InvalidCredentials` so the endpoint cannot be used to enumerate
/// accounts.
pub(crate) fn verify_login(user: Option<User>, password: &str) -> Result<User, ApiError> {
    let user = user.ok_or(ApiError::InvalidCredentials)?;
    if !verify_password(password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }
    Ok(user)
}

pub(crate) fn verify_old_password(user: &User, old_password: &str) -> Result<(), ApiError> {
    if !verify_password(old_password, &user.password_hash)? {
        return Err(ApiError::Validation("Old password is incorrect".into()));
    }
    Ok(())
}

/// Issues a reset token and mails the recovery link. If delivery fails the
/// pending token is rolled back so no unreachable reset is left behind.
/// Returns the address the email went to.
pub(crate) async fn start_password_reset(
    store: &dyn CredentialStore,
    mailer: &dyn Mailer,
    dashboard_url: &str,
    email: &str,
) -> Result<String, ApiError> {
    let user = store
        .find_by_email(email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;

    let token = reset::generate();
    store
        .set_reset_token(user.id, &token.digest, token.expires_at)
        .await?;

    let reset_url = format!(
        "{}/password/reset/{}",
        dashboard_url.trim_end_matches('/'),
        token.plaintext
    );
    let body = format!(
        "You requested a password reset.\n\nOpen the link below to choose a new password:\n{}\n\nThe link expires in {} minutes. If you did not request this, ignore this email.",
        reset_url,
        reset::TOKEN_TTL_MINUTES
    );
    let delivery = mailer
        .send(Email {
            to: user.email.clone(),
            subject: "Portfolio dashboard password recovery".into(),
            body,
        })
        .await;

    if let Err(e) = delivery {
        // Never leave a pending reset the user cannot reach.
        store.clear_reset_token(user.id).await?;
        warn!(user_id = %user.id, error = %e, "reset email delivery failed; token rolled back");
        return Err(ApiError::DeliveryFailed(e.to_string()));
    }

    info!(user_id = %user.id, "reset token issued");
    Ok(user.email)
}

/// Redeems a reset token. The lookup only matches an unexpired digest, and
/// consumption clears both reset fields in the same write, so a token can be
/// redeemed at most once.
pub(crate) async fn complete_password_reset(
    store: &dyn CredentialStore,
    token: &str,
    password: &str,
    confirm: &str,
) -> Result<User, ApiError> {
    // Unknown and expired digests take the same path out.
    let user = store
        .find_by_reset_digest(&reset::digest(token))
        .await?
        .ok_or(ApiError::InvalidOrExpiredToken)?;

    validate_new_password(password, confirm)?;

    let password_hash = hash_password(password)?;
    store
        .consume_reset_and_set_password(user.id, &password_hash)
        .await?;

    info!(user_id = %user.id, "password reset completed");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use axum::async_trait;
    use time::{Duration, OffsetDateTime};
    use uuid::Uuid;

    use super::*;
    use crate::auth::password::hash_password;

    #[derive(Default)]
    struct MemoryStore {
        users: Mutex<Vec<User>>,
    }

    impl MemoryStore {
        fn with_user(user: User) -> Self {
            Self {
                users: Mutex::new(vec![user]),
            }
        }

        fn snapshot(&self, id: Uuid) -> User {
            self.users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == id)
                .cloned()
                .unwrap()
        }
    }

    #[async_trait]
    impl CredentialStore for MemoryStore {
        async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.email == email)
                .cloned())
        }

        async fn set_reset_token(
            &self,
            id: Uuid,
            digest: &str,
            expires_at: OffsetDateTime,
        ) -> anyhow::Result<()> {
            let mut users = self.users.lock().unwrap();
            let user = users.iter_mut().find(|u| u.id == id).unwrap();
            user.reset_token_hash = Some(digest.to_string());
            user.reset_token_expires_at = Some(expires_at);
            Ok(())
        }

        async fn clear_reset_token(&self, id: Uuid) -> anyhow::Result<()> {
            let mut users = self.users.lock().unwrap();
            let user = users.iter_mut().find(|u| u.id == id).unwrap();
            user.reset_token_hash = None;
            user.reset_token_expires_at = None;
            Ok(())
        }

        async fn find_by_reset_digest(&self, digest: &str) -> anyhow::Result<Option<User>> {
            let now = OffsetDateTime::now_utc();
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| {
                    u.reset_token_hash.as_deref() == Some(digest)
                        && u.reset_token_expires_at.is_some_and(|at| at > now)
                })
                .cloned())
        }

        async fn consume_reset_and_set_password(
            &self,
            id: Uuid,
            password_hash: &str,
        ) -> anyhow::Result<()> {
            let mut users = self.users.lock().unwrap();
            let user = users.iter_mut().find(|u| u.id == id).unwrap();
            user.password_hash = password_hash.to_string();
            user.reset_token_hash = None;
            user.reset_token_expires_at = None;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<Email>>,
    }

    impl RecordingMailer {
        fn token_from_last_email(&self) -> String {
            let sent = self.sent.lock().unwrap();
            let body = &sent.last().unwrap().body;
            let after = body.split("/password/reset/").nth(1).unwrap();
            after.split_whitespace().next().unwrap().to_string()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, email: Email) -> anyhow::Result<()> {
            self.sent.lock().unwrap().push(email);
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _email: Email) -> anyhow::Result<()> {
            Err(anyhow::anyhow!("smtp connection refused"))
        }
    }

    fn user_with_password(plain: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "a@x.com".into(),
            phone: "1234567890".into(),
            about_me: "about".into(),
            password_hash: hash_password(plain).unwrap(),
            avatar_id: "AVATARS/a.png".into(),
            avatar_url: "https://cdn.local/AVATARS/a.png".into(),
            resume_id: "RESUMES/r.pdf".into(),
            resume_url: "https://cdn.local/RESUMES/r.pdf".into(),
            portfolio_url: None,
            github_url: None,
            linkedin_url: None,
            instagram_url: None,
            twitter_url: None,
            facebook_url: None,
            youtube_url: None,
            reset_token_hash: None,
            reset_token_expires_at: None,
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last@sub.domain.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn password_rules() {
        assert!(validate_new_password("password123", "password123").is_ok());
        let short = validate_new_password("short", "short").unwrap_err();
        assert_eq!(short.to_string(), "Password must be at least 8 characters");
        let mismatch = validate_new_password("password123", "password124").unwrap_err();
        assert_eq!(
            mismatch.to_string(),
            "Password and confirm password do not match"
        );
    }

    #[test]
    fn login_accepts_correct_password() {
        let user = user_with_password("password123");
        let verified = verify_login(Some(user), "password123").expect("login ok");
        assert_eq!(verified.email, "a@x.com");
    }

    #[test]
    fn unknown_email_and_wrong_password_are_indistinguishable() {
        let missing = verify_login(None, "password123").unwrap_err();
        let wrong =
            verify_login(Some(user_with_password("password123")), "wrongpass").unwrap_err();
        assert!(matches!(missing, ApiError::InvalidCredentials));
        assert!(matches!(wrong, ApiError::InvalidCredentials));
        assert_eq!(missing.to_string(), wrong.to_string());
    }

    #[test]
    fn old_password_check() {
        let user = user_with_password("password123");
        assert!(verify_old_password(&user, "password123").is_ok());
        let err = verify_old_password(&user, "nope-nope").unwrap_err();
        assert_eq!(err.to_string(), "Old password is incorrect");
    }

    #[test]
    fn phone_length_rule() {
        assert!(validate_phone("1234567890").is_ok());
        assert!(validate_phone("+4912345678901").is_ok());
        let short = validate_phone("123456789").unwrap_err();
        assert_eq!(short.to_string(), "Phone number must be 10 to 15 characters");
        assert!(validate_phone("1234567890123456").is_err());
    }

    #[tokio::test]
    async fn reset_token_is_redeemable_exactly_once() {
        let user = user_with_password("password123");
        let user_id = user.id;
        let store = MemoryStore::with_user(user);
        let mailer = RecordingMailer::default();

        start_password_reset(&store, &mailer, "https://dash.local/", "a@x.com")
            .await
            .expect("reset started");
        let token = mailer.token_from_last_email();

        let redeemed = complete_password_reset(&store, &token, "newpassword1", "newpassword1")
            .await
            .expect("first redemption succeeds");
        assert_eq!(redeemed.id, user_id);
        let updated = store.snapshot(user_id);
        assert!(verify_password("newpassword1", &updated.password_hash).unwrap());
        assert!(updated.reset_token_hash.is_none());
        assert!(updated.reset_token_expires_at.is_none());

        let second = complete_password_reset(&store, &token, "otherpassword2", "otherpassword2")
            .await
            .unwrap_err();
        assert!(matches!(second, ApiError::InvalidOrExpiredToken));
        // The replay must not have touched the stored credential.
        assert!(verify_password(
            "newpassword1",
            &store.snapshot(user_id).password_hash
        )
        .unwrap());
    }

    #[tokio::test]
    async fn expired_token_is_rejected_even_when_digest_matches() {
        let mut user = user_with_password("password123");
        let token = reset::generate();
        user.reset_token_hash = Some(token.digest.clone());
        user.reset_token_expires_at = Some(OffsetDateTime::now_utc() - Duration::minutes(1));
        let store = MemoryStore::with_user(user);

        let err = complete_password_reset(&store, &token.plaintext, "newpassword1", "newpassword1")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidOrExpiredToken));
    }

    #[tokio::test]
    async fn delivery_failure_rolls_back_pending_reset() {
        let user = user_with_password("password123");
        let user_id = user.id;
        let store = MemoryStore::with_user(user);

        let err = start_password_reset(&store, &FailingMailer, "https://dash.local", "a@x.com")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::DeliveryFailed(_)));

        let after = store.snapshot(user_id);
        assert!(after.reset_token_hash.is_none());
        assert!(after.reset_token_expires_at.is_none());
    }
}

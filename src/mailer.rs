use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use lettre::{
    message::Mailbox, transport::smtp::authentication::Credentials, AsyncSmtpTransport,
    AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::SmtpConfig;

#[derive(Debug, Clone)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> anyhow::Result<()>;
}

/// SMTP delivery via lettre. With no host configured it runs in no-op mode
/// and only logs, so development does not need mail infrastructure.
pub struct SmtpMailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
    timeout: Duration,
}

impl SmtpMailer {
    pub fn new(cfg: &SmtpConfig) -> anyhow::Result<Self> {
        let from = cfg
            .from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid SMTP_FROM address {:?}", cfg.from))?;

        let transport = if cfg.host.trim().is_empty() {
            warn!("SMTP host not configured; mailer runs in no-op mode");
            None
        } else {
            let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&cfg.host)
                .context("configure smtp transport")?
                .port(cfg.port);
            if let (Some(username), Some(password)) = (&cfg.username, &cfg.password) {
                builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
            }
            Some(builder.build())
        };

        Ok(Self {
            transport,
            from,
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: Email) -> anyhow::Result<()> {
        let Some(transport) = &self.transport else {
            info!(to = %email.to, subject = %email.subject, "mailer no-op; email not sent");
            return Ok(());
        };

        let to = email
            .to
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient address {:?}", email.to))?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .body(email.body)
            .context("build email")?;

        tokio::time::timeout(self.timeout, transport.send(message))
            .await
            .context("smtp send timed out")?
            .context("smtp send")?;
        Ok(())
    }
}

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
    /// Base for public object URLs; defaults to `{endpoint}/{bucket}`.
    pub public_base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub smtp: SmtpConfig,
    /// Public portfolio site; allowed CORS origin.
    pub portfolio_url: String,
    /// Admin dashboard; allowed CORS origin and base of password-reset links.
    pub dashboard_url: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "folio".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "folio-users".into()),
            ttl_minutes: std::env::var("JWT_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24),
        };
        let endpoint = std::env::var("S3_ENDPOINT")?;
        let bucket = std::env::var("S3_BUCKET")?;
        let storage = StorageConfig {
            public_base_url: std::env::var("S3_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("{}/{}", endpoint.trim_end_matches('/'), bucket)),
            endpoint,
            bucket,
            access_key: std::env::var("S3_ACCESS_KEY")?,
            secret_key: std::env::var("S3_SECRET_KEY")?,
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
            timeout_secs: std::env::var("S3_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };
        let smtp = SmtpConfig {
            host: std::env::var("SMTP_HOST").unwrap_or_default(),
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: std::env::var("SMTP_FROM").unwrap_or_else(|_| "no-reply@localhost".into()),
            timeout_secs: std::env::var("SMTP_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(15),
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            smtp,
            portfolio_url: std::env::var("PORTFOLIO_URL")
                .unwrap_or_else(|_| "http://localhost:5173".into()),
            dashboard_url: std::env::var("DASHBOARD_URL")
                .unwrap_or_else(|_| "http://localhost:5174".into()),
        })
    }
}

use std::time::Duration;

use anyhow::Context;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use axum::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use crate::config::StorageConfig;

/// Handle to an uploaded object: `id` is the deletion key, `url` is public.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn upload(
        &self,
        folder: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<StoredObject>;
    async fn delete(&self, id: &str) -> anyhow::Result<()>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
    timeout: Duration,
}

impl Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                cfg.access_key.clone(),
                cfg.secret_key.clone(),
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
            public_base_url: cfg.public_base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(cfg.timeout_secs),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn upload(
        &self,
        folder: &str,
        body: Bytes,
        content_type: &str,
    ) -> anyhow::Result<StoredObject> {
        let ext = ext_from_mime(content_type).unwrap_or("bin");
        let key = format!("{}/{}.{}", folder, Uuid::new_v4(), ext);
        let fut = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send();
        tokio::time::timeout(self.timeout, fut)
            .await
            .context("s3 put_object timed out")?
            .with_context(|| format!("s3 put_object {}", key))?;
        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key),
            id: key,
        })
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        let fut = self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(id)
            .send();
        tokio::time::timeout(self.timeout, fut)
            .await
            .context("s3 delete_object timed out")?
            .with_context(|| format!("s3 delete_object {}", id))?;
        Ok(())
    }
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/svg+xml" => Some("svg"),
        "application/pdf" => Some("pdf"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_ext_from_mime() {
        assert_eq!(super::ext_from_mime("image/jpeg"), Some("jpg"));
        assert_eq!(super::ext_from_mime("image/png"), Some("png"));
        assert_eq!(super::ext_from_mime("image/svg+xml"), Some("svg"));
        assert_eq!(super::ext_from_mime("application/pdf"), Some("pdf"));
        assert_eq!(super::ext_from_mime("application/octet-stream"), None);
    }
}

//! Redis-backed manifest lookup.

use domain::models::ManifestEntry;
use domain::services::ManifestLookup;
use domain::ReportError;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

/// Reads manifest entries stored as JSON strings under `<prefix><hash>`.
#[derive(Clone)]
pub struct RedisManifestLookup {
    conn: MultiplexedConnection,
    prefix: String,
}

impl RedisManifestLookup {
    /// Opens a multiplexed connection shared by every worker.
    pub async fn connect(url: &str, prefix: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = client.get_multiplexed_async_connection().await?;
        Ok(Self {
            conn,
            prefix: prefix.to_string(),
        })
    }

    fn cache_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

#[async_trait::async_trait]
impl ManifestLookup for RedisManifestLookup {
    async fn lookup(&self, key: &str) -> Result<ManifestEntry, ReportError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(self.cache_key(key))
            .await
            .map_err(|e| ReportError::manifest(key, e))?;

        let raw = raw.ok_or_else(|| ReportError::manifest(key, "key not found"))?;
        parse_entry(key, &raw)
    }
}

fn parse_entry(key: &str, raw: &str) -> Result<ManifestEntry, ReportError> {
    serde_json::from_str(raw).map_err(|e| ReportError::manifest(key, e))
}

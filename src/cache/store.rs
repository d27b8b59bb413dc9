use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

use crate::cache::CacheError;

/// Key/value store with per-key expiry.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;
}

/// Redis commands sent as JSON arrays over HTTPS with a bearer token.
pub struct RestKvStore {
    http: reqwest::Client,
    url: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct RestReply {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

impl RestKvStore {
    pub fn new(http: reqwest::Client, url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
            token: token.into(),
        }
    }

    async fn command(
        &self,
        args: serde_json::Value,
    ) -> Result<Option<serde_json::Value>, CacheError> {
        let response = self
            .http
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()
            .await?;

        let status = response.status();
        let reply: RestReply = response.json().await?;
        if let Some(error) = reply.error {
            return Err(CacheError::Command(error));
        }
        if !status.is_success() {
            return Err(CacheError::Unavailable(format!("HTTP {}", status)));
        }
        Ok(reply.result.filter(|v| !v.is_null()))
    }
}

#[async_trait]
impl KvStore for RestKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self.command(json!(["GET", key])).await? {
            Some(serde_json::Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(CacheError::Command(format!(
                "unexpected GET reply: {}",
                other
            ))),
            None => Ok(None),
        }
    }

    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let seconds = ttl.as_secs().max(1).to_string();
        self.command(json!(["SET", key, value, "EX", seconds]))
            .await
            .map(|_| ())
    }
}

/// In-process store for single-node deployments and tests.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, expires_at)) if *expires_at > Instant::now() => {
                Ok(Some(value.clone()))
            }
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Also drops every expired entry, so keys that are never read again
    /// do not pile up.
    async fn set_ex(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.lock().unwrap();
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_expires_entries() {
        let store = MemoryKvStore::new();
        store
            .set_ex("k", "v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_memory_store_sweeps_expired_keys_on_write() {
        let store = MemoryKvStore::new();
        for day in 0..1000 {
            let key = format!("ephemeris:earth:{}", day);
            store
                .set_ex(&key, "v", Duration::from_secs(60))
                .await
                .unwrap();
        }
        assert_eq!(store.entries.lock().unwrap().len(), 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        store
            .set_ex("ephemeris:earth:fresh", "v", Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(store.entries.lock().unwrap().len(), 1);
        assert_eq!(
            store.get("ephemeris:earth:fresh").await.unwrap().as_deref(),
            Some("v")
        );
    }

    #[tokio::test]
    async fn test_memory_store_missing_key() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("absent").await.unwrap(), None);
    }

    #[test]
    fn test_rest_reply_shapes() {
        let ok: RestReply = serde_json::from_str(r#"{"result":"OK"}"#).unwrap();
        assert_eq!(ok.result, Some(json!("OK")));
        let err: RestReply = serde_json::from_str(r#"{"error":"WRONGPASS"}"#).unwrap();
        assert_eq!(err.error.as_deref(), Some("WRONGPASS"));
        let nil: RestReply = serde_json::from_str(r#"{"result":null}"#).unwrap();
        assert!(nil.result.is_none());
    }
}

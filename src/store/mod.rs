//! Remote document store client
//!
//! The store holds two collections the gateway reads: `preset_log` (the
//! priming seed, one record addressed by id, with the message array held as
//! a JSON-encoded string field) and `photo` (reference image records, newest
//! first). Spoken over a Data-API-style HTTP endpoint with api-key auth.

pub mod drive;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;

use crate::config::StoreConfig;
use crate::transcript::Message;
use crate::{Error, Result};

/// Collection holding the priming-seed record
const PRESET_COLLECTION: &str = "preset_log";

/// Collection holding reference image records
const PHOTO_COLLECTION: &str = "photo";

/// A reference image record
#[derive(Debug, Clone, Deserialize)]
pub struct PhotoRecord {
    /// Share URL of the stored image
    pub file_url: String,
}

#[derive(Deserialize)]
struct FindOneResponse {
    document: Option<serde_json::Value>,
}

#[derive(Deserialize)]
struct FindResponse {
    documents: Vec<serde_json::Value>,
}

/// Client for the remote document store
#[derive(Debug, Clone)]
pub struct StoreClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<SecretString>,
    priming_record: String,
}

impl StoreClient {
    /// Create a new store client
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self> {
        url::Url::parse(&config.url)
            .map_err(|e| Error::Store(format!("invalid store url: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Store(format!("failed to build store client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            priming_record: config.priming_record.clone(),
        })
    }

    /// Fetch the priming seed: the configured record's `messages` field,
    /// parsed from its JSON-encoded string form into a message array
    ///
    /// # Errors
    ///
    /// Returns error if the record is missing or its messages don't parse
    pub async fn priming_seed(&self) -> Result<Vec<Message>> {
        let body = json!({
            "collection": PRESET_COLLECTION,
            "filter": { "_id": { "$oid": self.priming_record } },
        });

        let response: FindOneResponse = self.post_action("findOne", &body).await?;
        let document = response.document.ok_or_else(|| {
            Error::Store(format!("priming record not found: {}", self.priming_record))
        })?;

        let raw = document
            .get("messages")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| Error::Store("priming record has no messages field".to_string()))?;

        let messages: Vec<Message> = serde_json::from_str(raw)
            .map_err(|e| Error::Store(format!("priming messages are not valid: {e}")))?;

        tracing::debug!(messages = messages.len(), "fetched priming seed");
        Ok(messages)
    }

    /// Fetch the most-recently-stored reference image record
    ///
    /// # Errors
    ///
    /// Returns error if the collection is empty or the record is malformed
    pub async fn latest_photo(&self) -> Result<PhotoRecord> {
        let body = json!({
            "collection": PHOTO_COLLECTION,
            "sort": { "_id": -1 },
            "limit": 1,
        });

        let response: FindResponse = self.post_action("find", &body).await?;
        let document = response
            .documents
            .into_iter()
            .next()
            .ok_or_else(|| Error::Store("no photo records in store".to_string()))?;

        let record: PhotoRecord = serde_json::from_value(document)
            .map_err(|e| Error::Store(format!("photo record is malformed: {e}")))?;

        tracing::debug!(file_url = %record.file_url, "fetched latest photo record");
        Ok(record)
    }

    /// Bare HTTP client, reused for file downloads so they share the timeout
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.client
    }

    async fn post_action<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: &serde_json::Value,
    ) -> Result<T> {
        let url = format!("{}/action/{action}", self.base_url);

        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| Error::Store(format!("store request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Store(format!("store error {status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Store(format!("failed to parse store response: {e}")))
    }
}

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{ACCEPT, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::api::{
    AnalyticsBackend, FetchRecordsRequest, FlagUpdateRequest, RoleUpdateRequest, TaskStatusSource,
    TaskStatusStream,
};
use crate::error::{BackendError, Result};
use crate::reply::check_reply;
use crate::task_status::task_status_events;

/// Where the backend lives and how long a request may take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL every endpoint path is appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout for fetch and mutation calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<Url> {
        let url = Url::parse(&self.base_url)?;
        if url.cannot_be_a_base() {
            return Err(BackendError::InvalidConfig(format!(
                "base_url `{}` cannot carry endpoint paths",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(BackendError::InvalidConfig(
                "timeout_secs must be > 0".to_string(),
            ));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// [`AnalyticsBackend`] and [`TaskStatusSource`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    client: reqwest::Client,
    /// Status streams stay open until the task ends, so this client only
    /// bounds connection setup.
    stream_client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base_url = config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        let stream_client = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .build()?;
        Ok(Self {
            base_url,
            client,
            stream_client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                BackendError::InvalidConfig(format!("base_url `{}` has no path", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<Value> {
        let url = self.endpoint(&[path])?;
        debug!("POST {url}");
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let bytes = response.bytes().await?;
        let reply: Value = serde_json::from_slice(&bytes)?;
        check_reply(reply)
    }
}

#[async_trait]
impl AnalyticsBackend for HttpBackend {
    async fn fetch_records(&self, request: &FetchRecordsRequest) -> Result<Vec<Value>> {
        match self.post("get-rag-analytics-data", request).await? {
            Value::Array(rows) => {
                info!("fetched {} analytics rows", rows.len());
                Ok(rows)
            }
            other => Err(BackendError::UnexpectedReply {
                endpoint: "get-rag-analytics-data".to_string(),
                detail: format!("expected an array of rows, got {other}"),
            }),
        }
    }

    async fn update_embedding_flags(&self, request: &FlagUpdateRequest) -> Result<Value> {
        let reply = self.post("update-embedding-flags", request).await?;
        info!(
            "{} {} acknowledged for [{}]",
            request.flag_update_mode, request.flag_name, request.ids_to_update
        );
        Ok(reply)
    }

    async fn update_embedding_roles(&self, request: &RoleUpdateRequest) -> Result<Value> {
        let reply = self.post("update-embeddings-roles", request).await?;
        info!(
            "roles `{}` acknowledged for [{}]",
            request.new_role, request.ids_to_update
        );
        Ok(reply)
    }
}

#[async_trait]
impl TaskStatusSource for HttpBackend {
    async fn subscribe(&self, task_id: &str) -> Result<TaskStatusStream> {
        let url = self.endpoint(&["task_status", task_id])?;
        debug!("GET {url} (event stream)");
        let response = self
            .stream_client
            .get(url)
            .header(ACCEPT, HeaderValue::from_static("text/event-stream"))
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(task_status_events(response.bytes_stream()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn endpoints_keep_the_base_path() {
        let backend = HttpBackend::new(&BackendConfig::new("http://localhost:5000/api/")).unwrap();
        assert_eq!(
            backend.endpoint(&["update-embedding-flags"]).unwrap().as_str(),
            "http://localhost:5000/api/update-embedding-flags"
        );
        assert_eq!(
            backend.endpoint(&["task_status", "a b"]).unwrap().as_str(),
            "http://localhost:5000/api/task_status/a%20b"
        );
    }

    #[test]
    fn config_validation() {
        assert!(BackendConfig::default().validate().is_ok());
        assert!(matches!(
            BackendConfig::new("not a url").validate(),
            Err(BackendError::InvalidUrl(_))
        ));
        assert!(matches!(
            BackendConfig::new("mailto:ops@example.com").validate(),
            Err(BackendError::InvalidConfig(_))
        ));
        let config = BackendConfig {
            timeout_secs: 0,
            ..BackendConfig::default()
        };
        assert!(config.validate().is_err());
    }
}

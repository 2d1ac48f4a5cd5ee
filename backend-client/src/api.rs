use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::task_status::TaskStatus;

/// Body of `POST /get-rag-analytics-data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchRecordsRequest {
    pub user_id: String,
    pub chat_id: u64,
    pub model_id: String,
    pub mode: String,
    pub persona: String,
    pub use_cache: bool,
    pub query: String,
}

impl FetchRecordsRequest {
    pub fn new(user_id: impl Into<String>, persona: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            chat_id: 0,
            model_id: "gpt-35-turbo".to_string(),
            mode: "docsearch".to_string(),
            persona: persona.into(),
            use_cache: false,
            query: String::new(),
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }
}

/// Body of `POST /update-embedding-flags`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagUpdateRequest {
    pub persona: String,
    /// Record ids joined by `", "`.
    pub ids_to_update: String,
    pub flag_name: String,
    /// `raise_flag` or `drop_flag`.
    pub flag_update_mode: String,
}

/// Body of `POST /update-embeddings-roles`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleUpdateRequest {
    pub user_id: String,
    pub persona: String,
    /// Record ids joined by `", "`.
    pub ids_to_update: String,
    /// Roles joined by `", "`.
    pub new_role: String,
}

/// Fetch and mutation endpoints of the analytics backend.
///
/// Every method fails with [`crate::BackendError::Rejected`] when the reply
/// is error-shaped, so callers only see success payloads.
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// Raw record rows, to be normalized by the caller.
    async fn fetch_records(&self, request: &FetchRecordsRequest) -> Result<Vec<Value>>;

    async fn update_embedding_flags(&self, request: &FlagUpdateRequest) -> Result<Value>;

    async fn update_embedding_roles(&self, request: &RoleUpdateRequest) -> Result<Value>;
}

pub type TaskStatusStream = BoxStream<'static, Result<TaskStatus>>;

/// Progress updates for long-running backend tasks.
#[async_trait]
pub trait TaskStatusSource: Send + Sync {
    async fn subscribe(&self, task_id: &str) -> Result<TaskStatusStream>;
}

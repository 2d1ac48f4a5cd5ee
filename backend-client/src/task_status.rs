//! Task status updates delivered as server-sent events.

use eventsource_stream::Eventsource;
use futures::{Stream, StreamExt};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::api::TaskStatusStream;
use crate::error::{BackendError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskState {
    Pending,
    Started,
    Success,
    Failed,
    Unfinished,
    Other(String),
}

impl TaskState {
    pub fn as_str(&self) -> &str {
        match self {
            TaskState::Pending => "PENDING",
            TaskState::Started => "STARTED",
            TaskState::Success => "SUCCESS",
            TaskState::Failed => "FAILED",
            TaskState::Unfinished => "UNFINISHED",
            TaskState::Other(state) => state,
        }
    }

    /// SUCCESS, FAILED and UNFINISHED end the stream.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Success | TaskState::Failed | TaskState::Unfinished
        )
    }
}

impl From<String> for TaskState {
    fn from(state: String) -> Self {
        match state.as_str() {
            "PENDING" => TaskState::Pending,
            "STARTED" => TaskState::Started,
            "SUCCESS" => TaskState::Success,
            "FAILED" => TaskState::Failed,
            "UNFINISHED" => TaskState::Unfinished,
            _ => TaskState::Other(state),
        }
    }
}

impl From<TaskState> for String {
    fn from(state: TaskState) -> Self {
        match state {
            TaskState::Other(state) => state,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    pub state: TaskState,
    #[serde(default)]
    pub result: Option<Value>,
}

/// Decode one event payload. Payloads that are themselves JSON-encoded
/// strings are unwrapped once.
pub fn parse_status(data: &str) -> Result<TaskStatus> {
    let value: Value = serde_json::from_str(data)?;
    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)?,
        other => other,
    };
    Ok(serde_json::from_value(value)?)
}

/// Turn a raw SSE byte stream into task status updates. Events without data
/// are skipped.
pub fn task_status_events<S, B, E>(bytes: S) -> TaskStatusStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: fmt::Display + Send + 'static,
{
    bytes
        .eventsource()
        .filter_map(|event| {
            let status = match event {
                Ok(event) if event.data.trim().is_empty() => None,
                Ok(event) => Some(parse_status(&event.data)),
                Err(err) => Some(Err(BackendError::Stream(err.to_string()))),
            };
            futures::future::ready(status)
        })
        .boxed()
}

/// Drain `stream` until a terminal state. SUCCESS yields the task result;
/// FAILED and UNFINISHED are errors.
pub async fn wait_for_terminal(task_id: &str, mut stream: TaskStatusStream) -> Result<Value> {
    while let Some(status) = stream.next().await {
        let status = status?;
        debug!("task {task_id} is {}", status.state);
        match status.state {
            TaskState::Success => return Ok(status.result.unwrap_or(Value::Null)),
            TaskState::Failed | TaskState::Unfinished => {
                warn!("task {task_id} ended as {}", status.state);
                return Err(BackendError::TaskFailed {
                    task_id: task_id.to_string(),
                    state: status.state.to_string(),
                });
            }
            _ => {}
        }
    }
    Err(BackendError::StreamClosed {
        task_id: task_id.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sse(chunks: &[&str]) -> TaskStatusStream {
        let chunks: Vec<std::result::Result<Vec<u8>, std::io::Error>> = chunks
            .iter()
            .map(|chunk| Ok(chunk.as_bytes().to_vec()))
            .collect();
        task_status_events(futures::stream::iter(chunks))
    }

    #[tokio::test]
    async fn success_returns_the_result() {
        let stream = sse(&[
            "data: {\"state\":\"PENDING\"}\n\n",
            "data: {\"state\":\"STARTED\"}\n",
            "\n: keep-alive\n\n",
            "data: {\"state\":\"SUCCESS\",\"result\":{\"answer\":42}}\n\n",
        ]);
        let result = wait_for_terminal("t-1", stream).await.unwrap();
        assert_eq!(result, serde_json::json!({"answer": 42}));
    }

    #[tokio::test]
    async fn unfinished_is_a_terminal_failure() {
        let stream = sse(&["data: {\"state\":\"UNFINISHED\"}\n\n"]);
        let err = wait_for_terminal("t-2", stream).await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::TaskFailed { ref state, .. } if state == "UNFINISHED"
        ));
    }

    #[tokio::test]
    async fn stream_ending_early_is_reported() {
        let stream = sse(&["data: {\"state\":\"PENDING\"}\n\n"]);
        assert!(matches!(
            wait_for_terminal("t-3", stream).await,
            Err(BackendError::StreamClosed { .. })
        ));
    }

    #[test]
    fn double_encoded_payloads_are_unwrapped() {
        let status = parse_status(r#""{\"state\":\"FAILED\"}""#).unwrap();
        assert_eq!(status.state, TaskState::Failed);
        assert!(status.state.is_terminal());
        assert_eq!(
            parse_status(r#"{"state":"RETRY"}"#).unwrap().state,
            TaskState::Other("RETRY".to_string())
        );
    }
}

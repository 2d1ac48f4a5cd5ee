use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with an error-shaped payload.
    #[error("{message}")]
    Rejected { message: String },

    #[error("Error Network response was not ok. {status} : {body}")]
    Status { status: u16, body: String },

    #[error("Error while fetching data: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error decoding response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Error unexpected reply from {endpoint}: {detail}")]
    UnexpectedReply { endpoint: String, detail: String },

    #[error("Error task `{task_id}` ended in state {state}")]
    TaskFailed { task_id: String, state: String },

    #[error("Error in task status stream: {0}")]
    Stream(String),

    #[error("Error task status stream for `{task_id}` closed before a terminal state")]
    StreamClosed { task_id: String },

    #[error("Error invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid backend config: {0}")]
    InvalidConfig(String),
}

impl BackendError {
    /// Snackbar text for a failed action, e.g. `Quarantine - Message: ...`.
    pub fn user_notice(&self, action: &str) -> String {
        crate::reply::user_notice(action, &self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BackendError>;

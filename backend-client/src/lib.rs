//! Client side of the analytics backend: record fetch, flag and access-role
//! mutations, and task status streams.
//!
//! The traits in this crate are what the session layer depends on;
//! [`HttpBackend`] is the production implementation over `reqwest`.

mod api;
mod error;
mod http;
mod reply;
mod task_status;

pub use api::{
    AnalyticsBackend, FetchRecordsRequest, FlagUpdateRequest, RoleUpdateRequest, TaskStatusSource,
    TaskStatusStream,
};
pub use error::{BackendError, Result};
pub use http::{BackendConfig, HttpBackend};
pub use reply::{check_reply, error_message, user_notice};
pub use task_status::{TaskState, TaskStatus, parse_status, task_status_events, wait_for_terminal};

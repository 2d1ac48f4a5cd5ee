use ragdesk_analytics::AnalyticsError;
use ragdesk_backend_client::BackendError;
use ragdesk_navigation::NavigationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Analytics(#[from] AnalyticsError),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("profile store was dropped")]
    ProfileClosed,
}

impl SessionError {
    /// The response belonged to a view that no longer exists.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            SessionError::Analytics(AnalyticsError::StaleResponse { .. })
        )
    }

    /// Snackbar text for backend failures; other errors are caller bugs and
    /// have no notice.
    pub fn user_notice(&self, action: &str) -> Option<String> {
        match self {
            SessionError::Backend(err) => Some(err.user_notice(action)),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;

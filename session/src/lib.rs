//! Async glue between the view models and the backend.
//!
//! [`ProfileStore`] holds the current role in a `watch` channel and
//! [`NavigationController`] rebuilds the sidebar and card grid whenever it
//! changes. [`AnalyticsSession`] runs quarantine and access-role round-trips
//! against an [`ragdesk_backend_client::AnalyticsBackend`].

mod analytics_session;
mod error;
mod profile;

pub use analytics_session::{AnalyticsSession, MutationOutcome, SharedEngine};
pub use error::{Result, SessionError};
pub use profile::{NavigationController, ProfileStore};

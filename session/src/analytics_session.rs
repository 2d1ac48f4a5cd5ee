use log::{debug, warn};
use parking_lot::Mutex;
use ragdesk_analytics::{AnalyticsEngine, FlagMode, FlagName};
use ragdesk_backend_client::{
    AnalyticsBackend, FetchRecordsRequest, FlagUpdateRequest, RoleUpdateRequest,
};
use std::sync::Arc;

use crate::error::Result;

/// Engine handle shared between the session and whatever renders it.
pub type SharedEngine = Arc<Mutex<AnalyticsEngine>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The backend acknowledged the change and it was applied locally.
    Applied { records: usize },
    /// Every resolved record already had the requested value.
    NothingToSend,
}

/// Runs analytics mutations against a backend.
///
/// Each round-trip locks the engine only to prepare the request and again to
/// apply the acknowledgment; the lock is never held while waiting on the
/// backend. If the view changed in between, the acknowledgment is discarded
/// as stale.
pub struct AnalyticsSession<B> {
    engine: SharedEngine,
    backend: Arc<B>,
}

impl<B: AnalyticsBackend> AnalyticsSession<B> {
    pub fn new(engine: AnalyticsEngine, backend: Arc<B>) -> Self {
        Self::with_shared(Arc::new(Mutex::new(engine)), backend)
    }

    pub fn with_shared(engine: SharedEngine, backend: Arc<B>) -> Self {
        Self { engine, backend }
    }

    pub fn engine(&self) -> SharedEngine {
        Arc::clone(&self.engine)
    }

    /// Fetch a fresh batch and replace the working set.
    pub async fn refresh(&self, request: &FetchRecordsRequest) -> Result<usize> {
        let rows = self.backend.fetch_records(request).await?;
        let loaded = self.engine.lock().load(&rows)?;
        Ok(loaded)
    }

    /// Request for the current role, as the fetch layer expects it.
    pub fn fetch_request(&self, user_id: &str) -> FetchRecordsRequest {
        let persona = self.engine.lock().config().persona.clone();
        FetchRecordsRequest::new(user_id, persona)
    }

    pub async fn quarantine(&self, selected_ids: &[String]) -> Result<MutationOutcome> {
        self.set_flag(selected_ids, FlagName::Quarantine, FlagMode::Raise)
            .await
    }

    pub async fn unquarantine(&self, selected_ids: &[String]) -> Result<MutationOutcome> {
        self.set_flag(selected_ids, FlagName::Quarantine, FlagMode::Drop)
            .await
    }

    pub async fn set_flag(
        &self,
        selected_ids: &[String],
        flag: FlagName,
        mode: FlagMode,
    ) -> Result<MutationOutcome> {
        let (update, persona) = {
            let engine = self.engine.lock();
            (
                engine.prepare_flag_update(selected_ids, flag, mode)?,
                engine.config().persona.clone(),
            )
        };
        if update.is_empty() {
            debug!("{mode} {flag}: nothing to send");
            return Ok(MutationOutcome::NothingToSend);
        }

        let request = FlagUpdateRequest {
            persona,
            ids_to_update: update.ids_csv(),
            flag_name: flag.to_string(),
            flag_update_mode: mode.to_string(),
        };
        self.backend.update_embedding_flags(&request).await?;

        let records = self
            .engine
            .lock()
            .confirm_flag_update(&update)
            .inspect_err(|err| warn!("{mode} {flag} not applied: {err}"))?;
        Ok(MutationOutcome::Applied { records })
    }

    /// Save the first selected row's access roles on every selected record.
    pub async fn update_access_roles(&self, selected_ids: &[String]) -> Result<MutationOutcome> {
        let (update, request) = {
            let engine = self.engine.lock();
            let update = engine.prepare_role_update(selected_ids)?;
            let request = RoleUpdateRequest {
                user_id: engine.config().user_id.clone(),
                persona: engine.config().persona.clone(),
                ids_to_update: update.ids_csv(),
                new_role: update.roles_csv(),
            };
            (update, request)
        };
        self.backend.update_embedding_roles(&request).await?;

        let records = self
            .engine
            .lock()
            .confirm_role_update(&update)
            .inspect_err(|err| warn!("access role update not applied: {err}"))?;
        Ok(MutationOutcome::Applied { records })
    }

    /// Ids currently checked in the grid.
    pub fn selection(&self) -> Vec<String> {
        self.engine.lock().selection().to_vec()
    }
}

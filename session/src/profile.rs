//! The current role and the navigation views that follow it.

use log::{debug, info};
use ragdesk_navigation::{
    CardGrid, NavCatalog, NavigationModel, ProfileOption, Role, profile_options,
};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::{Result, SessionError};

/// Owner of the current role. Every interested view subscribes to it
/// instead of reading a global.
#[derive(Debug)]
pub struct ProfileStore {
    role_tx: watch::Sender<Role>,
    options: Vec<ProfileOption>,
}

impl Default for ProfileStore {
    fn default() -> Self {
        Self::new(Role::Admin, Role::DEFAULT_OPTIONS)
    }
}

impl ProfileStore {
    pub fn new<I, S>(initial: Role, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let (role_tx, _) = watch::channel(initial);
        Self {
            role_tx,
            options: profile_options(labels),
        }
    }

    pub fn current(&self) -> Role {
        self.role_tx.borrow().clone()
    }

    /// Options for the profile picker.
    pub fn options(&self) -> &[ProfileOption] {
        &self.options
    }

    /// Make `role` current. Subscribers are only woken when it differs from
    /// the previous role. Returns whether it did.
    pub fn set_role(&self, role: Role) -> bool {
        let changed = self.role_tx.send_if_modified(|current| {
            if *current == role {
                return false;
            }
            *current = role.clone();
            true
        });
        if changed {
            info!("profile switched to `{role}`");
        }
        changed
    }

    /// Select a picker option by its `value`.
    pub fn select_option(&self, value: &str) -> Option<Role> {
        let option = self.options.iter().find(|option| option.value == value)?;
        let role = Role::parse(&option.label);
        self.set_role(role.clone());
        Some(role)
    }

    pub fn subscribe(&self) -> watch::Receiver<Role> {
        self.role_tx.subscribe()
    }
}

/// Sidebar and home card grid kept in sync with a [`ProfileStore`].
#[derive(Debug)]
pub struct NavigationController {
    catalog: Arc<NavCatalog>,
    sidebar: NavigationModel,
    cards: CardGrid,
    roles: watch::Receiver<Role>,
}

impl NavigationController {
    pub fn new(catalog: Arc<NavCatalog>, mut roles: watch::Receiver<Role>) -> Self {
        let role = roles.borrow_and_update().clone();
        Self {
            cards: CardGrid::new(&catalog, &role),
            sidebar: NavigationModel::new(Arc::clone(&catalog), role),
            catalog,
            roles,
        }
    }

    pub fn sidebar(&self) -> &NavigationModel {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut NavigationModel {
        &mut self.sidebar
    }

    pub fn cards(&self) -> &CardGrid {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut CardGrid {
        &mut self.cards
    }

    /// Apply a pending role change without waiting. Returns whether one was
    /// applied.
    pub fn sync(&mut self) -> Result<bool> {
        if !self
            .roles
            .has_changed()
            .map_err(|_| SessionError::ProfileClosed)?
        {
            return Ok(false);
        }
        self.apply_current();
        Ok(true)
    }

    /// Wait for the next role change and apply it.
    pub async fn changed(&mut self) -> Result<Role> {
        self.roles
            .changed()
            .await
            .map_err(|_| SessionError::ProfileClosed)?;
        Ok(self.apply_current())
    }

    fn apply_current(&mut self) -> Role {
        let role = self.roles.borrow_and_update().clone();
        self.cards.update_role(&self.catalog, &role);
        self.sidebar.set_role(role.clone());
        debug!(
            "navigation follows role `{role}`: {} sections, {} cards",
            self.sidebar.visible_sections().len(),
            self.cards.cards().len()
        );
        role
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ragdesk_navigation::{NavSection, NavSubsection};

    fn catalog() -> Arc<NavCatalog> {
        Arc::new(
            NavCatalog::new(vec![
                NavSection::new("Home", "/"),
                NavSection::new("Card 2", "")
                    .with_subsection(NavSubsection::new("Chat Bot", "/docsearch")),
                NavSection::new("Admin", "").with_subsection(NavSubsection::new(
                    "Database Management",
                    "/raganalytics",
                )),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn store_defaults_to_admin_with_picker_options() {
        let store = ProfileStore::default();
        assert_eq!(store.current(), Role::Admin);
        let values: Vec<&str> = store.options().iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["admin", "user", "guest", "moderator"]);
    }

    #[test]
    fn setting_the_same_role_is_not_a_change() {
        let store = ProfileStore::default();
        assert!(!store.set_role(Role::Admin));
        assert!(store.set_role(Role::Guest));
        assert_eq!(store.select_option("moderator"), Some(Role::Moderator));
        assert_eq!(store.select_option("root"), None);
        assert_eq!(store.current(), Role::Moderator);
    }

    #[test]
    fn sync_applies_pending_change() {
        let store = ProfileStore::default();
        let mut controller = NavigationController::new(catalog(), store.subscribe());
        assert_eq!(controller.sidebar().visible_sections().len(), 2);
        assert!(!controller.sync().unwrap());

        controller.cards_mut().click_card(1).unwrap();
        controller.sidebar_mut().select_subsection(1, 0).unwrap();
        store.set_role(Role::Guest);
        assert!(controller.sync().unwrap());
        assert_eq!(controller.sidebar().visible_sections().len(), 1);
        assert_eq!(controller.sidebar().selected(), None);
        assert!(controller.cards().active_card().is_none());
    }

    #[tokio::test]
    async fn controller_follows_role_changes() {
        let store = ProfileStore::default();
        let mut controller = NavigationController::new(catalog(), store.subscribe());

        store.set_role(Role::parse("Document Owner"));
        let role = controller.changed().await.unwrap();
        assert_eq!(role, Role::DocumentOwner);
        assert_eq!(controller.sidebar().role(), &Role::DocumentOwner);

        drop(store);
        assert!(matches!(
            controller.changed().await,
            Err(SessionError::ProfileClosed)
        ));
    }
}

use crate::catalog::{NavCatalog, NavSection, NavSubsection};
use crate::error::{IndexKind, NavigationError, Result};
use crate::model::NavTarget;
use crate::role::Role;
use crate::visibility::compute_visible_sections;

/// Home page card grid.
///
/// Unlike the sidebar, at most one card is open at a time: opening a card
/// closes the others and clicking the open card closes it. Position 0 holds
/// the Home entry (the hero banner) when the catalog has one; persona cards
/// follow in the role-filtered order.
#[derive(Debug, Clone)]
pub struct CardGrid {
    cards: Vec<NavSection>,
    open: Option<usize>,
}

impl CardGrid {
    pub fn new(catalog: &NavCatalog, role: &Role) -> Self {
        Self {
            cards: Self::cards_for(catalog, role),
            open: None,
        }
    }

    fn cards_for(catalog: &NavCatalog, role: &Role) -> Vec<NavSection> {
        catalog
            .home()
            .cloned()
            .into_iter()
            .chain(compute_visible_sections(role, catalog))
            .collect()
    }

    /// Rebuild the grid for a new role. Any open card is closed.
    pub fn update_role(&mut self, catalog: &NavCatalog, role: &Role) {
        self.cards = Self::cards_for(catalog, role);
        self.open = None;
    }

    pub fn cards(&self) -> &[NavSection] {
        &self.cards
    }

    /// Cards rendered as persona tiles, i.e. everything after the hero.
    pub fn persona_cards(&self) -> impl Iterator<Item = (usize, &NavSection)> {
        self.cards.iter().enumerate().skip(1)
    }

    /// Toggle a card open or closed. Returns the card left open, if any.
    pub fn click_card(&mut self, index: usize) -> Result<Option<&NavSection>> {
        if index >= self.cards.len() {
            return Err(NavigationError::out_of_bounds(
                IndexKind::Card,
                index,
                self.cards.len(),
            ));
        }
        self.open = if self.open == Some(index) {
            None
        } else {
            Some(index)
        };
        Ok(self.active_card())
    }

    pub fn active_card(&self) -> Option<&NavSection> {
        self.open.and_then(|index| self.cards.get(index))
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    /// Active subsections of the open card, with their indices.
    pub fn tasks(&self) -> Vec<(usize, &NavSubsection)> {
        self.active_card()
            .map(|card| card.active_subsections().collect())
            .unwrap_or_default()
    }

    pub fn choose_task(&self, subsection: usize) -> Result<NavTarget> {
        let card = self.active_card().ok_or(NavigationError::NoActiveCard)?;
        let entry = card.subsections.get(subsection).ok_or_else(|| {
            NavigationError::out_of_bounds(
                IndexKind::Subsection,
                subsection,
                card.subsections.len(),
            )
        })?;
        if !entry.active {
            return Err(NavigationError::InactiveSubsection {
                title: entry.title.clone(),
            });
        }
        Ok(NavTarget::from(entry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> NavCatalog {
        let mut hidden = NavSubsection::new("Legacy", "/legacy");
        hidden.active = false;
        NavCatalog::new(vec![
            NavSection::new("Home", "/"),
            NavSection::new("Card 2", "")
                .with_subsection(NavSubsection::new("Chat Bot", "/docsearch"))
                .with_subsection(hidden),
            NavSection::new("Card 3", "")
                .with_subsection(NavSubsection::new("Upload Document", "/upload")),
            NavSection::new("Admin", "").with_subsection(NavSubsection::new(
                "Database Management",
                "/raganalytics",
            )),
        ])
        .unwrap()
    }

    #[test]
    fn hero_stays_first_and_roles_filter_the_rest() {
        let catalog = catalog();
        let grid = CardGrid::new(&catalog, &Role::Guest);
        let titles: Vec<&str> = grid.cards().iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Home", "Card 2", "Card 3"]);
        assert_eq!(grid.persona_cards().count(), 2);
    }

    #[test]
    fn only_one_card_is_open() {
        let catalog = catalog();
        let mut grid = CardGrid::new(&catalog, &Role::Admin);
        grid.click_card(1).unwrap();
        let open = grid.click_card(2).unwrap().map(|c| c.title.clone());
        assert_eq!(open.as_deref(), Some("Card 3"));
        assert!(!grid.is_open(1));

        assert!(grid.click_card(2).unwrap().is_none());
        assert!(grid.active_card().is_none());
        assert!(grid.click_card(9).is_err());
    }

    #[test]
    fn tasks_list_only_active_entries() {
        let catalog = catalog();
        let mut grid = CardGrid::new(&catalog, &Role::Admin);
        assert!(grid.tasks().is_empty());
        assert!(matches!(
            grid.choose_task(0),
            Err(NavigationError::NoActiveCard)
        ));

        grid.click_card(1).unwrap();
        let tasks: Vec<&str> = grid.tasks().iter().map(|(_, t)| t.title.as_str()).collect();
        assert_eq!(tasks, vec!["Chat Bot"]);
        assert_eq!(grid.choose_task(0).unwrap().route, "/docsearch");
        assert!(matches!(
            grid.choose_task(1),
            Err(NavigationError::InactiveSubsection { .. })
        ));
    }

    #[test]
    fn role_change_closes_open_card() {
        let catalog = catalog();
        let mut grid = CardGrid::new(&catalog, &Role::Admin);
        grid.click_card(3).unwrap();
        grid.update_role(&catalog, &Role::Guest);
        assert!(grid.active_card().is_none());
        assert_eq!(grid.cards().len(), 3);
    }
}

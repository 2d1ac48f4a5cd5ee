use crate::catalog::{NavCatalog, NavSection, NavSubsection};
use crate::error::{IndexKind, NavigationError, Result};
use crate::role::Role;
use crate::visibility::compute_visible_sections;
use log::debug;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Position of a subsection inside the visible (filtered) list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsectionRef {
    pub section: usize,
    pub subsection: usize,
}

/// Where choosing a subsection should take the user, and the context the
/// destination page needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTarget {
    pub route: String,
    pub persona: String,
    pub title: String,
    pub description: String,
}

impl From<&NavSubsection> for NavTarget {
    fn from(subsection: &NavSubsection) -> Self {
        Self {
            route: subsection.route.clone(),
            persona: subsection.persona.clone(),
            title: subsection.title.clone(),
            description: subsection.description.clone(),
        }
    }
}

/// Inputs the sidebar feeds back into the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    RoleChanged(Role),
    SelectSubsection { section: usize, subsection: usize },
    ToggleSection(usize),
}

/// What changed after handling a [`NavigationEvent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationUpdate {
    Recomputed { visible: usize },
    Navigate(NavTarget),
    Toggled { section: usize, expanded: bool },
}

/// Sidebar view model: the role-filtered section list plus per-section
/// expansion and the single selected subsection.
#[derive(Debug, Clone)]
pub struct NavigationModel {
    catalog: Arc<NavCatalog>,
    role: Role,
    visible: Vec<NavSection>,
    expanded: Vec<bool>,
    selected: Option<SubsectionRef>,
}

impl NavigationModel {
    pub fn new(catalog: Arc<NavCatalog>, role: Role) -> Self {
        let visible = compute_visible_sections(&role, &catalog);
        let expanded = vec![false; visible.len()];
        Self {
            catalog,
            role,
            visible,
            expanded,
            selected: None,
        }
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn catalog(&self) -> &NavCatalog {
        &self.catalog
    }

    /// The Home entry, rendered separately from the filtered list.
    pub fn home(&self) -> Option<&NavSection> {
        self.catalog.home()
    }

    pub fn visible_sections(&self) -> &[NavSection] {
        &self.visible
    }

    pub fn selected(&self) -> Option<SubsectionRef> {
        self.selected
    }

    /// Switch to a new role and recompute the visible list.
    ///
    /// Selection is always cleared because indices from the previous list are
    /// meaningless against the new one. Expansion flags are kept by position
    /// and the vector is resized to the new list length.
    pub fn set_role(&mut self, role: Role) {
        self.visible = compute_visible_sections(&role, &self.catalog);
        self.expanded.resize(self.visible.len(), false);
        self.selected = None;
        debug!(
            "navigation recomputed for role `{role}`: {} visible sections",
            self.visible.len()
        );
        self.role = role;
    }

    /// Mark exactly one subsection as selected and return its target.
    pub fn select_subsection(&mut self, section: usize, subsection: usize) -> Result<NavTarget> {
        let entry = self.subsection(section, subsection)?;
        if !entry.active {
            return Err(NavigationError::InactiveSubsection {
                title: entry.title.clone(),
            });
        }
        let target = NavTarget::from(entry);
        self.selected = Some(SubsectionRef {
            section,
            subsection,
        });
        Ok(target)
    }

    /// Flip the expanded flag of one section, returning the new value.
    pub fn toggle_section_expansion(&mut self, section: usize) -> Result<bool> {
        let len = self.expanded.len();
        let flag = self
            .expanded
            .get_mut(section)
            .ok_or_else(|| NavigationError::out_of_bounds(IndexKind::Section, section, len))?;
        *flag = !*flag;
        Ok(*flag)
    }

    pub fn is_expanded(&self, section: usize) -> bool {
        self.expanded.get(section).copied().unwrap_or(false)
    }

    /// Parallel boolean arrays, one per visible section, marking the selected
    /// subsection. Rebuilt from the current filtered list on every call.
    pub fn selection_grid(&self) -> Vec<Vec<bool>> {
        self.visible
            .iter()
            .enumerate()
            .map(|(section_index, section)| {
                (0..section.subsections.len())
                    .map(|subsection_index| {
                        self.selected
                            == Some(SubsectionRef {
                                section: section_index,
                                subsection: subsection_index,
                            })
                    })
                    .collect()
            })
            .collect()
    }

    pub fn handle(&mut self, event: NavigationEvent) -> Result<NavigationUpdate> {
        match event {
            NavigationEvent::RoleChanged(role) => {
                self.set_role(role);
                Ok(NavigationUpdate::Recomputed {
                    visible: self.visible.len(),
                })
            }
            NavigationEvent::SelectSubsection {
                section,
                subsection,
            } => self
                .select_subsection(section, subsection)
                .map(NavigationUpdate::Navigate),
            NavigationEvent::ToggleSection(section) => {
                let expanded = self.toggle_section_expansion(section)?;
                Ok(NavigationUpdate::Toggled { section, expanded })
            }
        }
    }

    fn subsection(&self, section: usize, subsection: usize) -> Result<&NavSubsection> {
        let entry = self.visible.get(section).ok_or_else(|| {
            NavigationError::out_of_bounds(IndexKind::Section, section, self.visible.len())
        })?;
        entry.subsections.get(subsection).ok_or_else(|| {
            NavigationError::out_of_bounds(
                IndexKind::Subsection,
                subsection,
                entry.subsections.len(),
            )
        })
    }
}

//! # Navigation
//!
//! Role-scoped navigation view models for the dashboard shell.
//!
//! A [`NavCatalog`] is loaded once and never mutated. For the current
//! [`Role`], [`compute_visible_sections`] derives the ordered list of sections
//! the user may open. [`NavigationModel`] keeps the sidebar state on top of
//! that list (expanded sections, the single selected subsection) and
//! [`CardGrid`] does the same for the home page tiles.
//!
//! ```
//! use ragdesk_navigation::{NavCatalog, NavSection, NavigationModel, Role};
//! use std::sync::Arc;
//!
//! let catalog = NavCatalog::new(vec![
//!     NavSection::new("Home", "/"),
//!     NavSection::new("Admin", ""),
//!     NavSection::new("Card 2", ""),
//! ])
//! .unwrap();
//! let model = NavigationModel::new(Arc::new(catalog), Role::Guest);
//! assert_eq!(model.visible_sections().len(), 1);
//! ```

mod card_grid;
mod catalog;
mod error;
mod icon;
mod model;
mod role;
mod visibility;

pub use card_grid::CardGrid;
pub use catalog::{
    ADMIN_TITLE, DOCUMENT_OWNER_TITLE, HOME_TITLE, NavCatalog, NavSection, NavSubsection,
};
pub use error::{IndexKind, NavigationError, Result};
pub use icon::IconId;
pub use model::{NavTarget, NavigationEvent, NavigationModel, NavigationUpdate, SubsectionRef};
pub use role::{ProfileOption, Role, profile_options};
pub use visibility::{compute_visible_sections, visible_titles};

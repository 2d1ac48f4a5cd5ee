//! Role-based filtering of the navigation catalog.

use crate::catalog::{ADMIN_TITLE, DOCUMENT_OWNER_TITLE, NavCatalog, NavSection};
use crate::role::Role;
use log::debug;

/// Section titles hidden from a role, beyond the Home page.
///
/// Any role outside Document Owner / Admin / Auditor lands in the last arm,
/// including misspelled or newly added roles. That default-deny is kept as a
/// fixed contract.
fn excluded_titles(role: &Role) -> &'static [&'static str] {
    if !role.is_privileged() {
        return &[ADMIN_TITLE, DOCUMENT_OWNER_TITLE];
    }
    match role {
        Role::DocumentOwner => &[ADMIN_TITLE],
        Role::Auditor => &[DOCUMENT_OWNER_TITLE],
        _ => &[],
    }
}

/// Compute the ordered list of sections `role` may see, Home excluded.
///
/// The catalog is never mutated. For auditors, the first subsection of a
/// leading Admin section is returned inactive; other roles see the
/// catalog's own flag.
pub fn compute_visible_sections(role: &Role, catalog: &NavCatalog) -> Vec<NavSection> {
    let excluded = excluded_titles(role);
    let mut visible: Vec<NavSection> = catalog
        .sections()
        .iter()
        .filter(|section| !section.is_home())
        .filter(|section| !excluded.contains(&section.title.as_str()))
        .cloned()
        .collect();

    if *role == Role::Auditor
        && let Some(first) = visible.first_mut()
        && first.title == ADMIN_TITLE
        && let Some(subsection) = first.subsections.first_mut()
    {
        subsection.active = false;
    }

    debug!(
        "role `{role}` sees {} of {} catalog sections",
        visible.len(),
        catalog.len()
    );
    visible
}

/// Titles of the sections visible to `role`, in order.
pub fn visible_titles(role: &Role, catalog: &NavCatalog) -> Vec<String> {
    compute_visible_sections(role, catalog)
        .into_iter()
        .map(|section| section.title)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NavSubsection;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn catalog() -> NavCatalog {
        NavCatalog::new(vec![
            NavSection::new("Home", "/"),
            NavSection::new("Admin", "").with_subsection(
                NavSubsection::new("Database Management", "/raganalytics").with_persona("admin"),
            ),
            NavSection::new("Card 2", "")
                .with_subsection(NavSubsection::new("Chat Bot", "/docsearch")),
            NavSection::new("Document Owner", "")
                .with_subsection(NavSubsection::new("Upload Document", "/upload")),
        ])
        .unwrap()
    }

    #[test]
    fn admin_sees_everything_but_home() {
        assert_eq!(
            visible_titles(&Role::Admin, &catalog()),
            vec!["Admin", "Card 2", "Document Owner"]
        );
    }

    #[test]
    fn document_owner_loses_admin_only() {
        let catalog = NavCatalog::new(vec![
            NavSection::new("Home", "/"),
            NavSection::new("Card 2", ""),
            NavSection::new("Admin", ""),
        ])
        .unwrap();
        assert_eq!(
            visible_titles(&Role::DocumentOwner, &catalog),
            vec!["Card 2"]
        );
    }

    #[test]
    fn auditor_gets_admin_with_first_subsection_disabled() {
        let catalog = catalog();
        let visible = compute_visible_sections(&Role::Auditor, &catalog);
        let titles: Vec<&str> = visible.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Admin", "Card 2"]);
        assert!(!visible[0].subsections[0].active);

        // The catalog itself keeps its flag, so other roles are unaffected.
        assert!(catalog.sections()[1].subsections[0].active);
        let admin_view = compute_visible_sections(&Role::Admin, &catalog);
        assert!(admin_view[0].subsections[0].active);
    }

    #[test]
    fn auditor_override_only_applies_when_admin_leads() {
        let catalog = NavCatalog::new(vec![
            NavSection::new("Home", "/"),
            NavSection::new("Card 2", "")
                .with_subsection(NavSubsection::new("Chat Bot", "/docsearch")),
            NavSection::new("Admin", "")
                .with_subsection(NavSubsection::new("Database Management", "/raganalytics")),
        ])
        .unwrap();
        let visible = compute_visible_sections(&Role::Auditor, &catalog);
        assert!(visible.iter().all(|s| s.subsections.iter().all(|sub| sub.active)));
    }

    #[test]
    fn ordinary_and_unknown_roles_lose_admin_and_owner() {
        let catalog = catalog();
        for role in [
            Role::User,
            Role::Guest,
            Role::Moderator,
            Role::parse("auditor"),
        ] {
            assert_eq!(visible_titles(&role, &catalog), vec!["Card 2"], "{role}");
        }
    }

    #[test]
    fn visibility_is_monotone_across_roles() {
        let catalog = catalog();
        let admin: HashSet<String> = visible_titles(&Role::Admin, &catalog).into_iter().collect();
        let auditor: HashSet<String> =
            visible_titles(&Role::Auditor, &catalog).into_iter().collect();
        let guest: HashSet<String> = visible_titles(&Role::Guest, &catalog).into_iter().collect();
        assert!(admin.is_superset(&auditor));
        assert!(auditor.is_superset(&guest));
    }

    #[test]
    fn empty_catalog_yields_nothing() {
        let catalog = NavCatalog::default();
        assert!(compute_visible_sections(&Role::Admin, &catalog).is_empty());
    }
}

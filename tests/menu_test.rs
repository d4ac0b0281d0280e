use std::collections::BTreeSet;
use verge::menu::{visible_menu, MenuEntry, MENU};
use verge::roles::Role;

static TEST_MENU: &[MenuEntry] = &[
    MenuEntry {
        name: "AdminOnly",
        label: "Admin Only",
        icon: "shield",
        roles: &[Role::Admin],
    },
    MenuEntry {
        name: "CollectorOnly",
        label: "Collector Only",
        icon: "trash-outline",
        roles: &[Role::Collector],
    },
    MenuEntry {
        name: "Public",
        label: "Public",
        icon: "home-outline",
        roles: &[],
    },
];

#[test]
fn test_public_entries_visible_for_every_role_set() {
    let empty = BTreeSet::new();
    let visible = visible_menu(TEST_MENU, &empty);
    assert!(visible.iter().any(|e| e.name == "Public"));

    let mut roles = BTreeSet::new();
    roles.insert(Role::Accountant);
    let visible = visible_menu(TEST_MENU, &roles);
    assert!(visible.iter().any(|e| e.name == "Public"));
}

#[test]
fn test_gated_entries_hidden_for_empty_role_set() {
    let empty = BTreeSet::new();
    let visible = visible_menu(TEST_MENU, &empty);

    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].name, "Public");
}

#[test]
fn test_admin_sees_admin_and_public_entries_in_order() {
    let mut roles = BTreeSet::new();
    roles.insert(Role::Admin);

    let visible = visible_menu(TEST_MENU, &roles);

    let names: Vec<&str> = visible.iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["AdminOnly", "Public"]);
}

#[test]
fn test_filter_preserves_declared_order() {
    let mut roles = BTreeSet::new();
    roles.insert(Role::Accountant);

    let visible = visible_menu(MENU, &roles);
    let names: Vec<&str> = visible.iter().map(|e| e.name).collect();

    assert_eq!(
        names,
        vec!["Home", "Invoices", "Payments", "Receipting", "Tasks", "Profile"]
    );
}

#[test]
fn test_filter_is_idempotent() {
    let mut roles = BTreeSet::new();
    roles.insert(Role::Collector);

    let first: Vec<MenuEntry> = visible_menu(MENU, &roles)
        .into_iter()
        .cloned()
        .collect();
    let second = visible_menu(&first, &roles);

    let first_names: Vec<&str> = first.iter().map(|e| e.name).collect();
    let second_names: Vec<&str> = second.iter().map(|e| e.name).collect();
    assert_eq!(first_names, second_names);
}

#[test]
fn test_collector_menu() {
    let mut roles = BTreeSet::new();
    roles.insert(Role::Collector);

    let visible = visible_menu(MENU, &roles);
    let names: Vec<&str> = visible.iter().map(|e| e.name).collect();

    assert_eq!(names, vec!["Home", "Collection", "Tasks", "Profile"]);
}

#[test]
fn test_signed_out_menu_is_public_only() {
    let empty = BTreeSet::new();

    let visible = visible_menu(MENU, &empty);
    let names: Vec<&str> = visible.iter().map(|e| e.name).collect();

    assert_eq!(names, vec!["Home", "Tasks", "Profile"]);
}

#[test]
fn test_unknown_role_sees_public_entries_only() {
    let mut roles = BTreeSet::new();
    roles.insert(Role::from("dispatcher"));

    let visible = visible_menu(MENU, &roles);
    let names: Vec<&str> = visible.iter().map(|e| e.name).collect();

    assert_eq!(names, vec!["Home", "Tasks", "Profile"]);
}

use anyhow::Result;
use std::collections::BTreeSet;

use crate::config::Config;
use crate::roles::Role;
use crate::session::SessionStore;

/// One drawer destination. `roles` is the set of roles allowed to see the
/// entry; an empty list is a deliberate wildcard meaning visible to all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub name: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
    pub roles: &'static [Role],
}

/// The full drawer, in declared order. Authored at build time; the filter
/// below never reorders it.
pub static MENU: &[MenuEntry] = &[
    MenuEntry {
        name: "Home",
        label: "Home",
        icon: "home-outline",
        roles: &[],
    },
    MenuEntry {
        name: "Collection",
        label: "Collection",
        icon: "trash-outline",
        roles: &[Role::Collector, Role::Admin, Role::CustomerManager],
    },
    MenuEntry {
        name: "Customers",
        label: "Customers",
        icon: "people-outline",
        roles: &[Role::Admin, Role::CustomerManager],
    },
    MenuEntry {
        name: "Invoices",
        label: "Invoices",
        icon: "document-text-outline",
        roles: &[Role::Admin, Role::Accountant, Role::CustomerManager],
    },
    MenuEntry {
        name: "Payments",
        label: "Payments",
        icon: "card-outline",
        roles: &[Role::Admin, Role::Accountant, Role::CustomerManager],
    },
    MenuEntry {
        name: "Receipting",
        label: "Receipts",
        icon: "receipt-outline",
        roles: &[Role::Admin, Role::Accountant, Role::CustomerManager],
    },
    MenuEntry {
        name: "Messages",
        label: "Sent SMS",
        icon: "chatbubble-outline",
        roles: &[Role::Admin, Role::CustomerManager],
    },
    MenuEntry {
        name: "Management",
        label: "Users",
        icon: "person-outline",
        roles: &[Role::Admin],
    },
    MenuEntry {
        name: "Reports",
        label: "Reports",
        icon: "document-attach",
        roles: &[Role::Admin],
    },
    MenuEntry {
        name: "Tasks",
        label: "Tasks",
        icon: "checkmark-done-outline",
        roles: &[],
    },
    MenuEntry {
        name: "Assign Tasks",
        label: "Assign Trash Bag Tasks",
        icon: "person-add-outline",
        roles: &[Role::Admin],
    },
    MenuEntry {
        name: "Company Profile",
        label: "Company Profile",
        icon: "business",
        roles: &[Role::Admin],
    },
    MenuEntry {
        name: "Profile",
        label: "Profile",
        icon: "person-outline",
        roles: &[],
    },
];

/// Stable filter: an entry stays visible iff its role list is empty or
/// intersects the user's role set. With an empty role set (session still
/// loading, or signed out) only the wildcard entries survive.
pub fn visible_menu<'a>(menu: &'a [MenuEntry], user_roles: &BTreeSet<Role>) -> Vec<&'a MenuEntry> {
    menu.iter()
        .filter(|entry| {
            entry.roles.is_empty() || entry.roles.iter().any(|role| user_roles.contains(role))
        })
        .collect()
}

pub async fn show_menu(as_roles: Vec<String>) -> Result<()> {
    let (roles, source): (BTreeSet<Role>, String) = if as_roles.is_empty() {
        let config = Config::load()?;
        let mut session = SessionStore::new(config.session_path);
        session.load()?;
        let label = match session.current_user() {
            Some(user) => format!("signed in as {} {}", user.first_name, user.last_name),
            None => "not signed in".to_string(),
        };
        (session.roles(), label)
    } else {
        let roles = as_roles.into_iter().map(Role::from).collect();
        (roles, "preview".to_string())
    };

    println!("Menu ({}):", source);
    let visible = visible_menu(MENU, &roles);
    for entry in &visible {
        println!("  {:<24} [{}]", entry.label, entry.icon);
    }

    let hidden = MENU.len() - visible.len();
    if hidden > 0 {
        println!(
            "{} {} hidden for this role set",
            hidden,
            if hidden == 1 { "entry" } else { "entries" }
        );
    }

    Ok(())
}

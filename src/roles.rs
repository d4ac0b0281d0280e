use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Role labels exactly as the backend stores them, case-sensitive.
/// Labels the backend may hand us that we don't recognize are kept in
/// `Unknown` so they round-trip unchanged through a fetch-edit-submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    Accountant,
    Collector,
    CustomerManager,
    Default,
    Unknown(String),
}

pub const KNOWN_ROLES: [Role; 5] = [
    Role::Admin,
    Role::Accountant,
    Role::Collector,
    Role::CustomerManager,
    Role::Default,
];

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::Accountant => "accountant",
            Role::Collector => "collector",
            Role::CustomerManager => "customer_manager",
            Role::Default => "default",
            Role::Unknown(label) => label,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown(_))
    }
}

impl From<&str> for Role {
    fn from(label: &str) -> Self {
        match label {
            "ADMIN" => Role::Admin,
            "accountant" => Role::Accountant,
            "collector" => Role::Collector,
            "customer_manager" => Role::CustomerManager,
            "default" => Role::Default,
            other => Role::Unknown(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(label: String) -> Self {
        Role::from(label.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Role::from(s))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(Role::from(label))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    Customer,
    Invoice,
    Receipt,
    Payment,
}

impl Resource {
    pub fn as_str(&self) -> &str {
        match self {
            Resource::Customer => "customer",
            Resource::Invoice => "invoice",
            Resource::Receipt => "receipt",
            Resource::Payment => "payment",
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `Delete` is granted by no role today but stays in the taxonomy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Action {
    pub fn as_str(&self) -> &str {
        match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory permission table, display-only. The backend decides what a role
/// can actually do; this table exists so an admin screen can show what a
/// role nominally grants. ADMIN has no entry here on purpose, and an
/// unrecognized role resolves to an empty grant rather than an error.
pub fn permissions_for(role: &Role) -> BTreeMap<Resource, BTreeSet<Action>> {
    use Action::*;
    use Resource::*;

    let grants: &[(Resource, &[Action])] = match role {
        Role::CustomerManager => &[
            (Customer, &[Create, Read, Update]),
            (Invoice, &[Read]),
        ],
        Role::Accountant => &[
            (Receipt, &[Create, Read]),
            (Payment, &[Create, Read]),
        ],
        Role::Collector => &[(Customer, &[Read, Update])],
        Role::Admin | Role::Default | Role::Unknown(_) => &[],
    };

    grants
        .iter()
        .map(|(resource, actions)| (*resource, actions.iter().copied().collect()))
        .collect()
}

pub async fn show_permissions(label: String) -> Result<()> {
    let role = Role::from(label.as_str());
    let grants = permissions_for(&role);

    if let Role::Unknown(name) = &role {
        println!("Role '{}' is not in the permission table; nothing to display.", name);
        return Ok(());
    }

    if grants.is_empty() {
        println!("Role '{}' has no entries in the permission table.", role);
        if matches!(role, Role::Admin) {
            println!("ADMIN access is decided by the backend, not this table.");
        }
        return Ok(());
    }

    println!("Permissions for '{}' (advisory; the backend is authoritative):", role);
    for (resource, actions) in grants {
        let actions: Vec<&str> = actions.iter().map(|a| a.as_str()).collect();
        println!("  {:<10} {}", resource.as_str(), actions.join(", "));
    }

    Ok(())
}

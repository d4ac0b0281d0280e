use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;

use crate::roles::Role;

/// Cached copy of the signed-in user, shaped like the backend's sign-in
/// response. The backend owns the durable record; this copy may be stale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub role: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Uninitialized,
    Loading,
    Ready,
}

/// Session cache with an explicit lifecycle. `roles()` stays empty until the
/// store has finished loading, so menu filtering fails closed while the
/// session is still being hydrated.
pub struct SessionStore {
    path: PathBuf,
    state: SessionState,
    current_user: Option<SessionUser>,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            state: SessionState::Uninitialized,
            current_user: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current_user(&self) -> Option<&SessionUser> {
        self.current_user.as_ref()
    }

    /// Hydrate from the cache file. A missing file is a signed-out session,
    /// not an error. A cache that fails to parse leaves the store in
    /// `Loading`, which keeps gated menu entries hidden.
    pub fn load(&mut self) -> Result<()> {
        self.state = SessionState::Loading;

        if self.path.exists() {
            let contents =
                fs::read_to_string(&self.path).context("Failed to read session cache")?;
            let user: SessionUser =
                serde_json::from_str(&contents).context("Failed to parse session cache")?;
            self.current_user = Some(user);
        }

        self.state = SessionState::Ready;
        Ok(())
    }

    /// Replace or clear the cached user. `None` signs the session out.
    pub fn update_current_user(&mut self, user: Option<SessionUser>) -> Result<()> {
        match &user {
            Some(current) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, serde_json::to_string_pretty(current)?)
                    .context("Failed to write session cache")?;
            }
            None => {
                if self.path.exists() {
                    fs::remove_file(&self.path).context("Failed to clear session cache")?;
                }
            }
        }

        self.current_user = user;
        self.state = SessionState::Ready;
        Ok(())
    }

    /// Role set for menu filtering. Empty unless the store is `Ready` with a
    /// signed-in user.
    pub fn roles(&self) -> BTreeSet<Role> {
        if self.state != SessionState::Ready {
            return BTreeSet::new();
        }

        self.current_user
            .as_ref()
            .map(|user| user.role.iter().map(|label| Role::from(label.as_str())).collect())
            .unwrap_or_default()
    }
}

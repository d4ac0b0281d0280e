use std::collections::BTreeSet;

use crate::api::Backend;
use crate::roles::Role;

/// Editor lifecycle. `Success` and `Failed` are acknowledgment states, not
/// terminal: both return to `Editing` so the pending set is never lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Editing,
    Submitting,
    Success,
    Failed(String),
}

/// Edits one user's role set locally, then replaces the backend's stored
/// set wholesale on submit. Duplicates are impossible (set semantics) and
/// removing an absent role is a no-op.
pub struct RoleEditor {
    user_id: String,
    pending: BTreeSet<Role>,
    state: EditorState,
}

impl RoleEditor {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            pending: BTreeSet::new(),
            state: EditorState::Idle,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn pending(&self) -> &BTreeSet<Role> {
        &self.pending
    }

    /// Seed the pending set from the roles the backend currently has on
    /// record and start editing.
    pub fn begin(&mut self, persisted: impl IntoIterator<Item = Role>) {
        self.pending = persisted.into_iter().collect();
        self.state = EditorState::Editing;
    }

    /// Returns false when the role was already pending (or the editor is
    /// not in `Editing`).
    pub fn add_role(&mut self, role: Role) -> bool {
        if !matches!(self.state, EditorState::Editing) {
            return false;
        }
        self.pending.insert(role)
    }

    /// Returns false when the role was not pending; that case is a no-op,
    /// not an error.
    pub fn remove_role(&mut self, role: &Role) -> bool {
        if !matches!(self.state, EditorState::Editing) {
            return false;
        }
        self.pending.remove(role)
    }

    /// Submit the full pending set, replacing whatever the backend has
    /// stored for this user — never a diff against server state. Does
    /// nothing unless the editor is in `Editing`. On failure the backend's
    /// error text is kept and the pending set survives for a retry.
    pub async fn submit(&mut self, backend: &dyn Backend) -> &EditorState {
        if !matches!(self.state, EditorState::Editing) {
            return &self.state;
        }

        self.state = EditorState::Submitting;
        let roles: Vec<String> = self
            .pending
            .iter()
            .map(|role| role.as_str().to_string())
            .collect();

        self.state = match backend.assign_roles(&self.user_id, &roles).await {
            Ok(()) => EditorState::Success,
            Err(err) => EditorState::Failed(err.to_string()),
        };

        &self.state
    }

    /// Return to `Editing` once the outcome has been shown.
    pub fn acknowledge(&mut self) {
        if matches!(self.state, EditorState::Success | EditorState::Failed(_)) {
            self.state = EditorState::Editing;
        }
    }
}

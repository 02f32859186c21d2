//! Scoped storage keys.

use serde::{Deserialize, Serialize};

/// Who a stored field belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum Scope {
    /// One user in one instance.
    UserState { instance_id: String, user_id: String },
    /// One instance, summed over all of its users.
    UserStateSummary { instance_id: String },
    /// Author settings of one instance.
    Settings { instance_id: String },
}

impl Scope {
    pub fn instance_id(&self) -> &str {
        match self {
            Scope::UserState { instance_id, .. }
            | Scope::UserStateSummary { instance_id }
            | Scope::Settings { instance_id } => instance_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageKey {
    pub scope: Scope,
    pub field: String,
}

impl StorageKey {
    pub fn new(scope: Scope, field: impl Into<String>) -> Self {
        Self {
            scope,
            field: field.into(),
        }
    }

    pub fn user_state(
        instance_id: impl Into<String>,
        user_id: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self::new(
            Scope::UserState {
                instance_id: instance_id.into(),
                user_id: user_id.into(),
            },
            field,
        )
    }

    pub fn summary(instance_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            Scope::UserStateSummary {
                instance_id: instance_id.into(),
            },
            field,
        )
    }

    pub fn settings(instance_id: impl Into<String>, field: impl Into<String>) -> Self {
        Self::new(
            Scope::Settings {
                instance_id: instance_id.into(),
            },
            field,
        )
    }

    /// Flat path form, e.g. `user_state/<instance>/<user>/<field>`.
    pub fn to_path(&self) -> String {
        match &self.scope {
            Scope::UserState {
                instance_id,
                user_id,
            } => format!("user_state/{}/{}/{}", instance_id, user_id, self.field),
            Scope::UserStateSummary { instance_id } => {
                format!("user_state_summary/{}/{}", instance_id, self.field)
            }
            Scope::Settings { instance_id } => format!("settings/{}/{}", instance_id, self.field),
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

//! Custom-claims document stored per user on the identity provider.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use steeple_domain::role::{ChurchRole, SystemRole};

/// Per-user authorization claims, mirrored onto issued tokens.
///
/// This is the authorization source of truth consulted on every request;
/// the membership state machine keeps `church_roles` in lockstep with role
/// changes. Readers must tolerate staleness until the next token refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub system_role: SystemRole,
    #[serde(default)]
    pub church_roles: HashMap<Uuid, ChurchRole>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Default for Claims {
    fn default() -> Self {
        Self {
            system_role: SystemRole::User,
            church_roles: HashMap::new(),
            permissions: Vec::new(),
        }
    }
}

impl Claims {
    /// Role the user holds in the given church, if any.
    pub fn church_role(&self, church_id: Uuid) -> Option<ChurchRole> {
        self.church_roles.get(&church_id).copied()
    }

    /// Whether the user may manage the given church's membership roster.
    /// System admins always may.
    pub fn can_manage_church(&self, church_id: Uuid) -> bool {
        if self.system_role >= SystemRole::Admin {
            return true;
        }
        self.church_role(church_id)
            .is_some_and(|role| role.can_manage_members())
    }
}

//! Membership status lifecycle.

use serde::{Deserialize, Serialize};

/// Persisted status of a church membership.
///
/// The state machine drives `Pending → Approved` and `Pending → Rejected`;
/// leaving a church deletes the record rather than writing a status.
/// `Suspended` is a persisted value written by out-of-band admin tooling and
/// has no transition in this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Pending,
    Approved,
    Rejected,
    Suspended,
}

impl MembershipStatus {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn parse(v: &str) -> Option<Self> {
        match v {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "suspended" => Some(Self::Suspended),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Suspended => "suspended",
        }
    }
}

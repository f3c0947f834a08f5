//! Role vocabulary for churches and the platform.

use serde::{Deserialize, Serialize};

/// Role a user holds within a single church.
///
/// Wire and storage format: snake_case string. New memberships start as
/// `Visitor` until an admin approves them with a real role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurchRole {
    Admin,
    Pastor,
    Leader,
    Staff,
    Member,
    Visitor,
}

impl ChurchRole {
    /// Parse from the stored string value. Returns `None` for unknown values.
    pub fn parse(v: &str) -> Option<Self> {
        match v {
            "admin" => Some(Self::Admin),
            "pastor" => Some(Self::Pastor),
            "leader" => Some(Self::Leader),
            "staff" => Some(Self::Staff),
            "member" => Some(Self::Member),
            "visitor" => Some(Self::Visitor),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Pastor => "pastor",
            Self::Leader => "leader",
            Self::Staff => "staff",
            Self::Member => "member",
            Self::Visitor => "visitor",
        }
    }

    /// Privilege rank, higher = more privileged. Used for church-scoped
    /// authorization checks.
    pub fn rank(self) -> u8 {
        match self {
            Self::Admin => 5,
            Self::Pastor => 4,
            Self::Leader => 3,
            Self::Staff => 2,
            Self::Member => 1,
            Self::Visitor => 0,
        }
    }

    /// Whether this role may manage the church's membership roster.
    pub fn can_manage_members(self) -> bool {
        matches!(self, Self::Admin | Self::Pastor)
    }
}

/// Platform-wide role carried in identity-provider claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemRole {
    User,
    Admin,
    Superadmin,
}

impl SystemRole {
    pub fn parse(v: &str) -> Option<Self> {
        match v {
            "user" => Some(Self::User),
            "admin" => Some(Self::Admin),
            "superadmin" => Some(Self::Superadmin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::User => 0,
            Self::Admin => 1,
            Self::Superadmin => 2,
        }
    }
}

impl PartialOrd for SystemRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SystemRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

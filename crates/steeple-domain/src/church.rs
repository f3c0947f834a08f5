//! Church hierarchy types.

use serde::{Deserialize, Serialize};

/// Level of a church in the organizational hierarchy:
/// headquarters → country → department → province → local.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChurchLevel {
    Headquarters,
    Country,
    Department,
    Province,
    Local,
}

impl ChurchLevel {
    pub fn parse(v: &str) -> Option<Self> {
        match v {
            "headquarters" => Some(Self::Headquarters),
            "country" => Some(Self::Country),
            "department" => Some(Self::Department),
            "province" => Some(Self::Province),
            "local" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Headquarters => "headquarters",
            Self::Country => "country",
            Self::Department => "department",
            Self::Province => "province",
            Self::Local => "local",
        }
    }

    /// Depth in the hierarchy, 0 = headquarters. A child church must sit
    /// exactly one level below its parent.
    pub fn depth(self) -> u8 {
        match self {
            Self::Headquarters => 0,
            Self::Country => 1,
            Self::Department => 2,
            Self::Province => 3,
            Self::Local => 4,
        }
    }
}

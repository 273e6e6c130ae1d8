//! Closed domain vocabularies shared between the API boundary and storage.
//!
//! Entities persist these as plain strings; parsing happens once at the
//! boundary so handlers can reject unknown values with a 400 instead of
//! letting arbitrary strings reach the database.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Staff roles recognized by the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    SeniorOfficial,
    Manager,
    Storekeeper,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SeniorOfficial => "senior-official",
            Self::Manager => "manager",
            Self::Storekeeper => "storekeeper",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "senior-official" => Ok(Self::SeniorOfficial),
            "manager" => Ok(Self::Manager),
            "storekeeper" => Ok(Self::Storekeeper),
            _ => Err(()),
        }
    }
}

/// Account state. Inactive accounts stay listed but are flagged for the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
        }
    }
}

impl fmt::Display for UserStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Inactive" => Ok(Self::Inactive),
            _ => Err(()),
        }
    }
}

/// Approval state of a ledger entry.
///
/// Storekeeper entries start `Pending` and a manager later moves them to
/// `Approved` or `Rejected`. Direct entries default to `Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStatus {
    Pending,
    Approved,
    Rejected,
}

impl ActivityStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Approved" => Ok(Self::Approved),
            "Rejected" => Ok(Self::Rejected),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_strings() {
        for role in [Role::SeniorOfficial, Role::Manager, Role::Storekeeper] {
            assert_eq!(role.as_str().parse::<Role>(), Ok(role));
        }
        assert!("warehouse-wizard".parse::<Role>().is_err());
    }

    #[test]
    fn role_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Role::SeniorOfficial).unwrap();
        assert_eq!(json, "\"senior-official\"");
        let parsed: Role = serde_json::from_str("\"storekeeper\"").unwrap();
        assert_eq!(parsed, Role::Storekeeper);
    }

    #[test]
    fn activity_status_rejects_unknown_values() {
        assert_eq!("Pending".parse(), Ok(ActivityStatus::Pending));
        assert_eq!("Rejected".parse(), Ok(ActivityStatus::Rejected));
        assert!("Shipped".parse::<ActivityStatus>().is_err());
        assert!("approved".parse::<ActivityStatus>().is_err());
    }
}

//! Status and kind enums for ledger entities.

use serde::{Deserialize, Serialize};

/// The kind of a ledger transaction.
///
/// Credits (`Topup`) carry a positive signed amount; debits (`Purchase`)
/// carry a negative one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Balance-increasing credit.
    Topup,
    /// Balance-decreasing debit (purchase/payment).
    Purchase,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Topup => write!(f, "topup"),
            Self::Purchase => write!(f, "purchase"),
        }
    }
}

/// Lifecycle status of a transaction.
///
/// Every code path records `Completed`; the field is reserved for a future
/// pending/failed lifecycle and nothing may branch on other values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    #[default]
    Completed,
}

/// Admin role with different permission levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Full access including admin user management.
    SuperAdmin,
    /// Full access to store management features.
    Admin,
    /// Read-only access.
    Viewer,
}

impl std::fmt::Display for AdminRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SuperAdmin => write!(f, "super_admin"),
            Self::Admin => write!(f, "admin"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for AdminRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(format!("invalid admin role: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&TransactionType::Topup).unwrap(),
            "\"topup\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionType::Purchase).unwrap(),
            "\"purchase\""
        );
    }

    #[test]
    fn test_transaction_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_admin_role_round_trip() {
        for role in [AdminRole::SuperAdmin, AdminRole::Admin, AdminRole::Viewer] {
            let parsed: AdminRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("root".parse::<AdminRole>().is_err());
    }
}

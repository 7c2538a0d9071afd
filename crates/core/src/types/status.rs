//! Account and order status enums.

use serde::{Deserialize, Serialize};

/// The two kinds of account the store knows about.
///
/// Customers and administrators share one record shape but live in separate
/// route trees; email uniqueness is scoped per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    User,
    Administrator,
}

impl AccountKind {
    /// Human-readable noun used in client-facing messages.
    #[must_use]
    pub const fn noun(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Administrator => "Administrator",
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Administrator => write!(f, "administrator"),
        }
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "administrator" => Ok(Self::Administrator),
            _ => Err(format!("invalid account kind: {s}")),
        }
    }
}

/// Lifecycle state of an order.
///
/// `InProgress` is the only non-terminal state; once an order is completed
/// or cancelled it stays there. The wire representation keeps the store's
/// historical labels ("In progress", "Completed", "Cancelled").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "In progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    /// Returns true once no further transitions are allowed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InProgress => write!(f, "In progress"),
            Self::Completed => write!(f, "Completed"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "In progress" => Ok(Self::InProgress),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(format!("invalid order status: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_account_kind_roundtrip() {
        for kind in [AccountKind::User, AccountKind::Administrator] {
            let parsed: AccountKind = kind.to_string().parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_account_kind_rejects_unknown() {
        assert!("superuser".parse::<AccountKind>().is_err());
    }

    #[test]
    fn test_order_status_wire_labels() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::InProgress).unwrap(),
            "\"In progress\""
        );
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );

        let parsed: OrderStatus = serde_json::from_str("\"In progress\"").unwrap();
        assert_eq!(parsed, OrderStatus::InProgress);
    }

    #[test]
    fn test_order_status_parse_matches_display() {
        for status in [
            OrderStatus::InProgress,
            OrderStatus::Completed,
            OrderStatus::Cancelled,
        ] {
            let parsed: OrderStatus = status.to_string().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn test_terminal_states() {
        assert!(!OrderStatus::InProgress.is_terminal());
        assert!(OrderStatus::Completed.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_default_is_in_progress() {
        assert_eq!(OrderStatus::default(), OrderStatus::InProgress);
    }
}

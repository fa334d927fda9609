//! Actor context - Identifies who is performing an operation.
//!
//! The outer layer authenticates staff and hands the core an [`Actor`] as an
//! explicit parameter; the core records it into audit fields and performs no
//! credential checks of its own. Role capabilities are offered for callers
//! that gate their surfaces, the core does not enforce them.

use serde::{Deserialize, Serialize};

/// Staff roles recognised by the depot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Full access, including price overrides
    GeneralManager,
    /// Day-to-day administration and stock management
    Admin,
    /// Recording sales only
    SalesManagement,
}

impl Role {
    /// Whether this role may add or correct stock.
    #[must_use]
    pub const fn can_manage_stock(self) -> bool {
        matches!(self, Self::GeneralManager | Self::Admin)
    }

    /// Whether this role may override product prices.
    #[must_use]
    pub const fn can_override_prices(self) -> bool {
        matches!(self, Self::GeneralManager)
    }

    /// Whether this role may record sales. All roles can.
    #[must_use]
    pub const fn can_record_sales(self) -> bool {
        true
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::GeneralManager => "General Manager",
            Self::Admin => "Admin",
            Self::SalesManagement => "Sales Management",
        };
        write!(f, "{name}")
    }
}

/// An authenticated staff member performing an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable identifier recorded into audit fields
    pub id: String,
    /// Display name for human-readable audit reasons
    pub name: String,
    /// The actor's role
    pub role: Role,
}

impl Actor {
    /// Creates an actor from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role,
        }
    }
}

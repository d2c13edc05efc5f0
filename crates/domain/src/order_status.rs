// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Order pipeline status and transition rules.
//!
//! Every write to an order's status must append one status-history row in
//! the same transaction; the allowed-transition check here is the single
//! authority on which moves are legal.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Pipeline stages of an order, from first contact to handover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Initial stage at order creation.
    Lead,
    /// Prospect confirmed as a customer.
    Customer,
    /// A quote has been sent.
    QuoteSent,
    /// Site measurement completed.
    Measurement,
    /// Contract signed.
    Contract,
    /// In production.
    Production,
    /// Installation in progress.
    Installation,
    /// Handed over to the customer.
    Handover,
    /// Cancelled; terminal, reachable from any non-terminal stage.
    Cancelled,
}

impl OrderStatus {
    /// The status every new order starts in.
    #[must_use]
    pub const fn initial() -> Self {
        Self::Lead
    }

    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lead => "lead",
            Self::Customer => "customer",
            Self::QuoteSent => "quote_sent",
            Self::Measurement => "measurement",
            Self::Contract => "contract",
            Self::Production => "production",
            Self::Installation => "installation",
            Self::Handover => "handover",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns the position of this status within the pipeline, or `None`
    /// for `Cancelled`, which sits outside the linear progression.
    #[must_use]
    pub const fn stage_index(&self) -> Option<u8> {
        match self {
            Self::Lead => Some(0),
            Self::Customer => Some(1),
            Self::QuoteSent => Some(2),
            Self::Measurement => Some(3),
            Self::Contract => Some(4),
            Self::Production => Some(5),
            Self::Installation => Some(6),
            Self::Handover => Some(7),
            Self::Cancelled => None,
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// Validates a transition from this status to another.
    ///
    /// Legal moves:
    /// - forward to any strictly later pipeline stage
    /// - `measurement` back to `quote_sent` (measurement deletion revert)
    /// - any non-terminal stage to `cancelled`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` for every other move.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        if *self == new_status {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "order is already in this status".to_string(),
            });
        }

        if new_status == Self::Cancelled {
            return Ok(());
        }

        if matches!(self, Self::Measurement) && matches!(new_status, Self::QuoteSent) {
            return Ok(());
        }

        match (self.stage_index(), new_status.stage_index()) {
            (Some(from), Some(to)) if to > from => Ok(()),
            _ => Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "pipeline only moves forward".to_string(),
            }),
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "lead" => Ok(Self::Lead),
            "customer" => Ok(Self::Customer),
            "quote_sent" => Ok(Self::QuoteSent),
            "measurement" => Ok(Self::Measurement),
            "contract" => Ok(Self::Contract),
            "production" => Ok(Self::Production),
            "installation" => Ok(Self::Installation),
            "handover" => Ok(Self::Handover),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidOrderStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

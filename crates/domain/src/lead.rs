// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Lead lifecycle and conversion guards.
//!
//! Conversion and rejection are one-shot operations: a lead that reached a
//! terminal state rejects any further attempt with a conflict rather than
//! silently succeeding.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lead lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    #[default]
    New,
    /// Optional intermediate state after first contact.
    Contacted,
    /// Converted into a customer; terminal.
    Converted,
    /// Rejected with a reason; terminal.
    Lost,
}

impl LeadStatus {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Converted => "converted",
            Self::Lost => "lost",
        }
    }

    /// Returns true if this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Converted | Self::Lost)
    }

    /// Validates that a lead in this status may be converted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LeadAlreadyTerminal` if the lead is already
    /// converted or lost.
    pub fn validate_conversion(&self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::LeadAlreadyTerminal {
                status: self.as_str().to_string(),
            });
        }
        Ok(())
    }

    /// Validates that a lead in this status may be rejected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::LeadAlreadyTerminal` if the lead is already
    /// converted or lost.
    pub fn validate_rejection(&self) -> Result<(), DomainError> {
        if self.is_terminal() {
            return Err(DomainError::LeadAlreadyTerminal {
                status: self.as_str().to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for LeadStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "converted" => Ok(Self::Converted),
            "lost" => Ok(Self::Lost),
            _ => Err(DomainError::InvalidLeadStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed enumeration of reasons a lead may be marked lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    Price,
    Timing,
    Competitor,
    NoResponse,
    NotRelevant,
    Other,
}

impl RejectReason {
    /// Returns the string representation used for persistence and the API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Price => "price",
            Self::Timing => "timing",
            Self::Competitor => "competitor",
            Self::NoResponse => "no_response",
            Self::NotRelevant => "not_relevant",
            Self::Other => "other",
        }
    }
}

impl FromStr for RejectReason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price" => Ok(Self::Price),
            "timing" => Ok(Self::Timing),
            "competitor" => Ok(Self::Competitor),
            "no_response" => Ok(Self::NoResponse),
            "not_relevant" => Ok(Self::NotRelevant),
            "other" => Ok(Self::Other),
            _ => Err(DomainError::InvalidRejectReason(s.to_string())),
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

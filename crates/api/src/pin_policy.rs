// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! PIN policy validation.
//!
//! This module enforces PIN requirements for employee credentials.

use thiserror::Error;

/// PIN policy errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PinPolicyError {
    /// PIN has the wrong length.
    #[error("PIN must be exactly {required_length} digits long")]
    WrongLength { required_length: usize },

    /// PIN contains characters other than ASCII digits.
    #[error("PIN must contain digits only")]
    NonNumeric,

    /// PIN is a trivially guessable sequence.
    #[error("PIN must not be a single repeated digit")]
    RepeatedDigit,

    /// PIN and confirmation do not match.
    #[error("PIN and confirmation do not match")]
    ConfirmationMismatch,
}

/// PIN policy configuration.
pub struct PinPolicy {
    /// Required PIN length in digits.
    pub required_length: usize,
}

impl Default for PinPolicy {
    fn default() -> Self {
        Self { required_length: 6 }
    }
}

impl PinPolicy {
    /// Validates a PIN against the policy.
    ///
    /// # Arguments
    ///
    /// * `pin` - The PIN to validate
    /// * `confirmation` - The PIN confirmation
    ///
    /// # Errors
    ///
    /// Returns a `PinPolicyError` if the PIN does not meet policy
    /// requirements.
    pub fn validate(&self, pin: &str, confirmation: &str) -> Result<(), PinPolicyError> {
        if pin != confirmation {
            return Err(PinPolicyError::ConfirmationMismatch);
        }

        if pin.len() != self.required_length {
            return Err(PinPolicyError::WrongLength {
                required_length: self.required_length,
            });
        }

        if !pin.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinPolicyError::NonNumeric);
        }

        let mut bytes = pin.bytes();
        if let Some(first) = bytes.next()
            && bytes.all(|b| b == first)
        {
            return Err(PinPolicyError::RepeatedDigit);
        }

        Ok(())
    }
}

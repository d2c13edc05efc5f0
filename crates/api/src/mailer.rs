// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Outgoing email abstraction.
//!
//! Handlers that send customer-facing email depend on this trait; the
//! server wires in an SMTP implementation, tests wire in a recording stub.
//! Sending is best-effort: a delivery failure surfaces to the caller but
//! never rolls back the business operation that triggered it.

use thiserror::Error;

/// Email delivery errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MailError {
    /// The transport rejected or failed to deliver the message.
    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    /// The recipient address is missing or unusable.
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),
}

/// A plain-text outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// An outgoing email transport.
pub trait Mailer {
    /// Sends one message and returns the transport's message id, when the
    /// transport provides one.
    ///
    /// # Errors
    ///
    /// Returns a `MailError` if the message cannot be delivered.
    fn send(&self, message: &EmailMessage) -> Result<Option<String>, MailError>;
}

/// A mailer that drops messages, for installations without SMTP configured.
///
/// Sends are logged so a misconfigured installation is visible in the logs
/// rather than silently losing mail.
pub struct NullMailer;

impl Mailer for NullMailer {
    fn send(&self, message: &EmailMessage) -> Result<Option<String>, MailError> {
        tracing::warn!(to = %message.to, subject = %message.subject, "no mail transport configured, dropping message");
        Ok(None)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SMTP transport wiring.
//!
//! The server reads `SMTP_HOST`, `SMTP_USER`, `SMTP_PASS`, and `MAIL_FROM`
//! from the environment at startup. When `SMTP_HOST` is unset the server
//! falls back to a null transport that logs and drops outgoing mail, so an
//! installation without SMTP keeps working minus customer email.

use std::sync::Arc;

use lettre::{
    Message, SmtpTransport, Transport, message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use tracing::{info, warn};

use futurol_api::{EmailMessage, MailError, Mailer, NullMailer};

/// Default sender address when `MAIL_FROM` is unset.
const DEFAULT_FROM: &str = "Futurol CRM <noreply@futurol.cz>";

/// An SMTP-backed mailer.
pub struct SmtpMailer {
    /// The relay transport.
    transport: SmtpTransport,
    /// The sender mailbox on every outgoing message.
    from: Mailbox,
}

impl Mailer for SmtpMailer {
    fn send(&self, message: &EmailMessage) -> Result<Option<String>, MailError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| MailError::InvalidRecipient(format!("'{}': {e}", message.to)))?;

        let email: Message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .body(message.body.clone())
            .map_err(|e| MailError::DeliveryFailed(e.to_string()))?;

        self.transport
            .send(&email)
            .map_err(|e| MailError::DeliveryFailed(e.to_string()))?;

        // The SMTP transport does not surface a stable message id.
        Ok(None)
    }
}

/// Builds the mailer from the environment.
///
/// Returns the null transport when `SMTP_HOST` is unset or the SMTP
/// configuration is unusable; the server still starts either way.
pub fn mailer_from_env() -> Arc<dyn Mailer + Send + Sync> {
    let Ok(host) = std::env::var("SMTP_HOST") else {
        warn!("SMTP_HOST is not set, outgoing email is disabled");
        return Arc::new(NullMailer);
    };

    let from: Mailbox = match std::env::var("MAIL_FROM")
        .unwrap_or_else(|_| DEFAULT_FROM.to_string())
        .parse()
    {
        Ok(mailbox) => mailbox,
        Err(e) => {
            warn!(error = %e, "MAIL_FROM is not a valid mailbox, outgoing email is disabled");
            return Arc::new(NullMailer);
        }
    };

    let builder = match SmtpTransport::relay(&host) {
        Ok(builder) => builder,
        Err(e) => {
            warn!(host = %host, error = %e, "SMTP relay setup failed, outgoing email is disabled");
            return Arc::new(NullMailer);
        }
    };

    let transport: SmtpTransport =
        if let (Ok(user), Ok(pass)) = (std::env::var("SMTP_USER"), std::env::var("SMTP_PASS")) {
            builder.credentials(Credentials::new(user, pass)).build()
        } else {
            builder.build()
        };

    info!(host = %host, "SMTP transport configured");
    Arc::new(SmtpMailer { transport, from })
}

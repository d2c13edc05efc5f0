// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Futurol CRM.
//!
//! This crate sits between the HTTP server and the persistence layer. It
//! owns authentication (PIN login, signed session tokens, rate limiting),
//! authorization (role permission checks, license feature gating) and the
//! request handlers for every operation, translating domain and
//! persistence failures into client-safe API errors.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
pub mod handlers;
mod license;
mod mailer;
mod pin_policy;
mod rate_limit;
pub mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{
    AuthenticatedEmployee, AuthenticationService, AuthorizationService, LoginOutcome, TokenClaims,
    TOKEN_LIFETIME, create_token, verify_token,
};
pub use error::{ApiError, AuthError};
pub use license::FeatureGate;
pub use mailer::{EmailMessage, MailError, Mailer, NullMailer};
pub use pin_policy::{PinPolicy, PinPolicyError};
pub use rate_limit::RateLimiter;

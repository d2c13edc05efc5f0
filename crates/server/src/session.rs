// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! This module provides an Axum extractor that resolves the session token
//! into an authenticated employee. The token travels in the `auth_token`
//! http-only cookie set at login; an `Authorization: Bearer` header is
//! accepted as well for non-browser clients. Extraction is fail-closed:
//! any missing, malformed, tampered, or expired token yields HTTP 401.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use futurol_api::{AuthenticatedEmployee, AuthenticationService};

use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "auth_token";

/// Extractor for the authenticated employee behind a request.
///
/// # Errors
///
/// Rejects with HTTP 401 when no token is presented or the token fails
/// verification.
pub struct Session(pub AuthenticatedEmployee);

impl FromRequestParts<AppState> for Session {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| {
            debug!("Request carries no session token");
            SessionError::MissingToken
        })?;

        let employee =
            AuthenticationService::validate_token(&token, &state.token_secret).map_err(|e| {
                warn!(error = %e, "Session validation failed");
                SessionError::InvalidToken
            })?;

        debug!(
            personal_number = %employee.personal_number,
            "Session validated"
        );
        Ok(Self(employee))
    }
}

/// Pulls the session token from the cookie or the Authorization header.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(cookie_header) = parts.headers.get(header::COOKIE)
        && let Ok(cookies) = cookie_header.to_str()
    {
        for pair in cookies.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=')
                && name == SESSION_COOKIE
                && !value.is_empty()
            {
                return Some(value.to_string());
            }
        }
    }

    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

/// Session extraction errors, rendered as HTTP 401 responses.
#[derive(Debug)]
pub enum SessionError {
    /// No token was presented.
    MissingToken,
    /// The presented token failed verification.
    InvalidToken,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingToken => "Authentication required",
            Self::InvalidToken => "Invalid or expired session",
        };
        (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": true, "message": message })),
        )
            .into_response()
    }
}

/// Builds the `Set-Cookie` value that installs the session cookie.
#[must_use]
pub fn session_cookie(token: &str, max_age_secs: i64) -> String {
    format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"
    )
}

/// Builds the `Set-Cookie` value that clears the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation rules shared by the API boundary.

use crate::error::DomainError;
use crate::types::{CustomerType, Role};

/// Validates a PIN.
///
/// # Errors
///
/// Returns `DomainError::InvalidPin` unless the PIN is exactly six ASCII
/// digits.
pub fn validate_pin(pin: &str) -> Result<(), DomainError> {
    if pin.len() != 6 || !pin.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DomainError::InvalidPin(
            "must be exactly 6 digits".to_string(),
        ));
    }
    Ok(())
}

/// Validates an employee's role set.
///
/// # Errors
///
/// Returns `DomainError::MissingRoles` if the set is empty.
pub fn validate_roles(roles: &[Role]) -> Result<(), DomainError> {
    if roles.is_empty() {
        return Err(DomainError::MissingRoles);
    }
    Ok(())
}

/// Validates an email address.
///
/// Deliberately shallow: presence of one '@' with non-empty local part and
/// a dotted domain. Deliverability is the mail provider's problem.
///
/// # Errors
///
/// Returns `DomainError::InvalidEmail` if the shape is wrong.
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();
    if local.is_empty() || domain.len() < 3 || !domain.contains('.') {
        return Err(DomainError::InvalidEmail(email.to_string()));
    }
    Ok(())
}

/// Validates that a customer's populated fields match its type
/// discriminator: B2C requires a full name, B2B requires a company name.
///
/// # Errors
///
/// Returns `DomainError::InvalidCustomerRepresentation` on mismatch.
pub fn validate_customer_representation(
    customer_type: CustomerType,
    full_name: Option<&str>,
    company_name: Option<&str>,
) -> Result<(), DomainError> {
    let has_name = full_name.is_some_and(|name| !name.trim().is_empty());
    let has_company = company_name.is_some_and(|name| !name.trim().is_empty());

    match customer_type {
        CustomerType::B2C if !has_name => Err(DomainError::InvalidCustomerRepresentation(
            "B2C customer requires a full name".to_string(),
        )),
        CustomerType::B2B if !has_company => Err(DomainError::InvalidCustomerRepresentation(
            "B2B customer requires a company name".to_string(),
        )),
        _ => Ok(()),
    }
}

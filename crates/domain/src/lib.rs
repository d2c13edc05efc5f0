// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod features;
mod lead;
mod measurement;
mod order_status;
mod permissions;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use features::{Feature, Tier};
pub use lead::{LeadStatus, RejectReason};
pub use measurement::{AnchoringSurface, Dimensions, MeasurementDetails};
pub use order_status::OrderStatus;
pub use permissions::{
    accessible_modules, can_access, can_delete, can_read, can_write, has_permission, is_admin,
    is_manager_or_above,
};
pub use types::{
    CustomerSource, CustomerType, LeadSource, Module, PermissionAction, PersonalNumber, Priority,
    ProductCode, QuoteStatus, Role, TicketStatus, TicketType,
};
pub use validation::{
    validate_customer_representation, validate_email, validate_pin, validate_roles,
};

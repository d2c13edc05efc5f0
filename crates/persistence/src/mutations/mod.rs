// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `employees` — Employee creation, updates and PIN changes
//! - `customers` — Customers, contacts and site locations
//! - `leads` — Lead creation and rejection
//! - `inquiries` — Inquiry creation
//! - `conversion` — One-shot lead and inquiry conversion to customers
//! - `orders` — Order creation, status transitions, deletion and quotes
//! - `measurements` — Measurement lifecycle and its status side effects
//! - `installations` — Installation records
//! - `service` — Service tickets
//! - `audit` — Audit log appends
//!
//! Multi-row operations (order creation, status changes, conversions,
//! measurement create/delete) run inside a single Diesel transaction so
//! the order row and its history, or the customer and its source lead,
//! can never diverge.

pub mod audit;
pub mod conversion;
pub mod customers;
pub mod employees;
pub mod inquiries;
pub mod installations;
pub mod leads;
pub mod measurements;
pub mod orders;
pub mod service;

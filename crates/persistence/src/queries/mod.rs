// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `employees` — Employee lookups
//! - `products` — Product catalogue lookups
//! - `customers` — Customers, contacts and site locations
//! - `leads` — Advisor leads
//! - `inquiries` — Web inquiries
//! - `orders` — Orders, status history and quotes
//! - `measurements` — Site measurements
//! - `installations` — Installation records
//! - `service` — Service tickets
//! - `audit` — Audit log queries
//!
//! All queries use Diesel DSL and take a `&mut SqliteConnection`. The
//! `Persistence` adapter in `lib.rs` is the only caller.

pub mod audit;
pub mod customers;
pub mod employees;
pub mod inquiries;
pub mod installations;
pub mod leads;
pub mod measurements;
pub mod orders;
pub mod products;
pub mod service;

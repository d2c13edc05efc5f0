// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! One-shot conversion of leads and inquiries into customers.
//!
//! Conversion creates the customer, stamps the source record and writes
//! the audit entry inside a single transaction. The stamping update is
//! guarded on the current status, so a record can only ever produce one
//! customer.

use diesel::prelude::*;
use diesel::SqliteConnection;
use futurol_audit::{Actor, AuditAction, AuditEvent, EntityRef};
use futurol_domain::{CustomerSource, CustomerType, LeadStatus};
use tracing::info;

use crate::data_models::{CustomerData, LeadConversionOverride, NewCustomer};
use crate::diesel_schema::{inquiries, leads};
use crate::error::PersistenceError;
use crate::mutations::audit::insert_audit_event;
use crate::mutations::customers::insert_customer;
use crate::queries;

/// Converts a lead into a customer.
///
/// The new customer inherits the lead's contact fields; a lead with a
/// company becomes a B2B customer. Fields set in `overrides` win over
/// the inherited values. The actor becomes the customer's owner.
///
/// # Errors
///
/// Returns `NotFound` if the lead does not exist, or
/// `LeadAlreadyProcessed` if it is already converted or lost.
pub fn convert_lead(
    conn: &mut SqliteConnection,
    lead_id: i64,
    actor: &Actor,
    overrides: &LeadConversionOverride,
    now: &str,
) -> Result<CustomerData, PersistenceError> {
    let customer = conn.transaction::<_, PersistenceError, _>(|conn| {
        let lead =
            queries::leads::get_lead_by_id(conn, lead_id)?.ok_or(PersistenceError::NotFound {
                entity: "lead",
                id: lead_id,
            })?;

        let status: LeadStatus = lead
            .status
            .parse()
            .map_err(|_| PersistenceError::Other(format!("corrupt lead status: {}", lead.status)))?;
        if status.is_terminal() {
            return Err(PersistenceError::LeadAlreadyProcessed { lead_id });
        }

        let company_name: Option<String> = overrides
            .company_name
            .clone()
            .or_else(|| lead.company.clone());
        let customer_type = overrides.customer_type.unwrap_or(if company_name.is_some() {
            CustomerType::B2B
        } else {
            CustomerType::B2C
        });

        let customer_id = insert_customer(
            conn,
            &NewCustomer {
                customer_type,
                full_name: lead.full_name.clone(),
                email: lead.email.clone(),
                phone: lead.phone.clone(),
                company_name,
                ico: overrides.ico.clone(),
                dic: overrides.dic.clone(),
                source: CustomerSource::Advisor,
                note: lead.customer_note.clone(),
                owner_id: Some(actor.employee_id),
                origin_lead_id: Some(lead_id),
            },
            now,
        )?;

        // Status guard inside the update keeps conversion one-shot even
        // if the pre-check above raced with another writer.
        let affected = diesel::update(
            leads::table.filter(leads::lead_id.eq(lead_id)).filter(
                leads::status.ne_all(vec![
                    LeadStatus::Converted.as_str(),
                    LeadStatus::Lost.as_str(),
                ]),
            ),
        )
        .set((
            leads::status.eq(LeadStatus::Converted.as_str()),
            leads::converted_customer_id.eq(Some(customer_id)),
            leads::converted_by.eq(Some(actor.employee_id)),
            leads::converted_at.eq(Some(now)),
        ))
        .execute(conn)?;

        if affected == 0 {
            return Err(PersistenceError::LeadAlreadyProcessed { lead_id });
        }

        let after = queries::leads::get_lead_by_id(conn, lead_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "lead",
                id: lead_id,
            },
        )?;

        insert_audit_event(
            conn,
            &AuditEvent::new(
                actor.clone(),
                AuditAction::LeadConverted,
                EntityRef {
                    entity_type: "lead".to_owned(),
                    entity_id: lead_id,
                },
                Some(serde_json::to_string(&lead)?),
                Some(serde_json::to_string(&after)?),
            ),
            now,
        )?;

        queries::customers::get_customer_by_id(conn, customer_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "customer",
                id: customer_id,
            },
        )
    })?;

    info!(
        "Lead {} converted to customer {}",
        lead_id, customer.customer_id
    );
    Ok(customer)
}

/// Converts a web inquiry into a customer.
///
/// # Errors
///
/// Returns `NotFound` if the inquiry does not exist, or
/// `InquiryAlreadyProcessed` if it is already converted.
pub fn convert_inquiry(
    conn: &mut SqliteConnection,
    inquiry_id: i64,
    actor: &Actor,
    now: &str,
) -> Result<CustomerData, PersistenceError> {
    let customer = conn.transaction::<_, PersistenceError, _>(|conn| {
        let inquiry = queries::inquiries::get_inquiry_by_id(conn, inquiry_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "inquiry",
                id: inquiry_id,
            },
        )?;

        if inquiry.status == "converted" {
            return Err(PersistenceError::InquiryAlreadyProcessed { inquiry_id });
        }

        let customer_id = insert_customer(
            conn,
            &NewCustomer {
                customer_type: CustomerType::B2C,
                full_name: Some(inquiry.full_name.clone()),
                email: inquiry.email.clone(),
                phone: inquiry.phone.clone(),
                company_name: None,
                ico: None,
                dic: None,
                source: CustomerSource::Inquiry,
                note: inquiry.message.clone(),
                owner_id: Some(actor.employee_id),
                origin_lead_id: None,
            },
            now,
        )?;

        let affected = diesel::update(
            inquiries::table
                .filter(inquiries::inquiry_id.eq(inquiry_id))
                .filter(inquiries::status.ne("converted")),
        )
        .set((
            inquiries::status.eq("converted"),
            inquiries::customer_id.eq(Some(customer_id)),
            inquiries::converted_at.eq(Some(now)),
        ))
        .execute(conn)?;

        if affected == 0 {
            return Err(PersistenceError::InquiryAlreadyProcessed { inquiry_id });
        }

        let after = queries::inquiries::get_inquiry_by_id(conn, inquiry_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "inquiry",
                id: inquiry_id,
            },
        )?;

        insert_audit_event(
            conn,
            &AuditEvent::new(
                actor.clone(),
                AuditAction::InquiryConverted,
                EntityRef {
                    entity_type: "inquiry".to_owned(),
                    entity_id: inquiry_id,
                },
                Some(serde_json::to_string(&inquiry)?),
                Some(serde_json::to_string(&after)?),
            ),
            now,
        )?;

        queries::customers::get_customer_by_id(conn, customer_id)?.ok_or(
            PersistenceError::NotFound {
                entity: "customer",
                id: customer_id,
            },
        )
    })?;

    info!(
        "Inquiry {} converted to customer {}",
        inquiry_id, customer.customer_id
    );
    Ok(customer)
}

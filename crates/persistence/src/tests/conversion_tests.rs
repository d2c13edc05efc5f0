// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use futurol_domain::RejectReason;

use crate::tests::{create_test_actor, create_test_lead, create_test_persistence};
use crate::{LeadConversionOverride, NewInquiry, Persistence, PersistenceError};

#[test]
fn test_convert_lead_creates_customer_and_stamps_lead() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);
    let actor = create_test_actor(&mut persistence);

    let customer = persistence
        .convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default())
        .unwrap();

    assert_eq!(customer.full_name.as_deref(), Some("Petr Svoboda"));
    assert_eq!(customer.customer_type, "B2C");
    assert_eq!(customer.source, "advisor");
    assert_eq!(customer.origin_lead_id, Some(lead.lead_id));
    assert_eq!(customer.owner_id, Some(actor.employee_id));

    let stamped = persistence.get_lead(lead.lead_id).unwrap().unwrap();
    assert_eq!(stamped.status, "converted");
    assert_eq!(stamped.converted_customer_id, Some(customer.customer_id));
    assert_eq!(stamped.converted_by, Some(actor.employee_id));
    assert!(stamped.converted_at.is_some());
}

#[test]
fn test_convert_lead_writes_audit_entry() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);
    let actor = create_test_actor(&mut persistence);

    persistence
        .convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default())
        .unwrap();

    let trail = persistence
        .list_audit_entries_for_entity("lead", lead.lead_id)
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "LEAD_CONVERTED");
    assert_eq!(trail[0].personal_number, "1001");
    assert!(trail[0].before_json.is_some());
    assert!(trail[0].after_json.is_some());
}

#[test]
fn test_convert_lead_is_one_shot() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);
    let actor = create_test_actor(&mut persistence);

    persistence
        .convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default())
        .unwrap();
    let second =
        persistence.convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default());

    assert!(matches!(
        second,
        Err(PersistenceError::LeadAlreadyProcessed { lead_id }) if lead_id == lead.lead_id
    ));
    // The failed attempt must not have created a second customer.
    assert_eq!(persistence.list_customers().unwrap().len(), 1);
}

#[test]
fn test_company_lead_becomes_b2b_customer() {
    let mut persistence: Persistence = create_test_persistence();
    let actor = create_test_actor(&mut persistence);

    let lead = persistence
        .create_lead(&crate::NewLead {
            source: futurol_domain::LeadSource::Advisor,
            full_name: Some(String::from("Karel Dvorak")),
            email: None,
            phone: None,
            company: Some(String::from("Dvorak a synove s.r.o.")),
            recommended_product: None,
            score_answers: None,
            customer_note: None,
        })
        .unwrap();

    let customer = persistence
        .convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default())
        .unwrap();
    assert_eq!(customer.customer_type, "B2B");
    assert_eq!(
        customer.company_name.as_deref(),
        Some("Dvorak a synove s.r.o.")
    );
}

#[test]
fn test_conversion_overrides_win_over_lead_fields() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);
    let actor = create_test_actor(&mut persistence);

    let customer = persistence
        .convert_lead(
            lead.lead_id,
            &actor,
            &LeadConversionOverride {
                customer_type: Some(futurol_domain::CustomerType::B2B),
                company_name: Some(String::from("Svoboda pergoly s.r.o.")),
                ico: Some(String::from("12345678")),
                dic: Some(String::from("CZ12345678")),
            },
        )
        .unwrap();

    assert_eq!(customer.customer_type, "B2B");
    assert_eq!(
        customer.company_name.as_deref(),
        Some("Svoboda pergoly s.r.o.")
    );
    assert_eq!(customer.ico.as_deref(), Some("12345678"));
    assert_eq!(customer.dic.as_deref(), Some("CZ12345678"));
    // Contact fields still come from the lead.
    assert_eq!(customer.full_name.as_deref(), Some("Petr Svoboda"));
}

#[test]
fn test_reject_lead_records_reason() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);

    let rejected = persistence
        .reject_lead(lead.lead_id, RejectReason::Price, Some("over budget"))
        .unwrap();

    assert_eq!(rejected.status, "lost");
    assert_eq!(rejected.lost_reason.as_deref(), Some("price"));
    assert_eq!(rejected.lost_note.as_deref(), Some("over budget"));
}

#[test]
fn test_rejected_lead_cannot_be_converted() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);
    let actor = create_test_actor(&mut persistence);

    persistence
        .reject_lead(lead.lead_id, RejectReason::NoResponse, None)
        .unwrap();

    let result =
        persistence.convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default());
    assert!(matches!(
        result,
        Err(PersistenceError::LeadAlreadyProcessed { .. })
    ));
    assert!(persistence.list_customers().unwrap().is_empty());
}

#[test]
fn test_converted_lead_cannot_be_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let lead = create_test_lead(&mut persistence);
    let actor = create_test_actor(&mut persistence);

    persistence
        .convert_lead(lead.lead_id, &actor, &LeadConversionOverride::default())
        .unwrap();

    let result = persistence.reject_lead(lead.lead_id, RejectReason::Other, None);
    assert!(matches!(
        result,
        Err(PersistenceError::LeadAlreadyProcessed { .. })
    ));
}

#[test]
fn test_convert_inquiry_is_one_shot() {
    let mut persistence: Persistence = create_test_persistence();
    let actor = create_test_actor(&mut persistence);

    let inquiry = persistence
        .create_inquiry(&NewInquiry {
            full_name: String::from("Eva Marek"),
            email: Some(String::from("eva@example.cz")),
            phone: None,
            message: Some(String::from("Interested in a ZIP screen")),
        })
        .unwrap();
    assert_eq!(inquiry.status, "new");

    let customer = persistence.convert_inquiry(inquiry.inquiry_id, &actor).unwrap();
    assert_eq!(customer.source, "inquiry");
    assert_eq!(customer.full_name.as_deref(), Some("Eva Marek"));

    let stamped = persistence
        .get_inquiry(inquiry.inquiry_id)
        .unwrap()
        .unwrap();
    assert_eq!(stamped.status, "converted");
    assert_eq!(stamped.customer_id, Some(customer.customer_id));

    let second = persistence.convert_inquiry(inquiry.inquiry_id, &actor);
    assert!(matches!(
        second,
        Err(PersistenceError::InquiryAlreadyProcessed { .. })
    ));
    assert_eq!(persistence.list_customers().unwrap().len(), 1);

    let trail = persistence
        .list_audit_entries_for_entity("inquiry", inquiry.inquiry_id)
        .unwrap();
    assert_eq!(trail.len(), 1);
    assert_eq!(trail[0].action, "INQUIRY_CONVERTED");
}

#[test]
fn test_convert_missing_lead() {
    let mut persistence: Persistence = create_test_persistence();
    let actor = create_test_actor(&mut persistence);

    let result = persistence.convert_lead(42, &actor, &LeadConversionOverride::default());
    assert!(matches!(
        result,
        Err(PersistenceError::NotFound { entity: "lead", id: 42 })
    ));
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::lead::{LeadStatus, RejectReason};
use std::str::FromStr;

#[test]
fn test_new_and_contacted_leads_can_convert() {
    assert!(LeadStatus::New.validate_conversion().is_ok());
    assert!(LeadStatus::Contacted.validate_conversion().is_ok());
}

#[test]
fn test_converted_lead_rejects_further_conversion() {
    let result = LeadStatus::Converted.validate_conversion();
    assert_eq!(
        result,
        Err(DomainError::LeadAlreadyTerminal {
            status: "converted".to_string()
        })
    );
}

#[test]
fn test_lost_lead_rejects_conversion_and_rejection() {
    assert!(LeadStatus::Lost.validate_conversion().is_err());
    assert!(LeadStatus::Lost.validate_rejection().is_err());
}

#[test]
fn test_converted_lead_rejects_rejection() {
    assert!(LeadStatus::Converted.validate_rejection().is_err());
}

#[test]
fn test_terminal_states() {
    assert!(LeadStatus::Converted.is_terminal());
    assert!(LeadStatus::Lost.is_terminal());
    assert!(!LeadStatus::New.is_terminal());
    assert!(!LeadStatus::Contacted.is_terminal());
}

#[test]
fn test_reject_reason_parsing() {
    assert_eq!(
        RejectReason::from_str("no_response").ok(),
        Some(RejectReason::NoResponse)
    );
    assert_eq!(
        RejectReason::from_str("price").ok(),
        Some(RejectReason::Price)
    );
    assert!(RejectReason::from_str("too_expensive").is_err());
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::permissions::{
    accessible_modules, actions_for, can_access, can_delete, can_read, can_write, has_permission,
    is_admin, is_manager_or_above,
};
use crate::types::{Module, PermissionAction, Role};

const ALL_ACTIONS: [PermissionAction; 3] = [
    PermissionAction::Read,
    PermissionAction::Write,
    PermissionAction::Delete,
];

#[test]
fn test_admin_has_full_permissions_on_every_module() {
    for module in Module::ALL {
        for action in ALL_ACTIONS {
            assert!(
                has_permission(&[Role::Admin], module, action),
                "admin should have {action:?} on {module}"
            );
        }
    }
}

#[test]
fn test_technician_has_no_access_to_settings_and_users() {
    for module in [Module::Settings, Module::Users] {
        assert!(actions_for(Role::Technician, module).is_empty());
        assert!(!can_access(&[Role::Technician], module));
    }
}

#[test]
fn test_can_access_agrees_with_has_permission_in_both_directions() {
    // can_access == true iff at least one action is granted, for every
    // single-role set and every module.
    for role in Role::ALL {
        for module in Module::ALL {
            let any_action = ALL_ACTIONS
                .into_iter()
                .any(|action| has_permission(&[role], module, action));
            assert_eq!(
                can_access(&[role], module),
                any_action,
                "mismatch for {role} / {module}"
            );
        }
    }
}

#[test]
fn test_roles_union_with_or_semantics() {
    // Technician alone cannot touch leads; sales can. Holding both grants
    // the union.
    assert!(!can_write(&[Role::Technician], Module::Leads));
    assert!(can_write(&[Role::Sales], Module::Leads));
    assert!(can_write(&[Role::Technician, Role::Sales], Module::Leads));
}

#[test]
fn test_manager_is_read_only_outside_settings_and_users() {
    for module in [
        Module::Leads,
        Module::Customers,
        Module::Orders,
        Module::Measurements,
        Module::Service,
        Module::Reports,
    ] {
        assert!(can_read(&[Role::Manager], module));
        assert!(!can_write(&[Role::Manager], module));
        assert!(!can_delete(&[Role::Manager], module));
    }
}

#[test]
fn test_sales_measurements_are_read_only() {
    assert!(can_read(&[Role::Sales], Module::Measurements));
    assert!(!can_write(&[Role::Sales], Module::Measurements));
}

#[test]
fn test_production_manager_reads_three_modules_only() {
    let modules = accessible_modules(&[Role::ProductionManager]);
    assert_eq!(
        modules,
        vec![Module::Customers, Module::Orders, Module::Measurements]
    );
}

#[test]
fn test_accessible_modules_for_admin_is_everything() {
    assert_eq!(accessible_modules(&[Role::Admin]).len(), Module::ALL.len());
}

#[test]
fn test_is_admin_and_is_manager_or_above() {
    assert!(is_admin(&[Role::Admin, Role::Sales]));
    assert!(!is_admin(&[Role::Sales]));
    assert!(is_manager_or_above(&[Role::Manager]));
    assert!(is_manager_or_above(&[Role::Admin]));
    assert!(!is_manager_or_above(&[Role::Technician, Role::Sales]));
}

#[test]
fn test_empty_role_set_has_no_access_anywhere() {
    for module in Module::ALL {
        assert!(!can_access(&[], module));
    }
}

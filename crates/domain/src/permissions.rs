// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-based permission matrix.
//!
//! The matrix is a total, compile-time function over the closed `Role` and
//! `Module` enumerations: every (role, module) pair maps to an explicit
//! (possibly empty) action slice, so adding a module forces a review of
//! every role's entry. An employee's roles are unioned: if any held role
//! grants an action, access is permitted.

use crate::types::{Module, PermissionAction, Role};

use PermissionAction::{Delete, Read, Write};

const FULL: &[PermissionAction] = &[Read, Write, Delete];
const READ_ONLY: &[PermissionAction] = &[Read];
const NONE: &[PermissionAction] = &[];

/// Returns the actions a single role may perform within a module.
#[must_use]
pub const fn actions_for(role: Role, module: Module) -> &'static [PermissionAction] {
    match role {
        Role::Admin => FULL,
        Role::Sales => match module {
            Module::Settings | Module::Users | Module::Reports => NONE,
            Module::Leads | Module::Customers | Module::Orders | Module::Service => FULL,
            Module::Measurements => READ_ONLY,
        },
        Role::Manager => match module {
            Module::Settings | Module::Users => NONE,
            Module::Leads
            | Module::Customers
            | Module::Orders
            | Module::Measurements
            | Module::Service
            | Module::Reports => READ_ONLY,
        },
        Role::ProductionManager => match module {
            Module::Customers | Module::Orders | Module::Measurements => READ_ONLY,
            Module::Settings
            | Module::Users
            | Module::Leads
            | Module::Service
            | Module::Reports => NONE,
        },
        Role::Technician => match module {
            Module::Customers | Module::Orders => READ_ONLY,
            Module::Measurements | Module::Service => FULL,
            Module::Settings | Module::Users | Module::Leads | Module::Reports => NONE,
        },
    }
}

/// Checks whether any of the held roles grants an action within a module.
#[must_use]
pub fn has_permission(roles: &[Role], module: Module, action: PermissionAction) -> bool {
    roles
        .iter()
        .any(|role| actions_for(*role, module).contains(&action))
}

/// Checks whether any of the held roles grants any action within a module.
#[must_use]
pub fn can_access(roles: &[Role], module: Module) -> bool {
    roles
        .iter()
        .any(|role| !actions_for(*role, module).is_empty())
}

/// Checks whether the held roles allow reading a module.
#[must_use]
pub fn can_read(roles: &[Role], module: Module) -> bool {
    has_permission(roles, module, PermissionAction::Read)
}

/// Checks whether the held roles allow writing to a module.
#[must_use]
pub fn can_write(roles: &[Role], module: Module) -> bool {
    has_permission(roles, module, PermissionAction::Write)
}

/// Checks whether the held roles allow deleting within a module.
#[must_use]
pub fn can_delete(roles: &[Role], module: Module) -> bool {
    has_permission(roles, module, PermissionAction::Delete)
}

/// Returns every module the held roles can access.
#[must_use]
pub fn accessible_modules(roles: &[Role]) -> Vec<Module> {
    Module::ALL
        .into_iter()
        .filter(|module| can_access(roles, *module))
        .collect()
}

/// Checks whether the held roles include admin.
#[must_use]
pub fn is_admin(roles: &[Role]) -> bool {
    roles.contains(&Role::Admin)
}

/// Checks whether the held roles include admin or manager.
#[must_use]
pub fn is_manager_or_above(roles: &[Role]) -> bool {
    roles
        .iter()
        .any(|role| matches!(role, Role::Admin | Role::Manager))
}

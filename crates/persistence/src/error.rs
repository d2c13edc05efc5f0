// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Timestamp formatting failed.
    TimestampError(String),
    /// The requested entity was not found.
    NotFound {
        /// The entity type name.
        entity: &'static str,
        /// The entity identifier.
        id: i64,
    },
    /// No employee exists with the given personal number.
    EmployeeNotFound(String),
    /// The personal number is already taken by another employee.
    PersonalNumberTaken(String),
    /// Lead is already converted or rejected.
    LeadAlreadyProcessed {
        /// The lead ID.
        lead_id: i64,
    },
    /// Inquiry is already converted.
    InquiryAlreadyProcessed {
        /// The inquiry ID.
        inquiry_id: i64,
    },
    /// The order already owns a measurement.
    MeasurementExists {
        /// The order identifier.
        order_id: i64,
    },
    /// The order already owns an installation.
    InstallationExists {
        /// The order identifier.
        order_id: i64,
    },
    /// The order cannot be deleted because it owns a measurement.
    OrderHasMeasurement {
        /// The order identifier.
        order_id: i64,
    },
    /// The order cannot be deleted because it owns service tickets.
    OrderHasServiceTickets {
        /// The order identifier.
        order_id: i64,
    },
    /// Password hashing failed.
    HashingFailed(String),
    /// `SQLite` foreign key enforcement is not active on this connection.
    ForeignKeyEnforcementNotEnabled,
    /// A general error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::TimestampError(msg) => write!(f, "Timestamp error: {msg}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::EmployeeNotFound(personal_number) => {
                write!(f, "Employee not found: {personal_number}")
            }
            Self::PersonalNumberTaken(personal_number) => {
                write!(f, "Personal number already taken: {personal_number}")
            }
            Self::LeadAlreadyProcessed { lead_id } => {
                write!(f, "Lead {lead_id} is already converted or rejected")
            }
            Self::InquiryAlreadyProcessed { inquiry_id } => {
                write!(f, "Inquiry {inquiry_id} is already converted")
            }
            Self::MeasurementExists { order_id } => {
                write!(f, "Order {order_id} already has a measurement")
            }
            Self::InstallationExists { order_id } => {
                write!(f, "Order {order_id} already has an installation")
            }
            Self::OrderHasMeasurement { order_id } => {
                write!(f, "Order {order_id} cannot be deleted: measurement exists")
            }
            Self::OrderHasServiceTickets { order_id } => {
                write!(f, "Order {order_id} cannot be deleted: service tickets exist")
            }
            Self::HashingFailed(msg) => write!(f, "Password hashing failed: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "SQLite foreign key enforcement is not enabled")
            }
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        Self::DatabaseError(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

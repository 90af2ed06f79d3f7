// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use fincomms::{CoreError, OperationError};
use fincomms_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Rule violations and revert refusals are final; only storage failures are
/// worth retrying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A workflow rule was violated.
    RuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Revert requested on an invoice at the first stage of its flow.
    CannotRevert {
        /// A human-readable description.
        message: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The store failed to complete a read or write.
    StorageFailure {
        /// The store's error message.
        message: String,
    },
}

impl ApiError {
    /// Returns true if repeating the request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::StorageFailure { .. })
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::RuleViolation { rule, message } => {
                write!(f, "Rule violation ({rule}): {message}")
            }
            Self::CannotRevert { message } => write!(f, "Cannot revert further: {message}"),
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::StorageFailure { message } => {
                write!(f, "Save failed, please retry: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidFlowType(value) => ApiError::InvalidInput {
            field: String::from("flow_type"),
            message: format!("Unknown flow type '{value}'"),
        },
        DomainError::InvalidPaymentStatus(value) => ApiError::InvalidInput {
            field: String::from("payment_status"),
            message: format!("Unknown payment status '{value}'"),
        },
        DomainError::InvalidEvidenceKind(value) => ApiError::InvalidInput {
            field: String::from("kind"),
            message: format!("Unknown evidence kind '{value}', expected NOTE or EMAIL"),
        },
        DomainError::InvalidTeamView(value) => ApiError::InvalidInput {
            field: String::from("view"),
            message: format!("Unknown view '{value}'"),
        },
        DomainError::InvalidSortKey(value) => ApiError::InvalidInput {
            field: String::from("sort_by"),
            message: format!("Unknown sort key '{value}'"),
        },
        DomainError::StageNotInFlow { flow, stage } => ApiError::RuleViolation {
            rule: String::from("stage_in_flow"),
            message: format!("Stage '{stage}' is not part of the {flow} flow"),
        },
        DomainError::InvalidInvoiceNumber(msg) => ApiError::InvalidInput {
            field: String::from("invoice_number"),
            message: msg,
        },
        DomainError::InvalidVendor(msg) => ApiError::InvalidInput {
            field: String::from("vendor"),
            message: msg,
        },
        DomainError::InvalidAmount(msg) => ApiError::InvalidInput {
            field: String::from("amount"),
            message: msg,
        },
        DomainError::InvalidCurrency(msg) => ApiError::InvalidInput {
            field: String::from("currency"),
            message: msg,
        },
        DomainError::ValidationRecordWithoutPayment {
            invoice_number,
            status,
        } => ApiError::RuleViolation {
            rule: String::from("record_integrity"),
            message: format!(
                "Invoice '{invoice_number}' has a payment validation record but status is {status}"
            ),
        },
    }
}

/// Translates a core error into an API error.
///
/// Revert at the first stage becomes [`ApiError::CannotRevert`] so callers
/// can tell it apart from rule violations.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::StageNotInFlow { .. } => ApiError::RuleViolation {
            rule: String::from("stage_in_flow"),
            message,
        },
        CoreError::InvoiceClosed { .. } => ApiError::RuleViolation {
            rule: String::from("closed_invoice"),
            message,
        },
        CoreError::AlreadyPaid { .. } => ApiError::RuleViolation {
            rule: String::from("already_paid"),
            message,
        },
        CoreError::AlreadyAtInitialStage { .. } => ApiError::CannotRevert { message },
        CoreError::EmptyEvidence { .. } => ApiError::InvalidInput {
            field: String::from("body"),
            message,
        },
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates the outcome of a dispatched operation into an API error.
#[must_use]
pub fn translate_operation_error<E: std::fmt::Display>(err: OperationError<E>) -> ApiError {
    match err {
        OperationError::NotFound(id) => ApiError::NotFound {
            resource_type: String::from("Invoice"),
            message: format!("Invoice {id} does not exist"),
        },
        OperationError::Rejected(core_err) => translate_core_error(core_err),
        OperationError::Collaborator(store_err) => storage_failure(&store_err),
    }
}

/// Wraps a store error.
#[must_use]
pub fn storage_failure<E: std::fmt::Display>(err: &E) -> ApiError {
    ApiError::StorageFailure {
        message: err.to_string(),
    }
}

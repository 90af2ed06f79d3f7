// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::flow::FlowType;
use crate::invoice::PaymentStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Flow type string is not recognized.
    InvalidFlowType(String),
    /// Payment status string is not recognized.
    InvalidPaymentStatus(String),
    /// Evidence kind string is not recognized.
    InvalidEvidenceKind(String),
    /// Team view string is not recognized.
    InvalidTeamView(String),
    /// Sort key string is not recognized.
    InvalidSortKey(String),
    /// The stage does not belong to the flow's stage sequence.
    StageNotInFlow {
        /// The flow the stage was checked against.
        flow: FlowType,
        /// The offending stage label.
        stage: String,
    },
    /// Invoice number is empty or invalid.
    InvalidInvoiceNumber(String),
    /// Vendor name is empty or invalid.
    InvalidVendor(String),
    /// Amount is invalid.
    InvalidAmount(String),
    /// Currency code is invalid.
    InvalidCurrency(String),
    /// A payment validation record exists on an invoice that is not paid.
    ValidationRecordWithoutPayment {
        /// The invoice number of the inconsistent record.
        invoice_number: String,
        /// The payment status found on the record.
        status: PaymentStatus,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidFlowType(value) => write!(f, "Invalid flow type: {value}"),
            Self::InvalidPaymentStatus(value) => write!(f, "Invalid payment status: {value}"),
            Self::InvalidEvidenceKind(value) => write!(f, "Invalid evidence kind: {value}"),
            Self::InvalidTeamView(value) => write!(f, "Invalid team view: {value}"),
            Self::InvalidSortKey(value) => write!(f, "Invalid sort key: {value}"),
            Self::StageNotInFlow { flow, stage } => {
                write!(f, "Stage '{stage}' is not part of the {flow} flow")
            }
            Self::InvalidInvoiceNumber(msg) => write!(f, "Invalid invoice number: {msg}"),
            Self::InvalidVendor(msg) => write!(f, "Invalid vendor: {msg}"),
            Self::InvalidAmount(msg) => write!(f, "Invalid amount: {msg}"),
            Self::InvalidCurrency(msg) => write!(f, "Invalid currency: {msg}"),
            Self::ValidationRecordWithoutPayment {
                invoice_number,
                status,
            } => {
                write!(
                    f,
                    "Invoice '{invoice_number}' has a payment validation record but status is {status}"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}

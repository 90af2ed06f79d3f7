// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::invoice::{Invoice, NewInvoice, PaymentStatus};
use rust_decimal::Decimal;

/// Validates the field constraints of a creation request.
///
/// This function checks required fields and formats.
/// It does NOT check invoice-number uniqueness (the store enforces that).
///
/// # Arguments
///
/// * `new` - The creation request to validate
///
/// # Returns
///
/// * `Ok(())` if the request's fields are valid
/// * `Err(DomainError)` if any field is invalid
///
/// # Errors
///
/// Returns an error if:
/// - The invoice number is empty
/// - The vendor is empty
/// - The amount is negative
/// - The currency is not a three-letter uppercase code
pub fn validate_new_invoice(new: &NewInvoice) -> Result<(), DomainError> {
    // Rule: invoice number must not be empty
    if new.invoice_number.trim().is_empty() {
        return Err(DomainError::InvalidInvoiceNumber(String::from(
            "Invoice number cannot be empty",
        )));
    }

    // Rule: vendor must not be empty
    if new.vendor.trim().is_empty() {
        return Err(DomainError::InvalidVendor(String::from(
            "Vendor cannot be empty",
        )));
    }

    // Rule: amounts are gross invoice totals; credit notes are not tracked here
    if new.amount < Decimal::ZERO {
        return Err(DomainError::InvalidAmount(format!(
            "Amount cannot be negative, got {}",
            new.amount
        )));
    }

    // Rule: ISO 4217 style code
    if new.currency.len() != 3 || !new.currency.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(DomainError::InvalidCurrency(format!(
            "Currency must be a three-letter uppercase code, got '{}'",
            new.currency
        )));
    }

    Ok(())
}

/// Checks a stored invoice for cross-field integrity faults.
///
/// A stage outside the invoice's flow is unrepresentable, so the remaining
/// fault is a payment validation record on an invoice that is not paid.
///
/// # Errors
///
/// Returns `DomainError::ValidationRecordWithoutPayment` if a validation
/// record is present while the payment status is not `PAID`.
pub fn validate_invoice_record(invoice: &Invoice) -> Result<(), DomainError> {
    if invoice.payment_validation().is_some() && invoice.payment_status() != PaymentStatus::Paid {
        return Err(DomainError::ValidationRecordWithoutPayment {
            invoice_number: invoice.invoice_number.clone(),
            status: invoice.payment_status(),
        });
    }
    Ok(())
}

//! Invoice form validation
//!
//! `validate_create` and `validate_update` are the explicit schemas of the
//! two mutating actions. Both accept the raw form and return either the
//! storage-ready [`InvoiceDraft`] or every field error found.

use super::filters::{NumberError, coerce_decimal, trim};
use super::validators::{in_list, positive, required};
use crate::core::invoice::{Cents, InvoiceDraft, InvoiceStatus};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const CUSTOMER_REQUIRED: &str = "Please select a customer.";
pub const AMOUNT_NOT_POSITIVE: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_NOT_A_NUMBER: &str = "Amount must be a number.";
pub const AMOUNT_TOO_LARGE: &str = "Amount is too large.";
pub const STATUS_INVALID: &str = "Please select an invoice status.";

/// Raw invoice form as submitted by the browser
///
/// Every field is optional: a field missing from the submission is a
/// validation error, never a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceForm {
    #[serde(rename = "customerId", default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl InvoiceForm {
    pub fn new(customer_id: &str, amount: &str, status: &str) -> Self {
        Self {
            customer_id: Some(customer_id.to_string()),
            amount: Some(amount.to_string()),
            status: Some(status.to_string()),
        }
    }
}

/// Field name → messages, in a stable order
///
/// Keys use the form's field names (`customerId`, `amount`, `status`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Outcome of validating a form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation<T> {
    Valid(T),
    Invalid(FieldErrors),
}

impl<T> Validation<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_result(self) -> Result<T, FieldErrors> {
        match self {
            Validation::Valid(value) => Ok(value),
            Validation::Invalid(errors) => Err(errors),
        }
    }
}

/// Validate the input of the create action
pub fn validate_create(form: &InvoiceForm) -> Validation<InvoiceDraft> {
    validate_draft(form)
}

/// Validate the input of the update action
///
/// Same rules as create: id and date are never taken from the form.
pub fn validate_update(form: &InvoiceForm) -> Validation<InvoiceDraft> {
    validate_draft(form)
}

fn validate_draft(form: &InvoiceForm) -> Validation<InvoiceDraft> {
    let mut errors = FieldErrors::new();

    let customer_id = trim()(form.customer_id.as_deref());
    if let Err(message) = required(CUSTOMER_REQUIRED)(customer_id.as_deref()) {
        errors.add("customerId", message);
    }

    let amount = match coerce_decimal()(form.amount.as_deref()) {
        Err(NumberError::NotANumber) => {
            errors.add("amount", AMOUNT_NOT_A_NUMBER);
            None
        }
        Err(NumberError::Overflow { negative: true }) => {
            errors.add("amount", AMOUNT_NOT_POSITIVE);
            None
        }
        Err(NumberError::Overflow { negative: false }) => {
            errors.add("amount", AMOUNT_TOO_LARGE);
            None
        }
        Ok(value) => match positive(AMOUNT_NOT_POSITIVE)(&value) {
            Err(message) => {
                errors.add("amount", message);
                None
            }
            Ok(()) => match Cents::from_decimal(value) {
                // Sub-cent amounts round to zero; they are not "greater than $0".
                Some(cents) if cents.value() > 0 => Some(cents),
                Some(_) => {
                    errors.add("amount", AMOUNT_NOT_POSITIVE);
                    None
                }
                None => {
                    errors.add("amount", AMOUNT_TOO_LARGE);
                    None
                }
            },
        },
    };

    let status = form.status.as_deref();
    if let Err(message) = in_list(&InvoiceStatus::VALUES, STATUS_INVALID)(status) {
        errors.add("status", message);
    }

    match (customer_id, amount, status.and_then(|s| s.parse().ok())) {
        (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => {
            Validation::Valid(InvoiceDraft {
                customer_id,
                amount,
                status,
            })
        }
        _ => Validation::Invalid(errors),
    }
}

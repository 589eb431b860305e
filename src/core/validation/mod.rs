//! Validation and filtering of untrusted form input
//!
//! Raw form values pass through [`filters`] (normalization and coercion) and
//! [`validators`] (rules with user-facing messages). The per-operation entry
//! points live in [`form`] and return a tagged [`Validation`] result instead
//! of raising.

pub mod filters;
pub mod form;
pub mod validators;

pub use form::{FieldErrors, InvoiceForm, Validation, validate_create, validate_update};

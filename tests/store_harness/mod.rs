//! Shared test harness for invoice store testing
//!
//! Provides sample customers, invoice builders and two macro-generated
//! suites:
//! - `invoice_store_tests!`: the `InvoiceStore` contract
//! - `http_integration_tests!`: the HTTP surface over a given store
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//!
//! invoice_store_tests!(InMemoryInvoiceStore::with_customers(sample_customers()));
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod contract;
#[macro_use]
pub mod http;

use chrono::NaiveDate;
use invoice_dash::core::invoice::{Cents, Customer, InvoiceStatus, NewInvoice};
use invoice_dash::core::store::InvoiceStore;
use invoice_dash::core::validation::InvoiceForm;
use uuid::Uuid;

// Customer ids are UUID strings so they satisfy the relational schema too.
pub const ACME_ID: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";
pub const GLOBEX_ID: &str = "76d65c26-f784-44a2-ac19-586678f7c2f2";
pub const UNKNOWN_CUSTOMER_ID: &str = "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa";

/// The customers every store under test knows about
pub fn sample_customers() -> Vec<Customer> {
    vec![
        Customer {
            id: ACME_ID.to_string(),
            name: "Acme Corp".to_string(),
            email: "billing@acme.test".to_string(),
        },
        Customer {
            id: GLOBEX_ID.to_string(),
            name: "Globex".to_string(),
            email: "accounts@globex.test".to_string(),
        },
    ]
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
}

/// Build an insert payload
pub fn new_invoice(customer_id: &str, cents: i32, status: InvoiceStatus, date: NaiveDate) -> NewInvoice {
    NewInvoice {
        customer_id: customer_id.to_string(),
        amount: Cents::new(cents),
        status,
        date,
    }
}

/// Insert `n` pending Acme invoices on consecutive days starting May 1st
pub async fn insert_batch(store: &dyn InvoiceStore, n: u32) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for i in 0..n {
        let invoice = store
            .insert(new_invoice(ACME_ID, 100 * (i as i32 + 1), InvoiceStatus::Pending, day(i + 1)))
            .await
            .unwrap();
        ids.push(invoice.id);
    }
    ids
}

/// A valid form for `customer_id`
pub fn valid_form(customer_id: &str, amount: &str, status: &str) -> InvoiceForm {
    InvoiceForm::new(customer_id, amount, status)
}

/// Assert that a list contains exactly `n` items.
pub fn assert_count<T>(list: &[T], expected: usize) {
    assert_eq!(
        list.len(),
        expected,
        "Expected {} items, got {}",
        expected,
        list.len()
    );
}

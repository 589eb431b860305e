//! Invoice domain types
//!
//! Amounts are carried as integer minor units ([`Cents`]) everywhere past
//! validation; no floating point value ever reaches the store.

use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Payment status of an invoice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// All accepted wire values, in display order
    pub const VALUES: [&'static str; 2] = ["pending", "paid"];

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(format!("unknown invoice status '{}'", other)),
        }
    }
}

/// Monetary amount in minor units (cents)
///
/// The storage column is a 32-bit `int`, so the representable range is
/// bounded by `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cents(i32);

impl Cents {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i32 {
        self.0
    }

    /// Convert a decimal major-unit amount into cents
    ///
    /// Multiplies by 100 and rounds half away from zero. Returns `None` when
    /// the result does not fit the storage column.
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        cents.to_i32().map(Self)
    }

    /// The amount in major units, e.g. `1550` → `15.50`
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0 as i64, 2)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted invoice row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Validated, storage-ready fields shared by create and update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    pub customer_id: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
}

/// Insert payload: a draft plus the server-assigned creation date
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: String,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl NewInvoice {
    pub fn from_draft(draft: InvoiceDraft, date: NaiveDate) -> Self {
        Self {
            customer_id: draft.customer_id,
            amount: draft.amount,
            status: draft.status,
            date,
        }
    }
}

/// Customer reference data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A row of the invoice list view, enriched with customer details
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceListing {
    pub id: Uuid,
    pub customer_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub amount: Cents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Current calendar date in UTC, the creation date stamped on new invoices
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

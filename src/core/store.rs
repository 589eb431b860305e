//! Invoice storage contract
//!
//! Each method maps to a single statement against the `invoices` table.
//! Mutations report the number of affected rows; a zero count for an
//! unknown id is not an error.

use crate::core::invoice::{Invoice, InvoiceDraft, InvoiceListing, NewInvoice};
use async_trait::async_trait;
use uuid::Uuid;

/// Errors raised by invoice stores
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The referenced customer does not exist
    #[error("customer '{0}' does not exist")]
    UnknownCustomer(String),

    /// In-memory storage lock was poisoned
    #[error("failed to acquire storage lock: {0}")]
    Lock(String),

    /// Database driver failure
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[cfg(feature = "postgres")]
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Storage service for invoices
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice; the store assigns the id
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError>;

    /// Overwrite customer, amount and status of an invoice
    ///
    /// Never touches `id` or `date`.
    async fn update(&self, id: &Uuid, draft: &InvoiceDraft) -> Result<u64, StoreError>;

    /// Delete an invoice
    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError>;

    /// Get an invoice by ID
    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>, StoreError>;

    /// One page (1-based) of invoices matching `query`, newest first
    ///
    /// Matching is a case-insensitive substring test against customer name,
    /// customer email, amount, date and status. An empty query matches all.
    async fn search(
        &self,
        query: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<InvoiceListing>, StoreError>;

    /// Number of invoices matching `query`
    async fn count_matching(&self, query: &str) -> Result<usize, StoreError>;
}

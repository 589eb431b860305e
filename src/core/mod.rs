//! Core module containing the invoice domain, validation, storage contract
//! and view cache

pub mod cache;
pub mod error;
pub mod invoice;
pub mod query;
pub mod store;
pub mod validation;

pub use cache::{Revalidated, ViewCache};
pub use error::{ConfigError, DashboardError, DashboardResult, RequestError};
pub use invoice::{Cents, Customer, Invoice, InvoiceDraft, InvoiceListing, InvoiceStatus, NewInvoice};
pub use query::{InvoicePage, ListQuery, PaginationMeta};
pub use store::{InvoiceStore, StoreError};
pub use validation::{FieldErrors, InvoiceForm, Validation, validate_create, validate_update};

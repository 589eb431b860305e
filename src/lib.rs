//! # invoice-dash
//!
//! Back end of an invoicing dashboard.
//!
//! ## Features
//!
//! - **Form Actions**: create, update and delete invoices from submitted forms,
//!   with per-field validation messages and dollars-to-cents conversion
//! - **Path Revalidation**: every mutation invalidates the cached list view
//!   and redirects back to it
//! - **Live Search**: a debounced search box that rewrites the query string
//!   and performs replace navigation
//! - **Pluggable Storage**: in-memory store for development, PostgreSQL via
//!   sqlx behind the `postgres` feature
//! - **Configuration-Based**: YAML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use invoice_dash::prelude::*;
//!
//! let store = Arc::new(InMemoryInvoiceStore::new());
//! let actions = InvoiceActions::new(store, ViewCache::default(), &AppConfig::default());
//!
//! let outcome = actions
//!     .create(&InvoiceForm::new("cust_1", "15.50", "pending"))
//!     .await;
//! assert_eq!(outcome, ActionOutcome::Redirect("/dashboard/invoices".into()));
//! ```

pub mod actions;
pub mod config;
pub mod core;
pub mod search;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Domain ===
    pub use crate::core::{
        cache::{Revalidated, ViewCache},
        error::{DashboardError, DashboardResult},
        invoice::{Cents, Customer, Invoice, InvoiceDraft, InvoiceListing, InvoiceStatus, NewInvoice},
        query::{InvoicePage, ListQuery, PaginationMeta},
        store::{InvoiceStore, StoreError},
        validation::{FieldErrors, InvoiceForm, Validation, validate_create, validate_update},
    };

    // === Actions ===
    pub use crate::actions::{ActionOutcome, ActionState, InvoiceActions};

    // === Search ===
    pub use crate::search::{
        DebounceState, Debouncer, Navigator, RecordingNavigator, SearchBox, rewrite_query,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryInvoiceStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresInvoiceStore;

    // === Config ===
    pub use crate::config::{AppConfig, UpdateFailurePolicy};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
    pub use uuid::Uuid;
}

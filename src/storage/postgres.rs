//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresInvoiceStore` backed by a PostgreSQL database via
//! `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! invoice-dash = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Tables live in `migrations/` and are applied by [`PostgresInvoiceStore::migrate`]:
//! - `customers(id uuid, name, email)`
//! - `invoices(id uuid, customer_id uuid → customers, amount int, status varchar, date date)`
//!
//! Customer ids travel as text and are cast with `::uuid` in SQL, so a
//! malformed id fails the statement like any other bad reference.

use crate::config::DatabaseConfig;
use crate::core::invoice::{
    Cents, Invoice, InvoiceDraft, InvoiceListing, InvoiceStatus, NewInvoice,
};
use crate::core::store::{InvoiceStore, StoreError};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use uuid::Uuid;

type InvoiceTuple = (Uuid, String, i32, String, NaiveDate);

type ListingTuple = (
    Uuid,
    String,
    Option<String>,
    Option<String>,
    i32,
    String,
    NaiveDate,
);

const LISTING_SELECT: &str = "SELECT invoices.id, invoices.customer_id::text, customers.name, customers.email, \
     invoices.amount, invoices.status, invoices.date \
     FROM invoices LEFT JOIN customers ON invoices.customer_id = customers.id";

const SEARCH_PREDICATE: &str = "customers.name ILIKE $1 OR customers.email ILIKE $1 \
     OR invoices.amount::text ILIKE $1 OR invoices.date::text ILIKE $1 \
     OR invoices.status ILIKE $1";

/// Invoice store backed by PostgreSQL.
///
/// The pool is opened explicitly with [`connect`](Self::connect) at startup
/// and closed with [`close`](Self::close) at shutdown.
///
/// # Example
///
/// ```rust,ignore
/// let store = PostgresInvoiceStore::connect(&config.database).await?;
/// store.migrate().await?;
/// let invoice = store.insert(new_invoice).await?;
/// store.close().await;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresInvoiceStore {
    pool: PgPool,
}

impl PostgresInvoiceStore {
    /// Create a new `PostgresInvoiceStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from configuration
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let url = config.url.as_deref().ok_or_else(|| {
            StoreError::Database(sqlx::Error::Configuration(
                "database.url is not set".into(),
            ))
        })?;
        let mut options = PgConnectOptions::from_str(url)?;
        if config.require_ssl {
            options = options.ssl_mode(PgSslMode::Require);
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?;

        tracing::info!(max_connections = config.max_connections, "connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Apply the bundled migrations (idempotent)
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("closed PostgreSQL pool");
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn status_from_row(raw: &str) -> Result<InvoiceStatus, StoreError> {
        raw.parse().map_err(|e: String| {
            StoreError::Database(sqlx::Error::Decode(e.into()))
        })
    }

    fn row_to_invoice(row: InvoiceTuple) -> Result<Invoice, StoreError> {
        let (id, customer_id, amount, status, date) = row;
        Ok(Invoice {
            id,
            customer_id,
            amount: Cents::new(amount),
            status: Self::status_from_row(&status)?,
            date,
        })
    }

    fn row_to_listing(row: ListingTuple) -> Result<InvoiceListing, StoreError> {
        let (id, customer_id, name, email, amount, status, date) = row;
        Ok(InvoiceListing {
            id,
            customer_id,
            name,
            email,
            amount: Cents::new(amount),
            status: Self::status_from_row(&status)?,
            date,
        })
    }

    fn like_pattern(query: &str) -> String {
        let escaped = query
            .trim()
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }
}

#[async_trait]
impl InvoiceStore for PostgresInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let row = sqlx::query_as::<_, InvoiceTuple>(
            "INSERT INTO invoices (customer_id, amount, status, date) \
             VALUES ($1::uuid, $2, $3, $4) \
             RETURNING id, customer_id::text, amount, status, date",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount.value())
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_invoice(row)
    }

    async fn update(&self, id: &Uuid, draft: &InvoiceDraft) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE invoices \
             SET customer_id = $1::uuid, amount = $2, status = $3 \
             WHERE id = $4",
        )
        .bind(&draft.customer_id)
        .bind(draft.amount.value())
        .bind(draft.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>, StoreError> {
        let row = sqlx::query_as::<_, InvoiceTuple>(
            "SELECT id, customer_id::text, amount, status, date FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_invoice).transpose()
    }

    async fn search(
        &self,
        query: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<InvoiceListing>, StoreError> {
        let offset = page.max(1).saturating_sub(1).saturating_mul(per_page);
        let sql = format!(
            "{} WHERE {} ORDER BY invoices.date DESC, invoices.id LIMIT $2 OFFSET $3",
            LISTING_SELECT, SEARCH_PREDICATE
        );
        let rows = sqlx::query_as::<_, ListingTuple>(&sql)
            .bind(Self::like_pattern(query))
            .bind(i64::try_from(per_page).unwrap_or(i64::MAX))
            .bind(i64::try_from(offset).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(Self::row_to_listing).collect()
    }

    async fn count_matching(&self, query: &str) -> Result<usize, StoreError> {
        let sql = format!(
            "SELECT COUNT(*) FROM invoices LEFT JOIN customers ON invoices.customer_id = customers.id WHERE {}",
            SEARCH_PREDICATE
        );
        let (count,) = sqlx::query_as::<_, (i64,)>(&sql)
            .bind(Self::like_pattern(query))
            .fetch_one(&self.pool)
            .await?;

        Ok(usize::try_from(count).unwrap_or_default())
    }
}

//! List-view query parameters and pagination

use crate::core::invoice::InvoiceListing;
use serde::{Deserialize, Serialize};

/// Query parameters of the invoice list view
///
/// Both parameters are optional and lenient: a missing or malformed `page`
/// falls back to the first page.
///
/// # Example
/// ```text
/// GET /dashboard/invoices
/// GET /dashboard/invoices?query=acme&page=2
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ListQuery {
    /// Free-text search
    pub query: Option<String>,

    /// Page number (starts at 1), kept raw so bad input is not a 400
    pub page: Option<String>,
}

impl ListQuery {
    /// Search text, empty when absent
    pub fn text(&self) -> &str {
        self.query.as_deref().unwrap_or("")
    }

    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1)
            .max(1)
    }

    /// Normalized cache key: identical views share one entry
    pub fn cache_key(&self) -> String {
        format!("query={}&page={}", self.text(), self.page())
    }
}

/// One page of the invoice list view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoicePage {
    /// The invoices on this page
    pub invoices: Vec<InvoiceListing>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of matching items
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata from calculation
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit and page are at least 1 to avoid division by zero
        let limit = limit.max(1);
        let page = page.max(1);
        let total_pages = total.div_ceil(limit);
        // `page` comes straight from the query string and may be huge.
        let start = (page - 1).saturating_mul(limit);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: start.saturating_add(limit) < total,
            has_prev: page > 1,
        }
    }
}

//! In-memory implementation of InvoiceStore for testing and development

use crate::core::invoice::{Customer, Invoice, InvoiceDraft, InvoiceListing, NewInvoice};
use crate::core::store::{InvoiceStore, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    customers: HashMap<String, Customer>,
    invoices: HashMap<Uuid, Invoice>,
}

/// In-memory invoice store
///
/// Uses RwLock for thread-safe access. When customers are registered, the
/// `customer_id` of inserts and updates must reference one of them, the way
/// the foreign key does in the relational schema. With no customers
/// registered any id is accepted.
#[derive(Clone, Default)]
pub struct InMemoryInvoiceStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryInvoiceStore {
    /// Create a new, empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that knows the given customers
    pub fn with_customers(customers: impl IntoIterator<Item = Customer>) -> Self {
        let store = Self::new();
        for customer in customers {
            store.add_customer(customer);
        }
        store
    }

    /// Register a customer
    pub fn add_customer(&self, customer: Customer) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.customers.insert(customer.id.clone(), customer);
    }

    /// Number of stored invoices
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .map(|t| t.invoices.len())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_customer(tables: &Tables, customer_id: &str) -> Result<(), StoreError> {
        if tables.customers.is_empty() || tables.customers.contains_key(customer_id) {
            Ok(())
        } else {
            Err(StoreError::UnknownCustomer(customer_id.to_string()))
        }
    }

    fn listing(tables: &Tables, invoice: &Invoice) -> InvoiceListing {
        let customer = tables.customers.get(&invoice.customer_id);
        InvoiceListing {
            id: invoice.id,
            customer_id: invoice.customer_id.clone(),
            name: customer.map(|c| c.name.clone()),
            email: customer.map(|c| c.email.clone()),
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        }
    }

    fn matches(listing: &InvoiceListing, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let haystacks = [
            listing.name.clone().unwrap_or_default(),
            listing.email.clone().unwrap_or_default(),
            listing.amount.to_string(),
            listing.date.to_string(),
            listing.status.to_string(),
        ];
        haystacks
            .iter()
            .any(|h| h.to_lowercase().contains(needle))
    }

    fn matching(&self, query: &str) -> Result<Vec<InvoiceListing>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        let needle = query.trim().to_lowercase();

        let mut rows: Vec<InvoiceListing> = tables
            .invoices
            .values()
            .map(|invoice| Self::listing(&tables, invoice))
            .filter(|listing| Self::matches(listing, &needle))
            .collect();
        // Newest first; id breaks ties so pages are stable.
        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        Ok(rows)
    }
}

#[async_trait]
impl InvoiceStore for InMemoryInvoiceStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<Invoice, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Self::check_customer(&tables, &invoice.customer_id)?;

        let invoice = Invoice {
            id: Uuid::new_v4(),
            customer_id: invoice.customer_id,
            amount: invoice.amount,
            status: invoice.status,
            date: invoice.date,
        };
        tables.invoices.insert(invoice.id, invoice.clone());
        Ok(invoice)
    }

    async fn update(&self, id: &Uuid, draft: &InvoiceDraft) -> Result<u64, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Self::check_customer(&tables, &draft.customer_id)?;

        match tables.invoices.get_mut(id) {
            Some(invoice) => {
                invoice.customer_id = draft.customer_id.clone();
                invoice.amount = draft.amount;
                invoice.status = draft.status;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<u64, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(tables.invoices.remove(id).map_or(0, |_| 1))
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Invoice>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))?;
        Ok(tables.invoices.get(id).cloned())
    }

    async fn search(
        &self,
        query: &str,
        page: usize,
        per_page: usize,
    ) -> Result<Vec<InvoiceListing>, StoreError> {
        let offset = page.max(1).saturating_sub(1).saturating_mul(per_page);
        Ok(self
            .matching(query)?
            .into_iter()
            .skip(offset)
            .take(per_page)
            .collect())
    }

    async fn count_matching(&self, query: &str) -> Result<usize, StoreError> {
        Ok(self.matching(query)?.len())
    }
}

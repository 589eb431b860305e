//! Macro-generated test suite for `InvoiceStore` contract validation.
//!
//! The `invoice_store_tests!` macro generates a test module that validates
//! any `InvoiceStore` implementation: single-row mutations with affected-row
//! counts, lookups, search across customer and invoice columns, pagination
//! and concurrent access.
//!
//! # Generated Tests
//!
//! ## Mutations
//! - `test_insert_and_get`: insert assigns an id, get returns the row
//! - `test_get_nonexistent`: get with random UUID returns None
//! - `test_insert_unknown_customer`: the customer reference is enforced
//! - `test_update_existing`: customer, amount and status change, date does not
//! - `test_update_nonexistent`: zero rows, not an error
//! - `test_delete_existing`: one row, then gone
//! - `test_delete_nonexistent`: zero rows, not an error
//!
//! ## Search
//! - `test_search_empty_query_returns_all_newest_first`
//! - `test_search_customer_name_case_insensitive`
//! - `test_search_email_status_and_amount`
//! - `test_search_wildcards_are_literal`
//! - `test_search_pagination`
//!
//! ## Concurrency
//! - `test_concurrent_inserts`: parallel inserts from spawned tasks
//!
//! `$factory` is re-evaluated for each test and must yield a store that knows
//! `sample_customers()` and holds no invoices. It must be `Clone + 'static`.
#[macro_export]
macro_rules! invoice_store_tests {
    ($factory:expr) => {
        mod invoice_store_contract_tests {
            use super::*;
            use invoice_dash::core::invoice::{Cents, InvoiceDraft, InvoiceStatus};
            use invoice_dash::core::store::InvoiceStore;
            use uuid::Uuid;

            // ==================================================================
            // Mutations
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_get() {
                let store = $factory;
                let created = store
                    .insert(new_invoice(ACME_ID, 1550, InvoiceStatus::Pending, day(3)))
                    .await
                    .unwrap();

                assert_eq!(created.customer_id, ACME_ID);
                assert_eq!(created.amount, Cents::new(1550));
                assert_eq!(created.status, InvoiceStatus::Pending);
                assert_eq!(created.date, day(3));

                let fetched = store.get(&created.id).await.unwrap();
                assert_eq!(fetched, Some(created));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                assert!(store.get(&Uuid::new_v4()).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_insert_unknown_customer() {
                let store = $factory;
                let result = store
                    .insert(new_invoice(UNKNOWN_CUSTOMER_ID, 100, InvoiceStatus::Paid, day(1)))
                    .await;
                assert!(result.is_err());
                assert_count(&store.search("", 1, 10).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let store = $factory;
                let created = store
                    .insert(new_invoice(ACME_ID, 1550, InvoiceStatus::Pending, day(3)))
                    .await
                    .unwrap();

                let draft = InvoiceDraft {
                    customer_id: GLOBEX_ID.to_string(),
                    amount: Cents::new(20000),
                    status: InvoiceStatus::Paid,
                };
                assert_eq!(store.update(&created.id, &draft).await.unwrap(), 1);

                let updated = store.get(&created.id).await.unwrap().unwrap();
                assert_eq!(updated.id, created.id);
                assert_eq!(updated.customer_id, GLOBEX_ID);
                assert_eq!(updated.amount, Cents::new(20000));
                assert_eq!(updated.status, InvoiceStatus::Paid);
                assert_eq!(updated.date, day(3));
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let draft = InvoiceDraft {
                    customer_id: ACME_ID.to_string(),
                    amount: Cents::new(100),
                    status: InvoiceStatus::Paid,
                };
                assert_eq!(store.update(&Uuid::new_v4(), &draft).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let ids = insert_batch(&store, 2).await;

                assert_eq!(store.delete(&ids[0]).await.unwrap(), 1);
                assert!(store.get(&ids[0]).await.unwrap().is_none());
                assert!(store.get(&ids[1]).await.unwrap().is_some());
                assert_eq!(store.delete(&ids[0]).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert_eq!(store.delete(&Uuid::new_v4()).await.unwrap(), 0);
            }

            // ==================================================================
            // Search
            // ==================================================================

            #[tokio::test]
            async fn test_search_empty_query_returns_all_newest_first() {
                let store = $factory;
                insert_batch(&store, 3).await;

                let rows = store.search("", 1, 10).await.unwrap();
                let dates: Vec<_> = rows.iter().map(|r| r.date).collect();
                assert_eq!(dates, vec![day(3), day(2), day(1)]);
                assert_eq!(rows[0].name.as_deref(), Some("Acme Corp"));
                assert_eq!(rows[0].email.as_deref(), Some("billing@acme.test"));
                assert_eq!(store.count_matching("").await.unwrap(), 3);
            }

            #[tokio::test]
            async fn test_search_customer_name_case_insensitive() {
                let store = $factory;
                insert_batch(&store, 2).await;
                store
                    .insert(new_invoice(GLOBEX_ID, 999, InvoiceStatus::Paid, day(9)))
                    .await
                    .unwrap();

                let rows = store.search("gLoBeX", 1, 10).await.unwrap();
                assert_count(&rows, 1);
                assert_eq!(rows[0].customer_id, GLOBEX_ID);
                assert_eq!(store.count_matching("acme").await.unwrap(), 2);
                assert_eq!(store.count_matching("initech").await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_search_email_status_and_amount() {
                let store = $factory;
                store
                    .insert(new_invoice(ACME_ID, 1550, InvoiceStatus::Pending, day(1)))
                    .await
                    .unwrap();
                store
                    .insert(new_invoice(GLOBEX_ID, 73, InvoiceStatus::Paid, day(2)))
                    .await
                    .unwrap();

                assert_eq!(store.count_matching("@globex").await.unwrap(), 1);
                assert_eq!(store.count_matching("paid").await.unwrap(), 1);
                assert_eq!(store.count_matching("1550").await.unwrap(), 1);
                assert_eq!(store.count_matching("2024-05-02").await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_search_wildcards_are_literal() {
                let store = $factory;
                insert_batch(&store, 2).await;

                assert_eq!(store.count_matching("%").await.unwrap(), 0);
                assert_eq!(store.count_matching("_").await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_search_pagination() {
                let store = $factory;
                insert_batch(&store, 8).await;

                let first = store.search("", 1, 6).await.unwrap();
                let second = store.search("", 2, 6).await.unwrap();
                let third = store.search("", 3, 6).await.unwrap();
                assert_count(&first, 6);
                assert_count(&second, 2);
                assert_count(&third, 0);

                assert_eq!(first[0].date, day(8));
                assert_eq!(second[1].date, day(1));
                assert_eq!(store.count_matching("").await.unwrap(), 8);
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;
                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .insert(new_invoice(ACME_ID, 100 + i, InvoiceStatus::Pending, day(1)))
                            .await
                            .unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_eq!(store.count_matching("").await.unwrap(), 10);
            }
        }
    };
}

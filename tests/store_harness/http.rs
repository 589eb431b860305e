//! HTTP integration test macro for invoice stores.
//!
//! The `http_integration_tests!` macro generates tests that drive a store
//! through the full HTTP surface:
//! form body → handler → `InvoiceActions` → `InvoiceStore` → response.
//!
//! ```text
//! axum_test::TestServer
//!     └─ Router (built by ServerBuilder)
//!         ├─ GET  /dashboard/invoices?query=&page=   → list_invoices
//!         ├─ POST /dashboard/invoices                → create_invoice
//!         ├─ GET  /dashboard/invoices/{id}           → get_invoice
//!         ├─ POST /dashboard/invoices/{id}/edit      → update_invoice
//!         └─ POST /dashboard/invoices/{id}/delete    → delete_invoice
//! ```
//!
//! # Generated Tests
//!
//! - `test_http_create_redirects_and_lists`: 303, then the row shows up
//! - `test_http_create_invalid_returns_field_errors`: 422 with messages
//! - `test_http_update_round_trip`: 303, amount converted to cents
//! - `test_http_update_unknown_customer_reports_failure`: 500 with message
//! - `test_http_delete_returns_no_content`: 204, then 404
//! - `test_http_list_pagination`: six per page, `total_pages`
//! - `test_http_list_huge_page`: the largest page number is an empty page
//! - `test_http_list_search`: `query` filters rows
//! - `test_http_invalid_id`: 400 with `INVALID_ID`
//! - `test_http_non_form_body`: 400 with `INVALID_BODY`
#[macro_export]
macro_rules! http_integration_tests {
    ($factory:expr) => {
        mod http_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use invoice_dash::actions::{CREATE_INVALID, UPDATE_FAILED};
            use invoice_dash::core::store::InvoiceStore;
            use invoice_dash::core::validation::form::{AMOUNT_NOT_POSITIVE, CUSTOMER_REQUIRED};
            use invoice_dash::server::ServerBuilder;
            use serde_json::Value;
            use std::sync::Arc;

            const LIST: &str = "/dashboard/invoices";

            async fn make_server() -> (TestServer, Arc<dyn InvoiceStore>) {
                let store: Arc<dyn InvoiceStore> = Arc::new($factory);
                let router = ServerBuilder::new()
                    .with_shared_store(store.clone())
                    .build()
                    .unwrap();
                (TestServer::new(router).unwrap(), store)
            }

            async fn first_id(server: &TestServer) -> String {
                let body: Value = server.get(LIST).await.json();
                body["invoices"][0]["id"].as_str().unwrap().to_string()
            }

            #[tokio::test]
            async fn test_http_create_redirects_and_lists() {
                let (server, _store) = make_server().await;

                let response = server
                    .post(LIST)
                    .form(&valid_form(ACME_ID, "15.50", "pending"))
                    .await;
                response.assert_status(StatusCode::SEE_OTHER);
                assert_eq!(response.header("location"), LIST);

                let body: Value = server.get(LIST).await.json();
                assert_eq!(body["pagination"]["total"], 1);
                assert_eq!(body["invoices"][0]["amount"], 1550);
                assert_eq!(body["invoices"][0]["status"], "pending");
                assert_eq!(body["invoices"][0]["name"], "Acme Corp");
            }

            #[tokio::test]
            async fn test_http_create_invalid_returns_field_errors() {
                let (server, store) = make_server().await;

                let response = server
                    .post(LIST)
                    .form(&valid_form("", "0", "pending"))
                    .await;
                response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

                let body: Value = response.json();
                assert_eq!(body["message"], CREATE_INVALID);
                assert_eq!(body["errors"]["customerId"][0], CUSTOMER_REQUIRED);
                assert_eq!(body["errors"]["amount"][0], AMOUNT_NOT_POSITIVE);
                assert!(body["errors"].get("status").is_none());
                assert_eq!(store.count_matching("").await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_http_update_round_trip() {
                let (server, _store) = make_server().await;
                server
                    .post(LIST)
                    .form(&valid_form(ACME_ID, "15.50", "pending"))
                    .await;
                let id = first_id(&server).await;

                let response = server
                    .post(&format!("{}/{}/edit", LIST, id))
                    .form(&valid_form(GLOBEX_ID, "200", "paid"))
                    .await;
                response.assert_status(StatusCode::SEE_OTHER);

                let invoice: Value = server.get(&format!("{}/{}", LIST, id)).await.json();
                assert_eq!(invoice["customer_id"], GLOBEX_ID);
                assert_eq!(invoice["amount"], 20000);
                assert_eq!(invoice["status"], "paid");
            }

            #[tokio::test]
            async fn test_http_update_unknown_customer_reports_failure() {
                let (server, _store) = make_server().await;
                server
                    .post(LIST)
                    .form(&valid_form(ACME_ID, "15.50", "pending"))
                    .await;
                let id = first_id(&server).await;

                let response = server
                    .post(&format!("{}/{}/edit", LIST, id))
                    .form(&valid_form(UNKNOWN_CUSTOMER_ID, "20", "paid"))
                    .await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                let body: Value = response.json();
                assert_eq!(body["message"], UPDATE_FAILED);

                let invoice: Value = server.get(&format!("{}/{}", LIST, id)).await.json();
                assert_eq!(invoice["customer_id"], ACME_ID);
            }

            #[tokio::test]
            async fn test_http_delete_returns_no_content() {
                let (server, _store) = make_server().await;
                server
                    .post(LIST)
                    .form(&valid_form(ACME_ID, "15.50", "pending"))
                    .await;
                let id = first_id(&server).await;

                server
                    .post(&format!("{}/{}/delete", LIST, id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
                server
                    .get(&format!("{}/{}", LIST, id))
                    .await
                    .assert_status(StatusCode::NOT_FOUND);

                // Unknown ids are not an error either.
                server
                    .post(&format!("{}/{}/delete", LIST, id))
                    .await
                    .assert_status(StatusCode::NO_CONTENT);
            }

            #[tokio::test]
            async fn test_http_list_pagination() {
                let (server, store) = make_server().await;
                insert_batch(store.as_ref(), 8).await;

                let first: Value = server.get(LIST).await.json();
                assert_eq!(first["invoices"].as_array().unwrap().len(), 6);
                assert_eq!(first["pagination"]["total_pages"], 2);
                assert_eq!(first["pagination"]["has_next"], true);

                let second: Value = server.get(LIST).add_query_param("page", 2).await.json();
                assert_eq!(second["invoices"].as_array().unwrap().len(), 2);
                assert_eq!(second["pagination"]["page"], 2);

                // A malformed page falls back to the first one.
                let fallback: Value = server.get(LIST).add_query_param("page", "x").await.json();
                assert_eq!(fallback["pagination"]["page"], 1);
            }

            #[tokio::test]
            async fn test_http_list_huge_page() {
                let (server, store) = make_server().await;
                insert_batch(store.as_ref(), 2).await;

                let response = server
                    .get(LIST)
                    .add_query_param("page", usize::MAX.to_string())
                    .await;
                response.assert_status_ok();

                let body: Value = response.json();
                assert_eq!(body["invoices"].as_array().unwrap().len(), 0);
                assert_eq!(body["pagination"]["total"], 2);
                assert_eq!(body["pagination"]["has_next"], false);
                assert_eq!(body["pagination"]["has_prev"], true);
            }

            #[tokio::test]
            async fn test_http_list_search() {
                let (server, _store) = make_server().await;
                server
                    .post(LIST)
                    .form(&valid_form(ACME_ID, "15.50", "pending"))
                    .await;
                server
                    .post(LIST)
                    .form(&valid_form(GLOBEX_ID, "7", "paid"))
                    .await;

                let body: Value = server
                    .get(LIST)
                    .add_query_param("query", "globex")
                    .add_query_param("page", 1)
                    .await
                    .json();
                assert_eq!(body["pagination"]["total"], 1);
                assert_eq!(body["invoices"][0]["customer_id"], GLOBEX_ID);
            }

            #[tokio::test]
            async fn test_http_invalid_id() {
                let (server, _store) = make_server().await;

                let response = server.get(&format!("{}/not-a-uuid", LIST)).await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_ID");

                server
                    .post(&format!("{}/not-a-uuid/delete", LIST))
                    .await
                    .assert_status(StatusCode::BAD_REQUEST);
            }

            #[tokio::test]
            async fn test_http_non_form_body() {
                let (server, _store) = make_server().await;

                let response = server.post(LIST).text("customerId=x").await;
                response.assert_status(StatusCode::BAD_REQUEST);
                let body: Value = response.json();
                assert_eq!(body["code"], "INVALID_BODY");
            }
        }
    };
}

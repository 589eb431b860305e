//! HTTP handlers for the invoice dashboard
//!
//! Handlers are thin: they parse the request, call into [`InvoiceActions`]
//! or the store, and let [`ActionOutcome`] / [`DashboardError`] pick the
//! status code.

use axum::{
    Form, Json,
    extract::{Path, Query, State, rejection::FormRejection},
    http::StatusCode,
};
use serde_json::{Value, json};
use std::sync::Arc;
use uuid::Uuid;

use crate::actions::{ActionOutcome, InvoiceActions};
use crate::core::error::{DashboardError, DashboardResult, RequestError};
use crate::core::invoice::Invoice;
use crate::core::query::{InvoicePage, ListQuery, PaginationMeta};
use crate::core::validation::InvoiceForm;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub actions: Arc<InvoiceActions>,
    pub items_per_page: usize,
}

fn parse_id(raw: &str) -> Result<Uuid, RequestError> {
    Uuid::parse_str(raw).map_err(|_| RequestError::InvalidId {
        value: raw.to_string(),
    })
}

fn form_body(form: Result<Form<InvoiceForm>, FormRejection>) -> Result<InvoiceForm, RequestError> {
    form.map(|Form(form)| form)
        .map_err(|rejection| RequestError::InvalidBody {
            message: rejection.body_text(),
        })
}

/// GET {list_path}?query=&page=
pub async fn list_invoices(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> DashboardResult<Json<Value>> {
    let actions = &state.actions;
    let path = actions.list_path();
    let cache = actions.cache();
    let key = params.cache_key();

    if let Some(view) = cache.get(path, &key) {
        tracing::debug!(path, key = %key, "list view served from cache");
        return Ok(Json(view));
    }

    // Captured before reading so a concurrent revalidation wins.
    let generation = cache.generation(path);
    let page = params.page();
    let total = actions.store().count_matching(params.text()).await?;
    let invoices = actions
        .store()
        .search(params.text(), page, state.items_per_page)
        .await?;

    let view = serde_json::to_value(InvoicePage {
        invoices,
        pagination: PaginationMeta::new(page, state.items_per_page, total),
    })
    .map_err(|e| DashboardError::Internal(e.to_string()))?;

    cache.put(path, &key, view.clone(), generation);
    Ok(Json(view))
}

/// GET {list_path}/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DashboardResult<Json<Invoice>> {
    let id = parse_id(&id)?;
    match state.actions.store().get(&id).await? {
        Some(invoice) => Ok(Json(invoice)),
        None => Err(RequestError::NotFound {
            resource: "invoice".to_string(),
            id: id.to_string(),
        }
        .into()),
    }
}

/// POST {list_path}
pub async fn create_invoice(
    State(state): State<AppState>,
    form: Result<Form<InvoiceForm>, FormRejection>,
) -> DashboardResult<ActionOutcome> {
    let form = form_body(form)?;
    Ok(state.actions.create(&form).await)
}

/// POST {list_path}/{id}/edit
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<InvoiceForm>, FormRejection>,
) -> DashboardResult<ActionOutcome> {
    let id = parse_id(&id)?;
    let form = form_body(form)?;
    Ok(state.actions.update(&id, &form).await)
}

/// POST {list_path}/{id}/delete
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> DashboardResult<StatusCode> {
    let id = parse_id(&id)?;
    state.actions.delete(&id).await;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /health
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "invoice-dash"
    }))
}

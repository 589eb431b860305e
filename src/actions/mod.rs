//! Invoice mutation actions
//!
//! Each action validates the submitted form, issues exactly one statement
//! against the [`InvoiceStore`], revalidates the cached list view and tells
//! the caller where to navigate next.
//!
//! Failure handling differs per action:
//!
//! | action | invalid form | store failure |
//! |--------|--------------|---------------|
//! | create | `Invalid`, no write | logged, then revalidate + redirect |
//! | update | `Invalid`, no write | per [`UpdateFailurePolicy`] |
//! | delete | n/a | logged, always revalidate |

use crate::config::{AppConfig, UpdateFailurePolicy};
use crate::core::cache::ViewCache;
use crate::core::invoice::{self, NewInvoice};
use crate::core::store::InvoiceStore;
use crate::core::validation::{FieldErrors, InvoiceForm, Validation, validate_create, validate_update};
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub const CREATE_INVALID: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_INVALID: &str = "Missing Fields. Failed to Update Invoice.";
pub const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";

/// State handed back to the form after an action
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionState {
    /// Summary message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Per-field messages
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
}

impl ActionState {
    fn invalid(errors: FieldErrors, message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            errors,
        }
    }

    fn failed(message: &str) -> Self {
        Self {
            message: Some(message.to_string()),
            errors: FieldErrors::new(),
        }
    }
}

/// Result of a create or update action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Navigate to this path; nothing else is reported
    Redirect(String),

    /// The form did not validate; nothing was written
    Invalid(ActionState),

    /// The store rejected a valid write
    Failed(ActionState),
}

impl ActionOutcome {
    pub fn is_redirect(&self) -> bool {
        matches!(self, ActionOutcome::Redirect(_))
    }

    /// The action state, for outcomes that carry one
    pub fn state(&self) -> Option<&ActionState> {
        match self {
            ActionOutcome::Redirect(_) => None,
            ActionOutcome::Invalid(state) | ActionOutcome::Failed(state) => Some(state),
        }
    }
}

impl IntoResponse for ActionOutcome {
    fn into_response(self) -> Response {
        match self {
            // 303 so the browser follows up with a GET of the list view
            ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
            ActionOutcome::Invalid(state) => {
                (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
            }
            ActionOutcome::Failed(state) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
            }
        }
    }
}

/// The create/update/delete actions over one store
///
/// Everything is injected: the store (and through it the database pool),
/// the view cache to revalidate, and the list path to redirect to.
#[derive(Clone)]
pub struct InvoiceActions {
    store: Arc<dyn InvoiceStore>,
    cache: ViewCache,
    list_path: String,
    update_failure: UpdateFailurePolicy,
    today: fn() -> NaiveDate,
}

impl InvoiceActions {
    pub fn new(store: Arc<dyn InvoiceStore>, cache: ViewCache, config: &AppConfig) -> Self {
        Self {
            store,
            cache,
            list_path: config.dashboard.list_path.clone(),
            update_failure: config.actions.update_failure,
            today: invoice::today,
        }
    }

    /// Replace the clock that stamps creation dates
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn list_path(&self) -> &str {
        &self.list_path
    }

    pub fn store(&self) -> &Arc<dyn InvoiceStore> {
        &self.store
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    /// Create an invoice from a submitted form
    ///
    /// A store failure after validation is logged and otherwise ignored:
    /// the caller is redirected exactly as on success.
    pub async fn create(&self, form: &InvoiceForm) -> ActionOutcome {
        let draft = match validate_create(form) {
            Validation::Valid(draft) => draft,
            Validation::Invalid(errors) => {
                tracing::debug!(fields = ?errors.fields().collect::<Vec<_>>(), "create rejected");
                return ActionOutcome::Invalid(ActionState::invalid(errors, CREATE_INVALID));
            }
        };

        let new_invoice = NewInvoice::from_draft(draft, (self.today)());
        match self.store.insert(new_invoice).await {
            Ok(invoice) => {
                tracing::info!(id = %invoice.id, amount = %invoice.amount, "invoice created");
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to create invoice");
            }
        }

        self.revalidate_and_redirect()
    }

    /// Update customer, amount and status of an invoice
    pub async fn update(&self, id: &Uuid, form: &InvoiceForm) -> ActionOutcome {
        let draft = match validate_update(form) {
            Validation::Valid(draft) => draft,
            Validation::Invalid(errors) => {
                tracing::debug!(%id, fields = ?errors.fields().collect::<Vec<_>>(), "update rejected");
                return ActionOutcome::Invalid(ActionState::invalid(errors, UPDATE_INVALID));
            }
        };

        match self.store.update(id, &draft).await {
            Ok(0) => tracing::warn!(%id, "update matched no invoice"),
            Ok(_) => tracing::info!(%id, amount = %draft.amount, "invoice updated"),
            Err(e) => {
                tracing::error!(%id, error = %e, "failed to update invoice");
                if self.update_failure == UpdateFailurePolicy::Report {
                    return ActionOutcome::Failed(ActionState::failed(UPDATE_FAILED));
                }
            }
        }

        self.revalidate_and_redirect()
    }

    /// Delete an invoice
    ///
    /// Reports nothing: an unknown id and a failed statement both end with
    /// the list view revalidated.
    pub async fn delete(&self, id: &Uuid) {
        match self.store.delete(id).await {
            Ok(0) => tracing::warn!(%id, "delete matched no invoice"),
            Ok(_) => tracing::info!(%id, "invoice deleted"),
            Err(e) => tracing::error!(%id, error = %e, "failed to delete invoice"),
        }

        self.cache.revalidate_path(&self.list_path);
    }

    fn revalidate_and_redirect(&self) -> ActionOutcome {
        self.cache.revalidate_path(&self.list_path);
        ActionOutcome::Redirect(self.list_path.clone())
    }
}

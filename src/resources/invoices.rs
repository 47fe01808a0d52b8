//! Invoice resource
//!
//! Routes:
//! - `GET    /invoices`       `{id, comp_code}` for every invoice
//! - `GET    /invoices/{id}`  one invoice with its company nested
//! - `POST   /invoices`       create, 201
//! - `PUT    /invoices/{id}`  change the amount
//! - `DELETE /invoices/{id}`  delete, always acknowledged
//!
//! Ids stay strings all the way down; the store does the integer cast.

use super::{DeletedResponse, JsonBody};
use crate::core::{
    BizResult, EntityError, EntityKind, Invoice, InvoiceChanges, InvoiceDetail, InvoiceSummary,
    NewInvoice, Store,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

/// `{"invoices": [...]}`
#[derive(Debug, Serialize)]
pub struct InvoiceListResponse {
    pub invoices: Vec<InvoiceSummary>,
}

/// `{"invoice": {...}}`
#[derive(Debug, Serialize)]
pub struct InvoiceResponse<T> {
    pub invoice: T,
}

/// Operations over the `invoices` table
#[derive(Clone)]
pub struct InvoiceResource {
    store: Arc<dyn Store>,
}

impl InvoiceResource {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> BizResult<Vec<InvoiceSummary>> {
        Ok(self.store.list_invoices().await?)
    }

    /// Fetch an invoice and nest its company in place of `comp_code`.
    ///
    /// Two independent reads; a company removed between them leaves
    /// `company` empty.
    pub async fn fetch_by_id(&self, id: &str) -> BizResult<InvoiceDetail> {
        let invoice = self
            .store
            .get_invoice(id)
            .await?
            .ok_or_else(|| EntityError::not_found(EntityKind::Invoice, id))?;

        let company = self.store.get_company(&invoice.comp_code).await?;
        tracing::debug!(id, comp_code = %invoice.comp_code, "fetched invoice");

        Ok(InvoiceDetail::compose(invoice, company))
    }

    pub async fn create(&self, invoice: NewInvoice) -> BizResult<Invoice> {
        let created = self.store.insert_invoice(invoice).await?;
        tracing::debug!(id = created.id, comp_code = %created.comp_code, "created invoice");
        Ok(created)
    }

    pub async fn update(&self, id: &str, changes: InvoiceChanges) -> BizResult<Invoice> {
        let updated = self
            .store
            .update_invoice_amount(id, changes)
            .await?
            .ok_or_else(|| EntityError::not_updated(EntityKind::Invoice, id))?;
        tracing::debug!(id, amt = updated.amt, "updated invoice");
        Ok(updated)
    }

    /// Delete by id. Succeeds whether or not a row matched.
    pub async fn delete(&self, id: &str) -> BizResult<()> {
        let affected = self.store.delete_invoice(id).await?;
        tracing::debug!(id, affected, "deleted invoice");
        Ok(())
    }
}

async fn list_invoices(
    State(resource): State<InvoiceResource>,
) -> BizResult<Json<InvoiceListResponse>> {
    let invoices = resource.list().await?;
    Ok(Json(InvoiceListResponse { invoices }))
}

async fn get_invoice(
    State(resource): State<InvoiceResource>,
    Path(id): Path<String>,
) -> BizResult<Json<InvoiceResponse<InvoiceDetail>>> {
    let invoice = resource.fetch_by_id(&id).await?;
    Ok(Json(InvoiceResponse { invoice }))
}

async fn create_invoice(
    State(resource): State<InvoiceResource>,
    JsonBody(body): JsonBody<NewInvoice>,
) -> BizResult<(StatusCode, Json<InvoiceResponse<Invoice>>)> {
    let invoice = resource.create(body).await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse { invoice })))
}

async fn update_invoice(
    State(resource): State<InvoiceResource>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<InvoiceChanges>,
) -> BizResult<Json<InvoiceResponse<Invoice>>> {
    let invoice = resource.update(&id, body).await?;
    Ok(Json(InvoiceResponse { invoice }))
}

async fn delete_invoice(
    State(resource): State<InvoiceResource>,
    Path(id): Path<String>,
) -> BizResult<Json<DeletedResponse>> {
    resource.delete(&id).await?;
    Ok(Json(DeletedResponse::new()))
}

/// Build the `/invoices` routes
pub fn routes(resource: InvoiceResource) -> Router {
    Router::new()
        .route("/invoices", get(list_invoices).post(create_invoice))
        .route(
            "/invoices/{id}",
            get(get_invoice).put(update_invoice).delete(delete_invoice),
        )
        .with_state(resource)
}

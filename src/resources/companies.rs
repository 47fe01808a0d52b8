//! Company resource
//!
//! Routes:
//! - `GET    /companies`         list every company
//! - `GET    /companies/{code}`  one company plus its first invoice
//! - `POST   /companies`         create, 201
//! - `PUT    /companies/{code}`  replace name and description
//! - `DELETE /companies/{code}`  delete, always acknowledged

use super::{DeletedResponse, JsonBody};
use crate::core::{
    BizResult, Company, CompanyChanges, CompanyDetail, EntityError, EntityKind, NewCompany,
    Store,
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use std::sync::Arc;

/// `{"companies": [...]}`
#[derive(Debug, Serialize)]
pub struct CompanyListResponse {
    pub companies: Vec<Company>,
}

/// `{"company": {...}}`
#[derive(Debug, Serialize)]
pub struct CompanyResponse<T> {
    pub company: T,
}

/// Operations over the `companies` table
#[derive(Clone)]
pub struct CompanyResource {
    store: Arc<dyn Store>,
}

impl CompanyResource {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> BizResult<Vec<Company>> {
        Ok(self.store.list_companies().await?)
    }

    /// Fetch a company and attach the first of its invoices.
    ///
    /// The two reads are separate statements with no transaction around
    /// them; an invoice deleted in between simply does not show up.
    pub async fn fetch_by_code(&self, code: &str) -> BizResult<CompanyDetail> {
        let company = self
            .store
            .get_company(code)
            .await?
            .ok_or_else(|| EntityError::not_found(EntityKind::Company, code))?;

        let invoices = self.store.find_invoices_by_company(code).await?;
        tracing::debug!(code, invoices = invoices.len(), "fetched company");

        Ok(CompanyDetail::compose(company, invoices))
    }

    pub async fn create(&self, company: NewCompany) -> BizResult<Company> {
        let created = self.store.insert_company(company).await?;
        tracing::debug!(code = %created.code, "created company");
        Ok(created)
    }

    pub async fn update(&self, code: &str, changes: CompanyChanges) -> BizResult<Company> {
        let updated = self
            .store
            .update_company(code, changes)
            .await?
            .ok_or_else(|| EntityError::not_updated(EntityKind::Company, code))?;
        tracing::debug!(code, "updated company");
        Ok(updated)
    }

    /// Delete by code. Succeeds whether or not a row matched.
    pub async fn delete(&self, code: &str) -> BizResult<()> {
        let affected = self.store.delete_company(code).await?;
        tracing::debug!(code, affected, "deleted company");
        Ok(())
    }
}

async fn list_companies(
    State(resource): State<CompanyResource>,
) -> BizResult<Json<CompanyListResponse>> {
    let companies = resource.list().await?;
    Ok(Json(CompanyListResponse { companies }))
}

async fn get_company(
    State(resource): State<CompanyResource>,
    Path(code): Path<String>,
) -> BizResult<Json<CompanyResponse<CompanyDetail>>> {
    let company = resource.fetch_by_code(&code).await?;
    Ok(Json(CompanyResponse { company }))
}

async fn create_company(
    State(resource): State<CompanyResource>,
    JsonBody(body): JsonBody<NewCompany>,
) -> BizResult<(StatusCode, Json<CompanyResponse<Company>>)> {
    let company = resource.create(body).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

async fn update_company(
    State(resource): State<CompanyResource>,
    Path(code): Path<String>,
    JsonBody(body): JsonBody<CompanyChanges>,
) -> BizResult<Json<CompanyResponse<Company>>> {
    let company = resource.update(&code, body).await?;
    Ok(Json(CompanyResponse { company }))
}

async fn delete_company(
    State(resource): State<CompanyResource>,
    Path(code): Path<String>,
) -> BizResult<Json<DeletedResponse>> {
    resource.delete(&code).await?;
    Ok(Json(DeletedResponse::new()))
}

/// Build the `/companies` routes
pub fn routes(resource: CompanyResource) -> Router {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route(
            "/companies/{code}",
            get(get_company).put(update_company).delete(delete_company),
        )
        .with_state(resource)
}

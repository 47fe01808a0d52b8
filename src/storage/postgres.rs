//! PostgreSQL store using sqlx.
//!
//! Provides [`PostgresStore`], backed by a `sqlx::PgPool` that is created once
//! at startup and shared by both resources.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag:
//! ```toml
//! [dependencies]
//! biztime = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! # Schema
//!
//! Tables are created by the migrations in `migrations/`, embedded with
//! `sqlx::migrate!` and applied by [`PostgresStore::migrate`].
//!
//! Invoice ids and body fields are bound as text and cast inside the
//! statement, so a non-numeric id or amount fails in the database rather than
//! in the handler.

use crate::core::model::{
    Company, CompanyChanges, Invoice, InvoiceChanges, InvoiceSummary, NewCompany, NewInvoice,
    bind_text,
};
use crate::core::store::{CompanyStore, InvoiceStore, StoreResult};
use crate::core::StorageError;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

const BACKEND: &str = "PostgreSQL";

const INVOICE_COLUMNS: &str = "id, comp_code, amt, paid, add_date, paid_date";

/// Store backed by PostgreSQL.
///
/// # Example
///
/// ```rust,ignore
/// let store = PostgresStore::connect("postgresql:///biztime", 5).await?;
/// store.migrate().await?;
/// let companies = store.list_companies().await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a `PostgresStore` with an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `url`.
    pub async fn connect(url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(|e| StorageError::Connection {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;
        tracing::info!(max_connections, "connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Apply the embedded migrations (idempotent).
    pub async fn migrate(&self) -> StoreResult<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Migration {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })
    }

    /// Close every pooled connection; call once the server has stopped.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

#[async_trait]
impl CompanyStore for PostgresStore {
    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        let rows = sqlx::query_as::<_, Company>("SELECT code, name, description FROM companies")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_company(&self, code: &str) -> StoreResult<Option<Company>> {
        let row = sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_company(&self, company: NewCompany) -> StoreResult<Company> {
        let row = sqlx::query_as::<_, Company>(
            "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3)
             RETURNING code, name, description",
        )
        .bind(bind_text(&company.code))
        .bind(bind_text(&company.name))
        .bind(bind_text(&company.description))
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> StoreResult<Option<Company>> {
        let row = sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $1, description = $2 WHERE code = $3
             RETURNING code, name, description",
        )
        .bind(bind_text(&changes.name))
        .bind(bind_text(&changes.description))
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn delete_company(&self, code: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[async_trait]
impl InvoiceStore for PostgresStore {
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceSummary>> {
        let rows = sqlx::query_as::<_, InvoiceSummary>("SELECT id, comp_code FROM invoices")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_invoice(&self, id: &str) -> StoreResult<Option<Invoice>> {
        let sql = format!(
            "SELECT {INVOICE_COLUMNS} FROM invoices WHERE id = CAST($1::TEXT AS INTEGER)"
        );
        let row = sqlx::query_as::<_, Invoice>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_invoices_by_company(&self, code: &str) -> StoreResult<Vec<Invoice>> {
        let sql = format!("SELECT {INVOICE_COLUMNS} FROM invoices WHERE comp_code = $1");
        let rows = sqlx::query_as::<_, Invoice>(&sql)
            .bind(code)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> StoreResult<Invoice> {
        let sql = format!(
            "INSERT INTO invoices (comp_code, amt)
             VALUES ($1, CAST($2::TEXT AS DOUBLE PRECISION))
             RETURNING {INVOICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Invoice>(&sql)
            .bind(bind_text(&invoice.comp_code))
            .bind(bind_text(&invoice.amt))
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn update_invoice_amount(
        &self,
        id: &str,
        changes: InvoiceChanges,
    ) -> StoreResult<Option<Invoice>> {
        let sql = format!(
            "UPDATE invoices SET amt = CAST($1::TEXT AS DOUBLE PRECISION)
             WHERE id = CAST($2::TEXT AS INTEGER)
             RETURNING {INVOICE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Invoice>(&sql)
            .bind(bind_text(&changes.amt))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_invoice(&self, id: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = CAST($1::TEXT AS INTEGER)")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

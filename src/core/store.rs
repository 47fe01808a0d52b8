//! Store traits: the statement-level seam between resources and the database
//!
//! Each method corresponds to exactly one parameterized statement. Keys are
//! passed as the raw strings taken from the URL; converting an invoice id to
//! an integer is the store's job, and a failed conversion is a store error.
//! Body fields arrive as [`BodyValue`](crate::core::BodyValue)s and are
//! converted to the column type the same way.

use crate::core::error::StorageError;
use crate::core::model::{
    Company, CompanyChanges, Invoice, InvoiceChanges, InvoiceSummary, NewCompany, NewInvoice,
};
use async_trait::async_trait;

/// Result type returned by every store call
pub type StoreResult<T> = Result<T, StorageError>;

/// Statements against the `companies` table
#[async_trait]
pub trait CompanyStore: Send + Sync {
    /// `SELECT code, name, description FROM companies`
    async fn list_companies(&self) -> StoreResult<Vec<Company>>;

    /// Lookup by primary key
    async fn get_company(&self, code: &str) -> StoreResult<Option<Company>>;

    /// Insert and return the canonical row
    async fn insert_company(&self, company: NewCompany) -> StoreResult<Company>;

    /// Update name and description; `None` when no row has this code
    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> StoreResult<Option<Company>>;

    /// Delete by code, returning the number of rows removed
    async fn delete_company(&self, code: &str) -> StoreResult<u64>;
}

/// Statements against the `invoices` table
#[async_trait]
pub trait InvoiceStore: Send + Sync {
    /// `SELECT id, comp_code FROM invoices`
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceSummary>>;

    /// Lookup by primary key
    async fn get_invoice(&self, id: &str) -> StoreResult<Option<Invoice>>;

    /// All invoices whose `comp_code` equals `code`
    async fn find_invoices_by_company(&self, code: &str) -> StoreResult<Vec<Invoice>>;

    /// Insert with column defaults and return the full row
    async fn insert_invoice(&self, invoice: NewInvoice) -> StoreResult<Invoice>;

    /// Set `amt`; `None` when no row has this id
    async fn update_invoice_amount(
        &self,
        id: &str,
        changes: InvoiceChanges,
    ) -> StoreResult<Option<Invoice>>;

    /// Delete by id, returning the number of rows removed
    async fn delete_invoice(&self, id: &str) -> StoreResult<u64>;
}

/// A backend able to serve both resources
///
/// One handle is created at startup and shared by every request.
pub trait Store: CompanyStore + InvoiceStore {}

impl<T: CompanyStore + InvoiceStore> Store for T {}

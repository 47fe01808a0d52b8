//! In-memory store for testing and development
//!
//! Behaves like the PostgreSQL schema in `migrations/`: primary keys, the
//! unique company name, NOT NULL columns, the positive-amount check, the
//! foreign key from invoices to companies with `ON DELETE CASCADE`, and
//! serial invoice ids that are never reused. Rows list in insertion order.
//! Body fields are converted to the column type from their text form, as
//! PostgreSQL does with untyped parameters.

use crate::core::model::{
    Company, CompanyChanges, Invoice, InvoiceChanges, InvoiceSummary, NewCompany, NewInvoice,
    bind_text,
};
use crate::core::store::{CompanyStore, InvoiceStore, StoreResult};
use crate::core::StorageError;
use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BACKEND: &str = "in-memory";

#[derive(Debug, Default)]
struct Tables {
    companies: IndexMap<String, Company>,
    invoices: IndexMap<i32, Invoice>,
    last_invoice_id: i32,
}

impl Tables {
    fn name_taken(&self, name: &str, except_code: Option<&str>) -> bool {
        self.companies
            .values()
            .any(|c| c.name == name && Some(c.code.as_str()) != except_code)
    }
}

/// In-memory store implementation
///
/// Uses RwLock for thread-safe access. Cloning shares the same tables.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire read lock: {e}")))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StorageError::query(BACKEND, format!("Failed to acquire write lock: {e}")))
    }
}

fn required<T>(value: Option<T>, table: &str, column: &str) -> StoreResult<T> {
    value.ok_or_else(|| {
        StorageError::constraint(
            BACKEND,
            format!(
                "null value in column \"{column}\" of relation \"{table}\" violates not-null constraint"
            ),
        )
    })
}

/// Float cast applied to `amt`
fn parse_amount(text: &str) -> StoreResult<f64> {
    text.trim().parse::<f64>().map_err(|_| {
        StorageError::query(
            BACKEND,
            format!("invalid input syntax for type double precision: \"{text}\""),
        )
    })
}

fn check_amount(amt: f64) -> StoreResult<f64> {
    if amt > 0.0 {
        Ok(amt)
    } else {
        Err(StorageError::constraint(
            BACKEND,
            "new row for relation \"invoices\" violates check constraint \"invoices_amt_check\"",
        ))
    }
}

/// Integer cast applied to invoice ids taken from the URL
fn parse_id(id: &str) -> StoreResult<i32> {
    id.trim().parse::<i32>().map_err(|_| {
        StorageError::query(
            BACKEND,
            format!("invalid input syntax for type integer: \"{id}\""),
        )
    })
}

fn duplicate_key(constraint: &str) -> StorageError {
    StorageError::constraint(
        BACKEND,
        format!("duplicate key value violates unique constraint \"{constraint}\""),
    )
}

#[async_trait]
impl CompanyStore for InMemoryStore {
    async fn list_companies(&self) -> StoreResult<Vec<Company>> {
        Ok(self.read()?.companies.values().cloned().collect())
    }

    async fn get_company(&self, code: &str) -> StoreResult<Option<Company>> {
        Ok(self.read()?.companies.get(code).cloned())
    }

    async fn insert_company(&self, company: NewCompany) -> StoreResult<Company> {
        let code = required(bind_text(&company.code), "companies", "code")?;
        let name = required(bind_text(&company.name), "companies", "name")?;

        let mut tables = self.write()?;
        if tables.companies.contains_key(&code) {
            return Err(duplicate_key("companies_pkey"));
        }
        if tables.name_taken(&name, None) {
            return Err(duplicate_key("companies_name_key"));
        }

        let row = Company {
            code: code.clone(),
            name,
            description: bind_text(&company.description),
        };
        tables.companies.insert(code, row.clone());
        Ok(row)
    }

    async fn update_company(
        &self,
        code: &str,
        changes: CompanyChanges,
    ) -> StoreResult<Option<Company>> {
        let mut tables = self.write()?;
        if !tables.companies.contains_key(code) {
            return Ok(None);
        }

        let name = required(bind_text(&changes.name), "companies", "name")?;
        if tables.name_taken(&name, Some(code)) {
            return Err(duplicate_key("companies_name_key"));
        }

        let Some(row) = tables.companies.get_mut(code) else {
            return Ok(None);
        };
        row.name = name;
        row.description = bind_text(&changes.description);
        Ok(Some(row.clone()))
    }

    async fn delete_company(&self, code: &str) -> StoreResult<u64> {
        let mut tables = self.write()?;
        if tables.companies.shift_remove(code).is_none() {
            return Ok(0);
        }
        tables.invoices.retain(|_, invoice| invoice.comp_code != code);
        Ok(1)
    }
}

#[async_trait]
impl InvoiceStore for InMemoryStore {
    async fn list_invoices(&self) -> StoreResult<Vec<InvoiceSummary>> {
        Ok(self
            .read()?
            .invoices
            .values()
            .map(InvoiceSummary::from)
            .collect())
    }

    async fn get_invoice(&self, id: &str) -> StoreResult<Option<Invoice>> {
        let id = parse_id(id)?;
        Ok(self.read()?.invoices.get(&id).cloned())
    }

    async fn find_invoices_by_company(&self, code: &str) -> StoreResult<Vec<Invoice>> {
        Ok(self
            .read()?
            .invoices
            .values()
            .filter(|invoice| invoice.comp_code == code)
            .cloned()
            .collect())
    }

    async fn insert_invoice(&self, invoice: NewInvoice) -> StoreResult<Invoice> {
        let amt = bind_text(&invoice.amt).as_deref().map(parse_amount).transpose()?;
        let comp_code = required(bind_text(&invoice.comp_code), "invoices", "comp_code")?;
        let amt = check_amount(required(amt, "invoices", "amt")?)?;

        let mut tables = self.write()?;
        if !tables.companies.contains_key(&comp_code) {
            return Err(StorageError::constraint(
                BACKEND,
                "insert or update on table \"invoices\" violates foreign key constraint \"invoices_comp_code_fkey\"",
            ));
        }

        tables.last_invoice_id += 1;
        let row = Invoice {
            id: tables.last_invoice_id,
            comp_code,
            amt,
            paid: false,
            add_date: Utc::now().date_naive(),
            paid_date: None,
        };
        tables.invoices.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_invoice_amount(
        &self,
        id: &str,
        changes: InvoiceChanges,
    ) -> StoreResult<Option<Invoice>> {
        let id = parse_id(id)?;
        let amt = bind_text(&changes.amt).as_deref().map(parse_amount).transpose()?;
        let mut tables = self.write()?;
        let Some(row) = tables.invoices.get_mut(&id) else {
            return Ok(None);
        };

        row.amt = check_amount(required(amt, "invoices", "amt")?)?;
        Ok(Some(row.clone()))
    }

    async fn delete_invoice(&self, id: &str) -> StoreResult<u64> {
        let id = parse_id(id)?;
        let removed = self.write()?.invoices.shift_remove(&id);
        Ok(u64::from(removed.is_some()))
    }
}

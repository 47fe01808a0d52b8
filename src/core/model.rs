//! Rows, request bodies and composed views for companies and invoices
//!
//! Row types mirror the `companies` and `invoices` tables column for column.
//! Request bodies keep every field optional and loosely typed: nothing is
//! validated before the store sees it, so an absent field reaches the store
//! as `NULL` and the column type and constraints decide what is acceptable.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row of the `companies` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// A row of the `invoices` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
}

/// Projection used by the invoice list: key and owning company only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

impl From<&Invoice> for InvoiceSummary {
    fn from(invoice: &Invoice) -> Self {
        Self {
            id: invoice.id,
            comp_code: invoice.comp_code.clone(),
        }
    }
}

/// A request body field exactly as the client sent it
///
/// Any JSON value is accepted. Stores bind it as text and leave the
/// conversion to the column, so `"1000"` and `1000` both fill a float column
/// and `123` fills a text one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyValue(pub Value);

impl BodyValue {
    /// Parameter text: strings unquoted, anything else as JSON
    pub fn to_text(&self) -> String {
        match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for BodyValue {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<f64> for BodyValue {
    fn from(value: f64) -> Self {
        Self(Value::from(value))
    }
}

/// Text bound for an optional field; `None` binds `NULL`
pub fn bind_text(field: &Option<BodyValue>) -> Option<String> {
    field.as_ref().map(BodyValue::to_text)
}

/// Body of `POST /companies`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCompany {
    pub code: Option<BodyValue>,
    pub name: Option<BodyValue>,
    pub description: Option<BodyValue>,
}

/// Body of `PUT /companies/{code}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyChanges {
    pub name: Option<BodyValue>,
    pub description: Option<BodyValue>,
}

/// Body of `POST /invoices`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewInvoice {
    pub comp_code: Option<BodyValue>,
    pub amt: Option<BodyValue>,
}

/// Body of `PUT /invoices/{id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceChanges {
    pub amt: Option<BodyValue>,
}

/// A company together with one of its invoices
///
/// Only the first invoice row the store returns is attached. A company with
/// several invoices shows just that one; a company with none has no
/// `invoices` key at all.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompanyDetail {
    #[serde(flatten)]
    pub company: Company,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoices: Option<Invoice>,
}

impl CompanyDetail {
    /// Attach the first of `invoices` to `company`
    pub fn compose(company: Company, invoices: Vec<Invoice>) -> Self {
        Self {
            company,
            invoices: invoices.into_iter().next(),
        }
    }
}

/// An invoice with its owning company nested in place of `comp_code`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: NaiveDate,
    pub paid_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<Company>,
}

impl InvoiceDetail {
    pub fn compose(invoice: Invoice, company: Option<Company>) -> Self {
        Self {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }
    }
}

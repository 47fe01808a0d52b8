//! Core module containing the data model, store traits and error types

pub mod error;
pub mod model;
pub mod store;

pub use error::{BizError, BizResult, EntityError, EntityKind, StorageError};
pub use model::{
    BodyValue, Company, CompanyChanges, CompanyDetail, Invoice, InvoiceChanges, InvoiceDetail,
    InvoiceSummary, NewCompany, NewInvoice,
};
pub use store::{CompanyStore, InvoiceStore, Store, StoreResult};

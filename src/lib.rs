//! # Biztime
//!
//! A small REST service over two related entities, companies and invoices,
//! backed by a relational store.
//!
//! ## Features
//!
//! - **Two resources**: `/companies` and `/invoices`, each with list, fetch,
//!   create, update and delete
//! - **Joined reads**: a company comes back with its first invoice, an invoice
//!   with its company nested in place of `comp_code`
//! - **Pluggable stores**: an in-memory store for tests and development, and
//!   PostgreSQL behind the `postgres` feature
//! - **Typed errors**: one error channel mapped to status codes at the HTTP
//!   boundary
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use biztime::prelude::*;
//!
//! let app = ServerBuilder::new()
//!     .with_store(InMemoryStore::new())
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod resources;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        BizError, BizResult, BodyValue, Company, CompanyChanges, CompanyDetail, CompanyStore,
        EntityError, EntityKind, Invoice, InvoiceChanges, InvoiceDetail, InvoiceStore,
        InvoiceSummary, NewCompany, NewInvoice, StorageError, Store, StoreResult,
        error::{ConfigError, RequestError},
    };

    // === Resources ===
    pub use crate::resources::{CompanyResource, DELETED_MSG, InvoiceResource};

    // === Storage ===
    pub use crate::storage::InMemoryStore;
    #[cfg(feature = "postgres")]
    pub use crate::storage::PostgresStore;

    // === Config ===
    pub use crate::config::{DatabaseConfig, ServerConfig, StorageBackend};

    // === Server ===
    pub use crate::server::ServerBuilder;
}

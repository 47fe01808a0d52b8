//! Resource components: one per entity, each owning its operations,
//! axum handlers and route table.
//!
//! The two resources never call each other. Both hold the same shared
//! [`Store`](crate::core::Store) handle and keep no state between requests.

pub mod companies;
pub mod invoices;

pub use companies::CompanyResource;
pub use invoices::InvoiceResource;

use axum::{
    body::Bytes,
    extract::{FromRequest, Request, rejection::BytesRejection},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Acknowledgement returned by every delete
pub const DELETED_MSG: &str = "DELETED!";

/// Body of a delete response: `{"msg": "DELETED!"}`
#[derive(Debug, Serialize)]
pub struct DeletedResponse {
    pub msg: &'static str,
}

impl DeletedResponse {
    pub fn new() -> Self {
        Self { msg: DELETED_MSG }
    }
}

impl Default for DeletedResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Lenient JSON body extractor
///
/// The body is read whatever its content type. Anything that is not a JSON
/// object, including an empty body, is treated as `{}`, so every write
/// reaches the store and the schema has the last word.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default,
{
    type Rejection = BytesRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await?;
        Ok(JsonBody(parse_body(&bytes)))
    }
}

fn parse_body<T: DeserializeOwned + Default>(bytes: &[u8]) -> T {
    match serde_json::from_slice::<Value>(bytes) {
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
        _ => T::default(),
    }
}

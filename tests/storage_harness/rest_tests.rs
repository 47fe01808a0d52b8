//! REST integration test macro for store backends.
//!
//! The `rest_integration_tests!` macro builds the real router over the given
//! store and drives it with `axum_test::TestServer`:
//! JSON → HTTP request → resource → store → HTTP response → JSON.
//!
//! # Generated Tests
//!
//! ## Invoices (samsung scenario)
//! - `test_list_invoices`: only `id` and `comp_code` are exposed
//! - `test_get_invoice`: 200 with the company nested
//! - `test_get_invoice_not_found`: `/invoices/0` → 404
//! - `test_create_invoice`: 201 with the stored amount
//! - `test_created_invoice_round_trip`: POST then GET the new id
//! - `test_create_invoice_with_string_amount`: the store casts `"1000"`
//! - `test_create_invoice_unknown_company`: store error → 500
//! - `test_update_invoice` / `test_update_invoice_not_found`
//! - `test_update_invoice_with_string_amount`
//! - `test_update_unknown_invoice_without_body`: still 404
//! - `test_delete_invoice` / `test_delete_unknown_invoice_still_acknowledged`
//!
//! ## Companies
//! - `test_list_companies`, `test_get_company`, `test_get_company_not_found`
//! - `test_create_company_round_trip`, `test_create_duplicate_company`
//! - `test_create_company_with_numeric_code`
//! - `test_update_company`, `test_update_company_not_found`
//! - `test_delete_company`
//!
//! ## Errors
//! - `test_non_json_body_reaches_store`, `test_unknown_route_is_json_404`

/// Generate a REST integration test suite for a store backend.
///
/// `$factory` must produce an `impl Store + 'static`.
#[macro_export]
macro_rules! rest_integration_tests {
    ($factory:expr) => {
        mod rest_integration_tests {
            use super::*;
            use axum::http::StatusCode;
            use axum_test::TestServer;
            use biztime::server::ServerBuilder;
            use serde_json::{Value, json};

            /// Server over a store seeded with samsung and one invoice; returns
            /// the invoice id.
            async fn seeded_server() -> (TestServer, i32) {
                let store = $factory;
                let (_, invoice) = storage_harness::seed_samsung(&store).await;
                let router = ServerBuilder::new().with_store(store).build().unwrap();
                (TestServer::try_new(router).unwrap(), invoice.id)
            }

            async fn empty_server() -> TestServer {
                let store = $factory;
                let router = ServerBuilder::new().with_store(store).build().unwrap();
                TestServer::try_new(router).unwrap()
            }

            // ==============================================================
            // Invoices
            // ==============================================================

            #[tokio::test]
            async fn test_list_invoices() {
                let (server, id) = seeded_server().await;

                let response = server.get("/invoices").await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(
                    body,
                    json!({ "invoices": [{ "id": id, "comp_code": "samsung" }] })
                );
            }

            #[tokio::test]
            async fn test_get_invoice() {
                let (server, id) = seeded_server().await;

                let response = server.get(&format!("/invoices/{}", id)).await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                let invoice = &body["invoice"];
                assert_eq!(invoice["id"], id);
                assert_eq!(invoice["amt"], 1000.0);
                assert_eq!(invoice["paid"], false);
                assert_eq!(invoice["company"]["code"], "samsung");
                assert_eq!(invoice["company"]["name"], "Samsung Mobiles");
                assert!(invoice.get("comp_code").is_none());
            }

            #[tokio::test]
            async fn test_get_invoice_not_found() {
                let (server, _) = seeded_server().await;

                let response = server.get("/invoices/0").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["error"]["message"], "Can't find invoice with id of 0");
                assert_eq!(body["error"]["status"], 404);
            }

            #[tokio::test]
            async fn test_non_numeric_invoice_id_is_server_error() {
                let (server, _) = seeded_server().await;

                let response = server.get("/invoices/abc").await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            }

            #[tokio::test]
            async fn test_create_invoice() {
                let (server, _) = seeded_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "samsung", "amt": 1000 }))
                    .await;
                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["invoice"]["amt"], 1000.0);
                assert_eq!(body["invoice"]["comp_code"], "samsung");
                assert_eq!(body["invoice"]["paid"], false);
                assert!(body["invoice"]["id"].as_i64().is_some());
                assert!(body["invoice"]["add_date"].as_str().is_some());
                assert_eq!(body["invoice"]["paid_date"], Value::Null);
            }

            #[tokio::test]
            async fn test_created_invoice_round_trip() {
                let (server, _) = seeded_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "samsung", "amt": 250.5 }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let created: Value = response.json();
                let created = &created["invoice"];
                let id = created["id"].as_i64().unwrap();

                let response = server.get(&format!("/invoices/{}", id)).await;
                response.assert_status(StatusCode::OK);
                let fetched: Value = response.json();
                let fetched = &fetched["invoice"];

                assert_eq!(fetched["id"], created["id"]);
                assert_eq!(fetched["amt"], created["amt"]);
                assert_eq!(fetched["amt"], 250.5);
                assert_eq!(fetched["paid"], created["paid"]);
                assert_eq!(fetched["add_date"], created["add_date"]);
                assert_eq!(fetched["paid_date"], created["paid_date"]);
                assert_eq!(fetched["company"]["code"], created["comp_code"]);
                assert_eq!(fetched["company"]["name"], "Samsung Mobiles");
            }

            #[tokio::test]
            async fn test_create_invoice_with_string_amount() {
                let (server, _) = seeded_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "samsung", "amt": "1000" }))
                    .await;
                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(body["invoice"]["amt"], 1000.0);
                assert_eq!(body["invoice"]["comp_code"], "samsung");
            }

            #[tokio::test]
            async fn test_create_invoice_unknown_company() {
                let (server, _) = seeded_server().await;

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "ibm", "amt": 10 }))
                    .await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

                let body: Value = response.json();
                assert_eq!(body["error"]["code"], "STORAGE_ERROR");
            }

            #[tokio::test]
            async fn test_update_invoice() {
                let (server, id) = seeded_server().await;

                let response = server
                    .put(&format!("/invoices/{}", id))
                    .json(&json!({ "amt": 10000 }))
                    .await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["invoice"]["amt"], 10000.0);
                assert_eq!(body["invoice"]["id"], id);
                assert_eq!(body["invoice"]["comp_code"], "samsung");
            }

            #[tokio::test]
            async fn test_update_invoice_not_found() {
                let (server, _) = seeded_server().await;

                let response = server
                    .put("/invoices/0")
                    .json(&json!({ "amt": 1000000 }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(
                    body["error"]["message"],
                    "Can't update invoice with id of 0"
                );
            }

            #[tokio::test]
            async fn test_update_invoice_with_string_amount() {
                let (server, id) = seeded_server().await;

                let response = server
                    .put(&format!("/invoices/{}", id))
                    .json(&json!({ "amt": "500" }))
                    .await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["invoice"]["amt"], 500.0);
            }

            #[tokio::test]
            async fn test_update_unknown_invoice_without_body() {
                let (server, _) = seeded_server().await;

                let response = server.put("/invoices/0").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(
                    body["error"]["message"],
                    "Can't update invoice with id of 0"
                );
            }

            #[tokio::test]
            async fn test_delete_invoice() {
                let (server, id) = seeded_server().await;

                let response = server.delete(&format!("/invoices/{}", id)).await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body, json!({ "msg": "DELETED!" }));

                let response = server.get(&format!("/invoices/{}", id)).await;
                response.assert_status(StatusCode::NOT_FOUND);
            }

            #[tokio::test]
            async fn test_delete_unknown_invoice_still_acknowledged() {
                let (server, _) = seeded_server().await;

                let response = server.delete("/invoices/0").await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["msg"], "DELETED!");
            }

            // ==============================================================
            // Companies
            // ==============================================================

            #[tokio::test]
            async fn test_list_companies() {
                let (server, _) = seeded_server().await;

                let response = server.get("/companies").await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(
                    body,
                    json!({ "companies": [{
                        "code": "samsung",
                        "name": "Samsung Mobiles",
                        "description": "they make phones"
                    }] })
                );
            }

            #[tokio::test]
            async fn test_list_companies_empty() {
                let server = empty_server().await;

                let response = server.get("/companies").await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body, json!({ "companies": [] }));
            }

            #[tokio::test]
            async fn test_get_company() {
                let (server, id) = seeded_server().await;

                let response = server.get("/companies/samsung").await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["company"]["code"], "samsung");
                assert_eq!(body["company"]["invoices"]["id"], id);
                assert_eq!(body["company"]["invoices"]["comp_code"], "samsung");
            }

            #[tokio::test]
            async fn test_get_company_not_found() {
                let (server, _) = seeded_server().await;

                let response = server.get("/companies/ibm").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(
                    body["error"]["message"],
                    "Can't find company with code of ibm"
                );
            }

            #[tokio::test]
            async fn test_create_company_round_trip() {
                let server = empty_server().await;

                let response = server
                    .post("/companies")
                    .json(&json!({
                        "code": "apple",
                        "name": "Apple Computer",
                        "description": "Maker of OSX."
                    }))
                    .await;
                response.assert_status(StatusCode::CREATED);
                let created: Value = response.json();
                assert_eq!(
                    created,
                    json!({ "company": {
                        "code": "apple",
                        "name": "Apple Computer",
                        "description": "Maker of OSX."
                    } })
                );

                let response = server.get("/companies/apple").await;
                response.assert_status(StatusCode::OK);
                let fetched: Value = response.json();
                assert_eq!(fetched["company"]["name"], "Apple Computer");
                assert_eq!(fetched["company"]["description"], "Maker of OSX.");
                assert!(fetched["company"].get("invoices").is_none());
            }

            #[tokio::test]
            async fn test_create_duplicate_company() {
                let (server, _) = seeded_server().await;

                let response = server
                    .post("/companies")
                    .json(&json!({ "code": "samsung", "name": "Other", "description": "" }))
                    .await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            }

            #[tokio::test]
            async fn test_create_company_with_numeric_code() {
                let server = empty_server().await;

                let response = server
                    .post("/companies")
                    .json(&json!({ "code": 123, "name": "Num" }))
                    .await;
                response.assert_status(StatusCode::CREATED);

                let body: Value = response.json();
                assert_eq!(
                    body,
                    json!({ "company": { "code": "123", "name": "Num", "description": null } })
                );

                let response = server.get("/companies/123").await;
                response.assert_status(StatusCode::OK);
            }

            #[tokio::test]
            async fn test_create_company_without_name() {
                let server = empty_server().await;

                let response = server
                    .post("/companies")
                    .json(&json!({ "code": "apple" }))
                    .await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            }

            #[tokio::test]
            async fn test_update_company() {
                let (server, _) = seeded_server().await;

                let response = server
                    .put("/companies/samsung")
                    .json(&json!({ "name": "Samsung", "description": "phones and TVs" }))
                    .await;
                response.assert_status(StatusCode::OK);

                let body: Value = response.json();
                assert_eq!(body["company"]["code"], "samsung");
                assert_eq!(body["company"]["name"], "Samsung");
                assert_eq!(body["company"]["description"], "phones and TVs");
            }

            #[tokio::test]
            async fn test_update_company_not_found() {
                let (server, _) = seeded_server().await;

                let response = server
                    .put("/companies/ibm")
                    .json(&json!({ "name": "IBM", "description": "Big blue." }))
                    .await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(
                    body["error"]["message"],
                    "Can't update company with code of ibm"
                );
            }

            #[tokio::test]
            async fn test_delete_company() {
                let (server, _) = seeded_server().await;

                let response = server.delete("/companies/samsung").await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body, json!({ "msg": "DELETED!" }));

                let response = server.get("/companies").await;
                let body: Value = response.json();
                assert_eq!(body, json!({ "companies": [] }));

                let response = server.delete("/companies/samsung").await;
                response.assert_status(StatusCode::OK);
            }

            // ==============================================================
            // Errors
            // ==============================================================

            #[tokio::test]
            async fn test_non_json_body_reaches_store() {
                let (server, _) = seeded_server().await;

                let response = server.post("/companies").text("not json").await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                let body: Value = response.json();
                assert_eq!(body["error"]["code"], "STORAGE_ERROR");

                let response = server
                    .post("/invoices")
                    .json(&json!({ "comp_code": "samsung", "amt": "lots" }))
                    .await;
                response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
                let body: Value = response.json();
                assert_eq!(body["error"]["code"], "STORAGE_ERROR");
            }

            #[tokio::test]
            async fn test_unknown_route_is_json_404() {
                let server = empty_server().await;

                let response = server.get("/nowhere").await;
                response.assert_status(StatusCode::NOT_FOUND);

                let body: Value = response.json();
                assert_eq!(body["error"]["message"], "Not Found");
                assert_eq!(body["error"]["code"], "ROUTE_NOT_FOUND");
            }

            #[tokio::test]
            async fn test_health() {
                let server = empty_server().await;

                let response = server.get("/health").await;
                response.assert_status(StatusCode::OK);
                let body: Value = response.json();
                assert_eq!(body["status"], "ok");
            }
        }
    };
}

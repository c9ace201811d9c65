//! Service catalog integration tests.

mod common;

use common::{assert_money, TestApp};
use serde_json::{json, Value};

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn create_and_list_services() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/services",
            &json!({"name": "Hair Spa", "cost": "899.50", "category": "Hair", "description": ""}),
        )
        .await;
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["name"], "Hair Spa");
    assert_money(&created["cost"], 899.5);

    app.seed_service("Beard Trim", 150.0).await;

    let services: Value = app.get("/services").await.json().await.unwrap();
    let services = services.as_array().unwrap();
    assert_eq!(services.len(), 2);
    assert_eq!(services[0]["name"], "Beard Trim");
    assert_eq!(services[1]["category"], "Hair");
    assert!(services[1]["description"].is_null());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn missing_fields_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/services", &json!({"name": "No Price"})).await;
    assert_eq!(response.status(), 400);

    let response = app.post_json("/services", &json!({"cost": 100})).await;
    assert_eq!(response.status(), 400);

    assert_eq!(app.count_rows("services").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn duplicate_name_conflicts() {
    let app = TestApp::spawn().await;
    app.seed_service("Threading", 60.0).await;

    let response = app
        .post_json("/services", &json!({"name": "Threading", "cost": 80}))
        .await;
    assert_eq!(response.status(), 409);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn update_and_delete_unknown_service_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app
        .put_json("/services/424242", &json!({"name": "Ghost", "cost": 1}))
        .await;
    assert_eq!(response.status(), 404);

    let response = app.delete("/services/424242").await;
    assert_eq!(response.status(), 404);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn update_then_delete_service() {
    let app = TestApp::spawn().await;
    let id = app.seed_service("Pedicure", 400.0).await;

    let response = app
        .put_json(
            &format!("/services/{id}"),
            &json!({"name": "Spa Pedicure", "cost": 550, "category": "Nails"}),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Service updated successfully");

    let services: Value = app.get("/services").await.json().await.unwrap();
    assert_eq!(services[0]["name"], "Spa Pedicure");
    assert_money(&services[0]["cost"], 550.0);

    let response = app.delete(&format!("/services/{id}")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(app.count_rows("services").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn billed_service_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let id = app.seed_service("Haircut", 100.0).await;
    app.create_bill(&json!({"items": [{"service_id": id, "price_at_sale": 100}]}))
        .await;

    let response = app.delete(&format!("/services/{id}")).await;
    assert_eq!(response.status(), 409);
    assert_eq!(app.count_rows("services").await, 1);
    assert_eq!(app.count_rows("bill_items").await, 1);

    app.cleanup().await;
}

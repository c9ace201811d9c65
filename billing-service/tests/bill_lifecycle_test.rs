//! Bill create / read / edit integration tests.

mod common;

use common::{assert_money, TestApp};
use serde_json::{json, Value};

fn reference_bill(service_id: i64, payment: Option<Value>) -> Value {
    let mut body = json!({
        "customer": {"name": "Asha Rao", "phone": "9845000000"},
        "items": [
            {"service_id": service_id, "quantity": 2, "price_at_sale": 100, "discount_percent": 10}
        ],
        "gst_rate": 18
    });
    if let Some(payment) = payment {
        body["initialPayment"] = payment;
    }
    body
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn create_bill_without_payment_is_unpaid() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Haircut", 100.0).await;

    let response = app.post_json("/bills", &reference_bill(service_id, None)).await;
    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Bill created successfully");
    assert_eq!(body["status"], "UNPAID");
    assert_money(&body["total_amount"], 212.4);
    let bill_id = body["bill_id"].as_i64().unwrap();

    let detail: Value = app.get(&format!("/bills/{bill_id}")).await.json().await.unwrap();
    assert_eq!(detail["status"], "UNPAID");
    assert_eq!(detail["customer_name"], "Asha Rao");
    assert_money(&detail["amount_paid"], 0.0);
    assert_money(&detail["pending_amount"], 212.4);
    assert_money(&detail["gst_percent"], 18.0);
    assert_money(&detail["totals"]["sub_total"], 200.0);
    assert_money(&detail["totals"]["total_discount"], 20.0);
    assert_money(&detail["totals"]["total_after_discount"], 180.0);
    assert_money(&detail["totals"]["gst_amount"], 32.4);
    assert_money(&detail["totals"]["grand_total"], 212.4);

    let items = detail["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["name"], "Haircut");
    assert_eq!(items[0]["quantity"], 2);
    assert_money(&items[0]["discount_value"], 20.0);
    assert!(detail["payments"].as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn full_payment_marks_bill_paid() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Facial", 100.0).await;

    let bill_id = app
        .create_bill(&reference_bill(
            service_id,
            Some(json!({"amount": 212.4, "type": "UPI", "notes": "paid at counter"})),
        ))
        .await;

    let detail: Value = app.get(&format!("/bills/{bill_id}")).await.json().await.unwrap();
    assert_eq!(detail["status"], "PAID");
    assert_money(&detail["amount_paid"], 212.4);
    assert_money(&detail["pending_amount"], 0.0);

    let payments = detail["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["payment_type"], "UPI");

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn partial_payment_leaves_pending_balance() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Massage", 100.0).await;

    let bill_id = app
        .create_bill(&reference_bill(service_id, Some(json!({"amount": 200, "type": "Cash"}))))
        .await;

    let bills: Value = app.get("/bills").await.json().await.unwrap();
    let bill = bills
        .as_array()
        .unwrap()
        .iter()
        .find(|b| b["id"] == bill_id)
        .expect("bill listed");
    assert_eq!(bill["status"], "UNPAID");
    assert_money(&bill["amount_paid"], 200.0);
    assert_money(&bill["pending_amount"], 12.4);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn listing_unpaid_bills_reports_full_pending() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Manicure", 100.0).await;
    app.create_bill(&reference_bill(service_id, None)).await;

    let mut other = reference_bill(service_id, None);
    other["customer"]["name"] = json!("Ravi Kumar");
    app.create_bill(&other).await;

    let bills: Value = app.get("/bills").await.json().await.unwrap();
    let bills = bills.as_array().unwrap();
    assert_eq!(bills.len(), 2);
    for bill in bills {
        assert_money(&bill["amount_paid"], 0.0);
        assert_eq!(number_of(&bill["pending_amount"]), number_of(&bill["total_amount"]));
    }
    // Newest first
    assert_eq!(bills[0]["customer_name"], "Ravi Kumar");

    let filtered: Value = app.get("/bills?search=ravi").await.json().await.unwrap();
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0]["customer_name"], "Ravi Kumar");

    let wildcard: Value = app.get("/bills?search=%25").await.json().await.unwrap();
    assert!(wildcard.as_array().unwrap().is_empty());

    app.cleanup().await;
}

fn number_of(value: &Value) -> String {
    format!("{:.2}", common::number(value))
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn edit_replaces_items_and_recomputes_total() {
    let app = TestApp::spawn().await;
    let haircut = app.seed_service("Haircut", 100.0).await;
    let shave = app.seed_service("Shave", 50.0).await;

    let bill_id = app
        .create_bill(&json!({
            "customer": {"name": "Asha Rao"},
            "items": [
                {"service_id": haircut, "quantity": 1, "price_at_sale": 100},
                {"service_id": shave, "quantity": 1, "price_at_sale": 50}
            ],
            "gst_rate": 0,
            "initialPayment": {"amount": 20, "type": "Cash"}
        }))
        .await;
    assert_eq!(app.count_rows("bill_items").await, 2);

    let response = app
        .put_json(
            &format!("/bills/{bill_id}"),
            &json!({
                "customer": {"name": "Asha Rao"},
                "items": [{"service_id": shave, "quantity": 1, "price_at_sale": 50}],
                "gst_rate": 0
            }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Bill updated successfully");
    assert_eq!(body["bill_id"], bill_id);

    let detail: Value = app.get(&format!("/bills/{bill_id}")).await.json().await.unwrap();
    let items = detail["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["service_id"], shave);
    assert_money(&detail["total_amount"], 50.0);
    // No new payment on the edit, so the earlier one is kept
    assert_money(&detail["amount_paid"], 20.0);
    assert_eq!(app.count_rows("bill_items").await, 1);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn edit_with_payment_replaces_payment_history() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Haircut", 100.0).await;

    let bill_id = app
        .create_bill(&reference_bill(service_id, Some(json!({"amount": 50, "type": "Cash"}))))
        .await;

    let response = app
        .put_json(
            &format!("/bills/{bill_id}"),
            &reference_bill(service_id, Some(json!({"amount": 212.4, "type": "Card"}))),
        )
        .await;
    assert_eq!(response.status(), 200);

    let detail: Value = app.get(&format!("/bills/{bill_id}")).await.json().await.unwrap();
    assert_eq!(detail["status"], "PAID");
    let payments = detail["payments"].as_array().unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0]["payment_type"], "Card");
    assert_money(&detail["pending_amount"], 0.0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn empty_items_write_nothing() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/bills",
            &json!({"customer": {"name": "Nobody"}, "items": [], "gst_rate": 18,
                    "initialPayment": {"amount": 100}}),
        )
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Bill must include at least one item.");

    assert_eq!(app.count_rows("bills").await, 0);
    assert_eq!(app.count_rows("bill_items").await, 0);
    assert_eq!(app.count_rows("payments").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn failed_item_insert_rolls_back_header() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Haircut", 100.0).await;

    // Second item references a service that does not exist, so the insert
    // fails after the header row has been written.
    let response = app
        .post_json(
            "/bills",
            &json!({
                "items": [
                    {"service_id": service_id, "price_at_sale": 100},
                    {"service_id": service_id + 1000, "price_at_sale": 10}
                ],
                "gst_rate": 18,
                "initialPayment": {"amount": 10}
            }),
        )
        .await;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Transaction failed");

    assert_eq!(app.count_rows("bills").await, 0);
    assert_eq!(app.count_rows("bill_items").await, 0);
    assert_eq!(app.count_rows("payments").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn failed_edit_keeps_previous_state() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Haircut", 100.0).await;
    let bill_id = app.create_bill(&reference_bill(service_id, None)).await;

    let response = app
        .put_json(
            &format!("/bills/{bill_id}"),
            &json!({"items": [{"service_id": service_id + 1000, "price_at_sale": 1}]}),
        )
        .await;
    assert_eq!(response.status(), 500);

    let detail: Value = app.get(&format!("/bills/{bill_id}")).await.json().await.unwrap();
    assert_money(&detail["total_amount"], 212.4);
    assert_eq!(detail["items"].as_array().unwrap().len(), 1);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn missing_bill_is_not_found() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Haircut", 100.0).await;

    assert_eq!(app.get("/bills/999999").await.status(), 404);

    let response = app
        .put_json("/bills/999999", &reference_bill(service_id, None))
        .await;
    assert_eq!(response.status(), 404);
    assert_eq!(app.count_rows("bill_items").await, 0);

    app.cleanup().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn price_at_sale_survives_catalog_change() {
    let app = TestApp::spawn().await;
    let service_id = app.seed_service("Haircut", 100.0).await;
    let bill_id = app.create_bill(&reference_bill(service_id, None)).await;

    let response = app
        .put_json(
            &format!("/services/{service_id}"),
            &json!({"name": "Premium Haircut", "cost": 250}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let detail: Value = app.get(&format!("/bills/{bill_id}")).await.json().await.unwrap();
    let item = &detail["items"][0];
    assert_money(&item["price_at_sale"], 100.0);
    assert_eq!(item["name"], "Premium Haircut");
    assert_money(&detail["total_amount"], 212.4);

    app.cleanup().await;
}

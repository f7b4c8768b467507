use std::time::Duration;

use chrono::NaiveDate;
use fuel_ingestion_application::{InvoiceSource, SourceError};
use fuel_ingestion_infrastructure::HttpInvoiceSource;
use httpmock::prelude::*;
use serde_json::{json, Value};

const TOKEN: &str = "secret-token";

#[tokio::test]
async fn fetch_sends_date_filter_and_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/erb_invoices")
                .query_param("date", "eq.2023-06-30")
                .header("authorization", format!("Bearer {}", TOKEN))
                .header("user-agent", "Erb Fuel Data Fetcher v1.0.0");
            then.status(200).json_body(json!([
                provider_invoice("ERB-1", "2023-06-30", 615),
                provider_invoice("ERB-2", "2023-06-30", 1120),
                provider_invoice("ERB-3", "2023-06-30", 1905),
            ]));
        })
        .await;

    let records = source(&server).fetch(date()).await.expect("fetch");

    mock.assert_async().await;
    let numbers: Vec<&str> = records.iter().map(|r| r.invoice_number()).collect();
    assert_eq!(numbers, vec!["ERB-1", "ERB-2", "ERB-3"]);
    assert!(records.iter().all(|r| r.delivery_date() == date()));
}

#[tokio::test]
async fn empty_array_is_not_an_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/erb_invoices");
            then.status(200).json_body(json!([]));
        })
        .await;

    let records = source(&server).fetch(date()).await.expect("fetch");

    assert!(records.is_empty());
}

#[tokio::test]
async fn error_status_is_unavailable() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/erb_invoices");
            then.status(503).body("maintenance");
        })
        .await;

    let err = source(&server).fetch(date()).await.expect_err("503");

    match err {
        SourceError::Unavailable(msg) => assert!(msg.contains("503"), "message: {msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_format_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/erb_invoices");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"message": "not a list"}"#);
        })
        .await;

    let err = source(&server).fetch(date()).await.expect_err("bad body");

    assert!(matches!(err, SourceError::Format(_)));
}

#[tokio::test]
async fn null_body_is_a_format_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/erb_invoices");
            then.status(200).body("null");
        })
        .await;

    let err = source(&server).fetch(date()).await.expect_err("null body");

    assert!(matches!(err, SourceError::Format(_)));
}

#[tokio::test]
async fn unconvertible_record_is_a_format_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/erb_invoices");
            then.status(200).json_body(json!([
                provider_invoice("ERB-1", "2023-06-30", 800),
                provider_invoice("ERB-2", "2023-06-30", 2575),
            ]));
        })
        .await;

    let err = source(&server).fetch(date()).await.expect_err("bad time");

    match err {
        SourceError::Format(msg) => assert!(msg.contains("2575"), "message: {msg}"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn credit_line_is_fetched_with_the_rest_of_the_day() {
    let server = MockServer::start_async().await;
    let mut credit = provider_invoice("ERB-2", "2023-06-30", 1120);
    credit["quantity"] = json!(-40.0);
    credit["total_price"] = json!(-71.6);
    server
        .mock_async(|when, then| {
            when.method(GET).path("/erb_invoices");
            then.status(200)
                .json_body(json!([provider_invoice("ERB-1", "2023-06-30", 615), credit.clone()]));
        })
        .await;

    let records = source(&server).fetch(date()).await.expect("fetch");

    assert_eq!(records.len(), 2);
    assert!(records[1].details().quantity.is_sign_negative());
}

#[tokio::test]
async fn unreachable_provider_is_unavailable() {
    let source = HttpInvoiceSource::new(
        "http://127.0.0.1:1/erb_invoices",
        TOKEN,
        Duration::from_secs(2),
    )
    .expect("client");

    let err = source.fetch(date()).await.expect_err("connection refused");

    assert!(matches!(err, SourceError::Unavailable(_)));
}

fn source(server: &MockServer) -> HttpInvoiceSource {
    HttpInvoiceSource::new(server.url("/erb_invoices"), TOKEN, Duration::from_secs(5))
        .expect("client")
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 6, 30).unwrap()
}

fn provider_invoice(invoice: &str, date: &str, time: u32) -> Value {
    json!({
        "ticket": format!("TK-{}", invoice),
        "invoice": invoice,
        "ship_to": "YARD-07",
        "ship_to_desc": "North Yard",
        "ship_to_addr": "12 Depot Rd",
        "date": date,
        "time": time,
        "po_num": "PO-9",
        "product_num": "DSL",
        "product_desc": "Clear Diesel",
        "unit_num": "TRK-44",
        "unit_barcode": "0044",
        "quantity": 312.4,
        "unit_price_less_taxes": 1.2873,
        "fet": 12.5,
        "pft": 44.67,
        "ctx": 33.52,
        "hst": 66.21,
        "total_price": 559.05
    })
}

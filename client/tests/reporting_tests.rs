//! Reporting service tests
//!
//! Builds the views and CSV exports from a mocked item list.

use std::sync::Arc;

use inventory_mrp_client::{ApiClient, InventoryStore, ReportingService, RetryPolicy};
use serde_json::{json, Value};
use shared::{CategoryMetric, ReportOptions};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn item_dto(id: i64, category: &str, quantity: i64, total_value: i64) -> Value {
    json!({
        "id": id,
        "name": format!("Item {}", id),
        "category": category,
        "unit": "un",
        "quantity": quantity,
        "unit_price": 1,
        "total_value": total_value,
        "low_stock": quantity < 5
    })
}

async fn setup() -> (MockServer, ReportingService) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            item_dto(1, "A", 3, 100),
            item_dto(2, "B", 2, 50),
            item_dto(3, "A", 5, 50)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = InventoryStore::new(ApiClient::new(server.uri()), RetryPolicy::none());
    let reporting = ReportingService::new(Arc::new(store), ReportOptions::default());
    (server, reporting)
}

#[tokio::test]
async fn test_category_csv_by_quantity() {
    let (_server, reporting) = setup().await;

    let csv = reporting.category_csv(CategoryMetric::Quantity).await.unwrap();
    assert_eq!(csv, "label,value\nA,8.0\nB,2.0\n");
}

#[tokio::test]
async fn test_views_share_one_fetch() {
    let (_server, reporting) = setup().await;

    let dashboard = reporting.dashboard().await.unwrap();
    let reports = reporting.reports().await.unwrap();
    let abc = reporting.abc_csv().await.unwrap();

    assert_eq!(dashboard.metrics.total_skus, 3);
    assert_eq!(reports.top_products[0].id, 1);
    assert_eq!(abc.lines().count(), 4);
}

//! WebAssembly module for the Inventory MRP front end
//!
//! Exposes the shared computations to JavaScript:
//! - Normalizing backend payloads into view models
//! - Dashboard and reports view models
//! - ABC classification and category totals
//! - Form validation before submission
//!
//! Every function takes and returns JSON strings.

use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use validator::Validate;
use wasm_bindgen::prelude::*;

use shared::{
    category_totals, classify_abc, describe_errors, movement_lines, AbcThresholds,
    CategoryMetric, CreateItemInput, CreateMovementInput, DashboardView, Item, ItemDto, Movement,
    MovementDto, ReportOptions, ReportsView,
};

fn parse<T: DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("Invalid {} JSON: {}", what, e))
}

fn render<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| format!("Serialization error: {}", e))
}

fn thresholds(a: f64, b: f64) -> Result<AbcThresholds, String> {
    let a = Decimal::try_from(a).map_err(|e| format!("Invalid threshold A: {}", e))?;
    let b = Decimal::try_from(b).map_err(|e| format!("Invalid threshold B: {}", e))?;
    AbcThresholds::new(a, b).map_err(|e| e.to_string())
}

fn to_js(result: Result<String, String>) -> Result<String, JsValue> {
    result.map_err(|e| JsValue::from_str(&e))
}

// ============================================================================
// Normalization
// ============================================================================

fn normalize_items_json(dtos_json: &str) -> Result<String, String> {
    let dtos: Vec<ItemDto> = parse(dtos_json, "items")?;
    let items: Vec<Item> = dtos.into_iter().map(Item::from).collect();
    render(&items)
}

fn normalize_movements_json(dtos_json: &str) -> Result<String, String> {
    let dtos: Vec<MovementDto> = parse(dtos_json, "movements")?;
    let movements: Vec<Movement> = dtos.into_iter().map(Movement::from).collect();
    render(&movements)
}

/// Convert a `GET /items` payload into item view models
#[wasm_bindgen]
pub fn normalize_items(dtos_json: &str) -> Result<String, JsValue> {
    to_js(normalize_items_json(dtos_json))
}

/// Convert a `GET /movements` payload into movement view models
#[wasm_bindgen]
pub fn normalize_movements(dtos_json: &str) -> Result<String, JsValue> {
    to_js(normalize_movements_json(dtos_json))
}

// ============================================================================
// Views
// ============================================================================

fn dashboard_view_json(items_json: &str) -> Result<String, String> {
    let items: Vec<Item> = parse(items_json, "items")?;
    render(&DashboardView::build(&items))
}

fn reports_view_json(
    items_json: &str,
    threshold_a: f64,
    threshold_b: f64,
    abc_show_rows: usize,
    top_products: usize,
) -> Result<String, String> {
    let items: Vec<Item> = parse(items_json, "items")?;
    let options = ReportOptions {
        thresholds: thresholds(threshold_a, threshold_b)?,
        abc_show_rows,
        top_products,
    };
    render(&ReportsView::build(&items, &options))
}

fn movement_history_json(movements_json: &str) -> Result<String, String> {
    let movements: Vec<Movement> = parse(movements_json, "movements")?;
    render(&movement_lines(&movements))
}

/// Metrics, category distribution and low-stock panel
#[wasm_bindgen]
pub fn dashboard_view(items_json: &str) -> Result<String, JsValue> {
    to_js(dashboard_view_json(items_json))
}

/// Category charts, top products and the ABC panel
#[wasm_bindgen]
pub fn reports_view(
    items_json: &str,
    threshold_a: f64,
    threshold_b: f64,
    abc_show_rows: u32,
    top_products: u32,
) -> Result<String, JsValue> {
    to_js(reports_view_json(
        items_json,
        threshold_a,
        threshold_b,
        abc_show_rows as usize,
        top_products as usize,
    ))
}

/// Signed movement history of a product
#[wasm_bindgen]
pub fn movement_history(movements_json: &str) -> Result<String, JsValue> {
    to_js(movement_history_json(movements_json))
}

// ============================================================================
// Aggregations
// ============================================================================

fn abc_json(items_json: &str, threshold_a: f64, threshold_b: f64) -> Result<String, String> {
    let items: Vec<Item> = parse(items_json, "items")?;
    render(&classify_abc(&items, &thresholds(threshold_a, threshold_b)?))
}

fn category_totals_json(items_json: &str, metric: &str) -> Result<String, String> {
    let items: Vec<Item> = parse(items_json, "items")?;
    let metric = match metric {
        "quantity" => CategoryMetric::Quantity,
        "value" => CategoryMetric::Value,
        other => return Err(format!("Unknown metric: {}", other)),
    };
    render(&category_totals(&items, metric))
}

/// Full ABC classification with per-class summary
#[wasm_bindgen]
pub fn abc_classification(
    items_json: &str,
    threshold_a: f64,
    threshold_b: f64,
) -> Result<String, JsValue> {
    to_js(abc_json(items_json, threshold_a, threshold_b))
}

/// Totals per category for `metric` ("quantity" or "value"), largest first
#[wasm_bindgen]
pub fn category_distribution(items_json: &str, metric: &str) -> Result<String, JsValue> {
    to_js(category_totals_json(items_json, metric))
}

// ============================================================================
// Form Validation
// ============================================================================

fn validate_json<T: DeserializeOwned + Validate>(json: &str, what: &str) -> Result<String, String> {
    let input: T = parse(json, what)?;
    Ok(match input.validate() {
        Ok(()) => String::new(),
        Err(errors) => describe_errors(&errors),
    })
}

/// Validation message for a new item form, empty when valid
#[wasm_bindgen]
pub fn validate_item_input(input_json: &str) -> Result<String, JsValue> {
    to_js(validate_json::<CreateItemInput>(input_json, "item"))
}

/// Validation message for a movement form, empty when valid
#[wasm_bindgen]
pub fn validate_movement_input(input_json: &str) -> Result<String, JsValue> {
    to_js(validate_json::<CreateMovementInput>(input_json, "movement"))
}

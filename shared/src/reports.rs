//! Display-ready shapes built from the aggregations
//!
//! Nothing here computes beyond truncation and shape conversion; the numbers
//! all come from [`crate::aggregation`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::{
    category_totals, classify_abc, low_stock, top_by_value, total_categories, total_skus,
    total_units, AbcClass, AbcRow, AbcSummary, AbcThresholds, CategoryMetric, CategoryTotal,
    DEFAULT_TOP_PRODUCTS, LOW_STOCK_DISPLAY_THRESHOLD,
};
use crate::models::{Item, Movement};

/// Default number of ABC rows shown before truncating
pub const DEFAULT_ABC_SHOW_ROWS: usize = 15;

/// One bar or slice of a chart
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: Decimal,
}

pub fn chart_points(totals: Vec<CategoryTotal>) -> Vec<ChartPoint> {
    totals
        .into_iter()
        .map(|t| ChartPoint {
            label: t.label,
            value: t.value,
        })
        .collect()
}

// ============================================================================
// ABC Panel
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbcSummaryCard {
    pub klass: AbcClass,
    pub count: usize,
    pub share: Decimal,
}

pub fn abc_summary_cards(summary: &AbcSummary) -> Vec<AbcSummaryCard> {
    AbcClass::ALL
        .iter()
        .map(|&klass| {
            let class = summary.get(klass);
            AbcSummaryCard {
                klass,
                count: class.count,
                share: class.share,
            }
        })
        .collect()
}

/// ABC rows bounded to a display limit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbcTable {
    pub rows: Vec<AbcRow>,
    pub shown: usize,
    pub total: usize,
    /// "Showing K of N products." when rows were cut
    pub notice: Option<String>,
}

pub fn abc_table(mut rows: Vec<AbcRow>, show_rows: usize) -> AbcTable {
    let total = rows.len();
    rows.truncate(show_rows);
    let shown = rows.len();
    let notice = (total > show_rows).then(|| format!("Showing {} of {} products.", shown, total));

    AbcTable {
        rows,
        shown,
        total,
        notice,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbcPanel {
    pub threshold_a: Decimal,
    pub threshold_b: Decimal,
    pub cards: Vec<AbcSummaryCard>,
    pub table: AbcTable,
}

impl AbcPanel {
    pub fn build(items: &[Item], thresholds: &AbcThresholds, show_rows: usize) -> Self {
        let classification = classify_abc(items, thresholds);
        Self {
            threshold_a: thresholds.a(),
            threshold_b: thresholds.b(),
            cards: abc_summary_cards(&classification.summary),
            table: abc_table(classification.rows, show_rows),
        }
    }
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_skus: usize,
    pub total_units: Decimal,
    pub total_categories: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LowStockPanel {
    pub threshold: u32,
    pub items: Vec<Item>,
    /// Set when there is nothing to list
    pub empty_message: Option<String>,
}

impl LowStockPanel {
    pub fn build(items: &[Item]) -> Self {
        let flagged: Vec<Item> = low_stock(items).into_iter().cloned().collect();
        let empty_message = if !flagged.is_empty() {
            None
        } else if items.is_empty() {
            Some("No products registered.".to_string())
        } else {
            Some("All products have enough stock.".to_string())
        };

        Self {
            threshold: LOW_STOCK_DISPLAY_THRESHOLD,
            items: flagged,
            empty_message,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub metrics: DashboardMetrics,
    pub category_distribution: Vec<ChartPoint>,
    pub low_stock: LowStockPanel,
}

impl DashboardView {
    pub fn build(items: &[Item]) -> Self {
        Self {
            metrics: DashboardMetrics {
                total_skus: total_skus(items),
                total_units: total_units(items),
                total_categories: total_categories(items),
            },
            category_distribution: chart_points(category_totals(items, CategoryMetric::Quantity)),
            low_stock: LowStockPanel::build(items),
        }
    }
}

// ============================================================================
// Reports
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub thresholds: AbcThresholds,
    pub abc_show_rows: usize,
    pub top_products: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            thresholds: AbcThresholds::default(),
            abc_show_rows: DEFAULT_ABC_SHOW_ROWS,
            top_products: DEFAULT_TOP_PRODUCTS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportsView {
    pub products_by_category: Vec<ChartPoint>,
    pub cost_by_category: Vec<ChartPoint>,
    pub top_products: Vec<Item>,
    pub abc: AbcPanel,
}

impl ReportsView {
    pub fn build(items: &[Item], options: &ReportOptions) -> Self {
        Self {
            products_by_category: chart_points(category_totals(items, CategoryMetric::Quantity)),
            cost_by_category: chart_points(category_totals(items, CategoryMetric::Value)),
            top_products: top_by_value(items, options.top_products)
                .into_iter()
                .cloned()
                .collect(),
            abc: AbcPanel::build(items, &options.thresholds, options.abc_show_rows),
        }
    }
}

// ============================================================================
// Movements
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MovementLine {
    pub id: i64,
    /// "Entry" or "Exit"
    pub direction: String,
    /// Quantity with the sign of its effect on stock
    pub signed_quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub quantity_after: Decimal,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

pub fn movement_lines(movements: &[Movement]) -> Vec<MovementLine> {
    movements
        .iter()
        .map(|m| {
            let inbound = m.movement_type.is_inbound();
            MovementLine {
                id: m.id,
                direction: if inbound { "Entry" } else { "Exit" }.to_string(),
                signed_quantity: if inbound { m.quantity } else { -m.quantity },
                unit_price: m.unit_price,
                quantity_after: m.quantity_after,
                timestamp: m.timestamp,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MovementKind;
    use chrono::Utc;

    fn item(id: i64, category: &str, quantity: i64, total_value: i64, low: bool) -> Item {
        Item {
            id,
            name: format!("Item {}", id),
            category: category.to_string(),
            unit: "un".to_string(),
            quantity: Decimal::from(quantity),
            unit_price: Decimal::ONE,
            total_value: Decimal::from(total_value),
            low_stock: low,
        }
    }

    #[test]
    fn test_abc_table_truncates_with_notice() {
        let items: Vec<Item> = (1..=20).map(|i| item(i, "A", 1, i, false)).collect();

        let panel = AbcPanel::build(&items, &AbcThresholds::default(), DEFAULT_ABC_SHOW_ROWS);
        assert_eq!(panel.table.shown, 15);
        assert_eq!(panel.table.total, 20);
        assert_eq!(panel.table.rows.len(), 15);
        assert_eq!(panel.table.notice.as_deref(), Some("Showing 15 of 20 products."));
    }

    #[test]
    fn test_abc_table_without_truncation() {
        let items = vec![item(1, "A", 1, 10, false)];

        let panel = AbcPanel::build(&items, &AbcThresholds::default(), DEFAULT_ABC_SHOW_ROWS);
        assert_eq!(panel.table.shown, 1);
        assert!(panel.table.notice.is_none());
        assert_eq!(panel.cards.len(), 3);
        assert_eq!(panel.cards[0].klass, AbcClass::A);
    }

    #[test]
    fn test_abc_panel_serializes_camel_case() {
        let items = vec![item(1, "A", 1, 10, false)];
        let panel = AbcPanel::build(&items, &AbcThresholds::default(), DEFAULT_ABC_SHOW_ROWS);

        let json = serde_json::to_value(&panel).unwrap();
        assert!(json.get("thresholdA").is_some());
        assert!(json.get("thresholdB").is_some());
        assert!(json.get("threshold_a").is_none());
        assert_eq!(json["table"]["rows"][0]["totalValue"], 10.0);
        assert_eq!(json["cards"][0]["klass"], "A");
    }

    #[test]
    fn test_dashboard_view() {
        let items = vec![
            item(1, "A", 3, 0, true),
            item(2, "B", 2, 0, true),
            item(3, "A", 5, 0, false),
        ];

        let view = DashboardView::build(&items);
        assert_eq!(view.metrics.total_skus, 3);
        assert_eq!(view.metrics.total_units, Decimal::from(10));
        assert_eq!(view.metrics.total_categories, 2);
        assert_eq!(view.category_distribution[0].label, "A");
        assert_eq!(view.category_distribution[0].value, Decimal::from(8));
        assert_eq!(view.low_stock.items.len(), 2);
        assert!(view.low_stock.empty_message.is_none());
    }

    #[test]
    fn test_low_stock_empty_messages() {
        assert_eq!(
            LowStockPanel::build(&[]).empty_message.as_deref(),
            Some("No products registered.")
        );
        assert_eq!(
            LowStockPanel::build(&[item(1, "A", 50, 0, false)]).empty_message.as_deref(),
            Some("All products have enough stock.")
        );
    }

    #[test]
    fn test_reports_view_cost_by_category() {
        let items = vec![
            item(1, "A", 1, 10, false),
            item(2, "B", 1, 40, false),
            item(3, "A", 1, 5, false),
        ];

        let view = ReportsView::build(&items, &ReportOptions::default());
        assert_eq!(view.cost_by_category[0].label, "B");
        assert_eq!(view.cost_by_category[1].value, Decimal::from(15));
        assert_eq!(view.top_products[0].id, 2);
        assert_eq!(view.top_products.len(), 3);
    }

    #[test]
    fn test_movement_lines_sign() {
        let movement = |id, kind| Movement {
            id,
            item_id: 1,
            movement_type: kind,
            quantity: Decimal::from(4),
            unit_price: None,
            timestamp: Utc::now(),
            quantity_after: Decimal::from(10),
            total_value_after: Decimal::from(100),
        };

        let lines = movement_lines(&[
            movement(1, MovementKind::Init),
            movement(2, MovementKind::Exit),
        ]);
        assert_eq!(lines[0].direction, "Entry");
        assert_eq!(lines[0].signed_quantity, Decimal::from(4));
        assert_eq!(lines[1].direction, "Exit");
        assert_eq!(lines[1].signed_quantity, Decimal::from(-4));
    }
}

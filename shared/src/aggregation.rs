//! Pure aggregations over an in-memory item collection
//!
//! None of these functions mutate their input. Results depend only on the
//! values and the order of the items passed in.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Item;

/// Quantity under which the backend flags an item as low stock.
///
/// Only used in display copy. Filtering relies on `Item::low_stock`.
pub const LOW_STOCK_DISPLAY_THRESHOLD: u32 = 5;

/// Number of products in the top-by-value ranking
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

// ============================================================================
// Category Totals
// ============================================================================

/// Numeric field summed per category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryMetric {
    Quantity,
    Value,
}

impl CategoryMetric {
    fn of(&self, item: &Item) -> Decimal {
        match self {
            CategoryMetric::Quantity => item.quantity,
            CategoryMetric::Value => item.total_value,
        }
    }
}

/// Sum of one metric over the items of a category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTotal {
    pub label: String,
    pub value: Decimal,
}

/// Group items by category and sum `metric`, largest total first.
///
/// Categories with equal totals keep the order in which they first appear.
pub fn category_totals(items: &[Item], metric: CategoryMetric) -> Vec<CategoryTotal> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for item in items {
        let value = metric.of(item);
        match index.get(item.category.as_str()) {
            Some(&pos) => totals[pos].value += value,
            None => {
                index.insert(item.category.as_str(), totals.len());
                totals.push(CategoryTotal {
                    label: item.category.clone(),
                    value,
                });
            }
        }
    }

    // sort_by is stable
    totals.sort_by(|a, b| b.value.cmp(&a.value));
    totals
}

// ============================================================================
// Dashboard Metrics
// ============================================================================

pub fn total_skus(items: &[Item]) -> usize {
    items.len()
}

pub fn total_units(items: &[Item]) -> Decimal {
    items.iter().map(|item| item.quantity).sum()
}

pub fn total_categories(items: &[Item]) -> usize {
    items
        .iter()
        .map(|item| item.category.as_str())
        .collect::<HashSet<_>>()
        .len()
}

pub fn total_inventory_value(items: &[Item]) -> Decimal {
    items.iter().map(|item| item.total_value).sum()
}

/// Items the backend flagged as low stock, in input order
pub fn low_stock(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|item| item.low_stock).collect()
}

/// The `n` most valuable items. Ties keep their input order.
pub fn top_by_value(items: &[Item], n: usize) -> Vec<&Item> {
    let mut sorted: Vec<&Item> = items.iter().collect();
    sorted.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    sorted.truncate(n);
    sorted
}

// ============================================================================
// ABC Classification
// ============================================================================

/// ABC tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub const ALL: [AbcClass; 3] = [AbcClass::A, AbcClass::B, AbcClass::C];
}

impl std::fmt::Display for AbcClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbcClass::A => write!(f, "A"),
            AbcClass::B => write!(f, "B"),
            AbcClass::C => write!(f, "C"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ThresholdError {
    #[error("thresholds must satisfy 0 < A < B <= 1 (got A={a}, B={b})")]
    OutOfOrder { a: Decimal, b: Decimal },
}

/// Cumulative-share boundaries of classes A and B
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AbcThresholds {
    a: Decimal,
    b: Decimal,
}

impl AbcThresholds {
    pub fn new(a: Decimal, b: Decimal) -> Result<Self, ThresholdError> {
        if a <= Decimal::ZERO || a >= b || b > Decimal::ONE {
            return Err(ThresholdError::OutOfOrder { a, b });
        }
        Ok(Self { a, b })
    }

    pub fn a(&self) -> Decimal {
        self.a
    }

    pub fn b(&self) -> Decimal {
        self.b
    }

    /// Class for a cumulative share. Boundaries are inclusive, so the item
    /// that crosses a threshold stays in the lower class.
    pub fn classify(&self, cumulative: Decimal) -> AbcClass {
        if cumulative <= self.a {
            AbcClass::A
        } else if cumulative <= self.b {
            AbcClass::B
        } else {
            AbcClass::C
        }
    }
}

impl Default for AbcThresholds {
    fn default() -> Self {
        Self {
            a: Decimal::new(80, 2),
            b: Decimal::new(95, 2),
        }
    }
}

/// An item with its share of the total inventory value
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AbcRow {
    #[serde(flatten)]
    pub item: Item,
    /// Share of the total value, 0..1
    pub contribution: Decimal,
    /// Running share up to and including this row, 0..1
    pub cumulative: Decimal,
    pub klass: AbcClass,
}

/// Row count and value share of one class
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ClassSummary {
    pub count: usize,
    pub share: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "UPPERCASE")]
pub struct AbcSummary {
    pub a: ClassSummary,
    pub b: ClassSummary,
    pub c: ClassSummary,
}

impl AbcSummary {
    pub fn get(&self, klass: AbcClass) -> &ClassSummary {
        match klass {
            AbcClass::A => &self.a,
            AbcClass::B => &self.b,
            AbcClass::C => &self.c,
        }
    }

    fn get_mut(&mut self, klass: AbcClass) -> &mut ClassSummary {
        match klass {
            AbcClass::A => &mut self.a,
            AbcClass::B => &mut self.b,
            AbcClass::C => &mut self.c,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AbcClassification {
    pub rows: Vec<AbcRow>,
    pub summary: AbcSummary,
}

/// Rank items by value and split them into A/B/C tiers by cumulative share.
///
/// A collection whose total value is not positive yields no rows and a zeroed
/// summary.
pub fn classify_abc(items: &[Item], thresholds: &AbcThresholds) -> AbcClassification {
    let total = total_inventory_value(items);
    if total <= Decimal::ZERO {
        return AbcClassification::default();
    }

    // Cumulative share is taken from the running value, so the last row is exactly 1
    let mut running_value = Decimal::ZERO;
    let rows: Vec<AbcRow> = top_by_value(items, items.len())
        .into_iter()
        .map(|item| {
            running_value += item.total_value;
            let cumulative = running_value / total;
            AbcRow {
                item: item.clone(),
                contribution: item.total_value / total,
                cumulative,
                klass: thresholds.classify(cumulative),
            }
        })
        .collect();

    let mut summary = AbcSummary::default();
    for row in &rows {
        let class = summary.get_mut(row.klass);
        class.count += 1;
        class.share += row.contribution;
    }

    AbcClassification { rows, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, category: &str, quantity: i64, total_value: i64) -> Item {
        Item {
            id,
            name: format!("Item {}", id),
            category: category.to_string(),
            unit: "un".to_string(),
            quantity: Decimal::from(quantity),
            unit_price: Decimal::ONE,
            total_value: Decimal::from(total_value),
            low_stock: quantity < LOW_STOCK_DISPLAY_THRESHOLD as i64,
        }
    }

    #[test]
    fn test_category_totals_by_quantity() {
        let items = vec![item(1, "A", 3, 0), item(2, "B", 2, 0), item(3, "A", 5, 0)];

        let totals = category_totals(&items, CategoryMetric::Quantity);
        assert_eq!(
            totals,
            vec![
                CategoryTotal { label: "A".into(), value: Decimal::from(8) },
                CategoryTotal { label: "B".into(), value: Decimal::from(2) },
            ]
        );
    }

    #[test]
    fn test_category_totals_ties_keep_first_seen_order() {
        let items = vec![item(1, "X", 0, 10), item(2, "Y", 0, 10), item(3, "Z", 0, 30)];

        let labels: Vec<_> = category_totals(&items, CategoryMetric::Value)
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["Z", "X", "Y"]);
    }

    #[test]
    fn test_dashboard_counts() {
        let items = vec![item(1, "A", 3, 0), item(2, "B", 2, 0), item(3, "A", 5, 0)];

        assert_eq!(total_skus(&items), 3);
        assert_eq!(total_units(&items), Decimal::from(10));
        assert_eq!(total_categories(&items), 2);
    }

    #[test]
    fn test_low_stock_trusts_backend_flag() {
        let mut flagged = item(1, "A", 100, 0);
        flagged.low_stock = true;
        let mut unflagged = item(2, "A", 1, 0);
        unflagged.low_stock = false;

        let items = vec![flagged, unflagged];
        let result = low_stock(&items);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, 1);
    }

    #[test]
    fn test_top_by_value_is_stable() {
        let items = vec![item(1, "A", 1, 5), item(2, "A", 1, 9), item(3, "A", 1, 5)];

        let ids: Vec<_> = top_by_value(&items, 2).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(top_by_value(&items, 10).len(), 3);
    }

    #[test]
    fn test_classify_abc_reference_curve() {
        let items: Vec<Item> = [100, 50, 30, 15, 5]
            .iter()
            .enumerate()
            .map(|(i, v)| item(i as i64 + 1, "A", 1, *v))
            .collect();

        let result = classify_abc(&items, &AbcThresholds::default());

        let cumulative: Vec<_> = result.rows.iter().map(|r| r.cumulative).collect();
        assert_eq!(
            cumulative,
            vec![
                Decimal::new(50, 2),
                Decimal::new(75, 2),
                Decimal::new(90, 2),
                Decimal::new(975, 3),
                Decimal::ONE,
            ]
        );

        let classes: Vec<_> = result.rows.iter().map(|r| r.klass).collect();
        assert_eq!(
            classes,
            vec![AbcClass::A, AbcClass::A, AbcClass::B, AbcClass::C, AbcClass::C]
        );

        assert_eq!(result.summary.a.count, 2);
        assert_eq!(result.summary.a.share, Decimal::new(75, 2));
        assert_eq!(result.summary.b.count, 1);
        assert_eq!(result.summary.c.count, 2);
    }

    #[test]
    fn test_classify_abc_boundary_is_inclusive() {
        let items = vec![item(1, "A", 1, 80), item(2, "A", 1, 20)];

        let result = classify_abc(&items, &AbcThresholds::default());
        assert_eq!(result.rows[0].cumulative, Decimal::new(80, 2));
        assert_eq!(result.rows[0].klass, AbcClass::A);
        assert_eq!(result.rows[1].klass, AbcClass::C);
    }

    #[test]
    fn test_classify_abc_zero_total() {
        let items = vec![item(1, "A", 0, 0), item(2, "B", 0, 0)];

        let result = classify_abc(&items, &AbcThresholds::default());
        assert!(result.rows.is_empty());
        assert_eq!(result.summary, AbcSummary::default());
    }

    #[test]
    fn test_thresholds_must_be_ordered() {
        assert!(AbcThresholds::new(Decimal::new(5, 1), Decimal::new(9, 1)).is_ok());
        assert!(AbcThresholds::new(Decimal::new(9, 1), Decimal::new(5, 1)).is_err());
        assert!(AbcThresholds::new(Decimal::ZERO, Decimal::new(5, 1)).is_err());
        assert!(AbcThresholds::new(Decimal::new(5, 1), Decimal::new(11, 1)).is_err());
        assert!(AbcThresholds::new(Decimal::new(5, 1), Decimal::ONE).is_ok());
    }

    #[test]
    fn test_classify_abc_curve_ends_at_one() {
        let items: Vec<Item> = (1..=7).map(|id| item(id, "A", 1, 1)).collect();
        let thresholds = AbcThresholds::new(Decimal::new(5, 1), Decimal::ONE).unwrap();

        let result = classify_abc(&items, &thresholds);
        let last = result.rows.last().unwrap();
        assert_eq!(last.cumulative, Decimal::ONE);
        assert_eq!(last.klass, AbcClass::B);
        assert!(result.rows.iter().all(|row| row.cumulative <= Decimal::ONE));
        assert_eq!(result.summary.c.count, 0);
        assert_eq!(result.summary.a.count + result.summary.b.count, 7);
    }
}

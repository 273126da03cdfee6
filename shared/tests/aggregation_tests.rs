//! Reporting aggregation tests
//!
//! Covers category totals, low-stock filtering, top-N ranking and the ABC
//! curve, plus properties that must hold for any item collection.

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::*;
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn item(id: i64, category: &str, quantity: Decimal, total_value: Decimal, low_stock: bool) -> Item {
    Item {
        id,
        name: format!("Produto {}", id),
        category: category.to_string(),
        unit: "un".to_string(),
        quantity,
        unit_price: Decimal::ONE,
        total_value,
        low_stock,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Quantities grouped by category, largest first
    #[test]
    fn test_category_distribution_scenario() {
        let items = vec![
            item(1, "A", dec("3"), Decimal::ZERO, true),
            item(2, "B", dec("2"), Decimal::ZERO, true),
            item(3, "A", dec("5"), Decimal::ZERO, false),
        ];

        let points = chart_points(category_totals(&items, CategoryMetric::Quantity));
        assert_eq!(
            points,
            vec![
                ChartPoint { label: "A".to_string(), value: dec("8") },
                ChartPoint { label: "B".to_string(), value: dec("2") },
            ]
        );
    }

    /// The reference ABC curve: 100, 50, 30, 15, 5
    #[test]
    fn test_abc_reference_scenario() {
        let items: Vec<Item> = ["100", "50", "30", "15", "5"]
            .iter()
            .enumerate()
            .map(|(i, v)| item(i as i64 + 1, "Geral", dec("1"), dec(v), false))
            .collect();

        let thresholds = AbcThresholds::new(dec("0.8"), dec("0.95")).unwrap();
        let result = classify_abc(&items, &thresholds);

        let ids: Vec<_> = result.rows.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);

        let cumulative: Vec<_> = result.rows.iter().map(|r| r.cumulative).collect();
        assert_eq!(
            cumulative,
            vec![dec("0.5"), dec("0.75"), dec("0.9"), dec("0.975"), dec("1.0")]
        );

        let classes: Vec<_> = result.rows.iter().map(|r| r.klass).collect();
        assert_eq!(
            classes,
            vec![AbcClass::A, AbcClass::A, AbcClass::B, AbcClass::C, AbcClass::C]
        );
    }

    /// Unsorted input is ranked before the running share is computed
    #[test]
    fn test_abc_sorts_by_value() {
        let items = vec![
            item(1, "X", dec("1"), dec("10"), false),
            item(2, "X", dec("1"), dec("70"), false),
            item(3, "X", dec("1"), dec("20"), false),
        ];

        let result = classify_abc(&items, &AbcThresholds::default());
        let ids: Vec<_> = result.rows.iter().map(|r| r.item.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
        assert_eq!(result.rows[0].contribution, dec("0.7"));
    }

    /// All-zero values produce no rows and no division by zero
    #[test]
    fn test_abc_all_zero_values() {
        let items = vec![
            item(1, "X", dec("0"), Decimal::ZERO, true),
            item(2, "Y", dec("0"), Decimal::ZERO, true),
        ];

        let result = classify_abc(&items, &AbcThresholds::default());
        assert!(result.rows.is_empty());
        for klass in AbcClass::ALL {
            assert_eq!(result.summary.get(klass).count, 0);
            assert_eq!(result.summary.get(klass).share, Decimal::ZERO);
        }
    }

    /// Empty collection is handled like a zero total
    #[test]
    fn test_abc_empty_collection() {
        let result = classify_abc(&[], &AbcThresholds::default());
        assert!(result.rows.is_empty());
        assert_eq!(result.summary, AbcSummary::default());
    }

    /// Serialized ABC rows flatten the item fields next to the shares
    #[test]
    fn test_abc_row_serialization() {
        let items = vec![item(9, "X", dec("2"), dec("10"), false)];
        let result = classify_abc(&items, &AbcThresholds::default());

        let json = serde_json::to_value(&result).unwrap();
        let row = &json["rows"][0];
        assert_eq!(row["id"], 9);
        assert_eq!(row["totalValue"], 10.0);
        assert_eq!(row["klass"], "C");
        assert_eq!(json["summary"]["C"]["count"], 1);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    fn categories() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Ferragens", "Elétrica", "Hidráulica", "Pintura"])
            .prop_map(|s| s.to_string())
    }

    // Whole units and cents keep every sum exact
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
    }

    fn items_strategy() -> impl Strategy<Value = Vec<Item>> {
        prop::collection::vec(
            (categories(), amount_strategy(), amount_strategy(), any::<bool>()),
            0..40,
        )
        .prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(i, (category, quantity, value, low))| {
                    item(i as i64 + 1, &category, quantity, value, low)
                })
                .collect()
        })
    }

    fn thresholds_strategy() -> impl Strategy<Value = AbcThresholds> {
        (1i64..99, 1i64..=100)
            .prop_filter("A must be below B", |(a, b)| a < b)
            .prop_map(|(a, b)| AbcThresholds::new(Decimal::new(a, 2), Decimal::new(b, 2)).unwrap())
    }

    fn tolerance() -> Decimal {
        dec("0.000000000001")
    }

    proptest! {
        /// Per-category quantity totals add up to the overall quantity
        #[test]
        fn prop_category_totals_preserve_sum(items in items_strategy()) {
            let per_category: Decimal = category_totals(&items, CategoryMetric::Quantity)
                .iter()
                .map(|t| t.value)
                .sum();

            prop_assert_eq!(per_category, total_units(&items));
        }

        /// Category totals are sorted largest first
        #[test]
        fn prop_category_totals_sorted(items in items_strategy()) {
            let totals = category_totals(&items, CategoryMetric::Value);
            for pair in totals.windows(2) {
                prop_assert!(pair[0].value >= pair[1].value);
            }
            prop_assert_eq!(totals.len(), total_categories(&items));
        }

        /// Low-stock filter only returns flagged items
        #[test]
        fn prop_low_stock_subset(items in items_strategy()) {
            let flagged = low_stock(&items);

            prop_assert!(flagged.len() <= items.len());
            prop_assert!(flagged.iter().all(|item| item.low_stock));
            prop_assert_eq!(flagged.len(), items.iter().filter(|i| i.low_stock).count());
        }

        /// Top-N is sorted and bounded by the collection size
        #[test]
        fn prop_top_n_sorted_and_bounded(items in items_strategy(), n in 0usize..50) {
            let top = top_by_value(&items, n);

            prop_assert_eq!(top.len(), n.min(items.len()));
            for pair in top.windows(2) {
                prop_assert!(pair[0].total_value >= pair[1].total_value);
            }
        }

        /// The ABC curve ends at 1, never decreases and matches its classes
        #[test]
        fn prop_abc_curve_consistent(
            items in items_strategy(),
            thresholds in thresholds_strategy()
        ) {
            let result = classify_abc(&items, &thresholds);

            if total_inventory_value(&items) <= Decimal::ZERO {
                prop_assert!(result.rows.is_empty());
                prop_assert_eq!(result.summary, AbcSummary::default());
                return Ok(());
            }

            prop_assert_eq!(result.rows.len(), items.len());

            let last = result.rows.last().unwrap().cumulative;
            prop_assert!((last - Decimal::ONE).abs() < tolerance());

            for pair in result.rows.windows(2) {
                prop_assert!(pair[0].cumulative <= pair[1].cumulative);
            }

            for row in &result.rows {
                let expected = if row.cumulative <= thresholds.a() {
                    AbcClass::A
                } else if row.cumulative <= thresholds.b() {
                    AbcClass::B
                } else {
                    AbcClass::C
                };
                prop_assert_eq!(row.klass, expected);
            }

            let shares: Decimal = AbcClass::ALL
                .iter()
                .map(|k| result.summary.get(*k).share)
                .sum();
            prop_assert!((shares - Decimal::ONE).abs() < tolerance());

            let counts: usize = AbcClass::ALL
                .iter()
                .map(|k| result.summary.get(*k).count)
                .sum();
            prop_assert_eq!(counts, result.rows.len());
        }

        /// Aggregations never modify their input
        #[test]
        fn prop_input_untouched(items in items_strategy()) {
            let before = items.clone();
            let _ = classify_abc(&items, &AbcThresholds::default());
            let _ = top_by_value(&items, 5);
            let _ = category_totals(&items, CategoryMetric::Value);
            prop_assert_eq!(items, before);
        }
    }
}

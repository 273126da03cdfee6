//! Reporting service for the dashboard, the reports page and data export

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::{
    category_totals, classify_abc, AbcRow, CategoryMetric, DashboardView, ReportOptions,
    ReportsView,
};

use super::InventoryStore;
use crate::error::{ClientError, ClientResult};

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    store: Arc<InventoryStore>,
    options: ReportOptions,
}

/// ABC row as exported to CSV
#[derive(Debug, Serialize)]
pub struct AbcCsvRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub total_value: Decimal,
    pub contribution: Decimal,
    pub cumulative: Decimal,
    pub class: String,
}

impl From<&AbcRow> for AbcCsvRow {
    fn from(row: &AbcRow) -> Self {
        Self {
            id: row.item.id,
            name: row.item.name.clone(),
            category: row.item.category.clone(),
            total_value: row.item.total_value,
            contribution: row.contribution.round_dp(4),
            cumulative: row.cumulative.round_dp(4),
            class: row.klass.to_string(),
        }
    }
}

impl ReportingService {
    pub fn new(store: Arc<InventoryStore>, options: ReportOptions) -> Self {
        Self { store, options }
    }

    /// Dashboard metrics, category distribution and low-stock panel
    pub async fn dashboard(&self) -> ClientResult<DashboardView> {
        let items = self.store.items().await?;
        Ok(DashboardView::build(&items))
    }

    /// Category charts, top products and ABC curve
    pub async fn reports(&self) -> ClientResult<ReportsView> {
        let items = self.store.items().await?;
        Ok(ReportsView::build(&items, &self.options))
    }

    /// Full ABC classification as CSV
    pub async fn abc_csv(&self) -> ClientResult<String> {
        let items = self.store.items().await?;
        let classification = classify_abc(&items, &self.options.thresholds);
        let rows: Vec<AbcCsvRow> = classification.rows.iter().map(AbcCsvRow::from).collect();
        Self::export_to_csv(&rows)
    }

    /// Totals per category as CSV
    pub async fn category_csv(&self, metric: CategoryMetric) -> ClientResult<String> {
        let items = self.store.items().await?;
        Self::export_to_csv(&category_totals(&items, metric))
    }

    /// Export report data as CSV
    pub fn export_to_csv<T: Serialize>(data: &[T]) -> ClientResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record)
                .map_err(|e| ClientError::Encode(format!("CSV serialization error: {}", e)))?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ClientError::Encode(format!("CSV writer error: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| ClientError::Encode(format!("UTF-8 conversion error: {}", e)))
    }
}

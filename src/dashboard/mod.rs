// Dashboard module - aggregation and presentation model
// This file assembles summary cards, chart series, the daily table and the
// extension selector from one extension's statistics
//
// Numan Thabit 2025 Nov

pub mod chart;
pub mod selector;
pub mod table;
pub mod totals;
pub mod trend;

pub use chart::{ChartData, MetricFilter};
pub use selector::ExtensionSelector;
pub use table::{SortColumn, SortOrder, StatsTable, TableSort};
pub use totals::{last_n_days, sum_metric, MetricTotals};
pub use trend::{week_over_week, Direction};

use crate::model::{Extension, ExtensionStats, Metric};
use crate::source::{DataSource, Notice};
use serde::{Deserialize, Serialize};

pub const TREND_LABEL: &str = "vs previous week";

/// Query parameters accepted by the dashboard page and its JSON twin.
/// Unknown metric or sort keys fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardParams {
    pub extension: Option<String>,
    pub metric: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

impl DashboardParams {
    pub fn filter(&self) -> MetricFilter {
        self.metric
            .as_deref()
            .and_then(MetricFilter::parse)
            .unwrap_or_default()
    }

    pub fn table_sort(&self) -> Option<TableSort> {
        let column = SortColumn::from_key(self.sort.as_deref()?)?;
        let order = self
            .order
            .as_deref()
            .and_then(SortOrder::from_key)
            .unwrap_or_default();
        Some(TableSort { column, order })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryCard {
    pub metric: Metric,
    pub title: &'static str,
    pub value: u64,
    pub trend: i64,
    pub direction: Direction,
    pub trend_label: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub extension_name: String,
    pub publisher_name: String,
    pub stat_count: u64,
    pub source: DataSource,
    pub notice: Notice,
    pub window_days: usize,
    pub totals: MetricTotals,
    pub cards: Vec<SummaryCard>,
    pub chart: ChartData,
    pub table: StatsTable,
    pub selector: ExtensionSelector,
}

impl DashboardView {
    pub fn build(
        stats: &ExtensionStats,
        source: DataSource,
        notice: Notice,
        extensions: Vec<Extension>,
        window_days: usize,
        params: &DashboardParams,
    ) -> Self {
        let totals = MetricTotals::from_stats(stats);
        let cards = Metric::ALL
            .into_iter()
            .map(|metric| {
                let trend = week_over_week(&stats.daily_stats, metric);
                SummaryCard {
                    metric,
                    title: metric.label(),
                    value: totals.get(metric),
                    trend,
                    direction: Direction::of(trend),
                    trend_label: TREND_LABEL,
                }
            })
            .collect();

        let window = last_n_days(stats, window_days);
        let chart = ChartData::build(&window, params.filter());
        let table = StatsTable::build(&window, params.table_sort());

        Self {
            extension_name: stats.extension_name.clone(),
            publisher_name: stats.publisher_name.clone(),
            stat_count: stats.stat_count,
            source,
            notice,
            window_days,
            totals,
            cards,
            chart,
            table,
            selector: ExtensionSelector::new(extensions, &stats.extension_name),
        }
    }
}

// Metric totals and day windows
//
// Numan Thabit 2025 Nov

use crate::model::{DailyStat, ExtensionStats, Metric};
use serde::Serialize;

/// Sum of one counter across `days`, treating absent counters as zero.
pub fn sum_metric<'a, I>(days: I, metric: Metric) -> u64
where
    I: IntoIterator<Item = &'a DailyStat>,
{
    days.into_iter().map(|d| d.counts.get(metric)).sum()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricTotals {
    pub page_views: u64,
    pub installs: u64,
    pub downloads: u64,
    pub uninstalls: u64,
}

impl MetricTotals {
    pub fn from_stats(stats: &ExtensionStats) -> Self {
        Self {
            page_views: sum_metric(&stats.daily_stats, Metric::PageViews),
            installs: sum_metric(&stats.daily_stats, Metric::Installs),
            downloads: sum_metric(&stats.daily_stats, Metric::Downloads),
            uninstalls: sum_metric(&stats.daily_stats, Metric::Uninstalls),
        }
    }

    pub fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::PageViews => self.page_views,
            Metric::Installs => self.installs,
            Metric::Downloads => self.downloads,
            Metric::Uninstalls => self.uninstalls,
        }
    }
}

/// The `days` most recent records in chronological order.
pub fn last_n_days(stats: &ExtensionStats, days: usize) -> Vec<&DailyStat> {
    let take = days.min(stats.daily_stats.len());
    stats.daily_stats[..take].iter().rev().collect()
}

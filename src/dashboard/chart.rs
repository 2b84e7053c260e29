// Time-series chart data
// This file turns a window of daily statistics into labelled series, one
// per metric, plus a zero-based integer y axis
//
// Numan Thabit 2025 Nov

use crate::model::{DailyStat, Metric};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// `MMM dd, yyyy`, e.g. `Jul 03, 2025`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Which series the chart shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "metric")]
pub enum MetricFilter {
    #[default]
    All,
    Only(Metric),
}

impl MetricFilter {
    pub fn parse(key: &str) -> Option<Self> {
        if key == "all" {
            return Some(MetricFilter::All);
        }
        Metric::from_key(key).map(MetricFilter::Only)
    }

    pub fn key(self) -> &'static str {
        match self {
            MetricFilter::All => "all",
            MetricFilter::Only(m) => m.key(),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MetricFilter::All => "All Metrics",
            MetricFilter::Only(m) => m.label(),
        }
    }

    pub fn includes(self, metric: Metric) -> bool {
        match self {
            MetricFilter::All => true,
            MetricFilter::Only(m) => m == metric,
        }
    }

    /// Tab order in the chart header.
    pub fn tabs() -> impl Iterator<Item = MetricFilter> {
        std::iter::once(MetricFilter::All).chain(Metric::ALL.into_iter().map(MetricFilter::Only))
    }
}

pub fn series_color(metric: Metric) -> (&'static str, &'static str) {
    match metric {
        Metric::PageViews => ("rgb(59, 130, 246)", "rgba(59, 130, 246, 0.1)"),
        Metric::Installs => ("rgb(16, 185, 129)", "rgba(16, 185, 129, 0.1)"),
        Metric::Downloads => ("rgb(139, 92, 246)", "rgba(139, 92, 246, 0.1)"),
        Metric::Uninstalls => ("rgb(239, 68, 68)", "rgba(239, 68, 68, 0.1)"),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub metric: Metric,
    pub label: &'static str,
    pub border_color: &'static str,
    pub background_color: &'static str,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub labels: Vec<String>,
    pub filter: MetricFilter,
    pub series: Vec<ChartSeries>,
    pub y_ticks: Vec<u64>,
}

impl ChartData {
    /// `window` must already be in chronological order.
    pub fn build(window: &[&DailyStat], filter: MetricFilter) -> Self {
        let labels = window
            .iter()
            .map(|d| format_date(&d.statistic_date))
            .collect();

        let series: Vec<ChartSeries> = Metric::ALL
            .into_iter()
            .filter(|m| filter.includes(*m))
            .map(|metric| {
                let (border_color, background_color) = series_color(metric);
                ChartSeries {
                    metric,
                    label: metric.label(),
                    border_color,
                    background_color,
                    data: window.iter().map(|d| d.counts.get(metric)).collect(),
                }
            })
            .collect();

        let max = series
            .iter()
            .flat_map(|s| s.data.iter().copied())
            .max()
            .unwrap_or(0);

        Self {
            labels,
            filter,
            series,
            y_ticks: y_ticks(max),
        }
    }

    /// Largest value the y axis reaches.
    pub fn y_max(&self) -> u64 {
        self.y_ticks.last().copied().unwrap_or(1).max(1)
    }
}

const TARGET_TICKS: u64 = 5;

/// Integer ticks from zero covering `max` with a 1/2/5 step.
pub fn y_ticks(max: u64) -> Vec<u64> {
    if max == 0 {
        return vec![0, 1];
    }
    let raw = max.div_ceil(TARGET_TICKS);
    let mut magnitude = 1;
    while magnitude * 10 <= raw {
        magnitude *= 10;
    }
    let step = [1, 2, 5, 10]
        .into_iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw)
        .unwrap_or(10 * magnitude);
    let top = max.div_ceil(step) * step;
    (0..=top).step_by(step as usize).collect()
}

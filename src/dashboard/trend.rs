// Week-over-week trend calculation
// Compares the most recent seven days against the seven before them
//
// Numan Thabit 2025 Nov

use crate::dashboard::totals::sum_metric;
use crate::model::{DailyStat, Metric};
use serde::Serialize;

pub const TREND_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
    Flat,
}

impl Direction {
    pub fn of(percent: i64) -> Self {
        match percent.signum() {
            1 => Direction::Up,
            -1 => Direction::Down,
            _ => Direction::Flat,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Direction::Up => "↑",
            Direction::Down => "↓",
            Direction::Flat => "→",
        }
    }
}

/// Percentage change from `previous` to `current`, rounded like
/// `Math.round` (ties toward +∞). Inverted metrics report improvement as
/// a positive number.
pub fn percent_change(current: u64, previous: u64, inverted: bool) -> i64 {
    let change = if previous == 0 {
        if current == 0 {
            return 0;
        }
        100
    } else {
        let ratio = (current as f64 - previous as f64) / previous as f64 * 100.0;
        (ratio + 0.5).floor() as i64
    };
    if inverted {
        -change
    } else {
        change
    }
}

/// Trend for `metric` over `daily` (most recent day first).
pub fn week_over_week(daily: &[DailyStat], metric: Metric) -> i64 {
    let recent = &daily[..daily.len().min(TREND_DAYS * 2)];
    let split = recent.len().min(TREND_DAYS);
    let current = sum_metric(&recent[..split], metric);
    let previous = sum_metric(&recent[split..], metric);
    percent_change(current, previous, metric.is_inverted())
}

// Daily statistics table
// Rows for the selected window, sortable by any column
//
// Numan Thabit 2025 Nov

use crate::dashboard::chart::format_date;
use crate::model::{DailyStat, Metric};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Date,
    PageViews,
    Installs,
    Downloads,
    Uninstalls,
    Rating,
}

impl SortColumn {
    pub const ALL: [SortColumn; 6] = [
        SortColumn::Date,
        SortColumn::PageViews,
        SortColumn::Installs,
        SortColumn::Downloads,
        SortColumn::Uninstalls,
        SortColumn::Rating,
    ];

    pub fn key(self) -> &'static str {
        match self {
            SortColumn::Date => "date",
            SortColumn::PageViews => "pageViews",
            SortColumn::Installs => "installs",
            SortColumn::Downloads => "downloads",
            SortColumn::Uninstalls => "uninstalls",
            SortColumn::Rating => "rating",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            SortColumn::Date => "Date",
            SortColumn::PageViews => "Page Views",
            SortColumn::Installs => "Installs",
            SortColumn::Downloads => "Downloads",
            SortColumn::Uninstalls => "Uninstalls",
            SortColumn::Rating => "Rating",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }

    fn metric(self) -> Option<Metric> {
        match self {
            SortColumn::PageViews => Some(Metric::PageViews),
            SortColumn::Installs => Some(Metric::Installs),
            SortColumn::Downloads => Some(Metric::Downloads),
            SortColumn::Uninstalls => Some(Metric::Uninstalls),
            SortColumn::Date | SortColumn::Rating => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn key(self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }

    pub fn flip(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSort {
    pub column: SortColumn,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub statistic_date: DateTime<Utc>,
    pub date: String,
    pub page_views: u64,
    pub installs: u64,
    pub downloads: u64,
    pub uninstalls: u64,
    /// `None` renders as `N/A`; a zero rating is treated as absent.
    pub rating: Option<f64>,
}

impl TableRow {
    fn from_stat(stat: &DailyStat) -> Self {
        let c = &stat.counts;
        Self {
            statistic_date: stat.statistic_date,
            date: format_date(&stat.statistic_date),
            page_views: c.get(Metric::PageViews),
            installs: c.get(Metric::Installs),
            downloads: c.get(Metric::Downloads),
            uninstalls: c.get(Metric::Uninstalls),
            rating: c.average_rating.filter(|r| *r != 0.0),
        }
    }

    pub fn metric(&self, metric: Metric) -> u64 {
        match metric {
            Metric::PageViews => self.page_views,
            Metric::Installs => self.installs,
            Metric::Downloads => self.downloads,
            Metric::Uninstalls => self.uninstalls,
        }
    }

    pub fn rating_text(&self) -> String {
        match self.rating {
            Some(r) => format!("{r}"),
            None => "N/A".to_string(),
        }
    }

    fn compare(&self, other: &Self, column: SortColumn) -> Ordering {
        match column {
            SortColumn::Date => self.statistic_date.cmp(&other.statistic_date),
            SortColumn::Rating => self
                .rating
                .partial_cmp(&other.rating)
                .unwrap_or(Ordering::Equal),
            metric_col => match metric_col.metric() {
                Some(m) => self.metric(m).cmp(&other.metric(m)),
                None => Ordering::Equal,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsTable {
    pub sort: Option<TableSort>,
    pub rows: Vec<TableRow>,
}

impl StatsTable {
    /// Rows keep `window` order unless a sort is requested. Equal keys keep
    /// their window order in both directions.
    pub fn build(window: &[&DailyStat], sort: Option<TableSort>) -> Self {
        let mut rows: Vec<TableRow> = window.iter().map(|d| TableRow::from_stat(d)).collect();
        if let Some(TableSort { column, order }) = sort {
            rows.sort_by(|a, b| {
                let ord = a.compare(b, column);
                match order {
                    SortOrder::Asc => ord,
                    SortOrder::Desc => ord.reverse(),
                }
            });
        }
        Self { sort, rows }
    }

    /// Order a header link should request: flips the active column,
    /// ascending for the others.
    pub fn next_order(&self, column: SortColumn) -> SortOrder {
        match self.sort {
            Some(s) if s.column == column => s.order.flip(),
            _ => SortOrder::Asc,
        }
    }
}

// Marketplace data model
// Wire types for extension statistics and publisher extension listings,
// shared by the upstream client, the mock dataset and the dashboard
//
// Numan Thabit 2025 Nov

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-day counters reported by the Marketplace. The upstream omits a
/// counter entirely when it is zero for that day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsCount {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_page_views: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_download_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uninstall_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStat {
    pub version: Option<String>,
    pub statistic_date: DateTime<Utc>,
    #[serde(default)]
    pub counts: StatsCount,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionStats {
    pub extension_name: String,
    pub publisher_name: String,
    #[serde(default)]
    pub stat_count: u64,
    /// Most recent day first.
    #[serde(default)]
    pub daily_stats: Vec<DailyStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    pub extension_name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub short_description: String,
}

/// The four summed counters shown on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PageViews,
    Installs,
    Downloads,
    Uninstalls,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::PageViews,
        Metric::Installs,
        Metric::Downloads,
        Metric::Uninstalls,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Metric::PageViews => "Page Views",
            Metric::Installs => "Installs",
            Metric::Downloads => "Downloads",
            Metric::Uninstalls => "Uninstalls",
        }
    }

    /// Identifier used in query strings and JSON.
    pub fn key(self) -> &'static str {
        match self {
            Metric::PageViews => "pageViews",
            Metric::Installs => "installs",
            Metric::Downloads => "downloads",
            Metric::Uninstalls => "uninstalls",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.key() == key)
    }

    /// Whether a rising value is bad news (trend sign is flipped).
    pub fn is_inverted(self) -> bool {
        matches!(self, Metric::Uninstalls)
    }
}

impl StatsCount {
    pub fn get(&self, metric: Metric) -> u64 {
        let value = match metric {
            Metric::PageViews => self.web_page_views,
            Metric::Installs => self.install_count,
            Metric::Downloads => self.web_download_count,
            Metric::Uninstalls => self.uninstall_count,
        };
        value.unwrap_or(0)
    }
}

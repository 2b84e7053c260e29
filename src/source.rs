// Dashboard data source
// Loads live statistics from the Marketplace and falls back to the
// static mock dataset when mock mode is on or the upstream call fails
//
// Numan Thabit 2025 Nov

use crate::dashboard::trend::TREND_DAYS;
use crate::errors::DashError;
use crate::metrics::MOCK_FALLBACKS;
use crate::mock::{mock_extensions, mock_stats};
use crate::model::{Extension, ExtensionStats};
use crate::transport::MarketplaceClient;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    Live,
    Mock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Banner shown above the dashboard describing where the data came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    fn new(level: NoticeLevel, message: &str) -> Self {
        Self {
            level,
            message: message.to_string(),
        }
    }
}

pub const MOCK_NOTICE: &str = "Using mock data. Provide a PAT token to fetch real data.";
pub const LIVE_NOTICE: &str = "Loaded real extension statistics";
pub const FALLBACK_NOTICE: &str = "API call failed. Using mock data instead.";

#[derive(Debug, Clone)]
pub struct Loaded<T> {
    pub data: T,
    pub source: DataSource,
    pub notice: Notice,
}

/// ISO-8601 timestamp `days` before `now`, millisecond precision.
pub fn after_date(now: DateTime<Utc>, days: usize) -> String {
    i64::try_from(days)
        .ok()
        .and_then(Duration::try_days)
        .and_then(|d| now.checked_sub_signed(d))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone)]
pub struct StatsSource {
    client: Option<MarketplaceClient>,
    publisher: String,
    use_mock: bool,
    days: usize,
}

impl StatsSource {
    pub fn new(
        client: Option<MarketplaceClient>,
        publisher: impl Into<String>,
        use_mock: bool,
        days: usize,
    ) -> Self {
        Self {
            client,
            publisher: publisher.into(),
            use_mock,
            days,
        }
    }

    pub fn client(&self) -> Option<&MarketplaceClient> {
        self.client.as_ref()
    }

    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    pub fn days(&self) -> usize {
        self.days
    }

    /// Days requested upstream: the display window, widened so the
    /// week-over-week trend always has a previous week to compare with.
    pub fn fetch_days(&self) -> usize {
        self.days.max(TREND_DAYS * 2)
    }

    pub fn is_mock(&self) -> bool {
        self.use_mock || self.client.is_none()
    }

    pub async fn fetch_live_stats(&self, extension: &str) -> Result<ExtensionStats, DashError> {
        let client = self.client.as_ref().ok_or(DashError::MissingToken)?;
        let after = after_date(Utc::now(), self.fetch_days());
        let raw = client
            .extension_stats(&self.publisher, extension, "1", &after)
            .await?;
        serde_json::from_value(raw).map_err(|e| DashError::Decode(format!("stats model: {e}")))
    }

    pub async fn load_stats(&self, extension: &str) -> Loaded<ExtensionStats> {
        if self.is_mock() {
            debug!(extension = extension, "serving mock stats");
            return Loaded {
                data: mock_stats(&self.publisher, extension),
                source: DataSource::Mock,
                notice: Notice::new(NoticeLevel::Info, MOCK_NOTICE),
            };
        }

        match self.fetch_live_stats(extension).await {
            Ok(data) => Loaded {
                data,
                source: DataSource::Live,
                notice: Notice::new(NoticeLevel::Success, LIVE_NOTICE),
            },
            Err(err) => {
                warn!(error = %err, extension = extension, "stats fetch failed; using mock data");
                MOCK_FALLBACKS.with_label_values(&["stats"]).inc();
                Loaded {
                    data: mock_stats(&self.publisher, extension),
                    source: DataSource::Mock,
                    notice: Notice::new(NoticeLevel::Error, FALLBACK_NOTICE),
                }
            }
        }
    }

    pub async fn load_extensions(&self) -> Loaded<Vec<Extension>> {
        let mock = |level: NoticeLevel, message: &str| Loaded {
            data: mock_extensions(),
            source: DataSource::Mock,
            notice: Notice::new(level, message),
        };

        let client = match &self.client {
            Some(client) if !self.use_mock => client,
            _ => return mock(NoticeLevel::Info, MOCK_NOTICE),
        };

        match client.publisher_extensions(&self.publisher).await {
            Ok(data) => Loaded {
                data,
                source: DataSource::Live,
                notice: Notice::new(NoticeLevel::Success, LIVE_NOTICE),
            },
            Err(err) => {
                warn!(error = %err, "extension listing failed; using mock data");
                MOCK_FALLBACKS.with_label_values(&["extensions"]).inc();
                mock(NoticeLevel::Error, FALLBACK_NOTICE)
            }
        }
    }
}

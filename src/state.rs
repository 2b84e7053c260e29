// Shared application state
//
// Holds the loaded configuration and the statistics source handed to every
// HTTP handler.
//
// Numan Thabit 2025 Nov

use crate::config::AppConfig;
use crate::source::StatsSource;
use crate::transport::MarketplaceClient;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub source: Arc<StatsSource>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = match config.pat() {
            Some(pat) => Some(
                MarketplaceClient::new(
                    config.marketplace_url.clone(),
                    pat,
                    config.request_timeout(),
                )
                .context("initialize Marketplace client")?,
            ),
            None => {
                warn!("VSCODE_MARKETPLACE_PAT not set; proxy endpoints will return 401 and the dashboard serves mock data");
                None
            }
        };

        let source = StatsSource::new(
            client,
            config.publisher.clone(),
            config.use_mock_data,
            config.stats_days,
        );
        info!(
            publisher = %config.publisher,
            marketplace = %config.marketplace_url,
            mock = source.is_mock(),
            "statistics source ready"
        );

        Ok(Self {
            config: Arc::new(config),
            source: Arc::new(source),
        })
    }
}

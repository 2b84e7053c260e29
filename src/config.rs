// Configuration management module
// This file handles loading of configuration settings from built-in
// defaults, an optional dashboard config file and environment variables
//
// Numan Thabit 2025 Nov

use crate::transport::marketplace::is_valid_name;
use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_MARKETPLACE_URL: &str = "https://marketplace.visualstudio.com/";

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub listen_addr: SocketAddr,
    /// Marketplace personal access token, sent as a Basic-auth secret
    pub vscode_marketplace_pat: Option<String>,
    /// Publisher whose extensions are listed
    pub publisher: String,
    /// Extension shown when the request does not name one
    pub default_extension: String,
    /// Marketplace API root, e.g. https://marketplace.visualstudio.com/
    pub marketplace_url: Url,
    /// Serve the static mock dataset instead of calling the Marketplace
    pub use_mock_data: bool,
    /// Number of most recent days shown in the chart and table
    pub stats_days: usize,
    /// Upstream request timeout
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_env(config::Environment::default())
    }

    /// Build from an explicit environment source layered over defaults and
    /// the optional `dashboard.*` file.
    pub fn from_env(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .set_default("listen_addr", "0.0.0.0:8080")?
            .set_default("publisher", "eliostruyf")?
            .set_default("default_extension", "vscode-demo-time")?
            .set_default("marketplace_url", DEFAULT_MARKETPLACE_URL)?
            .set_default("use_mock_data", false)?
            .set_default("stats_days", 30)?
            .set_default("request_timeout_secs", 30)?
            .add_source(config::File::with_name("dashboard").required(false))
            .add_source(env.separator("__").try_parsing(true))
            .build()
            .context("assemble configuration sources")?;

        let mut app: AppConfig = cfg
            .try_deserialize()
            .context("deserialize configuration")?;
        app.normalize()?;
        Ok(app)
    }

    fn normalize(&mut self) -> Result<()> {
        if self
            .vscode_marketplace_pat
            .as_deref()
            .is_some_and(|pat| pat.trim().is_empty())
        {
            self.vscode_marketplace_pat = None;
        }
        ensure!(
            is_valid_name(&self.publisher),
            "publisher {:?} is not a valid Marketplace name",
            self.publisher
        );
        ensure!(
            is_valid_name(&self.default_extension),
            "default_extension {:?} is not a valid Marketplace name",
            self.default_extension
        );
        ensure!(self.stats_days > 0, "stats_days must be positive");
        ensure!(
            self.request_timeout_secs > 0,
            "request_timeout_secs must be positive"
        );
        // Url::join drops the last path segment unless it ends with a slash.
        if !self.marketplace_url.path().ends_with('/') {
            let path = format!("{}/", self.marketplace_url.path());
            self.marketplace_url.set_path(&path);
        }
        Ok(())
    }

    pub fn pat(&self) -> Option<&str> {
        self.vscode_marketplace_pat.as_deref()
    }

    /// Mock mode is forced when there is no credential to call upstream with.
    pub fn mock_mode(&self) -> bool {
        self.use_mock_data || self.pat().is_none()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// VS Code Marketplace transport
// This file implements the authenticated HTTP client for the Marketplace
// statistics and extension query endpoints
//
// Numan Thabit 2025 Nov

use crate::errors::DashError;
use crate::metrics::{REQ_ERRORS, REQ_LATENCY};
use crate::model::Extension;
use crate::transport::query::{ExtensionQuery, QueryResponse};
use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD as B64, Engine as _};
use reqwest::header::{HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const MARKETPLACE_ACCEPT: &str = "application/json;api-version=7.2-preview.1;excludeUrls=true";

const SERVICE: &str = "marketplace";

/// Publisher and extension names become URL path segments.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && name != "."
        && name != ".."
}

/// `Basic base64(":" + pat)`, the empty-username form the Marketplace expects.
pub fn basic_auth(pat: &str) -> String {
    format!("Basic {}", B64.encode(format!(":{pat}")))
}

#[derive(Debug, Clone)]
pub struct MarketplaceClient {
    http: Client,
    base: Url,
    auth: HeaderValue,
}

impl MarketplaceClient {
    pub fn new(base: Url, pat: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .build()
            .context("build HTTP client for Marketplace API")?;

        let mut auth =
            HeaderValue::from_str(&basic_auth(pat)).context("encode Marketplace credential")?;
        auth.set_sensitive(true);

        Ok(Self { http, base, auth })
    }

    pub fn stats_url(
        &self,
        publisher: &str,
        extension: &str,
        aggregate: &str,
        after_date: &str,
    ) -> Result<Url, DashError> {
        for name in [publisher, extension] {
            if !is_valid_name(name) {
                return Err(DashError::InvalidExtension(name.to_string()));
            }
        }
        let mut url = self
            .base
            .join("_apis/gallery/publishers/")
            .map_err(|e| DashError::Transport(format!("stats url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| DashError::Transport("marketplace url cannot be a base".into()))?
            .pop_if_empty()
            .extend([publisher, "extensions", extension, "stats"]);
        url.query_pairs_mut()
            .append_pair("aggregate", aggregate)
            .append_pair("afterDate", after_date);
        Ok(url)
    }

    pub fn query_url(&self) -> Result<Url, DashError> {
        self.base
            .join("_apis/public/gallery/extensionquery")
            .map_err(|e| DashError::Transport(format!("query url: {e}")))
    }

    /// Daily statistics for one extension, returned as the upstream JSON.
    pub async fn extension_stats(
        &self,
        publisher: &str,
        extension: &str,
        aggregate: &str,
        after_date: &str,
    ) -> Result<serde_json::Value, DashError> {
        let url = self.stats_url(publisher, extension, aggregate, after_date)?;
        debug!(url = %url, "fetching extension stats");

        let resp = self.send(self.http.get(url), "stats").await?;
        resp.json().await.map_err(|e| {
            REQ_ERRORS.with_label_values(&[SERVICE, "stats"]).inc();
            DashError::Decode(format!("stats body: {e}"))
        })
    }

    /// First page of the publisher's VS Code extensions.
    pub async fn publisher_extensions(&self, publisher: &str) -> Result<Vec<Extension>, DashError> {
        let url = self.query_url()?;
        let body = ExtensionQuery::for_publisher(publisher);
        debug!(url = %url, publisher = publisher, "querying publisher extensions");

        let resp = self
            .send(self.http.post(url).json(&body), "extensionquery")
            .await?;
        let parsed: QueryResponse = resp.json().await.map_err(|e| {
            REQ_ERRORS
                .with_label_values(&[SERVICE, "extensionquery"])
                .inc();
            DashError::Decode(format!("extensionquery body: {e}"))
        })?;
        Ok(parsed.into_extensions())
    }

    async fn send(&self, req: RequestBuilder, method: &'static str) -> Result<Response, DashError> {
        let _timer = REQ_LATENCY
            .with_label_values(&[SERVICE, method])
            .start_timer();

        let resp = req
            .header(ACCEPT, MARKETPLACE_ACCEPT)
            .header(AUTHORIZATION, self.auth.clone())
            .send()
            .await
            .map_err(|e| {
                REQ_ERRORS.with_label_values(&[SERVICE, method]).inc();
                DashError::Transport(format!("marketplace {method}: {e}"))
            })?;

        let status = resp.status();
        if !status.is_success() {
            REQ_ERRORS.with_label_values(&[SERVICE, method]).inc();
            warn!(method = method, status = %status, "Marketplace request failed");
            return Err(DashError::upstream(status));
        }
        Ok(resp)
    }
}

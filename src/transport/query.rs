// Extension query payloads
// Request and response shapes for the Marketplace extensionquery endpoint
//
// Numan Thabit 2025 Nov

use crate::model::Extension;
use serde::{Deserialize, Serialize};

/// IncludeFiles | ExcludeNonValidated | IncludeInstallationTargets | IncludeStatistics | IncludeLatestVersionOnly
pub const QUERY_FLAGS: u32 = 866;
pub const SORT_BY_INSTALLS: u32 = 4;
pub const PAGE_SIZE: u32 = 50;
pub const ICON_ASSET: &str = "Microsoft.VisualStudio.Services.Icons.Default";
pub const VSCODE_TARGET: &str = "Microsoft.VisualStudio.Code";
/// Exclusion flags the Marketplace web gallery sends with its own queries.
pub const EXCLUDE_FLAGS: &str = "37889";

/// Marketplace filter criterion kinds used by the publisher listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    Target,
    ExcludeWithFlags,
    PublisherName,
}

impl FilterType {
    pub fn code(self) -> u32 {
        match self {
            FilterType::Target => 8,
            FilterType::ExcludeWithFlags => 12,
            FilterType::PublisherName => 18,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub filter_type: u32,
    pub value: String,
}

impl Criterion {
    pub fn new(kind: FilterType, value: impl Into<String>) -> Self {
        Self {
            filter_type: kind.code(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryFilter {
    pub criteria: Vec<Criterion>,
    pub sort_by: u32,
    pub page_size: u32,
    pub page_number: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionQuery {
    pub flags: u32,
    pub filters: Vec<QueryFilter>,
    pub asset_types: Vec<String>,
}

impl ExtensionQuery {
    /// First page of VS Code extensions owned by `publisher`.
    pub fn for_publisher(publisher: &str) -> Self {
        Self {
            flags: QUERY_FLAGS,
            filters: vec![QueryFilter {
                criteria: vec![
                    Criterion::new(FilterType::PublisherName, publisher),
                    Criterion::new(FilterType::Target, VSCODE_TARGET),
                    Criterion::new(FilterType::ExcludeWithFlags, EXCLUDE_FLAGS),
                ],
                sort_by: SORT_BY_INSTALLS,
                page_size: PAGE_SIZE,
                page_number: 1,
            }],
            asset_types: vec![ICON_ASSET.to_string()],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<QueryResult>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryResult {
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

impl QueryResponse {
    /// Extensions of the first result set; absent results mean none.
    pub fn into_extensions(self) -> Vec<Extension> {
        self.results
            .into_iter()
            .next()
            .map(|r| r.extensions)
            .unwrap_or_default()
    }
}

// Transport layer
// Clients for the upstream VS Code Marketplace API
//
// Numan Thabit 2025 Nov

pub mod marketplace;
pub mod query;

pub use marketplace::MarketplaceClient;

// Router module - HTTP surface of the dashboard
// Proxy endpoints for the Marketplace API plus the rendered dashboard
//
// Numan Thabit 2025 Nov

pub mod pages;
pub mod proxy;

#[allow(clippy::module_inception)]
pub mod router;

pub use router::{cors_layer, create_api_router};

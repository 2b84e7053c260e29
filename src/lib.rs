// Library root module for marketplace-dash
// This file defines the public API and module structure for the
// VS Code Marketplace statistics dashboard
//
// Numan Thabit 2025 Nov

pub mod config;
pub mod dashboard;
pub mod errors;
pub mod metrics;
pub mod mock;
pub mod model;
pub mod render;
pub mod router;
pub mod source;
pub mod state;
pub mod transport;

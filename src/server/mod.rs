//! Dashboard and read API server module
//!
//! Provides:
//! - HTML dashboard (/) with a manual refresh link (/refresh)
//! - JSON read API (/api/crypto, /api/news, /api/weather, /api/asset/{slug})
//! - Cycle trigger and status (/api/refresh, /api/status)

#[allow(clippy::module_inception)]
mod server;
pub mod dashboard;
pub mod handlers;
mod types;

pub use server::{build_router, ApiServer};
pub use types::{DashboardQuery, HealthResponse, RefreshResponse, UnavailableResponse};

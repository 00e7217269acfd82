//! Response types for the read API

use crate::services::CycleReport;
use serde::{Deserialize, Serialize};

/// Body of the explicit "no data" responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnavailableResponse {
    pub error: String,
}

impl UnavailableResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Body of `POST /api/refresh`
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub status: String,
    pub report: CycleReport,
}

/// Query of `GET /`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashboardQuery {
    pub refreshed: Option<String>,
}

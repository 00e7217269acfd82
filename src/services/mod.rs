//! Services Layer
//!
//! Logic shared between the scheduler and the HTTP handlers.
//!
//! # Architecture
//!
//! ```text
//! Scheduler ─────┐
//! Startup ───────┼──> FetchService ──> Sources ──> SqliteDb
//! /refresh ──────┘
//!
//! Dashboard / JSON API ──> SnapshotService ──> SqliteDb
//! ```
//!
//! # Services
//!
//! - `FetchService` - Fetch orchestrator, one serialised cycle at a time
//! - `SnapshotService` - Latest stored snapshot for presentation

pub mod fetch_service;
pub mod snapshot_service;

pub use fetch_service::{CycleReport, FetchService, StepOutcome, Trigger};
pub use snapshot_service::{DashboardView, SnapshotService, StatusView};

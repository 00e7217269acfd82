//! Scheduler module
//!
//! Handles scheduled tasks:
//! - Periodic fetch cycle (market, news, weather)

mod fetch_scheduler;

pub use fetch_scheduler::{FetchScheduler, SchedulerHandle};

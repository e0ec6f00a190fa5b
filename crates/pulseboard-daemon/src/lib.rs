//! Pulseboard daemon library
//!
//! Aggregation, refresh and configuration managers, exposed as a library
//! for testing.

pub mod aggregate;
pub mod config;
pub mod event_manager;
pub mod events;
pub mod refresh;

pub use aggregate::{AggregatedIssues, AggregationManager, PlatformError};
pub use config::ConfigManager;
pub use event_manager::EventManager;
pub use events::{RefreshEvent, RefreshEventType};
pub use refresh::{DashboardSnapshot, RefreshError, RefreshManager};

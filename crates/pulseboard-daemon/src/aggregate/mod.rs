pub mod manager;

pub use manager::{AggregatedIssues, AggregationManager, PlatformError};

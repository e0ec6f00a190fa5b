pub mod manager;

pub use manager::{DashboardSnapshot, RefreshError, RefreshManager};

//! Pulseboard core
//!
//! Issue normalization across GitHub, Azure DevOps and Jira, story point
//! estimation and story gap analysis. Everything here is pure and
//! synchronous; fetching lives in `pulseboard-platforms`.

pub mod error;
pub mod estimate;
pub mod gaps;
pub mod models;
pub mod normalize;
pub mod storage;

pub use error::{Error, Result};
pub use estimate::{build_model, build_platform_model, estimate, estimate_with_model};
pub use gaps::analyze_gaps;
pub use normalize::normalize;

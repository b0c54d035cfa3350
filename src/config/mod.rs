//! Configuration module for tierdesk
//!
//! This module contains the application configuration structures and path management.

mod paths;
mod user_config;

pub use paths::Paths;
pub use user_config::UserConfig;

/// Upper bound for a chart target score
pub const MAX_TARGET_SCORE: u32 = 10_000_000;

/// Valid chart level range
pub const MIN_CHART_LEVEL: u32 = 1;
pub const MAX_CHART_LEVEL: u32 = 20;

//! Enums for tierdesk

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AdminError;

/// Chart difficulty type.
///
/// The catalogue uses three-letter codes (`MXM`), the admin chart endpoints
/// expect the long lowercase name (`maximum`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    Novice,
    Advanced,
    Exhaust,
    Maximum,
    Infinite,
    Gravity,
    Heavenly,
    Vivid,
    Exceed,
    Ultimate,
}

impl ChartType {
    pub const ALL: [ChartType; 10] = [
        ChartType::Novice,
        ChartType::Advanced,
        ChartType::Exhaust,
        ChartType::Maximum,
        ChartType::Infinite,
        ChartType::Gravity,
        ChartType::Heavenly,
        ChartType::Vivid,
        ChartType::Exceed,
        ChartType::Ultimate,
    ];

    /// Long name used by the admin chart endpoints
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartType::Novice => "novice",
            ChartType::Advanced => "advanced",
            ChartType::Exhaust => "exhaust",
            ChartType::Maximum => "maximum",
            ChartType::Infinite => "infinite",
            ChartType::Gravity => "gravity",
            ChartType::Heavenly => "heavenly",
            ChartType::Vivid => "vivid",
            ChartType::Exceed => "exceed",
            ChartType::Ultimate => "ultimate",
        }
    }

    /// Three-letter code used by the chart catalogue
    pub fn short_code(&self) -> &'static str {
        match self {
            ChartType::Novice => "NOV",
            ChartType::Advanced => "ADV",
            ChartType::Exhaust => "EXH",
            ChartType::Maximum => "MXM",
            ChartType::Infinite => "INF",
            ChartType::Gravity => "GRV",
            ChartType::Heavenly => "HVN",
            ChartType::Vivid => "VVD",
            ChartType::Exceed => "EXD",
            ChartType::Ultimate => "ULT",
        }
    }
}

impl FromStr for ChartType {
    type Err = AdminError;

    /// Accepts either the short code or the long name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        ChartType::ALL
            .into_iter()
            .find(|t| {
                t.short_code().eq_ignore_ascii_case(needle) || t.as_str().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| AdminError::invalid("type", format!("Unknown chart type: {}", s)))
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_code())
    }
}

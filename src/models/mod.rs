//! Data models for tierdesk
//!
//! Catalogue snapshot, tier structure and the admin request bodies.

pub(crate) mod admin;
mod catalogue;
mod enums;
mod tier;

pub use admin::{
    JacketUpload, LoginErrorResponse, LoginRequest, LoginResponse, MaxSongIdxResponse,
    NewChartDto, NewSongDto, UpdateChartDto, VersionResponse,
};
pub use catalogue::{ChartData, ChartMetaResponse, MetaData, RankMetadata, SongData, TypeMetadata};
pub use enums::ChartType;
pub use tier::{ChartRef, IncomingPart, Part, Tier, TierDataResponse, TierPartWire};

use serde::{Deserialize, Deserializer};

/// Read `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep `null` distinct from a missing field: absent -> `None`,
/// `null` -> `Some(None)`. Pair with `#[serde(default)]`.
pub(crate) fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

//! Chart catalogue model (`GET /chart/meta`)

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Radar (chart feel) values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RadarData {
    pub idx: u32,
    pub chart_idx: u32,
    pub notes: u32,
    pub peak: u32,
    pub tsumami: u32,
    pub tricky: u32,
    pub handtrip: u32,
    pub onehand: u32,
}

/// One chart (difficulty) of a song
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartData {
    pub chart_idx: u32,
    pub song_idx: u32,
    pub level: u32,
    /// Three-letter type code, e.g. `MXM`
    #[serde(rename = "type")]
    pub chart_type: String,
    pub jacket: String,
    pub effector: String,
    pub illustrator: String,
    pub max_exscore: u32,
    pub max_chain: u32,
    pub chip_count: u32,
    pub hold_count: u32,
    pub tsumami_count: u32,
    pub radar: RadarData,
}

/// A song with its charts
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SongData {
    pub song_idx: u32,
    pub title: String,
    pub artist: String,
    pub ascii: String,
    pub ascii_title: String,
    pub ascii_artist: String,
    pub title_yomigana: String,
    pub artist_yomigana: String,
    pub version: u32,
    pub main_bpm: Option<f64>,
    pub bpm: String,
    pub genre_txt: String,
    pub date: String,
    pub konaste: bool,
    /// Missing or null chart arrays read as empty
    #[serde(deserialize_with = "null_as_default")]
    pub chart: Vec<ChartData>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypeMetadata {
    pub type_name: String,
    pub type_short_name: String,
    pub color: u32,
}

/// Clear-type (rank) metadata; `targetClearType` indexes this list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idx: Option<u32>,
    pub rank_name: String,
    pub rank_filter_name: String,
    pub rank_short_name: String,
    pub color: u32,
}

impl RankMetadata {
    /// Short label, falling back to the full name
    pub fn label(&self) -> &str {
        if self.rank_short_name.is_empty() {
            &self.rank_name
        } else {
            &self.rank_short_name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoreMetadata {
    pub score_name: String,
    pub big: u32,
    pub color: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VersionMetadata {
    pub version_name: String,
    pub color: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaData {
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub chart_type: Vec<TypeMetadata>,
    #[serde(deserialize_with = "null_as_default")]
    pub rank: Vec<RankMetadata>,
    #[serde(deserialize_with = "null_as_default")]
    pub score: Vec<ScoreMetadata>,
    #[serde(deserialize_with = "null_as_default")]
    pub version: Vec<VersionMetadata>,
}

/// Full catalogue snapshot as returned by the backend
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChartMetaResponse {
    pub meta_data: MetaData,
    /// Null songs are tolerated here and dropped when indexing
    #[serde(deserialize_with = "null_as_default")]
    pub chart_data: Vec<Option<SongData>>,
}

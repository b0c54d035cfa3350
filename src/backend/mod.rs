//! Persistence adapter for the tier-list backend service

mod client;
mod session;

pub use client::HttpBackend;
pub use session::Session;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    ChartMetaResponse, JacketUpload, LoginRequest, LoginResponse, NewChartDto, NewSongDto, Part,
    UpdateChartDto, VersionResponse,
};

/// Everything tierdesk needs from the backend. Every call except `login`
/// is authenticated with the session's bearer token.
#[async_trait]
pub trait TierBackend: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse>;

    /// `GET /chart/meta`
    async fn load_catalogue(&self, session: &Session) -> Result<ChartMetaResponse>;

    /// `GET /playdata/tier`
    async fn load_tier_parts(&self, session: &Session) -> Result<Vec<Part>>;

    /// `PUT /playdata/tier` with one part in wire shape
    async fn save_tier_part(&self, session: &Session, part: &Part) -> Result<Value>;

    async fn add_song(&self, session: &Session, song: &NewSongDto) -> Result<Value>;

    async fn max_song_idx(&self, session: &Session) -> Result<u32>;

    async fn upload_jacket(&self, session: &Session, upload: JacketUpload) -> Result<()>;

    /// Expects the long chart type name (`maximum`, not `MXM`)
    async fn add_chart(&self, session: &Session, chart: &NewChartDto) -> Result<Value>;

    async fn update_chart(&self, session: &Session, chart: &UpdateChartDto) -> Result<Value>;

    async fn chart_version(&self, session: &Session) -> Result<VersionResponse>;

    async fn update_chart_version(&self, session: &Session, version: &str) -> Result<Value>;
}

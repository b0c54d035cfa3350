//! reqwest implementation of the backend adapter

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Session, TierBackend};
use crate::config::UserConfig;
use crate::error::{AdminError, Result};
use crate::models::{
    ChartMetaResponse, JacketUpload, LoginErrorResponse, LoginRequest, LoginResponse,
    MaxSongIdxResponse, NewChartDto, NewSongDto, Part, TierDataResponse, TierPartWire,
    UpdateChartDto, VersionResponse,
};

/// HTTP client for the backend REST service
pub struct HttpBackend {
    client: Client,
    base_url: String,
    soft_not_found: bool,
}

impl HttpBackend {
    pub fn new(config: &UserConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.backend_base().to_string(),
            soft_not_found: config.soft_not_found_success,
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn authed(&self, request: RequestBuilder, session: &Session) -> Result<RequestBuilder> {
        Ok(request.bearer_auth(session.current_token()?))
    }

    async fn get_json<T: DeserializeOwned>(&self, session: &Session, endpoint: &str) -> Result<T> {
        let request = self.authed(self.client.get(self.url(endpoint)), session)?;
        let response = check_status(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Send an admin mutation. 404 means the backend lacks the endpoint.
    async fn send_admin(&self, request: RequestBuilder, endpoint: &str) -> Result<Value> {
        let response = request.send().await?;
        if let Some(value) = admin_not_found(response.status(), endpoint, self.soft_not_found)? {
            return Ok(value);
        }
        let response = check_status(response).await?;
        read_optional_json(response).await
    }
}

/// 404 from an admin endpoint: `NotImplemented`, or a null success when
/// `soft_not_found` is set. Any other status yields `None`.
fn admin_not_found(status: StatusCode, endpoint: &str, soft_not_found: bool) -> Result<Option<Value>> {
    if status != StatusCode::NOT_FOUND {
        return Ok(None);
    }
    if soft_not_found {
        warn!("{} answered 404; treating as success", endpoint);
        return Ok(Some(Value::Null));
    }
    Err(AdminError::NotImplemented(endpoint.to_string()))
}

/// Map a non-2xx response to `Network` with its body
async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!("Backend error {}: {}", status, body);
    Err(AdminError::Network {
        status: status.as_u16(),
        body,
    })
}

// admin endpoints may answer with an empty body
async fn read_optional_json(response: Response) -> Result<Value> {
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
}

fn login_failure(status: u16, body: &str) -> AdminError {
    let message = serde_json::from_str::<LoginErrorResponse>(body)
        .ok()
        .map(|e| e.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "Login failed".to_string());
    AdminError::Network {
        status,
        body: message,
    }
}

#[async_trait]
impl TierBackend for HttpBackend {
    async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(login_failure(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }

    async fn load_catalogue(&self, session: &Session) -> Result<ChartMetaResponse> {
        let catalogue: ChartMetaResponse = self.get_json(session, "/chart/meta").await?;
        info!("Fetched catalogue with {} songs", catalogue.chart_data.len());
        Ok(catalogue)
    }

    async fn load_tier_parts(&self, session: &Session) -> Result<Vec<Part>> {
        let response: TierDataResponse = self.get_json(session, "/playdata/tier").await?;
        Ok(response.data.into_iter().map(Part::from).collect())
    }

    async fn save_tier_part(&self, session: &Session, part: &Part) -> Result<Value> {
        let request = self
            .authed(self.client.put(self.url("/playdata/tier")), session)?
            .json(&TierPartWire::from(part));
        let response = check_status(request.send().await?).await?;
        info!("Saved part {} ({})", part.part_idx, part.part_name);
        read_optional_json(response).await
    }

    async fn add_song(&self, session: &Session, song: &NewSongDto) -> Result<Value> {
        let request = self
            .authed(self.client.post(self.url("/admin/song")), session)?
            .json(song);
        self.send_admin(request, "/admin/song").await
    }

    async fn max_song_idx(&self, session: &Session) -> Result<u32> {
        let response: MaxSongIdxResponse = self.get_json(session, "/admin/songIdx").await?;
        Ok(response.max_song_idx)
    }

    async fn upload_jacket(&self, session: &Session, upload: JacketUpload) -> Result<()> {
        debug!(
            "Uploading jacket {} ({} bytes) for song {} {}",
            upload.file_name,
            upload.bytes.len(),
            upload.song_idx,
            upload.chart_type
        );
        let image = multipart::Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new()
            .text("songIdx", upload.song_idx)
            .text("type", upload.chart_type)
            .part("image", image);

        let request = self
            .authed(self.client.post(self.url("/admin/jacket")), session)?
            .multipart(form);
        self.send_admin(request, "/admin/jacket").await?;
        Ok(())
    }

    async fn add_chart(&self, session: &Session, chart: &NewChartDto) -> Result<Value> {
        let request = self
            .authed(self.client.post(self.url("/admin/chart")), session)?
            .json(chart);
        self.send_admin(request, "/admin/chart").await
    }

    async fn update_chart(&self, session: &Session, chart: &UpdateChartDto) -> Result<Value> {
        let request = self
            .authed(self.client.put(self.url("/admin/chart")), session)?
            .json(chart);
        self.send_admin(request, "/admin/chart").await
    }

    async fn chart_version(&self, session: &Session) -> Result<VersionResponse> {
        self.get_json(session, "/chart/version").await
    }

    async fn update_chart_version(&self, session: &Session, version: &str) -> Result<Value> {
        let request = self
            .authed(self.client.put(self.url("/chart/version")), session)?
            .query(&[("version", version)]);
        let response = check_status(request.send().await?).await?;
        info!("Chart version set to {}", version);
        read_optional_json(response).await
    }
}

//! Backend proxy routes
//!
//! Each route authenticates with the caller's bearer token, validates the
//! body where a form used to, and forwards to the backend.

use actix_multipart::Multipart;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use futures::StreamExt;
use serde::Deserialize;
use tracing::info;

use super::{bearer_session, AppState};
use crate::core::export::check_part;
use crate::core::validation::{
    prepare_new_chart, validate_jacket, validate_new_song, validate_update_chart, validate_version,
};
use crate::error::{AdminError, Result};
use crate::models::{
    IncomingPart, JacketUpload, NewChartDto, NewSongDto, Part, TierDataResponse, TierPartWire,
    UpdateChartDto,
};

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionBody {
    version: Option<String>,
}

#[get("/chart-meta")]
pub async fn get_chart_meta(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let catalogue = state.backend.load_catalogue(&session).await?;
    Ok(HttpResponse::Ok().json(catalogue))
}

#[get("/tier-data")]
pub async fn get_tier_data(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let parts = state.backend.load_tier_parts(&session).await?;
    Ok(HttpResponse::Ok().json(TierDataResponse {
        data: parts.iter().map(TierPartWire::from).collect(),
    }))
}

/// accepts the wire shape or the flat part shape and always forwards the wire shape;
/// targets are checked against the rank table before forwarding
#[put("/tier-data")]
pub async fn put_tier_data(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<IncomingPart>,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let rank_count = match state.editor.catalogue() {
        Some(catalogue) => catalogue.rank_count(),
        None => state.backend.load_catalogue(&session).await?.meta_data.rank.len(),
    };
    let mut part: Part = body.into_inner().into();
    check_part(&mut part, Some(rank_count))?;
    let result = state.backend.save_tier_part(&session, &part).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[post("/admin/song")]
pub async fn add_song(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewSongDto>,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let max_song_idx = state.backend.max_song_idx(&session).await?;
    let catalogue = state.editor.catalogue();
    validate_new_song(&body, max_song_idx, catalogue.as_deref())?;

    let result = state.backend.add_song(&session, &body).await?;
    info!("Added song {} ({})", body.songid, body.title);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": result })))
}

#[get("/admin/songIdx")]
pub async fn get_max_song_idx(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let max_song_idx = state.backend.max_song_idx(&session).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "maxSongIdx": max_song_idx })))
}

/// multipart fields: songIdx, type, image
#[post("/admin/jacket")]
pub async fn upload_jacket(
    state: web::Data<AppState>,
    req: HttpRequest,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;

    let mut upload = JacketUpload {
        song_idx: String::new(),
        chart_type: String::new(),
        file_name: "jacket".to_string(),
        content_type: String::new(),
        bytes: Vec::new(),
    };

    while let Some(field) = payload.next().await {
        let mut field =
            field.map_err(|e| AdminError::invalid("image", format!("Malformed upload: {}", e)))?;
        let disp = field.content_disposition().clone();
        let name = disp.get_name().map(|s| s.to_string()).unwrap_or_default();

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk
                .map_err(|e| AdminError::invalid("image", format!("Upload interrupted: {}", e)))?;
            bytes.extend_from_slice(&data);
        }

        match name.as_str() {
            "songIdx" => upload.song_idx = String::from_utf8_lossy(&bytes).trim().to_string(),
            "type" => upload.chart_type = String::from_utf8_lossy(&bytes).trim().to_string(),
            "image" => {
                if let Some(file_name) = disp.get_filename() {
                    upload.file_name = file_name.to_string();
                }
                upload.content_type = field.content_type().map(|ct| ct.to_string()).unwrap_or_default();
                upload.bytes = bytes;
            }
            _ => {}
        }
    }

    validate_jacket(&upload)?;
    if upload.content_type.is_empty() {
        upload.content_type = mime_guess::from_path(&upload.file_name)
            .first_or_octet_stream()
            .to_string();
    }

    state.backend.upload_jacket(&session, upload).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[post("/admin/chart")]
pub async fn add_chart(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<NewChartDto>,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let chart = prepare_new_chart(&body)?;
    let result = state.backend.add_chart(&session, &chart).await?;
    info!("Added {} chart to song {}", chart.chart_type, chart.song_idx);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": result })))
}

#[put("/admin/chart")]
pub async fn update_chart(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<UpdateChartDto>,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    validate_update_chart(&body)?;
    let result = state.backend.update_chart(&session, &body).await?;
    info!("Updated chart {}", body.chart_idx);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": result })))
}

#[get("/chart/version")]
pub async fn get_chart_version(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let version = state.backend.chart_version(&session).await?;
    Ok(HttpResponse::Ok().json(version))
}

/// version comes from `?version=` or a `{version}` body
#[put("/chart/version")]
pub async fn put_chart_version(
    state: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<VersionQuery>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let from_body = || {
        serde_json::from_slice::<VersionBody>(&body)
            .ok()
            .and_then(|b| b.version)
    };
    let raw = query
        .into_inner()
        .version
        .or_else(from_body)
        .ok_or_else(|| AdminError::invalid("version", "Version parameter is required"))?;
    let version = validate_version(&raw)?;

    let result = state.backend.update_chart_version(&session, version).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true, "version": version, "data": result })))
}

/// configure proxy routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(get_chart_meta)
        .service(get_tier_data)
        .service(put_tier_data)
        .service(add_song)
        .service(get_max_song_idx)
        .service(upload_jacket)
        .service(add_chart)
        .service(update_chart)
        .service(get_chart_version)
        .service(put_chart_version);
}

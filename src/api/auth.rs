//! authentication api routes

use actix_web::{post, web, HttpResponse};

use super::AppState;
use crate::error::{AdminError, Result};
use crate::models::LoginRequest;

/// login endpoint, exchanges admin credentials for a backend access token
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    let credentials = body.into_inner();
    if credentials.id.trim().is_empty() || credentials.pw.is_empty() {
        return Err(AdminError::invalid("id", "id and pw are required"));
    }

    let response = state.backend.login(&credentials).await?;
    tracing::info!("Admin login for {}", credentials.id);
    Ok(HttpResponse::Ok().json(response))
}

/// configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(login);
}

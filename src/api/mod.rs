//! REST API routes for tierdesk
//!
//! `/api/auth` and the proxy routes forward to the backend with the
//! caller's bearer token. `/api/editor` works on the server-held workspace.

pub mod auth;
pub mod editor;
pub mod proxy;

use std::sync::Arc;

use actix_web::{web, HttpRequest};

use crate::backend::{Session, TierBackend};
use crate::config::UserConfig;
use crate::error::{AdminError, Result};
use crate::stores::EditorStore;

/// Shared state handed to every handler through `web::Data`
pub struct AppState {
    pub backend: Arc<dyn TierBackend>,
    pub editor: EditorStore,
    pub config: UserConfig,
}

impl AppState {
    pub fn new(backend: Arc<dyn TierBackend>, config: UserConfig) -> Self {
        Self {
            backend,
            editor: EditorStore::new(),
            config,
        }
    }
}

/// Configure all API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Auth routes
            .service(web::scope("/auth").configure(auth::configure))
            // Editor workspace routes
            .service(web::scope("/editor").configure(editor::configure))
            // Backend proxy routes
            .configure(proxy::configure),
    );
}

/// Request-scoped session from the `Authorization: Bearer` header
pub(crate) fn bearer_session(req: &HttpRequest) -> Result<Session> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .ok_or(AdminError::AuthenticationRequired)?;

    match header.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Session::from_bearer(token.trim())),
        _ => Err(AdminError::AuthenticationRequired),
    }
}

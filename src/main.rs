//! tierdesk - admin service and CLI for a rhythm-game chart tier list
//!
//! Serves the backend proxy and the tier editor API, or runs one headless
//! command against the backend.

mod api;
mod backend;
mod config;
mod core;
mod error;
mod models;
mod stores;
mod utils;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::backend::{HttpBackend, Session, TierBackend};
use crate::config::{Paths, UserConfig};

/// tierdesk - tier list admin
#[derive(Parser, Debug)]
#[command(name = "tierdesk")]
#[command(version)]
#[command(about = "Curate a rhythm-game chart tier list against its backend service")]
struct Args {
    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 1971)]
    port: u16,

    /// Enable debug mode
    #[arg(long)]
    debug: bool,

    /// Path to config directory
    #[arg(long)]
    config: Option<PathBuf>,

    /// Backend base url, overrides settings.json
    #[arg(long)]
    backend_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Log in and store the access token
    Login {
        #[arg(long)]
        id: String,
        /// Prompted for when omitted
        #[arg(long)]
        pw: Option<String>,
    },
    /// Forget the stored access token
    Logout,
    /// Search the chart catalogue
    Search {
        query: String,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export tier parts as JSON files
    Export {
        #[arg(long)]
        part: Option<u32>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Save a part file to the backend
    Push { file: PathBuf },
    /// Print tier list statistics
    Stats,
    /// Show or set the chart data version
    Version {
        #[arg(long)]
        set: Option<String>,
    },
    /// Upload a jacket image for a chart
    Jacket {
        #[arg(long)]
        song_idx: String,
        #[arg(long = "type")]
        chart_type: String,
        #[arg(long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("{},hyper=warn", log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let paths = Paths::init(args.config)?;
    info!("Config directory: {:?}", paths.config_dir());

    let mut config = UserConfig::load()?;
    if let Some(url) = args.backend_url {
        config.backend_url = url;
    }
    info!("Backend: {}", config.backend_base());

    let backend = HttpBackend::new(&config).context("Failed to build backend client")?;

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => start_tierdesk(args.host, args.port, backend, config).await,
        command => run_command(command, &backend, &config).await,
    }
}

async fn run_command(command: Command, backend: &dyn TierBackend, config: &UserConfig) -> Result<()> {
    use crate::utils::tools;

    let mut session = Session::load(Paths::get()?.session_path());
    match command {
        Command::Serve => unreachable!("serve is handled by main"),
        Command::Login { id, pw } => tools::login(backend, &mut session, &id, pw).await,
        Command::Logout => tools::logout(&mut session),
        Command::Search { query, limit } => {
            let limit = limit.unwrap_or(config.search_page_size);
            tools::search(backend, &session, &query, limit).await
        }
        Command::Export { part, out } => tools::export(backend, &session, part, out).await,
        Command::Push { file } => tools::push(backend, &session, &file).await,
        Command::Stats => tools::stats(backend, &session).await,
        Command::Version { set } => tools::version(backend, &session, set).await,
        Command::Jacket {
            song_idx,
            chart_type,
            file,
        } => tools::jacket(backend, &session, &song_idx, &chart_type, &file).await,
    }
}

async fn start_tierdesk(host: String, port: u16, backend: HttpBackend, config: UserConfig) -> Result<()> {
    use actix_cors::Cors;
    use actix_web::{middleware, web, App, HttpServer};

    let backend: Arc<dyn TierBackend> = Arc::new(backend);
    let state = web::Data::new(api::AppState::new(backend, config));

    let addr = format!("{}:{}", host, port);
    info!("Server listening on http://{}", addr);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(state.clone())
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(api::configure)
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await?;

    Ok(())
}

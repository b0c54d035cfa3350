//! CLI tools
//!
//! Headless counterparts of the editor screens. Each command talks to the
//! backend with the persisted session.

use anyhow::{bail, Context, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::backend::{Session, TierBackend};
use crate::config::Paths;
use crate::core::export::{read_part, write_part};
use crate::core::validation::{validate_jacket, validate_version};
use crate::core::{SearchLib, TierStats};
use crate::models::{JacketUpload, LoginRequest};
use crate::stores::ChartIndex;
use crate::utils::colors::difficulty_color;

pub async fn login(
    backend: &dyn TierBackend,
    session: &mut Session,
    id: &str,
    pw: Option<String>,
) -> Result<()> {
    let pw = match pw {
        Some(pw) => pw,
        None => prompt_password("Password: ")?,
    };
    if pw.is_empty() {
        bail!("Password cannot be empty");
    }

    let credentials = LoginRequest {
        id: id.to_string(),
        pw,
    };
    session
        .login(backend, &credentials)
        .await
        .context("Login failed")?;
    println!("Logged in as {}", id);
    Ok(())
}

pub fn logout(session: &mut Session) -> Result<()> {
    if !session.is_logged_in() {
        println!("Not logged in");
        return Ok(());
    }
    session.logout()?;
    println!("Logged out");
    Ok(())
}

pub async fn search(
    backend: &dyn TierBackend,
    session: &Session,
    query: &str,
    limit: usize,
) -> Result<()> {
    let index = ChartIndex::build(backend.load_catalogue(session).await?);
    let results = SearchLib::search_charts(&index, query);

    for entry in results.iter().take(limit) {
        println!(
            "{:>6}  {:<4} {:>2}  {}  {} - {}",
            entry.chart.chart_idx,
            entry.chart.chart_type,
            entry.chart.level,
            difficulty_color(&entry.chart.chart_type, &index.meta().chart_type),
            entry.song.title,
            entry.song.artist
        );
    }
    println!("{} of {} charts", results.len().min(limit), results.len());
    Ok(())
}

/// Export one part, or every part, as JSON files
pub async fn export(
    backend: &dyn TierBackend,
    session: &Session,
    part_idx: Option<u32>,
    out: Option<PathBuf>,
) -> Result<()> {
    let out = match out {
        Some(dir) => dir,
        None => Paths::get()?.exports_dir(),
    };
    let parts = backend.load_tier_parts(session).await?;
    let selected: Vec<_> = parts
        .iter()
        .filter(|p| part_idx.map_or(true, |idx| p.part_idx == idx))
        .collect();
    if selected.is_empty() {
        bail!("No tier part matches {:?}", part_idx);
    }

    for part in selected {
        let path = write_part(part, &out)?;
        println!("{} -> {}", part.part_name, path.display());
    }
    Ok(())
}

/// Upload a part file to the backend, checked against the current rank table
pub async fn push(backend: &dyn TierBackend, session: &Session, file: &Path) -> Result<()> {
    let rank_count = backend.load_catalogue(session).await?.meta_data.rank.len();
    let part = read_part(file, Some(rank_count))
        .with_context(|| format!("Failed to read {}", file.display()))?;
    backend.save_tier_part(session, &part).await?;
    println!(
        "Saved part {} ({}) with {} charts",
        part.part_idx,
        part.part_name,
        part.chart_count()
    );
    Ok(())
}

pub async fn stats(backend: &dyn TierBackend, session: &Session) -> Result<()> {
    let parts = backend.load_tier_parts(session).await?;
    let stats = TierStats::collect(&parts);

    println!("Tier parts:     {}", stats.total_tier_parts);
    println!("Tiers:          {}", stats.total_tiers);
    println!("Charts:         {}", stats.total_charts);
    println!("Average target: {}", stats.average_target_score);
    for bucket in &stats.tier_distribution {
        println!("  {:<20} {}", bucket.tier, bucket.charts);
    }
    Ok(())
}

pub async fn version(backend: &dyn TierBackend, session: &Session, set: Option<String>) -> Result<()> {
    if let Some(raw) = set {
        let version = validate_version(&raw)?;
        backend.update_chart_version(session, version).await?;
        println!("Chart version set to {}", version);
    } else {
        let current = backend.chart_version(session).await?;
        println!("{}", current.version);
    }
    Ok(())
}

pub async fn jacket(
    backend: &dyn TierBackend,
    session: &Session,
    song_idx: &str,
    chart_type: &str,
    file: &Path,
) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let upload = JacketUpload {
        song_idx: song_idx.to_string(),
        chart_type: chart_type.to_string(),
        file_name: file
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "jacket".to_string()),
        content_type: mime_guess::from_path(file)
            .first_or_octet_stream()
            .to_string(),
        bytes,
    };
    validate_jacket(&upload)?;
    backend.upload_jacket(session, upload).await?;
    println!("Uploaded jacket for song {} ({})", song_idx, chart_type);
    Ok(())
}

fn prompt_password(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut pw = String::new();
    io::stdin().read_line(&mut pw)?;
    Ok(pw.trim().to_string())
}

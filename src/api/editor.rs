//! Editor workspace routes
//!
//! The workspace holds one catalogue snapshot and the tier parts being
//! edited. Structure edits happen in memory; only `save` talks to the
//! backend.

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{delete, get, patch, post, put, web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{bearer_session, AppState};
use crate::core::export::{export_file_name, export_part, import_part};
use crate::core::validation::{parse_target_clear_type, parse_target_score, FieldInput};
use crate::core::{
    apply_drag, apply_drag_keys, ChartRefUpdate, DragKey, DropTarget, NewChartRef, SearchLib,
    SlotPosition, TierStats,
};
use crate::error::{AdminError, Result};
use crate::models::{double_option, ChartRef, MetaData, Part};
use crate::stores::{ChartEntry, ChartIndex, ResolvedChart};
use crate::utils::colors::{difficulty_color, rank_color, rank_entry};

#[derive(Debug, Deserialize)]
pub struct ConfirmQuery {
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamePartBody {
    pub part_name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameTierBody {
    pub tier: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddChartItem {
    pub chart_idx: u32,
    #[serde(default)]
    pub target_score: Option<FieldInput>,
}

/// One chart or a batch
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AddChartsBody {
    Many { charts: Vec<AddChartItem> },
    One(AddChartItem),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChartRefBody {
    #[serde(default, deserialize_with = "double_option")]
    pub target_score: Option<Option<FieldInput>>,
    #[serde(default, deserialize_with = "double_option")]
    pub target_clear_type: Option<Option<FieldInput>>,
}

/// A drag either as front-end row keys or as explicit positions
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DragBody {
    #[serde(rename_all = "camelCase")]
    Keys {
        active_id: String,
        #[serde(default)]
        over_id: Option<String>,
    },
    Positions {
        from: SlotPosition,
        #[serde(default)]
        to: Option<SlotPosition>,
    },
}

/// Song and chart fields shown for a catalogue chart
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSummary {
    pub song_idx: u32,
    pub title: String,
    pub artist: String,
    pub chart_idx: u32,
    #[serde(rename = "type")]
    pub chart_type: String,
    pub level: u32,
    pub color: String,
}

impl ChartSummary {
    fn from_entry(entry: &ChartEntry<'_>, meta: &MetaData) -> Self {
        Self {
            song_idx: entry.song.song_idx,
            title: entry.song.title.clone(),
            artist: entry.song.artist.clone(),
            chart_idx: entry.chart.chart_idx,
            chart_type: entry.chart.chart_type.clone(),
            level: entry.chart.level,
            color: difficulty_color(&entry.chart.chart_type, &meta.chart_type),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ChartView {
    Found(ChartSummary),
    #[serde(rename_all = "camelCase")]
    Missing { chart_idx: u32, label: String },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRow {
    /// Drag key for this row
    pub key: String,
    pub index: usize,
    pub target_score: Option<u32>,
    pub target_clear_type: Option<u32>,
    pub clear_type_label: Option<String>,
    pub clear_type_color: Option<String>,
    pub chart: ChartView,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierView {
    pub tier_idx: u32,
    pub tier: String,
    /// Drop target key for appending to this tier
    pub drop_key: String,
    pub chart_list: Vec<ChartRow>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartView {
    pub part_idx: u32,
    pub part_name: String,
    pub description: String,
    pub chart_count: usize,
    pub tier_list: Vec<TierView>,
}

fn chart_row(tier_idx: u32, index: usize, chart: &ChartRef, catalogue: Option<&ChartIndex>) -> ChartRow {
    let view = match catalogue.map(|c| (c.resolve(chart.chart_idx), c.meta())) {
        Some((ResolvedChart::Found(entry), meta)) => {
            ChartView::Found(ChartSummary::from_entry(&entry, meta))
        }
        _ => ChartView::Missing {
            chart_idx: chart.chart_idx,
            label: "Chart not found".to_string(),
        },
    };
    let ranks = catalogue.map(|c| c.meta().rank.as_slice()).unwrap_or_default();
    let clear = chart.target_clear_type;

    ChartRow {
        key: DragKey {
            tier_idx,
            chart_idx: chart.chart_idx,
            index,
        }
        .to_string(),
        index,
        target_score: chart.target_score,
        target_clear_type: clear,
        clear_type_label: clear
            .and_then(|c| rank_entry(c, ranks))
            .map(|r| r.label().to_string()),
        clear_type_color: clear.map(|c| rank_color(c, ranks)),
        chart: view,
    }
}

fn part_view(part: &Part, catalogue: Option<&ChartIndex>) -> PartView {
    PartView {
        part_idx: part.part_idx,
        part_name: part.part_name.clone(),
        description: part.description.clone(),
        chart_count: part.chart_count(),
        tier_list: part
            .tier_list
            .iter()
            .map(|tier| TierView {
                tier_idx: tier.tier_idx,
                tier: tier.tier.clone(),
                drop_key: format!("tier-{}", tier.tier_idx),
                chart_list: tier
                    .chart_list
                    .iter()
                    .enumerate()
                    .map(|(i, c)| chart_row(tier.tier_idx, i, c, catalogue))
                    .collect(),
            })
            .collect(),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Load the catalogue and every tier part from the backend into the workspace
#[post("/load")]
pub async fn load_workspace(state: web::Data<AppState>, req: HttpRequest) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let (catalogue, parts) = futures::try_join!(
        state.backend.load_catalogue(&session),
        state.backend.load_tier_parts(&session)
    )?;

    let index = ChartIndex::build(catalogue);
    let charts = index.len();
    let part_count = parts.len();
    state.editor.replace(index, parts);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "charts": charts,
        "parts": part_count,
    })))
}

#[get("/parts")]
pub async fn list_parts(state: web::Data<AppState>) -> HttpResponse {
    let parts: Vec<serde_json::Value> = state.editor.read(|ws| {
        ws.book
            .parts()
            .iter()
            .map(|p| {
                serde_json::json!({
                    "partIdx": p.part_idx,
                    "partName": p.part_name,
                    "description": p.description,
                    "tierCount": p.tier_list.len(),
                    "chartCount": p.chart_count(),
                })
            })
            .collect()
    });
    HttpResponse::Ok().json(parts)
}

#[post("/parts")]
pub async fn add_part(state: web::Data<AppState>) -> HttpResponse {
    let part_idx = state.editor.write(|ws| ws.book.add_part());
    HttpResponse::Created().json(serde_json::json!({ "partIdx": part_idx }))
}

/// body is an exported part file, wire or flat shape
#[post("/parts/import")]
pub async fn import(state: web::Data<AppState>, body: String) -> Result<HttpResponse> {
    let (part_idx, replaced) = state.editor.write(|ws| -> Result<_> {
        let part = import_part(&body, ws.rank_count())?;
        let part_idx = part.part_idx;
        Ok((part_idx, ws.book.upsert_part(part)))
    })?;
    info!("Imported part {} (replaced: {})", part_idx, replaced);
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "partIdx": part_idx,
        "replaced": replaced,
    })))
}

#[get("/parts/{part_idx}")]
pub async fn get_part(state: web::Data<AppState>, path: web::Path<u32>) -> Result<HttpResponse> {
    let part_idx = path.into_inner();
    let view = state.editor.read(|ws| {
        ws.book
            .part(part_idx)
            .map(|p| part_view(p, ws.catalogue.as_deref()))
    });
    view.map(|v| HttpResponse::Ok().json(v))
        .ok_or_else(|| AdminError::NotFound(format!("part {}", part_idx)))
}

/// blank values are ignored
#[put("/parts/{part_idx}")]
pub async fn rename_part(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    body: web::Json<RenamePartBody>,
) -> Result<HttpResponse> {
    let part_idx = path.into_inner();
    let name = non_blank(body.part_name.as_deref());
    let description = non_blank(body.description.as_deref());

    state.editor.write(|ws| {
        if ws.book.part(part_idx).is_none() {
            return Err(AdminError::NotFound(format!("part {}", part_idx)));
        }
        ws.book.rename_part(part_idx, name, description);
        Ok(())
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[delete("/parts/{part_idx}")]
pub async fn remove_part(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    query: web::Query<ConfirmQuery>,
) -> Result<HttpResponse> {
    let part_idx = path.into_inner();
    let removed = state.editor.write(|ws| {
        let chart_count = ws
            .book
            .part(part_idx)
            .ok_or_else(|| AdminError::NotFound(format!("part {}", part_idx)))?
            .chart_count();
        if chart_count > 0 && !query.confirm && ws.book.parts().len() > 1 {
            return Err(AdminError::ConfirmationRequired {
                kind: "Part",
                chart_count,
            });
        }
        ws.book.remove_part(part_idx)
    })?;
    info!("Removed part {} ({})", removed.part_idx, removed.part_name);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed": removed.part_idx })))
}

#[post("/parts/{part_idx}/tiers")]
pub async fn add_tier(state: web::Data<AppState>, path: web::Path<u32>) -> Result<HttpResponse> {
    let tier_idx = state.editor.with_part_mut(path.into_inner(), |p| Ok(p.add_tier()))?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "tierIdx": tier_idx })))
}

#[put("/parts/{part_idx}/tiers/{tier_idx}")]
pub async fn rename_tier(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32)>,
    body: web::Json<RenameTierBody>,
) -> Result<HttpResponse> {
    let (part_idx, tier_idx) = path.into_inner();
    let name = non_blank(Some(&body.tier))
        .ok_or_else(|| AdminError::invalid("tier", "Tier name cannot be empty"))?;
    state
        .editor
        .with_part_mut(part_idx, |p| p.rename_tier(tier_idx, name))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "success": true })))
}

#[delete("/parts/{part_idx}/tiers/{tier_idx}")]
pub async fn remove_tier(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32)>,
    query: web::Query<ConfirmQuery>,
) -> Result<HttpResponse> {
    let (part_idx, tier_idx) = path.into_inner();
    let removed = state.editor.with_part_mut(part_idx, |p| {
        let chart_count = p
            .tier(tier_idx)
            .ok_or_else(|| AdminError::NotFound(format!("tier {}", tier_idx)))?
            .len();
        if chart_count > 0 && !query.confirm && p.tier_list.len() > 1 {
            return Err(AdminError::ConfirmationRequired {
                kind: "Tier",
                chart_count,
            });
        }
        p.remove_tier(tier_idx)
    })?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed": removed.tier_idx })))
}

/// targetScore outside 0..=10_000_000 or not a number is stored as null
#[post("/parts/{part_idx}/tiers/{tier_idx}/charts")]
pub async fn add_charts(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32)>,
    body: web::Json<AddChartsBody>,
) -> Result<HttpResponse> {
    let (part_idx, tier_idx) = path.into_inner();
    let items = match body.into_inner() {
        AddChartsBody::Many { charts } => charts,
        AddChartsBody::One(item) => vec![item],
    };
    let charts: Vec<NewChartRef> = items
        .iter()
        .map(|item| NewChartRef {
            chart_idx: item.chart_idx,
            target_score: parse_target_score(item.target_score.as_ref()),
        })
        .collect();

    state
        .editor
        .with_part_mut(part_idx, |p| p.add_charts_to_tier(tier_idx, &charts))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "added": charts.len() })))
}

/// `null` or invalid input clears a field; an absent field is left alone
#[patch("/parts/{part_idx}/tiers/{tier_idx}/charts/{chart_idx}")]
pub async fn update_chart_ref(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32, u32)>,
    body: web::Json<UpdateChartRefBody>,
) -> Result<HttpResponse> {
    let (part_idx, tier_idx, chart_idx) = path.into_inner();
    let chart = state.editor.write(|ws| -> Result<ChartRef> {
        // rank table read under the same lock as the edit
        let rank_count = ws.rank_count().unwrap_or(0);
        let update = ChartRefUpdate {
            target_score: body
                .target_score
                .as_ref()
                .map(|v| parse_target_score(v.as_ref())),
            target_clear_type: body
                .target_clear_type
                .as_ref()
                .map(|v| parse_target_clear_type(v.as_ref(), rank_count)),
        };
        ws.book
            .require_part_mut(part_idx)?
            .update_chart_ref(tier_idx, chart_idx, &update)
            .cloned()
    })?;
    Ok(HttpResponse::Ok().json(chart))
}

/// removes every reference to the chart in the tier
#[delete("/parts/{part_idx}/tiers/{tier_idx}/charts/{chart_idx}")]
pub async fn remove_chart(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32, u32)>,
) -> Result<HttpResponse> {
    let (part_idx, tier_idx, chart_idx) = path.into_inner();
    let removed = state
        .editor
        .with_part_mut(part_idx, |p| p.remove_chart_from_tier(tier_idx, chart_idx))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed": removed })))
}

#[delete("/parts/{part_idx}/tiers/{tier_idx}/slots/{index}")]
pub async fn remove_slot(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32, usize)>,
) -> Result<HttpResponse> {
    let (part_idx, tier_idx, index) = path.into_inner();
    let removed = state
        .editor
        .with_part_mut(part_idx, |p| p.remove_slot(tier_idx, index))?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed": removed })))
}

#[post("/parts/{part_idx}/drag")]
pub async fn drag(
    state: web::Data<AppState>,
    path: web::Path<u32>,
    body: web::Json<DragBody>,
) -> Result<HttpResponse> {
    let part_idx = path.into_inner();
    let outcome = match body.into_inner() {
        DragBody::Keys { active_id, over_id } => {
            let active: DragKey = active_id.parse()?;
            let over = over_id.map(|id| id.parse::<DropTarget>()).transpose()?;
            state
                .editor
                .with_part_mut(part_idx, |p| apply_drag_keys(p, &active, over.as_ref()))?
        }
        DragBody::Positions { from, to } => state
            .editor
            .with_part_mut(part_idx, |p| apply_drag(p, from, to))?,
    };
    Ok(HttpResponse::Ok().json(outcome))
}

/// Write one part back to the backend
#[post("/parts/{part_idx}/save")]
pub async fn save_part(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<u32>,
) -> Result<HttpResponse> {
    let session = bearer_session(&req)?;
    let part = state.editor.part_snapshot(path.into_inner())?;
    let result = state.backend.save_tier_part(&session, &part).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "partIdx": part.part_idx,
        "data": result,
    })))
}

#[get("/parts/{part_idx}/export")]
pub async fn export(state: web::Data<AppState>, path: web::Path<u32>) -> Result<HttpResponse> {
    let part = state.editor.part_snapshot(path.into_inner())?;
    let json = export_part(&part)?;
    let disposition = ContentDisposition {
        disposition: DispositionType::Attachment,
        parameters: vec![DispositionParam::Filename(export_file_name(&part))],
    };
    Ok(HttpResponse::Ok()
        .content_type("application/json")
        .insert_header(disposition)
        .body(json))
}

/// Catalogue search, truncated to `limit` or the configured page size
#[get("/search")]
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse> {
    let catalogue = state.editor.require_catalogue()?;
    let limit = query.limit.unwrap_or(state.config.search_page_size);
    let results: Vec<ChartSummary> = SearchLib::search_charts(&catalogue, &query.q)
        .iter()
        .take(limit)
        .map(|entry| ChartSummary::from_entry(entry, catalogue.meta()))
        .collect();
    Ok(HttpResponse::Ok().json(results))
}

/// Chart references across all parts whose id contains `q`
#[get("/find")]
pub async fn find(state: web::Data<AppState>, query: web::Query<SearchQuery>) -> HttpResponse {
    let hits = state
        .editor
        .read(|ws| SearchLib::find_in_parts(ws.book.parts(), &query.q));
    HttpResponse::Ok().json(hits)
}

#[get("/stats")]
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let summary = state.editor.read(|ws| TierStats::collect(ws.book.parts()));
    HttpResponse::Ok().json(summary)
}

/// configure editor routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(load_workspace)
        .service(list_parts)
        .service(add_part)
        .service(import)
        .service(get_part)
        .service(rename_part)
        .service(remove_part)
        .service(add_tier)
        .service(rename_tier)
        .service(remove_tier)
        .service(add_charts)
        .service(update_chart_ref)
        .service(remove_chart)
        .service(remove_slot)
        .service(drag)
        .service(save_part)
        .service(export)
        .service(search)
        .service(find)
        .service(stats);
}

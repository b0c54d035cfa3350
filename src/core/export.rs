//! JSON export and import of tier parts

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::MAX_TARGET_SCORE;
use crate::error::{AdminError, Result};
use crate::models::{IncomingPart, Part, TierPartWire};

/// File name used when a part is exported
pub fn export_file_name(part: &Part) -> String {
    format!("tier_part_{}.json", sanitize_file_name(&part.part_name))
}

// keep the name readable, drop path separators and other reserved characters
fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// Pretty-printed wire JSON of one part
pub fn export_part(part: &Part) -> Result<String> {
    Ok(serde_json::to_string_pretty(&TierPartWire::from(part))?)
}

/// Write a part into `dir`; returns the path written
pub fn write_part(part: &Part, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(part));
    std::fs::write(&path, export_part(part)?)?;
    info!("Exported part {} to {}", part.part_idx, path.display());
    Ok(path)
}

/// Parse a part from wire or flat JSON and check it with [`check_part`]
pub fn import_part(json: &str, rank_count: Option<usize>) -> Result<Part> {
    let incoming: IncomingPart = serde_json::from_str(json)
        .map_err(|e| AdminError::invalid("part", format!("Unrecognised part JSON: {}", e)))?;
    let mut part: Part = incoming.into();
    check_part(&mut part, rank_count)?;
    Ok(part)
}

pub fn read_part(path: &Path, rank_count: Option<usize>) -> Result<Part> {
    let json = std::fs::read_to_string(path)?;
    import_part(&json, rank_count)
}

/// Enforce the part invariants on data that did not come from the editor.
///
/// Duplicate `tierIdx` values and an empty tier list are rejected. A target
/// score above the maximum is cleared, as is a clear type outside the rank
/// table when `rank_count` is known.
pub fn check_part(part: &mut Part, rank_count: Option<usize>) -> Result<()> {
    if part.tier_list.is_empty() {
        return Err(AdminError::invalid("tierList", "a part needs at least one tier"));
    }
    let mut seen = std::collections::HashSet::new();
    for tier in &part.tier_list {
        if !seen.insert(tier.tier_idx) {
            return Err(AdminError::invalid(
                "tierList",
                format!("duplicate tierIdx {}", tier.tier_idx),
            ));
        }
    }

    let mut cleared = 0;
    for chart in part.tier_list.iter_mut().flat_map(|t| t.chart_list.iter_mut()) {
        if chart.target_score.map_or(false, |s| s > MAX_TARGET_SCORE) {
            chart.target_score = None;
            cleared += 1;
        }
        let out_of_table = match (chart.target_clear_type, rank_count) {
            (Some(clear_type), Some(ranks)) => clear_type as usize >= ranks,
            _ => false,
        };
        if out_of_table {
            chart.target_clear_type = None;
            cleared += 1;
        }
    }
    if cleared > 0 {
        warn!("Part {}: cleared {} out-of-range targets", part.part_idx, cleared);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartRef, Tier};
    use tempfile::TempDir;

    fn sample_part() -> Part {
        let mut top = Tier::new(1, "S");
        top.chart_list = vec![
            ChartRef {
                chart_idx: 10,
                target_score: Some(9_900_000),
                target_clear_type: Some(4),
            },
            ChartRef::new(11, None),
        ];
        Part {
            part_idx: 3,
            part_name: "Lv18".into(),
            description: "level 18 table".into(),
            tier_list: vec![top, Tier::new(2, "A")],
        }
    }

    #[test]
    fn test_export_import_round_trip() {
        let part = sample_part();
        let json = export_part(&part).unwrap();
        assert!(json.contains("\"partInfo\""));
        assert!(json.contains("\"targetClearType\": 4"));
        assert_eq!(import_part(&json, Some(5)).unwrap(), part);
    }

    #[test]
    fn test_import_flat_shape() {
        let json = r#"{
            "partIdx": 7,
            "partName": "Flat",
            "tierList": [{"tierIdx": 1, "tier": "S", "chartList": [{"chartIdx": 5}]}]
        }"#;
        let part = import_part(json, None).unwrap();
        assert_eq!(part.part_idx, 7);
        assert_eq!(part.description, "");
        assert_eq!(part.tier_list[0].chart_list[0], ChartRef::new(5, None));
    }

    #[test]
    fn test_import_rejects_bad_input() {
        assert!(import_part("{\"nope\": 1}", None).is_err());
        let dup = r#"{"partInfo": {"partIdx": 1, "partName": "x"},
            "tierList": [{"tierIdx": 1, "tier": "a"}, {"tierIdx": 1, "tier": "b"}]}"#;
        assert!(matches!(import_part(dup, None), Err(AdminError::Validation(_))));
        let empty = r#"{"partInfo": {"partIdx": 1, "partName": "x"}, "tierList": []}"#;
        assert!(import_part(empty, None).is_err());
    }

    #[test]
    fn test_import_clears_out_of_range_targets() {
        let json = r#"{"partInfo": {"partIdx": 1, "partName": "x"},
            "tierList": [{"tierIdx": 1, "tier": "S", "chartList": [
                {"chartIdx": 5, "targetScore": 99999999, "targetClearType": 4000},
                {"chartIdx": 6, "targetScore": 10000000, "targetClearType": 2}
            ]}]}"#;
        let part = import_part(json, Some(3)).unwrap();
        let charts = &part.tier_list[0].chart_list;
        assert_eq!(charts[0].target_score, None);
        assert_eq!(charts[0].target_clear_type, None);
        assert_eq!(charts[1].target_score, Some(10_000_000));
        assert_eq!(charts[1].target_clear_type, Some(2));

        // unknown rank table keeps the clear type
        let part = import_part(json, None).unwrap();
        assert_eq!(part.tier_list[0].chart_list[0].target_clear_type, Some(4000));
        assert_eq!(part.tier_list[0].chart_list[0].target_score, None);
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name(&sample_part()), "tier_part_Lv18.json");
        let mut odd = sample_part();
        odd.part_name = "a/b:c".into();
        assert_eq!(export_file_name(&odd), "tier_part_a_b_c.json");
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = TempDir::new().unwrap();
        let part = sample_part();
        let path = write_part(&part, dir.path()).unwrap();
        assert!(path.ends_with("tier_part_Lv18.json"));
        assert_eq!(read_part(&path, None).unwrap(), part);
    }
}

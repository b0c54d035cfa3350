//! Catalogue color values to CSS hex

use crate::models::{RankMetadata, TypeMetadata};

pub const FALLBACK_COLOR: &str = "#666666";

/// Backend colors are decimal RGB or ARGB; alpha is dropped
pub fn color_to_hex(color: u32) -> String {
    format!("#{:06X}", color & 0x00FF_FFFF)
}

/// Color of a chart type, matched on the long or the short name
pub fn difficulty_color(chart_type: &str, types: &[TypeMetadata]) -> String {
    types
        .iter()
        .find(|t| t.type_name == chart_type || t.type_short_name == chart_type)
        .map_or_else(|| FALLBACK_COLOR.to_string(), |t| color_to_hex(t.color))
}

/// Color of a clear type. Entries without an explicit `idx` are matched by position.
pub fn rank_color(clear_type: u32, ranks: &[RankMetadata]) -> String {
    rank_entry(clear_type, ranks)
        .map_or_else(|| FALLBACK_COLOR.to_string(), |r| color_to_hex(r.color))
}

pub fn rank_entry(clear_type: u32, ranks: &[RankMetadata]) -> Option<&RankMetadata> {
    ranks
        .iter()
        .enumerate()
        .find(|(pos, r)| r.idx.unwrap_or(*pos as u32) == clear_type)
        .map(|(_, r)| r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_hex() {
        assert_eq!(color_to_hex(0xFF00FF), "#FF00FF");
        assert_eq!(color_to_hex(255), "#0000FF");
        assert_eq!(color_to_hex(0xFF12_3456), "#123456");
        assert_eq!(color_to_hex(0), "#000000");
    }

    #[test]
    fn test_difficulty_color_lookup() {
        let types = vec![TypeMetadata {
            type_name: "maximum".into(),
            type_short_name: "MXM".into(),
            color: 0xAAAAAA,
        }];
        assert_eq!(difficulty_color("MXM", &types), "#AAAAAA");
        assert_eq!(difficulty_color("maximum", &types), "#AAAAAA");
        assert_eq!(difficulty_color("NOV", &types), FALLBACK_COLOR);
    }

    #[test]
    fn test_rank_color_by_idx_or_position() {
        let ranks = vec![
            RankMetadata {
                rank_name: "played".into(),
                color: 0x111111,
                ..Default::default()
            },
            RankMetadata {
                idx: Some(5),
                rank_name: "puc".into(),
                color: 0x222222,
                ..Default::default()
            },
        ];
        assert_eq!(rank_color(0, &ranks), "#111111");
        assert_eq!(rank_color(5, &ranks), "#222222");
        assert_eq!(rank_color(1, &ranks), FALLBACK_COLOR);
    }
}

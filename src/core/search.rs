//! Search over the chart catalogue and over tier parts

use serde::Serialize;

use crate::models::Part;
use crate::stores::{ChartEntry, ChartIndex};

/// A chart reference found inside a tier part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartHit {
    pub part_name: String,
    pub tier: String,
    pub chart_idx: u32,
    pub target_score: Option<u32>,
}

/// Search library
pub struct SearchLib;

impl SearchLib {
    /// Case-insensitive substring search across title, artist, song id,
    /// chart id and chart type. A blank query matches every chart.
    /// Results keep catalogue order; callers truncate to their page size.
    pub fn search_charts<'a>(index: &'a ChartIndex, query: &str) -> Vec<ChartEntry<'a>> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return index.entries().collect();
        }

        index
            .entries()
            .filter(|entry| Self::matches(entry, &needle))
            .collect()
    }

    fn matches(entry: &ChartEntry<'_>, needle: &str) -> bool {
        entry.song.title.to_lowercase().contains(needle)
            || entry.song.artist.to_lowercase().contains(needle)
            || entry.song.song_idx.to_string().contains(needle)
            || entry.chart.chart_idx.to_string().contains(needle)
            || entry.chart.chart_type.to_lowercase().contains(needle)
    }

    /// Find chart references whose id contains `needle`, across every part.
    pub fn find_in_parts(parts: &[Part], needle: &str) -> Vec<PartHit> {
        let needle = needle.trim();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut hits = Vec::new();
        for part in parts {
            for tier in &part.tier_list {
                for chart in &tier.chart_list {
                    if chart.chart_idx.to_string().contains(needle) {
                        hits.push(PartHit {
                            part_name: part.part_name.clone(),
                            tier: tier.tier.clone(),
                            chart_idx: chart.chart_idx,
                            target_score: chart.target_score,
                        });
                    }
                }
            }
        }
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartRef, Tier};
    use crate::stores::catalogue_store::tests::sample_catalogue;

    fn ids(results: &[ChartEntry<'_>]) -> Vec<u32> {
        results.iter().map(|e| e.chart.chart_idx).collect()
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let index = ChartIndex::build(sample_catalogue());
        assert_eq!(ids(&SearchLib::search_charts(&index, "")), vec![10, 11, 20]);
        assert_eq!(ids(&SearchLib::search_charts(&index, "   ")), vec![10, 11, 20]);
    }

    #[test]
    fn test_matches_each_field() {
        let index = ChartIndex::build(sample_catalogue());

        assert_eq!(ids(&SearchLib::search_charts(&index, "flow")), vec![10, 11]);
        assert_eq!(ids(&SearchLib::search_charts(&index, "NORIKEN")), vec![20]);
        assert_eq!(ids(&SearchLib::search_charts(&index, "mxm")), vec![11]);
        assert_eq!(ids(&SearchLib::search_charts(&index, "2")), vec![20]);
        assert_eq!(ids(&SearchLib::search_charts(&index, "11")), vec![11]);
        assert!(SearchLib::search_charts(&index, "zzz").is_empty());
    }

    #[test]
    fn test_search_is_repeatable() {
        let index = ChartIndex::build(sample_catalogue());
        let first = ids(&SearchLib::search_charts(&index, "r"));
        let second = ids(&SearchLib::search_charts(&index, "r"));
        assert_eq!(first, second);
    }

    #[test]
    fn test_find_in_parts() {
        let mut tier = Tier::new(1, "S");
        tier.chart_list = vec![ChartRef::new(110, Some(9_900_000)), ChartRef::new(25, None)];
        let part = Part {
            part_idx: 1,
            part_name: "Lv19".into(),
            description: String::new(),
            tier_list: vec![tier],
        };

        let hits = SearchLib::find_in_parts(std::slice::from_ref(&part), "11");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].chart_idx, 110);
        assert_eq!(hits[0].tier, "S");
        assert_eq!(hits[0].target_score, Some(9_900_000));

        assert!(SearchLib::find_in_parts(&[part], " ").is_empty());
    }
}

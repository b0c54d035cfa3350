//! Summary numbers over the loaded tier parts

use serde::Serialize;

use crate::models::Part;

/// Chart count of one tier label, summed across parts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TierBucket {
    pub tier: String,
    pub charts: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStats {
    pub total_tier_parts: usize,
    pub total_tiers: usize,
    pub total_charts: usize,
    /// Rounded mean over refs that carry a target score; 0 when none do
    pub average_target_score: u32,
    /// Keyed `Tier {name}`, in first-seen order
    pub tier_distribution: Vec<TierBucket>,
}

impl TierStats {
    pub fn collect(parts: &[Part]) -> Self {
        let mut stats = TierStats {
            total_tier_parts: parts.len(),
            ..Default::default()
        };
        let mut score_sum: u64 = 0;
        let mut scored: u64 = 0;

        for tier in parts.iter().flat_map(|p| &p.tier_list) {
            stats.total_tiers += 1;
            stats.total_charts += tier.len();

            let label = format!("Tier {}", tier.tier);
            match stats.tier_distribution.iter_mut().find(|b| b.tier == label) {
                Some(bucket) => bucket.charts += tier.len(),
                None => stats.tier_distribution.push(TierBucket {
                    tier: label,
                    charts: tier.len(),
                }),
            }

            for score in tier.chart_list.iter().filter_map(|c| c.target_score) {
                score_sum += u64::from(score);
                scored += 1;
            }
        }

        if scored > 0 {
            stats.average_target_score = ((score_sum + scored / 2) / scored) as u32;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tierlib::tests::part_with_tiers;

    #[test]
    fn test_collect() {
        let mut first = part_with_tiers(1, &[(1, "S", &[1, 2]), (2, "A", &[3])]);
        first.tier_list[0].chart_list[0].target_score = Some(9_000_000);
        first.tier_list[0].chart_list[1].target_score = Some(9_000_001);
        let second = part_with_tiers(2, &[(1, "S", &[4]), (2, "B", &[])]);

        let stats = TierStats::collect(&[first, second]);
        assert_eq!(stats.total_tier_parts, 2);
        assert_eq!(stats.total_tiers, 4);
        assert_eq!(stats.total_charts, 4);
        assert_eq!(stats.average_target_score, 9_000_001);
        assert_eq!(
            stats.tier_distribution,
            vec![
                TierBucket { tier: "Tier S".into(), charts: 3 },
                TierBucket { tier: "Tier A".into(), charts: 1 },
                TierBucket { tier: "Tier B".into(), charts: 0 },
            ]
        );
    }

    #[test]
    fn test_empty() {
        let stats = TierStats::collect(&[]);
        assert_eq!(stats, TierStats::default());
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averageTargetScore"], 0);
    }
}

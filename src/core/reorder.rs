//! Drag reorder engine
//!
//! Turns a drag gesture (source slot, optional drop slot) into a move inside
//! one part. Positions are validated against the part as it is before the
//! move; nothing is mutated unless both ends are valid.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{AdminError, Result};
use crate::models::Part;

/// A row position: which tier, and where in its chart list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotPosition {
    pub tier_idx: u32,
    pub index: usize,
}

impl SlotPosition {
    pub fn new(tier_idx: u32, index: usize) -> Self {
        Self { tier_idx, index }
    }
}

/// Row key used by drag-and-drop front ends: `{tierIdx}-{chartIdx}-{index}`.
///
/// `chartIdx` alone is not unique inside a part, so the key carries the
/// position; the chart id is kept to detect stale keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragKey {
    pub tier_idx: u32,
    pub chart_idx: u32,
    pub index: usize,
}

impl DragKey {
    pub fn position(&self) -> SlotPosition {
        SlotPosition::new(self.tier_idx, self.index)
    }
}

impl FromStr for DragKey {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || AdminError::invalid("dragKey", format!("Malformed row key: {}", s));
        let mut fields = s.split('-');
        let (Some(tier), Some(chart), Some(index), None) =
            (fields.next(), fields.next(), fields.next(), fields.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            tier_idx: tier.parse().map_err(|_| invalid())?,
            chart_idx: chart.parse().map_err(|_| invalid())?,
            index: index.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for DragKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.tier_idx, self.chart_idx, self.index)
    }
}

/// Where a row was dropped: onto another row, or onto a tier container
/// (`tier-{tierIdx}`), which appends to that tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropTarget {
    Row(DragKey),
    TierEnd(u32),
}

impl DropTarget {
    pub fn position(&self) -> SlotPosition {
        match self {
            DropTarget::Row(key) => key.position(),
            DropTarget::TierEnd(tier_idx) => SlotPosition::new(*tier_idx, usize::MAX),
        }
    }
}

impl FromStr for DropTarget {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(tier) = s.strip_prefix("tier-") {
            return tier.parse().map(DropTarget::TierEnd).map_err(|_| {
                AdminError::invalid("dragKey", format!("Malformed tier key: {}", s))
            });
        }
        s.parse().map(DropTarget::Row)
    }
}

/// What a drag did to the part
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DragOutcome {
    Unchanged,
    #[serde(rename_all = "camelCase")]
    Reordered { tier_idx: u32, from: usize, to: usize },
    #[serde(rename_all = "camelCase")]
    Transferred {
        chart_idx: u32,
        from: SlotPosition,
        to: SlotPosition,
    },
}

/// Move the element at `from` so it ends up at `to`, shifting the rest.
/// `to` past the end is clamped to the last position.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) {
    if from >= list.len() {
        return;
    }
    let item = list.remove(from);
    let to = to.min(list.len());
    list.insert(to, item);
}

/// Apply a drag from `from` to `to` (None = dropped outside any target)
pub fn apply_drag(part: &mut Part, from: SlotPosition, to: Option<SlotPosition>) -> Result<DragOutcome> {
    let Some(to) = to else {
        return Ok(DragOutcome::Unchanged);
    };

    let src_pos = part
        .tier_position(from.tier_idx)
        .ok_or_else(|| AdminError::NotFound(format!("tier {}", from.tier_idx)))?;
    let src_len = part.tier_list[src_pos].len();
    if from.index >= src_len {
        return Err(AdminError::NotFound(format!(
            "slot {} of tier {}",
            from.index, from.tier_idx
        )));
    }

    if from.tier_idx == to.tier_idx {
        let dest = to.index.min(src_len - 1);
        if dest == from.index {
            return Ok(DragOutcome::Unchanged);
        }
        move_item(&mut part.tier_list[src_pos].chart_list, from.index, dest);
        debug!(
            "Part {}: moved tier {} slot {} -> {}",
            part.part_idx, from.tier_idx, from.index, dest
        );
        return Ok(DragOutcome::Reordered {
            tier_idx: from.tier_idx,
            from: from.index,
            to: dest,
        });
    }

    let dst_pos = part
        .tier_position(to.tier_idx)
        .ok_or_else(|| AdminError::NotFound(format!("tier {}", to.tier_idx)))?;
    let dest = to.index.min(part.tier_list[dst_pos].len());

    let chart = part.tier_list[src_pos].chart_list.remove(from.index);
    let chart_idx = chart.chart_idx;
    part.tier_list[dst_pos].chart_list.insert(dest, chart);
    debug!(
        "Part {}: chart {} moved tier {}[{}] -> tier {}[{}]",
        part.part_idx, chart_idx, from.tier_idx, from.index, to.tier_idx, dest
    );

    Ok(DragOutcome::Transferred {
        chart_idx,
        from,
        to: SlotPosition::new(to.tier_idx, dest),
    })
}

/// Apply a drag described by row keys, rejecting a source key whose chart
/// no longer sits at that position.
pub fn apply_drag_keys(
    part: &mut Part,
    active: &DragKey,
    over: Option<&DropTarget>,
) -> Result<DragOutcome> {
    let current = part
        .tier(active.tier_idx)
        .and_then(|t| t.chart_list.get(active.index))
        .map(|c| c.chart_idx);
    if current != Some(active.chart_idx) {
        return Err(AdminError::InvariantViolation(format!(
            "Stale drag key {}: slot holds {:?}",
            active, current
        )));
    }

    apply_drag(part, active.position(), over.map(DropTarget::position))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tierlib::tests::part_with_tiers;
    use crate::models::ChartRef;

    fn ids(part: &Part, tier_idx: u32) -> Vec<u32> {
        part.tier(tier_idx)
            .unwrap()
            .chart_list
            .iter()
            .map(|c| c.chart_idx)
            .collect()
    }

    #[test]
    fn test_parse_keys() {
        let key: DragKey = "2-105-3".parse().unwrap();
        assert_eq!(
            key,
            DragKey {
                tier_idx: 2,
                chart_idx: 105,
                index: 3
            }
        );
        assert_eq!(key.to_string(), "2-105-3");

        assert!("2-105".parse::<DragKey>().is_err());
        assert!("2-105-3-1".parse::<DragKey>().is_err());
        assert!("a-b-c".parse::<DragKey>().is_err());

        assert_eq!("tier-4".parse::<DropTarget>().unwrap(), DropTarget::TierEnd(4));
        assert!(matches!(
            "1-2-0".parse::<DropTarget>().unwrap(),
            DropTarget::Row(_)
        ));
    }

    #[test]
    fn test_move_item_law() {
        let mut list = vec![0, 1, 2, 3, 4];
        move_item(&mut list, 1, 3);
        assert_eq!(list, vec![0, 2, 3, 1, 4]);

        move_item(&mut list, 4, 0);
        assert_eq!(list, vec![4, 0, 2, 3, 1]);

        move_item(&mut list, 0, 100);
        assert_eq!(list, vec![0, 2, 3, 1, 4]);

        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_same_tier_reorder() {
        let mut part = part_with_tiers(1, &[(1, "S", &[10, 20, 30])]);
        let outcome =
            apply_drag(&mut part, SlotPosition::new(1, 0), Some(SlotPosition::new(1, 2))).unwrap();

        assert_eq!(
            outcome,
            DragOutcome::Reordered {
                tier_idx: 1,
                from: 0,
                to: 2
            }
        );
        assert_eq!(ids(&part, 1), vec![20, 30, 10]);
    }

    #[test]
    fn test_cross_tier_move_scenario() {
        let mut part = part_with_tiers(1, &[(1, "S", &[10, 20]), (2, "A", &[])]);
        part.tier_mut(1).unwrap().chart_list[0] = ChartRef {
            chart_idx: 10,
            target_score: Some(9_700_000),
            target_clear_type: Some(3),
        };

        let outcome =
            apply_drag(&mut part, SlotPosition::new(1, 0), Some(SlotPosition::new(2, 0))).unwrap();

        assert!(matches!(outcome, DragOutcome::Transferred { chart_idx: 10, .. }));
        assert_eq!(ids(&part, 1), vec![20]);
        assert_eq!(ids(&part, 2), vec![10]);
        let moved = &part.tier(2).unwrap().chart_list[0];
        assert_eq!(moved.target_score, Some(9_700_000));
        assert_eq!(moved.target_clear_type, Some(3));
    }

    #[test]
    fn test_cross_tier_inserts_before_target() {
        let mut part = part_with_tiers(1, &[(1, "S", &[1, 2]), (2, "A", &[7, 8, 9])]);
        apply_drag(&mut part, SlotPosition::new(1, 1), Some(SlotPosition::new(2, 1))).unwrap();

        assert_eq!(ids(&part, 1), vec![1]);
        assert_eq!(ids(&part, 2), vec![7, 2, 8, 9]);
    }

    #[test]
    fn test_noop_cases() {
        let mut part = part_with_tiers(1, &[(1, "S", &[1, 2])]);
        let before = part.clone();

        assert_eq!(
            apply_drag(&mut part, SlotPosition::new(1, 0), None).unwrap(),
            DragOutcome::Unchanged
        );
        assert_eq!(
            apply_drag(&mut part, SlotPosition::new(1, 1), Some(SlotPosition::new(1, 1))).unwrap(),
            DragOutcome::Unchanged
        );
        assert_eq!(part, before);
    }

    #[test]
    fn test_invalid_positions_leave_part_untouched() {
        let mut part = part_with_tiers(1, &[(1, "S", &[1, 2]), (2, "A", &[3])]);
        let before = part.clone();

        assert!(apply_drag(&mut part, SlotPosition::new(1, 5), Some(SlotPosition::new(2, 0))).is_err());
        assert!(apply_drag(&mut part, SlotPosition::new(1, 0), Some(SlotPosition::new(9, 0))).is_err());
        assert!(apply_drag(&mut part, SlotPosition::new(9, 0), Some(SlotPosition::new(1, 0))).is_err());
        assert_eq!(part, before);
    }

    #[test]
    fn test_keys_with_duplicates_and_staleness() {
        // the same chart appears twice; the index picks the right one
        let mut part = part_with_tiers(1, &[(1, "S", &[5, 6, 5]), (2, "A", &[])]);
        let active: DragKey = "1-5-2".parse().unwrap();
        let over: DropTarget = "tier-2".parse().unwrap();

        apply_drag_keys(&mut part, &active, Some(&over)).unwrap();
        assert_eq!(ids(&part, 1), vec![5, 6]);
        assert_eq!(ids(&part, 2), vec![5]);

        let stale: DragKey = "1-5-1".parse().unwrap();
        let before = part.clone();
        let err = apply_drag_keys(&mut part, &stale, Some(&over)).unwrap_err();
        assert!(matches!(err, AdminError::InvariantViolation(_)));
        assert_eq!(part, before);
    }
}

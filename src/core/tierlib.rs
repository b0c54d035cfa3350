//! Tier structure operations
//!
//! Every fallible operation validates first and mutates second, so an
//! `Err` always leaves the structure exactly as it was.

use serde::{Deserialize, Serialize};

use crate::error::{AdminError, Result};
use crate::models::{ChartRef, Part, Tier};

/// A chart to append to a tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewChartRef {
    pub chart_idx: u32,
    #[serde(default)]
    pub target_score: Option<u32>,
}

/// Partial update of a chart reference. `Some(None)` clears a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartRefUpdate {
    pub target_score: Option<Option<u32>>,
    pub target_clear_type: Option<Option<u32>>,
}

/// All parts of the tier list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierBook {
    parts: Vec<Part>,
}

impl TierBook {
    pub fn new(parts: Vec<Part>) -> Self {
        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, part_idx: u32) -> Option<&Part> {
        self.parts.iter().find(|p| p.part_idx == part_idx)
    }

    pub fn part_mut(&mut self, part_idx: u32) -> Option<&mut Part> {
        self.parts.iter_mut().find(|p| p.part_idx == part_idx)
    }

    /// Like `part_mut` but absent parts are an error
    pub fn require_part_mut(&mut self, part_idx: u32) -> Result<&mut Part> {
        self.part_mut(part_idx)
            .ok_or_else(|| AdminError::NotFound(format!("part {}", part_idx)))
    }

    /// Append a new part with one empty tier; returns its `partIdx`
    pub fn add_part(&mut self) -> u32 {
        let part_idx = self.parts.iter().map(|p| p.part_idx).max().unwrap_or(0) + 1;
        self.parts.push(Part {
            part_idx,
            part_name: format!("Part {}", part_idx),
            description: format!("New tier part {}", part_idx),
            tier_list: vec![Tier::new(1, "Tier 1")],
        });
        part_idx
    }

    /// Remove a part. The last remaining part can never be removed.
    pub fn remove_part(&mut self, part_idx: u32) -> Result<Part> {
        let pos = self
            .parts
            .iter()
            .position(|p| p.part_idx == part_idx)
            .ok_or_else(|| AdminError::NotFound(format!("part {}", part_idx)))?;
        if self.parts.len() <= 1 {
            return Err(AdminError::InvariantViolation(
                "Cannot remove the last tier part".to_string(),
            ));
        }
        Ok(self.parts.remove(pos))
    }

    /// Update name and/or description; unknown parts are ignored
    pub fn rename_part(&mut self, part_idx: u32, name: Option<&str>, description: Option<&str>) {
        if let Some(part) = self.part_mut(part_idx) {
            if let Some(name) = name {
                part.part_name = name.to_string();
            }
            if let Some(description) = description {
                part.description = description.to_string();
            }
        }
    }

    /// Replace the part with the same `partIdx`, or append it.
    /// Returns true when an existing part was replaced.
    pub fn upsert_part(&mut self, part: Part) -> bool {
        match self.part_mut(part.part_idx) {
            Some(existing) => {
                *existing = part;
                true
            }
            None => {
                self.parts.push(part);
                false
            }
        }
    }
}

impl Part {
    /// Append a new empty tier; returns its `tierIdx`
    pub fn add_tier(&mut self) -> u32 {
        let tier_idx = self.tier_list.iter().map(|t| t.tier_idx).max().unwrap_or(0) + 1;
        self.tier_list
            .push(Tier::new(tier_idx, format!("Tier {}", tier_idx)));
        tier_idx
    }

    /// Remove a tier. The last tier of a part can never be removed.
    pub fn remove_tier(&mut self, tier_idx: u32) -> Result<Tier> {
        let pos = self
            .tier_position(tier_idx)
            .ok_or_else(|| AdminError::NotFound(format!("tier {}", tier_idx)))?;
        if self.tier_list.len() <= 1 {
            return Err(AdminError::InvariantViolation(
                "Cannot remove the last tier".to_string(),
            ));
        }
        Ok(self.tier_list.remove(pos))
    }

    pub fn rename_tier(&mut self, tier_idx: u32, name: &str) -> Result<()> {
        self.require_tier_mut(tier_idx)?.tier = name.to_string();
        Ok(())
    }

    /// Append one chart reference. Duplicates are allowed.
    pub fn add_chart_to_tier(
        &mut self,
        tier_idx: u32,
        chart_idx: u32,
        target_score: Option<u32>,
    ) -> Result<()> {
        self.require_tier_mut(tier_idx)?
            .chart_list
            .push(ChartRef::new(chart_idx, target_score));
        Ok(())
    }

    /// Append several chart references in the given order
    pub fn add_charts_to_tier(&mut self, tier_idx: u32, charts: &[NewChartRef]) -> Result<()> {
        let tier = self.require_tier_mut(tier_idx)?;
        tier.chart_list.extend(
            charts
                .iter()
                .map(|c| ChartRef::new(c.chart_idx, c.target_score)),
        );
        Ok(())
    }

    /// Remove every reference to `chart_idx` from the tier; returns how many went
    pub fn remove_chart_from_tier(&mut self, tier_idx: u32, chart_idx: u32) -> Result<usize> {
        let tier = self.require_tier_mut(tier_idx)?;
        let before = tier.chart_list.len();
        tier.chart_list.retain(|c| c.chart_idx != chart_idx);
        Ok(before - tier.chart_list.len())
    }

    /// Remove the reference at one position of the tier
    pub fn remove_slot(&mut self, tier_idx: u32, index: usize) -> Result<ChartRef> {
        let tier = self.require_tier_mut(tier_idx)?;
        if index >= tier.chart_list.len() {
            return Err(AdminError::NotFound(format!(
                "slot {} of tier {}",
                index, tier_idx
            )));
        }
        Ok(tier.chart_list.remove(index))
    }

    /// Apply a partial update to the first reference to `chart_idx`
    pub fn update_chart_ref(
        &mut self,
        tier_idx: u32,
        chart_idx: u32,
        update: &ChartRefUpdate,
    ) -> Result<&ChartRef> {
        let tier = self.require_tier_mut(tier_idx)?;
        let chart = tier
            .chart_list
            .iter_mut()
            .find(|c| c.chart_idx == chart_idx)
            .ok_or_else(|| {
                AdminError::NotFound(format!("chart {} in tier {}", chart_idx, tier_idx))
            })?;

        if let Some(score) = update.target_score {
            chart.target_score = score;
        }
        if let Some(clear_type) = update.target_clear_type {
            chart.target_clear_type = clear_type;
        }
        Ok(&*chart)
    }

    fn require_tier_mut(&mut self, tier_idx: u32) -> Result<&mut Tier> {
        self.tier_mut(tier_idx)
            .ok_or_else(|| AdminError::NotFound(format!("tier {}", tier_idx)))
    }
}

//! Tier list model: parts, tiers and chart references

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// Reference to a catalogue chart plus per-part goals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartRef {
    pub chart_idx: u32,
    #[serde(default)]
    pub target_score: Option<u32>,
    /// Index into the rank metadata list
    #[serde(default)]
    pub target_clear_type: Option<u32>,
}

impl ChartRef {
    pub fn new(chart_idx: u32, target_score: Option<u32>) -> Self {
        Self {
            chart_idx,
            target_score,
            target_clear_type: None,
        }
    }
}

/// A named, ordered bucket of chart references
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tier {
    pub tier_idx: u32,
    pub tier: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub chart_list: Vec<ChartRef>,
}

impl Tier {
    pub fn new(tier_idx: u32, tier: impl Into<String>) -> Self {
        Self {
            tier_idx,
            tier: tier.into(),
            chart_list: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chart_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chart_list.is_empty()
    }
}

/// An independent tier list (one complete difficulty table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub part_idx: u32,
    pub part_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier_list: Vec<Tier>,
}

impl Part {
    pub fn tier(&self, tier_idx: u32) -> Option<&Tier> {
        self.tier_list.iter().find(|t| t.tier_idx == tier_idx)
    }

    pub fn tier_mut(&mut self, tier_idx: u32) -> Option<&mut Tier> {
        self.tier_list.iter_mut().find(|t| t.tier_idx == tier_idx)
    }

    /// Position of a tier inside `tier_list`
    pub fn tier_position(&self, tier_idx: u32) -> Option<usize> {
        self.tier_list.iter().position(|t| t.tier_idx == tier_idx)
    }

    /// Total chart references across all tiers
    pub fn chart_count(&self) -> usize {
        self.tier_list.iter().map(Tier::len).sum()
    }

    pub fn info(&self) -> PartInfo {
        PartInfo {
            part_idx: self.part_idx,
            part_name: self.part_name.clone(),
            description: self.description.clone(),
        }
    }
}

/// Part header as carried on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartInfo {
    pub part_idx: u32,
    pub part_name: String,
    #[serde(default)]
    pub description: String,
}

/// Wire shape of a part, shared by the backend round trip and JSON export
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPartWire {
    pub part_info: PartInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tier_list: Vec<Tier>,
}

impl From<&Part> for TierPartWire {
    fn from(part: &Part) -> Self {
        Self {
            part_info: part.info(),
            tier_list: part.tier_list.clone(),
        }
    }
}

impl From<TierPartWire> for Part {
    fn from(wire: TierPartWire) -> Self {
        Self {
            part_idx: wire.part_info.part_idx,
            part_name: wire.part_info.part_name,
            description: wire.part_info.description,
            tier_list: wire.tier_list,
        }
    }
}

/// A part submitted by a client: either the wire shape or the flat model shape
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IncomingPart {
    Wire(TierPartWire),
    Flat(Part),
}

impl From<IncomingPart> for Part {
    fn from(incoming: IncomingPart) -> Self {
        match incoming {
            IncomingPart::Wire(wire) => wire.into(),
            IncomingPart::Flat(part) => part,
        }
    }
}

/// `GET /playdata/tier` response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TierDataResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<TierPartWire>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_ref_without_clear_type() {
        let chart: ChartRef =
            serde_json::from_str(r#"{"chartIdx": 12, "targetScore": 9800000}"#).unwrap();
        assert_eq!(chart.chart_idx, 12);
        assert_eq!(chart.target_score, Some(9_800_000));
        assert_eq!(chart.target_clear_type, None);

        // absent goals are written as explicit nulls
        let json = serde_json::to_value(ChartRef::new(3, None)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"chartIdx": 3, "targetScore": null, "targetClearType": null})
        );
    }

    #[test]
    fn test_incoming_part_accepts_both_shapes() {
        let wire = r#"{"partInfo": {"partIdx": 2, "partName": "Lv18", "description": "d"},
                       "tierList": [{"tierIdx": 1, "tier": "S", "chartList": []}]}"#;
        let flat = r#"{"partIdx": 2, "partName": "Lv18", "description": "d",
                       "tierList": [{"tierIdx": 1, "tier": "S", "chartList": []}]}"#;

        let a: Part = serde_json::from_str::<IncomingPart>(wire).unwrap().into();
        let b: Part = serde_json::from_str::<IncomingPart>(flat).unwrap().into();
        assert_eq!(a, b);
        assert_eq!(a.tier_list.len(), 1);
    }

    #[test]
    fn test_chart_count_and_lookup() {
        let mut part = Part {
            part_idx: 1,
            part_name: "P".into(),
            description: String::new(),
            tier_list: vec![Tier::new(1, "S"), Tier::new(3, "A")],
        };
        part.tier_mut(3).unwrap().chart_list.push(ChartRef::new(5, None));
        part.tier_mut(3).unwrap().chart_list.push(ChartRef::new(6, None));

        assert_eq!(part.chart_count(), 2);
        assert_eq!(part.tier_position(3), Some(1));
        assert!(part.tier(2).is_none());
    }
}

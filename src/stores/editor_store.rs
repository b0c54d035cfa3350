//! Editor store - the server-held editing workspace
//!
//! One catalogue snapshot plus the tier parts being edited. Each editor
//! event takes the lock once; backend calls happen outside it.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use crate::core::TierBook;
use crate::error::{AdminError, Result};
use crate::models::Part;
use crate::stores::ChartIndex;

#[derive(Debug, Default)]
pub struct Workspace {
    pub book: TierBook,
    pub catalogue: Option<Arc<ChartIndex>>,
}

impl Workspace {
    /// Rank table size, `None` before a catalogue is loaded
    pub fn rank_count(&self) -> Option<usize> {
        self.catalogue.as_ref().map(|c| c.rank_count())
    }
}

#[derive(Debug, Default)]
pub struct EditorStore {
    inner: RwLock<Workspace>,
}

impl EditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a freshly loaded catalogue and part list
    pub fn replace(&self, catalogue: ChartIndex, parts: Vec<Part>) {
        let mut ws = self.inner.write();
        info!(
            "Workspace loaded: {} charts, {} parts",
            catalogue.len(),
            parts.len()
        );
        ws.catalogue = Some(Arc::new(catalogue));
        ws.book = TierBook::new(parts);
    }

    pub fn read<R>(&self, f: impl FnOnce(&Workspace) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut Workspace) -> R) -> R {
        f(&mut self.inner.write())
    }

    /// Run `f` against one part, failing with `NotFound` when it is absent
    pub fn with_part_mut<R>(&self, part_idx: u32, f: impl FnOnce(&mut Part) -> Result<R>) -> Result<R> {
        self.write(|ws| f(ws.book.require_part_mut(part_idx)?))
    }

    /// Shared handle to the current catalogue, if one was loaded
    pub fn catalogue(&self) -> Option<Arc<ChartIndex>> {
        self.inner.read().catalogue.clone()
    }

    pub fn require_catalogue(&self) -> Result<Arc<ChartIndex>> {
        self.catalogue()
            .ok_or_else(|| AdminError::NotFound("catalogue not loaded".to_string()))
    }

    /// Copy of one part, taken so it can be sent without holding the lock
    pub fn part_snapshot(&self, part_idx: u32) -> Result<Part> {
        self.read(|ws| ws.book.part(part_idx).cloned())
            .ok_or_else(|| AdminError::NotFound(format!("part {}", part_idx)))
    }

    pub fn parts_snapshot(&self) -> Vec<Part> {
        self.read(|ws| ws.book.parts().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tierlib::tests::part_with_tiers;
    use crate::stores::catalogue_store::tests::sample_catalogue;

    #[test]
    fn test_replace_and_snapshot() {
        let store = EditorStore::new();
        assert!(store.catalogue().is_none());
        assert_eq!(store.read(|ws| ws.rank_count()), None);
        assert!(store.part_snapshot(1).is_err());

        store.replace(
            ChartIndex::build(sample_catalogue()),
            vec![part_with_tiers(1, &[(1, "S", &[10])])],
        );
        assert_eq!(store.require_catalogue().unwrap().len(), 3);
        assert_eq!(store.part_snapshot(1).unwrap().chart_count(), 1);
        assert_eq!(store.read(|ws| ws.rank_count()), Some(0));
    }

    #[test]
    fn test_failed_mutation_leaves_part() {
        let store = EditorStore::new();
        store.replace(ChartIndex::default(), vec![part_with_tiers(1, &[(1, "S", &[10])])]);

        let err = store.with_part_mut(1, |p| p.remove_tier(1)).unwrap_err();
        assert!(matches!(err, AdminError::InvariantViolation(_)));
        assert!(matches!(
            store.with_part_mut(5, |p| Ok(p.add_tier())),
            Err(AdminError::NotFound(_))
        ));

        let tier = store.with_part_mut(1, |p| Ok(p.add_tier())).unwrap();
        assert_eq!(tier, 2);
        assert_eq!(store.part_snapshot(1).unwrap().tier_list.len(), 2);
    }
}

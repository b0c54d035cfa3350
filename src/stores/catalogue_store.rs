//! Chart catalogue index - flat chartIdx lookup over the nested song list

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::models::{ChartData, ChartMetaResponse, MetaData, SongData};

/// A chart together with the song that owns it
#[derive(Debug, Clone, Copy)]
pub struct ChartEntry<'a> {
    pub song: &'a SongData,
    pub chart: &'a ChartData,
}

/// Result of resolving a chart reference against the catalogue
#[derive(Debug, Clone, Copy)]
pub enum ResolvedChart<'a> {
    Found(ChartEntry<'a>),
    /// Referenced chart is not in the catalogue; render a placeholder
    Missing(u32),
}

/// In-memory index over one catalogue snapshot
#[derive(Debug, Default)]
pub struct ChartIndex {
    meta: MetaData,
    songs: Vec<SongData>,
    /// chartIdx -> (song position, chart position)
    by_chart: HashMap<u32, (usize, usize)>,
    song_ids: HashSet<u32>,
}

impl ChartIndex {
    /// Build the index from a catalogue response.
    ///
    /// Null songs are skipped. A later chart with an already indexed
    /// `chartIdx` replaces the earlier one.
    pub fn build(catalogue: ChartMetaResponse) -> Self {
        let total = catalogue.chart_data.len();
        let songs: Vec<SongData> = catalogue.chart_data.into_iter().flatten().collect();
        if songs.len() != total {
            debug!("Skipped {} null songs in catalogue", total - songs.len());
        }

        let mut by_chart = HashMap::new();
        let mut song_ids = HashSet::with_capacity(songs.len());
        for (song_pos, song) in songs.iter().enumerate() {
            song_ids.insert(song.song_idx);
            for (chart_pos, chart) in song.chart.iter().enumerate() {
                by_chart.insert(chart.chart_idx, (song_pos, chart_pos));
            }
        }

        Self {
            meta: catalogue.meta_data,
            songs,
            by_chart,
            song_ids,
        }
    }

    /// Look up a chart by its identifier
    pub fn lookup(&self, chart_idx: u32) -> Option<ChartEntry<'_>> {
        let &(song_pos, chart_pos) = self.by_chart.get(&chart_idx)?;
        let song = &self.songs[song_pos];
        Some(ChartEntry {
            song,
            chart: &song.chart[chart_pos],
        })
    }

    pub fn resolve(&self, chart_idx: u32) -> ResolvedChart<'_> {
        match self.lookup(chart_idx) {
            Some(entry) => ResolvedChart::Found(entry),
            None => ResolvedChart::Missing(chart_idx),
        }
    }

    /// Every chart in catalogue order (song, then chart)
    pub fn entries(&self) -> impl Iterator<Item = ChartEntry<'_>> + '_ {
        self.songs
            .iter()
            .flat_map(|song| song.chart.iter().map(move |chart| ChartEntry { song, chart }))
    }

    pub fn songs(&self) -> &[SongData] {
        &self.songs
    }

    pub fn meta(&self) -> &MetaData {
        &self.meta
    }

    /// Number of distinct chart identifiers
    pub fn len(&self) -> usize {
        self.by_chart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_chart.is_empty()
    }

    pub fn contains_song(&self, song_idx: u32) -> bool {
        self.song_ids.contains(&song_idx)
    }

    /// Size of the clear-type table that `targetClearType` indexes
    pub fn rank_count(&self) -> usize {
        self.meta.rank.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::RankMetadata;

    pub(crate) fn chart(chart_idx: u32, song_idx: u32, chart_type: &str, level: u32) -> ChartData {
        ChartData {
            chart_idx,
            song_idx,
            chart_type: chart_type.to_string(),
            level,
            ..Default::default()
        }
    }

    pub(crate) fn song(song_idx: u32, title: &str, artist: &str, charts: Vec<ChartData>) -> SongData {
        SongData {
            song_idx,
            title: title.to_string(),
            artist: artist.to_string(),
            chart: charts,
            ..Default::default()
        }
    }

    pub(crate) fn sample_catalogue() -> ChartMetaResponse {
        ChartMetaResponse {
            meta_data: MetaData::default(),
            chart_data: vec![
                Some(song(
                    1,
                    "Flower",
                    "Ryu",
                    vec![chart(10, 1, "EXH", 15), chart(11, 1, "MXM", 18)],
                )),
                None,
                Some(song(2, "Max Burning", "DJ Noriken", vec![chart(20, 2, "GRV", 19)])),
                Some(song(3, "Empty", "Nobody", Vec::new())),
            ],
        }
    }

    /// `sample_catalogue` with a rank table of `ranks` entries
    pub(crate) fn ranked_catalogue(ranks: usize) -> ChartMetaResponse {
        let mut catalogue = sample_catalogue();
        catalogue.meta_data.rank = (0..ranks)
            .map(|i| RankMetadata {
                rank_name: format!("Rank {}", i),
                ..Default::default()
            })
            .collect();
        catalogue
    }

    #[test]
    fn test_build_and_lookup() {
        let index = ChartIndex::build(sample_catalogue());

        assert_eq!(index.len(), 3);
        assert_eq!(index.songs().len(), 3);
        let entry = index.lookup(11).unwrap();
        assert_eq!(entry.song.title, "Flower");
        assert_eq!(entry.chart.chart_type, "MXM");
        assert!(index.lookup(99).is_none());
        assert!(index.contains_song(3));
    }

    #[test]
    fn test_resolve_missing_is_placeholder() {
        let index = ChartIndex::build(sample_catalogue());
        assert!(matches!(index.resolve(404), ResolvedChart::Missing(404)));
        assert!(matches!(index.resolve(20), ResolvedChart::Found(_)));
    }

    #[test]
    fn test_later_duplicate_overwrites() {
        let catalogue = ChartMetaResponse {
            meta_data: MetaData::default(),
            chart_data: vec![
                Some(song(1, "First", "a", vec![chart(5, 1, "NOV", 3)])),
                Some(song(2, "Second", "b", vec![chart(5, 2, "ADV", 9)])),
            ],
        };

        let index = ChartIndex::build(catalogue);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup(5).unwrap().song.title, "Second");
        // iteration still sees both rows in catalogue order
        assert_eq!(index.entries().count(), 2);
    }
}

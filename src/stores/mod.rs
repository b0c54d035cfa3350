//! In-memory stores for the chart catalogue and the editing workspace

pub(crate) mod catalogue_store;
mod editor_store;

pub use catalogue_store::{ChartEntry, ChartIndex, ResolvedChart};
pub use editor_store::EditorStore;

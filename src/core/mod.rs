//! Core library functions for tierdesk

pub mod export;
pub mod reorder;
pub mod search;
pub mod stats;
pub mod tierlib;
pub mod validation;

pub use reorder::{apply_drag, apply_drag_keys, DragKey, DropTarget, SlotPosition};
pub use search::SearchLib;
pub use stats::TierStats;
pub use tierlib::{ChartRefUpdate, NewChartRef, TierBook};

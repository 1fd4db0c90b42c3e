//! Vaultfeed core: catalog entry model and pure novelty detection.
mod entry;
mod novelty;
mod stage;

pub use entry::{Entry, EntryKind, EntryLists};
pub use novelty::{diff_against_store, NoveltyOutcome};
pub use stage::PipelineStage;

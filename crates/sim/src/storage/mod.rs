//! Storage module for recording and persisting simulation output.
//!
//! - [`EventRecorder`] builds a run's [`History`] step by step.
//! - [`HistoryFormat`] encodes a history as text rows.
//! - [`HistorySink`] persists histories under per-run destination names.
//! - [`TallyStore`] is the shared append-only record of run outcomes.
//! - [`concatenate_histories`] merges per-run artifacts for hand-off.

mod concat;
pub mod naming;
mod recorder;
mod sink;
mod tally;
pub mod types;

pub use concat::{concatenate_histories, ConcatStats, SOURCE_COLUMN};
pub use naming::{base_name, next_available_name};
pub use recorder::{EventRecorder, History, StepRecord};
pub use sink::{DirectorySink, HistorySink, HISTORY_EXTENSION};
pub use tally::{Tally, TallyStore};
pub use types::{CollisionPolicy, HistoryFormat, RecordingConfig};

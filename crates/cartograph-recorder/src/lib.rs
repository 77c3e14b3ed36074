//! # Cartograph Recorder
//!
//! The generic resource reconciliation engine. Once per refresh cycle a
//! collector delivers a full-replacement [`Snapshot`] of one scope's
//! infrastructure state; the [`Recorder`] diffs it against the cached
//! last-known state and applies minimal add/update/delete batches to the
//! store, keeping the in-memory [`Cache`] consistent for concurrent
//! external readers.
//!
//! ## Architecture
//!
//! ```text
//! collector ──► Snapshot (per type)
//!                  │
//!                  ▼               reads ids/names
//!            Updater<S> ◄─────────┐
//!           (diff/apply)          │
//!            │        │           │
//!            ▼        ▼           │
//!        Operator   Cache ────────┘
//!        (store)    (diff bases + tool data set)
//!                  ▲
//!   external readers (config push, query engine)
//! ```
//!
//! One [`UpdaterStrategy`] per resource type feeds the single generic
//! diff/apply routine; the [`Recorder`] runs all strategies in the
//! dependency order declared in `cartograph-core`, then recomputes the
//! denormalized projections.

pub mod cache;
pub mod config;
pub mod error;
pub mod operator;
pub mod pass;
pub mod projection;
pub mod snapshot;
pub mod updater;

pub use cache::{Cache, ToolDataSet};
pub use config::RecorderConfig;
pub use error::{RecorderError, RecorderResult};
pub use pass::{PassSummary, Recorder, Stores};
pub use snapshot::Snapshot;
pub use updater::{TypeCounts, Updater, UpdaterStrategy};

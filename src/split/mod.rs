//! # split
//!
//! Splits a GLF stream into one output container per fixed-width window of each
//! reference.
//!
//! - [`planner`]: window arithmetic
//! - [`namer`]: output file names and directories
//! - [`store`]: where outputs are created
//! - [`driver`]: the per-section state machine that ties them together
//!
//! Every output holds the input header, a copy of the reference section, and the
//! records of its window. The first record of each output is rebased so that its
//! offset is relative to the window start; later records keep their deltas.

pub mod driver;
pub mod namer;
pub mod planner;
pub mod store;

pub use driver::{
    OutputEntry, OutputKind, OutputSession, SectionState, SectionSummary, SplitDriver,
    SplitSummary,
};
pub use namer::{OutputLocation, OutputNamer, OUTPUT_EXTENSION};
pub use planner::{compute_window, gap_windows, has_gap, needs_new_window, tiling_end, ChunkWindow};
pub use store::{FsStore, OutputStore};

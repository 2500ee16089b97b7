//! # glfutil
//!
//! Reading, writing, and splitting of GLF (genotype likelihood format v3) files.
//!
//! The main operation is [`split`]: a GLF file is cut into one BGZF-compressed output
//! per fixed-width window of each reference, optionally with header-only placeholders
//! for windows that hold no records. [`dump`](dump::dump) prints a file in readable form.
//!
//! ```no_run
//! use glfutil::{CommandKind, SplitConfig};
//!
//! let config = SplitConfig {
//!     empty_glfs: true,
//!     ..SplitConfig::new("sample.glf")
//! };
//! CommandKind::Split(config).run(&mut std::io::stdout())?;
//! # Ok::<(), glfutil::Error>(())
//! ```

pub mod bgzf;
mod commands;
mod config;
pub mod dump;
pub mod error;
pub mod glf;
pub mod logging;
pub mod split;

pub use commands::{run_split, CommandKind};
pub use config::{DumpConfig, SplitConfig};
pub use error::{
    ArgumentError, Error, ErrorKind, HeaderError, RecordError, Result, WriteError,
};
pub use glf::{GlfHeader, GlfReader, GlfRecord, GlfWriter, RecordBody, RecordType, RefSection};
pub use split::{ChunkWindow, FsStore, OutputNamer, OutputStore, SplitDriver, SplitSummary};

//! # glf
//!
//! Reading and writing of GLF (genotype likelihood format, version 3) files.
//!
//! A GLF stream is laid out as:
//!
//! ```text
//! header            "GLF\3", i32 text length, text
//! reference section i32 name length (NUL included), name, u32 reference length
//!   record*         u8 type<<4 | ref base, type specific fields
//!   end marker      u8 0
//! reference section ...
//! ```
//!
//! All integers are little-endian. Record offsets are delta encoded within a section:
//! the first record of a section holds its absolute 0-based position, every later record
//! holds the distance from the record before it.
//!
//! Files are written as BGZF streams (see [`crate::bgzf`]); both compressed and plain
//! files can be read.

mod header;
mod reader;
mod record;
mod section;
mod writer;

pub use header::{GlfHeader, MAGIC};
pub use reader::GlfReader;
pub use record::{GlfRecord, RecordBody, RecordType, NUM_LIKELIHOODS, REF_BASES};
pub use section::RefSection;
pub use writer::GlfWriter;

use std::fmt;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use crate::error::{ArgumentError, Result};
use crate::split::OutputNamer;

/// Run parameters of the `split` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitConfig {
    /// GLF file to split
    pub input: PathBuf,

    /// Directory outputs are written into (defaults to the directory of the base name)
    pub out_dir: Option<PathBuf>,

    /// Base of every output file name (defaults to the input path without its extension)
    pub out_base: Option<String>,

    /// Width of each window in reference positions
    pub chunk_size: NonZeroU32,

    /// Write header-only outputs for windows without records
    pub empty_glfs: bool,

    /// Place each output in a `chr<ref>/<start>.<end>/` subdirectory
    pub region_dirs: bool,

    /// Print the resolved parameters before running
    pub print_params: bool,
}

impl SplitConfig {
    pub const DEFAULT_CHUNK_SIZE: NonZeroU32 = match NonZeroU32::new(5_000_000) {
        Some(size) => size,
        None => panic!("default chunk size is zero"),
    };

    /// Parameters with every optional value at its default
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            out_dir: None,
            out_base: None,
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            empty_glfs: false,
            region_dirs: false,
            print_params: false,
        }
    }

    /// Validates a chunk size as given on the command line
    ///
    /// The value must be positive and fit in a 32-bit position.
    pub fn chunk_size_from(value: i64) -> Result<NonZeroU32> {
        u32::try_from(value)
            .ok()
            .and_then(NonZeroU32::new)
            .ok_or_else(|| ArgumentError::InvalidChunkSize(value).into())
    }

    /// Checks the parameters that cannot be checked by their types
    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(ArgumentError::MissingArgument("in").into());
        }
        self.namer().map(|_| ())
    }

    /// Resolves the output base name and directory
    pub fn namer(&self) -> Result<OutputNamer> {
        OutputNamer::resolve(
            &self.input,
            self.out_base.as_deref(),
            self.out_dir.as_deref(),
            self.region_dirs,
        )
    }
}

/// Run parameters of the `dump` command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpConfig {
    /// GLF file to print
    pub input: PathBuf,

    /// Print the resolved parameters before running
    pub print_params: bool,
}

impl DumpConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            print_params: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.input.as_os_str().is_empty() {
            return Err(ArgumentError::MissingArgument("in").into());
        }
        Ok(())
    }
}

fn write_path(f: &mut fmt::Formatter<'_>, name: &str, path: Option<&Path>) -> fmt::Result {
    match path {
        Some(path) => writeln!(f, "\t{name:<12}: {}", path.display()),
        None => writeln!(f, "\t{name:<12}: "),
    }
}

fn write_flag(f: &mut fmt::Formatter<'_>, name: &str, value: bool) -> fmt::Result {
    writeln!(f, "\t{name:<12}: {}", if value { "ON" } else { "OFF" })
}

/// Parameter status, one `--name : value` line per parameter
///
/// The output base and directory are shown as resolved from the input path. If they
/// cannot be resolved, the values as given are shown.
impl fmt::Display for SplitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input Parameters")?;
        writeln!(f, "Required Parameters")?;
        write_path(f, "--in", Some(&self.input))?;
        writeln!(f, "Optional Other Parameters")?;
        match self.namer() {
            Ok(namer) => {
                write_path(f, "--outDir", namer.out_dir())?;
                writeln!(f, "\t{:<12}: {}", "--outBase", namer.base())?;
            }
            Err(_) => {
                write_path(f, "--outDir", self.out_dir.as_deref())?;
                writeln!(f, "\t{:<12}: {}", "--outBase", self.out_base.as_deref().unwrap_or(""))?;
            }
        }
        writeln!(f, "\t{:<12}: {}", "--chunkSize", self.chunk_size)?;
        write_flag(f, "--emptyGlfs", self.empty_glfs)?;
        write_flag(f, "--regionDirs", self.region_dirs)?;
        write_flag(f, "--params", self.print_params)
    }
}

impl fmt::Display for DumpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input Parameters")?;
        writeln!(f, "Required Parameters")?;
        write_path(f, "--in", Some(&self.input))?;
        writeln!(f, "Optional Other Parameters")?;
        write_flag(f, "--params", self.print_params)
    }
}

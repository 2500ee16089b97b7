use std::path::PathBuf;

/// Custom Result type for glfutil operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the glfutil library, encompassing all possible error cases
/// that can occur while reading, splitting, or writing GLF files.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Errors related to GLF header processing
    #[error(transparent)]
    HeaderError(#[from] HeaderError),
    /// Errors that occur while decoding reference sections or records
    #[error(transparent)]
    RecordError(#[from] RecordError),
    /// Errors that occur while writing a GLF container
    #[error(transparent)]
    WriteError(#[from] WriteError),
    /// Invalid or missing run parameters
    #[error(transparent)]
    ArgumentError(#[from] ArgumentError),
    /// Standard I/O errors from the Rust standard library
    #[error(transparent)]
    IoError(#[from] std::io::Error),
    /// I/O errors tied to a specific file or directory
    #[error("{}: {source}", path.display())]
    PathError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The three families of failure a run can end with.
///
/// All of them are fatal: the first occurrence aborts processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid parameters
    Argument,
    /// Open, read, write, or directory creation failure
    Io,
    /// Malformed header or record
    Format,
}

impl Error {
    /// Wraps an I/O error with the path it occurred on
    pub fn at_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::PathError {
            path: path.into(),
            source,
        }
    }

    /// Maps an I/O error hit while decoding
    ///
    /// A stream that ends early is malformed input and becomes the error built by
    /// `truncated`. Any other failure stays an I/O error.
    pub(crate) fn decoding<E: Into<Error>>(
        source: std::io::Error,
        truncated: impl FnOnce(std::io::Error) -> E,
    ) -> Self {
        if source.kind() == std::io::ErrorKind::UnexpectedEof {
            truncated(source).into()
        } else {
            Self::IoError(source)
        }
    }

    /// Classifies this error into one of the run failure families
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ArgumentError(_) => ErrorKind::Argument,
            Self::IoError(_) | Self::PathError { .. } => ErrorKind::Io,
            Self::HeaderError(_) | Self::RecordError(_) | Self::WriteError(_) => ErrorKind::Format,
        }
    }
}

/// Errors specific to processing and validating GLF headers
#[derive(thiserror::Error, Debug)]
pub enum HeaderError {
    /// The magic bytes at the start of the stream are not `GLF\3`
    ///
    /// # Arguments
    /// * `[u8; 4]` - The bytes that were found instead
    #[error("Invalid magic number: {0:?}")]
    InvalidMagicNumber([u8; 4]),

    /// The header text length is negative
    ///
    /// # Arguments
    /// * `i32` - The length field that was read
    #[error("Invalid header text length: {0}")]
    InvalidTextLength(i32),

    /// The stream ended before the header was complete
    #[error("Unexpected end of stream while reading the header")]
    Truncated(#[source] std::io::Error),
}

/// Errors that can occur while decoding reference sections and records
#[derive(thiserror::Error, Debug)]
pub enum RecordError {
    /// The record type nibble is not one of the known record types
    ///
    /// # Arguments
    /// * `u8` - The type value that was found
    #[error("Unknown record type: {0}")]
    UnknownRecordType(u8),

    /// The reference name length is not positive
    ///
    /// # Arguments
    /// * `i32` - The length field that was read
    #[error("Invalid reference name length: {0}")]
    InvalidNameLength(i32),

    /// The reference name is not NUL terminated
    #[error("Reference name is not NUL terminated")]
    UnterminatedName,

    /// The stream ended inside a reference section header
    ///
    /// # Arguments
    /// * `usize` - The number of sections read before the truncation
    #[error("Unexpected end of stream in reference section {1}")]
    TruncatedSection(#[source] std::io::Error, usize),

    /// The stream ended inside a record
    ///
    /// # Arguments
    /// * `usize` - The number of records read in the section before the truncation
    #[error("Unexpected end of stream in record {1} of the current section")]
    TruncatedRecord(#[source] std::io::Error, usize),

    /// The accumulated position no longer fits in 32 bits
    ///
    /// # Fields
    /// * `position` - The absolute position before the record
    /// * `offset` - The offset of the record that overflowed
    #[error("Record position overflow: {position} + {offset}")]
    PositionOverflow { position: u32, offset: u32 },
}

/// Errors that can occur while writing GLF containers
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    /// A reference section or record was written before the header
    #[error("The header must be written before any section or record")]
    MissingHeader,

    /// The header was written twice
    #[error("The header has already been written")]
    DuplicateHeader,

    /// A record was written outside of a reference section
    #[error("Records must be written inside a reference section")]
    MissingRefSection,

    /// An indel sequence does not match its declared length
    ///
    /// # Fields
    /// * `declared` - The signed length field of the record
    /// * `actual` - The number of sequence bytes present
    #[error("Indel sequence has {actual} bases but its length field is {declared}")]
    IndelLengthMismatch { declared: i16, actual: usize },

    /// A text field is longer than its length field can express
    ///
    /// # Arguments
    /// * `usize` - The text length
    #[error("Field of length {0} does not fit in 32 bits")]
    FieldTooLong(usize),
}

/// Errors in the run parameters
#[derive(thiserror::Error, Debug)]
pub enum ArgumentError {
    /// A mandatory argument was not given
    ///
    /// # Arguments
    /// * `&'static str` - The flag name
    #[error("Missing mandatory argument: --{0}")]
    MissingArgument(&'static str),

    /// The chunk size is zero, negative, or larger than a 32-bit position
    ///
    /// # Arguments
    /// * `i64` - The chunk size that was given
    #[error("Invalid chunk size: {0} (must be between 1 and 4294967295)")]
    InvalidChunkSize(i64),

    /// The output base name resolves to an empty file name
    #[error("Output base name is empty")]
    EmptyOutBase,
}

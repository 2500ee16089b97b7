//! GLF file header
//!
//! The header is the first thing in every GLF stream: the magic bytes `GLF\3`
//! followed by a length-prefixed block of free text. Placeholder outputs consist of
//! nothing but this header.

use std::borrow::Cow;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, HeaderError, Result, WriteError};

/// Magic bytes: "GLF" followed by the format version 3
pub const MAGIC: [u8; 4] = *b"GLF\x03";

/// Header structure for GLF files
///
/// The text is kept as raw bytes; it is copied verbatim into every output container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlfHeader {
    /// Free text following the magic bytes
    text: Vec<u8>,
}
impl GlfHeader {
    /// Creates a new header with the given text
    #[must_use]
    pub fn new(text: impl Into<Vec<u8>>) -> Self {
        Self { text: text.into() }
    }

    /// Returns the raw header text
    #[must_use]
    pub fn text_bytes(&self) -> &[u8] {
        &self.text
    }

    /// Returns the header text, replacing invalid UTF-8 sequences
    #[must_use]
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    /// Number of bytes the header occupies in the uncompressed stream
    #[must_use]
    pub fn size(&self) -> usize {
        MAGIC.len() + 4 + self.text.len()
    }

    /// Reads a header from a reader
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// * The magic bytes are not `GLF\3`
    /// * The text length is negative
    /// * The stream ends before the header is complete
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut magic = [0u8; 4];
        reader
            .read_exact(&mut magic)
            .map_err(|e| Error::decoding(e, HeaderError::Truncated))?;
        if magic != MAGIC {
            return Err(HeaderError::InvalidMagicNumber(magic).into());
        }

        let l_text = reader
            .read_i32::<LittleEndian>()
            .map_err(|e| Error::decoding(e, HeaderError::Truncated))?;
        if l_text < 0 {
            return Err(HeaderError::InvalidTextLength(l_text).into());
        }

        // the buffer only grows as bytes arrive
        let expected = u64::from(l_text.unsigned_abs());
        let mut text = Vec::new();
        reader
            .by_ref()
            .take(expected)
            .read_to_end(&mut text)
            .map_err(|e| Error::decoding(e, HeaderError::Truncated))?;
        if text.len() as u64 != expected {
            return Err(HeaderError::Truncated(io::ErrorKind::UnexpectedEof.into()).into());
        }
        Ok(Self { text })
    }

    /// Writes the header to a writer
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        let Ok(l_text) = i32::try_from(self.text.len()) else {
            return Err(WriteError::FieldTooLong(self.text.len()).into());
        };
        writer.write_all(&MAGIC)?;
        writer.write_i32::<LittleEndian>(l_text)?;
        writer.write_all(&self.text)?;
        Ok(())
    }
}

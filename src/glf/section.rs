use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, RecordError, Result, WriteError};

/// Metadata for one reference sequence (chromosome or contig)
///
/// A section scopes the coordinate space of the records that follow it, starting at 1
/// and running to `ref_len`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefSection {
    /// Reference sequence name
    name: String,

    /// Reference sequence length
    ref_len: u32,
}
impl RefSection {
    #[must_use]
    pub fn new(name: impl Into<String>, ref_len: u32) -> Self {
        Self {
            name: name.into(),
            ref_len,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn ref_len(&self) -> u32 {
        self.ref_len
    }

    /// Reads the name and length of a section, given its already-read name length field
    ///
    /// `index` is the number of sections read before this one and is only used for
    /// error reporting.
    pub(crate) fn from_reader<R: Read>(reader: &mut R, l_name: i32, index: usize) -> Result<Self> {
        if l_name <= 0 {
            return Err(RecordError::InvalidNameLength(l_name).into());
        }
        let truncated = |e: io::Error| Error::decoding(e, |e| RecordError::TruncatedSection(e, index));

        let expected = u64::from(l_name.unsigned_abs());
        let mut name = Vec::new();
        reader
            .by_ref()
            .take(expected)
            .read_to_end(&mut name)
            .map_err(truncated)?;
        if name.len() as u64 != expected {
            return Err(truncated(io::ErrorKind::UnexpectedEof.into()));
        }
        let ref_len = reader.read_u32::<LittleEndian>().map_err(truncated)?;

        if name.pop() != Some(0) {
            return Err(RecordError::UnterminatedName.into());
        }
        // Some writers pad the name with extra NULs
        while name.last() == Some(&0) {
            name.pop();
        }
        Ok(Self {
            name: String::from_utf8_lossy(&name).into_owned(),
            ref_len,
        })
    }

    /// Writes the section header (name length, NUL-terminated name, reference length)
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        let l_name = self.name.len() + 1;
        let Ok(l_name_field) = i32::try_from(l_name) else {
            return Err(WriteError::FieldTooLong(l_name).into());
        };
        writer.write_i32::<LittleEndian>(l_name_field)?;
        writer.write_all(self.name.as_bytes())?;
        writer.write_u8(0)?;
        writer.write_u32::<LittleEndian>(self.ref_len)?;
        Ok(())
    }
}

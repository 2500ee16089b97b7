use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::record::write_end_of_section;
use super::{GlfHeader, GlfRecord, RefSection};
use crate::bgzf::{self, BgzfWriter};
use crate::error::{Error, Result, WriteError};

/// Writes a GLF file as a BGZF stream
///
/// The header must be written first. Each call to [`GlfWriter::write_ref_section`] starts
/// a new section and terminates the previous one; [`GlfWriter::finish`] terminates the
/// last section and closes the compressed stream. A file holding only a header is valid.
pub struct GlfWriter<W: Write> {
    /// Compressed output stream
    inner: BgzfWriter<W>,

    /// Whether the header has been written
    header_written: bool,

    /// Whether a section is open and needs an end marker
    in_section: bool,

    /// Number of records written
    n_records: usize,
}

impl GlfWriter<BufWriter<File>> {
    /// Creates (or truncates) a GLF file for writing
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::at_path(path, e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> GlfWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: bgzf::writer(inner),
            header_written: false,
            in_section: false,
            n_records: 0,
        }
    }

    pub fn write_header(&mut self, header: &GlfHeader) -> Result<()> {
        if self.header_written {
            return Err(WriteError::DuplicateHeader.into());
        }
        header.write_bytes(&mut self.inner)?;
        self.header_written = true;
        Ok(())
    }

    pub fn write_ref_section(&mut self, section: &RefSection) -> Result<()> {
        if !self.header_written {
            return Err(WriteError::MissingHeader.into());
        }
        self.end_section()?;
        section.write_bytes(&mut self.inner)?;
        self.in_section = true;
        Ok(())
    }

    pub fn write_record(&mut self, record: &GlfRecord) -> Result<()> {
        if !self.in_section {
            return Err(WriteError::MissingRefSection.into());
        }
        record.write_bytes(&mut self.inner)?;
        self.n_records += 1;
        Ok(())
    }

    /// Number of records written
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.n_records
    }

    fn end_section(&mut self) -> Result<()> {
        if self.in_section {
            write_end_of_section(&mut self.inner)?;
            self.in_section = false;
        }
        Ok(())
    }

    /// Terminates the open section, closes the compressed stream, and returns the inner writer
    pub fn finish(mut self) -> Result<W> {
        if !self.header_written {
            return Err(WriteError::MissingHeader.into());
        }
        self.end_section()?;
        let mut inner = self.inner.finish()?;
        inner.flush()?;
        Ok(inner)
    }
}

#[cfg(test)]
mod testing {

    use super::*;
    use crate::bgzf::{GlfInput, EOF_BLOCK};
    use crate::glf::{GlfReader, NUM_LIKELIHOODS};
    use std::io::Cursor;

    #[test]
    fn test_header_only_stream() -> Result<()> {
        let mut writer = GlfWriter::new(Vec::new());
        writer.write_header(&GlfHeader::new("abc"))?;
        let bytes = writer.finish()?;
        assert!(bytes.ends_with(&EOF_BLOCK));

        let mut plain = Vec::new();
        std::io::copy(&mut GlfInput::new(Cursor::new(bytes))?, &mut plain)?;
        assert_eq!(plain, b"GLF\x03\x03\0\0\0abc");
        Ok(())
    }

    #[test]
    fn test_section_end_markers() -> Result<()> {
        let mut writer = GlfWriter::new(Vec::new());
        writer.write_header(&GlfHeader::default())?;
        writer.write_ref_section(&RefSection::new("1", 10))?;
        writer.write_ref_section(&RefSection::new("2", 10))?;
        let bytes = writer.finish()?;

        let mut plain = Vec::new();
        std::io::copy(&mut GlfInput::new(Cursor::new(bytes))?, &mut plain)?;
        // header, section 1, marker, section 2, marker
        let section_len = 4 + 2 + 4;
        assert_eq!(plain.len(), 8 + section_len + 1 + section_len + 1);
        assert_eq!(plain[8 + section_len], 0);
        assert_eq!(plain[plain.len() - 1], 0);
        Ok(())
    }

    #[test]
    fn test_ordering_is_enforced() -> Result<()> {
        let mut writer = GlfWriter::new(Vec::new());
        assert!(matches!(
            writer.write_ref_section(&RefSection::new("1", 10)),
            Err(Error::WriteError(WriteError::MissingHeader))
        ));
        writer.write_header(&GlfHeader::default())?;
        assert!(matches!(
            writer.write_header(&GlfHeader::default()),
            Err(Error::WriteError(WriteError::DuplicateHeader))
        ));
        let record = GlfRecord::new_snp(1, 0, 1, 0, 0, [0; NUM_LIKELIHOODS]);
        assert!(matches!(
            writer.write_record(&record),
            Err(Error::WriteError(WriteError::MissingRefSection))
        ));
        Ok(())
    }

    #[test]
    fn test_file_round_trip() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let path = dir.path().join("round.glf");

        let record = GlfRecord::new_snp(4, 77, 12, 3, 50, [9; NUM_LIKELIHOODS]);
        let mut writer = GlfWriter::create(&path)?;
        writer.write_header(&GlfHeader::new("h"))?;
        writer.write_ref_section(&RefSection::new("chrM", 16_569))?;
        writer.write_record(&record)?;
        assert_eq!(writer.n_records(), 1);
        writer.finish()?;

        let mut reader = GlfReader::from_path(&path)?;
        let section = reader.next_ref_section()?.expect("section");
        assert_eq!(section.ref_len(), 16_569);
        assert_eq!(reader.next_record()?, Some(record));
        assert!(reader.next_ref_section()?.is_none());
        Ok(())
    }
}

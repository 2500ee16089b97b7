use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use tracing::debug;

use super::record::split_type_byte;
use super::{GlfHeader, GlfRecord, RecordType, RefSection};
use crate::bgzf::GlfInput;
use crate::error::{Error, RecordError, Result};

/// Streaming reader for GLF files
///
/// The reader walks the file strictly forward: header, then each reference section
/// followed by its records. Records of a section that the caller did not consume are
/// skipped when the next section is requested.
///
/// # Example
///
/// ```no_run
/// use glfutil::GlfReader;
///
/// let mut reader = GlfReader::from_path("sample.glf")?;
/// reader.read_header()?;
/// while let Some(section) = reader.next_ref_section()? {
///     let mut n = 0;
///     while let Some(_record) = reader.next_record()? {
///         n += 1;
///     }
///     println!("{}: {} records", section.name(), n);
/// }
/// # Ok::<(), glfutil::Error>(())
/// ```
#[derive(Debug)]
pub struct GlfReader<R: Read> {
    inner: R,

    /// Header, once read
    header: Option<GlfHeader>,

    /// Whether records of the current section remain
    in_section: bool,

    /// Number of sections read so far
    n_sections: usize,

    /// Number of records read in the current section
    n_section_records: usize,

    /// Number of records read in total
    n_records: usize,
}

impl GlfReader<GlfInput<BufReader<File>>> {
    /// Opens a GLF file for reading, BGZF compressed or not
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::at_path(path, e))?;
        let input = GlfInput::new(BufReader::new(file)).map_err(|e| Error::at_path(path, e))?;
        debug!(path = %path.display(), compressed = input.is_compressed(), "opened GLF input");
        Ok(Self::new(input))
    }
}

impl<R: Read> GlfReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            header: None,
            in_section: false,
            n_sections: 0,
            n_section_records: 0,
            n_records: 0,
        }
    }

    /// Reads and validates the header
    ///
    /// The header is cached; calling this again returns the same header without reading.
    pub fn read_header(&mut self) -> Result<&GlfHeader> {
        let header = match self.header.take() {
            Some(header) => header,
            None => GlfHeader::from_reader(&mut self.inner)?,
        };
        Ok(self.header.insert(header))
    }

    /// Returns the header if it has been read
    #[must_use]
    pub fn header(&self) -> Option<&GlfHeader> {
        self.header.as_ref()
    }

    /// Advances to the next reference section
    ///
    /// Reads the header first if needed. Returns `Ok(None)` at the end of the stream.
    pub fn next_ref_section(&mut self) -> Result<Option<RefSection>> {
        self.read_header()?;
        while self.next_record()?.is_some() {}

        let mut l_name = [0u8; 4];
        let n_sections = self.n_sections;
        if !read_exact_or_eof(&mut self.inner, &mut l_name)
            .map_err(|e| Error::decoding(e, |e| RecordError::TruncatedSection(e, n_sections)))?
        {
            return Ok(None);
        }
        let section =
            RefSection::from_reader(&mut self.inner, i32::from_le_bytes(l_name), n_sections)?;

        self.n_sections += 1;
        self.n_section_records = 0;
        self.in_section = true;
        Ok(Some(section))
    }

    /// Reads the next record of the current reference section
    ///
    /// Returns `Ok(None)` at the end-of-section marker, or if no section is active.
    /// A stream that ends without the marker also ends the section.
    pub fn next_record(&mut self) -> Result<Option<GlfRecord>> {
        if !self.in_section {
            return Ok(None);
        }

        let index = self.n_section_records;
        let mut type_byte = [0u8; 1];
        if !read_exact_or_eof(&mut self.inner, &mut type_byte)
            .map_err(|e| Error::decoding(e, |e| RecordError::TruncatedRecord(e, index)))?
        {
            self.in_section = false;
            return Ok(None);
        }

        let (rtype, ref_base) = split_type_byte(type_byte[0]);
        let rtype = RecordType::try_from(rtype)?;
        match GlfRecord::from_reader(&mut self.inner, rtype, ref_base, index)? {
            Some(record) => {
                self.n_section_records += 1;
                self.n_records += 1;
                Ok(Some(record))
            }
            None => {
                self.in_section = false;
                Ok(None)
            }
        }
    }

    /// Number of reference sections read so far
    #[must_use]
    pub fn n_sections(&self) -> usize {
        self.n_sections
    }

    /// Number of records read so far, over all sections
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.n_records
    }
}

/// Fills `buf` completely, or reads nothing at all at the end of the stream
///
/// Returns `Ok(false)` on a clean end of stream and an `UnexpectedEof` error if the
/// stream ends part way through `buf`.
fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<bool> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) if filled == 0 => return Ok(false),
            Ok(0) => return Err(io::ErrorKind::UnexpectedEof.into()),
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

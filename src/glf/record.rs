use std::fmt;
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::error::{Error, RecordError, Result, WriteError};

/// Number of genotype likelihoods stored in a SNP record
pub const NUM_LIKELIHOODS: usize = 10;

/// Reference base symbols indexed by the 4-bit reference base code
pub const REF_BASES: &[u8; 16] = b"XACMGRSVTWYHKDBN";

/// Mask for the 24-bit read depth in the packed `min_depth` field
const DEPTH_MASK: u32 = 0x00ff_ffff;

/// The kind of a record, stored in the upper nibble of its first byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// Terminates a reference section; carries no further data
    EndOfSection = 0,
    /// Single nucleotide likelihoods
    Snp = 1,
    /// Insertion/deletion likelihoods
    Indel = 2,
}
impl TryFrom<u8> for RecordType {
    type Error = RecordError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::EndOfSection),
            1 => Ok(Self::Snp),
            2 => Ok(Self::Indel),
            x => Err(RecordError::UnknownRecordType(x)),
        }
    }
}

/// Type-specific part of a record
///
/// The splitter never looks inside the body; it is carried through byte for byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordBody {
    Snp {
        likelihoods: [u8; NUM_LIKELIHOODS],
    },
    Indel {
        lk_hom1: u8,
        lk_hom2: u8,
        lk_het: u8,
        /// Signed length of the first indel allele (negative for deletions)
        len1: i16,
        /// Signed length of the second indel allele (negative for deletions)
        len2: i16,
        seq1: Vec<u8>,
        seq2: Vec<u8>,
    },
}

/// A single GLF record (SNP or indel)
///
/// `offset` is delta encoded: it is the distance from the previous record of the same
/// reference section, or the absolute 0-based position for the first record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlfRecord {
    /// 4-bit reference base code
    ref_base: u8,

    /// Position relative to the previous record
    offset: u32,

    /// Minimum likelihood in the upper 8 bits, read depth in the lower 24
    min_depth: u32,

    /// Root mean square of the mapping qualities
    rms_mapq: u8,

    body: RecordBody,
}
impl GlfRecord {
    #[must_use]
    pub fn new_snp(
        ref_base: u8,
        offset: u32,
        read_depth: u32,
        min_lk: u8,
        rms_mapq: u8,
        likelihoods: [u8; NUM_LIKELIHOODS],
    ) -> Self {
        Self {
            ref_base: ref_base & 0x0f,
            offset,
            min_depth: pack_min_depth(min_lk, read_depth),
            rms_mapq,
            body: RecordBody::Snp { likelihoods },
        }
    }

    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new_indel(
        ref_base: u8,
        offset: u32,
        read_depth: u32,
        min_lk: u8,
        rms_mapq: u8,
        (lk_hom1, lk_hom2, lk_het): (u8, u8, u8),
        (len1, seq1): (i16, Vec<u8>),
        (len2, seq2): (i16, Vec<u8>),
    ) -> Self {
        Self {
            ref_base: ref_base & 0x0f,
            offset,
            min_depth: pack_min_depth(min_lk, read_depth),
            rms_mapq,
            body: RecordBody::Indel {
                lk_hom1,
                lk_hom2,
                lk_het,
                len1,
                len2,
                seq1,
                seq2,
            },
        }
    }

    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self.body {
            RecordBody::Snp { .. } => RecordType::Snp,
            RecordBody::Indel { .. } => RecordType::Indel,
        }
    }

    #[must_use]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn set_offset(&mut self, offset: u32) {
        self.offset = offset;
    }

    #[must_use]
    pub fn ref_base(&self) -> u8 {
        self.ref_base
    }

    /// Reference base as an IUPAC symbol
    #[must_use]
    pub fn ref_base_symbol(&self) -> char {
        REF_BASES[usize::from(self.ref_base & 0x0f)] as char
    }

    #[must_use]
    pub fn read_depth(&self) -> u32 {
        self.min_depth & DEPTH_MASK
    }

    #[must_use]
    pub fn min_lk(&self) -> u8 {
        (self.min_depth >> 24) as u8
    }

    #[must_use]
    pub fn rms_mapq(&self) -> u8 {
        self.rms_mapq
    }

    #[must_use]
    pub fn body(&self) -> &RecordBody {
        &self.body
    }

    /// Reads the remainder of a record whose type byte has already been consumed
    ///
    /// `index` is the number of records already read in the section and is only used
    /// for error reporting.
    pub(crate) fn from_reader<R: Read>(
        reader: &mut R,
        rtype: RecordType,
        ref_base: u8,
        index: usize,
    ) -> Result<Option<Self>> {
        if rtype == RecordType::EndOfSection {
            return Ok(None);
        }
        let truncated = |e: io::Error| Error::decoding(e, |e| RecordError::TruncatedRecord(e, index));

        let offset = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let min_depth = reader.read_u32::<LittleEndian>().map_err(truncated)?;
        let rms_mapq = reader.read_u8().map_err(truncated)?;

        let body = if rtype == RecordType::Snp {
            let mut likelihoods = [0u8; NUM_LIKELIHOODS];
            reader.read_exact(&mut likelihoods).map_err(truncated)?;
            RecordBody::Snp { likelihoods }
        } else {
            let mut lks = [0u8; 3];
            reader.read_exact(&mut lks).map_err(truncated)?;
            let len1 = reader.read_i16::<LittleEndian>().map_err(truncated)?;
            let len2 = reader.read_i16::<LittleEndian>().map_err(truncated)?;
            let mut seq1 = vec![0u8; usize::from(len1.unsigned_abs())];
            reader.read_exact(&mut seq1).map_err(truncated)?;
            let mut seq2 = vec![0u8; usize::from(len2.unsigned_abs())];
            reader.read_exact(&mut seq2).map_err(truncated)?;
            RecordBody::Indel {
                lk_hom1: lks[0],
                lk_hom2: lks[1],
                lk_het: lks[2],
                len1,
                len2,
                seq1,
                seq2,
            }
        };

        Ok(Some(Self {
            ref_base,
            offset,
            min_depth,
            rms_mapq,
            body,
        }))
    }

    /// Writes the record, type byte included
    pub fn write_bytes<W: Write>(&self, writer: &mut W) -> Result<()> {
        if let RecordBody::Indel {
            len1,
            len2,
            seq1,
            seq2,
            ..
        } = &self.body
        {
            check_indel_len(*len1, seq1)?;
            check_indel_len(*len2, seq2)?;
        }
        writer.write_u8(type_byte(self.record_type(), self.ref_base))?;
        writer.write_u32::<LittleEndian>(self.offset)?;
        writer.write_u32::<LittleEndian>(self.min_depth)?;
        writer.write_u8(self.rms_mapq)?;
        match &self.body {
            RecordBody::Snp { likelihoods } => writer.write_all(likelihoods)?,
            RecordBody::Indel {
                lk_hom1,
                lk_hom2,
                lk_het,
                len1,
                len2,
                seq1,
                seq2,
            } => {
                writer.write_all(&[*lk_hom1, *lk_hom2, *lk_het])?;
                writer.write_i16::<LittleEndian>(*len1)?;
                writer.write_i16::<LittleEndian>(*len2)?;
                writer.write_all(seq1)?;
                writer.write_all(seq2)?;
            }
        }
        Ok(())
    }
}

/// Writes the record that terminates a reference section
pub fn write_end_of_section<W: Write>(writer: &mut W) -> Result<()> {
    writer.write_u8(type_byte(RecordType::EndOfSection, 0))?;
    Ok(())
}

/// Splits a record's first byte into its type and reference base
pub fn split_type_byte(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0f)
}

fn type_byte(rtype: RecordType, ref_base: u8) -> u8 {
    ((rtype as u8) << 4) | (ref_base & 0x0f)
}

fn pack_min_depth(min_lk: u8, read_depth: u32) -> u32 {
    (u32::from(min_lk) << 24) | read_depth.min(DEPTH_MASK)
}

fn check_indel_len(declared: i16, seq: &[u8]) -> Result<()> {
    if usize::from(declared.unsigned_abs()) == seq.len() {
        Ok(())
    } else {
        Err(WriteError::IndelLengthMismatch {
            declared,
            actual: seq.len(),
        }
        .into())
    }
}

impl fmt::Display for GlfRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type = {}; RefBase = {}; Offset = {}; Depth = {}; MinLk = {}; MapQ = {}",
            self.record_type() as u8,
            self.ref_base_symbol(),
            self.offset,
            self.read_depth(),
            self.min_lk(),
            self.rms_mapq
        )?;
        match &self.body {
            RecordBody::Snp { likelihoods } => {
                write!(f, "; Lk =")?;
                for lk in likelihoods {
                    write!(f, " {lk}")?;
                }
                Ok(())
            }
            RecordBody::Indel {
                lk_hom1,
                lk_hom2,
                lk_het,
                len1,
                len2,
                seq1,
                seq2,
            } => write!(
                f,
                "; LkHom1 = {lk_hom1}; LkHom2 = {lk_hom2}; LkHet = {lk_het}; Len1 = {len1}; Len2 = {len2}; Seq1 = {}; Seq2 = {}",
                String::from_utf8_lossy(seq1),
                String::from_utf8_lossy(seq2)
            ),
        }
    }
}

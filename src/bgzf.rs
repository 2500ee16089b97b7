//! Blocked gzip (BGZF) streams
//!
//! GLF files are stored as a series of independent gzip members, each tagged with its
//! own size in a `BC` extra subfield and followed by an empty end-of-file member.
//! Writing goes through [`noodles_bgzf::Writer`], which fixes the modification time
//! at zero, so the same input always produces the same bytes. Any multi-member gzip
//! reader can decompress the result, so reading goes through
//! [`flate2::bufread::MultiGzDecoder`] and accepts plain uncompressed GLF as well.

use std::io::{self, BufRead, Read, Write};

use flate2::bufread::MultiGzDecoder;

/// BGZF stream writer used for every output
pub type BgzfWriter<W> = noodles_bgzf::Writer<W>;

/// Gzip magic bytes
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Wraps `inner` in a BGZF writer
///
/// The stream is terminated by [`BgzfWriter::finish`], or on drop if it was never
/// finished.
pub fn writer<W: Write>(inner: W) -> BgzfWriter<W> {
    noodles_bgzf::Writer::new(inner)
}

/// A GLF input stream, either BGZF compressed or plain
pub enum GlfInput<R: BufRead> {
    Bgzf(MultiGzDecoder<R>),
    Plain(R),
}
impl<R: BufRead> GlfInput<R> {
    /// Sniffs the first bytes of the stream and picks the matching decoder
    pub fn new(mut inner: R) -> io::Result<Self> {
        let is_gzip = {
            let head = inner.fill_buf()?;
            head.len() >= 2 && head[..2] == GZIP_MAGIC
        };
        if is_gzip {
            Ok(Self::Bgzf(MultiGzDecoder::new(inner)))
        } else {
            Ok(Self::Plain(inner))
        }
    }

    #[must_use]
    pub fn is_compressed(&self) -> bool {
        matches!(self, Self::Bgzf(_))
    }
}

impl<R: BufRead> Read for GlfInput<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Self::Bgzf(decoder) => decoder.read(buf),
            Self::Plain(inner) => inner.read(buf),
        }
    }
}

/// The empty member that ends every BGZF stream
#[cfg(test)]
pub(crate) const EOF_BLOCK: [u8; 28] = [
    0x1f, 0x8b, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0xff, 0x06, 0x00, 0x42, 0x43, 0x02, 0x00,
    0x1b, 0x00, 0x03, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[cfg(test)]
mod testing {

    use super::*;
    use std::io::Cursor;

    fn compress(data: &[u8]) -> io::Result<Vec<u8>> {
        let mut writer = writer(Vec::new());
        writer.write_all(data)?;
        writer.finish()
    }

    fn decompress(data: &[u8]) -> io::Result<Vec<u8>> {
        let mut input = GlfInput::new(Cursor::new(data))?;
        let mut out = Vec::new();
        input.read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn test_empty_stream() -> io::Result<()> {
        let bytes = compress(b"")?;
        assert!(bytes.ends_with(&EOF_BLOCK));
        assert!(decompress(&bytes)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_multi_block() -> io::Result<()> {
        let data: Vec<u8> = (0..200_000).map(|i| (i % 251) as u8).collect();
        let bytes = compress(&data)?;
        assert!(bytes.ends_with(&EOF_BLOCK));
        assert_eq!(decompress(&bytes)?, data);
        Ok(())
    }

    #[test]
    fn test_block_is_tagged() -> io::Result<()> {
        let bytes = compress(b"GLF\x03 some payload")?;
        assert_eq!(&bytes[..2], &GZIP_MAGIC);
        assert_eq!(&bytes[12..14], b"BC");
        let bsize = usize::from(u16::from_le_bytes([bytes[16], bytes[17]])) + 1;
        assert_eq!(bytes.len(), bsize + EOF_BLOCK.len());
        Ok(())
    }

    #[test]
    fn test_deterministic_output() -> io::Result<()> {
        let data = b"identical input gives identical blocks".repeat(1000);
        assert_eq!(compress(&data)?, compress(&data)?);
        Ok(())
    }

    #[test]
    fn test_plain_passthrough() -> io::Result<()> {
        let input = GlfInput::new(Cursor::new(b"GLF\x03".to_vec()))?;
        assert!(!input.is_compressed());
        assert_eq!(decompress(b"GLF\x03")?, b"GLF\x03");
        Ok(())
    }

    #[test]
    fn test_finish_on_drop() -> io::Result<()> {
        let mut sink = Vec::new();
        {
            let mut writer = writer(&mut sink);
            writer.write_all(b"dropped without finish")?;
        }
        assert!(sink.ends_with(&EOF_BLOCK));
        assert_eq!(decompress(&sink)?, b"dropped without finish");
        Ok(())
    }
}

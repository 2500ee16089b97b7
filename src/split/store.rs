use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use auto_impl::auto_impl;

use crate::error::{Error, Result};

/// Destination for split outputs
///
/// The driver creates every directory and output file through this trait, so the whole
/// split can run against something other than the local filesystem.
#[auto_impl(&, Box)]
pub trait OutputStore {
    /// Byte sink for a single output file
    type Sink: Write;

    /// Creates a directory and all of its missing parents
    ///
    /// Must succeed if the directory already exists.
    fn create_dir_all(&self, dir: &Path) -> Result<()>;

    /// Creates (or truncates) an output file
    fn create(&self, path: &Path) -> Result<Self::Sink>;
}

/// Writes outputs to the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl OutputStore for FsStore {
    type Sink = BufWriter<File>;

    fn create_dir_all(&self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).map_err(|e| Error::at_path(dir, e))
    }

    fn create(&self, path: &Path) -> Result<Self::Sink> {
        let file = File::create(path).map_err(|e| Error::at_path(path, e))?;
        Ok(BufWriter::new(file))
    }
}

/// In-memory store used to inspect outputs in tests
#[cfg(test)]
pub(crate) mod memory {

    use std::cell::RefCell;
    use std::collections::BTreeSet;
    use std::io::{self, Cursor, Write};
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use super::OutputStore;
    use crate::bgzf::GlfInput;
    use crate::error::Result;
    use crate::glf::GlfReader;

    /// Shared growable buffer handed out as an output sink
    #[derive(Debug, Clone, Default)]
    pub struct MemorySink(Rc<RefCell<Vec<u8>>>);

    impl Write for MemorySink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.borrow_mut().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    pub struct MemoryStore {
        dirs: RefCell<BTreeSet<PathBuf>>,
        files: RefCell<Vec<(PathBuf, MemorySink)>>,
    }
    impl MemoryStore {
        /// Paths of all created files, in creation order
        pub fn paths(&self) -> Vec<PathBuf> {
            self.files.borrow().iter().map(|(p, _)| p.clone()).collect()
        }

        pub fn dirs(&self) -> Vec<PathBuf> {
            self.dirs.borrow().iter().cloned().collect()
        }

        pub fn bytes(&self, path: &Path) -> Option<Vec<u8>> {
            self.files
                .borrow()
                .iter()
                .find(|(p, _)| p == path)
                .map(|(_, sink)| sink.0.borrow().clone())
        }

        /// Opens a created file for reading
        pub fn reader(&self, path: &Path) -> Result<GlfReader<GlfInput<Cursor<Vec<u8>>>>> {
            let bytes = self.bytes(path).unwrap_or_default();
            Ok(GlfReader::new(GlfInput::new(Cursor::new(bytes))?))
        }
    }

    impl OutputStore for MemoryStore {
        type Sink = MemorySink;

        fn create_dir_all(&self, dir: &Path) -> Result<()> {
            self.dirs.borrow_mut().insert(dir.to_path_buf());
            Ok(())
        }

        fn create(&self, path: &Path) -> Result<Self::Sink> {
            let sink = MemorySink::default();
            self.files
                .borrow_mut()
                .push((path.to_path_buf(), sink.clone()));
            Ok(sink)
        }
    }
}

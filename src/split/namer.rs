use std::path::{Path, PathBuf};

use tracing::debug;

use super::planner::ChunkWindow;
use super::store::OutputStore;
use crate::error::{ArgumentError, Result};
use crate::glf::RefSection;

/// File extension of every output
pub const OUTPUT_EXTENSION: &str = "glf";

/// Builds output paths for windows
///
/// An output for reference `20`, window `[1, 100]` and base `sample` is named
/// `sample.20.1.100.glf`. It is placed in the output directory if there is one and, with
/// region directories enabled, in a `chr20/1.100/` subdirectory below that.
///
/// The window end in both the file name and the subdirectory is clamped to the reference
/// length, so the last window of `20` (length 250, chunk size 100) is `sample.20.201.250.glf`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNamer {
    base: String,
    out_dir: Option<PathBuf>,
    region_dirs: bool,
}

/// Where a single output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLocation {
    /// Directory that must exist before the file can be created
    pub dir: Option<PathBuf>,
    /// Full path of the output file
    pub path: PathBuf,
}

impl OutputNamer {
    #[must_use]
    pub fn new(base: impl Into<String>, out_dir: Option<PathBuf>, region_dirs: bool) -> Self {
        Self {
            base: base.into(),
            out_dir,
            region_dirs,
        }
    }

    /// Derives the base name and output directory from the run parameters
    ///
    /// Without an explicit base, the input path minus its extension is used. If the base
    /// has a directory part, that directory becomes the output directory unless one was
    /// given, and only the final component is kept as the base.
    pub fn resolve(
        input: &Path,
        out_base: Option<&str>,
        out_dir: Option<&Path>,
        region_dirs: bool,
    ) -> Result<Self> {
        let candidate = match out_base {
            Some(base) if !base.is_empty() => PathBuf::from(base),
            _ => input.with_extension(""),
        };
        let Some(base) = candidate.file_name() else {
            return Err(ArgumentError::EmptyOutBase.into());
        };
        let base_dir = candidate
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty());
        let out_dir = out_dir
            .filter(|dir| !dir.as_os_str().is_empty())
            .or(base_dir)
            .map(Path::to_path_buf);

        Ok(Self::new(base.to_string_lossy(), out_dir, region_dirs))
    }

    #[must_use]
    pub fn base(&self) -> &str {
        &self.base
    }

    #[must_use]
    pub fn out_dir(&self) -> Option<&Path> {
        self.out_dir.as_deref()
    }

    #[must_use]
    pub fn region_dirs(&self) -> bool {
        self.region_dirs
    }

    /// Computes the directory and file path for a window of a reference
    #[must_use]
    pub fn locate(&self, section: &RefSection, window: ChunkWindow) -> OutputLocation {
        let mut start_buf = itoa::Buffer::new();
        let mut end_buf = itoa::Buffer::new();
        let start = start_buf.format(window.start);
        let end = end_buf.format(window.display_end(section.ref_len()));

        let mut dir = self.out_dir.clone();
        if self.region_dirs {
            let region = PathBuf::from(format!("chr{}", section.name())).join(format!("{start}.{end}"));
            dir = Some(match dir {
                Some(out_dir) => out_dir.join(region),
                None => region,
            });
        }

        let file_name = format!(
            "{}.{}.{start}.{end}.{OUTPUT_EXTENSION}",
            self.base,
            section.name()
        );
        let path = match &dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        };
        OutputLocation { dir, path }
    }

    /// Computes the path for a window and creates its directory if needed
    pub fn prepare<S: OutputStore>(
        &self,
        store: &S,
        section: &RefSection,
        window: ChunkWindow,
    ) -> Result<PathBuf> {
        let location = self.locate(section, window);
        if let Some(dir) = &location.dir {
            debug!(dir = %dir.display(), "creating output directory");
            store.create_dir_all(dir)?;
        }
        Ok(location.path)
    }
}

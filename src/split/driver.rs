//! Drives a split: reads every section of the input, assigns records to windows, and
//! writes one output per window.
//!
//! Per reference section the driver is a two-state machine. Before the first record it
//! is [`SectionState::AwaitingFirstRecord`]; the first record always opens a window. From
//! then on it is [`SectionState::InWindow`], which owns the running absolute position and
//! the single open [`OutputSession`]. [`SplitDriver::step`] consumes the current state and
//! one record and returns the next state, so the open output never outlives the state
//! that holds it.

use std::io::{Read, Write};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::namer::OutputNamer;
use super::planner::{compute_window, gap_windows, has_gap, needs_new_window, tiling_end, ChunkWindow};
use super::store::OutputStore;
use crate::config::SplitConfig;
use crate::error::{RecordError, Result};
use crate::glf::{GlfHeader, GlfReader, GlfRecord, GlfWriter, RefSection};

/// An open output container for one window
///
/// Created by [`OutputSession::open`] (header and reference section already written),
/// fed by [`OutputSession::write`], and finalized by [`OutputSession::close`]. A session
/// that is dropped without being closed still terminates its compressed stream.
pub struct OutputSession<W: Write> {
    path: PathBuf,
    window: ChunkWindow,
    ref_name: String,
    writer: GlfWriter<W>,
}
impl<W: Write> OutputSession<W> {
    pub fn open<S: OutputStore<Sink = W>>(
        store: &S,
        path: PathBuf,
        window: ChunkWindow,
        header: &GlfHeader,
        section: &RefSection,
    ) -> Result<Self> {
        let mut writer = GlfWriter::new(store.create(&path)?);
        writer.write_header(header)?;
        writer.write_ref_section(section)?;
        debug!(path = %path.display(), start = window.start, end = window.end, "opened output");
        Ok(Self {
            path,
            window,
            ref_name: section.name().to_string(),
            writer,
        })
    }

    #[must_use]
    pub fn window(&self) -> ChunkWindow {
        self.window
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write(&mut self, record: &GlfRecord) -> Result<()> {
        self.writer.write_record(record)
    }

    /// Terminates the section and the stream
    pub fn close(self) -> Result<OutputEntry> {
        let records = self.writer.n_records();
        self.writer.finish()?;
        info!(path = %self.path.display(), records, "wrote output");
        Ok(OutputEntry {
            path: self.path,
            ref_name: self.ref_name,
            window: self.window,
            kind: OutputKind::Data { records },
        })
    }
}

/// Per-section split state
pub enum SectionState<W: Write> {
    /// No record of the current section has been seen
    AwaitingFirstRecord,
    /// Records are going to the window of `session`
    InWindow {
        /// Absolute 0-based position of the last record
        position: u32,
        session: OutputSession<W>,
    },
}

/// What an output file holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Header, reference section, and at least one record
    Data { records: usize },
    /// Header only, for a window without records
    Placeholder,
}

/// One output file written by a split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub path: PathBuf,
    pub ref_name: String,
    pub window: ChunkWindow,
    pub kind: OutputKind,
}

/// Per-section counts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub name: String,
    pub ref_len: u32,
    pub records: usize,
}

/// Everything a split wrote, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub sections: Vec<SectionSummary>,
    pub outputs: Vec<OutputEntry>,
}
impl SplitSummary {
    #[must_use]
    pub fn n_records(&self) -> usize {
        self.sections.iter().map(|s| s.records).sum()
    }

    #[must_use]
    pub fn n_data_outputs(&self) -> usize {
        self.outputs
            .iter()
            .filter(|o| matches!(o.kind, OutputKind::Data { .. }))
            .count()
    }

    #[must_use]
    pub fn n_placeholders(&self) -> usize {
        self.outputs
            .iter()
            .filter(|o| o.kind == OutputKind::Placeholder)
            .count()
    }
}

/// Splits a GLF stream into one output per window
pub struct SplitDriver<S: OutputStore> {
    store: S,
    namer: OutputNamer,
    chunk_size: NonZeroU32,

    /// Write header-only outputs for windows without records
    empty_glfs: bool,

    summary: SplitSummary,
}
impl<S: OutputStore> SplitDriver<S> {
    pub fn new(store: S, namer: OutputNamer, chunk_size: NonZeroU32, empty_glfs: bool) -> Self {
        Self {
            store,
            namer,
            chunk_size,
            empty_glfs,
            summary: SplitSummary::default(),
        }
    }

    /// Builds a driver from run parameters, resolving the output naming
    pub fn from_config(store: S, config: &SplitConfig) -> Result<Self> {
        Ok(Self::new(
            store,
            config.namer()?,
            config.chunk_size,
            config.empty_glfs,
        ))
    }

    /// Splits every reference section of `reader`
    pub fn run<R: Read>(self, reader: &mut GlfReader<R>) -> Result<SplitSummary> {
        self.run_with(reader, |_| Ok(()))
    }

    /// Splits every reference section of `reader`, calling `on_section` as each section
    /// begins
    pub fn run_with<R, F>(mut self, reader: &mut GlfReader<R>, mut on_section: F) -> Result<SplitSummary>
    where
        R: Read,
        F: FnMut(&RefSection) -> Result<()>,
    {
        let header = reader.read_header()?.clone();
        while let Some(section) = reader.next_ref_section()? {
            on_section(&section)?;
            info!(
                ref_name = section.name(),
                ref_len = section.ref_len(),
                "splitting reference section"
            );
            let mut state = SectionState::AwaitingFirstRecord;
            let mut records = 0;
            while let Some(record) = reader.next_record()? {
                state = self.step(state, &header, &section, record)?;
                records += 1;
            }
            self.finish_section(state, &header, &section)?;
            self.summary.sections.push(SectionSummary {
                name: section.name().to_string(),
                ref_len: section.ref_len(),
                records,
            });
        }
        Ok(self.summary)
    }

    /// Places one record, opening a new window first if needed
    pub fn step(
        &mut self,
        state: SectionState<S::Sink>,
        header: &GlfHeader,
        section: &RefSection,
        mut record: GlfRecord,
    ) -> Result<SectionState<S::Sink>> {
        let (position, open) = match state {
            SectionState::AwaitingFirstRecord => (record.offset(), None),
            SectionState::InWindow { position, session } => {
                let Some(next) = position.checked_add(record.offset()) else {
                    return Err(RecordError::PositionOverflow {
                        position,
                        offset: record.offset(),
                    }
                    .into());
                };
                (next, Some(session))
            }
        };

        let current_end = open.as_ref().map_or(0, |s| s.window().end);
        let mut session = match open {
            Some(session) if !needs_new_window(position, current_end, false) => session,
            open => {
                let previous_end = match open {
                    Some(session) => {
                        let end = session.window().end;
                        self.close(session)?;
                        end
                    }
                    None => 0,
                };
                let window = compute_window(position, self.chunk_size);
                debug!(
                    ref_name = section.name(),
                    position,
                    start = window.start,
                    end = window.end,
                    "new window"
                );
                if window.start > u64::from(section.ref_len()) {
                    warn!(
                        ref_name = section.name(),
                        position,
                        ref_len = section.ref_len(),
                        "record lies past the end of the reference"
                    );
                }
                if self.empty_glfs && has_gap(previous_end, window) {
                    self.write_placeholders(header, section, previous_end, window.start - 1)?;
                }
                let path = self.namer.prepare(&self.store, section, window)?;
                let session = OutputSession::open(&self.store, path, window, header, section)?;
                record.set_offset(window.rebase(position));
                session
            }
        };

        session.write(&record)?;
        Ok(SectionState::InWindow { position, session })
    }

    /// Closes the open output of a section and, with placeholders enabled, covers the
    /// rest of the reference
    pub fn finish_section(
        &mut self,
        state: SectionState<S::Sink>,
        header: &GlfHeader,
        section: &RefSection,
    ) -> Result<()> {
        let last_end = match state {
            SectionState::AwaitingFirstRecord => 0,
            SectionState::InWindow { session, .. } => {
                let end = session.window().end;
                self.close(session)?;
                end
            }
        };
        if self.empty_glfs {
            let until = tiling_end(section.ref_len(), self.chunk_size);
            self.write_placeholders(header, section, last_end, until)?;
        }
        Ok(())
    }

    fn close(&mut self, session: OutputSession<S::Sink>) -> Result<()> {
        let entry = session.close()?;
        self.summary.outputs.push(entry);
        Ok(())
    }

    /// Writes a header-only output for every window after `previous_end` ending at or
    /// before `until`
    fn write_placeholders(
        &mut self,
        header: &GlfHeader,
        section: &RefSection,
        previous_end: u64,
        until: u64,
    ) -> Result<()> {
        for window in gap_windows(previous_end, until, self.chunk_size) {
            let path = self.namer.prepare(&self.store, section, window)?;
            let mut writer = GlfWriter::new(self.store.create(&path)?);
            writer.write_header(header)?;
            writer.finish()?;
            debug!(path = %path.display(), "wrote placeholder");
            self.summary.outputs.push(OutputEntry {
                path,
                ref_name: section.name().to_string(),
                window,
                kind: OutputKind::Placeholder,
            });
        }
        Ok(())
    }
}

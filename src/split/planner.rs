//! Window arithmetic for splitting a reference into fixed-width chunks
//!
//! Window `k` of a reference covers `[k * chunk_size + 1, (k + 1) * chunk_size]`.
//! Bounds are kept as `u64` so that no combination of 32-bit positions and chunk sizes
//! can overflow. Nothing here knows about files or records.

use std::num::NonZeroU32;

/// A fixed-width coordinate interval of a reference, both ends inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkWindow {
    pub start: u64,
    pub end: u64,
}
impl ChunkWindow {
    /// The window ending at `end`
    #[must_use]
    pub fn ending_at(end: u64, chunk_size: NonZeroU32) -> Self {
        Self {
            start: end + 1 - u64::from(chunk_size.get()),
            end,
        }
    }

    /// The window directly after this one
    #[must_use]
    pub fn next(&self, chunk_size: NonZeroU32) -> Self {
        Self::ending_at(self.end + u64::from(chunk_size.get()), chunk_size)
    }

    /// The end position used for naming, clamped to the reference length
    ///
    /// Only names are clamped; all window arithmetic uses the chunk-aligned end.
    #[must_use]
    pub fn display_end(&self, ref_len: u32) -> u64 {
        self.end.min(u64::from(ref_len))
    }

    /// Whether an absolute position lies inside the window
    #[must_use]
    pub fn contains(&self, abs_pos: u32) -> bool {
        (self.start..=self.end).contains(&u64::from(abs_pos))
    }

    /// Expresses an absolute position relative to the start of the window
    ///
    /// The result is `abs_pos - (start - 1)`, so `rebase` followed by
    /// [`ChunkWindow::absolute`] gives back the original position.
    #[must_use]
    pub fn rebase(&self, abs_pos: u32) -> u32 {
        (u64::from(abs_pos) - (self.start - 1)) as u32
    }

    /// Inverse of [`ChunkWindow::rebase`]
    #[must_use]
    pub fn absolute(&self, rebased: u32) -> u64 {
        u64::from(rebased) + (self.start - 1)
    }
}

/// Computes the window that a newly opened output uses for `abs_pos`
///
/// `end = floor(abs_pos / chunk_size) * chunk_size + chunk_size`, `start = end - chunk_size + 1`.
///
/// Positions are stored 0-based in GLF records, so a position that is an exact multiple of
/// the chunk size opens the following window (`100` with a chunk size of `100` gives
/// `[101, 200]`).
#[must_use]
pub fn compute_window(abs_pos: u32, chunk_size: NonZeroU32) -> ChunkWindow {
    let chunk = u64::from(chunk_size.get());
    let end = (u64::from(abs_pos) / chunk) * chunk + chunk;
    ChunkWindow::ending_at(end, chunk_size)
}

/// Whether a record at `abs_pos` must go to a new output
///
/// True when the position lies past the end of the current window, or when a new
/// reference section has begun.
#[must_use]
pub fn needs_new_window(abs_pos: u32, current_end: u64, is_new_reference: bool) -> bool {
    is_new_reference || u64::from(abs_pos) > current_end
}

/// Whether there are uncovered windows between `previous_end` and `next`
///
/// At the start of a reference section `previous_end` is 0.
#[must_use]
pub fn has_gap(previous_end: u64, next: ChunkWindow) -> bool {
    previous_end + 1 != next.start
}

/// End of the last window needed to cover a reference of length `ref_len`
///
/// `ceil(ref_len / chunk_size) * chunk_size`
#[must_use]
pub fn tiling_end(ref_len: u32, chunk_size: NonZeroU32) -> u64 {
    let chunk = u64::from(chunk_size.get());
    u64::from(ref_len).div_ceil(chunk) * chunk
}

/// Iterates over the windows following `previous_end` whose end is at most `until`
///
/// Used both for gaps between two data windows (`until = next.start - 1`) and for the
/// uncovered tail of a reference (`until = tiling_end(..)`).
#[must_use]
pub fn gap_windows(previous_end: u64, until: u64, chunk_size: NonZeroU32) -> GapWindows {
    GapWindows {
        next: ChunkWindow::ending_at(previous_end + u64::from(chunk_size.get()), chunk_size),
        until,
        chunk_size,
    }
}

/// Iterator returned by [`gap_windows`]
#[derive(Debug, Clone)]
pub struct GapWindows {
    next: ChunkWindow,
    until: u64,
    chunk_size: NonZeroU32,
}
impl Iterator for GapWindows {
    type Item = ChunkWindow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.end > self.until {
            return None;
        }
        let window = self.next;
        self.next = window.next(self.chunk_size);
        Some(window)
    }
}

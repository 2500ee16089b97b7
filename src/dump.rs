//! Human-readable listing of a GLF stream

use std::io::{Read, Write};

use tracing::debug;

use crate::error::Result;
use crate::glf::GlfReader;

/// Counts of what a dump printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub sections: usize,
    pub records: usize,
}

/// Prints the header, every reference section, and every record of `reader` to `out`
///
/// ```text
/// GlfHeader:
/// <header text>
///     RefName = 20; RefLen = 250
/// Type = 1; RefBase = A; Offset = 10; ...
/// ```
pub fn dump<R: Read, W: Write>(reader: &mut GlfReader<R>, out: &mut W) -> Result<DumpSummary> {
    let header = reader.read_header()?;
    writeln!(out, "GlfHeader:")?;
    writeln!(out, "{}", header.text())?;

    let mut summary = DumpSummary::default();
    while let Some(section) = reader.next_ref_section()? {
        writeln!(
            out,
            "\tRefName = {}; RefLen = {}",
            section.name(),
            section.ref_len()
        )?;
        summary.sections += 1;
        while let Some(record) = reader.next_record()? {
            writeln!(out, "{record}")?;
            summary.records += 1;
        }
    }
    out.flush()?;
    debug!(sections = summary.sections, records = summary.records, "dump finished");
    Ok(summary)
}

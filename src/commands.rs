use std::io::Write;

use tracing::info;

use crate::config::{DumpConfig, SplitConfig};
use crate::dump::dump;
use crate::error::Result;
use crate::glf::GlfReader;
use crate::split::{FsStore, SplitDriver, SplitSummary};

/// A command and its run parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    /// Split a GLF file into fixed-width windows
    Split(SplitConfig),
    /// Print a GLF file in readable form
    Dump(DumpConfig),
}
impl CommandKind {
    /// Name of the command on the command line
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Split(_) => "split",
            Self::Dump(_) => "dump",
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Split(config) => config.validate(),
            Self::Dump(config) => config.validate(),
        }
    }

    /// Runs the command, writing its output to `out`
    pub fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        self.validate()?;
        match self {
            Self::Split(config) => {
                if config.print_params {
                    write!(out, "{config}")?;
                }
                run_split(config, out).map(|_| ())
            }
            Self::Dump(config) => {
                if config.print_params {
                    write!(out, "{config}")?;
                }
                let mut reader = GlfReader::from_path(&config.input)?;
                dump(&mut reader, out).map(|_| ())
            }
        }
    }
}

/// Splits the input of `config` on the local filesystem
///
/// Prints one `RefName = <name>; RefLen = <len>` line to `out` as each reference section
/// begins.
pub fn run_split<W: Write>(config: &SplitConfig, out: &mut W) -> Result<SplitSummary> {
    let mut reader = GlfReader::from_path(&config.input)?;
    let summary = SplitDriver::from_config(FsStore, config)?.run_with(&mut reader, |section| {
        writeln!(
            out,
            "\tRefName = {}; RefLen = {}",
            section.name(),
            section.ref_len()
        )?;
        out.flush()?;
        Ok(())
    })?;
    info!(
        input = %config.input.display(),
        sections = summary.sections.len(),
        records = summary.n_records(),
        outputs = summary.n_data_outputs(),
        placeholders = summary.n_placeholders(),
        "split finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod testing {

    use super::*;
    use crate::error::ArgumentError;
    use crate::glf::{GlfHeader, GlfRecord, GlfWriter, RefSection, NUM_LIKELIHOODS};
    use crate::Error;
    use std::num::NonZeroU32;
    use std::path::Path;

    fn write_input(path: &Path) -> Result<()> {
        let mut writer = GlfWriter::create(path)?;
        writer.write_header(&GlfHeader::new("cmd-test"))?;
        writer.write_ref_section(&RefSection::new("20", 250))?;
        let lks = [0; NUM_LIKELIHOODS];
        for offset in [10, 40, 100, 90] {
            writer.write_record(&GlfRecord::new_snp(2, offset, 5, 0, 30, lks))?;
        }
        writer.write_ref_section(&RefSection::new("21", 80))?;
        writer.finish()?;
        Ok(())
    }

    #[test]
    fn test_split_command() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("sample.glf");
        write_input(&input)?;

        let config = SplitConfig {
            chunk_size: NonZeroU32::new(100).expect("non-zero"),
            print_params: true,
            ..SplitConfig::new(&input)
        };
        let mut out = Vec::new();
        CommandKind::Split(config).run(&mut out)?;

        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.starts_with("Input Parameters\n"));
        assert!(text.ends_with("\tRefName = 20; RefLen = 250\n\tRefName = 21; RefLen = 80\n"));

        // positions 10, 50 | 150 | 240
        for name in ["sample.20.1.100.glf", "sample.20.101.200.glf", "sample.20.201.250.glf"] {
            assert!(dir.path().join(name).is_file(), "{name} missing");
        }
        assert!(!dir.path().join("sample.21.1.80.glf").exists());
        Ok(())
    }

    #[test]
    fn test_split_reports_sections_before_failure() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("broken.glf");
        let mut bytes = Vec::new();
        GlfHeader::new("h").write_bytes(&mut bytes)?;
        RefSection::new("20", 250).write_bytes(&mut bytes)?;
        GlfRecord::new_snp(2, 10, 5, 0, 30, [0; NUM_LIKELIHOODS]).write_bytes(&mut bytes)?;
        bytes.push(0);
        RefSection::new("21", 80).write_bytes(&mut bytes)?;
        bytes.push(0x71);
        std::fs::write(&input, bytes)?;

        let config = SplitConfig {
            chunk_size: NonZeroU32::new(100).expect("non-zero"),
            ..SplitConfig::new(&input)
        };
        let mut out = Vec::new();
        let result = CommandKind::Split(config).run(&mut out);
        assert!(matches!(result, Err(Error::RecordError(_))));

        let text = String::from_utf8(out).expect("utf8 output");
        assert_eq!(text, "\tRefName = 20; RefLen = 250\n\tRefName = 21; RefLen = 80\n");
        assert!(dir.path().join("broken.20.1.100.glf").is_file());
        Ok(())
    }

    #[test]
    fn test_dump_command() -> Result<()> {
        let dir = tempfile::TempDir::new()?;
        let input = dir.path().join("sample.glf");
        write_input(&input)?;

        let mut out = Vec::new();
        CommandKind::Dump(DumpConfig::new(&input)).run(&mut out)?;
        let text = String::from_utf8(out).expect("utf8 output");
        assert!(text.starts_with("GlfHeader:\ncmd-test\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("Type = 1")).count(), 4);
        Ok(())
    }

    #[test]
    fn test_missing_input_file() {
        let config = SplitConfig::new("/nonexistent/dir/in.glf");
        let mut out = Vec::new();
        let result = CommandKind::Split(config).run(&mut out);
        assert!(matches!(result, Err(Error::PathError { .. })));
    }

    #[test]
    fn test_missing_input_argument() {
        let mut out = Vec::new();
        let result = CommandKind::Dump(DumpConfig::new("")).run(&mut out);
        assert!(matches!(
            result,
            Err(Error::ArgumentError(ArgumentError::MissingArgument("in")))
        ));
        assert!(out.is_empty());
    }
}

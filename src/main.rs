use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, CommandFactory, Parser, Subcommand};

use glfutil::{logging, CommandKind, DumpConfig, ErrorKind, SplitConfig};

#[derive(Parser)]
#[command(name = "glfutil", about = "Tools for GLF genotype likelihood files")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a GLF file into files by reference region
    Split(SplitArgs),
    /// Print a GLF file in readable form
    Dump(DumpArgs),
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// The GLF file to be read
    #[arg(long = "in")]
    input: Option<PathBuf>,
    /// The output directory to write into (defaults to the outBase directory)
    #[arg(long = "outDir")]
    out_dir: Option<PathBuf>,
    /// The base GLF filename to write (defaults to the input name without its extension)
    #[arg(long = "outBase")]
    out_base: Option<String>,
    /// The region covered by each GLF file
    #[arg(long = "chunkSize", default_value_t = 5_000_000, allow_negative_numbers = true)]
    chunk_size: i64,
    /// Write GLFs with just a header for intermediate chunks that are missing data
    #[arg(long = "emptyGlfs", default_value_t = false)]
    empty_glfs: bool,
    /// Write output GLFs in chr/start.end/ subdirectories
    #[arg(long = "regionDirs", default_value_t = false)]
    region_dirs: bool,
    /// Print the parameter settings
    #[arg(long, default_value_t = false)]
    params: bool,
}

#[derive(Args, Debug)]
struct DumpArgs {
    /// The GLF file to be read
    #[arg(long = "in")]
    input: Option<PathBuf>,
    /// Print the parameter settings
    #[arg(long, default_value_t = false)]
    params: bool,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Split(_) => "split",
            Self::Dump(_) => "dump",
        }
    }

    fn into_command(self) -> glfutil::Result<CommandKind> {
        Ok(match self {
            Self::Split(args) => CommandKind::Split(SplitConfig {
                input: args.input.unwrap_or_default(),
                out_dir: args.out_dir,
                out_base: args.out_base,
                chunk_size: SplitConfig::chunk_size_from(args.chunk_size)?,
                empty_glfs: args.empty_glfs,
                region_dirs: args.region_dirs,
                print_params: args.params,
            }),
            Self::Dump(args) => CommandKind::Dump(DumpConfig {
                input: args.input.unwrap_or_default(),
                print_params: args.params,
            }),
        })
    }
}

/// Prints the usage of a subcommand to `err`, followed by the parameter status when the
/// parameters could be parsed
fn usage<W: Write>(name: &str, command: Option<&CommandKind>, err: &mut W) -> io::Result<()> {
    let mut cli = Cli::command();
    if let Some(sub) = cli.find_subcommand_mut(name) {
        writeln!(err, "{}", sub.render_long_help())?;
    }
    match command {
        Some(CommandKind::Split(config)) => write!(err, "{config}"),
        Some(CommandKind::Dump(config)) => write!(err, "{config}"),
        None => Ok(()),
    }
}

/// Converts the parsed arguments into a validated command
///
/// Invalid parameters print the usage to `err` before the error is returned.
fn build_command<W: Write>(commands: Commands, err: &mut W) -> glfutil::Result<CommandKind> {
    let name = commands.name();
    let command = match commands.into_command() {
        Ok(command) => command,
        Err(e) => return Err(with_usage(e, name, None, err)),
    };
    match command.validate() {
        Ok(()) => Ok(command),
        Err(e) => Err(with_usage(e, name, Some(&command), err)),
    }
}

fn with_usage<W: Write>(
    e: glfutil::Error,
    name: &str,
    command: Option<&CommandKind>,
    err: &mut W,
) -> glfutil::Error {
    if e.kind() == ErrorKind::Argument {
        if let Err(io_err) = usage(name, command, err) {
            return io_err.into();
        }
    }
    e
}

fn run(cli: Cli) -> Result<()> {
    let command = build_command(cli.command, &mut io::stderr().lock())?;
    let name = command.name();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    command
        .run(&mut out)
        .with_context(|| format!("{name} failed"))?;
    out.flush()?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing();

    if let Err(err) = run(cli) {
        eprintln!("{err:#}");
        std::process::exit(-1);
    }
}

#[cfg(test)]
mod testing {

    use super::*;
    use glfutil::{ArgumentError, Error};

    fn build(args: &[&str]) -> (glfutil::Result<CommandKind>, String) {
        let cli = Cli::try_parse_from(args.iter().copied()).expect("arguments parse");
        let mut err = Vec::new();
        let result = build_command(cli.command, &mut err);
        (result, String::from_utf8(err).expect("utf8 usage"))
    }

    #[test]
    fn test_invalid_chunk_size_prints_usage() {
        let (result, usage) = build(&["glfutil", "split", "--in", "x.glf", "--chunkSize", "0"]);
        assert!(matches!(
            result,
            Err(Error::ArgumentError(ArgumentError::InvalidChunkSize(0)))
        ));
        assert!(usage.contains("--chunkSize"));
        assert!(usage.contains("--emptyGlfs"));
    }

    #[test]
    fn test_missing_input_prints_status() {
        let (result, usage) = build(&["glfutil", "split", "--chunkSize", "100"]);
        assert!(matches!(
            result,
            Err(Error::ArgumentError(ArgumentError::MissingArgument("in")))
        ));
        assert!(usage.contains("--regionDirs"));
        assert!(usage.contains("Input Parameters"));
        assert!(usage.contains("--chunkSize : 100\n"));
    }

    #[test]
    fn test_valid_arguments_print_nothing() -> glfutil::Result<()> {
        let (result, usage) = build(&["glfutil", "dump", "--in", "x.glf"]);
        assert_eq!(result?.name(), "dump");
        assert!(usage.is_empty());
        Ok(())
    }
}

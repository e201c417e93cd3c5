//! Jampack CLI.
//!
//! A thin `clap`-based front end over `jampack-pipeline`: compress a file,
//! decompress one, or recompress-and-diff in memory without writing output.

mod utils;

use clap::Parser;
use jampack_core::error::JampackError;
use jampack_core::options::{FilterMode, MatchFinder, Options};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;
use utils::{create_progress_bar, ProgressRead};

#[derive(Parser)]
#[command(name = "jampack")]
#[command(author, version, about = "Blockwise compressor: dedupe, structural filters, BWT and structured rANS")]
#[command(long_about = "
Jampack compresses a file through a pipeline of reversible transforms —
structural filters, a local-prefix predictor, an anti-context LZ77 coder and
a Burrows-Wheeler transform — followed by a structured rANS entropy coder.

Examples:
  jampack c input.bin output.jam
  jampack c input.bin output.jam -b16 -t8 -m2 -f2
  jampack d output.jam restored.bin
  jampack c input.bin output.jam -T
")]
struct Cli {
    /// 'c' to compress, 'd' to decompress.
    mode: Mode,

    /// Input file path.
    input: PathBuf,

    /// Output file path. Ignored (and may be omitted) with `-T`.
    output: Option<PathBuf>,

    /// Block size in MiB.
    #[arg(short = 'b', value_name = "MB")]
    block_size_mib: Option<usize>,

    /// Worker thread count.
    #[arg(short = 't', value_name = "N")]
    threads: Option<usize>,

    /// LZ77 match-finder mode: 0=dedupe, 1=hash-chain, 2=suffix-array.
    #[arg(short = 'm', value_name = "MODE")]
    match_finder: Option<u8>,

    /// Structural filter policy: 0=off, 1=heuristic, 2=brute force.
    #[arg(short = 'f', value_name = "MODE")]
    filters: Option<u8>,

    /// Test mode: recompress and diff in memory, write nothing.
    #[arg(short = 'T')]
    test: bool,

    /// Hide the progress bar.
    #[arg(short = 'q', long)]
    quiet: bool,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Compress,
    Decompress,
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "c" => Ok(Self::Compress),
            "d" => Ok(Self::Decompress),
            other => Err(format!("expected 'c' or 'd', found '{other}'")),
        }
    }
}

fn build_options(cli: &Cli) -> Result<Options, JampackError> {
    let mut options = Options::default();
    if let Some(mib) = cli.block_size_mib {
        options.block_size = mib * (1 << 20);
    }
    if let Some(threads) = cli.threads {
        options.threads = threads;
    }
    if let Some(mode) = cli.match_finder {
        options.match_finder = MatchFinder::from_u8(mode)?;
    }
    if let Some(mode) = cli.filters {
        options.filters = FilterMode::from_u8(mode)?;
    }
    options.validate()
}

fn run(cli: Cli) -> Result<(), JampackError> {
    let options = build_options(&cli)?;
    let input_len = std::fs::metadata(&cli.input)?.len();

    if cli.test {
        let file = File::open(&cli.input)?;
        let bar = create_progress_bar(input_len, !cli.quiet);
        let mut reader = ProgressRead::new(file, bar.clone());
        jampack_pipeline::verify(&mut reader, options)?;
        bar.finish_with_message("verified");
        return Ok(());
    }

    let output = cli
        .output
        .ok_or_else(|| JampackError::resource("an output path is required outside of -T test mode"))?;

    let input = File::open(&cli.input)?;
    let mut writer = BufWriter::new(File::create(&output)?);
    let bar = create_progress_bar(input_len, !cli.quiet);
    let mut reader = ProgressRead::new(input, bar.clone());

    match cli.mode {
        Mode::Compress => jampack_pipeline::compress(&mut reader, &mut writer, options)?,
        Mode::Decompress => jampack_pipeline::decompress(&mut reader, &mut writer, options)?,
    }
    bar.finish_with_message("done");
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: jampack: {err}");
            ExitCode::FAILURE
        }
    }
}

//! Command-line interface for llm-dump.
//!
//! `git` dumps a repository tree plus file contents, `markdown` follows links
//! from a starting note. Both write one annotated file.

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use llm_dump::{
    BinaryDetection, DEFAULT_MAX_DEPTH, Dump, DumpError, MarkdownDumpBuilder, RepoDumpBuilder,
    dump_markdown, dump_repository, output,
};
use std::path::{Path, PathBuf};
use std::process::exit;

/// llm-dump: process various content sources for LLM context
#[derive(Parser)]
#[command(name = "llm-dump", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Dump the contents of a git repository
    Git(GitArgs),
    /// Process Obsidian/markdown files
    Markdown(MarkdownArgs),
}

#[derive(Args)]
struct GitArgs {
    /// Path to the repository to process
    repo_path: PathBuf,

    /// Path to the output text file
    output_path: PathBuf,

    /// Extra ignore globs (can be repeated)
    #[arg(short = 'I', long = "ignore")]
    ignore_patterns: Vec<String>,

    /// Disable .gitignore handling
    #[arg(long)]
    no_gitignore: bool,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct MarkdownArgs {
    /// Path to the starting markdown file
    start_file: PathBuf,

    /// Path to the output text file
    output_path: PathBuf,

    /// Maximum link depth to traverse (0 = start file only)
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Base folder for resolving links (default: start file's folder)
    #[arg(long)]
    base_folder: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Args)]
struct CommonArgs {
    /// Binary detection strategy
    #[arg(long, default_value = "simple", value_parser = parse_binary_detection)]
    binary_detection: BinaryDetection,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl From<OutputFormat> for output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => output::OutputFormat::Text,
            OutputFormat::Json => output::OutputFormat::Json,
        }
    }
}

/// Parse string into BinaryDetection enum.
fn parse_binary_detection(s: &str) -> Result<BinaryDetection, String> {
    match s {
        "simple" => Ok(BinaryDetection::Simple),
        "accurate" => Ok(BinaryDetection::Accurate),
        "none" => Ok(BinaryDetection::None),
        _ => Err(format!("invalid binary detection method: {}", s)),
    }
}

fn main() {
    let cli = Cli::parse();
    #[cfg(feature = "logging")]
    init_logging(cli.verbose, cli.quiet);
    #[cfg(not(feature = "logging"))]
    let _ = (cli.verbose, cli.quiet);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        exit(1);
    }
}

fn run(command: Command) -> Result<(), DumpError> {
    match command {
        Command::Git(args) => {
            let options = RepoDumpBuilder::new(args.repo_path)
                .respect_gitignore(!args.no_gitignore)
                .ignore_patterns(args.ignore_patterns)
                .binary_detection(args.common.binary_detection)
                .exclude_path(&args.output_path)
                .build();
            let dump = dump_repository(options)?;
            finish(&dump, args.common.format, &args.output_path)
        }
        Command::Markdown(args) => {
            let options = MarkdownDumpBuilder::new(args.start_file)
                .max_depth(args.max_depth)
                .base_folder(args.base_folder)
                .binary_detection(args.common.binary_detection)
                .build();
            let dump = dump_markdown(options)?;
            finish(&dump, args.common.format, &args.output_path)
        }
    }
}

fn finish(dump: &Dump, format: OutputFormat, output_path: &Path) -> Result<(), DumpError> {
    output::write_dump(dump, format.into(), output_path)
}

#[cfg(feature = "logging")]
fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::EnvFilter;

    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("llm_dump={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

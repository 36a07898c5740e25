use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use docgram_engine::{
    GrammarReport, ParseOptions, Response, UsageParser, format_bindings, format_report,
    format_responses,
};
use tracing_subscriber::EnvFilter;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Json,
    Yaml,
    Table,
}

impl From<CliOutputFormat> for docgram_engine::OutputFormat {
    fn from(fmt: CliOutputFormat) -> Self {
        match fmt {
            CliOutputFormat::Json => Self::Json,
            CliOutputFormat::Yaml => Self::Yaml,
            CliOutputFormat::Table => Self::Table,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "docgram")]
#[command(version)]
#[command(about = "Compile usage text into a grammar and match argument vectors against it")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compile a doc file and show its formal usage, pattern and options.
    Check(CheckArgs),
    /// Match one argument vector (given after `--`) against a doc file.
    Match(MatchArgs),
    /// Match every line of an input file against a doc file, in parallel.
    Batch(BatchArgs),
}

#[derive(Debug, Args)]
struct CheckArgs {
    /// Doc text file containing a "Usage:" section.
    #[arg(long)]
    doc: PathBuf,
    /// Output format.
    #[arg(long, default_value = "table")]
    format: CliOutputFormat,
}

#[derive(Debug, Args)]
struct ParseFlags {
    /// YAML file with parse options.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Treat everything from the first positional argument on as positional.
    #[arg(long)]
    options_first: bool,
    /// Do not answer -h/--help with the usage text.
    #[arg(long)]
    no_help: bool,
    /// Answer --version with this string.
    #[arg(long)]
    version_string: Option<String>,
    /// Show the whole doc text, not only the usage section, on help and errors.
    #[arg(long)]
    full_usage: bool,
}

#[derive(Debug, Args)]
struct MatchArgs {
    /// Doc text file containing a "Usage:" section.
    #[arg(long)]
    doc: PathBuf,
    #[command(flatten)]
    flags: ParseFlags,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
    /// Argument vector to match, without the program name.
    #[arg(last = true, allow_hyphen_values = true)]
    argv: Vec<String>,
}

#[derive(Debug, Args)]
struct BatchArgs {
    /// Doc text file containing a "Usage:" section.
    #[arg(long)]
    doc: PathBuf,
    /// File with one argument vector per line (shell quoting rules).
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    flags: ParseFlags,
    /// Number of parallel matching jobs.
    #[arg(long, default_value_t = 4)]
    jobs: usize,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: CliOutputFormat,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Check(args) => run_check(args),
        Command::Match(args) => run_match(args),
        Command::Batch(args) => run_batch(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DOCGRAM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let parser = compile_doc(&args.doc)?;
    let report = GrammarReport::from_parser(&parser);
    print!("{}", format_report(&report, args.format.into())?);
    Ok(())
}

fn run_match(args: MatchArgs) -> Result<(), String> {
    let parser = compile_doc(&args.doc)?;
    let options = parse_options(&args.flags)?;
    let response = parser.parse(&args.argv, &options);

    if !response.success {
        return Err(response
            .error_message
            .unwrap_or_else(|| "arguments do not match".to_string()));
    }
    match response.output {
        Some(output) => println!("{output}"),
        None => println!("{}", format_bindings(&response.bindings, args.format.into())?),
    }
    Ok(())
}

fn run_batch(args: BatchArgs) -> Result<(), String> {
    use rayon::prelude::*;

    let parser = compile_doc(&args.doc)?;
    let options = parse_options(&args.flags)?;
    let content = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    let vectors = split_input_lines(&content)?;
    tracing::debug!(vectors = vectors.len(), jobs = args.jobs, "matching batch");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(args.jobs)
        .build()
        .map_err(|e| format!("Failed to create thread pool: {e}"))?;

    // par_iter().map().collect() keeps input order
    let responses: Vec<Response> = pool.install(|| {
        vectors
            .par_iter()
            .map(|argv| parser.parse(argv, &options))
            .collect()
    });

    let failures = responses.iter().filter(|r| !r.success).count();
    print!("{}", format_responses(&responses, args.format.into())?);
    if failures > 0 {
        eprintln!("{failures} of {} argument vectors did not match", responses.len());
    }
    Ok(())
}

fn compile_doc(path: &Path) -> Result<UsageParser, String> {
    let doc = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read '{}': {err}", path.display()))?;
    let parser = UsageParser::new(&doc)
        .map_err(|err| format!("invalid doc '{}': {err}", path.display()))?;
    tracing::debug!(doc = %path.display(), formal = parser.formal_usage(), "compiled doc");
    Ok(parser)
}

fn parse_options(flags: &ParseFlags) -> Result<ParseOptions, String> {
    let mut options = match &flags.config {
        Some(path) => ParseOptions::load(path)
            .map_err(|err| format!("Failed to load config '{}': {err}", path.display()))?,
        None => ParseOptions::default(),
    };
    if flags.options_first {
        options.options_first = true;
    }
    if flags.no_help {
        options.help = false;
    }
    if let Some(version) = &flags.version_string {
        options.version = Some(version.clone());
    }
    if flags.full_usage {
        options.exit_full_usage = true;
    }
    // the CLI reports results itself
    options.exit = false;
    Ok(options)
}

/// Splits batch input into argument vectors, skipping blank and `#` lines.
fn split_input_lines(content: &str) -> Result<Vec<Vec<String>>, String> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .map(|(idx, line)| {
            shell_words::split(line).map_err(|err| format!("line {}: {err}", idx + 1))
        })
        .collect()
}

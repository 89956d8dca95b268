//! stmt2table - Extract the transaction table of a bank statement
//!
//! Reads a pdf2json document dump, reconstructs the ledger table and
//! writes it as JSON or CSV.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueEnum};
use ledgerscan_core::ExtractSettings;
use ledgerscan_core::extract::extract_table_for_job;
use ledgerscan_core::output::{CsvStyle, OutputFormat, render};
use ledgerscan_core::source::{DEFAULT_STREAM_BUFFER_CAPACITY, Pdf2JsonDocument};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Output type for the extracted table.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
enum OutputType {
    /// Columns and rows as pretty-printed JSON
    Json,
    /// Comma separated values, one line per row
    Csv,
}

impl From<OutputType> for OutputFormat {
    fn from(value: OutputType) -> Self {
        match value {
            OutputType::Json => OutputFormat::Json,
            OutputType::Csv => OutputFormat::Csv,
        }
    }
}

/// CSV dialect.
#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum CsvDialect {
    /// Plain comma join, no quoting (default)
    #[default]
    Plain,
    /// RFC 4180 quoting
    Quoted,
}

impl From<CsvDialect> for CsvStyle {
    fn from(value: CsvDialect) -> Self {
        match value {
            CsvDialect::Plain => CsvStyle::Plain,
            CsvDialect::Quoted => CsvStyle::Quoted,
        }
    }
}

/// Extract the transaction table from a pdf2json statement dump.
#[derive(Parser, Debug)]
#[command(name = "stmt2table")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a pdf2json document dump, or "-" for stdin
    file: PathBuf,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Job identifier attached to every log line
    #[arg(long = "job-id", default_value = "cli-parse-pdf")]
    job_id: String,

    // === Output options ===
    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Type of output to generate (inferred from the outfile extension when omitted)
    #[arg(short = 't', long = "output-type", value_enum)]
    output_type: Option<OutputType>,

    /// CSV dialect
    #[arg(long = "csv-style", value_enum, default_value = "plain")]
    csv_style: CsvDialect,

    // === Extraction options ===
    /// Line grouping tolerance
    #[arg(long = "y-tolerance", default_value = "0.1")]
    y_tolerance: f64,

    /// Divisor applied to decoder widths
    #[arg(long = "width-scale", default_value = "16.0")]
    width_scale: f64,

    /// Column keyword groups a line needs to be taken as the header
    #[arg(long = "header-min-matches", default_value = "4")]
    header_min_matches: usize,

    /// Extra lines a wrapped row may span
    #[arg(short = 'L', long = "lookahead", default_value = "6")]
    lookahead: usize,

    /// Maximum y spread inside a single-line column
    #[arg(long = "row-y-tolerance", default_value = "0.1")]
    row_y_tolerance: f64,

    /// Allowed right overhang of a wrapped header label
    #[arg(long = "continuation-slack", default_value = "2.0")]
    continuation_slack: f64,

    /// Percent of a column pair given to the multiline column (50-100)
    #[arg(long = "multiline-share", default_value = "90")]
    multiline_share: u32,

    /// Decoder channel capacity in pages
    #[arg(long = "buffer", default_value_t = DEFAULT_STREAM_BUFFER_CAPACITY)]
    buffer: usize,
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Build ExtractSettings from command line arguments.
fn build_settings(args: &Args) -> Result<ExtractSettings> {
    if !(50..=100).contains(&args.multiline_share) {
        bail!(
            "multiline share must be between 50 and 100, got {}",
            args.multiline_share
        );
    }
    if args.y_tolerance <= 0.0 || args.width_scale <= 0.0 {
        bail!("y tolerance and width scale must be positive");
    }

    Ok(ExtractSettings {
        y_tolerance: args.y_tolerance,
        width_scale: args.width_scale,
        header_min_matches: args.header_min_matches,
        lookahead_lines: args.lookahead,
        row_y_tolerance: args.row_y_tolerance,
        continuation_slack: args.continuation_slack,
        multiline_share: args.multiline_share,
    })
}

/// Infer output type from file extension.
fn infer_output_type(path: &str) -> Option<OutputType> {
    let path_lower = path.to_lowercase();
    if path_lower.ends_with(".csv") {
        Some(OutputType::Csv)
    } else if path_lower.ends_with(".json") {
        Some(OutputType::Json)
    } else {
        None
    }
}

fn load_document(args: &Args) -> Result<Pdf2JsonDocument> {
    if args.file.as_os_str() == "-" {
        let mut data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
        return Ok(Pdf2JsonDocument::from_slice(&data)?);
    }

    if !args.file.exists() {
        bail!("File not found: {}", args.file.display());
    }
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    Pdf2JsonDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", args.file.display()))
}

fn run(args: &Args) -> Result<()> {
    let settings = build_settings(args)?;
    let output_type = args
        .output_type
        .or_else(|| infer_output_type(&args.outfile))
        .unwrap_or(OutputType::Json);

    info!(job_id = %args.job_id, file = %args.file.display(), "Parsing PDF...");
    let document = load_document(args)?;
    let events = document.spawn_decoder(args.buffer.max(1));
    let result = extract_table_for_job(&args.job_id, events, &settings)
        .with_context(|| format!("Error parsing {}", args.file.display()))?;
    info!(job_id = %args.job_id, rows = result.rows.len(), "PDF parsed successfully from CLI");

    let rendered = render(&result, output_type.into(), args.csv_style.into())?;

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("Failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };
    writeln!(output, "{rendered}")?;
    output.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging(args.debug);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

//! dumplines - Show how a statement dump is seen by the extractor
//!
//! Prints, per page, the grouped lines with their canonical y, the
//! detected header line and the resolved column spans. Useful when a
//! statement layout yields no rows.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use ledgerscan_core::ExtractSettings;
use ledgerscan_core::extract::{LineMap, identify_columns};
use ledgerscan_core::source::{Page, Pdf2JsonDocument};
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

/// Dump grouped lines, header and columns of a pdf2json statement dump.
#[derive(Parser, Debug)]
#[command(name = "dumplines")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a pdf2json document dump
    file: PathBuf,

    /// Path to file where output is written, or "-" for stdout
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// One-based page numbers to dump (default: all)
    #[arg(long = "page-numbers", num_args = 1..)]
    page_numbers: Option<Vec<usize>>,

    /// Only print header and columns, not every line
    #[arg(short = 'H', long = "header-only", action = ArgAction::SetTrue)]
    header_only: bool,

    /// Line grouping tolerance
    #[arg(long = "y-tolerance", default_value = "0.1")]
    y_tolerance: f64,

    /// Column keyword groups a line needs to be taken as the header
    #[arg(long = "header-min-matches", default_value = "4")]
    header_min_matches: usize,
}

/// Dump one page.
fn dump_page<W: Write>(
    out: &mut W,
    page_number: usize,
    page: &Page,
    settings: &ExtractSettings,
    header_only: bool,
) -> io::Result<()> {
    let lines = LineMap::group(&page.texts, settings);
    let header = identify_columns(&lines, settings);

    match &header {
        Some(found) => writeln!(
            out,
            "page {page_number}: {} lines, header at y={}",
            lines.len(),
            found.header_y
        )?,
        None => writeln!(out, "page {page_number}: {} lines, no header", lines.len())?,
    }

    if !header_only {
        for y in lines.sorted_keys() {
            let texts = lines.get(y).unwrap_or_default();
            let marker = match &header {
                Some(found) if found.header_y == y => '*',
                _ => ' ',
            };
            let joined: Vec<String> = texts.iter().map(|t| t.text()).collect();
            writeln!(out, "{marker} y={y:<8} {}", joined.join(" | "))?;
        }
    }

    if let Some(found) = header {
        for column in &found.columns {
            writeln!(
                out,
                "  [{}] {:<12} x={:.3} w={:.3} multiline={} label={:?}",
                column.index,
                column.column_type,
                column.x,
                column.width,
                column.multiline,
                column.label
            )?;
        }
    }
    writeln!(out)
}

fn run(args: &Args) -> Result<()> {
    if !args.file.exists() {
        bail!("File not found: {}", args.file.display());
    }
    let file = File::open(&args.file)
        .with_context(|| format!("Failed to open {}", args.file.display()))?;
    let document = Pdf2JsonDocument::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", args.file.display()))?;

    let settings = ExtractSettings {
        y_tolerance: args.y_tolerance,
        header_min_matches: args.header_min_matches,
        ..ExtractSettings::default()
    };
    let wanted: Option<HashSet<usize>> = args
        .page_numbers
        .as_ref()
        .map(|pages| pages.iter().copied().collect());

    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .with_context(|| format!("Failed to create output file {}", args.outfile))?;
        Box::new(BufWriter::new(file))
    };

    for (idx, page) in document.pages.iter().enumerate() {
        let page_number = idx + 1;
        if wanted.as_ref().is_some_and(|w| !w.contains(&page_number)) {
            continue;
        }
        dump_page(&mut output, page_number, page, &settings, args.header_only)?;
    }
    output.flush()?;
    Ok(())
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(&args) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerscan_core::model::TextFragment;

    #[test]
    fn page_without_header_is_reported() {
        let page = Page::new(vec![
            TextFragment::new(1.0, 2.0, 16.0, "Account summary"),
            TextFragment::new(1.0, 3.0, 16.0, "Opening balance"),
        ]);
        let mut out = Vec::new();
        dump_page(&mut out, 1, &page, &ExtractSettings::default(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("page 1: 2 lines, no header\n"));
        assert!(text.contains("Account summary"));
        assert!(text.contains("Opening balance"));
    }

    #[test]
    fn header_only_skips_lines() {
        let page = Page::new(vec![
            TextFragment::new(0.0, 5.0, 128.0, "Date"),
            TextFragment::new(10.0, 5.0, 128.0, "Narration"),
            TextFragment::new(20.0, 5.0, 128.0, "Withdrawal"),
            TextFragment::new(30.0, 5.0, 128.0, "Deposit"),
            TextFragment::new(40.0, 5.0, 128.0, "Balance"),
        ]);
        let mut out = Vec::new();
        dump_page(&mut out, 2, &page, &ExtractSettings::default(), true).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("page 2: 1 lines, header at y=5\n"));
        assert!(text.contains("TX_DATE"));
        assert!(text.contains("BALANCE"));
        assert!(!text.contains(" | "));
    }
}

//! pdfoutline CLI - PDF title and heading outline extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfoutline::render::to_json;
use pdfoutline::{
    BatchProcessor, DocumentStatus, JsonFormat, OutlineConfig, OutlineExtractor, ParseOptions,
};

/// Input directory used when none is given.
const DEFAULT_INPUT_DIR: &str = "/app/input";
/// Output directory used when none is given.
const DEFAULT_OUTPUT_DIR: &str = "/app/output";

#[derive(Parser)]
#[command(name = "pdfoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract PDF titles and heading outlines to JSON", long_about = None)]
struct Cli {
    /// Directory of input PDFs
    #[arg(value_name = "INPUT_DIR")]
    input: Option<PathBuf>,

    /// Directory for the JSON artifacts
    #[arg(value_name = "OUTPUT_DIR")]
    output: Option<PathBuf>,

    #[command(flatten)]
    common: CommonArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
struct CommonArgs {
    /// Heuristic configuration file (JSON)
    #[arg(long, value_name = "FILE", env = "PDFOUTLINE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Skip pages whose text cannot be read instead of failing the document
    #[arg(long, global = true)]
    lenient: bool,

    /// Process documents one at a time
    #[arg(long, global = true)]
    sequential: bool,

    /// Write compact JSON
    #[arg(long, global = true)]
    compact: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every PDF of a directory into <stem>.json files
    Batch {
        /// Directory of input PDFs
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for the JSON artifacts
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,
    },

    /// Extract the outline of one PDF
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Show the estimated body size and heading thresholds of a PDF
    Stats {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let common = cli.common;

    let result = match cli.command {
        Some(Commands::Batch { input, output }) => cmd_batch(&input, &output, &common),
        Some(Commands::Extract { input, output }) => {
            cmd_extract(&input, output.as_deref(), &common)
        }
        Some(Commands::Stats { input }) => cmd_stats(&input, &common),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            let input = cli
                .input
                .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_DIR));
            let output = cli
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
            cmd_batch(&input, &output, &common)
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

/// Build an extractor from the common flags.
fn build_extractor(common: &CommonArgs) -> Result<OutlineExtractor, Box<dyn std::error::Error>> {
    let config = match &common.config {
        Some(path) => OutlineConfig::from_json_file(path)?,
        None => OutlineConfig::default(),
    };

    let mut options = ParseOptions::new().with_parallel(!common.sequential);
    if common.lenient {
        options = options.lenient();
    }

    Ok(OutlineExtractor::new()
        .with_config(config)
        .with_options(options))
}

fn json_format(common: &CommonArgs) -> JsonFormat {
    if common.compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(common)?;
    let total = BatchProcessor::find_pdfs(input)?.len();
    if total == 0 {
        println!(
            "{} {}",
            "No PDF files found in".yellow(),
            input.display()
        );
        return Ok(());
    }

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let processor = BatchProcessor::new(extractor).with_format(json_format(common));
    let report = processor.process_dir_with_progress(input, output, |doc| {
        let name = doc
            .input
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(name);
        pb.inc(1);
    })?;
    pb.finish_with_message("Done!");

    println!("\n{}", "Outputs:".green().bold());
    for (i, doc) in report.documents.iter().enumerate() {
        let branch = if i + 1 == report.total() { "└─" } else { "├─" };
        let name = doc
            .output
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let status = match &doc.status {
            DocumentStatus::Extracted { headings } => format!("{} headings", headings).normal(),
            DocumentStatus::Failed => "error artifact".yellow(),
            DocumentStatus::WriteFailed(e) => format!("not written: {}", e).red(),
        };
        println!("  {} {} ({})", branch.dimmed(), name, status);
    }

    println!(
        "\n{} {} extracted, {} failed, {} not written",
        "Summary:".bold(),
        report.extracted().to_string().green(),
        report.failed().to_string().yellow(),
        report.write_failures().to_string().red()
    );

    Ok(())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    common: &CommonArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(common)?;
    let outline = extractor.extract_file(input)?;
    let json = to_json(&outline, json_format(common))?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_stats(input: &Path, common: &CommonArgs) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = build_extractor(common)?;

    println!("{}", "Font Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());

    match extractor.analyze_fonts(input)? {
        Some(t) => {
            println!("{}: {:.1}pt", "Body size".bold(), t.body);
            println!("{}: >= {:.1}pt", "H1".bold(), t.h1);
            println!("{}: >= {:.1}pt", "H2".bold(), t.h2);
            println!("{}: >= {:.1}pt", "H3".bold(), t.h3);
        }
        None => println!("{}", "No text found".yellow()),
    }

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "pdfoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF title and heading outline extraction tool");
    println!();
    println!("Repository: {}", "https://github.com/iyulab/pdfoutline".dimmed());
    println!("License: MIT");
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use zabank_core::{ParseRules, RawDocument};
use zabank_ingest::{source_for_mode, write_csv, Batch, ExtractionMode, OcrOptions};

#[derive(Parser, Debug)]
#[command(name = "zabank", version, about = "SA bank statement PDF to CSV converter")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert statement PDFs to a combined Date,Description,Amount CSV
    Convert {
        /// Statement PDFs, processed in the order given
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output CSV path
        #[arg(long)]
        out: PathBuf,

        /// Extraction backend: auto, text or ocr
        #[arg(long, default_value = "auto")]
        mode: String,

        /// TOML file overriding any subset of the parse rules
        #[arg(long)]
        rules: Option<PathBuf>,

        /// Write per-document reports as JSON
        #[arg(long)]
        report: Option<PathBuf>,

        /// OCR render resolution
        #[arg(long, default_value_t = 300)]
        dpi: u32,

        /// Tesseract language code
        #[arg(long, default_value = "eng")]
        lang: String,
    },

    /// Report which external extraction tools are available
    Check,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Convert {
            files,
            out,
            mode,
            rules,
            report,
            dpi,
            lang,
        } => convert(files, out, &mode, rules, report, dpi, lang),
        Command::Check => {
            check_tools();
            Ok(())
        }
    }
}

fn convert(
    files: Vec<PathBuf>,
    out: PathBuf,
    mode: &str,
    rules_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    dpi: u32,
    lang: String,
) -> Result<()> {
    let mode: ExtractionMode = mode.parse()?;
    let rules = load_rules(rules_path)?;
    let ocr = OcrOptions {
        dpi,
        lang,
        ..OcrOptions::default()
    };

    let mut batch = Batch::new(rules, source_for_mode(mode, ocr));
    for path in &files {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        batch.push(RawDocument::new(name, bytes));
    }

    let outcome = batch.run();

    for r in &outcome.reports {
        match &r.error {
            None => println!(
                "{}: {} transactions (statement year {})",
                r.document,
                r.transactions,
                r.statement_year.as_deref().unwrap_or("?")
            ),
            Some(reason) => println!("{}: FAILED ({reason})", r.document),
        }
    }

    if let Some(path) = report_path {
        let json = serde_json::to_string_pretty(&outcome.reports).context("serializing report")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Report written to {}", path.display());
    }

    if outcome.transactions.is_empty() {
        bail!("no transactions extracted from any document; no CSV written");
    }

    let file = fs::File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    write_csv(&outcome.transactions, file)?;
    println!(
        "Wrote {} transactions to {}",
        outcome.transactions.len(),
        out.display()
    );

    Ok(())
}

fn load_rules(path: Option<PathBuf>) -> Result<ParseRules> {
    let Some(path) = path else {
        return Ok(ParseRules::default());
    };
    let s = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    toml::from_str(&s).with_context(|| format!("parsing {}", path.display()))
}

fn check_tools() {
    let tools = [
        ("pdftotext", "text backend (poppler-utils)"),
        ("pdftoppm", "OCR rasterizer (poppler-utils)"),
        ("tesseract", "OCR engine (tesseract-ocr)"),
    ];
    let mut found = Vec::new();
    for (tool, role) in tools {
        match which::which(tool) {
            Ok(path) => {
                println!("{tool}: {} [{role}]", path.display());
                found.push(tool);
            }
            Err(_) => println!("{tool}: NOT FOUND [{role}]"),
        }
    }

    let text_ok = found.contains(&"pdftotext");
    let ocr_ok = found.contains(&"pdftoppm") && found.contains(&"tesseract");
    println!();
    println!("text mode: {}", if text_ok { "usable" } else { "unavailable" });
    println!("ocr mode:  {}", if ocr_ok { "usable" } else { "unavailable" });
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
}

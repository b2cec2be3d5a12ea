mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "passbook",
    version,
    about = "Convert bank statement PDFs into transaction tables"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    /// Excel workbook; written next to the input unless --out is given
    Xlsx,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract transactions from a statement PDF (text layer, OCR fallback)
    Convert {
        /// Path to the statement PDF
        input_file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// TOML file with force_ocr / merge_multiline_particulars
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// OCR every page even when a text layer is present
        #[arg(long)]
        force_ocr: bool,

        /// Do not merge continuation lines into the previous transaction
        #[arg(long)]
        no_merge_particulars: bool,

        /// Number of page workers (default: one per CPU)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Tesseract language(s), e.g. "eng" or "eng+hin"
        #[arg(long, default_value = "eng")]
        ocr_lang: String,

        /// Render resolution for OCR
        #[arg(long, default_value_t = passbook_core::extraction::pdftoppm::DEFAULT_DPI)]
        dpi: u32,
    },
    /// Extract transactions from already-recognized text (pages split by form feed)
    Text {
        /// Path to a UTF-8 text file
        input_file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        output: OutputFormat,

        /// Write the result to a file instead of stdout
        #[arg(short = 'O', long = "out", value_name = "FILE")]
        out: Option<PathBuf>,

        /// Do not merge continuation lines into the previous transaction
        #[arg(long)]
        no_merge_particulars: bool,
    },
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("passbook_core=warn,passbook=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Convert {
            input_file,
            output,
            out,
            config,
            force_ocr,
            no_merge_particulars,
            jobs,
            ocr_lang,
            dpi,
        } => config::resolve_options(config.as_deref(), force_ocr, no_merge_particulars).and_then(
            |options| {
                commands::convert::run(commands::convert::ConvertArgs {
                    input_file,
                    output,
                    out,
                    options,
                    jobs,
                    ocr_lang,
                    dpi,
                })
            },
        ),
        Commands::Text {
            input_file,
            output,
            out,
            no_merge_particulars,
        } => config::resolve_options(None, false, no_merge_particulars)
            .and_then(|options| commands::text::run(input_file, output, out, options)),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

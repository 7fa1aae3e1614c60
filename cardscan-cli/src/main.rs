use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::PathBuf;

use cardscan_core::stats::SpendingSummary;
use cardscan_ingest::csv_io::{read_transactions, write_transactions};
use cardscan_ingest::parser::parse_transactions;
use cardscan_ingest::pdf::extract_statement_text;
use cardscan_report::charts::{render_clean_charts, render_overview_charts};
use cardscan_report::report::{render_clean_report, render_spending_report};
use cardscan_report::saas::{
    SaasSummary, filter_saas, render_saas_charts, render_saas_report, write_saas_transactions,
};

mod config;

#[derive(Parser, Debug)]
#[command(name = "cardscan", version, about = "Credit-card statement PDF analyzer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract transactions from a password-protected statement PDF and run
    /// the first analysis pass
    Extract {
        /// Statement PDF (falls back to the PDF_PATH environment variable)
        #[arg(long)]
        pdf: Option<PathBuf>,

        /// PDF password (falls back to the PDF_PASSWORD environment variable)
        #[arg(long)]
        password: Option<String>,

        /// Directory for CSV/report/chart outputs
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Clean an extracted snapshot, re-categorize, and run the full analysis
    Clean {
        /// Transactions CSV from `cardscan extract` (default: <out-dir>/transactions.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// SaaS subscription sub-analysis over the cleaned snapshot
    Saas {
        /// Cleaned CSV from `cardscan clean` (default: <out-dir>/clean_transactions.csv)
        #[arg(long)]
        csv: Option<PathBuf>,

        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },

    /// Config file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default ~/.cardscan/config.toml
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Extract { pdf, password, out_dir } => run_extract(pdf, password, out_dir),
        Command::Clean { csv, out_dir } => run_clean(csv, out_dir),
        Command::Saas { csv, out_dir } => run_saas(csv, out_dir),
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config(),
        },
    }
}

fn run_extract(pdf: Option<PathBuf>, password: Option<String>, out_dir: PathBuf) -> Result<()> {
    let cfg = config::load_config()?;

    let password = password.or_else(|| std::env::var("PDF_PASSWORD").ok());
    let Some(password) = password else {
        eprintln!("No PDF password provided.");
        eprintln!("Pass --password <pw>, or set the environment variable:");
        eprintln!("  export PDF_PASSWORD=your_actual_password");
        bail!("PDF password not provided");
    };

    let pdf_path = pdf
        .or_else(|| std::env::var("PDF_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(|| {
            println!("WARNING: no --pdf flag or PDF_PATH set, using ./bank_statement.pdf");
            PathBuf::from("bank_statement.pdf")
        });

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    println!("PDF path: {}", pdf_path.display());
    println!("Password: [PROTECTED]");
    println!("\nAttempting to extract text from PDF...");

    let text = extract_statement_text(&pdf_path, &password).with_context(|| {
        "failed to extract text from PDF; check that the file exists, \
         the password is correct, and the PDF is not corrupted"
    })?;
    println!(
        "\nSuccessfully extracted {} characters from PDF",
        text.chars().count()
    );

    println!("\nParsing transactions...");
    let mut txns = parse_transactions(&text)?;

    if txns.is_empty() {
        let dump = out_dir.join("extracted_text.txt");
        fs::write(&dump, &text).with_context(|| format!("writing {}", dump.display()))?;
        println!("No transactions found. The PDF format might not match expected patterns.");
        println!("Extracted text saved to '{}' for manual review", dump.display());
        return Ok(());
    }

    println!("\nCategorizing transactions...");
    cfg.base_table().categorize_all(&mut txns);

    println!("Analyzing spending patterns...");
    let summary = SpendingSummary::compute(&txns, 5);

    render_overview_charts(&txns, &summary, out_dir.join("credit_card_analysis.png"))?;

    let report = render_spending_report(&summary);
    println!("{report}");
    let report_path = out_dir.join("credit_card_analysis_report.txt");
    fs::write(&report_path, &report)
        .with_context(|| format!("writing {}", report_path.display()))?;

    let csv_path = out_dir.join("transactions.csv");
    write_transactions(&csv_path, &txns)?;

    println!("Files saved:");
    println!("- credit_card_analysis.png");
    println!("- credit_card_analysis_report.txt");
    println!("- transactions.csv");
    Ok(())
}

fn run_clean(csv: Option<PathBuf>, out_dir: PathBuf) -> Result<()> {
    let cfg = config::load_config()?;
    let csv_path = csv.unwrap_or_else(|| out_dir.join("transactions.csv"));
    if !csv_path.exists() {
        bail!(
            "CSV not found: {} (run `cardscan extract` first, or pass --csv <path>)",
            csv_path.display()
        );
    }

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let txns = read_transactions(&csv_path)?;
    println!("Original transactions: {}", txns.len());

    let mut cleaned = cfg.clean_filter().clean(txns);
    if cleaned.is_empty() {
        bail!("no valid transactions left after cleaning");
    }

    cfg.enhanced_table().categorize_all(&mut cleaned);

    let summary = SpendingSummary::compute(&cleaned, 10);

    render_clean_charts(&cleaned, &summary, out_dir.join("clean_credit_card_analysis.png"))?;

    let report = render_clean_report(&summary);
    println!("{report}");
    let report_path = out_dir.join("clean_credit_card_report.txt");
    fs::write(&report_path, &report)
        .with_context(|| format!("writing {}", report_path.display()))?;

    write_transactions(out_dir.join("clean_transactions.csv"), &cleaned)?;

    println!("Files saved:");
    println!("- clean_credit_card_analysis.png");
    println!("- clean_credit_card_report.txt");
    println!("- clean_transactions.csv");
    Ok(())
}

fn run_saas(csv: Option<PathBuf>, out_dir: PathBuf) -> Result<()> {
    let csv_path = csv.unwrap_or_else(|| out_dir.join("clean_transactions.csv"));
    if !csv_path.exists() {
        bail!(
            "CSV not found: {} (run `cardscan clean` first, or pass --csv <path>)",
            csv_path.display()
        );
    }

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let txns = read_transactions(&csv_path)?;
    let saas = filter_saas(&txns);
    if saas.is_empty() {
        println!("No SaaS-related transactions found");
        return Ok(());
    }

    let summary = SaasSummary::compute(&saas);

    render_saas_charts(&saas, out_dir.join("saas_spending_analysis.png"))?;

    let report = render_saas_report(&summary);
    println!("{report}");
    let report_path = out_dir.join("saas_analysis_report.txt");
    fs::write(&report_path, &report)
        .with_context(|| format!("writing {}", report_path.display()))?;

    write_saas_transactions(out_dir.join("saas_transactions.csv"), &saas)?;

    println!("Files saved:");
    println!("- saas_spending_analysis.png");
    println!("- saas_analysis_report.txt");
    println!("- saas_transactions.csv");
    Ok(())
}

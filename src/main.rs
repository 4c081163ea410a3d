//! Priceload CLI - load and reshape commodity price tables
//!
//! # Main Commands
//!
//! ```bash
//! priceload serve                  # Start HTTP server (port 3000)
//! priceload load prices.xlsx      # Clean + reshape to long-form JSON
//! priceload stats prices.xlsx     # Per-region descriptive statistics
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! priceload parse prices.csv      # Just parse the raw table to JSON
//! ```

use clap::{Parser, Subcommand};
use priceload::{describe, load_path, parse_path, SourceFormat};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "priceload")]
#[command(about = "Load wide commodity price tables into long-form observations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a table file and output the raw rows as JSON
    Parse {
        /// Input file (spreadsheet or delimited text)
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Full pipeline: parse, clean, reshape, sort
    Load {
        /// Input file (spreadsheet or delimited text)
        input: PathBuf,

        /// Output file for long-form observations (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also write the transposed summary table
        #[arg(short, long)]
        summary: Option<PathBuf>,
    },

    /// Per-region descriptive statistics
    Stats {
        /// Input file (spreadsheet or delimited text)
        input: PathBuf,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on (default: $PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Load {
            input,
            output,
            summary,
        } => cmd_load(&input, output.as_deref(), summary.as_deref()),

        Commands::Stats { input } => cmd_stats(&input),

        Commands::Serve { port } => cmd_serve(port).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing: {}", input.display());

    let parsed = parse_path(input)?;

    match parsed.format {
        SourceFormat::Spreadsheet => eprintln!("   Format: spreadsheet"),
        SourceFormat::Delimited => {
            eprintln!("   Format: delimited text");
            if let Some(encoding) = &parsed.encoding {
                eprintln!("   Encoding: {}", encoding);
            }
            if let Some(delimiter) = parsed.delimiter {
                eprintln!(
                    "   Delimiter: '{}'",
                    match delimiter {
                        '\t' => "\\t".to_string(),
                        c => c.to_string(),
                    }
                );
            }
        }
    }
    eprintln!("   Columns: {}", parsed.table.headers.join(", "));
    eprintln!("✅ Parsed {} rows", parsed.table.rows.len());

    let json = serde_json::to_string_pretty(&parsed.table)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_load(
    input: &Path,
    output: Option<&Path>,
    summary_output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let result = load_path(input)?;

    eprintln!("   Regions:      {}", result.info.region_count);
    eprintln!("   Date columns: {}", result.info.date_count);
    eprintln!("   Observations: {}", result.info.observation_count);

    let dropped = &result.info.dropped;
    if dropped.blank_region + dropped.empty_rows + dropped.missing_prices > 0 {
        eprintln!(
            "   ⚠️  Dropped: {} blank-region rows, {} empty rows, {} missing prices",
            dropped.blank_region, dropped.empty_rows, dropped.missing_prices
        );
    }

    let long_json = serde_json::to_string_pretty(&result.long)?;
    write_output(&long_json, output)?;

    if let Some(summary_path) = summary_output {
        let summary_json = serde_json::to_string_pretty(&result.summary)?;
        fs::write(summary_path, &summary_json)?;
        eprintln!("💾 Summary written to: {}", summary_path.display());
    }

    eprintln!("✨ Done!");
    Ok(())
}

fn cmd_stats(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("🔬 Statistics: {}", input.display());

    let result = load_path(input)?;
    let rows = describe(&result.summary);

    println!(
        "{:<24} {:>6} {:>10} {:>10} {:>8} {:>10} {:>10} {:>10} {:>8}",
        "Region", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    );
    for row in rows {
        println!(
            "{:<24} {:>6} {:>10} {:>10} {:>8} {:>10} {:>10} {:>10} {:>8}",
            row.region,
            row.count,
            fmt_f64(row.mean),
            fmt_f64(row.std),
            fmt_u64(row.min),
            fmt_f64(row.q25),
            fmt_f64(row.median),
            fmt_f64(row.q75),
            fmt_u64(row.max),
        );
    }

    Ok(())
}

fn fmt_f64(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

fn fmt_u64(v: Option<u64>) -> String {
    v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}

async fn cmd_serve(port: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let port = port
        .or_else(|| std::env::var("PORT").ok().and_then(|p| p.parse().ok()))
        .unwrap_or(3000);
    priceload::server::start_server(port).await
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}

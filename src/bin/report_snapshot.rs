use std::{env, fs, path::PathBuf, process::exit};

use anyhow::{Context, Result};
use tracing::info;
use votereport::{
    config::Config,
    export::{ExportFormat, PdfFont},
    fetch::{HttpSource, TableSource},
    init_logging,
    report::{build_report, NON_VOTER_COLUMNS},
};

struct Args {
    user_id: String,
    excel: Option<PathBuf>,
    pdf: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Option<Args> {
    let user_id = args.next()?;
    let mut parsed = Args {
        user_id,
        excel: None,
        pdf: None,
    };
    while let Some(flag) = args.next() {
        let value = PathBuf::from(args.next()?);
        match flag.as_str() {
            "--excel" => parsed.excel = Some(value),
            "--pdf" => parsed.pdf = Some(value),
            _ => return None,
        }
    }
    Some(parsed)
}

#[tokio::main]
async fn main() {
    let mut argv = env::args();
    let program = argv.next().unwrap_or_else(|| "report_snapshot".to_string());
    let Some(args) = parse_args(argv) else {
        eprintln!("Usage: {} <USER_ID> [--excel OUT.xlsx] [--pdf OUT.pdf]", program);
        exit(1);
    };

    init_logging();
    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Fetch the sheet once, print the user's summary and write any requested
/// exports.
async fn run(args: Args) -> Result<()> {
    let config = Config::load()?;
    let source = HttpSource::new(config.sheet_url.clone(), config.fetch_timeout)?;
    let table = source.fetch().await.context("fetching vote sheet")?;
    let report = build_report(&table, &args.user_id)?;

    println!("=== User {} ===", report.user_id);
    println!("Rows:      {}", report.total_rows);
    println!("Voted yes: {}", report.voted_yes);
    println!("Voted no:  {}", report.voted_no);
    println!();
    println!("{}", NON_VOTER_COLUMNS.join("\t"));
    for row in &report.non_voters {
        println!("{}", row.cells().join("\t"));
    }

    let font = match &config.pdf_font {
        Some(path) => PdfFont::from_file(path)?,
        None => PdfFont::bundled(),
    };
    let outputs = [(ExportFormat::Excel, args.excel), (ExportFormat::Pdf, args.pdf)];
    for (format, path) in outputs {
        let Some(path) = path else { continue };
        let bytes = format.encode(&report.user_id, &report.non_voters, &font)?;
        fs::write(&path, &bytes).with_context(|| format!("writing {:?}", path))?;
        info!(path = %path.display(), bytes = bytes.len(), "export written");
    }

    Ok(())
}

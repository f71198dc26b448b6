//! Main entry point for the xmicarve CLI application.
//!
//! Loads a dump from disk or over HTTP, unwraps base64 if needed, carves
//! it, and then lists, pipes, searches or writes what was recovered.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tracing_subscriber::EnvFilter;

use xmicarve::io::is_http_url;
use xmicarve::{
    ArtifactExtractor, Carver, Cli, Container, HttpRangeReader, KeywordSearch, LocalFileReader,
    ReadAt, RecoveryResult, Report, ReportWriter,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let data = load(&cli).await?;
    let container = if cli.raw {
        Container::Raw
    } else {
        Container::detect(&data)
    };
    let buffer = container
        .decode(data)
        .with_context(|| format!("cannot unwrap {}", cli.file))?;
    tracing::info!(?container, len = buffer.len(), "input ready");

    let carver = Carver::new(cli.carve_options());
    let (buffer, report) = tokio::task::spawn_blocking(move || {
        let report = carver.carve(&buffer);
        (buffer, report)
    })
    .await?;

    if report.candidate_cap_hit && !cli.is_very_quiet() {
        eprintln!(
            "warning: stopped after {} candidates, later entries were not examined",
            cli.max_candidates
        );
    }

    if cli.pipe {
        return pipe_entries(&report).await;
    }

    if !cli.search.is_empty() {
        search_entries(&report, &cli)?;
    }

    if cli.extract {
        extract_artifacts(&report, &cli)?;
    }

    if let Some(ref dir) = cli.extract_dir {
        return write_entries(&report, &buffer, dir, &cli).await;
    }

    let analysed = !cli.search.is_empty() || cli.extract;
    if !analysed || cli.list || cli.verbose {
        list_entries(&report, cli.verbose);
    }

    Ok(())
}

/// Read the whole input, local or remote.
async fn load(cli: &Cli) -> Result<Vec<u8>> {
    if is_http_url(&cli.file) {
        let reader = HttpRangeReader::new(cli.file.clone()).await?;
        let data = reader.read_all().await?;
        if !cli.is_quiet() {
            eprintln!("Total bytes transferred: {}", format_size(reader.transferred_bytes()));
        }
        Ok(data)
    } else {
        LocalFileReader::open(Path::new(&cli.file))?.read_all().await
    }
}

/// Print the carved entries, one name per line or as a table.
fn list_entries(report: &Report, verbose: bool) {
    if verbose {
        println!(
            "{:>10}  {:>6}  {:>10}  {:<10}  {:<8}  {:<14}  {:<18}  {:>10}  Name",
            "Offset", "Method", "Payload", "Date", "Time", "Boundary", "Recovered by", "Length"
        );
        println!("{}", "-".repeat(112));
    }

    for (entry, result) in report.iter() {
        if !verbose {
            println!("{}", entry.file_name);
            continue;
        }

        let (strategy, length) = match result {
            RecoveryResult::Recovered {
                bytes,
                strategy,
                verified,
                ..
            } => {
                let mark = if *verified { "" } else { "*" };
                (format!("{}{}", strategy, mark), bytes.len().to_string())
            }
            RecoveryResult::Failed { .. } => ("failed".to_string(), "-".to_string()),
        };

        let (year, month, day) = entry.header.mod_date();
        let (hour, minute, second) = entry.header.mod_time();
        println!(
            "{:>10}  {:>6}  {:>10}  {:04}-{:02}-{:02}  {:02}:{:02}:{:02}  {:<14}  {:<18}  {:>10}  {}",
            entry.header_offset,
            entry.header.compression_method.label(),
            entry.payload_len(),
            year,
            month,
            day,
            hour,
            minute,
            second,
            entry.boundary.label(),
            strategy,
            length,
            entry.file_name
        );

        if let RecoveryResult::Failed { attempts } = result {
            for attempt in attempts {
                println!("{:>12}{}", "", attempt);
            }
        }
    }

    if verbose {
        let summary = report.summary();
        println!("{}", "-".repeat(112));
        println!(
            "{} entries: {} recovered ({} verified, {} text only), {} failed, {} candidates skipped",
            summary.entries,
            summary.recovered,
            summary.verified,
            summary.text_only,
            summary.failed,
            summary.skipped
        );
        if summary.recovered > summary.verified {
            println!("* output not confirmed by the header checksum");
        }
    }
}

/// Write recovered content to stdout, with a marker line between entries.
async fn pipe_entries(report: &Report) -> Result<()> {
    let recovered: Vec<_> = report
        .iter()
        .filter_map(|(entry, result)| result.bytes().map(|bytes| (entry, bytes)))
        .collect();
    let show_names = recovered.len() > 1;

    let mut stdout = tokio::io::stdout();
    for (entry, bytes) in recovered {
        if show_names {
            stdout
                .write_all(format!("--- {} ---\n", entry.file_name).as_bytes())
                .await?;
        }
        stdout.write_all(bytes).await?;
    }
    stdout.flush().await?;
    Ok(())
}

/// Report every keyword hit in every recovered entry.
fn search_entries(report: &Report, cli: &Cli) -> Result<()> {
    let search = KeywordSearch::new(&cli.search, cli.search_options())?;

    let mut total = 0usize;
    for (entry, result) in report.iter() {
        let Some(bytes) = result.bytes() else {
            continue;
        };
        for hit in search.find(bytes) {
            total += 1;
            println!(
                "{}:{}: {} [{}] ...{}...",
                entry.file_name, hit.offset, hit.term, hit.token, hit.context
            );
        }
    }

    if !cli.is_quiet() {
        eprintln!("{} matches for {}", total, search.terms().join(", "));
    }
    Ok(())
}

/// Report emails, user IDs and NETDATA headers per recovered entry.
fn extract_artifacts(report: &Report, cli: &Cli) -> Result<()> {
    let extractor = ArtifactExtractor::new()?;

    let mut total = 0usize;
    for (entry, result) in report.iter() {
        let Some(bytes) = result.bytes() else {
            continue;
        };
        for artifact in extractor.extract(bytes) {
            total += 1;
            println!(
                "{}:{}: {} {}",
                entry.file_name,
                artifact.offset,
                artifact.kind.label(),
                artifact.value
            );
        }
    }

    if !cli.is_quiet() {
        eprintln!("{} artifacts found", total);
    }
    Ok(())
}

/// Write entries and optional extras under `dir`.
async fn write_entries(report: &Report, buffer: &[u8], dir: &str, cli: &Cli) -> Result<()> {
    let writer = ReportWriter::new(dir)
        .overwrite(cli.overwrite)
        .save_failed(cli.save_failed)
        .json(cli.json);
    let summary = writer.write(report, buffer).await?;

    if !cli.is_quiet() {
        for path in &summary.written {
            println!("  recovered: {}", path.display());
        }
        for path in &summary.existing {
            eprintln!("Skipping: {} (use -o to overwrite)", path.display());
        }
    }
    Ok(())
}

/// Format a byte size into a human-readable string.
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

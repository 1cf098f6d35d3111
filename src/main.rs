//! logcheck — validate onboard log message documentation.
//!
//! Cross-references every log message declared in a firmware source tree
//! (static struct-table rows plus dynamic `Write()` call sites) against the
//! documentation tree produced by the external generator, under a
//! vehicle-specific exemption policy. Exit status 0 means every message is
//! documented, completely and without strays.

mod docs;
mod extract;
mod model;
mod validate;
mod vehicle;
mod whitelist;

use anyhow::{bail, Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use vehicle::Vehicle;

/// Name of the artifact the documentation generator must produce.
const DOC_FILENAME: &str = "LogMessages.xml";

/// Anything shorter than this is a truncated generator run, not a document.
const DOC_MIN_BYTES: u64 = 1024;

#[derive(Parser)]
#[command(
    name = "logcheck",
    about = "Validate onboard log message documentation against firmware sources"
)]
struct Cli {
    /// Vehicle type
    #[arg(long, value_enum)]
    vehicle: Vehicle,

    /// Firmware source tree root
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Pre-generated documentation file; skips the generator step
    #[arg(long)]
    docs: Option<PathBuf>,

    /// Documentation generator command, run in the output directory with
    /// `--vehicle <VEHICLE>` appended; must produce LogMessages.xml there
    #[arg(long)]
    generator: Option<String>,

    /// Output directory for generated artifacts (default: temp directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keeps the ephemeral directory alive until the run completes.
    let mut tempdir_guard = None;

    let doc_path = match &cli.docs {
        Some(path) => path.clone(),
        None => {
            let Some(generator) = &cli.generator else {
                bail!("either --docs or --generator is required");
            };
            let output_dir = match &cli.output_dir {
                Some(dir) => {
                    fs::create_dir_all(dir).with_context(|| {
                        format!("failed to create output directory: {}", dir.display())
                    })?;
                    dir.clone()
                }
                None => {
                    let tmp = tempfile::tempdir().context("failed to create temp directory")?;
                    let path = tmp.path().to_path_buf();
                    tempdir_guard = Some(tmp);
                    path
                }
            };
            generate_docs(generator, cli.vehicle, &output_dir)?
        }
    };

    let result = run(cli.vehicle, &cli.root, &doc_path);

    drop(tempdir_guard);
    result
}

/// Run the external documentation generator and sanity-check its output.
fn generate_docs(generator: &str, vehicle: Vehicle, output_dir: &Path) -> Result<PathBuf> {
    let doc_path = output_dir.join(DOC_FILENAME);
    // A stale artifact could mask a generator failure.
    let _ = fs::remove_file(&doc_path);

    println!("generating documentation for {vehicle}...");

    let mut parts = generator.split_whitespace();
    let Some(program) = parts.next() else {
        bail!("empty generator command");
    };
    let status = Command::new(program)
        .args(parts)
        .arg("--vehicle")
        .arg(vehicle.to_string())
        .current_dir(output_dir)
        .status()
        .with_context(|| format!("failed to run generator: {generator}"))?;
    if !status.success() {
        bail!("generator exited with {status}");
    }

    let metadata = fs::metadata(&doc_path)
        .with_context(|| format!("generator did not produce {}", doc_path.display()))?;
    if metadata.len() < DOC_MIN_BYTES {
        bail!(
            "generated documentation file is too short ({} < {DOC_MIN_BYTES} bytes)",
            metadata.len()
        );
    }
    println!("generated documentation file: {} bytes", metadata.len());

    Ok(doc_path)
}

fn run(vehicle: Vehicle, rootdir: &Path, doc_path: &Path) -> Result<()> {
    let whitelist = whitelist::whitelist(vehicle);

    let xml = fs::read_to_string(doc_path)
        .with_context(|| format!("failed to read {}", doc_path.display()))?;
    let doc_ids = docs::load_doc_ids(&xml, &whitelist)?;

    let extraction = extract::all_log_format_ids(vehicle, rootdir)?;
    if extraction.skipped_rows > 0 {
        println!(
            "note: {} table rows did not match the record grammar",
            extraction.skipped_rows
        );
    }

    let verdict = validate::cross_reference(&extraction.ids, &doc_ids, &whitelist)?;

    if !verdict.passed() {
        report_category("undocumented messages found", &verdict.undocumented);
        report_category(
            "messages documented when they should not be",
            &verdict.overdocumented,
        );
        report_category("documented messages not in code", &verdict.missing);
        bail!("documentation validation failed for {vehicle}");
    }

    println!("SUCCESS: logger documentation validation passed for {vehicle}");
    Ok(())
}

fn report_category(heading: &str, names: &[String]) {
    if names.is_empty() {
        return;
    }
    println!("ERROR: {heading}:");
    for name in names {
        println!("  - {name}");
    }
}

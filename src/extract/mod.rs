//! Source-tree extraction — recovers every log message definition from a
//! firmware checkout without a C++ front end.
//!
//! Three passes over the tree: collect macro defines from the declaration
//! files, recover struct-table rows (shared declarations plus the vehicle's
//! own aggregation file), then reassemble every logging call statement from
//! the implementation files. The normalizer merges the lot into one
//! name-keyed record set.

pub mod calls;
pub mod defines;
pub mod normalize;
pub mod structs;

use crate::model::RawEntry;
use crate::vehicle::Vehicle;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File names that declare the shared message tables and macro defines.
const STRUCTURE_FILENAMES: &[&str] = &["LogStructure.h", "LogStructure_SBP.h"];

/// Example code under the logging library is not part of any vehicle build.
const EXCLUDED_PATH_FRAGMENT: &str = "AP_Logger/examples";

/// Find every declaration file under the root, sorted for determinism.
pub fn find_structure_files(rootdir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for name in STRUCTURE_FILENAMES {
        let pattern = format!("{}/**/{name}", rootdir.display());
        let paths = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        found.extend(paths.filter_map(|r| r.ok()));
    }
    found.sort();
    Ok(found)
}

/// Find every implementation file under the shared library tree and the
/// vehicle's code directory, excluding logging-library example code.
pub fn find_implementation_files(rootdir: &Path, vehicle: Vehicle) -> Result<Vec<PathBuf>> {
    let bases = [rootdir.join("libraries"), vehicle.code_dirpath(rootdir)];
    let mut found = Vec::new();
    for base in &bases {
        let pattern = format!("{}/**/*.cpp", base.display());
        let paths = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?;
        found.extend(
            paths
                .filter_map(|r| r.ok())
                .filter(|p| !p.to_string_lossy().contains(EXCLUDED_PATH_FRAGMENT)),
        );
    }
    found.sort();
    found.dedup();
    Ok(found)
}

/// Extract all log message definitions for a vehicle.
pub fn all_log_format_ids(vehicle: Vehicle, rootdir: &Path) -> Result<normalize::Normalized> {
    let structure_files = find_structure_files(rootdir)?;

    let mut structure_lines = String::new();
    for path in &structure_files {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        structure_lines.push_str(&content);
        structure_lines.push('\n');
    }
    let defines = defines::find_format_defines(structure_lines.lines())?;

    let mut entries: Vec<RawEntry> = Vec::new();

    for path in &structure_files {
        println!("parsing structure file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let rows = structs::scan_declaration_file(&content)
            .with_context(|| format!("in {}", path.display()))?;
        entries.extend(rows.into_iter().map(RawEntry::struct_table));
    }

    let vehicle_log = vehicle.code_dirpath(rootdir).join("Log.cpp");
    let content = fs::read_to_string(&vehicle_log)
        .with_context(|| format!("failed to read {}", vehicle_log.display()))?;
    let rows = structs::scan_vehicle_file(&content)
        .with_context(|| format!("in {}", vehicle_log.display()))?;
    entries.extend(rows.into_iter().map(RawEntry::struct_table));

    println!("scanning implementation files for logging calls...");
    for path in find_implementation_files(rootdir, vehicle)? {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let statements = calls::scan_implementation_file(&content)
            .with_context(|| format!("in {}", path.display()))?;
        entries.extend(statements.into_iter().map(RawEntry::call_site));
    }

    normalize::build_code_ids(&entries, &defines)
}

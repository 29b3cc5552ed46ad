//! CLI Command Implementations
//!
//! Every command starts with the same load → merge → validate steps; they
//! live here.

pub mod demo;
pub mod generate;
pub mod validate;

use std::path::Path;

use colored::Colorize;
use hera_codegen::{load_app_pack, load_overlay, merge_config, AppPack, Severity, ValidationError};
use tracing::info;

use crate::error::CliResult;

/// Load a pack, apply the optional overlay and re-check the required fields
/// on the merged result.
pub(crate) fn load_pack(pack: &Path, overlay: Option<&Path>) -> CliResult<AppPack> {
    let base = load_app_pack(pack)?;
    let overlay = overlay.map(load_overlay).transpose()?;
    if overlay.is_some() {
        info!(pack = %pack.display(), "applying overlay");
    }
    let merged = merge_config(base, overlay);
    merged.check_required()?;
    Ok(merged)
}

/// Print validation results and return `true` if any errors were found.
pub(crate) fn print_validation_results(errors: &[ValidationError], pack_path: &Path) -> bool {
    let mut has_errors = false;
    for e in errors {
        match e.severity {
            Severity::Error => {
                eprintln!("{} [{}] {}", "✗".red(), e.location, e.message);
                has_errors = true;
            }
            Severity::Warning => {
                eprintln!("{} [{}] {}", "!".yellow(), e.location, e.message);
            }
        }
    }
    if !errors.is_empty() {
        eprintln!("  in: {}", pack_path.display());
    }
    has_errors
}

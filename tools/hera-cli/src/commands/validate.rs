//! `hera-mvp validate` subcommand
//!
//! Runs load → merge → validate and prints a pass/fail report. Never writes
//! files. Exits 1 when the pack has `Error`-severity issues.

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use hera_codegen::smart_code::collect_smart_codes;
use hera_codegen::validate::error_count;
use hera_codegen::{validate, validate_smart_codes, AppPack, Severity, ValidationError};
use serde::Serialize;

use crate::commands::{load_pack, print_validation_results};
use crate::error::{CliError, CliResult};
use crate::output::json::format_json;
use crate::output::table::format_report_table;
use crate::output::OutputFormat;

/// Validate an app pack without generating anything
#[derive(Debug, Args)]
pub struct ValidateCommand {
    /// Path to the app pack (JSON, or TOML with a `.toml` extension)
    pub pack: PathBuf,

    /// Overlay pack whose top-level keys replace the base pack's
    #[arg(long)]
    pub overlay: Option<PathBuf>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::default())]
    pub format: OutputFormat,
}

/// Summary of one validation run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub app_id: String,
    pub entities: usize,
    pub transactions: usize,
    pub smart_codes: usize,
    pub smart_code_errors: usize,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Issue {
    pub severity: &'static str,
    pub location: String,
    pub message: String,
}

impl ValidationReport {
    pub fn new(pack: &AppPack, issues: &[ValidationError]) -> Self {
        let errors = error_count(issues);
        Self {
            app_id: pack.app.id.clone(),
            entities: pack.entities.len(),
            transactions: pack.transactions.len(),
            smart_codes: collect_smart_codes(pack).len(),
            smart_code_errors: validate_smart_codes(pack).len(),
            errors,
            warnings: issues.len() - errors,
            issues: issues
                .iter()
                .map(|e| Issue {
                    severity: match e.severity {
                        Severity::Error => "error",
                        Severity::Warning => "warning",
                    },
                    location: e.location.clone(),
                    message: e.message.clone(),
                })
                .collect(),
        }
    }

    pub fn passed(&self) -> bool {
        self.errors == 0
    }
}

impl ValidateCommand {
    pub async fn execute(self) -> CliResult<()> {
        let pack = load_pack(&self.pack, self.overlay.as_deref())?;
        let issues = validate(&pack);
        let report = ValidationReport::new(&pack, &issues);

        match self.format {
            OutputFormat::Table => {
                print_validation_results(&issues, &self.pack);
                println!("{}", format_report_table(&report));
                if report.passed() {
                    println!("{} {} is valid", "✓".green(), self.pack.display());
                }
            }
            OutputFormat::Json | OutputFormat::JsonCompact => {
                println!("{}", format_json(&report, self.format)?);
            }
        }

        if report.passed() {
            Ok(())
        } else {
            Err(CliError::validation_failed(&self.pack, report.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hera_codegen::demo_app_pack;

    #[test]
    fn report_counts_demo_pack() {
        let pack = demo_app_pack();
        let report = ValidationReport::new(&pack, &validate(&pack));
        assert_eq!(report.entities, 2);
        assert_eq!(report.transactions, 1);
        assert_eq!(report.smart_code_errors, 0);
        assert!(report.passed());
    }

    #[test]
    fn lowercase_smart_code_is_one_error() {
        let mut pack = demo_app_pack();
        pack.transactions[0].smart_code = "finance.txn.sale.v1".to_string();
        let report = ValidationReport::new(&pack, &validate(&pack));
        assert_eq!(report.smart_code_errors, 1);
        assert_eq!(report.errors, 1);
        assert_eq!(report.issues[0].location, "transactions[0].smart_code");
        assert!(!report.passed());
    }
}

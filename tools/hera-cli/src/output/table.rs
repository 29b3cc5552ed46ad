//! Table Output Formatting

use std::collections::BTreeMap;

use colored::Colorize;
use hera_codegen::{FileKind, GeneratedFile};
use tabled::{builder::Builder, settings::Style};

use crate::commands::validate::ValidationReport;

/// Format per-kind file counts, with a total row
pub fn format_counts_table(counts: &BTreeMap<FileKind, usize>) -> String {
    let mut builder = Builder::default();
    builder.push_record(vec!["Kind", "Files"]);

    let mut total = 0;
    for (kind, n) in counts {
        builder.push_record(vec![kind.label().to_string(), n.to_string()]);
        total += n;
    }
    builder.push_record(vec!["total".bold().to_string(), total.to_string()]);

    builder.build().with(Style::modern()).to_string()
}

/// Format the list of generated files
pub fn format_files_table(files: &[GeneratedFile]) -> String {
    if files.is_empty() {
        return "No files generated".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(vec!["Kind", "Path", "Lines"]);

    for file in files {
        builder.push_record(vec![
            file.kind.label().to_string(),
            file.path.display().to_string(),
            file.contents.lines().count().to_string(),
        ]);
    }

    builder.build().with(Style::modern()).to_string()
}

/// Format a validation report summary
pub fn format_report_table(report: &ValidationReport) -> String {
    let status = if report.passed() {
        "pass".green().to_string()
    } else {
        "fail".red().to_string()
    };

    let mut builder = Builder::default();
    builder.push_record(vec![
        "App",
        "Entities",
        "Transactions",
        "Smart codes",
        "Errors",
        "Warnings",
        "Status",
    ]);
    builder.push_record(vec![
        report.app_id.clone(),
        report.entities.to_string(),
        report.transactions.to_string(),
        format!("{}/{}", report.smart_codes - report.smart_code_errors, report.smart_codes),
        report.errors.to_string(),
        report.warnings.to_string(),
        status,
    ]);

    builder.build().with(Style::modern()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hera_codegen::{demo_app_pack, generate_all, validate};

    #[test]
    fn test_empty_files_table() {
        assert_eq!(format_files_table(&[]), "No files generated");
    }

    #[test]
    fn counts_table_lists_every_kind() {
        let bundle = generate_all(&demo_app_pack()).unwrap();
        let table = format_counts_table(&bundle.counts());
        for kind in FileKind::ALL {
            assert!(table.contains(kind.label()), "missing {kind}:\n{table}");
        }
        assert!(table.contains(&bundle.len().to_string()));
    }

    #[test]
    fn files_table_lists_paths() {
        let bundle = generate_all(&demo_app_pack()).unwrap();
        let table = format_files_table(&bundle.files);
        assert!(table.contains("src/app/dealer-ops/page.tsx"), "{table}");
        assert!(table.contains("seeds/dealer-ops/seed-plan.json"), "{table}");
    }

    #[test]
    fn report_table_shows_status() {
        let pack = demo_app_pack();
        let report = ValidationReport::new(&pack, &validate(&pack));
        let table = format_report_table(&report);
        assert!(table.contains("dealer-ops"), "{table}");
        assert!(table.contains("pass"), "{table}");
    }
}

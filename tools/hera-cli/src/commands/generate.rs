//! `hera-mvp generate` subcommand
//!
//! Runs load → merge → validate → generate and writes the bundle under the
//! output directory. Any `Error`-severity issue stops the run before a
//! single file is written.
//!
//! # Usage
//!
//! ```text
//! hera-mvp generate packs/dealer.json                     # into ./generated
//! hera-mvp generate packs/dealer.json ../dealer-app       # custom output dir
//! hera-mvp generate packs/dealer.json --overlay prod.json # apply an overlay
//! hera-mvp generate packs/dealer.json --dry-run           # list files only
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use colored::Colorize;
use hera_codegen::validate::error_count;
use hera_codegen::{generate_all, validate, GeneratedBundle};
use tracing::debug;

use crate::commands::{load_pack, print_validation_results};
use crate::error::{CliError, CliResult};
use crate::output::table::{format_counts_table, format_files_table};

/// Generate the Next.js scaffold for an app pack
#[derive(Debug, Args)]
pub struct GenerateCommand {
    /// Path to the app pack (JSON, or TOML with a `.toml` extension)
    pub pack: PathBuf,

    /// Output directory
    #[arg(default_value = "./generated")]
    pub out_dir: PathBuf,

    /// Overlay pack whose top-level keys replace the base pack's
    #[arg(long)]
    pub overlay: Option<PathBuf>,

    /// List the files that would be generated without writing them
    #[arg(long)]
    pub dry_run: bool,
}

impl GenerateCommand {
    pub async fn execute(self) -> CliResult<()> {
        // ── Load and validate ──────────────────────────────────────────────
        let pack = load_pack(&self.pack, self.overlay.as_deref())?;

        let errors = validate(&pack);
        if print_validation_results(&errors, &self.pack) {
            return Err(CliError::validation_failed(&self.pack, error_count(&errors)));
        }

        // ── Generate ───────────────────────────────────────────────────────
        let bundle = generate_all(&pack)?;

        if self.dry_run {
            println!("{}", format_files_table(&bundle.files));
            println!(
                "{} {} file(s) would be written to {}",
                "·".dimmed(),
                bundle.len(),
                self.out_dir.display()
            );
            return Ok(());
        }

        // ── Write files ────────────────────────────────────────────────────
        let summary = write_bundle(&self.out_dir, &bundle).await?;

        println!("{}", format_counts_table(&bundle.counts()));
        println!(
            "{} Generated {} for '{}' into {} ({} written, {} unchanged)",
            "✓".green(),
            pluralise(bundle.len(), "file"),
            pack.app.id,
            self.out_dir.display(),
            summary.written,
            summary.unchanged
        );

        Ok(())
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WriteStatus {
    Written,
    Unchanged,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WriteSummary {
    pub written: usize,
    pub unchanged: usize,
}

fn pluralise(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("{n} {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Write every file of `bundle` under `out_dir`, printing one status line
/// per file.
pub(crate) async fn write_bundle(
    out_dir: &Path,
    bundle: &GeneratedBundle,
) -> CliResult<WriteSummary> {
    let mut summary = WriteSummary::default();
    for file in &bundle.files {
        let path = out_dir.join(&file.path);
        match write_if_changed(&path, &file.contents).await? {
            WriteStatus::Written => {
                println!("  {} {} written", "→".cyan(), path.display());
                summary.written += 1;
            }
            WriteStatus::Unchanged => {
                println!("  {} {} unchanged", "·".dimmed(), path.display());
                summary.unchanged += 1;
            }
        }
    }
    debug!(
        out_dir = %out_dir.display(),
        written = summary.written,
        unchanged = summary.unchanged,
        "bundle written"
    );
    Ok(summary)
}

/// Write `contents` to `path`, creating parent directories as needed. Files
/// whose contents already match are left untouched.
pub(crate) async fn write_if_changed(path: &Path, contents: &str) -> CliResult<WriteStatus> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("creating directory: {}", parent.display()))?;
    }

    let existing = tokio::fs::read_to_string(path).await.ok();
    if existing.as_deref() == Some(contents) {
        return Ok(WriteStatus::Unchanged);
    }

    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(WriteStatus::Written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hera_codegen::demo_app_pack;
    use tempfile::TempDir;

    #[tokio::test]
    async fn write_if_changed_creates_parents_and_detects_no_op() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("src/app/dealer-ops/page.tsx");

        assert_eq!(write_if_changed(&path, "a").await.unwrap(), WriteStatus::Written);
        assert_eq!(write_if_changed(&path, "a").await.unwrap(), WriteStatus::Unchanged);
        assert_eq!(write_if_changed(&path, "b").await.unwrap(), WriteStatus::Written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "b");
    }

    #[tokio::test]
    async fn rewriting_a_bundle_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let bundle = generate_all(&demo_app_pack()).unwrap();

        let first = write_bundle(dir.path(), &bundle).await.unwrap();
        assert_eq!(first.written, bundle.len());

        let second = write_bundle(dir.path(), &bundle).await.unwrap();
        assert_eq!(second.written, 0);
        assert_eq!(second.unchanged, bundle.len());
    }

    #[tokio::test]
    async fn invalid_pack_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let mut pack = demo_app_pack();
        pack.transactions[0].smart_code = "finance.txn.sale.v1".to_string();
        let pack_path = dir.path().join("pack.json");
        std::fs::write(&pack_path, pack.to_json_pretty().unwrap()).unwrap();
        let out_dir = dir.path().join("out");

        let cmd = GenerateCommand {
            pack: pack_path,
            out_dir: out_dir.clone(),
            overlay: None,
            dry_run: false,
        };
        let err = cmd.execute().await.unwrap_err();
        assert!(matches!(err, CliError::ValidationFailed { errors: 1, .. }), "{err}");
        assert!(!out_dir.exists());
    }

    #[tokio::test]
    async fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let pack_path = dir.path().join("pack.json");
        std::fs::write(&pack_path, demo_app_pack().to_json_pretty().unwrap()).unwrap();
        let out_dir = dir.path().join("out");

        GenerateCommand {
            pack: pack_path,
            out_dir: out_dir.clone(),
            overlay: None,
            dry_run: true,
        }
        .execute()
        .await
        .unwrap();
        assert!(!out_dir.exists());
    }

    #[test]
    fn pluralise_counts() {
        assert_eq!(pluralise(1, "file"), "1 file");
        assert_eq!(pluralise(15, "file"), "15 files");
    }
}

//! `hera-mvp demo` subcommand
//!
//! Writes the built-in dealer pack to `demo-dealer-ops.json` and generates
//! it into `demo-generated/`, both under `--dir` (default: the working
//! directory).

use std::path::PathBuf;

use clap::Args;
use colored::Colorize;
use hera_codegen::demo::{DEMO_OUTPUT_DIR, DEMO_PACK_FILE};
use hera_codegen::demo_app_pack;

use crate::commands::generate::{write_if_changed, GenerateCommand, WriteStatus};
use crate::error::CliResult;

/// Write the demo dealer pack and generate it
#[derive(Debug, Args)]
pub struct DemoCommand {
    /// Directory for the demo pack and the generated app
    #[arg(long, default_value = ".")]
    pub dir: PathBuf,
}

impl DemoCommand {
    pub async fn execute(self) -> CliResult<()> {
        let pack = demo_app_pack();
        let mut json = pack.to_json_pretty()?;
        json.push('\n');

        let pack_path = self.dir.join(DEMO_PACK_FILE);
        let status = write_if_changed(&pack_path, &json).await?;
        let verb = match status {
            WriteStatus::Written => "written",
            WriteStatus::Unchanged => "unchanged",
        };
        println!("{} demo pack {} {verb}", "✓".green(), pack_path.display());

        GenerateCommand {
            pack: pack_path,
            out_dir: self.dir.join(DEMO_OUTPUT_DIR),
            overlay: None,
            dry_run: false,
        }
        .execute()
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn demo_writes_pack_and_app() {
        let dir = TempDir::new().unwrap();
        DemoCommand {
            dir: dir.path().to_path_buf(),
        }
        .execute()
        .await
        .unwrap();

        assert!(dir.path().join(DEMO_PACK_FILE).is_file());
        let app = dir.path().join(DEMO_OUTPUT_DIR);
        assert!(app.join("src/app/dealer-ops/page.tsx").is_file());
        assert!(app.join("src/app/dealer-ops/vehicle/new/page.tsx").is_file());
        assert!(app.join("seeds/dealer-ops/seed.ts").is_file());
        assert!(app.join("tests/dealer-ops/gl-balance.test.ts").is_file());
    }
}

//! Generate every output file for a pack

use std::collections::BTreeMap;

use tracing::debug;

use crate::api::generate_api_routes;
use crate::context::GenerationContext;
use crate::error::GenerateError;
use crate::lib_files::generate_lib_files;
use crate::middleware::generate_middleware;
use crate::pack::AppPack;
use crate::pages::generate_pages;
use crate::seed::generate_seed_files;
use crate::source::{FileKind, GeneratedFile};
use crate::tests_gen::generate_test_suites;

/// All files for one pack, in output order: pages, API routes, lib files,
/// middleware, seeds, tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedBundle {
    pub files: Vec<GeneratedFile>,
}

impl GeneratedBundle {
    /// Number of files of each kind; every kind is present, possibly as 0.
    pub fn counts(&self) -> BTreeMap<FileKind, usize> {
        let mut counts: BTreeMap<FileKind, usize> =
            FileKind::ALL.iter().map(|k| (*k, 0)).collect();
        for file in &self.files {
            *counts.entry(file.kind).or_default() += 1;
        }
        counts
    }

    pub fn count(&self, kind: FileKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Generate every file for `pack`.
///
/// The pack must already have passed [`validate`](crate::validate::validate);
/// this function does not re-check it. Output is a pure function of the pack.
pub fn generate_all(pack: &AppPack) -> Result<GeneratedBundle, GenerateError> {
    let ctx = GenerationContext::new(pack);

    let mut files = generate_pages(&ctx);
    files.extend(generate_api_routes(&ctx));
    files.extend(generate_lib_files(&ctx));
    files.push(generate_middleware(&ctx));
    files.extend(generate_seed_files(&ctx)?);
    files.extend(generate_test_suites(&ctx));

    let bundle = GeneratedBundle { files };
    for (kind, n) in bundle.counts() {
        debug!(app = %pack.app.id, %kind, count = n, "generated files");
    }
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    #[test]
    fn counts_per_kind() {
        let bundle = generate_all(&sample_pack()).unwrap();
        let counts = bundle.counts();
        assert_eq!(counts[&FileKind::Page], 4);
        assert_eq!(counts[&FileKind::Api], 2);
        assert_eq!(counts[&FileKind::Lib], 3);
        assert_eq!(counts[&FileKind::Middleware], 1);
        assert_eq!(counts[&FileKind::Seed], 2);
        assert_eq!(counts[&FileKind::Test], 3);
        assert_eq!(bundle.len(), 15);
    }

    #[test]
    fn output_order_is_fixed() {
        let bundle = generate_all(&sample_pack()).unwrap();
        let kinds: Vec<FileKind> = bundle.files.iter().map(|f| f.kind).collect();
        let mut grouped = kinds.clone();
        grouped.dedup();
        assert_eq!(
            grouped,
            vec![
                FileKind::Page,
                FileKind::Api,
                FileKind::Lib,
                FileKind::Middleware,
                FileKind::Seed,
                FileKind::Test,
            ]
        );
    }

    #[test]
    fn paths_are_unique() {
        let bundle = generate_all(&sample_pack()).unwrap();
        let mut paths: Vec<_> = bundle.files.iter().map(|f| &f.path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), bundle.len());
    }

    #[test]
    fn generation_is_deterministic() {
        let pack = sample_pack();
        assert_eq!(generate_all(&pack).unwrap(), generate_all(&pack).unwrap());
    }
}

//! HERA Codegen - app packs to a scaffolded Next.js application
//!
//! This library reads an **app pack** (a JSON or TOML description of a HERA
//! app's entities, transactions, UI and deployment) and emits the source of
//! a Next.js app built on the HERA RPCs:
//!
//! - **Pages**: overview, entity list/create, transaction create
//!   (see [`pages`])
//! - **API routes**: entity and transaction handlers (see [`api`])
//! - **Lib and middleware**: smart-code registry, fetch client, GL balance
//!   checker, auth (see [`lib_files`], [`middleware`])
//! - **Seeds**: an executable seeder and its JSON plan (see [`seed`])
//! - **Tests**: vitest suites for smart codes, GL balance and actor stamps
//!   (see [`tests_gen`])
//!
//! # Usage
//!
//! ```rust
//! use hera_codegen::{generate_all, validate, AppPack, FileKind, Severity};
//!
//! let json = r#"{
//!   "app": { "id": "dealer-ops", "name": "Dealer Operations", "version": "1.0.0",
//!            "smart_code": "HERA.AUTO.DEALER.APP.CORE.v1" },
//!   "entities": [{
//!     "entity_type": "CUSTOMER",
//!     "entity_name": "Customer",
//!     "smart_code": "HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1",
//!     "fields": [
//!       { "name": "name", "type": "text", "required": true,
//!         "smart_code": "HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1" }
//!     ]
//!   }]
//! }"#;
//!
//! let pack = AppPack::from_json(json).unwrap();
//!
//! let errors = validate(&pack);
//! assert!(errors.iter().all(|e| e.severity != Severity::Error));
//!
//! let bundle = generate_all(&pack).unwrap();
//! assert_eq!(bundle.count(FileKind::Page), 3);
//! assert!(bundle
//!     .files
//!     .iter()
//!     .any(|f| f.path.ends_with("src/app/dealer-ops/customer/page.tsx")));
//! ```

pub mod api;
pub mod bundle;
pub mod context;
pub mod demo;
pub mod error;
pub mod ledger;
pub mod lib_files;
pub mod loader;
pub mod merge;
pub mod middleware;
pub mod naming;
pub mod pack;
pub mod pages;
pub mod seed;
pub mod smart_code;
pub mod source;
pub mod tests_gen;
pub mod validate;

#[cfg(test)]
mod fixtures;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use bundle::{generate_all, GeneratedBundle};
pub use context::GenerationContext;
pub use demo::demo_app_pack;
pub use error::{GenerateError, PackError};
pub use ledger::{check_balance, sample_lines, BalanceReport, BALANCE_TOLERANCE};
pub use loader::{load_app_pack, load_overlay};
pub use merge::{merge_config, AppPackOverlay};
pub use pack::{
    AppMeta, AppPack, DeploymentConfig, EntityDef, FieldDef, FieldType, LineDef, LineType,
    RelationshipDef, Side, TransactionDef, UiConfig,
};
pub use seed::{generate_executable_seeder, generate_seed_plan, SeedPlan};
pub use smart_code::{is_valid_smart_code, validate_smart_codes};
pub use source::{FileKind, GeneratedFile};
pub use validate::{is_valid, validate, Severity, ValidationError};

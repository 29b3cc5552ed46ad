//! Generation context
//!
//! Everything the generators derive from a pack (slugs, routes, import
//! paths, output paths) is computed once here and passed explicitly to each
//! generator.

use std::path::PathBuf;

use crate::naming::{to_kebab_case, to_pascal_case};
use crate::pack::{AppPack, EntityDef, TransactionDef};
use crate::source::comment_text;

/// Route and naming data for one entity.
#[derive(Debug, Clone)]
pub struct EntityRoute<'a> {
    pub def: &'a EntityDef,
    /// `customer`
    pub slug: String,
    /// `Customer`
    pub component: String,
    /// `/dealer-ops/customer`
    pub list_route: String,
}

impl EntityRoute<'_> {
    pub fn create_route(&self) -> String {
        format!("{}/new", self.list_route)
    }
}

/// Route and naming data for one transaction type.
#[derive(Debug, Clone)]
pub struct TransactionRoute<'a> {
    pub def: &'a TransactionDef,
    /// `vehicle-sale`
    pub slug: String,
    /// `VehicleSale`
    pub component: String,
    /// `/dealer-ops/transactions/vehicle-sale/new`
    pub create_route: String,
}

/// Derived, read-only view of a pack shared by every generator.
#[derive(Debug, Clone)]
pub struct GenerationContext<'a> {
    pub pack: &'a AppPack,
    /// `dealer-ops`
    pub app_slug: String,
    /// `DealerOps`
    pub app_component: String,
    /// Normalised API mount point without trailing slash, e.g. `/api/v2`.
    pub api_base: String,
    pub currency: String,
    pub entities: Vec<EntityRoute<'a>>,
    pub transactions: Vec<TransactionRoute<'a>>,
}

impl<'a> GenerationContext<'a> {
    pub fn new(pack: &'a AppPack) -> Self {
        let app_slug = to_kebab_case(&pack.app.id);

        let entities = pack
            .entities
            .iter()
            .map(|def| {
                let slug = to_kebab_case(&def.entity_type);
                EntityRoute {
                    def,
                    component: to_pascal_case(&def.entity_type),
                    list_route: format!("/{app_slug}/{slug}"),
                    slug,
                }
            })
            .collect();

        let transactions = pack
            .transactions
            .iter()
            .map(|def| {
                let slug = to_kebab_case(&def.transaction_type);
                TransactionRoute {
                    def,
                    component: to_pascal_case(&def.transaction_type),
                    create_route: format!("/{app_slug}/transactions/{slug}/new"),
                    slug,
                }
            })
            .collect();

        Self {
            pack,
            app_component: to_pascal_case(&pack.app.id),
            api_base: normalise_base(&pack.deployment.api_base_path),
            currency: pack.currency().to_string(),
            entities,
            transactions,
            app_slug,
        }
    }

    /// Display name of the app, falling back to its id.
    pub fn app_name(&self) -> &str {
        if self.pack.app.name.is_empty() {
            &self.pack.app.id
        } else {
            &self.pack.app.name
        }
    }

    /// Note written into generated file headers.
    pub fn source_note(&self) -> String {
        let version = if self.pack.app.version.is_empty() {
            "unversioned"
        } else {
            &self.pack.app.version
        };
        comment_text(&format!("{} app pack ({version})", self.pack.app.id))
    }

    /// Browser-facing API prefix for this app, e.g. `/api/v2/dealer-ops`.
    pub fn api_prefix(&self) -> String {
        format!("{}/{}", self.api_base, self.app_slug)
    }

    /// Overview route, e.g. `/dealer-ops`.
    pub fn overview_route(&self) -> String {
        format!("/{}", self.app_slug)
    }

    // ── Output paths ─────────────────────────────────────────────────────────

    fn app_dir(&self) -> PathBuf {
        PathBuf::from("src/app").join(&self.app_slug)
    }

    pub fn overview_page_path(&self) -> PathBuf {
        self.app_dir().join("page.tsx")
    }

    pub fn entity_list_page_path(&self, route: &EntityRoute<'_>) -> PathBuf {
        self.app_dir().join(&route.slug).join("page.tsx")
    }

    pub fn entity_create_page_path(&self, route: &EntityRoute<'_>) -> PathBuf {
        self.app_dir().join(&route.slug).join("new/page.tsx")
    }

    pub fn transaction_create_page_path(&self, route: &TransactionRoute<'_>) -> PathBuf {
        self.app_dir()
            .join("transactions")
            .join(&route.slug)
            .join("new/page.tsx")
    }

    /// Route handler path for `resource` (`entities` / `transactions`).
    pub fn api_route_path(&self, resource: &str) -> PathBuf {
        PathBuf::from("src/app")
            .join(self.api_base.trim_start_matches('/'))
            .join(&self.app_slug)
            .join(resource)
            .join("route.ts")
    }

    pub fn lib_path(&self, file: &str) -> PathBuf {
        PathBuf::from("src/lib").join(&self.app_slug).join(file)
    }

    pub fn middleware_path(&self) -> PathBuf {
        PathBuf::from("src/middleware")
            .join(&self.app_slug)
            .join("auth.ts")
    }

    pub fn seed_path(&self, file: &str) -> PathBuf {
        PathBuf::from("seeds").join(&self.app_slug).join(file)
    }

    pub fn test_path(&self, file: &str) -> PathBuf {
        PathBuf::from("tests").join(&self.app_slug).join(file)
    }

    // ── Import specifiers ────────────────────────────────────────────────────

    /// `@/lib/dealer-ops/<module>`
    pub fn lib_import(&self, module: &str) -> String {
        format!("@/lib/{}/{module}", self.app_slug)
    }

    /// `@/middleware/dealer-ops/auth`
    pub fn middleware_import(&self) -> String {
        format!("@/middleware/{}/auth", self.app_slug)
    }
}

fn normalise_base(base: &str) -> String {
    let trimmed = base.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    #[test]
    fn derives_slugs_and_routes() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        assert_eq!(ctx.app_slug, "dealer-ops");
        assert_eq!(ctx.app_component, "DealerOps");
        assert_eq!(ctx.entities[0].slug, "customer");
        assert_eq!(ctx.entities[0].list_route, "/dealer-ops/customer");
        assert_eq!(ctx.entities[0].create_route(), "/dealer-ops/customer/new");
        assert_eq!(ctx.transactions[0].component, "VehicleSale");
        assert_eq!(
            ctx.transactions[0].create_route,
            "/dealer-ops/transactions/vehicle-sale/new"
        );
    }

    #[test]
    fn output_paths() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        assert_eq!(
            ctx.entity_create_page_path(&ctx.entities[0]),
            PathBuf::from("src/app/dealer-ops/customer/new/page.tsx")
        );
        assert_eq!(
            ctx.api_route_path("entities"),
            PathBuf::from("src/app/api/v2/dealer-ops/entities/route.ts")
        );
        assert_eq!(ctx.api_prefix(), "/api/v2/dealer-ops");
    }

    #[test]
    fn api_base_is_normalised() {
        assert_eq!(normalise_base("/api/v3/"), "/api/v3");
        assert_eq!(normalise_base("api"), "/api");
        assert_eq!(normalise_base("/"), "");
    }

    #[test]
    fn source_note_includes_version() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        assert_eq!(ctx.source_note(), "dealer-ops app pack (1.0.0)");
    }

    #[test]
    fn source_note_stays_on_one_line() {
        let mut pack = sample_pack();
        pack.app.id = "dealer\nimport evil from 'x'".to_string();
        pack.app.version = "1.0\u{2028}0".to_string();
        let ctx = GenerationContext::new(&pack);
        let note = ctx.source_note();
        assert!(!note.contains(['\n', '\r', '\u{2028}', '\u{2029}']), "{note:?}");

        let header = crate::source::SourceBuilder::with_header(&note).finish();
        assert_eq!(header.lines().filter(|l| l.starts_with("import")).count(), 0, "{header}");
    }
}

//! Page generators
//!
//! Each generator is a pure function of a definition and the
//! [`GenerationContext`](crate::context::GenerationContext) that returns the
//! full source of one Next.js page. Nothing is validated here; callers run
//! the validators first.

mod entity_create;
mod entity_list;
mod overview;
mod transaction_create;

pub use entity_create::generate_entity_create_page;
pub use entity_list::generate_entity_list_page;
pub use overview::generate_overview_page;
pub use transaction_create::generate_transaction_create_page;

use crate::context::GenerationContext;
use crate::naming::to_title_case;
use crate::pack::FieldDef;
use crate::source::GeneratedFile;

/// Every page for the pack: overview, then list + create per entity, then
/// one create page per transaction type.
pub fn generate_pages(ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
    let mut pages = vec![generate_overview_page(ctx)];
    for route in &ctx.entities {
        pages.push(generate_entity_list_page(route, ctx));
        pages.push(generate_entity_create_page(route, ctx));
    }
    for route in &ctx.transactions {
        pages.push(generate_transaction_create_page(route, ctx));
    }
    pages
}

/// Display label for a field.
pub(crate) fn field_label(field: &FieldDef) -> String {
    field
        .label
        .clone()
        .unwrap_or_else(|| to_title_case(&field.name))
}

// ── Icons ────────────────────────────────────────────────────────────────────

/// `lucide-react` icons the generated pages may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IconKind {
    Box,
    Briefcase,
    Building,
    Calendar,
    Car,
    Dollar,
    Document,
    Package,
    Receipt,
    Truck,
    Users,
    Wrench,
    Dashboard,
}

impl IconKind {
    /// Map a free-form pack icon name to a known icon; unknown names fall
    /// back to [`IconKind::Box`].
    pub fn from_name(name: Option<&str>) -> Self {
        let Some(name) = name else {
            return IconKind::Box;
        };
        match name.trim().to_ascii_lowercase().as_str() {
            "users" | "user" | "customer" | "customers" | "people" => IconKind::Users,
            "car" | "vehicle" | "auto" => IconKind::Car,
            "package" | "product" | "inventory" => IconKind::Package,
            "wrench" | "service" | "tool" | "tools" => IconKind::Wrench,
            "building" | "building2" | "company" | "organization" | "store" => IconKind::Building,
            "calendar" | "appointment" | "schedule" => IconKind::Calendar,
            "file" | "file-text" | "document" => IconKind::Document,
            "dollar" | "dollar-sign" | "money" | "payment" => IconKind::Dollar,
            "briefcase" | "deal" => IconKind::Briefcase,
            "truck" | "delivery" | "shipping" => IconKind::Truck,
            "receipt" | "invoice" => IconKind::Receipt,
            "dashboard" | "home" => IconKind::Dashboard,
            _ => IconKind::Box,
        }
    }

    /// Exported component name in `lucide-react`.
    pub fn component(self) -> &'static str {
        match self {
            IconKind::Box => "Box",
            IconKind::Briefcase => "Briefcase",
            IconKind::Building => "Building2",
            IconKind::Calendar => "Calendar",
            IconKind::Car => "Car",
            IconKind::Dollar => "DollarSign",
            IconKind::Document => "FileText",
            IconKind::Package => "Package",
            IconKind::Receipt => "Receipt",
            IconKind::Truck => "Truck",
            IconKind::Users => "Users",
            IconKind::Wrench => "Wrench",
            IconKind::Dashboard => "LayoutDashboard",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    #[test]
    fn icon_lookup_is_case_insensitive() {
        assert_eq!(IconKind::from_name(Some("Users")), IconKind::Users);
        assert_eq!(IconKind::from_name(Some(" CAR ")), IconKind::Car);
        assert_eq!(IconKind::from_name(Some("sparkles")), IconKind::Box);
        assert_eq!(IconKind::from_name(None), IconKind::Box);
    }

    #[test]
    fn icon_components() {
        assert_eq!(IconKind::Building.component(), "Building2");
        assert_eq!(IconKind::Dashboard.component(), "LayoutDashboard");
    }

    #[test]
    fn one_overview_two_pages_per_entity_one_per_transaction() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let pages = generate_pages(&ctx);
        assert_eq!(pages.len(), 1 + 2 + 1);
        let paths: Vec<_> = pages.iter().map(|p| p.path.to_string_lossy().into_owned()).collect();
        assert_eq!(
            paths,
            vec![
                "src/app/dealer-ops/page.tsx",
                "src/app/dealer-ops/customer/page.tsx",
                "src/app/dealer-ops/customer/new/page.tsx",
                "src/app/dealer-ops/transactions/vehicle-sale/new/page.tsx",
            ]
        );
    }

    #[test]
    fn field_label_prefers_explicit_label() {
        let mut field = sample_pack().entities[0].fields[1].clone();
        assert_eq!(field_label(&field), "Credit Limit");
        field.label = Some("Credit line".to_string());
        assert_eq!(field_label(&field), "Credit line");
    }
}

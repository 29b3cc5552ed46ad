//! Overview page: navigation tiles for every entity and transaction type,
//! plus the dashboard widgets and navigation links from the pack's `ui`.

use std::collections::BTreeSet;

use crate::context::GenerationContext;
use crate::lib_files::{CLIENT_MODULE, SMART_CODES_MODULE};
use crate::pack::WidgetKind;
use crate::pages::IconKind;
use crate::source::{js_string, jsx_text, FileKind, GeneratedFile, SourceBuilder};

pub fn generate_overview_page(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let pack = ctx.pack;

    let entity_icons: Vec<&str> = ctx
        .entities
        .iter()
        .map(|r| IconKind::from_name(r.def.icon.as_deref()).component())
        .collect();
    let nav_icons: Vec<&str> = pack
        .ui
        .navigation
        .iter()
        .map(|n| IconKind::from_name(n.icon.as_deref()).component())
        .collect();
    let transaction_icon = IconKind::Receipt.component();

    let mut icons: BTreeSet<&str> = BTreeSet::new();
    icons.insert(IconKind::Dashboard.component());
    icons.insert("ArrowRight");
    icons.extend(entity_icons.iter().copied());
    icons.extend(nav_icons.iter().copied());
    if !ctx.transactions.is_empty() {
        icons.insert(transaction_icon);
    }
    let icons: Vec<&str> = icons.into_iter().collect();

    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.line("'use client'");
    b.blank();
    b.import(&["useEffect", "useState", "type ComponentType"], "react");
    b.line("import Link from 'next/link'");
    b.import(&icons, "lucide-react");
    b.import(&["heraFetch", "type HeraEntity"], &ctx.lib_import(CLIENT_MODULE));
    b.import(&["APP_SMART_CODE"], &ctx.lib_import(SMART_CODES_MODULE));
    b.blank();

    b.line("type Icon = ComponentType<{ className?: string }>");
    b.blank();
    b.block("interface Tile {", "}", |b| {
        b.lines(["title: string", "description: string", "href: string", "icon: Icon"]);
    });
    b.blank();

    b.block("const ENTITY_TILES: Tile[] = [", "]", |b| {
        for (route, icon) in ctx.entities.iter().zip(&entity_icons) {
            b.line(format!(
                "{{ title: {}, description: {}, href: {}, icon: {icon} }},",
                js_string(&route.def.entity_name),
                js_string(&route.def.description),
                js_string(&route.list_route),
            ));
        }
    });
    b.blank();
    b.block("const TRANSACTION_TILES: Tile[] = [", "]", |b| {
        for route in &ctx.transactions {
            b.line(format!(
                "{{ title: {}, description: {}, href: {}, icon: {transaction_icon} }},",
                js_string(&route.def.transaction_name),
                js_string(&route.def.description),
                js_string(&route.create_route),
            ));
        }
    });
    b.blank();
    b.block(
        "const NAVIGATION: ReadonlyArray<{ label: string; href: string; icon: Icon }> = [",
        "]",
        |b| {
            for (item, icon) in pack.ui.navigation.iter().zip(&nav_icons) {
                b.line(format!(
                    "{{ label: {}, href: {}, icon: {icon} }},",
                    js_string(&item.label),
                    js_string(&item.path),
                ));
            }
        },
    );
    b.blank();
    b.block(
        "const WIDGETS: ReadonlyArray<{ title: string; kind: 'COUNT' | 'TOTAL'; source: string }> = [",
        "]",
        |b| {
            for widget in &pack.ui.dashboard.widgets {
                let kind = match widget.kind {
                    WidgetKind::Count => "COUNT",
                    WidgetKind::Total => "TOTAL",
                };
                b.line(format!(
                    "{{ title: {}, kind: '{kind}', source: {} }},",
                    js_string(&widget.title),
                    js_string(&widget.source),
                ));
            }
        },
    );
    b.blank();

    b.block(
        "async function loadWidget(kind: 'COUNT' | 'TOTAL', source: string): Promise<number> {",
        "}",
        |b| {
            b.block("if (kind === 'COUNT') {", "}", |b| {
                b.line("const data = await heraFetch<{ items: HeraEntity[] }>(`entities?entity_type=${encodeURIComponent(source)}`)");
                b.line("return data.items.length");
            });
            b.line("const data = await heraFetch<{ items: Array<{ total_amount: number | null }> }>(`transactions?transaction_type=${encodeURIComponent(source)}`)");
            b.line("return data.items.reduce((sum, t) => sum + (Number(t.total_amount) || 0), 0)");
        },
    );
    b.blank();

    b.block("function TileGrid({ tiles }: { tiles: Tile[] }) {", "}", |b| {
        b.block("return (", ")", |b| {
            b.block(r#"<div className="grid gap-4 sm:grid-cols-2 lg:grid-cols-3">"#, "</div>", |b| {
                b.block("{tiles.map((tile) => (", "))}", |b| {
                    b.block(
                        r#"<Link key={tile.href} href={tile.href} className="group flex items-start gap-3 rounded-lg border p-4 hover:bg-muted">"#,
                        "</Link>",
                        |b| {
                            b.line(r#"<tile.icon className="h-6 w-6 shrink-0" />"#);
                            b.block(r#"<div className="flex-1">"#, "</div>", |b| {
                                b.line(r#"<div className="font-medium">{tile.title}</div>"#);
                                b.line(r#"{tile.description && <p className="text-sm text-muted-foreground">{tile.description}</p>}"#);
                            });
                            b.line(r#"<ArrowRight className="h-4 w-4 opacity-0 group-hover:opacity-100" />"#);
                        },
                    );
                });
            });
        });
    });
    b.blank();

    b.block(
        format!("export default function {}OverviewPage() {{", ctx.app_component),
        "}",
        |b| {
            b.line("const [stats, setStats] = useState<Record<string, number | null>>({})");
            b.blank();
            b.block("useEffect(() => {", "}, [])", |b| {
                b.block("for (const widget of WIDGETS) {", "}", |b| {
                    b.line("loadWidget(widget.kind, widget.source)");
                    b.indented(|b| {
                        b.line(".then((value) => setStats((prev) => ({ ...prev, [widget.title]: value })))");
                        b.line(".catch(() => setStats((prev) => ({ ...prev, [widget.title]: null })))");
                    });
                });
            });
            b.blank();
            b.block("return (", ")", |b| {
                b.block(r#"<div className="space-y-8 p-6">"#, "</div>", |b| {
                    b.block(r#"<div className="flex items-center gap-3">"#, "</div>", |b| {
                        b.line(r#"<LayoutDashboard className="h-7 w-7" />"#);
                        b.block("<div>", "</div>", |b| {
                            b.line(format!(
                                r#"<h1 className="text-2xl font-semibold">{}</h1>"#,
                                jsx_text(ctx.app_name())
                            ));
                            if !pack.app.description.is_empty() {
                                b.line(format!(
                                    r#"<p className="text-sm text-muted-foreground">{}</p>"#,
                                    jsx_text(&pack.app.description)
                                ));
                            }
                            b.line(r#"<code className="text-xs text-muted-foreground">{APP_SMART_CODE}</code>"#);
                        });
                    });

                    b.block("{NAVIGATION.length > 0 && (", ")}", |b| {
                        b.block(r#"<nav className="flex flex-wrap gap-2">"#, "</nav>", |b| {
                            b.block("{NAVIGATION.map((item) => (", "))}", |b| {
                                b.block(
                                    r#"<Link key={item.href} href={item.href} className="inline-flex items-center gap-2 rounded-md border px-3 py-1.5 text-sm">"#,
                                    "</Link>",
                                    |b| {
                                        b.line(r#"<item.icon className="h-4 w-4" /> {item.label}"#);
                                    },
                                );
                            });
                        });
                    });

                    b.block("{WIDGETS.length > 0 && (", ")}", |b| {
                        b.block(r#"<div className="grid gap-4 sm:grid-cols-2 lg:grid-cols-4">"#, "</div>", |b| {
                            b.block("{WIDGETS.map((widget) => (", "))}", |b| {
                                b.block(r#"<div key={widget.title} className="rounded-lg border p-4">"#, "</div>", |b| {
                                    b.line(r#"<div className="text-sm text-muted-foreground">{widget.title}</div>"#);
                                    b.block(r#"<div className="text-2xl font-semibold tabular-nums">"#, "</div>", |b| {
                                        b.line("{stats[widget.title] === undefined ? '…' : stats[widget.title] === null ? '—' : stats[widget.title]?.toLocaleString()}");
                                    });
                                });
                            });
                        });
                    });

                    b.block("<section className=\"space-y-3\">", "</section>", |b| {
                        b.line(r#"<h2 className="text-lg font-medium">Records</h2>"#);
                        b.line("<TileGrid tiles={ENTITY_TILES} />");
                    });
                    b.block("{TRANSACTION_TILES.length > 0 && (", ")}", |b| {
                        b.block("<section className=\"space-y-3\">", "</section>", |b| {
                            b.line(r#"<h2 className="text-lg font-medium">Transactions</h2>"#);
                            b.line("<TileGrid tiles={TRANSACTION_TILES} />");
                        });
                    });
                });
            });
        },
    );

    GeneratedFile::new(ctx.overview_page_path(), FileKind::Page, b.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;
    use crate::pack::{NavItem, WidgetDef};

    #[test]
    fn tiles_for_every_entity_and_transaction() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_overview_page(&ctx).contents;
        assert!(out.contains("{ title: 'Customer', description: '', href: '/dealer-ops/customer', icon: Users },"));
        assert!(out.contains(
            "{ title: 'Vehicle Sale', description: '', href: '/dealer-ops/transactions/vehicle-sale/new', icon: Receipt },"
        ));
        assert!(out.contains("export default function DealerOpsOverviewPage()"));
    }

    #[test]
    fn icon_import_is_sorted_and_deduplicated() {
        let mut pack = sample_pack();
        let mut second = pack.entities[0].clone();
        second.entity_type = "CONTACT".to_string();
        pack.entities.push(second);
        let ctx = GenerationContext::new(&pack);
        let out = generate_overview_page(&ctx).contents;
        assert!(out.contains(
            "import { ArrowRight, LayoutDashboard, Receipt, Users } from 'lucide-react'"
        ));
    }

    #[test]
    fn emits_widgets_and_navigation() {
        let mut pack = sample_pack();
        pack.ui.dashboard.widgets.push(WidgetDef {
            title: "Customers".to_string(),
            kind: WidgetKind::Count,
            source: "CUSTOMER".to_string(),
        });
        pack.ui.dashboard.widgets.push(WidgetDef {
            title: "Sales".to_string(),
            kind: WidgetKind::Total,
            source: "VEHICLE_SALE".to_string(),
        });
        pack.ui.navigation.push(NavItem {
            label: "Inventory".to_string(),
            path: "/dealer-ops/vehicle".to_string(),
            icon: Some("car".to_string()),
        });
        let ctx = GenerationContext::new(&pack);
        let out = generate_overview_page(&ctx).contents;
        assert!(out.contains("{ title: 'Customers', kind: 'COUNT', source: 'CUSTOMER' },"));
        assert!(out.contains("{ title: 'Sales', kind: 'TOTAL', source: 'VEHICLE_SALE' },"));
        assert!(out.contains("{ label: 'Inventory', href: '/dealer-ops/vehicle', icon: Car },"));
        assert!(out.contains("Car, LayoutDashboard"));
    }

    #[test]
    fn shows_app_smart_code() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_overview_page(&ctx).contents;
        assert!(out.contains("import { APP_SMART_CODE } from '@/lib/dealer-ops/smart-codes'"));
        assert!(out.contains("<h1 className=\"text-2xl font-semibold\">Dealer Operations</h1>"));
    }
}

//! Entity list page: searchable table with edit and delete actions.

use crate::context::{EntityRoute, GenerationContext};
use crate::lib_files::CLIENT_MODULE;
use crate::pages::{field_label, IconKind};
use crate::source::{js_string, jsx_text, FileKind, GeneratedFile, SourceBuilder};

pub fn generate_entity_list_page(
    route: &EntityRoute<'_>,
    ctx: &GenerationContext<'_>,
) -> GeneratedFile {
    let entity = route.def;
    let icon = IconKind::from_name(entity.icon.as_deref()).component();
    let name = jsx_text(&entity.entity_name);

    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.line("'use client'");
    b.blank();
    b.import(&["useCallback", "useEffect", "useMemo", "useState"], "react");
    b.line("import Link from 'next/link'");
    let mut icons = vec!["Pencil", "Plus", "Search", "Trash2", icon];
    icons.sort_unstable();
    icons.dedup();
    b.import(&icons, "lucide-react");
    b.import(&["heraFetch", "type HeraEntity"], &ctx.lib_import(CLIENT_MODULE));
    b.blank();

    b.line(format!(
        "const ENTITY_TYPE = {}",
        js_string(&entity.entity_type)
    ));
    b.line(format!("const LIST_ROUTE = {}", js_string(&route.list_route)));
    b.blank();
    b.line("type ColumnType = 'text' | 'number' | 'boolean'");
    b.blank();
    b.block(
        "const COLUMNS: ReadonlyArray<{ key: string; label: string; type: ColumnType }> = [",
        "]",
        |b| {
            for field in &entity.fields {
                b.line(format!(
                    "{{ key: {}, label: {}, type: {} }},",
                    js_string(&field.name),
                    js_string(&field_label(field)),
                    js_string(field.field_type.as_str())
                ));
            }
        },
    );
    b.blank();

    b.block(
        "function formatValue(value: unknown, type: ColumnType): string {",
        "}",
        |b| {
            b.line("if (value === null || value === undefined || value === '') return '—'");
            b.block("switch (type) {", "}", |b| {
                b.line("case 'number':");
                b.line("  return Number(value).toLocaleString()");
                b.line("case 'boolean':");
                b.line("  return value ? 'Yes' : 'No'");
                b.line("default:");
                b.line("  return String(value)");
            });
        },
    );
    b.blank();

    b.block(
        format!("export default function {}ListPage() {{", route.component),
        "}",
        |b| {
            b.line("const [rows, setRows] = useState<HeraEntity[]>([])");
            b.line("const [search, setSearch] = useState('')");
            b.line("const [loading, setLoading] = useState(true)");
            b.line("const [error, setError] = useState<string | null>(null)");
            b.blank();
            b.block("const load = useCallback(async () => {", "}, [])", |b| {
                b.line("setLoading(true)");
                b.block("try {", "}", |b| {
                    b.line("const data = await heraFetch<{ items: HeraEntity[] }>(`entities?entity_type=${ENTITY_TYPE}`)");
                    b.line("setRows(data.items)");
                    b.line("setError(null)");
                });
                b.block("catch (err) {", "}", |b| {
                    b.line("setError(err instanceof Error ? err.message : String(err))");
                });
                b.block("finally {", "}", |b| {
                    b.line("setLoading(false)");
                });
            });
            b.blank();
            b.block("useEffect(() => {", "}, [load])", |b| {
                b.line("void load()");
            });
            b.blank();
            b.block("const filtered = useMemo(() => {", "}, [rows, search])", |b| {
                b.line("const term = search.trim().toLowerCase()");
                b.line("if (!term) return rows");
                b.block("return rows.filter((row) =>", ")", |b| {
                    b.line("[row.entity_name, ...COLUMNS.map((c) => row.dynamic_fields?.[c.key])].some(");
                    b.line("  (v) => v !== null && v !== undefined && String(v).toLowerCase().includes(term),");
                    b.line("),");
                });
            });
            b.blank();
            b.block("async function handleDelete(row: HeraEntity) {", "}", |b| {
                b.line("if (!window.confirm(`Delete ${row.entity_name}?`)) return");
                b.block("try {", "}", |b| {
                    b.line("await heraFetch(`entities?id=${encodeURIComponent(row.id)}`, { method: 'DELETE' })");
                    b.line("await load()");
                });
                b.block("catch (err) {", "}", |b| {
                    b.line("setError(err instanceof Error ? err.message : String(err))");
                });
            });
            b.blank();
            b.block("return (", ")", |b| {
                b.block(r#"<div className="space-y-6 p-6">"#, "</div>", |b| {
                    emit_header(b, route, icon, &name);
                    b.block(r#"<div className="relative max-w-sm">"#, "</div>", |b| {
                        b.line(r#"<Search className="absolute left-3 top-2.5 h-4 w-4 text-muted-foreground" />"#);
                        b.line("<input");
                        b.indented(|b| {
                            b.line(r#"type="search""#);
                            b.line("value={search}");
                            b.line("onChange={(e) => setSearch(e.target.value)}");
                            let placeholder = format!("Search {}...", entity.entity_name);
                            b.line(format!("placeholder={{{}}}", js_string(&placeholder)));
                            b.line(r#"className="w-full rounded-md border py-2 pl-9 pr-3 text-sm""#);
                        });
                        b.line("/>");
                    });
                    b.line(r#"{error && <div role="alert" className="rounded-md border border-red-300 bg-red-50 p-3 text-sm text-red-700">{error}</div>}"#);
                    emit_table(b, &name);
                });
            });
        },
    );

    GeneratedFile::new(ctx.entity_list_page_path(route), FileKind::Page, b.finish())
}

fn emit_header(b: &mut SourceBuilder, route: &EntityRoute<'_>, icon: &str, name: &str) {
    let entity = route.def;
    b.block(r#"<div className="flex items-center justify-between">"#, "</div>", |b| {
        b.block(r#"<div className="flex items-center gap-3">"#, "</div>", |b| {
            b.line(format!(r#"<{icon} className="h-6 w-6" />"#));
            b.block("<div>", "</div>", |b| {
                b.line(format!(r#"<h1 className="text-2xl font-semibold">{name}</h1>"#));
                if !entity.description.is_empty() {
                    b.line(format!(
                        r#"<p className="text-sm text-muted-foreground">{}</p>"#,
                        jsx_text(&entity.description)
                    ));
                }
            });
        });
        b.block(
            r#"<Link href={`${LIST_ROUTE}/new`} className="inline-flex items-center gap-2 rounded-md bg-primary px-4 py-2 text-sm text-primary-foreground">"#,
            "</Link>",
            |b| {
                b.line(format!(r#"<Plus className="h-4 w-4" /> New {name}"#));
            },
        );
    });
}

fn emit_table(b: &mut SourceBuilder, name: &str) {
    b.block(r#"<table className="w-full border-collapse text-sm">"#, "</table>", |b| {
        b.block("<thead>", "</thead>", |b| {
            b.block(r#"<tr className="border-b text-left">"#, "</tr>", |b| {
                b.line(r#"<th className="py-2 pr-4">Name</th>"#);
                b.line(r#"{COLUMNS.map((c) => <th key={c.key} className="py-2 pr-4">{c.label}</th>)}"#);
                b.line(r#"<th className="py-2 text-right">Actions</th>"#);
            });
        });
        b.block("<tbody>", "</tbody>", |b| {
            b.line("{loading ? (");
            b.indented(|b| {
                b.line(r#"<tr><td colSpan={COLUMNS.length + 2} className="py-6 text-center">Loading…</td></tr>"#);
            });
            b.line(") : filtered.length === 0 ? (");
            b.indented(|b| {
                b.line(format!(
                    r#"<tr><td colSpan={{COLUMNS.length + 2}} className="py-6 text-center text-muted-foreground">No {name} records found</td></tr>"#
                ));
            });
            b.line(") : (");
            b.indented(|b| {
                b.block("filtered.map((row) => (", "))", |b| {
                    b.block(r#"<tr key={row.id} className="border-b">"#, "</tr>", |b| {
                        b.line(r#"<td className="py-2 pr-4 font-medium">{row.entity_name}</td>"#);
                        b.block("{COLUMNS.map((c) => (", "))}", |b| {
                            b.line(r#"<td key={c.key} className="py-2 pr-4">{formatValue(row.dynamic_fields?.[c.key], c.type)}</td>"#);
                        });
                        b.block(r#"<td className="py-2 text-right">"#, "</td>", |b| {
                            b.block(
                                r#"<Link href={`${LIST_ROUTE}/new?id=${encodeURIComponent(row.id)}`} aria-label="Edit" className="mr-2 inline-flex">"#,
                                "</Link>",
                                |b| {
                                    b.line(r#"<Pencil className="h-4 w-4" />"#);
                                },
                            );
                            b.block(
                                r#"<button type="button" aria-label="Delete" onClick={() => void handleDelete(row)} className="inline-flex text-red-600">"#,
                                "</button>",
                                |b| {
                                    b.line(r#"<Trash2 className="h-4 w-4" />"#);
                                },
                            );
                        });
                    });
                });
            });
            b.line(")}");
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    fn page() -> GeneratedFile {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        generate_entity_list_page(&ctx.entities[0], &ctx)
    }

    #[test]
    fn is_a_client_page() {
        let file = page();
        assert_eq!(file.kind, FileKind::Page);
        assert!(file.contents.contains("'use client'"));
        assert!(file.contents.contains("export default function CustomerListPage()"));
    }

    #[test]
    fn fetches_entities_by_type() {
        let out = page().contents;
        assert!(out.contains("const ENTITY_TYPE = 'CUSTOMER'"));
        assert!(out.contains("`entities?entity_type=${ENTITY_TYPE}`"));
    }

    #[test]
    fn has_a_column_per_field() {
        let out = page().contents;
        assert!(out.contains("{ key: 'name', label: 'Name', type: 'text' },"));
        assert!(out.contains("{ key: 'credit_limit', label: 'Credit Limit', type: 'number' },"));
    }

    #[test]
    fn has_search_edit_and_delete() {
        let out = page().contents;
        assert!(out.contains("placeholder={'Search Customer...'}"));
        assert!(out.contains("aria-label=\"Edit\""));
        assert!(out.contains("method: 'DELETE'"));
    }

    #[test]
    fn imports_entity_icon() {
        let out = page().contents;
        assert!(out.contains("import { Pencil, Plus, Search, Trash2, Users } from 'lucide-react'"));
        assert!(out.contains("from '@/lib/dealer-ops/hera-client'"));
    }
}

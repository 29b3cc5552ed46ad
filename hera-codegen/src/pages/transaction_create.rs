//! Transaction create page: a line editor seeded from the template's
//! `lines[]`, with running DR/CR totals and a balance check before submit.

use crate::context::{GenerationContext, TransactionRoute};
use crate::lib_files::{CLIENT_MODULE, GL_BALANCE_MODULE, SMART_CODES_MODULE};
use crate::naming::to_kebab_case;
use crate::pack::{LineDef, TransactionDef};
use crate::source::{js_string, jsx_text, FileKind, GeneratedFile, SourceBuilder};

/// Stable template key of a line, e.g. `2-cash`.
pub(crate) fn line_template_key(idx: usize, line: &LineDef) -> String {
    format!("{}-{}", idx + 1, to_kebab_case(&line.name))
}

pub fn generate_transaction_create_page(
    route: &TransactionRoute<'_>,
    ctx: &GenerationContext<'_>,
) -> GeneratedFile {
    let txn = route.def;
    let name = jsx_text(&txn.transaction_name);

    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.line("'use client'");
    b.blank();
    b.import(&["useMemo", "useState", "type FormEvent"], "react");
    b.line("import Link from 'next/link'");
    b.import(&["useRouter"], "next/navigation");
    b.import(&["ArrowLeft", "Plus", "Save", "Trash2"], "lucide-react");
    b.import(
        &["heraFetch", "type TransactionLineInput"],
        &ctx.lib_import(CLIENT_MODULE),
    );
    b.import(&["TRANSACTION_SMART_CODES"], &ctx.lib_import(SMART_CODES_MODULE));
    b.import(
        &["BALANCE_TOLERANCE", "checkGlBalance"],
        &ctx.lib_import(GL_BALANCE_MODULE),
    );
    b.blank();

    b.line(format!(
        "const TRANSACTION_TYPE = {}",
        js_string(&txn.transaction_type)
    ));
    b.line("const SMART_CODES = TRANSACTION_SMART_CODES[TRANSACTION_TYPE]");
    b.line(format!("const DEFAULT_CURRENCY = {}", js_string(&ctx.currency)));
    b.line(format!(
        "const OVERVIEW_ROUTE = {}",
        js_string(&ctx.overview_route())
    ));
    b.blank();

    emit_line_templates(&mut b, txn);
    b.blank();
    emit_drafts(&mut b);
    b.blank();

    b.block(
        format!("export default function {}CreatePage() {{", route.component),
        "}",
        |b| {
            b.line("const router = useRouter()");
            b.line("const [transactionDate, setTransactionDate] = useState(() => new Date().toISOString().slice(0, 10))");
            b.line("const [reference, setReference] = useState('')");
            b.line("const [currency, setCurrency] = useState(DEFAULT_CURRENCY)");
            b.line("const [drafts, setDrafts] = useState<LineDraft[]>(initialDrafts)");
            b.line("const [saving, setSaving] = useState(false)");
            b.line("const [error, setError] = useState<string | null>(null)");
            b.blank();
            b.line("const lines = useMemo(() => toLineInputs(drafts, currency), [drafts, currency])");
            b.line("const balance = useMemo(() => checkGlBalance(lines), [lines])");
            b.line("const shown = balance.currencies[currency] ?? { debit: 0, credit: 0, difference: 0, balanced: true }");
            b.line("const total = lines.filter((l) => l.line_type !== 'GL').reduce((sum, l) => sum + l.line_amount, 0)");
            b.blank();
            b.block(
                "function updateDraft(id: number, patch: Partial<LineDraft>) {",
                "}",
                |b| {
                    b.line("setDrafts((prev) => prev.map((d) => (d.id === id ? { ...d, ...patch } : d)))");
                },
            );
            b.blank();
            b.block("function addLine() {", "}", |b| {
                b.line("setDrafts((prev) => [...prev, newDraft(nextDraftId(prev), LINE_TEMPLATES[0].key)])");
            });
            b.blank();
            b.block("function removeLine(id: number) {", "}", |b| {
                b.line("setDrafts((prev) => prev.filter((d) => d.id !== id))");
            });
            b.blank();
            b.block(
                "async function handleSubmit(event: FormEvent<HTMLFormElement>) {",
                "}",
                |b| {
                    b.line("event.preventDefault()");
                    b.line("const missing = missingRequiredLines(drafts)");
                    b.block("if (missing.length > 0) {", "}", |b| {
                        b.line("setError(`Required lines missing an amount: ${missing.join(', ')}`)");
                        b.line("return");
                    });
                    b.block("if (!balance.balanced) {", "}", |b| {
                        b.line("setError(`Debits and credits must balance within ${BALANCE_TOLERANCE} (difference ${shown.difference.toFixed(2)} ${currency})`)");
                        b.line("return");
                    });
                    b.line("setSaving(true)");
                    b.line("setError(null)");
                    b.block("try {", "}", |b| {
                        b.block("await heraFetch('transactions', {", "})", |b| {
                            b.line("method: 'POST',");
                            b.block("body: JSON.stringify({", "}),", |b| {
                                b.lines([
                                    "transaction_type: TRANSACTION_TYPE,",
                                    "smart_code: SMART_CODES.transaction,",
                                    "transaction_date: transactionDate,",
                                    "transaction_code: reference.trim() || undefined,",
                                    "currency,",
                                    "total_amount: total,",
                                    "lines,",
                                ]);
                            });
                        });
                        b.line("router.push(OVERVIEW_ROUTE)");
                    });
                    b.block("catch (err) {", "}", |b| {
                        b.line("setError(err instanceof Error ? err.message : String(err))");
                    });
                    b.block("finally {", "}", |b| {
                        b.line("setSaving(false)");
                    });
                },
            );
            b.blank();
            b.block("return (", ")", |b| {
                b.block(
                    r#"<form onSubmit={handleSubmit} className="max-w-5xl space-y-6 p-6">"#,
                    "</form>",
                    |b| {
                        emit_heading(b, txn, &name);
                        emit_header_fields(b);
                        emit_line_table(b);
                        emit_totals(b, txn.has_gl_lines());
                        b.line(r#"{error && <p role="alert" className="text-sm text-red-600">{error}</p>}"#);
                        b.block(
                            r#"<button type="submit" disabled={saving} className="inline-flex items-center gap-2 rounded-md bg-primary px-4 py-2 text-sm text-primary-foreground disabled:opacity-50">"#,
                            "</button>",
                            |b| {
                                b.line(format!(
                                    r#"<Save className="h-4 w-4" /> {{saving ? 'Posting…' : {}}}"#,
                                    js_string(&format!("Post {}", txn.transaction_name))
                                ));
                            },
                        );
                    },
                );
            });
        },
    );

    GeneratedFile::new(
        ctx.transaction_create_page_path(route),
        FileKind::Page,
        b.finish(),
    )
}

fn opt_js_string(value: Option<&str>) -> String {
    value.map_or_else(|| "null".to_string(), js_string)
}

fn emit_line_templates(b: &mut SourceBuilder, txn: &TransactionDef) {
    b.line("type Side = 'DR' | 'CR'");
    b.blank();
    b.block("interface LineTemplate {", "}", |b| {
        b.lines([
            "key: string",
            "name: string",
            "description: string",
            "line_type: string",
            "side: Side | null",
            "account_type: string | null",
            "currency: string | null",
            "required: boolean",
            "smart_code: string",
        ]);
    });
    b.blank();
    b.block("const LINE_TEMPLATES: ReadonlyArray<LineTemplate> = [", "]", |b| {
        for (idx, line) in txn.lines.iter().enumerate() {
            b.block("{", "},", |b| {
                b.line(format!("key: {},", js_string(&line_template_key(idx, line))));
                b.line(format!("name: {},", js_string(&line.name)));
                b.line(format!("description: {},", js_string(&line.description)));
                b.line(format!("line_type: {},", js_string(line.line_type.as_str())));
                b.line(format!("side: {},", opt_js_string(line.side.map(|s| s.as_str()))));
                b.line(format!("account_type: {},", opt_js_string(line.account_type.as_deref())));
                b.line(format!("currency: {},", opt_js_string(line.currency.as_deref())));
                b.line(format!("required: {},", line.required));
                b.line(format!(
                    "smart_code: SMART_CODES.lines[{}],",
                    js_string(&line.name)
                ));
            });
        }
    });
}

fn emit_drafts(b: &mut SourceBuilder) {
    b.block("interface LineDraft {", "}", |b| {
        b.lines([
            "id: number",
            "template: string",
            "description: string",
            "quantity: string",
            "unit_amount: string",
        ]);
    });
    b.blank();
    b.block("function templateFor(key: string): LineTemplate {", "}", |b| {
        b.line("return LINE_TEMPLATES.find((t) => t.key === key) ?? LINE_TEMPLATES[0]");
    });
    b.blank();
    b.block("function newDraft(id: number, key: string): LineDraft {", "}", |b| {
        b.line("return { id, template: key, description: templateFor(key).description, quantity: '1', unit_amount: '' }");
    });
    b.blank();
    b.block("function nextDraftId(drafts: LineDraft[]): number {", "}", |b| {
        b.line("return drafts.reduce((max, d) => Math.max(max, d.id), 0) + 1");
    });
    b.blank();
    b.block("function initialDrafts(): LineDraft[] {", "}", |b| {
        b.line("return LINE_TEMPLATES.map((t, i) => newDraft(i + 1, t.key))");
    });
    b.blank();
    b.block(
        "function toLineInputs(drafts: LineDraft[], currency: string): TransactionLineInput[] {",
        "}",
        |b| {
            b.block("return drafts.map((d, i) => {", "})", |b| {
                b.line("const t = templateFor(d.template)");
                b.line("const quantity = Number(d.quantity) || 0");
                b.line("const unitAmount = Number(d.unit_amount) || 0");
                b.block("return {", "}", |b| {
                    b.lines([
                        "line_number: i + 1,",
                        "line_type: t.line_type,",
                        "smart_code: t.smart_code,",
                        "description: d.description || t.name,",
                        "quantity,",
                        "unit_amount: unitAmount,",
                        "line_amount: Math.round(quantity * unitAmount * 100) / 100,",
                        "side: t.side ?? undefined,",
                        "currency: t.currency ?? currency,",
                    ]);
                });
            });
        },
    );
    b.blank();
    b.block("function missingRequiredLines(drafts: LineDraft[]): string[] {", "}", |b| {
        b.line("return LINE_TEMPLATES.filter(");
        b.line("  (t) => t.required && !drafts.some((d) => d.template === t.key && Number(d.unit_amount) > 0),");
        b.line(").map((t) => t.name)");
    });
}

fn emit_heading(b: &mut SourceBuilder, txn: &TransactionDef, name: &str) {
    b.block(r#"<div className="flex items-center gap-3">"#, "</div>", |b| {
        b.block(r#"<Link href={OVERVIEW_ROUTE} aria-label="Back">"#, "</Link>", |b| {
            b.line(r#"<ArrowLeft className="h-5 w-5" />"#);
        });
        b.block("<div>", "</div>", |b| {
            b.line(format!(r#"<h1 className="text-2xl font-semibold">New {name}</h1>"#));
            if !txn.description.is_empty() {
                b.line(format!(
                    r#"<p className="text-sm text-muted-foreground">{}</p>"#,
                    jsx_text(&txn.description)
                ));
            }
        });
    });
}

fn emit_header_fields(b: &mut SourceBuilder) {
    b.block(r#"<section className="grid grid-cols-3 gap-4 rounded-lg border p-4">"#, "</section>", |b| {
        for (label, input) in [
            (
                "Date",
                r#"<input type="date" required value={transactionDate} onChange={(e) => setTransactionDate(e.target.value)} className="w-full rounded-md border px-3 py-2 text-sm" />"#,
            ),
            (
                "Reference",
                r#"<input type="text" value={reference} onChange={(e) => setReference(e.target.value)} className="w-full rounded-md border px-3 py-2 text-sm" />"#,
            ),
            (
                "Currency",
                r#"<input type="text" required maxLength={3} value={currency} onChange={(e) => setCurrency(e.target.value.toUpperCase())} className="w-full rounded-md border px-3 py-2 text-sm" />"#,
            ),
        ] {
            b.block(r#"<label className="block space-y-1">"#, "</label>", |b| {
                b.line(format!(r#"<span className="text-sm font-medium">{label}</span>"#));
                b.line(input);
            });
        }
    });
}

fn emit_line_table(b: &mut SourceBuilder) {
    b.block(r#"<section className="space-y-3 rounded-lg border p-4">"#, "</section>", |b| {
        b.block(r#"<div className="flex items-center justify-between">"#, "</div>", |b| {
            b.line(r#"<h2 className="text-lg font-medium">Lines</h2>"#);
            b.block(
                r#"<button type="button" onClick={addLine} className="inline-flex items-center gap-1 text-sm">"#,
                "</button>",
                |b| {
                    b.line(r#"<Plus className="h-4 w-4" /> Add line"#);
                },
            );
        });
        b.block(r#"<table className="w-full border-collapse text-sm">"#, "</table>", |b| {
            b.block("<thead>", "</thead>", |b| {
                b.block(r#"<tr className="border-b text-left">"#, "</tr>", |b| {
                    for col in ["Line", "Description", "Side", "Qty", "Unit amount", "Amount", ""] {
                        b.line(format!(r#"<th className="py-2 pr-3">{col}</th>"#));
                    }
                });
            });
            b.block("<tbody>", "</tbody>", |b| {
                b.block("{drafts.map((d, i) => {", "})}", |b| {
                    b.line("const t = templateFor(d.template)");
                    b.block("return (", ")", |b| {
                        b.block(r#"<tr key={d.id} className="border-b">"#, "</tr>", |b| {
                            b.block(r#"<td className="py-2 pr-3">"#, "</td>", |b| {
                                b.block(
                                    r#"<select value={d.template} onChange={(e) => updateDraft(d.id, { template: e.target.value })} className="rounded-md border px-2 py-1">"#,
                                    "</select>",
                                    |b| {
                                        b.line("{LINE_TEMPLATES.map((opt) => <option key={opt.key} value={opt.key}>{opt.name}{opt.required ? ' *' : ''}</option>)}");
                                    },
                                );
                            });
                            b.block(r#"<td className="py-2 pr-3">"#, "</td>", |b| {
                                b.line(r#"<input type="text" value={d.description} onChange={(e) => updateDraft(d.id, { description: e.target.value })} className="w-full rounded-md border px-2 py-1" />"#);
                            });
                            b.line(r#"<td className="py-2 pr-3">{t.side ?? '—'}</td>"#);
                            b.block(r#"<td className="py-2 pr-3">"#, "</td>", |b| {
                                b.line(r#"<input type="number" min="0" step="any" value={d.quantity} onChange={(e) => updateDraft(d.id, { quantity: e.target.value })} className="w-20 rounded-md border px-2 py-1" />"#);
                            });
                            b.block(r#"<td className="py-2 pr-3">"#, "</td>", |b| {
                                b.line(r#"<input type="number" min="0" step="0.01" value={d.unit_amount} onChange={(e) => updateDraft(d.id, { unit_amount: e.target.value })} className="w-28 rounded-md border px-2 py-1" />"#);
                            });
                            b.line(r#"<td className="py-2 pr-3 tabular-nums">{lines[i]?.line_amount.toFixed(2)}</td>"#);
                            b.block(r#"<td className="py-2 text-right">"#, "</td>", |b| {
                                b.block(
                                    r#"<button type="button" aria-label="Remove line" onClick={() => removeLine(d.id)} className="text-red-600">"#,
                                    "</button>",
                                    |b| {
                                        b.line(r#"<Trash2 className="h-4 w-4" />"#);
                                    },
                                );
                            });
                        });
                    });
                });
            });
        });
    });
}

fn emit_totals(b: &mut SourceBuilder, has_gl_lines: bool) {
    b.block(r#"<section className="flex justify-end gap-6 text-sm tabular-nums">"#, "</section>", |b| {
        if has_gl_lines {
            b.line("<span>Debits: {shown.debit.toFixed(2)} {currency}</span>");
            b.line("<span>Credits: {shown.credit.toFixed(2)} {currency}</span>");
            b.block(
                "<span className={balance.balanced ? 'text-green-600' : 'text-red-600'}>",
                "</span>",
                |b| {
                    b.line("{balance.balanced ? 'Balanced' : `Out of balance by ${shown.difference.toFixed(2)}`}");
                },
            );
        }
        b.line("<span>Total: {total.toFixed(2)} {currency}</span>");
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    fn page() -> GeneratedFile {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        generate_transaction_create_page(&ctx.transactions[0], &ctx)
    }

    #[test]
    fn written_under_transactions_route() {
        let file = page();
        assert_eq!(file.kind, FileKind::Page);
        assert!(file
            .path
            .ends_with("src/app/dealer-ops/transactions/vehicle-sale/new/page.tsx"));
        assert!(file.contents.contains("export default function VehicleSaleCreatePage()"));
    }

    #[test]
    fn seeds_one_template_per_line() {
        let out = page().contents;
        assert!(out.contains("key: '1-vehicle',"));
        assert!(out.contains("key: '2-cash',"));
        assert!(out.contains("key: '3-revenue',"));
        assert!(out.contains("side: 'DR',"));
        assert!(out.contains("side: 'CR',"));
        assert!(out.contains("account_type: 'REVENUE',"));
        assert!(out.contains("smart_code: SMART_CODES.lines['Cash'],"));
    }

    #[test]
    fn checks_balance_before_submit() {
        let out = page().contents;
        let check = out.find("if (!balance.balanced) {").unwrap();
        let post = out.find("await heraFetch('transactions', {").unwrap();
        assert!(check < post);
        assert!(out.contains("import { BALANCE_TOLERANCE, checkGlBalance } from '@/lib/dealer-ops/gl-balance'"));
    }

    #[test]
    fn shows_running_totals_for_gl_transactions() {
        let out = page().contents;
        assert!(out.contains("Debits: {shown.debit.toFixed(2)} {currency}"));
        assert!(out.contains("Credits: {shown.credit.toFixed(2)} {currency}"));
    }

    #[test]
    fn no_debit_credit_totals_without_gl_lines() {
        let mut pack = sample_pack();
        pack.transactions[0].lines.truncate(1);
        let ctx = GenerationContext::new(&pack);
        let out = generate_transaction_create_page(&ctx.transactions[0], &ctx).contents;
        assert!(!out.contains("Debits:"));
        assert!(out.contains("Total: {total.toFixed(2)} {currency}"));
    }

    #[test]
    fn default_currency_from_pack() {
        let mut pack = sample_pack();
        pack.app.currency = Some("EUR".to_string());
        let ctx = GenerationContext::new(&pack);
        let out = generate_transaction_create_page(&ctx.transactions[0], &ctx).contents;
        assert!(out.contains("const DEFAULT_CURRENCY = 'EUR'"));
    }
}

//! Generated vitest suites
//!
//! - `smart-codes.test.ts`: one shape assertion per smart code plus a
//!   uniqueness assertion over the whole pack
//! - `gl-balance.test.ts`: checker self-tests, one balance assertion per
//!   transaction type over its sample lines, and a live check of persisted
//!   lines
//! - `actor-stamps.test.ts`: actor enforcement and stamp coverage against a
//!   live backend
//!
//! The live suites skip themselves unless `SUPABASE_URL`,
//! `SUPABASE_SERVICE_ROLE_KEY`, `TEST_ORG_ID` and `TEST_ACTOR_ID` are set.

use crate::api::{ENTITIES_RPC, TRANSACTIONS_RPC};
use crate::context::GenerationContext;
use crate::ledger::{check_balance, sample_lines};
use crate::lib_files::{smart_code_regex_literal, GL_BALANCE_MODULE, SMART_CODES_MODULE};
use crate::smart_code::collect_smart_codes;
use crate::source::{comment_text, js_string, FileKind, GeneratedFile, SourceBuilder};

/// Minimum share of recent rows that must carry `created_by`/`updated_by`.
pub const STAMP_COVERAGE_THRESHOLD: f64 = 0.95;

/// Tables whose rows carry actor stamps.
pub const STAMPED_TABLES: [&str; 5] = [
    "core_entities",
    "core_dynamic_data",
    "core_relationships",
    "universal_transactions",
    "universal_transaction_lines",
];

pub fn generate_test_suites(ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
    vec![
        generate_smart_code_tests(ctx),
        generate_gl_balance_tests(ctx),
        generate_actor_stamp_tests(ctx),
    ]
}

fn emit_live_env(b: &mut SourceBuilder) {
    b.line("const { SUPABASE_URL, SUPABASE_SERVICE_ROLE_KEY, TEST_ORG_ID, TEST_ACTOR_ID } = process.env");
    b.line("const hasBackend = Boolean(SUPABASE_URL && SUPABASE_SERVICE_ROLE_KEY && TEST_ORG_ID && TEST_ACTOR_ID)");
}

fn emit_live_client(b: &mut SourceBuilder) {
    b.line("let supabase: SupabaseClient");
    b.block("beforeAll(() => {", "})", |b| {
        b.line("supabase = createClient(SUPABASE_URL!, SUPABASE_SERVICE_ROLE_KEY!, { auth: { persistSession: false } })");
    });
}

// ── smart-codes.test.ts ──────────────────────────────────────────────────────

pub fn generate_smart_code_tests(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let refs = collect_smart_codes(ctx.pack);

    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.import(&["describe", "expect", "it"], "vitest");
    b.import(&["ALL_SMART_CODES"], &ctx.lib_import(SMART_CODES_MODULE));
    b.blank();
    b.line(format!("const PATTERN = {}", smart_code_regex_literal()));
    b.blank();
    b.block("const CODES: ReadonlyArray<{ location: string; code: string }> = [", "]", |b| {
        for r in &refs {
            b.line(format!(
                "{{ location: {}, code: {} }},",
                js_string(&r.location),
                js_string(r.code)
            ));
        }
    });
    b.blank();

    b.block(
        format!("describe({}, () => {{", js_string(&format!("smart codes: {}", ctx.pack.app.id))),
        "})",
        |b| {
            for r in &refs {
                b.block(
                    format!(
                        "it({}, () => {{",
                        js_string(&format!("{} is well-formed", r.location))
                    ),
                    "})",
                    |b| {
                        b.line(format!("expect({}).toMatch(PATTERN)", js_string(r.code)));
                    },
                );
                b.blank();
            }
            b.block("it('every smart code is unique', () => {", "})", |b| {
                b.line("const codes = CODES.map((c) => c.code)");
                b.line("const duplicates = codes.filter((code, i) => codes.indexOf(code) !== i)");
                b.line("expect(duplicates).toEqual([])");
                b.line("expect(new Set(codes).size).toBe(codes.length)");
            });
            b.blank();
            b.block("it('lib registry matches the app pack', () => {", "})", |b| {
                b.line("expect(ALL_SMART_CODES.map((c) => c.code)).toEqual(CODES.map((c) => c.code))");
            });
        },
    );

    GeneratedFile::new(ctx.test_path("smart-codes.test.ts"), FileKind::Test, b.finish())
}

// ── gl-balance.test.ts ───────────────────────────────────────────────────────

pub fn generate_gl_balance_tests(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.import(&["beforeAll", "describe", "expect", "it"], "vitest");
    b.import(&["createClient", "type SupabaseClient"], "@supabase/supabase-js");
    b.import(
        &["BALANCE_TOLERANCE", "checkGlBalance", "type LedgerLine"],
        &ctx.lib_import(GL_BALANCE_MODULE),
    );
    b.blank();
    emit_live_env(&mut b);
    b.blank();
    b.block(
        "function gl(side: 'DR' | 'CR', line_amount: number, currency = 'USD'): LedgerLine {",
        "}",
        |b| {
            b.line("return { line_type: 'GL', side, currency, line_amount }");
        },
    );
    b.blank();

    b.block("describe('checkGlBalance', () => {", "})", |b| {
        b.block("it('accepts equal debits and credits', () => {", "})", |b| {
            b.line("expect(checkGlBalance([gl('DR', 250), gl('CR', 100), gl('CR', 150)]).balanced).toBe(true)");
        });
        b.blank();
        b.block("it('rejects a difference above the tolerance', () => {", "})", |b| {
            b.line("const report = checkGlBalance([gl('DR', 100), gl('CR', 99.5)])");
            b.line("expect(report.balanced).toBe(false)");
            b.line("expect(report.currencies.USD.difference).toBeGreaterThanOrEqual(BALANCE_TOLERANCE)");
        });
        b.blank();
        b.block("it('tolerates sub-cent rounding', () => {", "})", |b| {
            b.line("expect(checkGlBalance([gl('DR', 0.1 + 0.2), gl('CR', 0.3)]).balanced).toBe(true)");
        });
        b.blank();
        b.block("it('balances each currency independently', () => {", "})", |b| {
            b.line("const report = checkGlBalance([gl('DR', 10, 'USD'), gl('CR', 10, 'EUR')])");
            b.line("expect(report.balanced).toBe(false)");
            b.line("expect(Object.keys(report.currencies).sort()).toEqual(['EUR', 'USD'])");
        });
        b.blank();
        b.block("it('ignores non-GL lines', () => {", "})", |b| {
            b.line("expect(checkGlBalance([{ line_type: 'PRODUCT', currency: 'USD', line_amount: 42 }]).balanced).toBe(true)");
        });
    });

    for route in &ctx.transactions {
        let txn = route.def;
        let lines = sample_lines(txn, &ctx.currency);
        let report = check_balance(&lines);

        b.blank();
        b.block(
            format!(
                "describe({}, () => {{",
                js_string(&format!("{} sample lines", txn.transaction_type))
            ),
            "})",
            |b| {
                b.block("const lines: LedgerLine[] = [", "]", |b| {
                    for line in &lines {
                        let side = line.side.map_or("null".to_string(), |s| js_string(s.as_str()));
                        b.line(format!(
                            "{{ line_type: {}, side: {side}, currency: {}, line_amount: {} }}, // {}",
                            js_string(line.line_type.as_str()),
                            js_string(&line.currency),
                            line.amount_fixed(),
                            comment_text(&line.name),
                        ));
                    }
                });
                b.blank();
                if report.currencies.is_empty() {
                    b.block("it('posts no GL lines', () => {", "})", |b| {
                        b.line("const report = checkGlBalance(lines)");
                        b.line("expect(report.currencies).toEqual({})");
                        b.line("expect(report.balanced).toBe(true)");
                    });
                }
                for (currency, totals) in &report.currencies {
                    let debit = format!("{:.2}", totals.debit);
                    let credit = format!("{:.2}", totals.credit);
                    b.block(
                        format!(
                            "it({}, () => {{",
                            js_string(&format!("balances in {currency}: DR {debit} == CR {credit}"))
                        ),
                        "})",
                        |b| {
                            b.line("const report = checkGlBalance(lines)");
                            b.line(format!("const totals = report.currencies[{}]", js_string(currency)));
                            b.line(format!("expect(totals.debit.toFixed(2)).toBe('{debit}')"));
                            b.line(format!("expect(totals.credit.toFixed(2)).toBe('{credit}')"));
                            b.line("expect(totals.balanced).toBe(true)");
                        },
                    );
                }
            },
        );
    }

    let types: Vec<String> = ctx
        .transactions
        .iter()
        .map(|r| js_string(&r.def.transaction_type))
        .collect();
    b.blank();
    b.block("describe.skipIf(!hasBackend)('persisted GL lines', () => {", "})", |b| {
        emit_live_client(b);
        b.blank();
        b.block(
            "it('every recorded transaction balances per currency', async () => {",
            "})",
            |b| {
                b.line("const { data, error } = await supabase");
                b.indented(|b| {
                    b.lines([
                        ".from('universal_transactions')",
                        ".select('id, transaction_type, transaction_currency_code, universal_transaction_lines(line_type, line_amount, line_data)')",
                        ".eq('organization_id', TEST_ORG_ID!)",
                    ]);
                    b.line(format!(".in('transaction_type', [{}])", types.join(", ")));
                    b.line(".limit(500)");
                });
                b.line("expect(error).toBeNull()");
                b.block("for (const txn of data ?? []) {", "}", |b| {
                    b.block(
                        "const lines: LedgerLine[] = (txn.universal_transaction_lines ?? []).map((l: any) => ({",
                        "}))",
                        |b| {
                            b.lines([
                                "line_type: l.line_type,",
                                "side: l.line_data?.side ?? null,",
                                "currency: l.line_data?.currency ?? txn.transaction_currency_code,",
                                "line_amount: Number(l.line_amount),",
                            ]);
                        },
                    );
                    b.line("expect(checkGlBalance(lines).balanced, `transaction ${txn.id} (${txn.transaction_type})`).toBe(true)");
                });
            },
        );
    });

    GeneratedFile::new(ctx.test_path("gl-balance.test.ts"), FileKind::Test, b.finish())
}

// ── actor-stamps.test.ts ─────────────────────────────────────────────────────

pub fn generate_actor_stamp_tests(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let mut b = SourceBuilder::with_header(&ctx.source_note());
    b.import(&["beforeAll", "describe", "expect", "it"], "vitest");
    b.import(&["createClient", "type SupabaseClient"], "@supabase/supabase-js");
    b.blank();
    emit_live_env(&mut b);
    b.line(format!("const STAMP_COVERAGE_THRESHOLD = {STAMP_COVERAGE_THRESHOLD}"));
    let tables: Vec<String> = STAMPED_TABLES.iter().map(|t| js_string(t)).collect();
    b.line(format!("const STAMPED_TABLES = [{}]", tables.join(", ")));
    b.blank();

    b.block(
        format!(
            "describe.skipIf(!hasBackend)({}, () => {{",
            js_string(&format!("actor stamps: {}", ctx.pack.app.id))
        ),
        "})",
        |b| {
            emit_live_client(b);
            b.blank();

            for route in &ctx.entities {
                let entity = route.def;
                b.block(
                    format!(
                        "it({}, async () => {{",
                        js_string(&format!("{ENTITIES_RPC} rejects {} without an actor", entity.entity_type))
                    ),
                    "})",
                    |b| {
                        b.block(
                            format!("const {{ error }} = await supabase.rpc({}, {{", js_string(ENTITIES_RPC)),
                            "})",
                            |b| {
                                b.line("p_action: 'CREATE',");
                                b.line("p_actor_user_id: null,");
                                b.line("p_organization_id: TEST_ORG_ID,");
                                b.line(format!(
                                    "p_entity: {{ entity_type: {}, entity_name: 'Actor stamp probe', smart_code: {} }},",
                                    js_string(&entity.entity_type),
                                    js_string(&entity.smart_code)
                                ));
                                b.line("p_dynamic: {},");
                                b.line("p_relationships: [],");
                                b.line("p_options: {},");
                            },
                        );
                        b.line("expect(error).not.toBeNull()");
                    },
                );
                b.blank();
            }

            if let Some(route) = ctx.transactions.first() {
                b.block(
                    format!(
                        "it({}, async () => {{",
                        js_string(&format!("{TRANSACTIONS_RPC} rejects a transaction without an actor"))
                    ),
                    "})",
                    |b| {
                        b.block(
                            format!("const {{ error }} = await supabase.rpc({}, {{", js_string(TRANSACTIONS_RPC)),
                            "})",
                            |b| {
                                b.line("p_action: 'CREATE',");
                                b.line("p_actor_user_id: null,");
                                b.line("p_organization_id: TEST_ORG_ID,");
                                b.line(format!(
                                    "p_transaction: {{ transaction_type: {}, smart_code: {}, total_amount: 0 }},",
                                    js_string(&route.def.transaction_type),
                                    js_string(&route.def.smart_code)
                                ));
                                b.line("p_lines: [],");
                                b.line("p_options: {},");
                            },
                        );
                        b.line("expect(error).not.toBeNull()");
                    },
                );
                b.blank();
            }

            let probe = ctx.entities.first().map(|r| r.def);
            for column in ["created_by", "updated_by"] {
                b.block(
                    format!("it('core_entities.{column} is not nullable', async () => {{"),
                    "})",
                    |b| {
                        b.block("const { error } = await supabase.from('core_entities').insert({", "})", |b| {
                            b.line("organization_id: TEST_ORG_ID,");
                            if let Some(entity) = probe {
                                b.line(format!("entity_type: {},", js_string(&entity.entity_type)));
                                b.line(format!("smart_code: {},", js_string(&entity.smart_code)));
                            }
                            b.line("entity_name: 'Actor stamp probe',");
                            for other in ["created_by", "updated_by"] {
                                if other == column {
                                    b.line(format!("{other}: null,"));
                                } else {
                                    b.line(format!("{other}: TEST_ACTOR_ID,"));
                                }
                            }
                        });
                        b.line("expect(error).not.toBeNull()");
                    },
                );
                b.blank();
            }

            b.block(
                "it.each(STAMPED_TABLES)('%s: recent rows carry actor stamps', async (table) => {",
                "})",
                |b| {
                    b.line("const since = new Date(Date.now() - 24 * 60 * 60 * 1000).toISOString()");
                    b.line("const recent = () => supabase.from(table).select('*', { count: 'exact', head: true }).eq('organization_id', TEST_ORG_ID!).gte('created_at', since)");
                    b.line("const { count: total, error } = await recent()");
                    b.line("expect(error).toBeNull()");
                    b.line("if (!total) return");
                    b.line("const { count: stamped } = await recent().not('created_by', 'is', null).not('updated_by', 'is', null)");
                    b.line("expect((stamped ?? 0) / total).toBeGreaterThanOrEqual(STAMP_COVERAGE_THRESHOLD)");
                },
            );
        },
    );

    GeneratedFile::new(ctx.test_path("actor-stamps.test.ts"), FileKind::Test, b.finish())
}

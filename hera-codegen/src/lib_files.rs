//! Shared library modules for the generated app
//!
//! - `smart-codes.ts`: grammar, per-object constants and the full code list
//! - `hera-client.ts`: browser fetch wrapper for the generated API routes
//! - `gl-balance.ts`: the DR/CR balance check used by pages, routes and tests

use crate::context::GenerationContext;
use crate::ledger::BALANCE_TOLERANCE;
use crate::smart_code::{collect_smart_codes, SMART_CODE_PATTERN};
use crate::source::{js_string, FileKind, GeneratedFile, SourceBuilder};

pub const SMART_CODES_MODULE: &str = "smart-codes";
pub const CLIENT_MODULE: &str = "hera-client";
pub const GL_BALANCE_MODULE: &str = "gl-balance";

/// All lib files, in output order.
pub fn generate_lib_files(ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
    vec![
        generate_smart_codes_module(ctx),
        generate_client_module(ctx),
        generate_gl_balance_module(ctx),
    ]
}

/// Smart code pattern as a JavaScript regex literal.
pub fn smart_code_regex_literal() -> String {
    format!("/{}/", SMART_CODE_PATTERN)
}

// ── smart-codes.ts ───────────────────────────────────────────────────────────

pub fn generate_smart_codes_module(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let pack = ctx.pack;
    let mut b = SourceBuilder::with_header(&ctx.source_note());

    b.line(format!(
        "export const SMART_CODE_PATTERN = {}",
        smart_code_regex_literal()
    ));
    b.blank();
    b.block(
        "export function isValidSmartCode(code: string): boolean {",
        "}",
        |b| {
            b.line("return SMART_CODE_PATTERN.test(code)");
        },
    );
    b.blank();
    b.line(format!(
        "export const APP_SMART_CODE = {}",
        js_string(&pack.app.smart_code)
    ));
    b.blank();

    b.block("export const ENTITY_SMART_CODES = {", "} as const", |b| {
        for entity in &pack.entities {
            b.block(format!("{}: {{", js_string(&entity.entity_type)), "},", |b| {
                b.line(format!("entity: {},", js_string(&entity.smart_code)));
                b.block("fields: {", "},", |b| {
                    for field in &entity.fields {
                        b.line(format!(
                            "{}: {},",
                            js_string(&field.name),
                            js_string(&field.smart_code)
                        ));
                    }
                });
            });
        }
    });
    b.blank();

    b.block("export const TRANSACTION_SMART_CODES = {", "} as const", |b| {
        for txn in &pack.transactions {
            b.block(format!("{}: {{", js_string(&txn.transaction_type)), "},", |b| {
                b.line(format!("transaction: {},", js_string(&txn.smart_code)));
                b.block("lines: {", "},", |b| {
                    for line in &txn.lines {
                        b.line(format!(
                            "{}: {},",
                            js_string(&line.name),
                            js_string(&line.smart_code)
                        ));
                    }
                });
            });
        }
    });
    b.blank();

    b.line("/** Every smart code declared in the app pack, in declaration order. */");
    b.block(
        "export const ALL_SMART_CODES: ReadonlyArray<{ location: string; code: string }> = [",
        "]",
        |b| {
            for r in collect_smart_codes(pack) {
                b.line(format!(
                    "{{ location: {}, code: {} }},",
                    js_string(&r.location),
                    js_string(r.code)
                ));
            }
        },
    );

    GeneratedFile::new(
        ctx.lib_path(&format!("{SMART_CODES_MODULE}.ts")),
        FileKind::Lib,
        b.finish(),
    )
}

// ── hera-client.ts ───────────────────────────────────────────────────────────

pub fn generate_client_module(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let mut b = SourceBuilder::with_header(&ctx.source_note());

    b.line(format!("export const API_PREFIX = {}", js_string(&ctx.api_prefix())));
    b.line("export const ORG_STORAGE_KEY = 'hera.organization_id'");
    b.line("export const TOKEN_STORAGE_KEY = 'hera.access_token'");
    b.blank();
    b.line("export type DynamicValue = string | number | boolean | null");
    b.blank();
    b.block("export interface HeraEntity {", "}", |b| {
        b.lines([
            "id: string",
            "entity_type: string",
            "entity_name: string",
            "smart_code: string",
            "dynamic_fields: Record<string, DynamicValue>",
            "created_at?: string",
            "updated_at?: string",
        ]);
    });
    b.blank();
    b.block("export interface DynamicFieldInput {", "}", |b| {
        b.lines([
            "field_name: string",
            "field_type: 'text' | 'number' | 'boolean'",
            "field_value: DynamicValue",
            "smart_code: string",
        ]);
    });
    b.blank();
    b.block("export interface TransactionLineInput {", "}", |b| {
        b.lines([
            "line_number: number",
            "line_type: string",
            "smart_code: string",
            "description: string",
            "quantity: number",
            "unit_amount: number",
            "line_amount: number",
            "side?: 'DR' | 'CR'",
            "currency: string",
        ]);
    });
    b.blank();
    b.block("export class HeraApiError extends Error {", "}", |b| {
        b.block(
            "constructor(message: string, readonly status: number) {",
            "}",
            |b| {
                b.line("super(message)");
                b.line("this.name = 'HeraApiError'");
            },
        );
    });
    b.blank();
    b.block("function readStorage(key: string): string | null {", "}", |b| {
        b.line("if (typeof window === 'undefined') return null");
        b.line("return window.localStorage.getItem(key)");
    });
    b.blank();
    b.block(
        "export async function heraFetch<T>(path: string, init: RequestInit = {}): Promise<T> {",
        "}",
        |b| {
            b.line("const headers = new Headers(init.headers)");
            b.line("headers.set('Content-Type', 'application/json')");
            b.line("const organizationId = readStorage(ORG_STORAGE_KEY)");
            b.line("if (organizationId) headers.set('x-hera-org-id', organizationId)");
            b.line("const token = readStorage(TOKEN_STORAGE_KEY)");
            b.line("if (token) headers.set('Authorization', `Bearer ${token}`)");
            b.blank();
            b.line("const response = await fetch(`${API_PREFIX}/${path}`, { ...init, headers })");
            b.line("const body = await response.json().catch(() => ({}))");
            b.block("if (!response.ok) {", "}", |b| {
                b.line("const message = body?.error ?? `Request failed with status ${response.status}`");
                b.line("throw new HeraApiError(message, response.status)");
            });
            b.line("return body as T");
        },
    );

    GeneratedFile::new(
        ctx.lib_path(&format!("{CLIENT_MODULE}.ts")),
        FileKind::Lib,
        b.finish(),
    )
}

// ── gl-balance.ts ────────────────────────────────────────────────────────────

pub fn generate_gl_balance_module(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let mut b = SourceBuilder::with_header(&ctx.source_note());

    b.line(format!("export const BALANCE_TOLERANCE = {BALANCE_TOLERANCE}"));
    b.blank();
    b.block("export interface LedgerLine {", "}", |b| {
        b.lines([
            "line_type: string",
            "side?: 'DR' | 'CR' | null",
            "currency: string",
            "line_amount: number",
        ]);
    });
    b.blank();
    b.block("export interface CurrencyTotals {", "}", |b| {
        b.lines([
            "debit: number",
            "credit: number",
            "difference: number",
            "balanced: boolean",
        ]);
    });
    b.blank();
    b.block("export interface BalanceReport {", "}", |b| {
        b.line("balanced: boolean");
        b.line("currencies: Record<string, CurrencyTotals>");
    });
    b.blank();
    b.line("/** Sum GL lines per currency; DR must equal CR within BALANCE_TOLERANCE. */");
    b.block(
        "export function checkGlBalance(lines: LedgerLine[]): BalanceReport {",
        "}",
        |b| {
            b.line("const currencies: Record<string, CurrencyTotals> = {}");
            b.block("for (const line of lines) {", "}", |b| {
                b.line("if (line.line_type !== 'GL' || !line.side) continue");
                b.line("const totals = (currencies[line.currency] ??= { debit: 0, credit: 0, difference: 0, balanced: true })");
                b.line("const amount = Number(line.line_amount) || 0");
                b.line("if (line.side === 'DR') totals.debit += amount");
                b.line("else totals.credit += amount");
            });
            b.block("for (const totals of Object.values(currencies)) {", "}", |b| {
                b.line("totals.difference = Math.abs(totals.debit - totals.credit)");
                b.line("totals.balanced = totals.difference < BALANCE_TOLERANCE");
            });
            b.line("const balanced = Object.values(currencies).every((t) => t.balanced)");
            b.line("return { balanced, currencies }");
        },
    );

    GeneratedFile::new(
        ctx.lib_path(&format!("{GL_BALANCE_MODULE}.ts")),
        FileKind::Lib,
        b.finish(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    #[test]
    fn smart_codes_module_lists_every_code() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let file = generate_smart_codes_module(&ctx);
        assert_eq!(file.kind, FileKind::Lib);
        assert!(file.path.ends_with("src/lib/dealer-ops/smart-codes.ts"));
        for r in collect_smart_codes(&pack) {
            assert!(file.contents.contains(&js_string(r.code)), "missing {}", r.code);
        }
        assert!(file
            .contents
            .contains(r"/^HERA\.[A-Z0-9]{3,15}(?:\.[A-Z0-9_]{2,30}){3,8}\.v[0-9]+$/"));
    }

    #[test]
    fn smart_codes_module_groups_by_object() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_smart_codes_module(&ctx).contents;
        assert!(out.contains("  'CUSTOMER': {\n    entity: 'HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1',"));
        assert!(out.contains("'credit_limit': 'HERA.AUTO.DEALER.FIELD.CUSTOMER.CREDIT_LIMIT.v1',"));
        assert!(out.contains("'Revenue': 'HERA.AUTO.DEALER.GL.REVENUE.CREDIT.v1',"));
    }

    #[test]
    fn client_uses_app_api_prefix() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_client_module(&ctx).contents;
        assert!(out.contains("export const API_PREFIX = '/api/v2/dealer-ops'"));
        assert!(out.contains("export async function heraFetch<T>"));
    }

    #[test]
    fn balance_module_uses_tolerance() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_gl_balance_module(&ctx).contents;
        assert!(out.contains("export const BALANCE_TOLERANCE = 0.01"));
        assert!(out.contains("totals.balanced = totals.difference < BALANCE_TOLERANCE"));
    }

    #[test]
    fn three_lib_files() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        assert_eq!(generate_lib_files(&ctx).len(), 3);
    }
}

//! Next.js route handlers
//!
//! Two handlers per app, mounted under `deployment.api_base_path`:
//! `entities/route.ts` (GET, POST, PUT, DELETE over `hera_entities_crud_v1`)
//! and `transactions/route.ts` (GET, POST over `hera_txn_crud_v1`). Both
//! authorise through the generated middleware; transaction posts are
//! rejected server-side when the GL lines do not balance.

use crate::context::GenerationContext;
use crate::lib_files::{GL_BALANCE_MODULE, SMART_CODES_MODULE};
use crate::pack::FieldType;
use crate::source::{js_string, FileKind, GeneratedFile, SourceBuilder};

pub const ENTITIES_RPC: &str = "hera_entities_crud_v1";
pub const TRANSACTIONS_RPC: &str = "hera_txn_crud_v1";

pub fn generate_api_routes(ctx: &GenerationContext<'_>) -> Vec<GeneratedFile> {
    vec![
        generate_entities_route(ctx),
        generate_transactions_route(ctx),
    ]
}

fn emit_route_imports(b: &mut SourceBuilder, ctx: &GenerationContext<'_>) {
    b.import(&["NextResponse", "type NextRequest"], "next/server");
    b.import(
        &["errorResponse", "requireHeraContext", "type HeraContext"],
        &ctx.middleware_import(),
    );
}

fn emit_type_set(b: &mut SourceBuilder, name: &str, values: impl Iterator<Item = String>) {
    let values: Vec<String> = values.map(|v| js_string(&v)).collect();
    b.line(format!(
        "const {name} = new Set<string>([{}])",
        values.join(", ")
    ));
}

/// Common `p_action` call against an RPC, with the context's actor and org.
fn emit_rpc_helper(b: &mut SourceBuilder, rpc: &str, params: &[&str]) {
    b.block(
        format!(
            "async function callRpc(ctx: HeraContext, action: string, {}) {{",
            params
                .iter()
                .map(|p| format!("{p}: unknown"))
                .collect::<Vec<_>>()
                .join(", ")
        ),
        "}",
        |b| {
            b.block(
                format!("const {{ data, error }} = await ctx.supabase.rpc({}, {{", js_string(rpc)),
                "})",
                |b| {
                    b.line("p_action: action,");
                    b.line("p_actor_user_id: ctx.actorUserId,");
                    b.line("p_organization_id: ctx.organizationId,");
                    for p in params {
                        b.line(format!("{p},"));
                    }
                },
            );
            b.line("if (error) throw new Error(error.message)");
            b.line("return data");
        },
    );
}

// ── entities/route.ts ────────────────────────────────────────────────────────

pub fn generate_entities_route(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let mut b = SourceBuilder::with_header(&ctx.source_note());
    emit_route_imports(&mut b, ctx);
    b.import(&["ENTITY_SMART_CODES"], &ctx.lib_import(SMART_CODES_MODULE));
    b.blank();

    emit_type_set(
        &mut b,
        "ENTITY_TYPES",
        ctx.pack.entities.iter().map(|e| e.entity_type.clone()),
    );
    b.blank();
    b.block("const VALUE_COLUMNS = {", "} as const", |b| {
        for ft in [FieldType::Text, FieldType::Number, FieldType::Boolean] {
            b.line(format!("{}: {},", ft.as_str(), js_string(ft.value_column())));
        }
    });
    b.blank();
    b.block("interface EntityBody {", "}", |b| {
        b.lines([
            "id?: string",
            "entity_type: string",
            "entity_name: string",
            "smart_code: string",
            "dynamic_fields?: Array<{ field_name: string; field_type: keyof typeof VALUE_COLUMNS; field_value: unknown; smart_code: string }>",
        ]);
    });
    b.blank();
    emit_rpc_helper(
        &mut b,
        ENTITIES_RPC,
        &["p_entity", "p_dynamic", "p_relationships", "p_options"],
    );
    b.blank();

    b.block("function toDynamic(fields: EntityBody['dynamic_fields']) {", "}", |b| {
        b.line("const dynamic: Record<string, Record<string, unknown>> = {}");
        b.block("for (const f of fields ?? []) {", "}", |b| {
            b.line("dynamic[f.field_name] = { field_type: f.field_type, [VALUE_COLUMNS[f.field_type]]: f.field_value, smart_code: f.smart_code }");
        });
        b.line("return dynamic");
    });
    b.blank();
    b.block("function toEntities(data: any) {", "}", |b| {
        b.line("const rows: any[] = Array.isArray(data) ? data : data?.items ?? (data ? [data] : [])");
        b.block("return rows.map((row) => ({", "}))", |b| {
            b.lines([
                "id: row.id ?? row.entity_id,",
                "entity_type: row.entity_type,",
                "entity_name: row.entity_name,",
                "smart_code: row.smart_code,",
                "dynamic_fields: row.dynamic_fields ?? row.dynamic_data ?? {},",
                "created_at: row.created_at,",
                "updated_at: row.updated_at,",
            ]);
        });
    });
    b.blank();
    b.block("function checkBody(body: EntityBody): string | null {", "}", |b| {
        b.line("if (!ENTITY_TYPES.has(body.entity_type)) return `Unknown entity_type '${body.entity_type}'`");
        b.line("if (!body.entity_name?.trim()) return 'entity_name is required'");
        b.line("const expected = ENTITY_SMART_CODES[body.entity_type as keyof typeof ENTITY_SMART_CODES].entity");
        b.line("if (body.smart_code !== expected) return `smart_code must be '${expected}'`");
        b.line("return null");
    });
    b.blank();

    b.block("export async function GET(request: NextRequest) {", "}", |b| {
        b.block("try {", "}", |b| {
            b.line("const ctx = await requireHeraContext(request, 'entities:read')");
            b.line("const params = request.nextUrl.searchParams");
            b.line("const entityType = params.get('entity_type') ?? ''");
            b.block("if (!ENTITY_TYPES.has(entityType)) {", "}", |b| {
                b.line("return NextResponse.json({ error: `Unknown entity_type '${entityType}'` }, { status: 400 })");
            });
            b.line("const id = params.get('id')");
            b.line("const data = await callRpc(ctx, 'READ', { entity_type: entityType, ...(id ? { id } : {}) }, {}, [], { include_dynamic: true })");
            b.line("const items = toEntities(data)");
            b.line("return id ? NextResponse.json({ item: items[0] ?? null }) : NextResponse.json({ items })");
        });
        b.block("catch (err) {", "}", |b| {
            b.line("return errorResponse(err)");
        });
    });
    b.blank();

    for (method, action, status) in [("POST", "CREATE", 201), ("PUT", "UPDATE", 200)] {
        b.block(
            format!("export async function {method}(request: NextRequest) {{"),
            "}",
            |b| {
                b.block("try {", "}", |b| {
                    b.line("const ctx = await requireHeraContext(request, 'entities:write')");
                    b.line("const body = (await request.json()) as EntityBody");
                    if action == "UPDATE" {
                        b.line("if (!body.id) return NextResponse.json({ error: 'id is required' }, { status: 400 })");
                    }
                    b.line("const problem = checkBody(body)");
                    b.line("if (problem) return NextResponse.json({ error: problem }, { status: 400 })");
                    b.block(format!("const data: any = await callRpc(ctx, '{action}',"), ")", |b| {
                        b.line("{ id: body.id, entity_type: body.entity_type, entity_name: body.entity_name.trim(), smart_code: body.smart_code },");
                        b.line("toDynamic(body.dynamic_fields),");
                        b.line("[],");
                        b.line("{},");
                    });
                    b.line(format!(
                        "return NextResponse.json({{ id: data?.entity_id ?? data?.id ?? body.id }}, {{ status: {status} }})"
                    ));
                });
                b.block("catch (err) {", "}", |b| {
                    b.line("return errorResponse(err)");
                });
            },
        );
        b.blank();
    }

    b.block("export async function DELETE(request: NextRequest) {", "}", |b| {
        b.block("try {", "}", |b| {
            b.line("const ctx = await requireHeraContext(request, 'entities:write')");
            b.line("const id = request.nextUrl.searchParams.get('id')");
            b.line("if (!id) return NextResponse.json({ error: 'id is required' }, { status: 400 })");
            b.line("await callRpc(ctx, 'DELETE', { id }, {}, [], {})");
            b.line("return NextResponse.json({ id })");
        });
        b.block("catch (err) {", "}", |b| {
            b.line("return errorResponse(err)");
        });
    });

    GeneratedFile::new(ctx.api_route_path("entities"), FileKind::Api, b.finish())
}

// ── transactions/route.ts ────────────────────────────────────────────────────

pub fn generate_transactions_route(ctx: &GenerationContext<'_>) -> GeneratedFile {
    let mut b = SourceBuilder::with_header(&ctx.source_note());
    emit_route_imports(&mut b, ctx);
    b.import(&["TRANSACTION_SMART_CODES"], &ctx.lib_import(SMART_CODES_MODULE));
    b.import(
        &["checkGlBalance", "type LedgerLine"],
        &ctx.lib_import(GL_BALANCE_MODULE),
    );
    b.blank();

    emit_type_set(
        &mut b,
        "TRANSACTION_TYPES",
        ctx.pack
            .transactions
            .iter()
            .map(|t| t.transaction_type.clone()),
    );
    b.line(format!("const DEFAULT_CURRENCY = {}", js_string(&ctx.currency)));
    b.blank();
    b.block("interface TransactionBody {", "}", |b| {
        b.lines([
            "transaction_type: string",
            "smart_code: string",
            "transaction_date?: string",
            "transaction_code?: string",
            "currency?: string",
            "total_amount?: number",
            "lines?: Array<LedgerLine & { line_number: number; smart_code: string; description?: string; quantity?: number; unit_amount?: number }>",
        ]);
    });
    b.blank();
    emit_rpc_helper(&mut b, TRANSACTIONS_RPC, &["p_transaction", "p_lines", "p_options"]);
    b.blank();

    b.block("export async function GET(request: NextRequest) {", "}", |b| {
        b.block("try {", "}", |b| {
            b.line("const ctx = await requireHeraContext(request, 'transactions:read')");
            b.line("const transactionType = request.nextUrl.searchParams.get('transaction_type')");
            b.block("if (transactionType && !TRANSACTION_TYPES.has(transactionType)) {", "}", |b| {
                b.line("return NextResponse.json({ error: `Unknown transaction_type '${transactionType}'` }, { status: 400 })");
            });
            b.line("const data: any = await callRpc(ctx, 'READ', transactionType ? { transaction_type: transactionType } : {}, [], { include_lines: true })");
            b.line("const items = Array.isArray(data) ? data : data?.items ?? []");
            b.line("return NextResponse.json({ items })");
        });
        b.block("catch (err) {", "}", |b| {
            b.line("return errorResponse(err)");
        });
    });
    b.blank();

    b.block("export async function POST(request: NextRequest) {", "}", |b| {
        b.block("try {", "}", |b| {
            b.line("const ctx = await requireHeraContext(request, 'transactions:write')");
            b.line("const body = (await request.json()) as TransactionBody");
            b.block("if (!TRANSACTION_TYPES.has(body.transaction_type)) {", "}", |b| {
                b.line("return NextResponse.json({ error: `Unknown transaction_type '${body.transaction_type}'` }, { status: 400 })");
            });
            b.line("const expected = TRANSACTION_SMART_CODES[body.transaction_type as keyof typeof TRANSACTION_SMART_CODES].transaction");
            b.block("if (body.smart_code !== expected) {", "}", |b| {
                b.line("return NextResponse.json({ error: `smart_code must be '${expected}'` }, { status: 400 })");
            });
            b.blank();
            b.line("const lines = body.lines ?? []");
            b.line("const balance = checkGlBalance(lines)");
            b.block("if (!balance.balanced) {", "}", |b| {
                b.line("return NextResponse.json({ error: 'GL lines do not balance', balance }, { status: 422 })");
            });
            b.blank();
            b.block("const data: any = await callRpc(ctx, 'CREATE',", ")", |b| {
                b.block("{", "},", |b| {
                    b.lines([
                        "transaction_type: body.transaction_type,",
                        "smart_code: body.smart_code,",
                        "transaction_date: body.transaction_date ?? new Date().toISOString(),",
                        "transaction_code: body.transaction_code,",
                        "transaction_currency_code: body.currency ?? DEFAULT_CURRENCY,",
                        "total_amount: body.total_amount ?? 0,",
                    ]);
                });
                b.line("lines,");
                b.line("{},");
            });
            b.line("return NextResponse.json({ id: data?.transaction_id ?? data?.id }, { status: 201 })");
        });
        b.block("catch (err) {", "}", |b| {
            b.line("return errorResponse(err)");
        });
    });

    GeneratedFile::new(ctx.api_route_path("transactions"), FileKind::Api, b.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;
    use crate::middleware::PERMISSIONS;

    #[test]
    fn two_route_files() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let files = generate_api_routes(&ctx);
        let paths: Vec<_> = files.iter().map(|f| f.path.to_string_lossy().into_owned()).collect();
        assert_eq!(
            paths,
            vec![
                "src/app/api/v2/dealer-ops/entities/route.ts",
                "src/app/api/v2/dealer-ops/transactions/route.ts",
            ]
        );
        assert!(files.iter().all(|f| f.kind == FileKind::Api));
    }

    #[test]
    fn entities_route_calls_crud_rpc_with_actor() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_entities_route(&ctx).contents;
        assert!(out.contains("ctx.supabase.rpc('hera_entities_crud_v1', {"));
        assert!(out.contains("p_actor_user_id: ctx.actorUserId,"));
        assert!(out.contains("const ENTITY_TYPES = new Set<string>(['CUSTOMER'])"));
        for method in ["GET", "POST", "PUT", "DELETE"] {
            assert!(out.contains(&format!("export async function {method}(")), "missing {method}");
        }
        assert!(out.contains("number: 'field_value_number',"));
    }

    #[test]
    fn transactions_route_checks_balance_before_rpc() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        let out = generate_transactions_route(&ctx).contents;
        let check = out.find("const balance = checkGlBalance(lines)").unwrap();
        let create = out.find("await callRpc(ctx, 'CREATE',").unwrap();
        assert!(check < create);
        assert!(out.contains("'hera_txn_crud_v1'"));
    }

    #[test]
    fn routes_only_request_known_permissions() {
        let pack = sample_pack();
        let ctx = GenerationContext::new(&pack);
        for file in generate_api_routes(&ctx) {
            for (idx, _) in file.contents.match_indices("requireHeraContext(request, '") {
                let rest = &file.contents[idx + "requireHeraContext(request, '".len()..];
                let perm = &rest[..rest.find('\'').unwrap()];
                assert!(PERMISSIONS.contains(&perm), "unknown permission {perm}");
            }
        }
    }
}

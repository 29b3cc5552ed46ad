//! Seed generation
//!
//! [`generate_seed_plan`] describes the sample data for a pack: one entity
//! per entity type and one balanced transaction per transaction type.
//! [`generate_executable_seeder`] turns the same plan into a standalone
//! script that writes it through the HERA RPCs.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::api::{ENTITIES_RPC, TRANSACTIONS_RPC};
use crate::context::GenerationContext;
use crate::error::GenerateError;
use crate::ledger::{sample_lines, SampleLine};
use crate::pack::{EntityDef, FieldType, LineType, Side, TransactionDef};
use crate::pages::field_label;
use crate::source::{js_string, ts_json, FileKind, GeneratedFile, SourceBuilder};

pub const SEED_SCRIPT_FILE: &str = "seed.ts";
pub const SEED_PLAN_FILE: &str = "seed-plan.json";

/// Sample data written by the generated seeder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedPlan {
    pub app_id: String,
    pub app_smart_code: String,
    pub entities: Vec<SeedEntity>,
    pub transactions: Vec<SeedTransaction>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedEntity {
    pub entity_type: String,
    pub entity_name: String,
    pub smart_code: String,
    /// `p_dynamic` payload keyed by field name.
    pub dynamic: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedTransaction {
    pub transaction_type: String,
    pub smart_code: String,
    pub currency: String,
    pub total_amount: f64,
    pub lines: Vec<SeedLine>,
}

/// One `p_lines` entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeedLine {
    pub line_number: u32,
    pub line_type: LineType,
    pub smart_code: String,
    pub description: String,
    pub quantity: u32,
    pub unit_amount: f64,
    pub line_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    pub currency: String,
}

impl From<SampleLine> for SeedLine {
    fn from(line: SampleLine) -> Self {
        Self {
            line_number: line.line_number,
            line_type: line.line_type,
            smart_code: line.smart_code,
            description: line.name,
            quantity: line.quantity,
            unit_amount: line.amount,
            line_amount: line.amount * f64::from(line.quantity),
            side: line.side,
            currency: line.currency,
        }
    }
}

fn sample_value(field_type: FieldType, label: &str) -> Value {
    match field_type {
        FieldType::Text => json!(format!("Sample {label}")),
        FieldType::Number => json!(1000),
        FieldType::Boolean => json!(true),
    }
}

fn seed_entity(def: &EntityDef) -> SeedEntity {
    let dynamic = def
        .fields
        .iter()
        .map(|f| {
            let mut payload = Map::new();
            payload.insert("field_type".to_string(), json!(f.field_type.as_str()));
            payload.insert(
                f.field_type.value_column().to_string(),
                sample_value(f.field_type, &field_label(f)),
            );
            payload.insert("smart_code".to_string(), json!(f.smart_code));
            (f.name.clone(), Value::Object(payload))
        })
        .collect();

    SeedEntity {
        entity_type: def.entity_type.clone(),
        entity_name: format!("Sample {}", def.entity_name),
        smart_code: def.smart_code.clone(),
        dynamic,
    }
}

fn seed_transaction(def: &TransactionDef, default_currency: &str) -> SeedTransaction {
    let samples = sample_lines(def, default_currency);
    // Posted value: the debit side when the template posts to the ledger,
    // otherwise the sum of the item lines.
    let total_cents: i64 = if def.has_gl_lines() {
        samples
            .iter()
            .filter(|l| l.is_posting() && l.side == Some(Side::Dr))
            .map(|l| (l.amount * 100.0).round() as i64)
            .sum()
    } else {
        samples
            .iter()
            .map(|l| (l.amount * 100.0).round() as i64)
            .sum()
    };

    SeedTransaction {
        transaction_type: def.transaction_type.clone(),
        smart_code: def.smart_code.clone(),
        currency: default_currency.to_string(),
        total_amount: total_cents as f64 / 100.0,
        lines: samples.into_iter().map(SeedLine::from).collect(),
    }
}

pub fn generate_seed_plan(ctx: &GenerationContext<'_>) -> SeedPlan {
    let pack = ctx.pack;
    SeedPlan {
        app_id: pack.app.id.clone(),
        app_smart_code: pack.app.smart_code.clone(),
        entities: pack.entities.iter().map(seed_entity).collect(),
        transactions: pack
            .transactions
            .iter()
            .map(|t| seed_transaction(t, &ctx.currency))
            .collect(),
    }
}

/// The seed plan and the seeder script.
pub fn generate_seed_files(
    ctx: &GenerationContext<'_>,
) -> Result<Vec<GeneratedFile>, GenerateError> {
    let plan = generate_seed_plan(ctx);
    let mut json = serde_json::to_string_pretty(&plan)?;
    json.push('\n');
    Ok(vec![
        generate_executable_seeder_from(ctx, &plan)?,
        GeneratedFile::new(ctx.seed_path(SEED_PLAN_FILE), FileKind::Seed, json),
    ])
}

pub fn generate_executable_seeder(
    ctx: &GenerationContext<'_>,
) -> Result<GeneratedFile, GenerateError> {
    generate_executable_seeder_from(ctx, &generate_seed_plan(ctx))
}

fn generate_executable_seeder_from(
    ctx: &GenerationContext<'_>,
    plan: &SeedPlan,
) -> Result<GeneratedFile, GenerateError> {
    let entities = ts_json(&serde_json::to_value(&plan.entities)?);
    let transactions = ts_json(&serde_json::to_value(&plan.transactions)?);

    let mut b = SourceBuilder::new();
    b.line("#!/usr/bin/env tsx");
    b.lines(SourceBuilder::with_header(&ctx.source_note()).finish().lines());
    b.line("// Usage: tsx seed.ts --org <organization id> --actor <actor user id> [--dry-run]");
    b.line("// Falls back to TEST_ORG_ID / TEST_ACTOR_ID when the flags are omitted.");
    b.blank();
    b.import(&["createClient", "type SupabaseClient"], "@supabase/supabase-js");
    b.blank();

    b.line("const SUPABASE_URL = process.env.SUPABASE_URL");
    b.line("const SUPABASE_SERVICE_ROLE_KEY = process.env.SUPABASE_SERVICE_ROLE_KEY");
    b.block("if (!SUPABASE_URL || !SUPABASE_SERVICE_ROLE_KEY) {", "}", |b| {
        b.line("console.error('❌ SUPABASE_URL and SUPABASE_SERVICE_ROLE_KEY must be set')");
        b.line("process.exit(1)");
    });
    b.blank();

    b.line(format!("const APP_ID = {}", js_string(&plan.app_id)));
    b.line(format!("const ENTITIES = {entities}"));
    b.line(format!("const TRANSACTIONS = {transactions}"));
    b.blank();

    b.block("interface SeedResult {", "}", |b| {
        b.lines([
            "kind: 'entity' | 'transaction'",
            "type: string",
            "success: boolean",
            "id?: string",
            "error?: string",
        ]);
    });
    b.blank();

    b.block("function fail(message: string): never {", "}", |b| {
        b.line("console.error(`❌ ${message}`)");
        b.line("process.exit(1)");
    });
    b.blank();

    b.block(
        "function parseArgs(argv: string[]): { org?: string; actor?: string; dryRun: boolean } {",
        "}",
        |b| {
            b.line("let org = process.env.TEST_ORG_ID");
            b.line("let actor = process.env.TEST_ACTOR_ID");
            b.line("let dryRun = false");
            b.block("for (let i = 0; i < argv.length; i++) {", "}", |b| {
                b.line("const arg = argv[i]");
                b.line("if (arg === '--org') org = argv[++i]");
                b.line("else if (arg.startsWith('--org=')) org = arg.slice('--org='.length)");
                b.line("else if (arg === '--actor') actor = argv[++i]");
                b.line("else if (arg.startsWith('--actor=')) actor = arg.slice('--actor='.length)");
                b.line("else if (arg === '--dry-run') dryRun = true");
                b.line("else fail(`Unknown argument: ${arg}`)");
            });
            b.line("return { org, actor, dryRun }");
        },
    );
    b.blank();

    b.line("/** Abort before any write unless actor, organization and membership all check out. */");
    b.block(
        "async function verifyActorAndOrganization(supabase: SupabaseClient, actorId: string, orgId: string): Promise<void> {",
        "}",
        |b| {
            b.line("const { data: actor, error: actorError } = await supabase.from('core_entities').select('id').eq('id', actorId).maybeSingle()");
            b.line("if (actorError) fail(`Actor lookup failed: ${actorError.message}`)");
            b.line("if (!actor) fail(`Actor ${actorId} not found`)");
            b.blank();
            b.line("const { data: org, error: orgError } = await supabase.from('core_organizations').select('id').eq('id', orgId).maybeSingle()");
            b.line("if (orgError) fail(`Organization lookup failed: ${orgError.message}`)");
            b.line("if (!org) fail(`Organization ${orgId} not found`)");
            b.blank();
            b.line("const { data: membership, error: membershipError } = await supabase");
            b.indented(|b| {
                b.lines([
                    ".from('core_relationships')",
                    ".select('id')",
                    ".eq('from_entity_id', actorId)",
                    ".eq('to_entity_id', orgId)",
                    ".eq('relationship_type', 'MEMBER_OF')",
                    ".maybeSingle()",
                ]);
            });
            b.line("if (membershipError) fail(`Membership lookup failed: ${membershipError.message}`)");
            b.line("if (!membership) fail(`Actor ${actorId} is not a member of organization ${orgId}`)");
        },
    );
    b.blank();

    b.block("function errorMessage(err: unknown): string {", "}", |b| {
        b.line("return err instanceof Error ? err.message : String(err)");
    });
    b.blank();

    b.block(
        "function printSummary(results: SeedResult[], dryRun: boolean): void {",
        "}",
        |b| {
            b.line("const ok = results.filter((r) => r.success).length");
            b.line("console.log(`\\n${dryRun ? '🧪 Dry run' : '🌱 Seed'} summary for ${APP_ID}: ${ok}/${results.length} succeeded`)");
            b.block("for (const r of results) {", "}", |b| {
                b.line("const status = r.success ? '✅' : '❌'");
                b.line("console.log(`  ${status} ${r.kind} ${r.type}${r.id ? ` (${r.id})` : ''}${r.error ? `: ${r.error}` : ''}`)");
            });
        },
    );
    b.blank();

    b.block("async function main(): Promise<void> {", "}", |b| {
        b.line("const { org, actor, dryRun } = parseArgs(process.argv.slice(2))");
        b.line("if (!org || !actor) fail('Provide --org and --actor (or set TEST_ORG_ID and TEST_ACTOR_ID)')");
        b.blank();
        b.line("const supabase = createClient(SUPABASE_URL!, SUPABASE_SERVICE_ROLE_KEY!, { auth: { persistSession: false } })");
        b.line("await verifyActorAndOrganization(supabase, actor, org)");
        b.line("console.log(`✅ Actor ${actor} verified as member of ${org}`)");
        b.blank();
        b.line("const results: SeedResult[] = []");
        b.blank();
        b.block("for (const entity of ENTITIES) {", "}", |b| {
            b.line("const base = { kind: 'entity' as const, type: entity.entity_type }");
            b.block("if (dryRun) {", "}", |b| {
                b.line("results.push({ ...base, success: true })");
                b.line("continue");
            });
            b.block("try {", "}", |b| {
                b.block(
                    format!("const {{ data, error }} = await supabase.rpc({}, {{", js_string(ENTITIES_RPC)),
                    "})",
                    |b| {
                        b.lines([
                            "p_action: 'CREATE',",
                            "p_actor_user_id: actor,",
                            "p_organization_id: org,",
                            "p_entity: { entity_type: entity.entity_type, entity_name: entity.entity_name, smart_code: entity.smart_code },",
                            "p_dynamic: entity.dynamic,",
                            "p_relationships: [],",
                            "p_options: {},",
                        ]);
                    },
                );
                b.line("if (error) throw new Error(error.message)");
                b.line("results.push({ ...base, success: true, id: data?.entity_id })");
            });
            b.block("catch (err) {", "}", |b| {
                b.line("results.push({ ...base, success: false, error: errorMessage(err) })");
            });
        });
        b.blank();
        b.block("for (const txn of TRANSACTIONS) {", "}", |b| {
            b.line("const base = { kind: 'transaction' as const, type: txn.transaction_type }");
            b.block("if (dryRun) {", "}", |b| {
                b.line("results.push({ ...base, success: true })");
                b.line("continue");
            });
            b.block("try {", "}", |b| {
                b.block(
                    format!("const {{ data, error }} = await supabase.rpc({}, {{", js_string(TRANSACTIONS_RPC)),
                    "})",
                    |b| {
                        b.lines([
                            "p_action: 'CREATE',",
                            "p_actor_user_id: actor,",
                            "p_organization_id: org,",
                            "p_transaction: {",
                            "  transaction_type: txn.transaction_type,",
                            "  smart_code: txn.smart_code,",
                            "  transaction_date: new Date().toISOString(),",
                            "  transaction_currency_code: txn.currency,",
                            "  total_amount: txn.total_amount,",
                            "},",
                            "p_lines: txn.lines,",
                            "p_options: {},",
                        ]);
                    },
                );
                b.line("if (error) throw new Error(error.message)");
                b.line("results.push({ ...base, success: true, id: data?.transaction_id })");
            });
            b.block("catch (err) {", "}", |b| {
                b.line("results.push({ ...base, success: false, error: errorMessage(err) })");
            });
        });
        b.blank();
        b.line("printSummary(results, dryRun)");
        b.line("if (results.some((r) => !r.success)) process.exitCode = 1");
    });
    b.blank();
    b.line("main().catch((err) => fail(errorMessage(err)))");

    Ok(GeneratedFile::new(
        ctx.seed_path(SEED_SCRIPT_FILE),
        FileKind::Seed,
        b.finish(),
    ))
}

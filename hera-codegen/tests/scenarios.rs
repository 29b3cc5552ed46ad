//! End-to-end generator scenarios
//!
//! Each test loads a pack from disk the way the CLI does, validates it and
//! inspects the generated bundle.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use hera_codegen::{
    demo_app_pack, generate_all, is_valid, load_app_pack, validate, validate_smart_codes, AppPack,
    FileKind, GeneratedBundle, Severity,
};
use tempfile::TempDir;

const CUSTOMER_PACK: &str = r#"{
  "app": { "id": "dealer-ops", "name": "Dealer Operations", "smart_code": "HERA.AUTO.DEALER.APP.CORE.v1" },
  "entities": [
    {
      "entity_type": "CUSTOMER",
      "entity_name": "Customer",
      "smart_code": "HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1",
      "fields": [
        { "name": "name", "type": "text", "required": true, "smart_code": "HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1" },
        { "name": "credit_limit", "type": "number", "smart_code": "HERA.AUTO.DEALER.FIELD.CUSTOMER.CREDIT_LIMIT.v1" }
      ]
    }
  ]
}"#;

const SALE_PACK: &str = r#"{
  "app": { "id": "dealer-ops", "name": "Dealer Operations", "smart_code": "HERA.AUTO.DEALER.APP.CORE.v1" },
  "entities": [
    {
      "entity_type": "VEHICLE",
      "entity_name": "Vehicle",
      "smart_code": "HERA.AUTO.DEALER.ENTITY.VEHICLE.v1",
      "fields": [
        { "name": "vin", "type": "text", "required": true, "smart_code": "HERA.AUTO.DEALER.FIELD.VEHICLE.VIN.v1" }
      ]
    }
  ],
  "transactions": [
    {
      "transaction_type": "VEHICLE_SALE",
      "transaction_name": "Vehicle Sale",
      "smart_code": "HERA.AUTO.DEALER.TXN.VEHICLE_SALE.v1",
      "lines": [
        { "name": "Vehicle", "smart_code": "HERA.AUTO.DEALER.LINE.VEHICLE.ITEM.v1", "line_type": "PRODUCT" },
        { "name": "Cash", "smart_code": "HERA.AUTO.DEALER.GL.CASH.DEBIT.v1", "line_type": "GL", "account_type": "ASSET", "side": "DR" },
        { "name": "Revenue", "smart_code": "HERA.AUTO.DEALER.GL.REVENUE.CREDIT.v1", "line_type": "GL", "account_type": "REVENUE", "side": "CR" }
      ]
    }
  ]
}"#;

fn load(dir: &Path, json: &str) -> AppPack {
    let path = dir.join("pack.json");
    fs::write(&path, json).unwrap();
    load_app_pack(&path).unwrap()
}

fn file<'a>(bundle: &'a GeneratedBundle, suffix: &str) -> &'a str {
    bundle
        .files
        .iter()
        .find(|f| f.path.ends_with(suffix))
        .map(|f| f.contents.as_str())
        .unwrap_or_else(|| panic!("no generated file ending in {suffix}"))
}

#[test]
fn customer_pack_generates_pages_seed_and_shape_test() {
    let dir = TempDir::new().unwrap();
    let pack = load(dir.path(), CUSTOMER_PACK);
    assert!(is_valid(&pack), "{:?}", validate(&pack));

    let bundle = generate_all(&pack).unwrap();

    // List page and create page.
    let list = file(&bundle, "src/app/dealer-ops/customer/page.tsx");
    assert!(list.contains("credit_limit"), "{list}");
    let create = file(&bundle, "src/app/dealer-ops/customer/new/page.tsx");
    assert!(create.contains("name"));
    assert!(create.contains("credit_limit"));

    // Exactly one seed entry.
    let plan: serde_json::Value =
        serde_json::from_str(file(&bundle, "seeds/dealer-ops/seed-plan.json")).unwrap();
    let entities = plan["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0]["entity_type"], "CUSTOMER");
    assert_eq!(entities[0]["smart_code"], "HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1");

    // One shape assertion for the entity's smart code.
    let tests = file(&bundle, "tests/dealer-ops/smart-codes.test.ts");
    assert_eq!(tests.matches("it('entities[0].smart_code is well-formed'").count(), 1);
    assert!(tests.contains("expect('HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1').toMatch(PATTERN)"));

    assert_eq!(bundle.count(FileKind::Page), 3);
}

#[test]
fn vehicle_sale_balance_test_asserts_equal_totals() {
    let dir = TempDir::new().unwrap();
    let pack = load(dir.path(), SALE_PACK);
    assert!(is_valid(&pack), "{:?}", validate(&pack));

    let bundle = generate_all(&pack).unwrap();
    let tests = file(&bundle, "tests/dealer-ops/gl-balance.test.ts");

    assert!(tests.contains("balances in USD: DR 1000.00 == CR 1000.00"), "{tests}");
    assert!(tests.contains("expect(totals.debit.toFixed(2)).toBe('1000.00')"));
    assert!(tests.contains("expect(totals.credit.toFixed(2)).toBe('1000.00')"));
    assert!(tests.contains("{ line_type: 'GL', side: 'DR', currency: 'USD', line_amount: 1000.00 }, // Cash"));
    assert!(tests.contains("{ line_type: 'GL', side: 'CR', currency: 'USD', line_amount: 1000.00 }, // Revenue"));
}

#[test]
fn one_sided_template_emits_a_failing_balance_expectation() {
    let dir = TempDir::new().unwrap();
    let json = SALE_PACK.replace(
        r#"{ "name": "Revenue", "smart_code": "HERA.AUTO.DEALER.GL.REVENUE.CREDIT.v1", "line_type": "GL", "account_type": "REVENUE", "side": "CR" }"#,
        r#"{ "name": "Tax", "smart_code": "HERA.AUTO.DEALER.GL.TAX.DEBIT.v1", "line_type": "GL", "account_type": "LIABILITY", "side": "DR" }"#,
    );
    let pack = load(dir.path(), &json);

    let bundle = generate_all(&pack).unwrap();
    let tests = file(&bundle, "tests/dealer-ops/gl-balance.test.ts");

    // The sample lines put 1000.00 on DR and nothing on CR; the emitted
    // assertion that they balance will fail under vitest.
    assert!(tests.contains("DR 1000.00 == CR 0.00"), "{tests}");
    assert!(tests.contains("expect(totals.balanced).toBe(true)"));
}

#[test]
fn lowercase_smart_code_is_exactly_one_error() {
    let dir = TempDir::new().unwrap();
    let json = SALE_PACK.replace(
        "HERA.AUTO.DEALER.TXN.VEHICLE_SALE.v1",
        "finance.txn.sale.v1",
    );
    let pack = load(dir.path(), &json);

    let errs = validate_smart_codes(&pack);
    assert_eq!(errs.len(), 1, "{errs:?}");
    assert_eq!(errs[0].location, "transactions[0].smart_code");
    assert!(errs[0].message.contains("finance.txn.sale.v1"));
    assert!(!is_valid(&pack));
}

#[test]
fn seed_script_checks_membership_before_any_write() {
    let dir = TempDir::new().unwrap();
    let pack = load(dir.path(), CUSTOMER_PACK);
    let bundle = generate_all(&pack).unwrap();
    let script = file(&bundle, "seeds/dealer-ops/seed.ts");

    let not_member = script.find("is not a member of organization").unwrap();
    let verify = script
        .find("await verifyActorAndOrganization(supabase, actor, org)")
        .unwrap();
    let first_rpc = script.find(".rpc(").unwrap();
    assert!(not_member < first_rpc);
    assert!(verify < first_rpc);
    assert!(script.contains("process.exit(1)"));
}

#[test]
fn generation_is_deterministic() {
    let dir = TempDir::new().unwrap();
    let pack = load(dir.path(), SALE_PACK);

    let first = generate_all(&pack).unwrap();
    let second = generate_all(&load(dir.path(), SALE_PACK)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn generated_packs_have_no_smart_code_errors() {
    let dir = TempDir::new().unwrap();
    for json in [CUSTOMER_PACK, SALE_PACK] {
        let pack = load(dir.path(), json);
        let errs = validate(&pack);
        assert!(!errs.iter().any(|e| e.severity == Severity::Error), "{errs:?}");
        generate_all(&pack).unwrap();
        assert!(validate_smart_codes(&pack).is_empty());
    }
}

#[test]
fn duplicate_smart_codes_reach_the_uniqueness_test() {
    let dir = TempDir::new().unwrap();
    let json = CUSTOMER_PACK.replace(
        "HERA.AUTO.DEALER.FIELD.CUSTOMER.CREDIT_LIMIT.v1",
        "HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1",
    );
    let pack = load(dir.path(), &json);

    let errs = validate(&pack);
    assert!(
        errs.iter()
            .any(|e| e.message.contains("HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1")),
        "{errs:?}"
    );

    let bundle = generate_all(&pack).unwrap();
    let tests = file(&bundle, "tests/dealer-ops/smart-codes.test.ts");
    // Both locations land in CODES, so `duplicates` is non-empty at runtime.
    assert!(tests.contains("{ location: 'entities[0].fields[0].smart_code', code: 'HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1' },"));
    assert!(tests.contains("{ location: 'entities[0].fields[1].smart_code', code: 'HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1' },"));
    assert!(tests.contains("expect(duplicates).toEqual([])"));
}

fn unique_paths(bundle: &GeneratedBundle) -> usize {
    bundle.files.iter().map(|f| &f.path).collect::<BTreeSet<_>>().len()
}

#[test]
fn colliding_route_names_are_rejected() {
    let mut pack = demo_app_pack();
    for entity_type in ["CUSTOMER_", "__"] {
        let mut extra = pack.entities[0].clone();
        extra.entity_type = entity_type.to_string();
        extra.smart_code = format!("HERA.AUTO.DEALER.ENTITY.EXTRA{}.v1", pack.entities.len());
        extra.fields.clear();
        pack.entities.push(extra);
    }

    let errs = validate(&pack);
    assert!(!is_valid(&pack), "{errs:?}");
    assert!(errs.iter().any(|e| e.location == "entities[2].entity_type"), "{errs:?}");
    assert!(errs.iter().any(|e| e.location == "entities[3].entity_type"), "{errs:?}");

    // Without the checks these packs overwrite their own pages.
    let bundle = generate_all(&pack).unwrap();
    assert!(unique_paths(&bundle) < bundle.len());
}

#[test]
fn valid_packs_never_share_output_paths() {
    let names = [
        ("CUSTOMER", "VEHICLE"),
        ("SalesOrder", "SALES_ORDER"),
        ("sales-order", "SALES__ORDER"),
        ("CUSTOMER", "CUSTOMER_2"),
        ("A1", "A_1"),
    ];
    for (first, second) in names {
        let mut pack = demo_app_pack();
        pack.entities[0].entity_type = first.to_string();
        pack.entities[1].entity_type = second.to_string();
        pack.entities[1].relationships.clear();

        if !is_valid(&pack) {
            continue;
        }
        let bundle = generate_all(&pack).unwrap();
        assert_eq!(
            unique_paths(&bundle),
            bundle.len(),
            "{first} / {second} produced duplicate output paths"
        );
    }

    let mut pack = demo_app_pack();
    pack.entities[1].entity_type = "Customer".to_string();
    assert!(!is_valid(&pack));
}

#[test]
fn repeated_line_names_are_rejected() {
    let mut pack = demo_app_pack();
    let mut cash = pack.transactions[0]
        .lines
        .iter()
        .find(|l| l.name == "Cash")
        .cloned()
        .unwrap();
    cash.smart_code = "HERA.AUTO.DEALER.GL.CASH.DEBIT.v2".to_string();
    pack.transactions[0].lines.push(cash);

    let errs = validate(&pack);
    assert!(
        errs.iter()
            .any(|e| e.severity == Severity::Error && e.message == "duplicate line name 'Cash'"),
        "{errs:?}"
    );
    assert!(!is_valid(&pack));
}

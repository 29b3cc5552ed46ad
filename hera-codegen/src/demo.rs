//! Built-in demo pack for `hera-mvp demo`

use std::collections::BTreeMap;

use crate::pack::{
    AppMeta, AppPack, DashboardConfig, DeploymentConfig, EntityDef, FieldDef, FieldType, LineDef,
    LineType, NavItem, RelationshipDef, Side, TransactionDef, UiConfig, WidgetDef, WidgetKind,
    DEFAULT_API_BASE_PATH,
};

/// File name the demo pack is written to.
pub const DEMO_PACK_FILE: &str = "demo-dealer-ops.json";

/// Directory the demo app is generated into.
pub const DEMO_OUTPUT_DIR: &str = "demo-generated";

fn field(entity: &str, name: &str, field_type: FieldType, required: bool) -> FieldDef {
    FieldDef {
        name: name.to_string(),
        field_type,
        required,
        smart_code: format!(
            "HERA.AUTO.DEALER.FIELD.{entity}.{}.v1",
            name.to_ascii_uppercase()
        ),
        label: None,
    }
}

fn line(
    name: &str,
    line_type: LineType,
    side: Option<Side>,
    account_type: Option<&str>,
    smart_code: &str,
) -> LineDef {
    LineDef {
        name: name.to_string(),
        description: String::new(),
        required: true,
        smart_code: smart_code.to_string(),
        line_type,
        account_type: account_type.map(str::to_string),
        side,
        currency: None,
    }
}

/// A small dealer-operations pack: customers, vehicles and a balanced
/// vehicle sale.
pub fn demo_app_pack() -> AppPack {
    let customer = EntityDef {
        entity_type: "CUSTOMER".to_string(),
        entity_name: "Customer".to_string(),
        description: "Retail and fleet buyers".to_string(),
        smart_code: "HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1".to_string(),
        icon: Some("users".to_string()),
        fields: vec![
            field("CUSTOMER", "name", FieldType::Text, true),
            field("CUSTOMER", "email", FieldType::Text, false),
            field("CUSTOMER", "phone", FieldType::Text, false),
            field("CUSTOMER", "credit_limit", FieldType::Number, false),
            field("CUSTOMER", "is_fleet", FieldType::Boolean, false),
        ],
        relationships: Vec::new(),
    };

    let vehicle = EntityDef {
        entity_type: "VEHICLE".to_string(),
        entity_name: "Vehicle".to_string(),
        description: "Vehicles in stock".to_string(),
        smart_code: "HERA.AUTO.DEALER.ENTITY.VEHICLE.v1".to_string(),
        icon: Some("car".to_string()),
        fields: vec![
            field("VEHICLE", "vin", FieldType::Text, true),
            field("VEHICLE", "make", FieldType::Text, true),
            field("VEHICLE", "model", FieldType::Text, true),
            field("VEHICLE", "year", FieldType::Number, false),
            field("VEHICLE", "list_price", FieldType::Number, false),
        ],
        relationships: vec![RelationshipDef {
            relationship_type: "SOLD_TO".to_string(),
            target_entity: "CUSTOMER".to_string(),
            smart_code: Some("HERA.AUTO.DEALER.REL.VEHICLE.SOLD_TO.v1".to_string()),
        }],
    };

    let sale = TransactionDef {
        transaction_type: "VEHICLE_SALE".to_string(),
        transaction_name: "Vehicle Sale".to_string(),
        smart_code: "HERA.AUTO.DEALER.TXN.VEHICLE_SALE.v1".to_string(),
        category: "sales".to_string(),
        description: "Sale of a vehicle from stock".to_string(),
        lines: vec![
            line(
                "Vehicle",
                LineType::Product,
                None,
                None,
                "HERA.AUTO.DEALER.LINE.VEHICLE.ITEM.v1",
            ),
            line(
                "Cash",
                LineType::Gl,
                Some(Side::Dr),
                Some("ASSET"),
                "HERA.AUTO.DEALER.GL.CASH.DEBIT.v1",
            ),
            line(
                "Revenue",
                LineType::Gl,
                Some(Side::Cr),
                Some("REVENUE"),
                "HERA.AUTO.DEALER.GL.REVENUE.CREDIT.v1",
            ),
        ],
    };

    let roles = BTreeMap::from([
        ("owner".to_string(), vec!["*".to_string()]),
        (
            "sales".to_string(),
            vec![
                "entities:read".to_string(),
                "entities:write".to_string(),
                "transactions:write".to_string(),
            ],
        ),
        ("viewer".to_string(), vec!["entities:read".to_string(), "transactions:read".to_string()]),
    ]);

    AppPack {
        app: AppMeta {
            id: "dealer-ops".to_string(),
            name: "Dealer Operations".to_string(),
            version: "1.0.0".to_string(),
            smart_code: "HERA.AUTO.DEALER.APP.CORE.v1".to_string(),
            description: "Customers, inventory and vehicle sales for a car dealership".to_string(),
            currency: Some("USD".to_string()),
        },
        entities: vec![customer, vehicle],
        transactions: vec![sale],
        ui: UiConfig {
            dashboard: DashboardConfig {
                widgets: vec![
                    WidgetDef {
                        title: "Customers".to_string(),
                        kind: WidgetKind::Count,
                        source: "CUSTOMER".to_string(),
                    },
                    WidgetDef {
                        title: "Vehicles in stock".to_string(),
                        kind: WidgetKind::Count,
                        source: "VEHICLE".to_string(),
                    },
                    WidgetDef {
                        title: "Sales volume".to_string(),
                        kind: WidgetKind::Total,
                        source: "VEHICLE_SALE".to_string(),
                    },
                ],
            },
            navigation: vec![
                NavItem {
                    label: "Customers".to_string(),
                    path: "/dealer-ops/customer".to_string(),
                    icon: Some("users".to_string()),
                },
                NavItem {
                    label: "Inventory".to_string(),
                    path: "/dealer-ops/vehicle".to_string(),
                    icon: Some("car".to_string()),
                },
            ],
        },
        deployment: DeploymentConfig {
            api_base_path: DEFAULT_API_BASE_PATH.to_string(),
            roles,
        },
    }
}

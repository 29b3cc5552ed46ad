//! Shared app pack fixtures for unit tests.

/// Dealer pack: one `CUSTOMER` entity and one balanced `VEHICLE_SALE` transaction.
pub(crate) const SAMPLE_JSON: &str = r#"{
  "app": {
    "id": "dealer-ops",
    "name": "Dealer Operations",
    "version": "1.0.0",
    "smart_code": "HERA.AUTO.DEALER.APP.CORE.v1"
  },
  "entities": [
    {
      "entity_type": "CUSTOMER",
      "entity_name": "Customer",
      "smart_code": "HERA.AUTO.DEALER.ENTITY.CUSTOMER.v1",
      "icon": "users",
      "fields": [
        { "name": "name", "type": "text", "required": true, "smart_code": "HERA.AUTO.DEALER.FIELD.CUSTOMER.NAME.v1" },
        { "name": "credit_limit", "type": "number", "smart_code": "HERA.AUTO.DEALER.FIELD.CUSTOMER.CREDIT_LIMIT.v1" }
      ]
    }
  ],
  "transactions": [
    {
      "transaction_type": "VEHICLE_SALE",
      "transaction_name": "Vehicle Sale",
      "smart_code": "HERA.AUTO.DEALER.TXN.VEHICLE_SALE.v1",
      "category": "sales",
      "lines": [
        { "name": "Vehicle", "smart_code": "HERA.AUTO.DEALER.LINE.VEHICLE.ITEM.v1", "line_type": "PRODUCT" },
        { "name": "Cash", "smart_code": "HERA.AUTO.DEALER.GL.CASH.DEBIT.v1", "line_type": "GL", "account_type": "ASSET", "side": "DR" },
        { "name": "Revenue", "smart_code": "HERA.AUTO.DEALER.GL.REVENUE.CREDIT.v1", "line_type": "GL", "account_type": "REVENUE", "side": "CR" }
      ]
    }
  ],
  "deployment": { "roles": { "owner": ["*"], "sales": ["entities:read", "transactions:write"] } }
}"#;

pub(crate) fn sample_pack() -> crate::AppPack {
    crate::AppPack::from_json(SAMPLE_JSON).unwrap()
}

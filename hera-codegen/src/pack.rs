//! App pack types and parsers
//!
//! Deserialises an app pack JSON (or TOML) document into [`AppPack`].
//! The pack is read once per generation run and never mutated afterwards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PackError;

/// Default API mount point for generated route handlers.
pub const DEFAULT_API_BASE_PATH: &str = "/api/v2";

/// Currency used for sample amounts when neither the app nor the line sets one.
pub const DEFAULT_CURRENCY: &str = "USD";

// ── Top-level pack ───────────────────────────────────────────────────────────

/// The full contents of an app pack file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPack {
    pub app: AppMeta,
    #[serde(default)]
    pub entities: Vec<EntityDef>,
    #[serde(default)]
    pub transactions: Vec<TransactionDef>,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub deployment: DeploymentConfig,
}

impl AppPack {
    /// Parse from a JSON string. Does not check required fields.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Parse from a TOML string. Does not check required fields.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialise to pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the schema requirements every generator relies on.
    ///
    /// `app.id` and `app.smart_code` must be non-empty and at least one
    /// entity must be declared.
    pub fn check_required(&self) -> Result<(), PackError> {
        if self.app.id.trim().is_empty() {
            return Err(PackError::MissingField("app.id"));
        }
        if self.app.smart_code.trim().is_empty() {
            return Err(PackError::MissingField("app.smart_code"));
        }
        if self.entities.is_empty() {
            return Err(PackError::NoEntities);
        }
        Ok(())
    }

    /// Look up an entity definition by its `entity_type`.
    pub fn entity(&self, entity_type: &str) -> Option<&EntityDef> {
        self.entities.iter().find(|e| e.entity_type == entity_type)
    }

    /// Currency applied to lines that do not declare one.
    pub fn currency(&self) -> &str {
        self.app.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }
}

// ── App block ────────────────────────────────────────────────────────────────

/// `app` block: identity and versioning of the generated application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppMeta {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub smart_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// ISO currency code for sample amounts, e.g. `"USD"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

// ── Entities ─────────────────────────────────────────────────────────────────

/// One `entities[]` entry. Produces a list page, a create page, a seed
/// entry and smart-code test cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Upper snake identifier, e.g. `CUSTOMER`.
    pub entity_type: String,
    pub entity_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    pub smart_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<RelationshipDef>,
}

/// One `entities[].fields[]` entry, stored as dynamic data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// snake_case field name, e.g. `credit_limit`.
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    pub smart_code: String,
    /// Display label; derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Dynamic field value kinds supported by the generated forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Boolean,
}

impl FieldType {
    /// Lower-case name, as written in the pack.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// TypeScript type of the field value in generated code.
    pub fn ts_type(self) -> &'static str {
        match self {
            FieldType::Text => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
        }
    }

    /// Dynamic-data column the value is persisted in.
    pub fn value_column(self) -> &'static str {
        match self {
            FieldType::Text => "field_value_text",
            FieldType::Number => "field_value_number",
            FieldType::Boolean => "field_value_boolean",
        }
    }
}

/// One `entities[].relationships[]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipDef {
    /// e.g. `ASSIGNED_TO`.
    pub relationship_type: String,
    /// `entity_type` of the related entity.
    pub target_entity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smart_code: Option<String>,
}

// ── Transactions ─────────────────────────────────────────────────────────────

/// One `transactions[]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDef {
    /// Upper snake identifier, e.g. `VEHICLE_SALE`.
    pub transaction_type: String,
    pub transaction_name: String,
    pub smart_code: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub category: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub lines: Vec<LineDef>,
}

impl TransactionDef {
    /// `true` if any line posts to the general ledger.
    pub fn has_gl_lines(&self) -> bool {
        self.lines.iter().any(|l| l.line_type == LineType::Gl)
    }

    /// GL lines on the given side.
    pub fn gl_lines(&self, side: Side) -> impl Iterator<Item = &LineDef> {
        self.lines
            .iter()
            .filter(move |l| l.line_type == LineType::Gl && l.side == Some(side))
    }
}

/// One `transactions[].lines[]` template entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineDef {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    pub smart_code: String,
    pub line_type: LineType,
    /// Chart-of-accounts class, e.g. `ASSET`, `REVENUE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    /// Required for GL lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side: Option<Side>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

/// Transaction line classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LineType {
    Product,
    Service,
    Gl,
    Tax,
    Discount,
    Fee,
    #[serde(other)]
    Other,
}

impl LineType {
    pub fn as_str(self) -> &'static str {
        match self {
            LineType::Product => "PRODUCT",
            LineType::Service => "SERVICE",
            LineType::Gl => "GL",
            LineType::Tax => "TAX",
            LineType::Discount => "DISCOUNT",
            LineType::Fee => "FEE",
            LineType::Other => "OTHER",
        }
    }
}

/// Ledger side of a GL line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Dr,
    Cr,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Dr => "DR",
            Side::Cr => "CR",
        }
    }
}

// ── UI ───────────────────────────────────────────────────────────────────────

/// `ui` block: dashboard widgets and navigation entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub navigation: Vec<NavItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub widgets: Vec<WidgetDef>,
}

/// A dashboard stat card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetDef {
    pub title: String,
    /// `COUNT` over an entity type, or `TOTAL` over a transaction type.
    #[serde(rename = "type", default = "default_widget_kind")]
    pub kind: WidgetKind,
    /// `entity_type` or `transaction_type` the widget aggregates.
    pub source: String,
}

fn default_widget_kind() -> WidgetKind {
    WidgetKind::Count
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WidgetKind {
    Count,
    Total,
}

/// One navigation link on the overview page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

// ── Deployment ───────────────────────────────────────────────────────────────

/// `deployment` block: API mount point and role permission matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default = "default_api_base_path")]
    pub api_base_path: String,
    /// Role name → permission strings, e.g. `"sales" → ["entities:read"]`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub roles: BTreeMap<String, Vec<String>>,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            api_base_path: default_api_base_path(),
            roles: BTreeMap::new(),
        }
    }
}

fn default_api_base_path() -> String {
    DEFAULT_API_BASE_PATH.to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

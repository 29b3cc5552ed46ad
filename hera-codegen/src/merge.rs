//! Config merger
//!
//! Applies an optional overlay on top of a base pack. The merge is shallow:
//! each top-level key present in the overlay replaces the base value as a
//! whole. `entities` and `transactions` are replaced, never merged per item.

use serde::{Deserialize, Serialize};

use crate::pack::{AppMeta, AppPack, DeploymentConfig, EntityDef, TransactionDef, UiConfig};

/// An app pack where every top-level key is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppPackOverlay {
    #[serde(default)]
    pub app: Option<AppMeta>,
    #[serde(default)]
    pub entities: Option<Vec<EntityDef>>,
    #[serde(default)]
    pub transactions: Option<Vec<TransactionDef>>,
    #[serde(default)]
    pub ui: Option<UiConfig>,
    #[serde(default)]
    pub deployment: Option<DeploymentConfig>,
}

/// Merge `overlay` into `base`; overlay wins for every key it sets.
pub fn merge_config(base: AppPack, overlay: Option<AppPackOverlay>) -> AppPack {
    let Some(overlay) = overlay else {
        return base;
    };

    AppPack {
        app: overlay.app.unwrap_or(base.app),
        entities: overlay.entities.unwrap_or(base.entities),
        transactions: overlay.transactions.unwrap_or(base.transactions),
        ui: overlay.ui.unwrap_or(base.ui),
        deployment: overlay.deployment.unwrap_or(base.deployment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::sample_pack;

    #[test]
    fn no_overlay_returns_base() {
        let base = sample_pack();
        assert_eq!(merge_config(base.clone(), None), base);
    }

    #[test]
    fn empty_overlay_returns_base() {
        let base = sample_pack();
        assert_eq!(
            merge_config(base.clone(), Some(AppPackOverlay::default())),
            base
        );
    }

    #[test]
    fn overlay_replaces_app_block_wholesale() {
        let base = sample_pack();
        let overlay = AppPackOverlay {
            app: Some(AppMeta {
                id: "dealer-ops-eu".to_string(),
                smart_code: "HERA.AUTO.DEALER.APP.EU.v2".to_string(),
                ..AppMeta::default()
            }),
            ..AppPackOverlay::default()
        };
        let merged = merge_config(base, Some(overlay));
        assert_eq!(merged.app.id, "dealer-ops-eu");
        // Not deep-merged: the base name is gone.
        assert!(merged.app.name.is_empty());
    }

    #[test]
    fn overlay_replaces_entities_array() {
        let base = sample_pack();
        let mut vehicle = base.entities[0].clone();
        vehicle.entity_type = "VEHICLE".to_string();
        let overlay = AppPackOverlay {
            entities: Some(vec![vehicle]),
            ..AppPackOverlay::default()
        };
        let merged = merge_config(base.clone(), Some(overlay));
        assert_eq!(merged.entities.len(), 1);
        assert_eq!(merged.entities[0].entity_type, "VEHICLE");
        assert_eq!(merged.transactions, base.transactions);
    }

    #[test]
    fn overlay_can_clear_transactions() {
        let overlay = AppPackOverlay {
            transactions: Some(Vec::new()),
            ..AppPackOverlay::default()
        };
        let merged = merge_config(sample_pack(), Some(overlay));
        assert!(merged.transactions.is_empty());
    }
}

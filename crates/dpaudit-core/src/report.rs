//! Cross-cutting view over an inspected backup: actions regrouped by
//! functional category instead of by containment.

use crate::category::Category;
use crate::model::{ActionRecord, BackupInfo, GatewayInfo};
use indexmap::IndexMap;
use serde::Serialize;

/// Where an action is wired in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayRef {
    pub name: String,
    pub domain: String,
}

/// One distinct action occurrence, keyed by `"<policy>/<action>"` in the
/// grouped output. The same policy attached to several gateways yields one
/// entry with several gateway references.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    pub info: ActionRecord,
    pub gateways: Vec<GatewayRef>,
}

pub type CategoryGroups = IndexMap<Category, IndexMap<String, CategoryEntry>>;

/// Regroup every action in the backup by category. Both levels keep
/// first-seen traversal order: a category appears when its first action is
/// encountered, entries within it likewise.
pub fn group_by_category(backup: &BackupInfo) -> CategoryGroups {
    let mut groups = CategoryGroups::new();

    for (domain_name, domain) in &backup.domains {
        for gateways in [&domain.mpgs, &domain.wsps] {
            for (gateway_name, gateway) in gateways {
                collect_gateway(&mut groups, domain_name, gateway_name, gateway);
            }
        }
    }

    groups
}

fn collect_gateway(
    groups: &mut CategoryGroups,
    domain_name: &str,
    gateway_name: &str,
    gateway: &GatewayInfo,
) {
    for (policy_name, policy) in &gateway.policy {
        for rule in policy.rules.values() {
            for action in &rule.actions {
                let category = action
                    .type_key()
                    .map(Category::of_type_key)
                    .unwrap_or(Category::Other);
                let key = format!("{policy_name}/{}", action.name);
                let entry = groups
                    .entry(category)
                    .or_default()
                    .entry(key)
                    .or_insert_with(|| CategoryEntry {
                        direction: rule.direction.clone(),
                        info: action.clone(),
                        gateways: Vec::new(),
                    });
                let gateway_ref = GatewayRef {
                    name: gateway_name.to_string(),
                    domain: domain_name.to_string(),
                };
                if !entry.gateways.contains(&gateway_ref) {
                    entry.gateways.push(gateway_ref);
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

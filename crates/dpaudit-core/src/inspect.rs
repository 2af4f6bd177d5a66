//! Traversal of the containment hierarchy: backup → domain → gateway →
//! policy → rule → action.
//!
//! Traversal is top-down, values flow bottom-up. Every recoverable problem
//! (unresolvable action kind, missing domain archive, a failing domain) is
//! handled where it is detected: the affected unit contributes nothing and
//! its siblings are unaffected. Only an unreadable top-level archive is
//! fatal.

use crate::archive::Archive;
use crate::error::Result;
use crate::extract;
use crate::kind::ActionKind;
use crate::model::{
    ActionRecord, BackupInfo, DomainInfo, GatewayInfo, MatchInfo, MatchOperator, PolicyInfo,
    RuleInfo,
};
use crate::resolve;
use crate::xml::{Document, Element};
use indexmap::IndexMap;
use std::path::Path;
use tracing::{info, warn};

/// Conditional nesting in real exports is shallow; past this depth the
/// branch is assumed cyclic and truncated with a warning.
const MAX_CONDITIONAL_DEPTH: usize = 8;

// ---------------------------------------------------------------------------
// Gateway flavors
// ---------------------------------------------------------------------------

/// The two gateway hierarchies share one walker; only the element names
/// differ. Both gateway kinds name their policy through a `StylePolicy`
/// child; what differs is the element kind the name resolves against.
struct GatewayFlavor {
    gateway_tag: &'static str,
    policy_ref_tag: &'static str,
    policy_def_tag: &'static str,
    rule_tag: &'static str,
}

const MPG: GatewayFlavor = GatewayFlavor {
    gateway_tag: "MultiProtocolGateway",
    policy_ref_tag: "StylePolicy",
    policy_def_tag: "StylePolicy",
    rule_tag: "StylePolicyRule",
};

const WSP: GatewayFlavor = GatewayFlavor {
    gateway_tag: "WSGateway",
    policy_ref_tag: "StylePolicy",
    policy_def_tag: "WSStylePolicy",
    rule_tag: "WSStylePolicyRule",
};

// ---------------------------------------------------------------------------
// Action resolution
// ---------------------------------------------------------------------------

/// Resolve one action reference into zero or more output records. Public
/// entry point used by the rule walker and re-entered by conditional
/// expansion.
pub fn inspect_rule_action(
    doc: &Document,
    action_name: &str,
    rule_name: &str,
) -> Vec<ActionRecord> {
    inspect_action_at(doc, action_name, rule_name, 0)
}

fn inspect_action_at(
    doc: &Document,
    action_name: &str,
    rule_name: &str,
    depth: usize,
) -> Vec<ActionRecord> {
    let Some(node) = doc.config_named("StylePolicyAction", action_name) else {
        warn!("action definition not found: {action_name}");
        return Vec::new();
    };

    let hint = node
        .child_text("Type")
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let Some(kind) = resolve::resolve(action_name, rule_name, hint.as_deref()) else {
        let tried = last_tried_type(action_name, rule_name, hint.as_deref());
        warn!("unknown policy rule action of type: {tried}");
        return Vec::new();
    };

    if kind == ActionKind::Conditional {
        return expand_conditional(doc, node, rule_name, depth);
    }

    let bags = extract::extract(kind, node);
    bags.into_iter()
        .map(|mut bag| {
            extract::apply_common_fields(&mut bag, node);
            ActionRecord::new(kind, action_name, bag)
        })
        .collect()
}

/// The type name a failed resolution is reported under: the subtype hint
/// when a fallback lookup was attempted, otherwise the identifier-derived
/// alias.
fn last_tried_type(action_name: &str, rule_name: &str, hint: Option<&str>) -> String {
    let alias = resolve::type_alias(action_name, rule_name);
    match hint {
        Some(hint) if hint != alias => hint.to_string(),
        _ => alias,
    }
}

/// Expand a conditional action: each branch names a follow-up action which
/// is resolved through the same entry point; non-empty results are
/// concatenated in branch order. A branch resolving to nothing is not an
/// error.
fn expand_conditional(
    doc: &Document,
    node: &Element,
    rule_name: &str,
    depth: usize,
) -> Vec<ActionRecord> {
    if depth >= MAX_CONDITIONAL_DEPTH {
        let name = node.name().unwrap_or("<unnamed>");
        warn!("conditional action {name} nested deeper than {MAX_CONDITIONAL_DEPTH} levels, truncating (cycle?)");
        return Vec::new();
    }

    let mut records = Vec::new();
    for condition in node.children("Condition") {
        let Some(target) = condition.child_text("ConditionAction").filter(|t| !t.is_empty())
        else {
            continue;
        };
        records.extend(inspect_action_at(doc, target, rule_name, depth + 1));
    }
    records
}

// ---------------------------------------------------------------------------
// Rule level
// ---------------------------------------------------------------------------

fn inspect_match(doc: &Document, match_name: &str) -> Option<MatchInfo> {
    let matching = doc.config_named("Matching", match_name)?;

    let operator = if matching.child_text("CombineWithOr") == Some("on") {
        MatchOperator::Or
    } else {
        MatchOperator::And
    };

    let rules = matching
        .children("MatchRules")
        .map(|match_rule| {
            let mut captured = IndexMap::new();
            for field in match_rule.all_children() {
                let value = field.text();
                if value.is_empty() {
                    continue;
                }
                captured.insert(field.tag.to_lowercase(), value.to_string());
            }
            captured
        })
        .collect();

    Some(MatchInfo { operator, rules })
}

fn inspect_rule(
    doc: &Document,
    policy_map: &Element,
    rule_name: &str,
    flavor: &GatewayFlavor,
) -> RuleInfo {
    let mut condition = IndexMap::new();
    if let Some(match_name) = policy_map.child_text("Match").filter(|m| !m.is_empty()) {
        if let Some(info) = inspect_match(doc, match_name) {
            condition.insert(match_name.to_string(), info);
        } else {
            warn!("matching definition not found: {match_name}");
        }
    }

    let rule_node = doc.config_named(flavor.rule_tag, rule_name);
    let direction = rule_node
        .and_then(|r| r.child_text("Direction"))
        .filter(|d| !d.is_empty())
        .map(str::to_string);

    let mut actions = Vec::new();
    if let Some(rule_node) = rule_node {
        for action_ref in rule_node.children("Actions") {
            let action_name = action_ref.text();
            if action_name.is_empty() {
                continue;
            }
            actions.extend(inspect_rule_action(doc, action_name, rule_name));
        }
    } else {
        warn!("rule definition not found: {rule_name}");
    }

    RuleInfo {
        direction,
        condition,
        actions,
    }
}

// ---------------------------------------------------------------------------
// Policy and gateway levels
// ---------------------------------------------------------------------------

fn inspect_policy(doc: &Document, policy_node: &Element, flavor: &GatewayFlavor) -> PolicyInfo {
    let mut rules = IndexMap::new();
    for policy_map in policy_node.children("PolicyMaps") {
        let Some(rule_name) = policy_map.child_text("Rule").filter(|r| !r.is_empty()) else {
            continue;
        };
        let rule_info = inspect_rule(doc, policy_map, rule_name, flavor);
        // A rule whose actions all resolved to nothing is dropped entirely.
        if rule_info.actions.is_empty() {
            continue;
        }
        rules.insert(rule_name.to_string(), rule_info);
    }
    PolicyInfo { rules }
}

fn inspect_gateway(doc: &Document, gateway: &Element, flavor: &GatewayFlavor) -> GatewayInfo {
    let gateway_type = gateway
        .child_text("Type")
        .unwrap_or_default()
        .to_string();

    let mut policy = IndexMap::new();
    if let Some(policy_name) = gateway
        .child_text(flavor.policy_ref_tag)
        .filter(|p| !p.is_empty())
    {
        match doc.config_named(flavor.policy_def_tag, policy_name) {
            Some(policy_node) => {
                policy.insert(
                    policy_name.to_string(),
                    inspect_policy(doc, policy_node, flavor),
                );
            }
            None => warn!("policy definition not found: {policy_name}"),
        }
    }

    GatewayInfo {
        gateway_type,
        policy,
    }
}

// ---------------------------------------------------------------------------
// Domain and backup levels
// ---------------------------------------------------------------------------

/// Inspect one domain's already-parsed export document.
pub fn inspect_domain_document(doc: &Document) -> DomainInfo {
    let mut info = DomainInfo::default();

    for gateway in doc.config_elements(MPG.gateway_tag) {
        let Some(name) = gateway.name() else { continue };
        info.mpgs
            .insert(name.to_string(), inspect_gateway(doc, gateway, &MPG));
    }
    for gateway in doc.config_elements(WSP.gateway_tag) {
        let Some(name) = gateway.name() else { continue };
        info.wsps
            .insert(name.to_string(), inspect_gateway(doc, gateway, &WSP));
    }

    info
}

/// Inspect one domain's sub-archive (a zip holding its own `export.xml`).
pub fn inspect_domain_archive(zip_bytes: &[u8]) -> Result<DomainInfo> {
    let archive = Archive::from_bytes(zip_bytes)?;
    let doc = Document::parse(archive.member_text("export.xml")?)?;
    Ok(inspect_domain_document(&doc))
}

/// Inspect a whole backup archive already in memory.
pub fn inspect_backup_bytes(bytes: &[u8]) -> Result<BackupInfo> {
    let archive = Archive::from_bytes(bytes)?;
    inspect_archive(&archive)
}

/// Top-level entry point: open and inspect a backup archive from disk.
/// Everything below the archive open is recoverable per spec — a broken or
/// missing domain is skipped with a warning.
pub fn inspect_backup(path: &Path) -> Result<BackupInfo> {
    let archive = Archive::open(path)?;
    inspect_archive(&archive)
}

fn inspect_archive(archive: &Archive) -> Result<BackupInfo> {
    let doc = Document::parse(archive.member_text("export.xml")?)?;

    let mut backup = BackupInfo::default();
    for domain_name in doc.domain_names() {
        let member = format!("{domain_name}.zip");
        let Some(bytes) = archive.member(&member) else {
            warn!("could not find {member} inside the backup, skipping this domain");
            continue;
        };
        match inspect_domain_archive(bytes) {
            Ok(domain_info) => {
                info!(
                    "inspected domain {domain_name}: {} gateway(s)",
                    domain_info.mpgs.len() + domain_info.wsps.len()
                );
                backup.domains.insert(domain_name, domain_info);
            }
            Err(err) => warn!("skipping domain {domain_name}: {err}"),
        }
    }
    Ok(backup)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

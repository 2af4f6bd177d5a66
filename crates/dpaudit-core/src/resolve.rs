use crate::kind::ActionKind;
use regex::Regex;
use std::sync::OnceLock;

fn uniqueness_suffix() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"_\d+$").expect("static pattern"))
}

/// The type alias embedded in an action identifier: the identifier with the
/// owning rule's `"<rule>_"` prefix and any auto-generated `"_<n>"`
/// uniqueness suffix stripped.
pub fn type_alias(action_name: &str, rule_name: &str) -> String {
    let prefix = format!("{rule_name}_");
    let alias = action_name.strip_prefix(&prefix).unwrap_or(action_name);
    uniqueness_suffix().replace(alias, "").into_owned()
}

/// Resolve an action reference to its canonical kind.
///
/// Two-stage: the alias derived from the identifier is looked up first
/// (hyphens normalized to underscores inside the lookup); on a miss, the
/// lower-cased `Type` hint embedded in the node is tried, provided it
/// differs from the alias. `None` means the action contributes no record —
/// the caller warns and moves on.
pub fn resolve(
    action_name: &str,
    rule_name: &str,
    subtype_hint: Option<&str>,
) -> Option<ActionKind> {
    let alias = type_alias(action_name, rule_name);
    if let Some(kind) = ActionKind::lookup(&alias) {
        return Some(kind);
    }
    match subtype_hint {
        Some(hint) if hint != alias => ActionKind::lookup(hint),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::kind::ActionKind;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// One stylesheet parameter, captured verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
    pub name: Option<String>,
    pub value: Option<String>,
}

/// A single extracted field. Almost always text; `validate` can emit a
/// boolean flag and the shared post-processing attaches a parameter list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Flag(bool),
    Params(Vec<Param>),
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Flag(v)
    }
}

/// Ordered attribute map produced by one extractor call.
pub type FieldBag = IndexMap<String, FieldValue>;

// ---------------------------------------------------------------------------
// ActionRecord
// ---------------------------------------------------------------------------

/// Output unit for one resolved action. Serialized keyed by its canonical
/// type — `{ "xform": { "name": ..., ...fields } }` — or flat when no kind
/// was resolved (which does not occur for registered kinds).
#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub kind: Option<ActionKind>,
    pub name: String,
    pub fields: FieldBag,
}

impl ActionRecord {
    pub fn new(kind: ActionKind, name: impl Into<String>, fields: FieldBag) -> Self {
        Self {
            kind: Some(kind),
            name: name.into(),
            fields,
        }
    }

    /// The string key this record is grouped and displayed under.
    pub fn type_key(&self) -> Option<&'static str> {
        self.kind.map(ActionKind::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }
}

struct RecordBody<'a>(&'a ActionRecord);

impl Serialize for RecordBody<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1 + self.0.fields.len()))?;
        map.serialize_entry("name", &self.0.name)?;
        for (key, value) in &self.0.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for ActionRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.kind {
            Some(kind) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(kind.as_str(), &RecordBody(self))?;
                map.end()
            }
            None => RecordBody(self).serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// Match capture
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOperator {
    And,
    Or,
}

/// Verbatim capture of a matching definition; never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInfo {
    pub operator: MatchOperator,
    pub rules: Vec<IndexMap<String, String>>,
}

// ---------------------------------------------------------------------------
// Containment hierarchy
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RuleInfo {
    pub direction: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub condition: IndexMap<String, MatchInfo>,
    pub actions: Vec<ActionRecord>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PolicyInfo {
    pub rules: IndexMap<String, RuleInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GatewayInfo {
    #[serde(rename = "type")]
    pub gateway_type: String,
    pub policy: IndexMap<String, PolicyInfo>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DomainInfo {
    pub mpgs: IndexMap<String, GatewayInfo>,
    pub wsps: IndexMap<String, GatewayInfo>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BackupInfo {
    pub domains: IndexMap<String, DomainInfo>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn bag(entries: &[(&str, &str)]) -> FieldBag {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect()
    }

    #[test]
    fn record_serializes_keyed_by_type() {
        let record = ActionRecord::new(
            ActionKind::Setvar,
            "rule_setvar_0",
            bag(&[("var", "var://context/x"), ("val", "1")]),
        );
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "setvar": { "name": "rule_setvar_0", "var": "var://context/x", "val": "1" }
            })
        );
    }

    #[test]
    fn record_without_kind_serializes_flat() {
        let record = ActionRecord {
            kind: None,
            name: "odd".to_string(),
            fields: bag(&[("rule", "r1")]),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json, serde_json::json!({ "name": "odd", "rule": "r1" }));
    }

    #[test]
    fn record_preserves_field_order() {
        let record = ActionRecord::new(
            ActionKind::Log,
            "a",
            bag(&[("log_type", "t"), ("log_level", "l"), ("destination", "d")]),
        );
        let yaml = serde_yaml::to_string(&record).unwrap();
        let name_at = yaml.find("name").unwrap();
        let type_at = yaml.find("log_type").unwrap();
        let level_at = yaml.find("log_level").unwrap();
        let dest_at = yaml.find("destination").unwrap();
        assert!(name_at < type_at && type_at < level_at && level_at < dest_at);
    }

    #[test]
    fn flag_and_params_values() {
        let mut fields = FieldBag::new();
        fields.insert("with_schema_attribute".into(), FieldValue::from(true));
        fields.insert(
            "params".into(),
            FieldValue::Params(vec![Param {
                name: Some("p".into()),
                value: Some("v".into()),
            }]),
        );
        let record = ActionRecord::new(ActionKind::Validate, "v0", fields);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["validate"]["with_schema_attribute"], true);
        assert_eq!(json["validate"]["params"][0]["name"], "p");
    }

    #[test]
    fn match_operator_spelling() {
        let info = MatchInfo {
            operator: MatchOperator::Or,
            rules: Vec::new(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["operator"], "or");
    }

    #[test]
    fn rule_without_direction_still_emits_the_key() {
        let info = RuleInfo {
            direction: None,
            condition: IndexMap::new(),
            actions: Vec::new(),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert!(json.as_object().unwrap().contains_key("direction"));
        assert_eq!(json["direction"], serde_json::Value::Null);
    }

    #[test]
    fn gateway_type_field_renamed() {
        let gw = GatewayInfo {
            gateway_type: "dynamic-backend".to_string(),
            policy: IndexMap::new(),
        };
        let json = serde_json::to_value(&gw).unwrap();
        assert_eq!(json["type"], "dynamic-backend");
    }
}

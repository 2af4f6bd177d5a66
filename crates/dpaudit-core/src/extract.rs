//! Per-kind field extraction.
//!
//! Each registered kind maps to one routine that reads a fixed set of child
//! elements from the action node into a [`FieldBag`]. Dispatch is a static
//! match on [`ActionKind`]; `conditional` is not a leaf extractor and is
//! expanded by the engine (see [`crate::inspect`]).

use crate::kind::ActionKind;
use crate::model::{FieldBag, FieldValue, Param};
use crate::xml::Element;

// ---------------------------------------------------------------------------
// Shared field helpers
// ---------------------------------------------------------------------------

/// Text of a child element, treating present-but-empty the same as absent.
fn text_of(node: &Element, tag: &str) -> Option<String> {
    match node.child_text(tag) {
        Some(v) if !v.is_empty() => Some(v.to_string()),
        _ => None,
    }
}

/// Copy a child element's text into the bag under `key`, if present.
fn put(bag: &mut FieldBag, node: &Element, tag: &str, key: &str) {
    if let Some(v) = text_of(node, tag) {
        bag.insert(key.to_string(), FieldValue::Text(v));
    }
}

/// Transform document reference plus the transform-language field shared by
/// the transform family. The language is only meaningful when it differs
/// from the `none`/`default` sentinels.
fn put_xform_fields(bag: &mut FieldBag, node: &Element) {
    put(bag, node, "Transform", "xslt");
    if let Some(lang) = text_of(node, "TransformLanguage") {
        if lang != "none" && lang != "default" {
            bag.insert("transform_lang".to_string(), FieldValue::Text(lang));
        }
    }
}

/// Dynamic stylesheet reference; its `class` attribute is read but not part
/// of the output contract.
fn put_dynamic_stylesheet(bag: &mut FieldBag, node: &Element) {
    if let Some(dynamic_xslt) = text_of(node, "DynamicStylesheet") {
        let _class = node.child_attr("DynamicStylesheet", "class");
        bag.insert("dynamic_xslt".to_string(), FieldValue::Text(dynamic_xslt));
    }
}

// ---------------------------------------------------------------------------
// Registry dispatch
// ---------------------------------------------------------------------------

/// Run the extractor registered for `kind` over one action node. Zero, one,
/// or several field bags may come back; no-op kinds always yield zero.
pub fn extract(kind: ActionKind, node: &Element) -> Vec<FieldBag> {
    let mut bag = FieldBag::new();
    match kind {
        ActionKind::Xform | ActionKind::Xformpi => {
            put_xform_fields(&mut bag, node);
            put(&mut bag, node, "Policy", "url_rewrite_policy");
        }
        ActionKind::Xformbin => {
            put_xform_fields(&mut bag, node);
            put(&mut bag, node, "TxMap", "itx_map_file");
            put(&mut bag, node, "TxMode", "itx_map_mode");
            put(&mut bag, node, "TxTopLevelMap", "itx_top_level_map");
            // Element name as found in exports; do not "correct" it.
            put(&mut bag, node, "PoTxAuditLoglicy", "itx_audit_log");
            put(&mut bag, node, "Policy", "url_rewrite_policy");
        }
        ActionKind::Xformng => {
            put(&mut bag, node, "InputLanguage", "input_lang");
            put(&mut bag, node, "InputDescriptor", "input_descriptor");
            if let Some(output_lang) = text_of(node, "OutputLanguage") {
                if output_lang != "default" {
                    bag.insert("output_lang".to_string(), FieldValue::Text(output_lang));
                }
            }
            // The transform document only applies to xquery transforms and
            // is surfaced under a different key than the xslt family.
            if text_of(node, "TransformLanguage").as_deref() == Some("xquery") {
                put(&mut bag, node, "Transform", "xquery");
            }
            put(&mut bag, node, "Policy", "url_rewrite_policy");
        }
        ActionKind::Filter | ActionKind::Antivirus | ActionKind::Sign | ActionKind::Verify => {
            put_xform_fields(&mut bag, node);
        }
        ActionKind::Encrypt | ActionKind::Decrypt | ActionKind::RouteAction => {
            put_xform_fields(&mut bag, node);
            put_dynamic_stylesheet(&mut bag, node);
        }
        ActionKind::RouteSet => {
            put_xform_fields(&mut bag, node);
            put(&mut bag, node, "Destination", "destination");
        }
        ActionKind::Validate => {
            // Mutually exclusive references, fixed priority order. Exactly
            // one of the five outcomes (or the bare-schema flag) applies.
            if let Some(xsd) = text_of(node, "SchemaURL") {
                bag.insert("xsd".to_string(), FieldValue::Text(xsd));
            } else if let Some(wsdl) = text_of(node, "WsdlURL") {
                bag.insert("wsdl".to_string(), FieldValue::Text(wsdl));
            } else if let Some(json) = text_of(node, "JSONSchemaURL") {
                bag.insert("json".to_string(), FieldValue::Text(json));
            } else if let Some(policy) = text_of(node, "Policy") {
                bag.insert("url_rewrite_policy".to_string(), FieldValue::Text(policy));
            } else if let Some(dynamic_xsd) = text_of(node, "DynamicSchema") {
                let _class = node.child_attr("DynamicSchema", "class");
                bag.insert("dynamic_xsd".to_string(), FieldValue::Text(dynamic_xsd));
            } else {
                bag.insert("with_schema_attribute".to_string(), FieldValue::Flag(true));
            }
        }
        ActionKind::Setvar => {
            put(&mut bag, node, "Variable", "var");
            put(&mut bag, node, "Value", "val");
        }
        ActionKind::Aaa => {
            put(&mut bag, node, "AAA", "policy");
        }
        ActionKind::JoseSign => {
            put(&mut bag, node, "GatewayScriptLocation", "script");
            put(&mut bag, node, "JOSESerializationType", "serialization");
            put(&mut bag, node, "JWSSignatureObject", "signature");
        }
        ActionKind::JoseVerify => {
            put(&mut bag, node, "GatewayScriptLocation", "script");
            put(&mut bag, node, "SignatureIdentifier", "signature_identifier");
            put(&mut bag, node, "SingleCertificate", "single_certificate");
            put(&mut bag, node, "SingleSSKey", "single_sskey");
            put(&mut bag, node, "JWSVerifyStripSignature", "strip_signature");
        }
        ActionKind::JoseEncrypt => {
            put(&mut bag, node, "GatewayScriptLocation", "script");
            put(&mut bag, node, "JOSESerializationType", "serialization");
            put(&mut bag, node, "JWEEncAlgorithm", "algorithm");
            put(&mut bag, node, "JWEHeaderObject", "jwe_header");
        }
        ActionKind::JoseDecrypt => {
            put(&mut bag, node, "GatewayScriptLocation", "script");
            put(&mut bag, node, "SingleSSKey", "sskey");
            put(&mut bag, node, "SingleKey", "single_key");
            put(&mut bag, node, "RecipientIdentifier", "recipient_identifier");
            put(&mut bag, node, "JWEDirectKeyObject", "direct_key");
        }
        ActionKind::Log => {
            put(&mut bag, node, "LogType", "log_type");
            put(&mut bag, node, "LogLevel", "log_level");
            put(&mut bag, node, "Destination", "destination");
            put(&mut bag, node, "MethodType", "method");
        }
        ActionKind::OnError => {
            put(&mut bag, node, "ErrorMode", "error_mode");
            put(&mut bag, node, "Rule", "rule");
        }
        ActionKind::Extract => {
            put(&mut bag, node, "XPath", "xpath");
            put(&mut bag, node, "Variable", "var");
        }
        ActionKind::Fetch => {
            put(&mut bag, node, "Destination", "source");
            put(&mut bag, node, "MethodRewriteType", "method");
        }
        ActionKind::Slm => {
            put(&mut bag, node, "SLMPolicy", "slm");
        }
        ActionKind::Call => {
            put(&mut bag, node, "Rule", "rule");
        }
        ActionKind::MethodRewrite => {
            put(&mut bag, node, "MethodRewriteType", "method");
        }
        ActionKind::ConvertHttp => {
            put(&mut bag, node, "InputConversion", "input-conversion");
        }
        ActionKind::Gatewayscript => {
            put(&mut bag, node, "GatewayScriptLocation", "gatewayscript");
            put(&mut bag, node, "ActionDebug", "debug");
        }
        // No-op kinds: the action is dropped from output entirely.
        ActionKind::Results | ActionKind::ResultsOutput => return Vec::new(),
        // Expanded recursively by the engine, never extracted as a leaf.
        ActionKind::Conditional => return Vec::new(),
    }
    vec![bag]
}

// ---------------------------------------------------------------------------
// Post-processing shared by every leaf extractor
// ---------------------------------------------------------------------------

/// Attach the SSL credential profile and stylesheet parameters, when
/// present, to a field bag produced by [`extract`].
pub fn apply_common_fields(bag: &mut FieldBag, node: &Element) {
    put_ssl_profile(bag, node);
    put_params(bag, node);
}

/// `ssl_<clientType>_profile`, sourced from whichever of the two credential
/// reference fields is populated.
fn put_ssl_profile(bag: &mut FieldBag, node: &Element) {
    let Some(client_type) = text_of(node, "SSLClientConfigType") else {
        return;
    };
    let cred = text_of(node, "SSLCred").or_else(|| text_of(node, "SSLClientCred"));
    if let Some(cred) = cred {
        bag.insert(format!("ssl_{client_type}_profile"), FieldValue::Text(cred));
    }
}

/// `params` list from the stylesheet parameter children; only attached when
/// the collection is non-empty (key absent otherwise, not an empty list).
fn put_params(bag: &mut FieldBag, node: &Element) {
    let params: Vec<Param> = node
        .children("StylesheetParameters")
        .map(|p| Param {
            name: p.child_text("ParameterName").map(str::to_string),
            value: p.child_text("ParameterValue").map(str::to_string),
        })
        .collect();
    if !params.is_empty() {
        bag.insert("params".to_string(), FieldValue::Params(params));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

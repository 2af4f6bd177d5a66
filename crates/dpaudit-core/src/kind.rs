use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// ActionKind
// ---------------------------------------------------------------------------

/// Canonical kind of one policy action. The export schema carries no uniform
/// kind tag; the kind is inferred from the action identifier (see
/// [`crate::resolve`]) and dispatched statically through
/// [`crate::extract::extract`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Aaa,
    Antivirus,
    Call,
    Conditional,
    ConvertHttp,
    Decrypt,
    Encrypt,
    Extract,
    Fetch,
    Filter,
    Gatewayscript,
    JoseDecrypt,
    JoseEncrypt,
    JoseSign,
    JoseVerify,
    Log,
    MethodRewrite,
    OnError,
    Results,
    ResultsOutput,
    RouteAction,
    RouteSet,
    Setvar,
    Sign,
    Slm,
    Validate,
    Verify,
    Xform,
    Xformbin,
    Xformng,
    Xformpi,
}

impl ActionKind {
    pub fn all() -> &'static [ActionKind] {
        &[
            ActionKind::Aaa,
            ActionKind::Antivirus,
            ActionKind::Call,
            ActionKind::Conditional,
            ActionKind::ConvertHttp,
            ActionKind::Decrypt,
            ActionKind::Encrypt,
            ActionKind::Extract,
            ActionKind::Fetch,
            ActionKind::Filter,
            ActionKind::Gatewayscript,
            ActionKind::JoseDecrypt,
            ActionKind::JoseEncrypt,
            ActionKind::JoseSign,
            ActionKind::JoseVerify,
            ActionKind::Log,
            ActionKind::MethodRewrite,
            ActionKind::OnError,
            ActionKind::Results,
            ActionKind::ResultsOutput,
            ActionKind::RouteAction,
            ActionKind::RouteSet,
            ActionKind::Setvar,
            ActionKind::Sign,
            ActionKind::Slm,
            ActionKind::Validate,
            ActionKind::Verify,
            ActionKind::Xform,
            ActionKind::Xformbin,
            ActionKind::Xformng,
            ActionKind::Xformpi,
        ]
    }

    /// The canonical type key used to label output records. Hyphenation is
    /// preserved here; lookup normalization happens in [`ActionKind::lookup`].
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Aaa => "aaa",
            ActionKind::Antivirus => "antivirus",
            ActionKind::Call => "call",
            ActionKind::Conditional => "conditional",
            ActionKind::ConvertHttp => "convert-http",
            ActionKind::Decrypt => "decrypt",
            ActionKind::Encrypt => "encrypt",
            ActionKind::Extract => "extract",
            ActionKind::Fetch => "fetch",
            ActionKind::Filter => "filter",
            ActionKind::Gatewayscript => "gatewayscript",
            ActionKind::JoseDecrypt => "jose-decrypt",
            ActionKind::JoseEncrypt => "jose-encrypt",
            ActionKind::JoseSign => "jose-sign",
            ActionKind::JoseVerify => "jose-verify",
            ActionKind::Log => "log",
            ActionKind::MethodRewrite => "method-rewrite",
            ActionKind::OnError => "on-error",
            ActionKind::Results => "results",
            ActionKind::ResultsOutput => "results_output",
            ActionKind::RouteAction => "route-action",
            ActionKind::RouteSet => "route-set",
            ActionKind::Setvar => "setvar",
            ActionKind::Sign => "sign",
            ActionKind::Slm => "slm",
            ActionKind::Validate => "validate",
            ActionKind::Verify => "verify",
            ActionKind::Xform => "xform",
            ActionKind::Xformbin => "xformbin",
            ActionKind::Xformng => "xformng",
            ActionKind::Xformpi => "xformpi",
        }
    }

    /// Registry lookup. Hyphens and underscores are interchangeable in the
    /// input; the canonical spelling is whatever [`ActionKind::as_str`]
    /// returns.
    pub fn lookup(raw: &str) -> Option<ActionKind> {
        let normalized = raw.replace('-', "_");
        match normalized.as_str() {
            "aaa" => Some(ActionKind::Aaa),
            "antivirus" => Some(ActionKind::Antivirus),
            "call" => Some(ActionKind::Call),
            "conditional" => Some(ActionKind::Conditional),
            "convert_http" => Some(ActionKind::ConvertHttp),
            "decrypt" => Some(ActionKind::Decrypt),
            "encrypt" => Some(ActionKind::Encrypt),
            "extract" => Some(ActionKind::Extract),
            "fetch" => Some(ActionKind::Fetch),
            "filter" => Some(ActionKind::Filter),
            "gatewayscript" => Some(ActionKind::Gatewayscript),
            "jose_decrypt" => Some(ActionKind::JoseDecrypt),
            "jose_encrypt" => Some(ActionKind::JoseEncrypt),
            "jose_sign" => Some(ActionKind::JoseSign),
            "jose_verify" => Some(ActionKind::JoseVerify),
            "log" => Some(ActionKind::Log),
            "method_rewrite" => Some(ActionKind::MethodRewrite),
            "on_error" => Some(ActionKind::OnError),
            "results" => Some(ActionKind::Results),
            "results_output" => Some(ActionKind::ResultsOutput),
            "route_action" => Some(ActionKind::RouteAction),
            "route_set" => Some(ActionKind::RouteSet),
            "setvar" => Some(ActionKind::Setvar),
            "sign" => Some(ActionKind::Sign),
            "slm" => Some(ActionKind::Slm),
            "validate" => Some(ActionKind::Validate),
            "verify" => Some(ActionKind::Verify),
            "xform" => Some(ActionKind::Xform),
            "xformbin" => Some(ActionKind::Xformbin),
            "xformng" => Some(ActionKind::Xformng),
            "xformpi" => Some(ActionKind::Xformpi),
            _ => None,
        }
    }

    /// Kinds that never produce an output record.
    pub fn is_noop(self) -> bool {
        matches!(self, ActionKind::Results | ActionKind::ResultsOutput)
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ActionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

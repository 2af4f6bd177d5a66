use crate::kind::ActionKind;
use serde::{Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Reporting category of an action kind. Downstream display metadata only;
/// an unmapped type key falls back to [`Category::Other`] and never fails
/// the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Security,
    Routing,
    Transformation,
    Validation,
    Logging,
    Other,
}

impl Category {
    pub fn all() -> &'static [Category] {
        &[
            Category::Security,
            Category::Routing,
            Category::Transformation,
            Category::Validation,
            Category::Logging,
            Category::Other,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Security => "Security",
            Category::Routing => "Routing",
            Category::Transformation => "Transformation",
            Category::Validation => "Validation",
            Category::Logging => "Logging",
            Category::Other => "Other",
        }
    }

    /// Short alias used as a display prefix.
    pub fn abbr(self) -> &'static str {
        match self {
            Category::Security => "sec",
            Category::Routing => "route",
            Category::Transformation => "xform",
            Category::Validation => "val",
            Category::Logging => "log",
            Category::Other => "other",
        }
    }

    /// ARGB display color.
    pub fn color(self) -> &'static str {
        match self {
            Category::Security => "ffe06666",
            Category::Routing => "ff3c78d8",
            Category::Transformation => "ffb45f06",
            Category::Validation => "ff9fc5e8",
            Category::Logging => "ff783f04",
            Category::Other => "ffd9d9d9",
        }
    }

    pub fn of(kind: ActionKind) -> Category {
        match kind {
            ActionKind::Aaa
            | ActionKind::Antivirus
            | ActionKind::Decrypt
            | ActionKind::Encrypt
            | ActionKind::JoseDecrypt
            | ActionKind::JoseEncrypt => Category::Security,

            ActionKind::OnError
            | ActionKind::Results
            | ActionKind::ResultsOutput
            | ActionKind::RouteAction
            | ActionKind::RouteSet
            | ActionKind::Setvar
            | ActionKind::Slm => Category::Routing,

            ActionKind::ConvertHttp
            | ActionKind::Extract
            | ActionKind::Fetch
            | ActionKind::Filter
            | ActionKind::Gatewayscript
            | ActionKind::MethodRewrite
            | ActionKind::Xform
            | ActionKind::Xformbin
            | ActionKind::Xformng
            | ActionKind::Xformpi => Category::Transformation,

            ActionKind::JoseSign
            | ActionKind::JoseVerify
            | ActionKind::Sign
            | ActionKind::Validate
            | ActionKind::Verify => Category::Validation,

            ActionKind::Log => Category::Logging,

            ActionKind::Call => Category::Other,

            // Conditionals expand into their sub-actions and never appear as
            // record keys, but every kind gets a bucket.
            ActionKind::Conditional => Category::Other,
        }
    }

    /// Category for an emitted type key. Unknown keys map to `Other`.
    pub fn of_type_key(key: &str) -> Category {
        ActionKind::lookup(key).map_or(Category::Other, Category::of)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

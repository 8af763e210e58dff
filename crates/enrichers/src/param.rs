use flowsint_core::Value;
use serde::{Deserialize, Serialize};

/// The type a param's value must be coercible to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Number,
    Bool,
    /// Matches any value — used for params whose shape depends on the node
    /// they're attached to.
    Any,
}

impl ParamKind {
    /// Whether `value` satisfies this param kind.
    pub fn matches(self, value: &Value) -> bool {
        match self {
            ParamKind::String => value.is_string(),
            ParamKind::Number => value.is_number(),
            ParamKind::Bool => value.is_boolean(),
            ParamKind::Any => true,
        }
    }
}

/// One declared parameter of an enricher node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, as it appears in a flow node's `params`.
    pub name: String,
    /// Expected value kind.
    pub kind: ParamKind,
    /// Whether the enricher requires this param to run.
    pub required: bool,
    /// Value used when the param is absent and not required.
    pub default: Option<Value>,
    /// Restricts the parameter to a fixed set of values, if non-empty.
    pub options: Vec<Value>,
}

impl ParamSpec {
    /// Declare a required parameter.
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: true,
            default: None,
            options: Vec::new(),
        }
    }

    /// Declare an optional parameter with a default value.
    pub fn optional(name: impl Into<String>, kind: ParamKind, default: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            default: Some(default),
            options: Vec::new(),
        }
    }

    /// Restrict this parameter to one of a fixed set of values.
    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = options;
        self
    }

    /// Validate a supplied value (or the absence of one) against this spec.
    pub fn check(&self, value: Option<&Value>) -> Result<(), String> {
        match value {
            None => {
                if self.required && self.default.is_none() {
                    Err(format!("missing required param '{}'", self.name))
                } else {
                    Ok(())
                }
            }
            Some(v) => {
                if !self.kind.matches(v) {
                    return Err(format!("param '{}' has the wrong type", self.name));
                }
                if !self.options.is_empty() && !self.options.contains(v) {
                    return Err(format!("param '{}' is not one of the allowed options", self.name));
                }
                Ok(())
            }
        }
    }
}

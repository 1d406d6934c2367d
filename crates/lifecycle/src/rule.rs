use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::error::PolicyError;
use crate::merge::Keyed;

pub const DEFAULT_TIERING_RULE_ID: &str = "MoveToIntelligentTieringImmediately";

/// One lifecycle rule. Only `ID` is interpreted; the rest of the document
/// (filter, status, transitions, ...) is carried verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: Map<String, Value>,
}

impl Rule {
    pub fn new(id: impl Into<String>, body: Map<String, Value>) -> Self {
        Self {
            id: Some(id.into()),
            body,
        }
    }

    pub fn from_value(value: Value) -> Result<Self, PolicyError> {
        if !value.is_object() {
            return Err(PolicyError::InvalidRule(
                "a rule must be a JSON object".into(),
            ));
        }
        let rule: Rule = serde_json::from_value(value)?;
        if rule.key().is_none() {
            return Err(PolicyError::InvalidRule("rule has no ID".into()));
        }
        Ok(rule)
    }

    pub fn from_json_str(data: &str) -> Result<Self, PolicyError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(value)
    }

    pub fn to_value(&self) -> Result<Value, PolicyError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn status(&self) -> Option<&str> {
        self.body.get("Status").and_then(Value::as_str)
    }
}

impl Keyed for Rule {
    fn key(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Moves every object to `INTELLIGENT_TIERING` right away and cleans up
/// multipart uploads abandoned for a week.
pub fn default_tiering_rule() -> Rule {
    let body = json!({
        "Filter": { "Prefix": "" },
        "Status": "Enabled",
        "Transitions": [
            { "Days": 0, "StorageClass": "INTELLIGENT_TIERING" }
        ],
        "AbortIncompleteMultipartUpload": { "DaysAfterInitiation": 7 }
    });
    let body = match body {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    Rule::new(DEFAULT_TIERING_RULE_ID, body)
}

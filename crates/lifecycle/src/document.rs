use serde::Serialize;
use std::fmt;

use cloudkeep_common::fingerprint::fingerprint_documents;

use crate::error::PolicyError;
use crate::rule::Rule;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Token derived from the rule contents, for stores that expose no
    /// version of their own.
    pub fn of_rules(rules: &[Rule]) -> Result<Self, PolicyError> {
        let docs = rules
            .iter()
            .map(Rule::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self(fingerprint_documents(&docs)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDocument {
    pub rules: Vec<Rule>,
    pub version: Option<VersionToken>,
}

/// Precondition attached to a full-replace upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCondition {
    Unconditional,
    /// No policy may be attached yet.
    Absent,
    /// The attached policy must still be at this version.
    Matches(VersionToken),
}

impl WriteCondition {
    pub fn for_document(doc: Option<&PolicyDocument>) -> Self {
        match doc {
            None => Self::Absent,
            Some(PolicyDocument {
                version: Some(v), ..
            }) => Self::Matches(v.clone()),
            Some(_) => Self::Unconditional,
        }
    }

    /// Checks the condition against what the store currently holds.
    pub fn check(&self, bucket: &str, current: Option<&VersionToken>) -> Result<(), PolicyError> {
        let conflict = |expected: &str| PolicyError::Conflict {
            bucket: bucket.to_string(),
            expected: expected.to_string(),
            found: current.map_or_else(|| "<absent>".to_string(), |v| v.to_string()),
        };
        match (self, current) {
            (Self::Unconditional, _) => Ok(()),
            (Self::Absent, None) => Ok(()),
            (Self::Absent, Some(_)) => Err(conflict("<absent>")),
            (Self::Matches(expected), Some(found)) if expected == found => Ok(()),
            (Self::Matches(expected), _) => Err(conflict(expected.as_str())),
        }
    }
}

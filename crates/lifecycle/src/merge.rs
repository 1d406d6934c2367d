use serde::Serialize;
use std::collections::HashMap;

use crate::error::PolicyError;

/// Anything with an identity key. Items without a key are carried through a
/// merge untouched and never matched.
pub trait Keyed {
    fn key(&self) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MergeAction {
    Inserted { position: usize },
    Replaced { position: usize },
    Unchanged { position: usize },
}

impl MergeAction {
    pub fn position(&self) -> usize {
        match *self {
            Self::Inserted { position }
            | Self::Replaced { position }
            | Self::Unchanged { position } => position,
        }
    }

    pub fn changes_policy(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inserted { .. } => "inserted",
            Self::Replaced { .. } => "replaced",
            Self::Unchanged { .. } => "unchanged",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome<R> {
    pub rules: Vec<R>,
    pub action: MergeAction,
}

/// Update-or-insert by key. A rule sharing the new rule's key is replaced at
/// its current position; otherwise the new rule is appended. The input slice
/// is left as is.
pub fn merge<R>(existing: &[R], new_rule: R) -> Result<MergeOutcome<R>, PolicyError>
where
    R: Keyed + Clone + PartialEq,
{
    let key = new_rule
        .key()
        .ok_or_else(|| PolicyError::InvalidRule("rule to merge has no ID".into()))?
        .to_string();

    let index = index_by_key(existing)?;
    let mut rules = existing.to_vec();

    let action = match index.get(key.as_str()) {
        Some(&position) if existing[position] == new_rule => MergeAction::Unchanged { position },
        Some(&position) => {
            rules[position] = new_rule;
            MergeAction::Replaced { position }
        }
        None => {
            rules.push(new_rule);
            MergeAction::Inserted {
                position: rules.len() - 1,
            }
        }
    };

    Ok(MergeOutcome { rules, action })
}

fn index_by_key<R: Keyed>(rules: &[R]) -> Result<HashMap<&str, usize>, PolicyError> {
    let mut index = HashMap::with_capacity(rules.len());
    for (position, rule) in rules.iter().enumerate() {
        let Some(key) = rule.key() else { continue };
        if let Some(previous) = index.insert(key, position) {
            return Err(PolicyError::InvalidRule(format!(
                "existing policy has duplicate rule ID '{key}' at positions {previous} and {position}"
            )));
        }
    }
    Ok(index)
}

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

pub type ResourceId = String;

/// Lifecycle state of a compute instance, named as the provider names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InstanceState {
    Pending,
    Running,
    ShuttingDown,
    Terminated,
    Stopping,
    Stopped,
}

impl InstanceState {
    pub const ALL: [InstanceState; 6] = [
        Self::Pending,
        Self::Running,
        Self::ShuttingDown,
        Self::Terminated,
        Self::Stopping,
        Self::Stopped,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::ShuttingDown => "shutting-down",
            Self::Terminated => "terminated",
            Self::Stopping => "stopping",
            Self::Stopped => "stopped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|state| state.as_str() == s)
    }

    /// States whose instances can still be stopped by an alarm action.
    pub fn default_allowed() -> BTreeSet<InstanceState> {
        BTreeSet::from([Self::Running, Self::Pending, Self::Stopping, Self::Stopped])
    }
}

impl fmt::Display for InstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRecord {
    pub id: ResourceId,
    /// `None` when the provider reported a state this crate does not model.
    pub state: Option<InstanceState>,
    pub tags: BTreeMap<String, String>,
}

impl InstanceRecord {
    pub fn new(id: impl Into<String>, state: InstanceState) -> Self {
        Self {
            id: id.into(),
            state: Some(state),
            tags: BTreeMap::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    pub tag_key: String,
    pub tag_values: BTreeSet<String>,
    pub allowed_states: BTreeSet<InstanceState>,
}

impl TargetSelector {
    pub fn new(tag_key: impl Into<String>, tag_values: impl IntoIterator<Item = String>) -> Self {
        Self {
            tag_key: tag_key.into(),
            tag_values: tag_values.into_iter().collect(),
            allowed_states: InstanceState::default_allowed(),
        }
    }

    pub fn matches(&self, record: &InstanceRecord) -> bool {
        let tagged = record
            .tags
            .get(&self.tag_key)
            .is_some_and(|value| self.tag_values.contains(value));
        let alive = record
            .state
            .is_some_and(|state| self.allowed_states.contains(&state));
        tagged && alive
    }
}

/// Ids of the records the selector picks. Duplicated ids collapse.
pub fn select_targets<'a, I>(records: I, selector: &TargetSelector) -> BTreeSet<ResourceId>
where
    I: IntoIterator<Item = &'a InstanceRecord>,
{
    records
        .into_iter()
        .filter(|record| selector.matches(record))
        .map(|record| record.id.clone())
        .collect()
}

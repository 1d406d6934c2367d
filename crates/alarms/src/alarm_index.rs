use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::inventory::ResourceId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmRecord {
    pub name: String,
    pub dimensions: Vec<(String, String)>,
}

impl AlarmRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            dimensions: Vec::new(),
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }
}

/// How an alarm's name is compared with the template name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NameMatch {
    /// Template name appears anywhere in the alarm name.
    #[default]
    Substring,
    Prefix,
    /// Alarm name is exactly the rendered `{pattern}_{resource_id}`.
    Exact,
}

impl NameMatch {
    pub fn matches(&self, pattern: &str, name: &str, resource_id: &str) -> bool {
        match self {
            Self::Substring => name.contains(pattern),
            Self::Prefix => name.starts_with(pattern),
            Self::Exact => name
                .strip_prefix(pattern)
                .and_then(|rest| rest.strip_prefix('_'))
                == Some(resource_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmMatcher {
    pub alarm_name: String,
    pub name_match: NameMatch,
    /// Dimension carrying the resource id, `InstanceId` for EC2.
    pub dimension: String,
}

impl AlarmMatcher {
    /// Whether `alarm` is this template's alarm for `resource_id`.
    pub fn covers(&self, alarm: &AlarmRecord, resource_id: &str) -> bool {
        self.name_match.matches(&self.alarm_name, &alarm.name, resource_id)
    }

    /// Prefix the provider can filter on server side. Substring matching
    /// has to see every alarm.
    pub fn server_prefix(&self) -> Option<&str> {
        match self.name_match {
            NameMatch::Substring => None,
            NameMatch::Prefix | NameMatch::Exact => Some(&self.alarm_name),
        }
    }
}

/// Resource ids already covered by a matching alarm.
pub fn index_alarm_targets<'a, I>(alarms: I, matcher: &AlarmMatcher) -> BTreeSet<ResourceId>
where
    I: IntoIterator<Item = &'a AlarmRecord>,
{
    alarms
        .into_iter()
        .flat_map(|alarm| {
            alarm
                .dimensions
                .iter()
                .filter(|(name, value)| *name == matcher.dimension && matcher.covers(alarm, value))
                .map(|(_, value)| value.clone())
        })
        .collect()
}

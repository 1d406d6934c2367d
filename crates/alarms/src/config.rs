use std::collections::BTreeSet;
use std::path::Path;

use cloudkeep_common::config::{self, LoadError, Validate};
use serde::{Deserialize, Serialize};

use crate::alarm_index::{AlarmMatcher, NameMatch};
use crate::error::AlarmError;
use crate::inventory::{InstanceState, TargetSelector};
use crate::template::AlarmTemplate;

pub const DEFAULT_ALARM_NAME: &str = "Idle-EC2-Instance-LessThan10Pct-CPUUtilization-15Min";
pub const FALLBACK_REGION: &str = "us-west-2";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReconcilerConfig {
    #[serde(default = "default_alarm_name")]
    pub alarm_name: String,
    #[serde(default)]
    pub name_match: NameMatch,
    #[serde(default = "default_tag_key")]
    pub tag_key: String,
    #[serde(default = "default_tag_values")]
    pub tag_values: Vec<String>,
    #[serde(default = "InstanceState::default_allowed")]
    pub allowed_states: BTreeSet<InstanceState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default)]
    pub template: AlarmTemplate,
}

fn default_alarm_name() -> String {
    DEFAULT_ALARM_NAME.to_string()
}

fn default_tag_key() -> String {
    "AutoShutdown".to_string()
}

fn default_tag_values() -> Vec<String> {
    vec!["true".to_string()]
}

fn default_max_concurrency() -> usize {
    4
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            alarm_name: default_alarm_name(),
            name_match: NameMatch::default(),
            tag_key: default_tag_key(),
            tag_values: default_tag_values(),
            allowed_states: InstanceState::default_allowed(),
            region: None,
            max_concurrency: default_max_concurrency(),
            template: AlarmTemplate::default(),
        }
    }
}

impl Validate for ReconcilerConfig {
    fn validate(&self) -> Result<(), LoadError> {
        let fail = |msg: &str| Err(LoadError::Validation(msg.to_string()));

        if self.alarm_name.trim().is_empty() {
            return fail("alarm_name must not be empty");
        }
        if self.tag_key.trim().is_empty() {
            return fail("tag_key must not be empty");
        }
        if self.tag_values.is_empty() {
            return fail("tag_values must list at least one value");
        }
        if self.allowed_states.is_empty() {
            return fail("allowed_states must list at least one state");
        }
        if self.max_concurrency == 0 {
            return fail("max_concurrency must be positive");
        }
        if self.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return fail("region must not be empty when set");
        }

        let t = &self.template;
        if t.metric_name.is_empty() || t.namespace.is_empty() || t.dimension.is_empty() {
            return fail("template metric_name, namespace and dimension must be set");
        }
        if t.period_seconds == 0 {
            return fail("template period_seconds must be positive");
        }
        if t.evaluation_periods == 0 {
            return fail("template evaluation_periods must be positive");
        }
        if t.datapoints_to_alarm == 0 {
            return fail("template datapoints_to_alarm must be positive");
        }
        if t.datapoints_to_alarm > t.evaluation_periods {
            return fail("template datapoints_to_alarm cannot exceed evaluation_periods");
        }
        if !t.threshold.is_finite() {
            return fail("template threshold must be a finite number");
        }
        if t.action_arn.trim().is_empty() {
            return fail("template action_arn must not be empty");
        }
        Ok(())
    }
}

impl ReconcilerConfig {
    pub fn selector(&self) -> TargetSelector {
        TargetSelector {
            tag_key: self.tag_key.clone(),
            tag_values: self.tag_values.iter().cloned().collect(),
            allowed_states: self.allowed_states.clone(),
        }
    }

    pub fn matcher(&self) -> AlarmMatcher {
        AlarmMatcher {
            alarm_name: self.alarm_name.clone(),
            name_match: self.name_match,
            dimension: self.template.dimension.clone(),
        }
    }

    /// Configured region, else the one the SDK resolved, else the fallback.
    pub fn effective_region(&self, resolved: Option<&str>) -> String {
        self.region
            .as_deref()
            .or(resolved)
            .unwrap_or(FALLBACK_REGION)
            .to_string()
    }
}

pub fn load_from_file(path: &Path) -> Result<ReconcilerConfig, AlarmError> {
    Ok(config::load_from_file(path)?)
}

pub fn load_from_str(yaml: &str) -> Result<ReconcilerConfig, AlarmError> {
    Ok(config::load_from_str(yaml)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::ComparisonOperator;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = load_from_str("{}").unwrap();
        assert_eq!(cfg, ReconcilerConfig::default());
        assert_eq!(cfg.alarm_name, DEFAULT_ALARM_NAME);
        assert_eq!(cfg.tag_key, "AutoShutdown");
        assert_eq!(cfg.tag_values, vec!["true".to_string()]);
        assert_eq!(cfg.allowed_states.len(), 4);
        assert_eq!(cfg.max_concurrency, 4);
        assert_eq!(cfg.name_match, NameMatch::Substring);
    }

    #[test]
    fn partial_override() {
        let yaml = r#"
tag_key: Shutdown
tag_values: ["yes", "true"]
allowed_states: [running]
name_match: prefix
region: eu-central-1
template:
  threshold: 5
  period_seconds: 300
  evaluation_periods: 3
  datapoints_to_alarm: 2
  comparison: LessThanOrEqualToThreshold
"#;
        let cfg = load_from_str(yaml).unwrap();
        assert_eq!(cfg.tag_key, "Shutdown");
        assert_eq!(cfg.allowed_states, BTreeSet::from([InstanceState::Running]));
        assert_eq!(cfg.name_match, NameMatch::Prefix);
        assert_eq!(cfg.template.threshold, 5.0);
        assert_eq!(cfg.template.comparison, ComparisonOperator::LessThanOrEqualToThreshold);
        assert_eq!(cfg.template.metric_name, "CPUUtilization");
        assert_eq!(cfg.effective_region(Some("us-east-1")), "eu-central-1");
    }

    #[test]
    fn hyphenated_state_names() {
        let cfg = load_from_str("allowed_states: [running, shutting-down]").unwrap();
        assert!(cfg.allowed_states.contains(&InstanceState::ShuttingDown));
    }

    #[test]
    fn unknown_key_rejected() {
        let err = load_from_str("alarm_nmae: typo").unwrap_err();
        assert!(matches!(err, AlarmError::InvalidConfig(_)));
    }

    #[test]
    fn validation_failures() {
        let cases = [
            ("alarm_name: ''", "alarm_name"),
            ("tag_key: ' '", "tag_key"),
            ("tag_values: []", "tag_values"),
            ("allowed_states: []", "allowed_states"),
            ("max_concurrency: 0", "max_concurrency"),
            ("template: {period_seconds: 0}", "period_seconds"),
            ("template: {evaluation_periods: 0}", "evaluation_periods"),
            ("template: {datapoints_to_alarm: 0}", "datapoints_to_alarm"),
            ("template: {datapoints_to_alarm: 2}", "cannot exceed"),
        ];
        for (yaml, needle) in cases {
            let err = load_from_str(yaml).unwrap_err();
            assert!(
                err.to_string().contains(needle),
                "{yaml}: expected '{needle}' in '{err}'"
            );
        }
    }

    #[test]
    fn region_fallback_chain() {
        let cfg = ReconcilerConfig::default();
        assert_eq!(cfg.effective_region(Some("ap-south-1")), "ap-south-1");
        assert_eq!(cfg.effective_region(None), FALLBACK_REGION);
    }

    #[test]
    fn selector_and_matcher_follow_config() {
        let cfg = ReconcilerConfig::default();
        let selector = cfg.selector();
        assert_eq!(selector.tag_key, "AutoShutdown");
        assert!(selector.tag_values.contains("true"));
        let matcher = cfg.matcher();
        assert_eq!(matcher.alarm_name, DEFAULT_ALARM_NAME);
        assert_eq!(matcher.dimension, "InstanceId");
    }

    #[test]
    fn load_from_file_works() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "tag_values: [\"on\"]").unwrap();
        let cfg = load_from_file(f.path()).unwrap();
        assert_eq!(cfg.tag_values, vec!["on".to_string()]);
    }

    #[test]
    fn missing_file_is_config_error() {
        let err = load_from_file(Path::new("/nonexistent/cloudkeep.yaml")).unwrap_err();
        assert!(err.to_string().contains("io"));
    }
}

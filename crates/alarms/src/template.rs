use serde::{Deserialize, Serialize};

pub const REGION_PLACEHOLDER: &str = "{region}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statistic {
    Average,
    Maximum,
    Minimum,
    SampleCount,
    Sum,
}

impl Statistic {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Average => "Average",
            Self::Maximum => "Maximum",
            Self::Minimum => "Minimum",
            Self::SampleCount => "SampleCount",
            Self::Sum => "Sum",
        }
    }
}

/// Static-threshold comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComparisonOperator {
    GreaterThanOrEqualToThreshold,
    GreaterThanThreshold,
    LessThanThreshold,
    LessThanOrEqualToThreshold,
}

impl ComparisonOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
            Self::GreaterThanThreshold => "GreaterThanThreshold",
            Self::LessThanThreshold => "LessThanThreshold",
            Self::LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::GreaterThanOrEqualToThreshold => ">=",
            Self::GreaterThanThreshold => ">",
            Self::LessThanThreshold => "<",
            Self::LessThanOrEqualToThreshold => "<=",
        }
    }
}

/// Shape of the alarm created for every pending resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AlarmTemplate {
    pub metric_name: String,
    pub namespace: String,
    pub statistic: Statistic,
    pub comparison: ComparisonOperator,
    pub threshold: f64,
    pub period_seconds: u32,
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
    /// Dimension that carries the resource id.
    pub dimension: String,
    /// Generated from the other fields when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub actions_enabled: bool,
    /// Action ARN; `{region}` is substituted at render time.
    pub action_arn: String,
}

impl Default for AlarmTemplate {
    fn default() -> Self {
        Self {
            metric_name: "CPUUtilization".to_string(),
            namespace: "AWS/EC2".to_string(),
            statistic: Statistic::Average,
            comparison: ComparisonOperator::LessThanThreshold,
            threshold: 10.0,
            period_seconds: 900,
            evaluation_periods: 1,
            datapoints_to_alarm: 1,
            dimension: "InstanceId".to_string(),
            description: None,
            actions_enabled: true,
            action_arn: "arn:aws:automate:{region}:ec2:stop".to_string(),
        }
    }
}

impl AlarmTemplate {
    pub fn description(&self) -> String {
        if let Some(text) = &self.description {
            return text.clone();
        }
        format!(
            "Triggered when {} {} {} for {} consecutive {} periods.",
            self.metric_name,
            self.comparison.symbol(),
            self.threshold,
            self.evaluation_periods,
            human_period(self.period_seconds),
        )
    }

    pub fn action_arn(&self, region: &str) -> String {
        self.action_arn.replace(REGION_PLACEHOLDER, region)
    }

    pub fn render(&self, alarm_name: &str, resource_id: &str, region: &str) -> AlarmSpec {
        AlarmSpec {
            name: format!("{alarm_name}_{resource_id}"),
            resource_id: resource_id.to_string(),
            description: self.description(),
            actions_enabled: self.actions_enabled,
            alarm_actions: vec![self.action_arn(region)],
            metric_name: self.metric_name.clone(),
            namespace: self.namespace.clone(),
            statistic: self.statistic,
            dimensions: vec![(self.dimension.clone(), resource_id.to_string())],
            period_seconds: self.period_seconds,
            evaluation_periods: self.evaluation_periods,
            datapoints_to_alarm: self.datapoints_to_alarm,
            threshold: self.threshold,
            comparison: self.comparison,
        }
    }
}

fn human_period(seconds: u32) -> String {
    if seconds % 60 == 0 {
        format!("{} min", seconds / 60)
    } else {
        format!("{seconds} s")
    }
}

/// A fully rendered alarm, ready for `Monitoring::put_alarm`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlarmSpec {
    pub name: String,
    pub resource_id: String,
    pub description: String,
    pub actions_enabled: bool,
    pub alarm_actions: Vec<String>,
    pub metric_name: String,
    pub namespace: String,
    pub statistic: Statistic,
    pub dimensions: Vec<(String, String)>,
    pub period_seconds: u32,
    pub evaluation_periods: u32,
    pub datapoints_to_alarm: u32,
    pub threshold: f64,
    pub comparison: ComparisonOperator,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAME: &str = "Idle-EC2-Instance-LessThan10Pct-CPUUtilization-15Min";

    #[test]
    fn default_description_reads_naturally() {
        assert_eq!(
            AlarmTemplate::default().description(),
            "Triggered when CPUUtilization < 10 for 1 consecutive 15 min periods."
        );
    }

    #[test]
    fn explicit_description_wins() {
        let template = AlarmTemplate {
            description: Some("custom".into()),
            ..AlarmTemplate::default()
        };
        assert_eq!(template.description(), "custom");
    }

    #[test]
    fn odd_period_shown_in_seconds() {
        let template = AlarmTemplate {
            period_seconds: 90,
            threshold: 2.5,
            comparison: ComparisonOperator::GreaterThanOrEqualToThreshold,
            ..AlarmTemplate::default()
        };
        assert_eq!(
            template.description(),
            "Triggered when CPUUtilization >= 2.5 for 1 consecutive 90 s periods."
        );
    }

    #[test]
    fn render_default_alarm() {
        let spec = AlarmTemplate::default().render(NAME, "i-0abc", "eu-west-1");
        assert_eq!(spec.name, format!("{NAME}_i-0abc"));
        assert_eq!(spec.resource_id, "i-0abc");
        assert_eq!(spec.alarm_actions, vec!["arn:aws:automate:eu-west-1:ec2:stop".to_string()]);
        assert_eq!(spec.dimensions, vec![("InstanceId".to_string(), "i-0abc".to_string())]);
        assert_eq!(spec.metric_name, "CPUUtilization");
        assert_eq!(spec.namespace, "AWS/EC2");
        assert_eq!(spec.statistic, Statistic::Average);
        assert_eq!(spec.comparison, ComparisonOperator::LessThanThreshold);
        assert_eq!(spec.threshold, 10.0);
        assert_eq!(spec.period_seconds, 900);
        assert_eq!(spec.evaluation_periods, 1);
        assert_eq!(spec.datapoints_to_alarm, 1);
        assert!(spec.actions_enabled);
    }

    #[test]
    fn static_action_arn_used_verbatim() {
        let template = AlarmTemplate {
            action_arn: "arn:aws:sns:us-east-1:123456789012:idle".into(),
            ..AlarmTemplate::default()
        };
        assert_eq!(
            template.action_arn("eu-west-1"),
            "arn:aws:sns:us-east-1:123456789012:idle"
        );
    }

    #[test]
    fn operator_names_match_provider() {
        assert_eq!(ComparisonOperator::LessThanThreshold.as_str(), "LessThanThreshold");
        assert_eq!(Statistic::SampleCount.as_str(), "SampleCount");
    }
}

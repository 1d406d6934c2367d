use aws_sdk_cloudwatch::types::{AlarmType, ComparisonOperator, Dimension, MetricAlarm, Statistic};
use aws_sdk_cloudwatch::Client;

use super::Monitoring;
use crate::alarm_index::AlarmRecord;
use crate::error::{transport, AlarmError};
use crate::template::AlarmSpec;

/// Metric alarms in CloudWatch.
#[derive(Clone)]
pub struct CloudWatchMonitoring {
    client: Client,
}

impl CloudWatchMonitoring {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn alarm_record(alarm: &MetricAlarm) -> Option<AlarmRecord> {
    let name = alarm.alarm_name()?;
    let dimensions = alarm
        .dimensions()
        .iter()
        .filter_map(|d| Some((d.name()?.to_string(), d.value()?.to_string())))
        .collect();
    Some(AlarmRecord {
        name: name.to_string(),
        dimensions,
    })
}

fn dimensions(spec: &AlarmSpec) -> Vec<Dimension> {
    spec.dimensions
        .iter()
        .map(|(name, value)| Dimension::builder().name(name).value(value).build())
        .collect()
}

fn to_i32(field: &str, value: u32) -> Result<i32, AlarmError> {
    i32::try_from(value).map_err(|_| AlarmError::InvalidConfig(format!("{field} {value} out of range")))
}

#[async_trait::async_trait]
impl Monitoring for CloudWatchMonitoring {
    async fn list_alarms(&self, name_prefix: Option<&str>) -> Result<Vec<AlarmRecord>, AlarmError> {
        let mut pages = self
            .client
            .describe_alarms()
            .alarm_types(AlarmType::MetricAlarm)
            .set_alarm_name_prefix(name_prefix.map(str::to_string))
            .into_paginator()
            .send();

        let mut alarms = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(transport)?;
            alarms.extend(page.metric_alarms().iter().filter_map(alarm_record));
        }

        tracing::debug!(prefix = ?name_prefix, alarms = alarms.len(), "metric alarms listed");
        Ok(alarms)
    }

    async fn put_alarm(&self, spec: &AlarmSpec) -> Result<(), AlarmError> {
        self.client
            .put_metric_alarm()
            .alarm_name(&spec.name)
            .alarm_description(&spec.description)
            .actions_enabled(spec.actions_enabled)
            .set_alarm_actions(Some(spec.alarm_actions.clone()))
            .metric_name(&spec.metric_name)
            .namespace(&spec.namespace)
            .statistic(Statistic::from(spec.statistic.as_str()))
            .set_dimensions(Some(dimensions(spec)))
            .period(to_i32("period_seconds", spec.period_seconds)?)
            .evaluation_periods(to_i32("evaluation_periods", spec.evaluation_periods)?)
            .datapoints_to_alarm(to_i32("datapoints_to_alarm", spec.datapoints_to_alarm)?)
            .threshold(spec.threshold)
            .comparison_operator(ComparisonOperator::from(spec.comparison.as_str()))
            .send()
            .await
            .map_err(transport)?;
        Ok(())
    }
}

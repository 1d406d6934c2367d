use std::collections::BTreeSet;

use futures::stream::{self, StreamExt};
use serde::Serialize;

use crate::alarm_index::{index_alarm_targets, AlarmMatcher};
use crate::config::ReconcilerConfig;
use crate::error::AlarmError;
use crate::inventory::{select_targets, ResourceId, TargetSelector};
use crate::provider::{Inventory, Monitoring};
use crate::reconcile::reconcile;
use crate::template::{AlarmSpec, AlarmTemplate};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlarmFailure {
    pub resource_id: ResourceId,
    pub alarm_name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub dry_run: bool,
    pub targets: BTreeSet<ResourceId>,
    pub existing: BTreeSet<ResourceId>,
    pub pending: BTreeSet<ResourceId>,
    pub created: BTreeSet<ResourceId>,
    pub failed: Vec<AlarmFailure>,
}

impl ReconcileReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// One-shot pass creating the alarms missing for tagged instances.
pub struct AlarmReconciler<I, M> {
    inventory: I,
    monitoring: M,
    config: ReconcilerConfig,
    region: String,
}

impl<I: Inventory, M: Monitoring> AlarmReconciler<I, M> {
    pub fn new(inventory: I, monitoring: M, config: ReconcilerConfig, region: impl Into<String>) -> Self {
        Self {
            inventory,
            monitoring,
            config,
            region: region.into(),
        }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn monitoring(&self) -> &M {
        &self.monitoring
    }

    pub async fn list_monitor_targets(&self, selector: &TargetSelector) -> Result<BTreeSet<ResourceId>, AlarmError> {
        let records = self.inventory.list_instances(selector).await?;
        let targets = select_targets(&records, selector);
        tracing::info!(
            tag_key = %selector.tag_key,
            listed = records.len(),
            targets = targets.len(),
            "monitor targets selected"
        );
        Ok(targets)
    }

    pub async fn list_existing_alarm_targets(&self, matcher: &AlarmMatcher) -> Result<BTreeSet<ResourceId>, AlarmError> {
        let alarms = self.monitoring.list_alarms(matcher.server_prefix()).await?;
        let existing = index_alarm_targets(&alarms, matcher);
        tracing::info!(
            alarm_name = %matcher.alarm_name,
            listed = alarms.len(),
            covered = existing.len(),
            "existing alarms indexed"
        );
        Ok(existing)
    }

    pub fn render(&self, resource_id: &str, template: &AlarmTemplate) -> AlarmSpec {
        template.render(&self.config.alarm_name, resource_id, &self.region)
    }

    pub async fn create_alarm(&self, resource_id: &str, template: &AlarmTemplate) -> Result<AlarmSpec, AlarmError> {
        let spec = self.render(resource_id, template);
        self.monitoring.put_alarm(&spec).await?;
        tracing::info!(alarm = %spec.name, resource = %resource_id, "alarm created");
        Ok(spec)
    }

    /// List, diff, then create every missing alarm. Listing failures abort;
    /// creation failures are collected per resource.
    pub async fn run(&self, opts: RunOptions) -> Result<ReconcileReport, AlarmError> {
        let targets = self.list_monitor_targets(&self.config.selector()).await?;
        let existing = self.list_existing_alarm_targets(&self.config.matcher()).await?;
        let pending = reconcile(&targets, &existing);

        let mut report = ReconcileReport {
            dry_run: opts.dry_run,
            targets,
            existing,
            pending,
            ..ReconcileReport::default()
        };

        if report.pending.is_empty() {
            tracing::info!("every target already has an alarm");
            return Ok(report);
        }
        if opts.dry_run {
            tracing::info!(pending = report.pending.len(), "dry run, no alarms created");
            return Ok(report);
        }

        let template = &self.config.template;
        let results: Vec<(ResourceId, Result<AlarmSpec, AlarmError>)> = stream::iter(report.pending.iter().cloned())
            .map(|id| async move {
                let result = self.create_alarm(&id, template).await;
                (id, result)
            })
            .buffer_unordered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        for (id, result) in results {
            match result {
                Ok(_) => {
                    report.created.insert(id);
                }
                Err(e) => {
                    let alarm_name = self.render(&id, template).name;
                    tracing::warn!(resource = %id, alarm = %alarm_name, error = %e, "alarm creation failed");
                    report.failed.push(AlarmFailure {
                        resource_id: id,
                        alarm_name,
                        error: e.to_string(),
                    });
                }
            }
        }
        report.failed.sort_by(|a, b| a.resource_id.cmp(&b.resource_id));

        tracing::info!(
            created = report.created.len(),
            failed = report.failed.len(),
            "reconciliation finished"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm_index::AlarmRecord;
    use crate::inventory::{InstanceRecord, InstanceState};
    use std::sync::Mutex;

    struct StaticInventory(Vec<InstanceRecord>);

    #[async_trait::async_trait]
    impl Inventory for StaticInventory {
        async fn list_instances(&self, _selector: &TargetSelector) -> Result<Vec<InstanceRecord>, AlarmError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct RecordingMonitoring {
        alarms: Vec<AlarmRecord>,
        prefixes: Mutex<Vec<Option<String>>>,
        puts: Mutex<Vec<AlarmSpec>>,
    }

    #[async_trait::async_trait]
    impl Monitoring for RecordingMonitoring {
        async fn list_alarms(&self, name_prefix: Option<&str>) -> Result<Vec<AlarmRecord>, AlarmError> {
            self.prefixes.lock().unwrap().push(name_prefix.map(str::to_string));
            Ok(self.alarms.clone())
        }

        async fn put_alarm(&self, spec: &AlarmSpec) -> Result<(), AlarmError> {
            self.puts.lock().unwrap().push(spec.clone());
            Ok(())
        }
    }

    fn tagged(id: &str, state: InstanceState) -> InstanceRecord {
        InstanceRecord::new(id, state).with_tag("AutoShutdown", "true")
    }

    #[tokio::test]
    async fn targets_refiltered_locally() {
        // inventory ignores the selector; the reconciler must not
        let inventory = StaticInventory(vec![
            tagged("i-1", InstanceState::Running),
            tagged("i-2", InstanceState::Terminated),
            InstanceRecord::new("i-3", InstanceState::Running),
        ]);
        let rec = AlarmReconciler::new(
            inventory,
            RecordingMonitoring::default(),
            ReconcilerConfig::default(),
            "us-west-2",
        );
        let targets = rec.list_monitor_targets(&rec.config().selector()).await.unwrap();
        assert_eq!(targets, BTreeSet::from(["i-1".to_string()]));
    }

    #[tokio::test]
    async fn substring_matching_lists_everything() {
        let rec = AlarmReconciler::new(
            StaticInventory(vec![]),
            RecordingMonitoring::default(),
            ReconcilerConfig::default(),
            "us-west-2",
        );
        rec.list_existing_alarm_targets(&rec.config().matcher()).await.unwrap();
        assert_eq!(*rec.monitoring().prefixes.lock().unwrap(), vec![None]);
    }

    #[tokio::test]
    async fn create_alarm_uses_region() {
        let rec = AlarmReconciler::new(
            StaticInventory(vec![]),
            RecordingMonitoring::default(),
            ReconcilerConfig::default(),
            "ca-central-1",
        );
        let spec = rec.create_alarm("i-9", &AlarmTemplate::default()).await.unwrap();
        assert_eq!(spec.alarm_actions, vec!["arn:aws:automate:ca-central-1:ec2:stop".to_string()]);
        assert_eq!(rec.monitoring().puts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn nothing_pending_creates_nothing() {
        let monitoring = RecordingMonitoring {
            alarms: vec![AlarmRecord::new(format!("{}_i-1", crate::config::DEFAULT_ALARM_NAME))
                .with_dimension("InstanceId", "i-1")],
            ..RecordingMonitoring::default()
        };
        let rec = AlarmReconciler::new(
            StaticInventory(vec![tagged("i-1", InstanceState::Running)]),
            monitoring,
            ReconcilerConfig::default(),
            "us-west-2",
        );
        let report = rec.run(RunOptions::default()).await.unwrap();
        assert!(report.pending.is_empty());
        assert!(report.created.is_empty());
        assert!(report.is_success());
        assert!(rec.monitoring().puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn sequential_dispatch_creates_all() {
        let config = ReconcilerConfig {
            max_concurrency: 1,
            ..ReconcilerConfig::default()
        };
        let rec = AlarmReconciler::new(
            StaticInventory(vec![
                tagged("i-1", InstanceState::Running),
                tagged("i-2", InstanceState::Pending),
                tagged("i-3", InstanceState::Stopped),
            ]),
            RecordingMonitoring::default(),
            config,
            "us-west-2",
        );
        let report = rec.run(RunOptions::default()).await.unwrap();
        assert_eq!(report.created.len(), 3);
        let names: Vec<String> = rec
            .monitoring()
            .puts
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(
            names,
            vec![
                format!("{}_i-1", crate::config::DEFAULT_ALARM_NAME),
                format!("{}_i-2", crate::config::DEFAULT_ALARM_NAME),
                format!("{}_i-3", crate::config::DEFAULT_ALARM_NAME),
            ]
        );
    }

    #[test]
    fn report_serializes_sets_as_lists() {
        let report = ReconcileReport {
            pending: BTreeSet::from(["i-2".to_string(), "i-1".to_string()]),
            ..ReconcileReport::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pending"], serde_json::json!(["i-1", "i-2"]));
        assert_eq!(json["dry_run"], false);
    }
}

pub mod alarm_index;
pub mod config;
pub mod error;
pub mod inventory;
pub mod provider;
pub mod reconcile;
pub mod reconciler;
pub mod template;

pub use alarm_index::{index_alarm_targets, AlarmMatcher, AlarmRecord, NameMatch};
pub use config::ReconcilerConfig;
pub use error::AlarmError;
pub use inventory::{select_targets, InstanceRecord, InstanceState, ResourceId, TargetSelector};
pub use provider::{CloudWatchMonitoring, Ec2Inventory, Inventory, Monitoring};
pub use reconcile::reconcile;
pub use reconciler::{AlarmFailure, AlarmReconciler, ReconcileReport, RunOptions};
pub use template::{AlarmSpec, AlarmTemplate, ComparisonOperator, Statistic};

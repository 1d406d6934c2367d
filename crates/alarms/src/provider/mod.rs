mod cloudwatch;
mod ec2;

pub use cloudwatch::CloudWatchMonitoring;
pub use ec2::Ec2Inventory;

use crate::alarm_index::AlarmRecord;
use crate::error::AlarmError;
use crate::inventory::{InstanceRecord, TargetSelector};
use crate::template::AlarmSpec;

/// Source of compute instances.
#[async_trait::async_trait]
pub trait Inventory: Send + Sync {
    /// May return more than the selector asks for; callers filter again.
    async fn list_instances(&self, selector: &TargetSelector) -> Result<Vec<InstanceRecord>, AlarmError>;
}

#[async_trait::async_trait]
pub trait Monitoring: Send + Sync {
    /// Every metric alarm, or those whose name starts with `name_prefix`.
    async fn list_alarms(&self, name_prefix: Option<&str>) -> Result<Vec<AlarmRecord>, AlarmError>;

    /// Create or overwrite the alarm named `spec.name`.
    async fn put_alarm(&self, spec: &AlarmSpec) -> Result<(), AlarmError>;
}

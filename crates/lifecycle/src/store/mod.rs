mod convert;
mod memory;
mod s3;

pub use convert::{rule_from_sdk, rule_to_sdk};
pub use memory::InMemoryPolicyStore;
pub use s3::S3PolicyStore;

use crate::document::{PolicyDocument, WriteCondition};
use crate::error::PolicyError;
use crate::rule::Rule;

/// Remote home of a bucket's lifecycle policy.
#[async_trait::async_trait]
pub trait PolicyStore: Send + Sync {
    /// `Ok(None)` when no policy is attached to the bucket.
    async fn fetch(&self, bucket: &str) -> Result<Option<PolicyDocument>, PolicyError>;

    /// Replaces the whole policy. Rules left out of `rules` are deleted
    /// remotely.
    async fn upload(
        &self,
        bucket: &str,
        rules: &[Rule],
        condition: &WriteCondition,
    ) -> Result<(), PolicyError>;
}

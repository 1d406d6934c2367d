use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::operation::get_bucket_lifecycle_configuration::{
    GetBucketLifecycleConfigurationError, GetBucketLifecycleConfigurationOutput,
};
use aws_sdk_s3::types::{BucketLifecycleConfiguration, TransitionDefaultMinimumObjectSize};
use aws_sdk_s3::Client;

use super::convert::{rule_from_sdk, rule_to_sdk};
use super::PolicyStore;
use crate::document::{PolicyDocument, VersionToken, WriteCondition};
use crate::error::PolicyError;
use crate::rule::Rule;

const NO_LIFECYCLE_CODE: &str = "NoSuchLifecycleConfiguration";

/// Lifecycle policies stored on S3 buckets.
///
/// S3 offers no conditional write for lifecycle configuration, so version
/// tokens are content fingerprints and a conditional upload re-reads the
/// policy right before the put. A writer landing between that re-read and
/// the put is still lost.
///
/// The bucket's `TransitionDefaultMinimumObjectSize` travels with the
/// lifecycle configuration, so every upload reads it back and resends it.
#[derive(Clone)]
pub struct S3PolicyStore {
    client: Client,
}

impl S3PolicyStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Raw GET; `Ok(None)` when nothing is attached.
    async fn read(
        &self,
        bucket: &str,
    ) -> Result<Option<GetBucketLifecycleConfigurationOutput>, PolicyError> {
        match self
            .client
            .get_bucket_lifecycle_configuration()
            .bucket(bucket)
            .send()
            .await
        {
            Ok(output) => Ok(Some(output)),
            Err(err) if is_missing_configuration(&err) => {
                tracing::debug!(%bucket, "no lifecycle configuration attached");
                Ok(None)
            }
            Err(err) => Err(transport(err)),
        }
    }
}

fn document(output: &GetBucketLifecycleConfigurationOutput) -> Result<PolicyDocument, PolicyError> {
    let rules = output
        .rules()
        .iter()
        .map(rule_from_sdk)
        .collect::<Result<Vec<_>, _>>()?;
    let version = VersionToken::of_rules(&rules)?;
    Ok(PolicyDocument {
        rules,
        version: Some(version),
    })
}

fn minimum_object_size(
    output: Option<&GetBucketLifecycleConfigurationOutput>,
) -> Option<TransitionDefaultMinimumObjectSize> {
    output.and_then(|o| o.transition_default_minimum_object_size().cloned())
}

fn transport<E, R>(err: SdkError<E, R>) -> PolicyError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    PolicyError::Transport(DisplayErrorContext(&err).to_string())
}

fn is_missing_configuration<R>(err: &SdkError<GetBucketLifecycleConfigurationError, R>) -> bool {
    err.as_service_error().and_then(|e| e.code()) == Some(NO_LIFECYCLE_CODE)
}

#[async_trait::async_trait]
impl PolicyStore for S3PolicyStore {
    async fn fetch(&self, bucket: &str) -> Result<Option<PolicyDocument>, PolicyError> {
        self.read(bucket).await?.as_ref().map(document).transpose()
    }

    async fn upload(
        &self,
        bucket: &str,
        rules: &[Rule],
        condition: &WriteCondition,
    ) -> Result<(), PolicyError> {
        let sdk_rules = rules
            .iter()
            .map(rule_to_sdk)
            .collect::<Result<Vec<_>, _>>()?;

        let current = self.read(bucket).await?;
        if *condition != WriteCondition::Unconditional {
            let version = match current.as_ref() {
                Some(output) => document(output)?.version,
                None => None,
            };
            condition.check(bucket, version.as_ref())?;
        }

        if sdk_rules.is_empty() {
            // S3 rejects an empty rule list; detaching is the equivalent.
            self.client
                .delete_bucket_lifecycle()
                .bucket(bucket)
                .send()
                .await
                .map_err(transport)?;
            return Ok(());
        }

        let configuration = BucketLifecycleConfiguration::builder()
            .set_rules(Some(sdk_rules))
            .build()
            .map_err(|e| PolicyError::InvalidRule(e.to_string()))?;

        self.client
            .put_bucket_lifecycle_configuration()
            .bucket(bucket)
            .lifecycle_configuration(configuration)
            .set_transition_default_minimum_object_size(minimum_object_size(current.as_ref()))
            .send()
            .await
            .map_err(transport)?;

        Ok(())
    }
}

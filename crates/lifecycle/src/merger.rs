use serde::Serialize;

use crate::document::WriteCondition;
use crate::error::PolicyError;
use crate::merge::{merge, Keyed, MergeAction};
use crate::rule::Rule;
use crate::store::PolicyStore;

#[derive(Debug, Clone, Copy, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
}

/// Result of fetch + merge, not yet written.
#[derive(Debug, Clone)]
pub struct MergePlan {
    pub bucket: String,
    pub before: Vec<Rule>,
    pub after: Vec<Rule>,
    pub action: MergeAction,
    pub condition: WriteCondition,
}

impl MergePlan {
    pub fn rule_id(&self) -> Option<&str> {
        self.after
            .get(self.action.position())
            .and_then(|rule| rule.key())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MergeReport {
    pub bucket: String,
    pub rule_id: String,
    #[serde(flatten)]
    pub action: MergeAction,
    pub rules_before: usize,
    pub rules_after: usize,
    pub uploaded: bool,
    pub rules: Vec<Rule>,
}

pub struct PolicyMerger<S> {
    store: S,
}

impl<S: PolicyStore> PolicyMerger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current rules of the bucket; a bucket with no policy has none.
    pub async fn fetch_rules(&self, bucket: &str) -> Result<Vec<Rule>, PolicyError> {
        let doc = self.store.fetch(bucket).await?;
        Ok(doc.map(|d| d.rules).unwrap_or_default())
    }

    pub async fn upload(
        &self,
        bucket: &str,
        rules: &[Rule],
        condition: &WriteCondition,
    ) -> Result<(), PolicyError> {
        self.store.upload(bucket, rules, condition).await?;
        tracing::info!(%bucket, rules = rules.len(), "lifecycle policy uploaded");
        Ok(())
    }

    pub async fn plan(&self, bucket: &str, rule: Rule) -> Result<MergePlan, PolicyError> {
        let doc = self.store.fetch(bucket).await?;
        let condition = WriteCondition::for_document(doc.as_ref());

        let before = match doc {
            Some(doc) => {
                tracing::info!(%bucket, rules = doc.rules.len(), "existing lifecycle rules found");
                doc.rules
            }
            None => {
                tracing::info!(%bucket, "no existing lifecycle policy");
                Vec::new()
            }
        };

        let outcome = merge(&before, rule)?;
        Ok(MergePlan {
            bucket: bucket.to_string(),
            before,
            after: outcome.rules,
            action: outcome.action,
            condition,
        })
    }

    pub async fn commit(&self, plan: MergePlan, opts: ApplyOptions) -> Result<MergeReport, PolicyError> {
        let rule_id = plan.rule_id().unwrap_or_default().to_string();
        let uploaded = if opts.dry_run {
            tracing::info!(bucket = %plan.bucket, %rule_id, action = plan.action.as_str(), "dry run, skipping upload");
            false
        } else if !plan.action.changes_policy() {
            tracing::info!(bucket = %plan.bucket, %rule_id, "rule already present, nothing to upload");
            false
        } else {
            self.upload(&plan.bucket, &plan.after, &plan.condition).await?;
            true
        };

        Ok(MergeReport {
            bucket: plan.bucket,
            rule_id,
            action: plan.action,
            rules_before: plan.before.len(),
            rules_after: plan.after.len(),
            uploaded,
            rules: plan.after,
        })
    }

    /// Fetch, merge and upload in one go.
    pub async fn apply(&self, bucket: &str, rule: Rule, opts: ApplyOptions) -> Result<MergeReport, PolicyError> {
        let plan = self.plan(bucket, rule).await?;
        self.commit(plan, opts).await
    }
}

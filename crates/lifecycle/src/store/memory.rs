use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::PolicyStore;
use crate::document::{PolicyDocument, VersionToken, WriteCondition};
use crate::error::PolicyError;
use crate::rule::Rule;

#[derive(Debug, Clone)]
struct StoredPolicy {
    rules: Vec<Rule>,
    version: u64,
}

impl StoredPolicy {
    fn token(&self) -> VersionToken {
        VersionToken::new(self.version.to_string())
    }
}

/// Process-local store with real version preconditions.
#[derive(Clone, Default)]
pub struct InMemoryPolicyStore {
    policies: Arc<DashMap<String, StoredPolicy>>,
    uploads: Arc<AtomicUsize>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(bucket: &str, rules: Vec<Rule>) -> Self {
        let store = Self::new();
        store.seed(bucket, rules);
        store
    }

    /// Overwrites the bucket's policy outside the precondition protocol, the
    /// way another editor would.
    pub fn seed(&self, bucket: &str, rules: Vec<Rule>) {
        let mut entry = self
            .policies
            .entry(bucket.to_string())
            .or_insert(StoredPolicy {
                rules: Vec::new(),
                version: 0,
            });
        entry.rules = rules;
        entry.version += 1;
    }

    pub fn rules(&self, bucket: &str) -> Option<Vec<Rule>> {
        self.policies.get(bucket).map(|p| p.rules.clone())
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn fetch(&self, bucket: &str) -> Result<Option<PolicyDocument>, PolicyError> {
        Ok(self.policies.get(bucket).map(|p| PolicyDocument {
            rules: p.rules.clone(),
            version: Some(p.token()),
        }))
    }

    async fn upload(
        &self,
        bucket: &str,
        rules: &[Rule],
        condition: &WriteCondition,
    ) -> Result<(), PolicyError> {
        match self.policies.entry(bucket.to_string()) {
            Entry::Occupied(mut occupied) => {
                condition.check(bucket, Some(&occupied.get().token()))?;
                if rules.is_empty() {
                    occupied.remove();
                } else {
                    let stored = occupied.get_mut();
                    stored.rules = rules.to_vec();
                    stored.version += 1;
                }
            }
            Entry::Vacant(vacant) => {
                condition.check(bucket, None)?;
                if !rules.is_empty() {
                    vacant.insert(StoredPolicy {
                        rules: rules.to_vec(),
                        version: 1,
                    });
                }
            }
        }
        self.uploads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

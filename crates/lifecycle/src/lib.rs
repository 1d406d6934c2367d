pub mod document;
pub mod error;
pub mod merge;
pub mod merger;
pub mod rule;
pub mod store;

pub use document::{PolicyDocument, VersionToken, WriteCondition};
pub use error::PolicyError;
pub use merge::{merge, Keyed, MergeAction, MergeOutcome};
pub use merger::{ApplyOptions, MergePlan, MergeReport, PolicyMerger};
pub use rule::{default_tiering_rule, Rule, DEFAULT_TIERING_RULE_ID};
pub use store::{InMemoryPolicyStore, PolicyStore, S3PolicyStore};

//! Translation between the JSON rule document and the S3 SDK types.
//!
//! The document side uses the field names of the S3 REST API. Unknown fields
//! are rejected rather than dropped: a rule that cannot round-trip must
//! never be written back.

use aws_sdk_s3::primitives::{DateTime, DateTimeFormat};
use aws_sdk_s3::types::{
    AbortIncompleteMultipartUpload, ExpirationStatus, LifecycleExpiration, LifecycleRule,
    LifecycleRuleAndOperator, LifecycleRuleFilter, NoncurrentVersionExpiration,
    NoncurrentVersionTransition, Tag, Transition, TransitionStorageClass,
};
use serde::{Deserialize, Serialize};

use crate::error::PolicyError;
use crate::rule::Rule;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct RuleDoc {
    #[serde(rename = "ID", default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<FilterDoc>,
    status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiration: Option<ExpirationDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    transitions: Vec<TransitionDoc>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    noncurrent_version_transitions: Vec<NoncurrentTransitionDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    noncurrent_version_expiration: Option<NoncurrentExpirationDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    abort_incomplete_multipart_upload: Option<AbortDoc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct FilterDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tag: Option<TagDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_size_greater_than: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_size_less_than: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    and: Option<AndDoc>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct AndDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<TagDoc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_size_greater_than: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    object_size_less_than: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct TagDoc {
    key: String,
    value: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct ExpirationDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expired_object_delete_marker: Option<bool>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct TransitionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct NoncurrentTransitionDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    noncurrent_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    storage_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    newer_noncurrent_versions: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct NoncurrentExpirationDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    noncurrent_days: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    newer_noncurrent_versions: Option<i32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
struct AbortDoc {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    days_after_initiation: Option<i32>,
}

fn invalid(rule_id: Option<&str>, msg: impl std::fmt::Display) -> PolicyError {
    PolicyError::InvalidRule(format!("{}: {msg}", rule_id.unwrap_or("<no ID>")))
}

#[allow(deprecated)]
pub fn rule_to_sdk(rule: &Rule) -> Result<LifecycleRule, PolicyError> {
    let id = rule.id.as_deref();
    let doc: RuleDoc =
        serde_json::from_value(rule.to_value()?).map_err(|e| invalid(id, e))?;

    let status = match doc.status.as_str() {
        "Enabled" => ExpirationStatus::Enabled,
        "Disabled" => ExpirationStatus::Disabled,
        other => return Err(invalid(id, format!("unknown Status '{other}'"))),
    };

    let filter = doc.filter.map(|f| filter_to_sdk(id, f)).transpose()?;
    let expiration = doc
        .expiration
        .map(|e| -> Result<_, PolicyError> {
            Ok(LifecycleExpiration::builder()
                .set_date(parse_date(id, e.date)?)
                .set_days(e.days)
                .set_expired_object_delete_marker(e.expired_object_delete_marker)
                .build())
        })
        .transpose()?;

    let transitions = doc
        .transitions
        .into_iter()
        .map(|t| -> Result<_, PolicyError> {
            Ok(Transition::builder()
                .set_date(parse_date(id, t.date)?)
                .set_days(t.days)
                .set_storage_class(t.storage_class.as_deref().map(TransitionStorageClass::from))
                .build())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let noncurrent_transitions = doc
        .noncurrent_version_transitions
        .into_iter()
        .map(|t| {
            NoncurrentVersionTransition::builder()
                .set_noncurrent_days(t.noncurrent_days)
                .set_storage_class(t.storage_class.as_deref().map(TransitionStorageClass::from))
                .set_newer_noncurrent_versions(t.newer_noncurrent_versions)
                .build()
        })
        .collect::<Vec<_>>();

    let noncurrent_expiration = doc.noncurrent_version_expiration.map(|e| {
        NoncurrentVersionExpiration::builder()
            .set_noncurrent_days(e.noncurrent_days)
            .set_newer_noncurrent_versions(e.newer_noncurrent_versions)
            .build()
    });

    let abort = doc.abort_incomplete_multipart_upload.map(|a| {
        AbortIncompleteMultipartUpload::builder()
            .set_days_after_initiation(a.days_after_initiation)
            .build()
    });

    LifecycleRule::builder()
        .set_id(doc.id)
        .set_prefix(doc.prefix)
        .set_filter(filter)
        .status(status)
        .set_expiration(expiration)
        .set_transitions(non_empty(transitions))
        .set_noncurrent_version_transitions(non_empty(noncurrent_transitions))
        .set_noncurrent_version_expiration(noncurrent_expiration)
        .set_abort_incomplete_multipart_upload(abort)
        .build()
        .map_err(|e| invalid(id, e))
}

#[allow(deprecated)]
pub fn rule_from_sdk(rule: &LifecycleRule) -> Result<Rule, PolicyError> {
    let id = rule.id();
    let doc = RuleDoc {
        id: id.map(str::to_string),
        prefix: rule.prefix().map(str::to_string),
        filter: rule.filter().map(filter_from_sdk),
        status: rule.status().as_str().to_string(),
        expiration: rule
            .expiration()
            .map(|e| -> Result<_, PolicyError> {
                Ok(ExpirationDoc {
                    date: format_date(id, e.date())?,
                    days: e.days(),
                    expired_object_delete_marker: e.expired_object_delete_marker(),
                })
            })
            .transpose()?,
        transitions: rule
            .transitions()
            .iter()
            .map(|t| -> Result<_, PolicyError> {
                Ok(TransitionDoc {
                    date: format_date(id, t.date())?,
                    days: t.days(),
                    storage_class: t.storage_class().map(|c| c.as_str().to_string()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?,
        noncurrent_version_transitions: rule
            .noncurrent_version_transitions()
            .iter()
            .map(|t| NoncurrentTransitionDoc {
                noncurrent_days: t.noncurrent_days(),
                storage_class: t.storage_class().map(|c| c.as_str().to_string()),
                newer_noncurrent_versions: t.newer_noncurrent_versions(),
            })
            .collect(),
        noncurrent_version_expiration: rule.noncurrent_version_expiration().map(|e| {
            NoncurrentExpirationDoc {
                noncurrent_days: e.noncurrent_days(),
                newer_noncurrent_versions: e.newer_noncurrent_versions(),
            }
        }),
        abort_incomplete_multipart_upload: rule.abort_incomplete_multipart_upload().map(|a| {
            AbortDoc {
                days_after_initiation: a.days_after_initiation(),
            }
        }),
    };

    Ok(serde_json::from_value(serde_json::to_value(doc)?)?)
}

fn filter_to_sdk(id: Option<&str>, f: FilterDoc) -> Result<LifecycleRuleFilter, PolicyError> {
    let tag = f.tag.map(|t| tag_to_sdk(id, t)).transpose()?;
    let and = f
        .and
        .map(|a| -> Result<_, PolicyError> {
            let tags = a
                .tags
                .into_iter()
                .map(|t| tag_to_sdk(id, t))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(LifecycleRuleAndOperator::builder()
                .set_prefix(a.prefix)
                .set_tags(non_empty(tags))
                .set_object_size_greater_than(a.object_size_greater_than)
                .set_object_size_less_than(a.object_size_less_than)
                .build())
        })
        .transpose()?;

    Ok(LifecycleRuleFilter::builder()
        .set_prefix(f.prefix)
        .set_tag(tag)
        .set_object_size_greater_than(f.object_size_greater_than)
        .set_object_size_less_than(f.object_size_less_than)
        .set_and(and)
        .build())
}

fn filter_from_sdk(f: &LifecycleRuleFilter) -> FilterDoc {
    FilterDoc {
        prefix: f.prefix().map(str::to_string),
        tag: f.tag().map(tag_from_sdk),
        object_size_greater_than: f.object_size_greater_than(),
        object_size_less_than: f.object_size_less_than(),
        and: f.and().map(|a| AndDoc {
            prefix: a.prefix().map(str::to_string),
            tags: a.tags().iter().map(tag_from_sdk).collect(),
            object_size_greater_than: a.object_size_greater_than(),
            object_size_less_than: a.object_size_less_than(),
        }),
    }
}

fn tag_to_sdk(id: Option<&str>, t: TagDoc) -> Result<Tag, PolicyError> {
    Tag::builder()
        .key(t.key)
        .value(t.value)
        .build()
        .map_err(|e| invalid(id, e))
}

fn tag_from_sdk(t: &Tag) -> TagDoc {
    TagDoc {
        key: t.key().to_string(),
        value: t.value().to_string(),
    }
}

fn parse_date(id: Option<&str>, date: Option<String>) -> Result<Option<DateTime>, PolicyError> {
    date.map(|d| {
        DateTime::from_str(&d, DateTimeFormat::DateTime)
            .map_err(|e| invalid(id, format!("bad Date '{d}': {e}")))
    })
    .transpose()
}

fn format_date(id: Option<&str>, date: Option<&DateTime>) -> Result<Option<String>, PolicyError> {
    date.map(|d| {
        d.fmt(DateTimeFormat::DateTime)
            .map_err(|e| invalid(id, format!("unrepresentable Date: {e}")))
    })
    .transpose()
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}

use aws_sdk_ec2::types::{Filter, Instance};
use aws_sdk_ec2::Client;

use super::Inventory;
use crate::error::{transport, AlarmError};
use crate::inventory::{InstanceRecord, InstanceState, TargetSelector};

/// EC2 instances, filtered by tag and state on the server.
#[derive(Clone)]
pub struct Ec2Inventory {
    client: Client,
}

impl Ec2Inventory {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn server_filters(selector: &TargetSelector) -> [Filter; 2] {
    let tag = Filter::builder()
        .name(format!("tag:{}", selector.tag_key))
        .set_values(Some(selector.tag_values.iter().cloned().collect()))
        .build();
    let state = Filter::builder()
        .name("instance-state-name")
        .set_values(Some(
            selector
                .allowed_states
                .iter()
                .map(|state| state.as_str().to_string())
                .collect(),
        ))
        .build();
    [tag, state]
}

fn instance_record(instance: &Instance) -> Option<InstanceRecord> {
    let id = instance.instance_id()?;
    let state = instance
        .state()
        .and_then(|s| s.name())
        .and_then(|name| InstanceState::parse(name.as_str()));
    let tags = instance
        .tags()
        .iter()
        .filter_map(|tag| Some((tag.key()?.to_string(), tag.value().unwrap_or_default().to_string())))
        .collect();
    Some(InstanceRecord {
        id: id.to_string(),
        state,
        tags,
    })
}

#[async_trait::async_trait]
impl Inventory for Ec2Inventory {
    async fn list_instances(&self, selector: &TargetSelector) -> Result<Vec<InstanceRecord>, AlarmError> {
        let [tag, state] = server_filters(selector);
        let mut pages = self
            .client
            .describe_instances()
            .filters(tag)
            .filters(state)
            .into_paginator()
            .send();

        let mut records = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(transport)?;
            for reservation in page.reservations() {
                records.extend(reservation.instances().iter().filter_map(instance_record));
            }
        }

        tracing::debug!(tag_key = %selector.tag_key, instances = records.len(), "instances listed");
        Ok(records)
    }
}

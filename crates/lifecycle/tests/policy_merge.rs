use serde_json::json;

use cloudkeep_lifecycle::{
    default_tiering_rule, merge, ApplyOptions, InMemoryPolicyStore, MergeAction, PolicyMerger,
    Rule, DEFAULT_TIERING_RULE_ID,
};

fn rule(value: serde_json::Value) -> Rule {
    Rule::from_value(value).unwrap()
}

#[test]
fn replaces_matching_rule_in_place() {
    let existing = vec![rule(json!({"ID": "a"})), rule(json!({"ID": "b"}))];
    let incoming = rule(json!({"ID": "b", "payload": "X"}));

    let out = merge(&existing, incoming.clone()).unwrap();

    assert_eq!(out.rules, vec![rule(json!({"ID": "a"})), incoming]);
    assert_eq!(out.action, MergeAction::Replaced { position: 1 });
}

#[test]
fn merge_properties_hold_over_several_shapes() {
    let existing: Vec<Rule> = ["logs", "tmp", "archive", "media"]
        .iter()
        .enumerate()
        .map(|(i, id)| rule(json!({"ID": id, "Status": "Enabled", "Expiration": {"Days": i + 1}})))
        .collect();

    let candidates = [
        rule(json!({"ID": "tmp", "Status": "Disabled"})),
        rule(json!({"ID": "media", "Status": "Enabled", "Expiration": {"Days": 4}})),
        default_tiering_rule(),
    ];

    for candidate in candidates {
        let key = candidate.id.clone().unwrap();
        let known = existing.iter().any(|r| r.id.as_deref() == Some(key.as_str()));

        let once = merge(&existing, candidate.clone()).unwrap();
        let expected_len = if known { existing.len() } else { existing.len() + 1 };
        assert_eq!(once.rules.len(), expected_len);

        let unrelated_before: Vec<_> = existing
            .iter()
            .filter(|r| r.id.as_deref() != Some(key.as_str()))
            .collect();
        let unrelated_after: Vec<_> = once
            .rules
            .iter()
            .filter(|r| r.id.as_deref() != Some(key.as_str()))
            .collect();
        assert_eq!(unrelated_before, unrelated_after);

        let twice = merge(&once.rules, candidate).unwrap();
        assert_eq!(twice.rules, once.rules);
    }
}

#[tokio::test]
async fn rerunning_the_tiering_merge_converges() {
    let store = InMemoryPolicyStore::with_policy(
        "media-bucket",
        vec![rule(json!({"ID": "expire-tmp", "Status": "Enabled", "Filter": {"Prefix": "tmp/"}, "Expiration": {"Days": 1}}))],
    );
    let merger = PolicyMerger::new(store.clone());

    let first = merger
        .apply("media-bucket", default_tiering_rule(), ApplyOptions::default())
        .await
        .unwrap();
    assert_eq!(first.action, MergeAction::Inserted { position: 1 });
    assert!(first.uploaded);

    let second = merger
        .apply("media-bucket", default_tiering_rule(), ApplyOptions::default())
        .await
        .unwrap();
    assert_eq!(second.action, MergeAction::Unchanged { position: 1 });
    assert!(!second.uploaded);

    let rules = store.rules("media-bucket").unwrap();
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id.as_deref(), Some("expire-tmp"));
    assert_eq!(rules[1].id.as_deref(), Some(DEFAULT_TIERING_RULE_ID));
    assert_eq!(store.upload_count(), 1);
}

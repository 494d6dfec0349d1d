/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

use integration_test_utils::init_logging;
use rules_aggregator::{
    RequestContext, RuleGroup, RulesAggregator, RulesErrorKind, RulesRequest, RulesResponse,
};
use rules_static_file::{ReplicaSource, StaticFileRulesFanout};
use std::path::PathBuf;
use std::sync::Arc;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("static-configs")
        .join(name)
}

fn aggregator(sources: Vec<ReplicaSource>) -> RulesAggregator {
    RulesAggregator::with_dedup(Arc::new(StaticFileRulesFanout::new(sources)), ["replica"])
}

fn two_replicas() -> Vec<ReplicaSource> {
    vec![
        ReplicaSource::new("replica-0", fixture("replica-0.json")),
        ReplicaSource::new("replica-1", fixture("replica-1.json")),
    ]
}

fn group<'a>(response: &'a RulesResponse, name: &str) -> &'a RuleGroup {
    response
        .groups
        .groups
        .iter()
        .find(|group| group.name == name)
        .unwrap_or_else(|| panic!("group {name} missing from response"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn replicas_merge_into_one_deduplicated_view() {
    init_logging();

    let response = aggregator(two_replicas())
        .rules(&RequestContext::background(), &RulesRequest::default())
        .await
        .unwrap();

    assert_eq!(response.groups.groups.len(), 3);
    assert!(response.warnings.is_empty());

    let node = group(&response, "node");
    assert_eq!(node.rules.len(), 2);
    for rule in &node.rules {
        assert!(!rule.labels().contains("replica"));
    }
    assert_eq!(group(&response, "api").rules.len(), 1);
    assert_eq!(group(&response, "storage").rules.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn selector_keeps_only_literal_matches() {
    init_logging();

    let response = aggregator(two_replicas())
        .rules(
            &RequestContext::background(),
            &RulesRequest::with_selectors([r#"{severity="page"}"#]),
        )
        .await
        .unwrap();

    assert_eq!(response.groups.groups.len(), 1);
    let node = group(&response, "node");
    assert_eq!(node.rules.len(), 1);
    assert_eq!(node.rules[0].name(), "InstanceDown");
}

#[tokio::test]
async fn failed_source_becomes_warning() {
    init_logging();
    let sources = vec![
        ReplicaSource::new("replica-0", fixture("replica-0.json")),
        ReplicaSource::new("replica-2", fixture("replica-2.json")),
    ];

    let response = aggregator(sources)
        .rules(&RequestContext::background(), &RulesRequest::default())
        .await
        .unwrap();

    assert_eq!(response.groups.groups.len(), 2);
    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].starts_with("replica-2: unable to read"));
}

#[tokio::test]
async fn unparsable_source_becomes_warning() {
    init_logging();
    let sources = vec![
        ReplicaSource::new("replica-0", fixture("replica-0.json")),
        ReplicaSource::new("broken", fixture("broken.json")),
    ];

    let response = aggregator(sources)
        .rules(&RequestContext::background(), &RulesRequest::default())
        .await
        .unwrap();

    assert_eq!(response.warnings.len(), 1);
    assert!(response.warnings[0].starts_with("broken: unable to parse"));
}

#[tokio::test]
async fn all_sources_failing_is_upstream_unavailable() {
    init_logging();
    let sources = vec![
        ReplicaSource::new("a", fixture("missing-a.json")),
        ReplicaSource::new("b", fixture("broken.json")),
    ];

    let err = aggregator(sources)
        .rules(&RequestContext::background(), &RulesRequest::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), RulesErrorKind::UpstreamUnavailable);
    assert!(err.to_string().contains("all 2 rules sources failed"));
}

#[tokio::test]
async fn no_sources_yields_empty_response() {
    let response = aggregator(Vec::new())
        .rules(&RequestContext::background(), &RulesRequest::default())
        .await
        .unwrap();

    assert!(response.groups.groups.is_empty());
    assert!(response.warnings.is_empty());
}

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

use integration_test_utils::{ReplicaScript, ScriptedFanout};
use rules_aggregator::{
    RequestContext, RulesAggregator, RulesError, RulesRequest, RulesResponse,
};
use std::sync::Arc;

pub(crate) fn aggregator_over(
    replicas: Vec<ReplicaScript>,
    replica_labels: &[&str],
) -> (RulesAggregator, Arc<ScriptedFanout>) {
    let fanout = Arc::new(ScriptedFanout::new(replicas));
    let aggregator = RulesAggregator::with_dedup(fanout.clone(), replica_labels.iter().copied());
    (aggregator, fanout)
}

#[allow(dead_code)]
pub(crate) async fn request_rules(
    aggregator: &RulesAggregator,
    selectors: &[&str],
) -> Result<RulesResponse, RulesError> {
    aggregator
        .rules(
            &RequestContext::background(),
            &RulesRequest::with_selectors(selectors.iter().copied()),
        )
        .await
}

#[allow(dead_code)]
pub(crate) fn rule_count(response: &RulesResponse) -> usize {
    response
        .groups
        .groups
        .iter()
        .map(|group| group.rules.len())
        .sum()
}

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

//! Removal of rules duplicated across HA replicas.

use crate::model::{Rule, RuleComparison};
use std::collections::{HashMap, HashSet};

/// Label names identifying the HA replica dimension, e.g. `replica`.
pub type ReplicaLabelNames = HashSet<String>;

/// Strips replica labels, then drops every rule that deep-compares equal to an already
/// retained rule with the same canonical identity.
///
/// Rules sharing an identity but comparing [`RuleComparison::Different`] are all kept.
/// Output keeps first-seen order.
pub fn dedup_rules(rules: Vec<Rule>, replica_labels: &ReplicaLabelNames) -> Vec<Rule> {
    let mut retained_by_identity: HashMap<String, Vec<usize>> = HashMap::new();
    let mut unique_rules: Vec<Rule> = Vec::with_capacity(rules.len());

    for mut rule in rules {
        normalize_labels(&mut rule, replica_labels);

        let positions = retained_by_identity
            .entry(canonical_identity(&rule))
            .or_default();
        let duplicate = positions
            .iter()
            .any(|&position| unique_rules[position].compare(&rule) == RuleComparison::Equal);
        if duplicate {
            continue;
        }

        positions.push(unique_rules.len());
        unique_rules.push(rule);
    }

    unique_rules
}

fn normalize_labels(rule: &mut Rule, replica_labels: &ReplicaLabelNames) {
    let labels = rule.labels_mut();
    if !replica_labels.is_empty() {
        labels.retain(|label| !replica_labels.contains(&label.name));
    }
    labels.sort_by_name();
}

/// Identity over the variant, name and normalized label set.
fn canonical_identity(rule: &Rule) -> String {
    format!("{}:{:?}:{}", rule.kind(), rule.name(), rule.labels())
}

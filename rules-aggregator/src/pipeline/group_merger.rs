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

//! Merges same-named rule groups contributed by different replicas.

use crate::model::RuleGroup;
use std::collections::HashMap;

/// Collapses groups sharing a name into the first-seen group, concatenating rules in
/// delivery order. Rule-level duplicates are left for the replica deduper.
pub fn dedup_groups(groups: Vec<RuleGroup>) -> Vec<RuleGroup> {
    let mut position_by_name: HashMap<String, usize> = HashMap::with_capacity(groups.len());
    let mut unique_groups: Vec<RuleGroup> = Vec::with_capacity(groups.len());

    for group in groups {
        match position_by_name.get(&group.name) {
            Some(&position) => unique_groups[position].rules.extend(group.rules),
            None => {
                position_by_name.insert(group.name.clone(), unique_groups.len());
                unique_groups.push(group);
            }
        }
    }

    unique_groups
}

#[cfg(test)]
mod tests {
    use super::dedup_groups;
    use crate::model::{RecordingRule, Rule, RuleGroup};

    fn recording(name: &str) -> Rule {
        Rule::Recording(RecordingRule {
            name: name.to_string(),
            query: "sum(up)".to_string(),
            ..Default::default()
        })
    }

    fn rule_names(group: &RuleGroup) -> Vec<&str> {
        group.rules.iter().map(Rule::name).collect()
    }

    #[test]
    fn same_name_from_two_shards_concatenates_rules() {
        let merged = dedup_groups(vec![
            RuleGroup::new("g1", vec![recording("a")]),
            RuleGroup::new("g1", vec![recording("b"), recording("c")]),
        ]);

        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "g1");
        assert_eq!(rule_names(&merged[0]), vec!["a", "b", "c"]);
    }

    #[test]
    fn first_seen_order_is_preserved_across_interleaved_names() {
        let merged = dedup_groups(vec![
            RuleGroup::new("g2", vec![recording("x")]),
            RuleGroup::new("g1", vec![recording("y")]),
            RuleGroup::new("g2", vec![recording("z")]),
            RuleGroup::new("g3", vec![recording("w")]),
            RuleGroup::new("g1", vec![recording("v")]),
        ]);

        let names: Vec<&str> = merged.iter().map(|group| group.name.as_str()).collect();
        assert_eq!(names, vec!["g2", "g1", "g3"]);
        assert_eq!(rule_names(&merged[0]), vec!["x", "z"]);
        assert_eq!(rule_names(&merged[1]), vec!["y", "v"]);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(dedup_groups(Vec::new()).is_empty());
    }
}

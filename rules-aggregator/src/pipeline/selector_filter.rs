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

//! Label-selector filtering of streamed rule groups.

use crate::model::{Labels, RuleGroup};
use crate::pipeline::label_template::is_literal_label_value;
use crate::selector::MatcherSet;

/// Keeps rules whose literal labels satisfy every matcher of every set.
///
/// Groups left without rules are dropped; surviving groups keep their delivery order.
/// An empty `matcher_sets` slice keeps everything.
pub fn filter_rules(groups: Vec<RuleGroup>, matcher_sets: &[MatcherSet]) -> Vec<RuleGroup> {
    if matcher_sets.is_empty() {
        return groups;
    }

    groups
        .into_iter()
        .filter_map(|mut group| {
            group
                .rules
                .retain(|rule| matches_literal_labels(matcher_sets, rule.labels()));
            (!group.rules.is_empty()).then_some(group)
        })
        .collect()
}

/// Templated label values are unknown until evaluation, so only literal labels take part.
/// A matcher on a label outside the literal subset sees the empty string.
pub fn matches_literal_labels(matcher_sets: &[MatcherSet], labels: &Labels) -> bool {
    if matcher_sets.is_empty() {
        return true;
    }

    let literal_labels: Labels = labels
        .iter()
        .filter(|label| is_literal_label_value(&label.value))
        .cloned()
        .collect();

    matcher_sets
        .iter()
        .flatten()
        .all(|matcher| matcher.matches(literal_labels.get(matcher.name())))
}

#[cfg(test)]
mod tests {
    use super::{filter_rules, matches_literal_labels};
    use crate::model::{AlertingRule, Labels, Rule, RuleGroup};
    use crate::selector::{parse_metric_selector, MatcherSet};

    fn rule(labels: &[(&str, &str)]) -> Rule {
        Rule::Alerting(AlertingRule {
            name: "Up".to_string(),
            labels: labels.iter().copied().collect::<Labels>(),
            ..Default::default()
        })
    }

    fn selectors(inputs: &[&str]) -> Vec<MatcherSet> {
        inputs
            .iter()
            .map(|input| parse_metric_selector(input).expect("valid selector"))
            .collect()
    }

    #[test]
    fn empty_matcher_sets_keep_every_rule() {
        let groups = vec![
            RuleGroup::new("g1", vec![rule(&[("job", "a")])]),
            RuleGroup::new("g2", vec![rule(&[])]),
        ];

        assert_eq!(filter_rules(groups.clone(), &[]), groups);
    }

    #[test]
    fn equality_selector_keeps_matching_rule_only() {
        let groups = vec![RuleGroup::new(
            "g1",
            vec![rule(&[("job", "a")]), rule(&[("job", "b")])],
        )];

        let filtered = filter_rules(groups, &selectors(&[r#"{job="a"}"#]));

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].rules.len(), 1);
        assert_eq!(filtered[0].rules[0].labels().get("job"), "a");
    }

    #[test]
    fn groups_without_survivors_are_dropped_and_order_is_kept() {
        let groups = vec![
            RuleGroup::new("first", vec![rule(&[("job", "a")])]),
            RuleGroup::new("empty", vec![rule(&[("job", "b")])]),
            RuleGroup::new("last", vec![rule(&[("job", "a")])]),
        ];

        let names: Vec<String> = filter_rules(groups, &selectors(&[r#"{job="a"}"#]))
            .into_iter()
            .map(|group| group.name)
            .collect();

        assert_eq!(names, vec!["first", "last"]);
    }

    #[test]
    fn every_set_must_match() {
        let sets = selectors(&[r#"{job="a"}"#, r#"{env=~"prod.*"}"#]);

        let both: Labels = [("job", "a"), ("env", "production")].into_iter().collect();
        let only_job: Labels = [("job", "a"), ("env", "dev")].into_iter().collect();

        assert!(matches_literal_labels(&sets, &both));
        assert!(!matches_literal_labels(&sets, &only_job));
    }

    #[test]
    fn templated_labels_are_invisible_to_matchers() {
        let templated: Labels = [
            ("alertname", "Up"),
            ("severity", "{{ if gt $value 10.0 }}page{{ end }}"),
        ]
        .into_iter()
        .collect();

        // The templated value is treated as absent, so an equality on it cannot hold ...
        assert!(!matches_literal_labels(
            &selectors(&[r#"{severity="page"}"#]),
            &templated
        ));
        // ... and a negative matcher cannot reject it.
        assert!(matches_literal_labels(
            &selectors(&[
                r#"{alertname="Up", severity!="{{ if gt $value 10.0 }}page{{ end }}"}"#
            ]),
            &templated
        ));
    }

    #[test]
    fn absent_label_is_matched_as_empty_string() {
        let labels: Labels = [("job", "a")].into_iter().collect();

        assert!(matches_literal_labels(
            &selectors(&[r#"{job="a", team!="obs"}"#]),
            &labels
        ));
        assert!(!matches_literal_labels(
            &selectors(&[r#"{job="a", team=~"obs|"}"#, r#"{team="obs"}"#]),
            &labels
        ));
    }
}

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

use rules_aggregator::{AlertState, AlertingRule, Labels, RecordingRule, Rule, RuleGroup};

pub fn alerting_rule(name: &str, query: &str, labels: &[(&str, &str)]) -> Rule {
    Rule::Alerting(AlertingRule {
        name: name.to_string(),
        state: AlertState::Firing,
        query: query.to_string(),
        duration_seconds: 300.0,
        labels: labels.iter().copied().collect::<Labels>(),
        ..Default::default()
    })
}

pub fn recording_rule(name: &str, query: &str, labels: &[(&str, &str)]) -> Rule {
    Rule::Recording(RecordingRule {
        name: name.to_string(),
        query: query.to_string(),
        labels: labels.iter().copied().collect::<Labels>(),
        ..Default::default()
    })
}

pub fn group(name: &str, rules: Vec<Rule>) -> RuleGroup {
    RuleGroup {
        file: format!("/etc/rules/{name}.yaml"),
        interval_seconds: 30.0,
        ..RuleGroup::new(name, rules)
    }
}

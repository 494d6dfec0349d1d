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

//! Recording/alerting rule variants and named rule groups.

use crate::model::labels::Labels;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Outcome of a variant-level deep comparison between two rules.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RuleComparison {
    Equal,
    Different,
}

impl RuleComparison {
    fn all(checks: &[bool]) -> Self {
        if checks.iter().all(|check| *check) {
            RuleComparison::Equal
        } else {
            RuleComparison::Different
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RuleKind {
    Recording,
    Alerting,
}

impl Display for RuleKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Recording => write!(f, "recording"),
            RuleKind::Alerting => write!(f, "alerting"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertState {
    #[default]
    Inactive,
    Pending,
    Firing,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleHealth {
    #[default]
    Unknown,
    Ok,
    Err,
}

/// Rule producing a derived time series.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RecordingRule {
    pub name: String,
    pub query: String,
    pub labels: Labels,
    pub health: RuleHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub evaluation_duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluation: Option<String>,
}

impl RecordingRule {
    /// Name, query and label set decide equality; evaluation data is replica-local.
    pub fn compare(&self, other: &RecordingRule) -> RuleComparison {
        RuleComparison::all(&[
            self.name == other.name,
            self.query == other.query,
            self.labels == other.labels,
        ])
    }
}

/// One alert instance currently tracked by an alerting rule.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ActiveAlert {
    pub labels: Labels,
    pub annotations: Labels,
    pub state: AlertState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_at: Option<String>,
    pub value: String,
}

/// Rule producing alert state.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AlertingRule {
    pub name: String,
    pub state: AlertState,
    pub query: String,
    pub duration_seconds: f64,
    pub keep_firing_for_seconds: f64,
    pub labels: Labels,
    pub annotations: Labels,
    pub alerts: Vec<ActiveAlert>,
    pub health: RuleHealth,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub evaluation_duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_evaluation: Option<String>,
}

impl AlertingRule {
    /// Active alerts, annotations and evaluation data are replica-local and ignored.
    pub fn compare(&self, other: &AlertingRule) -> RuleComparison {
        RuleComparison::all(&[
            self.name == other.name,
            self.state == other.state,
            self.query == other.query,
            self.duration_seconds
                .total_cmp(&other.duration_seconds)
                .is_eq(),
            self.keep_firing_for_seconds
                .total_cmp(&other.keep_firing_for_seconds)
                .is_eq(),
            self.labels == other.labels,
        ])
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Rule {
    Recording(RecordingRule),
    Alerting(AlertingRule),
}

impl Rule {
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Recording(_) => RuleKind::Recording,
            Rule::Alerting(_) => RuleKind::Alerting,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Rule::Recording(rule) => &rule.name,
            Rule::Alerting(rule) => &rule.name,
        }
    }

    pub fn labels(&self) -> &Labels {
        match self {
            Rule::Recording(rule) => &rule.labels,
            Rule::Alerting(rule) => &rule.labels,
        }
    }

    pub fn labels_mut(&mut self) -> &mut Labels {
        match self {
            Rule::Recording(rule) => &mut rule.labels,
            Rule::Alerting(rule) => &mut rule.labels,
        }
    }

    /// Deep comparison; rules of different variants are always [`RuleComparison::Different`].
    pub fn compare(&self, other: &Rule) -> RuleComparison {
        match (self, other) {
            (Rule::Recording(a), Rule::Recording(b)) => a.compare(b),
            (Rule::Alerting(a), Rule::Alerting(b)) => a.compare(b),
            _ => RuleComparison::Different,
        }
    }
}

/// Named collection of rules evaluated together.
///
/// Groups are identified by `name` only when merging replica contributions.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct RuleGroup {
    pub name: String,
    pub file: String,
    pub interval_seconds: f64,
    pub limit: u64,
    pub rules: Vec<Rule>,
}

impl RuleGroup {
    pub fn new(name: impl Into<String>, rules: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            rules,
            ..Default::default()
        }
    }
}

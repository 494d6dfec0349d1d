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

//! Rule data model and request/response shapes of the rules API.

mod labels;
mod rule;

pub use labels::{DuplicateLabelError, Label, Labels};
pub use rule::{
    ActiveAlert, AlertState, AlertingRule, RecordingRule, Rule, RuleComparison, RuleGroup,
    RuleHealth, RuleKind,
};

use serde::{Deserialize, Serialize};

/// Rules query: each selector is a label-matcher expression such as `{job="x"}`.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct RulesRequest {
    #[serde(default)]
    pub selectors: Vec<String>,
}

impl RulesRequest {
    pub fn with_selectors<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            selectors: selectors.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RuleGroups {
    pub groups: Vec<RuleGroup>,
}

/// Aggregated answer: deduplicated groups plus every advisory warning in arrival order.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct RulesResponse {
    #[serde(flatten)]
    pub groups: RuleGroups,
    pub warnings: Vec<String>,
}

/// One streamed delivery from a backend producer.
#[derive(Clone, Debug, PartialEq)]
pub enum RulesMessage {
    Group(RuleGroup),
    Warning(String),
}

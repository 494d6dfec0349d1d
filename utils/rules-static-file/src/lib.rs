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

//! Rules fan-out backed by one JSON document per replica.
//!
//! Each document has the shape `{ "groups": [RuleGroup, ...] }`, the same shape a
//! replica's rules endpoint serves.

use async_trait::async_trait;
use futures::future::join_all;
use rules_aggregator::observability::events;
use rules_aggregator::{
    FanoutError, RequestContext, RuleGroup, RulesFanout, RulesMessage, RulesRequest, RulesSink,
};
use serde::Deserialize;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

const COMPONENT: &str = "rules_static_file";

/// One replica whose rules are served from `file_path`.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ReplicaSource {
    pub name: String,
    pub file_path: PathBuf,
}

impl ReplicaSource {
    pub fn new(name: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            file_path: file_path.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RulesDocument {
    #[serde(default)]
    groups: Vec<RuleGroup>,
}

#[derive(Debug)]
pub enum StaticFileError {
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    Unparsable {
        path: PathBuf,
        source: serde_json::Error,
    },
    AllSourcesFailed {
        sources: usize,
    },
}

impl Display for StaticFileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StaticFileError::Unreadable { path, source } => {
                write!(f, "unable to read {}: {source}", path.display())
            }
            StaticFileError::Unparsable { path, source } => {
                write!(f, "unable to parse {}: {source}", path.display())
            }
            StaticFileError::AllSourcesFailed { sources } => {
                write!(f, "all {sources} rules sources failed")
            }
        }
    }
}

impl Error for StaticFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StaticFileError::Unreadable { source, .. } => Some(source),
            StaticFileError::Unparsable { source, .. } => Some(source),
            StaticFileError::AllSourcesFailed { .. } => None,
        }
    }
}

/// Reads the rule groups of one replica document.
pub async fn load_rule_groups(path: &Path) -> Result<Vec<RuleGroup>, StaticFileError> {
    let data = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| StaticFileError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
    let document: RulesDocument =
        serde_json::from_str(&data).map_err(|source| StaticFileError::Unparsable {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(document.groups)
}

/// Fans a rules request out to every configured replica document, one tokio task each.
///
/// A failing source becomes a `"<source>: <reason>"` warning; the call only fails when
/// every configured source failed.
pub struct StaticFileRulesFanout {
    sources: Vec<ReplicaSource>,
}

impl StaticFileRulesFanout {
    pub fn new(sources: Vec<ReplicaSource>) -> Self {
        Self { sources }
    }
}

enum SourceOutcome {
    Served,
    Failed,
    Abandoned,
}

async fn serve_source(
    ctx: RequestContext,
    source: ReplicaSource,
    sink: Arc<dyn RulesSink>,
) -> SourceOutcome {
    debug!(
        event = events::FANOUT_SOURCE_START,
        component = COMPONENT,
        source = source.name.as_str(),
        path = %source.file_path.display(),
        "reading rules source"
    );

    let groups = match load_rule_groups(&source.file_path).await {
        Ok(groups) => groups,
        Err(err) => {
            warn!(
                event = events::FANOUT_SOURCE_FAILED,
                component = COMPONENT,
                source = source.name.as_str(),
                err = %err,
                "rules source failed"
            );
            let warning = RulesMessage::Warning(format!("{}: {err}", source.name));
            if let Err(err) = sink.send(warning).await {
                warn!(component = COMPONENT, err = %err, "unable to report source failure");
            }
            return SourceOutcome::Failed;
        }
    };

    let total = groups.len();
    for group in groups {
        if ctx.is_done() {
            info!(
                event = events::FANOUT_SOURCE_ABANDONED,
                component = COMPONENT,
                source = source.name.as_str(),
                "request done, abandoning source"
            );
            return SourceOutcome::Abandoned;
        }
        if let Err(err) = sink.send(RulesMessage::Group(group)).await {
            warn!(
                component = COMPONENT,
                source = source.name.as_str(),
                err = %err,
                "rule group rejected"
            );
        }
    }

    debug!(
        event = events::FANOUT_SOURCE_OK,
        component = COMPONENT,
        source = source.name.as_str(),
        groups = total,
        "rules source served"
    );
    SourceOutcome::Served
}

#[async_trait]
impl RulesFanout for StaticFileRulesFanout {
    async fn rules(
        &self,
        ctx: &RequestContext,
        _request: &RulesRequest,
        sink: Arc<dyn RulesSink>,
    ) -> Result<(), FanoutError> {
        let tasks = self
            .sources
            .iter()
            .cloned()
            .map(|source| tokio::spawn(serve_source(ctx.clone(), source, sink.clone())));

        let mut failed = 0;
        for joined in join_all(tasks).await {
            match joined? {
                SourceOutcome::Failed => failed += 1,
                SourceOutcome::Served | SourceOutcome::Abandoned => {}
            }
        }

        if !self.sources.is_empty() && failed == self.sources.len() {
            let err = StaticFileError::AllSourcesFailed { sources: failed };
            warn!(
                event = events::FANOUT_ALL_SOURCES_FAILED,
                component = COMPONENT,
                err = %err,
                "no rules source could be served"
            );
            return Err(err.into());
        }
        Ok(())
    }
}

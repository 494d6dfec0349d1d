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

use async_trait::async_trait;
use futures::future::join_all;
use rules_aggregator::{
    FanoutError, RequestContext, RuleGroup, RulesFanout, RulesMessage, RulesRequest, RulesSink,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How a scripted replica finishes after its messages were sent.
#[derive(Clone, Debug, Default)]
pub enum ReplicaOutcome {
    #[default]
    Complete,
    /// Reports the reason as a `"<replica>: <reason>"` warning.
    Unreachable(String),
    /// Never finishes on its own; only the request context ends it.
    Hang,
}

#[derive(Clone, Debug)]
pub struct ReplicaScript {
    pub name: String,
    pub delay: Duration,
    pub messages: Vec<RulesMessage>,
    pub outcome: ReplicaOutcome,
}

impl ReplicaScript {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            messages: Vec::new(),
            outcome: ReplicaOutcome::Complete,
        }
    }

    pub fn with_groups(mut self, groups: Vec<RuleGroup>) -> Self {
        self.messages
            .extend(groups.into_iter().map(RulesMessage::Group));
        self
    }

    pub fn with_message(mut self, message: RulesMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_outcome(mut self, outcome: ReplicaOutcome) -> Self {
        self.outcome = outcome;
        self
    }
}

/// Fan-out driven by per-replica scripts, each replica on its own tokio task.
pub struct ScriptedFanout {
    replicas: Vec<ReplicaScript>,
    total_failure: Option<String>,
    calls: AtomicUsize,
    finished_replicas: Arc<AtomicUsize>,
}

impl ScriptedFanout {
    pub fn new(replicas: Vec<ReplicaScript>) -> Self {
        Self {
            replicas,
            total_failure: None,
            calls: AtomicUsize::new(0),
            finished_replicas: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Runs every replica, then fails the whole call with `reason`.
    pub fn failing(mut self, reason: &str) -> Self {
        self.total_failure = Some(reason.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Replicas that ran their script to the end, across all calls.
    pub fn finished_replicas(&self) -> usize {
        self.finished_replicas.load(Ordering::SeqCst)
    }
}

async fn run_replica(
    ctx: RequestContext,
    script: ReplicaScript,
    sink: Arc<dyn RulesSink>,
    finished: Arc<AtomicUsize>,
) {
    if !script.delay.is_zero() {
        tokio::select! {
            _ = ctx.done() => return,
            _ = tokio::time::sleep(script.delay) => {}
        }
    }

    for message in script.messages {
        if let Err(err) = sink.send(message).await {
            debug!("replica {} delivery rejected: {err}", script.name);
        }
    }

    match script.outcome {
        ReplicaOutcome::Complete => {}
        ReplicaOutcome::Unreachable(reason) => {
            let warning = format!("{}: {reason}", script.name);
            let _ = sink.send(RulesMessage::Warning(warning)).await;
        }
        ReplicaOutcome::Hang => {
            ctx.done().await;
            return;
        }
    }

    finished.fetch_add(1, Ordering::SeqCst);
}

#[async_trait]
impl RulesFanout for ScriptedFanout {
    async fn rules(
        &self,
        ctx: &RequestContext,
        _request: &RulesRequest,
        sink: Arc<dyn RulesSink>,
    ) -> Result<(), FanoutError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let handles = self.replicas.iter().cloned().map(|script| {
            tokio::spawn(run_replica(
                ctx.clone(),
                script,
                sink.clone(),
                self.finished_replicas.clone(),
            ))
        });
        for joined in join_all(handles).await {
            joined?;
        }

        match &self.total_failure {
            Some(reason) => Err(reason.clone().into()),
            None => Ok(()),
        }
    }
}

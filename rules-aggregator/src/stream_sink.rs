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

//! Push interface handed to fan-out producers and the request-scoped accumulator
//! behind it.

use crate::context::RequestContext;
use crate::error::RulesError;
use crate::model::{RuleGroup, RulesMessage};
use crate::observability::{events, fields};
use async_trait::async_trait;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

const COMPONENT: &str = "stream_sink";

/// Receiver for streamed rules messages.
///
/// Implementations must accept concurrent `send` calls from any number of producers.
#[async_trait]
pub trait RulesSink: Send + Sync {
    /// Delivers one message. A group without rules or an empty warning is rejected
    /// with [`RulesError::MalformedMessage`].
    async fn send(&self, message: RulesMessage) -> Result<(), RulesError>;
}

/// Everything accumulated by a [`StreamSink`] during one request.
#[derive(Debug, Default)]
pub struct DrainedMessages {
    pub groups: Vec<RuleGroup>,
    /// Arrival order is preserved.
    pub warnings: Vec<String>,
}

#[derive(Default)]
struct SinkState {
    groups: Vec<RuleGroup>,
    warnings: Vec<String>,
    violation: Option<String>,
}

/// Mutex-guarded accumulator for one rules request.
///
/// Deliveries arriving after the request context is done are dropped without error.
pub struct StreamSink {
    ctx: RequestContext,
    state: Mutex<SinkState>,
    violated: watch::Sender<bool>,
}

impl StreamSink {
    pub fn new(ctx: RequestContext) -> Self {
        let (violated, _) = watch::channel(false);
        Self {
            ctx,
            state: Mutex::new(SinkState::default()),
            violated,
        }
    }

    /// Resolves once a malformed delivery has been rejected.
    pub async fn violated(&self) {
        let mut violated = self.violated.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = violated.wait_for(|violated| *violated).await;
    }

    /// Takes the accumulated groups and warnings, failing if any delivery was malformed.
    pub async fn drain(&self) -> Result<DrainedMessages, RulesError> {
        let mut state = self.state.lock().await;
        if let Some(reason) = state.violation.take() {
            return Err(RulesError::MalformedMessage(reason));
        }

        Ok(DrainedMessages {
            groups: std::mem::take(&mut state.groups),
            warnings: std::mem::take(&mut state.warnings),
        })
    }

    fn reject(&self, state: &mut SinkState, reason: &str, detail: String) -> RulesError {
        warn!(
            event = events::SINK_MESSAGE_REJECTED,
            component = COMPONENT,
            reason,
            detail = detail.as_str(),
            "rejecting malformed rules message"
        );
        if state.violation.is_none() {
            state.violation = Some(detail.clone());
            self.violated.send_replace(true);
        }
        RulesError::MalformedMessage(detail)
    }
}

#[async_trait]
impl RulesSink for StreamSink {
    async fn send(&self, message: RulesMessage) -> Result<(), RulesError> {
        if let Some(err) = self.ctx.err() {
            debug!(
                event = events::SINK_MESSAGE_AFTER_DONE,
                component = COMPONENT,
                kind = fields::format_message_kind(&message),
                err = %err,
                "ignoring delivery after request is done"
            );
            return Ok(());
        }

        let mut state = self.state.lock().await;
        match message {
            RulesMessage::Warning(warning) if warning.is_empty() => Err(self.reject(
                &mut state,
                fields::REASON_EMPTY_WARNING,
                "message carries neither a group nor a warning".to_string(),
            )),
            RulesMessage::Warning(warning) => {
                debug!(
                    event = events::SINK_WARNING_ACCEPTED,
                    component = COMPONENT,
                    warning = warning.as_str(),
                    "accepted warning"
                );
                state.warnings.push(warning);
                Ok(())
            }
            RulesMessage::Group(group) if group.rules.is_empty() => Err(self.reject(
                &mut state,
                fields::REASON_EMPTY_GROUP,
                format!("group {:?} carries no rules", group.name),
            )),
            RulesMessage::Group(group) => {
                debug!(
                    event = events::SINK_GROUP_ACCEPTED,
                    component = COMPONENT,
                    group = group.name.as_str(),
                    rules = group.rules.len(),
                    "accepted rule group"
                );
                state.groups.push(group);
                Ok(())
            }
        }
    }
}

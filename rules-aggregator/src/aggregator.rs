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

use crate::context::RequestContext;
use crate::error::RulesError;
use crate::fanout::{RulesFanout, UnaryRulesClient};
use crate::model::{RuleGroups, RulesRequest, RulesResponse};
use crate::observability::{events, fields};
use crate::pipeline::{dedup_groups, dedup_rules, filter_rules, ReplicaLabelNames};
use crate::selector::{parse_metric_selector, MatcherSet};
use crate::stream_sink::{DrainedMessages, RulesSink, StreamSink};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, info_span, warn, Instrument};

const COMPONENT: &str = "rules_aggregator";

/// Presents one deduplicated view of the rules served by a set of HA replicas.
///
/// Each call compiles the request selectors, runs the fan-out into a fresh
/// [`StreamSink`], then filters, merges and deduplicates what the sink collected.
/// Nothing is kept between calls.
#[derive(Clone)]
pub struct RulesAggregator {
    fanout: Arc<dyn RulesFanout>,
    replica_labels: ReplicaLabelNames,
}

impl RulesAggregator {
    /// Aggregator without replica labels: only rules identical in every label collapse.
    pub fn new(fanout: Arc<dyn RulesFanout>) -> Self {
        Self::with_dedup(fanout, Vec::<String>::new())
    }

    pub fn with_dedup<I, S>(fanout: Arc<dyn RulesFanout>, replica_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fanout,
            replica_labels: replica_labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the canonical rule groups plus every warning reported by the fan-out.
    ///
    /// Blocks until the fan-out finishes, `ctx` is done or a producer delivers a
    /// malformed message. On cancellation the call returns `ctx`'s error right away and
    /// abandons producers still in flight; a malformed message does the same with
    /// [`RulesError::MalformedMessage`].
    pub async fn rules(
        &self,
        ctx: &RequestContext,
        request: &RulesRequest,
    ) -> Result<RulesResponse, RulesError> {
        let span = info_span!(
            "rules_request",
            selectors = request.selectors.len(),
            replica_labels = self.replica_labels.len()
        );
        self.aggregate(ctx, request).instrument(span).await
    }

    async fn aggregate(
        &self,
        ctx: &RequestContext,
        request: &RulesRequest,
    ) -> Result<RulesResponse, RulesError> {
        debug!(
            event = events::RULES_REQUEST_START,
            component = COMPONENT,
            selector = fields::format_selectors(&request.selectors).as_str(),
            "starting rules request"
        );

        let matcher_sets = compile_selectors(&request.selectors)?;

        if let Some(err) = ctx.err() {
            return Err(canceled(err.into()));
        }

        let sink = Arc::new(StreamSink::new(ctx.clone()));
        let producer_sink: Arc<dyn RulesSink> = sink.clone();

        // A rejected delivery aborts the call without waiting for producers still in
        // flight; `drain` below reports the recorded violation.
        let fanout_result = tokio::select! {
            biased;
            err = ctx.done() => return Err(canceled(err.into())),
            _ = sink.violated() => Ok(()),
            result = self.fanout.rules(ctx, request, producer_sink) => result,
        };

        let DrainedMessages { groups, warnings } = sink.drain().await.map_err(|err| {
            warn!(
                event = events::RULES_REQUEST_FAILED,
                component = COMPONENT,
                err = %err,
                "rules stream carried a malformed message"
            );
            err
        })?;

        if let Err(err) = fanout_result {
            let err = RulesError::UpstreamUnavailable(err);
            warn!(
                event = events::RULES_REQUEST_FAILED,
                component = COMPONENT,
                err = %err,
                "rules fan-out failed"
            );
            return Err(err);
        }

        let received_groups = groups.len();
        let groups = filter_rules(groups, &matcher_sets);
        let mut groups = dedup_groups(groups);
        for group in &mut groups {
            let rules = std::mem::take(&mut group.rules);
            group.rules = dedup_rules(rules, &self.replica_labels);
        }

        debug!(
            event = events::PIPELINE_SUMMARY,
            component = COMPONENT,
            received_groups,
            merged_groups = groups.len(),
            rules = groups.iter().map(|group| group.rules.len()).sum::<usize>(),
            "filtered, merged and deduplicated rule groups"
        );
        info!(
            event = events::RULES_REQUEST_OK,
            component = COMPONENT,
            groups = groups.len(),
            warnings = warnings.len(),
            "rules request completed"
        );

        Ok(RulesResponse {
            groups: RuleGroups { groups },
            warnings,
        })
    }
}

#[async_trait]
impl UnaryRulesClient for RulesAggregator {
    async fn rules(
        &self,
        ctx: &RequestContext,
        request: &RulesRequest,
    ) -> Result<RulesResponse, RulesError> {
        RulesAggregator::rules(self, ctx, request).await
    }
}

/// Compiles every selector, failing on the first malformed one.
pub fn compile_selectors(selectors: &[String]) -> Result<Vec<MatcherSet>, RulesError> {
    selectors
        .iter()
        .map(|selector| {
            parse_metric_selector(selector).map_err(|source| {
                warn!(
                    event = events::SELECTOR_COMPILE_FAILED,
                    component = COMPONENT,
                    selector = selector.as_str(),
                    err = %source,
                    "rejecting rules request"
                );
                RulesError::InvalidSelector {
                    selector: selector.clone(),
                    source,
                }
            })
        })
        .collect()
}

fn canceled(err: RulesError) -> RulesError {
    info!(
        event = events::RULES_REQUEST_CANCELED,
        component = COMPONENT,
        err = %err,
        "rules request abandoned"
    );
    err
}

#[cfg(test)]
mod tests {
    use super::{compile_selectors, RulesAggregator};
    use crate::context::RequestContext;
    use crate::error::{FanoutError, RulesErrorKind};
    use crate::fanout::{RulesFanout, UnaryRulesClient};
    use crate::model::{AlertingRule, Labels, Rule, RuleGroup, RulesMessage, RulesRequest};
    use crate::stream_sink::RulesSink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FixedFanout {
        messages: Vec<RulesMessage>,
        calls: AtomicUsize,
    }

    impl FixedFanout {
        fn new(messages: Vec<RulesMessage>) -> Arc<Self> {
            Arc::new(Self {
                messages,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RulesFanout for FixedFanout {
        async fn rules(
            &self,
            _ctx: &RequestContext,
            _request: &RulesRequest,
            sink: Arc<dyn RulesSink>,
        ) -> Result<(), FanoutError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for message in self.messages.clone() {
                // Producers of real fan-outs report send errors as warnings; ignore here.
                let _ = sink.send(message).await;
            }
            Ok(())
        }
    }

    fn alert(labels: &[(&str, &str)]) -> Rule {
        Rule::Alerting(AlertingRule {
            name: "Up".to_string(),
            query: "up == 0".to_string(),
            labels: labels.iter().copied().collect::<Labels>(),
            ..Default::default()
        })
    }

    #[test]
    fn compile_selectors_keeps_request_order() {
        let sets = compile_selectors(&[r#"{job="a"}"#.to_string(), "up".to_string()]).unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0][0].name(), "job");
        assert_eq!(sets[1][0].value(), "up");
    }

    #[tokio::test]
    async fn invalid_selector_fails_before_fanout_runs() {
        let fanout = FixedFanout::new(vec![]);
        let aggregator = RulesAggregator::new(fanout.clone());

        let err = aggregator
            .rules(
                &RequestContext::background(),
                &RulesRequest::with_selectors([r#"{job="a"}"#, "{job="]),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), RulesErrorKind::InvalidSelector);
        assert_eq!(fanout.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn replica_copies_collapse_into_one_rule() {
        let fanout = FixedFanout::new(vec![
            RulesMessage::Group(RuleGroup::new(
                "g1",
                vec![alert(&[("alertname", "Up"), ("replica", "0")])],
            )),
            RulesMessage::Warning("store b: partial response".to_string()),
            RulesMessage::Group(RuleGroup::new(
                "g1",
                vec![alert(&[("alertname", "Up"), ("replica", "1")])],
            )),
        ]);
        let aggregator = RulesAggregator::with_dedup(fanout, ["replica"]);

        let response = aggregator
            .rules(&RequestContext::background(), &RulesRequest::default())
            .await
            .unwrap();

        assert_eq!(response.groups.groups.len(), 1);
        assert_eq!(response.groups.groups[0].rules.len(), 1);
        assert_eq!(response.warnings, vec!["store b: partial response"]);
    }

    #[tokio::test]
    async fn warnings_survive_when_filter_drops_everything() {
        let fanout = FixedFanout::new(vec![
            RulesMessage::Group(RuleGroup::new("g1", vec![alert(&[("job", "b")])])),
            RulesMessage::Warning("w1".to_string()),
        ]);
        let aggregator = RulesAggregator::new(fanout);

        let response = UnaryRulesClient::rules(
            &aggregator,
            &RequestContext::background(),
            &RulesRequest::with_selectors([r#"{job="a"}"#]),
        )
        .await
        .unwrap();

        assert!(response.groups.groups.is_empty());
        assert_eq!(response.warnings, vec!["w1"]);
    }

    #[tokio::test]
    async fn already_canceled_context_fails_fast() {
        let fanout = FixedFanout::new(vec![]);
        let aggregator = RulesAggregator::new(fanout.clone());
        let ctx = RequestContext::background();
        ctx.cancel();

        let err = aggregator
            .rules(&ctx, &RulesRequest::default())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), RulesErrorKind::ContextCanceled);
        assert_eq!(fanout.calls.load(Ordering::SeqCst), 0);
    }
}

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

//! # rules-aggregator
//!
//! `rules-aggregator` presents one global, deduplicated view of recording and alerting
//! rules served by a set of highly-available replica sources.
//!
//! A [`RulesAggregator`] fans a [`RulesRequest`] out through a [`RulesFanout`]
//! collaborator, accumulates the concurrently streamed groups and warnings in a
//! [`StreamSink`], and then, strictly after the fan-out returned:
//!
//! 1. keeps the rules whose literal (non-templated) labels satisfy the request selectors,
//! 2. merges groups of the same name contributed by different replicas,
//! 3. strips replica labels and drops rules duplicated across replicas.
//!
//! ```
//! use std::sync::Arc;
//! use async_trait::async_trait;
//! use rules_aggregator::{
//!     AlertingRule, FanoutError, Labels, RequestContext, Rule, RuleGroup, RulesAggregator,
//!     RulesFanout, RulesMessage, RulesRequest, RulesSink,
//! };
//!
//! struct TwoReplicas;
//!
//! #[async_trait]
//! impl RulesFanout for TwoReplicas {
//!     async fn rules(
//!         &self,
//!         _ctx: &RequestContext,
//!         _request: &RulesRequest,
//!         sink: Arc<dyn RulesSink>,
//!     ) -> Result<(), FanoutError> {
//!         for replica in ["0", "1"] {
//!             let rule = Rule::Alerting(AlertingRule {
//!                 name: "InstanceDown".to_string(),
//!                 query: "up == 0".to_string(),
//!                 labels: [("severity", "page"), ("replica", replica)].into_iter().collect(),
//!                 ..Default::default()
//!             });
//!             sink.send(RulesMessage::Group(RuleGroup::new("node", vec![rule]))).await?;
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap().block_on(async {
//! let aggregator = RulesAggregator::with_dedup(Arc::new(TwoReplicas), ["replica"]);
//! let response = aggregator
//!     .rules(
//!         &RequestContext::background(),
//!         &RulesRequest::with_selectors([r#"{severity="page"}"#]),
//!     )
//!     .await
//!     .unwrap();
//!
//! let groups = response.groups.groups;
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].rules.len(), 1);
//! let expected: Labels = [("severity", "page")].into_iter().collect();
//! assert_eq!(groups[0].rules[0].labels(), &expected);
//! # });
//! ```
//!
//! ## Concurrency model
//!
//! Only the [`StreamSink`] is shared between tasks; it guards its buffers with a mutex.
//! Filtering, merging and deduplication run single-threaded on drained, private data.
//! Cancelling the [`RequestContext`] makes [`RulesAggregator::rules`] return the
//! context error immediately; producers still running are abandoned and their later
//! deliveries are ignored.
//!
//! ## Observability model
//!
//! Library code emits `tracing` events and a `rules_request` span and never installs a
//! global subscriber. Binaries and tests initialize `tracing_subscriber` once.

mod aggregator;
pub use aggregator::{compile_selectors, RulesAggregator};

mod context;
pub use context::{ContextError, RequestContext};

mod error;
pub use error::{FanoutError, RulesError, RulesErrorKind};

mod fanout;
pub use fanout::{RulesFanout, UnaryRulesClient};

mod model;
pub use model::{
    ActiveAlert, AlertState, AlertingRule, DuplicateLabelError, Label, Labels, RecordingRule, Rule,
    RuleComparison, RuleGroup, RuleGroups, RuleHealth, RuleKind, RulesMessage, RulesRequest,
    RulesResponse,
};

#[doc(hidden)]
pub mod observability;
pub mod pipeline;
pub mod selector;

mod stream_sink;
pub use stream_sink::{DrainedMessages, RulesSink, StreamSink};

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

//! Seams to the backend fan-out and to non-streaming consumers.

use crate::context::RequestContext;
use crate::error::{FanoutError, RulesError};
use crate::model::{RulesRequest, RulesResponse};
use crate::stream_sink::RulesSink;
use async_trait::async_trait;
use std::sync::Arc;

/// Fans one rules request out to redundant backend sources.
///
/// Producers push [`RulesMessage`](crate::RulesMessage)s into `sink`, possibly from many
/// tasks at once. A backend that fails while others answer must be reported as a
/// warning; returning `Err` means no usable answer could be produced at all. Retries,
/// if any, belong here.
#[async_trait]
pub trait RulesFanout: Send + Sync {
    async fn rules(
        &self,
        ctx: &RequestContext,
        request: &RulesRequest,
        sink: Arc<dyn RulesSink>,
    ) -> Result<(), FanoutError>;
}

/// Rules API for consumers that do not support streaming.
#[async_trait]
pub trait UnaryRulesClient: Send + Sync {
    async fn rules(
        &self,
        ctx: &RequestContext,
        request: &RulesRequest,
    ) -> Result<RulesResponse, RulesError>;
}

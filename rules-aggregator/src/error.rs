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

//! Failure kinds of a rules request.

use crate::context::ContextError;
use crate::selector::SelectorParseError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Total failure reported by a fan-out collaborator.
pub type FanoutError = Box<dyn Error + Send + Sync + 'static>;

/// Failures for one aggregated rules request.
///
/// Degraded backends are not errors; they surface as warnings on the response.
#[derive(Debug)]
pub enum RulesError {
    InvalidSelector {
        selector: String,
        source: SelectorParseError,
    },
    UpstreamUnavailable(FanoutError),
    MalformedMessage(String),
    ContextCanceled(ContextError),
}

impl RulesError {
    pub fn kind(&self) -> RulesErrorKind {
        match self {
            RulesError::InvalidSelector { .. } => RulesErrorKind::InvalidSelector,
            RulesError::UpstreamUnavailable(_) => RulesErrorKind::UpstreamUnavailable,
            RulesError::MalformedMessage(_) => RulesErrorKind::MalformedMessage,
            RulesError::ContextCanceled(_) => RulesErrorKind::ContextCanceled,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RulesErrorKind {
    InvalidSelector,
    UpstreamUnavailable,
    MalformedMessage,
    ContextCanceled,
}

impl Display for RulesError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RulesError::InvalidSelector { selector, source } => {
                write!(f, "invalid selector {selector:?}: {source}")
            }
            RulesError::UpstreamUnavailable(err) => write!(f, "proxy rules: {err}"),
            RulesError::MalformedMessage(reason) => write!(f, "malformed rules message: {reason}"),
            RulesError::ContextCanceled(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RulesError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RulesError::InvalidSelector { source, .. } => Some(source),
            RulesError::UpstreamUnavailable(err) => Some(err.as_ref()),
            RulesError::ContextCanceled(err) => Some(err),
            RulesError::MalformedMessage(_) => None,
        }
    }
}

impl From<ContextError> for RulesError {
    fn from(err: ContextError) -> Self {
        RulesError::ContextCanceled(err)
    }
}

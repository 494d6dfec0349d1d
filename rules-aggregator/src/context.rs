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

//! Request-scoped cancellation and deadline handling.

use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

/// Why a [`RequestContext`] is done.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ContextError {
    Canceled,
    DeadlineExceeded,
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ContextError::Canceled => write!(f, "context canceled"),
            ContextError::DeadlineExceeded => write!(f, "context deadline exceeded"),
        }
    }
}

impl Error for ContextError {}

struct ContextInner {
    canceled: watch::Sender<bool>,
    deadline: Option<Instant>,
}

/// Cloneable handle shared by the caller, the aggregator and every backend producer
/// of one rules request. Cancelling any clone cancels them all.
#[derive(Clone)]
pub struct RequestContext {
    inner: Arc<ContextInner>,
}

impl RequestContext {
    /// A context that is only done once [`RequestContext::cancel`] is called.
    pub fn background() -> Self {
        Self::new(None)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::new(Some(Instant::now() + timeout))
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self::new(Some(deadline))
    }

    fn new(deadline: Option<Instant>) -> Self {
        let (canceled, _) = watch::channel(false);
        Self {
            inner: Arc::new(ContextInner { canceled, deadline }),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.inner.deadline
    }

    pub fn cancel(&self) {
        self.inner.canceled.send_replace(true);
    }

    /// Returns the reason this context is done, or `None` while it is still live.
    /// Cancellation takes precedence over an expired deadline.
    pub fn err(&self) -> Option<ContextError> {
        if *self.inner.canceled.borrow() {
            return Some(ContextError::Canceled);
        }
        match self.inner.deadline {
            Some(deadline) if Instant::now() >= deadline => Some(ContextError::DeadlineExceeded),
            _ => None,
        }
    }

    pub fn is_done(&self) -> bool {
        self.err().is_some()
    }

    /// Resolves once the context is canceled or its deadline passes.
    pub async fn done(&self) -> ContextError {
        let mut canceled = self.inner.canceled.subscribe();
        let wait_canceled = async move {
            // The sender lives in `self.inner`, so the channel cannot close while we wait.
            let _ = canceled.wait_for(|canceled| *canceled).await;
            ContextError::Canceled
        };

        match self.inner.deadline {
            Some(deadline) => tokio::select! {
                biased;
                err = wait_canceled => err,
                _ = tokio::time::sleep_until(deadline) => ContextError::DeadlineExceeded,
            },
            None => wait_canceled.await,
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::background()
    }
}

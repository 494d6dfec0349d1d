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

mod config;

use crate::config::Config;
use clap::Parser;
use rules_aggregator::{RequestContext, RulesAggregator, RulesRequest};
use rules_static_file::StaticFileRulesFanout;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser)]
#[command(version, about = "Aggregates the rules of HA replicas into one deduplicated view")]
struct AggregatorArgs {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
    /// Label selector such as `{severity="page"}`; may be repeated.
    #[arg(short, long = "selector", value_name = "SELECTOR")]
    selectors: Vec<String>,
    /// Overrides `aggregator.request_timeout_ms`.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .try_init();

    let args = AggregatorArgs::parse();
    let config = Config::load(&args.config)?;

    info!(
        "Started rules-aggregator-configurable with {} sources",
        config.sources.len()
    );

    let timeout = args
        .timeout_ms
        .map(Duration::from_millis)
        .or_else(|| config.request_timeout());
    let ctx = match timeout {
        Some(timeout) => RequestContext::with_timeout(timeout),
        None => RequestContext::background(),
    };

    let fanout = Arc::new(StaticFileRulesFanout::new(config.sources));
    let aggregator = RulesAggregator::with_dedup(fanout, config.aggregator.replica_labels);

    let response = aggregator
        .rules(&ctx, &RulesRequest::with_selectors(args.selectors))
        .await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

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

use rules_static_file::ReplicaSource;
use serde::Deserialize;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub(crate) aggregator: AggregatorConfig,
    pub(crate) sources: Vec<ReplicaSource>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct AggregatorConfig {
    #[serde(default)]
    pub(crate) replica_labels: Vec<String>,
    #[serde(default)]
    pub(crate) request_timeout_ms: Option<u64>,
}

#[derive(Debug)]
pub enum ConfigError {
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    Unparsable {
        path: PathBuf,
        source: json5::Error,
    },
    DuplicateSource(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, source } => {
                write!(f, "unable to read config file {}: {source}", path.display())
            }
            ConfigError::Unparsable { path, source } => {
                write!(f, "unable to parse config file {}: {source}", path.display())
            }
            ConfigError::DuplicateSource(name) => {
                write!(f, "duplicate source name found: {name}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConfigError::Unreadable { source, .. } => Some(source),
            ConfigError::Unparsable { source, .. } => Some(source),
            ConfigError::DuplicateSource(_) => None,
        }
    }
}

impl Config {
    /// Reads and validates a config file; relative source paths resolve against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::parse(path, &contents)?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for source in &mut config.sources {
            if source.file_path.is_relative() {
                source.file_path = base.join(&source.file_path);
            }
        }
        Ok(config)
    }

    fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
        let config: Config =
            json5::from_str(contents).map_err(|source| ConfigError::Unparsable {
                path: path.to_path_buf(),
                source,
            })?;

        let mut names = HashSet::new();
        for source in &config.sources {
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::DuplicateSource(source.name.clone()));
            }
        }
        Ok(config)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.aggregator
            .request_timeout_ms
            .map(Duration::from_millis)
    }
}

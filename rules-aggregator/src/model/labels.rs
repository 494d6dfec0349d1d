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

//! Ordered label sets attached to rules and active alerts.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Label {
    pub name: String,
    pub value: String,
}

impl Label {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Label set with unique names.
///
/// Insertion order is kept as delivered by the producing replica; use
/// [`Labels::sort_by_name`] before comparing two sets for equality.
///
/// Deserialization rejects a repeated label name.
#[derive(Clone, Debug, Default, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(try_from = "Vec<Label>", into = "Vec<Label>")]
pub struct Labels(Vec<Label>);

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DuplicateLabelError {
    pub name: String,
}

impl Display for DuplicateLabelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate label name {:?}", self.name)
    }
}

impl Error for DuplicateLabelError {}

impl TryFrom<Vec<Label>> for Labels {
    type Error = DuplicateLabelError;

    fn try_from(labels: Vec<Label>) -> Result<Self, Self::Error> {
        for (i, label) in labels.iter().enumerate() {
            if labels[..i].iter().any(|seen| seen.name == label.name) {
                return Err(DuplicateLabelError {
                    name: label.name.clone(),
                });
            }
        }
        Ok(Labels(labels))
    }
}

impl From<Labels> for Vec<Label> {
    fn from(labels: Labels) -> Self {
        labels.0
    }
}

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `name`, or the empty string when the label is absent.
    pub fn get(&self, name: &str) -> &str {
        self.0
            .iter()
            .find(|label| label.name == name)
            .map(|label| label.value.as_str())
            .unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|label| label.name == name)
    }

    /// Sets `name` to `value`, replacing an existing label of the same name.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|label| label.name == name) {
            Some(existing) => existing.value = value,
            None => self.0.push(Label { name, value }),
        }
    }

    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&Label) -> bool,
    {
        self.0.retain(keep);
    }

    pub fn sort_by_name(&mut self) {
        self.0.sort_by(|a, b| a.name.cmp(&b.name));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N, V> FromIterator<(N, V)> for Labels
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for (name, value) in iter {
            labels.set(name, value);
        }
        labels
    }
}

impl FromIterator<Label> for Labels {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        let mut labels = Labels::new();
        for label in iter {
            labels.set(label.name, label.value);
        }
        labels
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = &'a Label;
    type IntoIter = std::slice::Iter<'a, Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl Display for Labels {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, label) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={:?}", label.name, label.value)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod tests {
    use super::Labels;

    #[test]
    fn get_returns_empty_string_for_absent_label() {
        let labels: Labels = [("job", "api")].into_iter().collect();

        assert_eq!(labels.get("job"), "api");
        assert_eq!(labels.get("instance"), "");
    }

    #[test]
    fn set_replaces_existing_value_and_keeps_names_unique() {
        let mut labels: Labels = [("job", "api"), ("env", "dev")].into_iter().collect();
        labels.set("job", "web");

        assert_eq!(labels.len(), 2);
        assert_eq!(labels.get("job"), "web");
    }

    #[test]
    fn json_with_repeated_label_name_is_rejected() {
        let err = serde_json::from_str::<Labels>(
            r#"[{"name":"job","value":"a"},{"name":"env","value":"x"},{"name":"job","value":"b"}]"#,
        )
        .unwrap_err();

        assert!(err.to_string().contains(r#"duplicate label name "job""#));
    }

    #[test]
    fn json_round_trips_as_a_plain_list() {
        let json = r#"[{"name":"job","value":"a"},{"name":"env","value":"x"}]"#;
        let labels: Labels = serde_json::from_str(json).unwrap();

        assert_eq!(labels.get("env"), "x");
        assert_eq!(serde_json::to_string(&labels).unwrap(), json);
    }

    #[test]
    fn display_is_stable_after_sorting() {
        let mut labels: Labels = [("severity", "page"), ("alertname", "Up")]
            .into_iter()
            .collect();
        labels.sort_by_name();

        assert_eq!(labels.to_string(), r#"{alertname="Up", severity="page"}"#);
    }
}

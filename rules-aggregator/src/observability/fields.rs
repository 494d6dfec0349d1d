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

//! Canonical structured field values and value-format helpers.

use crate::model::RulesMessage;

pub const NONE: &str = "none";
pub const REASON_EMPTY_GROUP: &str = "empty_group";
pub const REASON_EMPTY_WARNING: &str = "empty_warning";

/// Short kind label for a streamed message.
pub fn format_message_kind(message: &RulesMessage) -> &'static str {
    match message {
        RulesMessage::Group(_) => "group",
        RulesMessage::Warning(_) => "warning",
    }
}

/// Compact rendering of a request's selectors for a single log field.
pub fn format_selectors(selectors: &[String]) -> String {
    if selectors.is_empty() {
        NONE.to_string()
    } else {
        selectors.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_message_kind, format_selectors, NONE};
    use crate::model::{RuleGroup, RulesMessage};

    #[test]
    fn format_selectors_falls_back_when_absent() {
        assert_eq!(format_selectors(&[]), NONE);
        assert_eq!(
            format_selectors(&[r#"{job="a"}"#.to_string(), "up".to_string()]),
            r#"{job="a"} up"#
        );
    }

    #[test]
    fn format_message_kind_names_variant() {
        assert_eq!(
            format_message_kind(&RulesMessage::Group(RuleGroup::default())),
            "group"
        );
        assert_eq!(
            format_message_kind(&RulesMessage::Warning("w".to_string())),
            "warning"
        );
    }
}

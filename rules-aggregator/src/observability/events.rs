//! Canonical structured event names used across `rules-aggregator`.

// Request lifecycle events.
pub const RULES_REQUEST_START: &str = "rules_request_start";
pub const RULES_REQUEST_OK: &str = "rules_request_ok";
pub const RULES_REQUEST_FAILED: &str = "rules_request_failed";
pub const RULES_REQUEST_CANCELED: &str = "rules_request_canceled";
pub const SELECTOR_COMPILE_FAILED: &str = "selector_compile_failed";

// Stream sink events.
pub const SINK_GROUP_ACCEPTED: &str = "sink_group_accepted";
pub const SINK_WARNING_ACCEPTED: &str = "sink_warning_accepted";
pub const SINK_MESSAGE_REJECTED: &str = "sink_message_rejected";
pub const SINK_MESSAGE_AFTER_DONE: &str = "sink_message_after_done";

// Post-drain pipeline events.
pub const PIPELINE_SUMMARY: &str = "pipeline_summary";

// Fan-out source events.
pub const FANOUT_SOURCE_START: &str = "fanout_source_start";
pub const FANOUT_SOURCE_OK: &str = "fanout_source_ok";
pub const FANOUT_SOURCE_FAILED: &str = "fanout_source_failed";
pub const FANOUT_SOURCE_ABANDONED: &str = "fanout_source_abandoned";
pub const FANOUT_ALL_SOURCES_FAILED: &str = "fanout_all_sources_failed";

//! Canonical structured event names and field values emitted through `tracing`.

pub mod events;
pub mod fields;

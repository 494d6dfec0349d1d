//! Post-drain processing: selector filtering, group merging and replica deduplication.
//!
//! Every stage is a pure function over data already drained from the stream sink and
//! runs on the caller's task without locking.

mod group_merger;
mod label_template;
mod replica_dedup;
mod selector_filter;

pub use group_merger::dedup_groups;
pub use label_template::is_literal_label_value;
pub use replica_dedup::{dedup_rules, ReplicaLabelNames};
pub use selector_filter::{filter_rules, matches_literal_labels};

//! Label matchers and the selector compiler producing them.

mod matcher;
mod parser;

pub use matcher::{MatchOp, Matcher, MatcherSet};
pub use parser::{parse_metric_selector, SelectorParseError, METRIC_NAME_LABEL};

//! The query/extraction core: [`Filter`] and its combinator library.

pub mod condition;
pub mod filter;
pub mod grouper;
pub mod merger;
pub mod path_finder;
pub mod scan;

pub use condition::Condition;
pub use filter::{Filter, Iter};
pub use grouper::Grouper;
pub use merger::Merger;
pub use path_finder::PathFinder;
pub use scan::ScanLimits;

use thiserror::Error;

/// Invalid combinator configuration, reported at construction. These are
/// the only failures this crate raises; every read operation afterwards
/// is total.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} requires a non-blank attribute name")]
    BlankName(&'static str),
    #[error("{0} requires a non-blank path")]
    BlankPath(&'static str),
}

pub(crate) fn require_name(
    what: &'static str,
    name: &str,
) -> Result<String, ConfigError> {
    if name.trim().is_empty() {
        Err(ConfigError::BlankName(what))
    } else {
        Ok(name.to_string())
    }
}

pub(crate) fn require_path(
    what: &'static str,
    path: &str,
) -> Result<String, ConfigError> {
    if path.trim().is_empty() {
        Err(ConfigError::BlankPath(what))
    } else {
        Ok(path.to_string())
    }
}

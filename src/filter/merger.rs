use std::sync::Arc;

use super::filter::Filter;
use super::{require_name, require_path, ConfigError};

/// A whole-container list extractor.
///
/// Where a [`Grouper`](super::Grouper) runs once per row, a merger runs
/// once against the entire filter and returns one value per matched
/// element, duplicates preserved. [`Filter::merge_by`] and
/// [`Filter::merge_pairs`] correlate two independently extracted lists by
/// position, so order and count must exactly mirror the underlying
/// sub-path match order; every factory here preserves it.
#[derive(Clone)]
pub struct Merger<T> {
    extract: Arc<dyn Fn(&Filter) -> Vec<T> + Send + Sync>,
}

impl<T> Merger<T> {
    /// Build a merger from any list-extraction function.
    pub fn from_fn<F>(extract: F) -> Merger<T>
    where
        F: Fn(&Filter) -> Vec<T> + Send + Sync + 'static,
    {
        Merger {
            extract: Arc::new(extract),
        }
    }

    /// Run the extraction against the whole container.
    pub fn extract(&self, container: &Filter) -> Vec<T> {
        (self.extract)(container)
    }
}

impl Merger<String> {
    /// Own text of every match of `path`.
    pub fn text(path: &str) -> Result<Merger<String>, ConfigError> {
        let path = require_path("Merger::text", path)?;
        Ok(Merger::from_fn(move |f| f.filter(&path).all_text(false)))
    }

    /// Text including descendants of every match of `path`.
    pub fn text_with_children(path: &str) -> Result<Merger<String>, ConfigError> {
        let path = require_path("Merger::text_with_children", path)?;
        Ok(Merger::from_fn(move |f| f.filter(&path).all_text(true)))
    }

    /// Attribute `name` of every match of `path` that carries it.
    pub fn attributes(path: &str, name: &str) -> Result<Merger<String>, ConfigError> {
        let path = require_path("Merger::attributes", path)?;
        let name = require_name("Merger::attributes", name)?;
        Ok(Merger::from_fn(move |f| {
            f.filter(&path).all_attributes(&name)
        }))
    }
}

impl Merger<Option<f64>> {
    /// A number extracted from the text of every match of `path`, one
    /// entry per match.
    pub fn numbers(path: &str) -> Result<Merger<Option<f64>>, ConfigError> {
        let path = require_path("Merger::numbers", path)?;
        Ok(Merger::from_fn(move |f| {
            f.filter(&path).iter().map(|m| m.number()).collect()
        }))
    }

    /// A number extracted from attribute `name` of every match of `path`,
    /// one entry per match.
    pub fn attributes_as_numbers(
        path: &str,
        name: &str,
    ) -> Result<Merger<Option<f64>>, ConfigError> {
        let path = require_path("Merger::attributes_as_numbers", path)?;
        let name = require_name("Merger::attributes_as_numbers", name)?;
        Ok(Merger::from_fn(move |f| {
            f.filter(&path)
                .iter()
                .map(|m| m.attribute_as_number(&name, 0))
                .collect()
        }))
    }
}

impl Merger<Filter> {
    /// The raw sub-filters matching `path`, for deferred multi-step
    /// processing.
    pub fn filters(path: &str) -> Result<Merger<Filter>, ConfigError> {
        let path = require_path("Merger::filters", path)?;
        Ok(Merger::from_fn(move |f| f.filter(&path).iter().collect()))
    }
}

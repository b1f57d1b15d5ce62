use std::sync::Arc;

use super::condition::Condition;
use super::filter::Filter;
use super::{require_name, require_path, ConfigError};

/// A per-row single-value extractor.
///
/// [`Filter::group_by`] and [`Filter::pair_by`] iterate a filter's
/// top-level elements as rows and apply one grouper for the key and one
/// for the value of each row. Groupers are pure function values: safe on
/// an empty row (they return the same defaults as the underlying
/// [`Filter`] calls) and safe to reuse across documents and threads.
///
/// ```
/// use filter_core::filter::{Filter, Grouper};
///
/// // id -> link for every product container row
/// let key = Grouper::attribute("id")?;
/// let val = Grouper::attribute_at("***.a", "href")?;
/// let links = Filter::empty().group_by(&key, &val);
/// assert!(links.is_empty());
/// # Ok::<(), filter_core::filter::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct Grouper<T> {
    extract: Arc<dyn Fn(&Filter) -> T + Send + Sync>,
}

impl<T> Grouper<T> {
    /// Build a grouper from any extraction function.
    pub fn from_fn<F>(extract: F) -> Grouper<T>
    where
        F: Fn(&Filter) -> T + Send + Sync + 'static,
    {
        Grouper {
            extract: Arc::new(extract),
        }
    }

    /// Run the extraction against one row.
    pub fn extract(&self, row: &Filter) -> T {
        (self.extract)(row)
    }
}

impl Grouper<String> {
    /// Text of the row including children.
    pub fn text() -> Grouper<String> {
        Grouper::from_fn(|f| f.text())
    }

    /// Text of the row, with or without descendant text.
    pub fn text_with_children(include_children: bool) -> Grouper<String> {
        Grouper::from_fn(move |f| f.text_with(0, "", include_children))
    }

    /// Narrow the row by `path`, then take the text.
    pub fn text_at(path: &str) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_at", path)?;
        Ok(Grouper::from_fn(move |f| f.filter(&path).text()))
    }

    /// Narrow the row by the first non-empty of several paths, then take
    /// the text.
    pub fn first_text(path: &str, alts: &[&str]) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::first_text", path)?;
        let alts: Vec<String> = alts.iter().map(|s| s.to_string()).collect();
        Ok(Grouper::from_fn(move |f| {
            let refs: Vec<&str> = alts.iter().map(String::as_str).collect();
            f.first_of(&path, &refs).text()
        }))
    }

    /// Narrow by `path`, then take the text of the element at `i`.
    pub fn text_indexed(path: &str, i: usize) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_indexed", path)?;
        Ok(Grouper::from_fn(move |f| f.filter(&path).text_at(i)))
    }

    /// Narrow by `path`, then take the text of the element at `i`, with
    /// or without descendant text.
    pub fn text_indexed_with(
        path: &str,
        i: usize,
        include_children: bool,
    ) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_indexed_with", path)?;
        Ok(Grouper::from_fn(move |f| {
            f.filter(&path).text_with(i, "", include_children)
        }))
    }

    /// Narrow by `path`, deep-scan for the first match of `condition`,
    /// then take the text.
    pub fn text_where(path: &str, condition: Condition) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_where", path)?;
        Ok(Grouper::from_fn(move |f| {
            f.filter(&path).find_first(&condition).text()
        }))
    }

    /// Narrow by `path`, deep-scan for the first match of `condition`,
    /// narrow again by `sub_path`, then take the text.
    pub fn text_where_then(
        path: &str,
        condition: Condition,
        sub_path: &str,
    ) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_where_then", path)?;
        let sub_path = require_path("Grouper::text_where_then", sub_path)?;
        Ok(Grouper::from_fn(move |f| {
            f.filter(&path).find_first(&condition).filter(&sub_path).text()
        }))
    }

    /// Narrow by `path`, then take the normalized text.
    pub fn text_normalized(path: &str) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_normalized", path)?;
        Ok(Grouper::from_fn(move |f| f.filter(&path).text_normalized()))
    }

    /// Narrow by `path`, then take the normalized text of the element at
    /// `i`.
    pub fn text_normalized_indexed(
        path: &str,
        i: usize,
    ) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::text_normalized_indexed", path)?;
        Ok(Grouper::from_fn(move |f| {
            f.filter(&path).text_normalized_at(i, true)
        }))
    }

    /// Attribute `name` of the row itself.
    pub fn attribute(name: &str) -> Result<Grouper<String>, ConfigError> {
        let name = require_name("Grouper::attribute", name)?;
        Ok(Grouper::from_fn(move |f| f.attribute(&name)))
    }

    /// Narrow by `path`, then take attribute `name`.
    pub fn attribute_at(path: &str, name: &str) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::attribute_at", path)?;
        let name = require_name("Grouper::attribute_at", name)?;
        Ok(Grouper::from_fn(move |f| f.filter(&path).attribute(&name)))
    }

    /// Narrow by `path`, then take attribute `name` of the element at `i`.
    pub fn attribute_indexed(
        path: &str,
        name: &str,
        i: usize,
    ) -> Result<Grouper<String>, ConfigError> {
        let path = require_path("Grouper::attribute_indexed", path)?;
        let name = require_name("Grouper::attribute_indexed", name)?;
        Ok(Grouper::from_fn(move |f| {
            f.filter(&path).attribute_at(&name, i)
        }))
    }
}

impl Grouper<Option<f64>> {
    /// Narrow by `path`, then extract a number from the text.
    pub fn number(path: &str) -> Result<Grouper<Option<f64>>, ConfigError> {
        let path = require_path("Grouper::number", path)?;
        Ok(Grouper::from_fn(move |f| f.filter(&path).number()))
    }

    /// Extract a number from attribute `name` of the row itself.
    pub fn attribute_as_number(name: &str) -> Result<Grouper<Option<f64>>, ConfigError> {
        let name = require_name("Grouper::attribute_as_number", name)?;
        Ok(Grouper::from_fn(move |f| f.attribute_as_number(&name, 0)))
    }
}

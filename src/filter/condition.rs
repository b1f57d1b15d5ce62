use std::sync::Arc;

use super::filter::Filter;
use super::{require_name, require_path, ConfigError};

/// A named, reusable predicate over a [`Filter`].
///
/// A condition is a first-class function value: configuration is captured
/// at construction and no per-call state exists, so one condition can be
/// reused across documents and threads. Factories that take a required
/// attribute name or path validate it up front and fail that construction
/// only; testing is always total.
///
/// ```
/// use filter_core::filter::{Condition, Filter};
///
/// let header = Condition::text_is_ignore_case("specifications")
///     .or(Condition::attribute_contains("class", "specs")?);
/// assert!(!header.test(&Filter::empty()));
/// # Ok::<(), filter_core::filter::ConfigError>(())
/// ```
#[derive(Clone)]
pub struct Condition {
    test: Arc<dyn Fn(&Filter) -> bool + Send + Sync>,
}

impl Condition {
    /// Build a condition from any predicate function.
    pub fn from_fn<F>(test: F) -> Condition
    where
        F: Fn(&Filter) -> bool + Send + Sync + 'static,
    {
        Condition {
            test: Arc::new(test),
        }
    }

    /// Test a filter against this condition.
    pub fn test(&self, f: &Filter) -> bool {
        (self.test)(f)
    }

    /// Short-circuiting disjunction of two conditions.
    pub fn or(self, other: Condition) -> Condition {
        Condition::from_fn(move |f| self.test(f) || other.test(f))
    }

    /// Short-circuiting conjunction of two conditions.
    pub fn and(self, other: Condition) -> Condition {
        Condition::from_fn(move |f| self.test(f) && other.test(f))
    }

    /// The attribute `name` of the first element contains `needle`,
    /// case-insensitively.
    pub fn attribute_contains(name: &str, needle: &str) -> Result<Condition, ConfigError> {
        let name = require_name("Condition::attribute_contains", name)?;
        let needle = needle.to_lowercase();
        Ok(Condition::from_fn(move |f| {
            f.attribute(&name).to_lowercase().contains(&needle)
        }))
    }

    /// The text of the first element equals `expected` exactly.
    pub fn text_is(expected: &str) -> Condition {
        let expected = expected.to_string();
        Condition::from_fn(move |f| f.text() == expected)
    }

    /// The text of the first element equals `expected`, ignoring case.
    pub fn text_is_ignore_case(expected: &str) -> Condition {
        let expected = expected.to_lowercase();
        Condition::from_fn(move |f| f.text().to_lowercase() == expected)
    }

    /// Narrow by `path` first, then compare text ignoring case.
    pub fn text_is_ignore_case_at(
        path: &str,
        expected: &str,
    ) -> Result<Condition, ConfigError> {
        let path = require_path("Condition::text_is_ignore_case_at", path)?;
        let expected = expected.to_lowercase();
        Ok(Condition::from_fn(move |f| {
            f.filter(&path).text().to_lowercase() == expected
        }))
    }

    /// The text of the first element contains `needle`, with or without
    /// descendant text.
    pub fn text_contains(needle: &str, include_children: bool) -> Condition {
        let needle = needle.to_string();
        Condition::from_fn(move |f| {
            f.text_with(0, "", include_children).contains(&needle)
        })
    }

    /// The text of the first element contains `needle`, ignoring case.
    pub fn text_contains_ignore_case(needle: &str) -> Condition {
        let needle = needle.to_lowercase();
        Condition::from_fn(move |f| f.text().to_lowercase().contains(&needle))
    }

    /// Narrow by `path` first, then test text containment ignoring case.
    pub fn text_contains_ignore_case_at(
        path: &str,
        needle: &str,
    ) -> Result<Condition, ConfigError> {
        let path = require_path("Condition::text_contains_ignore_case_at", path)?;
        let needle = needle.to_lowercase();
        Ok(Condition::from_fn(move |f| {
            f.filter(&path).text().to_lowercase().contains(&needle)
        }))
    }

    /// Narrow by `path`, then by `sub_path`, then test text containment.
    pub fn text_contains_nested(
        path: &str,
        sub_path: &str,
        needle: &str,
    ) -> Result<Condition, ConfigError> {
        let path = require_path("Condition::text_contains_nested", path)?;
        let sub_path = require_path("Condition::text_contains_nested", sub_path)?;
        let needle = needle.to_string();
        Ok(Condition::from_fn(move |f| {
            f.filter(&path).filter(&sub_path).text().contains(&needle)
        }))
    }

    /// The script content of the first element contains `needle`.
    pub fn script_contains(needle: &str) -> Condition {
        let needle = needle.to_string();
        Condition::from_fn(move |f| f.script().contains(&needle))
    }

    /// The script content of the first element starts with `prefix`.
    pub fn script_starts_with(prefix: &str) -> Condition {
        let prefix = prefix.to_string();
        Condition::from_fn(move |f| f.script().starts_with(&prefix))
    }
}

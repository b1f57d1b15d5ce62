use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use regex::Regex;

use crate::dom::NodeHandle;
use crate::num::{self, Rounding};
use crate::script::ScriptBlock;
use crate::text;

use super::condition::Condition;
use super::grouper::Grouper;
use super::merger::Merger;
use super::path_finder::PathFinder;
use super::scan::{scan_frontier, ScanBudget, ScanLimits};

/// Selector feeding [`Filter::first_script`]: every script element in the
/// document, in the surface syntax of the external evaluator.
const SCRIPT_PATH: &str = "***.script";

/// An immutable handle to zero or more elements of a parsed document.
///
/// A filter obtained from a query that matched nothing is the canonical
/// empty value, and filtering an empty filter by any path stays empty.
/// Every read operation is total: out-of-range indexes, missing attributes
/// and empty filters degrade to typed defaults instead of panicking.
/// Operations that look like mutators return a new `Filter`; the wrapped
/// document is owned by the external parser and never written to, so
/// filters are cheap to clone and safe to share across threads.
#[derive(Clone)]
pub struct Filter {
    nodes: Arc<[NodeHandle]>,
}

impl Filter {
    /// The canonical empty filter.
    pub fn empty() -> Filter {
        Filter {
            nodes: Arc::from(Vec::new()),
        }
    }

    /// Wrap a single element.
    pub fn from_node(node: NodeHandle) -> Filter {
        Filter {
            nodes: Arc::from(vec![node]),
        }
    }

    /// Wrap a set of top-level elements, in document order.
    pub fn from_nodes(nodes: Vec<NodeHandle>) -> Filter {
        Filter {
            nodes: Arc::from(nodes),
        }
    }

    // #navigation

    /// Apply the external query primitive to every top-level element and
    /// merge the results in order. Empty in, empty out.
    pub fn filter(&self, path: &str) -> Filter {
        if self.is_empty() {
            return Filter::empty();
        }
        let mut matched = Vec::new();
        for node in self.nodes.iter() {
            matched.extend(node.select(path));
        }
        Filter::from_nodes(matched)
    }

    /// Evaluate `path`; if the result is empty, try each alternative in
    /// order and return the first non-empty one.
    ///
    /// When every candidate is empty this returns the result of the last
    /// alternative tried, not the canonical empty filter. Callers must not
    /// assume a non-empty result.
    pub fn first_of(&self, path: &str, alts: &[&str]) -> Filter {
        let mut f = self.filter(path);
        if f.is_empty() {
            for alt in alts {
                f = self.filter(alt);
                if f.is_not_empty() {
                    return f;
                }
            }
        }
        f
    }

    /// Evaluate each path and return the first whole-filter result that
    /// satisfies `condition` (no deep scan), else the empty filter.
    pub fn first_where(&self, condition: &Condition, paths: &[&str]) -> Filter {
        for path in paths {
            let f = self.filter(path);
            if f.matches(condition) {
                return f;
            }
        }
        Filter::empty()
    }

    /// Test this filter against a condition.
    pub fn matches(&self, condition: &Condition) -> bool {
        condition.test(self)
    }

    /// Deep-scan for the first non-empty filter matching `condition`.
    pub fn find_first(&self, condition: &Condition) -> Filter {
        self.find_all(condition)
            .into_iter()
            .find(Filter::is_not_empty)
            .unwrap_or_else(Filter::empty)
    }

    /// Deep-scan every top-level element independently and collect all
    /// filters matching `condition`, pre-order.
    ///
    /// The traversal rule is carried over verbatim from the original
    /// engine: a multi-element filter is flattened one level and each
    /// element re-tested on its own; only a single-element filter descends
    /// into its children. See [`scan`](super::scan) for the rationale.
    pub fn find_all(&self, condition: &Condition) -> Vec<Filter> {
        self.find_all_with(condition, ScanLimits::default())
    }

    /// [`find_all`](Self::find_all) with caller-chosen traversal ceilings.
    pub fn find_all_with(
        &self,
        condition: &Condition,
        limits: ScanLimits,
    ) -> Vec<Filter> {
        let mut found = Vec::new();
        let mut budget = ScanBudget::new(limits);
        let mut stack: Vec<(Filter, usize)> =
            self.iter().rev().map(|f| (f, 0)).collect();

        while let Some((f, depth)) = stack.pop() {
            if !budget.admit() {
                break;
            }
            if f.matches(condition) {
                found.push(f.clone());
            }
            if budget.may_descend(depth) {
                for next in scan_frontier(&f).into_iter().rev() {
                    stack.push((next, depth + 1));
                }
            }
        }
        found
    }

    /// Deep-scan with the same rule as [`find_all`](Self::find_all), but
    /// synthesize the selector path leading to each match instead of
    /// collecting the filters. For diagnostics: the output paths use the
    /// surface syntax of the external evaluator.
    pub fn find_paths(&self, condition: &Condition) -> Vec<String> {
        PathFinder::new(condition).find(self)
    }

    /// [`find_paths`](Self::find_paths) with caller-chosen ceilings.
    pub fn find_paths_with(
        &self,
        condition: &Condition,
        limits: ScanLimits,
    ) -> Vec<String> {
        PathFinder::with_limits(condition, limits).find(self)
    }

    /// The element at `i` wrapped on its own, or the empty filter past
    /// the end.
    pub fn get(&self, i: usize) -> Filter {
        match self.nodes.get(i) {
            Some(node) => Filter::from_node(node.clone()),
            None => Filter::empty(),
        }
    }

    pub fn first(&self) -> Filter {
        self.get(0)
    }

    pub fn last(&self) -> Filter {
        if self.is_empty() {
            Filter::empty()
        } else {
            self.get(self.size() - 1)
        }
    }

    // #text

    /// Text of the first element including children, or an empty string.
    pub fn text(&self) -> String {
        self.text_with(0, "", true)
    }

    /// Text of the element at `i` including children, or an empty string.
    pub fn text_at(&self, i: usize) -> String {
        self.text_with(i, "", true)
    }

    /// Text of the element at `i`, or `or_else` when the index is out of
    /// range.
    pub fn text_or(&self, i: usize, or_else: &str) -> String {
        self.text_with(i, or_else, true)
    }

    /// Text of the element at `i`. Returns `or_else` when the index is
    /// out of range or the extracted text is empty.
    pub fn text_with(&self, i: usize, or_else: &str, include_children: bool) -> String {
        match self.nodes.get(i) {
            None => or_else.to_string(),
            Some(node) => {
                let extracted = node.text(include_children);
                if extracted.is_empty() {
                    or_else.to_string()
                } else {
                    extracted
                }
            }
        }
    }

    /// Normalized text of the first element including children.
    pub fn text_normalized(&self) -> String {
        self.text_normalized_at(0, true)
    }

    /// Normalized text of the element at `i`.
    pub fn text_normalized_at(&self, i: usize, include_children: bool) -> String {
        text::normalize(&self.text_with(i, "", include_children))
    }

    /// Text of every top-level element, in order.
    pub fn all_text(&self, include_children: bool) -> Vec<String> {
        self.iter().map(|f| f.text_with(0, "", include_children)).collect()
    }

    /// Text of every top-level element with duplicates removed, first-seen
    /// order preserved.
    pub fn all_distinct_text(&self, include_children: bool) -> Vec<String> {
        distinct(self.all_text(include_children))
    }

    pub fn all_text_normalized(&self, include_children: bool) -> Vec<String> {
        self.iter()
            .map(|f| f.text_normalized_at(0, include_children))
            .collect()
    }

    pub fn all_distinct_text_normalized(&self, include_children: bool) -> Vec<String> {
        distinct(self.all_text_normalized(include_children))
    }

    /// All text, normalized, joined with single spaces.
    pub fn all_text_joined(&self, include_children: bool) -> String {
        self.all_text_joined_with(include_children, " ")
    }

    /// All text, normalized, joined with `joiner`.
    pub fn all_text_joined_with(&self, include_children: bool, joiner: &str) -> String {
        self.all_text_normalized(include_children).join(joiner)
    }

    // #attribute

    /// Attribute of the first element by name, or an empty string.
    pub fn attribute(&self, name: &str) -> String {
        self.attribute_or(name, 0, "")
    }

    /// Attribute of the element at `i` by name, or an empty string.
    pub fn attribute_at(&self, name: &str, i: usize) -> String {
        self.attribute_or(name, i, "")
    }

    /// Attribute of the element at `i` by name. Returns `or_else` when the
    /// index is out of range, the key is absent, or the key maps to an
    /// empty string. A present-but-empty attribute counts as absent here.
    pub fn attribute_or(&self, name: &str, i: usize, or_else: &str) -> String {
        if name.trim().is_empty() {
            return or_else.to_string();
        }
        match self.nodes.get(i).and_then(|node| node.attribute(name)) {
            Some(value) if !value.is_empty() => value,
            _ => or_else.to_string(),
        }
    }

    /// Attribute of the element at `i`, through the numeric extractor.
    pub fn attribute_as_number(&self, name: &str, i: usize) -> Option<f64> {
        num::extract_number(&self.attribute_at(name, i))
    }

    /// Values of `name` on every top-level element that carries the key,
    /// in order. Empty values are included; the present-but-empty rule
    /// belongs to the single-value accessors.
    pub fn all_attributes(&self, name: &str) -> Vec<String> {
        if name.trim().is_empty() {
            return Vec::new();
        }
        self.nodes
            .iter()
            .filter_map(|node| node.attribute(name))
            .collect()
    }

    /// [`all_attributes`](Self::all_attributes) with duplicates removed,
    /// first-seen order preserved.
    pub fn all_distinct_attributes(&self, name: &str) -> Vec<String> {
        distinct(self.all_attributes(name))
    }

    /// Every attribute of every top-level element collected into a map.
    /// Duplicate keys keep the last occurrence.
    pub fn all_attributes_mapped(&self) -> HashMap<String, String> {
        let mut mapped = HashMap::new();
        for (key, value) in self.all_attributes_paired() {
            mapped.insert(key, value);
        }
        mapped
    }

    /// Every attribute occurrence of every top-level element, in order.
    /// An element whose parallel key/value arrays differ in length
    /// contributes nothing; the anomaly degrades that element only.
    pub fn all_attributes_paired(&self) -> Vec<(String, String)> {
        let mut paired = Vec::new();
        for node in self.nodes.iter() {
            let keys = node.attribute_keys();
            let values = node.attribute_values();
            if keys.len() == values.len() {
                paired.extend(keys.into_iter().zip(values));
            }
        }
        paired
    }

    // #number

    /// Number extracted from the first element's text, scale 2, rounded
    /// half up.
    pub fn number(&self) -> Option<f64> {
        num::extract_number(&self.text())
    }

    /// Number extracted from the text of the element at `i`.
    pub fn number_at(&self, i: usize) -> Option<f64> {
        num::extract_number(&self.text_at(i))
    }

    /// Number extracted from the text of the element at `i` with explicit
    /// scale and rounding.
    pub fn number_with(&self, i: usize, scale: u32, rounding: Rounding) -> Option<f64> {
        num::extract_number_with(&self.text_at(i), scale, rounding)
    }

    /// Strip the first match of `pattern` from the text of the element at
    /// `i`, then extract.
    pub fn number_cleaned(&self, i: usize, pattern: &Regex) -> Option<f64> {
        let text = self.text_at(i);
        let cleaned = pattern.replace(&text, "");
        num::extract_number(&cleaned)
    }

    // #script

    /// Raw content of the first element as a script block.
    pub fn script(&self) -> ScriptBlock {
        self.script_at(0)
    }

    /// Raw content of the element at `i` as a script block, empty past
    /// the end.
    pub fn script_at(&self, i: usize) -> ScriptBlock {
        match self.nodes.get(i) {
            None => ScriptBlock::empty(),
            Some(node) => {
                let content = node.content();
                if content.is_empty() {
                    ScriptBlock::empty()
                } else {
                    ScriptBlock::new(content)
                }
            }
        }
    }

    /// Scan every script element of the document and return the first one
    /// whose filter matches `condition`, usually a script-content test.
    pub fn first_script(&self, condition: &Condition) -> ScriptBlock {
        for f in &self.filter(SCRIPT_PATH) {
            if f.matches(condition) {
                return f.script();
            }
        }
        ScriptBlock::empty()
    }

    // #children

    /// Children of only the first top-level element, each wrapped on its
    /// own. The asymmetry against the whole-filter accessors is
    /// intentional and preserved from the original engine.
    pub fn children(&self) -> Vec<Filter> {
        match self.nodes.first() {
            None => Vec::new(),
            Some(node) => node
                .children()
                .into_iter()
                .map(Filter::from_node)
                .collect(),
        }
    }

    // #extra

    /// Number of top-level elements.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// URI of the document behind this filter, or an empty string.
    pub fn url(&self) -> String {
        match self.nodes.first() {
            Some(node) => node.uri(),
            None => String::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn is_not_empty(&self) -> bool {
        !self.is_empty()
    }

    /// Iterate the top-level elements, each wrapped as a single-element
    /// filter, in document order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.nodes.iter(),
        }
    }

    // #correlation

    /// Treat every top-level element as a row and extract a key and a
    /// value from each. Rows with equal keys overwrite each other, last
    /// row wins; use [`pair_by`](Self::pair_by) to keep duplicates.
    pub fn group_by<K, V>(&self, key: &Grouper<K>, val: &Grouper<V>) -> HashMap<K, V>
    where
        K: Eq + Hash,
    {
        let mut grouped = HashMap::new();
        for row in self {
            grouped.insert(key.extract(&row), val.extract(&row));
        }
        grouped
    }

    /// Per-row extraction like [`group_by`](Self::group_by), but ordered
    /// and with duplicates preserved.
    pub fn pair_by<K, V>(&self, key: &Grouper<K>, val: &Grouper<V>) -> Vec<(K, V)> {
        let mut pairs = Vec::new();
        for row in self {
            pairs.push((key.extract(&row), val.extract(&row)));
        }
        pairs
    }

    /// Correlate two independently extracted lists into a map. Each merger
    /// runs once against the whole filter; if the two lists differ in
    /// length the whole result is discarded (fail closed, no partial
    /// correlation).
    pub fn merge_by<K, V>(&self, key: &Merger<K>, val: &Merger<V>) -> HashMap<K, V>
    where
        K: Eq + Hash,
    {
        self.merge_pairs(key, val).into_iter().collect()
    }

    /// Like [`merge_by`](Self::merge_by) but ordered and duplicate-
    /// preserving. Unequal list lengths yield an empty list.
    pub fn merge_pairs<K, V>(&self, key: &Merger<K>, val: &Merger<V>) -> Vec<(K, V)> {
        let keys = key.extract(self);
        let values = val.extract(self);
        if keys.len() != values.len() {
            return Vec::new();
        }
        keys.into_iter().zip(values).collect()
    }

    pub(crate) fn nodes(&self) -> &[NodeHandle] {
        &self.nodes
    }
}

/// Iterator over a filter's top-level elements as single-element filters.
pub struct Iter<'a> {
    inner: std::slice::Iter<'a, NodeHandle>,
}

impl Iterator for Iter<'_> {
    type Item = Filter;

    fn next(&mut self) -> Option<Filter> {
        self.inner.next().map(|node| Filter::from_node(node.clone()))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Filter> {
        self.inner
            .next_back()
            .map(|node| Filter::from_node(node.clone()))
    }
}

impl ExactSizeIterator for Iter<'_> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<'a> IntoIterator for &'a Filter {
    type Item = Filter;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Identity equality: two filters are equal when they wrap the same
/// elements of the same parsed document, in the same order.
impl PartialEq for Filter {
    fn eq(&self, other: &Filter) -> bool {
        self.nodes.len() == other.nodes.len()
            && self
                .nodes
                .iter()
                .zip(other.nodes.iter())
                .all(|(a, b)| Arc::ptr_eq(a, b))
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("Filter");
        dbg.field("size", &self.size());
        if let Some(node) = self.nodes.first() {
            dbg.field("first_tag", &node.tag_name());
        }
        dbg.finish()
    }
}

fn distinct(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items.into_iter().filter(|s| seen.insert(s.clone())).collect()
}

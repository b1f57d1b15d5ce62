use super::condition::Condition;
use super::filter::Filter;
use super::scan::{scan_frontier, ScanBudget, ScanLimits};

/// Wildcard tag token of the external selector syntax.
const WILDCARD: &str = "***";

/// At most this many attribute predicates go into one synthesized path
/// segment; the rest are silently dropped. A hard cap carried over from
/// the original engine, kept so synthesized paths stay short enough to
/// read and to feed back into the evaluator.
const MAX_PREDICATES: usize = 5;

/// Reconstructs the selector path leading to every match of a condition.
///
/// Runs the same traversal as [`Filter::find_all`] but threads a growing
/// path string instead of collecting filters, emitting one path per node
/// where the condition holds. The synthesized paths use the surface
/// syntax of the external evaluator, so they can be pasted straight back
/// into [`Filter::filter`] while debugging a document.
///
/// ```
/// use filter_core::filter::{Condition, Filter, PathFinder};
///
/// let price = Condition::text_contains("499.00", false);
/// let finder = PathFinder::new(&price);
/// assert!(finder.find(&Filter::empty()).is_empty());
/// ```
pub struct PathFinder<'a> {
    condition: &'a Condition,
    limits: ScanLimits,
}

impl<'a> PathFinder<'a> {
    pub fn new(condition: &'a Condition) -> PathFinder<'a> {
        PathFinder {
            condition,
            limits: ScanLimits::default(),
        }
    }

    pub fn with_limits(condition: &'a Condition, limits: ScanLimits) -> PathFinder<'a> {
        PathFinder { condition, limits }
    }

    /// Scan `root` and return the synthesized path of every match, in
    /// pre-order per the deep-scan rule, not deduplicated.
    pub fn find(&self, root: &Filter) -> Vec<String> {
        let mut paths = Vec::new();
        let mut budget = ScanBudget::new(self.limits);
        let mut stack: Vec<(Filter, String, usize)> = root
            .iter()
            .rev()
            .map(|f| (f, String::new(), 0))
            .collect();

        while let Some((f, parent_path, depth)) = stack.pop() {
            if !budget.admit() {
                break;
            }
            let path = append_segment(&f, &parent_path);
            if f.matches(self.condition) {
                paths.push(path.clone());
            }
            if budget.may_descend(depth) {
                for next in scan_frontier(&f).into_iter().rev() {
                    stack.push((next, path.clone(), depth + 1));
                }
            }
        }
        paths
    }
}

/// Extend `path` with a segment for the first element of `f`.
///
/// No attributes: the wildcard token at the root, `.tag` below it.
/// Attributes with well-formed parallel arrays: `.tag[k:'v' & …]`, values
/// rendered `k:*` when empty, capped at [`MAX_PREDICATES`]. Mismatched
/// arrays degrade to a `.***` wildcard segment for this node only.
fn append_segment(f: &Filter, path: &str) -> String {
    let Some(node) = f.nodes().first() else {
        return path.to_string();
    };

    let keys = node.attribute_keys();
    if keys.is_empty() {
        return if path.is_empty() {
            WILDCARD.to_string()
        } else {
            format!("{path}.{}", node.tag_name())
        };
    }

    let values = node.attribute_values();
    if keys.len() != values.len() {
        return format!("{path}.{WILDCARD}");
    }

    let predicates: Vec<String> = keys
        .iter()
        .zip(values.iter())
        .take(MAX_PREDICATES)
        .map(|(key, value)| {
            if value.is_empty() {
                format!("{key}:*")
            } else {
                format!("{key}:'{value}'")
            }
        })
        .collect();

    format!("{path}.{}[{}]", node.tag_name(), predicates.join(" & "))
}

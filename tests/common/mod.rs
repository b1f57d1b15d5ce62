//! Shared test fixture: a tiny in-memory element tree implementing the
//! consumed `ElementNode` interface, with a minimal evaluator for the
//! selector surface syntax (`***` wildcard segments, `tag[key:'value']`
//! predicates joined by `&`). Test tooling only; the engine under test
//! treats the paths as opaque strings.

#![allow(dead_code)]

use std::cell::RefCell;
use std::sync::Arc;

use filter_core::dom::{ElementNode, NodeHandle};
use filter_core::filter::Filter;

thread_local! {
    static HANDLES: RefCell<Vec<NodeHandle>> = RefCell::new(Vec::new());
}

pub struct TestElement {
    tag: String,
    keys: Vec<String>,
    values: Vec<String>,
    children: Vec<NodeHandle>,
    own_text: String,
    uri: String,
}

impl ElementNode for TestElement {
    fn tag_name(&self) -> String {
        self.tag.clone()
    }

    fn attribute_keys(&self) -> Vec<String> {
        self.keys.clone()
    }

    fn attribute_values(&self) -> Vec<String> {
        self.values.clone()
    }

    fn children(&self) -> Vec<NodeHandle> {
        self.children.clone()
    }

    fn text(&self, include_children: bool) -> String {
        if !include_children {
            return self.own_text.clone();
        }
        let mut parts = Vec::new();
        if !self.own_text.is_empty() {
            parts.push(self.own_text.clone());
        }
        for child in &self.children {
            let t = child.text(true);
            if !t.is_empty() {
                parts.push(t);
            }
        }
        parts.join(" ")
    }

    fn content(&self) -> String {
        self.own_text.clone()
    }

    fn uri(&self) -> String {
        self.uri.clone()
    }

    fn select(&self, path: &str) -> Vec<NodeHandle> {
        let segments = split_segments(path);
        let Some((head, rest)) = segments.split_first() else {
            return Vec::new();
        };

        // First step runs relative to this element; later steps walk the
        // handle set. All results are stored child handles, so repeated
        // selects hand back the same allocations.
        let mut after_wildcard = *head == "***";
        let mut current: Vec<NodeHandle> = if after_wildcard {
            let mut expanded = Vec::new();
            for child in self.children() {
                expanded.push(child.clone());
                collect_descendants(&child, &mut expanded);
            }
            expanded
        } else {
            let step = parse_step(*head);
            self.children()
                .into_iter()
                .filter(|n| step.matches(n.as_ref()))
                .collect()
        };

        for segment in rest {
            if *segment == "***" {
                let mut expanded = Vec::new();
                for node in &current {
                    collect_descendants(node, &mut expanded);
                }
                current = expanded;
                after_wildcard = true;
            } else {
                let step = parse_step(*segment);
                current = if after_wildcard {
                    current
                        .into_iter()
                        .filter(|n| step.matches(n.as_ref()))
                        .collect()
                } else {
                    current
                        .iter()
                        .flat_map(|n| n.children())
                        .filter(|n| step.matches(n.as_ref()))
                        .collect()
                };
                after_wildcard = false;
            }
        }
        current
    }
}

struct Step {
    tag: String,
    predicates: Vec<(String, Option<String>)>,
}

impl Step {
    fn matches(&self, node: &dyn ElementNode) -> bool {
        if self.tag != "***" && node.tag_name() != self.tag {
            return false;
        }
        self.predicates.iter().all(|(key, expected)| {
            match (node.attribute(key), expected) {
                (Some(actual), Some(want)) => actual == *want,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

fn parse_step(segment: &str) -> Step {
    match segment.find('[') {
        None => Step {
            tag: segment.to_string(),
            predicates: Vec::new(),
        },
        Some(at) => {
            let tag = segment[..at].to_string();
            let inner = segment[at + 1..].trim_end_matches(']');
            let predicates = inner
                .split(" & ")
                .filter(|p| !p.is_empty())
                .map(|p| {
                    let (key, value) = p.split_once(':').expect("predicate has a colon");
                    if value == "*" {
                        (key.to_string(), None)
                    } else {
                        (key.to_string(), Some(value.trim_matches('\'').to_string()))
                    }
                })
                .collect();
            Step { tag, predicates }
        }
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, c) in path.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            '.' if depth == 0 => {
                segments.push(&path[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&path[start..]);
    segments.into_iter().filter(|s| !s.is_empty()).collect()
}

fn collect_descendants(node: &NodeHandle, out: &mut Vec<NodeHandle>) {
    for child in node.children() {
        out.push(child.clone());
        collect_descendants(&child, out);
    }
}

/// Fixture element builder.
pub struct El {
    tag: String,
    keys: Vec<String>,
    values: Vec<String>,
    children: Vec<NodeHandle>,
    own_text: String,
    uri: String,
}

pub fn el(tag: &str) -> El {
    El {
        tag: tag.to_string(),
        keys: Vec::new(),
        values: Vec::new(),
        children: Vec::new(),
        own_text: String::new(),
        uri: String::new(),
    }
}

impl El {
    pub fn attr(mut self, key: &str, value: &str) -> El {
        self.keys.push(key.to_string());
        self.values.push(value.to_string());
        self
    }

    /// Install raw parallel arrays, mismatched lengths allowed.
    pub fn raw_attrs(mut self, keys: &[&str], values: &[&str]) -> El {
        self.keys = keys.iter().map(|s| s.to_string()).collect();
        self.values = values.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn text(mut self, text: &str) -> El {
        self.own_text = text.to_string();
        self
    }

    pub fn uri(mut self, uri: &str) -> El {
        self.uri = uri.to_string();
        self
    }

    pub fn child(mut self, child: El) -> El {
        self.children.push(child.build());
        self
    }

    pub fn build(self) -> NodeHandle {
        let handle: NodeHandle = Arc::new(TestElement {
            tag: self.tag,
            keys: self.keys,
            values: self.values,
            children: self.children,
            own_text: self.own_text,
            uri: self.uri,
        });
        HANDLES.with(|handles| handles.borrow_mut().push(handle.clone()));
        handle
    }
}

pub fn doc(root: El) -> Filter {
    Filter::from_node(root.build())
}

pub fn doc_of(roots: Vec<El>) -> Filter {
    Filter::from_nodes(roots.into_iter().map(El::build).collect())
}

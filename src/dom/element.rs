use std::sync::Arc;

/// Shared handle to a parsed element. The document tree is owned by the
/// external parser; the engine only ever holds these read-only handles.
pub type NodeHandle = Arc<dyn ElementNode>;

/// The tree primitive this engine consumes.
///
/// Implementations are provided by whatever parser produced the document.
/// Attributes are exposed as parallel key/value arrays because real-world
/// parser output can carry arrays of mismatched length; callers of this
/// trait tolerate that case instead of rejecting it.
///
/// `select` is the opaque query primitive: the engine never parses or
/// validates selector paths, it only passes them through. The surface
/// syntax supports a wildcard tag token (`***`) and bracketed attribute
/// predicates (`tag[name:'value']`, several joined by `&`).
pub trait ElementNode: Send + Sync {
    fn tag_name(&self) -> String;

    /// Ordered attribute keys. May differ in length from
    /// [`attribute_values`](Self::attribute_values).
    fn attribute_keys(&self) -> Vec<String>;

    /// Ordered attribute values, parallel to the keys.
    fn attribute_values(&self) -> Vec<String>;

    /// Direct child elements, in document order.
    fn children(&self) -> Vec<NodeHandle>;

    /// Text of this element, optionally including descendant text.
    fn text(&self, include_children: bool) -> String;

    /// Raw inner content of the element without the surrounding markup.
    /// For script elements this is the script source.
    fn content(&self) -> String;

    /// URI of the document this element came from.
    fn uri(&self) -> String;

    /// Evaluate an opaque selector path against this element and return
    /// the matching descendants. A path that matches nothing returns an
    /// empty set, never an error.
    fn select(&self, path: &str) -> Vec<NodeHandle>;

    /// Look up a single attribute value by key. Mismatched parallel arrays
    /// are tolerated by pairing keys and values up to the shorter length.
    fn attribute(&self, name: &str) -> Option<String> {
        let keys = self.attribute_keys();
        let values = self.attribute_values();
        keys.iter()
            .zip(values.iter())
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v.clone())
    }

    fn has_children(&self) -> bool {
        !self.children().is_empty()
    }
}

pub mod element;

pub use element::{ElementNode, NodeHandle};

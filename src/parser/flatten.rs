//! Flattening of nested MIME payloads into their leaf parts.

use crate::model::part::{LeafPart, MimeNode};

/// Iterate over the leaf parts reachable from `nodes`, depth-first, in
/// document order.
///
/// Multipart nodes and nested sequences are descended; every leaf is
/// yielded exactly once. The iterator is lazy and borrows the tree.
pub fn flatten(nodes: &[MimeNode]) -> Leaves<'_> {
    Leaves {
        stack: vec![nodes.iter()],
    }
}

/// Lazy depth-first walk over a [`MimeNode`] forest.
///
/// Uses an explicit worklist, so deep nesting cannot overflow the call stack.
pub struct Leaves<'a> {
    stack: Vec<std::slice::Iter<'a, MimeNode>>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a LeafPart;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(node) = self.stack.last_mut()?.next() else {
                self.stack.pop();
                continue;
            };
            match node {
                MimeNode::Leaf(leaf) => return Some(leaf),
                MimeNode::Multipart { parts, .. } => self.stack.push(parts.iter()),
                MimeNode::Sequence(nodes) => self.stack.push(nodes.iter()),
            }
        }
    }
}

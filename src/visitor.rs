use crate::node::{Node, NodeKind, PropValue};

/// The NodeVisitor trait defines the single authoritative traversal mechanism for node trees.
///
/// Rules:
/// 1. Traversal is pre-order: a node is visited before its children, children in order.
/// 2. Implementers override `visit_*` methods to add behavior.
/// 3. Implementers MUST call `walk_*` functions to continue traversal unless pruning is intended.
pub trait NodeVisitor<'t> {
    fn visit_node(&mut self, node: &'t Node) {
        walk_node(self, node);
    }

    fn visit_group(&mut self, node: &'t Node) {
        walk_children(self, node);
    }

    fn visit_element(&mut self, node: &'t Node, _tag: &'t str) {
        walk_children(self, node);
    }

    fn visit_literal(&mut self, _node: &'t Node, _value: Option<&'t PropValue>) {
        // Leaf node, nothing to walk by default
    }

    fn visit_untyped(&mut self, node: &'t Node) {
        walk_children(self, node);
    }
}

pub fn walk_node<'t, V: NodeVisitor<'t> + ?Sized>(visitor: &mut V, node: &'t Node) {
    match &node.kind {
        NodeKind::Group => visitor.visit_group(node),
        NodeKind::Element(tag) => visitor.visit_element(node, tag),
        NodeKind::Literal(value) => visitor.visit_literal(node, value.as_ref()),
        NodeKind::Untyped => visitor.visit_untyped(node),
    }
}

pub fn walk_children<'t, V: NodeVisitor<'t> + ?Sized>(visitor: &mut V, node: &'t Node) {
    for child in &node.children {
        visitor.visit_node(child);
    }
}

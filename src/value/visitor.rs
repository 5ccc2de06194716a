//! Visitor over value trees.
//!
//! The node set is closed, so walking is a match over [`Node`]. Strings, words
//! and comments have no children and are never entered.

use super::{FunctionNode, ListNode, Node, NumberNode};

/// A mutable walk over a value tree, pre-order and left to right.
pub trait Visitor {
    /// Visits a number.
    fn visit_number(&mut self, number: &mut NumberNode);

    /// Visits a function call. The default descends into its arguments.
    fn visit_function(&mut self, function: &mut FunctionNode) {
        function.visit_children(self);
    }

    /// Visits the root list. The default descends into its items.
    fn visit_list(&mut self, list: &mut ListNode) {
        list.visit_children(self);
    }
}

impl Node {
    pub fn visit<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        match self {
            Node::Number(number) => visitor.visit_number(number),
            Node::Function(function) => visitor.visit_function(function),
            Node::String(_) | Node::Word(_) | Node::Comment(_) => {}
        }
    }
}

impl FunctionNode {
    pub fn visit_children<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        for argument in &mut self.arguments {
            argument.visit(visitor);
        }
    }
}

impl ListNode {
    pub fn visit<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        visitor.visit_list(self);
    }

    pub fn visit_children<V: Visitor + ?Sized>(&mut self, visitor: &mut V) {
        for item in &mut self.items {
            item.visit(visitor);
        }
    }
}

//! Tree walks over the owned graph, driven by explicit work stacks.

use crate::graph::action::Action;
use crate::graph::node::{Effect, Node};
use crate::value::property::Property;

/// Pre-order iterator over a node and all of its descendants.
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// Properties reachable from a set of actions, including modifier factors.
pub struct Properties<'a> {
    stack: Vec<&'a Property>,
}

impl<'a> Iterator for Properties<'a> {
    type Item = &'a Property;

    fn next(&mut self) -> Option<Self::Item> {
        let property = self.stack.pop()?;
        let factors = property.modifiers().iter().filter_map(|m| m.factor());
        let start = self.stack.len();
        self.stack.extend(factors);
        self.stack[start..].reverse();
        Some(property)
    }
}

impl Node {
    /// This node and every descendant, parents before children.
    pub fn walk(&self) -> Nodes<'_> {
        Nodes { stack: vec![self] }
    }

    pub fn walk_effects(&self) -> impl Iterator<Item = &Effect> {
        self.walk().flat_map(|node| node.effects.iter())
    }

    /// Node actions and effect actions of every node in the tree. A node's own
    /// actions come before the actions of its effects.
    pub fn walk_actions(&self) -> impl Iterator<Item = &Action> {
        self.walk().flat_map(|node| {
            node.actions
                .iter()
                .chain(node.effects.iter().flat_map(|e| e.actions.iter()))
        })
    }

    pub fn walk_properties(&self) -> Properties<'_> {
        let mut stack: Vec<&Property> = self.walk_actions().flat_map(Action::properties).collect();
        stack.reverse();
        Properties { stack }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/graph/walk.rs"]
mod tests;

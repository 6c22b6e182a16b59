//! Generic accessors over the tagged tree.
//!
//! All queries are total: a missing tag, a missing children array or a hole
//! degrades to "not found" and never panics, whatever the shape of the tree.
//! Traversals are depth-first pre-order (a node before its children,
//! children left to right) and never enter a hole.

use crate::{Forest, NodeID, Span};

/// The tag of the identifier leaves in the tree.
pub const IDENTIFIER: &str = "SymbolIdentifier";

/// The tag of escaped identifier leaves (`\foo+bar `).
pub const ESCAPED_IDENTIFIER: &str = "EscapedIdentifier";

impl Forest {
    /// Returns the tag of the node, or the empty string if it has none.
    #[must_use]
    pub fn tag_of(&self, node: NodeID) -> &str {
        self.node(node).tag().as_deref().unwrap_or_default()
    }

    /// Returns `true` if the node carries exactly the given tag.
    ///
    /// A node without a tag matches nothing, not even the empty tag.
    #[must_use]
    pub fn has_tag(&self, node: NodeID, tag: &str) -> bool {
        self.node(node).tag().as_deref() == Some(tag)
    }

    /// Returns the child slots of the node, or `None` if the node has no
    /// children array. An empty array yields `Some(&[])`.
    #[must_use]
    pub fn children_of(&self, node: NodeID) -> Option<&[Option<NodeID>]> {
        self.node(node).children().as_deref()
    }

    /// Iterates the children of the node that are not holes.
    pub fn present_children(
        &self,
        node: NodeID,
    ) -> impl Iterator<Item = NodeID> + '_ {
        self.children_of(node).into_iter().flatten().filter_map(|x| *x)
    }

    /// Returns the `index`th child slot of the node, or `None` if the index
    /// is out of range or the slot is a hole.
    #[must_use]
    pub fn nth_child(&self, node: NodeID, index: usize) -> Option<NodeID> {
        self.children_of(node)?.get(index).copied().flatten()
    }

    /// Finds the first node, in pre-order, carrying the wanted tag. The
    /// starting node itself is checked first.
    #[must_use]
    pub fn find_first(&self, node: NodeID, wanted_tag: &str) -> Option<NodeID> {
        self.pre_order(node).find(|x| self.has_tag(*x, wanted_tag))
    }

    /// Appends every node carrying the wanted tag to `out`, in pre-order,
    /// including the starting node if it matches.
    pub fn collect_all(
        &self,
        node: NodeID,
        wanted_tag: &str,
        out: &mut Vec<NodeID>,
    ) {
        out.extend(
            self.pre_order(node).filter(|x| self.has_tag(*x, wanted_tag)),
        );
    }

    /// Iterates the subtree rooted at `node` in depth-first pre-order.
    #[must_use]
    pub fn pre_order(&self, node: NodeID) -> PreOrder<'_> {
        PreOrder { forest: self, stack: vec![node], pruned: &[] }
    }

    /// Iterates the subtree rooted at `node` in depth-first pre-order,
    /// leaving out every subtree whose root carries one of the `pruned`
    /// tags.
    #[must_use]
    pub fn pre_order_pruned<'a>(
        &'a self,
        node: NodeID,
        pruned: &'a [&'a str],
    ) -> PreOrder<'a> {
        PreOrder { forest: self, stack: vec![node], pruned }
    }

    /// Returns the verbatim text of the node; only leaves carry text.
    #[must_use]
    pub fn text_of(&self, node: NodeID) -> Option<&str> {
        self.node(node).text().as_deref()
    }

    /// Returns the byte range of the node, if the parser reported one.
    #[must_use]
    pub fn span_of(&self, node: NodeID) -> Option<Span> {
        self.node(node).span()
    }

    /// Returns the byte range covered by the subtree: the node's own span if
    /// it has one, otherwise the range from the first to the last span found
    /// below it.
    #[must_use]
    pub fn extent_of(&self, node: NodeID) -> Option<Span> {
        if let Some(span) = self.span_of(node) {
            return Some(span);
        }

        self.pre_order(node).filter_map(|x| self.span_of(x)).reduce(
            |accumulated, span| {
                Span::new(
                    accumulated.start.min(span.start),
                    accumulated.end.max(span.end),
                )
            },
        )
    }

    /// Returns the text of the node if it is an identifier leaf.
    #[must_use]
    pub fn identifier_text(&self, node: NodeID) -> Option<&str> {
        if self.has_tag(node, IDENTIFIER)
            || self.has_tag(node, ESCAPED_IDENTIFIER)
        {
            self.text_of(node)
        } else {
            None
        }
    }

    /// Finds the first identifier leaf in the subtree, in pre-order.
    #[must_use]
    pub fn find_identifier(&self, node: NodeID) -> Option<NodeID> {
        self.pre_order(node).find(|x| self.identifier_text(*x).is_some())
    }

    /// Concatenates the text of every leaf in the subtree, in pre-order.
    ///
    /// The parser drops whitespace, so `WIDTH - 1` comes back as `WIDTH-1`.
    #[must_use]
    pub fn source_text(&self, node: NodeID) -> String {
        self.pre_order(node).filter_map(|x| self.text_of(x)).collect()
    }
}

/// An iterator over a subtree in depth-first pre-order.
///
/// Created by [`Forest::pre_order`] and [`Forest::pre_order_pruned`].
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    forest: &'a Forest,
    stack: Vec<NodeID>,
    pruned: &'a [&'a str],
}

impl Iterator for PreOrder<'_> {
    type Item = NodeID;

    fn next(&mut self) -> Option<Self::Item> {
        let node = loop {
            let node = self.stack.pop()?;

            if !self.pruned.iter().any(|tag| self.forest.has_tag(node, tag)) {
                break node;
            }
        };

        if let Some(children) = self.forest.children_of(node) {
            self.stack.extend(children.iter().rev().filter_map(|x| *x));
        }

        Some(node)
    }
}

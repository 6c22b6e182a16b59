//! The tagged syntax tree produced by the external SystemVerilog parser.
//!
//! The parser emits a loosely typed JSON document: every node is an object
//! with an optional `tag`, an optional verbatim `text` (leaves only), an
//! optional byte range and an optional ordered `children` array in which a
//! slot may be `null`. This crate lowers that document once into a
//! [`Forest`] owned by the analysis run and exposes side-effect free queries
//! over it (see [`query`]).
//!
//! Every node lives in a single arena and is referred to by [`NodeID`], so
//! anything derived from the tree can point back into it without borrowing.

use std::{fmt::Display, path::PathBuf};

use getset::{CopyGetters, Getters};
use hdlgraph_arena::{Arena, ID};
use serde::Serialize;
use serde_json::{Map, Value};

pub mod query;

/// The ID of a [`Node`] in a [`Forest`].
pub type NodeID = ID<Node>;

/// The ID of a [`File`] in a [`Forest`].
pub type FileID = ID<File>;

/// A byte range in the source file, as reported by the parser.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    derive_new::new,
)]
pub struct Span {
    /// The byte offset of the first character.
    pub start: usize,

    /// The byte offset one past the last character.
    pub end: usize,
}

impl Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A single node of the tagged tree.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, CopyGetters)]
pub struct Node {
    /// The syntactic role of the node, e.g. `kModuleDeclaration`.
    ///
    /// A node without a tag is never matched by any query.
    #[get = "pub"]
    tag: Option<String>,

    /// The verbatim source text; present on leaves only.
    #[get = "pub"]
    text: Option<String>,

    /// The byte range of the node in its source file.
    #[get_copy = "pub"]
    span: Option<Span>,

    /// The ordered child slots. `None` means the node has no children array
    /// at all; a `None` slot is a hole.
    #[get = "pub"]
    children: Option<Vec<Option<NodeID>>>,
}

/// A source file and the root of its tree.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct File {
    /// The path the parser reported for the file.
    #[get = "pub"]
    path: PathBuf,

    /// The root node, if the parser output for the file contained a tree.
    #[get_copy = "pub"]
    root: Option<NodeID>,
}

/// Owns every tagged tree of one analysis run.
///
/// Built once from the parser output and only read afterwards.
#[derive(Debug, Clone, Default)]
pub struct Forest {
    nodes: Arena<Node>,
    files: Arena<File>,
}

impl Forest {
    /// Creates an empty forest.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Arena::new(), files: Arena::new() }
    }

    /// Lowers the whole parser output: an object mapping each source file
    /// path to that file's parser result.
    ///
    /// Anything other than an object at the top level yields an empty
    /// forest. Files are added in the iteration order of the object.
    #[must_use]
    pub fn from_json(output: &Value) -> Self {
        let mut forest = Self::new();

        let Some(entries) = output.as_object() else {
            log::debug!("parser output is not an object; nothing to analyse");
            return forest;
        };

        for (path, result) in entries {
            forest.add_file(PathBuf::from(path), result);
        }

        forest
    }

    /// Adds one file's parser result to the forest.
    ///
    /// The result either holds the root node in its `tree` field or nests
    /// further objects that do; the first `tree` found depth-first is used.
    /// A result without any tree is still registered, with no root.
    pub fn add_file(&mut self, path: PathBuf, result: &Value) -> FileID {
        let root = locate_tree(result).and_then(|tree| self.lower(tree));

        if root.is_none() {
            log::debug!("no syntax tree found for `{}`", path.display());
        }

        self.files.insert(File { path, root })
    }

    /// Lowers a single JSON node, and everything below it, into the arena.
    ///
    /// Returns `None` if the value is not an object. Works with an explicit
    /// stack, so the depth of the tree is only bounded by memory.
    pub fn lower(&mut self, value: &Value) -> Option<NodeID> {
        let mut stack = Vec::new();
        let root = self.lower_shallow(value.as_object()?, &mut stack);

        while let Some((parent, index, child)) = stack.pop() {
            let id = self.lower_shallow(child, &mut stack);

            if let Some(slot) = self.nodes[parent]
                .children
                .as_mut()
                .and_then(|children| children.get_mut(index))
            {
                *slot = Some(id);
            }
        }

        Some(root)
    }

    /// Inserts the node with every child slot still a hole, and schedules
    /// the object children to fill them in order.
    fn lower_shallow<'a>(
        &mut self,
        object: &'a Map<String, Value>,
        stack: &mut Vec<(NodeID, usize, &'a Map<String, Value>)>,
    ) -> NodeID {
        let string_field = |name: &str| {
            object.get(name).and_then(Value::as_str).map(ToOwned::to_owned)
        };
        let offset_field = |name: &str| {
            object
                .get(name)
                .and_then(Value::as_u64)
                .and_then(|x| usize::try_from(x).ok())
        };

        let span = offset_field("start")
            .zip(offset_field("end"))
            .map(|(start, end)| Span::new(start, end));

        let children = object.get("children").and_then(Value::as_array);

        let id = self.nodes.insert(Node {
            tag: string_field("tag"),
            text: string_field("text"),
            span,
            children: children.map(|x| vec![None; x.len()]),
        });

        // reversed so that the first child is lowered first
        let objects = children.map_or(&[][..], Vec::as_slice);
        for (index, child) in objects.iter().enumerate().rev() {
            if let Some(child) = child.as_object() {
                stack.push((id, index, child));
            }
        }

        id
    }

    /// Returns the node with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID does not belong to this forest.
    #[must_use]
    pub fn node(&self, id: NodeID) -> &Node { &self.nodes[id] }

    /// Returns the file with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID does not belong to this forest.
    #[must_use]
    pub fn file(&self, id: FileID) -> &File { &self.files[id] }

    /// Returns every file in the order it was added.
    pub fn files(&self) -> impl ExactSizeIterator<Item = (FileID, &File)> {
        self.files.iter()
    }

    /// Returns the total number of nodes across all files.
    #[must_use]
    pub fn node_count(&self) -> usize { self.nodes.len() }
}

fn locate_tree(result: &Value) -> Option<&Value> {
    let object = result.as_object()?;

    if let Some(tree) = object.get("tree").filter(|x| x.is_object()) {
        return Some(tree);
    }

    object.values().filter(|x| x.is_object()).find_map(locate_tree)
}

//! Builds the semantic model of a SystemVerilog project from its syntax
//! trees: the declared modules with their signatures, and the graph of which
//! module instantiates which.
//!
//! Resolution runs in two passes over a [`Forest`]:
//!
//! 1. [`declaration::declare`] records every module declaration of every file
//!    in a [`Table`];
//! 2. [`instantiation::resolve_instantiations`] then links each module to
//!    the modules it instantiates.
//!
//! The second pass only starts once the first has seen every file, so a
//! module may be instantiated before its declaration appears.

use hdlgraph_handler::Handler;
use hdlgraph_tree::Forest;

use crate::{diagnostic::Diagnostic, table::Table};

pub mod declaration;
pub mod diagnostic;
pub mod inspect;
pub mod instantiation;
pub mod symbol;
pub mod table;
pub mod tag;

/// Runs both passes over the forest and returns the resolved table.
///
/// Malformed declarations and instantiation sites are reported to the
/// `handler` and skipped; resolution always produces a table.
#[must_use]
pub fn resolve(
    forest: &Forest,
    handler: &dyn Handler<Box<dyn Diagnostic>>,
) -> Table {
    let mut table = Table::new();

    declaration::declare(forest, &mut table, handler);
    instantiation::resolve_instantiations(forest, &mut table, handler);

    table
}

#[cfg(test)]
mod fixture;

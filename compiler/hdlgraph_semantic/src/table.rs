//! Contains the definition of [`Table`], the symbol table of every module
//! declared in one analysis run.

use std::collections::{hash_map::Entry, HashMap};

use hdlgraph_arena::Arena;

use crate::symbol::{Instance, Module, ModuleID};

/// Returned by [`Table::insert()`] when a module with the same name is
/// already in the table. The table is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("the module `{}` is already declared", .rejected.name())]
pub struct Collision {
    /// The module that keeps the name.
    pub existing: ModuleID,

    /// The module that was not inserted, handed back to the caller.
    pub rejected: Box<Module>,
}

/// The symbol table of the declared modules.
///
/// Owns every [`Module`] found in a run and indexes them by name. Modules are
/// kept in insertion order, which is what every iteration over the table
/// follows.
#[derive(Debug, Clone, Default)]
pub struct Table {
    modules: Arena<Module>,
    ids_by_name: HashMap<String, ModuleID>,
}

impl Table {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self { Self::default() }

    /// Inserts a module, unless one with the same name is already present.
    ///
    /// # Errors
    ///
    /// Returns [`Collision`] carrying the rejected module if the name is
    /// taken; the earlier declaration stays authoritative.
    pub fn insert(&mut self, module: Module) -> Result<ModuleID, Collision> {
        match self.ids_by_name.entry(module.name().clone()) {
            Entry::Occupied(entry) => Err(Collision {
                existing: *entry.get(),
                rejected: Box::new(module),
            }),
            Entry::Vacant(entry) => {
                let id = self.modules.insert(module);
                entry.insert(id);

                Ok(id)
            }
        }
    }

    /// Looks up a module by name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ModuleID> {
        self.ids_by_name.get(name).copied()
    }

    /// Returns the module with the given ID.
    #[must_use]
    pub fn get(&self, id: ModuleID) -> Option<&Module> { self.modules.get(id) }

    /// Returns the number of modules in the table.
    #[must_use]
    pub fn len(&self) -> usize { self.modules.len() }

    /// Returns `true` if no module has been declared.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.modules.is_empty() }

    /// Iterates the modules in insertion order.
    pub fn modules(
        &self,
    ) -> impl ExactSizeIterator<Item = (ModuleID, &Module)> {
        self.modules.iter()
    }

    /// Returns the names of the given modules, in order.
    #[must_use]
    pub fn names_of(&self, ids: &[ModuleID]) -> Vec<&str> {
        ids.iter().map(|x| self.modules[*x].name().as_str()).collect()
    }

    /// Records that `instantiator` instantiates `instance.module`: the
    /// dependency edge on the instantiator and the reference edge on the
    /// instantiated module.
    pub(crate) fn link(&mut self, instantiator: ModuleID, instance: Instance) {
        let instantiated = instance.module;

        self.modules[instantiated].references.push(instantiator);

        let module = &mut self.modules[instantiator];
        module.dependencies.push(instantiated);
        module.instances.push(instance);
    }

    /// Releases every module of the run.
    ///
    /// Equivalent to dropping the table; IDs handed out by it must not be
    /// used afterwards.
    pub fn teardown(self) {
        log::debug!("releasing {} module(s)", self.modules.len());
    }
}

impl std::ops::Index<ModuleID> for Table {
    type Output = Module;

    fn index(&self, id: ModuleID) -> &Self::Output { &self.modules[id] }
}

#[cfg(test)]
mod test;

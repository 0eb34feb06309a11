//! This module implements the BDD traits for the
//! [OxiDD](https://github.com/OxiDD/oxidd) library

use oxidd::{
    BooleanFunction, BooleanFunctionQuant, FunctionSubst, Manager, ManagerRef, Subst,
    bdd::{BDDFunction, BDDManagerRef},
};
use std::{fmt::Debug, rc::Rc, sync::Mutex};

use super::{Bdd, BddManager};

#[cfg(feature = "config_deserialize")]
use serde::Deserialize;

/// Maximum number of inner nodes in the BDD manager. Exceeding this limit
/// aborts the process.
const INNER_NODE_CAPACITY: usize = 1 << 20;
/// Maximum number of entries in the apply cache
const APPLY_CACHE_CAPACITY: usize = 1024;
/// Number of worker threads used by the manager
const THREADS: u32 = 1;

/// Message used whenever an OxiDD operation reports an allocation failure
const OOM_MESSAGE: &str =
    "OxiDD ran out of memory. Consider trying again with increased capacity";

/// BDD type for OxiDD BDDs
#[derive(Clone)]
pub struct OxiDD {
    /// The underlying OxiDD function
    bdd: BDDFunction,
    /// If the BDD is a variable, contains the variable id. Only BDDs carrying
    /// an id may appear in the renaming vectors of [`Bdd::swap`].
    var_id: Option<u32>,
}

impl Debug for OxiDD {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OxiDD(var_id: {:?})", self.var_id)
    }
}

impl OxiDD {
    /// Conjoin `vars` into a single cube function, or `None` if `vars` is
    /// empty
    fn cube<'a, I: IntoIterator<Item = &'a Self>>(vars: I) -> Option<BDDFunction> {
        let mut vars = vars.into_iter().map(|dd| dd.bdd.clone());
        let first = vars.next()?;
        Some(vars.fold(first, |acc, x| acc.and(&x).expect(OOM_MESSAGE)))
    }
}

impl Bdd for OxiDD {
    fn not(&self) -> Self {
        OxiDD {
            bdd: self.bdd.not().expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn and(&self, rhs: &Self) -> Self {
        OxiDD {
            bdd: self.bdd.and(&rhs.bdd).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn or(&self, rhs: &Self) -> Self {
        OxiDD {
            bdd: self.bdd.or(&rhs.bdd).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn implies(&self, rhs: &Self) -> Self {
        OxiDD {
            bdd: self.bdd.imp(&rhs.bdd).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn equiv(&self, rhs: &Self) -> Self {
        OxiDD {
            bdd: self.bdd.equiv(&rhs.bdd).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn exists<'a, I: IntoIterator<Item = &'a Self>>(&'a self, vars: I) -> Self {
        let Some(cube) = Self::cube(vars) else {
            return self.clone();
        };
        OxiDD {
            bdd: self.bdd.exists(&cube).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn forall<'a, I: IntoIterator<Item = &'a Self>>(&'a self, vars: I) -> Self {
        let Some(cube) = Self::cube(vars) else {
            return self.clone();
        };
        OxiDD {
            bdd: self.bdd.forall(&cube).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn swap<'a, I: IntoIterator<Item = &'a Self>>(&'a self, from: I, to: I) -> Self {
        let mut vars = Vec::new();
        let mut replacements = Vec::new();

        from.into_iter().zip(to).for_each(|(from, to)| {
            let from_id = from.var_id.expect("Renaming vector entry is not a variable");
            let to_id = to.var_id.expect("Renaming vector entry is not a variable");

            vars.push(from_id);
            replacements.push(to.bdd.clone());
            vars.push(to_id);
            replacements.push(from.bdd.clone());
        });

        let subst = Subst::new(vars, replacements);
        OxiDD {
            bdd: self.bdd.substitute(&subst).expect(OOM_MESSAGE),
            var_id: None,
        }
    }

    fn satisfiable(&self) -> bool {
        self.bdd.satisfiable()
    }
}

impl PartialEq for OxiDD {
    // Two BDDs are considered equal iff they are semantically equivalent,
    // i.e., iff a <=> b is a tautology.
    fn eq(&self, other: &Self) -> bool {
        !self.equiv(other).not().satisfiable()
    }
}

/// Configuration for the OxiDD BDD manager
///
/// See <https://docs.rs/oxidd/latest/oxidd/bdd/fn.new_manager.html>
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config_deserialize", derive(Deserialize))]
pub struct OxiddManagerConfig {
    /// Maximum number of inner nodes
    #[cfg_attr(
        feature = "config_deserialize",
        serde(default = "default_inner_node_capacity")
    )]
    pub inner_node_capacity: usize,
    /// Maximum number of apply cache entries
    #[cfg_attr(
        feature = "config_deserialize",
        serde(default = "default_apply_cache_capacity")
    )]
    pub apply_cache_capacity: usize,
    /// Number of worker threads
    #[cfg_attr(feature = "config_deserialize", serde(default = "default_threads"))]
    pub threads: u32,
}

fn default_inner_node_capacity() -> usize {
    INNER_NODE_CAPACITY
}

fn default_apply_cache_capacity() -> usize {
    APPLY_CACHE_CAPACITY
}

fn default_threads() -> u32 {
    THREADS
}

impl Default for OxiddManagerConfig {
    fn default() -> Self {
        Self {
            inner_node_capacity: default_inner_node_capacity(),
            apply_cache_capacity: default_apply_cache_capacity(),
            threads: default_threads(),
        }
    }
}

/// BDD manager for OxiDD BDDs
///
/// This manager is a wrapper around the OxiDD BDD manager. It panics if the
/// BDD library runs out of memory.
#[derive(Clone)]
pub struct OxiddManager {
    /// Reference to the manager
    mgr: BDDManagerRef,
    /// Index of the next variable to be created
    next_var_index: Rc<Mutex<u32>>,
}

impl PartialEq for OxiddManager {
    /// Compare based on the manager objects
    fn eq(&self, other: &Self) -> bool {
        self.mgr == other.mgr
    }
}

impl Debug for OxiddManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "OxiddManager")
    }
}

impl OxiddManager {
    /// Create a new OxiDD BDD manager with default capacities.
    pub fn new() -> Self {
        Self::new_with_config(&OxiddManagerConfig::default())
    }

    /// Create a new OxiDD BDD manager with custom configuration.
    pub fn new_with_config(config: &OxiddManagerConfig) -> Self {
        Self {
            mgr: oxidd::bdd::new_manager(
                config.inner_node_capacity,
                config.apply_cache_capacity,
                config.threads,
            ),
            next_var_index: Rc::new(Mutex::new(0)),
        }
    }
}

impl Default for OxiddManager {
    fn default() -> Self {
        Self::new()
    }
}

impl BddManager for OxiddManager {
    type DD = OxiDD;

    fn new_var(&mut self) -> Self::DD {
        let mut index = self.next_var_index.lock().unwrap();
        let new_var_index = *index;
        *index += 1;

        let inner = self.mgr.with_manager_exclusive(|mgr| {
            mgr.add_named_vars([new_var_index.to_string()])
                .expect(OOM_MESSAGE);

            BDDFunction::var(mgr, new_var_index).expect(OOM_MESSAGE)
        });
        OxiDD {
            bdd: inner,
            var_id: Some(new_var_index),
        }
    }

    fn get_bdd_false(&self) -> Self::DD {
        let inner = self.mgr.with_manager_exclusive(|mgr| BDDFunction::f(mgr));
        OxiDD {
            bdd: inner,
            var_id: None,
        }
    }

    fn get_bdd_true(&self) -> Self::DD {
        let inner = self.mgr.with_manager_exclusive(|mgr| BDDFunction::t(mgr));
        OxiDD {
            bdd: inner,
            var_id: None,
        }
    }
}

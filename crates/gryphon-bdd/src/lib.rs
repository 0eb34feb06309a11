//! Common interface for binary decision diagrams (BDDs) and BDD managers
//!
//! This package is the boolean-function backend of the gryphon synthesizer.
//! It provides a generic interface for BDDs and BDD managers so that the game
//! solver never talks to a concrete BDD library directly. The only backend
//! currently compiled in is [OxiDD](https://github.com/OxiDD/oxidd).
//!
//! To interface with BDDs use the [`BDD`] and [`BDDManager`] types, as well as
//! the [`BDDManagerConfig`] to configure the manager.
//!
//! To add a new BDD library, implement the [`Bdd`] and [`BddManager`] traits
//! for the library, add it as a new module and add a variant for the new
//! library to the [`BDD`] and [`BDDManager`] types.

use std::{fmt::Debug, ops};

#[cfg(feature = "oxidd")]
use self::oxidd::{OxiDD, OxiddManager};
#[cfg(feature = "config_deserialize")]
use serde::Deserialize;

/// OxiDD library
#[cfg(feature = "oxidd")]
mod oxidd;

#[cfg(feature = "oxidd")]
pub use self::oxidd::OxiddManagerConfig;

/// Common representation of a binary decision diagram (BDD)
///
/// This enum defines a variant for each library that can be used. BDDs
/// created by different managers must not be combined.
#[derive(Debug, Clone, PartialEq)]
pub enum BDD {
    /// An OxiDD BDD
    #[cfg(feature = "oxidd")]
    OxiDD(OxiDD),
}

impl Bdd for BDD {
    fn not(&self) -> Self {
        match self {
            #[cfg(feature = "oxidd")]
            BDD::OxiDD(dd) => BDD::OxiDD(dd.not()),
        }
    }

    fn and(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            #[cfg(feature = "oxidd")]
            (BDD::OxiDD(dd), BDD::OxiDD(rhs_dd)) => BDD::OxiDD(dd.and(rhs_dd)),
        }
    }

    fn or(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            #[cfg(feature = "oxidd")]
            (BDD::OxiDD(dd), BDD::OxiDD(rhs_dd)) => BDD::OxiDD(dd.or(rhs_dd)),
        }
    }

    fn implies(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            #[cfg(feature = "oxidd")]
            (BDD::OxiDD(dd), BDD::OxiDD(rhs_dd)) => BDD::OxiDD(dd.implies(rhs_dd)),
        }
    }

    fn equiv(&self, rhs: &Self) -> Self {
        match (self, rhs) {
            #[cfg(feature = "oxidd")]
            (BDD::OxiDD(dd), BDD::OxiDD(rhs_dd)) => BDD::OxiDD(dd.equiv(rhs_dd)),
        }
    }

    fn exists<'a, I: IntoIterator<Item = &'a Self>>(&'a self, vars: I) -> Self {
        match self {
            #[cfg(feature = "oxidd")]
            BDD::OxiDD(dd) => BDD::OxiDD(dd.exists(vars.into_iter().map(|v| match v {
                BDD::OxiDD(v) => v,
            }))),
        }
    }

    fn forall<'a, I: IntoIterator<Item = &'a Self>>(&'a self, vars: I) -> Self {
        match self {
            #[cfg(feature = "oxidd")]
            BDD::OxiDD(dd) => BDD::OxiDD(dd.forall(vars.into_iter().map(|v| match v {
                BDD::OxiDD(v) => v,
            }))),
        }
    }

    fn swap<'a, I: IntoIterator<Item = &'a Self>>(&'a self, from: I, to: I) -> Self {
        match self {
            #[cfg(feature = "oxidd")]
            BDD::OxiDD(dd) => {
                let unwrap = |v: &'a BDD| match v {
                    BDD::OxiDD(v) => v,
                };

                let from = from.into_iter().map(unwrap);
                let to = to.into_iter().map(unwrap);

                BDD::OxiDD(dd.swap(from, to))
            }
        }
    }

    fn satisfiable(&self) -> bool {
        match self {
            #[cfg(feature = "oxidd")]
            BDD::OxiDD(dd) => dd.satisfiable(),
        }
    }
}

impl ops::Not for &BDD {
    type Output = BDD;

    fn not(self) -> BDD {
        Bdd::not(self)
    }
}

impl ops::Not for BDD {
    type Output = BDD;

    fn not(self) -> BDD {
        Bdd::not(&self)
    }
}

impl ops::BitAnd for &BDD {
    type Output = BDD;

    fn bitand(self, rhs: Self) -> BDD {
        Bdd::and(self, rhs)
    }
}

impl ops::BitAnd for BDD {
    type Output = BDD;

    fn bitand(self, rhs: Self) -> BDD {
        Bdd::and(&self, &rhs)
    }
}

impl ops::BitAndAssign for BDD {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = Bdd::and(self, &rhs);
    }
}

impl ops::BitOr for &BDD {
    type Output = BDD;

    fn bitor(self, rhs: Self) -> BDD {
        Bdd::or(self, rhs)
    }
}

impl ops::BitOr for BDD {
    type Output = BDD;

    fn bitor(self, rhs: Self) -> BDD {
        Bdd::or(&self, &rhs)
    }
}

impl ops::BitOrAssign for BDD {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = Bdd::or(self, &rhs);
    }
}

/// Configuration for a BDD manager
///
/// This enum is the common interface for configuration of a BDD manager.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config_deserialize", derive(Deserialize))]
pub enum BDDManagerConfig {
    /// OxiDD manager configuration
    #[cfg(feature = "oxidd")]
    #[cfg_attr(feature = "config_deserialize", serde(rename = "oxidd"))]
    Oxidd(OxiddManagerConfig),
}

impl BDDManagerConfig {
    /// Create a new BDD manager with the current configuration
    pub fn mgr_from_config(&self) -> BDDManager {
        match self {
            #[cfg(feature = "oxidd")]
            BDDManagerConfig::Oxidd(cfg) => BDDManager::new_oxidd_with_config(cfg),
        }
    }

    /// Get the default configuration for the OxiDD BDD manager
    #[cfg(feature = "oxidd")]
    pub fn new_oxidd() -> Self {
        BDDManagerConfig::Oxidd(OxiddManagerConfig::default())
    }
}

/// The `BDDManager` type allows to interface with BDD managers from different
/// libraries.
#[derive(Debug, Clone, PartialEq)]
pub enum BDDManager {
    /// OxiDD BDD library backend
    #[cfg(feature = "oxidd")]
    OxiDD(OxiddManager),
}

impl BDDManager {
    /// Create a new BDD manager with the given configuration
    pub fn new(cfg: &BDDManagerConfig) -> Self {
        cfg.mgr_from_config()
    }

    /// Create a new OxiDD BDD manager with default configuration.
    #[cfg(feature = "oxidd")]
    pub fn new_oxidd() -> Self {
        BDDManager::OxiDD(OxiddManager::default())
    }

    /// Create a new OxiDD BDD manager with custom configuration.
    #[cfg(feature = "oxidd")]
    pub fn new_oxidd_with_config(cfg: &OxiddManagerConfig) -> Self {
        BDDManager::OxiDD(OxiddManager::new_with_config(cfg))
    }
}

impl Default for BDDManager {
    /// The default BDD manager is the OxiDD manager with default capacities.
    #[allow(unreachable_code)]
    fn default() -> Self {
        #[cfg(feature = "oxidd")]
        return BDDManager::OxiDD(OxiddManager::default());
        panic!("No BDD library enabled during compilation");
    }
}

impl BddManager for BDDManager {
    type DD = BDD;

    fn new_var(&mut self) -> Self::DD {
        match self {
            #[cfg(feature = "oxidd")]
            BDDManager::OxiDD(mgr) => BDD::OxiDD(mgr.new_var()),
        }
    }

    fn get_bdd_false(&self) -> Self::DD {
        match self {
            #[cfg(feature = "oxidd")]
            BDDManager::OxiDD(mgr) => BDD::OxiDD(mgr.get_bdd_false()),
        }
    }

    fn get_bdd_true(&self) -> Self::DD {
        match self {
            #[cfg(feature = "oxidd")]
            BDDManager::OxiDD(mgr) => BDD::OxiDD(mgr.get_bdd_true()),
        }
    }
}

/// The `Bdd` trait defines the interface for a binary decision diagram.
///
/// Semantic equality of two BDDs is exposed through `PartialEq`, so `a == b`
/// holds iff `a` and `b` denote the same boolean function.
pub trait Bdd: Sized + Debug + PartialEq + Clone {
    /// Negation of a BDD.
    fn not(&self) -> Self;

    /// Conjunction of two BDDs.
    fn and(&self, rhs: &Self) -> Self;

    /// Disjunction of two BDDs.
    fn or(&self, rhs: &Self) -> Self;

    /// Compute the implication of two BDDs, i.e., the BDD `lhs => rhs`.
    fn implies(&self, rhs: &Self) -> Self;

    /// Compute the equivalence of two BDDs, i.e., the BDD `lhs <=> rhs`.
    fn equiv(&self, rhs: &Self) -> Self;

    /// Existential quantification over a set of variables `vars`
    ///
    /// Quantifying over an empty set of variables returns the function
    /// unchanged.
    fn exists<'a, I: IntoIterator<Item = &'a Self>>(&'a self, vars: I) -> Self;

    /// Universal quantification over a set of variables `vars`
    ///
    /// Quantifying over an empty set of variables returns the function
    /// unchanged.
    fn forall<'a, I: IntoIterator<Item = &'a Self>>(&'a self, vars: I) -> Self;

    /// Swap variables according to the positionally aligned vectors `from` and
    /// `to`. Both vectors must consist of variables.
    fn swap<'a, I: IntoIterator<Item = &'a Self>>(&'a self, from: I, to: I) -> Self;

    /// Check whether a satisfying assignment exists for the BDD.
    fn satisfiable(&self) -> bool;
}

/// The `BddManager` trait defines the interface for a BDD manager. The
/// associated type `DD` is the type of BDDs created by this manager.
pub trait BddManager: Debug + PartialEq + Clone + Default {
    /// The type of BDDs created by the manager.
    type DD: Bdd;

    /// Create a new BDD variable.
    fn new_var(&mut self) -> Self::DD;

    /// Get the constant false BDD
    fn get_bdd_false(&self) -> Self::DD;

    /// Get the constant true BDD
    fn get_bdd_true(&self) -> Self::DD;
}

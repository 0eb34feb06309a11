//! Selecting a single satisfying valuation of a variable vector
//!
//! The choice below is observable: it decides which explicit strategy the
//! extractor emits. The positive branch is preferred whenever both cofactors
//! are non-zero, and callers must not depend on any other order.

use gryphon_bdd::{BDD, Bdd};

/// Pick one satisfying assignment of `vars` under `f` and return it as a cube
/// of literals
///
/// For each variable in order, the branch that leaves `f` non-zero is chosen
/// and the corresponding literal conjoined, restricting `f` before the next
/// variable is considered. `f` must be satisfiable; `vars` must be variables
/// of the same manager.
pub fn determinize(f: &BDD, vars: &[BDD]) -> BDD {
    let mut remainder = f.clone();
    // the constant true of f's manager
    let mut cube = f.or(&f.not());
    for var in vars {
        let positive = remainder.and(var);
        let literal = if positive.satisfiable() {
            var.clone()
        } else {
            var.not()
        };
        remainder = remainder.and(&literal);
        cube = cube.and(&literal);
    }
    cube
}

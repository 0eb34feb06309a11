//! The game context for GR(1) synthesis
//!
//! A [`Game`] holds everything the realizability solver and the strategy
//! extractor need: the table of BDD variables (two copies, current state and
//! next state, of every declared input and output), the initial and safety
//! constraints of both players, the liveness constraint lists, and the
//! precomputed variable vectors and quantification cubes.
//!
//! A game is assembled through the [`GameBuilder`] and is immutable once
//! built. The builder owns the [`BDDManager`]; all BDDs handed out by the
//! game live as long as the game itself.

use gryphon_bdd::{BDD, BDDManager, Bdd, BddManager};

mod builder;

pub use builder::{GameBuilder, GameBuilderError};

/// The four roles a BDD variable can play in the game
///
/// Every declared input contributes a `PreInput` and a `PostInput` variable
/// with the same base name, every declared output a `PreOutput` and a
/// `PostOutput` variable. `Pre` variables describe the current state, `Post`
/// variables the next state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    /// Current-state copy of an environment-controlled variable
    PreInput,
    /// Current-state copy of a system-controlled variable
    PreOutput,
    /// Next-state copy of an environment-controlled variable
    PostInput,
    /// Next-state copy of a system-controlled variable
    PostOutput,
}

impl VariableKind {
    /// Whether this is a current-state role
    pub fn is_pre(&self) -> bool {
        matches!(self, VariableKind::PreInput | VariableKind::PreOutput)
    }

    /// Whether this is an environment-controlled role
    pub fn is_input(&self) -> bool {
        matches!(self, VariableKind::PreInput | VariableKind::PostInput)
    }
}

/// One entry of the variable table
///
/// Next-state entries carry the primed display name (base name with a
/// trailing `'`), which is also the token that refers to them in constraint
/// formulas.
#[derive(Debug, Clone)]
pub struct GameVariable {
    name: String,
    kind: VariableKind,
    bdd: BDD,
}

impl GameVariable {
    /// The display name (primed for next-state entries)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The role of this variable
    pub fn kind(&self) -> VariableKind {
        self.kind
    }

    /// The BDD variable backing this entry
    pub fn bdd(&self) -> &BDD {
        &self.bdd
    }
}

/// The immutable game context
///
/// All constraint accessors return BDDs over the variable table; the
/// supported roles per constraint are enforced during parsing. The variable
/// vectors and cubes are computed once by [`GameBuilder::build`] and never
/// recomputed.
#[derive(Debug, Clone)]
pub struct Game {
    manager: BDDManager,
    variables: Vec<GameVariable>,

    init_env: BDD,
    init_sys: BDD,
    safety_env: BDD,
    safety_sys: BDD,
    liveness_env: Vec<BDD>,
    liveness_sys: Vec<BDD>,

    // positionally aligned renaming vectors; pre_vars doubles as the cube of
    // all current-state variables
    pre_vars: Vec<BDD>,
    post_vars: Vec<BDD>,
    pre_input_vars: Vec<BDD>,
    pre_output_vars: Vec<BDD>,
    post_input_vars: Vec<BDD>,
    post_output_vars: Vec<BDD>,
}

impl Game {
    /// Iterate over the variable table in declaration order
    pub fn variables(&self) -> impl Iterator<Item = &GameVariable> {
        self.variables.iter()
    }

    /// Display names of the declared inputs, in declaration order
    pub fn input_names(&self) -> Vec<String> {
        self.names_of(VariableKind::PreInput)
    }

    /// Display names of the declared outputs, in declaration order
    pub fn output_names(&self) -> Vec<String> {
        self.names_of(VariableKind::PreOutput)
    }

    fn names_of(&self, kind: VariableKind) -> Vec<String> {
        self.variables
            .iter()
            .filter(|v| v.kind == kind)
            .map(|v| v.name.clone())
            .collect()
    }

    /// Initial constraint of the environment, over current-state inputs
    pub fn init_env(&self) -> &BDD {
        &self.init_env
    }

    /// Initial constraint of the system, over current-state outputs
    pub fn init_sys(&self) -> &BDD {
        &self.init_sys
    }

    /// Safety constraint restricting the admissible next inputs
    pub fn safety_env(&self) -> &BDD {
        &self.safety_env
    }

    /// Safety constraint restricting the admissible next outputs
    pub fn safety_sys(&self) -> &BDD {
        &self.safety_sys
    }

    /// Liveness assumptions of the environment; never empty
    pub fn liveness_env(&self) -> &[BDD] {
        &self.liveness_env
    }

    /// Liveness guarantees of the system; never empty
    pub fn liveness_sys(&self) -> &[BDD] {
        &self.liveness_sys
    }

    /// The constant true BDD
    pub fn bdd_true(&self) -> BDD {
        self.manager.get_bdd_true()
    }

    /// The constant false BDD
    pub fn bdd_false(&self) -> BDD {
        self.manager.get_bdd_false()
    }

    /// All current-state variables, in declaration order
    pub fn pre_vars(&self) -> &[BDD] {
        &self.pre_vars
    }

    /// All next-state variables, aligned position-wise with
    /// [`Game::pre_vars`]
    pub fn post_vars(&self) -> &[BDD] {
        &self.post_vars
    }

    /// Current-state input variables
    pub fn pre_input_vars(&self) -> &[BDD] {
        &self.pre_input_vars
    }

    /// Current-state output variables
    pub fn pre_output_vars(&self) -> &[BDD] {
        &self.pre_output_vars
    }

    /// Next-state input variables
    pub fn post_input_vars(&self) -> &[BDD] {
        &self.post_input_vars
    }

    /// Next-state output variables
    pub fn post_output_vars(&self) -> &[BDD] {
        &self.post_output_vars
    }

    /// Rename current-state variables to next-state variables and vice versa
    pub fn swap_pre_post(&self, f: &BDD) -> BDD {
        f.swap(&self.pre_vars, &self.post_vars)
    }

    /// Existentially quantify the next-state output variables
    pub fn exists_post_output(&self, f: &BDD) -> BDD {
        f.exists(&self.post_output_vars)
    }

    /// Universally quantify the next-state input variables
    pub fn forall_post_input(&self, f: &BDD) -> BDD {
        f.forall(&self.post_input_vars)
    }

    /// Existentially quantify the current-state output variables
    pub fn exists_pre_output(&self, f: &BDD) -> BDD {
        f.exists(&self.pre_output_vars)
    }

    /// Existentially quantify all next-state variables
    pub fn exists_post(&self, f: &BDD) -> BDD {
        f.exists(&self.post_vars)
    }
}

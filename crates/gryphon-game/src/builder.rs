//! Builder assembling a [`Game`] from declarations and constraints

use std::fmt::Display;

use gryphon_bdd::{BDD, BDDManager, Bdd, BddManager};
use log::debug;

use crate::{Game, GameVariable, VariableKind};

/// Tokens with a fixed meaning in constraint formulas; variables must not
/// collide with them
const RESERVED_TOKENS: [&str; 5] = ["|", "&", "!", "0", "1"];

/// Builder for [`Game`]
///
/// Declarations create the paired current-state and next-state BDD variables.
/// Constraints of the same kind are conjoined, liveness constraints are
/// accumulated in order. [`GameBuilder::build`] computes the renaming vectors
/// and quantification cubes and freezes the game.
#[derive(Debug)]
pub struct GameBuilder {
    manager: BDDManager,
    variables: Vec<GameVariable>,
    init_env: BDD,
    init_sys: BDD,
    safety_env: BDD,
    safety_sys: BDD,
    liveness_env: Vec<BDD>,
    liveness_sys: Vec<BDD>,
}

impl GameBuilder {
    /// Create a builder on top of the given manager; all constraints start
    /// out as the constant true
    pub fn new(manager: BDDManager) -> Self {
        let top = manager.get_bdd_true();
        GameBuilder {
            manager,
            variables: Vec::new(),
            init_env: top.clone(),
            init_sys: top.clone(),
            safety_env: top.clone(),
            safety_sys: top,
            liveness_env: Vec::new(),
            liveness_sys: Vec::new(),
        }
    }

    /// Declare an environment-controlled variable
    pub fn declare_input(&mut self, name: &str) -> Result<(), GameBuilderError> {
        self.declare(name, VariableKind::PreInput, VariableKind::PostInput)
    }

    /// Declare a system-controlled variable
    pub fn declare_output(&mut self, name: &str) -> Result<(), GameBuilderError> {
        self.declare(name, VariableKind::PreOutput, VariableKind::PostOutput)
    }

    fn declare(
        &mut self,
        name: &str,
        pre: VariableKind,
        post: VariableKind,
    ) -> Result<(), GameBuilderError> {
        if name.is_empty()
            || name.chars().any(char::is_whitespace)
            || RESERVED_TOKENS.contains(&name)
        {
            return Err(GameBuilderError::InvalidName(name.to_owned()));
        }
        let primed = format!("{name}'");
        if self
            .variables
            .iter()
            .any(|v| v.name == name || v.name == primed)
        {
            return Err(GameBuilderError::DuplicateVariable(name.to_owned()));
        }

        self.variables.push(GameVariable {
            name: name.to_owned(),
            kind: pre,
            bdd: self.manager.new_var(),
        });
        self.variables.push(GameVariable {
            name: primed,
            kind: post,
            bdd: self.manager.new_var(),
        });
        Ok(())
    }

    /// Look up a variable by the exact token that refers to it in formulas
    /// (primed for next-state variables)
    pub fn lookup(&self, token: &str) -> Option<&GameVariable> {
        self.variables.iter().find(|v| v.name == token)
    }

    /// The constant true BDD
    pub fn bdd_true(&self) -> BDD {
        self.manager.get_bdd_true()
    }

    /// The constant false BDD
    pub fn bdd_false(&self) -> BDD {
        self.manager.get_bdd_false()
    }

    /// Conjoin a constraint onto the environment initial condition
    pub fn constrain_init_env(&mut self, f: &BDD) {
        self.init_env = self.init_env.and(f);
    }

    /// Conjoin a constraint onto the system initial condition
    pub fn constrain_init_sys(&mut self, f: &BDD) {
        self.init_sys = self.init_sys.and(f);
    }

    /// Conjoin a constraint onto the environment safety condition
    pub fn constrain_safety_env(&mut self, f: &BDD) {
        self.safety_env = self.safety_env.and(f);
    }

    /// Conjoin a constraint onto the system safety condition
    pub fn constrain_safety_sys(&mut self, f: &BDD) {
        self.safety_sys = self.safety_sys.and(f);
    }

    /// Append a liveness assumption of the environment
    pub fn add_liveness_assumption(&mut self, f: BDD) {
        self.liveness_env.push(f);
    }

    /// Append a liveness guarantee of the system
    pub fn add_liveness_guarantee(&mut self, f: BDD) {
        self.liveness_sys.push(f);
    }

    /// Freeze the game: compute the renaming vectors and quantification cubes
    /// and inject a constant-true liveness constraint on every side that
    /// declared none. The fixpoint computation is unsound on an empty
    /// liveness list, so the placeholder is not optional.
    pub fn build(mut self) -> Game {
        if self.liveness_env.is_empty() {
            self.liveness_env.push(self.manager.get_bdd_true());
        }
        if self.liveness_sys.is_empty() {
            self.liveness_sys.push(self.manager.get_bdd_true());
        }

        let mut pre_vars = Vec::new();
        let mut post_vars = Vec::new();
        let mut pre_input_vars = Vec::new();
        let mut pre_output_vars = Vec::new();
        let mut post_input_vars = Vec::new();
        let mut post_output_vars = Vec::new();
        for variable in &self.variables {
            let bdd = variable.bdd.clone();
            match variable.kind {
                VariableKind::PreInput => {
                    pre_vars.push(bdd.clone());
                    pre_input_vars.push(bdd);
                }
                VariableKind::PreOutput => {
                    pre_vars.push(bdd.clone());
                    pre_output_vars.push(bdd);
                }
                VariableKind::PostInput => {
                    post_vars.push(bdd.clone());
                    post_input_vars.push(bdd);
                }
                VariableKind::PostOutput => {
                    post_vars.push(bdd.clone());
                    post_output_vars.push(bdd);
                }
            }
        }

        debug!(
            "Built game context with {} inputs, {} outputs, {} liveness assumption(s) and {} liveness guarantee(s)",
            pre_input_vars.len(),
            pre_output_vars.len(),
            self.liveness_env.len(),
            self.liveness_sys.len()
        );

        Game {
            manager: self.manager,
            variables: self.variables,
            init_env: self.init_env,
            init_sys: self.init_sys,
            safety_env: self.safety_env,
            safety_sys: self.safety_sys,
            liveness_env: self.liveness_env,
            liveness_sys: self.liveness_sys,
            pre_vars,
            post_vars,
            pre_input_vars,
            pre_output_vars,
            post_input_vars,
            post_output_vars,
        }
    }
}

/// Error raised when a variable declaration is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameBuilderError {
    /// A variable with the same base name was already declared
    DuplicateVariable(String),
    /// The name is empty, contains whitespace or collides with an operator
    /// token
    InvalidName(String),
}

impl std::error::Error for GameBuilderError {}

impl Display for GameBuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameBuilderError::DuplicateVariable(name) => {
                write!(f, "The variable '{name}' has already been declared")
            }
            GameBuilderError::InvalidName(name) => {
                write!(f, "'{name}' is not a valid variable name")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declarations_are_looked_up_by_token() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_input("req").unwrap();

        assert_eq!(
            builder.lookup("req").map(|v| v.kind()),
            Some(VariableKind::PreInput)
        );
        assert_eq!(
            builder.lookup("req'").map(|v| v.kind()),
            Some(VariableKind::PostInput)
        );
        assert!(builder.lookup("ack").is_none());
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_input("x").unwrap();

        assert_eq!(
            builder.declare_output("x"),
            Err(GameBuilderError::DuplicateVariable("x".to_owned()))
        );
        assert_eq!(
            builder.declare_input("x"),
            Err(GameBuilderError::DuplicateVariable("x".to_owned()))
        );
    }

    #[test]
    fn operator_tokens_are_rejected_as_names() {
        let mut builder = GameBuilder::new(BDDManager::default());
        for reserved in ["|", "&", "!", "0", "1"] {
            assert_eq!(
                builder.declare_input(reserved),
                Err(GameBuilderError::InvalidName(reserved.to_owned()))
            );
        }
        assert_eq!(
            builder.declare_output("two words"),
            Err(GameBuilderError::InvalidName("two words".to_owned()))
        );
        assert_eq!(
            builder.declare_output(""),
            Err(GameBuilderError::InvalidName(String::new()))
        );
    }

    #[test]
    fn liveness_placeholders_are_injected() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_output("o").unwrap();
        let game = builder.build();

        assert_eq!(game.liveness_env().len(), 1);
        assert_eq!(game.liveness_sys().len(), 1);
        assert_eq!(game.liveness_env()[0], game.bdd_true());
        assert_eq!(game.liveness_sys()[0], game.bdd_true());
    }

    #[test]
    fn supplied_liveness_is_kept() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_output("o").unwrap();
        let o = builder.lookup("o").unwrap().bdd().clone();
        builder.add_liveness_guarantee(o.clone());
        let game = builder.build();

        assert_eq!(game.liveness_sys().len(), 1);
        assert_eq!(game.liveness_sys()[0], o);
        // only the side without constraints gets the placeholder
        assert_eq!(game.liveness_env().len(), 1);
    }

    #[test]
    fn constraints_are_conjoined() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_input("a").unwrap();
        builder.declare_input("b").unwrap();
        let a = builder.lookup("a").unwrap().bdd().clone();
        let b = builder.lookup("b").unwrap().bdd().clone();

        builder.constrain_init_env(&a);
        builder.constrain_init_env(&b);
        let game = builder.build();

        assert_eq!(game.init_env(), &a.and(&b));
        assert_eq!(game.init_sys(), &game.bdd_true());
    }
}

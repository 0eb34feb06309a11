//! Explicit-state strategy extraction
//!
//! Starting from the winning initial positions, the extractor runs a breadth
//! first search over pairs of a concrete current-state valuation and the
//! index of the system goal currently pursued. For every admissible next
//! input it walks the strategy log in preference order, takes the first
//! entry that admits a system response, and advances the goal index when the
//! chosen transition closes the active goal.

use std::collections::{HashMap, VecDeque};
use std::fmt::Display;

use gryphon_bdd::{BDD, Bdd};
use gryphon_game::Game;
use log::{debug, trace};

use crate::determinize::determinize;
use crate::solver::GameSolution;

/// One state of an extracted strategy
///
/// The input and output valuations are aligned with the declaration order of
/// the game's inputs and outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyState {
    inputs: Vec<bool>,
    outputs: Vec<bool>,
    goal: usize,
    successors: Vec<usize>,
}

impl StrategyState {
    /// Valuation of the declared inputs in this state
    pub fn inputs(&self) -> &[bool] {
        &self.inputs
    }

    /// Valuation of the declared outputs in this state
    pub fn outputs(&self) -> &[bool] {
        &self.outputs
    }

    /// Index of the system goal pursued from this state
    pub fn goal(&self) -> usize {
        self.goal
    }

    /// Indices of the successor states, in discovery order
    pub fn successors(&self) -> &[usize] {
        &self.successors
    }
}

/// An explicit finite-state strategy
///
/// `Display` renders the stable textual form: one line per state
/// (`state <id>: in[..] out[..] goal=<j>`), then one line per edge
/// (`edge <src> -> <dst>`).
#[derive(Debug, Clone)]
pub struct Strategy {
    input_names: Vec<String>,
    output_names: Vec<String>,
    states: Vec<StrategyState>,
}

impl Strategy {
    /// The states of the strategy; the index in this slice is the state id
    pub fn states(&self) -> &[StrategyState] {
        &self.states
    }

    /// Names of the declared inputs, aligned with the state valuations
    pub fn input_names(&self) -> &[String] {
        &self.input_names
    }

    /// Names of the declared outputs, aligned with the state valuations
    pub fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

fn write_valuation(
    f: &mut std::fmt::Formatter<'_>,
    names: &[String],
    values: &[bool],
) -> std::fmt::Result {
    for (position, (name, value)) in names.iter().zip(values).enumerate() {
        if position > 0 {
            write!(f, " ")?;
        }
        write!(f, "{name}={}", u8::from(*value))?;
    }
    Ok(())
}

impl Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (id, state) in self.states.iter().enumerate() {
            write!(f, "state {id}: in[")?;
            write_valuation(f, &self.input_names, &state.inputs)?;
            write!(f, "] out[")?;
            write_valuation(f, &self.output_names, &state.outputs)?;
            writeln!(f, "] goal={}", state.goal)?;
        }
        for (id, state) in self.states.iter().enumerate() {
            for successor in &state.successors {
                writeln!(f, "edge {id} -> {successor}")?;
            }
        }
        Ok(())
    }
}

/// Error raised during strategy extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// Extraction was requested for an unrealizable specification
    Unrealizable,
    /// No strategy log entry admits a system response; the solver produced an
    /// inconsistent ranking. This is a bug, not a property of the input.
    NoApplicableLogEntry { goal: usize },
}

impl std::error::Error for ExtractionError {}

impl Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::Unrealizable => {
                write!(f, "Cannot extract a strategy for an unrealizable specification")
            }
            ExtractionError::NoApplicableLogEntry { goal } => write!(
                f,
                "Internal invariant violation: no strategy log entry applies while pursuing goal {goal}"
            ),
        }
    }
}

/// Book-keeping for the breadth first search over (valuation, goal) pairs
struct StateTable {
    states: Vec<StrategyState>,
    // the BDD cube of each state's valuation, indexed like `states`
    cubes: Vec<BDD>,
    index: HashMap<(Vec<bool>, usize), usize>,
    queue: VecDeque<usize>,
}

impl StateTable {
    fn new() -> Self {
        StateTable {
            states: Vec::new(),
            cubes: Vec::new(),
            index: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    /// Return the id of the state for `(cube, goal)`, creating and enqueuing
    /// it if it has not been seen before
    fn intern(&mut self, game: &Game, cube: BDD, goal: usize) -> usize {
        let key = (valuation(&cube, game.pre_vars()), goal);
        if let Some(&id) = self.index.get(&key) {
            return id;
        }
        let id = self.states.len();
        self.states.push(StrategyState {
            inputs: valuation(&cube, game.pre_input_vars()),
            outputs: valuation(&cube, game.pre_output_vars()),
            goal,
            successors: Vec::new(),
        });
        self.cubes.push(cube);
        self.index.insert(key, id);
        self.queue.push_back(id);
        id
    }
}

/// Read off the concrete assignment of `vars` from a cube that fixes all of
/// them
fn valuation(cube: &BDD, vars: &[BDD]) -> Vec<bool> {
    vars.iter().map(|var| cube.and(var).satisfiable()).collect()
}

/// Extract an explicit strategy from the winning positions and the strategy
/// log
pub fn extract_strategy(
    game: &Game,
    solution: &GameSolution,
) -> Result<Strategy, ExtractionError> {
    if !solution.is_realizable() {
        return Err(ExtractionError::Unrealizable);
    }

    let goal_count = game.liveness_sys().len();
    let mut table = StateTable::new();

    // one initial state per admissible initial input, with one winning
    // output choice each
    let mut remaining = game
        .init_env()
        .and(game.init_sys())
        .and(solution.winning_positions());
    while remaining.satisfiable() {
        let input = determinize(&remaining, game.pre_input_vars());
        let output = determinize(&remaining.and(&input), game.pre_output_vars());
        table.intern(game, input.and(&output), 0);
        remaining = remaining.and(&input.not());
    }
    debug!("Strategy extraction starts from {} initial state(s)", table.states.len());

    while let Some(id) = table.queue.pop_front() {
        let cube = table.cubes[id].clone();
        let goal = table.states[id].goal;

        // enumerate the admissible next inputs one cube at a time
        let mut env_moves = cube.and(game.safety_env());
        while env_moves.satisfiable() {
            let next_input = determinize(&env_moves, game.post_input_vars());
            env_moves = env_moves.and(&next_input.not());

            let context = cube.and(&next_input);
            let mut response = None;
            for entry in solution.strategy_log() {
                if entry.goal() != goal {
                    continue;
                }
                let moves = entry.transitions().and(&context);
                if moves.satisfiable() {
                    response = Some(moves);
                    break;
                }
            }
            let moves = response.ok_or(ExtractionError::NoApplicableLogEntry { goal })?;

            let next_output = determinize(&moves, game.post_output_vars());
            let step = next_input.and(&next_output);

            // the valuations are complete, so satisfiability of the
            // conjunction decides whether this concrete transition closes
            // the active goal
            let closes_goal = game.liveness_sys()[goal]
                .and(&cube)
                .and(&step)
                .satisfiable();
            let next_goal = if closes_goal {
                (goal + 1) % goal_count
            } else {
                goal
            };

            let successor = table.intern(game, game.swap_pre_post(&step), next_goal);
            trace!("transition {id} -> {successor}");
            if !table.states[id].successors.contains(&successor) {
                table.states[id].successors.push(successor);
            }
        }
    }

    debug!("Extracted a strategy with {} state(s)", table.states.len());
    Ok(Strategy {
        input_names: game.input_names(),
        output_names: game.output_names(),
        states: table.states,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::compute_solution;
    use gryphon_bdd::BDDManager;
    use gryphon_game::GameBuilder;

    #[test]
    fn extraction_refuses_unrealizable_solutions() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_input("i").unwrap();
        let i = builder.lookup("i").unwrap().bdd().clone();
        builder.add_liveness_guarantee(i);
        let game = builder.build();

        let solution = compute_solution(&game);
        assert!(!solution.is_realizable());
        assert!(matches!(
            extract_strategy(&game, &solution),
            Err(ExtractionError::Unrealizable)
        ));
    }

    #[test]
    fn display_renders_states_then_edges() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_output("o").unwrap();
        let o = builder.lookup("o").unwrap().bdd().clone();
        builder.constrain_init_sys(&o);
        let game = builder.build();

        let solution = compute_solution(&game);
        let strategy = extract_strategy(&game, &solution).unwrap();

        let rendered = strategy.to_string();
        assert_eq!(rendered, "state 0: in[] out[o=1] goal=0\nedge 0 -> 0\n");
    }
}

//! Realizability solver for GR(1) games
//!
//! The set of positions from which the system player wins is the outer
//! greatest fixed point of a three-level nested recurrence: for every system
//! goal `j`, a least fixed point `Y` collects the positions from which the
//! system can force goal `j` while staying inside the candidate region `Z`,
//! and inside it one greatest fixed point `X` per environment assumption `i`
//! collects the positions from which the system can either reach `Y` or keep
//! the environment out of assumption `i` forever.
//!
//! While iterating, the solver records the [`StrategyLogEntry`] ranking that
//! the strategy extractor later consumes: per goal, first the transitions
//! that close the goal, then the transitions that move strictly closer to it
//! (fewer `Y` iterations first), and last the transitions that only starve a
//! broken environment assumption.

use gryphon_bdd::{BDD, Bdd};
use gryphon_game::Game;
use log::{debug, trace};

/// One entry of the strategy log
///
/// Entries are ordered by preference: during extraction, the first entry for
/// the active goal whose transition set admits a move wins.
#[derive(Debug, Clone)]
pub struct StrategyLogEntry {
    goal: usize,
    transitions: BDD,
}

impl StrategyLogEntry {
    /// Index of the system liveness goal this entry belongs to
    pub fn goal(&self) -> usize {
        self.goal
    }

    /// The transition set justifying inclusion, over all four variable roles
    pub fn transitions(&self) -> &BDD {
        &self.transitions
    }
}

/// Result of the realizability computation
///
/// Written exactly once by [`compute_solution`]; the extractor only reads it.
#[derive(Debug, Clone)]
pub struct GameSolution {
    winning_positions: BDD,
    strategy_log: Vec<StrategyLogEntry>,
    realizable: bool,
}

impl GameSolution {
    /// The system-winning positions, over current-state variables only
    pub fn winning_positions(&self) -> &BDD {
        &self.winning_positions
    }

    /// The transition preference ranking, in insertion order
    pub fn strategy_log(&self) -> &[StrategyLogEntry] {
        &self.strategy_log
    }

    /// Whether the system can win from every admissible initial position
    pub fn is_realizable(&self) -> bool {
        self.realizable
    }
}

/// Helper for fixed point iteration over BDDs
///
/// The iteration has converged once two consecutive iterates are
/// semantically equal.
struct FixedPoint {
    current: BDD,
    reached: bool,
}

impl FixedPoint {
    fn new(init: BDD) -> Self {
        FixedPoint {
            current: init,
            reached: false,
        }
    }

    fn update(&mut self, next: BDD) {
        if self.current == next {
            self.reached = true;
        } else {
            self.current = next;
        }
    }

    fn reached(&self) -> bool {
        self.reached
    }

    fn value(&self) -> &BDD {
        &self.current
    }
}

/// The enforceable predecessor of a set of transition paths: positions from
/// which, for every admissible next input, the system has a next output such
/// that the joint transition lies in `paths`.
///
/// The implication may be pulled under the output quantifier because the
/// environment safety constraint has no next-state output support.
fn enforceable_predecessor_of_paths(game: &Game, paths: &BDD) -> BDD {
    game.forall_post_input(&game.exists_post_output(&game.safety_env().implies(paths)))
}

/// The controllable predecessor of a set of positions: positions from which
/// the system can force the next position into `target` while satisfying its
/// own safety constraint.
pub fn controllable_predecessor(game: &Game, target: &BDD) -> BDD {
    let paths = game.safety_sys().and(&game.swap_pre_post(target));
    enforceable_predecessor_of_paths(game, &paths)
}

/// Compute the winning positions, the strategy log and the realizability
/// verdict for a game
pub fn compute_solution(game: &Game) -> GameSolution {
    let mut strategy_log = Vec::new();

    // the outer greatest fixed point over the candidate winning region
    let mut z = FixedPoint::new(game.bdd_true());
    let mut outer_rounds = 0usize;
    while !z.reached() {
        outer_rounds += 1;
        // the log of earlier rounds ranked transitions against a stale
        // region; only the ranking of the final round survives
        strategy_log.clear();

        let mut region_for_all_goals = game.bdd_true();
        for (j, goal) in game.liveness_sys().iter().enumerate() {
            let goal_closing = goal.and(&game.swap_pre_post(z.value()));

            let mut goal_entries = vec![StrategyLogEntry {
                goal: j,
                transitions: goal_closing.and(game.safety_sys()),
            }];
            let mut stay_entries = Vec::new();
            let mut exploit_entries = Vec::new();

            // transitions that close goal j or move strictly closer to it
            let mut live_transitions = goal_closing;

            // the middle least fixed point
            let mut y = FixedPoint::new(game.bdd_false());
            let mut round = 0usize;
            while !y.reached() {
                let into_y = game.swap_pre_post(y.value());
                live_transitions = live_transitions.or(&into_y);
                if round > 0 {
                    stay_entries.push(StrategyLogEntry {
                        goal: j,
                        transitions: into_y.and(game.safety_sys()),
                    });
                }

                let mut good_for_any_assumption = y.value().clone();
                for (i, assumption) in game.liveness_env().iter().enumerate() {
                    let broken = assumption.not();

                    // the innermost greatest fixed point
                    let mut x = FixedPoint::new(game.bdd_true());
                    while !x.reached() {
                        let paths = live_transitions
                            .or(&broken.and(&game.swap_pre_post(x.value())))
                            .and(game.safety_sys());
                        x.update(enforceable_predecessor_of_paths(game, &paths));
                    }
                    trace!(
                        "goal {j}, round {round}, assumption {i}: inner fixed point reached"
                    );

                    good_for_any_assumption = good_for_any_assumption.or(x.value());
                    exploit_entries.push(StrategyLogEntry {
                        goal: j,
                        transitions: broken
                            .and(&game.swap_pre_post(x.value()))
                            .and(game.safety_sys()),
                    });
                }

                y.update(good_for_any_assumption);
                round += 1;
            }

            region_for_all_goals = region_for_all_goals.and(y.value());

            strategy_log.append(&mut goal_entries);
            strategy_log.append(&mut stay_entries);
            strategy_log.append(&mut exploit_entries);
        }

        z.update(region_for_all_goals);
    }
    debug!("Winning region stabilized after {outer_rounds} outer round(s)");

    let winning_positions = z.value().clone();

    // realizable iff no admissible initial input lacks a winning initial
    // output
    let initial_choices = game.exists_pre_output(&game.init_sys().and(&winning_positions));
    let counterexample = game.init_env().and(&initial_choices.not());
    let realizable = !counterexample.satisfiable();

    debug!(
        "Strategy log holds {} entr(ies); specification is {}",
        strategy_log.len(),
        if realizable { "realizable" } else { "not realizable" }
    );

    GameSolution {
        winning_positions,
        strategy_log,
        realizable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gryphon_bdd::BDDManager;
    use gryphon_game::GameBuilder;

    #[test]
    fn fixed_point_converges_on_equal_iterates() {
        let game = GameBuilder::new(BDDManager::default()).build();
        let mut fp = FixedPoint::new(game.bdd_true());

        fp.update(game.bdd_false());
        assert!(!fp.reached());
        fp.update(game.bdd_false());
        assert!(fp.reached());
        assert_eq!(fp.value(), &game.bdd_false());
    }

    #[test]
    fn unconstrained_game_is_realizable_everywhere() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_input("i").unwrap();
        builder.declare_output("o").unwrap();
        let game = builder.build();

        let solution = compute_solution(&game);
        assert!(solution.is_realizable());
        assert_eq!(solution.winning_positions(), &game.bdd_true());
    }

    #[test]
    fn winning_region_is_closed_under_the_controllable_predecessor() {
        let mut builder = GameBuilder::new(BDDManager::default());
        builder.declare_input("r").unwrap();
        builder.declare_output("g").unwrap();
        let r = builder.lookup("r").unwrap().bdd().clone();
        let g = builder.lookup("g").unwrap().bdd().clone();
        let r_next = builder.lookup("r'").unwrap().bdd().clone();
        let g_next = builder.lookup("g'").unwrap().bdd().clone();
        builder.constrain_safety_sys(&r_next.not().or(&g_next));
        builder.add_liveness_guarantee(r.not().or(&g));
        let game = builder.build();

        let solution = compute_solution(&game);
        let closed = controllable_predecessor(&game, solution.winning_positions());
        assert!(!solution.winning_positions().and(&closed.not()).satisfiable());
    }
}

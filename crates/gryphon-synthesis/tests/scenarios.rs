//! End-to-end scenarios running the solver and the extractor on games built
//! from specification text

use gryphon_bdd::{BDD, BDDManager, Bdd};
use gryphon_game::Game;
use gryphon_parser::GameSpecParser;
use gryphon_synthesis::solver::{compute_solution, controllable_predecessor};
use gryphon_synthesis::{Gr1Backend, Status, SynthesisBackend, synthesize};

fn game(spec: &str) -> Game {
    GameSpecParser::new()
        .parse(spec, BDDManager::default())
        .expect("scenario specification must parse")
}

/// Truth table of `f` over the current-state variables of `game`, used to
/// compare regions across games living on different managers
fn truth_table(game: &Game, f: &BDD) -> Vec<bool> {
    let vars = game.pre_vars();
    let mut rows = Vec::new();
    for bits in 0..(1u32 << vars.len()) {
        let mut cube = game.bdd_true();
        for (position, var) in vars.iter().enumerate() {
            let literal = if bits & (1 << position) != 0 {
                var.clone()
            } else {
                var.not()
            };
            cube = cube.and(&literal);
        }
        rows.push(f.and(&cube).satisfiable());
    }
    rows
}

#[test]
fn trivially_realizable_single_output() {
    let game = game("[OUTPUT]\no\n[SYS_INIT]\no\n");

    let result = synthesize(&game).unwrap();
    assert_eq!(result.status, Status::Realizable);

    let strategy = result.strategy.unwrap();
    assert_eq!(strategy.states().len(), 1);
    let state = &strategy.states()[0];
    assert_eq!(state.outputs(), &[true]);
    assert_eq!(state.goal(), 0);
    assert_eq!(state.successors(), &[0]);
}

#[test]
fn trivially_unrealizable_input_goal() {
    // the environment can keep the input low forever
    let game = game("[INPUT]\ni\n[SYS_LIVENESS]\ni\n");

    let result = synthesize(&game).unwrap();
    assert_eq!(result.status, Status::Unrealizable);
    assert!(result.strategy.is_none());
}

#[test]
fn request_grant_arbiter() {
    let game = game(
        "[INPUT]\nr\n[OUTPUT]\ng\n\
         [SYS_TRANS]\n| ! r' g'\n\
         [SYS_LIVENESS]\n| ! r g\n",
    );

    let result = synthesize(&game).unwrap();
    assert_eq!(result.status, Status::Realizable);

    let strategy = result.strategy.unwrap();
    assert_eq!(strategy.states().len(), 2);
    for state in strategy.states() {
        // a requested grant is never withheld
        assert!(!(state.inputs()[0] && !state.outputs()[0]));
        // both environment choices stay answered
        assert_eq!(state.successors().len(), 2);
    }
    // both input valuations are covered
    assert!(strategy.states().iter().any(|s| s.inputs() == [true]));
    assert!(strategy.states().iter().any(|s| s.inputs() == [false]));
}

#[test]
fn two_goals_cycle_round_robin() {
    let game = game("[OUTPUT]\na\nb\n[SYS_LIVENESS]\na\n[SYS_LIVENESS]\nb\n");

    let backend = Gr1Backend::new();
    let solution = backend.solve(&game);
    assert!(solution.is_realizable());

    // the ranking lists all entries for goal 0 before any entry for goal 1
    let log = solution.strategy_log();
    let first_goal_one = log
        .iter()
        .position(|entry| entry.goal() == 1)
        .expect("both goals must be ranked");
    assert!(log[..first_goal_one].iter().all(|entry| entry.goal() == 0));
    assert!(log[first_goal_one..].iter().all(|entry| entry.goal() == 1));

    let strategy = backend.extract(&game, &solution).unwrap();
    assert_eq!(strategy.states().len(), 2);

    let goals: Vec<_> = strategy.states().iter().map(|s| s.goal()).collect();
    assert!(goals.contains(&0) && goals.contains(&1));
    for (id, state) in strategy.states().iter().enumerate() {
        // the two states alternate
        assert_eq!(state.successors(), &[1 - id]);
        assert_eq!(state.outputs(), &[true, true]);
    }
}

#[test]
fn environment_assumption_can_be_exploited() {
    let game = game(
        "[INPUT]\ni\n[OUTPUT]\no\n\
         [ENV_LIVENESS]\ni\n\
         [SYS_LIVENESS]\n& i o\n",
    );

    let result = synthesize(&game).unwrap();
    assert_eq!(result.status, Status::Realizable);

    let strategy = result.strategy.unwrap();
    for state in strategy.states() {
        // the goal is closed whenever the environment raises the input
        assert_eq!(state.outputs(), &[true]);
    }
}

#[test]
fn winning_region_mentions_no_next_state_variables() {
    let game = game(
        "[INPUT]\nr\n[OUTPUT]\ng\n\
         [SYS_TRANS]\n| ! r' g'\n\
         [SYS_LIVENESS]\n| ! r g\n",
    );

    let solution = compute_solution(&game);
    let winning = solution.winning_positions();
    assert_eq!(&game.exists_post(winning), winning);
}

#[test]
fn winning_region_is_closed_under_the_controllable_predecessor() {
    let game = game(
        "[INPUT]\nr\n[OUTPUT]\ng\n\
         [ENV_LIVENESS]\nr\n\
         [SYS_TRANS]\n| ! r' g'\n\
         [SYS_LIVENESS]\n& r g\n",
    );

    let solution = compute_solution(&game);
    let winning = solution.winning_positions();
    let closed = controllable_predecessor(&game, winning);
    assert!(!winning.and(&closed.not()).satisfiable());
}

#[test]
fn extracted_strategies_have_no_dangling_successors() {
    let specs = [
        "[OUTPUT]\no\n[SYS_INIT]\no\n",
        "[INPUT]\nr\n[OUTPUT]\ng\n[SYS_TRANS]\n| ! r' g'\n[SYS_LIVENESS]\n| ! r g\n",
        "[OUTPUT]\na\nb\n[SYS_LIVENESS]\na\n[SYS_LIVENESS]\nb\n",
    ];
    for spec in specs {
        let game = game(spec);
        let strategy = synthesize(&game).unwrap().strategy.unwrap();
        for state in strategy.states() {
            for &successor in state.successors() {
                assert!(successor < strategy.states().len());
            }
        }
    }
}

#[test]
fn omitted_liveness_matches_an_explicit_true_goal() {
    let implicit = game("[INPUT]\nr\n[OUTPUT]\ng\n[SYS_TRANS]\n| ! r' g'\n");
    let explicit = game(
        "[INPUT]\nr\n[OUTPUT]\ng\n[SYS_TRANS]\n| ! r' g'\n\
         [ENV_LIVENESS]\n1\n[SYS_LIVENESS]\n1\n",
    );

    let implicit_solution = compute_solution(&implicit);
    let explicit_solution = compute_solution(&explicit);

    assert_eq!(
        implicit_solution.is_realizable(),
        explicit_solution.is_realizable()
    );
    assert_eq!(
        truth_table(&implicit, implicit_solution.winning_positions()),
        truth_table(&explicit, explicit_solution.winning_positions())
    );
}

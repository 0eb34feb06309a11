//! GR(1) realizability checking and strategy synthesis
//!
//! This crate contains the symbolic core of the gryphon synthesizer: the
//! nested fixed point computation deciding which positions the system player
//! wins from ([`solver`]), the enumerative extraction of an explicit
//! finite-state strategy ([`strategy`]), and the determinization utility
//! both of them share ([`determinize`]).
//!
//! Algorithm variants plug in through the [`SynthesisBackend`] trait; the
//! shipped implementation is [`Gr1Backend`]. For the common case there is the
//! [`synthesize`] convenience function.

use std::fmt::{self, Display};

use gryphon_game::Game;
use log::info;

pub mod determinize;
pub mod solver;
pub mod strategy;

pub use solver::{GameSolution, StrategyLogEntry};
pub use strategy::{ExtractionError, Strategy, StrategyState};

/// Capability set of a synthesis algorithm
///
/// A backend decides the game and, for realizable specifications, turns its
/// solution into an explicit strategy. Backends may assume that the solution
/// passed to [`SynthesisBackend::extract`] was produced by their own
/// [`SynthesisBackend::solve`] on the same game.
pub trait SynthesisBackend {
    /// Error type for strategy extraction
    type ExtractionError: std::error::Error;

    /// Compute the winning positions and the realizability verdict
    fn solve(&self, game: &Game) -> GameSolution;

    /// Extract an explicit strategy from a solution
    fn extract(
        &self,
        game: &Game,
        solution: &GameSolution,
    ) -> Result<Strategy, Self::ExtractionError>;
}

/// The GR(1) nested fixed point backend
#[derive(Debug, Default, Clone, Copy)]
pub struct Gr1Backend;

impl Gr1Backend {
    /// Create the backend
    pub fn new() -> Self {
        Gr1Backend
    }
}

impl SynthesisBackend for Gr1Backend {
    type ExtractionError = ExtractionError;

    fn solve(&self, game: &Game) -> GameSolution {
        solver::compute_solution(game)
    }

    fn extract(
        &self,
        game: &Game,
        solution: &GameSolution,
    ) -> Result<Strategy, Self::ExtractionError> {
        strategy::extract_strategy(game, solution)
    }
}

/// The realizability status of a specification
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    /// The specification is realizable.
    Realizable,
    /// The specification is unrealizable.
    Unrealizable,
}

impl Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Realizable => "REALIZABLE",
                Self::Unrealizable => "UNREALIZABLE",
            }
        )
    }
}

/// Result of a full synthesis run
#[derive(Debug, Clone)]
pub struct SynthesisResult {
    /// The realizability status
    pub status: Status,
    /// The extracted strategy; present iff the specification is realizable
    pub strategy: Option<Strategy>,
}

/// Decide realizability of a game with the default backend and extract an
/// explicit strategy if there is one
pub fn synthesize(game: &Game) -> Result<SynthesisResult, ExtractionError> {
    let backend = Gr1Backend::new();
    let solution = backend.solve(game);
    if !solution.is_realizable() {
        info!("The specification is unrealizable");
        return Ok(SynthesisResult {
            status: Status::Unrealizable,
            strategy: None,
        });
    }

    let strategy = backend.extract(game, &solution)?;
    info!(
        "The specification is realizable; extracted a strategy with {} state(s)",
        strategy.states().len()
    );
    Ok(SynthesisResult {
        status: Status::Realizable,
        strategy: Some(strategy),
    })
}

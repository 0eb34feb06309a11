//! Parser for the sectioned GR(1) game specification format
//!
//! The format is line oriented. Blank lines and lines starting with `#` are
//! ignored after trimming. A line of the form `[NAME]` switches the current
//! section; every other line is interpreted according to the active section:
//!
//! | Section | Content per line |
//! |---|---|
//! | `[INPUT]` | name of an environment-controlled variable |
//! | `[OUTPUT]` | name of a system-controlled variable |
//! | `[ENV_INIT]` | formula over current-state inputs |
//! | `[SYS_INIT]` | formula over current-state outputs |
//! | `[ENV_TRANS]` | formula over current state and next inputs |
//! | `[SYS_TRANS]` | formula over current and next state |
//! | `[ENV_LIVENESS]` | formula over current state and next inputs |
//! | `[SYS_LIVENESS]` | formula over current and next state |
//!
//! Formulas are written in prefix Polish notation with whitespace-separated
//! tokens: `|` (binary or), `&` (binary and), `!` (unary not), the constants
//! `0` and `1`, and variable names. A trailing `'` on a name refers to the
//! next-state copy of the variable. All parse errors cite the 1-based line
//! number of their cause.

use std::fmt::Display;
use std::str::SplitWhitespace;

use gryphon_bdd::{BDD, BDDManager, Bdd};
use gryphon_game::{Game, GameBuilder, GameBuilderError, VariableKind};
use log::debug;

/// The sections of a game specification file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Input,
    Output,
    EnvInit,
    SysInit,
    EnvTrans,
    SysTrans,
    EnvLiveness,
    SysLiveness,
}

impl Section {
    fn from_header(header: &str) -> Option<Self> {
        match header {
            "[INPUT]" => Some(Section::Input),
            "[OUTPUT]" => Some(Section::Output),
            "[ENV_INIT]" => Some(Section::EnvInit),
            "[SYS_INIT]" => Some(Section::SysInit),
            "[ENV_TRANS]" => Some(Section::EnvTrans),
            "[SYS_TRANS]" => Some(Section::SysTrans),
            "[ENV_LIVENESS]" => Some(Section::EnvLiveness),
            "[SYS_LIVENESS]" => Some(Section::SysLiveness),
            _ => None,
        }
    }

    /// Variable roles that may appear in formulas of this section
    fn allowed_kinds(&self) -> &'static [VariableKind] {
        match self {
            Section::Input | Section::Output => &[],
            Section::EnvInit => &[VariableKind::PreInput],
            Section::SysInit => &[VariableKind::PreOutput],
            Section::EnvTrans | Section::EnvLiveness => &[
                VariableKind::PreInput,
                VariableKind::PreOutput,
                VariableKind::PostInput,
            ],
            Section::SysTrans | Section::SysLiveness => &[
                VariableKind::PreInput,
                VariableKind::PreOutput,
                VariableKind::PostInput,
                VariableKind::PostOutput,
            ],
        }
    }
}

/// Parser for the game specification format
///
/// The parser drives a [`GameBuilder`] and returns the frozen [`Game`]; the
/// caller supplies the BDD manager the game is built on.
#[derive(Debug, Default)]
pub struct GameSpecParser;

impl GameSpecParser {
    /// Create a new parser
    pub fn new() -> Self {
        GameSpecParser
    }

    /// Parse a complete specification into a game context
    pub fn parse(&self, input: &str, manager: BDDManager) -> Result<Game, ParseError> {
        let mut builder = GameBuilder::new(manager);
        let mut section = None;

        for (index, raw_line) in input.lines().enumerate() {
            let line = index + 1;
            let text = raw_line.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            if text.starts_with('[') {
                section = Some(Section::from_header(text).ok_or_else(|| {
                    ParseError::UnknownSection {
                        line,
                        header: text.to_owned(),
                    }
                })?);
                continue;
            }
            let Some(current) = section else {
                return Err(ParseError::MissingSection { line });
            };

            match current {
                Section::Input => builder
                    .declare_input(text)
                    .map_err(|source| ParseError::InvalidDeclaration { line, source })?,
                Section::Output => builder
                    .declare_output(text)
                    .map_err(|source| ParseError::InvalidDeclaration { line, source })?,
                _ => {
                    let formula = parse_formula(&builder, text, line, current.allowed_kinds())?;
                    match current {
                        Section::EnvInit => builder.constrain_init_env(&formula),
                        Section::SysInit => builder.constrain_init_sys(&formula),
                        Section::EnvTrans => builder.constrain_safety_env(&formula),
                        Section::SysTrans => builder.constrain_safety_sys(&formula),
                        Section::EnvLiveness => builder.add_liveness_assumption(formula),
                        Section::SysLiveness => builder.add_liveness_guarantee(formula),
                        Section::Input | Section::Output => unreachable!(),
                    }
                }
            }
        }

        debug!("Parsed game specification with {} line(s)", input.lines().count());
        Ok(builder.build())
    }
}

/// Parse one formula line and reject stray trailing tokens
fn parse_formula(
    builder: &GameBuilder,
    text: &str,
    line: usize,
    allowed: &[VariableKind],
) -> Result<BDD, ParseError> {
    let mut tokens = text.split_whitespace();
    let formula = parse_formula_tokens(builder, &mut tokens, line, allowed)?;
    if let Some(stray) = tokens.next() {
        return Err(ParseError::TrailingTokens {
            line,
            token: stray.to_owned(),
        });
    }
    Ok(formula)
}

fn parse_formula_tokens(
    builder: &GameBuilder,
    tokens: &mut SplitWhitespace,
    line: usize,
    allowed: &[VariableKind],
) -> Result<BDD, ParseError> {
    let token = tokens
        .next()
        .ok_or(ParseError::UnexpectedEndOfLine { line })?;
    match token {
        "|" => {
            let lhs = parse_formula_tokens(builder, tokens, line, allowed)?;
            let rhs = parse_formula_tokens(builder, tokens, line, allowed)?;
            Ok(lhs.or(&rhs))
        }
        "&" => {
            let lhs = parse_formula_tokens(builder, tokens, line, allowed)?;
            let rhs = parse_formula_tokens(builder, tokens, line, allowed)?;
            Ok(lhs.and(&rhs))
        }
        "!" => Ok(parse_formula_tokens(builder, tokens, line, allowed)?.not()),
        "1" => Ok(builder.bdd_true()),
        "0" => Ok(builder.bdd_false()),
        name => {
            let variable = builder.lookup(name).ok_or_else(|| ParseError::UnknownVariable {
                line,
                name: name.to_owned(),
            })?;
            if !allowed.contains(&variable.kind()) {
                return Err(ParseError::VariableNotAllowed {
                    line,
                    name: name.to_owned(),
                });
            }
            Ok(variable.bdd().clone())
        }
    }
}

/// Error raised while parsing a game specification
///
/// Every variant carries the 1-based line number of the offending input line.
#[derive(Debug)]
pub enum ParseError {
    /// A section header that is not part of the format
    UnknownSection { line: usize, header: String },
    /// A content line before the first section header
    MissingSection { line: usize },
    /// A formula refers to a variable that was never declared
    UnknownVariable { line: usize, name: String },
    /// A formula refers to a variable whose role is not allowed in the
    /// current section
    VariableNotAllowed { line: usize, name: String },
    /// A formula ended before all operands were read
    UnexpectedEndOfLine { line: usize },
    /// A formula was complete but the line still had tokens left
    TrailingTokens { line: usize, token: String },
    /// A variable declaration was rejected
    InvalidDeclaration {
        line: usize,
        source: GameBuilderError,
    },
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::InvalidDeclaration { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnknownSection { line, header } => {
                write!(f, "line {line}: Did not recognize section {header}")
            }
            ParseError::MissingSection { line } => {
                write!(f, "line {line}: Found a line without a preceding section header")
            }
            ParseError::UnknownVariable { line, name } => {
                write!(f, "line {line}: The variable '{name}' has not been declared")
            }
            ParseError::VariableNotAllowed { line, name } => write!(
                f,
                "line {line}: The variable '{name}' is not allowed in this type of expression"
            ),
            ParseError::UnexpectedEndOfLine { line } => {
                write!(f, "line {line}: Premature end of line while reading a formula")
            }
            ParseError::TrailingTokens { line, token } => {
                write!(f, "line {line}: There are stray tokens: '{token}'")
            }
            ParseError::InvalidDeclaration { line, source } => {
                write!(f, "line {line}: {source}")
            }
        }
    }
}

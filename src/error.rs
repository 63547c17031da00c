//! Error taxonomy for grammar compilation and interpretation.
//!
//! Every error is terminal for the parse that raised it: the interpreter unwinds
//! immediately and no partial [`Geometry`](crate::geometry::Geometry) is returned.

/// Problems with the rule set or configuration, detected before interpretation starts.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GrammarError {
    #[error("There is a rule without ID (rule #{rule})")]
    MissingSymbol { rule: usize },

    #[error("{id:?} is not a single alphabetic character and cannot be used as a rule identifier")]
    InvalidSymbol { id: String },

    #[error("rule for {symbol:?} has a negative weight ({weight})")]
    NegativeWeight { symbol: char, weight: f32 },

    #[error("weights for symbol {symbol:?} sum to {total}, expected 1.0")]
    WeightsDoNotSumToOne { symbol: char, total: f32 },

    #[error("invalid configuration: {field} {reason} (got {value})")]
    InvalidConfig {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },

    #[error("constant {name:?} must be finite (got {value})")]
    InvalidConstant { name: String, value: f32 },
}

/// Malformed command strings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("unterminated parameter starting at offset {position}")]
    UnterminatedParameter { position: usize },

    #[error("unmatched closing bracket at offset {position}")]
    UnmatchedBracket { position: usize },

    #[error("invalid numeric parameter {text:?} at offset {position}")]
    InvalidNumber { position: usize, text: String },

    #[error("thickness divided by zero at offset {position}")]
    ZeroDivisor { position: usize },
}

/// Names that could not be resolved against the constants table.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("unknown constant {name}")]
    UnknownConstant { name: String },
}

/// Coarse category of an [`LSystemError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Grammar,
    Syntax,
    Resolution,
}

/// Any failure produced by [`parse`](crate::interpreter::parse).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LSystemError {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("syntax error: {0}")]
    Syntax(#[from] SyntaxError),

    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),
}

impl LSystemError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Grammar(_) => ErrorKind::Grammar,
            Self::Syntax(_) => ErrorKind::Syntax,
            Self::Resolution(_) => ErrorKind::Resolution,
        }
    }
}

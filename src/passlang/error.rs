//! Error types for the passlang engine
//!
//! Tokenization never fails (stray characters are dropped), so the taxonomy
//! covers the parser and the interpreter. The first error aborts the whole
//! `tokenize -> parse -> interpret` pipeline; there is no partial result and
//! no recovery.

use std::fmt;

/// Structural errors raised by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The parser needed a specific token and found something else.
    ExpectedToken(&'static str),
    /// The cursor ran past the token sequence.
    UnexpectedEndOfInput,
    /// The next token cannot start a check element or operand, or an element
    /// was used in a position it has no meaning in.
    InvalidCheckElement,
    /// A random range has exactly two endpoints; its finish operand tried to
    /// start another range.
    InvalidRandomRangeShape,
    /// A chance or equals operand must follow its semicolon without spaces.
    InvalidChanceShape,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::ExpectedToken(kind) => write!(f, "expected {}", kind),
            ParseError::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
            ParseError::InvalidCheckElement => write!(f, "invalid check element"),
            ParseError::InvalidRandomRangeShape => {
                write!(f, "a random range takes exactly two endpoints")
            }
            ParseError::InvalidChanceShape => {
                write!(f, "chance must follow the semicolon without spaces")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors raised while walking the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// Division or modulo by zero.
    DivisionByZero,
    /// Declared chances of a random choice exceed 100 percent.
    ChanceOverflow,
    /// The leftover percentage cannot be meaningfully split among the free
    /// elements of a random choice.
    DegenerateChance,
    /// A random choice in operand position selected nothing.
    NoSelection,
    /// A loop iterator referenced a nesting depth with no active loop.
    NoSuchLoop(usize),
    /// An expression node carried an operator outside `+ - * / %`.
    InvalidOperator(char),
    /// The injected check constructor rejected an evaluated check.
    Constructor(String),
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::DivisionByZero => write!(f, "division by zero"),
            EvalError::ChanceOverflow => {
                write!(f, "declared chances exceed 100 percent")
            }
            EvalError::DegenerateChance => {
                write!(f, "leftover chance too small to split among free elements")
            }
            EvalError::NoSelection => write!(f, "random choice selected nothing"),
            EvalError::NoSuchLoop(index) => {
                write!(f, "no active loop at depth {}", index)
            }
            EvalError::InvalidOperator(op) => write!(f, "no such operator {}", op),
            EvalError::Constructor(reason) => write!(f, "check constructor: {}", reason),
        }
    }
}

impl std::error::Error for EvalError {}

/// A failure of the whole pipeline, surfaced to the caller as one value.
#[derive(Debug, Clone, PartialEq)]
pub enum PasslangError {
    Parse(ParseError),
    Eval(EvalError),
}

impl fmt::Display for PasslangError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasslangError::Parse(e) => write!(f, "parse error: {}", e),
            PasslangError::Eval(e) => write!(f, "eval error: {}", e),
        }
    }
}

impl std::error::Error for PasslangError {}

impl From<ParseError> for PasslangError {
    fn from(e: ParseError) -> Self {
        PasslangError::Parse(e)
    }
}

impl From<EvalError> for PasslangError {
    fn from(e: EvalError) -> Self {
        PasslangError::Eval(e)
    }
}

//! Errors raised while reading `OpenQASM` source into a circuit.

use simcall_ir::IrError;
use thiserror::Error;

/// Why a program could not be turned into a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Source text that starts no token.
    #[error("line {line}: invalid token '{text}'")]
    InvalidToken { line: usize, text: String },

    /// A token the grammar does not allow at this point.
    #[error("line {line}: expected {expected}, found '{found}'")]
    UnexpectedToken {
        line: usize,
        expected: String,
        found: String,
    },

    /// Input ended in the middle of a construct.
    #[error("unexpected end of input, expected {0}")]
    UnexpectedEnd(String),

    #[error("unsupported OPENQASM version '{0}'")]
    InvalidVersion(String),

    /// A register name with no declaration.
    #[error("undeclared register '{0}'")]
    UndeclaredRegister(String),

    /// A name declared twice, across quantum and classical registers.
    #[error("register '{0}' is declared more than once")]
    DuplicateRegister(String),

    #[error("'{gate}' acts on {expected} qubit(s) but was given {got}")]
    OperandCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    #[error("'{gate}' takes {expected} parameter(s) but was given {got}")]
    ParameterCount {
        gate: String,
        expected: usize,
        got: usize,
    },

    #[error("{register}[{index}] is past the end of a register of {size}")]
    IndexOutOfRange {
        register: String,
        index: u32,
        size: u32,
    },

    /// Valid `OpenQASM` with no counterpart in the circuit tree.
    #[error("unsupported construct: {0}")]
    Unsupported(String),

    /// The lowered operation was rejected by circuit validation.
    #[error(transparent)]
    Circuit(#[from] IrError),
}

/// Result type for parsing and lowering.
pub type ParseResult<T> = Result<T, ParseError>;

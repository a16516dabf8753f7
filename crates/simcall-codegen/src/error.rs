//! Error types for the code generator.

use simcall_ir::{Clbit, Qubit};
use thiserror::Error;

/// Errors that abort a compilation.
///
/// `position` is the path of the offending operation in the circuit tree,
/// for example `ops[3].then[0]`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodegenError {
    /// The operation has no emission shape.
    #[error("Unknown operation '{name}' at {position}")]
    UnknownOperation {
        /// Operation name.
        name: String,
        /// Path of the operation.
        position: String,
    },

    /// A qubit operand has no index.
    #[error("Qubit {qubit} at {position} was never indexed")]
    UnresolvedQubit {
        /// The qubit.
        qubit: Qubit,
        /// Path of the operation.
        position: String,
    },

    /// A classical operand or condition bit has no index.
    #[error("Classical bit {clbit} at {position} was never indexed")]
    UnresolvedClbit {
        /// The classical bit.
        clbit: Clbit,
        /// Path of the operation.
        position: String,
    },

    /// A condition names a classical register the circuit does not declare.
    #[error("Condition at {position} reads unknown register '{register}'")]
    UnresolvedRegister {
        /// Register name.
        register: String,
        /// Path of the operation.
        position: String,
    },

    /// A for-loop iteration source cannot be rendered.
    #[error("Invalid loop at {position}: {reason}")]
    InvalidLoop {
        /// Path of the operation.
        position: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Structured output could not be serialized.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;

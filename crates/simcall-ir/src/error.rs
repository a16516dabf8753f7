//! Error types for the IR crate.

use crate::qubit::{Clbit, Qubit};
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Qubit not found in circuit.
    #[error("Qubit {qubit} not found in circuit{}", format_gate_context(.gate_name))]
    QubitNotFound {
        /// The qubit that was not found.
        qubit: Qubit,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Classical bit not found in circuit.
    #[error("Classical bit {clbit} not found in circuit{}", format_gate_context(.gate_name))]
    ClbitNotFound {
        /// The classical bit that was not found.
        clbit: Clbit,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Condition refers to a classical register the circuit does not declare.
    #[error("Classical register '{0}' not found in circuit")]
    RegisterNotFound(String),

    /// A register with the same name was already declared.
    #[error("Duplicate register '{0}'")]
    DuplicateRegister(String),

    /// Gate requires different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Measurement qubit and clbit lists differ in length.
    #[error("Measurement maps {qubits} qubits onto {clbits} classical bits")]
    MeasureArityMismatch {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of target classical bits.
        clbits: usize,
    },

    /// Control state has bits set beyond the number of controls.
    #[error("Control state {ctrl_state:#b} does not fit {num_ctrl_qubits} controls")]
    InvalidCtrlState {
        /// The offending mask.
        ctrl_state: u64,
        /// The number of control qubits.
        num_ctrl_qubits: u32,
    },

    /// A control state was given for more controls than a `u64` mask holds.
    #[error("Control state cannot describe {num_ctrl_qubits} controls (at most 64)")]
    CtrlStateTooWide {
        /// The number of control qubits.
        num_ctrl_qubits: u32,
    },

    /// Range loop with a zero step.
    #[error("For-loop range step must be non-zero")]
    ZeroStep,

    /// Duplicate qubit in operation.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_name))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: Qubit,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Circuit JSON could not be decoded.
    #[error("Invalid circuit JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Helper function to format optional gate context.
#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

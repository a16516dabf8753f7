//! Circuit operations, including nested control-flow blocks.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, StandardGate};
use crate::qubit::{Clbit, Qubit};

/// A gate applied to an ordered list of qubits.
///
/// For controlled gates the operand list is `[...controls, ...targets]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    /// The gate.
    pub gate: Gate,
    /// Operand qubits.
    pub qubits: Vec<Qubit>,
}

/// The classical bits a condition reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionTarget {
    /// A single classical bit.
    Bit(Clbit),
    /// A whole classical register, read in register order.
    Register(String),
}

/// A classical condition: the bits read as an integer must equal `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Bits read by the condition.
    pub target: ConditionTarget,
    /// Required value.
    pub value: u64,
}

impl Condition {
    /// Condition on a single classical bit.
    pub fn bit(clbit: Clbit, value: u64) -> Self {
        Self {
            target: ConditionTarget::Bit(clbit),
            value,
        }
    }

    /// Condition on a whole classical register.
    pub fn register(name: impl Into<String>, value: u64) -> Self {
        Self {
            target: ConditionTarget::Register(name.into()),
            value,
        }
    }
}

/// The values a for-loop iterates over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForIteration {
    /// Half-open integer range `start..stop` advancing by `step` (never zero).
    Range {
        /// First value.
        start: i64,
        /// Exclusive bound.
        stop: i64,
        /// Increment, positive or negative.
        step: i64,
    },
    /// An explicit list of values, iterated in order.
    Values(Vec<i64>),
    /// A bare iteration count with no explicit values.
    Count(u64),
}

impl ForIteration {
    /// Range with an explicit step; fails on a zero step.
    pub fn range(start: i64, stop: i64, step: i64) -> IrResult<Self> {
        if step == 0 {
            return Err(IrError::ZeroStep);
        }
        Ok(ForIteration::Range { start, stop, step })
    }

    /// The range `0..stop` with step 1.
    pub fn upto(stop: i64) -> Self {
        ForIteration::Range {
            start: 0,
            stop,
            step: 1,
        }
    }
}

/// Non-unitary qubit directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectiveKind {
    /// Reset qubit to |0⟩.
    Reset,
    /// Barrier (synchronization point).
    Barrier,
    /// Delay instruction.
    Delay {
        /// Duration in device-specific units.
        duration: u64,
    },
}

impl DirectiveKind {
    /// Get the name of the directive.
    pub fn name(&self) -> &'static str {
        match self {
            DirectiveKind::Reset => "reset",
            DirectiveKind::Barrier => "barrier",
            DirectiveKind::Delay { .. } => "delay",
        }
    }
}

/// One node of the circuit tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    /// A plain or controlled gate.
    Gate(GateOp),
    /// Measurement of `qubits[k]` into `clbits[k]`.
    Measure {
        /// Measured qubits.
        qubits: Vec<Qubit>,
        /// Target classical bits, same length as `qubits`.
        clbits: Vec<Clbit>,
    },
    /// Conditional block with an optional else branch.
    IfElse {
        /// Branch condition.
        condition: Condition,
        /// Executed when the condition holds.
        then_body: Vec<Operation>,
        /// Executed otherwise.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        else_body: Option<Vec<Operation>>,
    },
    /// Loop re-evaluating its condition before each iteration.
    WhileLoop {
        /// Loop condition.
        condition: Condition,
        /// Loop body.
        body: Vec<Operation>,
    },
    /// Counted or enumerated loop.
    ForLoop {
        /// Iteration source.
        iteration: ForIteration,
        /// Declared loop variable, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        variable: Option<String>,
        /// Loop body.
        body: Vec<Operation>,
    },
    /// Reset, barrier or delay.
    Directive {
        /// Which directive.
        kind: DirectiveKind,
        /// Affected qubits.
        qubits: Vec<Qubit>,
    },
}

impl Operation {
    /// Create a gate operation.
    pub fn gate(gate: impl Into<Gate>, qubits: impl IntoIterator<Item = Qubit>) -> Self {
        Operation::Gate(GateOp {
            gate: gate.into(),
            qubits: qubits.into_iter().collect(),
        })
    }

    /// Create a single-qubit gate operation.
    pub fn single_qubit_gate(gate: StandardGate, qubit: Qubit) -> Self {
        Self::gate(gate, [qubit])
    }

    /// Create a measurement operation.
    ///
    /// Returns an error if the number of qubits and classical bits do not match.
    pub fn measure(
        qubits: impl IntoIterator<Item = Qubit>,
        clbits: impl IntoIterator<Item = Clbit>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let clbits: Vec<_> = clbits.into_iter().collect();
        if qubits.len() != clbits.len() {
            return Err(IrError::MeasureArityMismatch {
                qubits: qubits.len(),
                clbits: clbits.len(),
            });
        }
        Ok(Operation::Measure { qubits, clbits })
    }

    /// Get the name of the operation.
    pub fn name(&self) -> &str {
        match self {
            Operation::Gate(op) => op.gate.name(),
            Operation::Measure { .. } => "measure",
            Operation::IfElse { .. } => "if_else",
            Operation::WhileLoop { .. } => "while_loop",
            Operation::ForLoop { .. } => "for_loop",
            Operation::Directive { kind, .. } => kind.name(),
        }
    }

    /// Check if this operation owns nested bodies.
    pub fn is_control_flow(&self) -> bool {
        matches!(
            self,
            Operation::IfElse { .. } | Operation::WhileLoop { .. } | Operation::ForLoop { .. }
        )
    }

    /// Nested bodies in source order (then before else).
    pub fn bodies(&self) -> Vec<&[Operation]> {
        match self {
            Operation::IfElse {
                then_body,
                else_body,
                ..
            } => {
                let mut bodies = vec![then_body.as_slice()];
                if let Some(else_body) = else_body {
                    bodies.push(else_body.as_slice());
                }
                bodies
            }
            Operation::WhileLoop { body, .. } | Operation::ForLoop { body, .. } => {
                vec![body.as_slice()]
            }
            _ => vec![],
        }
    }

    /// Qubit operands of this node (not of nested bodies).
    pub fn qubits(&self) -> &[Qubit] {
        match self {
            Operation::Gate(op) => &op.qubits,
            Operation::Measure { qubits, .. } | Operation::Directive { qubits, .. } => qubits,
            _ => &[],
        }
    }

    /// Classical operands of this node (not of nested bodies or conditions).
    pub fn clbits(&self) -> &[Clbit] {
        match self {
            Operation::Measure { clbits, .. } => clbits,
            _ => &[],
        }
    }

    /// The condition guarding this node, if any.
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            Operation::IfElse { condition, .. } | Operation::WhileLoop { condition, .. } => {
                Some(condition)
            }
            _ => None,
        }
    }
}

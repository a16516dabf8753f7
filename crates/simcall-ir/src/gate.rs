//! Quantum gate types.
//!
//! Controlled gates are modelled as an explicit "wraps" relation: a
//! [`ControlledGate`] owns the simpler gate it controls, and the standard
//! controlled gates (`cx`, `ccx`, `crz`, ...) report their wrapped base through
//! [`StandardGate::wrapped`]. Code generators resolve a gate to its root by
//! following that relation until it ends.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::parameter::ParameterExpression;

/// Standard gates with known semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StandardGate {
    // Single-qubit Pauli gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,

    // Single-qubit Clifford gates
    /// Hadamard gate.
    H,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// sqrt(X) gate.
    SX,
    /// sqrt(X)-dagger gate.
    SXdg,

    // Single-qubit rotation gates
    /// Rotation around X axis.
    Rx(ParameterExpression),
    /// Rotation around Y axis.
    Ry(ParameterExpression),
    /// Rotation around Z axis.
    Rz(ParameterExpression),
    /// Phase gate.
    P(ParameterExpression),
    /// Universal single-qubit gate U(θ, φ, λ).
    U(
        ParameterExpression,
        ParameterExpression,
        ParameterExpression,
    ),

    // Two-qubit gates
    /// Controlled-X (CNOT) gate.
    CX,
    /// Controlled-Y gate.
    CY,
    /// Controlled-Z gate.
    CZ,
    /// Controlled-Hadamard gate.
    CH,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// Controlled rotation around X.
    CRx(ParameterExpression),
    /// Controlled rotation around Y.
    CRy(ParameterExpression),
    /// Controlled rotation around Z.
    CRz(ParameterExpression),
    /// Controlled phase gate.
    CP(ParameterExpression),
    /// XX rotation gate.
    RXX(ParameterExpression),
    /// YY rotation gate.
    RYY(ParameterExpression),
    /// ZZ rotation gate.
    RZZ(ParameterExpression),

    // Three-qubit gates
    /// Toffoli gate (CCX).
    CCX,
    /// Fredkin gate (CSWAP).
    CSwap,
}

impl StandardGate {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::I => "id",
            StandardGate::X => "x",
            StandardGate::Y => "y",
            StandardGate::Z => "z",
            StandardGate::H => "h",
            StandardGate::S => "s",
            StandardGate::Sdg => "sdg",
            StandardGate::T => "t",
            StandardGate::Tdg => "tdg",
            StandardGate::SX => "sx",
            StandardGate::SXdg => "sxdg",
            StandardGate::Rx(_) => "rx",
            StandardGate::Ry(_) => "ry",
            StandardGate::Rz(_) => "rz",
            StandardGate::P(_) => "p",
            StandardGate::U(_, _, _) => "u",
            StandardGate::CX => "cx",
            StandardGate::CY => "cy",
            StandardGate::CZ => "cz",
            StandardGate::CH => "ch",
            StandardGate::Swap => "swap",
            StandardGate::ISwap => "iswap",
            StandardGate::CRx(_) => "crx",
            StandardGate::CRy(_) => "cry",
            StandardGate::CRz(_) => "crz",
            StandardGate::CP(_) => "cp",
            StandardGate::RXX(_) => "rxx",
            StandardGate::RYY(_) => "ryy",
            StandardGate::RZZ(_) => "rzz",
            StandardGate::CCX => "ccx",
            StandardGate::CSwap => "cswap",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::I
            | StandardGate::X
            | StandardGate::Y
            | StandardGate::Z
            | StandardGate::H
            | StandardGate::S
            | StandardGate::Sdg
            | StandardGate::T
            | StandardGate::Tdg
            | StandardGate::SX
            | StandardGate::SXdg
            | StandardGate::Rx(_)
            | StandardGate::Ry(_)
            | StandardGate::Rz(_)
            | StandardGate::P(_)
            | StandardGate::U(_, _, _) => 1,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::CH
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::CRx(_)
            | StandardGate::CRy(_)
            | StandardGate::CRz(_)
            | StandardGate::CP(_)
            | StandardGate::RXX(_)
            | StandardGate::RYY(_)
            | StandardGate::RZZ(_) => 2,

            StandardGate::CCX | StandardGate::CSwap => 3,
        }
    }

    /// The uncontrolled gate this standard gate wraps, with its control count.
    ///
    /// Returns `None` for gates that are not controlled variants.
    pub fn wrapped(&self) -> Option<(StandardGate, u32)> {
        match self {
            StandardGate::CX => Some((StandardGate::X, 1)),
            StandardGate::CY => Some((StandardGate::Y, 1)),
            StandardGate::CZ => Some((StandardGate::Z, 1)),
            StandardGate::CH => Some((StandardGate::H, 1)),
            StandardGate::CRx(p) => Some((StandardGate::Rx(p.clone()), 1)),
            StandardGate::CRy(p) => Some((StandardGate::Ry(p.clone()), 1)),
            StandardGate::CRz(p) => Some((StandardGate::Rz(p.clone()), 1)),
            StandardGate::CP(p) => Some((StandardGate::P(p.clone()), 1)),
            StandardGate::CCX => Some((StandardGate::X, 2)),
            StandardGate::CSwap => Some((StandardGate::Swap, 1)),
            _ => None,
        }
    }

    /// Check if this gate has symbolic parameters.
    pub fn is_parameterized(&self) -> bool {
        self.parameters().iter().any(|p| p.is_symbolic())
    }

    /// Get parameters of this gate.
    pub fn parameters(&self) -> Vec<&ParameterExpression> {
        match self {
            StandardGate::Rx(p)
            | StandardGate::Ry(p)
            | StandardGate::Rz(p)
            | StandardGate::P(p)
            | StandardGate::CRx(p)
            | StandardGate::CRy(p)
            | StandardGate::CRz(p)
            | StandardGate::CP(p)
            | StandardGate::RXX(p)
            | StandardGate::RYY(p)
            | StandardGate::RZZ(p) => vec![p],

            StandardGate::U(a, b, c) => vec![a, b, c],

            _ => vec![],
        }
    }
}

/// A quantum gate: standard, custom, or a controlled wrapper around another gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A custom user-defined gate.
    Custom(CustomGate),
    /// A gate controlled on extra qubits.
    Controlled(ControlledGate),
}

impl GateKind {
    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(g) => &g.name,
            GateKind::Controlled(g) => &g.name,
        }
    }

    /// Get the number of qubits.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            GateKind::Standard(g) => g.num_qubits(),
            GateKind::Custom(g) => g.num_qubits,
            GateKind::Controlled(g) => g.num_qubits(),
        }
    }
}

/// A user-defined gate, opaque to the IR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomGate {
    /// The name of the gate.
    pub name: String,
    /// The number of qubits it operates on.
    pub num_qubits: u32,
    /// Parameters of the gate.
    #[serde(default)]
    pub params: Vec<ParameterExpression>,
}

impl CustomGate {
    /// Create a new custom gate.
    pub fn new(name: impl Into<String>, num_qubits: u32) -> Self {
        Self {
            name: name.into(),
            num_qubits,
            params: vec![],
        }
    }

    /// Add parameters to the gate.
    #[must_use]
    pub fn with_params(mut self, params: Vec<ParameterExpression>) -> Self {
        self.params = params;
        self
    }
}

/// A gate applied only when its control qubits hold the control state.
///
/// Control operands come first in the operand list, followed by the operands
/// of `base_gate`. Bit *i* of `ctrl_state` (least significant first) is the
/// required value of control *i*; `None` means every control must be 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlledGate {
    /// Display name, e.g. `c3x`.
    pub name: String,
    /// Number of control qubits added by this wrapper.
    pub num_ctrl_qubits: u32,
    /// Required control values, least significant bit first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctrl_state: Option<u64>,
    /// The wrapped gate.
    pub base_gate: Box<Gate>,
}

/// A mask describes at most 64 controls and sets no bit past the last one.
pub(crate) fn check_ctrl_state(ctrl_state: u64, num_ctrl_qubits: u32) -> IrResult<()> {
    if num_ctrl_qubits > u64::BITS {
        return Err(IrError::CtrlStateTooWide { num_ctrl_qubits });
    }
    if ctrl_state.checked_shr(num_ctrl_qubits).unwrap_or(0) != 0 {
        return Err(IrError::InvalidCtrlState {
            ctrl_state,
            num_ctrl_qubits,
        });
    }
    Ok(())
}

impl ControlledGate {
    /// Wrap `base` with `num_ctrl_qubits` controls.
    ///
    /// Fails if `ctrl_state` sets bits beyond the number of controls, or is
    /// given for more than 64 controls.
    pub fn new(
        base: impl Into<Gate>,
        num_ctrl_qubits: u32,
        ctrl_state: Option<u64>,
    ) -> IrResult<Self> {
        let base = base.into();
        if let Some(state) = ctrl_state {
            check_ctrl_state(state, num_ctrl_qubits)?;
        }
        let name = match num_ctrl_qubits {
            1 => format!("c{}", base.name()),
            n => format!("c{n}{}", base.name()),
        };
        Ok(Self {
            name,
            num_ctrl_qubits,
            ctrl_state,
            base_gate: Box::new(base),
        })
    }

    /// Override the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Total number of qubits, controls included.
    pub fn num_qubits(&self) -> u32 {
        self.num_ctrl_qubits + self.base_gate.num_qubits()
    }
}

/// A gate with associated metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Optional label for the gate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Gate {
    /// Create a new gate from a standard gate.
    pub fn standard(gate: StandardGate) -> Self {
        Self {
            kind: GateKind::Standard(gate),
            label: None,
        }
    }

    /// Create a new gate from a custom gate.
    pub fn custom(gate: CustomGate) -> Self {
        Self {
            kind: GateKind::Custom(gate),
            label: None,
        }
    }

    /// Create a new gate from a controlled wrapper.
    pub fn controlled(gate: ControlledGate) -> Self {
        Self {
            kind: GateKind::Controlled(gate),
            label: None,
        }
    }

    /// Add `num_ctrl_qubits` controls in front of this gate.
    pub fn control(self, num_ctrl_qubits: u32, ctrl_state: Option<u64>) -> IrResult<Gate> {
        Ok(Gate::controlled(ControlledGate::new(
            self,
            num_ctrl_qubits,
            ctrl_state,
        )?))
    }

    /// Add a label to the gate.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> u32 {
        self.kind.num_qubits()
    }

    /// Parameters in declaration order; controlled gates report their base's.
    pub fn params(&self) -> Vec<&ParameterExpression> {
        match &self.kind {
            GateKind::Standard(g) => g.parameters(),
            GateKind::Custom(g) => g.params.iter().collect(),
            GateKind::Controlled(g) => g.base_gate.params(),
        }
    }
}

impl From<StandardGate> for Gate {
    fn from(gate: StandardGate) -> Self {
        Gate::standard(gate)
    }
}

impl From<CustomGate> for Gate {
    fn from(gate: CustomGate) -> Self {
        Gate::custom(gate)
    }
}

impl From<ControlledGate> for Gate {
    fn from(gate: ControlledGate) -> Self {
        Gate::controlled(gate)
    }
}

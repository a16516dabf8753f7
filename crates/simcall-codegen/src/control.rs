//! Splitting gate operands into targets and polarized controls.
//!
//! The primary path follows the explicit wraps relation: every
//! [`ControlledGate`](simcall_ir::ControlledGate) contributes its controls
//! (outermost wrapper first, matching operand order), and standard controlled
//! gates contribute the controls reported by [`StandardGate::wrapped`].
//!
//! Custom gates carry no such relation. For those, a name such as `c3x` or
//! `mcx` is stripped by regular expression as a best-effort fallback; the
//! fallback only fires when the remainder names a known standard gate, since
//! plenty of ordinary names happen to start with `c`.

use std::sync::LazyLock;

use regex::Regex;
use simcall_ir::{Gate, GateKind, ParameterExpression, StandardGate};

static CONTROL_PREFIX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^(?:mc|c[0-9]+|c+)(?P<base>[a-z].*)$").ok());

/// A gate resolved to its root name and per-control polarity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSpec {
    /// Name of the innermost, uncontrolled gate.
    pub base_name: String,
    /// Polarity of each control in operand order; `true` means positive.
    pub polarity: Vec<bool>,
}

impl ControlSpec {
    /// Number of control operands.
    pub fn num_controls(&self) -> usize {
        self.polarity.len()
    }

    /// Resolve `gate`, applied to `num_operands` qubits.
    pub fn resolve(gate: &Gate, num_operands: usize) -> Self {
        let mut polarity = Vec::new();
        let mut current = gate;
        let base_name = loop {
            match &current.kind {
                GateKind::Controlled(ctrl) => {
                    polarity.extend((0..ctrl.num_ctrl_qubits).map(|i| match ctrl.ctrl_state {
                        Some(state) => state.checked_shr(i).unwrap_or(0) & 1 == 1,
                        None => true,
                    }));
                    current = &ctrl.base_gate;
                }
                GateKind::Standard(std) => {
                    let mut root = std.clone();
                    while let Some((base, n)) = root.wrapped() {
                        polarity.extend(std::iter::repeat_n(true, n as usize));
                        root = base;
                    }
                    break root.name().to_string();
                }
                GateKind::Custom(custom) => {
                    if polarity.is_empty() {
                        if let Some(spec) = strip_control_prefix(&custom.name, num_operands) {
                            return spec;
                        }
                    }
                    break custom.name.clone();
                }
            }
        };
        Self {
            base_name,
            polarity,
        }
    }
}

/// Best-effort decomposition of a custom gate name like `ccx` or `c3sx`.
fn strip_control_prefix(name: &str, num_operands: usize) -> Option<ControlSpec> {
    if num_operands < 2 {
        return None;
    }
    let regex = CONTROL_PREFIX.as_ref()?;
    let base = regex.captures(name)?.name("base")?.as_str();
    let arity = base_arity(base)?;
    if num_operands <= arity {
        return None;
    }
    Some(ControlSpec {
        base_name: base.to_string(),
        polarity: vec![true; num_operands - arity],
    })
}

/// Operand count of the standard gate named `name`.
fn base_arity(name: &str) -> Option<usize> {
    let zero = || ParameterExpression::constant(0.0);
    let gate = match name {
        "id" => StandardGate::I,
        "x" => StandardGate::X,
        "y" => StandardGate::Y,
        "z" => StandardGate::Z,
        "h" => StandardGate::H,
        "s" => StandardGate::S,
        "sdg" => StandardGate::Sdg,
        "t" => StandardGate::T,
        "tdg" => StandardGate::Tdg,
        "sx" => StandardGate::SX,
        "sxdg" => StandardGate::SXdg,
        "rx" => StandardGate::Rx(zero()),
        "ry" => StandardGate::Ry(zero()),
        "rz" => StandardGate::Rz(zero()),
        "p" => StandardGate::P(zero()),
        "u" => StandardGate::U(zero(), zero(), zero()),
        "swap" => StandardGate::Swap,
        "iswap" => StandardGate::ISwap,
        "rxx" => StandardGate::RXX(zero()),
        "ryy" => StandardGate::RYY(zero()),
        "rzz" => StandardGate::RZZ(zero()),
        _ => return None,
    };
    Some(gate.num_qubits() as usize)
}

/// A gate's operand indices split by role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    /// Name of the root gate.
    pub base_name: String,
    /// Operands of the root gate.
    pub targets: Vec<usize>,
    /// Controls that fire on 1.
    pub positive_controls: Vec<usize>,
    /// Controls that fire on 0.
    pub negative_controls: Vec<usize>,
}

/// Split `operands` (already numbered) for `gate`.
///
/// Controls are the leading operands, targets the rest.
pub fn decompose(gate: &Gate, operands: &[usize]) -> Decomposition {
    let spec = ControlSpec::resolve(gate, operands.len());
    let (controls, targets) = operands.split_at(spec.num_controls().min(operands.len()));

    let mut positive_controls = Vec::new();
    let mut negative_controls = Vec::new();
    for (&operand, &positive) in controls.iter().zip(&spec.polarity) {
        if positive {
            positive_controls.push(operand);
        } else {
            negative_controls.push(operand);
        }
    }

    Decomposition {
        base_name: spec.base_name,
        targets: targets.to_vec(),
        positive_controls,
        negative_controls,
    }
}

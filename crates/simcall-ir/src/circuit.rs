//! Circuit container and builder API.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind, StandardGate, check_ctrl_state};
use crate::operation::{Condition, ConditionTarget, DirectiveKind, ForIteration, Operation};
use crate::parameter::ParameterExpression;
use crate::qubit::{ClassicalRegister, Clbit, QuantumRegister, Qubit};

/// A quantum circuit: declared registers plus an ordered operation tree.
///
/// Registers keep their declaration order. Operations appended through
/// [`CircuitBuilder::append`] are validated against the declared registers,
/// including every operation nested inside control-flow bodies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Quantum registers in declaration order.
    #[serde(default)]
    qregs: Vec<QuantumRegister>,
    /// Classical registers in declaration order.
    #[serde(default)]
    cregs: Vec<ClassicalRegister>,
    /// Top-level operations.
    #[serde(default)]
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: vec![],
            cregs: vec![],
            operations: vec![],
        }
    }

    /// Create a circuit with one quantum register `q` and one classical register `c`.
    ///
    /// Empty registers are not declared.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        if num_qubits > 0 {
            circuit.qregs.push(QuantumRegister::new("q", num_qubits));
        }
        if num_clbits > 0 {
            circuit.cregs.push(ClassicalRegister::new("c", num_clbits));
        }
        circuit
    }

    /// Declare a quantum register and return its qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<Qubit>> {
        let name = name.into();
        if self.qreg(&name).is_some() {
            return Err(IrError::DuplicateRegister(name));
        }
        let reg = QuantumRegister::new(name, size);
        let bits = reg.bits().collect();
        self.qregs.push(reg);
        Ok(bits)
    }

    /// Declare a classical register and return its bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<Vec<Clbit>> {
        let name = name.into();
        if self.creg(&name).is_some() {
            return Err(IrError::DuplicateRegister(name));
        }
        let reg = ClassicalRegister::new(name, size);
        let bits = reg.bits().collect();
        self.cregs.push(reg);
        Ok(bits)
    }

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qregs.iter().find(|r| r.name == name)
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.cregs.iter().find(|r| r.name == name)
    }

    /// Top-level operations in declaration order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Number of declared qubits.
    pub fn num_qubits(&self) -> usize {
        self.qregs.iter().map(|r| r.size as usize).sum()
    }

    /// Number of declared classical bits.
    pub fn num_clbits(&self) -> usize {
        self.cregs.iter().map(|r| r.size as usize).sum()
    }

    /// Number of operations, counting nested bodies and control-flow nodes.
    pub fn num_ops(&self) -> usize {
        fn count(ops: &[Operation]) -> usize {
            ops.iter()
                .map(|op| 1 + op.bodies().into_iter().map(count).sum::<usize>())
                .sum()
        }
        count(&self.operations)
    }

    /// Maximum control-flow nesting depth (0 for a flat circuit).
    pub fn nesting_depth(&self) -> usize {
        fn depth(ops: &[Operation]) -> usize {
            ops.iter()
                .filter(|op| op.is_control_flow())
                .map(|op| 1 + op.bodies().into_iter().map(depth).max().unwrap_or(0))
                .max()
                .unwrap_or(0)
        }
        depth(&self.operations)
    }

    /// Check that `qubit` belongs to a declared register.
    pub fn contains_qubit(&self, qubit: &Qubit) -> bool {
        self.qregs.iter().any(|r| r.contains(qubit))
    }

    /// Check that `clbit` belongs to a declared register.
    pub fn contains_clbit(&self, clbit: &Clbit) -> bool {
        self.cregs.iter().any(|r| r.contains(clbit))
    }

    /// Validate the whole operation tree against the declared registers.
    pub fn validate(&self) -> IrResult<()> {
        self.operations
            .iter()
            .try_for_each(|op| self.validate_operation(op))
    }

    fn validate_operation(&self, op: &Operation) -> IrResult<()> {
        match op {
            Operation::Gate(gate_op) => {
                let gate_name = gate_op.gate.name();
                self.check_qubits(&gate_op.qubits, Some(gate_name))?;
                let expected = gate_op.gate.num_qubits();
                let got = u32::try_from(gate_op.qubits.len()).unwrap_or(u32::MAX);
                if expected != got {
                    return Err(IrError::QubitCountMismatch {
                        gate_name: gate_name.to_string(),
                        expected,
                        got,
                    });
                }
                check_ctrl_states(&gate_op.gate)
            }
            Operation::Measure { qubits, clbits } => {
                if qubits.len() != clbits.len() {
                    return Err(IrError::MeasureArityMismatch {
                        qubits: qubits.len(),
                        clbits: clbits.len(),
                    });
                }
                self.check_qubits(qubits, None)?;
                self.check_clbits(clbits)
            }
            Operation::IfElse { condition, .. } | Operation::WhileLoop { condition, .. } => {
                self.check_condition(condition)?;
                self.validate_bodies(op)
            }
            Operation::ForLoop { iteration, .. } => {
                if matches!(iteration, ForIteration::Range { step: 0, .. }) {
                    return Err(IrError::ZeroStep);
                }
                self.validate_bodies(op)
            }
            Operation::Directive { qubits, kind } => {
                self.check_qubits(qubits, Some(kind.name()))
            }
        }
    }

    fn validate_bodies(&self, op: &Operation) -> IrResult<()> {
        op.bodies()
            .into_iter()
            .flatten()
            .try_for_each(|nested| self.validate_operation(nested))
    }

    fn check_qubits(&self, qubits: &[Qubit], gate_name: Option<&str>) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for qubit in qubits {
            if !self.contains_qubit(qubit) {
                return Err(IrError::QubitNotFound {
                    qubit: qubit.clone(),
                    gate_name: gate_name.map(String::from),
                });
            }
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit: qubit.clone(),
                    gate_name: gate_name.map(String::from),
                });
            }
        }
        Ok(())
    }

    fn check_clbits(&self, clbits: &[Clbit]) -> IrResult<()> {
        match clbits.iter().find(|c| !self.contains_clbit(c)) {
            Some(clbit) => Err(IrError::ClbitNotFound {
                clbit: clbit.clone(),
                gate_name: None,
            }),
            None => Ok(()),
        }
    }

    fn check_condition(&self, condition: &Condition) -> IrResult<()> {
        match &condition.target {
            ConditionTarget::Bit(clbit) => self.check_clbits(std::slice::from_ref(clbit)),
            ConditionTarget::Register(name) => match self.creg(name) {
                Some(_) => Ok(()),
                None => Err(IrError::RegisterNotFound(name.clone())),
            },
        }
    }

    /// Serialize the circuit as pretty-printed JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load a circuit from JSON and validate it.
    pub fn from_json(source: &str) -> IrResult<Self> {
        let circuit: Circuit = serde_json::from_str(source)?;
        circuit.validate()?;
        Ok(circuit)
    }
}

fn check_ctrl_states(gate: &Gate) -> IrResult<()> {
    let mut current = gate;
    while let GateKind::Controlled(ctrl) = &current.kind {
        if let Some(state) = ctrl.ctrl_state {
            check_ctrl_state(state, ctrl.num_ctrl_qubits)?;
        }
        current = &ctrl.base_gate;
    }
    Ok(())
}

/// A nested operation sequence under construction (an if/else or loop body).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    operations: Vec<Operation>,
}

impl Block {
    /// Create an empty block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Operations collected so far.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consume the block, returning its operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }
}

/// Builder methods shared by [`Circuit`] and nested [`Block`]s.
///
/// Control-flow methods take closures that fill the nested body:
///
/// ```rust
/// use simcall_ir::{Circuit, CircuitBuilder, Condition};
///
/// let mut circuit = Circuit::new("feedback");
/// let q = circuit.add_qreg("q", 1).unwrap();
/// let c = circuit.add_creg("c", 1).unwrap();
///
/// circuit.x(&q[0]).unwrap();
/// circuit
///     .if_test(Condition::bit(c[0].clone(), 1), |body| {
///         body.x(&q[0])?;
///         Ok(())
///     })
///     .unwrap();
/// circuit.measure(&q[0], &c[0]).unwrap();
/// assert_eq!(circuit.num_ops(), 4);
/// ```
pub trait CircuitBuilder {
    /// Append an operation.
    fn append(&mut self, op: Operation) -> IrResult<&mut Self>;

    // =========================================================================
    // Single-qubit gates
    // =========================================================================

    /// Apply Hadamard gate.
    fn h(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::H, qubit.clone()))
    }

    /// Apply Pauli-X gate.
    fn x(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::X, qubit.clone()))
    }

    /// Apply Pauli-Y gate.
    fn y(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::Y, qubit.clone()))
    }

    /// Apply Pauli-Z gate.
    fn z(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::Z, qubit.clone()))
    }

    /// Apply S gate.
    fn s(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::S, qubit.clone()))
    }

    /// Apply S-dagger gate.
    fn sdg(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::Sdg, qubit.clone()))
    }

    /// Apply T gate.
    fn t(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::T, qubit.clone()))
    }

    /// Apply T-dagger gate.
    fn tdg(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::Tdg, qubit.clone()))
    }

    /// Apply sqrt(X) gate.
    fn sx(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(StandardGate::SX, qubit.clone()))
    }

    /// Apply Rx rotation gate.
    fn rx(&mut self, theta: impl Into<ParameterExpression>, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(
            StandardGate::Rx(theta.into()),
            qubit.clone(),
        ))
    }

    /// Apply Ry rotation gate.
    fn ry(&mut self, theta: impl Into<ParameterExpression>, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(
            StandardGate::Ry(theta.into()),
            qubit.clone(),
        ))
    }

    /// Apply Rz rotation gate.
    fn rz(&mut self, theta: impl Into<ParameterExpression>, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(
            StandardGate::Rz(theta.into()),
            qubit.clone(),
        ))
    }

    /// Apply phase gate.
    fn p(&mut self, theta: impl Into<ParameterExpression>, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(
            StandardGate::P(theta.into()),
            qubit.clone(),
        ))
    }

    /// Apply universal U gate.
    fn u(
        &mut self,
        theta: impl Into<ParameterExpression>,
        phi: impl Into<ParameterExpression>,
        lambda: impl Into<ParameterExpression>,
        qubit: &Qubit,
    ) -> IrResult<&mut Self> {
        self.append(Operation::single_qubit_gate(
            StandardGate::U(theta.into(), phi.into(), lambda.into()),
            qubit.clone(),
        ))
    }

    // =========================================================================
    // Multi-qubit gates
    // =========================================================================

    /// Apply CNOT (CX) gate.
    fn cx(&mut self, control: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CX,
            [control.clone(), target.clone()],
        ))
    }

    /// Apply CY gate.
    fn cy(&mut self, control: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CY,
            [control.clone(), target.clone()],
        ))
    }

    /// Apply CZ gate.
    fn cz(&mut self, control: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CZ,
            [control.clone(), target.clone()],
        ))
    }

    /// Apply controlled-Hadamard gate.
    fn ch(&mut self, control: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CH,
            [control.clone(), target.clone()],
        ))
    }

    /// Apply SWAP gate.
    fn swap(&mut self, q1: &Qubit, q2: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(StandardGate::Swap, [q1.clone(), q2.clone()]))
    }

    /// Apply controlled-Rx gate.
    fn crx(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: &Qubit,
        target: &Qubit,
    ) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CRx(theta.into()),
            [control.clone(), target.clone()],
        ))
    }

    /// Apply controlled-Ry gate.
    fn cry(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: &Qubit,
        target: &Qubit,
    ) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CRy(theta.into()),
            [control.clone(), target.clone()],
        ))
    }

    /// Apply controlled-Rz gate.
    fn crz(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: &Qubit,
        target: &Qubit,
    ) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CRz(theta.into()),
            [control.clone(), target.clone()],
        ))
    }

    /// Apply controlled-phase gate.
    fn cp(
        &mut self,
        theta: impl Into<ParameterExpression>,
        control: &Qubit,
        target: &Qubit,
    ) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CP(theta.into()),
            [control.clone(), target.clone()],
        ))
    }

    /// Apply Toffoli (CCX) gate.
    fn ccx(&mut self, c1: &Qubit, c2: &Qubit, target: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CCX,
            [c1.clone(), c2.clone(), target.clone()],
        ))
    }

    /// Apply Fredkin (CSWAP) gate.
    fn cswap(&mut self, control: &Qubit, q1: &Qubit, q2: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::gate(
            StandardGate::CSwap,
            [control.clone(), q1.clone(), q2.clone()],
        ))
    }

    /// Apply an X gate controlled on every qubit in `controls`.
    fn mcx(&mut self, controls: &[Qubit], target: &Qubit) -> IrResult<&mut Self> {
        let num_ctrl = u32::try_from(controls.len()).unwrap_or(u32::MAX);
        let gate = Gate::standard(StandardGate::X)
            .control(num_ctrl, None)?
            .with_label("mcx");
        let qubits = controls.iter().chain(std::iter::once(target)).cloned();
        self.append(Operation::gate(gate, qubits))
    }

    /// Apply `gate` with `num_ctrl` extra controls, placed first in `qubits`.
    fn control(
        &mut self,
        gate: impl Into<Gate>,
        num_ctrl: u32,
        ctrl_state: Option<u64>,
        qubits: &[Qubit],
    ) -> IrResult<&mut Self> {
        let gate = gate.into().control(num_ctrl, ctrl_state)?;
        self.append(Operation::gate(gate, qubits.iter().cloned()))
    }

    // =========================================================================
    // Measurement and directives
    // =========================================================================

    /// Measure one qubit into one classical bit.
    fn measure(&mut self, qubit: &Qubit, clbit: &Clbit) -> IrResult<&mut Self> {
        self.append(Operation::measure([qubit.clone()], [clbit.clone()])?)
    }

    /// Measure `qubits[k]` into `clbits[k]` as a single operation.
    fn measure_many(&mut self, qubits: &[Qubit], clbits: &[Clbit]) -> IrResult<&mut Self> {
        self.append(Operation::measure(
            qubits.iter().cloned(),
            clbits.iter().cloned(),
        )?)
    }

    /// Reset a qubit.
    fn reset(&mut self, qubit: &Qubit) -> IrResult<&mut Self> {
        self.append(Operation::Directive {
            kind: DirectiveKind::Reset,
            qubits: vec![qubit.clone()],
        })
    }

    /// Insert a barrier.
    fn barrier(&mut self, qubits: &[Qubit]) -> IrResult<&mut Self> {
        self.append(Operation::Directive {
            kind: DirectiveKind::Barrier,
            qubits: qubits.to_vec(),
        })
    }

    // =========================================================================
    // Control flow
    // =========================================================================

    /// Conditional block without an else branch.
    fn if_test(
        &mut self,
        condition: Condition,
        then: impl FnOnce(&mut Block) -> IrResult<()>,
    ) -> IrResult<&mut Self> {
        let mut then_block = Block::new();
        then(&mut then_block)?;
        self.append(Operation::IfElse {
            condition,
            then_body: then_block.into_operations(),
            else_body: None,
        })
    }

    /// Conditional block with both branches.
    fn if_else(
        &mut self,
        condition: Condition,
        then: impl FnOnce(&mut Block) -> IrResult<()>,
        otherwise: impl FnOnce(&mut Block) -> IrResult<()>,
    ) -> IrResult<&mut Self> {
        let mut then_block = Block::new();
        then(&mut then_block)?;
        let mut else_block = Block::new();
        otherwise(&mut else_block)?;
        self.append(Operation::IfElse {
            condition,
            then_body: then_block.into_operations(),
            else_body: Some(else_block.into_operations()),
        })
    }

    /// Loop while `condition` holds.
    fn while_loop(
        &mut self,
        condition: Condition,
        body: impl FnOnce(&mut Block) -> IrResult<()>,
    ) -> IrResult<&mut Self> {
        let mut block = Block::new();
        body(&mut block)?;
        self.append(Operation::WhileLoop {
            condition,
            body: block.into_operations(),
        })
    }

    /// Loop over `iteration`, optionally binding `variable`.
    fn for_loop(
        &mut self,
        iteration: ForIteration,
        variable: Option<&str>,
        body: impl FnOnce(&mut Block) -> IrResult<()>,
    ) -> IrResult<&mut Self> {
        let mut block = Block::new();
        body(&mut block)?;
        self.append(Operation::ForLoop {
            iteration,
            variable: variable.map(String::from),
            body: block.into_operations(),
        })
    }
}

impl CircuitBuilder for Circuit {
    fn append(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.validate_operation(&op)?;
        self.operations.push(op);
        Ok(self)
    }
}

impl CircuitBuilder for Block {
    /// Blocks cannot see the registers; validation happens when the
    /// enclosing control-flow operation reaches the circuit.
    fn append(&mut self, op: Operation) -> IrResult<&mut Self> {
        self.operations.push(op);
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::CustomGate;

    fn one_one() -> (Circuit, Vec<Qubit>, Vec<Clbit>) {
        let mut circuit = Circuit::new("test");
        let q = circuit.add_qreg("q", 1).unwrap();
        let c = circuit.add_creg("c", 1).unwrap();
        (circuit, q, c)
    }

    #[test]
    fn test_register_order() {
        let mut circuit = Circuit::new("regs");
        circuit.add_qreg("a", 2).unwrap();
        circuit.add_qreg("b", 3).unwrap();
        circuit.add_creg("c", 4).unwrap();

        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_clbits(), 4);
        let names: Vec<_> = circuit.qregs().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_duplicate_register() {
        let mut circuit = Circuit::new("dup");
        circuit.add_qreg("q", 2).unwrap();
        assert!(matches!(
            circuit.add_qreg("q", 1),
            Err(IrError::DuplicateRegister(_))
        ));
    }

    #[test]
    fn test_with_size() {
        let circuit = Circuit::with_size("sized", 3, 0);
        assert_eq!(circuit.num_qubits(), 3);
        assert!(circuit.cregs().is_empty());
    }

    #[test]
    fn test_undeclared_qubit_rejected() {
        let (mut circuit, _, _) = one_one();
        let result = circuit.x(&Qubit::new("q", 1));
        assert!(matches!(result, Err(IrError::QubitNotFound { .. })));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_nested_validation() {
        let (mut circuit, q, c) = one_one();
        let stray = Qubit::new("ghost", 0);
        let result = circuit.if_test(Condition::bit(c[0].clone(), 1), |body| {
            body.x(&q[0])?;
            body.h(&stray)?;
            Ok(())
        });
        assert!(matches!(result, Err(IrError::QubitNotFound { .. })));
    }

    #[test]
    fn test_duplicate_qubit_rejected() {
        let mut circuit = Circuit::new("dup");
        let q = circuit.add_qreg("q", 2).unwrap();
        assert!(matches!(
            circuit.cx(&q[0], &q[0]),
            Err(IrError::DuplicateQubit { .. })
        ));
    }

    #[test]
    fn test_qubit_count_checked() {
        let mut circuit = Circuit::new("count");
        let q = circuit.add_qreg("q", 3).unwrap();
        let result = circuit.append(Operation::gate(CustomGate::new("foo", 2), q.clone()));
        assert!(matches!(result, Err(IrError::QubitCountMismatch { .. })));
    }

    #[test]
    fn test_wide_ctrl_state_rejected_on_append() {
        let mut circuit = Circuit::new("wide");
        let q = circuit.add_qreg("q", 71).unwrap();
        let gate = Gate::controlled(crate::gate::ControlledGate {
            name: "c70x".into(),
            num_ctrl_qubits: 70,
            ctrl_state: Some(1),
            base_gate: Box::new(Gate::standard(StandardGate::X)),
        });
        let result = circuit.append(Operation::gate(gate, q));
        assert!(matches!(result, Err(IrError::CtrlStateTooWide { num_ctrl_qubits: 70 })));
    }

    #[test]
    fn test_unknown_condition_register() {
        let (mut circuit, q, _) = one_one();
        let result = circuit.while_loop(Condition::register("flags", 0), |body| {
            body.x(&q[0])?;
            Ok(())
        });
        assert!(matches!(result, Err(IrError::RegisterNotFound(_))));
    }

    #[test]
    fn test_control_flow_counts() {
        let (mut circuit, q, c) = one_one();
        circuit
            .while_loop(Condition::bit(c[0].clone(), 0), |w| {
                w.for_loop(ForIteration::upto(2), None, |f| {
                    f.if_test(Condition::bit(c[0].clone(), 1), |i| {
                        i.x(&q[0])?;
                        Ok(())
                    })?;
                    Ok(())
                })?;
                Ok(())
            })
            .unwrap();
        assert_eq!(circuit.num_ops(), 4);
        assert_eq!(circuit.nesting_depth(), 3);
    }

    #[test]
    fn test_mcx() {
        let mut circuit = Circuit::new("mcx");
        let q = circuit.add_qreg("q", 4).unwrap();
        circuit.mcx(&q[1..], &q[0]).unwrap();
        let Operation::Gate(op) = &circuit.operations()[0] else {
            panic!("expected gate");
        };
        assert_eq!(op.gate.num_qubits(), 4);
        assert_eq!(op.qubits.last(), Some(&q[0]));
    }

    #[test]
    fn test_json_roundtrip_validates() {
        let (mut circuit, q, c) = one_one();
        circuit.x(&q[0]).unwrap();
        circuit.measure(&q[0], &c[0]).unwrap();
        let json = circuit.to_json().unwrap();
        let loaded = Circuit::from_json(&json).unwrap();
        assert_eq!(loaded, circuit);

        let broken = json.replace("\"size\": 1", "\"size\": 0");
        assert!(Circuit::from_json(&broken).is_err());
    }

    #[test]
    fn test_json_rejects_wrong_shape() {
        assert!(matches!(
            Circuit::from_json(r#"{"circuit": "bell"}"#),
            Err(IrError::Json(_))
        ));
    }
}

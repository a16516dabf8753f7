//! AST-to-Circuit lowering for QASM3.

use rustc_hash::FxHashMap;
use simcall_ir::{
    Circuit, CircuitBuilder, Clbit, Condition, ConditionTarget, CustomGate, DirectiveKind,
    ForIteration, Gate, Operation, ParameterExpression, Qubit, StandardGate,
};

use crate::ast::{
    BinOp, Directive, Expression, GateCall, Iterable, MathConstant, Modifier, Operand, Program,
    RegisterKind, Selection, Statement, UnaryOp,
};
use crate::error::{ParseError, ParseResult};

/// Lower an AST Program to a Circuit.
pub(crate) fn lower_to_circuit(program: &Program) -> ParseResult<Circuit> {
    let mut circuit = Circuit::new("qasm_circuit");
    let mut lowerer = Lowerer::default();

    // Registers first, numbered in declaration order.
    for stmt in &program.statements {
        if let Statement::Declare { kind, name, size } = stmt {
            lowerer.declare(name)?;
            match kind {
                RegisterKind::Quantum => {
                    let qubits = circuit.add_qreg(name.as_str(), *size)?;
                    lowerer.all_qubits.extend(qubits);
                    lowerer.qregs.insert(name.clone(), *size);
                }
                RegisterKind::Classical => {
                    circuit.add_creg(name.as_str(), *size)?;
                    lowerer.cregs.insert(name.clone(), *size);
                }
            }
        }
    }

    for stmt in &program.statements {
        if matches!(stmt, Statement::Declare { .. }) {
            continue;
        }
        for op in lowerer.lower_statement(stmt)? {
            circuit.append(op)?;
        }
    }

    Ok(circuit)
}

/// Register sizes seen during the declaration pass.
#[derive(Default)]
struct Lowerer {
    qregs: FxHashMap<String, u32>,
    cregs: FxHashMap<String, u32>,
    /// Every declared qubit, in declaration order.
    all_qubits: Vec<Qubit>,
}

impl Lowerer {
    fn declare(&self, name: &str) -> ParseResult<()> {
        if self.qregs.contains_key(name) || self.cregs.contains_key(name) {
            return Err(ParseError::DuplicateRegister(name.to_string()));
        }
        Ok(())
    }

    fn lower_body(&self, stmts: &[Statement]) -> ParseResult<Vec<Operation>> {
        let mut ops = Vec::new();
        for stmt in stmts {
            ops.extend(self.lower_statement(stmt)?);
        }
        Ok(ops)
    }

    fn lower_statement(&self, stmt: &Statement) -> ParseResult<Vec<Operation>> {
        match stmt {
            Statement::Include(_) => Ok(vec![]),

            Statement::Declare { name, .. } => Err(ParseError::Unsupported(format!(
                "declaration of '{name}' inside a block"
            ))),

            Statement::Gate(call) => self.lower_gate_call(call),

            Statement::Measure { qubits, bits } => {
                if bits.is_empty() {
                    return Err(ParseError::Unsupported(
                        "measure without a classical target".into(),
                    ));
                }
                let qubits = self.resolve_qubits(qubits)?;
                let clbits = self.resolve_clbits(bits)?;
                Ok(vec![Operation::measure(qubits, clbits)?])
            }

            Statement::Directive { kind, qubits } => {
                let (kind, qubits) = match kind {
                    Directive::Reset => (DirectiveKind::Reset, self.resolve_qubits(qubits)?),
                    Directive::Barrier if qubits.is_empty() => {
                        (DirectiveKind::Barrier, self.all_qubits.clone())
                    }
                    Directive::Barrier => (DirectiveKind::Barrier, self.resolve_qubits(qubits)?),
                    Directive::Delay(duration) => {
                        let duration = duration
                            .eval_int()
                            .and_then(|d| u64::try_from(d).ok())
                            .ok_or_else(|| {
                                ParseError::Unsupported(
                                    "delay with a non-constant duration".into(),
                                )
                            })?;
                        (
                            DirectiveKind::Delay { duration },
                            self.resolve_qubits(qubits)?,
                        )
                    }
                };
                Ok(vec![Operation::Directive { kind, qubits }])
            }

            Statement::If {
                condition,
                then_body,
                else_body,
            } => Ok(vec![Operation::IfElse {
                condition: self.lower_condition(condition)?,
                then_body: self.lower_body(then_body)?,
                else_body: else_body
                    .as_deref()
                    .map(|body| self.lower_body(body))
                    .transpose()?,
            }]),

            Statement::While { condition, body } => Ok(vec![Operation::WhileLoop {
                condition: self.lower_condition(condition)?,
                body: self.lower_body(body)?,
            }]),

            Statement::For {
                variable,
                iterable,
                body,
            } => Ok(vec![Operation::ForLoop {
                iteration: lower_iteration(iterable)?,
                variable: Some(variable.clone()),
                body: self.lower_body(body)?,
            }]),
        }
    }

    fn lower_gate_call(&self, call: &GateCall) -> ParseResult<Vec<Operation>> {
        let qubits = self.resolve_qubits(&call.qubits)?;
        let params: Vec<_> = call
            .params
            .iter()
            .map(expr_to_param)
            .collect::<ParseResult<_>>()?;

        let name = call.name.to_lowercase();
        let num_ctrls: u32 = call.modifiers.iter().map(Modifier::num_controls).sum();

        let base: Gate = match standard_gate(&name, &params)? {
            Some(gate) => gate.into(),
            None => {
                let operands = u32::try_from(qubits.len()).unwrap_or(u32::MAX);
                if operands <= num_ctrls {
                    return Err(ParseError::OperandCount {
                        gate: call.name.clone(),
                        expected: num_ctrls as usize + 1,
                        got: qubits.len(),
                    });
                }
                CustomGate::new(call.name.as_str(), operands - num_ctrls)
                    .with_params(params)
                    .into()
            }
        };

        // A plain single-qubit gate applies to each operand in turn.
        if call.modifiers.is_empty() && base.num_qubits() == 1 && qubits.len() > 1 {
            return Ok(qubits
                .into_iter()
                .map(|q| Operation::gate(base.clone(), [q]))
                .collect());
        }

        let mut gate = base;
        for modifier in call.modifiers.iter().rev() {
            gate = match modifier {
                Modifier::Ctrl(n) => gate.control(*n, None)?,
                Modifier::NegCtrl(n) => gate.control(*n, Some(0))?,
                Modifier::Inv => {
                    return Err(ParseError::Unsupported("inv @ modifier".into()));
                }
                Modifier::Pow(_) => {
                    return Err(ParseError::Unsupported("pow @ modifier".into()));
                }
            };
        }

        check_qubit_count(&call.name, &qubits, gate.num_qubits() as usize)?;
        Ok(vec![Operation::gate(gate, qubits)])
    }

    fn lower_condition(&self, expr: &Expression) -> ParseResult<Condition> {
        let unsupported = || ParseError::Unsupported(format!("condition {expr:?}"));

        match expr {
            Expression::Binary {
                op: BinOp::Eq,
                left,
                right,
            } => {
                let (target, value) = match self.condition_target(left)? {
                    Some(target) => (target, right),
                    None => (
                        self.condition_target(right)?.ok_or_else(unsupported)?,
                        left,
                    ),
                };
                let value = condition_value(value).ok_or_else(unsupported)?;
                Ok(Condition { target, value })
            }
            Expression::Unary {
                op: UnaryOp::Not,
                operand,
            } => match self.condition_target(operand)? {
                Some(ConditionTarget::Bit(clbit)) => Ok(Condition::bit(clbit, 0)),
                _ => Err(unsupported()),
            },
            _ => match self.condition_target(expr)? {
                Some(ConditionTarget::Bit(clbit)) => Ok(Condition::bit(clbit, 1)),
                Some(ConditionTarget::Register(name)) if self.cregs.get(&name) == Some(&1) => {
                    Ok(Condition::register(name, 1))
                }
                _ => Err(unsupported()),
            },
        }
    }

    /// The classical bit or register an expression reads, if it reads one.
    fn condition_target(&self, expr: &Expression) -> ParseResult<Option<ConditionTarget>> {
        match expr {
            Expression::Ident(name) if self.cregs.contains_key(name) => {
                Ok(Some(ConditionTarget::Register(name.clone())))
            }
            Expression::Index { register, index } => {
                let Some(index) = index.eval_int().and_then(|i| u32::try_from(i).ok()) else {
                    return Ok(None);
                };
                let clbit = self.resolve_clbits(&[Operand::bit(register.as_str(), index)])?;
                Ok(clbit.into_iter().next().map(ConditionTarget::Bit))
            }
            _ => Ok(None),
        }
    }

    fn resolve_qubits(&self, operands: &[Operand]) -> ParseResult<Vec<Qubit>> {
        let mut qubits = Vec::new();
        for operand in operands {
            let register = operand.register.as_str();
            let size = *self
                .qregs
                .get(register)
                .ok_or_else(|| ParseError::UndeclaredRegister(register.to_string()))?;
            qubits.extend(selected(operand, size)?.map(|i| Qubit::new(register, i)));
        }
        Ok(qubits)
    }

    fn resolve_clbits(&self, operands: &[Operand]) -> ParseResult<Vec<Clbit>> {
        let mut clbits = Vec::new();
        for operand in operands {
            let register = operand.register.as_str();
            let size = *self
                .cregs
                .get(register)
                .ok_or_else(|| ParseError::UndeclaredRegister(register.to_string()))?;
            clbits.extend(selected(operand, size)?.map(|i| Clbit::new(register, i)));
        }
        Ok(clbits)
    }
}

/// Indices an operand selects from a register of `size`.
fn selected(operand: &Operand, size: u32) -> ParseResult<std::ops::RangeInclusive<u32>> {
    let (first, last) = match operand.selection {
        Selection::All => return Ok(if size == 0 { 1..=0 } else { 0..=size - 1 }),
        Selection::Index(i) => (i, i),
        Selection::Slice { first, last } => (first, last),
    };
    for index in [first, last] {
        if index >= size {
            return Err(ParseError::IndexOutOfRange {
                register: operand.register.clone(),
                index,
                size,
            });
        }
    }
    Ok(first..=last)
}

/// Map a lowercased gate name to a standard gate, checking its parameter count.
fn standard_gate(name: &str, params: &[ParameterExpression]) -> ParseResult<Option<StandardGate>> {
    let expected = match name {
        "id" | "i" | "x" | "y" | "z" | "h" | "s" | "sdg" | "t" | "tdg" | "sx" | "sxdg" | "cx"
        | "cnot" | "cy" | "cz" | "ch" | "swap" | "iswap" | "ccx" | "toffoli" | "cswap"
        | "fredkin" => 0,
        "rx" | "ry" | "rz" | "p" | "phase" | "u1" | "crx" | "cry" | "crz" | "cp" | "cphase"
        | "rxx" | "ryy" | "rzz" => 1,
        "u2" => 2,
        "u" | "u3" => 3,
        _ => return Ok(None),
    };
    check_param_count(name, params, expected)?;
    let p = |i: usize| params[i].clone();

    Ok(Some(match name {
        "id" | "i" => StandardGate::I,
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
        "rx" => StandardGate::Rx(p(0)),
        "ry" => StandardGate::Ry(p(0)),
        "rz" => StandardGate::Rz(p(0)),
        "p" | "phase" | "u1" => StandardGate::P(p(0)),
        "u2" => StandardGate::U(
            ParameterExpression::pi() / ParameterExpression::constant(2.0),
            p(0),
            p(1),
        ),
        "u" | "u3" => StandardGate::U(p(0), p(1), p(2)),
        "cx" | "cnot" => StandardGate::CX,
        "cy" => StandardGate::CY,
        "cz" => StandardGate::CZ,
        "ch" => StandardGate::CH,
        "swap" => StandardGate::Swap,
        "iswap" => StandardGate::ISwap,
        "crx" => StandardGate::CRx(p(0)),
        "cry" => StandardGate::CRy(p(0)),
        "crz" => StandardGate::CRz(p(0)),
        "cp" | "cphase" => StandardGate::CP(p(0)),
        "rxx" => StandardGate::RXX(p(0)),
        "ryy" => StandardGate::RYY(p(0)),
        "rzz" => StandardGate::RZZ(p(0)),
        "ccx" | "toffoli" => StandardGate::CCX,
        _ => StandardGate::CSwap,
    }))
}

fn lower_iteration(iterable: &Iterable) -> ParseResult<ForIteration> {
    let constant = |e: &Expression| {
        e.eval_int()
            .ok_or_else(|| ParseError::Unsupported(format!("non-constant loop bound {e:?}")))
    };

    match iterable {
        Iterable::Range { start, step, end } => {
            let start = constant(start)?;
            let end = constant(end)?;
            let step = step.as_ref().map(constant).transpose()?.unwrap_or(1);
            // `end` is inclusive; the IR range is half-open.
            let stop = end
                .checked_add(step.signum())
                .ok_or_else(|| ParseError::Unsupported("loop bound overflows".into()))?;
            Ok(ForIteration::range(start, stop, step)?)
        }
        Iterable::Values(values) => Ok(ForIteration::Values(
            values.iter().map(constant).collect::<ParseResult<_>>()?,
        )),
    }
}

fn condition_value(expr: &Expression) -> Option<u64> {
    match expr {
        Expression::Bool(b) => Some(u64::from(*b)),
        _ => expr.eval_int().and_then(|v| u64::try_from(v).ok()),
    }
}

/// Convert AST expression to `ParameterExpression`.
#[allow(clippy::cast_precision_loss)]
fn expr_to_param(expr: &Expression) -> ParseResult<ParameterExpression> {
    Ok(match expr {
        Expression::Int(v) => ParameterExpression::constant(*v as f64),
        Expression::Float(v) => ParameterExpression::constant(*v),
        Expression::Constant(MathConstant::Pi) => ParameterExpression::pi(),
        Expression::Constant(MathConstant::Tau) => {
            ParameterExpression::pi() * ParameterExpression::constant(2.0)
        }
        Expression::Constant(c) => ParameterExpression::constant(c.value()),
        Expression::Ident(name) => ParameterExpression::symbol(name.as_str()),
        Expression::Unary {
            op: UnaryOp::Neg,
            operand,
        } => -expr_to_param(operand)?,
        Expression::Binary { op, left, right } => {
            let l = expr_to_param(left)?;
            let r = expr_to_param(right)?;
            match op {
                BinOp::Add => l + r,
                BinOp::Sub => l - r,
                BinOp::Mul => l * r,
                BinOp::Div => l / r,
                _ => match expr.eval() {
                    Some(v) => ParameterExpression::constant(v),
                    None => {
                        return Err(ParseError::Unsupported(format!(
                            "operator {op:?} in a gate parameter"
                        )));
                    }
                },
            }
        }
        Expression::Call { function, args } => {
            let value = match args.as_slice() {
                [arg] => arg.eval().and_then(|x| apply_function(function, x)),
                _ => None,
            };
            ParameterExpression::constant(value.ok_or_else(|| {
                ParseError::Unsupported(format!("function call {function} in a gate parameter"))
            })?)
        }
        Expression::Bool(_)
        | Expression::Unary {
            op: UnaryOp::Not, ..
        }
        | Expression::Index { .. } => {
            return Err(ParseError::Unsupported(format!(
                "{expr:?} as a gate parameter"
            )));
        }
    })
}

/// Evaluate a built-in math function on a constant argument.
fn apply_function(name: &str, x: f64) -> Option<f64> {
    Some(match name {
        "sin" => x.sin(),
        "cos" => x.cos(),
        "tan" => x.tan(),
        "arcsin" => x.asin(),
        "arccos" => x.acos(),
        "arctan" => x.atan(),
        "exp" => x.exp(),
        "ln" => x.ln(),
        "sqrt" => x.sqrt(),
        _ => return None,
    })
}

fn check_param_count(
    gate: &str,
    params: &[ParameterExpression],
    expected: usize,
) -> ParseResult<()> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(ParseError::ParameterCount {
            gate: gate.into(),
            expected,
            got: params.len(),
        })
    }
}

fn check_qubit_count(gate: &str, qubits: &[Qubit], expected: usize) -> ParseResult<()> {
    if qubits.len() == expected {
        Ok(())
    } else {
        Err(ParseError::OperandCount {
            gate: gate.into(),
            expected,
            got: qubits.len(),
        })
    }
}

//! Recursive emission of the operation tree.

use simcall_ir::{Circuit, Clbit, Condition, ForIteration, GateOp, Operation, Qubit};
use tracing::{debug, info, instrument};

use crate::call::{EmittedCall, LoopHeader, Program, SimCall};
use crate::condition::{self, ConditionError, ReadCondition};
use crate::config::EmitConfig;
use crate::control;
use crate::error::{CodegenError, CodegenResult};
use crate::index::CircuitIndex;
use crate::param::format_parameter;

/// Compile `circuit` into a call list.
#[instrument(skip(circuit, config), fields(circuit = circuit.name()))]
pub fn emit(circuit: &Circuit, config: &EmitConfig) -> CodegenResult<Program> {
    info!(
        "Emitting circuit with {} registers and {} operations",
        circuit.qregs().len() + circuit.cregs().len(),
        circuit.num_ops()
    );

    let program = Emitter::new(circuit, config).run()?;

    info!(
        "Emission completed: {} qubits, {} clbits, {} calls",
        program.num_qubits(),
        program.num_clbits(),
        program.calls.len()
    );
    Ok(program)
}

/// Compile `circuit` straight to source text.
pub fn emit_text(circuit: &Circuit, config: &EmitConfig) -> CodegenResult<String> {
    Ok(emit(circuit, config)?.to_text(config))
}

/// A loop variable visible in the current block.
struct LoopBinding {
    /// Name the circuit uses.
    source: String,
    /// Name written to the output.
    emitted: String,
}

/// State of one compilation.
struct Emitter<'a> {
    circuit: &'a Circuit,
    config: &'a EmitConfig,
    index: CircuitIndex,
    calls: Vec<EmittedCall>,
    /// Enclosing loop variables, outermost first.
    scope: Vec<LoopBinding>,
    /// Path segments of the operation being emitted, e.g. `ops[2]`, `then[0]`.
    path: Vec<String>,
}

impl<'a> Emitter<'a> {
    fn new(circuit: &'a Circuit, config: &'a EmitConfig) -> Self {
        Self {
            circuit,
            config,
            index: CircuitIndex::build(circuit, config.discovery),
            calls: Vec::new(),
            scope: Vec::new(),
            path: Vec::new(),
        }
    }

    fn run(mut self) -> CodegenResult<Program> {
        self.push(
            0,
            SimCall::SetNumQubits {
                count: self.index.qubits.len(),
            },
        );
        self.push(
            0,
            SimCall::SetNumClbits {
                count: self.index.clbits.len(),
            },
        );
        self.emit_block(self.circuit.operations(), "ops", 0)?;
        Ok(Program { calls: self.calls })
    }

    fn push(&mut self, depth: usize, call: SimCall) {
        self.calls.push(EmittedCall { depth, call });
    }

    fn position(&self) -> String {
        self.path.join(".")
    }

    fn emit_block(&mut self, ops: &[Operation], label: &str, depth: usize) -> CodegenResult<()> {
        debug!("Emitting {} operations of {label} at depth {depth}", ops.len());
        for (i, op) in ops.iter().enumerate() {
            self.path.push(format!("{label}[{i}]"));
            self.emit_operation(op, depth)?;
            self.path.pop();
        }
        Ok(())
    }

    fn emit_operation(&mut self, op: &Operation, depth: usize) -> CodegenResult<()> {
        match op {
            Operation::Gate(gate_op) => {
                let call = self.gate_call(gate_op)?;
                self.push(depth, call);
            }
            Operation::Measure { qubits, clbits } => {
                let call = SimCall::Measure {
                    qubits: self.resolve_qubits(qubits)?,
                    clbits: self.resolve_clbits(clbits)?,
                };
                self.push(depth, call);
            }
            Operation::IfElse {
                condition,
                then_body,
                else_body,
            } => {
                let condition = self.resolve_condition(condition)?;
                self.push(depth, SimCall::If { condition });
                self.emit_block(then_body, "then", depth + 1)?;
                if let Some(else_body) = else_body.as_deref().filter(|b| !b.is_empty()) {
                    self.push(depth, SimCall::Else);
                    self.emit_block(else_body, "else", depth + 1)?;
                }
                self.push(depth, SimCall::End);
            }
            Operation::WhileLoop { condition, body } => {
                let condition = self.resolve_condition(condition)?;
                self.push(depth, SimCall::While { condition });
                self.emit_block(body, "body", depth + 1)?;
                self.push(depth, SimCall::End);
            }
            Operation::ForLoop {
                iteration,
                variable,
                body,
            } => {
                let source = variable
                    .clone()
                    .unwrap_or_else(|| self.config.default_loop_var.clone());
                let emitted = self.bind_loop_variable(&source);
                let header = self.loop_header(iteration, emitted.clone())?;

                self.push(depth, SimCall::For { header });
                self.scope.push(LoopBinding { source, emitted });
                let result = self.emit_block(body, "body", depth + 1);
                self.scope.pop();
                result?;
                self.push(depth, SimCall::End);
            }
            Operation::Directive { kind, .. } => {
                return Err(CodegenError::UnknownOperation {
                    name: kind.name().to_string(),
                    position: self.position(),
                });
            }
        }
        Ok(())
    }

    fn gate_call(&self, gate_op: &GateOp) -> CodegenResult<SimCall> {
        let operands = self.resolve_qubits(&gate_op.qubits)?;
        let decomposition = control::decompose(&gate_op.gate, &operands);
        let params = gate_op
            .gate
            .params()
            .into_iter()
            .map(|p| format_parameter(&p.map_symbols(&|name| self.rename(name))))
            .collect();

        Ok(SimCall::Gate {
            name: decomposition.base_name,
            params,
            targets: decomposition.targets,
            positive_controls: decomposition.positive_controls,
            negative_controls: decomposition.negative_controls,
        })
    }

    /// Output name of a symbol referring to an enclosing loop variable.
    fn rename(&self, name: &str) -> Option<String> {
        self.scope
            .iter()
            .rev()
            .find(|binding| binding.source == name)
            .filter(|binding| binding.emitted != name)
            .map(|binding| binding.emitted.clone())
    }

    /// Pick an output name for a new loop variable that no enclosing loop uses.
    fn bind_loop_variable(&self, source: &str) -> String {
        let taken = |name: &str| self.scope.iter().any(|b| b.emitted == name);
        if !taken(source) {
            return source.to_string();
        }
        (1..)
            .map(|n| format!("{source}_{n}"))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| source.to_string())
    }

    fn loop_header(&self, iteration: &ForIteration, variable: String) -> CodegenResult<LoopHeader> {
        match iteration {
            ForIteration::Range { step: 0, .. } => Err(CodegenError::InvalidLoop {
                position: self.position(),
                reason: "range step is zero".into(),
            }),
            ForIteration::Range { start, stop, step } => Ok(LoopHeader::Range {
                variable,
                start: *start,
                stop: *stop,
                step: *step,
            }),
            ForIteration::Values(values) => Ok(LoopHeader::Values {
                variable,
                values: values.clone(),
            }),
            ForIteration::Count(count) => Ok(LoopHeader::Range {
                variable,
                start: 0,
                stop: i64::try_from(*count).map_err(|_| CodegenError::InvalidLoop {
                    position: self.position(),
                    reason: format!("iteration count {count} does not fit a loop bound"),
                })?,
                step: 1,
            }),
        }
    }

    fn resolve_qubits(&self, qubits: &[Qubit]) -> CodegenResult<Vec<usize>> {
        qubits
            .iter()
            .map(|qubit| {
                self.index
                    .qubits
                    .get(qubit)
                    .ok_or_else(|| CodegenError::UnresolvedQubit {
                        qubit: qubit.clone(),
                        position: self.position(),
                    })
            })
            .collect()
    }

    fn resolve_clbits(&self, clbits: &[Clbit]) -> CodegenResult<Vec<usize>> {
        clbits
            .iter()
            .map(|clbit| {
                self.index
                    .clbits
                    .get(clbit)
                    .ok_or_else(|| CodegenError::UnresolvedClbit {
                        clbit: clbit.clone(),
                        position: self.position(),
                    })
            })
            .collect()
    }

    fn resolve_condition(&self, condition: &Condition) -> CodegenResult<ReadCondition> {
        let position = || self.position();
        condition::translate(condition, self.circuit, &self.index.clbits).map_err(|err| {
            match err {
                ConditionError::UnresolvedClbit(clbit) => CodegenError::UnresolvedClbit {
                    clbit,
                    position: position(),
                },
                ConditionError::UnresolvedRegister(register) => {
                    CodegenError::UnresolvedRegister {
                        register,
                        position: position(),
                    }
                }
            }
        })
    }
}

//! Simcall Code Generator
//!
//! Compiles a hierarchical [`simcall_ir::Circuit`] into a flat sequence of
//! calls against an abstract simulator object:
//!
//! ```text
//! sim.set_num_qubits(2);
//! sim.set_num_clbits(1);
//! sim.gate_h({0}, {}, {});
//! sim.gate_x({1}, {0}, {});
//! if (sim.read(0) == 1) {
//!     sim.gate_z({1}, {}, {});
//! }
//! ```
//!
//! # Pipeline
//!
//! 1. [`index`] numbers every qubit and classical bit densely from 0.
//! 2. [`emitter`] walks the operation tree depth-first, in source order.
//! 3. [`control`] splits each gate's operands into targets, positive controls
//!    and negative controls, and finds the root gate name.
//! 4. [`condition`] turns if/while guards into `sim.read(...) == v` checks.
//!
//! The result is a [`Program`]: a list of [`EmittedCall`]s that renders to
//! text with [`Program::to_text`] or to JSON with [`Program::to_json`].
//!
//! # Example
//!
//! ```rust
//! use simcall_codegen::{EmitConfig, emit_text};
//! use simcall_ir::{Circuit, CircuitBuilder};
//!
//! let mut circuit = Circuit::new("bell");
//! let q = circuit.add_qreg("q", 2).unwrap();
//! let c = circuit.add_creg("c", 2).unwrap();
//! circuit.h(&q[0]).unwrap();
//! circuit.cx(&q[0], &q[1]).unwrap();
//! circuit.measure_many(&q, &c).unwrap();
//!
//! let text = emit_text(&circuit, &EmitConfig::default()).unwrap();
//! assert_eq!(
//!     text,
//!     "sim.set_num_qubits(2);\n\
//!      sim.set_num_clbits(2);\n\
//!      sim.gate_h({0}, {}, {});\n\
//!      sim.gate_x({1}, {0}, {});\n\
//!      sim.measure({0,1}, {0,1});\n"
//! );
//! ```

pub mod call;
pub mod condition;
pub mod config;
pub mod control;
pub mod emitter;
pub mod error;
pub mod index;
pub mod param;

pub use call::{EmittedCall, LoopHeader, Program, SimCall};
pub use condition::ReadCondition;
pub use config::{BitDiscovery, EmitConfig};
pub use control::{ControlSpec, Decomposition};
pub use emitter::{emit, emit_text};
pub use error::{CodegenError, CodegenResult};
pub use index::{BitIndex, CircuitIndex};

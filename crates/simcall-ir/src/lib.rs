//! Simcall Circuit Intermediate Representation
//!
//! This crate provides the hierarchical circuit tree consumed by the simcall
//! code generator and produced by the OpenQASM front-end.
//!
//! # Overview
//!
//! A [`Circuit`] owns named quantum and classical registers plus an ordered
//! list of [`Operation`]s. Control-flow operations (if/else, while, for) own
//! nested operation lists, so a circuit is a tree rather than a flat sequence.
//!
//! # Core Components
//!
//! - **Bits and Registers**: [`Qubit`], [`Clbit`], [`QuantumRegister`],
//!   [`ClassicalRegister`]; bits are addressed by register name and index
//! - **Gates**: [`StandardGate`], [`CustomGate`] and [`ControlledGate`], which
//!   wraps another gate with extra controls and an optional control state
//! - **Parameters**: [`ParameterExpression`] for numeric and symbolic gate arguments
//! - **Operations**: [`Operation`] with gate, measurement, control-flow and
//!   directive variants
//! - **Circuit**: [`Circuit`] plus the [`CircuitBuilder`] trait shared with
//!   nested [`Block`]s
//!
//! # Example: Conditional Correction
//!
//! ```rust
//! use simcall_ir::{Circuit, CircuitBuilder, Condition, ForIteration};
//!
//! let mut circuit = Circuit::new("feedback");
//! let q = circuit.add_qreg("q", 2).unwrap();
//! let c = circuit.add_creg("c", 1).unwrap();
//!
//! circuit.h(&q[0]).unwrap();
//! circuit.measure(&q[0], &c[0]).unwrap();
//! circuit
//!     .if_else(
//!         Condition::bit(c[0].clone(), 1),
//!         |then| {
//!             then.x(&q[1])?;
//!             Ok(())
//!         },
//!         |otherwise| {
//!             otherwise.for_loop(ForIteration::upto(3), Some("i"), |body| {
//!                 body.h(&q[1])?;
//!                 Ok(())
//!             })?;
//!             Ok(())
//!         },
//!     )
//!     .unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.nesting_depth(), 2);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod operation;
pub mod parameter;
pub mod qubit;

pub use circuit::{Block, Circuit, CircuitBuilder};
pub use error::{IrError, IrResult};
pub use gate::{ControlledGate, CustomGate, Gate, GateKind, StandardGate};
pub use operation::{Condition, ConditionTarget, DirectiveKind, ForIteration, GateOp, Operation};
pub use parameter::ParameterExpression;
pub use qubit::{ClassicalRegister, Clbit, QuantumRegister, Qubit};

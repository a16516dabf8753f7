//! `OpenQASM` front-end for simcall
//!
//! Parses `OpenQASM` 3.0 (and the `qreg`/`creg` subset of 2.0) into a
//! [`simcall_ir::Circuit`], keeping control flow as nested blocks.
//!
//! # Supported Features
//!
//! | Feature | Status | Example |
//! |---------|--------|---------|
//! | Version declaration | ✅ | `OPENQASM 3.0;` |
//! | Qubit declarations | ✅ | `qubit[5] q;`, `qreg q[5];` |
//! | Classical bits | ✅ | `bit[5] c;`, `creg c[5];` |
//! | Standard gates | ✅ | `h q[0];`, `cx q[0], q[1];` |
//! | Parameterized gates | ✅ | `rx(pi/4) q[0];` |
//! | Control modifiers | ✅ | `ctrl @ negctrl @ x a, b, t;` |
//! | Measurements | ✅ | `c = measure q;`, `measure q -> c;` |
//! | If / else | ✅ | `if (c[0] == 1) { x q[1]; }` |
//! | While loops | ✅ | `while (c == 0) { ... }` |
//! | For loops | ✅ | `for int i in [0:3] { ... }` |
//! | Barrier, reset, delay | ✅ | `barrier q;` |
//! | Gate definitions | ❌ | `gate g a { h a; }` |
//! | `inv @`, `pow(k) @` | ❌ | |
//!
//! # Example
//!
//! ```rust
//! use simcall_ir::Operation;
//! use simcall_qasm3::parse;
//!
//! let qasm = r#"
//!     OPENQASM 3.0;
//!     qubit[2] q;
//!     bit[1] c;
//!     h q[0];
//!     c[0] = measure q[0];
//!     if (c[0] == 1) {
//!         x q[1];
//!     }
//! "#;
//!
//! let circuit = parse(qasm).unwrap();
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_ops(), 4);
//! assert!(matches!(circuit.operations()[2], Operation::IfElse { .. }));
//! ```
//!
//! # Supported Gates
//!
//! Single-qubit: `id`, `x`, `y`, `z`, `h`, `s`, `sdg`, `t`, `tdg`, `sx`, `sxdg`
//!
//! Parameterized: `rx(θ)`, `ry(θ)`, `rz(θ)`, `p(θ)`, `u1(λ)`, `u2(φ,λ)`, `u(θ,φ,λ)`
//!
//! Two-qubit: `cx`, `cy`, `cz`, `ch`, `swap`, `iswap`, `crx(θ)`, `cry(θ)`, `crz(θ)`,
//! `cp(θ)`, `rxx(θ)`, `ryy(θ)`, `rzz(θ)`
//!
//! Three-qubit: `ccx` (Toffoli), `cswap` (Fredkin)
//!
//! Any other name becomes an opaque custom gate over its operands.

mod ast;
mod error;
mod lexer;
mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_ast};

// Re-export AST types for advanced users
pub mod syntax {
    pub use crate::ast::*;
}

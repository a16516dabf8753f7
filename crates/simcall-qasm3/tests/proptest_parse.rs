//! Property-based tests for parsing generated programs.

use proptest::prelude::*;
use simcall_qasm3::parse;

/// A gate line over a register of `num_qubits` qubits.
fn arb_gate_line(num_qubits: u32) -> impl Strategy<Value = String> {
    let single = (
        prop::sample::select(vec!["h", "x", "y", "z", "s", "t"]),
        0..num_qubits,
    )
        .prop_map(|(g, q)| format!("{g} q[{q}];"));
    let rotation = (
        prop::sample::select(vec!["rx", "ry", "rz", "p"]),
        -10.0_f64..10.0,
        0..num_qubits,
    )
        .prop_map(|(g, theta, q)| format!("{g}({theta:.4}) q[{q}];"));
    let pair = (0..num_qubits, 0..num_qubits)
        .prop_filter("Control and target must differ", |(c, t)| c != t)
        .prop_map(|(c, t)| format!("cx q[{c}], q[{t}];"));

    if num_qubits < 2 {
        prop_oneof![single, rotation].boxed()
    } else {
        prop_oneof![single, rotation, pair].boxed()
    }
}

/// A program with `n` gate lines, optionally wrapped in a loop.
fn arb_program() -> impl Strategy<Value = (u32, Vec<String>, bool)> {
    (1_u32..=5).prop_flat_map(|num_qubits| {
        (
            Just(num_qubits),
            prop::collection::vec(arb_gate_line(num_qubits), 0..=12),
            any::<bool>(),
        )
    })
}

fn render(num_qubits: u32, lines: &[String], looped: bool) -> String {
    let mut source = format!("OPENQASM 3.0;\nqubit[{num_qubits}] q;\nbit[{num_qubits}] c;\n");
    if looped {
        source.push_str("for int i in [0:1] {\n");
    }
    for line in lines {
        source.push_str(line);
        source.push('\n');
    }
    if looped {
        source.push_str("}\n");
    }
    source.push_str("c = measure q;\n");
    source
}

proptest! {
    /// Every gate line becomes exactly one operation.
    #[test]
    fn test_gate_lines_map_to_operations((num_qubits, lines, looped) in arb_program()) {
        let circuit = parse(&render(num_qubits, &lines, looped)).unwrap();

        prop_assert_eq!(circuit.num_qubits(), num_qubits as usize);
        prop_assert_eq!(circuit.num_clbits(), num_qubits as usize);
        prop_assert_eq!(circuit.num_ops(), lines.len() + 1 + usize::from(looped));
        prop_assert_eq!(circuit.nesting_depth(), usize::from(looped));
    }

    /// Parsing is deterministic.
    #[test]
    fn test_parse_is_deterministic((num_qubits, lines, looped) in arb_program()) {
        let source = render(num_qubits, &lines, looped);
        prop_assert_eq!(parse(&source).unwrap(), parse(&source).unwrap());
    }
}

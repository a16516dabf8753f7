//! Parsing of programs with nested control flow.

use simcall_ir::{Clbit, Condition, ForIteration, Operation, Qubit};
use simcall_qasm3::{ParseError, parse};

const TELEPORT: &str = r#"
OPENQASM 3.0;
include "stdgates.inc";

qubit[3] q;
bit[2] c;

h q[1];
cx q[1], q[2];
cx q[0], q[1];
h q[0];
c[0] = measure q[0];
c[1] = measure q[1];
if (c[1] == 1) {
    x q[2];
}
if (c[0] == 1) {
    z q[2];
}
"#;

#[test]
fn test_teleport_structure() {
    let circuit = parse(TELEPORT).unwrap();
    assert_eq!(circuit.num_qubits(), 3);
    assert_eq!(circuit.num_clbits(), 2);
    assert_eq!(circuit.operations().len(), 8);
    assert_eq!(circuit.num_ops(), 10);
    assert_eq!(circuit.nesting_depth(), 1);

    match &circuit.operations()[6] {
        Operation::IfElse {
            condition,
            then_body,
            else_body,
        } => {
            assert_eq!(*condition, Condition::bit(Clbit::new("c", 1), 1));
            assert_eq!(then_body.len(), 1);
            assert_eq!(then_body[0].qubits(), [Qubit::new("q", 2)]);
            assert!(else_body.is_none());
        }
        other => panic!("expected if, got {other:?}"),
    }
}

#[test]
fn test_nested_loops_and_else() {
    let source = r"
        OPENQASM 3.0;
        qubit[2] q;
        bit[1] c;
        for int i in [0:3] {
            for int j in {0, 2} {
                rz(i * pi / 4) q[0];
            }
            c[0] = measure q[0];
            if (c[0]) {
                x q[1];
            } else {
                h q[1];
            }
        }
        while (c == 0) {
            h q[0];
            c[0] = measure q[0];
        }
    ";

    let circuit = parse(source).unwrap();
    assert_eq!(circuit.operations().len(), 2);
    assert_eq!(circuit.nesting_depth(), 2);

    let Operation::ForLoop {
        iteration,
        variable,
        body,
    } = &circuit.operations()[0]
    else {
        panic!("expected for loop");
    };
    assert_eq!(*iteration, ForIteration::upto(4));
    assert_eq!(variable.as_deref(), Some("i"));
    assert_eq!(body.len(), 3);
    assert!(matches!(
        &body[0],
        Operation::ForLoop { iteration: ForIteration::Values(v), .. } if *v == [0, 2]
    ));
    assert!(matches!(
        &body[2],
        Operation::IfElse { else_body: Some(e), .. } if e.len() == 1
    ));

    assert!(matches!(
        &circuit.operations()[1],
        Operation::WhileLoop { condition, body } if *condition == Condition::register("c", 0)
            && body.len() == 2
    ));
}

#[test]
fn test_empty_else_is_kept() {
    let source = "OPENQASM 3.0;\nqubit q;\nbit c;\nif (c == 1) { x q; } else { }";
    let circuit = parse(source).unwrap();
    assert!(matches!(
        &circuit.operations()[0],
        Operation::IfElse { else_body: Some(e), .. } if e.is_empty()
    ));
}

#[test]
fn test_unknown_register_in_condition() {
    let source = "OPENQASM 3.0;\nqubit q;\nif (d[0] == 1) x q;";
    assert!(matches!(
        parse(source),
        Err(ParseError::UndeclaredRegister(name)) if name == "d"
    ));
}

#[test]
fn test_qasm2_program() {
    let source = r#"
        OPENQASM 2.0;
        include "qelib1.inc";
        qreg q[2];
        creg c[2];
        u2(0, pi) q[0];
        CX q[0], q[1];
        measure q -> c;
    "#;
    let circuit = parse(source).unwrap();
    let names: Vec<_> = circuit.operations().iter().map(Operation::name).collect();
    assert_eq!(names, ["u", "cx", "measure"]);
}

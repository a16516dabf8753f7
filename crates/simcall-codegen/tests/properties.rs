//! Property-based tests over randomly nested circuits.

use proptest::prelude::*;
use simcall_codegen::{BitDiscovery, EmitConfig, Program, SimCall, emit};
use simcall_ir::{
    Circuit, CircuitBuilder, Clbit, Condition, ForIteration, IrResult, Qubit, StandardGate,
};

const NUM_QUBITS: u32 = 4;

/// One step of a generated circuit.
#[derive(Debug, Clone)]
enum Step {
    H(u32),
    Rz(u32, f64),
    Cx(u32, u32),
    /// X on the last qubit, controlled by the others with the given state.
    Mcx(Vec<u32>, u64),
    Measure(u32),
    If(Vec<Step>),
    For(u64, Vec<Step>),
}

fn arb_steps() -> impl Strategy<Value = Vec<Step>> {
    let all: Vec<u32> = (0..NUM_QUBITS).collect();
    let leaf = prop_oneof![
        (0..NUM_QUBITS).prop_map(Step::H),
        (0..NUM_QUBITS, -3.0_f64..3.0).prop_map(|(q, theta)| Step::Rz(q, theta)),
        prop::sample::subsequence(all.clone(), 2)
            .prop_shuffle()
            .prop_map(|q| Step::Cx(q[0], q[1])),
        (
            prop::sample::subsequence(all, 2..=NUM_QUBITS as usize).prop_shuffle(),
            any::<u64>()
        )
            .prop_map(|(q, state)| Step::Mcx(q, state)),
        (0..NUM_QUBITS).prop_map(Step::Measure),
    ];
    let step = leaf.prop_recursive(3, 48, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Step::If),
            (1_u64..4, prop::collection::vec(inner, 0..4))
                .prop_map(|(n, body)| Step::For(n, body)),
        ]
    });
    prop::collection::vec(step, 0..12)
}

fn ctrl_mask(num_ctrl: usize) -> u64 {
    (1_u64 << num_ctrl) - 1
}

fn apply<B: CircuitBuilder>(b: &mut B, step: &Step, q: &[Qubit], c: &[Clbit]) -> IrResult<()> {
    match step {
        Step::H(i) => {
            b.h(&q[*i as usize])?;
        }
        Step::Rz(i, theta) => {
            b.rz(*theta, &q[*i as usize])?;
        }
        Step::Cx(a, t) => {
            b.cx(&q[*a as usize], &q[*t as usize])?;
        }
        Step::Mcx(indices, state) => {
            let qubits: Vec<_> = indices.iter().map(|&i| q[i as usize].clone()).collect();
            let num_ctrl = indices.len() - 1;
            b.control(
                StandardGate::X,
                num_ctrl as u32,
                Some(state & ctrl_mask(num_ctrl)),
                &qubits,
            )?;
        }
        Step::Measure(i) => {
            b.measure(&q[*i as usize], &c[*i as usize])?;
        }
        Step::If(body) => {
            b.if_test(Condition::bit(c[0].clone(), 1), |block| {
                body.iter().try_for_each(|s| apply(block, s, q, c))
            })?;
        }
        Step::For(n, body) => {
            b.for_loop(ForIteration::Count(*n), None, |block| {
                body.iter().try_for_each(|s| apply(block, s, q, c))
            })?;
        }
    }
    Ok(())
}

fn build(steps: &[Step]) -> Circuit {
    let mut circuit = Circuit::new("prop");
    let q = circuit.add_qreg("q", NUM_QUBITS).unwrap();
    let c = circuit.add_creg("c", NUM_QUBITS).unwrap();
    for step in steps {
        apply(&mut circuit, step, &q, &c).unwrap();
    }
    circuit
}

/// Gate steps and negative controls expected in the output.
fn expected_gates(steps: &[Step]) -> (usize, usize) {
    steps.iter().fold((0, 0), |(gates, negative), step| match step {
        Step::H(_) | Step::Rz(..) | Step::Cx(..) => (gates + 1, negative),
        Step::Mcx(indices, state) => {
            let num_ctrl = indices.len() - 1;
            let ones = (state & ctrl_mask(num_ctrl)).count_ones() as usize;
            (gates + 1, negative + num_ctrl - ones)
        }
        Step::Measure(_) => (gates, negative),
        Step::If(body) | Step::For(_, body) => {
            let (g, n) = expected_gates(body);
            (gates + g, negative + n)
        }
    })
}

fn gate_calls(program: &Program) -> impl Iterator<Item = &SimCall> {
    program
        .calls
        .iter()
        .map(|c| &c.call)
        .filter(|c| matches!(c, SimCall::Gate { .. }))
}

proptest! {
    /// Emitting the same circuit twice gives the same program.
    #[test]
    fn test_emission_is_deterministic(steps in arb_steps()) {
        let circuit = build(&steps);
        let config = EmitConfig::default();
        prop_assert_eq!(emit(&circuit, &config).unwrap(), emit(&circuit, &config).unwrap());
    }

    /// Targets and both control lists partition each gate's operands.
    #[test]
    fn test_controls_partition_operands(steps in arb_steps()) {
        let program = emit(&build(&steps), &EmitConfig::default()).unwrap();
        let (expected_count, expected_negative) = expected_gates(&steps);

        let mut count = 0;
        let mut negative = 0;
        for call in gate_calls(&program) {
            let SimCall::Gate { targets, positive_controls, negative_controls, .. } = call else {
                unreachable!();
            };
            let mut all: Vec<_> = targets
                .iter()
                .chain(positive_controls)
                .chain(negative_controls)
                .copied()
                .collect();
            let total = all.len();
            all.sort_unstable();
            all.dedup();
            prop_assert_eq!(all.len(), total);
            prop_assert!(!targets.is_empty());
            prop_assert!(all.iter().all(|&q| q < NUM_QUBITS as usize));
            count += 1;
            negative += negative_controls.len();
        }
        prop_assert_eq!(count, expected_count);
        prop_assert_eq!(negative, expected_negative);
    }

    /// Every block opener is closed at its own depth; bodies sit one deeper.
    #[test]
    fn test_blocks_are_balanced(steps in arb_steps()) {
        let circuit = build(&steps);
        let program = emit(&circuit, &EmitConfig::default()).unwrap();

        let mut open: Vec<usize> = Vec::new();
        for emitted in &program.calls {
            match &emitted.call {
                SimCall::If { .. } | SimCall::While { .. } | SimCall::For { .. } => {
                    prop_assert_eq!(emitted.depth, open.len());
                    open.push(emitted.depth);
                }
                SimCall::End => {
                    prop_assert_eq!(open.pop(), Some(emitted.depth));
                }
                SimCall::Else => {
                    prop_assert_eq!(open.last().copied(), Some(emitted.depth));
                }
                _ => prop_assert_eq!(emitted.depth, open.len()),
            }
        }
        prop_assert!(open.is_empty());
        let deepest_block = program
            .calls
            .iter()
            .filter(|c| matches!(c.call, SimCall::If { .. } | SimCall::While { .. } | SimCall::For { .. }))
            .map(|c| c.depth + 1)
            .max()
            .unwrap_or(0);
        prop_assert_eq!(deepest_block, circuit.nesting_depth());
    }

    /// Declared discovery counts every bit; referenced never counts more.
    #[test]
    fn test_bit_counts(steps in arb_steps()) {
        let circuit = build(&steps);
        let declared = emit(&circuit, &EmitConfig::default()).unwrap();
        prop_assert_eq!(declared.num_qubits(), NUM_QUBITS as usize);
        prop_assert_eq!(declared.num_clbits(), NUM_QUBITS as usize);

        let config = EmitConfig::default().with_discovery(BitDiscovery::Referenced);
        let referenced = emit(&circuit, &config).unwrap();
        prop_assert!(referenced.num_qubits() <= declared.num_qubits());
        prop_assert!(referenced.num_clbits() <= declared.num_clbits());
        prop_assert_eq!(
            gate_calls(&referenced).count(),
            gate_calls(&declared).count()
        );
    }

    /// Every measurement pairs qubits and bits one to one.
    #[test]
    fn test_measure_arity(steps in arb_steps()) {
        let program = emit(&build(&steps), &EmitConfig::default()).unwrap();
        for emitted in &program.calls {
            if let SimCall::Measure { qubits, clbits } = &emitted.call {
                prop_assert_eq!(qubits.len(), clbits.len());
                prop_assert_eq!(qubits.len(), 1);
            }
        }
    }
}

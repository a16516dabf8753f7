//! Inspect command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;
use simcall_codegen::{BitDiscovery, CircuitIndex};

use super::common::load_circuit;

/// Execute the inspect command.
pub fn execute(input: &Path, discovery: BitDiscovery) -> Result<()> {
    let circuit = load_circuit(input)?;

    println!(
        "{} {} ({} operations at top level)",
        style("Circuit").cyan().bold(),
        style(circuit.name()).green(),
        circuit.num_ops()
    );

    println!();
    println!("Registers:");
    for reg in circuit.qregs() {
        println!("  qubit[{}] {}", reg.size, style(&reg.name).yellow());
    }
    for reg in circuit.cregs() {
        println!("  bit[{}]   {}", reg.size, style(&reg.name).yellow());
    }

    let index = CircuitIndex::build(&circuit, discovery);

    println!();
    println!("Qubit numbering ({discovery}, {} total):", index.qubits.len());
    for (number, qubit) in index.qubits.bits().iter().enumerate() {
        println!("  {:>4} -> {}", style(number).cyan(), qubit);
    }

    println!();
    println!("Clbit numbering ({discovery}, {} total):", index.clbits.len());
    for (number, clbit) in index.clbits.bits().iter().enumerate() {
        println!("  {:>4} -> {}", style(number).cyan(), clbit);
    }

    Ok(())
}

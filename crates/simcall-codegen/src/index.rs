//! Dense bit numbering.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use simcall_ir::{Circuit, Clbit, ConditionTarget, Operation, Qubit};
use tracing::debug;

use crate::config::BitDiscovery;

/// Order-preserving map from bits to dense indices starting at 0.
#[derive(Debug, Clone)]
pub struct BitIndex<B> {
    lookup: FxHashMap<B, usize>,
    order: Vec<B>,
}

impl<B> Default for BitIndex<B> {
    fn default() -> Self {
        Self {
            lookup: FxHashMap::default(),
            order: Vec::new(),
        }
    }
}

impl<B: Clone + Eq + Hash> BitIndex<B> {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Index `bit`, returning its number. Known bits keep their number.
    pub fn insert(&mut self, bit: &B) -> usize {
        if let Some(&index) = self.lookup.get(bit) {
            return index;
        }
        let index = self.order.len();
        self.lookup.insert(bit.clone(), index);
        self.order.push(bit.clone());
        index
    }

    /// Look up the number of `bit`.
    pub fn get(&self, bit: &B) -> Option<usize> {
        self.lookup.get(bit).copied()
    }

    /// Number of indexed bits.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check whether no bit is indexed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bits in index order.
    pub fn bits(&self) -> &[B] {
        &self.order
    }
}

/// The quantum and classical numbering of one circuit.
#[derive(Debug, Clone, Default)]
pub struct CircuitIndex {
    /// Qubit numbering.
    pub qubits: BitIndex<Qubit>,
    /// Classical bit numbering.
    pub clbits: BitIndex<Clbit>,
}

impl CircuitIndex {
    /// Number the bits of `circuit` with the given strategy.
    pub fn build(circuit: &Circuit, discovery: BitDiscovery) -> Self {
        let mut index = Self::default();
        match discovery {
            BitDiscovery::Declared => {
                for reg in circuit.qregs() {
                    for qubit in reg.bits() {
                        index.qubits.insert(&qubit);
                    }
                }
                for reg in circuit.cregs() {
                    for clbit in reg.bits() {
                        index.clbits.insert(&clbit);
                    }
                }
            }
            BitDiscovery::Referenced => index.scan(circuit, circuit.operations()),
        }
        debug!(
            "Indexed {} qubits and {} clbits ({discovery})",
            index.qubits.len(),
            index.clbits.len()
        );
        index
    }

    fn scan(&mut self, circuit: &Circuit, ops: &[Operation]) {
        for op in ops {
            for qubit in op.qubits() {
                self.qubits.insert(qubit);
            }
            for clbit in op.clbits() {
                self.clbits.insert(clbit);
            }
            if let Some(condition) = op.condition() {
                match &condition.target {
                    ConditionTarget::Bit(clbit) => {
                        self.clbits.insert(clbit);
                    }
                    ConditionTarget::Register(name) => {
                        // Unknown registers are reported by the emitter.
                        if let Some(reg) = circuit.creg(name) {
                            for clbit in reg.bits() {
                                self.clbits.insert(&clbit);
                            }
                        }
                    }
                }
            }
            for body in op.bodies() {
                self.scan(circuit, body);
            }
        }
    }
}

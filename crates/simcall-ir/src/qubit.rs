//! Qubit, classical bit and register types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantum bit, identified by its owning register and its offset in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Qubit {
    /// The name of the register this qubit belongs to.
    pub register: String,
    /// The index within the register.
    pub index: u32,
}

impl Qubit {
    /// Create a new qubit handle.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Qubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A classical bit, identified by its owning register and its offset in it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Clbit {
    /// The name of the register this bit belongs to.
    pub register: String,
    /// The index within the register.
    pub index: u32,
}

impl Clbit {
    /// Create a new classical bit handle.
    pub fn new(register: impl Into<String>, index: u32) -> Self {
        Self {
            register: register.into(),
            index,
        }
    }
}

impl fmt::Display for Clbit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.register, self.index)
    }
}

/// A named, fixed-size group of qubits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    /// Register name, unique among the circuit's quantum registers.
    pub name: String,
    /// Number of qubits.
    pub size: u32,
}

impl QuantumRegister {
    /// Create a new quantum register.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Get the qubit at `index`, if it is inside the register.
    pub fn bit(&self, index: u32) -> Option<Qubit> {
        (index < self.size).then(|| Qubit::new(&self.name, index))
    }

    /// All qubits of the register, in order.
    pub fn bits(&self) -> impl Iterator<Item = Qubit> + '_ {
        (0..self.size).map(|i| Qubit::new(&self.name, i))
    }

    /// Check whether `qubit` belongs to this register.
    pub fn contains(&self, qubit: &Qubit) -> bool {
        qubit.register == self.name && qubit.index < self.size
    }
}

/// A named, fixed-size group of classical bits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    /// Register name, unique among the circuit's classical registers.
    pub name: String,
    /// Number of bits.
    pub size: u32,
}

impl ClassicalRegister {
    /// Create a new classical register.
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// Get the bit at `index`, if it is inside the register.
    pub fn bit(&self, index: u32) -> Option<Clbit> {
        (index < self.size).then(|| Clbit::new(&self.name, index))
    }

    /// All bits of the register, in order.
    pub fn bits(&self) -> impl Iterator<Item = Clbit> + '_ {
        (0..self.size).map(|i| Clbit::new(&self.name, i))
    }

    /// Check whether `clbit` belongs to this register.
    pub fn contains(&self, clbit: &Clbit) -> bool {
        clbit.register == self.name && clbit.index < self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_display() {
        let q = Qubit::new("qr", 3);
        assert_eq!(format!("{q}"), "qr[3]");
    }

    #[test]
    fn test_clbit_display() {
        let c = Clbit::new("cr", 0);
        assert_eq!(format!("{c}"), "cr[0]");
    }

    #[test]
    fn test_register_bits() {
        let reg = QuantumRegister::new("q", 3);
        let bits: Vec<_> = reg.bits().collect();
        assert_eq!(bits.len(), 3);
        assert_eq!(bits[2], Qubit::new("q", 2));
        assert!(reg.contains(&bits[1]));
        assert!(!reg.contains(&Qubit::new("q", 3)));
        assert!(!reg.contains(&Qubit::new("other", 0)));
        assert_eq!(reg.bit(3), None);
    }

    #[test]
    fn test_classical_register_bits() {
        let reg = ClassicalRegister::new("c", 2);
        assert_eq!(reg.bit(1), Some(Clbit::new("c", 1)));
        assert_eq!(reg.bit(2), None);
    }
}

//! Classical conditions as simulator reads.

use serde::{Deserialize, Serialize};
use simcall_ir::{Circuit, Clbit, Condition, ConditionTarget};

use crate::index::BitIndex;

/// A condition in terms of classical bit indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadCondition {
    /// Bits read, in register order.
    pub clbits: Vec<usize>,
    /// Required value of the bits read as an integer.
    pub value: u64,
}

impl ReadCondition {
    /// Render as a boolean expression over `<simulator>.read(...)`.
    pub fn render(&self, simulator: &str) -> String {
        match self.clbits.as_slice() {
            [bit] => format!("{simulator}.read({bit}) == {}", self.value),
            bits => format!("{simulator}.read({{{}}}) == {}", join(bits, ", "), self.value),
        }
    }
}

/// Why a condition could not be translated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionError {
    /// A condition bit has no index.
    UnresolvedClbit(Clbit),
    /// The condition register is not declared.
    UnresolvedRegister(String),
}

/// Translate `condition` against the circuit's registers and bit numbering.
pub fn translate(
    condition: &Condition,
    circuit: &Circuit,
    clbits: &BitIndex<Clbit>,
) -> Result<ReadCondition, ConditionError> {
    let lookup = |clbit: &Clbit| {
        clbits
            .get(clbit)
            .ok_or_else(|| ConditionError::UnresolvedClbit(clbit.clone()))
    };

    let indices = match &condition.target {
        ConditionTarget::Bit(clbit) => vec![lookup(clbit)?],
        ConditionTarget::Register(name) => {
            let reg = circuit
                .creg(name)
                .ok_or_else(|| ConditionError::UnresolvedRegister(name.clone()))?;
            reg.bits().map(|clbit| lookup(&clbit)).collect::<Result<_, _>>()?
        }
    };

    Ok(ReadCondition {
        clbits: indices,
        value: condition.value,
    })
}

pub(crate) fn join(items: &[usize], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

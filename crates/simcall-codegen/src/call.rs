//! Emitted simulator calls and their text form.

use serde::{Deserialize, Serialize};

use crate::condition::{ReadCondition, join};
use crate::config::EmitConfig;
use crate::error::CodegenResult;

/// Header of a `for` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopHeader {
    /// Counting loop over `start..stop` by `step` (never zero).
    Range {
        /// Loop variable.
        variable: String,
        /// First value.
        start: i64,
        /// Exclusive bound.
        stop: i64,
        /// Increment.
        step: i64,
    },
    /// Loop over literal values.
    Values {
        /// Loop variable.
        variable: String,
        /// Values in iteration order.
        values: Vec<i64>,
    },
}

impl LoopHeader {
    /// The loop variable.
    pub fn variable(&self) -> &str {
        match self {
            LoopHeader::Range { variable, .. } | LoopHeader::Values { variable, .. } => variable,
        }
    }

    /// Render the part between the parentheses of `for (...)`.
    pub fn render(&self) -> String {
        match self {
            LoopHeader::Range {
                variable: v,
                start,
                stop,
                step,
            } => {
                let cmp = if *step > 0 { "<" } else { ">" };
                let incr = match step {
                    1 => format!("++{v}"),
                    -1 => format!("--{v}"),
                    n => format!("{v} += {n}"),
                };
                format!("int {v} = {start}; {v} {cmp} {stop}; {incr}")
            }
            LoopHeader::Values { variable, values } => {
                let values: Vec<_> = values.iter().map(ToString::to_string).collect();
                format!("int {variable} : {{{}}}", values.join(", "))
            }
        }
    }
}

/// One simulator call or block marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum SimCall {
    /// Declare the qubit count.
    SetNumQubits {
        /// Number of qubits.
        count: usize,
    },
    /// Declare the classical bit count.
    SetNumClbits {
        /// Number of classical bits.
        count: usize,
    },
    /// Apply a gate.
    Gate {
        /// Root gate name.
        name: String,
        /// Rendered parameters in declaration order.
        params: Vec<String>,
        /// Target qubits.
        targets: Vec<usize>,
        /// Controls that fire on 1.
        positive_controls: Vec<usize>,
        /// Controls that fire on 0.
        negative_controls: Vec<usize>,
    },
    /// Measure `qubits[k]` into `clbits[k]`.
    Measure {
        /// Measured qubits.
        qubits: Vec<usize>,
        /// Classical destinations.
        clbits: Vec<usize>,
    },
    /// Open a conditional block.
    If {
        /// Guard.
        condition: ReadCondition,
    },
    /// Switch to the else branch.
    Else,
    /// Open a while block.
    While {
        /// Guard, re-read before every iteration.
        condition: ReadCondition,
    },
    /// Open a for block.
    For {
        /// Loop header.
        header: LoopHeader,
    },
    /// Close the innermost block.
    End,
}

impl SimCall {
    /// Render without indentation.
    pub fn render(&self, simulator: &str) -> String {
        match self {
            SimCall::SetNumQubits { count } => format!("{simulator}.set_num_qubits({count});"),
            SimCall::SetNumClbits { count } => format!("{simulator}.set_num_clbits({count});"),
            SimCall::Gate {
                name,
                params,
                targets,
                positive_controls,
                negative_controls,
            } => {
                let mut args = params.clone();
                args.push(format!("{{{}}}", join(targets, ", ")));
                args.push(format!("{{{}}}", join(positive_controls, ", ")));
                args.push(format!("{{{}}}", join(negative_controls, ", ")));
                format!("{simulator}.gate_{name}({});", args.join(", "))
            }
            SimCall::Measure { qubits, clbits } => format!(
                "{simulator}.measure({{{}}}, {{{}}});",
                join(qubits, ","),
                join(clbits, ",")
            ),
            SimCall::If { condition } => format!("if ({}) {{", condition.render(simulator)),
            SimCall::Else => "} else {".into(),
            SimCall::While { condition } => format!("while ({}) {{", condition.render(simulator)),
            SimCall::For { header } => format!("for ({}) {{", header.render()),
            SimCall::End => "}".into(),
        }
    }
}

/// A call at its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmittedCall {
    /// Nesting depth, 0 at top level.
    pub depth: usize,
    /// The call.
    #[serde(flatten)]
    pub call: SimCall,
}

/// The complete output of one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Calls in emission order, starting with the two size declarations.
    pub calls: Vec<EmittedCall>,
}

impl Program {
    /// Number of qubits declared by the program.
    pub fn num_qubits(&self) -> usize {
        self.calls
            .iter()
            .find_map(|c| match c.call {
                SimCall::SetNumQubits { count } => Some(count),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Number of classical bits declared by the program.
    pub fn num_clbits(&self) -> usize {
        self.calls
            .iter()
            .find_map(|c| match c.call {
                SimCall::SetNumClbits { count } => Some(count),
                _ => None,
            })
            .unwrap_or(0)
    }

    /// Render as indented source text, one call per line.
    pub fn to_text(&self, config: &EmitConfig) -> String {
        let mut output = String::new();
        for emitted in &self.calls {
            let indent = " ".repeat(config.indent_width * emitted.depth);
            output.push_str(&indent);
            output.push_str(&emitted.call.render(&config.simulator));
            output.push('\n');
        }
        output
    }

    /// Serialize the call list as pretty-printed JSON.
    pub fn to_json(&self) -> CodegenResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i64, stop: i64, step: i64) -> String {
        LoopHeader::Range {
            variable: "i".into(),
            start,
            stop,
            step,
        }
        .render()
    }

    #[test]
    fn test_range_headers() {
        assert_eq!(range(0, 4, 1), "int i = 0; i < 4; ++i");
        assert_eq!(range(1, 10, 2), "int i = 1; i < 10; i += 2");
        assert_eq!(range(5, 0, -1), "int i = 5; i > 0; --i");
        assert_eq!(range(9, -1, -3), "int i = 9; i > -1; i += -3");
    }

    #[test]
    fn test_values_header() {
        let header = LoopHeader::Values {
            variable: "k".into(),
            values: vec![3, -1, 7],
        };
        assert_eq!(header.render(), "int k : {3, -1, 7}");
        assert_eq!(header.variable(), "k");
    }

    #[test]
    fn test_gate_rendering() {
        let call = SimCall::Gate {
            name: "rx".into(),
            params: vec!["0.5".into()],
            targets: vec![2],
            positive_controls: vec![0, 1],
            negative_controls: vec![],
        };
        assert_eq!(call.render("sim"), "sim.gate_rx(0.5, {2}, {0, 1}, {});");

        let call = SimCall::Gate {
            name: "x".into(),
            params: vec![],
            targets: vec![0],
            positive_controls: vec![],
            negative_controls: vec![],
        };
        assert_eq!(call.render("backend"), "backend.gate_x({0}, {}, {});");
    }

    #[test]
    fn test_measure_rendering() {
        let call = SimCall::Measure {
            qubits: vec![0, 2],
            clbits: vec![1, 0],
        };
        assert_eq!(call.render("sim"), "sim.measure({0,2}, {1,0});");
    }

    #[test]
    fn test_program_text_and_json() {
        let program = Program {
            calls: vec![
                EmittedCall {
                    depth: 0,
                    call: SimCall::SetNumQubits { count: 1 },
                },
                EmittedCall {
                    depth: 0,
                    call: SimCall::SetNumClbits { count: 0 },
                },
                EmittedCall {
                    depth: 0,
                    call: SimCall::For {
                        header: LoopHeader::Range {
                            variable: "i".into(),
                            start: 0,
                            stop: 2,
                            step: 1,
                        },
                    },
                },
                EmittedCall {
                    depth: 1,
                    call: SimCall::Gate {
                        name: "h".into(),
                        params: vec![],
                        targets: vec![0],
                        positive_controls: vec![],
                        negative_controls: vec![],
                    },
                },
                EmittedCall {
                    depth: 0,
                    call: SimCall::End,
                },
            ],
        };

        let config = EmitConfig::default().with_indent_width(2);
        assert_eq!(
            program.to_text(&config),
            "sim.set_num_qubits(1);\n\
             sim.set_num_clbits(0);\n\
             for (int i = 0; i < 2; ++i) {\n  \
             sim.gate_h({0}, {}, {});\n\
             }\n"
        );
        assert_eq!(program.num_qubits(), 1);

        let json = program.to_json().unwrap();
        let back: Program = serde_json::from_str(&json).unwrap();
        assert_eq!(back, program);
        assert!(json.contains("\"call\": \"gate\""));
    }
}

//! Syntax tree of the accepted `OpenQASM` subset.
//!
//! Only constructs with a circuit-tree counterpart have a node: register
//! declarations, gate calls with modifiers, measurement, the three
//! directives, and `if`/`while`/`for` blocks.

use serde::{Deserialize, Serialize};

/// A parsed source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// Header version as `major.minor`.
    pub version: String,
    pub statements: Vec<Statement>,
}

/// Which kind of bits a register holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegisterKind {
    Quantum,
    Classical,
}

/// The part of a register an operand names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    /// `q`
    All,
    /// `q[i]`
    Index(u32),
    /// `q[first:last]`, both ends included.
    Slice { first: u32, last: u32 },
}

/// A register operand: `q`, `q[2]` or `q[0:3]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operand {
    pub register: String,
    pub selection: Selection,
}

impl Operand {
    pub fn new(register: impl Into<String>, selection: Selection) -> Self {
        Self {
            register: register.into(),
            selection,
        }
    }

    /// Operand naming bit `index` of `register`.
    pub fn bit(register: impl Into<String>, index: u32) -> Self {
        Self::new(register, Selection::Index(index))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Statement {
    /// `include "file";`, accepted and ignored.
    Include(String),

    /// `qubit[n] q;`, `bit c;`, `qreg q[n];` or `creg c[n];`. A missing size is 1.
    Declare {
        kind: RegisterKind,
        name: String,
        size: u32,
    },

    Gate(GateCall),

    /// `measure q -> c;` or `c = measure q;`. `bits` is empty for a bare
    /// `measure q;`.
    Measure {
        qubits: Vec<Operand>,
        bits: Vec<Operand>,
    },

    /// `reset`, `barrier` or `delay`. An empty `barrier;` has no operands.
    Directive {
        kind: Directive,
        qubits: Vec<Operand>,
    },

    If {
        condition: Expression,
        then_body: Vec<Statement>,
        else_body: Option<Vec<Statement>>,
    },

    While {
        condition: Expression,
        body: Vec<Statement>,
    },

    /// `for [type] name in iterable body`
    For {
        variable: String,
        iterable: Iterable,
        body: Vec<Statement>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Directive {
    Reset,
    Barrier,
    /// Duration expression; the unit suffix is dropped.
    Delay(Expression),
}

/// `modifiers @ name(params) qubits;`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateCall {
    pub name: String,
    pub params: Vec<Expression>,
    pub qubits: Vec<Operand>,
    /// Outermost first.
    pub modifiers: Vec<Modifier>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Modifier {
    /// `ctrl(n) @`; `ctrl @` is `Ctrl(1)`.
    Ctrl(u32),
    /// `negctrl(n) @`
    NegCtrl(u32),
    Inv,
    Pow(Expression),
}

impl Modifier {
    /// Control qubits this modifier adds.
    pub fn num_controls(&self) -> u32 {
        match self {
            Modifier::Ctrl(n) | Modifier::NegCtrl(n) => *n,
            Modifier::Inv | Modifier::Pow(_) => 0,
        }
    }
}

/// Loop domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Iterable {
    /// `[start:end]` or `[start:step:end]`, `end` included.
    Range {
        start: Expression,
        step: Option<Expression>,
        end: Expression,
    },
    /// `{v0, v1, ...}`
    Values(Vec<Expression>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MathConstant {
    Pi,
    Tau,
    Euler,
}

impl MathConstant {
    pub fn value(self) -> f64 {
        match self {
            MathConstant::Pi => std::f64::consts::PI,
            MathConstant::Tau => std::f64::consts::TAU,
            MathConstant::Euler => std::f64::consts::E,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    BitAnd,
    BitOr,
    BitXor,
    LShift,
    RShift,
}

impl BinOp {
    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::BitOr => 3,
            BinOp::BitXor => 4,
            BinOp::BitAnd => 5,
            BinOp::Eq | BinOp::NotEq => 6,
            BinOp::Lt | BinOp::LtEq | BinOp::Gt | BinOp::GtEq => 7,
            BinOp::LShift | BinOp::RShift => 8,
            BinOp::Add | BinOp::Sub => 9,
            BinOp::Mul | BinOp::Div | BinOp::Mod => 10,
            BinOp::Pow => 11,
        }
    }
}

/// Parenthesized source expressions are kept as their inner node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    Int(i64),
    Float(f64),
    Bool(bool),
    Constant(MathConstant),
    /// A register, loop variable or free parameter name.
    Ident(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `sin(x)` and other built-in functions.
    Call {
        function: String,
        args: Vec<Expression>,
    },
    /// `c[i]`
    Index {
        register: String,
        index: Box<Expression>,
    },
}

impl Expression {
    /// Value of a constant numeric expression.
    #[allow(clippy::cast_precision_loss)]
    pub fn eval(&self) -> Option<f64> {
        match self {
            Expression::Int(v) => Some(*v as f64),
            Expression::Float(v) => Some(*v),
            Expression::Constant(c) => Some(c.value()),
            Expression::Unary {
                op: UnaryOp::Neg,
                operand,
            } => operand.eval().map(|v| -v),
            Expression::Binary { op, left, right } => {
                let (l, r) = (left.eval()?, right.eval()?);
                match op {
                    BinOp::Add => Some(l + r),
                    BinOp::Sub => Some(l - r),
                    BinOp::Mul => Some(l * r),
                    BinOp::Div => Some(l / r),
                    BinOp::Mod => Some(l % r),
                    BinOp::Pow => Some(l.powf(r)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// Value of a constant whole-number expression. Integer literals and
    /// their negations stay exact.
    #[allow(clippy::cast_possible_truncation)]
    pub fn eval_int(&self) -> Option<i64> {
        match self {
            Expression::Int(v) => Some(*v),
            Expression::Unary {
                op: UnaryOp::Neg,
                operand,
            } => operand.eval_int()?.checked_neg(),
            _ => {
                let v = self.eval()?;
                (v.fract() == 0.0 && v.abs() < 9.0e15).then_some(v as i64)
            }
        }
    }
}

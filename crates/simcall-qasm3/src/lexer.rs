//! Tokens of the accepted `OpenQASM` subset.

use std::fmt;

use logos::{Lexer, Logos, Skip};

use crate::error::{ParseError, ParseResult};

fn newline(lex: &mut Lexer<Token>) -> Skip {
    lex.extras += 1;
    Skip
}

fn block_comment(lex: &mut Lexer<Token>) -> Skip {
    lex.extras += lex.slice().matches('\n').count();
    Skip
}

fn string_body(lex: &mut Lexer<Token>) -> String {
    let quoted = lex.slice();
    quoted[1..quoted.len() - 1].to_string()
}

/// A token. `extras` counts the newlines consumed so far.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(extras = usize)]
#[logos(skip r"[ \t\r\f]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    /// Newlines and block comments, counted and skipped.
    #[allow(dead_code)]
    #[regex(r"\n", newline)]
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/", block_comment)]
    Trivia,

    // Header and declarations
    #[token("OPENQASM")]
    OpenQasm,
    #[token("include")]
    Include,
    #[token("qubit")]
    Qubit,
    #[token("bit")]
    Bit,
    #[token("qreg")]
    QReg,
    #[token("creg")]
    CReg,
    #[token("int")]
    Int,
    /// Reserved so that definitions are rejected rather than read as calls.
    #[token("gate")]
    Gate,

    // Quantum statements
    #[token("measure")]
    Measure,
    #[token("reset")]
    Reset,
    #[token("barrier")]
    Barrier,
    #[token("delay")]
    Delay,
    #[token("ctrl")]
    Ctrl,
    #[token("negctrl")]
    NegCtrl,
    #[token("inv")]
    Inv,
    #[token("pow")]
    Pow,
    #[token("U", priority = 3)]
    GateU,
    #[token("CX", priority = 3)]
    GateCX,

    // Control flow
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("for")]
    For,
    #[token("in")]
    In,

    // Values
    #[token("pi")]
    #[token("π")]
    Pi,
    #[token("tau")]
    #[token("τ")]
    Tau,
    #[token("euler")]
    Euler,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    FloatLiteral(f64),
    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    IntLiteral(u64),
    #[regex(r#""[^"]*""#, string_body)]
    StringLiteral(String),
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Arithmetic
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("**")]
    Power,

    // Comparison, logic and bits
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Not,
    #[token("&")]
    Ampersand,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<<")]
    LShift,
    #[token(">>")]
    RShift,

    // Punctuation
    #[token("=")]
    Eq,
    #[token("->")]
    Arrow,
    #[token("@")]
    At,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
}

impl Token {
    /// Source spelling of a token with fixed text.
    fn spelling(&self) -> Option<&'static str> {
        Some(match self {
            Token::OpenQasm => "OPENQASM",
            Token::Include => "include",
            Token::Qubit => "qubit",
            Token::Bit => "bit",
            Token::QReg => "qreg",
            Token::CReg => "creg",
            Token::Int => "int",
            Token::Gate => "gate",
            Token::Measure => "measure",
            Token::Reset => "reset",
            Token::Barrier => "barrier",
            Token::Delay => "delay",
            Token::Ctrl => "ctrl",
            Token::NegCtrl => "negctrl",
            Token::Inv => "inv",
            Token::Pow => "pow",
            Token::GateU => "U",
            Token::GateCX => "CX",
            Token::If => "if",
            Token::Else => "else",
            Token::While => "while",
            Token::For => "for",
            Token::In => "in",
            Token::Pi => "pi",
            Token::Tau => "tau",
            Token::Euler => "euler",
            Token::True => "true",
            Token::False => "false",
            Token::Plus => "+",
            Token::Minus => "-",
            Token::Star => "*",
            Token::Slash => "/",
            Token::Percent => "%",
            Token::Power => "**",
            Token::EqEq => "==",
            Token::NotEq => "!=",
            Token::Lt => "<",
            Token::LtEq => "<=",
            Token::Gt => ">",
            Token::GtEq => ">=",
            Token::And => "&&",
            Token::Or => "||",
            Token::Not => "!",
            Token::Ampersand => "&",
            Token::Pipe => "|",
            Token::Caret => "^",
            Token::LShift => "<<",
            Token::RShift => ">>",
            Token::Eq => "=",
            Token::Arrow => "->",
            Token::At => "@",
            Token::LParen => "(",
            Token::RParen => ")",
            Token::LBracket => "[",
            Token::RBracket => "]",
            Token::LBrace => "{",
            Token::RBrace => "}",
            Token::Semicolon => ";",
            Token::Colon => ":",
            Token::Comma => ",",
            Token::Trivia
            | Token::FloatLiteral(_)
            | Token::IntLiteral(_)
            | Token::StringLiteral(_)
            | Token::Identifier(_) => return None,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.spelling() {
            return f.write_str(text);
        }
        match self {
            Token::FloatLiteral(v) => write!(f, "{v}"),
            Token::IntLiteral(v) => write!(f, "{v}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Identifier(name) => f.write_str(name),
            _ => Ok(()),
        }
    }
}

/// A token with the 1-based line it starts on.
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub line: usize,
}

/// Split `source` into tokens, stopping at the first unrecognized character.
pub fn tokenize(source: &str) -> ParseResult<Vec<SpannedToken>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let line = lexer.extras + 1;
        match result {
            Ok(token) => tokens.push(SpannedToken { token, line }),
            Err(()) => {
                return Err(ParseError::InvalidToken {
                    line,
                    text: lexer.slice().to_string(),
                });
            }
        }
    }

    Ok(tokens)
}

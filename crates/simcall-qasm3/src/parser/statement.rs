//! Statement parsing for QASM3.

use super::Parser;
use crate::ast::{
    Directive, Expression, GateCall, Iterable, Modifier, Operand, RegisterKind, Selection,
    Statement,
};
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse a statement.
    pub(super) fn parse_statement(&mut self) -> ParseResult<Statement> {
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| ParseError::UnexpectedEnd("statement".into()))?;

        match token {
            Token::Include => self.parse_include(),
            Token::Qubit | Token::Bit => self.parse_declaration(),
            Token::QReg | Token::CReg => self.parse_legacy_declaration(),
            Token::Measure => self.parse_measure(),
            Token::Reset | Token::Barrier | Token::Delay => self.parse_directive(),
            Token::If => self.parse_if(),
            Token::While => self.parse_while(),
            Token::For => self.parse_for(),
            Token::Ctrl | Token::NegCtrl | Token::Inv | Token::Pow => {
                let modifiers = self.parse_modifiers()?;
                let name = self.parse_gate_name()?;
                self.parse_gate_call(name, modifiers)
            }
            Token::GateU | Token::GateCX => {
                let name = self.parse_gate_name()?;
                self.parse_gate_call(name, vec![])
            }
            Token::Identifier(_) => self.parse_identifier_statement(),
            other => {
                self.advance();
                Err(self.unexpected("statement", &other))
            }
        }
    }

    fn parse_include(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Include)?;
        let path = match self.advance() {
            Some(Token::StringLiteral(s)) => s,
            Some(other) => return Err(self.unexpected("string literal", &other)),
            None => return Err(ParseError::UnexpectedEnd("include path".into())),
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Include(path))
    }

    /// Parse `[n]` if present.
    fn parse_optional_size(&mut self) -> ParseResult<Option<u32>> {
        if self.consume(&Token::LBracket) {
            let size = self.parse_u32_literal()?;
            self.expect(Token::RBracket)?;
            Ok(Some(size))
        } else {
            Ok(None)
        }
    }

    /// `qubit[n] name;` or `bit[n] name;`
    fn parse_declaration(&mut self) -> ParseResult<Statement> {
        let kind = match self.advance() {
            Some(Token::Qubit) => RegisterKind::Quantum,
            _ => RegisterKind::Classical,
        };
        let size = self.parse_optional_size()?.unwrap_or(1);
        let name = self.parse_identifier()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Declare { kind, name, size })
    }

    /// `qreg name[n];` or `creg name[n];`
    fn parse_legacy_declaration(&mut self) -> ParseResult<Statement> {
        let kind = match self.advance() {
            Some(Token::QReg) => RegisterKind::Quantum,
            _ => RegisterKind::Classical,
        };
        let name = self.parse_identifier()?;
        let size = self.parse_optional_size()?.unwrap_or(1);
        self.expect(Token::Semicolon)?;
        Ok(Statement::Declare { kind, name, size })
    }

    /// `measure q;` or `measure q -> c;`
    fn parse_measure(&mut self) -> ParseResult<Statement> {
        self.expect(Token::Measure)?;
        let qubits = self.parse_operands()?;
        let bits = if self.consume(&Token::Arrow) {
            self.parse_operands()?
        } else {
            vec![]
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubits, bits })
    }

    /// `reset q;`, `barrier q;`, `barrier;` or `delay[duration unit] q;`.
    fn parse_directive(&mut self) -> ParseResult<Statement> {
        let kind = match self.advance() {
            Some(Token::Reset) => Directive::Reset,
            Some(Token::Barrier) => Directive::Barrier,
            _ => {
                self.expect(Token::LBracket)?;
                let duration = self.parse_expression()?;
                if matches!(self.peek(), Some(Token::Identifier(_))) {
                    self.advance();
                }
                self.expect(Token::RBracket)?;
                Directive::Delay(duration)
            }
        };
        let qubits = if matches!(kind, Directive::Barrier) && self.check(&Token::Semicolon) {
            vec![]
        } else {
            self.parse_operands()?
        };
        self.expect(Token::Semicolon)?;
        Ok(Statement::Directive { kind, qubits })
    }

    /// Parse `(condition)`.
    fn parse_condition(&mut self) -> ParseResult<Expression> {
        self.expect(Token::LParen)?;
        let condition = self.parse_expression()?;
        self.expect(Token::RParen)?;
        Ok(condition)
    }

    fn parse_if(&mut self) -> ParseResult<Statement> {
        self.expect(Token::If)?;
        let condition = self.parse_condition()?;
        let then_body = self.parse_block_or_statement()?;
        let else_body = if self.consume(&Token::Else) {
            Some(self.parse_block_or_statement()?)
        } else {
            None
        };

        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> ParseResult<Statement> {
        self.expect(Token::While)?;
        let condition = self.parse_condition()?;
        let body = self.parse_block_or_statement()?;
        Ok(Statement::While { condition, body })
    }

    fn parse_for(&mut self) -> ParseResult<Statement> {
        self.expect(Token::For)?;
        self.skip_loop_type()?;
        let variable = self.parse_identifier()?;
        self.expect(Token::In)?;

        let iterable = if self.consume(&Token::LBracket) {
            self.parse_range()?
        } else if self.consume(&Token::LBrace) {
            let values = self.parse_expression_list_until(&Token::RBrace)?;
            self.expect(Token::RBrace)?;
            Iterable::Values(values)
        } else {
            let found = self
                .advance()
                .ok_or_else(|| ParseError::UnexpectedEnd("loop range".into()))?;
            return Err(self.unexpected("'[' or '{'", &found));
        };

        let body = self.parse_block_or_statement()?;

        Ok(Statement::For {
            variable,
            iterable,
            body,
        })
    }

    /// Skip an optional loop variable type: `int`, `int[32]`, `uint[8]`.
    fn skip_loop_type(&mut self) -> ParseResult<()> {
        let typed = match self.peek() {
            Some(Token::Int) => true,
            Some(Token::Identifier(_)) => !matches!(self.peek_nth(1), Some(Token::In)),
            _ => false,
        };
        if typed {
            self.advance();
            self.parse_optional_size()?;
        }
        Ok(())
    }

    /// Parse the rest of `[start:end]` or `[start:step:end]` after the `[`.
    fn parse_range(&mut self) -> ParseResult<Iterable> {
        let start = self.parse_expression()?;
        self.expect(Token::Colon)?;
        let second = self.parse_expression()?;
        let (step, end) = if self.consume(&Token::Colon) {
            (Some(second), self.parse_expression()?)
        } else {
            (None, second)
        };
        self.expect(Token::RBracket)?;
        Ok(Iterable::Range { start, step, end })
    }

    /// Parse `ctrl @`, `negctrl(n) @`, `inv @` and `pow(e) @` prefixes.
    fn parse_modifiers(&mut self) -> ParseResult<Vec<Modifier>> {
        let mut modifiers = Vec::new();
        loop {
            let modifier = match self.peek() {
                Some(Token::Ctrl) => {
                    self.advance();
                    Modifier::Ctrl(self.parse_modifier_count()?)
                }
                Some(Token::NegCtrl) => {
                    self.advance();
                    Modifier::NegCtrl(self.parse_modifier_count()?)
                }
                Some(Token::Inv) => {
                    self.advance();
                    Modifier::Inv
                }
                Some(Token::Pow) => {
                    self.advance();
                    self.expect(Token::LParen)?;
                    let exponent = self.parse_expression()?;
                    self.expect(Token::RParen)?;
                    Modifier::Pow(exponent)
                }
                _ => break,
            };
            self.expect(Token::At)?;
            modifiers.push(modifier);
        }
        Ok(modifiers)
    }

    /// The `(n)` of a control modifier, 1 when absent.
    fn parse_modifier_count(&mut self) -> ParseResult<u32> {
        if self.consume(&Token::LParen) {
            let n = self.parse_u32_literal()?;
            self.expect(Token::RParen)?;
            Ok(n)
        } else {
            Ok(1)
        }
    }

    /// Parse a gate name, including the built-in `U` and `CX`.
    fn parse_gate_name(&mut self) -> ParseResult<String> {
        match self.advance() {
            Some(Token::Identifier(name)) => Ok(name),
            Some(Token::GateU) => Ok("U".into()),
            Some(Token::GateCX) => Ok("CX".into()),
            Some(other) => Err(self.unexpected("gate name", &other)),
            None => Err(ParseError::UnexpectedEnd("gate name".into())),
        }
    }

    /// A gate call, or `c = measure q;` when the name is followed by `=` or `[`.
    fn parse_identifier_statement(&mut self) -> ParseResult<Statement> {
        let name = self.parse_identifier()?;

        if self.check(&Token::Eq) || self.check(&Token::LBracket) {
            return self.parse_measure_assignment(name);
        }

        self.parse_gate_call(name, vec![])
    }

    /// `c = measure q;` and `c[i] = measure q[j];`. Any other right-hand side
    /// is rejected.
    fn parse_measure_assignment(&mut self, register: String) -> ParseResult<Statement> {
        let bits = vec![self.parse_operand_tail(register)?];
        self.expect(Token::Eq)?;
        self.expect(Token::Measure)?;
        let qubits = self.parse_operands()?;
        self.expect(Token::Semicolon)?;
        Ok(Statement::Measure { qubits, bits })
    }

    /// Parse the parameters and operands of a gate call.
    fn parse_gate_call(
        &mut self,
        name: String,
        modifiers: Vec<Modifier>,
    ) -> ParseResult<Statement> {
        let params = if self.consume(&Token::LParen) {
            let p = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            p
        } else {
            vec![]
        };

        let qubits = self.parse_operands()?;
        self.expect(Token::Semicolon)?;

        Ok(Statement::Gate(GateCall {
            name,
            params,
            qubits,
            modifiers,
        }))
    }

    /// Parse `{ statements }`.
    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        self.expect(Token::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&Token::RBrace) {
            if self.is_eof() {
                return Err(ParseError::UnexpectedEnd("'}'".into()));
            }
            stmts.push(self.parse_statement()?);
        }
        self.expect(Token::RBrace)?;
        Ok(stmts)
    }

    /// Parse a block or single statement.
    pub(super) fn parse_block_or_statement(&mut self) -> ParseResult<Vec<Statement>> {
        if self.check(&Token::LBrace) {
            self.parse_block()
        } else {
            Ok(vec![self.parse_statement()?])
        }
    }

    /// Comma-separated register operands.
    fn parse_operands(&mut self) -> ParseResult<Vec<Operand>> {
        let mut operands = vec![self.parse_operand()?];
        while self.consume(&Token::Comma) {
            operands.push(self.parse_operand()?);
        }
        Ok(operands)
    }

    fn parse_operand(&mut self) -> ParseResult<Operand> {
        let register = self.parse_identifier()?;
        self.parse_operand_tail(register)
    }

    /// `[i]` or `[a:b]` after a register name, if present.
    fn parse_operand_tail(&mut self, register: String) -> ParseResult<Operand> {
        if !self.consume(&Token::LBracket) {
            return Ok(Operand::new(register, Selection::All));
        }
        let first = self.parse_u32_literal()?;
        let selection = if self.consume(&Token::Colon) {
            Selection::Slice {
                first,
                last: self.parse_u32_literal()?,
            }
        } else {
            Selection::Index(first)
        };
        self.expect(Token::RBracket)?;
        Ok(Operand::new(register, selection))
    }
}

#[cfg(test)]
mod tests {
    use super::super::parse_ast;
    use crate::ast::{Directive, Iterable, Modifier, Operand, RegisterKind, Selection, Statement};
    use crate::error::ParseError;

    fn statements(body: &str) -> Vec<Statement> {
        parse_ast(&format!("OPENQASM 3.0;\n{body}")).unwrap().statements
    }

    #[test]
    fn test_declarations_default_to_one() {
        let stmts = statements("qubit q;\ncreg c[3];");
        assert!(matches!(
            &stmts[0],
            Statement::Declare { kind: RegisterKind::Quantum, name, size: 1 } if name == "q"
        ));
        assert!(matches!(
            &stmts[1],
            Statement::Declare { kind: RegisterKind::Classical, size: 3, .. }
        ));
    }

    #[test]
    fn test_for_range_with_step() {
        let stmts = statements("qubit[4] q;\nfor int i in [0:2:6] { h q[0]; }");
        match &stmts[1] {
            Statement::For {
                variable,
                iterable: Iterable::Range { start, step, end },
                body,
            } => {
                assert_eq!(variable, "i");
                assert_eq!(start.eval_int(), Some(0));
                assert_eq!(step.as_ref().and_then(|s| s.eval_int()), Some(2));
                assert_eq!(end.eval_int(), Some(6));
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected for loop, got {other:?}"),
        }
    }

    #[test]
    fn test_for_typed_variable_and_values() {
        let stmts = statements("for uint[8] k in {1, 5, 2} x q;");
        match &stmts[0] {
            Statement::For {
                variable,
                iterable: Iterable::Values(values),
                ..
            } => {
                assert_eq!(variable, "k");
                let values: Vec<_> = values.iter().filter_map(|v| v.eval_int()).collect();
                assert_eq!(values, [1, 5, 2]);
            }
            other => panic!("expected for loop, got {other:?}"),
        }
    }

    #[test]
    fn test_modifiers_in_source_order() {
        let stmts = statements("ctrl(2) @ negctrl @ rx(0.1) q[0], q[1], q[2], q[3];");
        let Statement::Gate(call) = &stmts[0] else {
            panic!("expected gate call");
        };
        assert_eq!(call.name, "rx");
        assert!(matches!(call.modifiers[0], Modifier::Ctrl(2)));
        assert!(matches!(call.modifiers[1], Modifier::NegCtrl(1)));
        assert_eq!(call.qubits.len(), 4);
        assert_eq!(call.qubits[3], Operand::bit("q", 3));
    }

    #[test]
    fn test_slices_and_delay() {
        let stmts = statements("delay[100ns] q[1:2];\nc[0:1] = measure q[0:1];");
        match &stmts[0] {
            Statement::Directive {
                kind: Directive::Delay(duration),
                qubits,
            } => {
                assert_eq!(duration.eval_int(), Some(100));
                assert_eq!(qubits[0].selection, Selection::Slice { first: 1, last: 2 });
            }
            other => panic!("expected delay, got {other:?}"),
        }
        assert!(matches!(&stmts[1], Statement::Measure { bits, .. } if bits.len() == 1));
    }

    #[test]
    fn test_empty_barrier() {
        let stmts = statements("barrier;\nreset q;");
        assert!(matches!(
            &stmts[0],
            Statement::Directive { kind: Directive::Barrier, qubits } if qubits.is_empty()
        ));
        assert!(matches!(
            &stmts[1],
            Statement::Directive { kind: Directive::Reset, qubits } if qubits.len() == 1
        ));
    }

    #[test]
    fn test_builtin_gate_names() {
        let stmts = statements("U(0, 0, pi) q[0];\nCX q[0], q[1];");
        assert!(matches!(&stmts[0], Statement::Gate(call) if call.name == "U"));
        assert!(matches!(&stmts[1], Statement::Gate(call) if call.name == "CX"));
    }

    #[test]
    fn test_unclosed_block() {
        assert!(parse_ast("OPENQASM 3.0;\nif (c[0]) { x q[0];").is_err());
    }

    #[test]
    fn test_gate_definition_is_unexpected() {
        match parse_ast("OPENQASM 3.0;\nqubit q;\ngate g a { h a; }") {
            Err(ParseError::UnexpectedToken { line, found, .. }) => {
                assert_eq!(line, 3);
                assert_eq!(found, "gate");
            }
            other => panic!("expected unexpected token, got {other:?}"),
        }
    }

    #[test]
    fn test_classical_assignment_is_unexpected() {
        match parse_ast("OPENQASM 3.0;\nbit[2] c;\nc[0] = 1;") {
            Err(ParseError::UnexpectedToken {
                expected, found, ..
            }) => {
                assert_eq!(expected, "measure");
                assert_eq!(found, "1");
            }
            other => panic!("expected unexpected token, got {other:?}"),
        }
    }
}

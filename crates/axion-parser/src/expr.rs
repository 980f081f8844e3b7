//! Statements and expressions.
//!
//! ```text
//! stmt:     if_stmt | while_stmt | func_def | 'return' [expr] | 'pass' | expr
//! if_stmt:  ('if' | 'elif') expr block [NEWLINE] ['elif' ... | 'else' block]
//! expr:     unary (binary_op unary)*
//! unary:    ('-' | 'not') unary | postfix
//! postfix:  atom ('(' args ')' | '.' ID)*
//! atom:     ID | literal | '(' expr ')' | lambda
//! ```

use crate::block::BlockType;
use crate::{ParseResult, Parser};
use axion_ast::{
    Binary, BinaryOp, Call, CallArg, Conditional, Literal, LiteralKind, Member, Name, NodeId,
    NodeKind, Paren, Return, Unary, UnaryOp, While,
};
use axion_diagnostics::BlameKind;
use axion_lexer::{Span, TokenKind};
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

impl<'b> Parser<'b> {
    pub(crate) fn parse_statement(&mut self) -> ParseResult<NodeId> {
        self.nested(|p| match p.peek().kind {
            TokenKind::If => p.parse_conditional(),
            TokenKind::While => p.parse_while(),
            TokenKind::Fn if matches!(p.stream.peek_nth(1).kind, TokenKind::Identifier(_)) => {
                p.parse_function_def()
            }
            TokenKind::Return => p.parse_return(),
            TokenKind::Pass => {
                let span = p.advance().span;
                p.alloc(NodeKind::Pass, span)
            }
            TokenKind::Indent => p.parse_stray_indent(),
            _ => p.parse_expr(),
        })
    }

    /// True when the next token cannot continue the current statement.
    fn at_statement_end(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Newline
                | TokenKind::Semi
                | TokenKind::End
                | TokenKind::Outdent
                | TokenKind::RBrace
                | TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::Comma
        )
    }

    // ========== Control flow ==========

    /// Parses `if` or `elif` and everything chained after it.
    fn parse_conditional(&mut self) -> ParseResult<NodeId> {
        let start = self.advance().span.start;
        let condition = self.parse_expr()?;
        let then_block = self.parse_block(BlockType::Default)?;

        if self.check(&TokenKind::Newline)
            && matches!(
                self.stream.peek_nth(1).kind,
                TokenKind::Elif | TokenKind::Else
            )
        {
            self.advance();
        }
        let else_branch = if self.check(&TokenKind::Elif) {
            Some(self.nested(|p| p.parse_conditional())?)
        } else if self.maybe_eat(&TokenKind::Else) {
            Some(self.parse_block(BlockType::Default)?)
        } else {
            None
        };

        let span = self.span_from(start);
        self.alloc(
            NodeKind::Conditional(Conditional {
                condition,
                then_block,
                else_branch,
            }),
            span,
        )
    }

    fn parse_while(&mut self) -> ParseResult<NodeId> {
        let start = self.advance().span.start;
        let condition = self.parse_expr()?;
        let body = self.parse_block(BlockType::Default)?;
        let span = self.span_from(start);
        self.alloc(NodeKind::While(While { condition, body }), span)
    }

    fn parse_return(&mut self) -> ParseResult<NodeId> {
        let start = self.advance().span.start;
        let value = if self.at_statement_end() {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let span = self.span_from(start);
        self.alloc(NodeKind::Return(Return { value }), span)
    }

    // ========== Operators ==========

    pub(crate) fn parse_expr(&mut self) -> ParseResult<NodeId> {
        self.parse_binary(BinaryOp::Assign.precedence())
    }

    /// An expression that stops before `=`, as in default values.
    pub(crate) fn parse_infix(&mut self) -> ParseResult<NodeId> {
        self.parse_binary(BinaryOp::Or.precedence())
    }

    /// Precedence climbing over [`BinaryOp::precedence`].
    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<NodeId> {
        let mut left = self.parse_unary()?;
        while let Some(op) = BinaryOp::from_token(&self.peek().kind) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.advance();
            let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
            let right = self.nested(|p| p.parse_binary(next_min))?;
            let span = self.span_of(left).merge(self.span_of(right));
            left = self.alloc(NodeKind::Binary(Binary { op, left, right }), span)?;
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> ParseResult<NodeId> {
        self.nested(|p| {
            let op = match p.peek().kind {
                TokenKind::Minus => UnaryOp::Neg,
                TokenKind::Not => UnaryOp::Not,
                _ => return p.parse_postfix(),
            };
            let start = p.advance().span.start;
            let operand = p.parse_unary()?;
            let span = p.span_from(start);
            p.alloc(NodeKind::Unary(Unary { op, operand }), span)
        })
    }

    fn parse_postfix(&mut self) -> ParseResult<NodeId> {
        let mut target = self.parse_atom()?;
        loop {
            if self.check(&TokenKind::LParen) {
                target = self.parse_call(target)?;
            } else if self.maybe_eat(&TokenKind::Dot) {
                let member = self.parse_name()?;
                let span = self.span_of(target).merge(self.span_of(member));
                target = self.alloc(NodeKind::Member(Member { target, member }), span)?;
            } else {
                break;
            }
        }
        Ok(target)
    }

    /// `target(arg, name = arg, ...)`
    fn parse_call(&mut self, target: NodeId) -> ParseResult<NodeId> {
        self.advance();
        let mut args = Vec::new();
        let mut named: FxHashSet<SmolStr> = FxHashSet::default();
        let mut seen_named = false;

        while !self.check(&TokenKind::RParen) && !self.stream.is_end() {
            let start = self.peek().span.start;
            let is_named = matches!(self.peek().kind, TokenKind::Identifier(_))
                && self.stream.peek_nth(1).kind == TokenKind::Eq;

            let name = if is_named {
                let name = self.parse_name()?;
                self.advance();
                if let NodeKind::Name(n) = self.ast.kind(name)? {
                    if !named.insert(n.name.clone()) {
                        let span = self.span_of(name);
                        self.blame(BlameKind::DuplicatedNamedArgument, span);
                    }
                }
                Some(name)
            } else {
                None
            };
            let value = self.parse_expr()?;
            let span = self.span_from(start);
            if name.is_some() {
                seen_named = true;
            } else if seen_named {
                self.blame(BlameKind::PositionalArgumentAfterNamed, span);
            }
            args.push(self.alloc(NodeKind::CallArg(CallArg { name, value }), span)?);

            if !self.maybe_eat(&TokenKind::Comma) {
                break;
            }
        }
        self.eat(TokenKind::RParen);

        let span = self.span_from(self.span_of(target).start);
        self.alloc(NodeKind::Call(Call { target, args }), span)
    }

    // ========== Atoms ==========

    pub(crate) fn parse_name(&mut self) -> ParseResult<NodeId> {
        let token = self.peek().clone();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                self.alloc(NodeKind::Name(Name::new(name)), token.span)
            }
            found => {
                self.blame_message(
                    BlameKind::ExpectedToken,
                    token.span,
                    format!("expected name, found {}", found),
                );
                self.alloc(NodeKind::Invalid, Span::point(token.span.start))
            }
        }
    }

    fn parse_atom(&mut self) -> ParseResult<NodeId> {
        let token = self.peek().clone();
        let literal = |kind: LiteralKind, text: &str| NodeKind::Literal(Literal::new(kind, text));

        let kind = match &token.kind {
            TokenKind::Identifier(_) => return self.parse_name(),
            TokenKind::LParen => return self.parse_paren(),
            TokenKind::Fn => return self.parse_lambda(),
            TokenKind::Integer(text) => literal(LiteralKind::Integer, text.as_str()),
            TokenKind::Float(text) => literal(LiteralKind::Float, text.as_str()),
            TokenKind::Str(text) => literal(LiteralKind::Str, text.as_str()),
            TokenKind::True => literal(LiteralKind::True, "true"),
            TokenKind::False => literal(LiteralKind::False, "false"),
            TokenKind::Nil => literal(LiteralKind::Nil, "nil"),
            TokenKind::Error => {
                // Already reported by the lexer.
                self.advance();
                return self.alloc(NodeKind::Invalid, token.span);
            }
            found => {
                self.blame_message(
                    BlameKind::InvalidSyntax,
                    token.span,
                    format!("expected expression, found {}", found),
                );
                if found.is_layout()
                    || matches!(
                        found,
                        TokenKind::RParen
                            | TokenKind::RBracket
                            | TokenKind::RBrace
                            | TokenKind::Semi
                            | TokenKind::Comma
                    )
                {
                    return self.alloc(NodeKind::Invalid, Span::point(token.span.start));
                }
                self.advance();
                return self.alloc(NodeKind::Invalid, token.span);
            }
        };
        self.advance();
        self.alloc(kind, token.span)
    }

    fn parse_paren(&mut self) -> ParseResult<NodeId> {
        let start = self.advance().span.start;
        let inner = self.parse_expr()?;
        self.eat(TokenKind::RParen);
        let span = self.span_from(start);
        self.alloc(NodeKind::Paren(Paren { inner }), span)
    }
}

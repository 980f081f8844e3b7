//! Type names.
//!
//! ```text
//! type:     atom ['|' type]
//! atom:     ID ('.' ID)* ['[' type (',' type)* ']']
//!         | '(' [type (',' type)*] ')'
//! ```

use crate::{ParseResult, Parser};
use axion_ast::{GenericType, Member, NodeId, NodeKind, SimpleType, Span, TupleType, UnionType};
use axion_diagnostics::BlameKind;
use axion_lexer::TokenKind;

impl<'b> Parser<'b> {
    pub(crate) fn parse_type(&mut self) -> ParseResult<NodeId> {
        self.nested(|p| {
            let left = p.parse_type_atom()?;
            if !p.maybe_eat(&TokenKind::Pipe) {
                return Ok(left);
            }
            let right = p.parse_type()?;
            let span = p.span_of(left).merge(p.span_of(right));
            p.alloc(NodeKind::UnionType(UnionType { left, right }), span)
        })
    }

    fn parse_type_atom(&mut self) -> ParseResult<NodeId> {
        match self.peek().kind {
            TokenKind::Identifier(_) => {}
            TokenKind::LParen => {
                let start = self.advance().span.start;
                let types = self.parse_type_args(&TokenKind::RParen)?;
                let span = self.span_from(start);
                return self.alloc(NodeKind::TupleType(TupleType { types }), span);
            }
            _ => {
                let found = self.peek().clone();
                self.blame_message(
                    BlameKind::ExpectedToken,
                    found.span,
                    format!("expected type name, found {}", found.kind),
                );
                return self.alloc(NodeKind::Invalid, Span::point(found.span.start));
            }
        }

        let mut name = self.parse_name()?;
        while self.maybe_eat(&TokenKind::Dot) {
            let member = self.parse_name()?;
            let span = self.span_of(name).merge(self.span_of(member));
            name = self.alloc(NodeKind::Member(Member { target: name, member }), span)?;
        }
        let span = self.span_of(name);
        let simple = self.alloc(NodeKind::SimpleType(SimpleType { name }), span)?;

        if !self.maybe_eat(&TokenKind::LBracket) {
            return Ok(simple);
        }
        let args = self.parse_type_args(&TokenKind::RBracket)?;
        let span = self.span_from(span.start);
        self.alloc(
            NodeKind::GenericType(GenericType {
                target: simple,
                args,
            }),
            span,
        )
    }

    /// Comma-separated types after an opening delimiter, through `closer`.
    fn parse_type_args(&mut self, closer: &TokenKind) -> ParseResult<Vec<NodeId>> {
        let mut types = Vec::new();
        while !self.check(closer) && !self.stream.is_end() {
            types.push(self.parse_type()?);
            if !self.maybe_eat(&TokenKind::Comma) {
                break;
            }
        }
        self.eat(closer.clone());
        Ok(types)
    }
}

//! Block parsing.
//!
//! ```text
//! block:
//!     ':' cascade
//!   | [':'] '{' cascade* '}'
//!   | [':'] NEWLINE INDENT cascade+ OUTDENT
//! cascade:
//!     stmt (';' stmt)* [';']
//! ```

use crate::{ParseResult, Parser};
use axion_ast::{Block, BlockForm, NodeId, NodeKind};
use axion_diagnostics::BlameKind;
use axion_lexer::TokenKind;
use tracing::trace;

/// Context a block is parsed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockType {
    #[default]
    Default,
    /// Body of an anonymous function; the indented form is rejected.
    Lambda,
}

/// Outcome of reading a block header.
enum BlockStart {
    /// One cascade on the header line.
    Line,
    /// Statements up to `terminator`.
    Delimited(BlockForm, TokenKind),
    /// No body could be found.
    Missing,
}

impl<'b> Parser<'b> {
    pub(crate) fn parse_block(&mut self, block_type: BlockType) -> ParseResult<NodeId> {
        self.nested(|p| p.parse_block_inner(block_type))
    }

    fn parse_block_inner(&mut self, block_type: BlockType) -> ParseResult<NodeId> {
        let start = self.peek().span.start;
        let mut items = Vec::new();

        let form = match self.parse_block_start() {
            BlockStart::Line => {
                self.parse_cascade(&mut items, &TokenKind::Newline)?;
                BlockForm::Colon
            }
            BlockStart::Delimited(form, terminator) => {
                self.parse_body(&mut items, &terminator)?;
                form
            }
            BlockStart::Missing => BlockForm::Colon,
        };
        trace!(?form, items = items.len(), "parsed block");

        let span = self.span_from(start);
        let block = self.alloc(NodeKind::Block(Block::new(items, form)), span)?;
        if form == BlockForm::Indent && block_type == BlockType::Lambda {
            self.blame(BlameKind::LambdaCannotHaveIndentedBody, span);
        }
        Ok(block)
    }

    /// Reads the optional colon and selects the block form.
    fn parse_block_start(&mut self) -> BlockStart {
        let colon = self.peek().span;
        let has_colon = self.maybe_eat(&TokenKind::Colon);

        if self.check(&TokenKind::Newline)
            && matches!(
                self.stream.peek_nth(1).kind,
                TokenKind::LBrace | TokenKind::Indent
            )
        {
            self.advance();
        }

        if self.check(&TokenKind::LBrace) {
            self.advance();
            if has_colon {
                self.blame(BlameKind::RedundantColonWithBraces, colon);
            }
            return BlockStart::Delimited(BlockForm::Brace, TokenKind::RBrace);
        }
        if self.check(&TokenKind::Indent) {
            self.advance();
            return BlockStart::Delimited(BlockForm::Indent, TokenKind::Outdent);
        }
        if self.check(&TokenKind::Newline) || self.stream.is_end() {
            self.blame(BlameKind::ExpectedBlockDeclaration, self.peek().span);
            return BlockStart::Missing;
        }
        if !has_colon {
            self.blame(BlameKind::ColonExpected, self.peek().span);
        }
        BlockStart::Line
    }

    /// Parses statements until `terminator`, consuming it. Reaching the end
    /// of input first is an error unless the block is closed by layout.
    pub(crate) fn parse_body(
        &mut self,
        items: &mut Vec<NodeId>,
        terminator: &TokenKind,
    ) -> ParseResult<()> {
        loop {
            while self.maybe_eat(&TokenKind::Newline) {}

            if self.check(terminator) {
                self.advance();
                break;
            }
            if self.stream.is_end() {
                if !matches!(terminator, TokenKind::Outdent | TokenKind::End) {
                    let at = self.stream.token().map(|t| t.span).unwrap_or_default();
                    self.blame(BlameKind::UnexpectedEndOfCode, at);
                }
                break;
            }

            self.parse_cascade(items, terminator)?;
            self.expect_statement_end(terminator);
        }
        Ok(())
    }

    /// One or more `;`-separated statements on a single line. Stops before
    /// the line break or `terminator`.
    pub(crate) fn parse_cascade(
        &mut self,
        items: &mut Vec<NodeId>,
        terminator: &TokenKind,
    ) -> ParseResult<()> {
        loop {
            items.push(self.parse_statement()?);
            if !self.maybe_eat(&TokenKind::Semi) {
                break;
            }
            if self.check(&TokenKind::Newline) || self.check(terminator) || self.stream.is_end()
            {
                break;
            }
        }
        Ok(())
    }

    /// Requires a line break after a statement. Closing a nested indented
    /// block counts as one.
    fn expect_statement_end(&mut self, terminator: &TokenKind) {
        if self.maybe_eat(&TokenKind::Newline) {
            self.panicking = false;
            return;
        }
        let closed_block = self
            .stream
            .token()
            .is_some_and(|t| t.kind == TokenKind::Outdent);
        if closed_block || self.check(terminator) || self.stream.is_end() {
            return;
        }

        let span = self.peek().span;
        self.blame(BlameKind::ExpectedNewline, span);
        self.stream.skip_line(terminator);
        self.panicking = false;
    }

    /// An indented suite where no block was expected.
    pub(crate) fn parse_stray_indent(&mut self) -> ParseResult<NodeId> {
        let start = self.peek().span.start;
        let indent = self.advance().span;
        self.blame(BlameKind::UnexpectedIndentation, indent);

        let mut items = Vec::new();
        self.parse_body(&mut items, &TokenKind::Outdent)?;
        let span = self.span_from(start);
        self.alloc(NodeKind::Block(Block::new(items, BlockForm::Indent)), span)
    }
}

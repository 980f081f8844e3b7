//! Axion Language Parser
//!
//! Recursive descent parser for Axion. Grammar violations never stop a parse:
//! they are recorded as blames in the caller's [`BlameList`] and the parser
//! continues with a best-effort node, so every pass returns a complete,
//! traversable tree. Only internal defects surface as [`ParseError`].

mod block;
mod expr;
mod params;
mod stream;
mod type_name;

pub use block::BlockType;
pub use stream::TokenStream;

use axion_ast::{Ast, AstError, Block, BlockForm, NodeId, NodeKind, Span};
use axion_diagnostics::{BlameKind, BlameList};
use axion_lexer::{Lexer, Token, TokenKind};
use thiserror::Error;
use tracing::debug;

/// Default bound on syntactic nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Nesting deeper than this is blamed and skipped.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Parser defects. Bad input is reported through blames instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("syntax tree invariant violated: {0}")]
    Tree(#[from] AstError),
}

pub type ParseResult<T> = Result<T, ParseError>;

/// A parsed compilation unit.
#[derive(Debug, Clone)]
pub struct Parse {
    pub ast: Ast,
    pub blames: BlameList,
}

impl Parse {
    pub fn has_errors(&self) -> bool {
        self.blames.has_errors()
    }
}

/// Lexes and parses `source` with the default configuration.
pub fn parse(source: &str) -> ParseResult<Parse> {
    parse_with(source, ParserConfig::default())
}

pub fn parse_with(source: &str, config: ParserConfig) -> ParseResult<Parse> {
    let (tokens, errors) = Lexer::new(source).tokenize();
    let mut blames = BlameList::new();
    blames.extend_from_lexer(&errors);
    let ast = parse_tokens(tokens, &mut blames, config)?;
    Ok(Parse { ast, blames })
}

/// Parses an already lexed unit, appending blames to `blames`.
pub fn parse_tokens(
    tokens: Vec<Token>,
    blames: &mut BlameList,
    config: ParserConfig,
) -> ParseResult<Ast> {
    let mut parser = Parser::new(tokens, blames, config);
    parser.parse_unit()?;
    Ok(parser.into_ast())
}

/// Parser state for one compilation unit.
pub struct Parser<'b> {
    stream: TokenStream,
    ast: Ast,
    blames: &'b mut BlameList,
    config: ParserConfig,
    depth: usize,
    /// Set after a syntax error; follow-on token errors are dropped until the
    /// next line.
    panicking: bool,
}

impl<'b> Parser<'b> {
    pub fn new(tokens: Vec<Token>, blames: &'b mut BlameList, config: ParserConfig) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            ast: Ast::new(),
            blames,
            config,
            depth: 0,
            panicking: false,
        }
    }

    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Parses the whole unit into a root block and installs it as the root.
    pub fn parse_unit(&mut self) -> ParseResult<NodeId> {
        let blames_before = self.blames.len();
        let mut items = Vec::new();
        self.parse_body(&mut items, &TokenKind::End)?;

        let end = self.stream.peek().span.end;
        let root = self.alloc(
            NodeKind::Block(Block::new(items, BlockForm::Root)),
            Span::new(0, end),
        )?;
        self.ast.set_root(root)?;

        debug!(
            nodes = self.ast.len(),
            blames = self.blames.len() - blames_before,
            "parsed unit"
        );
        Ok(root)
    }

    // ========== Helpers ==========

    fn alloc(&mut self, kind: NodeKind, span: Span) -> ParseResult<NodeId> {
        Ok(self.ast.alloc(kind, span)?)
    }

    fn span_of(&self, id: NodeId) -> Span {
        self.ast.span(id)
    }

    /// Span from `start` to the end of the last consumed token.
    fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.stream.prev_end().max(start))
    }

    fn peek(&self) -> &Token {
        self.stream.peek()
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.stream.check(kind)
    }

    fn maybe_eat(&mut self, kind: &TokenKind) -> bool {
        self.stream.maybe_eat(kind)
    }

    fn advance(&mut self) -> Token {
        self.stream.advance().clone()
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.panicking {
            let mut muted = BlameList::new();
            return self.stream.eat(&[kind], &mut muted);
        }
        self.stream.eat(&[kind], self.blames)
    }

    fn blame(&mut self, kind: BlameKind, span: Span) {
        self.blame_message(kind, span, kind.description());
    }

    fn blame_message(&mut self, kind: BlameKind, span: Span, message: impl Into<String>) {
        let follow_on = matches!(
            kind,
            BlameKind::ExpectedToken | BlameKind::ExpectedNewline | BlameKind::InvalidSyntax
        );
        if self.panicking && follow_on {
            return;
        }
        if matches!(
            kind,
            BlameKind::InvalidSyntax | BlameKind::MaxNestingDepthExceeded
        ) {
            self.panicking = true;
        }
        self.blames.blame_message(kind, span, message);
    }

    /// Runs `parse` one nesting level deeper. Past the configured limit the
    /// rest of the line is skipped and an `Invalid` node takes its place.
    fn nested(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<NodeId>,
    ) -> ParseResult<NodeId> {
        if self.depth >= self.config.max_depth {
            let at = self.peek().span;
            self.blame(BlameKind::MaxNestingDepthExceeded, at);
            self.stream.skip_line(&TokenKind::End);
            let span = self.span_from(at.start);
            return self.alloc(NodeKind::Invalid, span);
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axion_ast::dump::dump;

    pub(crate) fn parse_ok(source: &str) -> Parse {
        let parsed = parse(source).expect("parse defect");
        assert!(
            parsed.blames.is_empty(),
            "Blames: {:?}",
            parsed.blames.as_slice()
        );
        parsed.ast.validate().expect("invalid tree");
        parsed
    }

    pub(crate) fn dump_root(parsed: &Parse) -> String {
        dump(&parsed.ast, parsed.ast.root().expect("no root"))
    }

    pub(crate) fn kinds(parsed: &Parse) -> Vec<BlameKind> {
        parsed.blames.iter().map(|b| b.kind).collect()
    }

    #[test]
    fn test_empty_source() {
        let parsed = parse_ok("");
        assert_eq!(dump_root(&parsed), "(block:root)");
    }

    #[test]
    fn test_statements_on_lines() {
        let parsed = parse_ok("a\nb = 1\n\nc");
        assert_eq!(
            dump_root(&parsed),
            "(block:root (name a) (binary = (name b) (literal 1)) (name c))"
        );
    }

    #[test]
    fn test_missing_newline_between_statements() {
        let parsed = parse("a b\nc").unwrap();
        assert_eq!(kinds(&parsed), vec![BlameKind::ExpectedNewline]);
        assert_eq!(dump_root(&parsed), "(block:root (name a) (name c))");
        parsed.ast.validate().unwrap();
    }

    #[test]
    fn test_nesting_limit() {
        let source = format!("x = {}1{}\ny", "(".repeat(40), ")".repeat(40));
        let parsed = parse_with(&source, ParserConfig { max_depth: 16 }).unwrap();

        let overflows = parsed
            .blames
            .iter()
            .filter(|b| b.kind == BlameKind::MaxNestingDepthExceeded)
            .count();
        assert_eq!(overflows, 1);
        assert!(parsed.has_errors());
        parsed.ast.validate().unwrap();

        // Parsing resumes on the next line.
        let root = parsed.ast.root().unwrap();
        let items = parsed.ast.block_items(root);
        assert_eq!(items.len(), 2);
        assert_eq!(dump(&parsed.ast, items[1]), "(name y)");
    }

    fn assert_single_overflow(parsed: &Parse) {
        let overflows = parsed
            .blames
            .iter()
            .filter(|b| b.kind == BlameKind::MaxNestingDepthExceeded)
            .count();
        assert_eq!(overflows, 1, "{:?}", parsed.blames.as_slice());
        parsed.ast.validate().unwrap();

        let root = parsed.ast.root().unwrap();
        let items = parsed.ast.block_items(root);
        assert_eq!(dump(&parsed.ast, items[items.len() - 1]), "(name y)");
    }

    #[test]
    fn test_nesting_limit_on_operator_chains() {
        let config = ParserConfig { max_depth: 64 };

        let power = format!("x = {}a\ny", "a ** ".repeat(20_000));
        assert_single_overflow(&parse_with(&power, config).unwrap());

        let assign = format!("{}a\ny", "a = ".repeat(20_000));
        assert_single_overflow(&parse_with(&assign, config).unwrap());
    }

    #[test]
    fn test_nesting_limit_on_union_types() {
        let source = format!("fn f(a: {}Int): pass\ny", "Int | ".repeat(20_000));
        let parsed = parse_with(&source, ParserConfig { max_depth: 64 }).unwrap();
        assert_single_overflow(&parsed);
    }

    #[test]
    fn test_lexer_errors_become_blames() {
        let parsed = parse("f(a]").unwrap();
        let found = kinds(&parsed);
        assert!(found.contains(&BlameKind::MismatchedBracket));
        assert!(found.contains(&BlameKind::MismatchedParenthesis));
    }
}

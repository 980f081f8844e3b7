//! Token stream with lookahead.

use axion_diagnostics::{BlameKind, BlameList};
use axion_lexer::{Span, Token, TokenKind};

/// An ordered token sequence consumed strictly front to back.
///
/// The stream always ends with `End`; advancing past it is a no-op, so
/// lookahead never runs out.
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|t| t.kind == TokenKind::End) {
            let end = tokens.last().map(|t| t.span.end).unwrap_or(0);
            tokens.push(Token::new(TokenKind::End, Span::point(end)));
        }
        Self { tokens, pos: 0 }
    }

    /// The next unconsumed token.
    pub fn peek(&self) -> &Token {
        self.peek_nth(0)
    }

    /// The token `n` places after [`peek`](Self::peek), saturating at `End`.
    pub fn peek_nth(&self, n: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    /// The most recently consumed token, if any.
    pub fn token(&self) -> Option<&Token> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i])
    }

    /// End offset of the most recently consumed token.
    pub fn prev_end(&self) -> usize {
        self.token().map(|t| t.span.end).unwrap_or(0)
    }

    pub fn advance(&mut self) -> &Token {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
            &self.tokens[self.pos - 1]
        } else {
            &self.tokens[self.pos]
        }
    }

    /// Compares token types only; literal and name payloads are ignored.
    pub fn check(&self, kind: &TokenKind) -> bool {
        self.peek().is(kind)
    }

    pub fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().any(|k| self.check(k))
    }

    pub fn is_end(&self) -> bool {
        self.check(&TokenKind::End)
    }

    /// Consumes the next token if it matches `kind`.
    pub fn maybe_eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consumes the next token if it matches one of `kinds`; otherwise blames
    /// it and leaves it in place.
    pub fn eat(&mut self, kinds: &[TokenKind], blames: &mut BlameList) -> Option<Token> {
        if self.check_any(kinds) {
            return Some(self.advance().clone());
        }
        let expected = kinds
            .iter()
            .map(|k| format!("`{}`", k))
            .collect::<Vec<_>>()
            .join(" or ");
        let found = self.peek();
        blames.blame_message(
            BlameKind::ExpectedToken,
            found.span,
            format!("expected {}, found {}", expected, found.kind),
        );
        None
    }

    /// Skips to the end of the current line, stopping before `Newline`, `End`
    /// or `stop`.
    pub fn skip_line(&mut self, stop: &TokenKind) {
        while !self.check(&TokenKind::Newline) && !self.is_end() && !self.check(stop) {
            self.advance();
        }
    }
}

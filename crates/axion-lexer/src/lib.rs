//! Axion Language Lexer
//!
//! Tokenizes Axion source code. Raw tokens come from `logos`; a layout pass
//! then turns physical line structure into `Newline`, `Indent` and `Outdent`
//! markers and terminates the stream with a single `End` token, so the parser
//! can treat colon, brace and indentation bodies uniformly.

use logos::Logos;
use smol_str::SmolStr;
use std::fmt;
use std::ops::Range;

/// Source span representing a range in the source code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    /// Zero-width span at `offset`.
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// A token with its kind and source location
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is(&self, kind: &TokenKind) -> bool {
        self.kind.same_type(kind)
    }
}

/// All token types in the Axion language
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum TokenKind {
    // ========== Keywords ==========
    #[token("fn")]
    Fn,
    #[token("if")]
    If,
    #[token("elif")]
    Elif,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("return")]
    Return,
    #[token("pass")]
    Pass,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("nil")]
    Nil,
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,

    // ========== Operators ==========
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("**")]
    StarStar,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("=>")]
    FatArrow,
    #[token("|")]
    Pipe,
    #[token(".")]
    Dot,

    // ========== Delimiters ==========
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
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,

    // ========== Literals ==========
    #[regex(r"[0-9][0-9_]*", |lex| SmolStr::new(lex.slice()))]
    Integer(SmolStr),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*", |lex| SmolStr::new(lex.slice()))]
    Float(SmolStr),

    /// String literal, quotes included
    #[regex(r#""([^"\\\n]|\\.)*""#, |lex| SmolStr::new(lex.slice()))]
    #[regex(r#"'([^'\\\n]|\\.)*'"#, |lex| SmolStr::new(lex.slice()))]
    Str(SmolStr),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| SmolStr::new(lex.slice()))]
    Identifier(SmolStr),

    // ========== Layout ==========
    #[regex(r"\n|\r\n")]
    Newline,
    /// Produced by the layout pass when a line is indented deeper than the previous one
    Indent,
    /// Produced by the layout pass for every indentation level closed
    Outdent,
    /// End of input, always the last token of a stream
    End,

    // ========== Error ==========
    /// Lexer error - unrecognized character
    Error,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Fn => write!(f, "fn"),
            TokenKind::If => write!(f, "if"),
            TokenKind::Elif => write!(f, "elif"),
            TokenKind::Else => write!(f, "else"),
            TokenKind::While => write!(f, "while"),
            TokenKind::Return => write!(f, "return"),
            TokenKind::Pass => write!(f, "pass"),
            TokenKind::True => write!(f, "true"),
            TokenKind::False => write!(f, "false"),
            TokenKind::Nil => write!(f, "nil"),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::Not => write!(f, "not"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::StarStar => write!(f, "**"),
            TokenKind::Slash => write!(f, "/"),
            TokenKind::Percent => write!(f, "%"),
            TokenKind::Eq => write!(f, "="),
            TokenKind::EqEq => write!(f, "=="),
            TokenKind::NotEq => write!(f, "!="),
            TokenKind::Lt => write!(f, "<"),
            TokenKind::Gt => write!(f, ">"),
            TokenKind::LtEq => write!(f, "<="),
            TokenKind::GtEq => write!(f, ">="),
            TokenKind::FatArrow => write!(f, "=>"),
            TokenKind::Pipe => write!(f, "|"),
            TokenKind::Dot => write!(f, "."),
            TokenKind::LParen => write!(f, "("),
            TokenKind::RParen => write!(f, ")"),
            TokenKind::LBracket => write!(f, "["),
            TokenKind::RBracket => write!(f, "]"),
            TokenKind::LBrace => write!(f, "{{"),
            TokenKind::RBrace => write!(f, "}}"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::Colon => write!(f, ":"),
            TokenKind::Semi => write!(f, ";"),
            TokenKind::Integer(s) => write!(f, "integer `{}`", s),
            TokenKind::Float(s) => write!(f, "float `{}`", s),
            TokenKind::Str(s) => write!(f, "string {}", s),
            TokenKind::Identifier(s) => write!(f, "identifier `{}`", s),
            TokenKind::Newline => write!(f, "newline"),
            TokenKind::Indent => write!(f, "indentation"),
            TokenKind::Outdent => write!(f, "end of indentation"),
            TokenKind::End => write!(f, "end of code"),
            TokenKind::Error => write!(f, "error"),
        }
    }
}

impl TokenKind {
    /// Compares token types, ignoring the text carried by literals and names.
    pub fn same_type(&self, other: &TokenKind) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }

    /// Check if this token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Fn
                | TokenKind::If
                | TokenKind::Elif
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Return
                | TokenKind::Pass
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Nil
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
        )
    }

    /// Check if this token is a layout marker
    pub fn is_layout(&self) -> bool {
        matches!(
            self,
            TokenKind::Newline | TokenKind::Indent | TokenKind::Outdent | TokenKind::End
        )
    }

    fn closer_of(&self) -> Option<TokenKind> {
        match self {
            TokenKind::LParen => Some(TokenKind::RParen),
            TokenKind::LBracket => Some(TokenKind::RBracket),
            TokenKind::LBrace => Some(TokenKind::RBrace),
            _ => None,
        }
    }
}

/// Family of a paired delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Paren,
    Bracket,
    Brace,
}

impl Delimiter {
    fn of(kind: &TokenKind) -> Option<Delimiter> {
        match kind {
            TokenKind::LParen | TokenKind::RParen => Some(Delimiter::Paren),
            TokenKind::LBracket | TokenKind::RBracket => Some(Delimiter::Bracket),
            TokenKind::LBrace | TokenKind::RBrace => Some(Delimiter::Brace),
            _ => None,
        }
    }

    pub fn opener(&self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub fn closer(&self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

/// Lexer error type with detailed error messages
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexerError {
    #[error("Unexpected character '{1}' at position {0}")]
    UnexpectedCharacter(usize, char),

    #[error("Indentation mixes tabs and spaces at position {0}")]
    MixedIndentation(usize),

    #[error("Dedent at position {0} does not match any outer indentation level")]
    InconsistentDedent(usize),

    #[error("Unclosed '{}' at position {}", .delimiter.opener(), .span.start)]
    UnclosedDelimiter { delimiter: Delimiter, span: Span },

    #[error("Unmatched '{}' at position {}", .delimiter.closer(), .span.start)]
    UnmatchedDelimiter { delimiter: Delimiter, span: Span },
}

impl LexerError {
    pub fn span(&self) -> Span {
        match self {
            LexerError::UnexpectedCharacter(pos, c) => Span::new(*pos, *pos + c.len_utf8()),
            LexerError::MixedIndentation(pos) | LexerError::InconsistentDedent(pos) => {
                Span::point(*pos)
            }
            LexerError::UnclosedDelimiter { span, .. }
            | LexerError::UnmatchedDelimiter { span, .. } => *span,
        }
    }
}

/// Lexer for Axion source code
pub struct Lexer<'src> {
    source: &'src str,
    inner: logos::Lexer<'src, TokenKind>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            inner: TokenKind::lexer(source),
        }
    }

    /// Get the source code being lexed
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Tokenize the entire source, including layout markers and the final `End`.
    pub fn tokenize(self) -> (Vec<Token>, Vec<LexerError>) {
        let source = self.source;
        let mut layout = Layout::new(source);

        for (result, range) in self.inner.spanned() {
            let span = Span::from(range);
            match result {
                Ok(kind) => layout.feed(kind, span),
                Err(_) => {
                    let bad_char = source[span.start..].chars().next().unwrap_or('?');
                    layout
                        .errors
                        .push(LexerError::UnexpectedCharacter(span.start, bad_char));
                    layout.feed(TokenKind::Error, span);
                }
            }
        }

        layout.finish()
    }
}

/// Indentation bookkeeping for one brace nesting level. A fresh context has
/// no levels until the first line inside it sets the base width.
type IndentContext = Vec<usize>;

struct Layout<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    errors: Vec<LexerError>,
    contexts: Vec<IndentContext>,
    delimiters: Vec<(Delimiter, Span)>,
    at_line_start: bool,
}

impl<'src> Layout<'src> {
    fn new(source: &'src str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            contexts: vec![vec![0]],
            delimiters: Vec::new(),
            at_line_start: true,
        }
    }

    /// Newlines and indentation only matter outside `(` and `[`.
    fn significant(&self) -> bool {
        matches!(self.delimiters.last(), None | Some((Delimiter::Brace, _)))
    }

    fn feed(&mut self, kind: TokenKind, span: Span) {
        if kind == TokenKind::Newline {
            if self.significant() {
                if !self.at_line_start {
                    self.tokens.push(Token::new(TokenKind::Newline, span));
                }
                self.at_line_start = true;
            }
            return;
        }

        let is_closer = matches!(
            kind,
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace
        );
        if self.at_line_start {
            self.at_line_start = false;
            if is_closer {
                self.close(&kind, span);
            }
            self.indent_line(span.start);
        } else if is_closer {
            self.close(&kind, span);
        }

        if let Some(delimiter) = kind.closer_of().and_then(|c| Delimiter::of(&c)) {
            self.delimiters.push((delimiter, span));
            if delimiter == Delimiter::Brace {
                self.contexts.push(IndentContext::new());
            }
        }
        self.tokens.push(Token::new(kind, span));
    }

    fn indent_line(&mut self, offset: usize) {
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        let prefix = &self.source[line_start..offset];
        if prefix.contains(' ') && prefix.contains('\t') {
            self.errors.push(LexerError::MixedIndentation(line_start));
        }
        let width = prefix.chars().filter(|c| *c == ' ' || *c == '\t').count();

        let Some(context) = self.contexts.last_mut() else {
            return;
        };
        let Some(&top) = context.last() else {
            context.push(width);
            return;
        };
        if width > top {
            context.push(width);
            self.tokens
                .push(Token::new(TokenKind::Indent, Span::point(offset)));
            return;
        }
        let mut closed = 0;
        while context.len() > 1 && context.last().is_some_and(|&w| width < w) {
            context.pop();
            closed += 1;
        }
        if context.last().is_some_and(|&w| w != width) {
            self.errors.push(LexerError::InconsistentDedent(offset));
        }
        for _ in 0..closed {
            self.tokens
                .push(Token::new(TokenKind::Outdent, Span::point(offset)));
        }
    }

    fn close(&mut self, kind: &TokenKind, span: Span) {
        let Some(delimiter) = Delimiter::of(kind) else {
            return;
        };
        if !self.delimiters.iter().any(|(d, _)| *d == delimiter) {
            self.errors
                .push(LexerError::UnmatchedDelimiter { delimiter, span });
            return;
        }
        while let Some((open, open_span)) = self.delimiters.pop() {
            if open == Delimiter::Brace {
                self.close_context(span.start);
            }
            if open == delimiter {
                break;
            }
            self.errors.push(LexerError::UnclosedDelimiter {
                delimiter: open,
                span: open_span,
            });
        }
    }

    fn close_context(&mut self, offset: usize) {
        if self.contexts.len() <= 1 {
            return;
        }
        if let Some(context) = self.contexts.pop() {
            for _ in 1..context.len() {
                self.tokens
                    .push(Token::new(TokenKind::Outdent, Span::point(offset)));
            }
        }
    }

    fn finish(mut self) -> (Vec<Token>, Vec<LexerError>) {
        let end = self.source.len();
        if !self.at_line_start {
            self.tokens
                .push(Token::new(TokenKind::Newline, Span::point(end)));
        }
        for (delimiter, span) in std::mem::take(&mut self.delimiters) {
            self.errors
                .push(LexerError::UnclosedDelimiter { delimiter, span });
        }
        while let Some(context) = self.contexts.pop() {
            for _ in 1..context.len() {
                self.tokens
                    .push(Token::new(TokenKind::Outdent, Span::point(end)));
            }
        }
        self.tokens.push(Token::new(TokenKind::End, Span::point(end)));
        (self.tokens, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, errors) = Lexer::new(source).tokenize();
        assert!(errors.is_empty(), "Errors: {:?}", errors);
        tokens.into_iter().map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> TokenKind {
        TokenKind::Identifier(SmolStr::new(s))
    }

    #[test]
    fn test_keywords_and_operators() {
        let k = kinds("fn if elif else ** * => = ==");
        assert_eq!(
            k,
            vec![
                TokenKind::Fn,
                TokenKind::If,
                TokenKind::Elif,
                TokenKind::Else,
                TokenKind::StarStar,
                TokenKind::Star,
                TokenKind::FatArrow,
                TokenKind::Eq,
                TokenKind::EqEq,
                TokenKind::Newline,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_literals() {
        let k = kinds("42 3.14 'a' \"b\"");
        assert!(matches!(&k[0], TokenKind::Integer(s) if s == "42"));
        assert!(matches!(&k[1], TokenKind::Float(s) if s == "3.14"));
        assert!(matches!(&k[2], TokenKind::Str(s) if s == "'a'"));
        assert!(matches!(&k[3], TokenKind::Str(s) if s == "\"b\""));
    }

    #[test]
    fn test_indentation_block() {
        let k = kinds("if a:\n    b\n    c\nd");
        assert_eq!(
            k,
            vec![
                TokenKind::If,
                ident("a"),
                TokenKind::Colon,
                TokenKind::Newline,
                TokenKind::Indent,
                ident("b"),
                TokenKind::Newline,
                ident("c"),
                TokenKind::Newline,
                TokenKind::Outdent,
                ident("d"),
                TokenKind::Newline,
                TokenKind::End,
            ]
        );
    }

    #[test]
    fn test_outdents_flushed_at_end() {
        let k = kinds("if a:\n  if b:\n    c");
        let tail: Vec<_> = k.iter().rev().take(4).cloned().collect();
        assert_eq!(
            tail,
            vec![
                TokenKind::End,
                TokenKind::Outdent,
                TokenKind::Outdent,
                TokenKind::Newline
            ]
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_skipped() {
        let k = kinds("a\n\n   # comment\n\nb");
        assert_eq!(
            k,
            vec![
                ident("a"),
                TokenKind::Newline,
                ident("b"),
                TokenKind::Newline,
                TokenKind::End
            ]
        );
    }

    #[test]
    fn test_brace_context_has_own_indentation() {
        let k = kinds("fn f() {\n    a\n    b\n}");
        assert!(!k.contains(&TokenKind::Indent));
        assert!(!k.contains(&TokenKind::Outdent));
        assert_eq!(k.iter().filter(|t| **t == TokenKind::Newline).count(), 4);
    }

    #[test]
    fn test_nested_indentation_inside_braces() {
        let k = kinds("{\n  if a:\n    b\n  c\n}");
        assert_eq!(k.iter().filter(|t| **t == TokenKind::Indent).count(), 1);
        assert_eq!(k.iter().filter(|t| **t == TokenKind::Outdent).count(), 1);
    }

    #[test]
    fn test_newlines_inside_parens_are_insignificant() {
        let k = kinds("f(a,\n      b)");
        assert_eq!(
            k,
            vec![
                ident("f"),
                TokenKind::LParen,
                ident("a"),
                TokenKind::Comma,
                ident("b"),
                TokenKind::RParen,
                TokenKind::Newline,
                TokenKind::End
            ]
        );
    }

    #[test]
    fn test_mismatched_delimiters() {
        let (_, errors) = Lexer::new("f(a]").tokenize();
        assert!(errors.iter().any(|e| matches!(
            e,
            LexerError::UnmatchedDelimiter {
                delimiter: Delimiter::Bracket,
                ..
            }
        )));
        assert!(errors.iter().any(|e| matches!(
            e,
            LexerError::UnclosedDelimiter {
                delimiter: Delimiter::Paren,
                ..
            }
        )));
    }

    #[test]
    fn test_inconsistent_dedent() {
        let (_, errors) = Lexer::new("if a:\n    b\n  c").tokenize();
        assert_eq!(errors, vec![LexerError::InconsistentDedent(14)]);
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, errors) = Lexer::new("a $ b").tokenize();
        assert_eq!(errors, vec![LexerError::UnexpectedCharacter(2, '$')]);
        assert_eq!(tokens[1].kind, TokenKind::Error);
    }
}

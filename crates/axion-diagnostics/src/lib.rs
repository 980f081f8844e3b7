//! Axion Diagnostics - blame collection for the Axion front end.
//!
//! Parsing never stops at a grammar violation. Instead every routine records a
//! [`Blame`] into the compilation unit's [`BlameList`] and continues on a
//! recovery path. Callers inspect the list after a full pass to decide whether
//! the tree is fit for rendering.
//!
//! - `Blame` - kind, severity, message and the source span it is anchored to
//! - `BlameKind` - the fixed taxonomy; equivalent conditions share one tag
//! - `BlameSeverity` - Info, Warning and Error levels
//! - `BlameList` - append-only, ordered sink
//! - [`render`] - terminal report rendering

pub mod render;
pub mod span;

use axion_lexer::{Delimiter, LexerError, Span};
use std::fmt;

/// The severity level of a blame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum BlameSeverity {
    /// Informational, never affects validity.
    Info,
    /// Suspicious but well-formed input.
    Warning,
    /// The tree is a best-effort reconstruction and must not be trusted.
    #[default]
    Error,
}

impl BlameSeverity {
    /// Returns the text prefix for this severity level.
    pub fn prefix(&self) -> &'static str {
        match self {
            BlameSeverity::Info => "info",
            BlameSeverity::Warning => "warning",
            BlameSeverity::Error => "error",
        }
    }

    /// Returns the underline character for this severity level.
    pub fn underline_char(&self) -> char {
        match self {
            BlameSeverity::Info => '-',
            BlameSeverity::Warning => '~',
            BlameSeverity::Error => '^',
        }
    }

    /// Returns true if this severity level invalidates the tree.
    pub fn is_error(&self) -> bool {
        matches!(self, BlameSeverity::Error)
    }
}

/// The closed taxonomy of diagnosable conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlameKind {
    // Lexical
    InvalidCharacter,
    MixedIndentation,
    InconsistentIndentation,
    MismatchedParenthesis,
    MismatchedBracket,
    MismatchedBrace,

    // Blocks and layout
    ColonExpected,
    ExpectedBlockDeclaration,
    RedundantColonWithBraces,
    UnexpectedEndOfCode,
    LambdaCannotHaveIndentedBody,
    UnexpectedIndentation,
    ExpectedNewline,

    // Parameter lists
    DuplicatedParameter,
    ExpectedDefaultParameterValue,
    NamedArgumentsMustFollowStar,
    CannotHaveMoreThanOneListParameter,
    CannotHaveMoreThanOneMapParameter,
    MapParameterMustBeLast,
    ListParameterAfterKeywordOnlyMarker,

    // Expressions
    DuplicatedNamedArgument,
    ExpectedToken,
    InvalidSyntax,
    PositionalArgumentAfterNamed,

    // Limits
    MaxNestingDepthExceeded,
}

impl BlameKind {
    pub fn default_severity(&self) -> BlameSeverity {
        match self {
            BlameKind::RedundantColonWithBraces | BlameKind::MixedIndentation => {
                BlameSeverity::Warning
            }
            BlameKind::InconsistentIndentation => BlameSeverity::Warning,
            _ => BlameSeverity::Error,
        }
    }

    /// Stable code for grouping and filtering, `AX<category><number>`.
    pub fn code(&self) -> &'static str {
        match self {
            BlameKind::InvalidCharacter => "AX1001",
            BlameKind::MixedIndentation => "AX1002",
            BlameKind::InconsistentIndentation => "AX1003",
            BlameKind::MismatchedParenthesis => "AX1004",
            BlameKind::MismatchedBracket => "AX1005",
            BlameKind::MismatchedBrace => "AX1006",
            BlameKind::ColonExpected => "AX2001",
            BlameKind::ExpectedBlockDeclaration => "AX2002",
            BlameKind::RedundantColonWithBraces => "AX2003",
            BlameKind::UnexpectedEndOfCode => "AX2004",
            BlameKind::LambdaCannotHaveIndentedBody => "AX2005",
            BlameKind::UnexpectedIndentation => "AX2006",
            BlameKind::ExpectedNewline => "AX2007",
            BlameKind::DuplicatedParameter => "AX3001",
            BlameKind::ExpectedDefaultParameterValue => "AX3002",
            BlameKind::NamedArgumentsMustFollowStar => "AX3003",
            BlameKind::CannotHaveMoreThanOneListParameter => "AX3004",
            BlameKind::CannotHaveMoreThanOneMapParameter => "AX3005",
            BlameKind::MapParameterMustBeLast => "AX3006",
            BlameKind::ListParameterAfterKeywordOnlyMarker => "AX3007",
            BlameKind::DuplicatedNamedArgument => "AX4001",
            BlameKind::ExpectedToken => "AX4002",
            BlameKind::InvalidSyntax => "AX4003",
            BlameKind::PositionalArgumentAfterNamed => "AX4004",
            BlameKind::MaxNestingDepthExceeded => "AX9001",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BlameKind::InvalidCharacter => "invalid character",
            BlameKind::MixedIndentation => "mixed tabs and spaces in indentation",
            BlameKind::InconsistentIndentation => "inconsistent indentation",
            BlameKind::MismatchedParenthesis => "mismatched parenthesis",
            BlameKind::MismatchedBracket => "mismatched bracket",
            BlameKind::MismatchedBrace => "mismatched brace",
            BlameKind::ColonExpected => "expected ':'",
            BlameKind::ExpectedBlockDeclaration => "expected block declaration",
            BlameKind::RedundantColonWithBraces => "redundant colon with braces",
            BlameKind::UnexpectedEndOfCode => "unexpected end of code",
            BlameKind::LambdaCannotHaveIndentedBody => "lambda cannot have indented body",
            BlameKind::UnexpectedIndentation => "unexpected indentation",
            BlameKind::ExpectedNewline => "expected end of line",
            BlameKind::DuplicatedParameter => "duplicated parameter",
            BlameKind::ExpectedDefaultParameterValue => "expected default parameter value",
            BlameKind::NamedArgumentsMustFollowStar => "named arguments must follow '*'",
            BlameKind::CannotHaveMoreThanOneListParameter => {
                "cannot have more than one list parameter"
            }
            BlameKind::CannotHaveMoreThanOneMapParameter => {
                "cannot have more than one map parameter"
            }
            BlameKind::MapParameterMustBeLast => "map parameter must be the last parameter",
            BlameKind::ListParameterAfterKeywordOnlyMarker => {
                "list parameter cannot follow a bare '*'"
            }
            BlameKind::DuplicatedNamedArgument => "duplicated named argument",
            BlameKind::ExpectedToken => "unexpected token",
            BlameKind::InvalidSyntax => "invalid syntax",
            BlameKind::PositionalArgumentAfterNamed => {
                "positional argument cannot follow a named argument"
            }
            BlameKind::MaxNestingDepthExceeded => "maximum nesting depth exceeded",
        }
    }
}

impl fmt::Display for BlameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// A recorded, non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blame {
    pub kind: BlameKind,
    pub severity: BlameSeverity,
    pub message: String,
    /// The node or token this blame points at.
    pub span: Span,
}

impl Blame {
    pub fn new(kind: BlameKind, span: Span) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: kind.description().to_string(),
            span,
        }
    }

    pub fn with_severity(mut self, severity: BlameSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Blame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}[{}]: {} at {}..{}",
            self.severity.prefix(),
            self.kind.code(),
            self.message,
            self.span.start,
            self.span.end
        )
    }
}

impl From<&LexerError> for Blame {
    fn from(error: &LexerError) -> Self {
        let kind = match error {
            LexerError::UnexpectedCharacter(..) => BlameKind::InvalidCharacter,
            LexerError::MixedIndentation(_) => BlameKind::MixedIndentation,
            LexerError::InconsistentDedent(_) => BlameKind::InconsistentIndentation,
            LexerError::UnclosedDelimiter { delimiter, .. }
            | LexerError::UnmatchedDelimiter { delimiter, .. } => match delimiter {
                Delimiter::Paren => BlameKind::MismatchedParenthesis,
                Delimiter::Bracket => BlameKind::MismatchedBracket,
                Delimiter::Brace => BlameKind::MismatchedBrace,
            },
        };
        Blame::new(kind, error.span()).with_message(error.to_string())
    }
}

/// Append-only, ordered collection of blames for one compilation unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlameList {
    blames: Vec<Blame>,
}

impl BlameList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a blame of `kind` at its default severity.
    pub fn blame(&mut self, kind: BlameKind, anchor: Span) {
        self.push(Blame::new(kind, anchor));
    }

    /// Records a blame of `kind` with an explicit severity.
    pub fn blame_with(&mut self, kind: BlameKind, anchor: Span, severity: BlameSeverity) {
        self.push(Blame::new(kind, anchor).with_severity(severity));
    }

    /// Records a blame of `kind` with a more specific message.
    pub fn blame_message(&mut self, kind: BlameKind, anchor: Span, message: impl Into<String>) {
        self.push(Blame::new(kind, anchor).with_message(message));
    }

    pub fn push(&mut self, blame: Blame) {
        self.blames.push(blame);
    }

    pub fn extend_from_lexer(&mut self, errors: &[LexerError]) {
        self.blames.extend(errors.iter().map(Blame::from));
    }

    pub fn len(&self) -> usize {
        self.blames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blames.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Blame> {
        self.blames.iter()
    }

    pub fn as_slice(&self) -> &[Blame] {
        &self.blames
    }

    pub fn into_vec(self) -> Vec<Blame> {
        self.blames
    }

    /// Returns true if any error-severity blame was recorded.
    pub fn has_errors(&self) -> bool {
        self.blames.iter().any(Blame::is_error)
    }

    pub fn count(&self, severity: BlameSeverity) -> usize {
        self.blames.iter().filter(|b| b.severity == severity).count()
    }

    pub fn of_kind(&self, kind: BlameKind) -> impl Iterator<Item = &Blame> {
        self.blames.iter().filter(move |b| b.kind == kind)
    }
}

impl<'a> IntoIterator for &'a BlameList {
    type Item = &'a Blame;
    type IntoIter = std::slice::Iter<'a, Blame>;

    fn into_iter(self) -> Self::IntoIter {
        self.blames.iter()
    }
}

impl fmt::Display for BlameList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for blame in &self.blames {
            writeln!(f, "{}", blame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blame_severity() {
        assert_eq!(BlameSeverity::Error.prefix(), "error");
        assert_eq!(BlameSeverity::Warning.prefix(), "warning");
        assert!(BlameSeverity::Error.is_error());
        assert!(!BlameSeverity::Warning.is_error());
        assert!(BlameSeverity::Info < BlameSeverity::Error);
    }

    #[test]
    fn test_default_severities() {
        assert_eq!(
            BlameKind::RedundantColonWithBraces.default_severity(),
            BlameSeverity::Warning
        );
        assert_eq!(
            BlameKind::DuplicatedParameter.default_severity(),
            BlameSeverity::Error
        );
    }

    #[test]
    fn test_blame_list_is_ordered() {
        let mut list = BlameList::new();
        list.blame(BlameKind::ColonExpected, Span::new(4, 5));
        list.blame(BlameKind::RedundantColonWithBraces, Span::new(1, 2));
        list.blame_with(BlameKind::InvalidSyntax, Span::new(0, 1), BlameSeverity::Info);

        let kinds: Vec<_> = list.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlameKind::ColonExpected,
                BlameKind::RedundantColonWithBraces,
                BlameKind::InvalidSyntax
            ]
        );
        assert!(list.has_errors());
        assert_eq!(list.count(BlameSeverity::Warning), 1);
        assert_eq!(list.count(BlameSeverity::Info), 1);
    }

    #[test]
    fn test_warnings_only_is_not_an_error() {
        let mut list = BlameList::new();
        list.blame(BlameKind::RedundantColonWithBraces, Span::new(0, 1));
        assert!(!list.has_errors());
    }

    #[test]
    fn test_codes_are_unique() {
        use std::collections::HashSet;
        let all = [
            BlameKind::InvalidCharacter,
            BlameKind::MixedIndentation,
            BlameKind::InconsistentIndentation,
            BlameKind::MismatchedParenthesis,
            BlameKind::MismatchedBracket,
            BlameKind::MismatchedBrace,
            BlameKind::ColonExpected,
            BlameKind::ExpectedBlockDeclaration,
            BlameKind::RedundantColonWithBraces,
            BlameKind::UnexpectedEndOfCode,
            BlameKind::LambdaCannotHaveIndentedBody,
            BlameKind::UnexpectedIndentation,
            BlameKind::ExpectedNewline,
            BlameKind::DuplicatedParameter,
            BlameKind::ExpectedDefaultParameterValue,
            BlameKind::NamedArgumentsMustFollowStar,
            BlameKind::CannotHaveMoreThanOneListParameter,
            BlameKind::CannotHaveMoreThanOneMapParameter,
            BlameKind::MapParameterMustBeLast,
            BlameKind::ListParameterAfterKeywordOnlyMarker,
            BlameKind::DuplicatedNamedArgument,
            BlameKind::ExpectedToken,
            BlameKind::InvalidSyntax,
            BlameKind::PositionalArgumentAfterNamed,
            BlameKind::MaxNestingDepthExceeded,
        ];
        let codes: HashSet<_> = all.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_lexer_errors_map_to_delimiter_kinds() {
        let error = LexerError::UnmatchedDelimiter {
            delimiter: Delimiter::Brace,
            span: Span::new(3, 4),
        };
        let blame = Blame::from(&error);
        assert_eq!(blame.kind, BlameKind::MismatchedBrace);
        assert_eq!(blame.span, Span::new(3, 4));
        assert!(blame.is_error());
    }

    #[test]
    fn test_display() {
        let blame = Blame::new(BlameKind::DuplicatedParameter, Span::new(10, 11));
        assert_eq!(
            blame.to_string(),
            "error[AX3001]: duplicated parameter at 10..11"
        );
    }
}

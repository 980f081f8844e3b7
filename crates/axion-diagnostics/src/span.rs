//! Line/column resolution for byte spans.
//!
//! Blames anchor to byte offsets; reports need 1-indexed lines and columns
//! plus the text of the lines involved.

use axion_lexer::Span;

/// Position information for a span (line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineColumn {
    /// 1-indexed line number.
    pub line: usize,
    /// 1-indexed column number (in characters, not bytes).
    pub column: usize,
}

impl LineColumn {
    /// Creates a new line/column position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A resolved span with line/column information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSpan {
    /// The original byte span.
    pub span: Span,
    /// The starting line/column.
    pub start: LineColumn,
    /// The ending line/column.
    pub end: LineColumn,
    /// The source lines covered by this span.
    pub source_lines: Vec<String>,
}

impl ResolvedSpan {
    /// Resolves `span` against `source`. Offsets past the end are clamped.
    pub fn resolve(source: &str, span: Span) -> Self {
        let start = offset_to_line_col(source, span.start);
        let end = offset_to_line_col(source, span.end.max(span.start));

        let source_lines: Vec<String> = source
            .lines()
            .skip(start.line.saturating_sub(1))
            .take(end.line - start.line + 1)
            .map(String::from)
            .collect();

        Self {
            span,
            start,
            end,
            source_lines,
        }
    }

    /// Returns true if this span covers multiple lines.
    pub fn is_multiline(&self) -> bool {
        self.start.line != self.end.line
    }

    /// Returns the number of lines this span covers.
    pub fn line_count(&self) -> usize {
        self.end.line - self.start.line + 1
    }
}

/// Converts a byte offset to a line and column number.
pub fn offset_to_line_col(source: &str, offset: usize) -> LineColumn {
    let offset = offset.min(source.len());
    let mut line = 1;
    let mut col = 1;
    let mut current_offset = 0;

    for ch in source.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    LineColumn::new(line, col)
}

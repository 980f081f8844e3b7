//! Terminal rendering for blame lists.
//!
//! Output follows the compiler-style layout:
//!
//! ```text
//! error[AX3001]: duplicated parameter
//!  --> main.ax:1:11
//!   |
//! 1 | fn f(x, x):
//!   |         ^ duplicated parameter
//! ```

use crate::span::ResolvedSpan;
use crate::{Blame, BlameList, BlameSeverity};
use std::io;
use termcolor::{Color, ColorSpec, WriteColor};
use unicode_width::UnicodeWidthStr;

/// Configuration for the blame renderer.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum line width for source excerpts.
    pub max_width: usize,
    /// Whether to print the trailing summary line.
    pub show_summary: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_width: 100,
            show_summary: true,
        }
    }
}

/// Renders blames to any [`WriteColor`] sink.
pub struct TerminalRenderer<'w, W: WriteColor> {
    config: RenderConfig,
    stream: &'w mut W,
}

impl<'w, W: WriteColor> TerminalRenderer<'w, W> {
    pub fn new(stream: &'w mut W) -> Self {
        Self::with_config(stream, RenderConfig::default())
    }

    pub fn with_config(stream: &'w mut W, config: RenderConfig) -> Self {
        Self { config, stream }
    }

    fn severity_color(severity: BlameSeverity) -> Color {
        match severity {
            BlameSeverity::Error => Color::Red,
            BlameSeverity::Warning => Color::Yellow,
            BlameSeverity::Info => Color::Cyan,
        }
    }

    fn write_colored(&mut self, text: &str, color: Color, bold: bool) -> io::Result<()> {
        let mut spec = ColorSpec::new();
        spec.set_fg(Some(color)).set_bold(bold);
        self.stream.set_color(&spec)?;
        write!(self.stream, "{}", text)?;
        self.stream.reset()?;
        Ok(())
    }

    fn write_header(&mut self, blame: &Blame) -> io::Result<()> {
        let color = Self::severity_color(blame.severity);
        let header = format!(
            "{}[{}]: {}",
            blame.severity.prefix(),
            blame.kind.code(),
            blame.message
        );
        self.write_colored(&header, color, true)?;
        writeln!(self.stream)
    }

    fn write_source_line(&mut self, line_num: usize, line: &str, gutter: usize) -> io::Result<()> {
        let number = format!("{:>width$}", line_num, width = gutter);
        self.write_colored(&number, Color::Blue, false)?;
        write!(self.stream, " | ")?;

        let budget = self.config.max_width.saturating_sub(gutter + 3);
        if line.width() > budget {
            let truncated: String = line.chars().take(budget.saturating_sub(3)).collect();
            writeln!(self.stream, "{}...", truncated)
        } else {
            writeln!(self.stream, "{}", line)
        }
    }

    fn write_underline(
        &mut self,
        blame: &Blame,
        resolved: &ResolvedSpan,
        gutter: usize,
    ) -> io::Result<()> {
        let color = Self::severity_color(blame.severity);
        write!(self.stream, "{:>width$} | ", "", width = gutter)?;

        let first_line = resolved.source_lines.first().map(String::as_str).unwrap_or("");
        let prefix: String = first_line
            .chars()
            .take(resolved.start.column.saturating_sub(1))
            .collect();
        write!(self.stream, "{:>width$}", "", width = prefix.width())?;

        let len = if resolved.is_multiline() {
            first_line.width().saturating_sub(prefix.width()).max(1)
        } else {
            let text: String = first_line
                .chars()
                .skip(resolved.start.column.saturating_sub(1))
                .take(resolved.end.column.saturating_sub(resolved.start.column))
                .collect();
            text.width().max(1)
        };
        let underline: String = std::iter::repeat(blame.severity.underline_char())
            .take(len)
            .collect();
        self.write_colored(&underline, color, false)?;
        write!(self.stream, " ")?;
        self.write_colored(blame.kind.description(), color, false)?;
        writeln!(self.stream)
    }

    /// Renders a single blame with its source excerpt.
    pub fn render(&mut self, blame: &Blame, source: &str, path: &str) -> io::Result<()> {
        self.write_header(blame)?;

        let resolved = ResolvedSpan::resolve(source, blame.span);
        writeln!(
            self.stream,
            " --> {}:{}:{}",
            path, resolved.start.line, resolved.start.column
        )?;

        let gutter = resolved.end.line.to_string().len().max(2);
        writeln!(self.stream, "{:>width$} |", "", width = gutter)?;
        if let Some(line) = resolved.source_lines.first() {
            let line = line.clone();
            self.write_source_line(resolved.start.line, &line, gutter)?;
            self.write_underline(blame, &resolved, gutter)?;
        }
        writeln!(self.stream)
    }

    /// Renders every blame followed by a summary line.
    pub fn render_all(&mut self, blames: &BlameList, source: &str, path: &str) -> io::Result<()> {
        for blame in blames {
            self.render(blame, source, path)?;
        }
        if self.config.show_summary {
            self.render_summary(blames)?;
        }
        Ok(())
    }

    pub fn render_summary(&mut self, blames: &BlameList) -> io::Result<()> {
        let errors = blames.count(BlameSeverity::Error);
        let warnings = blames.count(BlameSeverity::Warning);

        if errors > 0 {
            let text = format!(
                "aborting due to {} previous error{}",
                errors,
                if errors == 1 { "" } else { "s" }
            );
            self.write_colored("error", Color::Red, true)?;
            writeln!(self.stream, ": {}", text)?;
        }
        if warnings > 0 {
            self.write_colored("warning", Color::Yellow, true)?;
            writeln!(
                self.stream,
                ": {} warning{} emitted",
                warnings,
                if warnings == 1 { "" } else { "s" }
            )?;
        }
        Ok(())
    }
}

impl BlameList {
    /// Writes a terminal report of all blames to `stream`.
    pub fn report<W: WriteColor>(&self, stream: &mut W, source: &str, path: &str) -> io::Result<()> {
        TerminalRenderer::new(stream).render_all(self, source, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BlameKind;
    use axion_lexer::Span;
    use termcolor::NoColor;

    fn report(blames: &BlameList, source: &str) -> String {
        let mut out = NoColor::new(Vec::new());
        blames.report(&mut out, source, "main.ax").unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_render_points_at_anchor() {
        let mut blames = BlameList::new();
        blames.blame(BlameKind::DuplicatedParameter, Span::new(8, 9));
        let text = report(&blames, "fn f(x, x):\n    pass");

        assert!(text.contains("error[AX3001]: duplicated parameter"));
        assert!(text.contains(" --> main.ax:1:9"));
        assert!(text.contains(" 1 | fn f(x, x):"));
        assert!(text.contains("   |         ^ duplicated parameter"));
        assert!(text.contains("aborting due to 1 previous error"));
    }

    #[test]
    fn test_render_warning_summary() {
        let mut blames = BlameList::new();
        blames.blame(BlameKind::RedundantColonWithBraces, Span::new(7, 8));
        let text = report(&blames, "if true: { }");

        assert!(text.contains("warning[AX2003]"));
        assert!(text.contains("~ redundant colon with braces"));
        assert!(text.contains("1 warning emitted"));
        assert!(!text.contains("aborting"));
    }

    #[test]
    fn test_render_empty_list() {
        assert_eq!(report(&BlameList::new(), "a"), "");
    }
}

//! Text sink with indentation bookkeeping.
//!
//! Indentation depth is only changed through [`IndentGuard`], which restores
//! the previous depth when dropped, so an early `?` return from a nested
//! render can never leave the sink unbalanced.

use std::ops::{Deref, DerefMut};

/// Anything that carries an indentation depth.
pub trait Indentable {
    fn push_indent(&mut self);
    fn pop_indent(&mut self);

    /// Raises the depth until the returned guard is dropped.
    fn indent(&mut self) -> IndentGuard<'_, Self>
    where
        Self: Sized,
    {
        self.push_indent();
        IndentGuard { inner: self }
    }
}

/// Scoped indentation level; derefs to the indented sink.
pub struct IndentGuard<'w, W: Indentable> {
    inner: &'w mut W,
}

impl<W: Indentable> Deref for IndentGuard<'_, W> {
    type Target = W;

    fn deref(&self) -> &W {
        self.inner
    }
}

impl<W: Indentable> DerefMut for IndentGuard<'_, W> {
    fn deref_mut(&mut self) -> &mut W {
        self.inner
    }
}

impl<W: Indentable> Drop for IndentGuard<'_, W> {
    fn drop(&mut self) {
        self.inner.pop_indent();
    }
}

/// Line-oriented output buffer.
///
/// Text is collected into a pending line; the line receives its leading
/// indentation when it is ended, using the depth in effect at that moment.
#[derive(Debug, Clone)]
pub struct CodeWriter {
    out: String,
    line: String,
    depth: usize,
    unit: &'static str,
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::with_unit("    ")
    }

    pub fn with_unit(unit: &'static str) -> Self {
        Self {
            out: String::new(),
            line: String::new(),
            depth: 0,
            unit,
        }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn write(&mut self, text: &str) {
        self.line.push_str(text);
    }

    /// Writes `text` then ends the line.
    pub fn write_line(&mut self, text: &str) {
        self.write(text);
        self.end_line();
    }

    /// Flushes the pending text and a line break. Blank lines carry no
    /// indentation.
    pub fn end_line(&mut self) {
        if !self.line.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.unit);
            }
            self.out.push_str(&self.line);
            self.line.clear();
        }
        self.out.push('\n');
    }

    /// Ends the line only if something is pending on it.
    pub fn ensure_line(&mut self) {
        if !self.line.is_empty() {
            self.end_line();
        }
    }

    pub fn at_line_start(&self) -> bool {
        self.line.is_empty()
    }

    /// Consumes the writer, flushing any pending line without a trailing
    /// line break.
    pub fn finish(mut self) -> String {
        if !self.line.is_empty() {
            for _ in 0..self.depth {
                self.out.push_str(self.unit);
            }
            self.out.push_str(&self.line);
        }
        self.out
    }
}

impl Indentable for CodeWriter {
    fn push_indent(&mut self) {
        self.depth += 1;
    }

    fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indentation_is_applied_per_line() {
        let mut w = CodeWriter::new();
        w.write_line("if a:");
        {
            let mut w = w.indent();
            w.write("b");
            w.end_line();
            w.write_line("c");
        }
        w.write("d");
        assert_eq!(w.finish(), "if a:\n    b\n    c\nd");
    }

    #[test]
    fn test_guard_restores_depth_on_early_return() {
        fn fails(w: &mut CodeWriter) -> Result<(), ()> {
            let mut w = w.indent();
            w.write_line("x");
            Err(())
        }

        let mut w = CodeWriter::new();
        assert!(fails(&mut w).is_err());
        assert_eq!(w.depth(), 0);
    }

    #[test]
    fn test_ensure_line() {
        let mut w = CodeWriter::with_unit("  ");
        w.ensure_line();
        w.write("a");
        w.ensure_line();
        w.ensure_line();
        assert_eq!(w.finish(), "a\n");
    }
}

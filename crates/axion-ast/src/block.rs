//! Compound bodies.

use crate::render::{RenderResult, Renderer, Syntax};
use crate::writer::Indentable;
use crate::{NodeId, NodeKind};

/// The surface layout a block was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockForm {
    /// Top level of a compilation unit.
    Root,
    /// `: stmt; stmt` on the header line.
    Colon,
    /// `{ ... }`
    Brace,
    /// `:` followed by an indented suite.
    Indent,
}

/// An ordered sequence of statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub items: Vec<NodeId>,
    pub form: BlockForm,
}

impl Block {
    pub fn new(items: Vec<NodeId>, form: BlockForm) -> Self {
        Self { items, form }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn source_lines(&self, r: &mut Renderer<'_>) -> RenderResult {
        for &item in &self.items {
            r.node(item)?;
            r.ensure_line();
        }
        Ok(())
    }

    fn target_lines(&self, r: &mut Renderer<'_>) -> RenderResult {
        for &item in &self.items {
            r.node(item)?;
            if !r.kind(item)?.is_self_terminating() {
                r.write(";");
            }
            r.ensure_line();
        }
        Ok(())
    }
}

impl Syntax for Block {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        match self.form {
            BlockForm::Root => self.source_lines(r),
            BlockForm::Colon => {
                r.write(":");
                if !self.items.is_empty() {
                    r.write(" ");
                    r.join(&self.items, "; ")?;
                }
                Ok(())
            }
            BlockForm::Brace => {
                r.write(" {");
                r.end_line();
                self.source_lines(&mut r.indent())?;
                r.write("}");
                Ok(())
            }
            BlockForm::Indent => {
                r.write(":");
                r.end_line();
                self.source_lines(&mut r.indent())
            }
        }
    }

    /// Target blocks always use braces; the root block is bare.
    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        if self.form == BlockForm::Root {
            return self.target_lines(r);
        }
        r.write(if r.at_line_start() { "{" } else { " {" });
        r.end_line();
        self.target_lines(&mut r.indent())?;
        r.write("}");
        Ok(())
    }
}

/// Block form of `id`, if it is a block.
pub(crate) fn form_of(r: &Renderer<'_>, id: NodeId) -> RenderResult<Option<BlockForm>> {
    Ok(match r.kind(id)? {
        NodeKind::Block(block) => Some(block.form),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Name;
    use crate::{render_source, render_target, Ast, OutputLang, Span};
    use pretty_assertions::assert_eq;

    fn block(form: BlockForm, names: &[&str]) -> (Ast, NodeId) {
        let mut ast = Ast::new();
        let items = names
            .iter()
            .map(|n| ast.alloc(NodeKind::Name(Name::new(*n)), Span::dummy()).unwrap())
            .collect();
        let id = ast
            .alloc(NodeKind::Block(Block::new(items, form)), Span::dummy())
            .unwrap();
        (ast, id)
    }

    #[test]
    fn test_source_forms() {
        let (ast, id) = block(BlockForm::Colon, &["a", "b"]);
        assert_eq!(render_source(&ast, id).unwrap(), ": a; b");

        let (ast, id) = block(BlockForm::Brace, &["a", "b"]);
        assert_eq!(render_source(&ast, id).unwrap(), " {\n    a\n    b\n}");

        let (ast, id) = block(BlockForm::Indent, &["a"]);
        assert_eq!(render_source(&ast, id).unwrap(), ":\n    a\n");

        let (ast, id) = block(BlockForm::Root, &["a", "b"]);
        assert_eq!(render_source(&ast, id).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_target_always_braces() {
        for form in [BlockForm::Colon, BlockForm::Brace, BlockForm::Indent] {
            let (ast, id) = block(form, &["a"]);
            assert_eq!(
                render_target(&ast, id, OutputLang::CSharp).unwrap(),
                "{\n    a;\n}"
            );
        }
    }
}

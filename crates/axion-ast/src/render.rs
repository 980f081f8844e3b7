//! Dual rendering: back into Axion, or into a target language.
//!
//! Each node kind implements [`Syntax`] next to its definition; this module
//! holds the shared [`Renderer`] state and the dispatch over [`NodeKind`].
//! Rendering reads the tree and never mutates it.

use crate::writer::{CodeWriter, Indentable};
use crate::{Ast, AstError, NodeId, NodeKind, Span};
use std::fmt;
use thiserror::Error;

/// Output language of a render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputLang {
    /// Axion source, as accepted by the parser.
    Axion,
    #[default]
    CSharp,
}

impl fmt::Display for OutputLang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputLang::Axion => write!(f, "Axion"),
            OutputLang::CSharp => write!(f, "C#"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RenderError {
    /// The construct has no form in the requested language.
    #[error("{what} cannot be expressed in {lang}")]
    Unsupported {
        what: &'static str,
        lang: OutputLang,
        span: Span,
    },

    /// An error-recovery placeholder was reached.
    #[error("cannot render invalid syntax at {}..{}", .0.start, .0.end)]
    Invalid(Span),

    #[error(transparent)]
    Ast(#[from] AstError),
}

pub type RenderResult<T = ()> = Result<T, RenderError>;

/// Rendering entry points implemented by every node payload.
pub trait Syntax {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult;
    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult;
}

/// Shared state of one render pass.
pub struct Renderer<'a> {
    ast: &'a Ast,
    lang: OutputLang,
    w: CodeWriter,
    /// Span of the node being rendered, for error reporting.
    current: Span,
}

impl<'a> Renderer<'a> {
    pub fn new(ast: &'a Ast, lang: OutputLang) -> Self {
        Self {
            ast,
            lang,
            w: CodeWriter::new(),
            current: Span::dummy(),
        }
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn lang(&self) -> OutputLang {
        self.lang
    }

    pub fn kind(&self, id: NodeId) -> RenderResult<&'a NodeKind> {
        Ok(self.ast.kind(id)?)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.ast.span(id)
    }

    pub fn write(&mut self, text: &str) {
        self.w.write(text);
    }

    pub fn end_line(&mut self) {
        self.w.end_line();
    }

    pub fn ensure_line(&mut self) {
        self.w.ensure_line();
    }

    pub fn at_line_start(&self) -> bool {
        self.w.at_line_start()
    }

    /// Error for a construct of the current node with no form in the pass
    /// language.
    pub fn unsupported(&self, what: &'static str) -> RenderError {
        RenderError::Unsupported {
            what,
            lang: self.lang,
            span: self.current,
        }
    }

    /// Renders one node in the pass language.
    pub fn node(&mut self, id: NodeId) -> RenderResult {
        let ast = self.ast;
        let node = ast.node(id)?;
        let outer = std::mem::replace(&mut self.current, node.span);
        let result = match self.lang {
            OutputLang::Axion => dispatch_source(&node.kind, node.span, self),
            OutputLang::CSharp => dispatch_target(&node.kind, node.span, self),
        };
        self.current = outer;
        result
    }

    pub fn optional(&mut self, id: Option<NodeId>) -> RenderResult {
        match id {
            Some(id) => self.node(id),
            None => Ok(()),
        }
    }

    /// Renders `ids` separated by `sep`.
    pub fn join(&mut self, ids: &[NodeId], sep: &str) -> RenderResult {
        for (i, &id) in ids.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            self.node(id)?;
        }
        Ok(())
    }

    pub fn finish(self) -> String {
        self.w.finish()
    }
}

impl Indentable for Renderer<'_> {
    fn push_indent(&mut self) {
        self.w.push_indent();
    }

    fn pop_indent(&mut self) {
        self.w.pop_indent();
    }
}

fn dispatch_source(kind: &NodeKind, span: Span, r: &mut Renderer<'_>) -> RenderResult {
    match kind {
        NodeKind::Block(n) => n.render_source(r),
        NodeKind::Conditional(n) => n.render_source(r),
        NodeKind::While(n) => n.render_source(r),
        NodeKind::FunctionDef(n) => n.render_source(r),
        NodeKind::FunctionParameter(n) => n.render_source(r),
        NodeKind::Lambda(n) => n.render_source(r),
        NodeKind::Return(n) => n.render_source(r),
        NodeKind::Pass => {
            r.write("pass");
            Ok(())
        }
        NodeKind::Name(n) => n.render_source(r),
        NodeKind::Literal(n) => n.render_source(r),
        NodeKind::Unary(n) => n.render_source(r),
        NodeKind::Binary(n) => n.render_source(r),
        NodeKind::Paren(n) => n.render_source(r),
        NodeKind::Call(n) => n.render_source(r),
        NodeKind::CallArg(n) => n.render_source(r),
        NodeKind::Member(n) => n.render_source(r),
        NodeKind::SimpleType(n) => n.render_source(r),
        NodeKind::GenericType(n) => n.render_source(r),
        NodeKind::TupleType(n) => n.render_source(r),
        NodeKind::UnionType(n) => n.render_source(r),
        NodeKind::Invalid => Err(RenderError::Invalid(span)),
    }
}

fn dispatch_target(kind: &NodeKind, span: Span, r: &mut Renderer<'_>) -> RenderResult {
    match kind {
        NodeKind::Block(n) => n.render_target(r),
        NodeKind::Conditional(n) => n.render_target(r),
        NodeKind::While(n) => n.render_target(r),
        NodeKind::FunctionDef(n) => n.render_target(r),
        NodeKind::FunctionParameter(n) => n.render_target(r),
        NodeKind::Lambda(n) => n.render_target(r),
        NodeKind::Return(n) => n.render_target(r),
        // The statement terminator alone forms the empty statement.
        NodeKind::Pass => Ok(()),
        NodeKind::Name(n) => n.render_target(r),
        NodeKind::Literal(n) => n.render_target(r),
        NodeKind::Unary(n) => n.render_target(r),
        NodeKind::Binary(n) => n.render_target(r),
        NodeKind::Paren(n) => n.render_target(r),
        NodeKind::Call(n) => n.render_target(r),
        NodeKind::CallArg(n) => n.render_target(r),
        NodeKind::Member(n) => n.render_target(r),
        NodeKind::SimpleType(n) => n.render_target(r),
        NodeKind::GenericType(n) => n.render_target(r),
        NodeKind::TupleType(n) => n.render_target(r),
        NodeKind::UnionType(n) => n.render_target(r),
        NodeKind::Invalid => Err(RenderError::Invalid(span)),
    }
}

/// Renders the subtree at `id` as Axion source.
pub fn render_source(ast: &Ast, id: NodeId) -> RenderResult<String> {
    render_target(ast, id, OutputLang::Axion)
}

/// Renders the subtree at `id` in `lang`.
pub fn render_target(ast: &Ast, id: NodeId, lang: OutputLang) -> RenderResult<String> {
    let mut r = Renderer::new(ast, lang);
    r.node(id)?;
    Ok(r.finish())
}

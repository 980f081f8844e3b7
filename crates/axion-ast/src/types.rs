//! Type names.
//!
//! Builtin Axion types map onto C# keywords; unions have no C# spelling and
//! fail with [`RenderError::Unsupported`](crate::RenderError::Unsupported).

use crate::render::{RenderResult, Renderer, Syntax};
use crate::{NodeId, NodeKind};

/// C# spelling of builtin Axion type names.
pub fn csharp_builtin(name: &str) -> Option<&'static str> {
    Some(match name {
        "Int" => "int",
        "Float" => "double",
        "Str" => "string",
        "Bool" => "bool",
        "Any" => "object",
        "Char" => "char",
        _ => return None,
    })
}

/// `Int`, `collections.List`
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleType {
    /// A `Name` or `Member` node.
    pub name: NodeId,
}

impl Syntax for SimpleType {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.name)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        if let NodeKind::Name(name) = r.kind(self.name)? {
            if let Some(builtin) = csharp_builtin(&name.name) {
                r.write(builtin);
                return Ok(());
            }
        }
        r.node(self.name)
    }
}

/// `List[Int]`
#[derive(Debug, Clone, PartialEq)]
pub struct GenericType {
    pub target: NodeId,
    pub args: Vec<NodeId>,
}

impl Syntax for GenericType {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.target)?;
        r.write("[");
        r.join(&self.args, ", ")?;
        r.write("]");
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.target)?;
        r.write("<");
        r.join(&self.args, ", ")?;
        r.write(">");
        Ok(())
    }
}

/// `(Int, Str)`
#[derive(Debug, Clone, PartialEq)]
pub struct TupleType {
    pub types: Vec<NodeId>,
}

impl Syntax for TupleType {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("(");
        r.join(&self.types, ", ")?;
        r.write(")");
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        self.render_source(r)
    }
}

/// `Int | Str`
#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub left: NodeId,
    pub right: NodeId,
}

impl Syntax for UnionType {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.left)?;
        r.write(" | ");
        r.node(self.right)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        Err(r.unsupported("union type"))
    }
}

//! Control flow statements.

use crate::block::{form_of, BlockForm};
use crate::render::{RenderResult, Renderer, Syntax};
use crate::{NodeId, NodeKind};

/// `if cond block [elif ... | else block]`
///
/// An `elif` chain is stored as a nested `Conditional` in `else_branch`; a
/// plain `else` holds a block.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: NodeId,
    pub then_block: NodeId,
    pub else_branch: Option<NodeId>,
}

impl Syntax for Conditional {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("if ");
        r.node(self.condition)?;
        r.node(self.then_block)?;

        let Some(else_branch) = self.else_branch else {
            return Ok(());
        };
        if form_of(r, self.then_block)? == Some(BlockForm::Brace) {
            r.write(" ");
        } else {
            r.ensure_line();
        }
        match r.kind(else_branch)? {
            NodeKind::Conditional(elif) => {
                r.write("el");
                elif.render_source(r)
            }
            _ => {
                r.write("else");
                r.node(else_branch)
            }
        }
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("if (");
        r.node(self.condition)?;
        r.write(")");
        r.node(self.then_block)?;

        let Some(else_branch) = self.else_branch else {
            return Ok(());
        };
        r.write(" else");
        match r.kind(else_branch)? {
            NodeKind::Conditional(elif) => {
                r.write(" ");
                elif.render_target(r)
            }
            _ => r.node(else_branch),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub condition: NodeId,
    pub body: NodeId,
}

impl Syntax for While {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("while ");
        r.node(self.condition)?;
        r.node(self.body)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("while (");
        r.node(self.condition)?;
        r.write(")");
        r.node(self.body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    pub value: Option<NodeId>,
}

impl Syntax for Return {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("return");
        if let Some(value) = self.value {
            r.write(" ");
            r.node(value)?;
        }
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        self.render_source(r)
    }
}

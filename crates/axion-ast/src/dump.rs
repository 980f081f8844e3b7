//! Debug dumps of a tree as S-expressions.
//!
//! Spans and node ids are left out, so two trees parsed from differently
//! laid out sources dump identically when they have the same structure.

use crate::{Ast, BlockForm, NodeId, NodeKind, ParamRole, UnaryOp};

/// Dumps the subtree at `id`, including block forms.
pub fn dump(ast: &Ast, id: NodeId) -> String {
    let mut printer = Printer::new(ast, true);
    printer.print(id);
    printer.out
}

/// Dumps the subtree at `id` with block forms erased.
pub fn dump_shape(ast: &Ast, id: NodeId) -> String {
    let mut printer = Printer::new(ast, false);
    printer.print(id);
    printer.out
}

struct Printer<'a> {
    out: String,
    ast: &'a Ast,
    forms: bool,
}

impl<'a> Printer<'a> {
    fn new(ast: &'a Ast, forms: bool) -> Self {
        Self {
            out: String::new(),
            ast,
            forms,
        }
    }

    fn print(&mut self, id: NodeId) {
        let Some(node) = self.ast.get(id) else {
            self.out.push_str("<missing>");
            return;
        };

        self.out.push('(');
        self.out.push_str(node.kind.tag());
        match &node.kind {
            NodeKind::Block(block) if self.forms => self.out.push_str(match block.form {
                BlockForm::Root => ":root",
                BlockForm::Colon => ":colon",
                BlockForm::Brace => ":brace",
                BlockForm::Indent => ":indent",
            }),
            NodeKind::FunctionParameter(param) => self.out.push_str(match param.role {
                ParamRole::Positional => "",
                ParamRole::KeywordOnly => ":kw",
                ParamRole::VariadicList => ":list",
                ParamRole::VariadicMap => ":map",
            }),
            NodeKind::Name(name) => {
                self.out.push(' ');
                self.out.push_str(&name.name);
            }
            NodeKind::Literal(literal) => {
                self.out.push(' ');
                self.out.push_str(&literal.text);
            }
            NodeKind::Unary(unary) => self.out.push_str(match unary.op {
                UnaryOp::Neg => " -",
                UnaryOp::Not => " not",
            }),
            NodeKind::Binary(binary) => {
                self.out.push(' ');
                self.out.push_str(binary.op.symbol());
            }
            _ => {}
        }
        for child in node.kind.children() {
            self.out.push(' ');
            self.print(child);
        }
        self.out.push(')');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Block, Name, Span};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dump_block() {
        let mut ast = Ast::new();
        let a = ast.alloc(NodeKind::Name(Name::new("a")), Span::dummy()).unwrap();
        let pass = ast.alloc(NodeKind::Pass, Span::dummy()).unwrap();
        let block = ast
            .alloc(
                NodeKind::Block(Block::new(vec![a, pass], BlockForm::Indent)),
                Span::dummy(),
            )
            .unwrap();

        assert_eq!(dump(&ast, block), "(block:indent (name a) (pass))");
        assert_eq!(dump_shape(&ast, block), "(block (name a) (pass))");
    }
}

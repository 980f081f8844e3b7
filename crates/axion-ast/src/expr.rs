//! Atoms, operators, calls and member access.

use crate::render::{RenderResult, Renderer, Syntax};
use crate::{NodeId, NodeKind, SmolStr};
use axion_lexer::TokenKind;

// ============================================================================
// Atoms
// ============================================================================

/// A simple identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    pub name: SmolStr,
}

impl Name {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self { name: name.into() }
    }
}

/// C# reserved words that need a verbatim `@` prefix when used as names.
const CSHARP_KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "enum",
    "event", "explicit", "extern", "finally", "fixed", "float", "for", "foreach", "goto",
    "implicit", "in", "int", "interface", "internal", "is", "lock", "long", "namespace", "new",
    "null", "object", "operator", "out", "override", "params", "private", "protected", "public",
    "readonly", "ref", "sbyte", "sealed", "short", "sizeof", "stackalloc", "static", "string",
    "struct", "switch", "this", "throw", "try", "typeof", "uint", "ulong", "unchecked",
    "unsafe", "ushort", "using", "virtual", "void", "volatile",
];

impl Syntax for Name {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write(&self.name);
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        if CSHARP_KEYWORDS.contains(&self.name.as_str()) {
            r.write("@");
        }
        r.write(&self.name);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Integer,
    Float,
    Str,
    True,
    False,
    Nil,
}

/// A literal, kept as written. String text includes its quotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: SmolStr,
}

impl Literal {
    pub fn new(kind: LiteralKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

impl Syntax for Literal {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write(&self.text);
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        match self.kind {
            LiteralKind::Nil => r.write("null"),
            LiteralKind::Str if self.text.starts_with('\'') => {
                r.write(&to_double_quoted(&self.text))
            }
            _ => r.write(&self.text),
        }
        Ok(())
    }
}

/// Rewrites a single-quoted literal with double quotes.
fn to_double_quoted(text: &str) -> String {
    let body = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .unwrap_or(text);
    let mut out = String::with_capacity(body.len() + 2);
    out.push('"');
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('\'') => out.push('\''),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

// ============================================================================
// Operators
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: NodeId,
}

impl Unary {
    /// `-` in front of an operand that itself starts with `-`.
    fn doubles_minus(&self, r: &Renderer<'_>) -> RenderResult<bool> {
        if self.op != UnaryOp::Neg {
            return Ok(false);
        }
        Ok(match r.kind(self.operand)? {
            NodeKind::Unary(inner) => inner.op == UnaryOp::Neg,
            NodeKind::Literal(lit) => lit.text.starts_with('-'),
            _ => false,
        })
    }
}

impl Syntax for Unary {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        let spaced = self.doubles_minus(r)?;
        r.write(match self.op {
            UnaryOp::Neg if spaced => "- ",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "not ",
        });
        r.node(self.operand)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        let spaced = self.doubles_minus(r)?;
        r.write(match self.op {
            UnaryOp::Neg if spaced => "- ",
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        });
        r.node(self.operand)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Assign,
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl BinaryOp {
    pub fn from_token(kind: &TokenKind) -> Option<BinaryOp> {
        Some(match kind {
            TokenKind::Eq => BinaryOp::Assign,
            TokenKind::Or => BinaryOp::Or,
            TokenKind::And => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::NotEq,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::LtEq => BinaryOp::LtEq,
            TokenKind::GtEq => BinaryOp::GtEq,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Rem,
            TokenKind::StarStar => BinaryOp::Pow,
            _ => return None,
        })
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Assign => 1,
            BinaryOp::Or => 2,
            BinaryOp::And => 3,
            BinaryOp::Eq
            | BinaryOp::NotEq
            | BinaryOp::Lt
            | BinaryOp::Gt
            | BinaryOp::LtEq
            | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
            BinaryOp::Pow => 7,
        }
    }

    pub fn is_right_assoc(self) -> bool {
        matches!(self, BinaryOp::Assign | BinaryOp::Pow)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Pow => "**",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub op: BinaryOp,
    pub left: NodeId,
    pub right: NodeId,
}

impl Syntax for Binary {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.left)?;
        r.write(" ");
        r.write(self.op.symbol());
        r.write(" ");
        r.node(self.right)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        let symbol = match self.op {
            BinaryOp::Pow => {
                r.write("Math.Pow(");
                r.node(self.left)?;
                r.write(", ");
                r.node(self.right)?;
                r.write(")");
                return Ok(());
            }
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            op => op.symbol(),
        };
        r.node(self.left)?;
        r.write(" ");
        r.write(symbol);
        r.write(" ");
        r.node(self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Paren {
    pub inner: NodeId,
}

impl Syntax for Paren {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("(");
        r.node(self.inner)?;
        r.write(")");
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        self.render_source(r)
    }
}

// ============================================================================
// Calls and member access
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub target: NodeId,
    pub args: Vec<NodeId>,
}

impl Syntax for Call {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.target)?;
        r.write("(");
        r.join(&self.args, ", ")?;
        r.write(")");
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        self.render_source(r)
    }
}

/// A call argument, optionally named (`name = value`).
#[derive(Debug, Clone, PartialEq)]
pub struct CallArg {
    pub name: Option<NodeId>,
    pub value: NodeId,
}

impl Syntax for CallArg {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        if let Some(name) = self.name {
            r.node(name)?;
            r.write(" = ");
        }
        r.node(self.value)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        if let Some(name) = self.name {
            r.node(name)?;
            r.write(": ");
        }
        r.node(self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub target: NodeId,
    pub member: NodeId,
}

impl Syntax for Member {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.node(self.target)?;
        r.write(".");
        r.node(self.member)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        self.render_source(r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{render_source, render_target, Ast, NodeKind, OutputLang, Span};
    use pretty_assertions::assert_eq;

    fn alloc(ast: &mut Ast, kind: NodeKind) -> NodeId {
        ast.alloc(kind, Span::dummy()).unwrap()
    }

    #[test]
    fn test_power_renders_as_math_pow() {
        let mut ast = Ast::new();
        let a = alloc(&mut ast, NodeKind::Name(Name::new("a")));
        let two = alloc(&mut ast, NodeKind::Literal(Literal::new(LiteralKind::Integer, "2")));
        let pow = alloc(
            &mut ast,
            NodeKind::Binary(Binary {
                op: BinaryOp::Pow,
                left: a,
                right: two,
            }),
        );

        assert_eq!(render_source(&ast, pow).unwrap(), "a ** 2");
        assert_eq!(
            render_target(&ast, pow, OutputLang::CSharp).unwrap(),
            "Math.Pow(a, 2)"
        );
    }

    #[test]
    fn test_double_negation_keeps_space() {
        let mut ast = Ast::new();
        let a = alloc(&mut ast, NodeKind::Name(Name::new("a")));
        let inner = alloc(
            &mut ast,
            NodeKind::Unary(Unary {
                op: UnaryOp::Neg,
                operand: a,
            }),
        );
        let outer = alloc(
            &mut ast,
            NodeKind::Unary(Unary {
                op: UnaryOp::Neg,
                operand: inner,
            }),
        );

        assert_eq!(render_source(&ast, inner).unwrap(), "-a");
        assert_eq!(render_source(&ast, outer).unwrap(), "- -a");
        assert_eq!(
            render_target(&ast, outer, OutputLang::CSharp).unwrap(),
            "- -a"
        );
    }

    #[test]
    fn test_logic_operators() {
        let mut ast = Ast::new();
        let a = alloc(&mut ast, NodeKind::Name(Name::new("a")));
        let b = alloc(&mut ast, NodeKind::Name(Name::new("b")));
        let not_b = alloc(
            &mut ast,
            NodeKind::Unary(Unary {
                op: UnaryOp::Not,
                operand: b,
            }),
        );
        let and = alloc(
            &mut ast,
            NodeKind::Binary(Binary {
                op: BinaryOp::And,
                left: a,
                right: not_b,
            }),
        );

        assert_eq!(render_source(&ast, and).unwrap(), "a and not b");
        assert_eq!(
            render_target(&ast, and, OutputLang::CSharp).unwrap(),
            "a && !b"
        );
    }

    #[test]
    fn test_literals_in_target() {
        let mut ast = Ast::new();
        let nil = alloc(&mut ast, NodeKind::Literal(Literal::new(LiteralKind::Nil, "nil")));
        let s = alloc(
            &mut ast,
            NodeKind::Literal(Literal::new(LiteralKind::Str, r#"'say "hi"'"#)),
        );

        assert_eq!(render_target(&ast, nil, OutputLang::CSharp).unwrap(), "null");
        assert_eq!(
            render_target(&ast, s, OutputLang::CSharp).unwrap(),
            r#""say \"hi\"""#
        );
    }

    #[test]
    fn test_keyword_names_are_escaped() {
        let mut ast = Ast::new();
        let id = alloc(&mut ast, NodeKind::Name(Name::new("string")));
        assert_eq!(render_source(&ast, id).unwrap(), "string");
        assert_eq!(render_target(&ast, id, OutputLang::CSharp).unwrap(), "@string");
    }

    #[test]
    fn test_precedence_order() {
        assert!(BinaryOp::Pow.precedence() > BinaryOp::Mul.precedence());
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Assign.is_right_assoc());
        assert_eq!(BinaryOp::from_token(&TokenKind::Comma), None);
    }
}

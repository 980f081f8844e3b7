//! Axion Language Abstract Syntax Tree
//!
//! Every node of a compilation unit lives in a single [`Ast`] arena. Parents
//! reference children by [`NodeId`] through typed slots in their payload, and
//! every child records the id of the one node that owns it. Nodes are built
//! bottom-up: [`Ast::alloc`] binds the new node as the parent of every child
//! listed in its payload and refuses to rebind a child that already has an
//! owner. Dropping the `Ast` drops the whole tree.

pub mod block;
pub mod control;
pub mod dump;
pub mod expr;
pub mod function;
pub mod render;
pub mod types;
pub mod writer;

pub use axion_lexer::Span;
pub use smol_str::SmolStr;

pub use block::{Block, BlockForm};
pub use control::{Conditional, Return, While};
pub use expr::{
    Binary, BinaryOp, Call, CallArg, Literal, LiteralKind, Member, Name, Paren, Unary, UnaryOp,
};
pub use function::{FunctionDef, FunctionParameter, Lambda, ParamRole};
pub use render::{render_source, render_target, OutputLang, RenderError, RenderResult};
pub use types::{GenericType, SimpleType, TupleType, UnionType};
pub use writer::{CodeWriter, IndentGuard, Indentable};

use std::fmt;
use thiserror::Error;

/// Index of a node inside its [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Internal contract breaches. These are defects in the parser or in a
/// tree-building tool, never the result of bad input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AstError {
    #[error("node {child} is already owned by {parent}")]
    AlreadyBound { child: NodeId, parent: NodeId },

    #[error("node {0} does not exist in this tree")]
    UnknownNode(NodeId),

    #[error("node {child} is held by {holder} but records a different parent")]
    ParentMismatch { child: NodeId, holder: NodeId },

    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),

    #[error("node {0} cannot be the root because it has a parent")]
    RootHasParent(NodeId),

    #[error("tree has no root")]
    NoRoot,
}

// ============================================================================
// Nodes
// ============================================================================

/// A node of the tree: payload, source range and owning parent.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    parent: Option<NodeId>,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// The closed set of node kinds, each with explicitly typed child slots.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Block(Block),
    Conditional(Conditional),
    While(While),
    FunctionDef(FunctionDef),
    FunctionParameter(FunctionParameter),
    Lambda(Lambda),
    Return(Return),
    Pass,
    Name(Name),
    Literal(Literal),
    Unary(Unary),
    Binary(Binary),
    Paren(Paren),
    Call(Call),
    CallArg(CallArg),
    Member(Member),
    SimpleType(SimpleType),
    GenericType(GenericType),
    TupleType(TupleType),
    UnionType(UnionType),
    /// Placeholder left by error recovery.
    Invalid,
}

impl NodeKind {
    /// Children in declaration order, absent slots skipped.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self {
            NodeKind::Block(b) => out.extend(&b.items),
            NodeKind::Conditional(c) => {
                out.push(c.condition);
                out.push(c.then_block);
                out.extend(c.else_branch);
            }
            NodeKind::While(w) => {
                out.push(w.condition);
                out.push(w.body);
            }
            NodeKind::FunctionDef(f) => {
                out.push(f.name);
                out.extend(&f.params);
                out.extend(f.return_type);
                out.push(f.body);
            }
            NodeKind::FunctionParameter(p) => {
                out.push(p.name);
                out.extend(p.value_type);
                out.extend(p.default_value);
            }
            NodeKind::Lambda(l) => {
                out.extend(&l.params);
                out.extend(l.return_type);
                out.push(l.body);
            }
            NodeKind::Return(r) => out.extend(r.value),
            NodeKind::Unary(u) => out.push(u.operand),
            NodeKind::Binary(b) => {
                out.push(b.left);
                out.push(b.right);
            }
            NodeKind::Paren(p) => out.push(p.inner),
            NodeKind::Call(c) => {
                out.push(c.target);
                out.extend(&c.args);
            }
            NodeKind::CallArg(a) => {
                out.extend(a.name);
                out.push(a.value);
            }
            NodeKind::Member(m) => {
                out.push(m.target);
                out.push(m.member);
            }
            NodeKind::SimpleType(t) => out.push(t.name),
            NodeKind::GenericType(t) => {
                out.push(t.target);
                out.extend(&t.args);
            }
            NodeKind::TupleType(t) => out.extend(&t.types),
            NodeKind::UnionType(t) => {
                out.push(t.left);
                out.push(t.right);
            }
            NodeKind::Pass | NodeKind::Name(_) | NodeKind::Literal(_) | NodeKind::Invalid => {}
        }
        out
    }

    /// Short tag used by dumps and error messages.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeKind::Block(_) => "block",
            NodeKind::Conditional(_) => "if",
            NodeKind::While(_) => "while",
            NodeKind::FunctionDef(_) => "fn",
            NodeKind::FunctionParameter(_) => "param",
            NodeKind::Lambda(_) => "lambda",
            NodeKind::Return(_) => "return",
            NodeKind::Pass => "pass",
            NodeKind::Name(_) => "name",
            NodeKind::Literal(_) => "literal",
            NodeKind::Unary(_) => "unary",
            NodeKind::Binary(_) => "binary",
            NodeKind::Paren(_) => "paren",
            NodeKind::Call(_) => "call",
            NodeKind::CallArg(_) => "arg",
            NodeKind::Member(_) => "member",
            NodeKind::SimpleType(_) => "type",
            NodeKind::GenericType(_) => "generic-type",
            NodeKind::TupleType(_) => "tuple-type",
            NodeKind::UnionType(_) => "union-type",
            NodeKind::Invalid => "invalid",
        }
    }

    /// Declaration-like statements close themselves with a block and take no
    /// statement terminator in brace-style output.
    pub fn is_self_terminating(&self) -> bool {
        matches!(
            self,
            NodeKind::FunctionDef(_) | NodeKind::Conditional(_) | NodeKind::While(_)
        )
    }
}

// ============================================================================
// Arena
// ============================================================================

/// The syntax tree of one compilation unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and binds it as the owner of every child in `kind`.
    ///
    /// Children must already exist and must not have an owner yet; on error
    /// the tree is left unchanged.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> Result<NodeId, AstError> {
        let id = NodeId(self.nodes.len() as u32);
        let children = kind.children();

        for (i, &child) in children.iter().enumerate() {
            let node = self.nodes.get(child.index()).ok_or(AstError::UnknownNode(child))?;
            if let Some(parent) = node.parent {
                return Err(AstError::AlreadyBound { child, parent });
            }
            if children[..i].contains(&child) {
                return Err(AstError::AlreadyBound { child, parent: id });
            }
        }
        for child in children {
            self.nodes[child.index()].parent = Some(id);
        }

        self.nodes.push(Node {
            kind,
            span,
            parent: None,
        });
        Ok(id)
    }

    pub fn set_root(&mut self, id: NodeId) -> Result<(), AstError> {
        let node = self.node(id)?;
        if node.parent.is_some() {
            return Err(AstError::RootHasParent(id));
        }
        self.root = Some(id);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node(&self, id: NodeId) -> Result<&Node, AstError> {
        self.get(id).ok_or(AstError::UnknownNode(id))
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, AstError> {
        self.node(id).map(|n| &n.kind)
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.get(id).map(|n| n.span).unwrap_or_default()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.get(id).map(|n| n.kind.children()).unwrap_or_default()
    }

    /// Items of a block node, empty for any other kind.
    pub fn block_items(&self, id: NodeId) -> &[NodeId] {
        match self.get(id).map(|n| &n.kind) {
            Some(NodeKind::Block(block)) => &block.items,
            _ => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Checks the single-owner invariant over the whole arena: every child
    /// records the node that holds it, no node is held twice, and every node
    /// other than the root is reachable from the root.
    pub fn validate(&self) -> Result<(), AstError> {
        let root = self.root.ok_or(AstError::NoRoot)?;
        if self.node(root)?.parent.is_some() {
            return Err(AstError::RootHasParent(root));
        }

        let mut held_by: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        for (id, node) in self.iter() {
            for child in node.kind.children() {
                let child_node = self.node(child)?;
                if child.index() >= id.index() || child_node.parent != Some(id) {
                    return Err(AstError::ParentMismatch { child, holder: id });
                }
                if let Some(parent) = held_by[child.index()] {
                    return Err(AstError::AlreadyBound { child, parent });
                }
                held_by[child.index()] = Some(id);
            }
        }

        let mut reached = vec![false; self.nodes.len()];
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            reached[id.index()] = true;
            stack.extend(self.children(id));
        }
        match reached.iter().position(|r| !r) {
            Some(index) => Err(AstError::Unreachable(NodeId(index as u32))),
            None => Ok(()),
        }
    }

    /// Renders the root as Axion source.
    pub fn to_source(&self) -> RenderResult<String> {
        render_source(self, self.root.ok_or(AstError::NoRoot)?)
    }

    /// Renders the root in `lang`.
    pub fn to_target(&self, lang: OutputLang) -> RenderResult<String> {
        render_target(self, self.root.ok_or(AstError::NoRoot)?, lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(ast: &mut Ast, text: &str) -> NodeId {
        ast.alloc(NodeKind::Name(Name::new(text)), Span::dummy()).unwrap()
    }

    #[test]
    fn test_alloc_binds_children() {
        let mut ast = Ast::new();
        let a = name(&mut ast, "a");
        let b = name(&mut ast, "b");
        let sum = ast
            .alloc(
                NodeKind::Binary(Binary {
                    op: BinaryOp::Add,
                    left: a,
                    right: b,
                }),
                Span::new(0, 5),
            )
            .unwrap();

        assert_eq!(ast.parent(a), Some(sum));
        assert_eq!(ast.parent(b), Some(sum));
        assert_eq!(ast.parent(sum), None);
        assert_eq!(ast.children(sum), vec![a, b]);
    }

    #[test]
    fn test_reparenting_is_refused() {
        let mut ast = Ast::new();
        let a = name(&mut ast, "a");
        let first = ast
            .alloc(NodeKind::Paren(Paren { inner: a }), Span::dummy())
            .unwrap();
        let err = ast
            .alloc(NodeKind::Paren(Paren { inner: a }), Span::dummy())
            .unwrap_err();

        assert_eq!(
            err,
            AstError::AlreadyBound {
                child: a,
                parent: first
            }
        );
        assert_eq!(ast.len(), 2);
    }

    #[test]
    fn test_same_child_twice_is_refused() {
        let mut ast = Ast::new();
        let a = name(&mut ast, "a");
        let err = ast
            .alloc(
                NodeKind::Binary(Binary {
                    op: BinaryOp::Mul,
                    left: a,
                    right: a,
                }),
                Span::dummy(),
            )
            .unwrap_err();
        assert!(matches!(err, AstError::AlreadyBound { child, .. } if child == a));
        assert_eq!(ast.parent(a), None);
    }

    #[test]
    fn test_unknown_child() {
        let mut ast = Ast::new();
        let err = ast
            .alloc(NodeKind::Paren(Paren { inner: NodeId(7) }), Span::dummy())
            .unwrap_err();
        assert_eq!(err, AstError::UnknownNode(NodeId(7)));
    }

    #[test]
    fn test_validate() {
        let mut ast = Ast::new();
        let a = name(&mut ast, "a");
        let root = ast
            .alloc(
                NodeKind::Block(Block {
                    items: vec![a],
                    form: BlockForm::Root,
                }),
                Span::dummy(),
            )
            .unwrap();
        assert_eq!(ast.validate(), Err(AstError::NoRoot));

        ast.set_root(root).unwrap();
        assert_eq!(ast.validate(), Ok(()));

        name(&mut ast, "orphan");
        assert!(matches!(ast.validate(), Err(AstError::Unreachable(_))));
    }

    #[test]
    fn test_root_must_be_unowned() {
        let mut ast = Ast::new();
        let a = name(&mut ast, "a");
        ast.alloc(NodeKind::Paren(Paren { inner: a }), Span::dummy())
            .unwrap();
        assert_eq!(ast.set_root(a), Err(AstError::RootHasParent(a)));
    }
}

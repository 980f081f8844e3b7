//! Function definitions, lambdas and their parameters.

use crate::block::{form_of, BlockForm};
use crate::render::{OutputLang, RenderResult, Renderer, Syntax};
use crate::{NodeId, NodeKind};

/// How a parameter receives its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamRole {
    Positional,
    /// Declared after `*` or `*rest`; may only be passed by name.
    KeywordOnly,
    /// `*rest`: collects extra positional arguments.
    VariadicList,
    /// `**map`: collects extra named arguments.
    VariadicMap,
}

/// `name: Type [= default]`, prefixed with `*` or `**` when variadic.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionParameter {
    pub name: NodeId,
    pub value_type: Option<NodeId>,
    pub default_value: Option<NodeId>,
    pub role: ParamRole,
}

impl Syntax for FunctionParameter {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        match self.role {
            ParamRole::VariadicList => r.write("*"),
            ParamRole::VariadicMap => r.write("**"),
            ParamRole::Positional | ParamRole::KeywordOnly => {}
        }
        r.node(self.name)?;
        if let Some(value_type) = self.value_type {
            r.write(": ");
            r.node(value_type)?;
        }
        if let Some(default_value) = self.default_value {
            r.write(" = ");
            r.node(default_value)?;
        }
        Ok(())
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        if self.role == ParamRole::VariadicMap {
            return Err(r.unsupported("variadic map parameter"));
        }
        if self.role == ParamRole::VariadicList {
            r.write("params ");
        }
        match self.value_type {
            Some(value_type) => r.node(value_type)?,
            None => r.write("object"),
        }
        if self.role == ParamRole::VariadicList {
            r.write("[]");
        }
        r.write(" ");
        r.node(self.name)?;
        if let Some(default_value) = self.default_value {
            r.write(" = ");
            r.node(default_value)?;
        }
        Ok(())
    }
}

/// Renders a parameter list in canonical order.
///
/// Axion: positional, `*rest` (or a bare `*` when keyword-only parameters
/// follow), keyword-only, `**map`. C#: positional, required keyword-only,
/// defaulted keyword-only, `params`.
fn render_params(r: &mut Renderer<'_>, params: &[NodeId]) -> RenderResult {
    let mut positional = Vec::new();
    let mut keyword_only = Vec::new();
    let mut lists = Vec::new();
    let mut maps = Vec::new();
    for &id in params {
        let (role, defaulted) = match r.kind(id)? {
            NodeKind::FunctionParameter(param) => (param.role, param.default_value.is_some()),
            _ => (ParamRole::Positional, false),
        };
        match role {
            ParamRole::Positional => positional.push(id),
            ParamRole::KeywordOnly => keyword_only.push((id, defaulted)),
            ParamRole::VariadicList => lists.push(id),
            ParamRole::VariadicMap => maps.push(id),
        }
    }

    // `None` stands for the bare `*` marker.
    let mut ordered: Vec<Option<NodeId>> = positional.into_iter().map(Some).collect();
    if r.lang() == OutputLang::Axion {
        if lists.is_empty() && !keyword_only.is_empty() {
            ordered.push(None);
        }
        ordered.extend(lists.into_iter().map(Some));
        ordered.extend(keyword_only.iter().map(|&(id, _)| Some(id)));
    } else {
        // C# wants optional parameters after required ones.
        let (defaulted, required): (Vec<_>, Vec<_>) =
            keyword_only.into_iter().partition(|&(_, defaulted)| defaulted);
        ordered.extend(required.into_iter().map(|(id, _)| Some(id)));
        ordered.extend(defaulted.into_iter().map(|(id, _)| Some(id)));
        ordered.extend(lists.into_iter().map(Some));
    }
    ordered.extend(maps.into_iter().map(Some));

    for (i, entry) in ordered.into_iter().enumerate() {
        if i > 0 {
            r.write(", ");
        }
        match entry {
            Some(id) => r.node(id)?,
            None => r.write("*"),
        }
    }
    Ok(())
}

/// `fn name[(params)] [=> Type] block`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDef {
    pub name: NodeId,
    pub params: Vec<NodeId>,
    pub return_type: Option<NodeId>,
    pub body: NodeId,
}

impl Syntax for FunctionDef {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("fn ");
        r.node(self.name)?;
        if !self.params.is_empty() {
            r.write("(");
            render_params(r, &self.params)?;
            r.write(")");
        }
        if let Some(return_type) = self.return_type {
            r.write(" => ");
            r.node(return_type)?;
        }
        r.node(self.body)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("public ");
        match self.return_type {
            Some(return_type) => r.node(return_type)?,
            None => r.write("void"),
        }
        r.write(" ");
        r.node(self.name)?;
        r.write("(");
        render_params(r, &self.params)?;
        r.write(")");
        r.node(self.body)
    }
}

/// `fn (params) [=> Type] block`, an anonymous function expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    pub params: Vec<NodeId>,
    pub return_type: Option<NodeId>,
    pub body: NodeId,
}

impl Lambda {
    /// The single expression of a colon-form body, if the body is one.
    fn expression_body(&self, r: &Renderer<'_>) -> RenderResult<Option<NodeId>> {
        if form_of(r, self.body)? != Some(BlockForm::Colon) {
            return Ok(None);
        }
        let [item] = r.ast().block_items(self.body) else {
            return Ok(None);
        };
        let kind = r.kind(*item)?;
        if kind.is_self_terminating() || matches!(kind, NodeKind::Return(_) | NodeKind::Pass) {
            return Ok(None);
        }
        Ok(Some(*item))
    }
}

impl Syntax for Lambda {
    fn render_source(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("fn (");
        render_params(r, &self.params)?;
        r.write(")");
        if let Some(return_type) = self.return_type {
            r.write(" => ");
            r.node(return_type)?;
        }
        r.node(self.body)
    }

    fn render_target(&self, r: &mut Renderer<'_>) -> RenderResult {
        r.write("(");
        render_params(r, &self.params)?;
        r.write(") =>");
        match self.expression_body(r)? {
            Some(item) => {
                r.write(" ");
                r.node(item)
            }
            None => r.node(self.body),
        }
    }
}

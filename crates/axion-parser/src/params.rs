//! Function definitions, lambdas and parameter lists.
//!
//! ```text
//! func_def:   'fn' ID ['(' params ')'] ['=>' type] block
//! lambda:     'fn' '(' params ')' ['=>' type] block
//! params:     [param (',' param)* [',']]
//! param:      ['*' | '**'] ID [':' type] ['=' infix] | '*'
//! ```
//!
//! Positional parameters come first. A bare `*` or a `*rest` list parameter
//! opens the keyword-only section, and a `**map` parameter must be last.

use crate::block::BlockType;
use crate::{ParseResult, Parser};
use axion_ast::{FunctionDef, FunctionParameter, Lambda, NodeId, NodeKind, ParamRole, Span};
use axion_diagnostics::BlameKind;
use axion_lexer::TokenKind;
use rustc_hash::FxHashSet;
use smol_str::SmolStr;

/// Bookkeeping for one parameter list.
#[derive(Default)]
struct ParamState {
    names: FxHashSet<SmolStr>,
    /// Parameters in lexical order, except the first list and map.
    lexical: Vec<NodeId>,
    list_param: Option<NodeId>,
    map_param: Option<NodeId>,
    /// Span of a bare `*` marker.
    star: Option<Span>,
    keyword_section: bool,
    have_keyword_only: bool,
    require_defaults: bool,
    map_not_last: bool,
}

impl<'b> Parser<'b> {
    pub(crate) fn parse_function_def(&mut self) -> ParseResult<NodeId> {
        let start = self.advance().span.start;
        let name = self.parse_name()?;

        let params = if self.maybe_eat(&TokenKind::LParen) {
            let params = self.parse_param_list(&TokenKind::RParen)?;
            self.eat(TokenKind::RParen);
            params
        } else {
            Vec::new()
        };
        let return_type = self.parse_return_type()?;
        let body = self.parse_block(BlockType::Default)?;

        let span = self.span_from(start);
        self.alloc(
            NodeKind::FunctionDef(FunctionDef {
                name,
                params,
                return_type,
                body,
            }),
            span,
        )
    }

    pub(crate) fn parse_lambda(&mut self) -> ParseResult<NodeId> {
        let start = self.advance().span.start;

        let params = if self.eat(TokenKind::LParen).is_some() {
            let params = self.parse_param_list(&TokenKind::RParen)?;
            self.eat(TokenKind::RParen);
            params
        } else {
            Vec::new()
        };
        let return_type = self.parse_return_type()?;
        let body = self.parse_block(BlockType::Lambda)?;

        let span = self.span_from(start);
        self.alloc(
            NodeKind::Lambda(Lambda {
                params,
                return_type,
                body,
            }),
            span,
        )
    }

    fn parse_return_type(&mut self) -> ParseResult<Option<NodeId>> {
        if self.maybe_eat(&TokenKind::FatArrow) {
            Ok(Some(self.parse_type()?))
        } else {
            Ok(None)
        }
    }

    /// Parses parameters up to, not including, `terminator`.
    ///
    /// Misplaced variadic parameters are blamed and kept where they appear.
    /// The result lists the other parameters in lexical order, followed by
    /// the list parameter and then the map parameter.
    pub(crate) fn parse_param_list(&mut self, terminator: &TokenKind) -> ParseResult<Vec<NodeId>> {
        let mut state = ParamState::default();

        while !self.check(terminator) && !self.stream.is_end() {
            if let Some(map) = state.map_param {
                if !state.map_not_last {
                    state.map_not_last = true;
                    let span = self.span_of(map);
                    self.blame(BlameKind::MapParameterMustBeLast, span);
                }
            }

            let start = self.peek().span.start;
            if self.maybe_eat(&TokenKind::StarStar) {
                let param = self.parse_parameter(ParamRole::VariadicMap, &mut state.names, start)?;
                if state.map_param.is_some() {
                    let span = self.span_of(param);
                    self.blame(BlameKind::CannotHaveMoreThanOneMapParameter, span);
                    state.lexical.push(param);
                } else {
                    state.map_param = Some(param);
                }
            } else if self.check(&TokenKind::Star) {
                let star = self.advance().span;
                if self.check(&TokenKind::Comma) || self.check(terminator) {
                    if state.star.is_some() || state.list_param.is_some() {
                        self.blame(BlameKind::CannotHaveMoreThanOneListParameter, star);
                    } else {
                        state.star = Some(star);
                    }
                } else {
                    let param =
                        self.parse_parameter(ParamRole::VariadicList, &mut state.names, start)?;
                    let span = self.span_of(param);
                    if state.star.is_some() {
                        self.blame(BlameKind::ListParameterAfterKeywordOnlyMarker, span);
                        state.lexical.push(param);
                    } else if state.list_param.is_some() {
                        self.blame(BlameKind::CannotHaveMoreThanOneListParameter, span);
                        state.lexical.push(param);
                    } else {
                        state.list_param = Some(param);
                    }
                }
                state.keyword_section = true;
            } else if state.keyword_section {
                let param = self.parse_parameter(ParamRole::KeywordOnly, &mut state.names, start)?;
                state.have_keyword_only = true;
                state.lexical.push(param);
            } else {
                let param = self.parse_parameter(ParamRole::Positional, &mut state.names, start)?;
                if self.has_default(param)? {
                    state.require_defaults = true;
                } else if state.require_defaults {
                    let span = self.span_of(param);
                    self.blame(BlameKind::ExpectedDefaultParameterValue, span);
                }
                state.lexical.push(param);
            }

            if self.check(terminator) || !self.expect_param_separator(terminator) {
                break;
            }
        }

        if let Some(star) = state.star {
            if !state.have_keyword_only {
                let span = state.map_param.map_or(star, |map| self.span_of(map));
                self.blame(BlameKind::NamedArgumentsMustFollowStar, span);
            }
        }

        let mut params = state.lexical;
        params.extend(state.list_param);
        params.extend(state.map_param);
        Ok(params)
    }

    /// Eats a `,`. Otherwise blames the token and skips to `terminator`,
    /// returning false.
    fn expect_param_separator(&mut self, terminator: &TokenKind) -> bool {
        if self.maybe_eat(&TokenKind::Comma) {
            return true;
        }
        let found = self.peek().clone();
        self.blame_message(
            BlameKind::ExpectedToken,
            found.span,
            format!("expected `,` or `{}`, found {}", terminator, found.kind),
        );
        while !self.check(terminator)
            && !self.check(&TokenKind::Newline)
            && !self.stream.is_end()
        {
            self.advance();
        }
        false
    }

    /// `name [: Type] [= default]` after any `*` or `**` prefix starting at
    /// `start` has been consumed.
    fn parse_parameter(
        &mut self,
        role: ParamRole,
        names: &mut FxHashSet<SmolStr>,
        start: usize,
    ) -> ParseResult<NodeId> {
        let name = self.parse_name()?;
        match self.ast.kind(name)? {
            NodeKind::Name(n) => {
                if !names.insert(n.name.clone()) {
                    let span = self.span_of(name);
                    self.blame(BlameKind::DuplicatedParameter, span);
                }
            }
            _ => {
                let structural = self.peek().kind.is_layout()
                    || matches!(
                        self.peek().kind,
                        TokenKind::Comma
                            | TokenKind::Colon
                            | TokenKind::Eq
                            | TokenKind::RParen
                            | TokenKind::LBrace
                    );
                if !structural {
                    self.advance();
                }
            }
        }

        let value_type = if self.maybe_eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            self.eat(TokenKind::Colon);
            if matches!(
                self.peek().kind,
                TokenKind::Identifier(_) | TokenKind::LParen
            ) {
                Some(self.parse_type()?)
            } else {
                None
            }
        };

        let default_value = if self.maybe_eat(&TokenKind::Eq) {
            Some(self.parse_infix()?)
        } else {
            None
        };

        let span = self.span_from(start);
        self.alloc(
            NodeKind::FunctionParameter(FunctionParameter {
                name,
                value_type,
                default_value,
                role,
            }),
            span,
        )
    }

    fn has_default(&self, param: NodeId) -> ParseResult<bool> {
        Ok(matches!(
            self.ast.kind(param)?,
            NodeKind::FunctionParameter(p) if p.default_value.is_some()
        ))
    }
}

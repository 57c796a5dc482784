//! Functions, arrow functions, methods, classes and binding patterns.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::ParseResult;
use crate::parser::ast::{
    ArrayPat, ArrowBody, ArrowExpr, AssignPat, BlockStmt, Class, ClassBody, ClassMember, Expr,
    ExprStmt, Function, Ident, MethodDef, MethodKind, ObjectPat, ObjectPatProp, Pat, PatProp,
    PrivateIdent, PropKey, PropertyDef, RestElement, StaticBlock, Stmt,
};
use crate::parser::context::Context;
use crate::parser::scanner::{Position, TokenKind};
use crate::parser::scope::{BindingKind, ScopeKind};
use crate::parser::state::{Parser, PrivateKind, PrivateScope};
use crate::parser::statement::StmtContext;

/// Where a `function` or `class` keyword was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FunctionPosition {
    /// A declaration in a statement list; the name is required.
    Statement,
    /// `if (x) function f() {}` under annex B; the name is not bound.
    Hanging,
    /// `export default function () {}`; the name is optional.
    DefaultExport,
    /// An expression; the name is local to the function.
    Expression,
}

/// Accessor kind of a getter or setter method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Accessor {
    Get,
    Set,
}

fn is_simple_params(params: &[Pat]) -> bool {
    params.iter().all(|p| matches!(p, Pat::Ident(_)))
}

/// `true` if `key` is the non-computed name `name`.
fn key_is(key: &PropKey, name: &str) -> bool {
    matches!(key, PropKey::Ident(_) | PropKey::Lit(_)) && key.static_name().as_deref() == Some(name)
}

fn is_class_element_name_start(kind: TokenKind) -> bool {
    kind.is_identifier_name()
        || matches!(
            kind,
            TokenKind::PrivateIdentifier
                | TokenKind::NumericLiteral
                | TokenKind::StringLiteral
                | TokenKind::LeftBracket
        )
}

impl Parser<'_> {
    // ─────────────────────────────────────────────────────────────────────────
    // Functions
    // ─────────────────────────────────────────────────────────────────────────

    /// `function [*] name? (params) { body }`.  For `async function` the
    /// caller has already consumed `async`.
    pub(crate) fn parse_function(
        &mut self,
        ctx: Context,
        start: Position,
        position: FunctionPosition,
        is_async: bool,
    ) -> ParseResult<Function> {
        self.expect(TokenKind::Function)?;
        let is_generator = self.eat(TokenKind::Star)?;
        let fn_ctx = ctx.enter_function(is_async, is_generator);

        let id = if self.kind().is_identifier_like() {
            Some(self.parse_binding_ident()?)
        } else if position == FunctionPosition::Statement
            || position == FunctionPosition::Hanging
        {
            return self.unexpected();
        } else {
            None
        };
        if let Some(id) = &id {
            match position {
                FunctionPosition::Statement | FunctionPosition::DefaultExport => {
                    let kind = self.function_binding_kind(ctx, is_async, is_generator);
                    self.check_lval_ident(ctx, id, Some(kind))?;
                }
                FunctionPosition::Hanging => self.check_lval_ident(ctx, id, None)?,
                FunctionPosition::Expression => self.check_own_name(fn_ctx, id)?,
            }
        }

        let outer_markers = self.take_markers();
        let outer_labels = std::mem::take(&mut self.labels);
        self.scopes.enter(ScopeKind::Function);
        let params = self.parse_formal_params(fn_ctx)?;
        let body = self.parse_function_body(fn_ctx, &params, false, id.as_ref())?;
        self.scopes.exit();
        self.labels = outer_labels;
        self.markers = outer_markers;

        Ok(Function {
            loc: self.finish(start),
            id,
            is_async,
            is_generator,
            params,
            body,
        })
    }

    /// Sloppy plain function declarations may repeat; everything else binds
    /// like `var` at function level and like `let` in blocks.
    fn function_binding_kind(&self, ctx: Context, is_async: bool, is_generator: bool) -> BindingKind {
        if ctx.annex_b() && !is_async && !is_generator {
            return BindingKind::Function;
        }
        match self.scopes.current_kind() {
            ScopeKind::Script | ScopeKind::Function => BindingKind::Var,
            _ => BindingKind::Lexical,
        }
    }

    /// Validate the name a function or class gives itself.
    fn check_own_name(&self, ctx: Context, id: &Ident) -> ParseResult<()> {
        if ctx.is_strict() && matches!(id.name.as_str(), "eval" | "arguments") {
            return self.raise_at(id.loc.start, format!("Binding {} in strict mode", id.name));
        }
        self.check_identifier_name(ctx, &id.name, id.loc.start)
    }

    /// `( params )`.  Names are declared later by [`Parser::check_params`].
    fn parse_formal_params(&mut self, ctx: Context) -> ParseResult<Vec<Pat>> {
        self.expect(TokenKind::LeftParen)?;
        let param_ctx = ctx.enter_parameters();
        let mut params = Vec::new();
        while !self.eat(TokenKind::RightParen)? {
            if !params.is_empty() {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::RightParen)? {
                    break;
                }
            }
            if self.at(TokenKind::DotDotDot) {
                let rest = self.parse_rest_binding(param_ctx)?;
                params.push(Pat::Rest(Box::new(rest)));
                if self.at(TokenKind::Comma) {
                    return self.raise(self.start(), "Comma is not permitted after the rest element");
                }
                self.expect(TokenKind::RightParen)?;
                break;
            }
            params.push(self.parse_binding_element(param_ctx)?);
        }
        Ok(params)
    }

    /// Declare `params` in the current (function) scope.
    pub(crate) fn check_params(
        &mut self,
        ctx: Context,
        params: &[Pat],
        allow_duplicates: bool,
    ) -> ParseResult<()> {
        let mut seen = FxHashSet::default();
        for param in params {
            self.check_lval_pattern(ctx, param, Some(BindingKind::Var))?;
            let mut clash = None;
            param.for_each_binding(&mut |id| {
                if !seen.insert(id.name.clone()) && clash.is_none() {
                    clash = Some(id.loc.start);
                }
            });
            if let Some(offset) = clash
                && !allow_duplicates
            {
                return self.raise_at(offset, "Argument name clash");
            }
        }
        Ok(())
    }

    /// `{ body }` of a function, method or arrow.  A `"use strict"`
    /// directive applies retroactively to the name and parameters.
    fn parse_function_body(
        &mut self,
        ctx: Context,
        params: &[Pat],
        unique_params: bool,
        id: Option<&Ident>,
    ) -> ParseResult<BlockStmt> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let (mut body, body_ctx) = self.parse_directives(ctx.allow_in())?;
        let simple = is_simple_params(params);
        if body_ctx.is_strict() && !ctx.is_strict() {
            if !simple {
                return self.raise(
                    start,
                    "Illegal 'use strict' directive in function with non-simple parameter list",
                );
            }
            if let Some(id) = id {
                self.check_own_name(body_ctx, id)?;
            }
        }
        let allow_duplicates = !body_ctx.is_strict() && !unique_params && simple;
        self.check_params(body_ctx, params, allow_duplicates)?;
        while !self.at(TokenKind::RightBrace) {
            body.push(self.parse_statement(body_ctx, StmtContext::List)?);
        }
        self.bump()?;
        Ok(BlockStmt {
            loc: self.finish(start),
            body,
        })
    }

    /// The directive prologue of a program or function body.  Returns the
    /// parsed statements and the context, made strict by `"use strict"`.
    pub(crate) fn parse_directives(&mut self, ctx: Context) -> ParseResult<(Vec<Stmt>, Context)> {
        let mut ctx = ctx;
        let mut stmts = Vec::new();
        let mut first_octal: Option<Position> = None;
        while self.at(TokenKind::StringLiteral) {
            let span = self.token.span;
            let legacy_octal = self.token.legacy_octal;
            let mut stmt = self.parse_statement(ctx, StmtContext::List)?;
            // Only a lone string literal is a directive: `"a" + b;` ends the
            // prologue.
            let Stmt::Expr(ExprStmt {
                expr, directive, ..
            }) = &mut stmt
            else {
                stmts.push(stmt);
                break;
            };
            let expr_loc = expr.loc();
            if expr_loc.start != span.start.offset || expr_loc.end != span.end.offset {
                stmts.push(stmt);
                break;
            }
            let raw = self.source[span.start.offset + 1..span.end.offset - 1].to_owned();
            let use_strict = raw == "use strict";
            *directive = Some(raw);
            if legacy_octal {
                first_octal.get_or_insert(span.start);
            }
            if use_strict && !ctx.is_strict() {
                if let Some(pos) = first_octal {
                    return self.raise(pos, "Octal escape sequences are not allowed in strict mode");
                }
                trace!(offset = span.start.offset, "use strict directive");
                ctx = ctx.enter_strict();
            }
            stmts.push(stmt);
        }
        Ok((stmts, ctx))
    }

    /// Parse `=> body` for already converted `params`.
    pub(crate) fn parse_arrow_function(
        &mut self,
        ctx: Context,
        start: Position,
        params: Vec<Pat>,
        is_async: bool,
    ) -> ParseResult<Expr> {
        let arrow_ctx = ctx.enter_arrow(is_async);
        self.expect(TokenKind::Arrow)?;
        let outer_markers = self.take_markers();
        let outer_labels = std::mem::take(&mut self.labels);
        self.scopes.enter(ScopeKind::Function);
        let body = if self.at(TokenKind::LeftBrace) {
            ArrowBody::Block(self.parse_function_body(arrow_ctx, &params, true, None)?)
        } else {
            self.check_params(arrow_ctx, &params, false)?;
            let body_ctx = arrow_ctx | (ctx & Context::NO_IN);
            ArrowBody::Expr(Box::new(self.parse_assign(body_ctx, None)?))
        };
        self.scopes.exit();
        self.labels = outer_labels;
        self.markers = outer_markers;
        Ok(Expr::Arrow(Box::new(ArrowExpr {
            loc: self.finish(start),
            is_async,
            params,
            body,
        })))
    }

    /// `(params) { body }` of an object or class method.  `ctx` is already
    /// the method context.
    pub(crate) fn parse_method(
        &mut self,
        ctx: Context,
        is_async: bool,
        is_generator: bool,
        accessor: Option<Accessor>,
    ) -> ParseResult<Function> {
        let start = self.start();
        let outer_markers = self.take_markers();
        let outer_labels = std::mem::take(&mut self.labels);
        self.scopes.enter(ScopeKind::Function);
        let params = self.parse_formal_params(ctx)?;
        match accessor {
            Some(Accessor::Get) if !params.is_empty() => {
                return self.raise(start, "getter should have no params");
            }
            Some(Accessor::Set) if params.len() != 1 => {
                return self.raise(start, "setter should have exactly one param");
            }
            Some(Accessor::Set) if matches!(params[0], Pat::Rest(_)) => {
                return self.raise_at(params[0].loc().start, "Setter cannot use rest params");
            }
            _ => {}
        }
        let body = self.parse_function_body(ctx, &params, true, None)?;
        self.scopes.exit();
        self.labels = outer_labels;
        self.markers = outer_markers;
        Ok(Function {
            loc: self.finish(start),
            id: None,
            is_async,
            is_generator,
            params,
            body,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Binding patterns
    // ─────────────────────────────────────────────────────────────────────────

    /// A binding target with an optional `= default`.
    pub(crate) fn parse_binding_element(&mut self, ctx: Context) -> ParseResult<Pat> {
        let start = self.start();
        let target = self.parse_binding_target(ctx)?;
        if !self.eat(TokenKind::Equal)? {
            return Ok(target);
        }
        let right = self.parse_assign(ctx.allow_in(), None)?;
        Ok(Pat::Assign(Box::new(AssignPat {
            loc: self.finish(start),
            left: Box::new(target),
            right: Box::new(right),
        })))
    }

    /// An identifier, array pattern or object pattern.
    pub(crate) fn parse_binding_target(&mut self, ctx: Context) -> ParseResult<Pat> {
        match self.kind() {
            TokenKind::LeftBracket => self.nested(|p| p.parse_array_binding(ctx)),
            TokenKind::LeftBrace => self.nested(|p| p.parse_object_binding(ctx)),
            kind if kind.is_identifier_like() => Ok(Pat::Ident(self.parse_binding_ident()?)),
            _ => self.unexpected(),
        }
    }

    /// `...target`
    pub(crate) fn parse_rest_binding(&mut self, ctx: Context) -> ParseResult<RestElement> {
        let start = self.start();
        self.expect(TokenKind::DotDotDot)?;
        let argument = self.parse_binding_target(ctx)?;
        Ok(RestElement {
            loc: self.finish(start),
            argument: Box::new(argument),
        })
    }

    fn parse_array_binding(&mut self, ctx: Context) -> ParseResult<Pat> {
        let start = self.start();
        self.expect(TokenKind::LeftBracket)?;
        let mut elements = Vec::new();
        while !self.eat(TokenKind::RightBracket)? {
            if self.eat(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                let rest = self.parse_rest_binding(ctx)?;
                elements.push(Some(Pat::Rest(Box::new(rest))));
                if self.at(TokenKind::Comma) {
                    return self.raise(self.start(), "Comma is not permitted after the rest element");
                }
                self.expect(TokenKind::RightBracket)?;
                break;
            }
            elements.push(Some(self.parse_binding_element(ctx)?));
            if !self.at(TokenKind::RightBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Pat::Array(Box::new(ArrayPat {
            loc: self.finish(start),
            elements,
        })))
    }

    fn parse_object_binding(&mut self, ctx: Context) -> ParseResult<Pat> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        while !self.eat(TokenKind::RightBrace)? {
            if self.at(TokenKind::DotDotDot) {
                let rest_start = self.start();
                self.bump()?;
                if !self.kind().is_identifier_like() {
                    return self.unexpected();
                }
                let argument = Pat::Ident(self.parse_binding_ident()?);
                properties.push(ObjectPatProp::Rest(RestElement {
                    loc: self.finish(rest_start),
                    argument: Box::new(argument),
                }));
                if self.at(TokenKind::Comma) {
                    return self.raise(self.start(), "Comma is not permitted after the rest element");
                }
                self.expect(TokenKind::RightBrace)?;
                break;
            }
            properties.push(self.parse_binding_property(ctx)?);
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Pat::Object(Box::new(ObjectPat {
            loc: self.finish(start),
            properties,
        })))
    }

    fn parse_binding_property(&mut self, ctx: Context) -> ParseResult<ObjectPatProp> {
        let start = self.start();
        let key_kind = self.kind();
        let key = self.parse_property_name(ctx)?;
        if self.eat(TokenKind::Colon)? {
            let value = self.parse_binding_element(ctx)?;
            return Ok(ObjectPatProp::Prop(Box::new(PatProp {
                loc: self.finish(start),
                key,
                shorthand: false,
                value,
            })));
        }
        let PropKey::Ident(id) = &key else {
            return self.unexpected();
        };
        if !key_kind.is_identifier_like() {
            return self.raise_at(id.loc.start, format!("Unexpected keyword '{}'", id.name));
        }
        let mut value = Pat::Ident(id.clone());
        if self.eat(TokenKind::Equal)? {
            let right = self.parse_assign(ctx.allow_in(), None)?;
            value = Pat::Assign(Box::new(AssignPat {
                loc: self.finish(start),
                left: Box::new(value),
                right: Box::new(right),
            }));
        }
        Ok(ObjectPatProp::Prop(Box::new(PatProp {
            loc: self.finish(start),
            key,
            shorthand: true,
            value,
        })))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Classes
    // ─────────────────────────────────────────────────────────────────────────

    /// `class name? [extends heritage] { members }`.  All parts are strict.
    pub(crate) fn parse_class(
        &mut self,
        ctx: Context,
        start: Position,
        position: FunctionPosition,
    ) -> ParseResult<Class> {
        self.expect(TokenKind::Class)?;
        let class_ctx = ctx.enter_strict();

        let id = if self.kind().is_identifier_like() {
            Some(self.parse_binding_ident()?)
        } else if position == FunctionPosition::Statement {
            return self.unexpected();
        } else {
            None
        };
        if let Some(id) = &id {
            match position {
                FunctionPosition::Expression => self.check_own_name(class_ctx, id)?,
                _ => self.check_lval_ident(class_ctx, id, Some(BindingKind::Lexical))?,
            }
        }

        let super_class = if self.eat(TokenKind::Extends)? {
            Some(Box::new(self.parse_heritage(class_ctx)?))
        } else {
            None
        };

        let body_start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        self.private_scopes.push(PrivateScope::default());
        let member_ctx = class_ctx.enter_class_body();
        let mut members = Vec::new();
        let mut has_constructor = false;
        while !self.eat(TokenKind::RightBrace)? {
            if self.eat(TokenKind::Semicolon)? {
                continue;
            }
            let member = self.parse_class_member(member_ctx, super_class.is_some())?;
            if let ClassMember::Method(method) = &member
                && method.kind == MethodKind::Constructor
            {
                if has_constructor {
                    return self.raise_at(
                        method.key.loc().start,
                        "Duplicate constructor in the same class",
                    );
                }
                has_constructor = true;
            }
            members.push(member);
        }
        self.exit_private_scope()?;

        Ok(Class {
            loc: self.finish(start),
            id,
            super_class,
            body: ClassBody {
                loc: self.finish(body_start),
                body: members,
            },
        })
    }

    /// The left-hand-side expression after `extends`.
    fn parse_heritage(&mut self, ctx: Context) -> ParseResult<Expr> {
        let start = self.start();
        self.potential_arrow_at = None;
        let expr = self.nested(|p| p.parse_lhs_expression(ctx))?;
        trace!(start = start.offset, "class heritage");
        Ok(expr)
    }

    fn parse_class_member(&mut self, ctx: Context, has_super: bool) -> ParseResult<ClassMember> {
        let start = self.start();
        let mut modifier_as_key = None;

        let mut is_static = false;
        if self.at(TokenKind::Static) {
            let token = self.bump()?;
            if self.at(TokenKind::LeftBrace) {
                return self.parse_static_block(ctx, start);
            }
            if is_class_element_name_start(self.kind()) || self.at(TokenKind::Star) {
                is_static = true;
            } else {
                modifier_as_key = Some(token);
            }
        }

        let mut is_async = false;
        if modifier_as_key.is_none() && self.at(TokenKind::Async) {
            let token = self.bump()?;
            if (is_class_element_name_start(self.kind()) || self.at(TokenKind::Star))
                && !self.can_insert_semicolon()
            {
                is_async = true;
            } else {
                modifier_as_key = Some(token);
            }
        }

        let is_generator = modifier_as_key.is_none() && self.eat(TokenKind::Star)?;

        let mut kind = MethodKind::Method;
        if modifier_as_key.is_none()
            && !is_async
            && !is_generator
            && matches!(self.kind(), TokenKind::Get | TokenKind::Set)
        {
            let token = self.bump()?;
            if is_class_element_name_start(self.kind()) {
                kind = if token.kind == TokenKind::Get {
                    MethodKind::Get
                } else {
                    MethodKind::Set
                };
            } else {
                modifier_as_key = Some(token);
            }
        }

        let key = match modifier_as_key {
            Some(token) => PropKey::Ident(self.keyword_ident(&token)),
            None => self.parse_class_element_name(ctx)?,
        };

        if self.at(TokenKind::LeftParen) || kind != MethodKind::Method || is_generator || is_async
        {
            let is_constructor = !is_static && key_is(&key, "constructor");
            let key_start = key.loc().start;
            if is_constructor {
                if kind != MethodKind::Method {
                    return self.raise_at(key_start, "Constructor can't have get/set modifier");
                }
                if is_generator {
                    return self.raise_at(key_start, "Constructor can't be a generator");
                }
                if is_async {
                    return self.raise_at(key_start, "Constructor can't be an async method");
                }
            } else if is_static && key_is(&key, "prototype") {
                return self.raise_at(
                    key_start,
                    "Classes may not have a static property named prototype",
                );
            }
            let accessor = match kind {
                MethodKind::Get => Some(Accessor::Get),
                MethodKind::Set => Some(Accessor::Set),
                _ => None,
            };
            let method_ctx = ctx.enter_method(is_async, is_generator, is_constructor && has_super);
            let value = self.parse_method(method_ctx, is_async, is_generator, accessor)?;
            if let PropKey::Private(name) = &key {
                let private_kind = match kind {
                    MethodKind::Get => PrivateKind::Getter { is_static },
                    MethodKind::Set => PrivateKind::Setter { is_static },
                    _ => PrivateKind::Plain,
                };
                self.declare_private_name(name, private_kind)?;
            }
            return Ok(ClassMember::Method(MethodDef {
                loc: self.finish(start),
                is_static,
                kind: if is_constructor {
                    MethodKind::Constructor
                } else {
                    kind
                },
                key,
                value: Box::new(value),
            }));
        }

        // Field definition.
        if key_is(&key, "constructor") {
            return self.raise_at(key.loc().start, "Classes can't have a field named 'constructor'");
        }
        if is_static && key_is(&key, "prototype") {
            return self.raise_at(
                key.loc().start,
                "Classes can't have a static field named 'prototype'",
            );
        }
        let value = if self.eat(TokenKind::Equal)? {
            let outer_markers = self.take_markers();
            let outer_labels = std::mem::take(&mut self.labels);
            let init = self.parse_assign(ctx.enter_field_initializer(), None)?;
            self.labels = outer_labels;
            self.markers = outer_markers;
            Some(Box::new(init))
        } else {
            None
        };
        self.semicolon()?;
        if let PropKey::Private(name) = &key {
            self.declare_private_name(name, PrivateKind::Plain)?;
        }
        Ok(ClassMember::Property(PropertyDef {
            loc: self.finish(start),
            is_static,
            key,
            value,
        }))
    }

    /// A class element name; private names are declarations here.
    fn parse_class_element_name(&mut self, ctx: Context) -> ParseResult<PropKey> {
        if !self.at(TokenKind::PrivateIdentifier) {
            return self.parse_property_name(ctx);
        }
        let token = self.bump()?;
        let name = token.name().unwrap_or_default().to_owned();
        if name == "constructor" {
            return self.raise(
                token.span.start,
                "Classes can't have an element named '#constructor'",
            );
        }
        Ok(PropKey::Private(PrivateIdent {
            loc: self.loc_between(token.span.start, token.span.end),
            name,
        }))
    }

    /// `static { … }`; the `static` keyword is already consumed.
    fn parse_static_block(&mut self, ctx: Context, start: Position) -> ParseResult<ClassMember> {
        self.expect(TokenKind::LeftBrace)?;
        let block_ctx = ctx.enter_static_block();
        let outer_markers = self.take_markers();
        let outer_labels = std::mem::take(&mut self.labels);
        self.scopes.enter(ScopeKind::StaticBlock);
        let mut body = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            body.push(self.parse_statement(block_ctx, StmtContext::List)?);
        }
        self.bump()?;
        self.scopes.exit();
        self.labels = outer_labels;
        self.markers = outer_markers;
        Ok(ClassMember::StaticBlock(StaticBlock {
            loc: self.finish(start),
            body,
        }))
    }

    /// Record a private name declaration.  A getter and a setter of the
    /// same staticness may share a name.
    fn declare_private_name(&mut self, name: &PrivateIdent, kind: PrivateKind) -> ParseResult<()> {
        let Some(scope) = self.private_scopes.last_mut() else {
            return Ok(());
        };
        let conflict = match (scope.declared.get(&name.name).copied(), kind) {
            (None, _) => {
                scope.declared.insert(name.name.clone(), kind);
                false
            }
            (Some(PrivateKind::Getter { is_static: a }), PrivateKind::Setter { is_static: b })
            | (Some(PrivateKind::Setter { is_static: a }), PrivateKind::Getter { is_static: b })
                if a == b =>
            {
                scope.declared.insert(name.name.clone(), PrivateKind::Accessor);
                false
            }
            _ => true,
        };
        if conflict {
            return self.raise_at(
                name.loc.start,
                format!("Identifier '#{}' has already been declared", name.name),
            );
        }
        Ok(())
    }

    /// Close a class body: names it used but did not declare move to the
    /// enclosing class, or are an error at the outermost one.
    fn exit_private_scope(&mut self) -> ParseResult<()> {
        let Some(scope) = self.private_scopes.pop() else {
            return Ok(());
        };
        for (name, offset) in scope.used {
            if scope.declared.contains_key(&name) {
                continue;
            }
            match self.private_scopes.last_mut() {
                Some(parent) => parent.used.push((name, offset)),
                None => {
                    return self.raise_at(
                        offset,
                        format!("Private field '#{name}' must be declared in an enclosing class"),
                    );
                }
            }
        }
        Ok(())
    }
}

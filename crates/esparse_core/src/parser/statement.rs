//! Statement grammar.

use tracing::trace;

use crate::error::ParseResult;
use crate::parser::ast::{
    BlockStmt, BreakStmt, CatchClause, ContinueStmt, DebuggerStmt, DoWhileStmt, EmptyStmt,
    Expr, ExprStmt, ForInOfLeft, ForInStmt, ForInit, ForOfStmt, ForStmt, Ident, IfStmt, LabeledStmt,
    Pat, ProgramItem, ReturnStmt, Stmt, SwitchCase, SwitchStmt, ThrowStmt, TryStmt, VarDecl,
    VarDeclarator, VarKind, WhileStmt, WithStmt,
};
use crate::parser::context::Context;
use crate::parser::cover::CoverGrammar;
use crate::parser::function::FunctionPosition;
use crate::parser::scanner::{Position, TokenKind};
use crate::parser::scope::{BindingKind, ScopeKind};
use crate::parser::state::{Label, LabelKind, Parser};

/// The syntactic slot a statement is parsed in.  Declarations are only
/// allowed in statement lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StmtContext {
    /// A block, function body, case clause or the program.
    List,
    /// The body of an `if` or `else`.
    If,
    /// The body of a label in a statement list (possibly after more labels).
    Label,
    /// Any other single-statement body (loops, `with`, labelled bodies of
    /// those).
    Body,
}

impl StmtContext {
    fn labeled(self) -> Self {
        match self {
            StmtContext::List | StmtContext::Label => StmtContext::Label,
            StmtContext::If | StmtContext::Body => StmtContext::Body,
        }
    }
}

const IMPORT_EXPORT_GOAL: &str = "'import' and 'export' may appear only with 'sourceType: module'";
const IMPORT_EXPORT_TOP_LEVEL: &str = "'import' and 'export' may only appear at the top level";

impl Parser<'_> {
    /// One element of the program body: a statement or, in a module, an
    /// import/export declaration.
    pub(crate) fn parse_program_item(&mut self, ctx: Context) -> ParseResult<ProgramItem> {
        if self.at_module_item()? {
            if !ctx.is_module() {
                return self.raise(self.start(), IMPORT_EXPORT_GOAL);
            }
            let decl = if self.at(TokenKind::Import) {
                self.parse_import(ctx)?
            } else {
                self.parse_export(ctx)?
            };
            return Ok(ProgramItem::ModuleDecl(decl));
        }
        Ok(ProgramItem::Stmt(self.parse_statement(ctx, StmtContext::List)?))
    }

    /// `import`/`export` declaration, as opposed to `import(…)` and
    /// `import.meta`.
    fn at_module_item(&mut self) -> ParseResult<bool> {
        match self.kind() {
            TokenKind::Export => Ok(true),
            TokenKind::Import => {
                let next = self.peek()?.kind;
                Ok(!matches!(next, TokenKind::LeftParen | TokenKind::Dot))
            }
            _ => Ok(false),
        }
    }

    /// Parse one statement or declaration.
    pub(crate) fn parse_statement(&mut self, ctx: Context, sctx: StmtContext) -> ParseResult<Stmt> {
        self.nested(|p| p.parse_statement_inner(ctx, sctx))
    }

    fn parse_statement_inner(&mut self, ctx: Context, sctx: StmtContext) -> ParseResult<Stmt> {
        let start = self.start();
        match self.kind() {
            TokenKind::Break | TokenKind::Continue => self.parse_break_continue(ctx),
            TokenKind::Debugger => {
                self.bump()?;
                self.semicolon()?;
                Ok(Stmt::Debugger(DebuggerStmt {
                    loc: self.finish(start),
                }))
            }
            TokenKind::Do => self.parse_do_while(ctx),
            TokenKind::For => self.parse_for(ctx),
            TokenKind::Function => {
                let position = match sctx {
                    StmtContext::List => FunctionPosition::Statement,
                    StmtContext::If | StmtContext::Label if ctx.annex_b() => {
                        if self.peek()?.kind == TokenKind::Star {
                            return self.unexpected();
                        }
                        FunctionPosition::Hanging
                    }
                    _ => return self.unexpected(),
                };
                let func = self.parse_function(ctx, start, position, false)?;
                Ok(Stmt::FnDecl(Box::new(func)))
            }
            TokenKind::Class => {
                if sctx != StmtContext::List {
                    return self.unexpected();
                }
                let class = self.parse_class(ctx, start, FunctionPosition::Statement)?;
                Ok(Stmt::ClassDecl(Box::new(class)))
            }
            TokenKind::If => self.parse_if(ctx),
            TokenKind::Return => self.parse_return(ctx),
            TokenKind::Switch => self.parse_switch(ctx),
            TokenKind::Throw => self.parse_throw(ctx),
            TokenKind::Try => self.parse_try(ctx),
            TokenKind::Const | TokenKind::Var => {
                let kind = if self.at(TokenKind::Var) {
                    VarKind::Var
                } else {
                    VarKind::Const
                };
                if kind != VarKind::Var && sctx != StmtContext::List {
                    return self.unexpected();
                }
                self.parse_var_statement(ctx, kind)
            }
            TokenKind::While => self.parse_while(ctx),
            TokenKind::With => self.parse_with(ctx),
            TokenKind::LeftBrace => Ok(Stmt::Block(self.parse_block(ctx)?)),
            TokenKind::Semicolon => {
                self.bump()?;
                Ok(Stmt::Empty(EmptyStmt {
                    loc: self.finish(start),
                }))
            }
            TokenKind::Import | TokenKind::Export if self.at_module_item()? => {
                let message = if ctx.is_module() {
                    IMPORT_EXPORT_TOP_LEVEL
                } else {
                    IMPORT_EXPORT_GOAL
                };
                self.raise(start, message)
            }
            TokenKind::Let if self.is_let_declaration(sctx)? => {
                if sctx != StmtContext::List {
                    return self.unexpected();
                }
                self.parse_var_statement(ctx, VarKind::Let)
            }
            TokenKind::Using if self.is_using_declaration(ctx)? => {
                if sctx != StmtContext::List {
                    return self.unexpected();
                }
                if ctx.contains(Context::TOP_LEVEL) && !ctx.is_module() {
                    return self.raise(
                        start,
                        "Using declaration cannot appear in the top level when source type is `script`",
                    );
                }
                self.parse_var_statement(ctx, VarKind::Using)
            }
            TokenKind::Async if self.is_async_function()? => {
                if sctx != StmtContext::List {
                    return self.unexpected();
                }
                self.bump()?;
                let func = self.parse_function(ctx, start, FunctionPosition::Statement, true)?;
                Ok(Stmt::FnDecl(Box::new(func)))
            }
            _ => self.parse_expression_or_labeled(ctx, sctx),
        }
    }

    // ── Lookahead helpers ───────────────────────────────────────────────────

    /// `let` starts a declaration: `let [` always, and in statement lists
    /// also `let {` and `let name` (even across a line break).
    fn is_let_declaration(&mut self, sctx: StmtContext) -> ParseResult<bool> {
        let next = self.peek()?.kind;
        if next == TokenKind::LeftBracket {
            return Ok(true);
        }
        if sctx != StmtContext::List {
            return Ok(false);
        }
        Ok(next == TokenKind::LeftBrace
            || (next.is_identifier_name()
                && !matches!(next, TokenKind::In | TokenKind::Instanceof)))
    }

    /// `using name` on one line, with next syntax enabled.
    fn is_using_declaration(&mut self, ctx: Context) -> ParseResult<bool> {
        if !ctx.contains(Context::NEXT) {
            return Ok(false);
        }
        let next = self.peek()?;
        Ok(next.kind.is_identifier_like() && !next.had_line_terminator_before)
    }

    /// `async function` with no line break in between.
    fn is_async_function(&mut self) -> ParseResult<bool> {
        let next = self.peek()?;
        Ok(next.kind == TokenKind::Function && !next.had_line_terminator_before)
    }

    // ── Blocks ──────────────────────────────────────────────────────────────

    /// `{ statements }` in a new block scope.
    pub(crate) fn parse_block(&mut self, ctx: Context) -> ParseResult<BlockStmt> {
        self.scopes.enter(ScopeKind::Block);
        let block = self.parse_block_in_current_scope(ctx)?;
        self.scopes.exit();
        Ok(block)
    }

    fn parse_block_in_current_scope(&mut self, ctx: Context) -> ParseResult<BlockStmt> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let inner = ctx.enter_block();
        let mut body = Vec::new();
        while !self.at(TokenKind::RightBrace) {
            body.push(self.parse_statement(inner, StmtContext::List)?);
        }
        self.bump()?;
        Ok(BlockStmt {
            loc: self.finish(start),
            body,
        })
    }

    // ── Declarations ────────────────────────────────────────────────────────

    fn parse_var_statement(&mut self, ctx: Context, kind: VarKind) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let mut decl = self.parse_var_declarations(ctx, start, kind, false)?;
        self.semicolon()?;
        decl.loc = self.finish(start);
        Ok(Stmt::VarDecl(decl))
    }

    /// The declarator list after `var`/`let`/`const`/`using`.  In a `for`
    /// head (`in_for`) `in` ends an initializer and a missing initializer is
    /// allowed before `in`/`of`.
    fn parse_var_declarations(
        &mut self,
        ctx: Context,
        start: Position,
        kind: VarKind,
        in_for: bool,
    ) -> ParseResult<VarDecl> {
        let binding = if kind == VarKind::Var {
            BindingKind::Var
        } else {
            BindingKind::Lexical
        };
        let init_ctx = if in_for { ctx.with_no_in() } else { ctx.allow_in() };
        let mut declarations = Vec::new();
        loop {
            let decl_start = self.start();
            let id = if kind == VarKind::Using {
                Pat::Ident(self.parse_binding_ident()?)
            } else {
                self.parse_binding_target(ctx)?
            };
            self.check_lval_pattern(ctx, &id, Some(binding))?;
            let at_for_in_of =
                in_for && matches!(self.kind(), TokenKind::In | TokenKind::Of);
            let init = if self.eat(TokenKind::Equal)? {
                Some(Box::new(self.parse_assign(init_ctx, None)?))
            } else {
                if !at_for_in_of {
                    match kind {
                        VarKind::Const => {
                            return self.raise(self.start(), "Missing initializer in const declaration");
                        }
                        VarKind::Using => {
                            return self.raise(self.start(), "Missing initializer in using declaration");
                        }
                        _ => {}
                    }
                    if !matches!(id, Pat::Ident(_)) {
                        return self.raise(
                            self.prev_end,
                            "Complex binding patterns require an initialization value",
                        );
                    }
                }
                None
            };
            declarations.push(VarDeclarator {
                loc: self.finish(decl_start),
                id,
                init,
            });
            if !self.eat(TokenKind::Comma)? {
                break;
            }
        }
        Ok(VarDecl {
            loc: self.finish(start),
            kind,
            declarations,
        })
    }

    // ── Control flow ────────────────────────────────────────────────────────

    fn parse_paren_expression(&mut self, ctx: Context) -> ParseResult<Box<Expr>> {
        self.expect(TokenKind::LeftParen)?;
        let expr = self.parse_expression(ctx.allow_in(), None)?;
        self.expect(TokenKind::RightParen)?;
        Ok(Box::new(expr))
    }

    fn parse_if(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let test = self.parse_paren_expression(ctx)?;
        let consequent = Box::new(self.parse_statement(ctx, StmtContext::If)?);
        let alternate = if self.eat(TokenKind::Else)? {
            Some(Box::new(self.parse_statement(ctx, StmtContext::If)?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            loc: self.finish(start),
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_while(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let test = self.parse_paren_expression(ctx)?;
        let body = Box::new(self.parse_statement(ctx.enter_iteration(), StmtContext::Body)?);
        Ok(Stmt::While(WhileStmt {
            loc: self.finish(start),
            test,
            body,
        }))
    }

    fn parse_do_while(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let body = Box::new(self.parse_statement(ctx.enter_iteration(), StmtContext::Body)?);
        self.expect(TokenKind::While)?;
        let test = self.parse_paren_expression(ctx)?;
        // The `;` after `do … while (…)` is always optional.
        self.eat(TokenKind::Semicolon)?;
        Ok(Stmt::DoWhile(DoWhileStmt {
            loc: self.finish(start),
            body,
            test,
        }))
    }

    fn parse_with(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        if ctx.is_strict() {
            return self.raise(start, "'with' in strict mode");
        }
        self.bump()?;
        let object = self.parse_paren_expression(ctx)?;
        let body = Box::new(self.parse_statement(ctx, StmtContext::Body)?);
        Ok(Stmt::With(WithStmt {
            loc: self.finish(start),
            object,
            body,
        }))
    }

    fn parse_return(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        if !ctx.can_return() {
            return self.raise(start, "'return' outside of function");
        }
        self.bump()?;
        let argument = if self.at(TokenKind::Semicolon) || self.can_insert_semicolon() {
            None
        } else {
            Some(Box::new(self.parse_expression(ctx.allow_in(), None)?))
        };
        self.semicolon()?;
        Ok(Stmt::Return(ReturnStmt {
            loc: self.finish(start),
            argument,
        }))
    }

    fn parse_throw(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        if self.token.had_line_terminator_before {
            return self.raise(self.prev_end, "Illegal newline after throw");
        }
        let argument = Box::new(self.parse_expression(ctx.allow_in(), None)?);
        self.semicolon()?;
        Ok(Stmt::Throw(ThrowStmt {
            loc: self.finish(start),
            argument,
        }))
    }

    fn parse_break_continue(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        let is_break = self.at(TokenKind::Break);
        self.bump()?;
        let label = if self.at(TokenKind::Semicolon) || self.can_insert_semicolon() {
            None
        } else if self.kind().is_identifier_like() {
            Some(self.parse_ident_reference(ctx)?)
        } else {
            return self.unexpected();
        };
        self.semicolon()?;

        let valid = match &label {
            None if is_break => ctx.intersects(Context::IN_ITERATION | Context::IN_SWITCH),
            None => ctx.contains(Context::IN_ITERATION),
            Some(label) => self
                .labels
                .iter()
                .any(|l| l.name == label.name && (is_break || l.kind == LabelKind::Loop)),
        };
        if !valid {
            let keyword = if is_break { "break" } else { "continue" };
            return self.raise(start, format!("Unsyntactic {keyword}"));
        }

        let loc = self.finish(start);
        Ok(if is_break {
            Stmt::Break(BreakStmt { loc, label })
        } else {
            Stmt::Continue(ContinueStmt { loc, label })
        })
    }

    fn parse_switch(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let discriminant = self.parse_paren_expression(ctx)?;
        self.expect(TokenKind::LeftBrace)?;
        self.scopes.enter(ScopeKind::Block);
        let body_ctx = ctx.enter_switch().enter_block();
        let mut cases = Vec::new();
        let mut has_default = false;
        while !self.at(TokenKind::RightBrace) {
            let case_start = self.start();
            let test = match self.kind() {
                TokenKind::Case => {
                    self.bump()?;
                    Some(Box::new(self.parse_expression(ctx.allow_in(), None)?))
                }
                TokenKind::Default => {
                    if has_default {
                        return self.raise(case_start, "Multiple default clauses");
                    }
                    has_default = true;
                    self.bump()?;
                    None
                }
                _ => return self.unexpected(),
            };
            self.expect(TokenKind::Colon)?;
            let mut consequent = Vec::new();
            while !matches!(
                self.kind(),
                TokenKind::Case | TokenKind::Default | TokenKind::RightBrace
            ) {
                consequent.push(self.parse_statement(body_ctx, StmtContext::List)?);
            }
            cases.push(SwitchCase {
                loc: self.finish(case_start),
                test,
                consequent,
            });
        }
        self.bump()?;
        self.scopes.exit();
        Ok(Stmt::Switch(SwitchStmt {
            loc: self.finish(start),
            discriminant,
            cases,
        }))
    }

    fn parse_try(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let block = self.parse_block(ctx)?;
        let handler = if self.at(TokenKind::Catch) {
            Some(self.parse_catch_clause(ctx)?)
        } else {
            None
        };
        let finalizer = if self.eat(TokenKind::Finally)? {
            Some(self.parse_block(ctx)?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return self.raise(start, "Missing catch or finally clause");
        }
        Ok(Stmt::Try(Box::new(TryStmt {
            loc: self.finish(start),
            block,
            handler,
            finalizer,
        })))
    }

    /// `catch [(param)] { body }`.  The parameter and the body share one
    /// scope.
    fn parse_catch_clause(&mut self, ctx: Context) -> ParseResult<CatchClause> {
        let start = self.start();
        self.bump()?;
        if !self.eat(TokenKind::LeftParen)? {
            let body = self.parse_block(ctx)?;
            return Ok(CatchClause {
                loc: self.finish(start),
                param: None,
                body,
            });
        }
        let param = self.parse_binding_target(ctx)?;
        // `var e` may redeclare a simple catch parameter on the web.
        let simple = matches!(param, Pat::Ident(_)) && ctx.contains(Context::WEB_COMPAT);
        let (scope, binding) = if simple {
            (ScopeKind::SimpleCatch, BindingKind::SimpleCatch)
        } else {
            (ScopeKind::Catch, BindingKind::Lexical)
        };
        self.scopes.enter(scope);
        self.check_lval_pattern(ctx, &param, Some(binding))?;
        self.expect(TokenKind::RightParen)?;
        let body = self.parse_block_in_current_scope(ctx)?;
        self.scopes.exit();
        Ok(CatchClause {
            loc: self.finish(start),
            param: Some(param),
            body,
        })
    }

    // ── for / for-in / for-of ───────────────────────────────────────────────

    fn parse_for(&mut self, ctx: Context) -> ParseResult<Stmt> {
        let start = self.start();
        self.bump()?;
        let is_await = if self.at(TokenKind::Await) && ctx.in_async() {
            self.bump()?;
            true
        } else {
            false
        };
        self.expect(TokenKind::LeftParen)?;
        self.scopes.enter(ScopeKind::Block);
        let stmt = self.parse_for_rest(ctx, start, is_await);
        self.scopes.exit();
        stmt
    }

    fn parse_for_rest(&mut self, ctx: Context, start: Position, is_await: bool) -> ParseResult<Stmt> {
        if self.at(TokenKind::Semicolon) {
            if is_await {
                return self.unexpected();
            }
            return self.parse_for_classic(ctx, start, None);
        }

        let decl_kind = match self.kind() {
            TokenKind::Var => Some(VarKind::Var),
            TokenKind::Const => Some(VarKind::Const),
            TokenKind::Let if self.is_let_declaration(StmtContext::List)? => Some(VarKind::Let),
            TokenKind::Using if self.is_using_declaration(ctx)? => Some(VarKind::Using),
            _ => None,
        };
        if let Some(kind) = decl_kind {
            let decl_start = self.start();
            self.bump()?;
            let decl = self.parse_var_declarations(ctx, decl_start, kind, true)?;
            let is_of = self.at(TokenKind::Of);
            if (is_of || self.at(TokenKind::In)) && decl.declarations.len() == 1 {
                self.check_for_in_of_declaration(ctx, &decl, is_of)?;
                return self.parse_for_in_of(ctx, start, ForInOfLeft::VarDecl(decl), is_of, is_await);
            }
            if is_await || kind == VarKind::Using {
                return self.unexpected();
            }
            return self.parse_for_classic(ctx, start, Some(ForInit::VarDecl(decl)));
        }

        let init_start = self.start();
        let starts_with_let = self.at(TokenKind::Let);
        let starts_with_async = self.at(TokenKind::Async);
        let mut cover = CoverGrammar::default();
        let init = self.parse_expression(ctx.with_no_in(), Some(&mut cover))?;
        let is_of = self.at(TokenKind::Of);
        if is_of || self.at(TokenKind::In) {
            if is_of && starts_with_let {
                return self.raise(
                    init_start,
                    "The left-hand side of a for-of loop may not start with 'let'.",
                );
            }
            if is_of
                && !is_await
                && starts_with_async
                && matches!(&init, Expr::Ident(id) if id.name == "async")
            {
                return self.raise(init_start, "The left-hand side of a for-of loop may not be 'async'.");
            }
            trace!(start = init_start.offset, "for head reinterpreted as assignment target");
            let target = self.to_assignable(ctx, init, false, Some(&cover))?;
            self.check_lval_pattern(ctx, &target, None)?;
            return self.parse_for_in_of(ctx, start, ForInOfLeft::Pat(target), is_of, is_await);
        }
        self.check_expression_errors(&cover)?;
        if is_await {
            return self.unexpected();
        }
        self.parse_for_classic(ctx, start, Some(ForInit::Expr(Box::new(init))))
    }

    /// A declaration in a for-in/of head binds exactly one name without an
    /// initializer, except `for (var x = 1 in o)` under annex B.
    fn check_for_in_of_declaration(&self, ctx: Context, decl: &VarDecl, is_of: bool) -> ParseResult<()> {
        if decl.kind == VarKind::Using && !is_of {
            return self.unexpected();
        }
        let Some(declarator) = decl.declarations.first() else {
            return Ok(());
        };
        if declarator.init.is_some() {
            let tolerated = !is_of
                && decl.kind == VarKind::Var
                && ctx.annex_b()
                && matches!(declarator.id, Pat::Ident(_));
            if !tolerated {
                let what = if is_of { "for-of" } else { "for-in" };
                return self.raise_at(
                    declarator.loc.start,
                    format!("{what} loop variable declaration may not have an initializer."),
                );
            }
        }
        Ok(())
    }

    fn parse_for_classic(
        &mut self,
        ctx: Context,
        start: Position,
        init: Option<ForInit>,
    ) -> ParseResult<Stmt> {
        self.expect(TokenKind::Semicolon)?;
        let test = if self.at(TokenKind::Semicolon) {
            None
        } else {
            Some(Box::new(self.parse_expression(ctx.allow_in(), None)?))
        };
        self.expect(TokenKind::Semicolon)?;
        let update = if self.at(TokenKind::RightParen) {
            None
        } else {
            Some(Box::new(self.parse_expression(ctx.allow_in(), None)?))
        };
        self.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement(ctx.enter_iteration(), StmtContext::Body)?);
        Ok(Stmt::For(Box::new(ForStmt {
            loc: self.finish(start),
            init,
            test,
            update,
            body,
        })))
    }

    fn parse_for_in_of(
        &mut self,
        ctx: Context,
        start: Position,
        left: ForInOfLeft,
        is_of: bool,
        is_await: bool,
    ) -> ParseResult<Stmt> {
        if is_await && !is_of {
            return self.unexpected();
        }
        self.bump()?;
        let right = Box::new(if is_of {
            self.parse_assign(ctx.allow_in(), None)?
        } else {
            self.parse_expression(ctx.allow_in(), None)?
        });
        self.expect(TokenKind::RightParen)?;
        let body = Box::new(self.parse_statement(ctx.enter_iteration(), StmtContext::Body)?);
        let loc = self.finish(start);
        Ok(if is_of {
            Stmt::ForOf(Box::new(ForOfStmt {
                loc,
                is_await,
                left,
                right,
                body,
            }))
        } else {
            Stmt::ForIn(Box::new(ForInStmt {
                loc,
                left,
                right,
                body,
            }))
        })
    }

    // ── Expression and labelled statements ──────────────────────────────────

    fn parse_expression_or_labeled(&mut self, ctx: Context, sctx: StmtContext) -> ParseResult<Stmt> {
        let start = self.start();
        let starts_with_name = self.kind().is_identifier_like();
        let expr = self.parse_expression(ctx.allow_in(), None)?;
        if starts_with_name
            && let Expr::Ident(label) = &expr
            && self.at(TokenKind::Colon)
        {
            let label = label.clone();
            self.bump()?;
            return self.parse_labeled(ctx, sctx, start, label);
        }
        self.semicolon()?;
        Ok(Stmt::Expr(ExprStmt {
            loc: self.finish(start),
            expr: Box::new(expr),
            directive: None,
        }))
    }

    fn parse_labeled(
        &mut self,
        ctx: Context,
        sctx: StmtContext,
        start: Position,
        label: Ident,
    ) -> ParseResult<Stmt> {
        if self.labels.iter().any(|l| l.name == label.name) {
            return self.raise_at(
                label.loc.start,
                format!("Label '{}' is already declared", label.name),
            );
        }
        let kind = if matches!(self.kind(), TokenKind::For | TokenKind::While | TokenKind::Do) {
            LabelKind::Loop
        } else {
            LabelKind::Other
        };
        // `a: b: while (…)` makes both labels loop labels.
        let body_start = self.start().offset;
        for outer in self.labels.iter_mut().rev() {
            if outer.statement_start != start.offset {
                break;
            }
            outer.statement_start = body_start;
            outer.kind = kind;
        }
        self.labels.push(Label {
            name: label.name.clone(),
            kind,
            statement_start: body_start,
        });
        let body = self.parse_statement(ctx, sctx.labeled());
        self.labels.pop();
        Ok(Stmt::Labeled(LabeledStmt {
            loc: self.finish(start),
            label,
            body: Box::new(body?),
        }))
    }
}

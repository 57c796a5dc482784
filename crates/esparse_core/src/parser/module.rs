//! `import` and `export` declarations.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::ParseResult;
use crate::parser::ast::{
    ExportAllDecl, ExportDefaultDecl, ExportDefaultExpr, ExportNamedDecl, ExportSpecifier,
    ImportAttribute, ImportDecl, ImportDefaultSpecifier, ImportNamedSpecifier,
    ImportNamespaceSpecifier, ImportSpecifier, Literal, ModuleDecl, ModuleExportName, Stmt,
};
use crate::parser::context::Context;
use crate::parser::function::FunctionPosition;
use crate::parser::scanner::{Position, TokenKind};
use crate::parser::scope::BindingKind;
use crate::parser::state::Parser;
use crate::parser::statement::StmtContext;

/// Names a declaration exports under `export <declaration>`.
fn declared_names(stmt: &Stmt) -> Vec<(String, usize)> {
    let mut names = Vec::new();
    match stmt {
        Stmt::VarDecl(decl) => {
            for d in &decl.declarations {
                d.id.for_each_binding(&mut |id| names.push((id.name.clone(), id.loc.start)));
            }
        }
        Stmt::FnDecl(func) => {
            if let Some(id) = &func.id {
                names.push((id.name.clone(), id.loc.start));
            }
        }
        Stmt::ClassDecl(class) => {
            if let Some(id) = &class.id {
                names.push((id.name.clone(), id.loc.start));
            }
        }
        _ => {}
    }
    names
}

impl Parser<'_> {
    // ─────────────────────────────────────────────────────────────────────────
    // Imports
    // ─────────────────────────────────────────────────────────────────────────

    /// `import …`.  The caller has ruled out `import(` and `import.meta`.
    pub(crate) fn parse_import(&mut self, ctx: Context) -> ParseResult<ModuleDecl> {
        let start = self.start();
        self.expect(TokenKind::Import)?;

        let mut specifiers = Vec::new();
        if !self.at(TokenKind::StringLiteral) {
            if self.kind().is_identifier_like() {
                let spec_start = self.start();
                let local = self.parse_binding_ident()?;
                self.check_lval_ident(ctx, &local, Some(BindingKind::Lexical))?;
                specifiers.push(ImportSpecifier::Default(ImportDefaultSpecifier {
                    loc: self.finish(spec_start),
                    local,
                }));
                if self.eat(TokenKind::Comma)? {
                    self.parse_import_clause_rest(ctx, &mut specifiers)?;
                }
            } else {
                self.parse_import_clause_rest(ctx, &mut specifiers)?;
            }
            self.expect(TokenKind::From)?;
        }

        let source = self.parse_module_source(ctx)?;
        let attributes = self.parse_import_attributes(ctx)?;
        self.semicolon()?;
        trace!(source = ?source.value, specifiers = specifiers.len(), "import");
        Ok(ModuleDecl::Import(ImportDecl {
            loc: self.finish(start),
            specifiers,
            source,
            attributes,
        }))
    }

    /// `* as ns` or `{ … }` after the optional default binding.
    fn parse_import_clause_rest(
        &mut self,
        ctx: Context,
        specifiers: &mut Vec<ImportSpecifier>,
    ) -> ParseResult<()> {
        if self.at(TokenKind::Star) {
            let spec_start = self.start();
            self.bump()?;
            self.expect(TokenKind::As)?;
            let local = self.parse_binding_ident()?;
            self.check_lval_ident(ctx, &local, Some(BindingKind::Lexical))?;
            specifiers.push(ImportSpecifier::Namespace(ImportNamespaceSpecifier {
                loc: self.finish(spec_start),
                local,
            }));
            return Ok(());
        }

        self.expect(TokenKind::LeftBrace)?;
        while !self.eat(TokenKind::RightBrace)? {
            let spec_start = self.start();
            let imported = self.parse_module_export_name(ctx)?;
            let local = if self.eat(TokenKind::As)? {
                self.parse_binding_ident()?
            } else {
                match &imported {
                    ModuleExportName::Ident(id) => id.clone(),
                    ModuleExportName::Str(lit) => {
                        return self.raise_at(
                            lit.loc.start,
                            "A string literal cannot be used as an imported binding",
                        );
                    }
                }
            };
            self.check_lval_ident(ctx, &local, Some(BindingKind::Lexical))?;
            specifiers.push(ImportSpecifier::Named(ImportNamedSpecifier {
                loc: self.finish(spec_start),
                imported,
                local,
            }));
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(())
    }

    /// The module specifier string.
    fn parse_module_source(&mut self, ctx: Context) -> ParseResult<Literal> {
        if !self.at(TokenKind::StringLiteral) {
            return self.unexpected();
        }
        self.parse_literal(ctx)
    }

    /// `with { key: "value", … }`, or nothing.
    fn parse_import_attributes(&mut self, ctx: Context) -> ParseResult<Vec<ImportAttribute>> {
        if !self.eat(TokenKind::With)? {
            return Ok(Vec::new());
        }
        self.expect(TokenKind::LeftBrace)?;
        let mut attributes = Vec::new();
        let mut seen = FxHashSet::default();
        while !self.eat(TokenKind::RightBrace)? {
            let attr_start = self.start();
            let key = if self.at(TokenKind::StringLiteral) {
                ModuleExportName::Str(self.parse_literal(ctx)?)
            } else {
                ModuleExportName::Ident(self.parse_ident_name()?)
            };
            if !seen.insert(key.name().to_owned()) {
                return self.raise_at(
                    key.loc().start,
                    format!("Duplicate attribute key '{}'", key.name()),
                );
            }
            self.expect(TokenKind::Colon)?;
            if !self.at(TokenKind::StringLiteral) {
                return self.unexpected();
            }
            let value = self.parse_literal(ctx)?;
            attributes.push(ImportAttribute {
                loc: self.finish(attr_start),
                key,
                value,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(attributes)
    }

    /// An identifier name or a string literal naming a module binding.
    fn parse_module_export_name(&mut self, ctx: Context) -> ParseResult<ModuleExportName> {
        if self.at(TokenKind::StringLiteral) {
            return Ok(ModuleExportName::Str(self.parse_literal(ctx)?));
        }
        Ok(ModuleExportName::Ident(self.parse_ident_name()?))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Exports
    // ─────────────────────────────────────────────────────────────────────────

    /// `export …`.
    pub(crate) fn parse_export(&mut self, ctx: Context) -> ParseResult<ModuleDecl> {
        let start = self.start();
        self.expect(TokenKind::Export)?;

        match self.kind() {
            TokenKind::Star => {
                self.bump()?;
                let exported = if self.eat(TokenKind::As)? {
                    let name = self.parse_module_export_name(ctx)?;
                    self.check_export(name.name(), name.loc().start)?;
                    Some(name)
                } else {
                    None
                };
                self.expect(TokenKind::From)?;
                let source = self.parse_module_source(ctx)?;
                let attributes = self.parse_import_attributes(ctx)?;
                self.semicolon()?;
                Ok(ModuleDecl::ExportAll(ExportAllDecl {
                    loc: self.finish(start),
                    exported,
                    source,
                    attributes,
                }))
            }
            TokenKind::Default => {
                self.check_export("default", self.start().offset)?;
                self.bump()?;
                let declaration = self.parse_export_default(ctx)?;
                Ok(ModuleDecl::ExportDefault(ExportDefaultDecl {
                    loc: self.finish(start),
                    declaration,
                }))
            }
            TokenKind::LeftBrace => self.parse_export_specifiers(ctx, start),
            _ => {
                if !self.at_exportable_declaration(ctx)? {
                    return self.unexpected();
                }
                let declaration = self.parse_statement(ctx, StmtContext::List)?;
                for (name, offset) in declared_names(&declaration) {
                    self.check_export(&name, offset)?;
                }
                Ok(ModuleDecl::ExportNamed(ExportNamedDecl {
                    loc: self.finish(start),
                    declaration: Some(Box::new(declaration)),
                    specifiers: Vec::new(),
                    source: None,
                    attributes: Vec::new(),
                }))
            }
        }
    }

    /// The current token starts a declaration that may follow `export`.
    fn at_exportable_declaration(&mut self, ctx: Context) -> ParseResult<bool> {
        Ok(match self.kind() {
            TokenKind::Var | TokenKind::Const | TokenKind::Function | TokenKind::Class => true,
            TokenKind::Let => {
                let next = self.peek()?.kind;
                next.is_identifier_name() || matches!(next, TokenKind::LeftBracket | TokenKind::LeftBrace)
            }
            TokenKind::Async => {
                let next = self.peek()?;
                next.kind == TokenKind::Function && !next.had_line_terminator_before
            }
            TokenKind::Using if ctx.contains(Context::NEXT) => {
                let next = self.peek()?;
                next.kind.is_identifier_like() && !next.had_line_terminator_before
            }
            _ => false,
        })
    }

    /// `export default` followed by a function, class or expression.
    fn parse_export_default(&mut self, ctx: Context) -> ParseResult<ExportDefaultExpr> {
        let start = self.start();
        if self.at(TokenKind::Function) {
            let func = self.parse_function(ctx, start, FunctionPosition::DefaultExport, false)?;
            return Ok(ExportDefaultExpr::Fn(Box::new(func)));
        }
        if self.at(TokenKind::Async) {
            let next = self.peek()?;
            if next.kind == TokenKind::Function && !next.had_line_terminator_before {
                self.bump()?;
                let func = self.parse_function(ctx, start, FunctionPosition::DefaultExport, true)?;
                return Ok(ExportDefaultExpr::Fn(Box::new(func)));
            }
        }
        if self.at(TokenKind::Class) {
            let class = self.parse_class(ctx, start, FunctionPosition::DefaultExport)?;
            return Ok(ExportDefaultExpr::Class(Box::new(class)));
        }
        let expr = self.parse_assign(ctx.allow_in(), None)?;
        self.semicolon()?;
        Ok(ExportDefaultExpr::Expr(Box::new(expr)))
    }

    /// `export { a, b as c } [from "m"]`.
    fn parse_export_specifiers(
        &mut self,
        ctx: Context,
        start: Position,
    ) -> ParseResult<ModuleDecl> {
        self.expect(TokenKind::LeftBrace)?;
        let mut specifiers = Vec::new();
        while !self.eat(TokenKind::RightBrace)? {
            let spec_start = self.start();
            let local = self.parse_module_export_name(ctx)?;
            let exported = if self.eat(TokenKind::As)? {
                self.parse_module_export_name(ctx)?
            } else {
                local.clone()
            };
            self.check_export(exported.name(), exported.loc().start)?;
            specifiers.push(ExportSpecifier {
                loc: self.finish(spec_start),
                local,
                exported,
            });
            if !self.at(TokenKind::RightBrace) {
                self.expect(TokenKind::Comma)?;
            }
        }

        let (source, attributes) = if self.eat(TokenKind::From)? {
            let source = self.parse_module_source(ctx)?;
            let attributes = self.parse_import_attributes(ctx)?;
            (Some(source), attributes)
        } else {
            for spec in &specifiers {
                match &spec.local {
                    ModuleExportName::Str(lit) => {
                        return self.raise_at(
                            lit.loc.start,
                            "A string literal cannot be used as an exported binding without `from`.",
                        );
                    }
                    ModuleExportName::Ident(id) => {
                        // `export { if }` names a keyword, not a binding.
                        self.check_identifier_name(ctx, &id.name, id.loc.start)?;
                        self.pending_exports.push((id.name.clone(), id.loc.start));
                    }
                }
            }
            (None, Vec::new())
        };
        self.semicolon()?;
        Ok(ModuleDecl::ExportNamed(ExportNamedDecl {
            loc: self.finish(start),
            declaration: None,
            specifiers,
            source,
            attributes,
        }))
    }

    /// Record an exported name, rejecting duplicates.
    fn check_export(&mut self, name: &str, offset: usize) -> ParseResult<()> {
        if !self.exported.insert(name.to_owned()) {
            return self.raise_at(offset, format!("Duplicate export '{name}'"));
        }
        Ok(())
    }

    /// Every local name in `export { … }` must be declared somewhere at the
    /// top level of the module.
    pub(crate) fn check_pending_exports(&self) -> ParseResult<()> {
        for (name, offset) in &self.pending_exports {
            if !self.scopes.is_top_level_binding(name) {
                return self.raise_at(*offset, format!("Export '{name}' is not defined"));
            }
        }
        Ok(())
    }
}

//! Identifier and assignment-target validation.
//!
//! Names are judged by their decoded text, so an escaped keyword
//! (`var`) is rejected exactly like the plain one.

use crate::error::ParseResult;
use crate::parser::ast::{Expr, Ident, MemberProp, ObjectPatProp, Pat};
use crate::parser::context::Context;
use crate::parser::scope::BindingKind;
use crate::parser::state::{Parser, with_stack};

/// Words that are never identifiers.
const RESERVED: &[&str] = &[
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "enum",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "if",
    "import",
    "in",
    "instanceof",
    "new",
    "null",
    "return",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "var",
    "void",
    "while",
    "with",
];

/// Words reserved in strict-mode code.
const STRICT_RESERVED: &[&str] = &[
    "implements",
    "interface",
    "let",
    "package",
    "private",
    "protected",
    "public",
    "static",
    "yield",
];

/// `true` if `name` is a reserved word in every context.
pub(crate) fn is_reserved_word(name: &str) -> bool {
    RESERVED.contains(&name)
}

/// `true` if `name` is reserved in strict-mode code only.
pub(crate) fn is_strict_reserved_word(name: &str) -> bool {
    STRICT_RESERVED.contains(&name)
}

impl Parser<'_> {
    /// Check that `name` may be used as an identifier reference or binding
    /// under `ctx`.
    pub(crate) fn check_identifier_name(
        &self,
        ctx: Context,
        name: &str,
        offset: usize,
    ) -> ParseResult<()> {
        if ctx.in_generator() && name == "yield" {
            return self.raise_at(offset, "Cannot use 'yield' as identifier inside a generator");
        }
        if ctx.in_async() && name == "await" {
            return self.raise_at(
                offset,
                "Cannot use 'await' as identifier inside an async function",
            );
        }
        if ctx.contains(Context::IN_STATIC_BLOCK) && matches!(name, "arguments" | "await") {
            return self.raise_at(
                offset,
                format!("Cannot use {name} in class static initialization block"),
            );
        }
        if ctx.contains(Context::IN_CLASS_FIELD) && name == "arguments" {
            return self.raise_at(offset, "Cannot use 'arguments' in class field initializer");
        }
        if is_reserved_word(name) {
            return self.raise_at(offset, format!("Unexpected keyword '{name}'"));
        }
        if ctx.is_strict() && is_strict_reserved_word(name) {
            return self.raise_at(offset, format!("The keyword '{name}' is reserved"));
        }
        // Past the async and static-block checks this leaves module code.
        if name == "await" && ctx.await_reserved() {
            return self.raise_at(offset, "Cannot use keyword 'await' outside an async function");
        }
        Ok(())
    }

    /// Check a single identifier target.  With `binding` the name is also
    /// declared in the current scope.
    pub(crate) fn check_lval_ident(
        &mut self,
        ctx: Context,
        id: &Ident,
        binding: Option<BindingKind>,
    ) -> ParseResult<()> {
        let name = id.name.as_str();
        if ctx.is_strict() && matches!(name, "eval" | "arguments") {
            let verb = if binding.is_some() {
                "Binding"
            } else {
                "Assigning to"
            };
            return self.raise_at(id.loc.start, format!("{verb} {name} in strict mode"));
        }
        if binding == Some(BindingKind::Lexical) && name == "let" {
            return self.raise_at(id.loc.start, "let is disallowed as a lexically bound name");
        }
        self.check_identifier_name(ctx, name, id.loc.start)?;
        if let Some(kind) = binding
            && !self.scopes.declare(name, kind)
        {
            return self.raise_at(
                id.loc.start,
                format!("Identifier '{name}' has already been declared"),
            );
        }
        Ok(())
    }

    /// Validate every target in `pat`, declaring names when `binding` is
    /// given.
    pub(crate) fn check_lval_pattern(
        &mut self,
        ctx: Context,
        pat: &Pat,
        binding: Option<BindingKind>,
    ) -> ParseResult<()> {
        with_stack(|| match pat {
            Pat::Ident(id) => self.check_lval_ident(ctx, id, binding),
            Pat::Array(arr) => {
                for el in arr.elements.iter().flatten() {
                    self.check_lval_pattern(ctx, el, binding)?;
                }
                Ok(())
            }
            Pat::Object(obj) => {
                for prop in &obj.properties {
                    match prop {
                        ObjectPatProp::Prop(p) => {
                            self.check_lval_pattern(ctx, &p.value, binding)?
                        }
                        ObjectPatProp::Rest(r) => {
                            self.check_lval_pattern(ctx, &r.argument, binding)?
                        }
                    }
                }
                Ok(())
            }
            Pat::Rest(rest) => self.check_lval_pattern(ctx, &rest.argument, binding),
            Pat::Assign(assign) => self.check_lval_pattern(ctx, &assign.left, binding),
            Pat::Expr(expr) => {
                if binding.is_some() {
                    return self.raise_at(expr.loc().start, "Binding member expression");
                }
                Ok(())
            }
        })
    }

    /// Reinterpret `expr` as the target of a compound assignment or update:
    /// an identifier or a member expression.
    pub(crate) fn to_simple_target(&mut self, ctx: Context, expr: Expr) -> ParseResult<Pat> {
        match expr {
            Expr::Ident(id) => {
                self.check_lval_ident(ctx, &id, None)?;
                Ok(Pat::Ident(id))
            }
            Expr::Member(_) => Ok(Pat::Expr(Box::new(expr))),
            Expr::Chain(chain) => self.raise_at(
                chain.loc.start,
                "Optional chaining cannot appear in left-hand side",
            ),
            other => self.raise_at(other.loc().start, "Assigning to rvalue"),
        }
    }

    /// Validate the operand of `++`/`--`.
    pub(crate) fn check_update_target(&mut self, ctx: Context, expr: &Expr) -> ParseResult<()> {
        match expr {
            Expr::Ident(id) => self.check_lval_ident(ctx, id, None),
            Expr::Member(_) => Ok(()),
            Expr::Chain(chain) => self.raise_at(
                chain.loc.start,
                "Optional chaining cannot appear in left-hand side",
            ),
            other => self.raise_at(other.loc().start, "Assigning to rvalue"),
        }
    }

    /// Validate the operand of `delete`.
    pub(crate) fn check_delete_operand(&self, ctx: Context, expr: &Expr) -> ParseResult<()> {
        match expr {
            Expr::Ident(id) if ctx.is_strict() => {
                self.raise_at(id.loc.start, "Deleting local variable in strict mode")
            }
            Expr::Member(member) if matches!(member.property, MemberProp::Private(_)) => {
                self.raise_at(member.loc.start, "Private fields can not be deleted")
            }
            Expr::Chain(chain) => self.check_delete_operand(ctx, &chain.expression),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_word_tables() {
        assert!(is_reserved_word("enum"));
        assert!(is_reserved_word("var"));
        assert!(!is_reserved_word("let"));
        assert!(is_strict_reserved_word("let"));
        assert!(is_strict_reserved_word("implements"));
        assert!(!is_strict_reserved_word("await"));
    }
}

//! Cover grammar: expressions that may turn out to be patterns.
//!
//! `[a, b] = c`, `({ x = 1 } = o)` and `(a, b) => a` are all parsed as
//! expressions first.  While the expression is parsed, constructs that are
//! only valid in one of the two readings are recorded in a
//! [`CoverGrammar`]; once the parser knows which reading applies it either
//! reports the expression-only errors or converts the tree with
//! [`Parser::to_assignable`], which reports the pattern-only ones.

use bitflags::bitflags;
use tracing::trace;

use crate::error::ParseResult;
use crate::parser::ast::{
    ArrayPat, AssignOp, AssignPat, Expr, ObjectPat, ObjectPatProp, ObjectProp, Pat, PatProp,
    PropKind, RestElement,
};
use crate::parser::context::Context;
use crate::parser::state::{Parser, with_stack};

bitflags! {
    /// Constructs that disqualify one reading of a cover expression.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub(crate) struct CoverFlags: u8 {
        /// `{ x = 1 }`: valid only as a pattern.
        const SHORTHAND_INIT   = 1 << 0;
        /// A comma after a spread/rest element: invalid as a pattern.
        const TRAILING_COMMA   = 1 << 1;
        /// A parenthesized sub-expression that is not a simple target:
        /// invalid in an assignment pattern.
        const PAREN_ASSIGN     = 1 << 2;
        /// Any parenthesized sub-expression: invalid in a binding pattern.
        const PAREN_BIND       = 1 << 3;
        /// A repeated `__proto__: v` property: valid only as a pattern.
        const DOUBLE_PROTO     = 1 << 4;
    }
}

const FLAG_COUNT: usize = 5;

/// First offending offset per [`CoverFlags`] bit.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CoverGrammar {
    flags: CoverFlags,
    offsets: [usize; FLAG_COUNT],
}

fn slot(flag: CoverFlags) -> usize {
    flag.bits().trailing_zeros() as usize
}

impl CoverGrammar {
    /// Record `flag` at `offset` unless it is already set.
    pub fn mark(&mut self, flag: CoverFlags, offset: usize) {
        if !self.flags.contains(flag) {
            self.flags |= flag;
            self.offsets[slot(flag)] = offset;
        }
    }

    /// Offset recorded for `flag`.
    pub fn get(&self, flag: CoverFlags) -> Option<usize> {
        self.flags
            .contains(flag)
            .then(|| self.offsets[slot(flag)])
    }

    /// Forget `flags`.
    pub fn clear(&mut self, flags: CoverFlags) {
        self.flags -= flags;
    }

    /// Restore `flag` to a previously saved offset.
    pub fn restore(&mut self, flag: CoverFlags, saved: Option<usize>) {
        if let Some(offset) = saved {
            self.flags |= flag;
            self.offsets[slot(flag)] = offset;
        }
    }

    /// The expression is only valid as a pattern.
    pub fn has_expression_errors(&self) -> bool {
        self.flags
            .intersects(CoverFlags::SHORTHAND_INIT | CoverFlags::DOUBLE_PROTO)
    }
}

impl Parser<'_> {
    /// Fail if the cover was used as a plain expression but holds
    /// pattern-only syntax.
    pub(crate) fn check_expression_errors(&self, cover: &CoverGrammar) -> ParseResult<()> {
        if let Some(offset) = cover.get(CoverFlags::SHORTHAND_INIT) {
            return self.raise_at(
                offset,
                "Shorthand property assignments are valid only in destructuring patterns",
            );
        }
        if let Some(offset) = cover.get(CoverFlags::DOUBLE_PROTO) {
            return self.raise_at(offset, "Redefinition of __proto__ property");
        }
        Ok(())
    }

    /// [`Parser::check_expression_errors`] restricted to constructs recorded
    /// at or after `from`.
    pub(crate) fn check_expression_errors_from(
        &self,
        cover: &CoverGrammar,
        from: usize,
    ) -> ParseResult<()> {
        let mut local = CoverGrammar::default();
        for flag in [CoverFlags::SHORTHAND_INIT, CoverFlags::DOUBLE_PROTO] {
            if let Some(offset) = cover.get(flag)
                && offset >= from
            {
                local.mark(flag, offset);
            }
        }
        self.check_expression_errors(&local)
    }

    /// Fail if the cover is converted to a pattern but holds expression-only
    /// syntax.
    pub(crate) fn check_pattern_errors(
        &self,
        cover: &CoverGrammar,
        is_assign: bool,
    ) -> ParseResult<()> {
        if let Some(offset) = cover.get(CoverFlags::TRAILING_COMMA) {
            return self.raise_at(offset, "Comma is not permitted after the rest element");
        }
        let (flag, message) = if is_assign {
            (CoverFlags::PAREN_ASSIGN, "Assigning to rvalue")
        } else {
            (CoverFlags::PAREN_BIND, "Parenthesized pattern")
        };
        if let Some(offset) = cover.get(flag) {
            return self.raise_at(offset, message);
        }
        Ok(())
    }

    /// Reinterpret a cover expression as an assignment (`is_binding ==
    /// false`) or binding pattern.  Names are not validated here; callers
    /// follow up with [`Parser::check_lval_pattern`].
    pub(crate) fn to_assignable(
        &self,
        ctx: Context,
        expr: Expr,
        is_binding: bool,
        cover: Option<&CoverGrammar>,
    ) -> ParseResult<Pat> {
        with_stack(|| self.reinterpret(ctx, expr, is_binding, cover))
    }

    fn reinterpret(
        &self,
        ctx: Context,
        expr: Expr,
        is_binding: bool,
        cover: Option<&CoverGrammar>,
    ) -> ParseResult<Pat> {
        match expr {
            Expr::Ident(id) => Ok(Pat::Ident(id)),
            Expr::Object(obj) => {
                if let Some(cover) = cover {
                    self.check_pattern_errors(cover, !is_binding)?;
                }
                trace!(start = obj.loc.start, "object literal reinterpreted as pattern");
                let last = obj.properties.len().saturating_sub(1);
                let mut properties = Vec::with_capacity(obj.properties.len());
                for (i, prop) in obj.properties.into_iter().enumerate() {
                    match prop {
                        ObjectProp::Prop(prop) => {
                            if prop.kind != PropKind::Init {
                                return self.raise_at(
                                    prop.key.loc().start,
                                    "Object pattern can't contain getter or setter",
                                );
                            }
                            if prop.method {
                                return self.raise_at(prop.value.loc().start, "Assigning to rvalue");
                            }
                            let value = self.to_assignable(ctx, *prop.value, is_binding, None)?;
                            properties.push(ObjectPatProp::Prop(Box::new(PatProp {
                                loc: prop.loc,
                                key: prop.key,
                                shorthand: prop.shorthand,
                                value,
                            })));
                        }
                        ObjectProp::Spread(spread) => {
                            if i != last {
                                return self.raise_at(
                                    spread.loc.end,
                                    "Comma is not permitted after the rest element",
                                );
                            }
                            let argument =
                                self.to_assignable(ctx, *spread.argument, is_binding, None)?;
                            match argument {
                                Pat::Array(_) | Pat::Object(_) => {
                                    return self.unexpected_at(argument.loc().start);
                                }
                                Pat::Assign(_) => {
                                    return self.raise_at(
                                        argument.loc().start,
                                        "Rest elements cannot have a default value",
                                    );
                                }
                                _ => {}
                            }
                            properties.push(ObjectPatProp::Rest(RestElement {
                                loc: spread.loc,
                                argument: Box::new(argument),
                            }));
                        }
                    }
                }
                Ok(Pat::Object(Box::new(ObjectPat {
                    loc: obj.loc,
                    properties,
                })))
            }
            Expr::Array(arr) => {
                if let Some(cover) = cover {
                    self.check_pattern_errors(cover, !is_binding)?;
                }
                trace!(start = arr.loc.start, "array literal reinterpreted as pattern");
                let last = arr.elements.len().saturating_sub(1);
                let mut elements = Vec::with_capacity(arr.elements.len());
                for (i, el) in arr.elements.into_iter().enumerate() {
                    let Some(el) = el else {
                        elements.push(None);
                        continue;
                    };
                    match el {
                        Expr::Spread(spread) => {
                            if i != last {
                                return self.raise_at(
                                    spread.loc.end,
                                    "Comma is not permitted after the rest element",
                                );
                            }
                            let argument =
                                self.to_assignable(ctx, *spread.argument, is_binding, None)?;
                            if let Pat::Assign(_) = argument {
                                return self.raise_at(
                                    argument.loc().start,
                                    "Rest elements cannot have a default value",
                                );
                            }
                            elements.push(Some(Pat::Rest(Box::new(RestElement {
                                loc: spread.loc,
                                argument: Box::new(argument),
                            }))));
                        }
                        el => elements.push(Some(self.to_assignable(ctx, el, is_binding, None)?)),
                    }
                }
                Ok(Pat::Array(Box::new(ArrayPat {
                    loc: arr.loc,
                    elements,
                })))
            }
            Expr::Assign(assign) => {
                if assign.op != AssignOp::Assign {
                    return self.raise_at(
                        assign.left.loc().end,
                        "Only '=' operator can be used for specifying default value.",
                    );
                }
                if is_binding {
                    self.check_binding_shape(&assign.left)?;
                }
                Ok(Pat::Assign(Box::new(AssignPat {
                    loc: assign.loc,
                    left: Box::new(assign.left),
                    right: assign.right,
                })))
            }
            Expr::Member(_) if !is_binding => Ok(Pat::Expr(Box::new(expr))),
            Expr::Chain(chain) => self.raise_at(
                chain.loc.start,
                "Optional chaining cannot appear in left-hand side",
            ),
            other => {
                let verb = if is_binding { "Binding" } else { "Assigning to" };
                self.raise_at(other.loc().start, format!("{verb} rvalue"))
            }
        }
    }

    /// Reject member-expression targets inside a pattern that was first
    /// converted for assignment and is now used as a binding.
    fn check_binding_shape(&self, pat: &Pat) -> ParseResult<()> {
        match pat {
            Pat::Ident(_) => Ok(()),
            Pat::Array(arr) => arr
                .elements
                .iter()
                .flatten()
                .try_for_each(|el| self.check_binding_shape(el)),
            Pat::Object(obj) => obj.properties.iter().try_for_each(|prop| match prop {
                ObjectPatProp::Prop(p) => self.check_binding_shape(&p.value),
                ObjectPatProp::Rest(r) => self.check_binding_shape(&r.argument),
            }),
            Pat::Rest(rest) => self.check_binding_shape(&rest.argument),
            Pat::Assign(assign) => self.check_binding_shape(&assign.left),
            Pat::Expr(expr) => self.raise_at(expr.loc().start, "Binding rvalue"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_keeps_first_offset() {
        let mut cover = CoverGrammar::default();
        cover.mark(CoverFlags::TRAILING_COMMA, 7);
        cover.mark(CoverFlags::TRAILING_COMMA, 12);
        assert_eq!(cover.get(CoverFlags::TRAILING_COMMA), Some(7));
        assert_eq!(cover.get(CoverFlags::PAREN_BIND), None);
    }

    #[test]
    fn test_clear_and_restore() {
        let mut cover = CoverGrammar::default();
        cover.mark(CoverFlags::SHORTHAND_INIT, 3);
        assert!(cover.has_expression_errors());
        cover.clear(CoverFlags::SHORTHAND_INIT);
        assert!(!cover.has_expression_errors());
        cover.restore(CoverFlags::DOUBLE_PROTO, Some(9));
        assert_eq!(cover.get(CoverFlags::DOUBLE_PROTO), Some(9));
        cover.restore(CoverFlags::PAREN_ASSIGN, None);
        assert_eq!(cover.get(CoverFlags::PAREN_ASSIGN), None);
    }
}

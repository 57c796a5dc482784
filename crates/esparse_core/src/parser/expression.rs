//! Expression grammar.
//!
//! Binary operators are parsed by precedence climbing; everything else is
//! recursive descent.  Array and object literals and parenthesized lists are
//! parsed once as expressions and reinterpreted as patterns or arrow
//! parameters when the following token decides (see [`crate::parser::cover`]).

use tracing::trace;

use crate::error::ParseResult;
use crate::parser::ast::{
    ArrayExpr, AssignExpr, AssignOp, AwaitExpr, BinaryExpr, BinaryOp, CallExpr, ChainExpr,
    ConditionalExpr, Expr, Ident, ImportExpr, LitValue, Literal, LogicalExpr, LogicalOp,
    MemberExpr, MemberProp, MetaPropExpr, NewExpr, ObjectExpr, ObjectProp, Pat, PrivateIdent, Prop,
    PropKey, PropKind, RegExpLit, RestElement, SequenceExpr, SpreadElement, SuperExpr,
    TaggedTemplateExpr, TemplateElement, TemplateLit, ThisExpr, UnaryExpr, UnaryOp, UpdateExpr,
    UpdateOp, YieldExpr,
};
use crate::parser::context::Context;
use crate::parser::cover::{CoverFlags, CoverGrammar};
use crate::parser::function::{Accessor, FunctionPosition};
use crate::parser::scanner::{Position, Token, TokenKind, TokenValue};
use crate::parser::state::Parser;

// ─────────────────────────────────────────────────────────────────────────────
// Operator tables
// ─────────────────────────────────────────────────────────────────────────────

/// Binding power of a binary operator token.  `??` shares the level of `||`
/// here and is raised to the level of `&&` while its right operand is parsed.
fn binary_precedence(kind: TokenKind, ctx: Context) -> Option<u8> {
    use TokenKind::*;
    let prec = match kind {
        PipePipe | QuestionQuestion => 1,
        AmpersandAmpersand => 2,
        Pipe => 3,
        Caret => 4,
        Ampersand => 5,
        EqualEqual | BangEqual | EqualEqualEqual | BangEqualEqual => 6,
        Less | Greater | LessEqual | GreaterEqual | Instanceof => 7,
        In if ctx.in_allowed() => 7,
        LessLess | GreaterGreater | GreaterGreaterGreater => 8,
        Plus | Minus => 9,
        Star | Slash | Percent => 10,
        _ => return None,
    };
    Some(prec)
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    use TokenKind::*;
    let op = match kind {
        EqualEqual => BinaryOp::Eq,
        BangEqual => BinaryOp::NotEq,
        EqualEqualEqual => BinaryOp::StrictEq,
        BangEqualEqual => BinaryOp::StrictNotEq,
        Less => BinaryOp::Lt,
        LessEqual => BinaryOp::LtEq,
        Greater => BinaryOp::Gt,
        GreaterEqual => BinaryOp::GtEq,
        LessLess => BinaryOp::Shl,
        GreaterGreater => BinaryOp::Shr,
        GreaterGreaterGreater => BinaryOp::UShr,
        Plus => BinaryOp::Add,
        Minus => BinaryOp::Sub,
        Star => BinaryOp::Mul,
        Slash => BinaryOp::Div,
        Percent => BinaryOp::Rem,
        StarStar => BinaryOp::Exp,
        Pipe => BinaryOp::BitOr,
        Caret => BinaryOp::BitXor,
        Ampersand => BinaryOp::BitAnd,
        In => BinaryOp::In,
        Instanceof => BinaryOp::Instanceof,
        _ => return None,
    };
    Some(op)
}

fn logical_op(kind: TokenKind) -> Option<LogicalOp> {
    match kind {
        TokenKind::AmpersandAmpersand => Some(LogicalOp::And),
        TokenKind::PipePipe => Some(LogicalOp::Or),
        TokenKind::QuestionQuestion => Some(LogicalOp::NullishCoalesce),
        _ => None,
    }
}

pub(crate) fn assign_op(kind: TokenKind) -> Option<AssignOp> {
    use TokenKind::*;
    let op = match kind {
        Equal => AssignOp::Assign,
        PlusEqual => AssignOp::AddAssign,
        MinusEqual => AssignOp::SubAssign,
        StarEqual => AssignOp::MulAssign,
        SlashEqual => AssignOp::DivAssign,
        PercentEqual => AssignOp::RemAssign,
        StarStarEqual => AssignOp::ExpAssign,
        LessLessEqual => AssignOp::ShlAssign,
        GreaterGreaterEqual => AssignOp::ShrAssign,
        GreaterGreaterGreaterEqual => AssignOp::UShrAssign,
        PipeEqual => AssignOp::BitOrAssign,
        CaretEqual => AssignOp::BitXorAssign,
        AmpersandEqual => AssignOp::BitAndAssign,
        AmpersandAmpersandEqual => AssignOp::LogicalAndAssign,
        PipePipeEqual => AssignOp::LogicalOrAssign,
        QuestionQuestionEqual => AssignOp::NullishAssign,
        _ => return None,
    };
    Some(op)
}

enum PrefixOp {
    Unary(UnaryOp),
    Update(UpdateOp),
}

fn prefix_op(kind: TokenKind) -> Option<PrefixOp> {
    use TokenKind::*;
    let op = match kind {
        Minus => PrefixOp::Unary(UnaryOp::Minus),
        Plus => PrefixOp::Unary(UnaryOp::Plus),
        Bang => PrefixOp::Unary(UnaryOp::Not),
        Tilde => PrefixOp::Unary(UnaryOp::BitNot),
        Typeof => PrefixOp::Unary(UnaryOp::Typeof),
        Void => PrefixOp::Unary(UnaryOp::Void),
        Delete => PrefixOp::Unary(UnaryOp::Delete),
        PlusPlus => PrefixOp::Update(UpdateOp::Increment),
        MinusMinus => PrefixOp::Update(UpdateOp::Decrement),
        _ => return None,
    };
    Some(op)
}

/// `true` for tokens that can begin an expression (used after `yield`).
fn starts_expression(kind: TokenKind) -> bool {
    use TokenKind::*;
    kind.is_identifier_like()
        || matches!(
            kind,
            NumericLiteral
                | StringLiteral
                | NoSubstitutionTemplate
                | TemplateHead
                | RegExpLiteral
                | PrivateIdentifier
                | LeftParen
                | LeftBracket
                | LeftBrace
                | Plus
                | Minus
                | Bang
                | Tilde
                | PlusPlus
                | MinusMinus
                | Typeof
                | Void
                | Delete
                | New
                | This
                | Super
                | Function
                | Class
                | Import
                | Null
                | True
                | False
                | Slash
                | SlashEqual
        )
}

/// An arrow function that begins at `start` and was therefore not
/// parenthesized; it takes no operators or subscripts.
fn is_bare_arrow(expr: &Expr, start: Position) -> bool {
    matches!(expr, Expr::Arrow(arrow) if arrow.loc.start == start.offset)
}

fn is_simple_assign_target(expr: &Expr) -> bool {
    matches!(expr, Expr::Ident(_) | Expr::Member(_))
}

fn is_proto_init(prop: &Prop) -> bool {
    !prop.method
        && !prop.shorthand
        && prop.kind == PropKind::Init
        && matches!(&prop.key, PropKey::Ident(_) | PropKey::Lit(_))
        && prop.key.static_name().as_deref() == Some("__proto__")
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

impl Parser<'_> {
    /// *Expression*: one or more comma-separated assignment expressions.
    pub(crate) fn parse_expression(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let first = self.parse_assign(ctx, cover.as_deref_mut())?;
        if !self.at(TokenKind::Comma) {
            return Ok(first);
        }
        let mut expressions = vec![first];
        while self.eat(TokenKind::Comma)? {
            expressions.push(self.parse_assign(ctx, cover.as_deref_mut())?);
        }
        Ok(Expr::Sequence(Box::new(SequenceExpr {
            loc: self.finish(start),
            expressions,
        })))
    }

    /// *AssignmentExpression*, including arrow functions and `yield`.
    ///
    /// When `cover` is `None` the expression owns its cover record and
    /// reports expression-only errors itself; otherwise the caller decides.
    pub(crate) fn parse_assign(
        &mut self,
        ctx: Context,
        cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        self.nested(|p| p.parse_assign_inner(ctx, cover))
    }

    fn parse_assign_inner(
        &mut self,
        ctx: Context,
        cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        if self.at(TokenKind::Yield) && ctx.in_generator() {
            return self.parse_yield(ctx);
        }
        let owns_cover = cover.is_none();
        let mut own = CoverGrammar::default();
        let cover = match cover {
            Some(cover) => cover,
            None => &mut own,
        };
        let saved_paren_assign = cover.get(CoverFlags::PAREN_ASSIGN);
        let saved_trailing_comma = cover.get(CoverFlags::TRAILING_COMMA);
        let saved_double_proto = cover.get(CoverFlags::DOUBLE_PROTO);
        cover.clear(CoverFlags::PAREN_ASSIGN | CoverFlags::TRAILING_COMMA);

        let start = self.start();
        if self.at(TokenKind::LeftParen) || self.kind().is_identifier_like() {
            self.potential_arrow_at = Some(start.offset);
        }
        let left = self.parse_conditional(ctx, Some(&mut *cover))?;

        if let Some(op) = assign_op(self.kind()) {
            let left_start = left.loc().start;
            let target = if op == AssignOp::Assign {
                trace!(start = left_start, "assignment target reinterpreted as pattern");
                self.to_assignable(ctx, left, false, Some(&*cover))?
            } else {
                self.to_simple_target(ctx, left)?
            };
            if !owns_cover {
                cover.clear(
                    CoverFlags::PAREN_ASSIGN | CoverFlags::TRAILING_COMMA | CoverFlags::DOUBLE_PROTO,
                );
            }
            if cover
                .get(CoverFlags::SHORTHAND_INIT)
                .is_some_and(|offset| offset >= left_start)
            {
                cover.clear(CoverFlags::SHORTHAND_INIT);
            }
            if op == AssignOp::Assign {
                self.check_lval_pattern(ctx, &target, None)?;
            }
            self.bump()?;
            let right = self.parse_assign(ctx, None)?;
            cover.restore(CoverFlags::DOUBLE_PROTO, saved_double_proto);
            return Ok(Expr::Assign(Box::new(AssignExpr {
                loc: self.finish(start),
                op,
                left: target,
                right: Box::new(right),
            })));
        }

        if owns_cover {
            self.check_expression_errors(cover)?;
        }
        cover.restore(CoverFlags::PAREN_ASSIGN, saved_paren_assign);
        cover.restore(CoverFlags::TRAILING_COMMA, saved_trailing_comma);
        Ok(left)
    }

    /// *ConditionalExpression*.
    fn parse_conditional(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let test = self.parse_expr_ops(ctx, cover.as_deref_mut())?;
        if cover.as_ref().is_some_and(|c| c.has_expression_errors()) || is_bare_arrow(&test, start)
        {
            return Ok(test);
        }
        if !self.eat(TokenKind::Question)? {
            return Ok(test);
        }
        let consequent = self.parse_assign(ctx.allow_in(), None)?;
        self.expect(TokenKind::Colon)?;
        let alternate = self.parse_assign(ctx, None)?;
        Ok(Expr::Conditional(Box::new(ConditionalExpr {
            loc: self.finish(start),
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        })))
    }

    fn parse_expr_ops(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let expr = self.parse_unary(ctx, cover.as_deref_mut(), false, false)?;
        if cover.as_ref().is_some_and(|c| c.has_expression_errors()) || is_bare_arrow(&expr, start)
        {
            return Ok(expr);
        }
        self.parse_binary(ctx, expr, start, 0)
    }

    /// Precedence climbing over the binary and logical operators.
    ///
    /// Operators of equal precedence fold into `left` in a loop; only a
    /// tighter operator on the right recurses.
    fn parse_binary(
        &mut self,
        ctx: Context,
        mut left: Expr,
        left_start: Position,
        min_prec: u8,
    ) -> ParseResult<Expr> {
        loop {
            // A `/` after an operand is always division.
            if self.at(TokenKind::RegExpLiteral) {
                self.rescan_slash(false)?;
            }
            let kind = self.kind();
            let Some(mut prec) = binary_precedence(kind, ctx) else {
                return Ok(left);
            };
            if prec <= min_prec {
                return Ok(left);
            }
            let logical = matches!(kind, TokenKind::PipePipe | TokenKind::AmpersandAmpersand);
            let coalesce = kind == TokenKind::QuestionQuestion;
            if coalesce {
                prec = 2;
            }
            self.bump()?;
            let right_start = self.start();
            let operand = self.parse_unary(ctx, None, false, false)?;
            let right = self.parse_binary(ctx, operand, right_start, prec)?;
            if (logical && self.at(TokenKind::QuestionQuestion))
                || (coalesce
                    && matches!(
                        self.kind(),
                        TokenKind::PipePipe | TokenKind::AmpersandAmpersand
                    ))
            {
                return self.raise(
                    self.start(),
                    "Logical expressions and coalesce expressions cannot be mixed. Wrap either by parentheses",
                );
            }
            left = self.build_binary(left_start, kind, left, right)?;
        }
    }

    fn build_binary(
        &self,
        start: Position,
        kind: TokenKind,
        left: Expr,
        right: Expr,
    ) -> ParseResult<Expr> {
        if let Expr::PrivateName(name) = &right {
            return self.raise_at(
                name.loc.start,
                "Private identifier can only be left side of binary expression",
            );
        }
        let loc = self.finish(start);
        if let Some(op) = logical_op(kind) {
            return Ok(Expr::Logical(Box::new(LogicalExpr {
                loc,
                op,
                left: Box::new(left),
                right: Box::new(right),
            })));
        }
        match binary_op(kind) {
            Some(op) => Ok(Expr::Binary(Box::new(BinaryExpr {
                loc,
                op,
                left: Box::new(left),
                right: Box::new(right),
            }))),
            None => self.unexpected_at(start.offset),
        }
    }

    /// Unary, update, `await` and `**` expressions.
    fn parse_unary(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
        mut saw_unary: bool,
        inc_dec: bool,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let mut expr;
        if self.at(TokenKind::Await) && ctx.in_async() {
            expr = self.parse_await(ctx)?;
            saw_unary = true;
        } else if let Some(op) = prefix_op(self.kind()) {
            self.bump()?;
            let is_update = matches!(op, PrefixOp::Update(_));
            let argument = self.nested(|p| p.parse_unary(ctx, None, true, is_update))?;
            expr = match op {
                PrefixOp::Update(op) => {
                    self.check_update_target(ctx, &argument)?;
                    Expr::Update(Box::new(UpdateExpr {
                        loc: self.finish(start),
                        op,
                        prefix: true,
                        argument: Box::new(argument),
                    }))
                }
                PrefixOp::Unary(op) => {
                    if op == UnaryOp::Delete {
                        self.check_delete_operand(ctx, &argument)?;
                    }
                    saw_unary = true;
                    Expr::Unary(Box::new(UnaryExpr {
                        loc: self.finish(start),
                        op,
                        argument: Box::new(argument),
                    }))
                }
            };
        } else if !saw_unary && self.at(TokenKind::PrivateIdentifier) {
            if self.private_scopes.is_empty() || !ctx.in_allowed() {
                return self.unexpected();
            }
            expr = Expr::PrivateName(self.parse_private_name()?);
            if !self.at(TokenKind::In) {
                return self.unexpected();
            }
        } else {
            expr = self.parse_expr_subscripts(ctx, cover.as_deref_mut())?;
            if cover.as_ref().is_some_and(|c| c.has_expression_errors()) {
                return Ok(expr);
            }
            while matches!(self.kind(), TokenKind::PlusPlus | TokenKind::MinusMinus)
                && !self.token.had_line_terminator_before
            {
                self.check_update_target(ctx, &expr)?;
                let op = if self.at(TokenKind::PlusPlus) {
                    UpdateOp::Increment
                } else {
                    UpdateOp::Decrement
                };
                self.bump()?;
                expr = Expr::Update(Box::new(UpdateExpr {
                    loc: self.finish(start),
                    op,
                    prefix: false,
                    argument: Box::new(expr),
                }));
            }
        }

        if !inc_dec && self.at(TokenKind::StarStar) {
            if saw_unary {
                return self.raise(
                    self.start(),
                    "Unary operator used immediately before exponentiation expression. Parenthesis must be used to disambiguate operator precedence",
                );
            }
            self.bump()?;
            let right = self.nested(|p| p.parse_unary(ctx, None, false, false))?;
            return Ok(Expr::Binary(Box::new(BinaryExpr {
                loc: self.finish(start),
                op: BinaryOp::Exp,
                left: Box::new(expr),
                right: Box::new(right),
            })));
        }
        Ok(expr)
    }

    fn parse_await(&mut self, ctx: Context) -> ParseResult<Expr> {
        let start = self.start();
        if ctx.contains(Context::IN_PARAMETERS) {
            return self.raise(start, "Await expression cannot be a default value");
        }
        self.markers.await_pos.get_or_insert(start.offset);
        self.bump()?;
        let argument = self.nested(|p| p.parse_unary(ctx, None, true, false))?;
        Ok(Expr::Await(Box::new(AwaitExpr {
            loc: self.finish(start),
            argument: Box::new(argument),
        })))
    }

    fn parse_yield(&mut self, ctx: Context) -> ParseResult<Expr> {
        let start = self.start();
        if ctx.contains(Context::IN_PARAMETERS) {
            return self.raise(start, "Yield expression cannot be a default value");
        }
        self.markers.yield_pos.get_or_insert(start.offset);
        self.bump()?;
        let no_argument = self.at(TokenKind::Semicolon)
            || self.can_insert_semicolon()
            || (!self.at(TokenKind::Star) && !starts_expression(self.kind()));
        let (delegate, argument) = if no_argument {
            (false, None)
        } else {
            let delegate = self.eat(TokenKind::Star)?;
            (delegate, Some(Box::new(self.parse_assign(ctx, None)?)))
        };
        Ok(Expr::Yield(Box::new(YieldExpr {
            loc: self.finish(start),
            delegate,
            argument,
        })))
    }

    // ── Member, call and optional chains ────────────────────────────────────

    /// *LeftHandSideExpression* (class heritage).
    pub(crate) fn parse_lhs_expression(&mut self, ctx: Context) -> ParseResult<Expr> {
        self.parse_expr_subscripts(ctx, None)
    }

    fn parse_expr_subscripts(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let expr = self.parse_expr_atom(ctx, cover.as_deref_mut())?;
        if is_bare_arrow(&expr, start) {
            return Ok(expr);
        }
        let atom_end = expr.loc().end;
        let result = self.parse_subscripts(ctx, expr, start, false)?;
        let Some(cover) = cover else {
            return Ok(result);
        };
        // A literal with a subscript applied never becomes a pattern.
        if result.loc().end > atom_end {
            self.check_expression_errors_from(cover, start.offset)?;
        }
        // `(a).b = 1` is a valid target even though `(a)` was parenthesized.
        if let Expr::Member(member) = &result {
            let from = member.loc.start;
            for flag in [
                CoverFlags::PAREN_ASSIGN,
                CoverFlags::PAREN_BIND,
                CoverFlags::TRAILING_COMMA,
            ] {
                if cover.get(flag).is_some_and(|offset| offset >= from) {
                    cover.clear(flag);
                }
            }
        }
        Ok(result)
    }

    /// Member accesses, calls, tagged templates and optional chains after
    /// `base`.  With `no_calls` (a `new` callee) argument lists are left for
    /// the caller.
    pub(crate) fn parse_subscripts(
        &mut self,
        ctx: Context,
        mut base: Expr,
        start: Position,
        no_calls: bool,
    ) -> ParseResult<Expr> {
        let base_loc = base.loc();
        let mut maybe_async_arrow = matches!(&base, Expr::Ident(id) if id.name == "async")
            && base_loc.len() == "async".len()
            && !self.can_insert_semicolon()
            && self.potential_arrow_at == Some(base_loc.start);
        let mut chained = false;
        loop {
            base = match self.kind() {
                TokenKind::QuestionDot => {
                    if no_calls {
                        return self.raise(
                            self.start(),
                            "Optional chaining cannot appear in the callee of new expressions",
                        );
                    }
                    self.bump()?;
                    chained = true;
                    match self.kind() {
                        TokenKind::LeftParen => {
                            let arguments = self.parse_call_arguments(ctx, None)?;
                            Expr::Call(Box::new(CallExpr {
                                loc: self.finish(start),
                                callee: Box::new(base),
                                arguments,
                                optional: true,
                            }))
                        }
                        TokenKind::LeftBracket => self.parse_computed_member(ctx, base, start, true)?,
                        TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                            return self.raise(
                                self.start(),
                                "Optional chaining cannot appear in the tag of tagged template expressions",
                            );
                        }
                        _ => {
                            let property = self.parse_member_name()?;
                            Expr::Member(Box::new(MemberExpr {
                                loc: self.finish(start),
                                object: Box::new(base),
                                property,
                                optional: true,
                            }))
                        }
                    }
                }
                TokenKind::Dot => {
                    self.bump()?;
                    let property = self.parse_member_name()?;
                    Expr::Member(Box::new(MemberExpr {
                        loc: self.finish(start),
                        object: Box::new(base),
                        property,
                        optional: false,
                    }))
                }
                TokenKind::LeftBracket => self.parse_computed_member(ctx, base, start, false)?,
                TokenKind::LeftParen if !no_calls => {
                    if maybe_async_arrow {
                        match self.parse_async_call_or_arrow(ctx, base, start)? {
                            arrow @ Expr::Arrow(_) => return Ok(arrow),
                            call => call,
                        }
                    } else {
                        let arguments = self.parse_call_arguments(ctx, None)?;
                        Expr::Call(Box::new(CallExpr {
                            loc: self.finish(start),
                            callee: Box::new(base),
                            arguments,
                            optional: false,
                        }))
                    }
                }
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                    if chained {
                        return self.raise(
                            self.start(),
                            "Optional chaining cannot appear in the tag of tagged template expressions",
                        );
                    }
                    let quasi = self.parse_template(ctx, true)?;
                    Expr::TaggedTemplate(Box::new(TaggedTemplateExpr {
                        loc: self.finish(start),
                        tag: Box::new(base),
                        quasi,
                    }))
                }
                _ => break,
            };
            maybe_async_arrow = false;
        }
        if chained {
            base = Expr::Chain(Box::new(ChainExpr {
                loc: base.loc(),
                expression: Box::new(base),
            }));
        }
        Ok(base)
    }

    fn parse_computed_member(
        &mut self,
        ctx: Context,
        object: Expr,
        start: Position,
        optional: bool,
    ) -> ParseResult<Expr> {
        self.expect(TokenKind::LeftBracket)?;
        let property = self.parse_expression(ctx.allow_in(), None)?;
        self.expect(TokenKind::RightBracket)?;
        Ok(Expr::Member(Box::new(MemberExpr {
            loc: self.finish(start),
            object: Box::new(object),
            property: MemberProp::Computed(Box::new(property)),
            optional,
        })))
    }

    /// `async(…)`: a call, or the parameters of an async arrow function.
    fn parse_async_call_or_arrow(
        &mut self,
        ctx: Context,
        callee: Expr,
        start: Position,
    ) -> ParseResult<Expr> {
        let outer = self.take_markers();
        let mut cover = CoverGrammar::default();
        let arguments = self.parse_call_arguments(ctx, Some(&mut cover))?;
        if self.at(TokenKind::Arrow) && !self.token.had_line_terminator_before {
            self.check_pattern_errors(&cover, false)?;
            self.check_yield_await_in_params()?;
            if let Some(offset) = self.markers.await_ident_pos {
                return self.raise_at(
                    offset,
                    "Cannot use 'await' as identifier inside an async function",
                );
            }
            self.markers = outer;
            trace!(start = start.offset, "async call reinterpreted as arrow parameters");
            return self.parse_arrow_from_list(ctx, start, arguments, None, true);
        }
        self.check_expression_errors(&cover)?;
        self.markers = outer.merge(self.markers);
        Ok(Expr::Call(Box::new(CallExpr {
            loc: self.finish(start),
            callee: Box::new(callee),
            arguments,
            optional: false,
        })))
    }

    /// `( args )` of a call or `new` expression.
    fn parse_call_arguments(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LeftParen)?;
        let mut arguments = Vec::new();
        while !self.eat(TokenKind::RightParen)? {
            if !arguments.is_empty() {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::RightParen)? {
                    break;
                }
            }
            if self.at(TokenKind::DotDotDot) {
                let spread = self.parse_spread(ctx, cover.as_deref_mut())?;
                arguments.push(Expr::Spread(Box::new(spread)));
                if self.at(TokenKind::Comma)
                    && let Some(cover) = cover.as_deref_mut()
                {
                    cover.mark(CoverFlags::TRAILING_COMMA, self.start().offset);
                }
            } else {
                arguments.push(self.parse_assign(ctx.allow_in(), cover.as_deref_mut())?);
            }
        }
        Ok(arguments)
    }

    fn parse_spread(
        &mut self,
        ctx: Context,
        cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<SpreadElement> {
        let start = self.start();
        self.expect(TokenKind::DotDotDot)?;
        let argument = self.parse_assign(ctx.allow_in(), cover)?;
        Ok(SpreadElement {
            loc: self.finish(start),
            argument: Box::new(argument),
        })
    }

    /// The name after `.` or `?.`.
    fn parse_member_name(&mut self) -> ParseResult<MemberProp> {
        if self.at(TokenKind::PrivateIdentifier) {
            return Ok(MemberProp::Private(self.parse_private_name()?));
        }
        Ok(MemberProp::Ident(self.parse_ident_name()?))
    }

    // ── Primary expressions ─────────────────────────────────────────────────

    fn parse_expr_atom(
        &mut self,
        ctx: Context,
        cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        let can_be_arrow = self.potential_arrow_at == Some(start.offset);
        match self.kind() {
            TokenKind::Super => self.parse_super(ctx),
            TokenKind::This => {
                self.bump()?;
                Ok(Expr::This(ThisExpr {
                    loc: self.finish(start),
                }))
            }
            TokenKind::Slash | TokenKind::SlashEqual => {
                self.rescan_slash(true)?;
                Ok(Expr::Lit(self.parse_literal(ctx)?))
            }
            TokenKind::NumericLiteral
            | TokenKind::StringLiteral
            | TokenKind::RegExpLiteral
            | TokenKind::Null
            | TokenKind::True
            | TokenKind::False => Ok(Expr::Lit(self.parse_literal(ctx)?)),
            TokenKind::LeftParen => {
                let expr = self.parse_paren_and_distinguish(ctx, can_be_arrow)?;
                if let Some(cover) = cover {
                    if !is_simple_assign_target(&expr) {
                        cover.mark(CoverFlags::PAREN_ASSIGN, start.offset);
                    }
                    cover.mark(CoverFlags::PAREN_BIND, start.offset);
                }
                Ok(expr)
            }
            TokenKind::LeftBracket => self.parse_array_literal(ctx, cover),
            TokenKind::LeftBrace => self.parse_object_literal(ctx, cover),
            TokenKind::Function => {
                let func = self.parse_function(ctx, start, FunctionPosition::Expression, false)?;
                Ok(Expr::Fn(Box::new(func)))
            }
            TokenKind::Class => {
                let class = self.parse_class(ctx, start, FunctionPosition::Expression)?;
                Ok(Expr::Class(Box::new(class)))
            }
            TokenKind::New => self.parse_new(ctx),
            TokenKind::NoSubstitutionTemplate | TokenKind::TemplateHead => {
                Ok(Expr::Template(Box::new(self.parse_template(ctx, false)?)))
            }
            TokenKind::Import => self.parse_import_call_or_meta(ctx),
            kind if kind.is_identifier_like() => {
                self.parse_identifier_atom(ctx, start, can_be_arrow)
            }
            _ => self.unexpected(),
        }
    }

    /// An identifier reference, `async function`, or an arrow function
    /// with a single unparenthesized parameter.
    fn parse_identifier_atom(
        &mut self,
        ctx: Context,
        start: Position,
        can_be_arrow: bool,
    ) -> ParseResult<Expr> {
        let is_async = self.at(TokenKind::Async);
        if is_async {
            let next = self.peek()?;
            if next.kind == TokenKind::Function && !next.had_line_terminator_before {
                self.bump()?;
                let func = self.parse_function(ctx, start, FunctionPosition::Expression, true)?;
                return Ok(Expr::Fn(Box::new(func)));
            }
        }
        let id = self.parse_ident_reference(ctx)?;
        if can_be_arrow && !self.can_insert_semicolon() {
            if self.at(TokenKind::Arrow) {
                return self.parse_arrow_from_list(ctx, start, vec![Expr::Ident(id)], None, false);
            }
            if is_async && self.kind().is_identifier_like() {
                let param = self.parse_binding_ident()?;
                if self.can_insert_semicolon() || !self.at(TokenKind::Arrow) {
                    return self.unexpected();
                }
                return self.parse_arrow_from_list(
                    ctx,
                    start,
                    vec![Expr::Ident(param)],
                    None,
                    true,
                );
            }
        }
        Ok(Expr::Ident(id))
    }

    /// `( … )`: a parenthesized expression or arrow parameters.
    fn parse_paren_and_distinguish(
        &mut self,
        ctx: Context,
        can_be_arrow: bool,
    ) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::LeftParen)?;
        let outer_yield = self.markers.yield_pos.take();
        let outer_await = self.markers.await_pos.take();

        let inner_start = self.start();
        let mut items = Vec::new();
        let mut rest: Option<RestElement> = None;
        let mut trailing_comma = false;
        let mut cover = CoverGrammar::default();
        while !self.at(TokenKind::RightParen) {
            if !items.is_empty() {
                self.expect(TokenKind::Comma)?;
                if self.at(TokenKind::RightParen) {
                    trailing_comma = true;
                    break;
                }
            }
            if self.at(TokenKind::DotDotDot) {
                rest = Some(self.parse_rest_binding(ctx.allow_in())?);
                if self.at(TokenKind::Comma) {
                    return self.raise(self.start(), "Comma is not permitted after the rest element");
                }
                break;
            }
            items.push(self.parse_assign(ctx.allow_in(), Some(&mut cover))?);
        }
        let inner_end = self.prev_end;
        let close = self.expect(TokenKind::RightParen)?;

        if can_be_arrow && !self.can_insert_semicolon() && self.at(TokenKind::Arrow) {
            self.check_pattern_errors(&cover, false)?;
            self.check_yield_await_in_params()?;
            self.markers.yield_pos = outer_yield;
            self.markers.await_pos = outer_await;
            trace!(start = start.offset, "parenthesized list reinterpreted as arrow parameters");
            return self.parse_arrow_from_list(ctx, start, items, rest, false);
        }

        if items.is_empty() || trailing_comma {
            return self.raise(close.span.start, "Unexpected token ')'");
        }
        if let Some(rest) = rest {
            return self.raise_at(rest.loc.start, "Unexpected token '...'");
        }
        self.check_expression_errors(&cover)?;
        self.markers.yield_pos = outer_yield.or(self.markers.yield_pos);
        self.markers.await_pos = outer_await.or(self.markers.await_pos);

        if items.len() > 1 {
            return Ok(Expr::Sequence(Box::new(SequenceExpr {
                loc: self.loc_between(inner_start, inner_end),
                expressions: items,
            })));
        }
        match items.pop() {
            Some(expr) => Ok(expr),
            None => self.raise(close.span.start, "Unexpected token ')'"),
        }
    }

    /// Convert a parenthesized list (or async call arguments) to arrow
    /// parameters and parse the arrow body.
    fn parse_arrow_from_list(
        &mut self,
        ctx: Context,
        start: Position,
        items: Vec<Expr>,
        rest: Option<RestElement>,
        is_async: bool,
    ) -> ParseResult<Expr> {
        let arrow_ctx = ctx.enter_arrow(is_async);
        let last = items.len().saturating_sub(1);
        let has_rest = rest.is_some();
        let mut params = Vec::with_capacity(items.len() + usize::from(has_rest));
        for (i, item) in items.into_iter().enumerate() {
            match item {
                Expr::Spread(spread) => {
                    if i != last || has_rest {
                        return self.raise_at(
                            spread.loc.end,
                            "Comma is not permitted after the rest element",
                        );
                    }
                    let argument = self.to_assignable(arrow_ctx, *spread.argument, true, None)?;
                    if let Pat::Assign(_) = argument {
                        return self.raise_at(
                            argument.loc().start,
                            "Rest elements cannot have a default value",
                        );
                    }
                    params.push(Pat::Rest(Box::new(RestElement {
                        loc: spread.loc,
                        argument: Box::new(argument),
                    })));
                }
                other => params.push(self.to_assignable(arrow_ctx, other, true, None)?),
            }
        }
        if let Some(rest) = rest {
            params.push(Pat::Rest(Box::new(rest)));
        }
        self.parse_arrow_function(ctx, start, params, is_async)
    }

    fn parse_super(&mut self, ctx: Context) -> ParseResult<Expr> {
        let start = self.start();
        self.bump()?;
        match self.kind() {
            TokenKind::LeftParen if !ctx.contains(Context::ALLOW_SUPER_CALL) => {
                return self.raise(start, "super() call outside constructor of a subclass");
            }
            TokenKind::Dot | TokenKind::LeftBracket
                if !ctx.contains(Context::ALLOW_SUPER_PROPERTY) =>
            {
                return self.raise(start, "'super' keyword outside a method");
            }
            TokenKind::LeftParen | TokenKind::Dot | TokenKind::LeftBracket => {}
            _ => return self.unexpected(),
        }
        Ok(Expr::Super(SuperExpr {
            loc: self.finish(start),
        }))
    }

    fn parse_new(&mut self, ctx: Context) -> ParseResult<Expr> {
        let start = self.start();
        let new_token = self.bump()?;
        if self.eat(TokenKind::Dot)? {
            if !self.at(TokenKind::Target) {
                return self.unexpected();
            }
            if !ctx.contains(Context::ALLOW_NEW_TARGET) {
                return self.raise(
                    start,
                    "'new.target' can only be used in functions and class static block",
                );
            }
            let property = self.parse_ident_name()?;
            return Ok(Expr::MetaProp(MetaPropExpr {
                loc: self.finish(start),
                meta: self.keyword_ident(&new_token),
                property,
            }));
        }
        if self.at(TokenKind::Import) && self.peek()?.kind == TokenKind::LeftParen {
            return self.raise(self.start(), "Cannot use new with import()");
        }
        let callee_start = self.start();
        let atom = self.nested(|p| p.parse_expr_atom(ctx, None))?;
        let callee = self.parse_subscripts(ctx, atom, callee_start, true)?;
        let arguments = if self.at(TokenKind::LeftParen) {
            self.parse_call_arguments(ctx, None)?
        } else {
            Vec::new()
        };
        Ok(Expr::New(Box::new(NewExpr {
            loc: self.finish(start),
            callee: Box::new(callee),
            arguments,
        })))
    }

    /// `import(…)` or `import.meta`.
    fn parse_import_call_or_meta(&mut self, ctx: Context) -> ParseResult<Expr> {
        let start = self.start();
        let import_token = self.bump()?;
        match self.kind() {
            TokenKind::Dot => {
                self.bump()?;
                if !self.at(TokenKind::Meta) {
                    return self.unexpected();
                }
                if !ctx.is_module() {
                    return self.raise(start, "Cannot use 'import.meta' outside a module");
                }
                let property = self.parse_ident_name()?;
                Ok(Expr::MetaProp(MetaPropExpr {
                    loc: self.finish(start),
                    meta: self.keyword_ident(&import_token),
                    property,
                }))
            }
            TokenKind::LeftParen => {
                self.bump()?;
                let source = self.parse_assign(ctx.allow_in(), None)?;
                let mut options = None;
                if self.eat(TokenKind::Comma)? && !self.at(TokenKind::RightParen) {
                    options = Some(Box::new(self.parse_assign(ctx.allow_in(), None)?));
                    self.eat(TokenKind::Comma)?;
                }
                self.expect(TokenKind::RightParen)?;
                Ok(Expr::Import(Box::new(ImportExpr {
                    loc: self.finish(start),
                    source: Box::new(source),
                    options,
                })))
            }
            _ => self.unexpected(),
        }
    }

    // ── Array and object literals ───────────────────────────────────────────

    fn parse_array_literal(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::LeftBracket)?;
        let mut elements = Vec::new();
        while !self.eat(TokenKind::RightBracket)? {
            if self.eat(TokenKind::Comma)? {
                elements.push(None);
                continue;
            }
            if self.at(TokenKind::DotDotDot) {
                let spread = self.parse_spread(ctx, cover.as_deref_mut())?;
                elements.push(Some(Expr::Spread(Box::new(spread))));
                if self.at(TokenKind::Comma)
                    && let Some(cover) = cover.as_deref_mut()
                {
                    cover.mark(CoverFlags::TRAILING_COMMA, self.start().offset);
                }
            } else {
                elements.push(Some(self.parse_assign(ctx.allow_in(), cover.as_deref_mut())?));
            }
            if !self.at(TokenKind::RightBracket) {
                self.expect(TokenKind::Comma)?;
            }
        }
        Ok(Expr::Array(Box::new(ArrayExpr {
            loc: self.finish(start),
            elements,
        })))
    }

    fn parse_object_literal(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<Expr> {
        let start = self.start();
        self.expect(TokenKind::LeftBrace)?;
        let mut properties = Vec::new();
        let mut has_proto = false;
        while !self.eat(TokenKind::RightBrace)? {
            if !properties.is_empty() {
                self.expect(TokenKind::Comma)?;
                if self.eat(TokenKind::RightBrace)? {
                    break;
                }
            }
            let prop = self.parse_object_member(ctx, cover.as_deref_mut())?;
            if let ObjectProp::Prop(p) = &prop
                && is_proto_init(p)
            {
                if has_proto {
                    let offset = p.key.loc().start;
                    match cover.as_deref_mut() {
                        Some(cover) => cover.mark(CoverFlags::DOUBLE_PROTO, offset),
                        None => return self.raise_at(offset, "Redefinition of __proto__ property"),
                    }
                }
                has_proto = true;
            }
            properties.push(prop);
        }
        Ok(Expr::Object(Box::new(ObjectExpr {
            loc: self.finish(start),
            properties,
        })))
    }

    fn parse_object_member(
        &mut self,
        ctx: Context,
        mut cover: Option<&mut CoverGrammar>,
    ) -> ParseResult<ObjectProp> {
        let start = self.start();
        if self.at(TokenKind::DotDotDot) {
            let spread = self.parse_spread(ctx, cover.as_deref_mut())?;
            if self.at(TokenKind::Comma)
                && let Some(cover) = cover.as_deref_mut()
            {
                cover.mark(CoverFlags::TRAILING_COMMA, self.start().offset);
            }
            return Ok(ObjectProp::Spread(spread));
        }

        let mut is_async = false;
        let mut is_generator = self.eat(TokenKind::Star)?;
        let mut kind = PropKind::Init;
        let mut key_kind = self.kind();
        let mut key = self.parse_property_name(ctx)?;
        let is_modifier = matches!(
            key_kind,
            TokenKind::Async | TokenKind::Get | TokenKind::Set
        );
        if !is_generator
            && is_modifier
            && !matches!(
                self.kind(),
                TokenKind::Comma
                    | TokenKind::RightBrace
                    | TokenKind::Colon
                    | TokenKind::LeftParen
                    | TokenKind::Equal
            )
        {
            if key_kind == TokenKind::Async {
                if self.token.had_line_terminator_before {
                    return self.unexpected();
                }
                is_async = true;
                is_generator = self.eat(TokenKind::Star)?;
            } else if key_kind == TokenKind::Get {
                kind = PropKind::Get;
            } else {
                kind = PropKind::Set;
            }
            key_kind = self.kind();
            key = self.parse_property_name(ctx)?;
        }

        if is_async || is_generator || kind != PropKind::Init || self.at(TokenKind::LeftParen) {
            let accessor = match kind {
                PropKind::Get => Some(Accessor::Get),
                PropKind::Set => Some(Accessor::Set),
                PropKind::Init => None,
            };
            let method_ctx = ctx.enter_method(is_async, is_generator, false);
            let value = self.parse_method(method_ctx, is_async, is_generator, accessor)?;
            return Ok(ObjectProp::Prop(Box::new(Prop {
                loc: self.finish(start),
                key,
                kind,
                method: kind == PropKind::Init,
                shorthand: false,
                value: Box::new(Expr::Fn(Box::new(value))),
            })));
        }

        if self.eat(TokenKind::Colon)? {
            let value = self.parse_assign(ctx.allow_in(), cover)?;
            return Ok(ObjectProp::Prop(Box::new(Prop {
                loc: self.finish(start),
                key,
                kind,
                method: false,
                shorthand: false,
                value: Box::new(value),
            })));
        }

        // Shorthand `{ x }` / `{ x = 1 }`.
        let PropKey::Ident(id) = &key else {
            return self.unexpected();
        };
        if !key_kind.is_identifier_like() {
            return self.raise_at(id.loc.start, format!("Unexpected keyword '{}'", id.name));
        }
        self.check_identifier_name(ctx, &id.name, id.loc.start)?;
        if id.name == "await" {
            self.markers.await_ident_pos.get_or_insert(id.loc.start);
        }
        let value = if self.at(TokenKind::Equal) {
            match cover {
                Some(cover) => cover.mark(CoverFlags::SHORTHAND_INIT, self.start().offset),
                None => return self.unexpected(),
            }
            self.bump()?;
            let right = self.parse_assign(ctx.allow_in(), None)?;
            Expr::Assign(Box::new(AssignExpr {
                loc: self.finish(start),
                op: AssignOp::Assign,
                left: Pat::Ident(id.clone()),
                right: Box::new(right),
            }))
        } else {
            Expr::Ident(id.clone())
        };
        Ok(ObjectProp::Prop(Box::new(Prop {
            loc: self.finish(start),
            key,
            kind,
            method: false,
            shorthand: true,
            value: Box::new(value),
        })))
    }

    /// A property name: identifier name, string, number or `[computed]`.
    pub(crate) fn parse_property_name(&mut self, ctx: Context) -> ParseResult<PropKey> {
        match self.kind() {
            TokenKind::LeftBracket => {
                self.bump()?;
                let expr = self.parse_assign(ctx.allow_in(), None)?;
                self.expect(TokenKind::RightBracket)?;
                Ok(PropKey::Computed(Box::new(expr)))
            }
            TokenKind::NumericLiteral | TokenKind::StringLiteral => {
                Ok(PropKey::Lit(self.parse_literal(ctx)?))
            }
            kind if kind.is_identifier_name() => Ok(PropKey::Ident(self.parse_ident_name()?)),
            _ => self.unexpected(),
        }
    }

    // ── Templates ───────────────────────────────────────────────────────────

    /// A template literal.  Invalid escapes are accepted only when `tagged`.
    pub(crate) fn parse_template(&mut self, ctx: Context, tagged: bool) -> ParseResult<TemplateLit> {
        let start = self.start();
        let mut quasis = Vec::new();
        let mut expressions = Vec::new();
        loop {
            let token = self.bump()?;
            let tail = match token.kind {
                TokenKind::NoSubstitutionTemplate | TokenKind::TemplateTail => true,
                TokenKind::TemplateHead | TokenKind::TemplateMiddle => false,
                _ => return self.raise(token.span.start, "Unterminated template"),
            };
            quasis.push(self.template_element(token, tagged, tail)?);
            if tail {
                break;
            }
            expressions.push(self.parse_expression(ctx.allow_in(), None)?);
            if !matches!(
                self.kind(),
                TokenKind::TemplateMiddle | TokenKind::TemplateTail
            ) {
                return self.unexpected();
            }
        }
        Ok(TemplateLit {
            loc: self.finish(start),
            quasis,
            expressions,
        })
    }

    fn template_element(
        &self,
        token: Token,
        tagged: bool,
        tail: bool,
    ) -> ParseResult<TemplateElement> {
        let TokenValue::Template { cooked, raw } = token.value else {
            return self.raise(token.span.start, "Unterminated template");
        };
        if cooked.is_none() && !tagged {
            return self.raise(
                token.span.start,
                "Bad escape sequence in untagged template literal",
            );
        }
        // Strip the `` ` `` / `}` opener and the `` ` `` / `${` closer.
        let closer = if tail { 1 } else { 2 };
        let start = Position {
            offset: token.span.start.offset + 1,
            line: token.span.start.line,
            column: token.span.start.column + 1,
        };
        let end = Position {
            offset: token.span.end.offset - closer,
            line: token.span.end.line,
            column: token.span.end.column.saturating_sub(closer as u32),
        };
        Ok(TemplateElement {
            loc: self.loc_between(start, end),
            cooked,
            raw,
            tail,
        })
    }

    // ── Literals and names ──────────────────────────────────────────────────

    /// A numeric, string, regexp, `null` or boolean literal.
    pub(crate) fn parse_literal(&mut self, ctx: Context) -> ParseResult<Literal> {
        let token = self.bump()?;
        let span = token.span;
        let raw = self.source[span.start.offset..span.end.offset].to_owned();
        if token.legacy_octal {
            self.check_legacy_octal(ctx, span.start, token.kind == TokenKind::StringLiteral)?;
        }
        let value = match (token.kind, token.value) {
            (TokenKind::NumericLiteral, TokenValue::Number(n)) => LitValue::Num(n),
            (TokenKind::NumericLiteral, TokenValue::BigInt(digits)) => LitValue::BigInt(digits),
            (TokenKind::StringLiteral, TokenValue::Str(s)) => LitValue::Str(s),
            (TokenKind::RegExpLiteral, TokenValue::RegExp { pattern, flags }) => {
                LitValue::RegExp(RegExpLit { pattern, flags })
            }
            (TokenKind::Null, _) => LitValue::Null,
            (TokenKind::True, _) => LitValue::Bool(true),
            (TokenKind::False, _) => LitValue::Bool(false),
            _ => return self.unexpected_at(span.start.offset),
        };
        Ok(Literal {
            loc: self.finish(span.start),
            value,
            raw,
        })
    }

    /// Legacy octal literals and escapes are an annex B leniency.
    fn check_legacy_octal(&self, ctx: Context, pos: Position, in_string: bool) -> ParseResult<()> {
        if ctx.annex_b() {
            return Ok(());
        }
        let what = if in_string {
            "Octal escape sequences are"
        } else {
            "Octal literals are"
        };
        let message = if ctx.is_strict() {
            format!("{what} not allowed in strict mode")
        } else {
            format!("{what} not allowed without web compatibility")
        };
        self.raise(pos, message)
    }

    /// An *IdentifierName*: any identifier or keyword.
    pub(crate) fn parse_ident_name(&mut self) -> ParseResult<Ident> {
        if !self.kind().is_identifier_name() {
            return self.unexpected();
        }
        let token = self.bump()?;
        Ok(self.keyword_ident(&token))
    }

    /// An identifier reference, validated against `ctx`.
    pub(crate) fn parse_ident_reference(&mut self, ctx: Context) -> ParseResult<Ident> {
        let id = self.parse_binding_ident()?;
        self.check_identifier_name(ctx, &id.name, id.loc.start)?;
        if id.name == "await" {
            self.markers.await_ident_pos.get_or_insert(id.loc.start);
        }
        Ok(id)
    }

    /// An identifier in binding position.  The name is validated later,
    /// once the binding kind is known.
    pub(crate) fn parse_binding_ident(&mut self) -> ParseResult<Ident> {
        if !self.kind().is_identifier_like() {
            return self.unexpected();
        }
        let token = self.bump()?;
        Ok(self.keyword_ident(&token))
    }

    /// An [`Ident`] spelled by `token`.
    pub(crate) fn keyword_ident(&self, token: &Token) -> Ident {
        Ident {
            loc: self.loc_between(token.span.start, token.span.end),
            name: token.name().unwrap_or_default().to_owned(),
        }
    }

    /// `#name`, recorded for the enclosing class's undeclared-name check.
    pub(crate) fn parse_private_name(&mut self) -> ParseResult<PrivateIdent> {
        if !self.at(TokenKind::PrivateIdentifier) {
            return self.unexpected();
        }
        let token = self.bump()?;
        let name = token.name().unwrap_or_default().to_owned();
        let loc = self.loc_between(token.span.start, token.span.end);
        match self.private_scopes.last_mut() {
            Some(scope) => scope.used.push((name.clone(), loc.start)),
            None => {
                return self.raise(
                    token.span.start,
                    format!("Private field '#{name}' must be declared in an enclosing class"),
                );
            }
        }
        Ok(PrivateIdent { loc, name })
    }
}

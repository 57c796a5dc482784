//! Parser driver: token cursor, position builder and program entry point.
//!
//! The grammar productions live in sibling modules as further `impl Parser`
//! blocks; this module owns the state they share.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;

use crate::error::{ParseError, ParseResult};
use crate::parser::ast::{
    Expr, LineColumn, LineSpan, Program, ProgramItem, SourceLocation, SourceType,
};
use crate::parser::context::Context;
use crate::parser::options::ParseOptions;
use crate::parser::scanner::{
    Checkpoint, Position, Scanner, Span, Token, TokenKind, TokenValue, is_line_terminator,
};
use crate::parser::scope::{ScopeKind, ScopeStack};

/// Deepest nesting of statements, expressions and patterns accepted.
const MAX_NESTING_DEPTH: u32 = 1024;

/// Free stack below which a nested production continues on a new segment.
const STACK_RED_ZONE: usize = 256 * 1024;
const STACK_SEGMENT: usize = 4 * 1024 * 1024;

/// Run `f` with at least [`STACK_RED_ZONE`] bytes of stack to spare.
pub(crate) fn with_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, f)
}

// ─────────────────────────────────────────────────────────────────────────────
// Auxiliary state
// ─────────────────────────────────────────────────────────────────────────────

/// What a label is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LabelKind {
    /// An iteration statement; `continue label` is allowed.
    Loop,
    /// Any other statement.
    Other,
}

/// An active statement label.
#[derive(Debug, Clone)]
pub(crate) struct Label {
    pub name: String,
    pub kind: LabelKind,
    /// Offset of the labelled statement.
    pub statement_start: usize,
}

/// Offsets of the first `yield`/`await` expression and `await` identifier
/// seen since the markers were last reset.  Used to reject them in arrow
/// parameters, which are only known to be parameters after `=>`.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Markers {
    pub yield_pos: Option<usize>,
    pub await_pos: Option<usize>,
    pub await_ident_pos: Option<usize>,
}

impl Markers {
    /// Keep the earliest of each marker.
    pub fn merge(self, inner: Markers) -> Markers {
        Markers {
            yield_pos: self.yield_pos.or(inner.yield_pos),
            await_pos: self.await_pos.or(inner.await_pos),
            await_ident_pos: self.await_ident_pos.or(inner.await_ident_pos),
        }
    }
}

/// How a private name was declared in a class body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PrivateKind {
    /// Field or method.
    Plain,
    /// Getter only.
    Getter { is_static: bool },
    /// Setter only.
    Setter { is_static: bool },
    /// Getter and setter pair.
    Accessor,
}

/// Private names of one class body.
#[derive(Debug, Default)]
pub(crate) struct PrivateScope {
    pub declared: FxHashMap<String, PrivateKind>,
    pub used: Vec<(String, usize)>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Recursive-descent parser over one source buffer.
pub struct Parser<'src> {
    pub(crate) source: &'src str,
    scanner: Scanner<'src>,
    /// The current token.
    pub(crate) token: Token,
    /// Scanner state right before `token` was scanned.
    checkpoint: Checkpoint,
    /// One token of lookahead.
    peeked: Option<(Token, Checkpoint)>,
    /// End of the previously consumed token.
    pub(crate) prev_end: Position,
    /// Output-shape bits (`RANGES`, `LOCATIONS`) of the initial context.
    shape: Context,
    pub(crate) scopes: ScopeStack,
    pub(crate) labels: Vec<Label>,
    pub(crate) markers: Markers,
    /// Start offset of the token at which an arrow function may begin.
    pub(crate) potential_arrow_at: Option<usize>,
    pub(crate) private_scopes: Vec<PrivateScope>,
    /// Exported names, for duplicate detection.
    pub(crate) exported: FxHashSet<String>,
    /// Local names listed in `export { … }`, checked once the module ends.
    pub(crate) pending_exports: Vec<(String, usize)>,
    /// Productions currently open through [`Parser::nested`].
    depth: u32,
}

impl<'src> Parser<'src> {
    /// Create a parser and scan the first token.
    pub fn new(source: &'src str, options: &ParseOptions, ctx: Context) -> ParseResult<Self> {
        let scanner = Scanner::new(source).with_hash_bang(options.allow_hash_bang);
        let kind = if ctx.is_module() {
            ScopeKind::Module
        } else {
            ScopeKind::Script
        };
        let mut parser = Self {
            source,
            checkpoint: scanner.checkpoint(),
            scanner,
            token: Token {
                kind: TokenKind::Eof,
                value: TokenValue::None,
                span: Span {
                    start: Position::START,
                    end: Position::START,
                },
                had_line_terminator_before: false,
                escaped: false,
                legacy_octal: false,
            },
            peeked: None,
            prev_end: Position::START,
            shape: ctx & (Context::RANGES | Context::LOCATIONS),
            scopes: ScopeStack::new(kind),
            labels: Vec::new(),
            markers: Markers::default(),
            potential_arrow_at: None,
            private_scopes: Vec::new(),
            exported: FxHashSet::default(),
            pending_exports: Vec::new(),
            depth: 0,
        };
        let (first, cp) = parser.scan_significant()?;
        parser.token = first;
        parser.checkpoint = cp;
        Ok(parser)
    }

    // ── Token cursor ────────────────────────────────────────────────────────

    /// Scan the next non-comment token, folding comment line breaks into
    /// its `had_line_terminator_before` flag.
    fn scan_significant(&mut self) -> ParseResult<(Token, Checkpoint)> {
        let mut had_lt = false;
        loop {
            let cp = self.scanner.checkpoint();
            let mut tok = match self.scanner.next_token() {
                Ok(tok) => tok,
                // A `/` guessed to start a regexp may be a division that the
                // grammar will ask for; fall back before giving up.
                Err(err) => match self.scanner.rescan_slash(&cp, false) {
                    Ok(tok) if matches!(tok.kind, TokenKind::Slash | TokenKind::SlashEqual) => tok,
                    _ => return Err(err),
                },
            };
            if tok.kind.is_comment() {
                had_lt |= tok.had_line_terminator_before;
                continue;
            }
            tok.had_line_terminator_before |= had_lt;
            return Ok((tok, cp));
        }
    }

    /// Consume the current token and return it.
    pub(crate) fn bump(&mut self) -> ParseResult<Token> {
        self.prev_end = self.token.span.end;
        let (next, cp) = match self.peeked.take() {
            Some(p) => p,
            None => self.scan_significant()?,
        };
        self.checkpoint = cp;
        Ok(std::mem::replace(&mut self.token, next))
    }

    /// The token after the current one.
    pub(crate) fn peek(&mut self) -> ParseResult<&Token> {
        let peeked = match self.peeked.take() {
            Some(p) => p,
            None => self.scan_significant()?,
        };
        Ok(&self.peeked.insert(peeked).0)
    }

    /// Re-scan the current token with `/` read as a regexp opener
    /// (`as_regexp`) or as a division operator.
    pub(crate) fn rescan_slash(&mut self, as_regexp: bool) -> ParseResult<()> {
        self.peeked = None;
        let had_lt = self.token.had_line_terminator_before;
        let mut tok = self.scanner.rescan_slash(&self.checkpoint, as_regexp)?;
        tok.had_line_terminator_before = had_lt;
        self.token = tok;
        Ok(())
    }

    /// Kind of the current token.
    pub(crate) fn kind(&self) -> TokenKind {
        self.token.kind
    }

    /// `true` if the current token is `kind`.
    pub(crate) fn at(&self, kind: TokenKind) -> bool {
        self.token.kind == kind
    }

    /// Consume the current token if it is `kind`.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.at(kind) {
            self.bump()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consume a token of `kind` or fail.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(kind) {
            self.bump()
        } else {
            self.unexpected()
        }
    }

    /// Start position of the current token.
    pub(crate) fn start(&self) -> Position {
        self.token.span.start
    }

    // ── Automatic semicolon insertion ───────────────────────────────────────

    /// `true` when a `;` may be inserted before the current token.
    pub(crate) fn can_insert_semicolon(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof | TokenKind::RightBrace)
            || self.token.had_line_terminator_before
    }

    /// Consume a statement terminator, explicit or inserted.
    pub(crate) fn semicolon(&mut self) -> ParseResult<()> {
        if !self.eat(TokenKind::Semicolon)? && !self.can_insert_semicolon() {
            return self.unexpected();
        }
        Ok(())
    }

    // ── Position builder ────────────────────────────────────────────────────

    /// Location from `start` to the end of the last consumed token.
    pub(crate) fn finish(&self, start: Position) -> SourceLocation {
        self.loc_between(start, self.prev_end)
    }

    /// Location between two positions.
    pub(crate) fn loc_between(&self, start: Position, end: Position) -> SourceLocation {
        SourceLocation {
            start: start.offset,
            end: end.offset,
            range: self
                .shape
                .contains(Context::RANGES)
                .then_some((start.offset, end.offset)),
            lines: self.shape.contains(Context::LOCATIONS).then_some(LineSpan {
                start: LineColumn {
                    line: start.line,
                    column: start.column,
                },
                end: LineColumn {
                    line: end.line,
                    column: end.column,
                },
            }),
        }
    }

    /// Line and column of an arbitrary byte offset.
    pub(crate) fn position_at(&self, offset: usize) -> Position {
        let mut line = 1;
        let mut column = 0;
        let mut chars = self.source[..offset.min(self.source.len())].chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\r' && chars.peek() == Some(&'\n') {
                continue;
            }
            if is_line_terminator(c) {
                line += 1;
                column = 0;
            } else {
                column += c.len_utf16() as u32;
            }
        }
        Position {
            offset,
            line,
            column,
        }
    }

    // ── Errors ──────────────────────────────────────────────────────────────

    /// Fail with a syntax error at `pos`.
    pub(crate) fn raise<T>(&self, pos: Position, message: impl Into<String>) -> ParseResult<T> {
        Err(ParseError::syntax(message, pos))
    }

    /// Fail with a syntax error at byte `offset`.
    pub(crate) fn raise_at<T>(&self, offset: usize, message: impl Into<String>) -> ParseResult<T> {
        self.raise(self.position_at(offset), message)
    }

    /// Fail with "Unexpected token" at the current token.
    pub(crate) fn unexpected<T>(&self) -> ParseResult<T> {
        let tok = &self.token;
        let message = match tok.kind {
            TokenKind::Eof => "Unexpected end of input".to_string(),
            kind if kind.keyword_str().is_some() && !kind.is_identifier_like() => {
                format!("Unexpected keyword '{}'", kind.keyword_str().unwrap_or_default())
            }
            _ => format!(
                "Unexpected token '{}'",
                &self.source[tok.span.start.offset..tok.span.end.offset]
            ),
        };
        self.raise(tok.span.start, message)
    }

    /// Fail with "Unexpected token" at byte `offset`.
    pub(crate) fn unexpected_at<T>(&self, offset: usize) -> ParseResult<T> {
        self.raise_at(offset, "Unexpected token")
    }

    // ── Nesting ─────────────────────────────────────────────────────────────

    /// Run a production that may recurse into itself.  Fails instead of
    /// overflowing the stack once [`MAX_NESTING_DEPTH`] productions are open.
    pub(crate) fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return self.raise(self.start(), "Maximum nesting depth exceeded");
        }
        self.depth += 1;
        let result = with_stack(|| f(self));
        self.depth -= 1;
        result
    }

    // ── Markers ─────────────────────────────────────────────────────────────

    /// Reset the yield/await markers, returning the previous values.
    pub(crate) fn take_markers(&mut self) -> Markers {
        std::mem::take(&mut self.markers)
    }

    /// Reject `yield`/`await` expressions recorded while parsing what turned
    /// out to be arrow parameters.
    pub(crate) fn check_yield_await_in_params(&self) -> ParseResult<()> {
        if let Some(pos) = self.markers.yield_pos
            && self.markers.await_pos.is_none_or(|a| pos < a)
        {
            return self.raise_at(pos, "Yield expression cannot be a default value");
        }
        if let Some(pos) = self.markers.await_pos {
            return self.raise_at(pos, "Await expression cannot be a default value");
        }
        Ok(())
    }

    // ── Program ─────────────────────────────────────────────────────────────

    /// Parse the whole input as a [`Program`].
    pub fn parse_program(&mut self, ctx: Context) -> ParseResult<Program> {
        let (mut body, ctx) = self.parse_top_level_directives(ctx)?;
        while !self.at(TokenKind::Eof) {
            body.push(self.parse_program_item(ctx)?);
        }
        if ctx.is_module() {
            self.check_pending_exports()?;
        }
        let end = self.token.span.end;
        Ok(Program {
            loc: self.loc_between(Position::START, end),
            source_type: if ctx.is_module() {
                SourceType::Module
            } else {
                SourceType::Script
            },
            body,
        })
    }

    fn parse_top_level_directives(
        &mut self,
        ctx: Context,
    ) -> ParseResult<(Vec<ProgramItem>, Context)> {
        let (stmts, ctx) = self.parse_directives(ctx)?;
        Ok((stmts.into_iter().map(ProgramItem::Stmt).collect(), ctx))
    }

    /// Parse the input as a single expression followed by end of input.
    pub fn parse_standalone_expression(&mut self, ctx: Context) -> ParseResult<Expr> {
        let expr = self.parse_expression(ctx, None)?;
        if !self.at(TokenKind::Eof) {
            return self.unexpected();
        }
        Ok(expr)
    }
}

/// Parse `source` under `ctx`, logging the outcome.
pub(crate) fn run_parser(
    source: &str,
    options: &ParseOptions,
    ctx: Context,
) -> ParseResult<Program> {
    debug!(
        len = source.len(),
        module = ctx.is_module(),
        strict = ctx.is_strict(),
        "parse start"
    );
    let result = Parser::new(source, options, ctx).and_then(|mut p| p.parse_program(ctx));
    if let Err(err) = &result {
        debug!(offset = err.offset(), message = err.message(), "parse failed");
    }
    result
}

//! ES2025 JavaScript lexer (scanner).
//!
//! See [`Scanner`] for the main entry point.
//!
//! The scanner is context-free: it never consults strictness or goal
//! symbol.  Facts that only become errors under a particular context (legacy
//! octal literals, escaped keywords) are reported as flags on the [`Token`]
//! and judged by the parser.

use smallvec::SmallVec;

use crate::error::{ParseError, ParseResult};

// ─────────────────────────────────────────────────────────────────────────────
// Position / Span
// ─────────────────────────────────────────────────────────────────────────────

/// A byte offset + line/column location in source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    /// Byte offset from the beginning of the source string.
    pub offset: usize,
    /// 1-based line number (incremented on every *LineTerminator*).
    pub line: u32,
    /// 0-based column, measured in UTF-16 code units since the last
    /// *LineTerminator*.
    pub column: u32,
}

impl Position {
    /// The position of the first character of any source text.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 0,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

/// A half-open `[start, end)` source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Inclusive start of the span.
    pub start: Position,
    /// Exclusive end of the span.
    pub end: Position,
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic category of a JavaScript lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────────────────
    /// Decimal, hex (`0x…`), binary (`0b…`), octal (`0o…` / legacy `0…`),
    /// or BigInt (trailing `n`) numeric literal.
    NumericLiteral,
    /// String literal enclosed in `"` or `'`.
    StringLiteral,
    /// A complete template literal with no substitutions: `` `…` ``.
    NoSubstitutionTemplate,
    /// Opening span of a substituted template: `` `…${ ``.
    TemplateHead,
    /// Middle span between two substitutions: `}…${`.
    TemplateMiddle,
    /// Closing span of a substituted template: `}…`` ` ``.
    TemplateTail,
    /// Regular expression literal `/pattern/flags`.
    RegExpLiteral,

    // ── Identifiers ───────────────────────────────────────────────────────
    /// An identifier that is not a reserved word, or any identifier name
    /// written with a Unicode escape.
    Identifier,
    /// A private identifier beginning with `#`.
    PrivateIdentifier,

    // ── Reserved words ────────────────────────────────────────────────────
    /// `break`
    Break,
    /// `case`
    Case,
    /// `catch`
    Catch,
    /// `class`
    Class,
    /// `const`
    Const,
    /// `continue`
    Continue,
    /// `debugger`
    Debugger,
    /// `default`
    Default,
    /// `delete`
    Delete,
    /// `do`
    Do,
    /// `else`
    Else,
    /// `enum`
    Enum,
    /// `export`
    Export,
    /// `extends`
    Extends,
    /// `false`
    False,
    /// `finally`
    Finally,
    /// `for`
    For,
    /// `function`
    Function,
    /// `if`
    If,
    /// `import`
    Import,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
    /// `new`
    New,
    /// `null`
    Null,
    /// `return`
    Return,
    /// `super`
    Super,
    /// `switch`
    Switch,
    /// `this`
    This,
    /// `throw`
    Throw,
    /// `true`
    True,
    /// `try`
    Try,
    /// `typeof`
    Typeof,
    /// `var`
    Var,
    /// `void`
    Void,
    /// `while`
    While,
    /// `with`
    With,

    // ── Contextual keywords ───────────────────────────────────────────────
    // These are valid identifiers in at least some contexts.
    /// `await`
    Await,
    /// `yield`
    Yield,
    /// `let`
    Let,
    /// `static`
    Static,
    /// `of`
    Of,
    /// `async`
    Async,
    /// `from`
    From,
    /// `as`
    As,
    /// `get`
    Get,
    /// `set`
    Set,
    /// `target`
    Target,
    /// `meta`
    Meta,
    /// `using`
    Using,

    // ── Punctuators ───────────────────────────────────────────────────────
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `.`
    Dot,
    /// `...`
    DotDotDot,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
    /// `==`
    EqualEqual,
    /// `!=`
    BangEqual,
    /// `===`
    EqualEqualEqual,
    /// `!==`
    BangEqualEqual,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,
    /// `<<`
    LessLess,
    /// `>>`
    GreaterGreater,
    /// `>>>`
    GreaterGreaterGreater,
    /// `&`
    Ampersand,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `&&`
    AmpersandAmpersand,
    /// `||`
    PipePipe,
    /// `??`
    QuestionQuestion,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `=`
    Equal,
    /// `+=`
    PlusEqual,
    /// `-=`
    MinusEqual,
    /// `*=`
    StarEqual,
    /// `**=`
    StarStarEqual,
    /// `/=`
    SlashEqual,
    /// `%=`
    PercentEqual,
    /// `<<=`
    LessLessEqual,
    /// `>>=`
    GreaterGreaterEqual,
    /// `>>>=`
    GreaterGreaterGreaterEqual,
    /// `&=`
    AmpersandEqual,
    /// `|=`
    PipeEqual,
    /// `^=`
    CaretEqual,
    /// `&&=`
    AmpersandAmpersandEqual,
    /// `||=`
    PipePipeEqual,
    /// `??=`
    QuestionQuestionEqual,
    /// `=>`
    Arrow,
    /// `?.`
    QuestionDot,

    // ── Comments ──────────────────────────────────────────────────────────
    /// Single-line comment `// …` (also used for a leading `#!` line).
    SingleLineComment,
    /// Block comment `/* … */`.
    MultiLineComment,

    // ── End of file ───────────────────────────────────────────────────────
    /// End of input.
    Eof,
}

impl TokenKind {
    /// The source spelling of a reserved or contextual keyword.
    pub fn keyword_str(self) -> Option<&'static str> {
        use TokenKind::*;
        let s = match self {
            Break => "break",
            Case => "case",
            Catch => "catch",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Debugger => "debugger",
            Default => "default",
            Delete => "delete",
            Do => "do",
            Else => "else",
            Enum => "enum",
            Export => "export",
            Extends => "extends",
            False => "false",
            Finally => "finally",
            For => "for",
            Function => "function",
            If => "if",
            Import => "import",
            In => "in",
            Instanceof => "instanceof",
            New => "new",
            Null => "null",
            Return => "return",
            Super => "super",
            Switch => "switch",
            This => "this",
            Throw => "throw",
            True => "true",
            Try => "try",
            Typeof => "typeof",
            Var => "var",
            Void => "void",
            While => "while",
            With => "with",
            Await => "await",
            Yield => "yield",
            Let => "let",
            Static => "static",
            Of => "of",
            Async => "async",
            From => "from",
            As => "as",
            Get => "get",
            Set => "set",
            Target => "target",
            Meta => "meta",
            Using => "using",
            _ => return None,
        };
        Some(s)
    }

    /// `true` for tokens that can name an identifier reference or binding in
    /// at least one context.  Whether the name is actually allowed is decided
    /// by the parser's name validation.
    pub fn is_identifier_like(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | Await
                | Yield
                | Let
                | Static
                | Of
                | Async
                | From
                | As
                | Get
                | Set
                | Target
                | Meta
                | Using
        )
    }

    /// `true` for any token usable as an *IdentifierName* (property keys,
    /// member names, export names).
    pub fn is_identifier_name(self) -> bool {
        self == TokenKind::Identifier || self.keyword_str().is_some()
    }

    /// `true` for the assignment operators `=`, `+=`, `&&=`, ….
    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | StarEqual
                | StarStarEqual
                | SlashEqual
                | PercentEqual
                | LessLessEqual
                | GreaterGreaterEqual
                | GreaterGreaterGreaterEqual
                | AmpersandEqual
                | PipeEqual
                | CaretEqual
                | AmpersandAmpersandEqual
                | PipePipeEqual
                | QuestionQuestionEqual
        )
    }

    /// `true` for comment tokens, which the parser skips.
    pub fn is_comment(self) -> bool {
        matches!(
            self,
            TokenKind::SingleLineComment | TokenKind::MultiLineComment
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TokenValue
// ─────────────────────────────────────────────────────────────────────────────

/// The payload value associated with a [`Token`].
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    /// No semantic value (punctuators, reserved words, EOF, …).
    None,
    /// Decoded identifier name, cooked string value or comment text.
    Str(String),
    /// Parsed numeric value for [`TokenKind::NumericLiteral`].
    Number(f64),
    /// Digits of a BigInt literal with separators and the `n` suffix removed.
    BigInt(String),
    /// Body and flags of a regular-expression literal.
    RegExp {
        /// Text between the slashes.
        pattern: String,
        /// Flag characters after the closing slash.
        flags: String,
    },
    /// Cooked and raw text of a template span.
    Template {
        /// Escape-processed text, or `None` when the span holds an escape
        /// that is only legal in tagged templates.
        cooked: Option<String>,
        /// Source text with line terminators normalised to `\n`.
        raw: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────────────

/// A single lexical token produced by the [`Scanner`].
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category.
    pub kind: TokenKind,
    /// The associated value, if any.
    pub value: TokenValue,
    /// Source location of this token.
    pub span: Span,
    /// `true` when at least one *LineTerminator* appeared between the previous
    /// token and this one.
    ///
    /// The parser uses this flag for Automatic Semicolon Insertion (ASI).
    pub had_line_terminator_before: bool,
    /// The identifier contained at least one `\u` escape.
    pub escaped: bool,
    /// A legacy octal number (`017`), a decimal with a leading zero (`08`),
    /// or a string with an octal (`\12`) or `\8`/`\9` escape.
    pub legacy_octal: bool,
}

impl Token {
    fn new(kind: TokenKind, value: TokenValue, span: Span, had_lt: bool) -> Self {
        Self {
            kind,
            value,
            span,
            had_line_terminator_before: had_lt,
            escaped: false,
            legacy_octal: false,
        }
    }

    /// The identifier name this token spells, for identifier and keyword
    /// tokens.
    pub fn name(&self) -> Option<&str> {
        match (&self.value, self.kind) {
            (TokenValue::Str(s), TokenKind::Identifier | TokenKind::PrivateIdentifier) => {
                Some(s.as_str())
            }
            (_, kind) => kind.keyword_str(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Character-classification helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` for ES2025 *LineTerminator* code points.
pub(crate) fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Returns `true` for ES2025 *WhiteSpace* **or** *LineTerminator* characters.
fn is_js_whitespace(c: char) -> bool {
    matches!(
        c,
        '\t'                      // CHARACTER TABULATION
        | '\x0B'                  // LINE TABULATION
        | '\x0C'                  // FORM FEED
        | ' '                     // SPACE
        | '\u{00A0}'              // NO-BREAK SPACE
        | '\u{FEFF}'              // ZERO WIDTH NO-BREAK SPACE (BOM)
        | '\u{1680}'              // OGHAM SPACE MARK
        | '\u{2000}'
            ..='\u{200A}' // EN QUAD … HAIR SPACE
        | '\u{202F}'              // NARROW NO-BREAK SPACE
        | '\u{205F}'              // MEDIUM MATHEMATICAL SPACE
        | '\u{3000}'              // IDEOGRAPHIC SPACE
        | '\n'
        | '\r'
        | '\u{2028}'
        | '\u{2029}'
    )
}

// U+309B and U+309C are Other_ID_Start, so ID_Start and ID_Continue, but
// NFKC excludes them from the XID sets.
const KATAKANA_VOICED_MARKS: [char; 2] = ['\u{309B}', '\u{309C}'];

/// Returns `true` for characters that may *start* a JS identifier
/// (ID_Start, `$` or `_`).
fn is_id_start(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic() || c == '$' || c == '_';
    }
    KATAKANA_VOICED_MARKS.contains(&c) || unicode_ident::is_xid_start(c)
}

/// Returns `true` for characters that may *continue* a JS identifier
/// (ID_Continue, `$`, ZWNJ or ZWJ).
fn is_id_continue(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric() || c == '$' || c == '_';
    }
    c == '\u{200C}'
        || c == '\u{200D}'
        || KATAKANA_VOICED_MARKS.contains(&c)
        || unicode_ident::is_xid_continue(c)
}

/// Map an identifier string to a reserved-word/contextual-keyword
/// [`TokenKind`], or return `None` for plain identifiers.
fn keyword_kind(s: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match s {
        "await" => Await,
        "break" => Break,
        "case" => Case,
        "catch" => Catch,
        "class" => Class,
        "const" => Const,
        "continue" => Continue,
        "debugger" => Debugger,
        "default" => Default,
        "delete" => Delete,
        "do" => Do,
        "else" => Else,
        "enum" => Enum,
        "export" => Export,
        "extends" => Extends,
        "false" => False,
        "finally" => Finally,
        "for" => For,
        "function" => Function,
        "if" => If,
        "import" => Import,
        "in" => In,
        "instanceof" => Instanceof,
        "let" => Let,
        "new" => New,
        "null" => Null,
        "of" => Of,
        "return" => Return,
        "static" => Static,
        "super" => Super,
        "switch" => Switch,
        "this" => This,
        "throw" => Throw,
        "true" => True,
        "try" => Try,
        "typeof" => Typeof,
        "var" => Var,
        "void" => Void,
        "while" => While,
        "with" => With,
        "yield" => Yield,
        "async" => Async,
        "from" => From,
        "as" => As,
        "get" => Get,
        "set" => Set,
        "target" => Target,
        "meta" => Meta,
        "using" => Using,
        _ => return None,
    };
    Some(kind)
}

/// Returns `true` when a `/` should open a regular-expression literal rather
/// than act as a division operator, given the most recent significant token.
///
/// The heuristic: `/` is *division* only after tokens that produce a value.
/// The parser corrects the guess with [`Scanner::rescan_slash`] whenever the
/// grammar disagrees (`if (x) /re/.test(y)`, `{} / 2`).
fn slash_is_regexp(last: Option<TokenKind>) -> bool {
    match last {
        None => true,
        Some(k) => !matches!(
            k,
            TokenKind::Identifier
                | TokenKind::PrivateIdentifier
                | TokenKind::NumericLiteral
                | TokenKind::StringLiteral
                | TokenKind::NoSubstitutionTemplate
                | TokenKind::TemplateTail
                | TokenKind::RegExpLiteral
                | TokenKind::RightParen
                | TokenKind::RightBracket
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Null
                | TokenKind::This
                | TokenKind::Super
        ),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Escape decoding
// ─────────────────────────────────────────────────────────────────────────────

/// A successfully decoded escape sequence.
struct Escape {
    /// The UTF-16 code units it stands for; empty for a line continuation.
    units: SmallVec<[u16; 2]>,
    /// Legacy octal (`\12`, `\0` + digit) or `\8`/`\9`.
    octal: bool,
}

impl Escape {
    fn code_point(cp: u32, octal: bool) -> Self {
        let mut units = SmallVec::new();
        match char::from_u32(cp) {
            Some(c) => {
                let mut buf = [0u16; 2];
                units.extend_from_slice(c.encode_utf16(&mut buf));
            }
            // Lone surrogate from `\uD800`; pairs are recombined on decode.
            None => units.push(cp as u16),
        }
        Self { units, octal }
    }
}

/// Saved scanner state used to re-scan a token under a different
/// interpretation of `/`.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    pos: usize,
    line: u32,
    column: u32,
    template_stack: SmallVec<[usize; 4]>,
    brace_depth: usize,
    last_significant_kind: Option<TokenKind>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scanner
// ─────────────────────────────────────────────────────────────────────────────

/// ES2025 JavaScript lexer.
///
/// Produces a stream of [`Token`]s from a UTF-8 source string.  Call
/// [`Scanner::next_token`] repeatedly until a token with
/// [`TokenKind::Eof`] is returned.
///
/// # Example
///
/// ```
/// use esparse_core::parser::scanner::{Scanner, TokenKind};
///
/// let mut sc = Scanner::new("let x = 42;");
/// loop {
///     let tok = sc.next_token().unwrap();
///     if tok.kind == TokenKind::Eof { break; }
///     println!("{:?}", tok.kind);
/// }
/// ```
pub struct Scanner<'src> {
    /// The complete source string.
    source: &'src str,
    /// Current byte position within `source`.
    pos: usize,
    /// Current 1-based line number.
    line: u32,
    /// Current 0-based column in UTF-16 code units.
    column: u32,
    /// Stack of `brace_depth` values recorded when entering each template
    /// substitution (`` `…${ ``).  When we see `}` and `brace_depth` equals
    /// the value at the top of this stack, the `}` closes the substitution.
    template_stack: SmallVec<[usize; 4]>,
    /// Nesting depth of plain `{…}` braces (not template-substitution openers).
    brace_depth: usize,
    /// The most recent *significant* token kind (non-whitespace, non-comment).
    /// Used for regexp / division disambiguation.
    last_significant_kind: Option<TokenKind>,
    /// Overrides the regexp heuristic for the next `/`.
    forced_slash: Option<bool>,
    /// Whether a leading `#!` line is skipped as a comment.
    allow_hash_bang: bool,
}

impl<'src> Scanner<'src> {
    /// Create a new scanner for the given UTF-8 source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 0,
            template_stack: SmallVec::new(),
            brace_depth: 0,
            last_significant_kind: None,
            forced_slash: None,
            allow_hash_bang: true,
        }
    }

    /// Enable or disable `#!` interpreter-line handling at offset 0.
    pub fn with_hash_bang(mut self, allow: bool) -> Self {
        self.allow_hash_bang = allow;
        self
    }

    /// The full source text being scanned.
    pub fn source(&self) -> &'src str {
        self.source
    }

    /// Returns `true` when all input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Capture the scanner state so a later token can be re-scanned.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            pos: self.pos,
            line: self.line,
            column: self.column,
            template_stack: self.template_stack.clone(),
            brace_depth: self.brace_depth,
            last_significant_kind: self.last_significant_kind,
        }
    }

    /// Rewind to `cp` and scan the next token again, treating a leading `/`
    /// as the start of a regular expression when `as_regexp` is `true` and
    /// as a division operator otherwise.
    pub fn rescan_slash(&mut self, cp: &Checkpoint, as_regexp: bool) -> ParseResult<Token> {
        self.pos = cp.pos;
        self.line = cp.line;
        self.column = cp.column;
        self.template_stack = cp.template_stack.clone();
        self.brace_depth = cp.brace_depth;
        self.last_significant_kind = cp.last_significant_kind;
        self.forced_slash = Some(as_regexp);
        self.next_token()
    }

    // ── Low-level character helpers ─────────────────────────────────────────

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek2(&self) -> Option<char> {
        let mut it = self.source[self.pos..].chars();
        it.next();
        it.next()
    }

    /// Advance past the current character and update line/column tracking.
    ///
    /// `\r\n` is treated as a single line terminator; the `\n` is consumed
    /// automatically so callers never see a stray `\r`.
    fn advance(&mut self) -> Option<char> {
        let ch = self.source[self.pos..].chars().next()?;
        self.pos += ch.len_utf8();
        match ch {
            '\r' => {
                if self.source[self.pos..].starts_with('\n') {
                    self.pos += 1;
                }
                self.line += 1;
                self.column = 0;
            }
            '\n' | '\u{2028}' | '\u{2029}' => {
                self.line += 1;
                self.column = 0;
            }
            _ => {
                self.column += ch.len_utf16() as u32;
            }
        }
        Some(ch)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn current_pos(&self) -> Position {
        Position {
            offset: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, start: Position) -> Span {
        Span {
            start,
            end: self.current_pos(),
        }
    }

    fn error<T>(&self, message: impl Into<String>, pos: Position) -> ParseResult<T> {
        Err(ParseError::lexical(message, pos))
    }

    // ── Whitespace ──────────────────────────────────────────────────────────

    /// Consume all leading whitespace and return `true` if any line
    /// terminators were encountered.
    fn skip_whitespace(&mut self) -> bool {
        let mut had_lt = false;
        while let Some(c) = self.peek() {
            if !is_js_whitespace(c) {
                break;
            }
            if is_line_terminator(c) {
                had_lt = true;
            }
            self.advance();
        }
        had_lt
    }

    // ── Escapes ─────────────────────────────────────────────────────────────

    /// Read exactly `n` hex digits.  Stops without consuming at the first
    /// non-hex character.
    fn read_hex(&mut self, n: usize) -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..n {
            let d = self.peek()?.to_digit(16)?;
            self.advance();
            value = value * 16 + d;
        }
        Some(value)
    }

    /// Read the part of a `\u` escape after the `u`: either `XXXX` or
    /// `{X…}`.
    fn read_unicode_escape(&mut self) -> Result<u32, &'static str> {
        if self.eat('{') {
            let mut value = 0u32;
            let mut digits = 0;
            while let Some(d) = self.peek().and_then(|c| c.to_digit(16)) {
                self.advance();
                digits += 1;
                value = value.saturating_mul(16).saturating_add(d);
            }
            if digits == 0 || !self.eat('}') {
                return Err("Bad character escape sequence");
            }
            if value > 0x10FFFF {
                return Err("Code point out of bounds");
            }
            Ok(value)
        } else {
            self.read_hex(4).ok_or("Bad character escape sequence")
        }
    }

    /// Decode one escape sequence; the backslash is already consumed.
    fn read_escape(&mut self) -> Result<Escape, &'static str> {
        let Some(c) = self.advance() else {
            return Err("Unterminated string constant");
        };
        let simple = |u: u16| Escape {
            units: SmallVec::from_slice(&[u]),
            octal: false,
        };
        let escape = match c {
            'n' => simple(0x0A),
            't' => simple(0x09),
            'r' => simple(0x0D),
            'b' => simple(0x08),
            'f' => simple(0x0C),
            'v' => simple(0x0B),
            // Line continuation (`\r\n` was consumed as one unit).
            '\r' | '\n' | '\u{2028}' | '\u{2029}' => Escape {
                units: SmallVec::new(),
                octal: false,
            },
            'x' => {
                let cp = self.read_hex(2).ok_or("Bad character escape sequence")?;
                Escape::code_point(cp, false)
            }
            'u' => Escape::code_point(self.read_unicode_escape()?, false),
            '0' if !self.peek().is_some_and(|d| d.is_ascii_digit()) => simple(0),
            '0'..='7' => {
                let mut value = c as u32 - '0' as u32;
                let max_digits = if c <= '3' { 3 } else { 2 };
                let mut digits = 1;
                while digits < max_digits
                    && let Some(d) = self.peek().and_then(|d| d.to_digit(8))
                {
                    self.advance();
                    value = value * 8 + d;
                    digits += 1;
                }
                Escape::code_point(value, true)
            }
            '8' | '9' => Escape {
                units: SmallVec::from_slice(&[c as u16]),
                octal: true,
            },
            other => {
                let mut buf = [0u16; 2];
                Escape {
                    units: SmallVec::from_slice(other.encode_utf16(&mut buf)),
                    octal: false,
                }
            }
        };
        Ok(escape)
    }

    // ── Strings ─────────────────────────────────────────────────────────────

    /// Scan a string literal; the opening quote is already consumed.
    fn scan_string(&mut self, quote: char, start: Position, had_lt: bool) -> ParseResult<Token> {
        let mut units: Vec<u16> = Vec::new();
        let mut legacy_octal = false;
        loop {
            match self.peek() {
                None | Some('\n' | '\r') => {
                    return self.error("Unterminated string constant", start);
                }
                Some(c) if c == quote => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let esc_start = self.current_pos();
                    self.advance();
                    let escape = match self.read_escape() {
                        Ok(e) => e,
                        Err(msg) => return self.error(msg, esc_start),
                    };
                    legacy_octal |= escape.octal;
                    units.extend_from_slice(&escape.units);
                }
                Some(c) => {
                    self.advance();
                    let mut buf = [0u16; 2];
                    units.extend_from_slice(c.encode_utf16(&mut buf));
                }
            }
        }
        let value = String::from_utf16_lossy(&units);
        let mut tok = Token::new(
            TokenKind::StringLiteral,
            TokenValue::Str(value),
            self.span_from(start),
            had_lt,
        );
        tok.legacy_octal = legacy_octal;
        Ok(tok)
    }

    // ── Templates ───────────────────────────────────────────────────────────

    /// Scan template characters up to and including the closing `` ` `` or
    /// `${`.  Returns the token value and whether a substitution follows.
    fn scan_template_body(&mut self, start: Position) -> ParseResult<(TokenValue, bool)> {
        let mut cooked: Option<Vec<u16>> = Some(Vec::new());
        let mut raw = String::new();
        let has_substitution = loop {
            match self.peek() {
                None => return self.error("Unterminated template", start),
                Some('`') => {
                    self.advance();
                    break false;
                }
                Some('$') if self.peek2() == Some('{') => {
                    self.advance();
                    self.advance();
                    break true;
                }
                Some('\\') => {
                    let raw_start = self.pos;
                    self.advance();
                    match self.read_escape() {
                        Ok(escape) if !escape.octal => {
                            if let Some(units) = cooked.as_mut() {
                                units.extend_from_slice(&escape.units);
                            }
                        }
                        _ => cooked = None,
                    }
                    let text = &self.source[raw_start..self.pos];
                    raw.push_str(&text.replace("\r\n", "\n").replace('\r', "\n"));
                }
                Some('\r') => {
                    self.advance();
                    raw.push('\n');
                    if let Some(units) = cooked.as_mut() {
                        units.push(0x0A);
                    }
                }
                Some(c) => {
                    self.advance();
                    raw.push(c);
                    if let Some(units) = cooked.as_mut() {
                        let mut buf = [0u16; 2];
                        units.extend_from_slice(c.encode_utf16(&mut buf));
                    }
                }
            }
        };
        let value = TokenValue::Template {
            cooked: cooked.map(|u| String::from_utf16_lossy(&u)),
            raw,
        };
        Ok((value, has_substitution))
    }

    // ── Regular expressions ─────────────────────────────────────────────────

    /// Scan a regular-expression literal; the opening `/` is already consumed.
    fn scan_regexp(&mut self, start: Position, had_lt: bool) -> ParseResult<Token> {
        let body_start = self.pos;
        let mut in_class = false;
        loop {
            match self.peek() {
                None => return self.error("Unterminated regular expression", start),
                Some(c) if is_line_terminator(c) => {
                    return self.error("Unterminated regular expression", start);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek() {
                        Some(c) if !is_line_terminator(c) => {
                            self.advance();
                        }
                        _ => return self.error("Unterminated regular expression", start),
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.advance();
                }
                Some(']') => {
                    in_class = false;
                    self.advance();
                }
                Some('/') if !in_class => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let pattern = self.source[body_start..self.pos].to_string();
        self.advance(); // closing /

        let flags_start = self.pos;
        let flags_pos = self.current_pos();
        while let Some(c) = self.peek() {
            if c == '\\' {
                return self.error("Invalid regular expression flags", flags_pos);
            }
            if !is_id_continue(c) {
                break;
            }
            self.advance();
        }
        let flags = self.source[flags_start..self.pos].to_string();
        let mut seen = String::new();
        for f in flags.chars() {
            if !"dgimsuyv".contains(f) || seen.contains(f) {
                return self.error("Invalid regular expression flag", flags_pos);
            }
            seen.push(f);
        }
        if seen.contains('u') && seen.contains('v') {
            return self.error("Invalid regular expression flag", flags_pos);
        }
        Ok(Token::new(
            TokenKind::RegExpLiteral,
            TokenValue::RegExp { pattern, flags },
            self.span_from(start),
            had_lt,
        ))
    }

    // ── Numbers ─────────────────────────────────────────────────────────────

    /// Consume a run of digits in `radix` with `_` separators.  `seen_digit`
    /// says whether a digit directly precedes the run.  Returns the number of
    /// digits consumed.
    fn scan_digits(&mut self, radix: u32, mut seen_digit: bool) -> ParseResult<usize> {
        let mut count = 0;
        let mut last_sep = false;
        loop {
            match self.peek() {
                Some('_') => {
                    if !seen_digit || last_sep {
                        return self.error("Numeric separator is not allowed here", self.current_pos());
                    }
                    last_sep = true;
                    self.advance();
                }
                Some(c) if c.is_digit(radix) => {
                    seen_digit = true;
                    last_sep = false;
                    count += 1;
                    self.advance();
                }
                _ => break,
            }
        }
        if last_sep {
            return self.error(
                "Numeric separators are not allowed at the end of numeric literals",
                self.current_pos(),
            );
        }
        Ok(count)
    }

    /// Consume an optional exponent part.
    fn scan_exponent(&mut self) -> ParseResult<()> {
        if matches!(self.peek(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek(), Some('+' | '-')) {
                self.advance();
            }
            if self.scan_digits(10, false)? == 0 {
                return self.error("Invalid number", self.current_pos());
            }
        }
        Ok(())
    }

    /// Scan a numeric literal whose first character `first` is already
    /// consumed.
    fn scan_numeric(&mut self, first: char, start: Position, had_lt: bool) -> ParseResult<Token> {
        let mut legacy_octal = false;
        let mut bigint = false;
        let mut radix = 10;

        if first == '0' && matches!(self.peek(), Some('x' | 'X' | 'o' | 'O' | 'b' | 'B')) {
            radix = match self.advance() {
                Some('x' | 'X') => 16,
                Some('o' | 'O') => 8,
                _ => 2,
            };
            if self.scan_digits(radix, false)? == 0 {
                return self.error(format!("Expected number in radix {radix}"), start);
            }
            bigint = self.eat('n');
        } else if first == '0' && self.peek().is_some_and(|c| c.is_ascii_digit() || c == '_') {
            if self.peek() == Some('_') {
                return self.error("Numeric separator is not allowed here", self.current_pos());
            }
            legacy_octal = true;
            let mut all_octal = true;
            while let Some(c) = self.peek() {
                match c {
                    '0'..='7' => {}
                    '8' | '9' => all_octal = false,
                    '_' => {
                        return self.error("Numeric separator is not allowed here", self.current_pos());
                    }
                    _ => break,
                }
                self.advance();
            }
            if all_octal {
                radix = 8;
            } else {
                // `08`, `09.5`: a decimal literal with a leading zero.
                if self.eat('.') {
                    self.scan_digits(10, false)?;
                }
                self.scan_exponent()?;
            }
            if self.peek() == Some('n') {
                return self.error("Invalid BigInt syntax", start);
            }
        } else if first == '.' {
            self.scan_digits(10, false)?;
            self.scan_exponent()?;
        } else {
            self.scan_digits(10, true)?;
            if self.eat('n') {
                bigint = true;
            } else {
                if self.eat('.') {
                    self.scan_digits(10, false)?;
                }
                self.scan_exponent()?;
            }
        }

        if let Some(c) = self.peek()
            && (is_id_start(c) || c.is_ascii_digit() || c == '\\')
        {
            return self.error("Identifier directly after number", self.current_pos());
        }

        let raw = &self.source[start.offset..self.pos];
        let value = if bigint {
            TokenValue::BigInt(raw[..raw.len() - 1].replace('_', ""))
        } else {
            TokenValue::Number(parse_numeric_raw(raw, radix, legacy_octal))
        };
        let mut tok = Token::new(
            TokenKind::NumericLiteral,
            value,
            self.span_from(start),
            had_lt,
        );
        tok.legacy_octal = legacy_octal;
        Ok(tok)
    }

    // ── Identifiers ─────────────────────────────────────────────────────────

    /// Scan an *IdentifierName*, decoding `\u` escapes.  Returns the decoded
    /// name and whether any escape was present.
    fn scan_identifier_name(&mut self) -> ParseResult<(String, bool)> {
        let mut name = String::new();
        let mut escaped = false;
        loop {
            let first = name.is_empty();
            match self.peek() {
                Some('\\') => {
                    let esc_start = self.current_pos();
                    self.advance();
                    if !self.eat('u') {
                        return self.error("Expecting Unicode escape sequence \\uXXXX", esc_start);
                    }
                    let cp = match self.read_unicode_escape() {
                        Ok(cp) => cp,
                        Err(msg) => return self.error(msg, esc_start),
                    };
                    let valid = char::from_u32(cp)
                        .filter(|&c| if first { is_id_start(c) } else { is_id_continue(c) });
                    let Some(c) = valid else {
                        return self.error("Invalid Unicode escape", esc_start);
                    };
                    name.push(c);
                    escaped = true;
                }
                Some(c) if (first && is_id_start(c)) || (!first && is_id_continue(c)) => {
                    self.advance();
                    name.push(c);
                }
                _ => break,
            }
        }
        Ok((name, escaped))
    }

    fn scan_identifier(&mut self, start: Position, had_lt: bool) -> ParseResult<Token> {
        let (name, escaped) = self.scan_identifier_name()?;
        let span = self.span_from(start);
        // Escaped keywords never act as keywords.
        let kind = if escaped {
            None
        } else {
            keyword_kind(&name)
        };
        let mut tok = match kind {
            Some(kind) => Token::new(kind, TokenValue::None, span, had_lt),
            None => Token::new(TokenKind::Identifier, TokenValue::Str(name), span, had_lt),
        };
        tok.escaped = escaped;
        Ok(tok)
    }

    // ── Comments ────────────────────────────────────────────────────────────

    /// Scan to the end of the line; the comment opener is already consumed.
    fn scan_line_comment(&mut self, start: Position, text_start: usize, had_lt: bool) -> Token {
        while let Some(c) = self.peek() {
            if is_line_terminator(c) {
                break;
            }
            self.advance();
        }
        let text = self.source[text_start..self.pos].to_string();
        Token::new(
            TokenKind::SingleLineComment,
            TokenValue::Str(text),
            self.span_from(start),
            had_lt,
        )
    }

    fn scan_block_comment(&mut self, start: Position, had_lt: bool) -> ParseResult<Token> {
        let text_start = self.pos;
        let mut inner_lt = false;
        loop {
            match self.peek() {
                None => return self.error("Unterminated comment", start),
                Some('*') if self.peek2() == Some('/') => {
                    let text = self.source[text_start..self.pos].to_string();
                    self.advance();
                    self.advance();
                    return Ok(Token::new(
                        TokenKind::MultiLineComment,
                        TokenValue::Str(text),
                        self.span_from(start),
                        had_lt || inner_lt,
                    ));
                }
                Some(c) => {
                    inner_lt |= is_line_terminator(c);
                    self.advance();
                }
            }
        }
    }

    // ── Punctuators ─────────────────────────────────────────────────────────

    /// Scan an operator or punctuator whose first character `c` is already
    /// consumed.  Returns `None` if `c` starts no punctuator.
    fn scan_punctuator(&mut self, c: char) -> Option<TokenKind> {
        use TokenKind::*;
        let kind = match c {
            '{' => {
                self.brace_depth += 1;
                LeftBrace
            }
            '(' => LeftParen,
            ')' => RightParen,
            '[' => LeftBracket,
            ']' => RightBracket,
            ';' => Semicolon,
            ',' => Comma,
            '~' => Tilde,
            ':' => Colon,
            '.' => {
                if self.peek() == Some('.') && self.peek2() == Some('.') {
                    self.advance();
                    self.advance();
                    DotDotDot
                } else {
                    Dot
                }
            }
            '<' => {
                if self.eat('<') {
                    if self.eat('=') { LessLessEqual } else { LessLess }
                } else if self.eat('=') {
                    LessEqual
                } else {
                    Less
                }
            }
            '>' => {
                if self.eat('>') {
                    if self.eat('>') {
                        if self.eat('=') {
                            GreaterGreaterGreaterEqual
                        } else {
                            GreaterGreaterGreater
                        }
                    } else if self.eat('=') {
                        GreaterGreaterEqual
                    } else {
                        GreaterGreater
                    }
                } else if self.eat('=') {
                    GreaterEqual
                } else {
                    Greater
                }
            }
            '=' => {
                if self.eat('>') {
                    Arrow
                } else if self.eat('=') {
                    if self.eat('=') { EqualEqualEqual } else { EqualEqual }
                } else {
                    Equal
                }
            }
            '!' => {
                if self.eat('=') {
                    if self.eat('=') { BangEqualEqual } else { BangEqual }
                } else {
                    Bang
                }
            }
            '+' => {
                if self.eat('+') {
                    PlusPlus
                } else if self.eat('=') {
                    PlusEqual
                } else {
                    Plus
                }
            }
            '-' => {
                if self.eat('-') {
                    MinusMinus
                } else if self.eat('=') {
                    MinusEqual
                } else {
                    Minus
                }
            }
            '*' => {
                if self.eat('*') {
                    if self.eat('=') { StarStarEqual } else { StarStar }
                } else if self.eat('=') {
                    StarEqual
                } else {
                    Star
                }
            }
            '%' => {
                if self.eat('=') { PercentEqual } else { Percent }
            }
            '&' => {
                if self.eat('&') {
                    if self.eat('=') {
                        AmpersandAmpersandEqual
                    } else {
                        AmpersandAmpersand
                    }
                } else if self.eat('=') {
                    AmpersandEqual
                } else {
                    Ampersand
                }
            }
            '|' => {
                if self.eat('|') {
                    if self.eat('=') { PipePipeEqual } else { PipePipe }
                } else if self.eat('=') {
                    PipeEqual
                } else {
                    Pipe
                }
            }
            '^' => {
                if self.eat('=') { CaretEqual } else { Caret }
            }
            '?' => {
                if self.eat('?') {
                    if self.eat('=') {
                        QuestionQuestionEqual
                    } else {
                        QuestionQuestion
                    }
                } else if self.peek() == Some('.')
                    && !self.peek2().is_some_and(|d| d.is_ascii_digit())
                {
                    // `a?.5:b` is a conditional, not optional chaining.
                    self.advance();
                    QuestionDot
                } else {
                    Question
                }
            }
            _ => return None,
        };
        Some(kind)
    }

    // ── Main entry point ────────────────────────────────────────────────────

    /// Scan and return the next token, including comment tokens.
    pub fn next_token(&mut self) -> ParseResult<Token> {
        let tok = self.scan_token()?;
        if !tok.kind.is_comment() {
            self.last_significant_kind = Some(tok.kind);
        }
        Ok(tok)
    }

    fn scan_token(&mut self) -> ParseResult<Token> {
        if self.pos == 0
            && self.allow_hash_bang
            && self.source.starts_with("#!")
        {
            let start = self.current_pos();
            self.advance();
            self.advance();
            return Ok(self.scan_line_comment(start, 2, false));
        }

        let had_lt = self.skip_whitespace();
        let forced_slash = self.forced_slash.take();
        let start = self.current_pos();
        let Some(c) = self.peek() else {
            return Ok(Token::new(
                TokenKind::Eof,
                TokenValue::None,
                self.span_from(start),
                had_lt,
            ));
        };

        if is_id_start(c) || c == '\\' {
            return self.scan_identifier(start, had_lt);
        }
        self.advance();

        match c {
            '/' => match self.peek() {
                Some('/') => {
                    self.advance();
                    let text_start = self.pos;
                    Ok(self.scan_line_comment(start, text_start, had_lt))
                }
                Some('*') => {
                    self.advance();
                    self.scan_block_comment(start, had_lt)
                }
                _ => {
                    let regexp = forced_slash
                        .unwrap_or_else(|| slash_is_regexp(self.last_significant_kind));
                    if regexp {
                        self.scan_regexp(start, had_lt)
                    } else {
                        let kind = if self.eat('=') {
                            TokenKind::SlashEqual
                        } else {
                            TokenKind::Slash
                        };
                        Ok(Token::new(kind, TokenValue::None, self.span_from(start), had_lt))
                    }
                }
            },
            '"' | '\'' => self.scan_string(c, start, had_lt),
            '`' => {
                let (value, has_sub) = self.scan_template_body(start)?;
                let kind = if has_sub {
                    self.template_stack.push(self.brace_depth);
                    TokenKind::TemplateHead
                } else {
                    TokenKind::NoSubstitutionTemplate
                };
                Ok(Token::new(kind, value, self.span_from(start), had_lt))
            }
            '}' => {
                if self.template_stack.last() == Some(&self.brace_depth) {
                    self.template_stack.pop();
                    let (value, has_sub) = self.scan_template_body(start)?;
                    let kind = if has_sub {
                        self.template_stack.push(self.brace_depth);
                        TokenKind::TemplateMiddle
                    } else {
                        TokenKind::TemplateTail
                    };
                    Ok(Token::new(kind, value, self.span_from(start), had_lt))
                } else {
                    self.brace_depth = self.brace_depth.saturating_sub(1);
                    Ok(Token::new(
                        TokenKind::RightBrace,
                        TokenValue::None,
                        self.span_from(start),
                        had_lt,
                    ))
                }
            }
            '0'..='9' => self.scan_numeric(c, start, had_lt),
            '.' if self.peek().is_some_and(|d| d.is_ascii_digit()) => {
                self.scan_numeric('.', start, had_lt)
            }
            '#' => {
                let (name, escaped) = self.scan_identifier_name()?;
                if name.is_empty() {
                    return self.error("Unexpected character '#'", start);
                }
                let mut tok = Token::new(
                    TokenKind::PrivateIdentifier,
                    TokenValue::Str(name),
                    self.span_from(start),
                    had_lt,
                );
                tok.escaped = escaped;
                Ok(tok)
            }
            _ => match self.scan_punctuator(c) {
                Some(kind) => Ok(Token::new(
                    kind,
                    TokenValue::None,
                    self.span_from(start),
                    had_lt,
                )),
                None => self.error(format!("Unexpected character '{c}'"), start),
            },
        }
    }

    /// Tokenise `source` completely, returning every token except the final
    /// EOF (comments included).
    pub fn tokenize_all(source: &'src str) -> ParseResult<Vec<Token>> {
        let mut scanner = Scanner::new(source);
        let mut tokens = Vec::new();
        loop {
            let tok = scanner.next_token()?;
            if tok.kind == TokenKind::Eof {
                break;
            }
            tokens.push(tok);
        }
        Ok(tokens)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Numeric parsing helper
// ─────────────────────────────────────────────────────────────────────────────

/// Compute the value of a validated numeric literal.
///
/// Radix-prefixed literals are accumulated in `f64` so values beyond
/// `u64::MAX` degrade to the nearest double instead of failing.
fn parse_numeric_raw(raw: &str, radix: u32, legacy_octal: bool) -> f64 {
    let clean: String = raw.chars().filter(|&c| c != '_').collect();
    if radix == 10 {
        return clean.parse::<f64>().unwrap_or(f64::NAN);
    }
    let digits = if legacy_octal { &clean[1..] } else { &clean[2..] };
    digits
        .chars()
        .filter_map(|c| c.to_digit(radix))
        .fold(0.0, |acc, d| acc * radix as f64 + d as f64)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Tokenise `src`, ignoring comments, and return a list of token kinds.
    fn kinds(src: &str) -> Vec<TokenKind> {
        Scanner::tokenize_all(src)
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_comment())
            .map(|t| t.kind)
            .collect()
    }

    fn tokens(src: &str) -> Vec<Token> {
        Scanner::tokenize_all(src).unwrap()
    }

    fn single(src: &str) -> Token {
        let toks = tokens(src);
        assert_eq!(toks.len(), 1, "expected one token in {src:?}");
        toks.into_iter().next().unwrap()
    }

    fn number(src: &str) -> f64 {
        match single(src).value {
            TokenValue::Number(n) => n,
            other => panic!("expected number, got {other:?}"),
        }
    }

    fn string(src: &str) -> String {
        match single(src).value {
            TokenValue::Str(s) => s,
            other => panic!("expected string, got {other:?}"),
        }
    }

    fn lex_error(src: &str) -> ParseError {
        Scanner::tokenize_all(src).unwrap_err()
    }

    // ── Keywords ─────────────────────────────────────────────────────────────

    #[test]
    fn test_keywords_reserved() {
        let toks = kinds("break case catch class const typeof void while with");
        assert_eq!(
            toks,
            vec![
                TokenKind::Break,
                TokenKind::Case,
                TokenKind::Catch,
                TokenKind::Class,
                TokenKind::Const,
                TokenKind::Typeof,
                TokenKind::Void,
                TokenKind::While,
                TokenKind::With,
            ]
        );
    }

    #[test]
    fn test_keywords_contextual_are_identifier_like() {
        for src in ["async", "of", "let", "yield", "await", "static", "using", "get"] {
            let tok = single(src);
            assert!(tok.kind.is_identifier_like(), "{src}");
            assert_eq!(tok.name(), Some(src));
        }
        assert!(!TokenKind::Class.is_identifier_like());
        assert!(TokenKind::Class.is_identifier_name());
    }

    #[test]
    fn test_escaped_keyword_is_identifier() {
        let tok = single("\\u0076ar");
        assert_eq!(tok.kind, TokenKind::Identifier);
        assert!(tok.escaped);
        assert_eq!(tok.name(), Some("var"));
    }

    // ── Identifiers ──────────────────────────────────────────────────────────

    #[test]
    fn test_identifier_unicode() {
        assert_eq!(string("café"), "café");
        assert_eq!(string("\\u{62}ar"), "bar");
    }

    #[test]
    fn test_identifier_unicode_properties() {
        // Combining marks continue an identifier but cannot start one.
        assert_eq!(string("a\u{0301}"), "a\u{0301}");
        assert_eq!(string("a\\u0301"), "a\u{0301}");
        assert!(lex_error("\\u0301a").is_lexical());
        // Other_ID_Start characters.
        assert_eq!(string("\u{2118}"), "\u{2118}");
        assert_eq!(string("\u{309B}x"), "\u{309B}x");
        assert_eq!(string("x\u{309C}"), "x\u{309C}");
    }

    #[test]
    fn test_identifier_rejects_non_id_characters() {
        // Superscript digits are numeric but not ID_Continue.
        assert!(lex_error("a\u{00B2}").is_lexical());
        assert!(lex_error("\u{00B2}").is_lexical());
        assert_eq!(kinds("a\u{200D}b"), vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_identifier_bad_escape() {
        assert!(lex_error("\\u0031abc").is_lexical());
        assert!(lex_error("a\\x41").is_lexical());
    }

    #[test]
    fn test_private_identifier() {
        let tok = single("#secret");
        assert_eq!(tok.kind, TokenKind::PrivateIdentifier);
        assert_eq!(tok.name(), Some("secret"));
    }

    // ── Numbers ──────────────────────────────────────────────────────────────

    #[test]
    fn test_numeric_values() {
        assert_eq!(number("42"), 42.0);
        assert_eq!(number("3.25"), 3.25);
        assert_eq!(number(".5"), 0.5);
        assert_eq!(number("1."), 1.0);
        assert_eq!(number("1e3"), 1000.0);
        assert_eq!(number("2E-2"), 0.02);
        assert_eq!(number("0xFF"), 255.0);
        assert_eq!(number("0b101"), 5.0);
        assert_eq!(number("0o17"), 15.0);
        assert_eq!(number("1_000_000"), 1_000_000.0);
    }

    #[test]
    fn test_numeric_legacy_octal_flag() {
        let tok = single("017");
        assert!(tok.legacy_octal);
        assert_eq!(tok.value, TokenValue::Number(15.0));
        let tok = single("08");
        assert!(tok.legacy_octal);
        assert_eq!(tok.value, TokenValue::Number(8.0));
        assert!(!single("0").legacy_octal);
    }

    #[test]
    fn test_numeric_bigint() {
        assert_eq!(single("123n").value, TokenValue::BigInt("123".into()));
        assert_eq!(single("0x1_Fn").value, TokenValue::BigInt("0x1F".into()));
        assert!(lex_error("017n").is_lexical());
        assert!(lex_error("1.5n").is_lexical());
    }

    #[test]
    fn test_numeric_malformed() {
        for src in ["1e", "1e+", "0x", "0b2", "1__0", "1_", "0_1", "1._5", "3in x", "1_.5"] {
            assert!(Scanner::tokenize_all(src).is_err(), "{src} should fail");
        }
    }

    #[test]
    fn test_question_dot_before_digit() {
        assert_eq!(
            kinds("a?.5:b"),
            vec![
                TokenKind::Identifier,
                TokenKind::Question,
                TokenKind::NumericLiteral,
                TokenKind::Colon,
                TokenKind::Identifier,
            ]
        );
        assert_eq!(kinds("a?.b")[1], TokenKind::QuestionDot);
    }

    // ── Strings ──────────────────────────────────────────────────────────────

    #[test]
    fn test_string_escape_sequences() {
        assert_eq!(string(r#""a\nb""#), "a\nb");
        assert_eq!(string(r#""\x41B\u{43}""#), "ABC");
        assert_eq!(string(r#"'\'q\''"#), "'q'");
        assert_eq!(string("\"a\\\nb\""), "ab");
        assert_eq!(string(r#""😀""#), "😀");
    }

    #[test]
    fn test_string_octal_escape_flag() {
        let tok = single(r#""\101""#);
        assert!(tok.legacy_octal);
        assert_eq!(tok.value, TokenValue::Str("A".into()));
        assert!(single(r#""\8""#).legacy_octal);
        assert!(!single(r#""\0""#).legacy_octal);
    }

    #[test]
    fn test_string_errors() {
        assert!(lex_error("\"abc").is_lexical());
        assert!(lex_error("'a\nb'").is_lexical());
        assert!(lex_error(r#""\x4""#).is_lexical());
        assert!(lex_error(r#""\u{110000}""#).is_lexical());
    }

    #[test]
    fn test_string_allows_line_separator() {
        assert_eq!(string("\"a\u{2028}b\""), "a\u{2028}b");
    }

    // ── Templates ────────────────────────────────────────────────────────────

    #[test]
    fn test_template_with_substitution() {
        assert_eq!(
            kinds("`a${x}b${y}c`"),
            vec![
                TokenKind::TemplateHead,
                TokenKind::Identifier,
                TokenKind::TemplateMiddle,
                TokenKind::Identifier,
                TokenKind::TemplateTail,
            ]
        );
    }

    #[test]
    fn test_template_object_in_substitution() {
        assert_eq!(
            kinds("`${ {a: 1} }`"),
            vec![
                TokenKind::TemplateHead,
                TokenKind::LeftBrace,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::NumericLiteral,
                TokenKind::RightBrace,
                TokenKind::TemplateTail,
            ]
        );
    }

    #[test]
    fn test_template_cooked_and_raw() {
        let tok = single("`a\\tb\r\nc`");
        assert_eq!(
            tok.value,
            TokenValue::Template {
                cooked: Some("a\tb\nc".into()),
                raw: "a\\tb\nc".into(),
            }
        );
        let tok = single("`\\unicode`");
        assert_eq!(
            tok.value,
            TokenValue::Template {
                cooked: None,
                raw: "\\unicode".into(),
            }
        );
    }

    // ── Regular expressions ──────────────────────────────────────────────────

    #[test]
    fn test_regexp_value() {
        let toks = tokens("x = /[/]\\//gi");
        assert_eq!(
            toks[2].value,
            TokenValue::RegExp {
                pattern: "[/]\\/".into(),
                flags: "gi".into(),
            }
        );
    }

    #[test]
    fn test_regexp_bad_flags() {
        assert!(lex_error("/a/gg").is_lexical());
        assert!(lex_error("/a/x").is_lexical());
        assert!(lex_error("/a/uv").is_lexical());
        assert!(lex_error("/a\n/").is_lexical());
    }

    #[test]
    fn test_division_after_identifier() {
        assert_eq!(
            kinds("a / b /= c"),
            vec![
                TokenKind::Identifier,
                TokenKind::Slash,
                TokenKind::Identifier,
                TokenKind::SlashEqual,
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn test_rescan_slash_as_regexp() {
        let mut sc = Scanner::new("(x) /re/");
        for _ in 0..3 {
            sc.next_token().unwrap();
        }
        let cp = sc.checkpoint();
        assert_eq!(sc.next_token().unwrap().kind, TokenKind::Slash);
        let tok = sc.rescan_slash(&cp, true).unwrap();
        assert_eq!(tok.kind, TokenKind::RegExpLiteral);
        assert_eq!(sc.next_token().unwrap().kind, TokenKind::Eof);
    }

    // ── Comments and positions ───────────────────────────────────────────────

    #[test]
    fn test_block_comment_line_terminator() {
        let toks = tokens("a /*\n*/ b");
        assert!(toks[1].had_line_terminator_before);
        assert!(!toks[2].had_line_terminator_before);
    }

    #[test]
    fn test_unterminated_comment() {
        assert!(lex_error("/* abc").is_lexical());
    }

    #[test]
    fn test_hash_bang() {
        let toks = tokens("#!/usr/bin/env node\nx");
        assert_eq!(toks[0].kind, TokenKind::SingleLineComment);
        assert_eq!(toks[1].kind, TokenKind::Identifier);
        assert!(Scanner::new("#!x").with_hash_bang(false).next_token().is_err());
    }

    #[test]
    fn test_positions_utf16_columns() {
        let toks = tokens("'😀' x\r\n  y");
        assert_eq!(toks[1].span.start.column, 5);
        assert_eq!(toks[1].span.start.offset, 7);
        assert_eq!(toks[2].span.start.line, 2);
        assert_eq!(toks[2].span.start.column, 2);
    }

    #[test]
    fn test_error_position() {
        let err = lex_error("a\n  @");
        assert_eq!(err.position().line, 2);
        assert_eq!(err.position().column, 2);
    }
}

//! ESTree-shaped Abstract Syntax Tree node definitions.
//!
//! Every node struct carries a [`SourceLocation`] field (`loc`) that pinpoints
//! its position in the source text.  The byte offsets are always present;
//! the `range` and `lines` parts are filled in only when the caller asked for
//! them.
//!
//! # Structure
//!
//! - [`Program`]: root node.
//! - [`Stmt`]: statement nodes.
//! - [`Expr`]: expression nodes.
//! - [`Pat`]: binding/assignment pattern nodes.
//! - [`ModuleDecl`]: `import`/`export` module declarations.
//! - [`Literal`]: every literal except templates, tagged by [`LitValue`].

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Source location
// ─────────────────────────────────────────────────────────────────────────────

/// A 1-based line and 0-based UTF-16 column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineColumn {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column in UTF-16 code units.
    pub column: u32,
}

/// Line/column pair for the two ends of a node (ESTree `loc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineSpan {
    /// Position of the first character.
    pub start: LineColumn,
    /// Position just past the last character.
    pub end: LineColumn,
}

/// Source location attached to every AST node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceLocation {
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset just past the last consumed token.
    pub end: usize,
    /// `[start, end]` copy, present when byte ranges were requested.
    pub range: Option<(usize, usize)>,
    /// Line/column pairs, present when locations were requested.
    pub lines: Option<LineSpan>,
}

impl SourceLocation {
    /// Number of bytes covered by the node.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// `true` for zero-width nodes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The slice of `source` this node covers.
    pub fn source_text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Program
// ─────────────────────────────────────────────────────────────────────────────

/// Whether the source file is a classic script or an ES module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    /// A classic `<script>`: top-level `import`/`export` are not allowed.
    #[default]
    Script,
    /// An ES module: strict, with `import`/`export` and top-level `await`.
    Module,
}

/// The root node of a parsed JavaScript source file.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    /// Source location of the entire program; starts at 0 and ends at the
    /// input length.
    pub loc: SourceLocation,
    /// Whether the file is a script or a module.
    pub source_type: SourceType,
    /// Top-level statements and module declarations.
    pub body: Vec<ProgramItem>,
}

/// A top-level item inside a [`Program`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProgramItem {
    /// A regular statement.
    Stmt(Stmt),
    /// A module-level `import` or `export` declaration.
    ModuleDecl(ModuleDecl),
}

// ─────────────────────────────────────────────────────────────────────────────
// Common helpers
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript identifier (name, label, or binding).
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    /// Source location.
    pub loc: SourceLocation,
    /// The identifier text with escapes decoded.
    pub name: String,
}

/// A private identifier beginning with `#` (class fields/methods).
#[derive(Debug, Clone, PartialEq)]
pub struct PrivateIdent {
    /// Source location.
    pub loc: SourceLocation,
    /// The identifier text, **without** the leading `#`.
    pub name: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `{ … }` block statement.
    Block(BlockStmt),
    /// `var / let / const / using` variable declaration.
    VarDecl(VarDecl),
    /// `function` declaration.
    FnDecl(Box<Function>),
    /// `class` declaration.
    ClassDecl(Box<Class>),
    /// Expression statement (`expr ;`), including directives.
    Expr(ExprStmt),
    /// `if (test) consequent else alternate`
    If(IfStmt),
    /// `for (init; test; update) body`
    For(Box<ForStmt>),
    /// `for (left in right) body`
    ForIn(Box<ForInStmt>),
    /// `for [await] (left of right) body`
    ForOf(Box<ForOfStmt>),
    /// `while (test) body`
    While(WhileStmt),
    /// `do body while (test);`
    DoWhile(DoWhileStmt),
    /// `switch (discriminant) { cases }`
    Switch(SwitchStmt),
    /// `try { … } catch (…) { … } finally { … }`
    Try(Box<TryStmt>),
    /// `return argument?;`
    Return(ReturnStmt),
    /// `throw argument;`
    Throw(ThrowStmt),
    /// `break label?;`
    Break(BreakStmt),
    /// `continue label?;`
    Continue(ContinueStmt),
    /// `label: body`
    Labeled(LabeledStmt),
    /// `debugger;`
    Debugger(DebuggerStmt),
    /// `with (object) body`
    With(WithStmt),
    /// Empty statement `;`.
    Empty(EmptyStmt),
}

impl Stmt {
    /// Returns the source location of this statement.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Stmt::Block(s) => s.loc,
            Stmt::VarDecl(s) => s.loc,
            Stmt::FnDecl(s) => s.loc,
            Stmt::ClassDecl(s) => s.loc,
            Stmt::Expr(s) => s.loc,
            Stmt::If(s) => s.loc,
            Stmt::For(s) => s.loc,
            Stmt::ForIn(s) => s.loc,
            Stmt::ForOf(s) => s.loc,
            Stmt::While(s) => s.loc,
            Stmt::DoWhile(s) => s.loc,
            Stmt::Switch(s) => s.loc,
            Stmt::Try(s) => s.loc,
            Stmt::Return(s) => s.loc,
            Stmt::Throw(s) => s.loc,
            Stmt::Break(s) => s.loc,
            Stmt::Continue(s) => s.loc,
            Stmt::Labeled(s) => s.loc,
            Stmt::Debugger(s) => s.loc,
            Stmt::With(s) => s.loc,
            Stmt::Empty(s) => s.loc,
        }
    }
}

/// `{ statements }` block statement; also a function body.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Statements in the block.
    pub body: Vec<Stmt>,
}

/// Expression statement: `expr ;`
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// The expression.
    pub expr: Box<Expr>,
    /// Raw string contents (without quotes) when this statement is part of
    /// a directive prologue, e.g. `use strict`.
    pub directive: Option<String>,
}

/// `if (test) consequent else alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Condition expression.
    pub test: Box<Expr>,
    /// Taken branch.
    pub consequent: Box<Stmt>,
    /// Not-taken branch, if present.
    pub alternate: Option<Box<Stmt>>,
}

/// `for (init; test; update) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Optional initializer.
    pub init: Option<ForInit>,
    /// Optional loop condition.
    pub test: Option<Box<Expr>>,
    /// Optional update expression.
    pub update: Option<Box<Expr>>,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// The initializer slot in a C-style `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// `var / let / const` declaration.
    VarDecl(VarDecl),
    /// Plain expression.
    Expr(Box<Expr>),
}

/// `for (left in right) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForInStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Left-hand side binding.
    pub left: ForInOfLeft,
    /// The object being iterated.
    pub right: Box<Expr>,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// `for [await] (left of right) body`
#[derive(Debug, Clone, PartialEq)]
pub struct ForOfStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// `true` for `for await (…)`.
    pub is_await: bool,
    /// Left-hand side binding.
    pub left: ForInOfLeft,
    /// The iterable.
    pub right: Box<Expr>,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// The left-hand side of a `for-in` or `for-of` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInOfLeft {
    /// `var / let / const` declaration with exactly one declarator.
    VarDecl(VarDecl),
    /// Assignment target (identifier, member expression or pattern).
    Pat(Pat),
}

/// `while (test) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Loop condition.
    pub test: Box<Expr>,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// `do body while (test);`
#[derive(Debug, Clone, PartialEq)]
pub struct DoWhileStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Loop body.
    pub body: Box<Stmt>,
    /// Loop condition.
    pub test: Box<Expr>,
}

/// `switch (discriminant) { cases }`
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// The value being switched on.
    pub discriminant: Box<Expr>,
    /// `case` and `default` clauses.
    pub cases: Vec<SwitchCase>,
}

/// A single `case test:` or `default:` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchCase {
    /// Source location.
    pub loc: SourceLocation,
    /// `None` for the `default` clause.
    pub test: Option<Box<Expr>>,
    /// Statements of the clause.
    pub consequent: Vec<Stmt>,
}

/// `try { … } catch (…) { … } finally { … }`
#[derive(Debug, Clone, PartialEq)]
pub struct TryStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// The protected block.
    pub block: BlockStmt,
    /// `catch` clause, if present.
    pub handler: Option<CatchClause>,
    /// `finally` block, if present.
    pub finalizer: Option<BlockStmt>,
}

/// `catch (param) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    /// Source location.
    pub loc: SourceLocation,
    /// Binding; `None` for `catch { … }`.
    pub param: Option<Pat>,
    /// Handler body.
    pub body: BlockStmt,
}

/// `return argument?;`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Returned value, if any.
    pub argument: Option<Box<Expr>>,
}

/// `throw argument;`
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Thrown value.
    pub argument: Box<Expr>,
}

/// `break label?;`
#[derive(Debug, Clone, PartialEq)]
pub struct BreakStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Target label, if any.
    pub label: Option<Ident>,
}

/// `continue label?;`
#[derive(Debug, Clone, PartialEq)]
pub struct ContinueStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Target label, if any.
    pub label: Option<Ident>,
}

/// `label: body`
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// The label.
    pub label: Ident,
    /// Labelled statement.
    pub body: Box<Stmt>,
}

/// `debugger;`
#[derive(Debug, Clone, PartialEq)]
pub struct DebuggerStmt {
    /// Source location.
    pub loc: SourceLocation,
}

/// `with (object) body`
#[derive(Debug, Clone, PartialEq)]
pub struct WithStmt {
    /// Source location.
    pub loc: SourceLocation,
    /// Scope object.
    pub object: Box<Expr>,
    /// Body.
    pub body: Box<Stmt>,
}

/// Empty statement `;`.
#[derive(Debug, Clone, PartialEq)]
pub struct EmptyStmt {
    /// Source location.
    pub loc: SourceLocation,
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// `var / let / const / using` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    /// Source location.
    pub loc: SourceLocation,
    /// Declaration keyword.
    pub kind: VarKind,
    /// One or more declarators.
    pub declarations: Vec<VarDeclarator>,
}

/// The declaration keyword of a [`VarDecl`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    /// `var`
    Var,
    /// `let`
    Let,
    /// `const`
    Const,
    /// `using` (next syntax).
    Using,
}

impl VarKind {
    /// The declaration keyword as written.
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
            VarKind::Using => "using",
        }
    }
}

/// A single `id = init` declarator.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    /// Source location.
    pub loc: SourceLocation,
    /// Binding identifier or pattern.
    pub id: Pat,
    /// Initializer, if present.
    pub init: Option<Box<Expr>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Functions
// ─────────────────────────────────────────────────────────────────────────────

/// A function declaration, function expression or method body.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    /// Source location.
    pub loc: SourceLocation,
    /// Name; absent for anonymous expressions, methods and
    /// `export default function () {}`.
    pub id: Option<Ident>,
    /// `async function`
    pub is_async: bool,
    /// `function*`
    pub is_generator: bool,
    /// Formal parameters.
    pub params: Vec<Pat>,
    /// Function body.
    pub body: BlockStmt,
}

/// `(params) => body`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// `async (…) => …`
    pub is_async: bool,
    /// Formal parameters.
    pub params: Vec<Pat>,
    /// Block body or concise expression body.
    pub body: ArrowBody,
}

/// The body of an arrow function.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrowBody {
    /// `=> { … }`
    Block(BlockStmt),
    /// `=> expr`
    Expr(Box<Expr>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Classes
// ─────────────────────────────────────────────────────────────────────────────

/// A class declaration or expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    /// Source location.
    pub loc: SourceLocation,
    /// Class name.
    pub id: Option<Ident>,
    /// `extends` clause.
    pub super_class: Option<Box<Expr>>,
    /// Class body.
    pub body: ClassBody,
}

/// `{ members }` of a class.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBody {
    /// Source location.
    pub loc: SourceLocation,
    /// Members in source order.
    pub body: Vec<ClassMember>,
}

/// A single class element.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    /// Method, getter, setter or constructor.
    Method(MethodDef),
    /// Public or private field.
    Property(PropertyDef),
    /// `static { … }`
    StaticBlock(StaticBlock),
}

/// A class method definition.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    /// Source location.
    pub loc: SourceLocation,
    /// `static` modifier.
    pub is_static: bool,
    /// Method kind.
    pub kind: MethodKind,
    /// Method name.
    pub key: PropKey,
    /// The method function.
    pub value: Box<Function>,
}

/// The kind of a [`MethodDef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    /// `constructor(…) { … }`
    Constructor,
    /// Ordinary method.
    Method,
    /// `get name() { … }`
    Get,
    /// `set name(v) { … }`
    Set,
}

/// A class field definition.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    /// Source location.
    pub loc: SourceLocation,
    /// `static` modifier.
    pub is_static: bool,
    /// Field name.
    pub key: PropKey,
    /// Initializer, if present.
    pub value: Option<Box<Expr>>,
}

/// `static { … }` initialization block.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticBlock {
    /// Source location.
    pub loc: SourceLocation,
    /// Statements of the block.
    pub body: Vec<Stmt>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Modules
// ─────────────────────────────────────────────────────────────────────────────

/// A module-level `import` or `export` declaration.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleDecl {
    /// `import … from "…"`
    Import(ImportDecl),
    /// `export { … }` / `export <declaration>`
    ExportNamed(ExportNamedDecl),
    /// `export default …`
    ExportDefault(ExportDefaultDecl),
    /// `export * [as ns] from "…"`
    ExportAll(ExportAllDecl),
}

impl ModuleDecl {
    /// Returns the source location of this declaration.
    pub fn loc(&self) -> SourceLocation {
        match self {
            ModuleDecl::Import(d) => d.loc,
            ModuleDecl::ExportNamed(d) => d.loc,
            ModuleDecl::ExportDefault(d) => d.loc,
            ModuleDecl::ExportAll(d) => d.loc,
        }
    }
}

/// `import specifiers from source with { attributes }`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Source location.
    pub loc: SourceLocation,
    /// Imported bindings (empty for `import "mod"`).
    pub specifiers: Vec<ImportSpecifier>,
    /// Module specifier string.
    pub source: Literal,
    /// Import attributes.
    pub attributes: Vec<ImportAttribute>,
}

/// One imported binding.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `{ imported as local }`
    Named(ImportNamedSpecifier),
    /// `local`
    Default(ImportDefaultSpecifier),
    /// `* as local`
    Namespace(ImportNamespaceSpecifier),
}

/// `{ imported as local }`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportNamedSpecifier {
    /// Source location.
    pub loc: SourceLocation,
    /// Name exported by the other module.
    pub imported: ModuleExportName,
    /// Local binding.
    pub local: Ident,
}

/// Default import binding.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDefaultSpecifier {
    /// Source location.
    pub loc: SourceLocation,
    /// Local binding.
    pub local: Ident,
}

/// `* as local`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportNamespaceSpecifier {
    /// Source location.
    pub loc: SourceLocation,
    /// Local binding.
    pub local: Ident,
}

/// `key: "value"` entry of a `with { … }` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportAttribute {
    /// Source location.
    pub loc: SourceLocation,
    /// Attribute key.
    pub key: ModuleExportName,
    /// Attribute value (always a string literal).
    pub value: Literal,
}

/// `export { … } [from "…"]` or `export <declaration>`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportNamedDecl {
    /// Source location.
    pub loc: SourceLocation,
    /// Exported declaration, for `export var …` and friends.
    pub declaration: Option<Box<Stmt>>,
    /// Export list.
    pub specifiers: Vec<ExportSpecifier>,
    /// Re-export source.
    pub source: Option<Literal>,
    /// Import attributes of a re-export.
    pub attributes: Vec<ImportAttribute>,
}

/// `local as exported`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    /// Source location.
    pub loc: SourceLocation,
    /// Local (or re-exported) name.
    pub local: ModuleExportName,
    /// Public name.
    pub exported: ModuleExportName,
}

/// `export default …`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportDefaultDecl {
    /// Source location.
    pub loc: SourceLocation,
    /// The exported declaration or expression.
    pub declaration: ExportDefaultExpr,
}

/// The payload of `export default`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDefaultExpr {
    /// `export default function …`
    Fn(Box<Function>),
    /// `export default class …`
    Class(Box<Class>),
    /// `export default <expr>;`
    Expr(Box<Expr>),
}

/// `export * [as exported] from source`
#[derive(Debug, Clone, PartialEq)]
pub struct ExportAllDecl {
    /// Source location.
    pub loc: SourceLocation,
    /// Namespace name, if any.
    pub exported: Option<ModuleExportName>,
    /// Module specifier.
    pub source: Literal,
    /// Import attributes.
    pub attributes: Vec<ImportAttribute>,
}

/// A module export name: an identifier or a string literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleExportName {
    /// `name`
    Ident(Ident),
    /// `"string name"`
    Str(Literal),
}

impl ModuleExportName {
    /// The name as a string.
    pub fn name(&self) -> &str {
        match self {
            ModuleExportName::Ident(i) => &i.name,
            ModuleExportName::Str(lit) => match &lit.value {
                LitValue::Str(s) => s,
                _ => "",
            },
        }
    }

    /// Returns the source location of this name.
    pub fn loc(&self) -> SourceLocation {
        match self {
            ModuleExportName::Ident(i) => i.loc,
            ModuleExportName::Str(lit) => lit.loc,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────────────

/// A `null`, boolean, number, BigInt, string or regular-expression literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    /// Source location.
    pub loc: SourceLocation,
    /// The decoded value.
    pub value: LitValue,
    /// The literal exactly as written.
    pub raw: String,
}

/// The decoded value of a [`Literal`].
#[derive(Debug, Clone, PartialEq)]
pub enum LitValue {
    /// `null`
    Null,
    /// `true` / `false`
    Bool(bool),
    /// Numeric value.
    Num(f64),
    /// Cooked string contents.
    Str(String),
    /// BigInt digits (ESTree `bigint`), without separators or suffix.
    BigInt(String),
    /// Regular-expression payload (ESTree `regex`).
    RegExp(RegExpLit),
}

/// `/pattern/flags`
#[derive(Debug, Clone, PartialEq)]
pub struct RegExpLit {
    /// Text between the slashes.
    pub pattern: String,
    /// Flag characters.
    pub flags: String,
}

/// `` `quasi ${expr} quasi` ``
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateLit {
    /// Source location.
    pub loc: SourceLocation,
    /// Static text parts; always one more than `expressions`.
    pub quasis: Vec<TemplateElement>,
    /// Substitutions.
    pub expressions: Vec<Expr>,
}

/// One static text part of a template.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateElement {
    /// Source location (excluding the `` ` ``, `${` and `}` delimiters).
    pub loc: SourceLocation,
    /// Escape-processed text; `None` for invalid escapes in tagged templates.
    pub cooked: Option<String>,
    /// Source text with line terminators normalised.
    pub raw: String,
    /// `true` for the last element.
    pub tail: bool,
}

// ─────────────────────────────────────────────────────────────────────────────
// Expressions
// ─────────────────────────────────────────────────────────────────────────────

/// A JavaScript expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // ── Literals ──────────────────────────────────────────────────────────
    /// Null, boolean, numeric, BigInt, string or regexp literal.
    Lit(Literal),
    /// Template literal.
    Template(Box<TemplateLit>),

    // ── Primary ───────────────────────────────────────────────────────────
    /// Plain identifier.
    Ident(Ident),
    /// `#name`, only as the left operand of `in`.
    PrivateName(PrivateIdent),
    /// `this`
    This(ThisExpr),
    /// `super`, only as a callee or member object.
    Super(SuperExpr),
    /// Array literal `[elements]`.
    Array(Box<ArrayExpr>),
    /// Object literal `{ properties }`.
    Object(Box<ObjectExpr>),

    // ── Function-like ─────────────────────────────────────────────────────
    /// Function expression.
    Fn(Box<Function>),
    /// Arrow function expression.
    Arrow(Box<ArrowExpr>),
    /// Class expression.
    Class(Box<Class>),

    // ── Operators ─────────────────────────────────────────────────────────
    /// Unary prefix operator.
    Unary(Box<UnaryExpr>),
    /// `++` / `--` update expression.
    Update(Box<UpdateExpr>),
    /// Binary infix operator.
    Binary(Box<BinaryExpr>),
    /// Logical `&&` / `||` / `??` operator.
    Logical(Box<LogicalExpr>),
    /// `test ? consequent : alternate`
    Conditional(Box<ConditionalExpr>),
    /// Assignment expression (`=`, `+=`, …).
    Assign(Box<AssignExpr>),
    /// Comma-separated sequence `(a, b, c)`.
    Sequence(Box<SequenceExpr>),

    // ── Member / call ─────────────────────────────────────────────────────
    /// `object.property`, `object[expr]`, `object?.property`
    Member(Box<MemberExpr>),
    /// `callee(args)` / `callee?.(args)`
    Call(Box<CallExpr>),
    /// `new callee(args)`
    New(Box<NewExpr>),
    /// Wrapper around an optional chain `a?.b.c`.
    Chain(Box<ChainExpr>),

    // ── Template ──────────────────────────────────────────────────────────
    /// `` tag`template` ``
    TaggedTemplate(Box<TaggedTemplateExpr>),

    // ── Spread ────────────────────────────────────────────────────────────
    /// `...argument` inside an array literal or call arguments.
    Spread(Box<SpreadElement>),

    // ── Async / generator ─────────────────────────────────────────────────
    /// `yield [*] [argument]`
    Yield(Box<YieldExpr>),
    /// `await argument`
    Await(Box<AwaitExpr>),

    // ── Dynamic import / meta ─────────────────────────────────────────────
    /// `import(source)`
    Import(Box<ImportExpr>),
    /// `import.meta` or `new.target`
    MetaProp(MetaPropExpr),
}

impl Expr {
    /// Returns the source location of this expression.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Expr::Lit(e) => e.loc,
            Expr::Template(e) => e.loc,
            Expr::Ident(e) => e.loc,
            Expr::PrivateName(e) => e.loc,
            Expr::This(e) => e.loc,
            Expr::Super(e) => e.loc,
            Expr::Array(e) => e.loc,
            Expr::Object(e) => e.loc,
            Expr::Fn(e) => e.loc,
            Expr::Arrow(e) => e.loc,
            Expr::Class(e) => e.loc,
            Expr::Unary(e) => e.loc,
            Expr::Update(e) => e.loc,
            Expr::Binary(e) => e.loc,
            Expr::Logical(e) => e.loc,
            Expr::Conditional(e) => e.loc,
            Expr::Assign(e) => e.loc,
            Expr::Sequence(e) => e.loc,
            Expr::Member(e) => e.loc,
            Expr::Call(e) => e.loc,
            Expr::New(e) => e.loc,
            Expr::Chain(e) => e.loc,
            Expr::TaggedTemplate(e) => e.loc,
            Expr::Spread(e) => e.loc,
            Expr::Yield(e) => e.loc,
            Expr::Await(e) => e.loc,
            Expr::Import(e) => e.loc,
            Expr::MetaProp(e) => e.loc,
        }
    }
}

/// `this`
#[derive(Debug, Clone, PartialEq)]
pub struct ThisExpr {
    /// Source location.
    pub loc: SourceLocation,
}

/// `super`
#[derive(Debug, Clone, PartialEq)]
pub struct SuperExpr {
    /// Source location.
    pub loc: SourceLocation,
}

/// Array literal: `[elements]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Elements, where `None` represents an elision (`,`).
    pub elements: Vec<Option<Expr>>,
}

/// Object literal: `{ properties }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Property list.
    pub properties: Vec<ObjectProp>,
}

/// A single property (or spread) in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProp {
    /// `key: value`, shorthand, getter/setter, or method.
    Prop(Box<Prop>),
    /// `...expr` spread property.
    Spread(SpreadElement),
}

/// A concrete property in an object literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    /// Source location.
    pub loc: SourceLocation,
    /// The property key.
    pub key: PropKey,
    /// `init`, `get` or `set`.
    pub kind: PropKind,
    /// `{ m() {} }`
    pub method: bool,
    /// `{ x }`; also `{ x = 1 }` while it is still a cover.
    pub shorthand: bool,
    /// The value; a [`Function`] for methods and accessors.
    pub value: Box<Expr>,
}

/// ESTree `Property.kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// Plain, shorthand or method property.
    Init,
    /// Getter.
    Get,
    /// Setter.
    Set,
}

/// A property name in an object literal, pattern or class.
#[derive(Debug, Clone, PartialEq)]
pub enum PropKey {
    /// `name`
    Ident(Ident),
    /// `#name` (class members only).
    Private(PrivateIdent),
    /// `"str"`, `1`, `1n`
    Lit(Literal),
    /// `[expr]`
    Computed(Box<Expr>),
}

impl PropKey {
    /// The static name of a non-computed key.
    pub fn static_name(&self) -> Option<String> {
        match self {
            PropKey::Ident(i) => Some(i.name.clone()),
            PropKey::Lit(lit) => match &lit.value {
                LitValue::Str(s) => Some(s.clone()),
                LitValue::Num(n) => Some(format_number_key(*n)),
                LitValue::BigInt(b) => Some(b.clone()),
                _ => None,
            },
            PropKey::Private(_) | PropKey::Computed(_) => None,
        }
    }

    /// `true` for `[expr]` keys.
    pub fn is_computed(&self) -> bool {
        matches!(self, PropKey::Computed(_))
    }

    /// Returns the source location of this key.
    pub fn loc(&self) -> SourceLocation {
        match self {
            PropKey::Ident(i) => i.loc,
            PropKey::Private(p) => p.loc,
            PropKey::Lit(l) => l.loc,
            PropKey::Computed(e) => e.loc(),
        }
    }
}

fn format_number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// `...argument`
#[derive(Debug, Clone, PartialEq)]
pub struct SpreadElement {
    /// Source location.
    pub loc: SourceLocation,
    /// The spread operand.
    pub argument: Box<Expr>,
}

/// Unary prefix expression: `op argument`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The operator.
    pub op: UnaryOp,
    /// Operand.
    pub argument: Box<Expr>,
}

/// A unary prefix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `-`
    Minus,
    /// `+`
    Plus,
    /// `!`
    Not,
    /// `~`
    BitNot,
    /// `typeof`
    Typeof,
    /// `void`
    Void,
    /// `delete`
    Delete,
}

/// `++x`, `x--`, …
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The operator.
    pub op: UpdateOp,
    /// `true` for the prefix form.
    pub prefix: bool,
    /// Operand (an identifier or member expression).
    pub argument: Box<Expr>,
}

/// An update operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

/// Binary infix expression: `left op right`.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The binary operator.
    pub op: BinaryOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

/// A binary (non-assignment, non-logical) infix operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `==`
    Eq,
    /// `!=`
    NotEq,
    /// `===`
    StrictEq,
    /// `!==`
    StrictNotEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    UShr,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `**`
    Exp,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
    /// `in`
    In,
    /// `instanceof`
    Instanceof,
}

/// Logical short-circuit expression: `left op right`.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The logical operator.
    pub op: LogicalOp,
    /// Left operand.
    pub left: Box<Expr>,
    /// Right operand.
    pub right: Box<Expr>,
}

/// A logical (short-circuit) operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOp {
    /// `&&`
    And,
    /// `||`
    Or,
    /// `??`
    NullishCoalesce,
}

/// `test ? consequent : alternate`
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionalExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The condition.
    pub test: Box<Expr>,
    /// Taken branch.
    pub consequent: Box<Expr>,
    /// Not-taken branch.
    pub alternate: Box<Expr>,
}

/// Assignment expression: `left op right`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The assignment operator.
    pub op: AssignOp,
    /// Left-hand side: an identifier, a member target or (for `=` only) a
    /// destructuring pattern.
    pub left: Pat,
    /// Right-hand side.
    pub right: Box<Expr>,
}

/// An assignment operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
    /// `%=`
    RemAssign,
    /// `**=`
    ExpAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `>>>=`
    UShrAssign,
    /// `|=`
    BitOrAssign,
    /// `^=`
    BitXorAssign,
    /// `&=`
    BitAndAssign,
    /// `&&=`
    LogicalAndAssign,
    /// `||=`
    LogicalOrAssign,
    /// `??=`
    NullishAssign,
}

/// Comma-separated sequence expression: `(a, b, c)`.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The expressions in order.
    pub expressions: Vec<Expr>,
}

/// `object.property`, `object[expr]` and their `?.` forms.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The object (may be [`Expr::Super`]).
    pub object: Box<Expr>,
    /// The property.
    pub property: MemberProp,
    /// `true` when this link is written `?.`.
    pub optional: bool,
}

impl MemberExpr {
    /// `true` for `object[expr]`.
    pub fn is_computed(&self) -> bool {
        matches!(self.property, MemberProp::Computed(_))
    }
}

/// The property part of a [`MemberExpr`].
#[derive(Debug, Clone, PartialEq)]
pub enum MemberProp {
    /// `.name`
    Ident(Ident),
    /// `.#name`
    Private(PrivateIdent),
    /// `[expr]`
    Computed(Box<Expr>),
}

/// `callee(arguments)` or `callee?.(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Callee (may be [`Expr::Super`]).
    pub callee: Box<Expr>,
    /// Arguments, possibly [`Expr::Spread`].
    pub arguments: Vec<Expr>,
    /// `true` when written `?.(`.
    pub optional: bool,
}

/// `new callee(arguments)`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Constructor expression.
    pub callee: Box<Expr>,
    /// Arguments (empty when the parentheses are omitted).
    pub arguments: Vec<Expr>,
}

/// The root of an optional chain.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The outermost member or call of the chain.
    pub expression: Box<Expr>,
}

/// `` tag`quasi` ``
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedTemplateExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// The tag function.
    pub tag: Box<Expr>,
    /// The template.
    pub quasi: TemplateLit,
}

/// `yield [*] [argument]`
#[derive(Debug, Clone, PartialEq)]
pub struct YieldExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// `yield*`
    pub delegate: bool,
    /// Operand, if any.
    pub argument: Option<Box<Expr>>,
}

/// `await argument`
#[derive(Debug, Clone, PartialEq)]
pub struct AwaitExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Operand.
    pub argument: Box<Expr>,
}

/// `import(source [, options])`
#[derive(Debug, Clone, PartialEq)]
pub struct ImportExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// Module specifier expression.
    pub source: Box<Expr>,
    /// Second argument (import attributes), if present.
    pub options: Option<Box<Expr>>,
}

/// `new.target` / `import.meta`
#[derive(Debug, Clone, PartialEq)]
pub struct MetaPropExpr {
    /// Source location.
    pub loc: SourceLocation,
    /// `new` or `import`.
    pub meta: Ident,
    /// `target` or `meta`.
    pub property: Ident,
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

/// A binding or assignment target.
#[derive(Debug, Clone, PartialEq)]
pub enum Pat {
    /// `name`
    Ident(Ident),
    /// `[a, , b]`
    Array(Box<ArrayPat>),
    /// `{ a, b: c }`
    Object(Box<ObjectPat>),
    /// `...rest`
    Rest(Box<RestElement>),
    /// `target = default`
    Assign(Box<AssignPat>),
    /// A member expression target (`obj.x`), assignment patterns only.
    Expr(Box<Expr>),
}

impl Pat {
    /// Returns the source location of this pattern.
    pub fn loc(&self) -> SourceLocation {
        match self {
            Pat::Ident(p) => p.loc,
            Pat::Array(p) => p.loc,
            Pat::Object(p) => p.loc,
            Pat::Rest(p) => p.loc,
            Pat::Assign(p) => p.loc,
            Pat::Expr(e) => e.loc(),
        }
    }

    /// Calls `f` for every identifier this pattern binds, in source order.
    pub fn for_each_binding<'a>(&'a self, f: &mut impl FnMut(&'a Ident)) {
        match self {
            Pat::Ident(id) => f(id),
            Pat::Array(arr) => {
                for el in arr.elements.iter().flatten() {
                    el.for_each_binding(f);
                }
            }
            Pat::Object(obj) => {
                for prop in &obj.properties {
                    match prop {
                        ObjectPatProp::Prop(p) => p.value.for_each_binding(f),
                        ObjectPatProp::Rest(r) => r.argument.for_each_binding(f),
                    }
                }
            }
            Pat::Rest(r) => r.argument.for_each_binding(f),
            Pat::Assign(a) => a.left.for_each_binding(f),
            Pat::Expr(_) => {}
        }
    }
}

/// `[elements]` pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayPat {
    /// Source location.
    pub loc: SourceLocation,
    /// Elements; `None` for holes.
    pub elements: Vec<Option<Pat>>,
}

/// `{ properties }` pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectPat {
    /// Source location.
    pub loc: SourceLocation,
    /// Properties, with at most one trailing rest element.
    pub properties: Vec<ObjectPatProp>,
}

/// A member of an [`ObjectPat`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectPatProp {
    /// `key: value`, `key`, or `key = default`.
    Prop(Box<PatProp>),
    /// `...rest`
    Rest(RestElement),
}

/// ESTree `Property` inside an `ObjectPattern`.
#[derive(Debug, Clone, PartialEq)]
pub struct PatProp {
    /// Source location.
    pub loc: SourceLocation,
    /// The property key.
    pub key: PropKey,
    /// `true` for `{ x }` and `{ x = 1 }`.
    pub shorthand: bool,
    /// The target, possibly an [`AssignPat`] carrying the default.
    pub value: Pat,
}

/// `...argument`
#[derive(Debug, Clone, PartialEq)]
pub struct RestElement {
    /// Source location.
    pub loc: SourceLocation,
    /// Target of the rest.
    pub argument: Box<Pat>,
}

/// `left = right` default.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignPat {
    /// Source location.
    pub loc: SourceLocation,
    /// Target.
    pub left: Box<Pat>,
    /// Default value.
    pub right: Box<Expr>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn loc(start: usize, end: usize) -> SourceLocation {
        SourceLocation {
            start,
            end,
            ..Default::default()
        }
    }

    fn ident(name: &str) -> Ident {
        Ident {
            loc: loc(0, name.len()),
            name: name.into(),
        }
    }

    #[test]
    fn test_source_location_text() {
        let l = loc(4, 7);
        assert_eq!(l.source_text("var foo = 1;"), "foo");
        assert_eq!(l.len(), 3);
        assert!(!l.is_empty());
    }

    #[test]
    fn test_for_each_binding_visits_nested_targets() {
        // [a, { b: c = 1 }, ...d]
        let pat = Pat::Array(Box::new(ArrayPat {
            loc: loc(0, 0),
            elements: vec![
                Some(Pat::Ident(ident("a"))),
                None,
                Some(Pat::Object(Box::new(ObjectPat {
                    loc: loc(0, 0),
                    properties: vec![ObjectPatProp::Prop(Box::new(PatProp {
                        loc: loc(0, 0),
                        key: PropKey::Ident(ident("b")),
                        shorthand: false,
                        value: Pat::Assign(Box::new(AssignPat {
                            loc: loc(0, 0),
                            left: Box::new(Pat::Ident(ident("c"))),
                            right: Box::new(Expr::Lit(Literal {
                                loc: loc(0, 0),
                                value: LitValue::Num(1.0),
                                raw: "1".into(),
                            })),
                        })),
                    }))],
                }))),
                Some(Pat::Rest(Box::new(RestElement {
                    loc: loc(0, 0),
                    argument: Box::new(Pat::Ident(ident("d"))),
                }))),
            ],
        }));
        let mut names = Vec::new();
        pat.for_each_binding(&mut |id| names.push(id.name.as_str()));
        assert_eq!(names, vec!["a", "c", "d"]);
    }

    #[test]
    fn test_prop_key_static_name() {
        let num = PropKey::Lit(Literal {
            loc: loc(0, 3),
            value: LitValue::Num(1.0),
            raw: "1.0".into(),
        });
        assert_eq!(num.static_name().as_deref(), Some("1"));
        assert_eq!(
            PropKey::Ident(ident("__proto__")).static_name().as_deref(),
            Some("__proto__")
        );
        let computed = PropKey::Computed(Box::new(Expr::Ident(ident("k"))));
        assert!(computed.is_computed());
        assert_eq!(computed.static_name(), None);
    }

    #[test]
    fn test_module_export_name() {
        let name = ModuleExportName::Str(Literal {
            loc: loc(0, 5),
            value: LitValue::Str("a b".into()),
            raw: "\"a b\"".into(),
        });
        assert_eq!(name.name(), "a b");
    }
}

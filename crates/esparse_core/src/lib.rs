//! `esparse_core`: an ECMAScript source-to-ESTree parser.
//!
//! The parser accepts exactly the programs the language grammar accepts,
//! early errors included, and stops at the first violation.
//!
//! # Crate layout
//!
//! - [`error`]: the [`ParseError`] family.
//! - [`parser`]: scanner, AST, grammar and validation.
//!
//! # Example
//!
//! ```
//! use esparse_core::{ParseOptions, Stmt, parse};
//!
//! let program = parse("var [foo] = arr, bar = arr2;", &ParseOptions::default()).unwrap();
//! assert_eq!(program.loc.end, 28);
//! assert!(matches!(&program.body[0], esparse_core::ProgramItem::Stmt(Stmt::VarDecl(_))));
//!
//! let err = parse("var foo = 1; let foo = 1;", &ParseOptions::default()).unwrap_err();
//! assert_eq!(err.message(), "Identifier 'foo' has already been declared");
//! ```

/// Error types.
pub mod error;
/// ECMAScript parser infrastructure.
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::ast::*;
pub use parser::context::Context;
pub use parser::options::ParseOptions;
pub use parser::scanner::{Position, Scanner, Span, Token, TokenKind, TokenValue};

use parser::state::{Parser, run_parser};

/// Parse `source` as a complete program.
///
/// ```
/// use esparse_core::{ParseOptions, parse};
///
/// let module = parse("export const x = await f();", &ParseOptions::module()).unwrap();
/// assert_eq!(module.body.len(), 1);
/// assert!(parse("with (o) {}", &ParseOptions::module()).is_err());
/// ```
pub fn parse(source: &str, options: &ParseOptions) -> ParseResult<Program> {
    run_parser(source, options, Context::from_options(options))
}

/// Parse `source` with extra grammar modes on top of those implied by
/// `options`.
///
/// ```
/// use esparse_core::{Context, ParseOptions, parse, parse_with_context};
///
/// let opts = ParseOptions::default();
/// assert!(parse("with (o) {}", &opts).is_ok());
/// assert!(parse_with_context("with (o) {}", &opts, Context::STRICT).is_err());
/// ```
pub fn parse_with_context(
    source: &str,
    options: &ParseOptions,
    context: Context,
) -> ParseResult<Program> {
    run_parser(source, options, Context::from_options(options) | context)
}

/// Parse `source` as a single expression.
///
/// ```
/// use esparse_core::{Expr, ParseOptions, parse_expression};
///
/// let expr = parse_expression("a ?? b", &ParseOptions::default()).unwrap();
/// assert!(matches!(expr, Expr::Logical(_)));
/// assert!(parse_expression("a ?? b || c", &ParseOptions::default()).is_err());
/// ```
pub fn parse_expression(source: &str, options: &ParseOptions) -> ParseResult<Expr> {
    let ctx = Context::from_options(options);
    Parser::new(source, options, ctx)?.parse_standalone_expression(ctx)
}

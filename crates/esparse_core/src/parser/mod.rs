//! ECMAScript parser.
//!
//! - [`scanner`]: lexer producing [`scanner::Token`]s, with the
//!   regexp-versus-division decision left open for the grammar to settle.
//! - [`ast`]: ESTree node definitions.
//! - [`context`]: the grammar-mode bit set threaded through every
//!   production.
//! - [`options`]: caller configuration.
//!
//! The grammar itself is split across `statement`, `expression`, `function`
//! and `module`, all extending the [`state`] driver.  Early errors are
//! checked while the tree is built, by `validate`, `cover` and `scope`.

/// ESTree node types.
pub mod ast;
/// Grammar-mode flags.
pub mod context;
mod cover;
mod expression;
mod function;
mod module;
/// Parser configuration.
pub mod options;
/// ECMAScript lexer.
pub mod scanner;
mod scope;
pub(crate) mod state;
mod statement;
mod validate;

#[cfg(test)]
mod tests;

//! Caller-supplied parse options.
//!
//! [`ParseOptions`] is plain data; the parser turns it into the initial
//! [`Context`](crate::parser::context::Context) with
//! [`Context::from_options`](crate::parser::context::Context::from_options).

use serde::{Deserialize, Serialize};

use crate::parser::ast::SourceType;

/// Options accepted by [`parse`](crate::parse).
///
/// Deserializes from camel-cased JSON, with every field optional:
///
/// ```
/// use esparse_core::ParseOptions;
///
/// let opts: ParseOptions =
///     serde_json::from_str(r#"{"sourceType":"module","locations":true}"#).unwrap();
/// assert!(opts.is_module());
/// assert!(opts.locations);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Script or module goal.
    pub source_type: SourceType,
    /// Attach `range` byte offsets to every node.
    pub ranges: bool,
    /// Attach line/column pairs to every node.
    pub locations: bool,
    /// Enable not-yet-standard syntax (`using` declarations).
    pub next: bool,
    /// Legacy web-compatibility leniencies for sloppy code.
    pub web_compat: bool,
    /// Parse a script as if it began with `"use strict"`.
    pub strict: bool,
    /// Accept `return` outside of any function.
    pub allow_return_outside_function: bool,
    /// Treat a leading `#!` line as a comment.
    pub allow_hash_bang: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_type: SourceType::Script,
            ranges: false,
            locations: false,
            next: false,
            web_compat: true,
            strict: false,
            allow_return_outside_function: false,
            allow_hash_bang: true,
        }
    }
}

impl ParseOptions {
    /// Default options for a classic script.
    pub fn script() -> Self {
        Self::default()
    }

    /// Default options for an ES module.
    pub fn module() -> Self {
        Self {
            source_type: SourceType::Module,
            ..Self::default()
        }
    }

    /// `true` when parsing with the module goal.
    pub fn is_module(&self) -> bool {
        self.source_type == SourceType::Module
    }

    /// Set [`ParseOptions::ranges`].
    pub fn with_ranges(mut self, on: bool) -> Self {
        self.ranges = on;
        self
    }

    /// Set [`ParseOptions::locations`].
    pub fn with_locations(mut self, on: bool) -> Self {
        self.locations = on;
        self
    }

    /// Set [`ParseOptions::next`].
    pub fn with_next(mut self, on: bool) -> Self {
        self.next = on;
        self
    }

    /// Set [`ParseOptions::web_compat`].
    pub fn with_web_compat(mut self, on: bool) -> Self {
        self.web_compat = on;
        self
    }

    /// Set [`ParseOptions::strict`].
    pub fn with_strict(mut self, on: bool) -> Self {
        self.strict = on;
        self
    }

    /// Set [`ParseOptions::allow_return_outside_function`].
    pub fn with_allow_return(mut self, on: bool) -> Self {
        self.allow_return_outside_function = on;
        self
    }

    /// Set [`ParseOptions::allow_hash_bang`].
    pub fn with_hash_bang(mut self, on: bool) -> Self {
        self.allow_hash_bang = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = ParseOptions::default();
        assert_eq!(opts.source_type, SourceType::Script);
        assert!(opts.web_compat);
        assert!(opts.allow_hash_bang);
        assert!(!opts.strict);
        assert!(!opts.ranges);
    }

    #[test]
    fn test_deserialize_partial_json() {
        let opts: ParseOptions =
            serde_json::from_str(r#"{"webCompat":false,"allowReturnOutsideFunction":true}"#)
                .unwrap();
        assert!(!opts.web_compat);
        assert!(opts.allow_return_outside_function);
        assert!(opts.allow_hash_bang);
    }

    #[test]
    fn test_serialize_round_trip() {
        let opts = ParseOptions::module().with_ranges(true).with_next(true);
        let json = serde_json::to_string(&opts).unwrap();
        assert!(json.contains(r#""sourceType":"module""#));
        let back: ParseOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }
}

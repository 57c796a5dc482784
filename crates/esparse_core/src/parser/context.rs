//! Grammar-mode bit set threaded through every parsing production.
//!
//! A [`Context`] is a `Copy` value passed by argument.  Productions that
//! enter a nested grammar position derive a new value (`ctx.enter_function(…)`,
//! `ctx.with_no_in()`) and hand it down; nothing ever writes a context that a
//! sibling production can observe.

use bitflags::bitflags;

use crate::parser::options::ParseOptions;

bitflags! {
    /// Grammar modes in effect at a point of the parse.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Context: u32 {
        /// Strict-mode code.
        const STRICT               = 1 << 0;
        /// Module goal: `import`/`export` allowed, `await` reserved.
        const MODULE               = 1 << 1;
        /// Inside a function body; `return` is allowed.
        const IN_FUNCTION          = 1 << 2;
        /// Inside a generator; `yield` is an operator.
        const IN_GENERATOR         = 1 << 3;
        /// Inside an async function or module top level; `await` is an operator.
        const IN_ASYNC             = 1 << 4;
        /// The `in` operator is not allowed (for-statement heads).
        const NO_IN                = 1 << 5;
        /// Inside a loop body; unlabelled `continue` is allowed.
        const IN_ITERATION         = 1 << 6;
        /// Inside a `switch` body; unlabelled `break` is allowed there too.
        const IN_SWITCH            = 1 << 7;
        /// `super.x` is allowed (methods, fields, static blocks).
        const ALLOW_SUPER_PROPERTY = 1 << 8;
        /// `super()` is allowed (derived-class constructors).
        const ALLOW_SUPER_CALL     = 1 << 9;
        /// `new.target` is allowed.
        const ALLOW_NEW_TARGET     = 1 << 10;
        /// Parsing formal parameters; `yield`/`await` expressions are errors.
        const IN_PARAMETERS        = 1 << 11;
        /// Inside a class field initializer; `arguments` is an error.
        const IN_CLASS_FIELD       = 1 << 12;
        /// Inside a class static block; `await` is reserved.
        const IN_STATIC_BLOCK      = 1 << 13;
        /// Annex B web-compatibility leniencies.
        const WEB_COMPAT           = 1 << 14;
        /// Not-yet-standard syntax.
        const NEXT                 = 1 << 15;
        /// Attach byte ranges to nodes.
        const RANGES               = 1 << 16;
        /// Attach line/column locations to nodes.
        const LOCATIONS            = 1 << 17;
        /// Top-level `return` permitted by the caller.
        const ALLOW_RETURN         = 1 << 18;
        /// Directly in the top-level statement list of the program.
        const TOP_LEVEL            = 1 << 19;
    }
}

impl Context {
    /// Flags that survive every function boundary.
    const INHERITED: Context = Context::STRICT
        .union(Context::MODULE)
        .union(Context::WEB_COMPAT)
        .union(Context::NEXT)
        .union(Context::RANGES)
        .union(Context::LOCATIONS);

    /// Seed the top-level context from caller options.
    pub fn from_options(opts: &ParseOptions) -> Self {
        let mut ctx = Context::TOP_LEVEL;
        if opts.is_module() {
            // Module code is strict and allows top-level `await`.
            ctx |= Context::MODULE | Context::STRICT | Context::IN_ASYNC;
        }
        ctx.set(Context::STRICT, ctx.is_strict() || opts.strict);
        ctx.set(Context::WEB_COMPAT, opts.web_compat);
        ctx.set(Context::NEXT, opts.next);
        ctx.set(Context::RANGES, opts.ranges);
        ctx.set(Context::LOCATIONS, opts.locations);
        ctx.set(Context::ALLOW_RETURN, opts.allow_return_outside_function);
        ctx
    }

    // ── Derivations ─────────────────────────────────────────────────────────

    /// Context for the parameters and body of an ordinary function.
    pub fn enter_function(self, is_async: bool, is_generator: bool) -> Self {
        let mut ctx = (self & Self::INHERITED) | Context::IN_FUNCTION | Context::ALLOW_NEW_TARGET;
        ctx.set(Context::IN_ASYNC, is_async);
        ctx.set(Context::IN_GENERATOR, is_generator);
        ctx
    }

    /// Context for an object or class method.  `super_call` is set for the
    /// constructor of a derived class.
    pub fn enter_method(self, is_async: bool, is_generator: bool, super_call: bool) -> Self {
        let mut ctx = self.enter_function(is_async, is_generator) | Context::ALLOW_SUPER_PROPERTY;
        ctx.set(Context::ALLOW_SUPER_CALL, super_call);
        ctx
    }

    /// Context for an arrow function's parameters and body.  Arrows inherit
    /// `super`, `new.target` and the class-field restrictions of their
    /// surroundings.
    pub fn enter_arrow(self, is_async: bool) -> Self {
        let mut ctx = self
            - Context::IN_GENERATOR
            - Context::NO_IN
            - Context::IN_ITERATION
            - Context::IN_SWITCH
            - Context::IN_PARAMETERS
            - Context::TOP_LEVEL
            | Context::IN_FUNCTION;
        ctx.set(Context::IN_ASYNC, is_async);
        ctx
    }

    /// Context after a `"use strict"` directive or inside a class.
    pub fn enter_strict(self) -> Self {
        self | Context::STRICT
    }

    /// Context for the members of a class body.
    pub fn enter_class_body(self) -> Self {
        (self | Context::STRICT) - Context::NO_IN
    }

    /// Context for a class field initializer.
    pub fn enter_field_initializer(self) -> Self {
        (self & Self::INHERITED)
            | Context::ALLOW_SUPER_PROPERTY
            | Context::ALLOW_NEW_TARGET
            | Context::IN_CLASS_FIELD
    }

    /// Context for a `static { … }` block.
    pub fn enter_static_block(self) -> Self {
        (self & Self::INHERITED)
            | Context::ALLOW_SUPER_PROPERTY
            | Context::ALLOW_NEW_TARGET
            | Context::IN_CLASS_FIELD
            | Context::IN_STATIC_BLOCK
    }

    /// Context for formal parameters.
    pub fn enter_parameters(self) -> Self {
        self | Context::IN_PARAMETERS
    }

    /// Context for the head of a `for` statement, where `in` ends the
    /// left-hand side.
    pub fn with_no_in(self) -> Self {
        self | Context::NO_IN
    }

    /// Context where `in` is an operator again (inside brackets, parens,
    /// function bodies).
    pub fn allow_in(self) -> Self {
        self - Context::NO_IN
    }

    /// Context for a loop body.
    pub fn enter_iteration(self) -> Self {
        self | Context::IN_ITERATION
    }

    /// Context for a `switch` body.
    pub fn enter_switch(self) -> Self {
        self | Context::IN_SWITCH
    }

    /// Context for a nested statement list (block, case clause).
    pub fn enter_block(self) -> Self {
        self - Context::TOP_LEVEL
    }

    // ── Queries ─────────────────────────────────────────────────────────────

    /// Strict-mode code.
    pub fn is_strict(self) -> bool {
        self.contains(Context::STRICT)
    }

    /// Module goal.
    pub fn is_module(self) -> bool {
        self.contains(Context::MODULE)
    }

    /// `yield` is an operator here.
    pub fn in_generator(self) -> bool {
        self.contains(Context::IN_GENERATOR)
    }

    /// `await` is an operator here.
    pub fn in_async(self) -> bool {
        self.contains(Context::IN_ASYNC)
    }

    /// `await` may not be used as an identifier here.
    pub fn await_reserved(self) -> bool {
        self.intersects(Context::MODULE | Context::IN_ASYNC | Context::IN_STATIC_BLOCK)
    }

    /// `return` is allowed here.
    pub fn can_return(self) -> bool {
        self.intersects(Context::IN_FUNCTION | Context::ALLOW_RETURN)
    }

    /// The `in` operator is allowed here.
    pub fn in_allowed(self) -> bool {
        !self.contains(Context::NO_IN)
    }

    /// Annex B leniencies apply: web compatibility on and sloppy code.
    pub fn annex_b(self) -> bool {
        self.contains(Context::WEB_COMPAT) && !self.is_strict()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_options_module_is_strict_and_async() {
        let ctx = Context::from_options(&ParseOptions::module());
        assert!(ctx.is_strict());
        assert!(ctx.is_module());
        assert!(ctx.in_async());
        assert!(ctx.await_reserved());
        assert!(ctx.contains(Context::TOP_LEVEL));
    }

    #[test]
    fn test_from_options_script() {
        let ctx = Context::from_options(&ParseOptions::default());
        assert!(!ctx.is_strict());
        assert!(ctx.annex_b());
        assert!(!ctx.can_return());
        let ctx = Context::from_options(&ParseOptions::default().with_allow_return(true));
        assert!(ctx.can_return());
    }

    #[test]
    fn test_enter_function_resets_modes() {
        let outer = Context::from_options(&ParseOptions::default())
            .with_no_in()
            .enter_iteration()
            | Context::ALLOW_SUPER_PROPERTY;
        let inner = outer.enter_function(false, true);
        assert!(inner.in_generator());
        assert!(inner.in_allowed());
        assert!(!inner.contains(Context::IN_ITERATION));
        assert!(!inner.contains(Context::ALLOW_SUPER_PROPERTY));
        assert!(!inner.contains(Context::TOP_LEVEL));
        assert!(inner.can_return());
        // The outer value is untouched.
        assert!(!outer.in_allowed());
    }

    #[test]
    fn test_enter_arrow_inherits_super_but_not_generator() {
        let method = Context::from_options(&ParseOptions::default()).enter_method(false, true, true);
        let arrow = method.enter_arrow(true);
        assert!(!arrow.in_generator());
        assert!(arrow.in_async());
        assert!(arrow.contains(Context::ALLOW_SUPER_PROPERTY));
        assert!(arrow.contains(Context::ALLOW_SUPER_CALL));
    }

    #[test]
    fn test_static_block_reserves_await() {
        let ctx = Context::from_options(&ParseOptions::default())
            .enter_class_body()
            .enter_static_block();
        assert!(ctx.await_reserved());
        assert!(!ctx.in_async());
        assert!(!ctx.can_return());
        assert!(ctx.is_strict());
    }
}

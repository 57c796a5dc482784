//! Declaration scopes and redeclaration checks.
//!
//! # Overview
//!
//! The parser keeps a [`ScopeStack`] while it builds the tree: a scope is
//! pushed on entering a function, block, `catch` clause, `for` head, `switch`
//! body or class static block, and popped on exit.  Every binding is
//! declared through [`ScopeStack::declare`], which reports a conflict as soon
//! as the second declaration is seen:
//!
//! - two lexical declarations (`let`/`const`/`class`/`using`, strict block
//!   functions, imports) of one name in one scope;
//! - a lexical declaration and a `var` of one name in one scope;
//! - a `var` whose name is lexically declared in any scope between it and
//!   the nearest function boundary.
//!
//! A `var` is recorded only in the scope it is written in, so a lexical
//! declaration in an outer scope does not see it: `{ var a; } let a;` is
//! accepted.

use rustc_hash::FxHashSet;

// ─────────────────────────────────────────────────────────────────────────────
// Scope kind
// ─────────────────────────────────────────────────────────────────────────────

/// The kind of a declaration scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// The top level of a classic script.
    Script,
    /// The top level of an ES module.
    Module,
    /// Parameters and body of a function, method or arrow.
    Function,
    /// A `{ … }` block, `for` head or `switch` body.
    Block,
    /// A `catch` clause whose parameter is a single identifier.
    SimpleCatch,
    /// A `catch` clause with a destructuring parameter.
    Catch,
    /// A class `static { … }` block.
    StaticBlock,
}

impl ScopeKind {
    /// Returns `true` if this kind creates a new *function* scope boundary
    /// (i.e. `var` declarations stop here).
    pub fn is_function_boundary(self) -> bool {
        matches!(
            self,
            ScopeKind::Script | ScopeKind::Module | ScopeKind::Function | ScopeKind::StaticBlock
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Binding kind
// ─────────────────────────────────────────────────────────────────────────────

/// The syntactic origin of a declared name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `var` declaration or formal parameter.
    Var,
    /// `let`, `const`, `using`, `class`, import binding, or a block-level
    /// function in strict code.
    Lexical,
    /// A plain sloppy-mode `function` declaration.  At function level it
    /// behaves like `var`; inside a block it may repeat.
    Function,
    /// The identifier parameter of a `catch` clause.
    SimpleCatch,
}

// ─────────────────────────────────────────────────────────────────────────────
// Scope
// ─────────────────────────────────────────────────────────────────────────────

/// Names declared directly in one scope.
#[derive(Debug)]
struct Scope {
    kind: ScopeKind,
    lexical: FxHashSet<String>,
    var: FxHashSet<String>,
    functions: FxHashSet<String>,
    /// The parameter name of a simple `catch` clause.
    catch_param: Option<String>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            lexical: FxHashSet::default(),
            var: FxHashSet::default(),
            functions: FxHashSet::default(),
            catch_param: None,
        }
    }

    /// Sloppy function declarations at function or script level are
    /// var-like.
    fn treats_functions_as_var(&self) -> bool {
        matches!(self.kind, ScopeKind::Script | ScopeKind::Function)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ScopeStack
// ─────────────────────────────────────────────────────────────────────────────

/// Stack of active scopes, innermost last.
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    /// Every name bound at the top level of the program, including `var`s
    /// nested in top-level blocks.  Used for module export checks.
    top_level: FxHashSet<String>,
}

impl ScopeStack {
    /// Create a stack holding only the program scope.
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            scopes: vec![Scope::new(kind)],
            top_level: FxHashSet::default(),
        }
    }

    /// Push a new scope.
    pub fn enter(&mut self, kind: ScopeKind) {
        self.scopes.push(Scope::new(kind));
    }

    /// Pop the innermost scope.  The program scope is never popped.
    pub fn exit(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Kind of the innermost scope.
    pub fn current_kind(&self) -> ScopeKind {
        self.current().kind
    }

    fn current(&self) -> &Scope {
        // The program scope is pushed by `new` and never popped.
        &self.scopes[self.scopes.len() - 1]
    }

    /// Index of the nearest function-boundary scope.
    fn var_scope_index(&self) -> usize {
        self.scopes
            .iter()
            .rposition(|s| s.kind.is_function_boundary())
            .unwrap_or(0)
    }

    /// Declare `name`.  Returns `false` when the declaration conflicts with
    /// an earlier one.
    pub fn declare(&mut self, name: &str, kind: BindingKind) -> bool {
        let ok = match kind {
            BindingKind::Lexical => self.declare_lexical(name),
            BindingKind::SimpleCatch => {
                let scope = self.current_mut();
                scope.lexical.insert(name.to_owned());
                scope.catch_param = Some(name.to_owned());
                true
            }
            BindingKind::Function => self.declare_function(name),
            BindingKind::Var => self.declare_var(name),
        };
        if ok {
            let at_top = match kind {
                BindingKind::Var => self.var_scope_index() == 0,
                _ => self.scopes.len() == 1,
            };
            if at_top {
                self.top_level.insert(name.to_owned());
            }
        }
        ok
    }

    /// `true` if `name` is bound anywhere at the program's top level.
    pub fn is_top_level_binding(&self, name: &str) -> bool {
        self.top_level.contains(name)
    }

    fn current_mut(&mut self) -> &mut Scope {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    fn declare_lexical(&mut self, name: &str) -> bool {
        let scope = self.current_mut();
        let conflict = scope.lexical.contains(name)
            || scope.functions.contains(name)
            || scope.var.contains(name);
        scope.lexical.insert(name.to_owned());
        !conflict
    }

    fn declare_function(&mut self, name: &str) -> bool {
        let scope = self.current_mut();
        let conflict = if scope.treats_functions_as_var() {
            scope.lexical.contains(name)
        } else {
            scope.lexical.contains(name) || scope.var.contains(name)
        };
        scope.functions.insert(name.to_owned());
        !conflict
    }

    fn declare_var(&mut self, name: &str) -> bool {
        for scope in self.scopes.iter().rev() {
            let shadows_catch = scope.kind == ScopeKind::SimpleCatch
                && scope.catch_param.as_deref() == Some(name);
            if scope.lexical.contains(name) && !shadows_catch {
                return false;
            }
            if !scope.treats_functions_as_var() && scope.functions.contains(name) {
                return false;
            }
            if scope.kind.is_function_boundary() {
                break;
            }
        }
        self.current_mut().var.insert(name.to_owned());
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn script() -> ScopeStack {
        ScopeStack::new(ScopeKind::Script)
    }

    #[test]
    fn test_duplicate_var_allowed() {
        let mut s = script();
        assert!(s.declare("x", BindingKind::Var));
        assert!(s.declare("x", BindingKind::Var));
    }

    #[test]
    fn test_duplicate_let_rejected() {
        let mut s = script();
        assert!(s.declare("x", BindingKind::Lexical));
        assert!(!s.declare("x", BindingKind::Lexical));
    }

    #[test]
    fn test_var_then_let_rejected() {
        let mut s = script();
        assert!(s.declare("foo", BindingKind::Var));
        assert!(!s.declare("foo", BindingKind::Lexical));
    }

    #[test]
    fn test_let_then_nested_var_rejected() {
        let mut s = script();
        assert!(s.declare("foo", BindingKind::Lexical));
        s.enter(ScopeKind::Block);
        assert!(!s.declare("foo", BindingKind::Var));
    }

    #[test]
    fn test_block_var_then_outer_let_accepted() {
        let mut s = script();
        s.enter(ScopeKind::Block);
        assert!(s.declare("foo", BindingKind::Var));
        s.exit();
        assert!(s.declare("foo", BindingKind::Lexical));
    }

    #[test]
    fn test_var_stops_at_function_boundary() {
        let mut s = script();
        assert!(s.declare("a", BindingKind::Lexical));
        s.enter(ScopeKind::Function);
        assert!(s.declare("a", BindingKind::Var));
    }

    #[test]
    fn test_simple_catch_param_allows_var() {
        let mut s = script();
        s.enter(ScopeKind::SimpleCatch);
        assert!(s.declare("e", BindingKind::SimpleCatch));
        assert!(s.declare("e", BindingKind::Var));
        assert!(!s.declare("e", BindingKind::Lexical));
    }

    #[test]
    fn test_pattern_catch_param_rejects_var() {
        let mut s = script();
        s.enter(ScopeKind::Catch);
        assert!(s.declare("e", BindingKind::Lexical));
        assert!(!s.declare("e", BindingKind::Var));
    }

    #[test]
    fn test_sloppy_block_functions() {
        let mut s = script();
        s.enter(ScopeKind::Block);
        assert!(s.declare("f", BindingKind::Function));
        assert!(s.declare("f", BindingKind::Function));
        assert!(!s.declare("f", BindingKind::Lexical));
        assert!(!s.declare("f", BindingKind::Var));
    }

    #[test]
    fn test_top_level_function_is_var_like() {
        let mut s = script();
        assert!(s.declare("f", BindingKind::Function));
        assert!(s.declare("f", BindingKind::Var));
        assert!(!s.declare("f", BindingKind::Lexical));
    }

    #[test]
    fn test_top_level_binding_tracking() {
        let mut s = ScopeStack::new(ScopeKind::Module);
        s.enter(ScopeKind::Block);
        assert!(s.declare("v", BindingKind::Var));
        assert!(s.declare("inner", BindingKind::Lexical));
        s.exit();
        assert!(s.declare("top", BindingKind::Lexical));
        assert!(s.is_top_level_binding("v"));
        assert!(s.is_top_level_binding("top"));
        assert!(!s.is_top_level_binding("inner"));
    }

    #[test]
    fn test_program_scope_never_popped() {
        let mut s = script();
        s.exit();
        s.exit();
        assert_eq!(s.current_kind(), ScopeKind::Script);
        assert!(s.declare("x", BindingKind::Lexical));
        assert!(s.is_top_level_binding("x"));
    }
}

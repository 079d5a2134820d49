//! The analysis context threaded through the recursive-descent walk.
//!
//! `spec.md` §3.4 names `Cx` as carrying the current scope alongside
//! `declare_type`, `return_type`, `in_struct` and `in_vardec`. Scope
//! itself is threaded as a separate `&Scope` argument rather than
//! living inside `Cx`: `Scope<'p>` borrows its parent, so owning one
//! inside a struct that is itself passed around by `&mut` would make
//! `Cx` self-referential. Passing `scope: &Scope` alongside `cx: &mut
//! Cx` gets the same stack discipline — a nested scope is created on
//! the stack, its reference handed down for the duration of that
//! subtree, and dropped on return — without fighting the borrow
//! checker over it.

use crate::types::Type;

/// Mutable analysis state that isn't the scope chain itself.
#[derive(Debug, Clone, Default)]
pub struct Cx {
    /// The type a `StructSpecifier`'s member `Def`s, or a top-level
    /// `Def`'s `VarDec`s, are being declared at. Set while walking a
    /// `Specifier`, read while walking the `DecList`/`ExtDecList` that
    /// follows it.
    pub declare_type: Option<Type>,
    /// The enclosing function's declared return type, checked against
    /// every `RETURN Exp ;` in its body (error 8).
    pub return_type: Option<Type>,
    /// Set while walking a struct definition's member list — struct
    /// members may not themselves be initialized (`spec.md` §4.4.2's
    /// "no initializers inside a struct body" rule) and this flag is
    /// what `Dec` analysis consults to reject one.
    pub in_struct: bool,
    /// Set while walking a `VarDec`'s bracket chain, so `ExtDecList`/
    /// `DecList` can tell an array declarator's dimensions (parsed
    /// inside-out) from a plain identifier apart during the two-pass
    /// construction described in `spec.md` §4.4.3.
    pub in_vardec: bool,
}

impl Cx {
    pub fn new() -> Self {
        Cx::default()
    }

    /// Runs `f` with `declare_type` set, restoring the previous value
    /// afterward — the donor's `edge_cases.rs` tests lean on this kind
    /// of scoped-mutation helper for its own flag fields.
    pub fn with_declare_type<R>(&mut self, ty: Type, f: impl FnOnce(&mut Cx) -> R) -> R {
        let prev = self.declare_type.replace(ty);
        let result = f(self);
        self.declare_type = prev;
        result
    }

    pub fn with_return_type<R>(&mut self, ty: Type, f: impl FnOnce(&mut Cx) -> R) -> R {
        let prev = self.return_type.replace(ty);
        let result = f(self);
        self.return_type = prev;
        result
    }

    pub fn with_in_struct<R>(&mut self, value: bool, f: impl FnOnce(&mut Cx) -> R) -> R {
        let prev = self.in_struct;
        self.in_struct = value;
        let result = f(self);
        self.in_struct = prev;
        result
    }

    pub fn with_in_vardec<R>(&mut self, value: bool, f: impl FnOnce(&mut Cx) -> R) -> R {
        let prev = self.in_vardec;
        self.in_vardec = value;
        let result = f(self);
        self.in_vardec = prev;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_declare_type_restores_previous_on_exit() {
        let mut cx = Cx::new();
        cx.declare_type = Some(Type::int());
        cx.with_declare_type(Type::float(), |inner| {
            assert_eq!(inner.declare_type, Some(Type::float()));
        });
        assert_eq!(cx.declare_type, Some(Type::int()));
    }

    #[test]
    fn with_in_struct_restores_false_after_nested_true() {
        let mut cx = Cx::new();
        cx.with_in_struct(true, |inner| {
            assert!(inner.in_struct);
        });
        assert!(!cx.in_struct);
    }

    #[test]
    fn in_vardec_nests_independently_of_in_struct() {
        let mut cx = Cx::new();
        cx.with_in_struct(true, |inner| {
            inner.with_in_vardec(true, |deepest| {
                assert!(deepest.in_struct);
                assert!(deepest.in_vardec);
            });
            assert!(!inner.in_vardec);
        });
    }
}

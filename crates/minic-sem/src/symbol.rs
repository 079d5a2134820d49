//! A semantic symbol: a name bound in a scope, together with its type
//! and declaration state. Distinct from `minic_ast`'s bare `VarDec`/
//! `FunDec` — this is what the analyzer installs into `Scope`.

use crate::types::Type;
use minic_util::{Span, Symbol};

/// Function symbols move from `Declared` (seen a `FunDecl` but no
/// body yet) to `Defined` (seen the matching `FunDef`). Variable and
/// struct-tag symbols are always installed directly as `Defined`
/// (`spec.md` §4.3 distinguishes declaration from definition only for
/// functions and structs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolState {
    Declared,
    Defined,
}

#[derive(Debug, Clone)]
pub struct SemSymbol {
    pub name: Symbol,
    pub ty: Type,
    pub state: SymbolState,
    pub declared_at: Span,
}

impl SemSymbol {
    pub fn defined(name: Symbol, ty: Type, declared_at: Span) -> Self {
        SemSymbol {
            name,
            ty,
            state: SymbolState::Defined,
            declared_at,
        }
    }

    pub fn declared(name: Symbol, ty: Type, declared_at: Span) -> Self {
        SemSymbol {
            name,
            ty,
            state: SymbolState::Declared,
            declared_at,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.state == SymbolState::Defined
    }

    pub fn mark_defined(&mut self) {
        self.state = SymbolState::Defined;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_declared_symbol_is_not_defined() {
        let s = SemSymbol::declared(Symbol::intern("f"), Type::unit(), Span::new(1));
        assert!(!s.is_defined());
    }

    #[test]
    fn mark_defined_flips_state() {
        let mut s = SemSymbol::declared(Symbol::intern("f"), Type::unit(), Span::new(1));
        s.mark_defined();
        assert!(s.is_defined());
    }

    #[test]
    fn defined_ctor_starts_defined() {
        let s = SemSymbol::defined(Symbol::intern("x"), Type::int(), Span::new(4));
        assert!(s.is_defined());
    }
}

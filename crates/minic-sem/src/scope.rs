//! Lexical scopes.
//!
//! The donor (`faxc-sem`) represents scopes as an arena of `Rib`s
//! (`IndexVec<RibId, Rib>`) addressed by id, because its scope tree can
//! be revisited and queried after the fact for IDE-style lookups.
//! MiniC's grammar is pure recursive descent: a scope is pushed when
//! its construct is entered and popped when it's left, never revisited
//! (`spec.md` §4.3). That calls for a plain borrowed parent chain
//! instead of an arena, and insertion order must survive lookup (struct
//! member lists are snapshotted via `snapshot_as_members`), which rules
//! out the donor's plain `HashMap` bindings — `indexmap::IndexMap`
//! fills both needs.

use indexmap::IndexMap;

use crate::symbol::SemSymbol;
use crate::types::{NamedField, Type};
use minic_util::Symbol;

/// One lexical scope, borrowing its parent for the lifetime of the
/// traversal that created it.
pub struct Scope<'p> {
    symbols: IndexMap<Symbol, SemSymbol>,
    parent: Option<&'p Scope<'p>>,
}

impl<'p> Scope<'p> {
    pub fn root() -> Self {
        Scope {
            symbols: IndexMap::new(),
            parent: None,
        }
    }

    pub fn nested(parent: &'p Scope<'p>) -> Self {
        Scope {
            symbols: IndexMap::new(),
            parent: Some(parent),
        }
    }

    /// Installs a symbol in this scope, overwriting whatever was
    /// bound under the same name. Callers check `find_here` first to
    /// detect redefinitions (error codes 3, 4, 16) before calling this.
    pub fn declare(&mut self, symbol: SemSymbol) {
        self.symbols.insert(symbol.name, symbol);
    }

    /// Climbs the parent chain, returning the nearest binding.
    pub fn find(&self, name: Symbol) -> Option<&SemSymbol> {
        self.symbols
            .get(&name)
            .or_else(|| self.parent.and_then(|p| p.find(name)))
    }

    /// Looks only in this scope, ignoring parents — used for
    /// redefinition checks, which are always scope-local.
    pub fn find_here(&self, name: Symbol) -> Option<&SemSymbol> {
        self.symbols.get(&name)
    }

    pub fn find_here_mut(&mut self, name: Symbol) -> Option<&mut SemSymbol> {
        self.symbols.get_mut(&name)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &SemSymbol)> {
        self.symbols.iter()
    }

    /// Projects this scope's bindings, in declaration order, into a
    /// `Struct` member list. Used when a `StructSpecifier::Definition`
    /// body's members are analyzed into their own scope and then
    /// folded into the enclosing `Type::Struct` (`spec.md` §4.4.2).
    pub fn snapshot_as_members(&self) -> Vec<NamedField> {
        self.symbols
            .values()
            .map(|sym| NamedField {
                name: sym.name,
                ty: sym.ty.clone(),
            })
            .collect()
    }
}

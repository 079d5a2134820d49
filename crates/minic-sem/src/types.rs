//! The type algebra. Translated directly from
//! `original_source/src/type.c` — every function here has a named
//! counterpart there (`type_full_eq`, `type_array_descending`,
//! `type_can_*`). See SPEC_FULL.md and `spec.md` §3.1/§4.1.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKind {
    Int,
    Float,
}

/// A named field of a `Struct` type. Carries enough of a symbol's
/// shape (`spec.md` §3.2) to support member lookup by name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedField {
    pub name: minic_util::Symbol,
    pub ty: Type,
}

/// A MiniC type. The four zero-arity/meta singletons (`Unit`, `Any`,
/// `Never`, `Meta(Int)`, `Meta(Float)`) are interned so they can be
/// compared and cloned cheaply, mirroring `type.c`'s lazily
/// initialized static pointers (`static type *unit = NULL;`, ...).
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Meta(MetaKind),
    Array(Box<Type>, Vec<u32>),
    Func(Vec<Type>, Box<Type>),
    Struct(Vec<NamedField>),
    Unit,
    Any,
    Never,
}

impl Type {
    pub fn meta(kind: MetaKind) -> Type {
        Type::Meta(kind)
    }

    pub fn int() -> Type {
        Type::Meta(MetaKind::Int)
    }

    pub fn float() -> Type {
        Type::Meta(MetaKind::Float)
    }

    pub fn unit() -> Type {
        Type::Unit
    }

    pub fn any() -> Type {
        Type::Any
    }

    pub fn never() -> Type {
        Type::Never
    }

    pub fn array(base: Type, dims: Vec<u32>) -> Type {
        debug_assert!(!dims.is_empty(), "Array.rank must be >= 1");
        Type::Array(Box::new(base), dims)
    }

    pub fn func(params: Vec<Type>, ret: Type) -> Type {
        Type::Func(params, Box::new(ret))
    }

    pub fn structure(members: Vec<NamedField>) -> Type {
        Type::Struct(members)
    }

    pub fn rank(&self) -> Option<usize> {
        match self {
            Type::Array(_, dims) => Some(dims.len()),
            _ => None,
        }
    }

    /// Structural equality. `strict_arrays` additionally requires
    /// identical dimension lengths — used only when comparing struct
    /// member types (`type_full_eq`'s `TC_STRUCT` case always passes
    /// `true` for its member comparisons, regardless of the caller's
    /// own strictness; see `type.c` line 132).
    pub fn equal(&self, other: &Type, strict_arrays: bool) -> bool {
        if matches!(self, Type::Any) || matches!(other, Type::Any) {
            return true;
        }
        if matches!(self, Type::Never) || matches!(other, Type::Never) {
            return true;
        }
        match (self, other) {
            (Type::Meta(a), Type::Meta(b)) => a == b,
            (Type::Unit, Type::Unit) => true,
            (Type::Array(base_a, dims_a), Type::Array(base_b, dims_b)) => {
                if dims_a.len() != dims_b.len() {
                    return false;
                }
                if strict_arrays && dims_a != dims_b {
                    return false;
                }
                base_a.equal(base_b, false)
            }
            (Type::Func(params_a, ret_a), Type::Func(params_b, ret_b)) => {
                if params_a.len() != params_b.len() {
                    return false;
                }
                if !ret_a.equal(ret_b, false) {
                    return false;
                }
                params_a
                    .iter()
                    .zip(params_b.iter())
                    .all(|(a, b)| a.equal(b, false))
            }
            (Type::Struct(mems_a), Type::Struct(mems_b)) => {
                if mems_a.len() != mems_b.len() {
                    return false;
                }
                // Member names are ignored: struct equality is purely
                // structural on the member type list (confirmed by
                // the commented-out name comparison in type.c).
                mems_a
                    .iter()
                    .zip(mems_b.iter())
                    .all(|(a, b)| a.ty.equal(&b.ty, true))
            }
            _ => false,
        }
    }

    pub fn can_call(&self) -> bool {
        matches!(self, Type::Func(..))
    }

    pub fn can_index(&self) -> bool {
        matches!(self, Type::Array(..))
    }

    pub fn can_member(&self) -> bool {
        matches!(self, Type::Struct(..))
    }

    pub fn find_member(&self, name: minic_util::Symbol) -> Option<&NamedField> {
        match self {
            Type::Struct(members) => members.iter().find(|m| m.name == name),
            _ => None,
        }
    }

    pub fn can_logic(&self) -> bool {
        matches!(self, Type::Meta(MetaKind::Int))
    }

    pub fn can_arith(&self) -> bool {
        matches!(self, Type::Meta(_))
    }

    pub fn can_arith_pair(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Meta(a), Type::Meta(b)) => a == b,
            _ => false,
        }
    }

    /// `descend_array`: the type of `e[i]` for `e: Array`. Reduces
    /// rank by one, or yields the base type at rank 1.
    ///
    /// # Panics
    /// Debug-asserts `can_index(self)` — an internal contract, not a
    /// user-facing diagnostic (`spec.md` §7).
    pub fn descend_array(&self) -> Type {
        match self {
            Type::Array(base, dims) => {
                debug_assert!(!dims.is_empty());
                if dims.len() > 1 {
                    Type::Array(base.clone(), dims[1..].to_vec())
                } else {
                    (**base).clone()
                }
            }
            other => {
                debug_assert!(false, "descend_array called on non-array type {other:?}");
                Type::never()
            }
        }
    }
}

/// Process-wide, write-once singletons for the zero-arity/meta types,
/// mirroring `type.c`'s `static type *unit = NULL;` lazy-init pattern
/// and the donor's preference for interned, `LazyLock`-style globals.
/// These are used where code wants a shared, pointer-cheap reference
/// rather than constructing a fresh `Type::Unit` each time.
pub fn unit_singleton() -> &'static Type {
    static UNIT: OnceLock<Type> = OnceLock::new();
    UNIT.get_or_init(Type::unit)
}

pub fn any_singleton() -> &'static Type {
    static ANY: OnceLock<Type> = OnceLock::new();
    ANY.get_or_init(Type::any)
}

pub fn never_singleton() -> &'static Type {
    static NEVER: OnceLock<Type> = OnceLock::new();
    NEVER.get_or_init(Type::never)
}

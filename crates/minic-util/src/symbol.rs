//! Interned string identifiers.
//!
//! `Symbol` is a compact (4-byte) handle into a process-wide string
//! table, giving O(1) identifier comparison instead of comparing
//! `String`s throughout the analyzer. Grounded in `faxc_util::symbol`:
//! same `DashMap` + `ahash`-hasher backed table, same reserved-index
//! range for pre-interned keywords, same `InternerStats` shape. The
//! keyword list itself is MiniC's, not the donor's.

use ahash::RandomState;
use dashmap::DashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Reserved indices below this value are pre-interned keywords; every
/// index at or above it was interned on demand from user source text.
const RESERVED_SYMBOLS_END: u32 = 32;

pub const KW_INT: Symbol = Symbol { index: 0 };
pub const KW_FLOAT: Symbol = Symbol { index: 1 };
pub const KW_STRUCT: Symbol = Symbol { index: 2 };
pub const KW_IF: Symbol = Symbol { index: 3 };
pub const KW_ELSE: Symbol = Symbol { index: 4 };
pub const KW_WHILE: Symbol = Symbol { index: 5 };
pub const KW_RETURN: Symbol = Symbol { index: 6 };

const KNOWN_KEYWORDS: &[&str] = &["int", "float", "struct", "if", "else", "while", "return"];

/// An interned string handle. `Copy`, 4 bytes, `Eq`/`Hash`/`Ord` by
/// index so two symbols for the same text always compare equal in
/// O(1) regardless of when each was interned.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    index: u32,
}

/// Snapshot of interner activity, useful for profiling and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    pub count: usize,
    pub hits: usize,
    pub misses: usize,
}

impl InternerStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

struct StringTable {
    map: DashMap<&'static str, u32, RandomState>,
    strings: DashMap<u32, &'static str, RandomState>,
    next_index: AtomicU32,
    hits: AtomicUsize,
    misses: AtomicUsize,
}

impl StringTable {
    fn new() -> Self {
        let table = StringTable {
            map: DashMap::with_hasher(RandomState::new()),
            strings: DashMap::with_hasher(RandomState::new()),
            next_index: AtomicU32::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        };
        for kw in KNOWN_KEYWORDS {
            table.intern(kw);
        }
        debug_assert!(table.next_index.load(Ordering::Relaxed) <= RESERVED_SYMBOLS_END);
        table
    }

    fn intern(&self, s: &str) -> Symbol {
        if let Some(existing) = self.map.get(s) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Symbol { index: *existing };
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        self.map.insert(leaked, index);
        self.strings.insert(index, leaked);
        Symbol { index }
    }

    fn get(&self, sym: Symbol) -> &'static str {
        self.strings.get(&sym.index).map(|s| *s).unwrap_or("")
    }

    fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.map.len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

fn string_table() -> &'static StringTable {
    static TABLE: OnceLock<StringTable> = OnceLock::new();
    TABLE.get_or_init(StringTable::new)
}

impl Symbol {
    /// Intern a string, returning its symbol. Interning the same text
    /// twice always returns the same `Symbol`.
    #[inline]
    pub fn intern(s: &str) -> Self {
        string_table().intern(s)
    }

    /// The string this symbol was interned from.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        string_table().get(*self)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_str().len()
    }

    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        self.index < RESERVED_SYMBOLS_END
    }

    pub fn stats() -> InternerStats {
        string_table().stats()
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

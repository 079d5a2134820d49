//! Error types for programmer-error / contract-violation paths.
//!
//! User-facing semantic faults are never represented as `Result::Err` —
//! they are diagnostics (see `minic_sem::diagnostics`). These types are
//! reserved for the utility layer's own internal contracts.

use thiserror::Error;

/// Errors from the interned-string table.
#[derive(Debug, Error)]
pub enum SymbolError {
    #[error("symbol not found: index {index}")]
    NotFound { index: u32 },
}

pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

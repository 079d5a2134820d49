//! The closed registry of 19 diagnostic codes and the sink that
//! records them, translated from `semantics.c`'s `error_*` family and
//! its `semantics_error`/`semantics_log` pair.

use std::cell::{Cell, RefCell};

use minic_util::{Diagnostic, DiagnosticBuilder, Span};

/// One of the 19 numbered error conditions the analyzer can report.
/// Each carries exactly the fixed code `semantics.c` assigns it; the
/// message text is likewise copied verbatim from the matching
/// `error_*` function, including its occasional unused `name`
/// parameter (`error_struct_redef`, `error_member_def`, and the two
/// `func_dec*` errors format a fixed string and never interpolate the
/// name they're handed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    VarNoDef = 1,
    FuncNoDef = 2,
    VarReDef = 3,
    FuncReDef = 4,
    AssignType = 5,
    AssignRval = 6,
    OpType = 7,
    ReturnType = 8,
    CallType = 9,
    Index = 10,
    Call = 11,
    IndexArg = 12,
    Member = 13,
    MemberNoDef = 14,
    MemberDef = 15,
    StructReDef = 16,
    StructNoDef = 17,
    FuncDecNoDef = 18,
    FuncDecConflict = 19,
}

impl ErrorCode {
    pub fn code(self) -> u32 {
        self as u32
    }
}

/// The diagnostic sink. Holds two independently toggleable streams —
/// `error` and `log`, matching `semantics.c`'s separate
/// `semantics_error`/`semantics_log` globals (`g_error`/`g_log` in the
/// original, enabled by default) — plus a sticky "has an error ever
/// fired" flag that only `prepare()` resets, mirroring the C driver's
/// `semantics_pass` global surviving across `semantics_error` calls
/// within one run.
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    error_enabled: Cell<bool>,
    log_enabled: Cell<bool>,
    passed: Cell<bool>,
}

impl Default for Handler {
    fn default() -> Self {
        Handler {
            diagnostics: RefCell::new(Vec::new()),
            error_enabled: Cell::new(true),
            log_enabled: Cell::new(true),
            // Mirrors `static bool semantics_is_passed = false;` — a
            // fresh handler has not passed anything until `prepare()`
            // says so, matching the driver calling it before each run.
            passed: Cell::new(false),
        }
    }
}

impl Handler {
    pub fn new() -> Self {
        Handler::default()
    }

    /// Resets the sticky `passed` flag and clears recorded
    /// diagnostics. Call once before analyzing a fresh `Program`.
    pub fn prepare(&self) {
        self.diagnostics.borrow_mut().clear();
        self.passed.set(true);
    }

    pub fn set_error(&self, enabled: bool) {
        self.error_enabled.set(enabled);
    }

    pub fn set_log(&self, enabled: bool) {
        self.log_enabled.set(enabled);
    }

    pub fn has_passed(&self) -> bool {
        self.passed.get()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    fn message(code: ErrorCode, name: Option<&str>) -> String {
        match code {
            ErrorCode::VarNoDef => format!("No def var: {}", name.unwrap_or_default()),
            ErrorCode::FuncNoDef => format!("No def func: {}", name.unwrap_or_default()),
            ErrorCode::VarReDef => format!("Re def var: {}", name.unwrap_or_default()),
            ErrorCode::FuncReDef => format!("Re def func: {}", name.unwrap_or_default()),
            ErrorCode::AssignType => "assign type not match".to_string(),
            ErrorCode::AssignRval => "assign to rval".to_string(),
            ErrorCode::OpType => "op type not match".to_string(),
            ErrorCode::ReturnType => "return type not match".to_string(),
            ErrorCode::CallType => "func call arg type not match".to_string(),
            ErrorCode::Index => "not indexable".to_string(),
            ErrorCode::Call => "not callable".to_string(),
            ErrorCode::IndexArg => "not integer in index".to_string(),
            ErrorCode::Member => "not memberable".to_string(),
            ErrorCode::MemberNoDef => format!("no member: {}", name.unwrap_or_default()),
            ErrorCode::MemberDef => "invalid member def".to_string(),
            ErrorCode::StructReDef => "struct redef".to_string(),
            ErrorCode::StructNoDef => "struct nodef".to_string(),
            ErrorCode::FuncDecNoDef => "func dec but no def".to_string(),
            ErrorCode::FuncDecConflict => "func dec conflict".to_string(),
        }
    }

    /// Records an error with no name to interpolate.
    pub fn error(&self, code: ErrorCode, span: Span) {
        self.error_named(code, span, None);
    }

    /// Records an error whose message interpolates `name` — only the
    /// four codes that take a `char *name` in `semantics.c` do so
    /// (1, 2, 3, 4, 14); passing a name for any other code is ignored,
    /// matching the C source's unused parameters.
    pub fn error_named(&self, code: ErrorCode, span: Span, name: Option<&str>) {
        self.passed.set(false);
        if !self.error_enabled.get() {
            return;
        }
        let message = Handler::message(code, name);
        self.diagnostics
            .borrow_mut()
            .push(DiagnosticBuilder::error(code.code(), span, message).build());
    }

    pub fn log(&self, span: Span, message: impl Into<String>) {
        if !self.log_enabled.get() {
            return;
        }
        self.diagnostics
            .borrow_mut()
            .push(DiagnosticBuilder::log(span, message).build());
    }
}

//! MiniC's semantic analyzer: a single-pass, syntax-directed walk that
//! checks scoping, typing, and definition rules over a parsed
//! `Program` and reports every fault through a structured diagnostic
//! sink rather than `Result`.
//!
//! [`Analyzer`] is the crate's entry point (`spec.md` §6.3); everything
//! else here is a building block it assembles: the type algebra
//! ([`types`]), symbol table ([`symbol`], [`scope`]), analysis context
//! ([`context`]), and diagnostic registry ([`diagnostics`]).

mod analyzer;
pub mod context;
pub mod diagnostics;
pub mod scope;
pub mod symbol;
pub mod types;

use std::collections::HashMap;

use minic_ast::{NodeId, Program};
use minic_util::Diagnostic;

pub use context::Cx;
pub use diagnostics::{ErrorCode, Handler};
pub use scope::Scope;
pub use symbol::{SemSymbol, SymbolState};
pub use types::{MetaKind, NamedField, Type};

/// The semantic analyzer. Owns the diagnostic sink and the per-run
/// analysis context, plus a `NodeId`-keyed side table of computed
/// types standing in for `spec.md` §6.1's in-node tag slot — `minic-ast`
/// gives only `VarDec`, `FunDec`, `Stmt` and `Exp` an identity to tag,
/// so that's the granularity `tags` records at (see DESIGN.md).
///
/// A single `Analyzer` can run several `Program`s in succession;
/// `prepare` resets the sticky diagnostic state and `work` resets the
/// per-run context and tag table before each walk.
pub struct Analyzer {
    handler: Handler,
    cx: Cx,
    tags: HashMap<NodeId, Type>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Analyzer {
            handler: Handler::new(),
            cx: Cx::new(),
            tags: HashMap::new(),
        }
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Analyzer::default()
    }

    /// Enables or disables error reporting. Errors still flip
    /// [`Analyzer::has_passed`] to `false` even while disabled
    /// (`spec.md` §6.3 — mirrors `semantics_set_error`).
    pub fn set_error(&self, enabled: bool) {
        self.handler.set_error(enabled);
    }

    /// Enables or disables `log`-level diagnostics, independent of
    /// `set_error` (mirrors `semantics_set_log`).
    pub fn set_log(&self, enabled: bool) {
        self.handler.set_log(enabled);
    }

    /// Resets the sticky pass/fail flag and clears recorded
    /// diagnostics. Call once before [`Analyzer::work`] on a fresh
    /// `Program`.
    pub fn prepare(&self) {
        self.handler.prepare();
    }

    /// Runs the analysis over `program` and returns whether it passed
    /// with no errors. Each call starts from a fresh top-level scope
    /// and analysis context; diagnostics accumulate in the handler
    /// across calls until the next [`Analyzer::prepare`].
    #[tracing::instrument(skip(self, program))]
    pub fn work(&mut self, program: &Program) -> bool {
        self.cx = Cx::new();
        self.tags.clear();
        tracing::debug!(ext_defs = program.ext_defs.len(), "analyzing program");
        self.analyse_program(program);
        self.has_passed()
    }

    pub fn has_passed(&self) -> bool {
        self.handler.has_passed()
    }

    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.handler.diagnostics()
    }

    /// The type recorded for a tagged node, if analysis reached it.
    pub fn tag_of(&self, id: NodeId) -> Option<&Type> {
        self.tags.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minic_ast::{
        ArithOp, CompSt, Dec, Def, ExtDef, ExtDefKind, FunDec, ParamDec, Program, RelOp,
        Specifier, Stmt, StmtKind, StructSpecifier, TypeKeyword, VarDec,
    };
    use minic_util::{Span, Symbol};

    fn sp() -> Span {
        Span::new(1)
    }

    fn int_spec() -> Specifier {
        Specifier::Type(TypeKeyword::Int)
    }

    #[test]
    fn empty_program_passes() {
        let mut az = Analyzer::new();
        az.prepare();
        let program = Program::new(vec![]);
        assert!(az.work(&program));
        assert!(az.diagnostics().is_empty());
    }

    #[test]
    fn undefined_variable_reports_error_one() {
        let mut az = Analyzer::new();
        az.prepare();
        let body = CompSt::new(
            vec![],
            vec![Stmt::new(
                sp(),
                StmtKind::Expr(minic_ast::Exp::id(sp(), Symbol::intern("x"))),
            )],
        );
        let fundec = FunDec::new(sp(), Symbol::intern("main"), vec![]);
        let program = Program::new(vec![ExtDef::new(
            sp(),
            ExtDefKind::FunDef {
                specifier: int_spec(),
                fundec,
                body,
            },
        )]);
        assert!(!az.work(&program));
        let diags = az.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, Some(1));
    }

    #[test]
    fn duplicate_top_level_variable_reports_error_three() {
        let mut az = Analyzer::new();
        az.prepare();
        let decl = |n: &str| VarDec::ident(sp(), Symbol::intern(n));
        let program = Program::new(vec![ExtDef::new(
            sp(),
            ExtDefKind::Vars {
                specifier: int_spec(),
                decls: vec![decl("x"), decl("x")],
            },
        )]);
        assert!(!az.work(&program));
        assert_eq!(az.diagnostics()[0].code, Some(3));
    }

    #[test]
    fn function_declared_but_never_defined_reports_error_eighteen() {
        let mut az = Analyzer::new();
        az.prepare();
        let fundec = FunDec::new(sp(), Symbol::intern("f"), vec![]);
        let program = Program::new(vec![ExtDef::new(
            sp(),
            ExtDefKind::FunDecl {
                specifier: int_spec(),
                fundec,
            },
        )]);
        assert!(!az.work(&program));
        assert_eq!(az.diagnostics()[0].code, Some(18));
    }

    #[test]
    fn forward_declaration_then_matching_definition_passes() {
        let mut az = Analyzer::new();
        az.prepare();
        let decl_fundec = FunDec::new(sp(), Symbol::intern("f"), vec![]);
        let def_fundec = FunDec::new(sp(), Symbol::intern("f"), vec![]);
        let body = CompSt::new(
            vec![],
            vec![Stmt::new(
                sp(),
                StmtKind::Return(minic_ast::Exp::int(sp(), 0)),
            )],
        );
        let program = Program::new(vec![
            ExtDef::new(
                sp(),
                ExtDefKind::FunDecl {
                    specifier: int_spec(),
                    fundec: decl_fundec,
                },
            ),
            ExtDef::new(
                sp(),
                ExtDefKind::FunDef {
                    specifier: int_spec(),
                    fundec: def_fundec,
                    body,
                },
            ),
        ]);
        assert!(az.work(&program));
    }

    #[test]
    fn struct_forward_reference_then_definition_allows_member_access() {
        // struct S; struct S { int x; }; int main() { struct S s; return s.x; }
        let mut az = Analyzer::new();
        az.prepare();
        let tag = Symbol::intern("S");
        let struct_ref = ExtDef::new(
            sp(),
            ExtDefKind::SpecOnly {
                specifier: Specifier::Struct(StructSpecifier::Reference { tag, span: sp() }),
            },
        );
        let struct_def = ExtDef::new(
            sp(),
            ExtDefKind::SpecOnly {
                specifier: Specifier::Struct(StructSpecifier::Definition {
                    tag: Some(tag),
                    members: vec![Def::new(
                        sp(),
                        int_spec(),
                        vec![Dec::new(sp(), VarDec::ident(sp(), Symbol::intern("x")), None)],
                    )],
                    span: sp(),
                }),
            },
        );
        let s_var = VarDec::ident(sp(), Symbol::intern("s"));
        let body = CompSt::new(
            vec![Def::new(
                sp(),
                Specifier::Struct(StructSpecifier::Reference { tag, span: sp() }),
                vec![Dec::new(sp(), s_var, None)],
            )],
            vec![Stmt::new(
                sp(),
                StmtKind::Return(minic_ast::Exp::member(
                    sp(),
                    minic_ast::Exp::id(sp(), Symbol::intern("s")),
                    Symbol::intern("x"),
                )),
            )],
        );
        let fundec = FunDec::new(sp(), Symbol::intern("main"), vec![]);
        let program = Program::new(vec![
            struct_ref,
            struct_def,
            ExtDef::new(
                sp(),
                ExtDefKind::FunDef {
                    specifier: int_spec(),
                    fundec,
                    body,
                },
            ),
        ]);
        assert!(az.work(&program));
    }

    #[test]
    fn relational_expression_always_yields_int() {
        let mut az = Analyzer::new();
        az.prepare();
        let rel = minic_ast::Exp::rel(
            sp(),
            RelOp::Lt,
            minic_ast::Exp::int(sp(), 1),
            minic_ast::Exp::int(sp(), 2),
        );
        let rel_id = rel.id;
        let body = CompSt::new(vec![], vec![Stmt::new(sp(), StmtKind::Expr(rel))]);
        let fundec = FunDec::new(sp(), Symbol::intern("main"), vec![]);
        let program = Program::new(vec![ExtDef::new(
            sp(),
            ExtDefKind::FunDef {
                specifier: int_spec(),
                fundec,
                body,
            },
        )]);
        assert!(az.work(&program));
        assert_eq!(az.tag_of(rel_id), Some(&Type::int()));
    }

    #[test]
    fn call_arity_mismatch_reports_error_nine_for_too_few_args() {
        let mut az = Analyzer::new();
        az.prepare();
        let takes_one_param = FunDec::new(
            sp(),
            Symbol::intern("f"),
            vec![ParamDec {
                specifier: int_spec(),
                declarator: VarDec::ident(sp(), Symbol::intern("a")),
            }],
        );
        let def_body = CompSt::new(
            vec![],
            vec![Stmt::new(sp(), StmtKind::Return(minic_ast::Exp::int(sp(), 0)))],
        );
        let call_body = CompSt::new(
            vec![],
            vec![Stmt::new(
                sp(),
                StmtKind::Expr(minic_ast::Exp::call(sp(), Symbol::intern("f"), vec![])),
            )],
        );
        let caller = FunDec::new(sp(), Symbol::intern("main"), vec![]);
        let program = Program::new(vec![
            ExtDef::new(
                sp(),
                ExtDefKind::FunDef {
                    specifier: int_spec(),
                    fundec: takes_one_param,
                    body: def_body,
                },
            ),
            ExtDef::new(
                sp(),
                ExtDefKind::FunDef {
                    specifier: int_spec(),
                    fundec: caller,
                    body: call_body,
                },
            ),
        ]);
        assert!(!az.work(&program));
        assert!(az.diagnostics().iter().any(|d| d.code == Some(9)));
    }

    #[test]
    fn arith_op_keeps_left_operand_type() {
        let mut az = Analyzer::new();
        az.prepare();
        let arith = minic_ast::Exp::arith(
            sp(),
            ArithOp::Add,
            minic_ast::Exp::float(sp(), 1.0),
            minic_ast::Exp::float(sp(), 2.0),
        );
        let id = arith.id;
        let body = CompSt::new(vec![], vec![Stmt::new(sp(), StmtKind::Expr(arith))]);
        let fundec = FunDec::new(sp(), Symbol::intern("main"), vec![]);
        let program = Program::new(vec![ExtDef::new(
            sp(),
            ExtDefKind::FunDef {
                specifier: int_spec(),
                fundec,
                body,
            },
        )]);
        assert!(az.work(&program));
        assert_eq!(az.tag_of(id), Some(&Type::float()));
    }

    #[test]
    fn prepare_resets_passed_flag_between_runs() {
        let mut az = Analyzer::new();
        az.prepare();
        let body = CompSt::new(
            vec![],
            vec![Stmt::new(
                sp(),
                StmtKind::Expr(minic_ast::Exp::id(sp(), Symbol::intern("undefined"))),
            )],
        );
        let fundec = FunDec::new(sp(), Symbol::intern("main"), vec![]);
        let program = Program::new(vec![ExtDef::new(
            sp(),
            ExtDefKind::FunDef {
                specifier: int_spec(),
                fundec,
                body,
            },
        )]);
        assert!(!az.work(&program));
        az.prepare();
        let ok_program = Program::new(vec![]);
        assert!(az.work(&ok_program));
        assert!(az.diagnostics().is_empty());
    }
}

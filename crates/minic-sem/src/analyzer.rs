//! The syntax-directed analyzer: one procedure per grammar non-terminal,
//! translated from `original_source/src/semantics.c`'s `analyse_*`
//! family (`spec.md` §4.4). Each procedure consumes an AST subtree,
//! may mutate the threaded [`Cx`] or install symbols into the live
//! [`Scope`], computes a [`Type`], records it as that node's tag
//! exactly once, and returns the type to its caller.
//!
//! A few spots resolve a conflict between `original_source` and the
//! literal wording of `spec.md`'s tables/end-to-end scenarios; each is
//! called out inline and in DESIGN.md, with `spec.md`'s text taken as
//! authoritative.

use std::sync::atomic::{AtomicU32, Ordering};

use minic_ast::{
    CompSt, Dec, Def, Exp, ExpKind, ExtDef, ExtDefKind, FunDec, NodeId, ParamDec, Program,
    Specifier, Stmt, StmtKind, StructSpecifier, TypeKeyword, VarDec, VarDecKind,
};
use minic_util::{Span, Symbol};

use crate::diagnostics::ErrorCode;
use crate::scope::Scope;
use crate::symbol::SemSymbol;
use crate::types::{MetaKind, Type};
use crate::Analyzer;

/// `semantics.c`'s `SES_Specifier { type *tp; char *struct_name; }`.
/// `struct_name` is `Some` for either shape of `StructSpecifier`;
/// `ty` is absent only for an as-yet-unresolved bare reference.
struct SpecifierTag {
    ty: Option<Type>,
    struct_name: Option<Symbol>,
}

impl SpecifierTag {
    fn plain(ty: Type) -> Self {
        SpecifierTag {
            ty: Some(ty),
            struct_name: None,
        }
    }

    fn is_struct(&self) -> bool {
        self.struct_name.is_some()
    }

    fn is_struct_reference(&self) -> bool {
        self.struct_name.is_some() && self.ty.is_none()
    }

    /// The resolved type. `Never` for an unresolved reference that a
    /// caller never ran through [`Analyzer::resolve_struct_reference`]
    /// first — an internal contract violation, not a user diagnostic.
    fn type_or_never(&self) -> Type {
        self.ty.clone().unwrap_or_else(Type::never)
    }
}

/// `semantics.c`'s `SES_VarDec`. `ty` is filled in only once the
/// outermost call of a bracket chain has collected every dimension
/// (`spec.md` §4.4.3's two-pass construction); `dims` accumulates
/// bottom-up during that climb.
struct VarDecTag {
    name: Symbol,
    ty: Option<Type>,
    span: Span,
    dims: Vec<u32>,
    has_init: bool,
}

/// The running counter behind `@STRUCTn` anonymous-tag synthesis
/// (`spec.md` §4.4.2), mirroring `semantics.c`'s `static int
/// struct_id` — a single process-wide counter that is never reset,
/// including across separate [`Analyzer::work`] calls.
static NEXT_ANON_STRUCT: AtomicU32 = AtomicU32::new(1);

fn is_lvalue(exp: &Exp) -> bool {
    matches!(
        exp.kind,
        ExpKind::Id(_) | ExpKind::Index(..) | ExpKind::Member(..)
    )
}

impl Analyzer {
    pub(crate) fn analyse_program(&mut self, program: &Program) {
        let mut root = Scope::root();
        for ext_def in &program.ext_defs {
            self.analyse_ext_def(ext_def, &mut root);
        }
        // Deferred sweep (§4.4.1): runs after every ExtDef, so its
        // diagnostics land after every source-order one (invariant 3).
        // `IndexMap` iteration order is insertion order, so this visits
        // top-level symbols in declaration order.
        for (_, sym) in root.iter() {
            if sym.ty.can_call() && !sym.is_defined() {
                self.handler
                    .error_named(ErrorCode::FuncDecNoDef, sym.declared_at, Some(sym.name.as_str()));
            }
        }
    }

    fn analyse_ext_def(&mut self, ext_def: &ExtDef, scope: &mut Scope) {
        match &ext_def.kind {
            ExtDefKind::SpecOnly { specifier } => {
                let tag = self.analyse_specifier(specifier, scope);
                self.reconcile_struct_symbol(&tag, scope, ext_def.span);
            }
            ExtDefKind::Vars { specifier, decls } => {
                let mut tag = self.analyse_specifier(specifier, scope);
                self.reconcile_struct_symbol(&tag, scope, ext_def.span);
                if tag.is_struct() && !self.resolve_struct_reference(&mut tag, scope, ext_def.span) {
                    self.handler.error_named(
                        ErrorCode::StructNoDef,
                        ext_def.span,
                        tag.struct_name.map(|s| s.as_str()),
                    );
                }
                let declare_type = tag.type_or_never();
                for declarator in decls {
                    let vd = self.analyse_var_dec(declarator, &declare_type);
                    if scope.find_here(vd.name).is_some() {
                        self.handler
                            .error_named(ErrorCode::VarReDef, vd.span, Some(vd.name.as_str()));
                    } else {
                        scope.declare(SemSymbol::defined(
                            vd.name,
                            vd.ty.unwrap_or_else(Type::never),
                            vd.span,
                        ));
                    }
                }
            }
            ExtDefKind::FunDef {
                specifier,
                fundec,
                body,
            } => {
                let tag = self.analyse_specifier(specifier, scope);
                self.reconcile_struct_symbol(&tag, scope, ext_def.span);
                // `original_source` never resolves a bare struct
                // reference used as a function's return type (only the
                // `ExtDecList` form does) — preserved verbatim, see
                // DESIGN.md.
                let declare_type = tag.type_or_never();
                let (mut fn_symbol, param_scope) = self.analyse_fun_dec(fundec, declare_type.clone(), scope);
                let prev_ret = self.cx.return_type.replace(declare_type);
                self.analyse_comp_st(body, &param_scope);
                self.cx.return_type = prev_ret;
                fn_symbol.mark_defined();
                self.reconcile_function_symbol(fn_symbol, scope, fundec.span);
            }
            ExtDefKind::FunDecl { specifier, fundec } => {
                let tag = self.analyse_specifier(specifier, scope);
                self.reconcile_struct_symbol(&tag, scope, ext_def.span);
                let declare_type = tag.type_or_never();
                let (fn_symbol, _param_scope) = self.analyse_fun_dec(fundec, declare_type, scope);
                self.reconcile_function_symbol(fn_symbol, scope, fundec.span);
            }
        }
    }

    /// Reconciles a struct tag named by `tag` against the current
    /// (always top-level) scope: `semantics.c:316-348`.
    ///
    /// Deviates from the literal C source in one respect: on
    /// promoting a prior forward declaration to a full definition, this
    /// also refines the installed symbol's *type* (not just its
    /// `state`). The C source only flips `state`, permanently leaving
    /// the placeholder's empty member list in place — which would make
    /// `spec.md` §8 scenario S4 (`struct S; struct S { int x; }; ...
    /// s.x`) fail with a missing-member error. `spec.md`'s explicit
    /// end-to-end scenario is taken as authoritative over the source
    /// quirk here.
    fn reconcile_struct_symbol(&mut self, tag: &SpecifierTag, scope: &mut Scope, span: Span) {
        let Some(name) = tag.struct_name else {
            return;
        };
        if let Some(existing) = scope.find_here(name) {
            if !existing.ty.can_member() {
                self.handler
                    .error_named(ErrorCode::StructReDef, span, Some(name.as_str()));
            } else if existing.is_defined() && tag.ty.is_some() {
                self.handler
                    .error_named(ErrorCode::StructReDef, span, Some(name.as_str()));
            } else if let Some(full_ty) = tag.ty.clone() {
                if let Some(sym) = scope.find_here_mut(name) {
                    sym.ty = full_ty;
                    sym.mark_defined();
                }
            }
        } else if tag.ty.is_none() {
            // Bare forward use with no prior symbol: auto-install an
            // empty, `Declared` placeholder (`semantics.c:338-342`).
            scope.declare(SemSymbol::declared(name, Type::structure(vec![]), span));
        } else {
            scope.declare(SemSymbol::defined(name, tag.ty.clone().unwrap(), span));
        }
    }

    /// `resolve_struct_specifier_dec`: promotes a bare struct reference
    /// to its concrete type by climbing the scope chain. No-op (always
    /// `true`) for a plain type or a struct *definition* specifier.
    fn resolve_struct_reference(&mut self, tag: &mut SpecifierTag, scope: &Scope, _span: Span) -> bool {
        if !tag.is_struct_reference() {
            return true;
        }
        let name = tag.struct_name.expect("is_struct_reference implies a name");
        match scope.find(name) {
            Some(sym) if sym.ty.can_member() && sym.is_defined() => {
                tag.ty = Some(sym.ty.clone());
                true
            }
            _ => {
                tag.ty = Some(Type::never());
                false
            }
        }
    }

    fn analyse_specifier(&mut self, specifier: &Specifier, scope: &mut Scope) -> SpecifierTag {
        match specifier {
            Specifier::Type(TypeKeyword::Int) => SpecifierTag::plain(Type::meta(MetaKind::Int)),
            Specifier::Type(TypeKeyword::Float) => SpecifierTag::plain(Type::meta(MetaKind::Float)),
            Specifier::Struct(s) => self.analyse_struct_specifier(s, scope),
        }
    }

    fn analyse_struct_specifier(&mut self, spec: &StructSpecifier, scope: &mut Scope) -> SpecifierTag {
        match spec {
            StructSpecifier::Reference { tag, .. } => SpecifierTag {
                ty: None,
                struct_name: Some(*tag),
            },
            StructSpecifier::Definition { tag, members, .. } => {
                let name = tag.unwrap_or_else(|| {
                    let n = NEXT_ANON_STRUCT.fetch_add(1, Ordering::Relaxed);
                    Symbol::intern(&format!("@STRUCT{n}"))
                });
                let mut body_scope = Scope::nested(scope);
                let prev_in_struct = self.cx.in_struct;
                self.cx.in_struct = true;
                for member in members {
                    self.analyse_def(member, &mut body_scope);
                }
                self.cx.in_struct = prev_in_struct;
                let struct_ty = Type::structure(body_scope.snapshot_as_members());
                SpecifierTag {
                    ty: Some(struct_ty),
                    struct_name: Some(name),
                }
            }
        }
    }

    /// `analyse_VarDec`: recurses on array dimensions, building the
    /// `Array` type right-to-left and reversing it into left-to-right
    /// order at the outermost call (`spec.md` §4.4.3).
    fn analyse_var_dec(&mut self, vardec: &VarDec, declare_type: &Type) -> VarDecTag {
        match &vardec.kind {
            VarDecKind::Ident(name) => {
                let ty = if self.cx.in_vardec {
                    None
                } else {
                    Some(declare_type.clone())
                };
                self.record_tag(vardec.id, ty.clone().unwrap_or_else(Type::never));
                VarDecTag {
                    name: *name,
                    ty,
                    span: vardec.span,
                    dims: Vec::new(),
                    has_init: false,
                }
            }
            VarDecKind::Array(base, len) => {
                let outer_in_vardec = self.cx.in_vardec;
                self.cx.in_vardec = true;
                let mut inner = self.analyse_var_dec(base, declare_type);
                self.cx.in_vardec = outer_in_vardec;

                inner.dims.push(*len);
                inner.span = vardec.span;
                if !outer_in_vardec {
                    let mut dims = inner.dims.clone();
                    dims.reverse();
                    inner.ty = Some(Type::array(declare_type.clone(), dims));
                }
                self.record_tag(vardec.id, inner.ty.clone().unwrap_or_else(Type::never));
                inner
            }
        }
    }

    /// `analyse_FunDec`: builds the function's parameter scope and
    /// signature. Returns the (still `Declared`) symbol plus the fresh
    /// scope the body (if any) should be analyzed inside.
    fn analyse_fun_dec<'p>(
        &mut self,
        fundec: &FunDec,
        declare_type: Type,
        parent: &'p Scope<'p>,
    ) -> (SemSymbol, Scope<'p>) {
        let mut param_scope = Scope::nested(parent);
        let mut param_types = Vec::with_capacity(fundec.params.len());
        for param in &fundec.params {
            param_types.push(self.analyse_param_dec(param, &mut param_scope));
        }
        let func_ty = Type::func(param_types, declare_type);
        self.record_tag(fundec.id, func_ty.clone());
        let symbol = SemSymbol::declared(fundec.name, func_ty, fundec.span);
        (symbol, param_scope)
    }

    fn analyse_param_dec(&mut self, param: &ParamDec, scope: &mut Scope) -> Type {
        let mut tag = self.analyse_specifier(&param.specifier, scope);
        if tag.is_struct() && !self.resolve_struct_reference(&mut tag, scope, param.declarator.span) {
            self.handler.error_named(
                ErrorCode::StructNoDef,
                param.declarator.span,
                tag.struct_name.map(|s| s.as_str()),
            );
        }
        let declare_type = tag.type_or_never();
        let vd = self.analyse_var_dec(&param.declarator, &declare_type);
        let ty = vd.ty.unwrap_or_else(Type::never);
        if scope.find_here(vd.name).is_some() {
            self.handler
                .error_named(ErrorCode::VarReDef, vd.span, Some(vd.name.as_str()));
        } else {
            scope.declare(SemSymbol::defined(vd.name, ty.clone(), vd.span));
        }
        ty
    }

    /// Reconciles a function declarator/definition against any
    /// pre-existing top-level symbol of the same name (`spec.md`
    /// §4.4.1's bulleted decision list, taken verbatim — notably
    /// narrower than `original_source`, which raises error 4 for
    /// *any* redeclaration once a function is `Defined`, even a bare
    /// re-declaration with a matching signature. `spec.md` explicitly
    /// conditions that case on "this is a definition", so a matching
    /// prototype after a full definition is accepted here.
    fn reconcile_function_symbol(&mut self, fn_symbol: SemSymbol, scope: &mut Scope, span: Span) {
        let name = fn_symbol.name;
        if let Some(existing) = scope.find_here(name) {
            if !existing.ty.can_call() {
                self.handler
                    .error_named(ErrorCode::FuncReDef, span, Some(name.as_str()));
            } else if existing.is_defined() && fn_symbol.is_defined() {
                self.handler
                    .error_named(ErrorCode::FuncReDef, span, Some(name.as_str()));
            } else if !existing.ty.equal(&fn_symbol.ty, false) {
                self.handler
                    .error_named(ErrorCode::FuncDecConflict, span, Some(name.as_str()));
            } else if fn_symbol.is_defined() {
                if let Some(sym) = scope.find_here_mut(name) {
                    sym.mark_defined();
                }
            }
        } else {
            scope.declare(fn_symbol);
        }
    }

    fn analyse_comp_st<'p>(&mut self, compst: &CompSt, parent: &'p Scope<'p>) {
        let mut block_scope = Scope::nested(parent);
        for def in &compst.defs {
            self.analyse_def(def, &mut block_scope);
        }
        for stmt in &compst.stmts {
            self.analyse_stmt(stmt, &block_scope);
        }
    }

    fn analyse_stmt(&mut self, stmt: &Stmt, scope: &Scope) {
        match &stmt.kind {
            StmtKind::Expr(exp) => {
                self.analyse_exp(exp, scope);
            }
            StmtKind::Block(compst) => self.analyse_comp_st(compst, scope),
            StmtKind::Return(exp) => {
                let ty = self.analyse_exp(exp, scope);
                debug_assert!(self.cx.return_type.is_some(), "RETURN outside a function body");
                if let Some(ret) = self.cx.return_type.clone() {
                    if !ret.equal(&ty, false) {
                        self.handler.error(ErrorCode::ReturnType, exp.span);
                    }
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                let cond_ty = self.analyse_exp(cond, scope);
                if !cond_ty.can_logic() {
                    self.handler.error(ErrorCode::OpType, cond.span);
                }
                self.analyse_stmt(then_branch, scope);
                if let Some(else_branch) = else_branch {
                    self.analyse_stmt(else_branch, scope);
                }
            }
            StmtKind::While { cond, body } => {
                let cond_ty = self.analyse_exp(cond, scope);
                if !cond_ty.can_logic() {
                    self.handler.error(ErrorCode::OpType, cond.span);
                }
                self.analyse_stmt(body, scope);
            }
        }
        self.record_tag(stmt.id, Type::unit());
    }

    fn analyse_def(&mut self, def: &Def, scope: &mut Scope) {
        let mut tag = self.analyse_specifier(&def.specifier, scope);
        if tag.is_struct() && !self.resolve_struct_reference(&mut tag, scope, def.span) {
            self.handler.error_named(
                ErrorCode::StructNoDef,
                def.span,
                tag.struct_name.map(|s| s.as_str()),
            );
        }
        let declare_type = tag.type_or_never();
        for dec in &def.decs {
            let vd = self.analyse_dec(dec, &declare_type, scope);
            if scope.find_here(vd.name).is_some() {
                let code = if self.cx.in_struct {
                    ErrorCode::MemberDef
                } else {
                    ErrorCode::VarReDef
                };
                self.handler.error_named(code, vd.span, Some(vd.name.as_str()));
            } else if self.cx.in_struct && vd.has_init {
                self.handler
                    .error_named(ErrorCode::MemberDef, vd.span, Some(vd.name.as_str()));
            } else {
                scope.declare(SemSymbol::defined(
                    vd.name,
                    vd.ty.unwrap_or_else(Type::never),
                    vd.span,
                ));
            }
        }
    }

    fn analyse_dec(&mut self, dec: &Dec, declare_type: &Type, scope: &Scope) -> VarDecTag {
        let mut vd = self.analyse_var_dec(&dec.declarator, declare_type);
        if let Some(init) = &dec.init {
            vd.has_init = true;
            let init_ty = self.analyse_exp(init, scope);
            let var_ty = vd.ty.clone().unwrap_or_else(Type::never);
            if !var_ty.equal(&init_ty, false) {
                self.handler.error(ErrorCode::AssignType, dec.span);
            }
        }
        vd
    }

    fn analyse_exp(&mut self, exp: &Exp, scope: &Scope) -> Type {
        let ty = match &exp.kind {
            ExpKind::Int(_) => Type::int(),
            ExpKind::Float(_) => Type::float(),
            ExpKind::Id(name) => match scope.find(*name) {
                Some(sym) => sym.ty.clone(),
                None => {
                    self.handler
                        .error_named(ErrorCode::VarNoDef, exp.span, Some(name.as_str()));
                    Type::never()
                }
            },
            ExpKind::Paren(inner) => self.analyse_exp(inner, scope),
            ExpKind::Neg(inner) => {
                let t = self.analyse_exp(inner, scope);
                if !t.can_arith() {
                    self.handler.error(ErrorCode::OpType, inner.span);
                }
                t
            }
            ExpKind::Not(inner) => {
                let t = self.analyse_exp(inner, scope);
                if !t.can_logic() {
                    self.handler.error(ErrorCode::OpType, inner.span);
                }
                t
            }
            ExpKind::And(lhs, rhs) | ExpKind::Or(lhs, rhs) => {
                let lt = self.analyse_exp(lhs, scope);
                let rt = self.analyse_exp(rhs, scope);
                if !lt.can_logic() {
                    self.handler.error(ErrorCode::OpType, lhs.span);
                } else if !rt.can_logic() {
                    self.handler.error(ErrorCode::OpType, rhs.span);
                }
                Type::int()
            }
            // `spec.md` §4.4.6 gives `Exp REL Exp` a fixed `Meta(Int)`
            // result regardless of outcome. `original_source` instead
            // folds RELOP into the same branch as arithmetic operators
            // and returns the left operand's type; the spec's table is
            // authoritative here (see DESIGN.md).
            ExpKind::Rel(_, lhs, rhs) => {
                let lt = self.analyse_exp(lhs, scope);
                let rt = self.analyse_exp(rhs, scope);
                if !lt.can_arith() {
                    self.handler.error(ErrorCode::OpType, lhs.span);
                } else if !rt.can_arith() {
                    self.handler.error(ErrorCode::OpType, rhs.span);
                } else if !lt.can_arith_pair(&rt) {
                    self.handler.error(ErrorCode::OpType, rhs.span);
                }
                Type::int()
            }
            ExpKind::Arith(_, lhs, rhs) => {
                let lt = self.analyse_exp(lhs, scope);
                let rt = self.analyse_exp(rhs, scope);
                if !lt.can_arith() {
                    self.handler.error(ErrorCode::OpType, lhs.span);
                    Type::int()
                } else if !rt.can_arith() {
                    self.handler.error(ErrorCode::OpType, rhs.span);
                    Type::int()
                } else if !lt.can_arith_pair(&rt) {
                    self.handler.error(ErrorCode::OpType, rhs.span);
                    Type::int()
                } else {
                    lt
                }
            }
            ExpKind::Assign(lhs, rhs) => {
                let lt = self.analyse_exp(lhs, scope);
                let rt = self.analyse_exp(rhs, scope);
                if !is_lvalue(lhs) {
                    self.handler.error(ErrorCode::AssignRval, exp.span);
                    Type::never()
                } else if !lt.equal(&rt, false) {
                    self.handler.error(ErrorCode::AssignType, exp.span);
                    Type::never()
                } else {
                    lt
                }
            }
            ExpKind::Call(name, args) => {
                let arg_types: Vec<Type> = args.iter().map(|a| self.analyse_exp(a, scope)).collect();
                self.analyse_call(*name, args, &arg_types, exp.span, scope)
            }
            ExpKind::Index(base, index) => {
                let base_ty = self.analyse_exp(base, scope);
                let index_ty = self.analyse_exp(index, scope);
                if !matches!(index_ty, Type::Meta(MetaKind::Int)) {
                    self.handler.error(ErrorCode::IndexArg, index.span);
                    base_ty.descend_array()
                } else if !base_ty.can_index() {
                    self.handler.error(ErrorCode::Index, exp.span);
                    Type::any()
                } else {
                    base_ty.descend_array()
                }
            }
            ExpKind::Member(base, field) => {
                let base_ty = self.analyse_exp(base, scope);
                if !base_ty.can_member() {
                    self.handler.error(ErrorCode::Member, exp.span);
                    Type::never()
                } else {
                    match base_ty.find_member(*field) {
                        Some(member) => member.ty.clone(),
                        None => {
                            self.handler
                                .error_named(ErrorCode::MemberNoDef, exp.span, Some(field.as_str()));
                            Type::never()
                        }
                    }
                }
            }
        };
        self.record_tag(exp.id, ty.clone());
        ty
    }

    /// Shared by both call forms (`ID()` and `ID(Args)`): arguments are
    /// always analyzed first, for their own diagnostics, before the
    /// callee itself is checked. Arity mismatch is reported
    /// unconditionally on length difference (`spec.md` §4.4.7 — a
    /// correction of `original_source`'s asymmetric check, which never
    /// flags a call with *too few* arguments; see DESIGN.md).
    fn analyse_call(&mut self, name: Symbol, args: &[Exp], arg_types: &[Type], span: Span, scope: &Scope) -> Type {
        match scope.find(name) {
            None => {
                self.handler
                    .error_named(ErrorCode::FuncNoDef, span, Some(name.as_str()));
                Type::never()
            }
            Some(sym) if !sym.ty.can_call() => {
                self.handler.error(ErrorCode::Call, span);
                Type::never()
            }
            Some(sym) if !sym.is_defined() => {
                self.handler
                    .error_named(ErrorCode::FuncNoDef, span, Some(name.as_str()));
                Type::never()
            }
            Some(sym) => {
                let (params, ret) = match &sym.ty {
                    Type::Func(params, ret) => (params.clone(), (**ret).clone()),
                    _ => unreachable!("can_call() guards this arm to Type::Func"),
                };
                if params.len() != arg_types.len() {
                    self.handler.error(ErrorCode::CallType, span);
                }
                for (i, param_ty) in params.iter().enumerate() {
                    if let Some(arg_ty) = arg_types.get(i) {
                        if !arg_ty.equal(param_ty, false) {
                            self.handler.error(ErrorCode::CallType, args[i].span);
                        }
                    }
                }
                ret
            }
        }
    }

    fn record_tag(&mut self, id: NodeId, ty: Type) -> Type {
        let prev = self.tags.insert(id, ty.clone());
        debug_assert!(prev.is_none(), "node {id} tagged more than once");
        ty
    }
}

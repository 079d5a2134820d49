//! MiniC's abstract syntax tree.
//!
//! Rendered as one typed enum per grammar category, in the donor's
//! `faxc_par::ast` style (`Span`-carrying node, recursive fields
//! boxed) rather than the generic kind-tag/child-list shape `spec.md`
//! §6.1 describes in host-language-agnostic terms — see SPEC_FULL.md.
//!
//! No parser lives here; construction helpers stand in for one so
//! tests can build trees directly.

use crate::node_id::NodeId;
use minic_util::{Span, Symbol};

/// The primitive type keywords the grammar's `TYPE` token can carry.
/// Corresponds to `t_type` in `spec.md` §6.1's leaf payload list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKeyword {
    Int,
    Float,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Debug, Clone)]
pub struct Program {
    pub ext_defs: Vec<ExtDef>,
}

impl Program {
    pub fn new(ext_defs: Vec<ExtDef>) -> Self {
        Program { ext_defs }
    }
}

/// One top-level definition. `spec.md` §4.4.1's four `ExtDef` forms.
#[derive(Debug, Clone)]
pub struct ExtDef {
    pub span: Span,
    pub kind: ExtDefKind,
}

#[derive(Debug, Clone)]
pub enum ExtDefKind {
    /// `Specifier ExtDecList ;`
    Vars {
        specifier: Specifier,
        decls: Vec<VarDec>,
    },
    /// `Specifier ;` — bare struct declaration/definition with no variables.
    SpecOnly { specifier: Specifier },
    /// `Specifier FunDec CompSt` — a function definition.
    FunDef {
        specifier: Specifier,
        fundec: FunDec,
        body: CompSt,
    },
    /// `Specifier FunDec ;` — a function declaration (no body).
    FunDecl {
        specifier: Specifier,
        fundec: FunDec,
    },
}

impl ExtDef {
    pub fn new(span: Span, kind: ExtDefKind) -> Self {
        ExtDef { span, kind }
    }
}

/// `Specifier : TYPE | StructSpecifier`.
#[derive(Debug, Clone)]
pub enum Specifier {
    Type(TypeKeyword),
    Struct(StructSpecifier),
}

/// `StructSpecifier : STRUCT Tag | STRUCT OptTag { DefList }`.
#[derive(Debug, Clone)]
pub enum StructSpecifier {
    /// `STRUCT Tag` — a reference to a previously named struct.
    Reference { tag: Symbol, span: Span },
    /// `STRUCT OptTag { DefList }` — a struct definition. `tag` is
    /// `None` when `OptTag` was empty; the analyzer synthesizes
    /// `@STRUCTn` in that case (`spec.md` §4.4.2).
    Definition {
        tag: Option<Symbol>,
        members: Vec<Def>,
        span: Span,
    },
}

/// `VarDec : ID | VarDec [ INT ]`.
///
/// One `Array` layer per bracket pair, nested inside-out exactly as
/// the grammar parses it (`spec.md` §4.4.3): `int a[2][3]` parses as
/// `Array(Array(Ident(a), 3), 2)` — the analyzer reverses this during
/// its two-pass construction.
#[derive(Debug, Clone)]
pub struct VarDec {
    pub id: NodeId,
    pub span: Span,
    pub kind: VarDecKind,
}

#[derive(Debug, Clone)]
pub enum VarDecKind {
    Ident(Symbol),
    Array(Box<VarDec>, u32),
}

impl VarDec {
    pub fn ident(span: Span, name: Symbol) -> Self {
        VarDec {
            id: NodeId::fresh(),
            span,
            kind: VarDecKind::Ident(name),
        }
    }

    pub fn array(span: Span, base: VarDec, len: u32) -> Self {
        VarDec {
            id: NodeId::fresh(),
            span,
            kind: VarDecKind::Array(Box::new(base), len),
        }
    }
}

/// `FunDec : ID ( VarList? )`.
#[derive(Debug, Clone)]
pub struct FunDec {
    pub id: NodeId,
    pub span: Span,
    pub name: Symbol,
    pub params: Vec<ParamDec>,
}

impl FunDec {
    pub fn new(span: Span, name: Symbol, params: Vec<ParamDec>) -> Self {
        FunDec {
            id: NodeId::fresh(),
            span,
            name,
            params,
        }
    }
}

/// One parameter in a `VarList`.
#[derive(Debug, Clone)]
pub struct ParamDec {
    pub specifier: Specifier,
    pub declarator: VarDec,
}

/// `CompSt : { DefList StmtList }`.
#[derive(Debug, Clone)]
pub struct CompSt {
    pub defs: Vec<Def>,
    pub stmts: Vec<Stmt>,
}

impl CompSt {
    pub fn new(defs: Vec<Def>, stmts: Vec<Stmt>) -> Self {
        CompSt { defs, stmts }
    }
}

/// `Stmt`, dispatching on grammar form (`spec.md` §4.4.4).
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expr(Exp),
    Block(CompSt),
    Return(Exp),
    If {
        cond: Exp,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Exp,
        body: Box<Stmt>,
    },
}

impl Stmt {
    pub fn new(span: Span, kind: StmtKind) -> Self {
        Stmt {
            id: NodeId::fresh(),
            span,
            kind,
        }
    }
}

/// `Def : Specifier DecList ;`.
#[derive(Debug, Clone)]
pub struct Def {
    pub span: Span,
    pub specifier: Specifier,
    pub decs: Vec<Dec>,
}

impl Def {
    pub fn new(span: Span, specifier: Specifier, decs: Vec<Dec>) -> Self {
        Def {
            span,
            specifier,
            decs,
        }
    }
}

/// `Dec : VarDec | VarDec = Exp`.
#[derive(Debug, Clone)]
pub struct Dec {
    pub span: Span,
    pub declarator: VarDec,
    pub init: Option<Exp>,
}

impl Dec {
    pub fn new(span: Span, declarator: VarDec, init: Option<Exp>) -> Self {
        Dec {
            span,
            declarator,
            init,
        }
    }
}

/// `Exp`, the analytical center of the grammar (`spec.md` §4.4.6).
#[derive(Debug, Clone)]
pub struct Exp {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExpKind,
}

#[derive(Debug, Clone)]
pub enum ExpKind {
    Int(u32),
    Float(f64),
    Id(Symbol),
    Paren(Box<Exp>),
    Neg(Box<Exp>),
    Not(Box<Exp>),
    And(Box<Exp>, Box<Exp>),
    Or(Box<Exp>, Box<Exp>),
    Rel(RelOp, Box<Exp>, Box<Exp>),
    Arith(ArithOp, Box<Exp>, Box<Exp>),
    Assign(Box<Exp>, Box<Exp>),
    Call(Symbol, Vec<Exp>),
    Index(Box<Exp>, Box<Exp>),
    Member(Box<Exp>, Symbol),
}

impl Exp {
    fn new(span: Span, kind: ExpKind) -> Self {
        Exp {
            id: NodeId::fresh(),
            span,
            kind,
        }
    }

    pub fn int(span: Span, value: u32) -> Self {
        Exp::new(span, ExpKind::Int(value))
    }

    pub fn float(span: Span, value: f64) -> Self {
        Exp::new(span, ExpKind::Float(value))
    }

    pub fn id(span: Span, name: Symbol) -> Self {
        Exp::new(span, ExpKind::Id(name))
    }

    pub fn paren(span: Span, inner: Exp) -> Self {
        Exp::new(span, ExpKind::Paren(Box::new(inner)))
    }

    pub fn neg(span: Span, inner: Exp) -> Self {
        Exp::new(span, ExpKind::Neg(Box::new(inner)))
    }

    pub fn not(span: Span, inner: Exp) -> Self {
        Exp::new(span, ExpKind::Not(Box::new(inner)))
    }

    pub fn and(span: Span, lhs: Exp, rhs: Exp) -> Self {
        Exp::new(span, ExpKind::And(Box::new(lhs), Box::new(rhs)))
    }

    pub fn or(span: Span, lhs: Exp, rhs: Exp) -> Self {
        Exp::new(span, ExpKind::Or(Box::new(lhs), Box::new(rhs)))
    }

    pub fn rel(span: Span, op: RelOp, lhs: Exp, rhs: Exp) -> Self {
        Exp::new(span, ExpKind::Rel(op, Box::new(lhs), Box::new(rhs)))
    }

    pub fn arith(span: Span, op: ArithOp, lhs: Exp, rhs: Exp) -> Self {
        Exp::new(span, ExpKind::Arith(op, Box::new(lhs), Box::new(rhs)))
    }

    pub fn assign(span: Span, lhs: Exp, rhs: Exp) -> Self {
        Exp::new(span, ExpKind::Assign(Box::new(lhs), Box::new(rhs)))
    }

    pub fn call(span: Span, name: Symbol, args: Vec<Exp>) -> Self {
        Exp::new(span, ExpKind::Call(name, args))
    }

    pub fn index(span: Span, base: Exp, subscript: Exp) -> Self {
        Exp::new(span, ExpKind::Index(Box::new(base), Box::new(subscript)))
    }

    pub fn member(span: Span, base: Exp, field: Symbol) -> Self {
        Exp::new(span, ExpKind::Member(Box::new(base), field))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_constructed_node_gets_a_distinct_id() {
        let a = Exp::int(Span::new(1), 1);
        let b = Exp::int(Span::new(1), 2);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn nested_array_vardec_is_inside_out() {
        let inner = VarDec::ident(Span::new(1), Symbol::intern("a"));
        let one_dim = VarDec::array(Span::new(1), inner, 3);
        let two_dim = VarDec::array(Span::new(1), one_dim, 2);
        match two_dim.kind {
            VarDecKind::Array(ref base, 2) => match base.kind {
                VarDecKind::Array(ref base2, 3) => {
                    assert!(matches!(base2.kind, VarDecKind::Ident(_)));
                }
                _ => panic!("expected nested array"),
            },
            _ => panic!("expected outer array"),
        }
    }

    #[test]
    fn call_with_no_args_has_empty_arg_list() {
        let call = Exp::call(Span::new(2), Symbol::intern("f"), vec![]);
        match call.kind {
            ExpKind::Call(_, args) => assert!(args.is_empty()),
            _ => panic!("expected call"),
        }
    }
}

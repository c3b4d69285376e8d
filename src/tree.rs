use std::fmt;

/// Byte range of a name occurrence in the original source, as reported by
/// the front end. Passes hand spans to the rewriter; they never index into
/// source text themselves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// Canonical identity of a function. Every redeclaration of the same
/// function (forward declaration, repeated prototype, definition) carries
/// the same id, so per-function state keyed by it converges across
/// occurrences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionId(pub u32);

impl fmt::Display for FunctionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn#{}", self.0)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Program {
    /// Top-level declarations in source traversal order.
    pub decls: Vec<Decl>,
}

#[derive(Clone, Debug)]
pub enum Decl {
    Function(FunctionOccurrence),
    Var(GlobalVar),
}

/// A file-scope variable declaration.
#[derive(Clone, Debug)]
pub struct GlobalVar {
    pub name: String,
    pub span: Span,
}

/// One syntactic occurrence of a function: a prototype or the definition.
/// The front end emits one occurrence per redeclaration, all sharing the
/// same `FunctionId`.
#[derive(Clone, Debug)]
pub struct FunctionOccurrence {
    pub function: FunctionId,
    pub name: String,
    pub params: Vec<ParamDecl>,
    /// Present only for the defining occurrence.
    pub body: Option<FunctionBody>,
}

impl FunctionOccurrence {
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

/// A single parameter at one occurrence. `name` is `None` for an unnamed
/// parameter; its span still marks where a name would go.
#[derive(Clone, Debug)]
pub struct ParamDecl {
    pub name: Option<String>,
    pub span: Span,
}

#[derive(Clone, Debug, Default)]
pub struct FunctionBody {
    pub locals: Vec<LocalVar>,
    /// Identifier references that the front end resolved to a parameter,
    /// in source order.
    pub param_refs: Vec<ParamRef>,
}

/// A block-scope variable declaration inside a function body.
#[derive(Clone, Debug)]
pub struct LocalVar {
    pub name: String,
    pub span: Span,
}

/// A use of a parameter, resolved by the front end to the owning function
/// and the parameter's index in declaration order (0-based).
#[derive(Clone, Debug)]
pub struct ParamRef {
    pub function: FunctionId,
    pub index: usize,
    pub span: Span,
}

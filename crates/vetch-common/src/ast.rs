//! The parsed statement tree the core consumes.
//!
//! An external parser/preprocessor produces `Source`s whose declarations and
//! bodies use these shapes; the core never tokenizes or parses text. The
//! fluent [`AccessChain`] builders are that parser's construction surface
//! (and double as the fixture surface in tests).

/// One step of an access chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Leading identifier (`a` in `a.foo()`).
    Ident(String),
    /// Attribute read (`.foo`).
    Attr(String),
    /// Invocation with argument chains (`(...)`).
    Call(Vec<AccessChain>),
}

/// One expression as an ordered left-to-right sequence of steps
/// (`a.foo().bar` is `Ident(a), Attr(foo), Call([]), Attr(bar)`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessChain {
    pub steps: Vec<Step>,
}

impl AccessChain {
    /// Start a chain at an identifier.
    pub fn ident(name: impl Into<String>) -> Self {
        AccessChain {
            steps: vec![Step::Ident(name.into())],
        }
    }

    /// Append an attribute read.
    pub fn attr(mut self, name: impl Into<String>) -> Self {
        self.steps.push(Step::Attr(name.into()));
        self
    }

    /// Append a call with the given argument chains.
    pub fn call(mut self, args: Vec<AccessChain>) -> Self {
        self.steps.push(Step::Call(args));
        self
    }

    /// Append an argument-less call.
    pub fn call0(self) -> Self {
        self.call(Vec::new())
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

/// A statement inside a function/method body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// `name = <chain>` - binds a local from the chain's resolved value.
    Assign { target: String, value: AccessChain },
    /// Expression evaluated for effect.
    Expr(AccessChain),
    /// `return`, with an optional value chain.
    Return(Option<AccessChain>),
    /// Two-way branch; either branch may be empty.
    If {
        condition: AccessChain,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },
    /// Loop with a conditioned back edge.
    While {
        condition: AccessChain,
        body: Vec<Statement>,
    },
}

impl Statement {
    pub fn assign(target: impl Into<String>, value: AccessChain) -> Self {
        Statement::Assign {
            target: target.into(),
            value,
        }
    }
}

/// Function/method parameter with an optional declared type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    /// Declared type name as written; resolved against the environment at
    /// use time.
    pub ty: Option<String>,
}

impl Param {
    pub fn untyped(name: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: None,
        }
    }

    pub fn typed(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Param {
            name: name.into(),
            ty: Some(ty.into()),
        }
    }
}

/// Parsed function or method declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<Param>,
    /// Declared return type name as written, if any.
    pub return_type: Option<String>,
    pub body: Vec<Statement>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionDecl {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            body: Vec::new(),
        }
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.push(param);
        self
    }

    pub fn returns(mut self, ty: impl Into<String>) -> Self {
        self.return_type = Some(ty.into());
        self
    }

    pub fn body(mut self, body: Vec<Statement>) -> Self {
        self.body = body;
        self
    }
}

/// Declared class field with its type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: String,
}

/// Parsed class declaration.
///
/// Base order is significant: member lookup and override analysis scan the
/// declared bases first-match-wins in exactly this order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<String>,
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<FunctionDecl>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>) -> Self {
        ClassDecl {
            name: name.into(),
            bases: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn base(mut self, name: impl Into<String>) -> Self {
        self.bases.push(name.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, ty: impl Into<String>) -> Self {
        self.fields.push(FieldDecl {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn method(mut self, method: FunctionDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// Module-level declared global with its type name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalDecl {
    pub name: String,
    pub ty: String,
}

/// Top-level item of a source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Item {
    Class(ClassDecl),
    Function(FunctionDecl),
    Global(GlobalDecl),
}

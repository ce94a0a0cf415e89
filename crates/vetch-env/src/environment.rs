//! Declaration tables and population.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::sync::Arc;
use tracing::{debug, info_span, warn};
use vetch_common::ast::{ClassDecl, FunctionDecl, GlobalDecl, Item, Param, Statement};
use vetch_common::{CheckError, QualifiedName, Source, Ty};

/// A function or method definition.
///
/// Immutable once parsed; the body is shared so checking tasks and graph
/// builders can walk it without cloning statements.
#[derive(Clone, Debug)]
pub struct Define {
    pub name: QualifiedName,
    /// Module the definition was declared in; declared type names inside it
    /// are resolved relative to this.
    pub module: QualifiedName,
    pub params: Vec<Param>,
    /// Declared return type name as written, if any.
    pub return_type: Option<String>,
    /// Owning class for methods; `None` for free functions.
    pub owner: Option<QualifiedName>,
    pub body: Arc<[Statement]>,
}

/// A class declaration: ordered bases plus the directly-defined member
/// tables. Members inherited from bases are not copied in.
#[derive(Clone, Debug)]
pub struct ClassDeclaration {
    pub name: QualifiedName,
    pub module: QualifiedName,
    /// Base classes in declaration order. The order is semantic: member
    /// lookup and override analysis scan it first-match-wins.
    pub bases: Vec<QualifiedName>,
    /// Directly-defined methods in declaration order, by simple name.
    pub methods: IndexMap<String, QualifiedName>,
    /// Directly-declared fields in declaration order, by simple name, with
    /// the declared type name as written.
    pub fields: IndexMap<String, String>,
}

/// A module-level declared global.
#[derive(Clone, Debug)]
pub struct GlobalDeclaration {
    pub name: QualifiedName,
    pub module: QualifiedName,
    /// Declared type name as written.
    pub ty: String,
}

/// Whole-program declaration table: classes, functions/methods, globals.
///
/// Built once per checking run by [`Environment::populate`] and read-only
/// afterwards.
#[derive(Debug, Default)]
pub struct Environment {
    classes: FxHashMap<QualifiedName, ClassDeclaration>,
    defines: FxHashMap<QualifiedName, Arc<Define>>,
    globals: FxHashMap<QualifiedName, GlobalDeclaration>,
    /// Every qualified name claimed so far, across all three tables.
    declared: FxHashSet<QualifiedName>,
}

impl Environment {
    /// Merge the declarations of all given sources into a fresh environment.
    ///
    /// Fails with [`CheckError::DuplicateDeclaration`] if two sources claim
    /// the same qualified name, and with [`CheckError::CycleInBases`] if the
    /// merged base hierarchy is cyclic. Population must fully complete
    /// before any checking task starts.
    pub fn populate(sources: &[Source]) -> Result<Environment, CheckError> {
        let _span = info_span!("populate", sources = sources.len()).entered();
        let mut env = Environment::default();
        for source in sources {
            for item in &source.items {
                match item {
                    Item::Class(class) => env.insert_class(&source.module, class)?,
                    Item::Function(function) => {
                        env.insert_function(&source.module, function, None)?;
                    }
                    Item::Global(global) => env.insert_global(&source.module, global)?,
                }
            }
        }
        env.qualify_bases();
        env.validate_hierarchy()?;
        debug!(
            classes = env.classes.len(),
            defines = env.defines.len(),
            globals = env.globals.len(),
            "environment populated"
        );
        Ok(env)
    }

    pub fn class(&self, name: &QualifiedName) -> Option<&ClassDeclaration> {
        self.classes.get(name)
    }

    pub fn define(&self, name: &QualifiedName) -> Option<&Arc<Define>> {
        self.defines.get(name)
    }

    pub fn global(&self, name: &QualifiedName) -> Option<&GlobalDeclaration> {
        self.globals.get(name)
    }

    pub fn defines(&self) -> impl Iterator<Item = &Arc<Define>> {
        self.defines.values()
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassDeclaration> {
        self.classes.values()
    }

    /// Resolve a name written in `module` to a class declaration: a dotted
    /// name is taken as fully qualified, a simple name is probed in the
    /// writing module first and at the root second.
    pub fn resolve_class_name(
        &self,
        module: &QualifiedName,
        written: &str,
    ) -> Option<&ClassDeclaration> {
        if written.contains('.') {
            return self.classes.get(&QualifiedName::new(written));
        }
        self.classes
            .get(&module.member(written))
            .or_else(|| self.classes.get(&QualifiedName::new(written)))
    }

    /// Resolve a name written in `module` to a declared global, with the
    /// same probing rule as [`Self::resolve_class_name`].
    pub fn resolve_global_name(
        &self,
        module: &QualifiedName,
        written: &str,
    ) -> Option<&GlobalDeclaration> {
        if written.contains('.') {
            return self.globals.get(&QualifiedName::new(written));
        }
        self.globals
            .get(&module.member(written))
            .or_else(|| self.globals.get(&QualifiedName::new(written)))
    }

    /// Resolve a declared type name written in `module` to a type value: a
    /// name naming a known class yields that class's instance type,
    /// anything else an opaque builtin.
    pub fn resolve_type_name(&self, module: &QualifiedName, written: &str) -> Ty {
        match self.resolve_class_name(module, written) {
            Some(class) => Ty::Class(class.name.clone()),
            None => Ty::Builtin(QualifiedName::new(written)),
        }
    }

    /// The definitions declared by `source`, in declaration order (free
    /// functions where they appear, methods in class member order).
    pub fn defines_of_source(&self, source: &Source) -> Vec<Arc<Define>> {
        let mut defines = Vec::new();
        for item in &source.items {
            match item {
                Item::Function(function) => {
                    let name = source.module.member(&function.name);
                    defines.extend(self.defines.get(&name).cloned());
                }
                Item::Class(class) => {
                    let class_name = source.module.member(&class.name);
                    for method in &class.methods {
                        let name = class_name.member(&method.name);
                        defines.extend(self.defines.get(&name).cloned());
                    }
                }
                Item::Global(_) => {}
            }
        }
        defines
    }

    fn claim(&mut self, name: QualifiedName) -> Result<QualifiedName, CheckError> {
        if !self.declared.insert(name.clone()) {
            return Err(CheckError::DuplicateDeclaration { name });
        }
        Ok(name)
    }

    fn insert_class(
        &mut self,
        module: &QualifiedName,
        class: &ClassDecl,
    ) -> Result<(), CheckError> {
        let class_name = self.claim(module.member(&class.name))?;

        let mut methods = IndexMap::new();
        for method in &class.methods {
            let define_name =
                self.insert_function(module, method, Some(class_name.clone()))?;
            methods.insert(method.name.clone(), define_name);
        }

        let mut fields = IndexMap::new();
        for field in &class.fields {
            self.claim(class_name.member(&field.name))?;
            fields.insert(field.name.clone(), field.ty.clone());
        }

        self.classes.insert(
            class_name.clone(),
            ClassDeclaration {
                name: class_name,
                module: module.clone(),
                // Qualified once every class is known; see qualify_bases.
                bases: class.bases.iter().map(QualifiedName::new).collect(),
                methods,
                fields,
            },
        );
        Ok(())
    }

    fn insert_function(
        &mut self,
        module: &QualifiedName,
        function: &FunctionDecl,
        owner: Option<QualifiedName>,
    ) -> Result<QualifiedName, CheckError> {
        let parent = owner.as_ref().unwrap_or(module);
        let name = self.claim(parent.member(&function.name))?;
        self.defines.insert(
            name.clone(),
            Arc::new(Define {
                name: name.clone(),
                module: module.clone(),
                params: function.params.clone(),
                return_type: function.return_type.clone(),
                owner,
                body: Arc::from(function.body.as_slice()),
            }),
        );
        Ok(name)
    }

    fn insert_global(
        &mut self,
        module: &QualifiedName,
        global: &GlobalDecl,
    ) -> Result<(), CheckError> {
        let name = self.claim(module.member(&global.name))?;
        self.globals.insert(
            name.clone(),
            GlobalDeclaration {
                name,
                module: module.clone(),
                ty: global.ty.clone(),
            },
        );
        Ok(())
    }

    /// Second population phase: once every class is known, rewrite base
    /// names to their qualified form (dotted names as written, simple names
    /// probed in the declaring module first).
    fn qualify_bases(&mut self) {
        let mut qualified: Vec<(QualifiedName, Vec<QualifiedName>)> = Vec::new();
        for class in self.classes.values() {
            let bases = class
                .bases
                .iter()
                .map(|base| self.qualify_base(&class.module, base.as_str()))
                .collect();
            qualified.push((class.name.clone(), bases));
        }
        for (name, bases) in qualified {
            if let Some(class) = self.classes.get_mut(&name) {
                class.bases = bases;
            }
        }
    }

    fn qualify_base(&self, module: &QualifiedName, written: &str) -> QualifiedName {
        if written.contains('.') {
            return QualifiedName::new(written);
        }
        let in_module = module.member(written);
        if self.classes.contains_key(&in_module) {
            return in_module;
        }
        let at_root = QualifiedName::new(written);
        if self.classes.contains_key(&at_root) {
            return at_root;
        }
        warn!(base = written, module = %module, "base class resolves to no known declaration");
        in_module
    }

    /// Reject cyclic base hierarchies before any resolution runs, so member
    /// lookup and override analysis can assume acyclicity.
    fn validate_hierarchy(&self) -> Result<(), CheckError> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Open,
            Done,
        }

        fn visit(
            env: &Environment,
            name: &QualifiedName,
            marks: &mut FxHashMap<QualifiedName, Mark>,
        ) -> Result<(), CheckError> {
            match marks.get(name) {
                Some(Mark::Done) => return Ok(()),
                Some(Mark::Open) => {
                    return Err(CheckError::CycleInBases { name: name.clone() });
                }
                None => {}
            }
            marks.insert(name.clone(), Mark::Open);
            if let Some(class) = env.classes.get(name) {
                for base in &class.bases {
                    visit(env, base, marks)?;
                }
            }
            marks.insert(name.clone(), Mark::Done);
            Ok(())
        }

        let mut marks = FxHashMap::default();
        for name in self.classes.keys() {
            visit(self, name, &mut marks)?;
        }
        Ok(())
    }
}

//! The specification arena.
//!
//! [`Ast`] owns every node of one compiled specification in per-kind
//! vectors indexed by [`TypeId`], [`ConstId`], [`FunctionId`] and
//! [`ModuleId`]. Nodes are appended during loading and never mutated
//! afterwards, so a finished `Ast` can be shared read-only between threads.
//!
//! Declarations made through a module are qualified by the module's id and
//! entered in a lookup index; declaring the same qualified id twice fails.

use rustc_hash::FxHashMap;

use crate::node_id::to_u32;
use crate::{
    ConstId, Constant, Function, FunctionId, Id, Located, Location, Module, ModuleId, NodeRef,
    Render, SemanticError, SemanticErrorKind, SemanticResult, Type, TypeId,
};

#[derive(Clone, Debug, Default)]
pub struct Ast {
    types: Vec<Type>,
    constants: Vec<Constant>,
    functions: Vec<Function>,
    modules: Vec<Module>,
    /// Qualified id of every declaration.
    index: FxHashMap<Id, NodeRef>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a module. Module ids share the declaration namespace.
    pub fn add_module(&mut self, id: Id, location: Location) -> SemanticResult<ModuleId> {
        let module = ModuleId::new(to_u32(self.modules.len(), "modules"));
        self.register(id.clone(), NodeRef::Module(module), &location)?;
        self.modules.push(Module::new(id, location));
        Ok(module)
    }

    /// Add an anonymous type (not visible to lookup).
    pub fn add_type(&mut self, ty: Type) -> TypeId {
        let id = TypeId::new(to_u32(self.types.len(), "types"));
        self.types.push(ty);
        id
    }

    /// Declare a named type in `module`.
    ///
    /// The stored id is `id` qualified under the module's id.
    pub fn declare_type(
        &mut self,
        module: ModuleId,
        id: Id,
        mut ty: Type,
    ) -> SemanticResult<TypeId> {
        let qualified = id.qualified_under(self.module(module).id());
        let type_id = TypeId::new(to_u32(self.types.len(), "types"));
        self.register(qualified.clone(), NodeRef::Type(type_id), ty.location())?;
        ty.id = Some(qualified);
        self.types.push(ty);
        self.modules[module.index()].types.push(type_id);
        Ok(type_id)
    }

    /// Add an anonymous constant (a literal used in place).
    pub fn add_constant(&mut self, constant: Constant) -> ConstId {
        let id = ConstId::new(to_u32(self.constants.len(), "constants"));
        self.constants.push(constant);
        id
    }

    /// Declare a named constant in `module`.
    pub fn declare_constant(
        &mut self,
        module: ModuleId,
        id: Id,
        mut constant: Constant,
    ) -> SemanticResult<ConstId> {
        let qualified = id.qualified_under(self.module(module).id());
        let const_id = ConstId::new(to_u32(self.constants.len(), "constants"));
        self.register(qualified.clone(), NodeRef::Constant(const_id), constant.location())?;
        constant.id = Some(qualified);
        self.constants.push(constant);
        self.modules[module.index()].constants.push(const_id);
        Ok(const_id)
    }

    /// Register a function with its module.
    ///
    /// The function's id is qualified under the module's id.
    pub fn add_function(&mut self, mut function: Function) -> SemanticResult<FunctionId> {
        let module = function.module();
        let qualified = function.id().qualified_under(self.module(module).id());
        let function_id = FunctionId::new(to_u32(self.functions.len(), "functions"));
        self.register(qualified.clone(), NodeRef::Function(function_id), function.location())?;
        function.id = qualified;
        self.functions.push(function);
        self.modules[module.index()].functions.push(function_id);
        Ok(function_id)
    }

    fn register(&mut self, id: Id, node: NodeRef, location: &Location) -> SemanticResult<()> {
        if self.index.contains_key(&id) {
            let rendered = id.to_string();
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateDeclaration {
                    id: rendered.clone(),
                },
                rendered,
                location.clone(),
            ));
        }
        tracing::trace!(%id, ?node, "declared");
        self.index.insert(id, node);
        Ok(())
    }

    #[inline]
    pub fn ty(&self, id: TypeId) -> &Type {
        &self.types[id.index()]
    }

    #[inline]
    pub fn constant(&self, id: ConstId) -> &Constant {
        &self.constants[id.index()]
    }

    #[inline]
    pub fn function(&self, id: FunctionId) -> &Function {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn module(&self, id: ModuleId) -> &Module {
        &self.modules[id.index()]
    }

    /// All modules in declaration order.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> + '_ {
        (0..self.modules.len()).map(|i| ModuleId::new(to_u32(i, "modules")))
    }

    /// Look up a declaration by its qualified id.
    pub fn lookup(&self, id: &Id) -> Option<NodeRef> {
        self.index.get(id).copied()
    }

    pub fn lookup_type(&self, id: &Id) -> Option<TypeId> {
        match self.lookup(id)? {
            NodeRef::Type(t) => Some(t),
            _ => None,
        }
    }

    pub fn lookup_constant(&self, id: &Id) -> Option<ConstId> {
        match self.lookup(id)? {
            NodeRef::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn lookup_function(&self, id: &Id) -> Option<FunctionId> {
        match self.lookup(id)? {
            NodeRef::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn lookup_module(&self, id: &Id) -> Option<ModuleId> {
        match self.lookup(id)? {
            NodeRef::Module(m) => Some(m),
            _ => None,
        }
    }

    /// Render any node's summary.
    pub fn render(&self, node: NodeRef) -> String {
        match node {
            NodeRef::Type(id) => self.ty(id).render(self),
            NodeRef::Constant(id) => self.constant(id).render(self),
            NodeRef::Function(id) => self.function(id).render(self),
            NodeRef::Module(id) => self.module(id).render(self),
        }
    }

    /// Location of any node.
    pub fn location(&self, node: NodeRef) -> &Location {
        match node {
            NodeRef::Type(id) => self.ty(id).location(),
            NodeRef::Constant(id) => self.constant(id).location(),
            NodeRef::Function(id) => self.function(id).location(),
            NodeRef::Module(id) => self.module(id).location(),
        }
    }

    /// Total number of nodes of every kind.
    pub fn node_count(&self) -> usize {
        self.types.len() + self.constants.len() + self.functions.len() + self.modules.len()
    }
}

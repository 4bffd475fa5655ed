//! Functions and modules.

use crate::{
    Ast, BodyHandle, ConstId, FunctionId, Id, Located, Location, ModuleId, NodeRef, Render, TypeId,
};

/// A child of a function: its id or its signature type.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Child<'a> {
    Id(&'a Id),
    Node(NodeRef),
}

/// A named, typed callable unit.
///
/// The function owns its id and type; `module` is a back-reference used for
/// lookup only. Modules own functions, not the other way around.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Function {
    pub(crate) id: Id,
    ty: TypeId,
    module: ModuleId,
    body: Option<BodyHandle>,
    location: Location,
}

impl Function {
    /// Create a function. Never fails; registration happens in
    /// [`Ast::add_function`].
    pub fn new(
        id: Id,
        ty: TypeId,
        module: ModuleId,
        body: Option<BodyHandle>,
        location: Location,
    ) -> Self {
        Function {
            id,
            ty,
            module,
            body,
            location,
        }
    }

    #[inline]
    pub fn id(&self) -> &Id {
        &self.id
    }

    #[inline]
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    #[inline]
    pub fn module(&self) -> ModuleId {
        self.module
    }

    /// Opaque body, `None` for a declaration without implementation.
    #[inline]
    pub fn body(&self) -> Option<BodyHandle> {
        self.body
    }

    /// Owned children, in traversal order.
    pub fn children(&self) -> [Child<'_>; 2] {
        [Child::Id(&self.id), Child::Node(NodeRef::Type(self.ty))]
    }
}

impl Render for Function {
    fn render(&self, ast: &Ast) -> String {
        format!("{} ({})", self.id, ast.ty(self.ty).render(ast))
    }
}

impl Located for Function {
    fn location(&self) -> &Location {
        &self.location
    }
}

/// A module: owner of its declared types, constants and functions.
///
/// All three lists are append-only; declarations keep their position.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Module {
    id: Id,
    pub(crate) types: Vec<TypeId>,
    pub(crate) constants: Vec<ConstId>,
    pub(crate) functions: Vec<FunctionId>,
    location: Location,
}

impl Module {
    pub(crate) fn new(id: Id, location: Location) -> Self {
        Module {
            id,
            types: Vec::new(),
            constants: Vec::new(),
            functions: Vec::new(),
            location,
        }
    }

    #[inline]
    pub fn id(&self) -> &Id {
        &self.id
    }

    #[inline]
    pub fn types(&self) -> &[TypeId] {
        &self.types
    }

    #[inline]
    pub fn constants(&self) -> &[ConstId] {
        &self.constants
    }

    #[inline]
    pub fn functions(&self) -> &[FunctionId] {
        &self.functions
    }
}

impl Render for Module {
    fn render(&self, _ast: &Ast) -> String {
        format!(
            "module {} ({} types, {} constants, {} functions)",
            self.id,
            self.types.len(),
            self.constants.len(),
            self.functions.len()
        )
    }
}

impl Located for Module {
    fn location(&self) -> &Location {
        &self.location
    }
}

//! Specification visitor.
//!
//! Traverses the ownership tree of an [`Ast`]: modules own their declared
//! types, constants and functions; functions own their id and signature;
//! composite types own their anonymous member types. Named types referenced
//! from another node are not descended into, so every node is visited
//! exactly once.
//!
//! Default `visit_*` methods call the matching `walk_*` function. Override a
//! `visit_*` method to observe a node, and call `walk_*` to keep going.
//!
//! # Example
//!
//! ```text
//! struct CountBitsets(usize);
//!
//! impl<'ast> Visitor<'ast> for CountBitsets {
//!     fn visit_constant(&mut self, ast: &'ast Ast, id: ConstId) {
//!         if ast.constant(id).as_bitset().is_some() {
//!             self.0 += 1;
//!         }
//!     }
//! }
//! ```

use crate::function::Child;
use crate::{Ast, ConstId, FunctionId, Id, ModuleId, NodeRef, TypeId};

pub trait Visitor<'ast> {
    fn visit_module(&mut self, ast: &'ast Ast, id: ModuleId) {
        walk_module(self, ast, id);
    }

    fn visit_type(&mut self, ast: &'ast Ast, id: TypeId) {
        walk_type(self, ast, id);
    }

    fn visit_constant(&mut self, ast: &'ast Ast, id: ConstId) {
        walk_constant(self, ast, id);
    }

    fn visit_function(&mut self, ast: &'ast Ast, id: FunctionId) {
        walk_function(self, ast, id);
    }

    /// Ids have no children.
    fn visit_id(&mut self, _id: &'ast Id) {}
}

/// Visit every module of `ast`.
pub fn walk_ast<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast) {
    for module in ast.modules() {
        visitor.visit_module(ast, module);
    }
}

pub fn walk_module<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    ast: &'ast Ast,
    id: ModuleId,
) {
    let module = ast.module(id);
    visitor.visit_id(module.id());
    for &ty in module.types() {
        visitor.visit_type(ast, ty);
    }
    for &constant in module.constants() {
        visitor.visit_constant(ast, constant);
    }
    for &function in module.functions() {
        visitor.visit_function(ast, function);
    }
}

pub fn walk_type<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, ast: &'ast Ast, id: TypeId) {
    let ty = ast.ty(id);
    if let Some(type_id) = ty.id() {
        visitor.visit_id(type_id);
    }
    for child in ty.owned_children(ast) {
        visitor.visit_type(ast, child);
    }
}

pub fn walk_constant<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    ast: &'ast Ast,
    id: ConstId,
) {
    let constant = ast.constant(id);
    if let Some(const_id) = constant.id() {
        visitor.visit_id(const_id);
    }
    if let Some(bitset) = constant.as_bitset() {
        for label in bitset.labels() {
            visitor.visit_id(label);
        }
    }
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    ast: &'ast Ast,
    id: FunctionId,
) {
    for child in ast.function(id).children() {
        match child {
            Child::Id(id) => visitor.visit_id(id),
            // A signature declared as a named type belongs to its module.
            Child::Node(NodeRef::Type(ty)) if ast.ty(ty).id().is_none() => {
                visitor.visit_type(ast, ty);
            }
            Child::Node(_) => {}
        }
    }
}

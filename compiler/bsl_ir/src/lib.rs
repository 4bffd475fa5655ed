//! Binspec IR - the specification model
//!
//! This crate holds the in-memory representation of a parsed binary format
//! specification:
//! - `Location` for file/line provenance
//! - `Id` for scoped `a::b::c` identifiers
//! - Types (integers, bitsets, structs, function signatures)
//! - Constants, checked against their declared type on construction
//! - Functions and modules
//! - The `Ast` arena that owns all of the above
//!
//! # Design Philosophy
//!
//! - **Validate at construction**: a node that exists is well formed. A
//!   bitset constant naming an undeclared label never gets built.
//! - **Index, don't own**: nodes refer to each other through `TypeId`,
//!   `ModuleId` and friends, never through shared pointers.
//! - **Freeze after loading**: nothing is mutated once the `Ast` is
//!   complete, so it is `Send + Sync` and shareable without locks.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod ast;
mod constant;
mod errors;
mod function;
mod id;
mod location;
mod node_id;
mod traits;
mod types;
pub mod visitor;

pub use ast::Ast;
pub use constant::{BitsetConstant, Constant, ConstantKind};
pub use errors::{SemanticError, SemanticErrorKind, SemanticResult};
pub use function::{Child, Function, Module};
pub use id::{combine_ids, Id, PATH_DELIMITER};
pub use location::{Location, NO_FILENAME, UNKNOWN_LOCATION};
pub use node_id::{BodyHandle, ConstId, FunctionId, ModuleId, NodeRef, TypeId};
pub use traits::{Located, Render};
pub use types::{
    BitsetLabel, BitsetType, FunctionType, IntWidth, Param, StructField, StructType, Type,
    TypeKind,
};

//! Typed indices into the [`Ast`](crate::Ast) arena.
//!
//! Nodes reference each other through these 4-byte handles rather than
//! owning pointers, so a specification's node graph cannot form ownership
//! cycles and the whole arena is dropped in one go.

use std::fmt;

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(index: u32) -> Self {
                $name(index)
            }

            /// Index into the owning arena vector.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

define_index!(
    /// Index of a [`Type`](crate::Type).
    TypeId
);
define_index!(
    /// Index of a [`Constant`](crate::Constant).
    ConstId
);
define_index!(
    /// Index of a [`Function`](crate::Function).
    FunctionId
);
define_index!(
    /// Index of a [`Module`](crate::Module).
    ModuleId
);
define_index!(
    /// Opaque handle to a function body.
    ///
    /// The IR never looks inside a body; whoever compiles the
    /// specification decides what the handle refers to (for the parser
    /// engine, a routine in a compiled program).
    BodyHandle
);

/// Reference to any node stored in the arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeRef {
    Type(TypeId),
    Constant(ConstId),
    Function(FunctionId),
    Module(ModuleId),
}

/// Convert an arena length to a `u32` index.
///
/// # Panics
/// Panics if the arena holds more than `u32::MAX` entries of one kind.
#[inline]
pub(crate) fn to_u32(len: usize, what: &str) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("too many {what} in one specification"))
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{NodeRef, TypeId};
    crate::static_assert_size!(TypeId, 4);
    crate::static_assert_size!(NodeRef, 8);
}

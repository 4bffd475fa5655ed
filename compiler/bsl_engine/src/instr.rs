//! Compiled parser instructions.
//!
//! A compiled specification is a flat table of [`Instr`] indexed by
//! [`InstrId`]. The instruction pointer is therefore a plain index: copyable,
//! comparable and valid for as long as the [`Program`](crate::Program) is.

use std::fmt;

use bsl_ir::{BitsetType, IntWidth, TypeKind};

macro_rules! define_index {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn new(raw: u32) -> Self {
                $name(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{}", $prefix, self.0)
            }
        }
    };
}

define_index!(
    /// Position of an instruction in its program.
    InstrId,
    "#"
);
define_index!(
    /// Index into a program's field-name table.
    FieldId,
    "field#"
);
define_index!(
    /// Index into a program's bitset layout table.
    LayoutId,
    "layout#"
);

/// Byte order of a multi-byte integer.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Endian {
    #[default]
    Big,
    Little,
}

/// Shape of an integer read from the stream.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Scalar {
    pub width: IntWidth,
    pub endian: Endian,
    pub signed: bool,
}

impl Scalar {
    pub const fn unsigned(width: IntWidth, endian: Endian) -> Self {
        Scalar {
            width,
            endian,
            signed: false,
        }
    }

    pub const fn signed(width: IntWidth, endian: Endian) -> Self {
        Scalar {
            width,
            endian,
            signed: true,
        }
    }

    /// Scalar for an integer or bitset type, `None` for anything else.
    pub fn for_type(kind: &TypeKind, endian: Endian) -> Option<Self> {
        match kind {
            TypeKind::UnsignedInt(width) => Some(Self::unsigned(*width, endian)),
            TypeKind::SignedInt(width) => Some(Self::signed(*width, endian)),
            TypeKind::Bitset(bitset) => Some(Self::unsigned(bitset.width(), endian)),
            TypeKind::Bool => Some(Self::unsigned(IntWidth::W8, endian)),
            _ => None,
        }
    }

    #[inline]
    pub const fn byte_len(self) -> usize {
        self.width.bytes()
    }

    /// Raw unsigned value of `bytes`, which hold exactly `byte_len()` bytes.
    pub fn decode(self, bytes: &[u8]) -> u64 {
        let fold = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);
        match self.endian {
            Endian::Big => bytes.iter().fold(0, fold),
            Endian::Little => bytes.iter().rev().fold(0, fold),
        }
    }

    /// Sign-extend a raw value of this width.
    #[allow(clippy::cast_possible_wrap, reason = "two's complement reinterpretation")]
    pub fn sign_extend(self, raw: u64) -> i64 {
        let shift = 64 - self.width.bits();
        ((raw << shift) as i64) >> shift
    }
}

/// Byte count of a variable-size read.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Length {
    Fixed(u32),
    /// Use the `u64` on top of the stack; it is popped once the read
    /// succeeds.
    FromStack,
}

/// Bit positions of a bitset type, lowered for decoding.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct BitsetLayout {
    width: IntWidth,
    labels: Vec<(String, u32)>,
}

impl BitsetLayout {
    pub fn new(width: IntWidth, labels: Vec<(String, u32)>) -> Self {
        BitsetLayout { width, labels }
    }

    /// Lower a checked bitset type. Labels keep their local names and
    /// declaration order.
    pub fn from_type(ty: &BitsetType) -> Self {
        let labels = ty
            .labels()
            .iter()
            .map(|l| (l.id.local().to_owned(), l.position))
            .collect();
        BitsetLayout::new(ty.width(), labels)
    }

    #[inline]
    pub fn width(&self) -> IntWidth {
        self.width
    }

    pub fn labels(&self) -> &[(String, u32)] {
        &self.labels
    }

    /// First label whose position does not fit the width.
    pub fn out_of_range(&self) -> Option<(&str, u32)> {
        self.labels
            .iter()
            .find(|(_, position)| *position >= self.width.bits())
            .map(|(name, position)| (name.as_str(), *position))
    }

    /// Names of the labels whose bits are set in `bits`. Labels beyond the
    /// width are never set.
    pub fn decode(&self, bits: u64) -> Vec<String> {
        self.labels
            .iter()
            .filter(|(_, position)| {
                1u64.checked_shl(*position)
                    .is_some_and(|mask| bits & mask != 0)
            })
            .map(|(name, _)| name.clone())
            .collect()
    }
}

/// One parser step.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Instr {
    /// Read an integer; emit it when `field` is set, push it as `u64` when
    /// `keep` is set.
    Read {
        scalar: Scalar,
        field: Option<FieldId>,
        keep: bool,
    },
    ReadBytes {
        len: Length,
        field: Option<FieldId>,
    },
    ReadBitset {
        scalar: Scalar,
        layout: LayoutId,
        field: Option<FieldId>,
    },
    /// Read an integer and fail unless it equals `value`.
    Expect { scalar: Scalar, value: u64 },
    Skip { len: Length },
    Push(u64),
    Drop,
    Dup,
    /// Decrement the `u64` on top of the stack, saturating at zero.
    Decrement,
    Jump(InstrId),
    /// Pop a `u64` and jump when it is zero.
    JumpIfZero(InstrId),
    Call(InstrId),
    Return,
    Enter(FieldId),
    Leave,
    /// End of one message.
    Halt,
}

impl Instr {
    /// Control-transfer target, if any.
    pub fn target(&self) -> Option<InstrId> {
        match self {
            Instr::Jump(t) | Instr::JumpIfZero(t) | Instr::Call(t) => Some(*t),
            _ => None,
        }
    }

    pub(crate) fn target_mut(&mut self) -> Option<&mut InstrId> {
        match self {
            Instr::Jump(t) | Instr::JumpIfZero(t) | Instr::Call(t) => Some(t),
            _ => None,
        }
    }

    /// Field-name table entry this instruction refers to.
    pub fn field(&self) -> Option<FieldId> {
        match self {
            Instr::Read { field, .. }
            | Instr::ReadBytes { field, .. }
            | Instr::ReadBitset { field, .. } => *field,
            Instr::Enter(field) => Some(*field),
            _ => None,
        }
    }
}

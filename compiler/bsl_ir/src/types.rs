//! Types of specification values.
//!
//! Composite types validate their own invariants on construction: bitset
//! labels and positions are unique and in range, struct fields are unique.

use std::fmt::Write as _;

use rustc_hash::FxHashSet;

use crate::{
    Ast, Id, Located, Location, Render, SemanticError, SemanticErrorKind, SemanticResult, TypeId,
};

/// Width of an integer or bitset in bits.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

impl IntWidth {
    /// Parse a bit count, failing for anything but 8, 16, 32 or 64.
    pub fn from_bits(bits: u32, location: &Location) -> SemanticResult<Self> {
        match bits {
            8 => Ok(IntWidth::W8),
            16 => Ok(IntWidth::W16),
            32 => Ok(IntWidth::W32),
            64 => Ok(IntWidth::W64),
            _ => Err(SemanticError::new(
                SemanticErrorKind::InvalidWidth { bits },
                format!("uint<{bits}>"),
                location.clone(),
            )),
        }
    }

    pub const fn bits(self) -> u32 {
        match self {
            IntWidth::W8 => 8,
            IntWidth::W16 => 16,
            IntWidth::W32 => 32,
            IntWidth::W64 => 64,
        }
    }

    pub const fn bytes(self) -> usize {
        self.bits() as usize / 8
    }

    /// Largest unsigned value of this width.
    pub const fn max_unsigned(self) -> u64 {
        match self {
            IntWidth::W64 => u64::MAX,
            _ => (1u64 << self.bits()) - 1,
        }
    }

    /// Inclusive signed range of this width.
    pub const fn signed_range(self) -> (i64, i64) {
        match self {
            IntWidth::W64 => (i64::MIN, i64::MAX),
            _ => {
                let half = 1i64 << (self.bits() - 1);
                (-half, half - 1)
            }
        }
    }
}

/// One `(label, bit position)` pair of a bitset type.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct BitsetLabel {
    pub id: Id,
    pub position: u32,
}

impl BitsetLabel {
    pub fn new(id: Id, position: u32) -> Self {
        BitsetLabel { id, position }
    }
}

/// A bitset with named bits.
///
/// Labels are compared by their local name, so `Flags::A` and `A` are the
/// same label.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct BitsetType {
    width: IntWidth,
    labels: Vec<BitsetLabel>,
}

impl BitsetType {
    /// Build a bitset type, checking label uniqueness and bit positions.
    pub fn new(
        width: IntWidth,
        labels: Vec<BitsetLabel>,
        location: &Location,
    ) -> SemanticResult<Self> {
        if let Some(kind) = Self::check_labels(width, &labels) {
            return Err(SemanticError::new(kind, "bitset", location.clone()));
        }
        Ok(BitsetType { width, labels })
    }

    fn check_labels(width: IntWidth, labels: &[BitsetLabel]) -> Option<SemanticErrorKind> {
        let mut names = FxHashSet::default();
        let mut positions = FxHashSet::default();

        for label in labels {
            if label.position >= width.bits() {
                return Some(SemanticErrorKind::BitPositionOutOfRange {
                    position: label.position,
                    width: width.bits(),
                });
            }
            if !names.insert(label.id.local()) {
                return Some(SemanticErrorKind::DuplicateBitsetLabel {
                    label: label.id.local().to_owned(),
                });
            }
            if !positions.insert(label.position) {
                return Some(SemanticErrorKind::DuplicateBitPosition {
                    position: label.position,
                });
            }
        }
        None
    }

    #[inline]
    pub fn width(&self) -> IntWidth {
        self.width
    }

    /// Declared labels in declaration order.
    #[inline]
    pub fn labels(&self) -> &[BitsetLabel] {
        &self.labels
    }

    /// Bit position of the label whose local name matches `label`'s.
    pub fn position_of(&self, label: &Id) -> Option<u32> {
        self.labels
            .iter()
            .find(|l| l.id.local() == label.local())
            .map(|l| l.position)
    }

    pub fn has_label(&self, label: &Id) -> bool {
        self.position_of(label).is_some()
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StructField {
    pub id: Id,
    pub ty: TypeId,
}

/// A structure of named, ordered fields.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct StructType {
    fields: Vec<StructField>,
}

impl StructType {
    pub fn new(fields: Vec<StructField>, location: &Location) -> SemanticResult<Self> {
        let duplicate = {
            let mut seen = FxHashSet::default();
            fields
                .iter()
                .find(|f| !seen.insert(f.id.local()))
                .map(|f| f.id.local().to_owned())
        };
        if let Some(field) = duplicate {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateField { field },
                "struct",
                location.clone(),
            ));
        }
        Ok(StructType { fields })
    }

    #[inline]
    pub fn fields(&self) -> &[StructField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.id.local() == name)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Param {
    pub id: Id,
    pub ty: TypeId,
}

/// A function signature.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct FunctionType {
    pub params: Vec<Param>,
    pub result: TypeId,
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum TypeKind {
    Bool,
    UnsignedInt(IntWidth),
    SignedInt(IntWidth),
    Bytes,
    Bitset(BitsetType),
    Struct(StructType),
    Function(FunctionType),
}

/// A type node.
///
/// Anonymous types have no id. Types declared in a module receive their
/// qualified id from [`Ast::declare_type`].
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Type {
    pub(crate) id: Option<Id>,
    kind: TypeKind,
    location: Location,
}

impl Type {
    pub fn new(kind: TypeKind, location: Location) -> Self {
        Type {
            id: None,
            kind,
            location,
        }
    }

    #[inline]
    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    #[inline]
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn as_bitset(&self) -> Option<&BitsetType> {
        match &self.kind {
            TypeKind::Bitset(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&FunctionType> {
        match &self.kind {
            TypeKind::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Child types owned by this one (anonymous types only; named types are
    /// referenced, not owned).
    pub fn owned_children<'a>(&'a self, ast: &'a Ast) -> impl Iterator<Item = TypeId> + 'a {
        let ids: Vec<TypeId> = match &self.kind {
            TypeKind::Struct(s) => s.fields.iter().map(|f| f.ty).collect(),
            TypeKind::Function(f) => f
                .params
                .iter()
                .map(|p| p.ty)
                .chain(std::iter::once(f.result))
                .collect(),
            _ => Vec::new(),
        };
        ids.into_iter().filter(move |id| ast.ty(*id).id.is_none())
    }
}

/// Render a type as it appears inside another: named types by id.
fn render_reference(ast: &Ast, ty: TypeId) -> String {
    let ty = ast.ty(ty);
    match &ty.id {
        Some(id) => id.to_string(),
        None => ty.render(ast),
    }
}

fn render_named_list<'a>(
    ast: &Ast,
    out: &mut String,
    items: impl Iterator<Item = (&'a Id, TypeId)>,
) {
    for (i, (id, ty)) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{}: {}", id.local(), render_reference(ast, ty));
    }
}

impl Render for Type {
    fn render(&self, ast: &Ast) -> String {
        match &self.kind {
            TypeKind::Bool => "bool".to_owned(),
            TypeKind::UnsignedInt(w) => format!("uint<{}>", w.bits()),
            TypeKind::SignedInt(w) => format!("int<{}>", w.bits()),
            TypeKind::Bytes => "bytes".to_owned(),
            TypeKind::Bitset(b) => {
                let labels: Vec<String> = b
                    .labels
                    .iter()
                    .map(|l| format!("{}={}", l.id.local(), l.position))
                    .collect();
                format!("bitset<{}>({})", b.width.bits(), labels.join(", "))
            }
            TypeKind::Struct(s) => {
                let mut out = String::from("struct { ");
                render_named_list(ast, &mut out, s.fields.iter().map(|f| (&f.id, f.ty)));
                out.push_str(" }");
                out
            }
            TypeKind::Function(f) => {
                let mut out = String::from("function (");
                render_named_list(ast, &mut out, f.params.iter().map(|p| (&p.id, p.ty)));
                let _ = write!(out, ") -> {}", render_reference(ast, f.result));
                out
            }
        }
    }
}

impl Located for Type {
    fn location(&self) -> &Location {
        &self.location
    }
}

#[cfg(test)]
mod tests;

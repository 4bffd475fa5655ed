//! Typed literal values.
//!
//! Every constructor checks the literal against its declared type, so a
//! [`Constant`] that exists is well typed. For bitsets this means every
//! label in the literal is declared on the bitset type.

use crate::{
    combine_ids, Ast, BitsetType, Id, Located, Location, Render, SemanticError,
    SemanticErrorKind, SemanticResult, Type, TypeId, TypeKind,
};

/// The label set of a bitset literal, with its computed bit pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct BitsetConstant {
    /// Labels as written in the literal, deduplicated, in declaration order.
    labels: Vec<Id>,
    bits: u64,
}

impl BitsetConstant {
    #[inline]
    pub fn labels(&self) -> &[Id] {
        &self.labels
    }

    /// OR of `1 << position` over all labels.
    #[inline]
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.local() == label)
    }
}

#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ConstantKind {
    Bool(bool),
    UnsignedInt(u64),
    SignedInt(i64),
    Bytes(Vec<u8>),
    Bitset(BitsetConstant),
}

impl ConstantKind {
    fn literal_name(&self) -> &'static str {
        match self {
            ConstantKind::Bool(_) => "bool",
            ConstantKind::UnsignedInt(_) => "unsigned integer",
            ConstantKind::SignedInt(_) => "signed integer",
            ConstantKind::Bytes(_) => "bytes",
            ConstantKind::Bitset(_) => "bitset",
        }
    }
}

/// A literal value bound to a type. Immutable once built.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct Constant {
    pub(crate) id: Option<Id>,
    kind: ConstantKind,
    ty: TypeId,
    location: Location,
}

impl Constant {
    pub fn bool(value: bool, ty: TypeId, ast: &Ast, location: Location) -> SemanticResult<Self> {
        Self::checked(ConstantKind::Bool(value), ty, ast, location)
    }

    pub fn unsigned(value: u64, ty: TypeId, ast: &Ast, location: Location) -> SemanticResult<Self> {
        Self::checked(ConstantKind::UnsignedInt(value), ty, ast, location)
    }

    pub fn signed(value: i64, ty: TypeId, ast: &Ast, location: Location) -> SemanticResult<Self> {
        Self::checked(ConstantKind::SignedInt(value), ty, ast, location)
    }

    pub fn bytes(
        value: impl Into<Vec<u8>>,
        ty: TypeId,
        ast: &Ast,
        location: Location,
    ) -> SemanticResult<Self> {
        Self::checked(ConstantKind::Bytes(value.into()), ty, ast, location)
    }

    /// Build a bitset literal.
    ///
    /// Fails on the first label (in literal order) that `ty` does not
    /// declare, reporting that label's fully qualified path. A label scoped
    /// under some other name is undeclared and reported as written.
    pub fn bitset(
        bits: impl IntoIterator<Item = Id>,
        ty: TypeId,
        ast: &Ast,
        location: Location,
    ) -> SemanticResult<Self> {
        let declared = ast.ty(ty);
        let Some(bitset) = declared.as_bitset() else {
            return Err(kind_mismatch("bitset", declared, ast, &location));
        };

        let written: Vec<Id> = bits.into_iter().collect();
        let mut value = 0u64;
        for label in &written {
            let in_scope = label_in_scope(declared, label);
            match bitset.position_of(label).filter(|_| in_scope) {
                Some(position) => value |= 1u64 << position,
                None => {
                    let label = if in_scope {
                        qualified_label(declared, label)
                    } else {
                        label.to_string()
                    };
                    return Err(SemanticError::new(
                        SemanticErrorKind::UnknownBitsetLabel { label },
                        render_literal(declared, &written),
                        location,
                    ));
                }
            }
        }

        let labels = ordered_labels(bitset, &written);
        Ok(Constant {
            id: None,
            kind: ConstantKind::Bitset(BitsetConstant {
                labels,
                bits: value,
            }),
            ty,
            location,
        })
    }

    fn checked(
        kind: ConstantKind,
        ty: TypeId,
        ast: &Ast,
        location: Location,
    ) -> SemanticResult<Self> {
        let declared = ast.ty(ty);
        let fits = match (&kind, declared.kind()) {
            (ConstantKind::Bool(_), TypeKind::Bool) | (ConstantKind::Bytes(_), TypeKind::Bytes) => {
                Some(true)
            }
            (ConstantKind::UnsignedInt(v), TypeKind::UnsignedInt(w)) => Some(*v <= w.max_unsigned()),
            (ConstantKind::SignedInt(v), TypeKind::SignedInt(w)) => {
                let (min, max) = w.signed_range();
                Some((min..=max).contains(v))
            }
            _ => None,
        };

        match fits {
            Some(true) => Ok(Constant {
                id: None,
                kind,
                ty,
                location,
            }),
            Some(false) => {
                let value = match &kind {
                    ConstantKind::UnsignedInt(v) => v.to_string(),
                    ConstantKind::SignedInt(v) => v.to_string(),
                    _ => String::new(),
                };
                Err(SemanticError::new(
                    SemanticErrorKind::LiteralOutOfRange {
                        value: value.clone(),
                        ty: declared.render(ast),
                    },
                    value,
                    location,
                ))
            }
            None => Err(kind_mismatch(kind.literal_name(), declared, ast, &location)),
        }
    }

    #[inline]
    pub fn id(&self) -> Option<&Id> {
        self.id.as_ref()
    }

    #[inline]
    pub fn kind(&self) -> &ConstantKind {
        &self.kind
    }

    #[inline]
    pub fn ty(&self) -> TypeId {
        self.ty
    }

    pub fn as_bitset(&self) -> Option<&BitsetConstant> {
        match &self.kind {
            ConstantKind::Bitset(b) => Some(b),
            _ => None,
        }
    }
}

fn kind_mismatch(
    literal: &'static str,
    declared: &Type,
    ast: &Ast,
    location: &Location,
) -> SemanticError {
    let ty = declared.render(ast);
    SemanticError::new(
        SemanticErrorKind::LiteralKindMismatch {
            literal,
            ty: ty.clone(),
        },
        ty,
        location.clone(),
    )
}

/// A written label may be bare or scoped by a trailing part of the type's
/// qualified id: `A`, `Flags::A` and `proto::Flags::A` for `proto::Flags`.
fn label_in_scope(declared: &Type, label: &Id) -> bool {
    let components = label.components();
    let scope = &components[..components.len().saturating_sub(1)];
    if scope.is_empty() {
        return true;
    }
    declared
        .id()
        .is_some_and(|ty| ty.components().ends_with(scope))
}

/// Qualify `label` under the bitset type's declared id, if it has one.
fn qualified_label(declared: &Type, label: &Id) -> String {
    match declared.id() {
        Some(type_id) => {
            let local = Id::new(label.local(), label.location().clone());
            combine_ids(type_id, &local).to_string()
        }
        None => label.to_string(),
    }
}

/// Deduplicate the literal's labels and order them as the type declares them.
fn ordered_labels(bitset: &BitsetType, written: &[Id]) -> Vec<Id> {
    bitset
        .labels()
        .iter()
        .filter_map(|declared| {
            written
                .iter()
                .find(|l| l.local() == declared.id.local())
                .cloned()
        })
        .collect()
}

fn bitset_type_name(declared: &Type) -> String {
    declared
        .id()
        .map_or_else(|| "bitset".to_owned(), |id| id.local().to_owned())
}

fn render_literal(declared: &Type, labels: &[Id]) -> String {
    let names: Vec<&str> = labels.iter().map(Id::local).collect();
    format!("{}({})", bitset_type_name(declared), names.join("|"))
}

impl Render for Constant {
    fn render(&self, ast: &Ast) -> String {
        match &self.kind {
            ConstantKind::Bool(true) => "True".to_owned(),
            ConstantKind::Bool(false) => "False".to_owned(),
            ConstantKind::UnsignedInt(v) => v.to_string(),
            ConstantKind::SignedInt(v) => v.to_string(),
            ConstantKind::Bytes(bytes) => {
                let mut out = String::from("b\"");
                for &b in bytes {
                    for escaped in std::ascii::escape_default(b) {
                        out.push(char::from(escaped));
                    }
                }
                out.push('"');
                out
            }
            ConstantKind::Bitset(b) => render_literal(ast.ty(self.ty), &b.labels),
        }
    }
}

impl Located for Constant {
    fn location(&self) -> &Location {
        &self.location
    }
}

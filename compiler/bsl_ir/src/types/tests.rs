use super::*;

use crate::SemanticErrorKind;

fn id(path: &str) -> Id {
    Id::new(path, Location::NONE)
}

fn labels(pairs: &[(&str, u32)]) -> Vec<BitsetLabel> {
    pairs
        .iter()
        .map(|(name, pos)| BitsetLabel::new(id(name), *pos))
        .collect()
}

#[test]
fn test_width_from_bits() {
    assert_eq!(IntWidth::from_bits(16, &Location::NONE), Ok(IntWidth::W16));
    let err = IntWidth::from_bits(12, &Location::NONE);
    assert!(matches!(
        err,
        Err(SemanticError {
            kind: SemanticErrorKind::InvalidWidth { bits: 12 },
            ..
        })
    ));
}

#[test]
fn test_width_ranges() {
    assert_eq!(IntWidth::W8.max_unsigned(), 255);
    assert_eq!(IntWidth::W64.max_unsigned(), u64::MAX);
    assert_eq!(IntWidth::W8.signed_range(), (-128, 127));
    assert_eq!(IntWidth::W64.signed_range(), (i64::MIN, i64::MAX));
    assert_eq!(IntWidth::W32.bytes(), 4);
}

#[test]
fn test_bitset_type_valid() {
    let bitset = BitsetType::new(IntWidth::W8, labels(&[("A", 0), ("B", 3)]), &Location::NONE);
    let Ok(bitset) = bitset else {
        panic!("expected a valid bitset type");
    };
    assert_eq!(bitset.position_of(&id("B")), Some(3));
    assert_eq!(bitset.position_of(&id("Flags::B")), Some(3));
    assert!(!bitset.has_label(&id("C")));
}

#[test]
fn test_bitset_type_duplicate_label() {
    let err = BitsetType::new(IntWidth::W8, labels(&[("A", 0), ("A", 1)]), &Location::NONE);
    assert!(matches!(
        err,
        Err(SemanticError {
            kind: SemanticErrorKind::DuplicateBitsetLabel { .. },
            ..
        })
    ));
}

#[test]
fn test_bitset_type_duplicate_position() {
    let err = BitsetType::new(IntWidth::W8, labels(&[("A", 2), ("B", 2)]), &Location::NONE);
    assert!(matches!(
        err,
        Err(SemanticError {
            kind: SemanticErrorKind::DuplicateBitPosition { position: 2 },
            ..
        })
    ));
}

#[test]
fn test_bitset_type_position_out_of_range() {
    let err = BitsetType::new(IntWidth::W8, labels(&[("A", 8)]), &Location::NONE);
    assert!(matches!(
        err,
        Err(SemanticError {
            kind: SemanticErrorKind::BitPositionOutOfRange {
                position: 8,
                width: 8
            },
            ..
        })
    ));
}

#[test]
fn test_struct_duplicate_field() {
    let mut ast = Ast::new();
    let byte = ast.add_type(Type::new(TypeKind::UnsignedInt(IntWidth::W8), Location::NONE));
    let fields = vec![
        StructField { id: id("a"), ty: byte },
        StructField { id: id("a"), ty: byte },
    ];
    assert!(StructType::new(fields, &Location::NONE).is_err());
}

#[test]
fn test_render_types() {
    let mut ast = Ast::new();
    let Ok(module) = ast.add_module(id("m"), Location::NONE) else {
        panic!("module");
    };
    let byte = ast.add_type(Type::new(TypeKind::UnsignedInt(IntWidth::W8), Location::NONE));
    let boolean = ast.add_type(Type::new(TypeKind::Bool, Location::NONE));
    let Ok(bitset) = BitsetType::new(IntWidth::W8, labels(&[("A", 0), ("B", 3)]), &Location::NONE)
    else {
        panic!("bitset");
    };
    let Ok(flags) = ast.declare_type(
        module,
        id("Flags"),
        Type::new(TypeKind::Bitset(bitset), Location::NONE),
    ) else {
        panic!("declare");
    };
    let Ok(record) = StructType::new(
        vec![
            StructField { id: id("len"), ty: byte },
            StructField { id: id("flags"), ty: flags },
        ],
        &Location::NONE,
    ) else {
        panic!("struct");
    };
    let record = ast.add_type(Type::new(TypeKind::Struct(record), Location::NONE));
    let func = ast.add_type(Type::new(
        TypeKind::Function(FunctionType {
            params: vec![Param { id: id("x"), ty: byte }],
            result: boolean,
        }),
        Location::NONE,
    ));

    assert_eq!(ast.ty(flags).render(&ast), "bitset<8>(A=0, B=3)");
    assert_eq!(ast.ty(record).render(&ast), "struct { len: uint<8>, flags: m::Flags }");
    assert_eq!(ast.ty(func).render(&ast), "function (x: uint<8>) -> bool");
    assert_eq!(
        Type::new(TypeKind::SignedInt(IntWidth::W32), Location::NONE).render(&ast),
        "int<32>"
    );
}

#[test]
fn test_owned_children_skip_named_types() {
    let mut ast = Ast::new();
    let Ok(module) = ast.add_module(id("m"), Location::NONE) else {
        panic!("module");
    };
    let byte = ast.add_type(Type::new(TypeKind::UnsignedInt(IntWidth::W8), Location::NONE));
    let Ok(named) = ast.declare_type(module, id("Len"), Type::new(TypeKind::Bytes, Location::NONE))
    else {
        panic!("declare");
    };
    let Ok(record) = StructType::new(
        vec![
            StructField { id: id("a"), ty: byte },
            StructField { id: id("b"), ty: named },
        ],
        &Location::NONE,
    ) else {
        panic!("struct");
    };
    let record = Type::new(TypeKind::Struct(record), Location::NONE);
    let children: Vec<TypeId> = record.owned_children(&ast).collect();
    assert_eq!(children, vec![byte]);
}

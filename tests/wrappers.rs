//! Reflection-shaped queries and attribute data through the public API.

use std::collections::HashSet;

use metascope::prelude::*;

fn catalog() -> SymbolGraph {
    SymbolGraphBuilder::new("Contoso.Catalog")
        .add_type(
            TypeBuilder::enumeration("Contoso.Catalog", "Unit")
                .enum_member("Piece", 0)
                .enum_member("Kilogram", 1)
                .build(),
        )
        .add_type(
            TypeBuilder::class("Contoso.Catalog", "Product")
                .property(
                    PropertyDecl::auto("Sku", "string", Visibility::Public).attribute(
                        AttributeDecl::new("Contoso.Catalog.ColumnAttribute")
                            .arg(AttributeExpr::Literal(ConstValue::String("sku".into())))
                            .arg(AttributeExpr::Literal(ConstValue::I4(32)))
                            .named_arg("Nullable", AttributeExpr::Literal(ConstValue::Bool(false))),
                    ),
                )
                .property(
                    PropertyDecl::auto("Unit", "Contoso.Catalog.Unit", Visibility::Public)
                        .attribute(AttributeDecl::new("Contoso.Catalog.ColumnAttribute").arg(
                            AttributeExpr::Array {
                                element: TypeRef::new("Contoso.Catalog.Unit"),
                                items: vec![
                                    AttributeExpr::EnumMember {
                                        enum_type: TypeRef::new("Contoso.Catalog.Unit"),
                                        member: "Piece".into(),
                                    },
                                    AttributeExpr::EnumMember {
                                        enum_type: TypeRef::new("Contoso.Catalog.Unit"),
                                        member: "Kilogram".into(),
                                    },
                                ],
                            },
                        )),
                )
                .property(
                    PropertyDecl::auto("Stamp", "long", Visibility::Public)
                        .attribute(
                            AttributeDecl::new("Contoso.Catalog.ColumnAttribute")
                                .arg(AttributeExpr::Expression("DateTime.Now.Ticks".into())),
                        )
                        .attribute(AttributeDecl::new("System.ObsoleteAttribute")),
                )
                .method(
                    MethodDecl::new("Reprice", "decimal", Visibility::Internal)
                        .parameter(ParamDecl::new("factor", "double")),
                )
                .build(),
        )
        .add_type(
            TypeBuilder::class("Contoso.Catalog", "ColumnAttribute")
                .extends(TypeRef::new("System.Attribute"))
                .build(),
        )
        .build()
}

#[test]
fn constant_arguments() {
    let context = LoadContext::new(catalog()).unwrap();
    let product = context.find_type("Contoso.Catalog.Product").unwrap();
    let sku = product.find_property("Sku").unwrap().unwrap();

    let columns = attributes_of_type(&sku, "Column").unwrap();
    assert_eq!(columns.len(), 1);
    let column = &columns[0];
    assert!(column.is_constant());
    assert!(column.attribute_type().is_resolved());
    assert!(column.attribute_type().is_assignable_to("System.Attribute").unwrap());

    let arguments = column.constructor_arguments().unwrap();
    assert_eq!(arguments, [TypedConstant::String("sku".into()), TypedConstant::I4(32)]);
    assert_eq!(column.named_arguments().unwrap()["Nullable"].as_bool(), Some(false));
}

#[test]
fn enum_arrays_keep_values() {
    let context = LoadContext::new(catalog()).unwrap();
    let product = context.find_type("Contoso.Catalog.Product").unwrap();
    let unit = product.find_property("Unit").unwrap().unwrap();

    let column = &unit.attributes().unwrap()[0];
    let TypedConstant::Array(items) = &column.constructor_arguments().unwrap()[0] else {
        panic!("expected an array argument");
    };
    let values: Vec<Option<i64>> = items.iter().map(TypedConstant::as_i64).collect();
    assert_eq!(values, [Some(0), Some(1)]);
    assert_eq!(
        column.constructor_arguments().unwrap()[0].to_string(),
        "[Contoso.Catalog.Unit.Piece, Contoso.Catalog.Unit.Kilogram]"
    );
}

#[test]
fn non_constant_arguments_stay_in_place() {
    let context = LoadContext::new(catalog()).unwrap();
    let product = context.find_type("Contoso.Catalog.Product").unwrap();
    let stamp = product.find_property("Stamp").unwrap().unwrap();

    let attributes = stamp.attributes().unwrap();
    assert_eq!(attributes.len(), 2);
    assert!(!attributes[0].is_constant());
    assert!(matches!(
        attributes[0].constructor_arguments(),
        Err(Error::NonConstantArgument { .. })
    ));
    assert!(attributes[1].is("Obsolete"));
    assert!(attributes[1].is_constant());
}

#[test]
fn members_through_the_trait() {
    let context = LoadContext::new(catalog()).unwrap();
    let product = context.find_type("Contoso.Catalog.Product").unwrap();

    let internal = product
        .methods_with(BindingFlags::NON_PUBLIC | BindingFlags::INSTANCE)
        .unwrap();
    assert_eq!(internal.len(), 1);

    let reprice: &dyn MemberInfo = &internal[0];
    assert_eq!(reprice.name(), "Reprice");
    assert_eq!(reprice.member_kind(), MemberKind::Method);
    assert_eq!(reprice.visibility(), Visibility::Internal);
    assert!(!reprice.is_static());

    let key = reprice.symbol_key().unwrap();
    let wrapper = context.resolve(key).unwrap();
    assert_eq!(wrapper.as_member().name(), "Reprice");
    assert!(wrapper.into_method().unwrap().ptr_eq(&internal[0]));
}

#[test]
fn wrappers_hash_by_identity() {
    let context = LoadContext::new(catalog()).unwrap();
    let product = context.find_type("Contoso.Catalog.Product").unwrap();

    let mut seen = HashSet::new();
    for property in product.properties().unwrap() {
        seen.insert(property.property_type().unwrap());
    }
    for property in product.properties().unwrap() {
        assert!(!seen.insert(property.property_type().unwrap()));
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn contexts_do_not_share_wrappers() {
    let first = LoadContext::new(catalog()).unwrap();
    let second = LoadContext::new(catalog()).unwrap();

    let a = first.find_type("Contoso.Catalog.Product").unwrap();
    let b = second.find_type("Contoso.Catalog.Product").unwrap();

    assert_eq!(a.symbol_key(), b.symbol_key());
    assert_ne!(a, b);
    assert_ne!(first.id(), second.id());
}

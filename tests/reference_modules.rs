//! Precompiled reference modules: emitting, loading and resolving into them.

use metascope::prelude::*;

fn models() -> SymbolGraph {
    SymbolGraphBuilder::new("Contoso.Models")
        .version(AssemblyVersion::new(1, 2, 0, 0))
        .module_attribute(
            AttributeDecl::new("System.Reflection.AssemblyTitleAttribute")
                .arg(AttributeExpr::Literal(ConstValue::String("Models".into()))),
        )
        .add_type(
            TypeBuilder::enumeration("Contoso.Models", "CustomerKind")
                .enum_member("Retail", 0)
                .enum_member("Wholesale", 1)
                .build(),
        )
        .add_type(
            TypeBuilder::class("Contoso.Models", "Customer")
                .property(
                    PropertyDecl::auto("Kind", "Contoso.Models.CustomerKind", Visibility::Public)
                        .attribute(AttributeDecl::new("Contoso.Models.DefaultAttribute").arg(
                            AttributeExpr::EnumMember {
                                enum_type: TypeRef::new("Contoso.Models.CustomerKind"),
                                member: "Wholesale".into(),
                            },
                        )),
                )
                .field(
                    FieldDecl::new("cache", "object", Visibility::Private)
                        .attribute(AttributeDecl::new("System.NonSerializedAttribute")),
                )
                .build(),
        )
        .build()
}

fn app() -> SymbolGraph {
    SymbolGraphBuilder::new("Contoso.App").build()
}

#[test]
fn identity_is_readable_from_the_header() {
    let bytes = ModuleWriter::emit(&models()).unwrap();
    let identity = ModuleImage::peek_identity(&bytes).unwrap();

    assert_eq!(identity.name, "Contoso.Models");
    assert_eq!(identity.version, AssemblyVersion::new(1, 2, 0, 0));
    assert!(identity.is_culture_neutral());
}

#[test]
fn loaded_module_behaves_like_source() {
    let bytes = ModuleWriter::emit(&models()).unwrap();
    let context = LoadContext::builder()
        .primary(app())
        .reference_bytes(bytes)
        .build()
        .unwrap();

    let modules = context.reference_modules();
    assert_eq!(modules.len(), 1);
    assert_eq!(
        context.module_identity(modules[0]).unwrap().display_name(),
        "Contoso.Models, Version=1.2.0.0, Culture=neutral"
    );

    let title = context.module_attributes(modules[0]).unwrap();
    assert!(title[0].is("AssemblyTitle"));
    assert_eq!(
        title[0].constructor_arguments().unwrap()[0].as_str(),
        Some("Models")
    );

    let customer = context.find_type("Contoso.Models.Customer").unwrap();
    let kind = &customer.properties().unwrap()[0];
    assert!(kind.property_type().unwrap().is_enum());

    let default = &kind.attributes().unwrap()[0];
    assert!(!default.attribute_type().is_resolved());
    match &default.constructor_arguments().unwrap()[0] {
        TypedConstant::Enum { enum_type, member, value } => {
            assert_eq!(enum_type.full_name(), "Contoso.Models.CustomerKind");
            assert_eq!(member, "Wholesale");
            assert_eq!(*value, Some(1));
        }
        other => panic!("unexpected argument {other:?}"),
    }

    let cache = &customer.fields().unwrap()[0];
    assert!(has_attribute(cache, "System.NonSerialized").unwrap());
    assert_eq!(cache.field_type().unwrap().full_name(), "System.Object");
}

#[test]
fn loading_twice_is_a_no_op() {
    let bytes = ModuleWriter::emit(&models()).unwrap();
    let context = LoadContext::new(app()).unwrap();

    let first = context.load_module(&bytes).unwrap();
    let second = context.load_module(&bytes).unwrap();

    assert_eq!(first, second);
    assert_eq!(context.reference_modules().len(), 1);
    assert_eq!(context.load_report().success_count(), 2);
}

#[test]
fn truncated_body_names_the_module() {
    let bytes = ModuleWriter::emit(&models()).unwrap();
    let truncated = &bytes[..bytes.len() - 3];

    let context = LoadContext::new(app()).unwrap();
    assert!(matches!(
        context.load_module(truncated),
        Err(Error::ModuleLoad { module: Some(_), .. })
    ));

    let report = context.load_report();
    assert_eq!(report.failure_count(), 1);
    assert!(report.has_failures());

    let customer = context
        .resolve_type_ref(&TypeRef::with_assembly("Contoso.Models.Customer", "Contoso.Models"))
        .unwrap();
    assert!(!customer.is_resolved());
    assert!(customer.unresolved_reason().unwrap().contains("failed to load"));
}

#[test]
fn unreadable_header_is_anonymous() {
    let context = LoadContext::new(app()).unwrap();

    assert!(matches!(
        context.load_module(b"NOPE"),
        Err(Error::ModuleLoad { module: None, .. })
    ));
    assert!(matches!(
        ModuleImage::peek_identity(b"MSYM\x02\x00"),
        Err(Error::NotSupported(2))
    ));
    assert!(context.primary_types().unwrap().is_empty());
}

#[test]
fn strict_options_fail_the_build() {
    let result = LoadContext::builder()
        .primary(app())
        .reference_bytes(b"NOPE".to_vec())
        .options(LoadOptions::strict())
        .build();

    assert!(matches!(result, Err(Error::ModuleLoad { .. })));
}

#[test]
fn expressions_cannot_be_emitted() {
    let graph = SymbolGraphBuilder::new("Broken")
        .add_type(
            TypeBuilder::class("N", "T")
                .attribute(
                    AttributeDecl::new("N.TagAttribute")
                        .arg(AttributeExpr::Expression("Environment.TickCount".into())),
                )
                .build(),
        )
        .build();

    assert!(matches!(
        ModuleWriter::emit(&graph),
        Err(Error::NonConstantArgument { .. })
    ));
}

#[test]
fn module_loaded_mid_session_is_seen_by_discovery() {
    let graph = SymbolGraphBuilder::new("Contoso.App")
        .add_type(
            TypeBuilder::class("Contoso.App", "Wiring")
                .attribute(
                    AttributeDecl::new("System.Text.Json.Serialization.JsonSerializableAttribute")
                        .arg(AttributeExpr::TypeOf(TypeRef::new("Contoso.Models.Customer"))),
                )
                .build(),
        )
        .build();
    let context = LoadContext::new(graph).unwrap();

    let first = discover(&context, &DiscoveryOptions::default()).unwrap();
    assert!(first.is_empty());
    assert!(matches!(
        first.diagnostics.as_slice(),
        [Error::UnresolvableReference { .. }]
    ));
    assert!(context.find_type("Contoso.Models.Customer").is_none());

    context
        .load_module(&ModuleWriter::emit(&models()).unwrap())
        .unwrap();

    let second = discover(&context, &DiscoveryOptions::default()).unwrap();
    assert!(!second.has_diagnostics(), "{:?}", second.diagnostics);
    let customer = second.get("Customer").unwrap();
    assert_eq!(customer.assembly().unwrap().name, "Contoso.Models");
    assert!(customer.ptr_eq(&context.find_type("Contoso.Models.Customer").unwrap()));
}

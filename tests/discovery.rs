//! End-to-end discovery over a primary compilation unit and precompiled reference modules.
//!
//! The primary unit mirrors:
//!
//! ```csharp
//! [assembly: JsonSerializable(typeof(Contoso.Models.Customer))]
//!
//! namespace Contoso.App
//! {
//!     [JsonSerializable]
//!     public class Order
//!     {
//!         public int Id { get; set; }
//!         public Contoso.Models.Customer Buyer { get; set; }
//!         [JsonIgnore] public string Notes { get; set; }
//!     }
//!
//!     [JsonSerializable(typeof(Contoso.Models.Address))]
//!     public class Registry { }
//! }
//! ```

use metascope::prelude::*;

const MARKER: &str = "System.Text.Json.Serialization.JsonSerializableAttribute";
const IGNORE: &str = "System.Text.Json.Serialization.JsonIgnoreAttribute";

fn models_image() -> Vec<u8> {
    let graph = SymbolGraphBuilder::new("Contoso.Models")
        .version(AssemblyVersion::new(1, 2, 0, 0))
        .add_type(
            TypeBuilder::class("Contoso.Models", "Address")
                .property(PropertyDecl::auto("Street", "string", Visibility::Public))
                .property(PropertyDecl::auto("City", "string", Visibility::Public))
                .build(),
        )
        .add_type(
            TypeBuilder::class("Contoso.Models", "Customer")
                .property(PropertyDecl::auto("Name", "string", Visibility::Public))
                .property(PropertyDecl::auto(
                    "HomeAddress",
                    "Contoso.Models.Address",
                    Visibility::Public,
                ))
                .build(),
        )
        .build();
    ModuleWriter::emit(&graph).unwrap()
}

fn app_graph() -> SymbolGraph {
    SymbolGraphBuilder::new("Contoso.App")
        .module_attribute(
            AttributeDecl::new(MARKER).arg(AttributeExpr::TypeOf(TypeRef::with_assembly(
                "Contoso.Models.Customer",
                "Contoso.Models",
            ))),
        )
        .add_type(
            TypeBuilder::class("Contoso.App", "Order")
                .attribute(AttributeDecl::new(MARKER))
                .property(PropertyDecl::auto("Id", "int", Visibility::Public))
                .property(PropertyDecl::auto("Buyer", "Contoso.Models.Customer", Visibility::Public))
                .property(
                    PropertyDecl::auto("Notes", "string", Visibility::Public)
                        .attribute(AttributeDecl::new(IGNORE)),
                )
                .build(),
        )
        .add_type(
            TypeBuilder::class("Contoso.App", "Registry")
                .attribute(
                    AttributeDecl::new(MARKER)
                        .arg(AttributeExpr::TypeOf(TypeRef::new("Contoso.Models.Address"))),
                )
                .build(),
        )
        .build()
}

fn property_names(ty: &TypeWrapper) -> Vec<String> {
    ty.properties()
        .unwrap()
        .iter()
        .map(|property| property.name().to_string())
        .collect()
}

#[test]
fn discovers_across_modules() {
    let context = LoadContext::builder()
        .primary(app_graph())
        .reference_bytes(models_image())
        .build()
        .unwrap();

    let result = discover(&context, &DiscoveryOptions::default()).unwrap();
    assert!(!result.has_diagnostics(), "{:?}", result.diagnostics);

    let names: Vec<&str> = result.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["Customer", "Order", "Address"]);

    let customer = result.get("Customer").unwrap();
    assert_eq!(customer.assembly().unwrap().name, "Contoso.Models");
    assert!(!customer.module().unwrap().is_primary());
    assert_eq!(property_names(customer), ["Name", "HomeAddress"]);

    let address = customer.properties().unwrap()[1].property_type().unwrap();
    assert!(address.ptr_eq(result.get("Address").unwrap()));
    assert_eq!(property_names(&address), ["Street", "City"]);

    let order = result.get("Order").unwrap();
    let buyer = order.find_property("Buyer").unwrap().unwrap();
    assert!(buyer.property_type().unwrap().ptr_eq(customer));

    let serialized: Vec<&str> = order
        .properties()
        .unwrap()
        .iter()
        .filter(|property| !has_attribute(*property, "JsonIgnore").unwrap())
        .map(|property| property.name())
        .collect();
    assert_eq!(serialized, ["Id", "Buyer"]);

    let report = context.close();
    assert!(report.is_complete_success());
    assert_eq!(report.success_count(), 2);
}

#[test]
fn missing_reference_is_a_diagnostic() {
    let context = LoadContext::new(app_graph()).unwrap();
    let result = discover(&context, &DiscoveryOptions::default()).unwrap();

    assert_eq!(result.len(), 1);
    assert!(result.get("Order").is_some());
    assert_eq!(result.diagnostics.len(), 2);
    assert!(result.diagnostics.iter().all(|diagnostic| matches!(
        diagnostic,
        Error::UnresolvableReference { .. }
    )));

    let buyer = result.get("Order").unwrap().find_property("Buyer").unwrap().unwrap();
    let customer = buyer.property_type().unwrap();
    assert!(!customer.is_resolved());
    assert_eq!(customer.full_name(), "Contoso.Models.Customer");
    assert!(customer.properties().unwrap().is_empty());
}

#[test]
fn run_discovery_reports_broken_references() {
    let garbage: &[u8] = &[0x4D, 0x53, 0x59, 0x4D, 0xFF];
    let image = models_image();

    let (found, failed) = run_discovery(
        app_graph(),
        &[garbage, image.as_slice()],
        &DiscoveryOptions::default(),
        |result, context| (result.len(), context.load_report().failure_count()),
    )
    .unwrap();

    assert_eq!(found, 3);
    assert_eq!(failed, 1);
}

#[test]
fn wrappers_fail_after_the_pass() {
    let order = run_discovery(app_graph(), &[], &DiscoveryOptions::default(), |result, _| {
        result.get("Order").cloned()
    })
    .unwrap()
    .unwrap();

    assert_eq!(order.full_name(), "Contoso.App.Order");
    assert!(matches!(order.properties(), Err(Error::ContextClosed)));
}

#[test]
fn duplicate_simple_names() {
    let graph = SymbolGraphBuilder::new("App")
        .add_type(
            TypeBuilder::class("Sales", "Item")
                .attribute(AttributeDecl::new(MARKER))
                .build(),
        )
        .add_type(
            TypeBuilder::class("Stock", "Item")
                .attribute(AttributeDecl::new(MARKER))
                .build(),
        )
        .build();
    let context = LoadContext::new(graph).unwrap();

    let first = discover(&context, &DiscoveryOptions::default()).unwrap();
    assert_eq!(first.get("Item").unwrap().full_name(), "Sales.Item");
    assert!(matches!(
        first.diagnostics.as_slice(),
        [Error::DuplicateDiscoveredName { .. }]
    ));

    let rejected = discover(&context, &DiscoveryOptions::default().reject_duplicates()).unwrap();
    assert!(rejected.is_empty());
    assert_eq!(rejected.diagnostics.len(), 2);
}

#[test]
fn parallel_walk_matches_sequential() {
    let context = LoadContext::builder()
        .primary(app_graph())
        .reference_bytes(models_image())
        .build()
        .unwrap();

    let sequential = discover(&context, &DiscoveryOptions::default()).unwrap();
    let parallel = discover(&context, &DiscoveryOptions::default().parallel()).unwrap();

    assert!(sequential.iter().eq(parallel.iter()));
}

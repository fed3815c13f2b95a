// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

use rayon::prelude::*;
use tracing::debug;

use crate::{
    discovery::{result::Collector, DiscoveryOptions, DiscoveryResult},
    metadata::{
        customattributes::{AttributeData, TypedConstant},
        loadcontext::ModuleId,
        symbols::SymbolSource,
        wrappers::TypeWrapper,
    },
    Error, LoadContext, LoadContextBuilder, Result,
};

enum Finding {
    Found(TypeWrapper),
    Diagnostic(Error),
}

/// Interpret one marker application found on `carrier`.
///
/// Without arguments the carrier itself is discovered (`carrier_type` is `None` for module-level
/// markers, which need a type argument). With a `typeof` argument only the referenced type is.
fn marker_finding(
    attribute: &AttributeData,
    carrier: &str,
    carrier_type: Option<&TypeWrapper>,
) -> Finding {
    let arguments = match attribute.constructor_arguments() {
        Ok(arguments) => arguments,
        Err(error) => return Finding::Diagnostic(error),
    };

    match (arguments.first(), carrier_type) {
        (None, Some(carrier_type)) => Finding::Found(carrier_type.clone()),
        (None, None) => Finding::Diagnostic(Error::UnexpectedMarkerArgument {
            carrier: carrier.to_string(),
            found: "no type argument on a module-level marker".to_string(),
        }),
        (Some(TypedConstant::Type(target)), _) => target
            .unresolved_error()
            .map_or_else(|| Finding::Found(target.clone()), Finding::Diagnostic),
        (Some(other), _) => Finding::Diagnostic(Error::UnexpectedMarkerArgument {
            carrier: carrier.to_string(),
            found: format!("{} {}", other.kind_name(), other),
        }),
    }
}

fn scan_type(wrapper: &TypeWrapper, marker: &str) -> Result<Vec<Finding>> {
    Ok(wrapper
        .attributes()?
        .iter()
        .filter(|attribute| attribute.is(marker))
        .map(|attribute| marker_finding(attribute, wrapper.full_name(), Some(wrapper)))
        .collect())
}

/// Find every type opted into generation by the marker attribute.
///
/// Module-level markers are read first, then every type of the primary compilation unit in
/// declaration order. A marker without arguments discovers the type carrying it; a marker with
/// a `typeof(T)` argument discovers `T`, which may live in a reference module. Reference
/// module types are never scanned for markers themselves.
///
/// Every problem short of a closed context is recorded in
/// [`DiscoveryResult::diagnostics`] and the walk continues.
///
/// # Errors
/// Returns [`Error::ContextClosed`] if the context is torn down during the walk.
///
/// # Examples
///
/// ```rust
/// use metascope::prelude::*;
///
/// let graph = SymbolGraphBuilder::new("App")
///     .add_type(
///         TypeBuilder::class("Contoso", "Person")
///             .attribute(AttributeDecl::new("System.Text.Json.Serialization.JsonSerializableAttribute"))
///             .build(),
///     )
///     .add_type(TypeBuilder::class("Contoso", "Plain").build())
///     .build();
/// let context = LoadContext::new(graph)?;
///
/// let result = discover(&context, &DiscoveryOptions::default())?;
/// assert_eq!(result.len(), 1);
/// assert_eq!(result.get("Person").expect("discovered").full_name(), "Contoso.Person");
/// # Ok::<(), metascope::Error>(())
/// ```
pub fn discover(context: &LoadContext, options: &DiscoveryOptions) -> Result<DiscoveryResult> {
    let marker = options.marker.as_str();
    let mut collector = Collector::new(options.duplicate_policy);
    let carrier = context.primary_identity().name.clone();

    for attribute in context
        .module_attributes(ModuleId::PRIMARY)?
        .iter()
        .filter(|attribute| attribute.is(marker))
    {
        record(&mut collector, marker_finding(attribute, &carrier, None));
    }

    let types = context.primary_types()?;
    let findings = if options.parallel {
        types
            .par_iter()
            .map(|wrapper| scan_type(wrapper, marker))
            .collect::<Result<Vec<_>>>()?
    } else {
        types
            .iter()
            .map(|wrapper| scan_type(wrapper, marker))
            .collect::<Result<Vec<_>>>()?
    };

    for finding in findings.into_iter().flatten() {
        record(&mut collector, finding);
    }

    let result = collector.finish();
    debug!(
        context = context.id(),
        scanned = types.len(),
        discovered = result.len(),
        diagnostics = result.diagnostics.len(),
        parallel = options.parallel,
        "discovery finished"
    );
    Ok(result)
}

fn record(collector: &mut Collector, finding: Finding) {
    match finding {
        Finding::Found(wrapper) => collector.found(wrapper),
        Finding::Diagnostic(error) => collector.diagnostic(error),
    }
}

/// Run one complete discovery pass over `primary`.
///
/// Builds a [`LoadContext`] with the given reference module images, discovers, and hands the
/// result together with the still-open context to `consume`. The context is closed on every
/// exit path, so wrappers escaping `consume` can only answer name-level queries afterwards.
///
/// # Errors
/// Returns [`Error::ContextClosed`] only if `consume` causes a teardown. Reference modules that
/// fail to load are recorded in the context's load report and do not fail the pass.
///
/// # Examples
///
/// ```rust
/// use metascope::prelude::*;
///
/// let graph = SymbolGraphBuilder::new("App")
///     .add_type(
///         TypeBuilder::class("Contoso", "Order")
///             .attribute(AttributeDecl::new("JsonSerializable"))
///             .property(PropertyDecl::auto("Id", "int", Visibility::Public))
///             .build(),
///     )
///     .build();
///
/// let names = run_discovery(graph, &[], &DiscoveryOptions::default(), |result, _| {
///     let order = result.get("Order").expect("discovered");
///     order
///         .properties()
///         .map(|properties| properties.iter().map(|p| p.name().to_string()).collect::<Vec<_>>())
/// })??;
/// assert_eq!(names, ["Id"]);
/// # Ok::<(), metascope::Error>(())
/// ```
pub fn run_discovery<S, F, R>(
    primary: S,
    references: &[&[u8]],
    options: &DiscoveryOptions,
    consume: F,
) -> Result<R>
where
    S: SymbolSource + 'static,
    F: FnOnce(&DiscoveryResult, &LoadContext) -> R,
{
    let context = references
        .iter()
        .fold(LoadContextBuilder::new().primary(primary), |builder, data| {
            builder.reference_bytes(*data)
        })
        .build()?;

    let result = discover(&context, options)?;
    let output = consume(&result, &context);

    let report = context.close();
    debug!(
        loaded = report.success_count(),
        failed = report.failure_count(),
        "discovery pass complete"
    );
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        discovery::DuplicatePolicy,
        metadata::symbols::{
            AttributeDecl, AttributeExpr, ConstValue, SymbolGraph, SymbolGraphBuilder, TypeBuilder,
            TypeRef,
        },
        test::fixtures::{marked, my_type_graph},
    };

    #[test]
    fn direct_marker() {
        let context = LoadContext::new(my_type_graph()).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();

        assert_eq!(result.len(), 1);
        let my_type = result.get("MyType").unwrap();
        assert_eq!(my_type.full_name(), "Contoso.Samples.MyType");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn indirect_marker_discovers_argument_only() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(
                TypeBuilder::class("App", "Context")
                    .attribute(marked().arg(AttributeExpr::TypeOf(TypeRef::new("App.Target"))))
                    .build(),
            )
            .add_type(TypeBuilder::class("App", "Target").build())
            .build();
        let context = LoadContext::new(graph).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();

        let names: Vec<_> = result.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["Target"]);
    }

    #[test]
    fn module_level_marker() {
        let graph = SymbolGraphBuilder::new("App")
            .module_attribute(marked().arg(AttributeExpr::TypeOf(TypeRef::new("App.Target"))))
            .module_attribute(marked())
            .add_type(TypeBuilder::class("App", "Target").build())
            .build();
        let context = LoadContext::new(graph).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();

        assert!(result.get("Target").is_some());
        assert_eq!(result.diagnostics.len(), 1);
        assert!(matches!(
            &result.diagnostics[0],
            Error::UnexpectedMarkerArgument { carrier, .. } if carrier == "App"
        ));
    }

    #[test]
    fn non_type_argument_is_diagnosed() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(
                TypeBuilder::class("App", "Odd")
                    .attribute(marked().arg(AttributeExpr::Literal(ConstValue::I4(3))))
                    .build(),
            )
            .build();
        let context = LoadContext::new(graph).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();

        assert!(result.is_empty());
        match &result.diagnostics[0] {
            Error::UnexpectedMarkerArgument { carrier, found } => {
                assert_eq!(carrier, "App.Odd");
                assert_eq!(found, "integer 3");
            }
            other => panic!("expected UnexpectedMarkerArgument, got {other:?}"),
        }
    }

    #[test]
    fn unresolved_target_is_diagnosed() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(
                TypeBuilder::class("App", "Context")
                    .attribute(marked().arg(AttributeExpr::TypeOf(TypeRef::with_assembly(
                        "Fabrikam.Invoice",
                        "Fabrikam",
                    ))))
                    .build(),
            )
            .build();
        let context = LoadContext::new(graph).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();

        assert!(result.is_empty());
        assert!(matches!(
            &result.diagnostics[0],
            Error::UnresolvableReference { name, assembly: Some(assembly), .. }
                if name == "Fabrikam.Invoice" && assembly == "Fabrikam"
        ));
    }

    fn colliding_graph() -> SymbolGraph {
        SymbolGraphBuilder::new("App")
            .add_type(TypeBuilder::class("First", "Item").attribute(marked()).build())
            .add_type(TypeBuilder::class("Second", "Item").attribute(marked()).build())
            .add_type(TypeBuilder::class("Third", "Other").attribute(marked()).build())
            .add_type(
                TypeBuilder::class("Third", "Again")
                    .attribute(marked().arg(AttributeExpr::TypeOf(TypeRef::new("Third.Other"))))
                    .build(),
            )
            .build()
    }

    #[test]
    fn duplicate_first_wins() {
        let context = LoadContext::new(colliding_graph()).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();

        assert_eq!(result.get("Item").unwrap().full_name(), "First.Item");
        assert_eq!(result.len(), 2);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(
            result.diagnostics[0],
            Error::DuplicateDiscoveredName {
                name: "Item".into(),
                kept: "First.Item".into(),
                dropped: "Second.Item".into(),
            }
        );
    }

    #[test]
    fn duplicate_reject() {
        let context = LoadContext::new(colliding_graph()).unwrap();
        let options = DiscoveryOptions::default().reject_duplicates();
        assert_eq!(options.duplicate_policy, DuplicatePolicy::Reject);
        let result = discover(&context, &options).unwrap();

        assert!(result.get("Item").is_none());
        assert!(result.get("Other").is_some());
        assert_eq!(result.diagnostics.len(), 2);
    }

    #[test]
    fn repeated_findings_are_diagnosed_once() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(TypeBuilder::class("First", "Item").attribute(marked()).build())
            .add_type(TypeBuilder::class("Second", "Item").attribute(marked()).build())
            .add_type(
                TypeBuilder::class("Third", "Ctx")
                    .attribute(marked().arg(AttributeExpr::TypeOf(TypeRef::new("First.Item"))))
                    .attribute(marked().arg(AttributeExpr::TypeOf(TypeRef::new("Second.Item"))))
                    .build(),
            )
            .build();
        let context = LoadContext::new(graph).unwrap();

        let first_wins = discover(&context, &DiscoveryOptions::default()).unwrap();
        assert_eq!(first_wins.get("Item").unwrap().full_name(), "First.Item");
        assert_eq!(first_wins.diagnostics.len(), 1);

        let rejected = discover(&context, &DiscoveryOptions::default().reject_duplicates()).unwrap();
        assert!(rejected.is_empty());
        let dropped: Vec<&str> = rejected
            .diagnostics
            .iter()
            .map(|diagnostic| match diagnostic {
                Error::DuplicateDiscoveredName { dropped, .. } => dropped.as_str(),
                other => panic!("unexpected diagnostic {other:?}"),
            })
            .collect();
        assert_eq!(dropped, ["First.Item", "Second.Item"]);
    }

    #[test]
    fn marker_namespace_must_match_declared_types() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(TypeBuilder::class("", "JsonSerializableAttribute").build())
            .add_type(
                TypeBuilder::class("App", "Lookalike")
                    .attribute(AttributeDecl::new("JsonSerializableAttribute"))
                    .build(),
            )
            .build();
        let context = LoadContext::new(graph).unwrap();
        assert!(discover(&context, &DiscoveryOptions::default()).unwrap().is_empty());

        let unbound = SymbolGraphBuilder::new("App")
            .add_type(
                TypeBuilder::class("App", "Bare")
                    .attribute(AttributeDecl::new("JsonSerializable"))
                    .build(),
            )
            .build();
        let context = LoadContext::new(unbound).unwrap();
        let result = discover(&context, &DiscoveryOptions::default()).unwrap();
        assert!(result.get("Bare").is_some());
    }

    #[test]
    fn parallel_matches_sequential() {
        let context = LoadContext::new(colliding_graph()).unwrap();
        let sequential = discover(&context, &DiscoveryOptions::default()).unwrap();
        let parallel = discover(&context, &DiscoveryOptions::default().parallel()).unwrap();

        assert!(sequential.types.iter().eq(parallel.types.iter()));
        assert_eq!(sequential.diagnostics, parallel.diagnostics);
    }

    #[test]
    fn custom_marker() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(
                TypeBuilder::class("App", "Shape")
                    .attribute(AttributeDecl::new("Contoso.GenerateShapeAttribute"))
                    .attribute(marked())
                    .build(),
            )
            .build();
        let context = LoadContext::new(graph).unwrap();

        let result = discover(&context, &DiscoveryOptions::with_marker("GenerateShape")).unwrap();
        assert_eq!(result.len(), 1);
        let result = discover(&context, &DiscoveryOptions::with_marker("Other.GenerateShape")).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn run_discovery_closes_context() {
        let escaped = run_discovery(
            my_type_graph(),
            &[],
            &DiscoveryOptions::default(),
            |result, context| {
                assert_eq!(context.load_report().failure_count(), 0);
                result.get("MyType").cloned()
            },
        )
        .unwrap()
        .unwrap();

        assert_eq!(escaped.name(), "MyType");
        assert!(matches!(escaped.properties(), Err(Error::ContextClosed)));
    }

    #[test]
    fn run_discovery_tolerates_broken_references() {
        let result = run_discovery(
            my_type_graph(),
            &[&[0x4D, 0x53][..], &b"garbage"[..]],
            &DiscoveryOptions::default(),
            |result, context| (result.len(), context.load_report().failure_count()),
        )
        .unwrap();
        assert_eq!(result, (1, 2));
    }
}

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

//! By-name type reference resolution across the modules of a context.
//!
//! Lookup order for a reference written in module `from`:
//!
//! 1. `from` itself
//! 2. the primary compilation unit
//! 3. reference modules in load order, restricted to modules whose identity matches the
//!    reference's assembly hint when one is given
//! 4. the built-in core library
//!
//! A reference nothing satisfies becomes an unresolved [`TypeWrapper`] carrying the reason, so
//! a single missing dependency never aborts the caller.

use tracing::warn;

use crate::{
    metadata::{
        loadcontext::{
            context::{ContextShared, ModuleState},
            layout::ModuleLayout,
            ModuleId, SymbolKey,
        },
        symbols::TypeRef,
        typesystem::canonical_type_name,
        wrappers::TypeWrapper,
    },
    Result,
};

impl ContextShared {
    /// Resolve `reference` as written in module `from`.
    ///
    /// Results are cached per `(from, reference)`, so the same reference yields the same
    /// wrapper. Unresolved results only live until the next reference module is registered
    /// or fails; the lookup then runs again.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context was torn down.
    pub(crate) fn resolve_type_ref(&self, from: ModuleId, reference: &TypeRef) -> Result<TypeWrapper> {
        self.ensure_open()?;

        let cache_key = (from, reference.clone());
        if let Some(hit) = self.type_refs.get(&cache_key) {
            return Ok(hit.value().clone());
        }

        let full_name = canonical_type_name(&reference.full_name);
        loop {
            let generation = self.generation();
            let wrapper = match self.locate_type(from, &full_name, reference.assembly.as_deref()) {
                Ok(key) => self.resolve_type(key)?,
                Err(reason) => {
                    warn!(
                        reference = %reference,
                        module = %from,
                        %reason,
                        "unresolved type reference"
                    );
                    TypeWrapper::unresolved(self.context_ref(), reference.clone(), reason)
                }
            };

            let cached = self
                .type_refs
                .entry(cache_key.clone())
                .or_insert(wrapper)
                .value()
                .clone();

            // A module registered mid-lookup may have evicted before this insert landed.
            if cached.is_resolved() || generation == self.generation() {
                return Ok(cached);
            }
            self.type_refs
                .remove_if(&cache_key, |_, wrapper| !wrapper.is_resolved());
        }
    }

    fn find_in(&self, module: ModuleId, full_name: &str) -> Option<SymbolKey> {
        let (source, _) = self.loaded(module).ok()?;
        source
            .find_type(full_name)
            .map(|index| SymbolKey::new(module, ModuleLayout::type_token(index)))
    }

    fn locate_type(
        &self,
        from: ModuleId,
        full_name: &str,
        hint: Option<&str>,
    ) -> std::result::Result<SymbolKey, String> {
        if let Some(key) = self.find_in(from, full_name) {
            return Ok(key);
        }
        if !from.is_primary() {
            if let Some(key) = self.find_in(ModuleId::PRIMARY, full_name) {
                return Ok(key);
            }
        }

        let mut hint_seen = match hint {
            Some(hint) => [ModuleId::PRIMARY, ModuleId::CORE]
                .into_iter()
                .filter_map(|id| self.module(id))
                .any(|entry| entry.identity.matches_name(hint)),
            None => true,
        };
        let mut failures = Vec::new();

        for (id, entry) in self.references() {
            if id == from {
                continue;
            }
            if let Some(hint) = hint {
                if !entry.identity.matches_name(hint) {
                    continue;
                }
                hint_seen = true;
            }

            match &entry.state {
                ModuleState::Loaded { .. } => {
                    if let Some(key) = self.find_in(id, full_name) {
                        return Ok(key);
                    }
                }
                ModuleState::Failed { reason } => failures.push(format!(
                    "module '{}' failed to load: {reason}",
                    entry.identity.display_name()
                )),
            }
        }

        if !from.is_core() {
            if let Some(key) = self.find_in(ModuleId::CORE, full_name) {
                return Ok(key);
            }
        }

        Err(match hint {
            _ if !failures.is_empty() => failures.join("; "),
            Some(hint) if !hint_seen => format!("assembly '{hint}' is not loaded in this context"),
            _ => "type not found in any loaded module".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        metadata::{
            image::ModuleWriter,
            symbols::{SymbolGraphBuilder, TypeBuilder, TypeRef},
        },
        test::fixtures::{contoso_models, my_type_graph},
        LoadContext,
    };

    #[test]
    fn primitives_resolve_through_core_library() {
        let context = LoadContext::new(my_type_graph()).unwrap();

        let int = context.resolve_type_ref(&TypeRef::new("int")).unwrap();
        assert!(int.is_resolved());
        assert_eq!(int.full_name(), "System.Int32");
        assert!(int.is_value_type());

        let same = context.resolve_type_ref(&TypeRef::new("System.Int32")).unwrap();
        assert!(int.ptr_eq(&same));
    }

    #[test]
    fn primary_shadows_reference_modules() {
        let shadow = SymbolGraphBuilder::new("App")
            .add_type(TypeBuilder::class("Contoso.Models", "Address").build())
            .build();
        let context = LoadContext::builder()
            .primary(shadow)
            .reference_source(contoso_models())
            .build()
            .unwrap();

        let address = context.find_type("Contoso.Models.Address").unwrap();
        assert_eq!(address.assembly().unwrap().name, "App");
    }

    #[test]
    fn assembly_hint_restricts_lookup() {
        let bytes = ModuleWriter::emit(&contoso_models()).unwrap();
        let context = LoadContext::builder()
            .primary(SymbolGraphBuilder::new("App").build())
            .reference_bytes(bytes)
            .build()
            .unwrap();

        let hinted = context
            .resolve_type_ref(&TypeRef::with_assembly("Contoso.Models.Address", "Contoso.Models"))
            .unwrap();
        assert!(hinted.is_resolved());
        assert_eq!(hinted.assembly().unwrap().name, "Contoso.Models");

        let elsewhere = context
            .resolve_type_ref(&TypeRef::with_assembly("Contoso.Models.Address", "Fabrikam"))
            .unwrap();
        assert!(!elsewhere.is_resolved());
        assert_eq!(
            elsewhere.unresolved_reason(),
            Some("assembly 'Fabrikam' is not loaded in this context")
        );
    }

    #[test]
    fn failed_module_is_named_in_reason() {
        let mut bytes = ModuleWriter::emit(&contoso_models()).unwrap();
        bytes.truncate(bytes.len() - 2);
        let context = LoadContext::builder()
            .primary(SymbolGraphBuilder::new("App").build())
            .reference_bytes(bytes)
            .build()
            .unwrap();

        let address = context
            .resolve_type_ref(&TypeRef::new("Contoso.Models.Address"))
            .unwrap();
        assert!(!address.is_resolved());
        let reason = address.unresolved_reason().unwrap();
        assert!(reason.starts_with("module 'Contoso.Models, Version=1.2.0.0"));

        let error = address.unresolved_error().unwrap();
        assert!(error.to_string().contains("Contoso.Models.Address"));
    }

    #[test]
    fn unresolved_references_are_cached() {
        let context = LoadContext::new(my_type_graph()).unwrap();
        let reference = TypeRef::new("Missing.Type");

        let first = context.resolve_type_ref(&reference).unwrap();
        let second = context.resolve_type_ref(&reference).unwrap();
        assert!(first.ptr_eq(&second));
        assert_eq!(first.unresolved_reason(), Some("type not found in any loaded module"));
        assert!(context.find_type("Missing.Type").is_none());
    }
}

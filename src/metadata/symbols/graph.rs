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

use std::collections::HashMap;

use crate::metadata::{
    identity::AssemblyIdentity,
    symbols::{AttributeDecl, SourceDiagnostic, SymbolSource, TypeDecl},
};

/// The declarations of one analysed compilation unit.
///
/// A `SymbolGraph` is what the host compiler's front end hands over. It is immutable after
/// construction; a name index for [`SymbolSource::find_type`] is built once up front.
///
/// A graph may carry error diagnostics from the front end. It is still a valid symbol source:
/// everything that was declared is analysed, and only references the front end could not bind
/// end up unresolved.
///
/// # Examples
///
/// ```rust
/// use metascope::prelude::*;
///
/// let graph = SymbolGraphBuilder::new("Contoso.App")
///     .add_type(TypeBuilder::class("Contoso", "Person").build())
///     .build();
///
/// assert_eq!(graph.identity().name, "Contoso.App");
/// assert_eq!(graph.find_type("Contoso.Person"), Some(0));
/// ```
#[derive(Debug, Clone)]
pub struct SymbolGraph {
    identity: AssemblyIdentity,
    types: Vec<TypeDecl>,
    module_attributes: Vec<AttributeDecl>,
    diagnostics: Vec<SourceDiagnostic>,
    index: HashMap<String, usize>,
}

impl SymbolGraph {
    /// Create a graph from its parts.
    ///
    /// When two types share a full name, lookups by name find the first one.
    #[must_use]
    pub fn new(
        identity: AssemblyIdentity,
        types: Vec<TypeDecl>,
        module_attributes: Vec<AttributeDecl>,
        diagnostics: Vec<SourceDiagnostic>,
    ) -> Self {
        let mut index = HashMap::with_capacity(types.len());
        for (position, decl) in types.iter().enumerate() {
            index.entry(decl.full_name()).or_insert(position);
        }

        SymbolGraph {
            identity,
            types,
            module_attributes,
            diagnostics,
            index,
        }
    }

    /// Number of declared types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the graph declares no types.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl SymbolSource for SymbolGraph {
    fn identity(&self) -> &AssemblyIdentity {
        &self.identity
    }

    fn types(&self) -> &[TypeDecl] {
        &self.types
    }

    fn module_attributes(&self) -> &[AttributeDecl] {
        &self.module_attributes
    }

    fn diagnostics(&self) -> &[SourceDiagnostic] {
        &self.diagnostics
    }

    fn find_type(&self, full_name: &str) -> Option<usize> {
        self.index.get(full_name).copied()
    }
}

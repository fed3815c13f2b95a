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

use std::fmt;

use crate::metadata::{
    identity::AssemblyIdentity,
    symbols::{AttributeDecl, Severity, SourceDiagnostic, TypeDecl},
};

/// Read-only access to the declarations of one module.
///
/// This is the capability set every backing store provides to the
/// [`crate::LoadContext`]: an analysed compilation unit ([`crate::SymbolGraph`]) and a decoded
/// precompiled reference module ([`crate::metadata::image::ModuleImage`]) look identical from
/// here on. Implementations must be immutable once handed to a context, which is what makes
/// concurrent read-only traversal during discovery sound.
pub trait SymbolSource: Send + Sync + fmt::Debug {
    /// Identity of the module.
    fn identity(&self) -> &AssemblyIdentity;

    /// Declared types in declaration order.
    fn types(&self) -> &[TypeDecl];

    /// Attributes applied to the module itself (`[assembly: ...]`).
    fn module_attributes(&self) -> &[AttributeDecl];

    /// Diagnostics reported while producing the declarations.
    fn diagnostics(&self) -> &[SourceDiagnostic] {
        &[]
    }

    /// Index into [`SymbolSource::types`] of the first type with this namespace-qualified name.
    fn find_type(&self, full_name: &str) -> Option<usize> {
        self.types()
            .iter()
            .position(|decl| decl.full_name() == full_name)
    }

    /// Returns `true` if any diagnostic has [`Severity::Error`].
    fn has_errors(&self) -> bool {
        self.diagnostics()
            .iter()
            .any(|diagnostic| diagnostic.severity == Severity::Error)
    }
}

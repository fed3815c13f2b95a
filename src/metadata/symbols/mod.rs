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

//! Symbol graph model.
//!
//! The host compiler's front end is an external oracle; this module defines the shape of what
//! it hands over. A [`crate::SymbolGraph`] is one compilation unit: an identity, the declared
//! types with their members in declaration order, module-level attributes, and whatever
//! diagnostics the front end produced.
//!
//! # Key Components
//!
//! - [`crate::metadata::symbols::SymbolSource`] - read-only capability set shared with decoded
//!   module images
//! - [`crate::metadata::symbols::SymbolGraph`] - analysed compilation unit
//! - [`crate::metadata::symbols::SymbolGraphBuilder`] / [`crate::metadata::symbols::TypeBuilder`] -
//!   fluent construction
//! - Declaration nodes: [`crate::metadata::symbols::TypeDecl`] and its members,
//!   [`crate::metadata::symbols::AttributeDecl`] with [`crate::metadata::symbols::AttributeExpr`]
//!   arguments, [`crate::metadata::symbols::TypeRef`] by-name references

mod builder;
mod decl;
mod graph;
mod source;

pub use builder::{SymbolGraphBuilder, TypeBuilder};
pub use decl::{
    join_full_name, split_full_name, AccessorDecl, AttributeDecl, AttributeExpr, ConstValue,
    ConstructorDecl, EnumMemberDecl, FieldDecl, MethodDecl, ParamDecl, PropertyDecl, Severity,
    SourceDiagnostic, TypeDecl, TypeRef,
};
pub use graph::SymbolGraph;
pub use source::SymbolSource;

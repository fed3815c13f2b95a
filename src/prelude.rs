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

//! # metascope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the metascope library. Import it to get quick access to everything a code generator
//! needs: building or loading symbol sources, running discovery, and querying wrappers.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all metascope operations
pub use crate::Error;

/// The result type used throughout metascope
pub use crate::Result;

// ================================================================================================
// Symbol Sources
// ================================================================================================

/// Analysed compilation units and their builders
pub use crate::metadata::symbols::{
    SymbolGraph, SymbolGraphBuilder, SymbolSource, TypeBuilder,
};

/// Declaration nodes
pub use crate::metadata::symbols::{
    AttributeDecl, AttributeExpr, ConstValue, ConstructorDecl, FieldDecl, MethodDecl, ParamDecl,
    PropertyDecl, Severity, TypeDecl, TypeRef,
};

/// Precompiled reference modules
pub use crate::metadata::image::{ModuleImage, ModuleWriter};

/// Module identities
pub use crate::metadata::identity::{AssemblyIdentity, AssemblyVersion};

// ================================================================================================
// Load Context
// ================================================================================================

/// The scoped registry behind one discovery pass
pub use crate::metadata::loadcontext::{
    LoadContext, LoadContextBuilder, LoadOptions, LoadReport, ModuleId, SymbolKey,
};

/// Metadata token type for addressing declarations within a module
pub use crate::metadata::token::Token;

// ================================================================================================
// Type System and Wrappers
// ================================================================================================

/// Type system vocabulary
pub use crate::metadata::typesystem::{BindingFlags, MemberKind, TypeKind, Visibility};

/// Reflection-shaped views
pub use crate::metadata::wrappers::{
    ConstructorWrapper, FieldWrapper, MemberInfo, MethodWrapper, ParameterWrapper,
    PropertyWrapper, TypeWrapper, Wrapper,
};

/// Applied attributes
pub use crate::metadata::customattributes::{
    attributes_of, attributes_of_type, has_attribute, AttributeData, TypedConstant,
};

// ================================================================================================
// Discovery
// ================================================================================================

/// Marker-driven discovery
pub use crate::discovery::{
    discover, run_discovery, DiscoveryOptions, DiscoveryResult, DuplicatePolicy,
};

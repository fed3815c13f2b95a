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

//! Symbol metadata and its reflection-shaped representation.
//!
//! # Key Components
//!
//! - [`symbols`] - the declaration graph handed over by the compiler front end
//! - [`image`] - precompiled reference modules and their binary format
//! - [`loadcontext`] - module registry, identity-stable wrapper cache and type resolution
//! - [`wrappers`] - Type, Property, Field, Method and Constructor views
//! - [`customattributes`] - applied attributes with constant arguments
//! - [`typesystem`] - visibility, kinds, binding flags and the built-in core library
//! - [`token`] - table/row addresses of declarations within a module
//! - [`identity`] - module names and versions
//!
//! # Examples
//!
//! ```rust
//! use metascope::prelude::*;
//!
//! let graph = SymbolGraphBuilder::new("App")
//!     .add_type(
//!         TypeBuilder::class("Contoso", "Point")
//!             .field(FieldDecl::new("X", "int", Visibility::Public))
//!             .field(FieldDecl::new("Y", "int", Visibility::Public))
//!             .build(),
//!     )
//!     .build();
//!
//! let context = LoadContext::new(graph)?;
//! let point = context.find_type("Contoso.Point").expect("declared");
//! let names: Vec<_> = point.fields()?.iter().map(|f| f.name().to_string()).collect();
//! assert_eq!(names, ["X", "Y"]);
//! # Ok::<(), metascope::Error>(())
//! ```

/// Applied attributes and constant argument values
pub mod customattributes;
/// Module identities
pub mod identity;
/// Binary format of precompiled reference modules
pub mod image;
/// Module registry, wrapper cache and cross-module type resolution
pub mod loadcontext;
/// Declaration graph produced by the compiler front end
pub mod symbols;
/// Commonly used metadata token type
pub mod token;
/// Visibility, type kinds, binding flags and primitives
pub mod typesystem;
/// Reflection-shaped views over declarations
pub mod wrappers;

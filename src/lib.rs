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

//! # metascope
//!
//! Static type-metadata extraction for source generators. `metascope` walks the symbol graph of
//! a compiled-but-not-loaded program and exposes it through a reflection-shaped API, so
//! generator logic written against types, properties, fields, methods and their attributes
//! works the same whether the declarations came from source analysis or from a precompiled
//! reference module. Nothing is executed and nothing is loaded into the host process.
//!
//! # Architecture
//!
//! - **Symbol source** - [`SymbolGraph`] (built by the compiler front end) or a decoded
//!   [`metadata::image::ModuleImage`], both behind [`metadata::symbols::SymbolSource`]
//! - **Load context** - [`LoadContext`], the scoped registry that owns modules and caches
//!   wrappers so the same declaration always resolves to the same object
//! - **Wrappers** - [`TypeWrapper`] and the member wrappers in [`metadata::wrappers`]
//! - **Attribute reader** - [`metadata::customattributes`], constant-only argument values
//! - **Discovery** - [`discovery::discover`], the marker-driven entry point
//!
//! # Quick Start
//!
//! ```rust
//! use metascope::prelude::*;
//!
//! let graph = SymbolGraphBuilder::new("App")
//!     .add_type(
//!         TypeBuilder::class("Contoso", "Person")
//!             .attribute(AttributeDecl::new("System.Text.Json.Serialization.JsonSerializableAttribute"))
//!             .property(PropertyDecl::auto("Name", "string", Visibility::Public))
//!             .property(
//!                 PropertyDecl::auto("Secret", "string", Visibility::Public)
//!                     .attribute(AttributeDecl::new("System.Text.Json.Serialization.JsonIgnoreAttribute")),
//!             )
//!             .build(),
//!     )
//!     .build();
//!
//! let context = LoadContext::new(graph)?;
//! let result = discover(&context, &DiscoveryOptions::default())?;
//!
//! for (name, ty) in result.iter() {
//!     for property in ty.properties()? {
//!         let ignored = property.attributes()?.iter().any(|a| a.is("JsonIgnore"));
//!         println!("{name}.{} ignored={ignored}", property.name());
//!     }
//! }
//!
//! let report = context.close();
//! assert!(report.is_complete_success());
//! # Ok::<(), metascope::Error>(())
//! ```
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T>`] with [`Error`]. Only a missing primary symbol
//! source is fatal to a discovery pass; unresolvable references, non-constant attribute
//! arguments, broken reference modules and duplicate names are recorded and the pass goes on.
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: `debug` for module registration and discovery
//! decisions, `warn` for failed module loads, unresolved references and duplicate names,
//! `trace` for cache hits. Install any subscriber to see them.

#![doc(html_no_source)]
#![deny(missing_docs)]

#[macro_use]
pub(crate) mod error;

#[macro_use]
pub(crate) mod macros;

/// Byte-level parsing and writing used by the module image codec
pub mod file;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use metascope::prelude::*;
///
/// let context = LoadContext::new(SymbolGraphBuilder::new("App").build())?;
/// let result = discover(&context, &DiscoveryOptions::default())?;
/// assert!(result.is_empty());
/// # Ok::<(), metascope::Error>(())
/// ```
pub mod prelude;

/// Symbol graphs, module images, the load context, wrappers and attribute data
pub mod metadata;

/// Marker-driven discovery of types to generate code for
pub mod discovery;

/// `metascope` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `metascope` Error type
///
/// The main error type for all operations in this crate. See [`Error`] for the taxonomy of
/// fatal and non-fatal conditions.
pub use error::Error;

/// Bounds-checked cursor over a byte slice
pub use file::parser::Parser;

/// The scoped registry behind one discovery pass
pub use metadata::loadcontext::{
    LoadContext, LoadContextBuilder, LoadOptions, LoadReport, ModuleId, SymbolKey,
};

/// Analysed compilation units
pub use metadata::symbols::{SymbolGraph, SymbolGraphBuilder, SymbolSource};

/// Reflection-shaped views
pub use metadata::wrappers::{MemberInfo, TypeWrapper, Wrapper};

/// Discovery entry points
pub use discovery::{discover, run_discovery, DiscoveryOptions, DiscoveryResult};

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

//! The load context: module registry, wrapper cache and type resolution.
//!
//! A [`LoadContext`] is created for one discovery pass. It owns the primary compilation unit,
//! every reference module registered for the pass, and the built-in core library. Symbols are
//! addressed by [`SymbolKey`] (module id plus token) and resolved to wrappers through an
//! identity-stable cache.
//!
//! # Architecture
//!
//! - **Registry** - modules live in an append-only `boxcar::Vec`; the index is the
//!   [`ModuleId`]. Reference modules can be added while other threads resolve symbols.
//! - **Layout** - each module gets a token layout that numbers types and members by
//!   declaration order, so tokens stay stable without touching the declarations.
//! - **Cache** - a `DashMap` from [`SymbolKey`] to wrapper, populated through the entry API so
//!   concurrent first resolution of a key yields one wrapper.
//! - **Resolver** - by-name type references are looked up in the referencing module, the
//!   primary unit, reference modules and finally the core library.
//!
//! # Failure handling
//!
//! A reference module that cannot be decoded is recorded in the [`LoadReport`] and kept as a
//! failed registration, so references into it resolve to unresolved types that name the
//! failure. Only a missing primary unit is fatal.

mod context;
pub(crate) mod layout;
mod options;
mod report;
mod resolver;

pub(crate) use context::ContextShared;
pub use context::{LoadContext, LoadContextBuilder, ModuleId, SymbolKey};
pub use options::{LoadOptions, MAX_REFERENCE_MODULES};
pub use report::LoadReport;

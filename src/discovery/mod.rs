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

//! Marker-driven type discovery.
//!
//! The walker is the entry point for code generators: it scans the primary compilation unit
//! for a designated marker attribute and returns the types that opted in, keyed by simple name
//! in discovery order. The marker is the only trigger; names, base types and other attributes
//! play no part.
//!
//! # Discovery rules
//!
//! - A marker without arguments on a type discovers that type.
//! - A marker with a `typeof(T)` argument discovers `T` only. This is how interest in a type
//!   defined in a reference module is declared; `T` is resolved through the load context.
//! - Module-level markers (`[assembly: ...]`) must carry a type argument.
//! - Simple-name collisions follow [`DuplicatePolicy`].
//!
//! Nothing except a closed context stops the walk: unresolvable targets, non-constant marker
//! arguments and collisions end up in [`DiscoveryResult::diagnostics`].

mod options;
mod result;
mod walker;

pub use options::{DiscoveryOptions, DuplicatePolicy, DEFAULT_MARKER};
pub use result::DiscoveryResult;
pub use walker::{discover, run_discovery};

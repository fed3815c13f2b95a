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

//! Type system vocabulary shared by declarations and wrappers.
//!
//! # Key Components
//!
//! - [`crate::metadata::typesystem::Visibility`] - declared accessibility
//! - [`crate::metadata::typesystem::TypeKind`] - class, struct, interface or enum
//! - [`crate::metadata::typesystem::MemberKind`] - which wrapper a member view is
//! - [`crate::metadata::typesystem::BindingFlags`] - reflection-style member filters
//! - [`crate::metadata::typesystem::PrimitiveKind`] - built-in types and their C# keywords
//! - [`crate::metadata::typesystem::core_library`] - the always-available core module

mod flags;
mod primitives;

pub use flags::{BindingFlags, MemberKind, TypeKind, Visibility};
pub use primitives::{
    canonical_type_name, core_library, core_library_identity, PrimitiveKind, CORE_LIBRARY_NAME,
};

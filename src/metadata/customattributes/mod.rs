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

//! Applied attributes and their constant arguments.
//!
//! This module turns the attribute declarations of a member into [`AttributeData`]: the
//! resolved attribute type plus constructor and named arguments, each resolved as a constant.
//! Nothing is executed. Literals map one to one, `typeof(T)` resolves `T` through the load
//! context, enum literals resolve their underlying value when the enum is known, and arrays
//! nest.
//!
//! # Argument Model
//!
//! - **Positional arguments** - constructor arguments in source order
//! - **Named arguments** - `Name = value` pairs in source order, kept in an `IndexMap`
//! - **Non-constant arguments** - reported as [`crate::Error::NonConstantArgument`] on the
//!   affected attribute only; the attribute keeps its place in the list and every other
//!   attribute of the member is unaffected
//!
//! # Examples
//!
//! ```rust
//! use metascope::prelude::*;
//! use metascope::metadata::customattributes::{attributes_of_type, TypedConstant};
//!
//! let graph = SymbolGraphBuilder::new("App")
//!     .add_type(
//!         TypeBuilder::class("N", "Person")
//!             .property(
//!                 PropertyDecl::auto("Name", "string", Visibility::Public).attribute(
//!                     AttributeDecl::new("System.Text.Json.Serialization.JsonPropertyNameAttribute")
//!                         .arg(AttributeExpr::Literal(ConstValue::String("name".into()))),
//!                 ),
//!             )
//!             .build(),
//!     )
//!     .build();
//! let context = LoadContext::new(graph)?;
//! let name = context.find_type("N.Person").expect("declared").properties()?[0].clone();
//!
//! let renames = attributes_of_type(&name, "JsonPropertyName")?;
//! assert_eq!(renames[0].constructor_arguments()?[0], TypedConstant::String("name".into()));
//! # Ok::<(), metascope::Error>(())
//! ```

mod reader;
mod types;

pub(crate) use reader::read_attributes;
pub use types::*;

use std::sync::Arc;

use crate::{metadata::wrappers::MemberInfo, Result};

/// Applied attributes of a member in source order.
///
/// # Errors
/// Returns [`crate::Error::ContextClosed`] if the member's context is gone.
pub fn attributes_of<M: MemberInfo + ?Sized>(member: &M) -> Result<Arc<[AttributeData]>> {
    member.attributes()
}

/// Applied attributes of a member whose type is called `name`, in source order.
///
/// `name` may be namespace-qualified or simple and may omit the `Attribute` suffix.
///
/// # Errors
/// Returns [`crate::Error::ContextClosed`] if the member's context is gone.
pub fn attributes_of_type<M: MemberInfo + ?Sized>(
    member: &M,
    name: &str,
) -> Result<Vec<AttributeData>> {
    Ok(member
        .attributes()?
        .iter()
        .filter(|attribute| attribute.is(name))
        .cloned()
        .collect())
}

/// Returns `true` if the member carries an attribute called `name`.
///
/// # Errors
/// Returns [`crate::Error::ContextClosed`] if the member's context is gone.
pub fn has_attribute<M: MemberInfo + ?Sized>(member: &M, name: &str) -> Result<bool> {
    Ok(member.attributes()?.iter().any(|attribute| attribute.is(name)))
}

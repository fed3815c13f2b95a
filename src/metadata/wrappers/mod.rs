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

//! Reflection-shaped views over declarations.
//!
//! Wrappers are adapters: they hold a non-owning reference to the [`crate::LoadContext`] that
//! created them, the [`crate::metadata::loadcontext::SymbolKey`] of the declaration they adapt,
//! and a snapshot of the declaration's shape. Anything that needs resolution (types,
//! attributes, sibling members) goes back through the context, so repeated queries hand out
//! the same objects.
//!
//! # Key Components
//!
//! - [`crate::metadata::wrappers::TypeWrapper`] - a declared or unresolved type
//! - [`crate::metadata::wrappers::PropertyWrapper`], [`crate::metadata::wrappers::FieldWrapper`],
//!   [`crate::metadata::wrappers::MethodWrapper`], [`crate::metadata::wrappers::ConstructorWrapper`]
//! - [`crate::metadata::wrappers::ParameterWrapper`] - a parameter of a method or constructor
//! - [`crate::metadata::wrappers::MemberInfo`] - the query surface they all share
//! - [`crate::metadata::wrappers::Wrapper`] - what [`crate::LoadContext::resolve`] returns
//!
//! # Ordering
//!
//! Member collections follow declaration order and include non-public members. Methods list
//! the accessors of each property (getter, then setter) in property order first, followed by
//! the declared methods. Use the `*_with` enumerations with
//! [`crate::metadata::typesystem::BindingFlags`] for reflection-style filtering.
//!
//! # Lifetime
//!
//! Wrappers stay valid as handles after the context is closed: names and the captured shape
//! remain readable, every query that needs the context fails with
//! [`crate::Error::ContextClosed`].

pub(crate) mod core;
mod members;
mod types;

use std::sync::Arc;

pub use members::{
    ConstructorWrapper, FieldWrapper, MethodWrapper, ParameterWrapper, PropertyWrapper,
    CONSTRUCTOR_NAME, TYPE_INITIALIZER_NAME,
};
pub(crate) use types::Members;
pub use types::TypeWrapper;

use crate::{
    metadata::{
        customattributes::AttributeData,
        loadcontext::SymbolKey,
        typesystem::{MemberKind, Visibility},
    },
    Result,
};

/// The query surface shared by every wrapper.
///
/// Generator code that only needs names, accessibility and attributes can be written once
/// against this trait.
///
/// ```rust
/// use metascope::prelude::*;
///
/// fn describe(member: &impl MemberInfo) -> String {
///     format!("{} {} {}", member.visibility(), member.member_kind(), member.name())
/// }
///
/// let graph = SymbolGraphBuilder::new("App")
///     .add_type(
///         TypeBuilder::class("N", "T")
///             .field(FieldDecl::new("count", "int", Visibility::Private))
///             .build(),
///     )
///     .build();
/// let context = LoadContext::new(graph)?;
/// let ty = context.find_type("N.T").expect("declared");
///
/// assert_eq!(describe(&ty.fields()?[0]), "private field count");
/// assert_eq!(describe(&ty), "public type T");
/// # Ok::<(), metascope::Error>(())
/// ```
pub trait MemberInfo {
    /// Name as reflection reports it.
    fn name(&self) -> &str;

    /// What kind of member this is.
    fn member_kind(&self) -> MemberKind;

    /// Effective accessibility.
    fn visibility(&self) -> Visibility;

    /// Returns `true` for static members.
    fn is_static(&self) -> bool;

    /// Stable identity, `None` for unresolved types.
    fn symbol_key(&self) -> Option<SymbolKey>;

    /// The declaring type; `None` for types.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    fn declaring_type(&self) -> Result<Option<TypeWrapper>>;

    /// Applied attributes in source order.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    fn attributes(&self) -> Result<Arc<[AttributeData]>>;
}

/// Any wrapper the context can resolve a symbol key to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Wrapper {
    /// A type
    Type(TypeWrapper),
    /// A field
    Field(FieldWrapper),
    /// A property
    Property(PropertyWrapper),
    /// A method, including property accessors
    Method(MethodWrapper),
    /// A constructor or type initializer
    Constructor(ConstructorWrapper),
}

impl Wrapper {
    /// The wrapped member through the shared query surface.
    #[must_use]
    pub fn as_member(&self) -> &dyn MemberInfo {
        match self {
            Wrapper::Type(inner) => inner,
            Wrapper::Field(inner) => inner,
            Wrapper::Property(inner) => inner,
            Wrapper::Method(inner) => inner,
            Wrapper::Constructor(inner) => inner,
        }
    }

    /// Returns the type, if this is one.
    #[must_use]
    pub fn into_type(self) -> Option<TypeWrapper> {
        match self {
            Wrapper::Type(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns the field, if this is one.
    #[must_use]
    pub fn into_field(self) -> Option<FieldWrapper> {
        match self {
            Wrapper::Field(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns the property, if this is one.
    #[must_use]
    pub fn into_property(self) -> Option<PropertyWrapper> {
        match self {
            Wrapper::Property(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns the method, if this is one.
    #[must_use]
    pub fn into_method(self) -> Option<MethodWrapper> {
        match self {
            Wrapper::Method(inner) => Some(inner),
            _ => None,
        }
    }

    /// Returns the constructor, if this is one.
    #[must_use]
    pub fn into_constructor(self) -> Option<ConstructorWrapper> {
        match self {
            Wrapper::Constructor(inner) => Some(inner),
            _ => None,
        }
    }
}

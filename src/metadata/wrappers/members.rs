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

//! Property, field, method, constructor and parameter wrappers.
//!
//! Each wrapper captures the shape of its declaration (name, accessibility, the type references
//! it uses) when the context materializes it, and goes back to the context for everything that
//! needs resolution: types, attributes, the declaring type and sibling members.

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use crate::{
    metadata::{
        customattributes::{read_attributes, AttributeData},
        loadcontext::SymbolKey,
        symbols::{
            AccessorDecl, AttributeDecl, ConstructorDecl, FieldDecl, MethodDecl, ParamDecl,
            PropertyDecl, TypeRef,
        },
        typesystem::{MemberKind, PrimitiveKind},
        wrappers::{
            core::{ContextRef, MemberCore},
            TypeWrapper,
        },
    },
    Result,
};

/// Name of the implicit parameter of a property setter.
const SETTER_PARAMETER: &str = "value";

/// Name reflection gives instance constructors.
pub const CONSTRUCTOR_NAME: &str = ".ctor";

/// Name reflection gives type initializers.
pub const TYPE_INITIALIZER_NAME: &str = ".cctor";

struct FieldInner {
    core: MemberCore,
    field_type: TypeRef,
}

/// Reflection-shaped view of a field.
#[derive(Clone)]
pub struct FieldWrapper(Arc<FieldInner>);

impl_member_wrapper!(FieldWrapper, MemberKind::Field);

impl FieldWrapper {
    pub(crate) fn new(core: MemberCore, decl: &FieldDecl) -> Self {
        FieldWrapper(Arc::new(FieldInner {
            core,
            field_type: decl.field_type.clone(),
        }))
    }

    /// The field type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn field_type(&self) -> Result<TypeWrapper> {
        resolve_in(&self.0.core, &self.0.field_type)
    }

    /// The field type as written in the declaration.
    #[must_use]
    pub fn field_type_ref(&self) -> &TypeRef {
        &self.0.field_type
    }
}

struct PropertyInner {
    core: MemberCore,
    property_type: TypeRef,
    getter: Option<SymbolKey>,
    setter: Option<SymbolKey>,
}

/// Reflection-shaped view of a property.
#[derive(Clone)]
pub struct PropertyWrapper(Arc<PropertyInner>);

impl_member_wrapper!(PropertyWrapper, MemberKind::Property);

impl PropertyWrapper {
    pub(crate) fn new(
        core: MemberCore,
        decl: &PropertyDecl,
        getter: Option<SymbolKey>,
        setter: Option<SymbolKey>,
    ) -> Self {
        PropertyWrapper(Arc::new(PropertyInner {
            core,
            property_type: decl.property_type.clone(),
            getter,
            setter,
        }))
    }

    /// The property type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn property_type(&self) -> Result<TypeWrapper> {
        resolve_in(&self.0.core, &self.0.property_type)
    }

    /// The property type as written in the declaration.
    #[must_use]
    pub fn property_type_ref(&self) -> &TypeRef {
        &self.0.property_type
    }

    /// Returns `true` if the property has a getter.
    #[must_use]
    pub fn can_read(&self) -> bool {
        self.0.getter.is_some()
    }

    /// Returns `true` if the property has a setter.
    #[must_use]
    pub fn can_write(&self) -> bool {
        self.0.setter.is_some()
    }

    /// The `get_` accessor method.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn get_method(&self) -> Result<Option<MethodWrapper>> {
        self.accessor(self.0.getter)
    }

    /// The `set_` accessor method.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn set_method(&self) -> Result<Option<MethodWrapper>> {
        self.accessor(self.0.setter)
    }

    fn accessor(&self, key: Option<SymbolKey>) -> Result<Option<MethodWrapper>> {
        match key {
            Some(key) => self.0.core.context.upgrade()?.resolve_method(key).map(Some),
            None => Ok(None),
        }
    }
}

struct MethodInner {
    core: MemberCore,
    return_type: TypeRef,
    parameters: Vec<ParameterWrapper>,
    property: Option<SymbolKey>,
}

/// Reflection-shaped view of a method.
///
/// Property accessors are methods too: `get_<Name>` takes no parameters and returns the
/// property type, `set_<Name>` takes one `value` parameter and returns `System.Void`. Both
/// report [`MethodWrapper::is_special_name`].
#[derive(Clone)]
pub struct MethodWrapper(Arc<MethodInner>);

impl_member_wrapper!(MethodWrapper, MemberKind::Method);

impl MethodWrapper {
    pub(crate) fn declared(core: MemberCore, decl: &MethodDecl) -> Self {
        let parameters = build_parameters(&core, &decl.parameters);
        MethodWrapper(Arc::new(MethodInner {
            core,
            return_type: decl.return_type.clone(),
            parameters,
            property: None,
        }))
    }

    pub(crate) fn accessor(
        core: MemberCore,
        property: &PropertyDecl,
        property_key: SymbolKey,
        is_setter: bool,
    ) -> Self {
        let (return_type, parameters) = if is_setter {
            let value = ParamDecl {
                name: SETTER_PARAMETER.to_string(),
                param_type: property.property_type.clone(),
                attributes: Vec::new(),
            };
            (
                TypeRef::new(PrimitiveKind::Void.full_name()),
                build_parameters(&core, &[value]),
            )
        } else {
            (property.property_type.clone(), Vec::new())
        };

        MethodWrapper(Arc::new(MethodInner {
            core,
            return_type,
            parameters,
            property: Some(property_key),
        }))
    }

    /// Name reflection uses for an accessor of `property`.
    pub(crate) fn accessor_name(property: &str, is_setter: bool) -> String {
        if is_setter {
            format!("set_{property}")
        } else {
            format!("get_{property}")
        }
    }

    /// Effective accessibility of an accessor.
    pub(crate) fn accessor_visibility(
        property: &PropertyDecl,
        accessor: &AccessorDecl,
    ) -> crate::metadata::typesystem::Visibility {
        accessor.visibility.unwrap_or(property.visibility)
    }

    /// The return type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn return_type(&self) -> Result<TypeWrapper> {
        resolve_in(&self.0.core, &self.0.return_type)
    }

    /// The return type as written.
    #[must_use]
    pub fn return_type_ref(&self) -> &TypeRef {
        &self.0.return_type
    }

    /// Parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterWrapper] {
        &self.0.parameters
    }

    /// Returns `true` for compiler-synthesized names (property accessors).
    #[must_use]
    pub fn is_special_name(&self) -> bool {
        self.0.property.is_some()
    }

    /// The property this accessor belongs to.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn associated_property(&self) -> Result<Option<PropertyWrapper>> {
        match self.0.property {
            Some(key) => self
                .0
                .core
                .context
                .upgrade()?
                .resolve_property(key)
                .map(Some),
            None => Ok(None),
        }
    }
}

struct ConstructorInner {
    core: MemberCore,
    parameters: Vec<ParameterWrapper>,
}

/// Reflection-shaped view of a constructor (`.ctor`) or type initializer (`.cctor`).
#[derive(Clone)]
pub struct ConstructorWrapper(Arc<ConstructorInner>);

impl_member_wrapper!(ConstructorWrapper, MemberKind::Constructor);

impl ConstructorWrapper {
    pub(crate) fn new(core: MemberCore, decl: &ConstructorDecl) -> Self {
        let parameters = build_parameters(&core, &decl.parameters);
        ConstructorWrapper(Arc::new(ConstructorInner { core, parameters }))
    }

    /// Reflection name of a constructor.
    pub(crate) fn constructor_name(is_static: bool) -> &'static str {
        if is_static {
            TYPE_INITIALIZER_NAME
        } else {
            CONSTRUCTOR_NAME
        }
    }

    /// Parameters in order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterWrapper] {
        &self.0.parameters
    }

    /// Returns `true` for the type initializer.
    #[must_use]
    pub fn is_type_initializer(&self) -> bool {
        self.0.core.is_static
    }
}

/// Reflection-shaped view of a method or constructor parameter.
#[derive(Clone)]
pub struct ParameterWrapper {
    context: ContextRef,
    owner: SymbolKey,
    position: usize,
    name: String,
    param_type: TypeRef,
    attributes: Arc<[AttributeDecl]>,
}

impl ParameterWrapper {
    /// Parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// The parameter type.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn parameter_type(&self) -> Result<TypeWrapper> {
        self.context
            .upgrade()?
            .resolve_type_ref(self.owner.module, &self.param_type)
    }

    /// The parameter type as written.
    #[must_use]
    pub fn parameter_type_ref(&self) -> &TypeRef {
        &self.param_type
    }

    /// Attributes applied to the parameter, in source order.
    ///
    /// # Errors
    /// Returns [`crate::Error::ContextClosed`] if the context is gone.
    pub fn attributes(&self) -> Result<Vec<AttributeData>> {
        let shared = self.context.upgrade()?;
        read_attributes(&shared, self.owner.module, &self.attributes)
    }
}

impl PartialEq for ParameterWrapper {
    fn eq(&self, other: &Self) -> bool {
        self.context.id() == other.context.id()
            && self.owner == other.owner
            && self.position == other.position
    }
}

impl Eq for ParameterWrapper {}

impl Hash for ParameterWrapper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.id().hash(state);
        self.owner.hash(state);
        self.position.hash(state);
    }
}

impl fmt::Debug for ParameterWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ParameterWrapper(#{} {}: {})",
            self.position, self.name, self.param_type
        )
    }
}

fn build_parameters(core: &MemberCore, decls: &[ParamDecl]) -> Vec<ParameterWrapper> {
    decls
        .iter()
        .enumerate()
        .map(|(position, decl)| ParameterWrapper {
            context: core.context.clone(),
            owner: core.key,
            position,
            name: decl.name.clone(),
            param_type: decl.param_type.clone(),
            attributes: Arc::from(decl.attributes.as_slice()),
        })
        .collect()
}

fn resolve_in(core: &MemberCore, reference: &TypeRef) -> Result<TypeWrapper> {
    core.context
        .upgrade()?
        .resolve_type_ref(core.key.module, reference)
}

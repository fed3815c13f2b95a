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

//! Fluent construction of symbol graphs.
//!
//! This module provides [`SymbolGraphBuilder`] and [`TypeBuilder`], plus small constructor
//! helpers on the member declarations. Front ends that map their own syntax trees onto a
//! [`crate::SymbolGraph`] use it, and so do the tests.
//!
//! # Example
//!
//! ```rust
//! use metascope::prelude::*;
//!
//! let person = TypeBuilder::class("Contoso", "Person")
//!     .attribute(AttributeDecl::new("System.Text.Json.Serialization.JsonSerializableAttribute"))
//!     .property(PropertyDecl::auto("Name", "string", Visibility::Public))
//!     .field(FieldDecl::new("age", "int", Visibility::Private))
//!     .method(MethodDecl::new("Greet", "void", Visibility::Public).parameter(ParamDecl::new("other", "Contoso.Person")))
//!     .build();
//!
//! let graph = SymbolGraphBuilder::new("Contoso.App").add_type(person).build();
//! assert_eq!(graph.types()[0].properties[0].name, "Name");
//! ```

use crate::metadata::{
    identity::{AssemblyIdentity, AssemblyVersion},
    symbols::{
        AccessorDecl, AttributeDecl, ConstructorDecl, EnumMemberDecl, FieldDecl, MethodDecl,
        ParamDecl, PropertyDecl, Severity, SourceDiagnostic, SymbolGraph, TypeDecl, TypeRef,
    },
    typesystem::{TypeKind, Visibility},
};

/// Provides a fluent API for building a [`SymbolGraph`]
pub struct SymbolGraphBuilder {
    identity: AssemblyIdentity,
    types: Vec<TypeDecl>,
    module_attributes: Vec<AttributeDecl>,
    diagnostics: Vec<SourceDiagnostic>,
}

impl SymbolGraphBuilder {
    /// Start a graph for the named assembly (culture-neutral, version `0.0.0.0`).
    pub fn new(assembly_name: impl Into<String>) -> Self {
        Self::with_identity(AssemblyIdentity::simple(assembly_name))
    }

    /// Start a graph with a full identity.
    #[must_use]
    pub fn with_identity(identity: AssemblyIdentity) -> Self {
        SymbolGraphBuilder {
            identity,
            types: Vec::new(),
            module_attributes: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Set the assembly version.
    #[must_use]
    pub fn version(mut self, version: AssemblyVersion) -> Self {
        self.identity.version = version;
        self
    }

    /// Append a type.
    #[must_use]
    pub fn add_type(mut self, decl: TypeDecl) -> Self {
        self.types.push(decl);
        self
    }

    /// Apply an attribute to the module itself.
    #[must_use]
    pub fn module_attribute(mut self, attribute: AttributeDecl) -> Self {
        self.module_attributes.push(attribute);
        self
    }

    /// Record a front-end diagnostic.
    #[must_use]
    pub fn diagnostic(mut self, severity: Severity, message: impl Into<String>) -> Self {
        self.diagnostics.push(SourceDiagnostic {
            severity,
            message: message.into(),
        });
        self
    }

    /// Finish the graph.
    #[must_use]
    pub fn build(self) -> SymbolGraph {
        SymbolGraph::new(
            self.identity,
            self.types,
            self.module_attributes,
            self.diagnostics,
        )
    }
}

/// Provides a fluent API for building a [`TypeDecl`]
pub struct TypeBuilder {
    decl: TypeDecl,
}

impl TypeBuilder {
    /// Start a public type of the given kind.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        TypeBuilder {
            decl: TypeDecl::new(namespace, name, kind),
        }
    }

    /// Start a public class.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Class)
    }

    /// Start a public struct.
    pub fn value_type(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Struct)
    }

    /// Start a public interface.
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Interface)
    }

    /// Start a public enum.
    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, TypeKind::Enum).extends(TypeRef::new("System.Enum"))
    }

    /// Set the declared accessibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.decl.visibility = visibility;
        self
    }

    /// Set the base type.
    #[must_use]
    pub fn extends(mut self, base: TypeRef) -> Self {
        self.decl.base = Some(base);
        self
    }

    /// Apply an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.decl.attributes.push(attribute);
        self
    }

    /// Append a field.
    #[must_use]
    pub fn field(mut self, field: FieldDecl) -> Self {
        self.decl.fields.push(field);
        self
    }

    /// Append a property.
    #[must_use]
    pub fn property(mut self, property: PropertyDecl) -> Self {
        self.decl.properties.push(property);
        self
    }

    /// Append a method.
    #[must_use]
    pub fn method(mut self, method: MethodDecl) -> Self {
        self.decl.methods.push(method);
        self
    }

    /// Append a constructor.
    #[must_use]
    pub fn constructor(mut self, constructor: ConstructorDecl) -> Self {
        self.decl.constructors.push(constructor);
        self
    }

    /// Append an enum literal.
    #[must_use]
    pub fn enum_member(mut self, name: impl Into<String>, value: i64) -> Self {
        self.decl.enum_members.push(EnumMemberDecl {
            name: name.into(),
            value,
        });
        self
    }

    /// Finish the type.
    #[must_use]
    pub fn build(self) -> TypeDecl {
        self.decl
    }
}

impl FieldDecl {
    /// An instance field without attributes.
    pub fn new(name: impl Into<String>, field_type: impl Into<String>, visibility: Visibility) -> Self {
        FieldDecl {
            name: name.into(),
            field_type: TypeRef::new(field_type),
            visibility,
            is_static: false,
            attributes: Vec::new(),
        }
    }

    /// Make the field static.
    #[must_use]
    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Apply an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl PropertyDecl {
    /// An instance property with both accessors inheriting its accessibility.
    pub fn auto(name: impl Into<String>, property_type: impl Into<String>, visibility: Visibility) -> Self {
        PropertyDecl {
            name: name.into(),
            property_type: TypeRef::new(property_type),
            visibility,
            is_static: false,
            getter: Some(AccessorDecl::default()),
            setter: Some(AccessorDecl::default()),
            attributes: Vec::new(),
        }
    }

    /// An instance property with only a getter.
    pub fn read_only(name: impl Into<String>, property_type: impl Into<String>, visibility: Visibility) -> Self {
        PropertyDecl {
            setter: None,
            ..Self::auto(name, property_type, visibility)
        }
    }

    /// Replace the setter's accessibility (`public int X { get; private set; }`).
    #[must_use]
    pub fn setter_visibility(mut self, visibility: Visibility) -> Self {
        self.setter = Some(AccessorDecl {
            visibility: Some(visibility),
            ..self.setter.unwrap_or_default()
        });
        self
    }

    /// Make the property static.
    #[must_use]
    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Apply an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl MethodDecl {
    /// An instance method without parameters.
    pub fn new(name: impl Into<String>, return_type: impl Into<String>, visibility: Visibility) -> Self {
        MethodDecl {
            name: name.into(),
            return_type: TypeRef::new(return_type),
            parameters: Vec::new(),
            visibility,
            is_static: false,
            attributes: Vec::new(),
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: ParamDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Make the method static.
    #[must_use]
    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Apply an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl ConstructorDecl {
    /// An instance constructor without parameters.
    #[must_use]
    pub fn new(visibility: Visibility) -> Self {
        ConstructorDecl {
            parameters: Vec::new(),
            visibility,
            is_static: false,
            attributes: Vec::new(),
        }
    }

    /// Append a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: ParamDecl) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Turn this into a type initializer.
    #[must_use]
    pub fn make_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Apply an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }
}

impl ParamDecl {
    /// Apply an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }
}

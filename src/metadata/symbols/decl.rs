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

//! Declaration nodes of a symbol graph.
//!
//! These are plain data: the front end (or the image decoder) fills them in, and everything
//! downstream reads them through [`crate::metadata::symbols::SymbolSource`]. Collections are
//! `Vec`s because declaration order is significant everywhere.

use std::fmt;

use crate::metadata::typesystem::{TypeKind, Visibility};

/// A by-name reference to a type, as written at the use site.
///
/// `full_name` is namespace-qualified (`System.Int32`) or a keyword alias (`int`) or, for types
/// in the global namespace, a bare name. `assembly` optionally names the module expected to
/// define the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    /// Namespace-qualified name
    pub full_name: String,
    /// Assembly name hint (simple name or display name)
    pub assembly: Option<String>,
}

impl TypeRef {
    /// Reference a type by name only.
    pub fn new(full_name: impl Into<String>) -> Self {
        TypeRef {
            full_name: full_name.into(),
            assembly: None,
        }
    }

    /// Reference a type expected in a specific assembly.
    pub fn with_assembly(full_name: impl Into<String>, assembly: impl Into<String>) -> Self {
        TypeRef {
            full_name: full_name.into(),
            assembly: Some(assembly.into()),
        }
    }

    /// The namespace part of the name, empty for the global namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        split_full_name(&self.full_name).0
    }

    /// The simple (non-qualified) part of the name.
    #[must_use]
    pub fn name(&self) -> &str {
        split_full_name(&self.full_name).1
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.assembly {
            Some(assembly) => write!(f, "[{}]{}", assembly, self.full_name),
            None => write!(f, "{}", self.full_name),
        }
    }
}

/// Split `A.B.C` into (`A.B`, `C`).
#[must_use]
pub fn split_full_name(full_name: &str) -> (&str, &str) {
    match full_name.rfind('.') {
        Some(pos) => (&full_name[..pos], &full_name[pos + 1..]),
        None => ("", full_name),
    }
}

/// Join a namespace and a simple name.
#[must_use]
pub fn join_full_name(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}.{name}")
    }
}

/// A compile-time constant.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstValue {
    /// Boolean value
    Bool(bool),
    /// Character value
    Char(char),
    /// Signed 8-bit integer
    I1(i8),
    /// Unsigned 8-bit integer
    U1(u8),
    /// Signed 16-bit integer
    I2(i16),
    /// Unsigned 16-bit integer
    U2(u16),
    /// Signed 32-bit integer
    I4(i32),
    /// Unsigned 32-bit integer
    U4(u32),
    /// Signed 64-bit integer
    I8(i64),
    /// Unsigned 64-bit integer
    U8(u64),
    /// 32-bit floating point
    R4(f32),
    /// 64-bit floating point
    R8(f64),
    /// UTF-8 string
    String(String),
}

/// An attribute argument as the front end saw it.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeExpr {
    /// A literal constant
    Literal(ConstValue),
    /// `typeof(T)`
    TypeOf(TypeRef),
    /// `Enum.Member`
    EnumMember {
        /// The enum type
        enum_type: TypeRef,
        /// The member name
        member: String,
    },
    /// `new T[] { ... }`
    Array {
        /// Element type
        element: TypeRef,
        /// Elements in source order
        items: Vec<AttributeExpr>,
    },
    /// `null`
    Null,
    /// Anything that did not fold to a constant, kept as source text
    Expression(String),
}

/// One applied attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeDecl {
    /// The attribute type
    pub attribute_type: TypeRef,
    /// Constructor arguments in source order
    pub positional: Vec<AttributeExpr>,
    /// Named (`Name = value`) arguments in source order
    pub named: Vec<(String, AttributeExpr)>,
}

impl AttributeDecl {
    /// An attribute without arguments.
    pub fn new(attribute_type: impl Into<String>) -> Self {
        AttributeDecl {
            attribute_type: TypeRef::new(attribute_type),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Append a positional argument.
    #[must_use]
    pub fn arg(mut self, expr: AttributeExpr) -> Self {
        self.positional.push(expr);
        self
    }

    /// Append a named argument.
    #[must_use]
    pub fn named_arg(mut self, name: impl Into<String>, expr: AttributeExpr) -> Self {
        self.named.push((name.into(), expr));
        self
    }
}

/// A method or constructor parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDecl {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub param_type: TypeRef,
    /// Applied attributes
    pub attributes: Vec<AttributeDecl>,
}

impl ParamDecl {
    /// A parameter without attributes.
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        ParamDecl {
            name: name.into(),
            param_type: TypeRef::new(param_type),
            attributes: Vec::new(),
        }
    }
}

/// A declared field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Field name
    pub name: String,
    /// Field type
    pub field_type: TypeRef,
    /// Declared accessibility
    pub visibility: Visibility,
    /// `static` modifier
    pub is_static: bool,
    /// Applied attributes
    pub attributes: Vec<AttributeDecl>,
}

/// The `get` or `set` half of a property.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AccessorDecl {
    /// Accessor-specific accessibility, `None` inherits the property's
    pub visibility: Option<Visibility>,
    /// Attributes applied to the accessor itself
    pub attributes: Vec<AttributeDecl>,
}

/// A declared property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDecl {
    /// Property name
    pub name: String,
    /// Property type
    pub property_type: TypeRef,
    /// Declared accessibility
    pub visibility: Visibility,
    /// `static` modifier
    pub is_static: bool,
    /// The getter, if declared
    pub getter: Option<AccessorDecl>,
    /// The setter, if declared
    pub setter: Option<AccessorDecl>,
    /// Applied attributes
    pub attributes: Vec<AttributeDecl>,
}

impl PropertyDecl {
    /// Number of accessor methods this property contributes.
    #[must_use]
    pub fn accessor_count(&self) -> usize {
        usize::from(self.getter.is_some()) + usize::from(self.setter.is_some())
    }
}

/// A declared method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    /// Method name
    pub name: String,
    /// Return type
    pub return_type: TypeRef,
    /// Parameters in order
    pub parameters: Vec<ParamDecl>,
    /// Declared accessibility
    pub visibility: Visibility,
    /// `static` modifier
    pub is_static: bool,
    /// Applied attributes
    pub attributes: Vec<AttributeDecl>,
}

/// A declared constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorDecl {
    /// Parameters in order
    pub parameters: Vec<ParamDecl>,
    /// Declared accessibility
    pub visibility: Visibility,
    /// Type initializer (`static` constructor)
    pub is_static: bool,
    /// Applied attributes
    pub attributes: Vec<AttributeDecl>,
}

/// A named literal of an enum type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMemberDecl {
    /// Member name
    pub name: String,
    /// Underlying value
    pub value: i64,
}

/// A declared type with all of its members.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Namespace, empty for the global namespace
    pub namespace: String,
    /// Simple name
    pub name: String,
    /// Category
    pub kind: TypeKind,
    /// Declared accessibility
    pub visibility: Visibility,
    /// Base type, if written
    pub base: Option<TypeRef>,
    /// Applied attributes
    pub attributes: Vec<AttributeDecl>,
    /// Fields in declaration order
    pub fields: Vec<FieldDecl>,
    /// Properties in declaration order
    pub properties: Vec<PropertyDecl>,
    /// Methods in declaration order
    pub methods: Vec<MethodDecl>,
    /// Constructors in declaration order
    pub constructors: Vec<ConstructorDecl>,
    /// Enum literals in declaration order, empty unless `kind` is [`TypeKind::Enum`]
    pub enum_members: Vec<EnumMemberDecl>,
}

impl TypeDecl {
    /// An empty type.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: TypeKind) -> Self {
        TypeDecl {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            base: None,
            attributes: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            methods: Vec::new(),
            constructors: Vec::new(),
            enum_members: Vec::new(),
        }
    }

    /// Namespace-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        join_full_name(&self.namespace, &self.name)
    }

    /// Number of `MethodDef` rows the type owns: accessors, methods and constructors.
    #[must_use]
    pub fn method_row_count(&self) -> usize {
        self.properties
            .iter()
            .map(PropertyDecl::accessor_count)
            .sum::<usize>()
            + self.methods.len()
            + self.constructors.len()
    }
}

/// Severity of a front-end diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Compilation would fail
    Error,
    /// Informational
    Warning,
}

/// A diagnostic the host compiler reported while producing the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDiagnostic {
    /// Severity
    pub severity: Severity,
    /// Message text
    pub message: String,
}

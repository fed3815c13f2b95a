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

//! Built-in primitive types and the core library module that declares them.
//!
//! Every [`crate::LoadContext`] registers [`core_library`] under
//! [`crate::metadata::loadcontext::ModuleId::CORE`] (unless disabled in
//! [`crate::LoadOptions`]), so references to `System.Int32` or `string` resolve even when no
//! real core library image was supplied.

use strum::{EnumIter, IntoEnumIterator};

use crate::metadata::{
    identity::{AssemblyIdentity, AssemblyVersion},
    symbols::{SymbolGraph, SymbolGraphBuilder, TypeBuilder, TypeRef},
    typesystem::TypeKind,
};

/// Name of the built-in core library.
pub const CORE_LIBRARY_NAME: &str = "System.Private.CoreLib";

/// Represents all primitive types the core library provides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum PrimitiveKind {
    /// System.Void - represents no value
    Void,
    /// System.Boolean - true/false value
    Boolean,
    /// System.Char - Unicode 16-bit character
    Char,
    /// System.SByte - signed 8-bit integer
    I1,
    /// System.Byte - unsigned 8-bit integer
    U1,
    /// System.Int16 - signed 16-bit integer
    I2,
    /// System.UInt16 - unsigned 16-bit integer
    U2,
    /// System.Int32 - signed 32-bit integer
    I4,
    /// System.UInt32 - unsigned 32-bit integer
    U4,
    /// System.Int64 - signed 64-bit integer
    I8,
    /// System.UInt64 - unsigned 64-bit integer
    U8,
    /// System.Single - 32-bit floating point
    R4,
    /// System.Double - 64-bit floating point
    R8,
    /// System.Decimal - 128-bit decimal
    Decimal,
    /// System.String - immutable string of Unicode characters
    String,
    /// System.Object - base class for all reference types
    Object,
    /// System.ValueType - base class for value types
    ValueType,
    /// System.Enum - base class for enumerations
    Enum,
    /// System.Type - runtime type handle, the type of `typeof` arguments
    Type,
    /// System.Attribute - base class for attributes
    Attribute,
}

impl PrimitiveKind {
    /// Simple name within the `System` namespace.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Void => "Void",
            PrimitiveKind::Boolean => "Boolean",
            PrimitiveKind::Char => "Char",
            PrimitiveKind::I1 => "SByte",
            PrimitiveKind::U1 => "Byte",
            PrimitiveKind::I2 => "Int16",
            PrimitiveKind::U2 => "UInt16",
            PrimitiveKind::I4 => "Int32",
            PrimitiveKind::U4 => "UInt32",
            PrimitiveKind::I8 => "Int64",
            PrimitiveKind::U8 => "UInt64",
            PrimitiveKind::R4 => "Single",
            PrimitiveKind::R8 => "Double",
            PrimitiveKind::Decimal => "Decimal",
            PrimitiveKind::String => "String",
            PrimitiveKind::Object => "Object",
            PrimitiveKind::ValueType => "ValueType",
            PrimitiveKind::Enum => "Enum",
            PrimitiveKind::Type => "Type",
            PrimitiveKind::Attribute => "Attribute",
        }
    }

    /// Namespace of every primitive.
    #[must_use]
    pub fn namespace(self) -> &'static str {
        "System"
    }

    /// `System.<Name>`.
    #[must_use]
    pub fn full_name(self) -> String {
        format!("{}.{}", self.namespace(), self.name())
    }

    /// C# keyword for this primitive, if it has one.
    #[must_use]
    pub fn alias(self) -> Option<&'static str> {
        Some(match self {
            PrimitiveKind::Void => "void",
            PrimitiveKind::Boolean => "bool",
            PrimitiveKind::Char => "char",
            PrimitiveKind::I1 => "sbyte",
            PrimitiveKind::U1 => "byte",
            PrimitiveKind::I2 => "short",
            PrimitiveKind::U2 => "ushort",
            PrimitiveKind::I4 => "int",
            PrimitiveKind::U4 => "uint",
            PrimitiveKind::I8 => "long",
            PrimitiveKind::U8 => "ulong",
            PrimitiveKind::R4 => "float",
            PrimitiveKind::R8 => "double",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::String => "string",
            PrimitiveKind::Object => "object",
            PrimitiveKind::ValueType
            | PrimitiveKind::Enum
            | PrimitiveKind::Type
            | PrimitiveKind::Attribute => return None,
        })
    }

    /// Look a primitive up by C# keyword.
    #[must_use]
    pub fn from_alias(alias: &str) -> Option<Self> {
        PrimitiveKind::iter().find(|kind| kind.alias() == Some(alias))
    }

    fn kind(self) -> TypeKind {
        match self {
            PrimitiveKind::String
            | PrimitiveKind::Object
            | PrimitiveKind::ValueType
            | PrimitiveKind::Enum
            | PrimitiveKind::Type
            | PrimitiveKind::Attribute => TypeKind::Class,
            _ => TypeKind::Struct,
        }
    }

    fn base(self) -> Option<PrimitiveKind> {
        match self {
            PrimitiveKind::Object => None,
            PrimitiveKind::String
            | PrimitiveKind::ValueType
            | PrimitiveKind::Type
            | PrimitiveKind::Attribute => Some(PrimitiveKind::Object),
            _ => Some(PrimitiveKind::ValueType),
        }
    }
}

/// Map a C# keyword alias to the namespace-qualified name; other names pass through.
///
/// ```rust
/// use metascope::metadata::typesystem::canonical_type_name;
///
/// assert_eq!(canonical_type_name("int"), "System.Int32");
/// assert_eq!(canonical_type_name("Contoso.Person"), "Contoso.Person");
/// ```
#[must_use]
pub fn canonical_type_name(name: &str) -> std::borrow::Cow<'_, str> {
    match PrimitiveKind::from_alias(name) {
        Some(kind) => std::borrow::Cow::Owned(kind.full_name()),
        None => std::borrow::Cow::Borrowed(name),
    }
}

/// Identity of the built-in core library.
#[must_use]
pub fn core_library_identity() -> AssemblyIdentity {
    AssemblyIdentity::new(CORE_LIBRARY_NAME, AssemblyVersion::new(8, 0, 0, 0), None)
}

/// Build the core library module declaring every [`PrimitiveKind`].
#[must_use]
pub fn core_library() -> SymbolGraph {
    let mut builder = SymbolGraphBuilder::with_identity(core_library_identity());
    for primitive in PrimitiveKind::iter() {
        let mut decl = TypeBuilder::new(primitive.namespace(), primitive.name(), primitive.kind());
        if let Some(base) = primitive.base() {
            decl = decl.extends(TypeRef::new(base.full_name()));
        }
        builder = builder.add_type(decl.build());
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::symbols::SymbolSource;

    #[test]
    fn aliases() {
        assert_eq!(PrimitiveKind::from_alias("string"), Some(PrimitiveKind::String));
        assert_eq!(PrimitiveKind::from_alias("Int32"), None);
        assert_eq!(canonical_type_name("double"), "System.Double");
        assert_eq!(canonical_type_name("void"), "System.Void");
    }

    #[test]
    fn core_library_declares_all_primitives() {
        let core = core_library();
        assert_eq!(core.identity().name, CORE_LIBRARY_NAME);
        assert_eq!(core.types().len(), PrimitiveKind::iter().count());

        for primitive in PrimitiveKind::iter() {
            assert!(core.find_type(&primitive.full_name()).is_some());
        }

        let object = &core.types()[core.find_type("System.Object").unwrap()];
        assert!(object.base.is_none());
        let int = &core.types()[core.find_type("System.Int32").unwrap()];
        assert_eq!(int.kind, TypeKind::Struct);
        assert_eq!(int.base, Some(TypeRef::new("System.ValueType")));
    }
}

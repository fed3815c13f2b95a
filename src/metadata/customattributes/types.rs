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

//! Attribute-specific types and data structures.
//!
//! This module contains the types used to represent the arguments of an applied attribute
//! after they were resolved as constants.

use std::fmt;

use indexmap::IndexMap;

use crate::{metadata::wrappers::TypeWrapper, Error, Result};

/// Represents a single attribute argument value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedConstant {
    /// `null`
    Null,
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
    /// Type reference (`typeof(T)`), possibly unresolved
    Type(TypeWrapper),
    /// Enum literal
    Enum {
        /// The enum type, possibly unresolved
        enum_type: TypeWrapper,
        /// The literal name
        member: String,
        /// Underlying value, `None` when the enum or the literal could not be resolved
        value: Option<i64>,
    },
    /// Array of arguments
    Array(Vec<TypedConstant>),
}

impl TypedConstant {
    /// Returns `true` if a type named by this value, or by any array element, is unresolved.
    pub(crate) fn references_unresolved(&self) -> bool {
        match self {
            TypedConstant::Type(wrapper) => !wrapper.is_resolved(),
            TypedConstant::Enum { enum_type, .. } => !enum_type.is_resolved(),
            TypedConstant::Array(items) => items.iter().any(TypedConstant::references_unresolved),
            _ => false,
        }
    }

    /// Returns the referenced type of a `typeof` argument.
    #[must_use]
    pub fn as_type(&self) -> Option<&TypeWrapper> {
        match self {
            TypedConstant::Type(wrapper) => Some(wrapper),
            _ => None,
        }
    }

    /// Returns the string of a string argument.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedConstant::String(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the value of a boolean argument.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedConstant::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns any integral argument widened to `i64`; enums yield their underlying value.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TypedConstant::I1(value) => Some(i64::from(*value)),
            TypedConstant::U1(value) => Some(i64::from(*value)),
            TypedConstant::I2(value) => Some(i64::from(*value)),
            TypedConstant::U2(value) => Some(i64::from(*value)),
            TypedConstant::I4(value) => Some(i64::from(*value)),
            TypedConstant::U4(value) => Some(i64::from(*value)),
            TypedConstant::I8(value) => Some(*value),
            TypedConstant::U8(value) => i64::try_from(*value).ok(),
            TypedConstant::Enum { value, .. } => *value,
            _ => None,
        }
    }

    /// Short description used in diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypedConstant::Null => "null",
            TypedConstant::Bool(_) => "bool",
            TypedConstant::Char(_) => "char",
            TypedConstant::I1(_)
            | TypedConstant::U1(_)
            | TypedConstant::I2(_)
            | TypedConstant::U2(_)
            | TypedConstant::I4(_)
            | TypedConstant::U4(_)
            | TypedConstant::I8(_)
            | TypedConstant::U8(_) => "integer",
            TypedConstant::R4(_) | TypedConstant::R8(_) => "floating point",
            TypedConstant::String(_) => "string",
            TypedConstant::Type(_) => "type",
            TypedConstant::Enum { .. } => "enum",
            TypedConstant::Array(_) => "array",
        }
    }
}

impl fmt::Display for TypedConstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedConstant::Null => write!(f, "null"),
            TypedConstant::Bool(value) => write!(f, "{value}"),
            TypedConstant::Char(value) => write!(f, "'{value}'"),
            TypedConstant::I1(value) => write!(f, "{value}"),
            TypedConstant::U1(value) => write!(f, "{value}"),
            TypedConstant::I2(value) => write!(f, "{value}"),
            TypedConstant::U2(value) => write!(f, "{value}"),
            TypedConstant::I4(value) => write!(f, "{value}"),
            TypedConstant::U4(value) => write!(f, "{value}"),
            TypedConstant::I8(value) => write!(f, "{value}"),
            TypedConstant::U8(value) => write!(f, "{value}"),
            TypedConstant::R4(value) => write!(f, "{value}"),
            TypedConstant::R8(value) => write!(f, "{value}"),
            TypedConstant::String(value) => write!(f, "\"{value}\""),
            TypedConstant::Type(wrapper) => write!(f, "typeof({wrapper})"),
            TypedConstant::Enum {
                enum_type, member, ..
            } => write!(f, "{enum_type}.{member}"),
            TypedConstant::Array(items) => {
                write!(f, "[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

/// Resolved arguments of one applied attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeArguments {
    /// Constructor arguments in source order
    pub positional: Vec<TypedConstant>,
    /// Named arguments in source order
    pub named: IndexMap<String, TypedConstant>,
}

/// One applied attribute with its constant arguments.
///
/// If any argument is not a compile-time constant the whole argument list is unavailable and
/// the attribute carries the [`Error::NonConstantArgument`] instead. The attribute type is
/// still reported, so the attribute keeps its place in the ordered list.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeData {
    attribute_type: TypeWrapper,
    arguments: std::result::Result<AttributeArguments, Error>,
}

impl AttributeData {
    pub(crate) fn new(
        attribute_type: TypeWrapper,
        arguments: std::result::Result<AttributeArguments, Error>,
    ) -> Self {
        AttributeData {
            attribute_type,
            arguments,
        }
    }

    /// The attribute type, possibly unresolved.
    #[must_use]
    pub fn attribute_type(&self) -> &TypeWrapper {
        &self.attribute_type
    }

    /// Namespace-qualified name of the attribute type.
    #[must_use]
    pub fn name(&self) -> &str {
        self.attribute_type.full_name()
    }

    /// Both argument lists.
    ///
    /// # Errors
    /// Returns the [`Error::NonConstantArgument`] recorded for this attribute.
    pub fn arguments(&self) -> Result<&AttributeArguments> {
        self.arguments.as_ref().map_err(Clone::clone)
    }

    /// Constructor arguments in source order.
    ///
    /// # Errors
    /// Returns the [`Error::NonConstantArgument`] recorded for this attribute.
    pub fn constructor_arguments(&self) -> Result<&[TypedConstant]> {
        Ok(&self.arguments()?.positional)
    }

    /// Named arguments in source order.
    ///
    /// # Errors
    /// Returns the [`Error::NonConstantArgument`] recorded for this attribute.
    pub fn named_arguments(&self) -> Result<&IndexMap<String, TypedConstant>> {
        Ok(&self.arguments()?.named)
    }

    /// Returns `true` if every argument was a constant.
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.arguments.is_ok()
    }

    /// The unsupported-argument condition, if any.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        self.arguments.as_ref().err()
    }

    /// Returns `true` if the attribute type or any argument names an unresolved type.
    pub(crate) fn references_unresolved(&self) -> bool {
        if !self.attribute_type.is_resolved() {
            return true;
        }
        match &self.arguments {
            Ok(arguments) => arguments
                .positional
                .iter()
                .chain(arguments.named.values())
                .any(TypedConstant::references_unresolved),
            Err(_) => false,
        }
    }

    /// Returns `true` if this attribute's type is called `name`.
    ///
    /// `name` may be namespace-qualified or simple, and may omit the `Attribute` suffix.
    /// Namespaces are compared only when `name` carries one. An unresolved attribute type
    /// written without a namespace (`[JsonIgnore]` under a `using` the front end could not
    /// bind) matches on its simple name alone.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        attribute_name_matches(
            self.attribute_type.namespace(),
            self.attribute_type.name(),
            !self.attribute_type.is_resolved(),
            name,
        )
    }
}

const ATTRIBUTE_SUFFIX: &str = "Attribute";

fn strip_suffix(name: &str) -> &str {
    match name.strip_suffix(ATTRIBUTE_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => name,
    }
}

pub(crate) fn attribute_name_matches(
    namespace: &str,
    name: &str,
    unbound: bool,
    query: &str,
) -> bool {
    let (query_namespace, query_name) = crate::metadata::symbols::split_full_name(query);
    let namespace_unknown = unbound && namespace.is_empty();
    if !query_namespace.is_empty() && !namespace_unknown && query_namespace != namespace {
        return false;
    }
    strip_suffix(name) == strip_suffix(query_name)
}

/// .NET `CorSerializationType` constants as defined in corhdr.h, plus a tag for `null`
#[allow(non_snake_case, missing_docs)]
pub mod SERIALIZATION_TYPE {
    pub const NULL: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0A;
    pub const U8: u8 = 0x0B;
    pub const R4: u8 = 0x0C;
    pub const R8: u8 = 0x0D;
    pub const STRING: u8 = 0x0E;
    pub const TYPE: u8 = 0x50;
    pub const TAGGED_OBJECT: u8 = 0x51;
    pub const ENUM: u8 = 0x55;
    pub const SZARRAY: u8 = 0x1D;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_matching() {
        let ns = "System.Text.Json.Serialization";
        let matches = |namespace: &str, name: &str, query: &str| {
            attribute_name_matches(namespace, name, false, query)
        };
        assert!(matches(ns, "JsonIgnoreAttribute", "JsonIgnore"));
        assert!(matches(ns, "JsonIgnoreAttribute", "JsonIgnoreAttribute"));
        assert!(matches(
            ns,
            "JsonIgnoreAttribute",
            "System.Text.Json.Serialization.JsonIgnoreAttribute"
        ));
        assert!(matches(ns, "JsonIgnoreAttribute", "System.Text.Json.Serialization.JsonIgnore"));
        assert!(!matches(ns, "JsonIgnoreAttribute", "Other.JsonIgnore"));
        assert!(!matches(ns, "JsonIgnoreAttribute", "Ignore"));
        assert!(matches("", "Attribute", "Attribute"));
    }

    #[test]
    fn global_namespace_needs_an_unbound_type() {
        let qualified = "System.Text.Json.Serialization.JsonSerializableAttribute";

        assert!(!attribute_name_matches("", "JsonSerializableAttribute", false, qualified));
        assert!(attribute_name_matches("", "JsonSerializable", true, qualified));
        assert!(attribute_name_matches("", "JsonSerializableAttribute", false, "JsonSerializable"));
        assert!(!attribute_name_matches("Other", "JsonSerializable", true, qualified));
    }

    #[test]
    fn constant_conversions() {
        assert_eq!(TypedConstant::I2(-4).as_i64(), Some(-4));
        assert_eq!(TypedConstant::U8(u64::MAX).as_i64(), None);
        assert_eq!(TypedConstant::String("x".into()).as_str(), Some("x"));
        assert_eq!(TypedConstant::Bool(true).as_bool(), Some(true));
        assert_eq!(TypedConstant::Null.kind_name(), "null");
        assert_eq!(
            TypedConstant::Array(vec![TypedConstant::I4(1), TypedConstant::Null]).to_string(),
            "[1, null]"
        );
    }
}

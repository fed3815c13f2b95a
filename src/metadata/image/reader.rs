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

use crate::{
    file::parser::Parser,
    metadata::{
        customattributes::SERIALIZATION_TYPE,
        identity::{AssemblyIdentity, AssemblyVersion},
        image::{ModuleImage, NO_VISIBILITY},
        symbols::{
            AccessorDecl, AttributeDecl, AttributeExpr, ConstValue, ConstructorDecl,
            EnumMemberDecl, FieldDecl, MethodDecl, ParamDecl, PropertyDecl, TypeDecl, TypeRef,
        },
        typesystem::{TypeKind, Visibility},
    },
    Error, Result,
};

/// Maximum nesting depth of array arguments.
const MAX_NESTING_DEPTH: usize = 64;

/// Decoder for the module image layout written by [`crate::metadata::image::ModuleWriter`].
pub(crate) struct ImageReader<'a> {
    parser: Parser<'a>,
}

impl<'a> ImageReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        ImageReader {
            parser: Parser::new(data),
        }
    }

    /// Read magic, format version and identity.
    pub(crate) fn read_header(&mut self) -> Result<AssemblyIdentity> {
        let magic = self.parser.read_bytes(ModuleImage::MAGIC.len())?;
        if magic != ModuleImage::MAGIC {
            return Err(malformed_error!("Invalid module image magic - {:02x?}", magic));
        }

        let version = self.parser.read_le::<u16>()?;
        if version != ModuleImage::FORMAT_VERSION {
            return Err(Error::NotSupported(version));
        }

        let name = self.parser.read_string()?;
        if name.is_empty() {
            return Err(malformed_error!("Module image has an empty assembly name"));
        }

        let version = AssemblyVersion::new(
            self.parser.read_le::<u16>()?,
            self.parser.read_le::<u16>()?,
            self.parser.read_le::<u16>()?,
            self.parser.read_le::<u16>()?,
        );
        let culture = self.parser.read_optional_string()?;

        Ok(AssemblyIdentity::new(name, version, culture))
    }

    /// Read module attributes and the type table; the header must already be consumed.
    pub(crate) fn read_body(&mut self) -> Result<(Vec<AttributeDecl>, Vec<TypeDecl>)> {
        let module_attributes = self.read_attributes()?;

        let count = self.parser.read_count(1)?;
        let mut types = Vec::with_capacity(count);
        for _ in 0..count {
            types.push(self.read_type()?);
        }

        if self.parser.has_more_data() {
            return Err(malformed_error!(
                "{} trailing bytes after the type table",
                self.parser.remaining()
            ));
        }

        Ok((module_attributes, types))
    }

    fn read_type(&mut self) -> Result<TypeDecl> {
        let namespace = self.parser.read_string()?;
        let name = self.parser.read_string()?;
        let kind = self.read_kind()?;
        let visibility = self.read_visibility()?;
        let base = if self.parser.read_bool()? {
            Some(self.read_type_ref()?)
        } else {
            None
        };
        let attributes = self.read_attributes()?;

        let count = self.parser.read_count(1)?;
        let mut fields = Vec::with_capacity(count);
        for _ in 0..count {
            fields.push(self.read_field()?);
        }

        let count = self.parser.read_count(1)?;
        let mut properties = Vec::with_capacity(count);
        for _ in 0..count {
            properties.push(self.read_property()?);
        }

        let count = self.parser.read_count(1)?;
        let mut methods = Vec::with_capacity(count);
        for _ in 0..count {
            methods.push(self.read_method()?);
        }

        let count = self.parser.read_count(1)?;
        let mut constructors = Vec::with_capacity(count);
        for _ in 0..count {
            constructors.push(self.read_constructor()?);
        }

        let count = self.parser.read_count(1)?;
        let mut enum_members = Vec::with_capacity(count);
        for _ in 0..count {
            enum_members.push(EnumMemberDecl {
                name: self.parser.read_string()?,
                value: self.parser.read_le::<i64>()?,
            });
        }

        Ok(TypeDecl {
            namespace,
            name,
            kind,
            visibility,
            base,
            attributes,
            fields,
            properties,
            methods,
            constructors,
            enum_members,
        })
    }

    fn read_field(&mut self) -> Result<FieldDecl> {
        Ok(FieldDecl {
            name: self.parser.read_string()?,
            field_type: self.read_type_ref()?,
            visibility: self.read_visibility()?,
            is_static: self.parser.read_bool()?,
            attributes: self.read_attributes()?,
        })
    }

    fn read_property(&mut self) -> Result<PropertyDecl> {
        Ok(PropertyDecl {
            name: self.parser.read_string()?,
            property_type: self.read_type_ref()?,
            visibility: self.read_visibility()?,
            is_static: self.parser.read_bool()?,
            getter: self.read_accessor()?,
            setter: self.read_accessor()?,
            attributes: self.read_attributes()?,
        })
    }

    fn read_accessor(&mut self) -> Result<Option<AccessorDecl>> {
        if !self.parser.read_bool()? {
            return Ok(None);
        }

        let visibility = match self.parser.read_le::<u8>()? {
            NO_VISIBILITY => None,
            raw => Some(
                Visibility::from_repr(raw)
                    .ok_or_else(|| malformed_error!("Invalid accessor visibility - {}", raw))?,
            ),
        };

        Ok(Some(AccessorDecl {
            visibility,
            attributes: self.read_attributes()?,
        }))
    }

    fn read_method(&mut self) -> Result<MethodDecl> {
        Ok(MethodDecl {
            name: self.parser.read_string()?,
            return_type: self.read_type_ref()?,
            visibility: self.read_visibility()?,
            is_static: self.parser.read_bool()?,
            parameters: self.read_parameters()?,
            attributes: self.read_attributes()?,
        })
    }

    fn read_constructor(&mut self) -> Result<ConstructorDecl> {
        Ok(ConstructorDecl {
            visibility: self.read_visibility()?,
            is_static: self.parser.read_bool()?,
            parameters: self.read_parameters()?,
            attributes: self.read_attributes()?,
        })
    }

    fn read_parameters(&mut self) -> Result<Vec<ParamDecl>> {
        let count = self.parser.read_count(1)?;
        let mut parameters = Vec::with_capacity(count);
        for _ in 0..count {
            parameters.push(ParamDecl {
                name: self.parser.read_string()?,
                param_type: self.read_type_ref()?,
                attributes: self.read_attributes()?,
            });
        }
        Ok(parameters)
    }

    fn read_attributes(&mut self) -> Result<Vec<AttributeDecl>> {
        let count = self.parser.read_count(1)?;
        let mut attributes = Vec::with_capacity(count);
        for _ in 0..count {
            attributes.push(self.read_attribute()?);
        }
        Ok(attributes)
    }

    fn read_attribute(&mut self) -> Result<AttributeDecl> {
        let attribute_type = self.read_type_ref()?;

        let count = self.parser.read_count(1)?;
        let mut positional = Vec::with_capacity(count);
        for _ in 0..count {
            positional.push(self.read_expr(0)?);
        }

        let count = self.parser.read_count(1)?;
        let mut named = Vec::with_capacity(count);
        for _ in 0..count {
            let name = self.parser.read_string()?;
            named.push((name, self.read_expr(0)?));
        }

        Ok(AttributeDecl {
            attribute_type,
            positional,
            named,
        })
    }

    fn read_expr(&mut self, depth: usize) -> Result<AttributeExpr> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::RecursionLimit(MAX_NESTING_DEPTH));
        }

        let tag = self.parser.read_le::<u8>()?;
        let expr = match tag {
            SERIALIZATION_TYPE::NULL => AttributeExpr::Null,
            SERIALIZATION_TYPE::BOOLEAN => {
                AttributeExpr::Literal(ConstValue::Bool(self.parser.read_bool()?))
            }
            SERIALIZATION_TYPE::CHAR => {
                let raw = self.parser.read_le::<u32>()?;
                let value = char::from_u32(raw)
                    .ok_or_else(|| malformed_error!("Invalid char value - {:#x}", raw))?;
                AttributeExpr::Literal(ConstValue::Char(value))
            }
            SERIALIZATION_TYPE::I1 => AttributeExpr::Literal(ConstValue::I1(self.parser.read_le()?)),
            SERIALIZATION_TYPE::U1 => AttributeExpr::Literal(ConstValue::U1(self.parser.read_le()?)),
            SERIALIZATION_TYPE::I2 => AttributeExpr::Literal(ConstValue::I2(self.parser.read_le()?)),
            SERIALIZATION_TYPE::U2 => AttributeExpr::Literal(ConstValue::U2(self.parser.read_le()?)),
            SERIALIZATION_TYPE::I4 => AttributeExpr::Literal(ConstValue::I4(self.parser.read_le()?)),
            SERIALIZATION_TYPE::U4 => AttributeExpr::Literal(ConstValue::U4(self.parser.read_le()?)),
            SERIALIZATION_TYPE::I8 => AttributeExpr::Literal(ConstValue::I8(self.parser.read_le()?)),
            SERIALIZATION_TYPE::U8 => AttributeExpr::Literal(ConstValue::U8(self.parser.read_le()?)),
            SERIALIZATION_TYPE::R4 => AttributeExpr::Literal(ConstValue::R4(self.parser.read_le()?)),
            SERIALIZATION_TYPE::R8 => AttributeExpr::Literal(ConstValue::R8(self.parser.read_le()?)),
            SERIALIZATION_TYPE::STRING => {
                AttributeExpr::Literal(ConstValue::String(self.parser.read_string()?))
            }
            SERIALIZATION_TYPE::TYPE => AttributeExpr::TypeOf(self.read_type_ref()?),
            SERIALIZATION_TYPE::ENUM => AttributeExpr::EnumMember {
                enum_type: self.read_type_ref()?,
                member: self.parser.read_string()?,
            },
            SERIALIZATION_TYPE::SZARRAY => {
                let element = self.read_type_ref()?;
                let count = self.parser.read_count(1)?;
                let mut items = Vec::with_capacity(count);
                for _ in 0..count {
                    items.push(self.read_expr(depth + 1)?);
                }
                AttributeExpr::Array { element, items }
            }
            _ => {
                return Err(malformed_error!(
                    "Unknown argument tag {:#04x} at offset {}",
                    tag,
                    self.parser.pos() - 1
                ))
            }
        };
        Ok(expr)
    }

    fn read_type_ref(&mut self) -> Result<TypeRef> {
        let full_name = self.parser.read_string()?;
        if full_name.is_empty() {
            return Err(malformed_error!("Empty type reference"));
        }
        Ok(TypeRef {
            full_name,
            assembly: self.parser.read_optional_string()?,
        })
    }

    fn read_visibility(&mut self) -> Result<Visibility> {
        let raw = self.parser.read_le::<u8>()?;
        Visibility::from_repr(raw).ok_or_else(|| malformed_error!("Invalid visibility - {}", raw))
    }

    fn read_kind(&mut self) -> Result<TypeKind> {
        let raw = self.parser.read_le::<u8>()?;
        TypeKind::from_repr(raw).ok_or_else(|| malformed_error!("Invalid type kind - {}", raw))
    }
}

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
    file::writer::Writer,
    metadata::{
        customattributes::SERIALIZATION_TYPE,
        identity::AssemblyIdentity,
        image::{ModuleImage, NO_VISIBILITY},
        symbols::{
            AccessorDecl, AttributeDecl, AttributeExpr, ConstValue, ConstructorDecl, FieldDecl,
            MethodDecl, ParamDecl, PropertyDecl, SymbolSource, TypeDecl, TypeRef,
        },
    },
    Error, Result,
};

/// Serializes a symbol source into a module image.
///
/// Images carry constants only. An attribute argument the front end left as an
/// [`AttributeExpr::Expression`] cannot be represented and fails the whole emit with
/// [`Error::NonConstantArgument`]; a partially written image is never returned.
///
/// # Examples
///
/// ```rust
/// use metascope::prelude::*;
/// use metascope::metadata::image::{ModuleImage, ModuleWriter};
///
/// let graph = SymbolGraphBuilder::new("Contoso.Models")
///     .add_type(TypeBuilder::class("Contoso", "Person").build())
///     .build();
///
/// let bytes = ModuleWriter::emit(&graph)?;
/// let image = ModuleImage::from_bytes(&bytes)?;
/// assert_eq!(image.types()[0].name, "Person");
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct ModuleWriter {
    writer: Writer,
}

impl ModuleWriter {
    /// Encode `source` into image bytes.
    ///
    /// # Errors
    /// Returns [`Error::NonConstantArgument`] for a non-constant attribute argument, or
    /// [`Error::Malformed`] if a collection is too large for the encoding.
    pub fn emit<S: SymbolSource + ?Sized>(source: &S) -> Result<Vec<u8>> {
        let mut emitter = ModuleWriter {
            writer: Writer::new(),
        };

        emitter.write_header(source.identity())?;
        emitter.write_attributes(source.module_attributes())?;

        emitter.writer.write_count(source.types().len())?;
        for decl in source.types() {
            emitter.write_type(decl)?;
        }

        Ok(emitter.writer.into_inner())
    }

    fn write_header(&mut self, identity: &AssemblyIdentity) -> Result<()> {
        self.writer.write_bytes(&ModuleImage::MAGIC);
        self.writer.write_le::<u16>(ModuleImage::FORMAT_VERSION);
        self.writer.write_string(&identity.name)?;
        self.writer.write_le::<u16>(identity.version.major);
        self.writer.write_le::<u16>(identity.version.minor);
        self.writer.write_le::<u16>(identity.version.build);
        self.writer.write_le::<u16>(identity.version.revision);
        self.writer
            .write_optional_string(identity.culture.as_deref())
    }

    fn write_type(&mut self, decl: &TypeDecl) -> Result<()> {
        self.writer.write_string(&decl.namespace)?;
        self.writer.write_string(&decl.name)?;
        self.writer.write_le::<u8>(decl.kind as u8);
        self.writer.write_le::<u8>(decl.visibility as u8);
        self.write_optional_type_ref(decl.base.as_ref())?;
        self.write_attributes(&decl.attributes)?;

        self.writer.write_count(decl.fields.len())?;
        for field in &decl.fields {
            self.write_field(field)?;
        }

        self.writer.write_count(decl.properties.len())?;
        for property in &decl.properties {
            self.write_property(property)?;
        }

        self.writer.write_count(decl.methods.len())?;
        for method in &decl.methods {
            self.write_method(method)?;
        }

        self.writer.write_count(decl.constructors.len())?;
        for constructor in &decl.constructors {
            self.write_constructor(constructor)?;
        }

        self.writer.write_count(decl.enum_members.len())?;
        for member in &decl.enum_members {
            self.writer.write_string(&member.name)?;
            self.writer.write_le::<i64>(member.value);
        }

        Ok(())
    }

    fn write_field(&mut self, field: &FieldDecl) -> Result<()> {
        self.writer.write_string(&field.name)?;
        self.write_type_ref(&field.field_type)?;
        self.writer.write_le::<u8>(field.visibility as u8);
        self.writer.write_bool(field.is_static);
        self.write_attributes(&field.attributes)
    }

    fn write_property(&mut self, property: &PropertyDecl) -> Result<()> {
        self.writer.write_string(&property.name)?;
        self.write_type_ref(&property.property_type)?;
        self.writer.write_le::<u8>(property.visibility as u8);
        self.writer.write_bool(property.is_static);
        self.write_accessor(property.getter.as_ref())?;
        self.write_accessor(property.setter.as_ref())?;
        self.write_attributes(&property.attributes)
    }

    fn write_accessor(&mut self, accessor: Option<&AccessorDecl>) -> Result<()> {
        let Some(accessor) = accessor else {
            self.writer.write_bool(false);
            return Ok(());
        };

        self.writer.write_bool(true);
        self.writer.write_le::<u8>(
            accessor
                .visibility
                .map_or(NO_VISIBILITY, |visibility| visibility as u8),
        );
        self.write_attributes(&accessor.attributes)
    }

    fn write_method(&mut self, method: &MethodDecl) -> Result<()> {
        self.writer.write_string(&method.name)?;
        self.write_type_ref(&method.return_type)?;
        self.writer.write_le::<u8>(method.visibility as u8);
        self.writer.write_bool(method.is_static);
        self.write_parameters(&method.parameters)?;
        self.write_attributes(&method.attributes)
    }

    fn write_constructor(&mut self, constructor: &ConstructorDecl) -> Result<()> {
        self.writer.write_le::<u8>(constructor.visibility as u8);
        self.writer.write_bool(constructor.is_static);
        self.write_parameters(&constructor.parameters)?;
        self.write_attributes(&constructor.attributes)
    }

    fn write_parameters(&mut self, parameters: &[ParamDecl]) -> Result<()> {
        self.writer.write_count(parameters.len())?;
        for parameter in parameters {
            self.writer.write_string(&parameter.name)?;
            self.write_type_ref(&parameter.param_type)?;
            self.write_attributes(&parameter.attributes)?;
        }
        Ok(())
    }

    fn write_attributes(&mut self, attributes: &[AttributeDecl]) -> Result<()> {
        self.writer.write_count(attributes.len())?;
        for attribute in attributes {
            self.write_attribute(attribute)?;
        }
        Ok(())
    }

    fn write_attribute(&mut self, attribute: &AttributeDecl) -> Result<()> {
        self.write_type_ref(&attribute.attribute_type)?;

        self.writer.write_count(attribute.positional.len())?;
        for (position, expr) in attribute.positional.iter().enumerate() {
            self.write_expr(expr, attribute, &format!("#{position}"))?;
        }

        self.writer.write_count(attribute.named.len())?;
        for (name, expr) in &attribute.named {
            self.writer.write_string(name)?;
            self.write_expr(expr, attribute, name)?;
        }
        Ok(())
    }

    fn write_expr(&mut self, expr: &AttributeExpr, owner: &AttributeDecl, argument: &str) -> Result<()> {
        match expr {
            AttributeExpr::Null => self.writer.write_le::<u8>(SERIALIZATION_TYPE::NULL),
            AttributeExpr::Literal(value) => self.write_const(value)?,
            AttributeExpr::TypeOf(reference) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::TYPE);
                self.write_type_ref(reference)?;
            }
            AttributeExpr::EnumMember { enum_type, member } => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::ENUM);
                self.write_type_ref(enum_type)?;
                self.writer.write_string(member)?;
            }
            AttributeExpr::Array { element, items } => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::SZARRAY);
                self.write_type_ref(element)?;
                self.writer.write_count(items.len())?;
                for item in items {
                    self.write_expr(item, owner, argument)?;
                }
            }
            AttributeExpr::Expression(expression) => {
                return Err(Error::NonConstantArgument {
                    attribute: owner.attribute_type.full_name.clone(),
                    argument: argument.to_string(),
                    expression: expression.clone(),
                });
            }
        }
        Ok(())
    }

    fn write_const(&mut self, value: &ConstValue) -> Result<()> {
        match value {
            ConstValue::Bool(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::BOOLEAN);
                self.writer.write_bool(*v);
            }
            ConstValue::Char(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::CHAR);
                self.writer.write_le::<u32>(u32::from(*v));
            }
            ConstValue::I1(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::I1);
                self.writer.write_le::<i8>(*v);
            }
            ConstValue::U1(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::U1);
                self.writer.write_le::<u8>(*v);
            }
            ConstValue::I2(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::I2);
                self.writer.write_le::<i16>(*v);
            }
            ConstValue::U2(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::U2);
                self.writer.write_le::<u16>(*v);
            }
            ConstValue::I4(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::I4);
                self.writer.write_le::<i32>(*v);
            }
            ConstValue::U4(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::U4);
                self.writer.write_le::<u32>(*v);
            }
            ConstValue::I8(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::I8);
                self.writer.write_le::<i64>(*v);
            }
            ConstValue::U8(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::U8);
                self.writer.write_le::<u64>(*v);
            }
            ConstValue::R4(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::R4);
                self.writer.write_le::<f32>(*v);
            }
            ConstValue::R8(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::R8);
                self.writer.write_le::<f64>(*v);
            }
            ConstValue::String(v) => {
                self.writer.write_le::<u8>(SERIALIZATION_TYPE::STRING);
                self.writer.write_string(v)?;
            }
        }
        Ok(())
    }

    fn write_type_ref(&mut self, reference: &TypeRef) -> Result<()> {
        self.writer.write_string(&reference.full_name)?;
        self.writer
            .write_optional_string(reference.assembly.as_deref())
    }

    fn write_optional_type_ref(&mut self, reference: Option<&TypeRef>) -> Result<()> {
        match reference {
            None => {
                self.writer.write_bool(false);
                Ok(())
            }
            Some(reference) => {
                self.writer.write_bool(true);
                self.write_type_ref(reference)
            }
        }
    }
}

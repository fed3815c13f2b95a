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

use indexmap::IndexMap;
use tracing::debug;

use crate::{
    metadata::{
        customattributes::{AttributeArguments, AttributeData, TypedConstant},
        loadcontext::{ContextShared, ModuleId},
        symbols::{AttributeDecl, AttributeExpr, ConstValue},
    },
    Error, Result,
};

/// Maximum nesting depth of array arguments.
const MAX_NESTING_DEPTH: usize = 64;

/// Resolve a list of applied attributes declared in `module`, keeping their order.
///
/// # Errors
/// Returns [`Error::ContextClosed`] if the context closes while types are resolved.
/// Non-constant arguments do not fail the call; they are recorded on the affected attribute.
pub(crate) fn read_attributes(
    shared: &ContextShared,
    module: ModuleId,
    decls: &[AttributeDecl],
) -> Result<Vec<AttributeData>> {
    decls
        .iter()
        .map(|decl| read_attribute(shared, module, decl))
        .collect()
}

/// Resolve one applied attribute declared in `module`.
///
/// # Errors
/// Returns [`Error::ContextClosed`] if the context closes while types are resolved.
fn read_attribute(
    shared: &ContextShared,
    module: ModuleId,
    decl: &AttributeDecl,
) -> Result<AttributeData> {
    let attribute_type = shared.resolve_type_ref(module, &decl.attribute_type)?;
    let reader = ArgumentReader {
        shared,
        module,
        attribute: attribute_type.full_name(),
    };

    let arguments = match reader.read(decl) {
        Ok(arguments) => Ok(arguments),
        Err(error @ (Error::NonConstantArgument { .. } | Error::RecursionLimit(_))) => {
            debug!(attribute = %attribute_type, %error, "attribute arguments are not constant");
            Err(error)
        }
        Err(error) => return Err(error),
    };

    Ok(AttributeData::new(attribute_type.clone(), arguments))
}

struct ArgumentReader<'a> {
    shared: &'a ContextShared,
    module: ModuleId,
    attribute: &'a str,
}

impl ArgumentReader<'_> {
    fn read(&self, decl: &AttributeDecl) -> Result<AttributeArguments> {
        let mut positional = Vec::with_capacity(decl.positional.len());
        for (index, expr) in decl.positional.iter().enumerate() {
            positional.push(self.evaluate(&format!("#{index}"), expr, 0)?);
        }

        let mut named = IndexMap::with_capacity(decl.named.len());
        for (name, expr) in &decl.named {
            let value = self.evaluate(name, expr, 0)?;
            named.insert(name.clone(), value);
        }

        Ok(AttributeArguments { positional, named })
    }

    fn evaluate(&self, argument: &str, expr: &AttributeExpr, depth: usize) -> Result<TypedConstant> {
        if depth > MAX_NESTING_DEPTH {
            return Err(Error::RecursionLimit(MAX_NESTING_DEPTH));
        }

        Ok(match expr {
            AttributeExpr::Literal(value) => literal(value),
            AttributeExpr::Null => TypedConstant::Null,
            AttributeExpr::TypeOf(reference) => {
                TypedConstant::Type(self.shared.resolve_type_ref(self.module, reference)?)
            }
            AttributeExpr::EnumMember { enum_type, member } => {
                let enum_type = self.shared.resolve_type_ref(self.module, enum_type)?;
                let value = enum_type.enum_value(member);
                TypedConstant::Enum {
                    enum_type,
                    member: member.clone(),
                    value,
                }
            }
            AttributeExpr::Array { items, .. } => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.evaluate(argument, item, depth + 1)?);
                }
                TypedConstant::Array(values)
            }
            AttributeExpr::Expression(expression) => {
                return Err(Error::NonConstantArgument {
                    attribute: self.attribute.to_string(),
                    argument: argument.to_string(),
                    expression: expression.clone(),
                })
            }
        })
    }
}

fn literal(value: &ConstValue) -> TypedConstant {
    match value {
        ConstValue::Bool(value) => TypedConstant::Bool(*value),
        ConstValue::Char(value) => TypedConstant::Char(*value),
        ConstValue::I1(value) => TypedConstant::I1(*value),
        ConstValue::U1(value) => TypedConstant::U1(*value),
        ConstValue::I2(value) => TypedConstant::I2(*value),
        ConstValue::U2(value) => TypedConstant::U2(*value),
        ConstValue::I4(value) => TypedConstant::I4(*value),
        ConstValue::U4(value) => TypedConstant::U4(*value),
        ConstValue::I8(value) => TypedConstant::I8(*value),
        ConstValue::U8(value) => TypedConstant::U8(*value),
        ConstValue::R4(value) => TypedConstant::R4(*value),
        ConstValue::R8(value) => TypedConstant::R8(*value),
        ConstValue::String(value) => TypedConstant::String(value.clone()),
    }
}

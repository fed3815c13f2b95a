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

//! Token assignment for the declarations of one module.
//!
//! A [`ModuleLayout`] is computed once per registered module. It records, for every type, the
//! first row it owns in each flattened member table, which turns tokens into declarations with
//! a binary search and declarations into tokens with an addition.

use crate::{
    metadata::{
        symbols::{
            AccessorDecl, AttributeDecl, ConstructorDecl, FieldDecl, MethodDecl, PropertyDecl,
            SymbolSource, TypeDecl,
        },
        token::{TableId, Token},
    },
    Result,
};

/// First row (1-based) a type owns in each member table.
#[derive(Debug, Clone, Copy)]
struct TypeRows {
    field: u32,
    property: u32,
    method: u32,
}

/// Which `MethodDef` row of a type this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MethodSlot {
    /// Getter of the property at this index
    Getter(usize),
    /// Setter of the property at this index
    Setter(usize),
    /// Declared method at this index
    Declared(usize),
    /// Constructor at this index
    Constructor(usize),
}

impl MethodSlot {
    /// Index into the collection the slot refers to.
    pub(crate) fn index(self) -> usize {
        match self {
            MethodSlot::Getter(index)
            | MethodSlot::Setter(index)
            | MethodSlot::Declared(index)
            | MethodSlot::Constructor(index) => index,
        }
    }
}

/// A declaration found by token.
#[derive(Clone, Copy)]
pub(crate) enum DeclRef<'a> {
    Type(&'a TypeDecl),
    Field(&'a FieldDecl),
    Property(&'a PropertyDecl),
    Accessor {
        property: &'a PropertyDecl,
        accessor: &'a AccessorDecl,
        is_setter: bool,
    },
    Method(&'a MethodDecl),
    Constructor(&'a ConstructorDecl),
}

impl<'a> DeclRef<'a> {
    /// Attributes declared directly on this node.
    pub(crate) fn attributes(self) -> &'a [AttributeDecl] {
        match self {
            DeclRef::Type(decl) => &decl.attributes,
            DeclRef::Field(decl) => &decl.attributes,
            DeclRef::Property(decl) => &decl.attributes,
            DeclRef::Accessor { accessor, .. } => &accessor.attributes,
            DeclRef::Method(decl) => &decl.attributes,
            DeclRef::Constructor(decl) => &decl.attributes,
        }
    }
}

/// A declaration plus the type that declares it.
pub(crate) struct Located<'a> {
    pub(crate) type_index: usize,
    /// Position within the owner's collection; for accessors, the property's position
    pub(crate) member_index: usize,
    pub(crate) owner: &'a TypeDecl,
    pub(crate) decl: DeclRef<'a>,
}

/// Row bookkeeping for one module.
#[derive(Debug, Clone)]
pub(crate) struct ModuleLayout {
    rows: Vec<TypeRows>,
    field_count: u32,
    property_count: u32,
    method_count: u32,
}

impl ModuleLayout {
    /// Assign rows to every declaration of `source`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if a table would exceed the 24-bit row space.
    pub(crate) fn new(source: &dyn SymbolSource) -> Result<Self> {
        let types = source.types();
        if types.len() > Token::MAX_ROW as usize {
            return Err(malformed_error!(
                "Module '{}' declares {} types, more than a token can address",
                source.identity().name,
                types.len()
            ));
        }

        let mut rows = Vec::with_capacity(types.len());
        let (mut field, mut property, mut method) = (1usize, 1usize, 1usize);
        for decl in types {
            rows.push(TypeRows {
                field: field as u32,
                property: property as u32,
                method: method as u32,
            });
            field += decl.fields.len();
            property += decl.properties.len();
            method += decl.method_row_count();

            if field.max(property).max(method) > Token::MAX_ROW as usize + 1 {
                return Err(malformed_error!(
                    "Module '{}' declares more members than a token can address",
                    source.identity().name
                ));
            }
        }

        Ok(ModuleLayout {
            rows,
            field_count: (field - 1) as u32,
            property_count: (property - 1) as u32,
            method_count: (method - 1) as u32,
        })
    }

    /// Token of the module itself.
    pub(crate) fn module_token() -> Token {
        Token::from_parts(TableId::Module, 1)
    }

    pub(crate) fn type_token(type_index: usize) -> Token {
        Token::from_parts(TableId::TypeDef, type_index as u32 + 1)
    }

    pub(crate) fn field_token(&self, type_index: usize, index: usize) -> Token {
        Token::from_parts(TableId::Field, self.rows[type_index].field + index as u32)
    }

    pub(crate) fn property_token(&self, type_index: usize, index: usize) -> Token {
        Token::from_parts(TableId::Property, self.rows[type_index].property + index as u32)
    }

    /// Token of a method slot. Slots are ordered accessors, declared methods, constructors.
    pub(crate) fn method_token(&self, owner: &TypeDecl, type_index: usize, slot: MethodSlot) -> Token {
        let accessor_rows: usize = owner.properties.iter().map(PropertyDecl::accessor_count).sum();
        let offset = match slot {
            MethodSlot::Getter(property) | MethodSlot::Setter(property) => {
                let before: usize = owner.properties[..property]
                    .iter()
                    .map(PropertyDecl::accessor_count)
                    .sum();
                let own_getter = owner.properties[property].getter.is_some();
                before + usize::from(matches!(slot, MethodSlot::Setter(_)) && own_getter)
            }
            MethodSlot::Declared(index) => accessor_rows + index,
            MethodSlot::Constructor(index) => accessor_rows + owner.methods.len() + index,
        };
        Token::from_parts(TableId::MethodDef, self.rows[type_index].method + offset as u32)
    }

    /// Every `MethodDef` slot of a type in row order.
    pub(crate) fn method_slots(owner: &TypeDecl) -> Vec<MethodSlot> {
        let mut slots = Vec::with_capacity(owner.method_row_count());
        for (index, property) in owner.properties.iter().enumerate() {
            if property.getter.is_some() {
                slots.push(MethodSlot::Getter(index));
            }
            if property.setter.is_some() {
                slots.push(MethodSlot::Setter(index));
            }
        }
        slots.extend((0..owner.methods.len()).map(MethodSlot::Declared));
        slots.extend((0..owner.constructors.len()).map(MethodSlot::Constructor));
        slots
    }

    /// Find the declaration a token addresses.
    pub(crate) fn locate<'a>(&self, source: &'a dyn SymbolSource, token: Token) -> Option<Located<'a>> {
        let types = source.types();
        let row = token.row();
        if row == 0 {
            return None;
        }

        match token.table_id()? {
            TableId::Module => None,
            TableId::TypeDef => {
                let type_index = (row - 1) as usize;
                let owner = types.get(type_index)?;
                Some(Located {
                    type_index,
                    member_index: 0,
                    owner,
                    decl: DeclRef::Type(owner),
                })
            }
            TableId::Field => {
                if row > self.field_count {
                    return None;
                }
                let type_index = self.rows.partition_point(|r| r.field <= row) - 1;
                let owner = types.get(type_index)?;
                let member_index = (row - self.rows[type_index].field) as usize;
                let field = owner.fields.get(member_index)?;
                Some(Located {
                    type_index,
                    member_index,
                    owner,
                    decl: DeclRef::Field(field),
                })
            }
            TableId::Property => {
                if row > self.property_count {
                    return None;
                }
                let type_index = self.rows.partition_point(|r| r.property <= row) - 1;
                let owner = types.get(type_index)?;
                let member_index = (row - self.rows[type_index].property) as usize;
                let property = owner.properties.get(member_index)?;
                Some(Located {
                    type_index,
                    member_index,
                    owner,
                    decl: DeclRef::Property(property),
                })
            }
            TableId::MethodDef => {
                if row > self.method_count {
                    return None;
                }
                let type_index = self.rows.partition_point(|r| r.method <= row) - 1;
                let owner = types.get(type_index)?;
                let offset = (row - self.rows[type_index].method) as usize;
                let slot = *Self::method_slots(owner).get(offset)?;
                Some(Located {
                    type_index,
                    member_index: slot.index(),
                    owner,
                    decl: Self::slot_decl(owner, slot)?,
                })
            }
        }
    }

    /// The declaration behind a method slot.
    pub(crate) fn slot_decl(owner: &TypeDecl, slot: MethodSlot) -> Option<DeclRef<'_>> {
        Some(match slot {
            MethodSlot::Getter(index) => {
                let property = owner.properties.get(index)?;
                DeclRef::Accessor {
                    property,
                    accessor: property.getter.as_ref()?,
                    is_setter: false,
                }
            }
            MethodSlot::Setter(index) => {
                let property = owner.properties.get(index)?;
                DeclRef::Accessor {
                    property,
                    accessor: property.setter.as_ref()?,
                    is_setter: true,
                }
            }
            MethodSlot::Declared(index) => DeclRef::Method(owner.methods.get(index)?),
            MethodSlot::Constructor(index) => DeclRef::Constructor(owner.constructors.get(index)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{
            symbols::{SymbolGraphBuilder, TypeBuilder},
            typesystem::Visibility,
        },
        test::fixtures::my_type_graph,
    };

    #[test]
    fn tokens_round_trip_through_locate() {
        let graph = my_type_graph();
        let layout = ModuleLayout::new(&graph).unwrap();

        for (type_index, owner) in graph.types().iter().enumerate() {
            let located = layout.locate(&graph, ModuleLayout::type_token(type_index)).unwrap();
            assert!(matches!(located.decl, DeclRef::Type(decl) if decl.name == owner.name));

            for (index, field) in owner.fields.iter().enumerate() {
                let located = layout.locate(&graph, layout.field_token(type_index, index)).unwrap();
                assert_eq!(located.type_index, type_index);
                assert!(matches!(located.decl, DeclRef::Field(decl) if decl.name == field.name));
            }

            for (index, property) in owner.properties.iter().enumerate() {
                let located = layout
                    .locate(&graph, layout.property_token(type_index, index))
                    .unwrap();
                assert!(matches!(located.decl, DeclRef::Property(decl) if decl.name == property.name));
            }

            for slot in ModuleLayout::method_slots(owner) {
                let token = layout.method_token(owner, type_index, slot);
                let located = layout.locate(&graph, token).unwrap();
                assert_eq!(located.type_index, type_index);
                let expected = ModuleLayout::slot_decl(owner, slot).unwrap();
                match (located.decl, expected) {
                    (DeclRef::Accessor { property: a, is_setter: sa, .. }, DeclRef::Accessor { property: b, is_setter: sb, .. }) => {
                        assert_eq!(a.name, b.name);
                        assert_eq!(sa, sb);
                    }
                    (DeclRef::Method(a), DeclRef::Method(b)) => assert_eq!(a.name, b.name),
                    (DeclRef::Constructor(a), DeclRef::Constructor(b)) => {
                        assert_eq!(a.parameters, b.parameters);
                    }
                    _ => panic!("slot {slot:?} located a different declaration kind"),
                }
            }
        }
    }

    #[test]
    fn empty_member_ranges() {
        let graph = SymbolGraphBuilder::new("Lib")
            .add_type(TypeBuilder::class("N", "Empty").build())
            .add_type(
                TypeBuilder::class("N", "Full")
                    .field(crate::metadata::symbols::FieldDecl::new("a", "int", Visibility::Public))
                    .field(crate::metadata::symbols::FieldDecl::new("b", "int", Visibility::Public))
                    .build(),
            )
            .add_type(TypeBuilder::class("N", "Tail").build())
            .build();
        let layout = ModuleLayout::new(&graph).unwrap();

        let first = layout.locate(&graph, Token::from_parts(TableId::Field, 1)).unwrap();
        assert_eq!(first.type_index, 1);
        let second = layout.locate(&graph, Token::from_parts(TableId::Field, 2)).unwrap();
        assert!(matches!(second.decl, DeclRef::Field(decl) if decl.name == "b"));
        assert!(layout.locate(&graph, Token::from_parts(TableId::Field, 3)).is_none());
    }

    #[test]
    fn invalid_tokens() {
        let graph = my_type_graph();
        let layout = ModuleLayout::new(&graph).unwrap();

        assert!(layout.locate(&graph, Token::new(0)).is_none());
        assert!(layout.locate(&graph, Token::from_parts(TableId::TypeDef, 0)).is_none());
        assert!(layout.locate(&graph, Token::from_parts(TableId::TypeDef, 999)).is_none());
        assert!(layout.locate(&graph, ModuleLayout::module_token()).is_none());
        assert!(layout.locate(&graph, Token::new(0x0A00_0001)).is_none());
    }
}

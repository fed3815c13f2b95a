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

//! Symbol graphs shared by the unit tests.

use crate::{
    discovery::DEFAULT_MARKER,
    metadata::{
        identity::AssemblyVersion,
        symbols::{
            AttributeDecl, AttributeExpr, ConstValue, ConstructorDecl, FieldDecl, MethodDecl,
            ParamDecl, PropertyDecl, SymbolGraph, SymbolGraphBuilder, TypeBuilder, TypeRef,
        },
        typesystem::Visibility,
    },
};

pub const SAMPLES: &str = "Contoso.Samples";

/// The default discovery marker without arguments.
pub fn marked() -> AttributeDecl {
    AttributeDecl::new(DEFAULT_MARKER)
}

/// `[ShapesAttribute(42, "text", typeof(Helper), Color.Blue, new[] { 1, 2 }, null, Flag = true, Letter = 'x', Ratio = 0.5)]`
pub fn shapes_attribute() -> AttributeDecl {
    AttributeDecl::new("Contoso.Samples.ShapesAttribute")
        .arg(AttributeExpr::Literal(ConstValue::I4(42)))
        .arg(AttributeExpr::Literal(ConstValue::String("text".into())))
        .arg(AttributeExpr::TypeOf(TypeRef::new("Contoso.Samples.Helper")))
        .arg(AttributeExpr::EnumMember {
            enum_type: TypeRef::new("Contoso.Samples.Color"),
            member: "Blue".into(),
        })
        .arg(AttributeExpr::Array {
            element: TypeRef::new("int"),
            items: vec![
                AttributeExpr::Literal(ConstValue::I4(1)),
                AttributeExpr::Literal(ConstValue::I4(2)),
            ],
        })
        .arg(AttributeExpr::Null)
        .named_arg("Flag", AttributeExpr::Literal(ConstValue::Bool(true)))
        .named_arg("Letter", AttributeExpr::Literal(ConstValue::Char('x')))
        .named_arg("Ratio", AttributeExpr::Literal(ConstValue::R8(0.5)))
}

/// One marked type with public and private members, plus the types its attributes use.
///
/// ```csharp
/// [JsonSerializable]
/// public class MyType
/// {
///     public int PublicPropertyInt { get; set; }
///     public string PublicPropertyString { get; set; }
///     private int PrivatePropertyInt { get; set; }
///     [JsonIgnore] private string PrivatePropertyString { get; set; }
///
///     [Shapes(...)] public double PublicDouble;
///     public char PublicChar;
///     private double PrivateDouble;
///     private char PrivateChar;
///
///     public void MyMethod() { }
///     public void MySecondMethod(int count) { }
/// }
/// ```
pub fn my_type_graph() -> SymbolGraph {
    let my_type = TypeBuilder::class(SAMPLES, "MyType")
        .attribute(marked())
        .property(PropertyDecl::auto("PublicPropertyInt", "int", Visibility::Public))
        .property(PropertyDecl::auto("PublicPropertyString", "string", Visibility::Public))
        .property(PropertyDecl::auto("PrivatePropertyInt", "int", Visibility::Private))
        .property(
            PropertyDecl::auto("PrivatePropertyString", "string", Visibility::Private).attribute(
                AttributeDecl::new("System.Text.Json.Serialization.JsonIgnoreAttribute"),
            ),
        )
        .field(FieldDecl::new("PublicDouble", "double", Visibility::Public).attribute(shapes_attribute()))
        .field(FieldDecl::new("PublicChar", "char", Visibility::Public))
        .field(FieldDecl::new("PrivateDouble", "double", Visibility::Private))
        .field(FieldDecl::new("PrivateChar", "char", Visibility::Private))
        .method(MethodDecl::new("MyMethod", "void", Visibility::Public))
        .method(
            MethodDecl::new("MySecondMethod", "void", Visibility::Public)
                .parameter(ParamDecl::new("count", "int")),
        )
        .constructor(ConstructorDecl::new(Visibility::Public))
        .build();

    SymbolGraphBuilder::new("Contoso.Samples")
        .add_type(my_type)
        .add_type(TypeBuilder::class(SAMPLES, "Helper").build())
        .add_type(
            TypeBuilder::enumeration(SAMPLES, "Color")
                .enum_member("Red", 0)
                .enum_member("Green", 1)
                .enum_member("Blue", 2)
                .build(),
        )
        .add_type(
            TypeBuilder::class(SAMPLES, "ShapesAttribute")
                .constructor(ConstructorDecl::new(Visibility::Public))
                .build(),
        )
        .build()
}

/// A reference library, version 1.2.0.0, meant to be emitted as a module image.
pub fn contoso_models() -> SymbolGraph {
    SymbolGraphBuilder::new("Contoso.Models")
        .version(AssemblyVersion::new(1, 2, 0, 0))
        .module_attribute(
            AttributeDecl::new("System.Reflection.AssemblyTitleAttribute")
                .arg(AttributeExpr::Literal(ConstValue::String("Models".into()))),
        )
        .add_type(
            TypeBuilder::class("Contoso.Models", "Address")
                .property(PropertyDecl::auto("Street", "string", Visibility::Public))
                .property(PropertyDecl::auto("City", "string", Visibility::Public))
                .property(PropertyDecl::read_only("ZipCode", "int", Visibility::Public))
                .build(),
        )
        .add_type(
            TypeBuilder::class("Contoso.Models", "Customer")
                .property(PropertyDecl::auto(
                    "HomeAddress",
                    "Contoso.Models.Address",
                    Visibility::Public,
                ))
                .field(
                    FieldDecl::new("kind", "Contoso.Models.CustomerKind", Visibility::Private)
                        .attribute(AttributeDecl::new("System.NonSerializedAttribute")),
                )
                .build(),
        )
        .add_type(
            TypeBuilder::enumeration("Contoso.Models", "CustomerKind")
                .enum_member("Retail", 0)
                .enum_member("Wholesale", 1)
                .build(),
        )
        .build()
}

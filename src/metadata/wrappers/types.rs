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

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::{Arc, OnceLock},
};

use crate::{
    metadata::{
        customattributes::AttributeData,
        identity::AssemblyIdentity,
        loadcontext::{ModuleId, SymbolKey},
        symbols::{split_full_name, EnumMemberDecl, TypeDecl, TypeRef},
        token::Token,
        typesystem::{canonical_type_name, BindingFlags, MemberKind, PrimitiveKind, TypeKind, Visibility},
        wrappers::{
            core::ContextRef, ConstructorWrapper, FieldWrapper, MemberInfo, MethodWrapper,
            PropertyWrapper,
        },
    },
    Error, Result,
};

/// Maximum length of a base-type chain.
const MAX_BASE_CHAIN: usize = 64;

/// The declared members of a type, resolved through the context cache.
#[derive(Default)]
pub(crate) struct Members {
    pub(crate) properties: Vec<PropertyWrapper>,
    pub(crate) fields: Vec<FieldWrapper>,
    pub(crate) methods: Vec<MethodWrapper>,
    pub(crate) constructors: Vec<ConstructorWrapper>,
}

enum TypeOrigin {
    Declared {
        key: SymbolKey,
        assembly: AssemblyIdentity,
        base: Option<TypeRef>,
        enum_members: Vec<EnumMemberDecl>,
    },
    Unresolved {
        reference: TypeRef,
        reason: String,
    },
}

struct TypeInner {
    context: ContextRef,
    namespace: String,
    name: String,
    full_name: String,
    kind: TypeKind,
    visibility: Visibility,
    origin: TypeOrigin,
    members: OnceLock<Members>,
}

/// Reflection-shaped view of one type.
///
/// A `TypeWrapper` is a cheap handle (`Arc`). The [`crate::LoadContext`] hands out the same
/// handle every time the same declaration is resolved, so equality, hashing and pointer
/// identity all agree. Names, kind and visibility are captured when the wrapper is created and
/// stay available forever; members, attributes and base types are read lazily and fail with
/// [`Error::ContextClosed`] once the context is gone.
///
/// A wrapper can also stand for a type reference no module could satisfy. Such a wrapper
/// reports `is_resolved() == false`, carries the reason, and has no members.
///
/// # Examples
///
/// ```rust
/// use metascope::prelude::*;
///
/// let graph = SymbolGraphBuilder::new("App")
///     .add_type(
///         TypeBuilder::class("Contoso", "Person")
///             .property(PropertyDecl::auto("Name", "string", Visibility::Public))
///             .field(FieldDecl::new("age", "int", Visibility::Private))
///             .build(),
///     )
///     .build();
/// let context = LoadContext::new(graph)?;
///
/// let person = context.find_type("Contoso.Person").expect("declared");
/// assert_eq!(person.name(), "Person");
/// assert_eq!(person.properties()?[0].name(), "Name");
/// assert_eq!(person.properties()?[0].property_type()?.full_name(), "System.String");
/// assert_eq!(person.methods()?[0].name(), "get_Name");
/// # Ok::<(), metascope::Error>(())
/// ```
#[derive(Clone)]
pub struct TypeWrapper(Arc<TypeInner>);

impl TypeWrapper {
    pub(crate) fn declared(
        context: ContextRef,
        key: SymbolKey,
        assembly: AssemblyIdentity,
        decl: &TypeDecl,
    ) -> Self {
        TypeWrapper(Arc::new(TypeInner {
            context,
            namespace: decl.namespace.clone(),
            name: decl.name.clone(),
            full_name: decl.full_name(),
            kind: decl.kind,
            visibility: decl.visibility,
            origin: TypeOrigin::Declared {
                key,
                assembly,
                base: decl.base.clone(),
                enum_members: decl.enum_members.clone(),
            },
            members: OnceLock::new(),
        }))
    }

    pub(crate) fn unresolved(context: ContextRef, reference: TypeRef, reason: String) -> Self {
        let full_name = canonical_type_name(&reference.full_name).into_owned();
        let (namespace, name) = split_full_name(&full_name);
        let (namespace, name) = (namespace.to_string(), name.to_string());

        TypeWrapper(Arc::new(TypeInner {
            context,
            namespace,
            name,
            full_name,
            kind: TypeKind::Class,
            visibility: Visibility::Public,
            origin: TypeOrigin::Unresolved { reference, reason },
            members: OnceLock::new(),
        }))
    }

    /// Simple (non-qualified) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Namespace, empty for the global namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.0.namespace
    }

    /// Namespace-qualified name.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.0.full_name
    }

    /// Category of the type; unresolved types report [`TypeKind::Class`].
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Declared accessibility; unresolved types report [`Visibility::Public`].
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.0.visibility
    }

    /// Returns `true` if the wrapper is backed by a declaration.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.0.origin, TypeOrigin::Declared { .. })
    }

    /// Why the reference could not be resolved, `None` for resolved types.
    #[must_use]
    pub fn unresolved_reason(&self) -> Option<&str> {
        match &self.0.origin {
            TypeOrigin::Unresolved { reason, .. } => Some(reason),
            TypeOrigin::Declared { .. } => None,
        }
    }

    /// The reference as written, `None` for resolved types.
    #[must_use]
    pub fn unresolved_reference(&self) -> Option<&TypeRef> {
        match &self.0.origin {
            TypeOrigin::Unresolved { reference, .. } => Some(reference),
            TypeOrigin::Declared { .. } => None,
        }
    }

    /// The failed resolution as an [`Error::UnresolvableReference`], `None` for resolved types.
    #[must_use]
    pub fn unresolved_error(&self) -> Option<Error> {
        match &self.0.origin {
            TypeOrigin::Unresolved { reference, reason } => Some(Error::UnresolvableReference {
                name: self.0.full_name.clone(),
                assembly: reference.assembly.clone(),
                reason: reason.clone(),
            }),
            TypeOrigin::Declared { .. } => None,
        }
    }

    /// Identity of the declaring module, `None` for unresolved types.
    #[must_use]
    pub fn assembly(&self) -> Option<&AssemblyIdentity> {
        match &self.0.origin {
            TypeOrigin::Declared { assembly, .. } => Some(assembly),
            TypeOrigin::Unresolved { .. } => None,
        }
    }

    /// Stable symbol identity, `None` for unresolved types.
    #[must_use]
    pub fn symbol_key(&self) -> Option<SymbolKey> {
        match &self.0.origin {
            TypeOrigin::Declared { key, .. } => Some(*key),
            TypeOrigin::Unresolved { .. } => None,
        }
    }

    /// Module that declares the type.
    #[must_use]
    pub fn module(&self) -> Option<ModuleId> {
        self.symbol_key().map(|key| key.module)
    }

    /// `TypeDef` token within the declaring module.
    #[must_use]
    pub fn token(&self) -> Option<Token> {
        self.symbol_key().map(|key| key.token)
    }

    /// Returns `true` for enum types.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.0.kind == TypeKind::Enum
    }

    /// Returns `true` for structs and enums.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        matches!(self.0.kind, TypeKind::Struct | TypeKind::Enum)
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.0.kind == TypeKind::Interface
    }

    /// Enum literals in declaration order; empty for every other kind.
    #[must_use]
    pub fn enum_members(&self) -> &[EnumMemberDecl] {
        match &self.0.origin {
            TypeOrigin::Declared { enum_members, .. } => enum_members,
            TypeOrigin::Unresolved { .. } => &[],
        }
    }

    /// Underlying value of the named enum literal.
    #[must_use]
    pub fn enum_value(&self, member: &str) -> Option<i64> {
        self.enum_members()
            .iter()
            .find(|literal| literal.name == member)
            .map(|literal| literal.value)
    }

    /// The direct base type.
    ///
    /// Types without an explicit base derive from `System.Object` (classes),
    /// `System.ValueType` (structs) or `System.Enum` (enums). Interfaces and `System.Object`
    /// have no base, and neither do unresolved types.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn base_type(&self) -> Result<Option<TypeWrapper>> {
        let shared = self.0.context.upgrade()?;
        let TypeOrigin::Declared { key, base, .. } = &self.0.origin else {
            return Ok(None);
        };

        let reference = match base {
            Some(reference) => reference.clone(),
            None => match self.implicit_base() {
                Some(primitive) => TypeRef::new(primitive.full_name()),
                None => return Ok(None),
            },
        };

        shared.resolve_type_ref(key.module, &reference).map(Some)
    }

    /// The chain of base types, nearest first.
    ///
    /// # Errors
    /// Returns [`Error::RecursionLimit`] for cyclic or overly deep hierarchies and
    /// [`Error::ContextClosed`] if the context is gone.
    pub fn base_types(&self) -> Result<Vec<TypeWrapper>> {
        let mut chain = Vec::new();
        let mut current = self.base_type()?;
        while let Some(base) = current {
            if chain.len() >= MAX_BASE_CHAIN || base == *self {
                return Err(Error::RecursionLimit(MAX_BASE_CHAIN));
            }
            current = base.base_type()?;
            chain.push(base);
        }
        Ok(chain)
    }

    /// Returns `true` if `full_name` is this type or one of its base types.
    ///
    /// # Errors
    /// Same as [`TypeWrapper::base_types`].
    pub fn is_assignable_to(&self, full_name: &str) -> Result<bool> {
        if self.full_name() == full_name {
            return Ok(true);
        }
        Ok(self
            .base_types()?
            .iter()
            .any(|base| base.full_name() == full_name))
    }

    fn implicit_base(&self) -> Option<PrimitiveKind> {
        if self.0.namespace == PrimitiveKind::Object.namespace()
            && self.0.name == PrimitiveKind::Object.name()
        {
            return None;
        }
        match self.0.kind {
            TypeKind::Class => Some(PrimitiveKind::Object),
            TypeKind::Struct => Some(PrimitiveKind::ValueType),
            TypeKind::Enum => Some(PrimitiveKind::Enum),
            TypeKind::Interface => None,
        }
    }

    pub(crate) fn members(&self) -> Result<&Members> {
        let shared = self.0.context.upgrade()?;
        if let Some(members) = self.0.members.get() {
            return Ok(members);
        }

        let members = match &self.0.origin {
            TypeOrigin::Declared { key, .. } => shared.members_of(*key)?,
            TypeOrigin::Unresolved { .. } => Members::default(),
        };
        Ok(self.0.members.get_or_init(|| members))
    }

    /// Every declared property in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn properties(&self) -> Result<&[PropertyWrapper]> {
        Ok(&self.members()?.properties)
    }

    /// Every declared field in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn fields(&self) -> Result<&[FieldWrapper]> {
        Ok(&self.members()?.fields)
    }

    /// Every declared method: property accessors in property order, then declared methods.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn methods(&self) -> Result<&[MethodWrapper]> {
        Ok(&self.members()?.methods)
    }

    /// Every declared constructor, including a type initializer.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn constructors(&self) -> Result<&[ConstructorWrapper]> {
        Ok(&self.members()?.constructors)
    }

    /// Properties passing `flags`, in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn properties_with(&self, flags: BindingFlags) -> Result<Vec<PropertyWrapper>> {
        Ok(filter_members(self.properties()?, flags))
    }

    /// Fields passing `flags`, in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn fields_with(&self, flags: BindingFlags) -> Result<Vec<FieldWrapper>> {
        Ok(filter_members(self.fields()?, flags))
    }

    /// Methods passing `flags`, in the order of [`TypeWrapper::methods`].
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn methods_with(&self, flags: BindingFlags) -> Result<Vec<MethodWrapper>> {
        Ok(filter_members(self.methods()?, flags))
    }

    /// Constructors passing `flags`.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn constructors_with(&self, flags: BindingFlags) -> Result<Vec<ConstructorWrapper>> {
        Ok(filter_members(self.constructors()?, flags))
    }

    /// The first property with this name.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn find_property(&self, name: &str) -> Result<Option<PropertyWrapper>> {
        Ok(find_member(self.properties()?, name))
    }

    /// The first field with this name.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn find_field(&self, name: &str) -> Result<Option<FieldWrapper>> {
        Ok(find_member(self.fields()?, name))
    }

    /// The first method with this name.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn find_method(&self, name: &str) -> Result<Option<MethodWrapper>> {
        Ok(find_member(self.methods()?, name))
    }

    /// Attributes applied to the type, in source order.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] if the context is gone.
    pub fn attributes(&self) -> Result<Arc<[AttributeData]>> {
        let shared = self.0.context.upgrade()?;
        match &self.0.origin {
            TypeOrigin::Declared { key, .. } => shared.attributes_for(*key),
            TypeOrigin::Unresolved { .. } => Ok(Arc::from(Vec::new())),
        }
    }

    /// Returns `true` if both handles are the same object.
    #[must_use]
    pub fn ptr_eq(&self, other: &TypeWrapper) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

fn filter_members<T: MemberInfo + Clone>(members: &[T], flags: BindingFlags) -> Vec<T> {
    members
        .iter()
        .filter(|member| flags.matches(member.visibility(), member.is_static()))
        .cloned()
        .collect()
}

fn find_member<T: MemberInfo + Clone>(members: &[T], name: &str) -> Option<T> {
    members.iter().find(|member| member.name() == name).cloned()
}

impl MemberInfo for TypeWrapper {
    fn name(&self) -> &str {
        &self.0.name
    }

    fn member_kind(&self) -> MemberKind {
        MemberKind::Type
    }

    fn visibility(&self) -> Visibility {
        self.0.visibility
    }

    fn is_static(&self) -> bool {
        false
    }

    fn symbol_key(&self) -> Option<SymbolKey> {
        TypeWrapper::symbol_key(self)
    }

    fn declaring_type(&self) -> Result<Option<TypeWrapper>> {
        Ok(None)
    }

    fn attributes(&self) -> Result<Arc<[AttributeData]>> {
        TypeWrapper::attributes(self)
    }
}

impl PartialEq for TypeWrapper {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        if self.0.context.id() != other.0.context.id() {
            return false;
        }

        match (&self.0.origin, &other.0.origin) {
            (TypeOrigin::Declared { key: a, .. }, TypeOrigin::Declared { key: b, .. }) => a == b,
            (
                TypeOrigin::Unresolved { reference: a, .. },
                TypeOrigin::Unresolved { reference: b, .. },
            ) => self.0.full_name == other.0.full_name && a.assembly == b.assembly,
            _ => false,
        }
    }
}

impl Eq for TypeWrapper {}

impl Hash for TypeWrapper {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.context.id().hash(state);
        match &self.0.origin {
            TypeOrigin::Declared { key, .. } => key.hash(state),
            TypeOrigin::Unresolved { reference, .. } => {
                self.0.full_name.hash(state);
                reference.assembly.hash(state);
            }
        }
    }
}

impl fmt::Debug for TypeWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0.origin {
            TypeOrigin::Declared { key, .. } => {
                write!(f, "TypeWrapper({} @ {})", self.0.full_name, key)
            }
            TypeOrigin::Unresolved { reason, .. } => {
                write!(f, "TypeWrapper({} unresolved: {})", self.0.full_name, reason)
            }
        }
    }
}

impl fmt::Display for TypeWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.full_name)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        metadata::{
            symbols::{FieldDecl, PropertyDecl, SymbolGraphBuilder, TypeBuilder, TypeRef},
            typesystem::{BindingFlags, TypeKind, Visibility},
            wrappers::MemberInfo,
        },
        test::fixtures::my_type_graph,
        Error, LoadContext,
    };

    fn names<T: MemberInfo>(members: &[T]) -> Vec<&str> {
        members.iter().map(MemberInfo::name).collect()
    }

    #[test]
    fn members_follow_declaration_order() {
        let context = LoadContext::new(my_type_graph()).unwrap();
        let my_type = context.find_type("Contoso.Samples.MyType").unwrap();

        assert_eq!(
            names(my_type.properties().unwrap()),
            [
                "PublicPropertyInt",
                "PublicPropertyString",
                "PrivatePropertyInt",
                "PrivatePropertyString"
            ]
        );
        assert_eq!(
            names(my_type.fields().unwrap()),
            ["PublicDouble", "PublicChar", "PrivateDouble", "PrivateChar"]
        );
        assert_eq!(
            names(my_type.methods().unwrap()),
            [
                "get_PublicPropertyInt",
                "set_PublicPropertyInt",
                "get_PublicPropertyString",
                "set_PublicPropertyString",
                "get_PrivatePropertyInt",
                "set_PrivatePropertyInt",
                "get_PrivatePropertyString",
                "set_PrivatePropertyString",
                "MyMethod",
                "MySecondMethod"
            ]
        );
        assert_eq!(
            names(&my_type.methods_with(BindingFlags::PUBLIC | BindingFlags::INSTANCE).unwrap()),
            [
                "get_PublicPropertyInt",
                "set_PublicPropertyInt",
                "get_PublicPropertyString",
                "set_PublicPropertyString",
                "MyMethod",
                "MySecondMethod"
            ]
        );
        assert_eq!(names(my_type.constructors().unwrap()), [".ctor"]);
    }

    #[test]
    fn members_are_cached() {
        let context = LoadContext::new(my_type_graph()).unwrap();
        let my_type = context.find_type("Contoso.Samples.MyType").unwrap();

        let first = my_type.properties().unwrap()[0].clone();
        let again = context.find_type("Contoso.Samples.MyType").unwrap().properties().unwrap()[0].clone();
        assert!(first.ptr_eq(&again));
        assert!(first.declaring_type().unwrap().ptr_eq(&my_type));
    }

    #[test]
    fn binding_flags_filter() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(
                TypeBuilder::class("N", "T")
                    .field(FieldDecl::new("a", "int", Visibility::Public))
                    .field(FieldDecl::new("b", "int", Visibility::Internal))
                    .field(FieldDecl::new("c", "int", Visibility::Public).make_static())
                    .property(PropertyDecl::auto("P", "int", Visibility::Public).setter_visibility(Visibility::Private))
                    .build(),
            )
            .build();
        let context = LoadContext::new(graph).unwrap();
        let ty = context.find_type("N.T").unwrap();

        let public_instance = BindingFlags::PUBLIC | BindingFlags::INSTANCE;
        assert_eq!(names(&ty.fields_with(public_instance).unwrap()), ["a"]);
        assert_eq!(names(&ty.fields_with(BindingFlags::NON_PUBLIC | BindingFlags::INSTANCE).unwrap()), ["b"]);
        assert_eq!(names(&ty.fields_with(BindingFlags::PUBLIC | BindingFlags::STATIC).unwrap()), ["c"]);
        assert_eq!(names(&ty.fields_with(BindingFlags::ALL).unwrap()), ["a", "b", "c"]);
        assert_eq!(names(&ty.methods_with(public_instance).unwrap()), ["get_P"]);
    }

    #[test]
    fn base_types_and_kinds() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(TypeBuilder::class("N", "Base").build())
            .add_type(TypeBuilder::class("N", "Derived").extends(TypeRef::new("N.Base")).build())
            .add_type(TypeBuilder::value_type("N", "Point").build())
            .add_type(TypeBuilder::interface("N", "IShape").build())
            .add_type(TypeBuilder::enumeration("N", "Mode").enum_member("Fast", 4).build())
            .build();
        let context = LoadContext::new(graph).unwrap();

        let derived = context.find_type("N.Derived").unwrap();
        let chain: Vec<_> = derived
            .base_types()
            .unwrap()
            .iter()
            .map(|base| base.full_name().to_string())
            .collect();
        assert_eq!(chain, ["N.Base", "System.Object"]);
        assert!(derived.is_assignable_to("System.Object").unwrap());
        assert!(!derived.is_assignable_to("N.Point").unwrap());

        let point = context.find_type("N.Point").unwrap();
        assert!(point.is_value_type());
        assert_eq!(point.base_type().unwrap().unwrap().full_name(), "System.ValueType");

        let shape = context.find_type("N.IShape").unwrap();
        assert!(shape.is_interface());
        assert!(shape.base_type().unwrap().is_none());

        let mode = context.find_type("N.Mode").unwrap();
        assert_eq!(mode.kind(), TypeKind::Enum);
        assert_eq!(mode.enum_value("Fast"), Some(4));
        assert_eq!(mode.enum_value("Slow"), None);
        assert_eq!(mode.base_type().unwrap().unwrap().full_name(), "System.Enum");
    }

    #[test]
    fn cyclic_hierarchy_hits_limit() {
        let graph = SymbolGraphBuilder::new("App")
            .add_type(TypeBuilder::class("N", "A").extends(TypeRef::new("N.B")).build())
            .add_type(TypeBuilder::class("N", "B").extends(TypeRef::new("N.A")).build())
            .build();
        let context = LoadContext::new(graph).unwrap();
        let a = context.find_type("N.A").unwrap();

        assert!(matches!(a.base_types(), Err(Error::RecursionLimit(_))));
    }

    #[test]
    fn unresolved_type_shape() {
        let context = LoadContext::new(my_type_graph()).unwrap();
        let missing = context
            .resolve_type_ref(&TypeRef::with_assembly("Fabrikam.Invoice", "Fabrikam"))
            .unwrap();

        assert!(!missing.is_resolved());
        assert_eq!(missing.name(), "Invoice");
        assert_eq!(missing.namespace(), "Fabrikam");
        assert_eq!(missing.kind(), TypeKind::Class);
        assert_eq!(missing.visibility(), Visibility::Public);
        assert!(missing.symbol_key().is_none());
        assert!(missing.properties().unwrap().is_empty());
        assert!(missing.attributes().unwrap().is_empty());
        assert!(missing.base_type().unwrap().is_none());
        assert_eq!(missing.unresolved_reference().unwrap().assembly.as_deref(), Some("Fabrikam"));
        assert_eq!(format!("{missing}"), "Fabrikam.Invoice");
    }
}

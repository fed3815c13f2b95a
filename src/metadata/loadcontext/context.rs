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
    sync::{
        atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering},
        Arc, Weak,
    },
};

use dashmap::{mapref::entry::Entry, DashMap};
use tracing::{debug, trace, warn};

use crate::{
    metadata::{
        customattributes::{read_attributes, AttributeData},
        identity::AssemblyIdentity,
        image::ModuleImage,
        loadcontext::{
            layout::{DeclRef, MethodSlot, ModuleLayout},
            options::LoadOptions,
            report::{LoadEvent, LoadReport},
        },
        symbols::{SymbolSource, TypeRef},
        token::{TableId, Token},
        typesystem::core_library,
        wrappers::{
            core::{ContextRef, MemberCore},
            ConstructorWrapper, FieldWrapper, Members, MethodWrapper, PropertyWrapper,
            TypeWrapper, Wrapper,
        },
    },
    Error, Result,
};

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifies a module registered with a [`LoadContext`].
///
/// Ids are assigned in registration order: the primary unit is always
/// [`ModuleId::PRIMARY`], reference modules follow, and the built-in core library is
/// [`ModuleId::CORE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u16);

impl ModuleId {
    /// The primary compilation unit.
    pub const PRIMARY: ModuleId = ModuleId(0);

    /// The built-in core library.
    pub const CORE: ModuleId = ModuleId(u16::MAX);

    /// Returns `true` for the primary compilation unit.
    #[must_use]
    pub fn is_primary(self) -> bool {
        self == ModuleId::PRIMARY
    }

    /// Returns `true` for the built-in core library.
    #[must_use]
    pub fn is_core(self) -> bool {
        self == ModuleId::CORE
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ModuleId::PRIMARY => write!(f, "#0 (primary)"),
            ModuleId::CORE => write!(f, "#core"),
            ModuleId(id) => write!(f, "#{id}"),
        }
    }
}

/// Stable identity of a declaration: the module it lives in plus its token there.
///
/// Keys do not depend on the memory layout of the symbol graph, so they stay valid for the
/// whole lifetime of a context and can be stored by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolKey {
    /// The declaring module
    pub module: ModuleId,
    /// The declaration's token within that module
    pub token: Token,
}

impl SymbolKey {
    /// Create a new key.
    #[must_use]
    pub fn new(module: ModuleId, token: Token) -> Self {
        SymbolKey { module, token }
    }
}

impl fmt::Display for SymbolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.token)
    }
}

pub(crate) enum ModuleState {
    Loaded {
        source: Arc<dyn SymbolSource>,
        layout: ModuleLayout,
    },
    Failed {
        reason: String,
    },
}

pub(crate) struct ModuleEntry {
    pub(crate) identity: AssemblyIdentity,
    pub(crate) state: ModuleState,
}

/// State shared between a [`LoadContext`] and the wrappers it hands out.
///
/// Wrappers hold a `Weak` to this; the `LoadContext` is the only strong owner outside of
/// in-flight calls, so dropping it releases every registered module.
pub(crate) struct ContextShared {
    id: u64,
    self_ref: Weak<ContextShared>,
    options: LoadOptions,
    primary_identity: AssemblyIdentity,
    modules: boxcar::Vec<ModuleEntry>,
    core: Option<ModuleEntry>,
    reference_count: AtomicUsize,
    generation: AtomicU64,
    closed: AtomicBool,
    events: boxcar::Vec<LoadEvent>,
    cache: DashMap<SymbolKey, Wrapper>,
    pub(crate) type_refs: DashMap<(ModuleId, TypeRef), TypeWrapper>,
    attributes: DashMap<SymbolKey, Arc<[AttributeData]>>,
}

impl ContextShared {
    fn new(
        options: LoadOptions,
        primary_identity: AssemblyIdentity,
        core: Option<ModuleEntry>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| ContextShared {
            id: NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed),
            self_ref: self_ref.clone(),
            options,
            primary_identity,
            modules: boxcar::Vec::new(),
            core,
            reference_count: AtomicUsize::new(0),
            generation: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            events: boxcar::Vec::new(),
            cache: DashMap::new(),
            type_refs: DashMap::new(),
            attributes: DashMap::new(),
        })
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub(crate) fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            Err(Error::ContextClosed)
        } else {
            Ok(())
        }
    }

    pub(crate) fn context_ref(&self) -> ContextRef {
        ContextRef::new(self.self_ref.clone(), self.id)
    }

    pub(crate) fn module(&self, id: ModuleId) -> Option<&ModuleEntry> {
        if id.is_core() {
            self.core.as_ref()
        } else {
            self.modules.get(usize::from(id.0))
        }
    }

    /// Registered reference modules in load order.
    pub(crate) fn references(&self) -> impl Iterator<Item = (ModuleId, &ModuleEntry)> {
        self.modules.iter().filter_map(|(index, entry)| {
            let id = u16::try_from(index).ok().map(ModuleId)?;
            (!id.is_primary()).then_some((id, entry))
        })
    }

    pub(crate) fn loaded(&self, id: ModuleId) -> Result<(&dyn SymbolSource, &ModuleLayout)> {
        match self.module(id).map(|entry| &entry.state) {
            Some(ModuleState::Loaded { source, layout }) => Ok((source.as_ref(), layout)),
            _ => Err(Error::ModuleNotFound(id)),
        }
    }

    fn register(&self, source: Arc<dyn SymbolSource>) -> Result<ModuleId> {
        let identity = source.identity().clone();
        let layout = ModuleLayout::new(source.as_ref())?;
        let types = source.types().len();

        let index = self.modules.push(ModuleEntry {
            identity: identity.clone(),
            state: ModuleState::Loaded { source, layout },
        });
        let id = ModuleId(
            u16::try_from(index)
                .map_err(|_| malformed_error!("Module index {} exceeds the module id range", index))?,
        );

        debug!(context = self.id, module = %identity, %id, types, "registered module");
        self.events.push(LoadEvent::Loaded(identity));
        Ok(id)
    }

    fn record_failure(&self, identity: Option<&AssemblyIdentity>, message: String) -> Error {
        let error = Error::ModuleLoad {
            module: identity.map(AssemblyIdentity::display_name),
            message,
        };
        warn!(context = self.id, %error, "reference module failed to load");
        self.events.push(LoadEvent::Failed(error.clone()));
        error
    }

    fn registered(&self, identity: &AssemblyIdentity) -> Option<AssemblyIdentity> {
        self.modules
            .iter()
            .find(|(_, entry)| entry.identity == *identity)
            .map(|(_, entry)| entry.identity.clone())
    }

    fn reserve_reference_slot(&self, identity: &AssemblyIdentity) -> Result<()> {
        let limit = self.options.module_limit();
        self.reference_count
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| {
                (count < limit).then_some(count + 1)
            })
            .map(|_| ())
            .map_err(|_| {
                self.record_failure(
                    Some(identity),
                    format!("reference module limit of {limit} reached"),
                )
            })
    }

    fn register_reference(&self, source: Arc<dyn SymbolSource>) -> Result<AssemblyIdentity> {
        let identity = source.identity().clone();
        match self.register(source) {
            Ok(_) => {
                self.invalidate_unresolved();
                Ok(identity)
            }
            Err(error) => Err(self.fail_reference(identity, &error)),
        }
    }

    fn fail_reference(&self, identity: AssemblyIdentity, error: &Error) -> Error {
        let failure = self.record_failure(Some(&identity), error.to_string());
        self.modules.push(ModuleEntry {
            identity,
            state: ModuleState::Failed {
                reason: error.to_string(),
            },
        });
        self.invalidate_unresolved();
        failure
    }

    /// Current module generation; bumped whenever the set of reference modules changes.
    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Forget every lookup that may resolve differently now that a module was added.
    ///
    /// Resolved entries stay: the primary unit and earlier modules shadow later ones.
    fn invalidate_unresolved(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);

        let before = self.type_refs.len();
        self.type_refs.retain(|_, wrapper| wrapper.is_resolved());
        self.attributes
            .retain(|_, data| !data.iter().any(AttributeData::references_unresolved));
        debug!(
            context = self.id,
            evicted = before.saturating_sub(self.type_refs.len()),
            "dropped unresolved lookups after module change"
        );
    }

    pub(crate) fn load_module(&self, data: &[u8]) -> Result<AssemblyIdentity> {
        self.ensure_open()?;

        let identity = match ModuleImage::peek_identity(data) {
            Ok(identity) => identity,
            Err(error) => return Err(self.record_failure(None, error.to_string())),
        };

        if let Some(existing) = self.registered(&identity) {
            debug!(context = self.id, module = %identity, "module already registered");
            return Ok(existing);
        }
        self.reserve_reference_slot(&identity)?;

        match ModuleImage::from_bytes(data) {
            Ok(image) => self.register_reference(Arc::new(image)),
            Err(error) => Err(self.fail_reference(identity, &error)),
        }
    }

    pub(crate) fn load_source(&self, source: Arc<dyn SymbolSource>) -> Result<AssemblyIdentity> {
        self.ensure_open()?;

        if let Some(existing) = self.registered(source.identity()) {
            debug!(context = self.id, module = %existing, "module already registered");
            return Ok(existing);
        }
        self.reserve_reference_slot(source.identity())?;
        self.register_reference(source)
    }

    pub(crate) fn report(&self) -> LoadReport {
        LoadReport::from_events(self.events.iter().map(|(_, event)| event))
    }

    /// Get the wrapper for `key`, creating it on first use.
    ///
    /// Population goes through the cache's entry API, so concurrent first resolutions of one
    /// key produce a single wrapper.
    pub(crate) fn resolve(&self, key: SymbolKey) -> Result<Wrapper> {
        self.ensure_open()?;

        if let Some(hit) = self.cache.get(&key) {
            trace!(context = self.id, %key, "wrapper cache hit");
            return Ok(hit.value().clone());
        }

        match self.cache.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let wrapper = self.materialize(key)?;
                Ok(entry.insert(wrapper).value().clone())
            }
        }
    }

    fn not_found(key: SymbolKey) -> Error {
        Error::TypeNotFound {
            module: key.module,
            token: key.token,
        }
    }

    pub(crate) fn resolve_type(&self, key: SymbolKey) -> Result<TypeWrapper> {
        self.resolve(key)?
            .into_type()
            .ok_or_else(|| Self::not_found(key))
    }

    pub(crate) fn resolve_field(&self, key: SymbolKey) -> Result<FieldWrapper> {
        self.resolve(key)?
            .into_field()
            .ok_or_else(|| Self::not_found(key))
    }

    pub(crate) fn resolve_property(&self, key: SymbolKey) -> Result<PropertyWrapper> {
        self.resolve(key)?
            .into_property()
            .ok_or_else(|| Self::not_found(key))
    }

    pub(crate) fn resolve_method(&self, key: SymbolKey) -> Result<MethodWrapper> {
        self.resolve(key)?
            .into_method()
            .ok_or_else(|| Self::not_found(key))
    }

    pub(crate) fn resolve_constructor(&self, key: SymbolKey) -> Result<ConstructorWrapper> {
        self.resolve(key)?
            .into_constructor()
            .ok_or_else(|| Self::not_found(key))
    }

    /// Build a wrapper for `key`. Must not touch the wrapper cache.
    fn materialize(&self, key: SymbolKey) -> Result<Wrapper> {
        let entry = self
            .module(key.module)
            .ok_or(Error::ModuleNotFound(key.module))?;
        let (source, layout) = self.loaded(key.module)?;
        let located = layout
            .locate(source, key.token)
            .ok_or_else(|| Self::not_found(key))?;

        let context = self.context_ref();
        let module = key.module;
        let type_index = located.type_index;
        let owner = located.owner;
        let declaring = SymbolKey::new(module, ModuleLayout::type_token(type_index));
        let member = |name: String, visibility, is_static| {
            MemberCore::new(context.clone(), key, declaring, name, visibility, is_static)
        };

        let wrapper = match located.decl {
            DeclRef::Type(decl) => Wrapper::Type(TypeWrapper::declared(
                context.clone(),
                key,
                entry.identity.clone(),
                decl,
            )),
            DeclRef::Field(decl) => Wrapper::Field(FieldWrapper::new(
                member(decl.name.clone(), decl.visibility, decl.is_static),
                decl,
            )),
            DeclRef::Property(decl) => {
                let index = located.member_index;
                let getter = decl.getter.as_ref().map(|_| {
                    SymbolKey::new(
                        module,
                        layout.method_token(owner, type_index, MethodSlot::Getter(index)),
                    )
                });
                let setter = decl.setter.as_ref().map(|_| {
                    SymbolKey::new(
                        module,
                        layout.method_token(owner, type_index, MethodSlot::Setter(index)),
                    )
                });
                Wrapper::Property(PropertyWrapper::new(
                    member(decl.name.clone(), decl.visibility, decl.is_static),
                    decl,
                    getter,
                    setter,
                ))
            }
            DeclRef::Accessor {
                property,
                accessor,
                is_setter,
            } => {
                let property_key = SymbolKey::new(
                    module,
                    layout.property_token(type_index, located.member_index),
                );
                Wrapper::Method(MethodWrapper::accessor(
                    member(
                        MethodWrapper::accessor_name(&property.name, is_setter),
                        MethodWrapper::accessor_visibility(property, accessor),
                        property.is_static,
                    ),
                    property,
                    property_key,
                    is_setter,
                ))
            }
            DeclRef::Method(decl) => Wrapper::Method(MethodWrapper::declared(
                member(decl.name.clone(), decl.visibility, decl.is_static),
                decl,
            )),
            DeclRef::Constructor(decl) => Wrapper::Constructor(ConstructorWrapper::new(
                member(
                    ConstructorWrapper::constructor_name(decl.is_static).to_string(),
                    decl.visibility,
                    decl.is_static,
                ),
                decl,
            )),
        };

        trace!(context = self.id, %key, "materialized wrapper");
        Ok(wrapper)
    }

    /// Resolve every member of the type at `key` through the cache.
    pub(crate) fn members_of(&self, key: SymbolKey) -> Result<Members> {
        let (source, layout) = self.loaded(key.module)?;
        let type_index = key
            .token
            .row()
            .checked_sub(1)
            .ok_or_else(|| Self::not_found(key))? as usize;
        let owner = source
            .types()
            .get(type_index)
            .ok_or_else(|| Self::not_found(key))?;
        let at = |token| SymbolKey::new(key.module, token);

        let mut members = Members::default();
        for index in 0..owner.properties.len() {
            members
                .properties
                .push(self.resolve_property(at(layout.property_token(type_index, index)))?);
        }
        for index in 0..owner.fields.len() {
            members
                .fields
                .push(self.resolve_field(at(layout.field_token(type_index, index)))?);
        }
        for slot in ModuleLayout::method_slots(owner) {
            let member_key = at(layout.method_token(owner, type_index, slot));
            match slot {
                MethodSlot::Constructor(_) => members
                    .constructors
                    .push(self.resolve_constructor(member_key)?),
                _ => members.methods.push(self.resolve_method(member_key)?),
            }
        }
        Ok(members)
    }

    /// Applied attributes of the declaration at `key`, or of the module for the module token.
    pub(crate) fn attributes_for(&self, key: SymbolKey) -> Result<Arc<[AttributeData]>> {
        self.ensure_open()?;
        if let Some(hit) = self.attributes.get(&key) {
            return Ok(hit.value().clone());
        }

        let (source, layout) = self.loaded(key.module)?;
        let decls = if key.token.is_table(TableId::Module) {
            source.module_attributes()
        } else {
            layout
                .locate(source, key.token)
                .ok_or_else(|| Self::not_found(key))?
                .decl
                .attributes()
        };

        loop {
            let generation = self.generation();
            let data: Arc<[AttributeData]> = read_attributes(self, key.module, decls)?.into();
            let cached = self.attributes.entry(key).or_insert(data).value().clone();

            if generation == self.generation()
                || !cached.iter().any(AttributeData::references_unresolved)
            {
                return Ok(cached);
            }
            self.attributes.remove_if(&key, |_, data| {
                data.iter().any(AttributeData::references_unresolved)
            });
        }
    }

    /// Release every cached wrapper and refuse further queries.
    pub(crate) fn teardown(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }

        let cached = self.cache.len();
        self.cache.clear();
        self.type_refs.clear();
        self.attributes.clear();
        debug!(context = self.id, cached, "load context closed");
    }
}

/// The scoped registry behind one discovery pass.
///
/// A `LoadContext` owns the primary compilation unit, every registered reference module and
/// the built-in core library, and it owns the cache that maps a [`SymbolKey`] to its wrapper.
/// Resolving the same key twice returns the same object. Modules that fail to load are
/// recorded in the [`LoadReport`] and never abort the context.
///
/// Close the context with [`LoadContext::close`] when the pass is done; dropping it has the
/// same effect. Wrappers handed out earlier then fail with [`Error::ContextClosed`] on every
/// query that needs resolution.
///
/// # Examples
///
/// ```rust
/// use metascope::prelude::*;
///
/// let graph = SymbolGraphBuilder::new("App")
///     .add_type(TypeBuilder::class("Contoso", "Person").build())
///     .build();
///
/// let context = LoadContext::new(graph)?;
/// let first = context.find_type("Contoso.Person").expect("declared");
/// let second = context.find_type("Contoso.Person").expect("declared");
/// assert!(first.ptr_eq(&second));
///
/// let report = context.close();
/// assert!(report.is_complete_success());
/// assert!(matches!(first.properties(), Err(Error::ContextClosed)));
/// # Ok::<(), metascope::Error>(())
/// ```
pub struct LoadContext {
    shared: Arc<ContextShared>,
}

impl LoadContext {
    /// Create a context for one compilation unit with default options.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the graph declares more members than tokens can address.
    pub fn new<S: SymbolSource + 'static>(primary: S) -> Result<Self> {
        LoadContext::builder().primary(primary).build()
    }

    /// Start configuring a context.
    #[must_use]
    pub fn builder() -> LoadContextBuilder {
        LoadContextBuilder::new()
    }

    /// Unique id of this context within the process.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// The options the context was built with.
    #[must_use]
    pub fn options(&self) -> &LoadOptions {
        &self.shared.options
    }

    /// Identity of the primary compilation unit.
    #[must_use]
    pub fn primary_identity(&self) -> &AssemblyIdentity {
        &self.shared.primary_identity
    }

    /// Identity of a registered module, including modules that failed to load.
    #[must_use]
    pub fn module_identity(&self, module: ModuleId) -> Option<&AssemblyIdentity> {
        self.shared.module(module).map(|entry| &entry.identity)
    }

    /// Returns `true` if the module is registered and its declarations are available.
    #[must_use]
    pub fn is_module_loaded(&self, module: ModuleId) -> bool {
        self.shared.loaded(module).is_ok()
    }

    /// Ids of all reference modules in load order, including failed ones.
    #[must_use]
    pub fn reference_modules(&self) -> Vec<ModuleId> {
        self.shared.references().map(|(id, _)| id).collect()
    }

    /// Register a precompiled reference module.
    ///
    /// Loading the same identity twice returns the existing registration.
    ///
    /// # Errors
    /// Returns [`Error::ModuleLoad`] if the bytes cannot be decoded or the module limit is
    /// reached. The failure is also recorded in the [`LoadReport`], and the context stays
    /// fully usable.
    pub fn load_module(&self, data: &[u8]) -> Result<AssemblyIdentity> {
        self.shared.load_module(data)
    }

    /// Register an analysed compilation unit as a reference module.
    ///
    /// # Errors
    /// Same as [`LoadContext::load_module`].
    pub fn load_source<S: SymbolSource + 'static>(&self, source: S) -> Result<AssemblyIdentity> {
        self.shared.load_source(Arc::new(source))
    }

    /// Modules registered and failed so far.
    #[must_use]
    pub fn load_report(&self) -> LoadReport {
        self.shared.report()
    }

    /// Resolve a symbol key to its wrapper.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotFound`] or [`Error::TypeNotFound`] if nothing is declared at
    /// `key`.
    pub fn resolve(&self, key: SymbolKey) -> Result<Wrapper> {
        self.shared.resolve(key)
    }

    /// Resolve a symbol key that must name a type.
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if `key` does not name a type.
    pub fn resolve_type(&self, key: SymbolKey) -> Result<TypeWrapper> {
        self.shared.resolve_type(key)
    }

    /// Resolve a by-name type reference as seen from the primary unit.
    ///
    /// A reference no module satisfies yields an unresolved wrapper, not an error.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] only if the context was torn down.
    pub fn resolve_type_ref(&self, reference: &TypeRef) -> Result<TypeWrapper> {
        self.shared.resolve_type_ref(ModuleId::PRIMARY, reference)
    }

    /// Find a type by namespace-qualified name or keyword alias.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<TypeWrapper> {
        self.resolve_type_ref(&TypeRef::new(full_name))
            .ok()
            .filter(TypeWrapper::is_resolved)
    }

    /// Every type of a module in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotFound`] if the module is not loaded.
    pub fn types_of(&self, module: ModuleId) -> Result<Vec<TypeWrapper>> {
        let (source, _) = self.shared.loaded(module)?;
        (0..source.types().len())
            .map(|index| {
                self.shared
                    .resolve_type(SymbolKey::new(module, ModuleLayout::type_token(index)))
            })
            .collect()
    }

    /// Every type of the primary unit in declaration order.
    ///
    /// # Errors
    /// Returns [`Error::ContextClosed`] only if the context was torn down.
    pub fn primary_types(&self) -> Result<Vec<TypeWrapper>> {
        self.types_of(ModuleId::PRIMARY)
    }

    /// Attributes applied to a module itself, in source order.
    ///
    /// # Errors
    /// Returns [`Error::ModuleNotFound`] if the module is not loaded.
    pub fn module_attributes(&self, module: ModuleId) -> Result<Arc<[AttributeData]>> {
        self.shared
            .attributes_for(SymbolKey::new(module, ModuleLayout::module_token()))
    }

    pub(crate) fn shared(&self) -> &Arc<ContextShared> {
        &self.shared
    }

    /// Tear the context down and return the final load report.
    ///
    /// Cached wrappers and module handles are released; wrappers still held by the caller
    /// report [`Error::ContextClosed`] from then on.
    #[must_use = "the load report lists reference modules that failed to load"]
    pub fn close(self) -> LoadReport {
        let report = self.shared.report();
        self.shared.teardown();
        report
    }
}

impl Drop for LoadContext {
    fn drop(&mut self) {
        self.shared.teardown();
    }
}

impl fmt::Debug for LoadContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadContext")
            .field("id", &self.shared.id)
            .field("primary", &self.shared.primary_identity.display_name())
            .field("modules", &self.shared.modules.count())
            .field("cached", &self.shared.cache.len())
            .finish()
    }
}

enum PendingReference {
    Bytes(Vec<u8>),
    Source(Arc<dyn SymbolSource>),
}

/// Builder for a [`LoadContext`].
///
/// ```rust
/// use metascope::prelude::*;
///
/// let library = SymbolGraphBuilder::new("Contoso.Models")
///     .add_type(TypeBuilder::class("Contoso.Models", "Address").build())
///     .build();
/// let image = ModuleWriter::emit(&library)?;
///
/// let context = LoadContext::builder()
///     .primary(SymbolGraphBuilder::new("App").build())
///     .reference_bytes(image)
///     .options(LoadOptions::strict())
///     .build()?;
///
/// assert!(context.find_type("Contoso.Models.Address").is_some());
/// # Ok::<(), metascope::Error>(())
/// ```
#[derive(Default)]
pub struct LoadContextBuilder {
    primary: Option<Arc<dyn SymbolSource>>,
    references: Vec<PendingReference>,
    options: LoadOptions,
}

impl LoadContextBuilder {
    /// Create an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the primary compilation unit.
    #[must_use]
    pub fn primary<S: SymbolSource + 'static>(mut self, source: S) -> Self {
        self.primary = Some(Arc::new(source));
        self
    }

    /// Add a precompiled reference module.
    #[must_use]
    pub fn reference_bytes(mut self, data: impl Into<Vec<u8>>) -> Self {
        self.references.push(PendingReference::Bytes(data.into()));
        self
    }

    /// Add an analysed compilation unit as a reference module.
    #[must_use]
    pub fn reference_source<S: SymbolSource + 'static>(mut self, source: S) -> Self {
        self.references.push(PendingReference::Source(Arc::new(source)));
        self
    }

    /// Replace the options.
    #[must_use]
    pub fn options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the context and register every module in the order they were added.
    ///
    /// # Errors
    /// Returns [`Error::Empty`] without a primary unit. With
    /// [`LoadOptions::fail_on_module_error`] set, the first failed reference module is
    /// returned; otherwise failures only show up in the [`LoadReport`].
    pub fn build(self) -> Result<LoadContext> {
        let primary = self.primary.ok_or(Error::Empty)?;

        let core = if self.options.include_core_library {
            let graph = core_library();
            let layout = ModuleLayout::new(&graph)?;
            Some(ModuleEntry {
                identity: graph.identity().clone(),
                state: ModuleState::Loaded {
                    source: Arc::new(graph),
                    layout,
                },
            })
        } else {
            None
        };

        if primary.has_errors() {
            warn!(
                module = %primary.identity(),
                errors = primary.diagnostics().len(),
                "primary unit carries front-end errors, analysing what was declared"
            );
        }

        let context = LoadContext {
            shared: ContextShared::new(self.options, primary.identity().clone(), core),
        };
        context.shared.register(primary)?;

        for reference in self.references {
            let loaded = match reference {
                PendingReference::Bytes(data) => context.shared.load_module(&data),
                PendingReference::Source(source) => context.shared.load_source(source),
            };
            if let Err(error) = loaded {
                if self.options.fail_on_module_error {
                    return Err(error);
                }
            }
        }

        debug!(
            context = context.shared.id,
            modules = context.shared.modules.count(),
            "load context ready"
        );
        Ok(context)
    }
}

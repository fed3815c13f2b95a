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
    sync::{Arc, Weak},
};

use crate::{
    metadata::{
        loadcontext::{ContextShared, SymbolKey},
        typesystem::Visibility,
    },
    Error, Result,
};

/// Non-owning back-reference from a wrapper to the context that produced it.
#[derive(Clone)]
pub(crate) struct ContextRef {
    weak_ref: Weak<ContextShared>,
    id: u64,
}

impl ContextRef {
    pub(crate) fn new(weak_ref: Weak<ContextShared>, id: u64) -> Self {
        ContextRef { weak_ref, id }
    }

    /// Get a strong reference to the context, failing once it was closed or dropped.
    pub(crate) fn upgrade(&self) -> Result<Arc<ContextShared>> {
        match self.weak_ref.upgrade() {
            Some(shared) if !shared.is_closed() => Ok(shared),
            _ => Err(Error::ContextClosed),
        }
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }
}

impl fmt::Debug for ContextRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContextRef({})", self.id)
    }
}

/// State shared by every member wrapper.
pub(crate) struct MemberCore {
    pub(crate) context: ContextRef,
    pub(crate) key: SymbolKey,
    pub(crate) declaring_type: SymbolKey,
    pub(crate) name: String,
    pub(crate) visibility: Visibility,
    pub(crate) is_static: bool,
}

impl MemberCore {
    pub(crate) fn new(
        context: ContextRef,
        key: SymbolKey,
        declaring_type: SymbolKey,
        name: String,
        visibility: Visibility,
        is_static: bool,
    ) -> Self {
        MemberCore {
            context,
            key,
            declaring_type,
            name,
            visibility,
            is_static,
        }
    }
}

impl PartialEq for MemberCore {
    fn eq(&self, other: &Self) -> bool {
        self.context.id == other.context.id && self.key == other.key
    }
}

impl Eq for MemberCore {}

impl Hash for MemberCore {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.context.id.hash(state);
        self.key.hash(state);
    }
}

impl fmt::Debug for MemberCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberCore")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("context", &self.context.id)
            .finish()
    }
}

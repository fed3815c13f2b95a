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

use bitflags::bitflags;
use strum::{Display, EnumIter, EnumString, FromRepr};

/// Declared accessibility of a type or member.
///
/// The discriminants are the ECMA-335 member access values (`mdMemberAccessMask`), which is
/// also how module images store them.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum Visibility {
    /// Accessible only from within the declaring type
    #[default]
    #[strum(serialize = "private")]
    Private = 1,
    /// Accessible from derived types within the same assembly
    #[strum(serialize = "private protected")]
    PrivateProtected = 2,
    /// Accessible from within the same assembly
    #[strum(serialize = "internal")]
    Internal = 3,
    /// Accessible from derived types
    #[strum(serialize = "protected")]
    Protected = 4,
    /// Accessible from derived types or the same assembly
    #[strum(serialize = "protected internal")]
    ProtectedInternal = 5,
    /// Accessible everywhere
    #[strum(serialize = "public")]
    Public = 6,
}

impl Visibility {
    /// Returns `true` for [`Visibility::Public`].
    #[must_use]
    pub fn is_public(self) -> bool {
        self == Visibility::Public
    }
}

/// Category of a declared type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, FromRepr,
)]
#[repr(u8)]
pub enum TypeKind {
    /// Reference type
    #[default]
    #[strum(serialize = "class")]
    Class = 0,
    /// Value type
    #[strum(serialize = "struct")]
    Struct = 1,
    /// Interface
    #[strum(serialize = "interface")]
    Interface = 2,
    /// Enumeration with named integral members
    #[strum(serialize = "enum")]
    Enum = 3,
}

/// Kind of a reflection-shaped member view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum MemberKind {
    /// A type
    Type,
    /// A field
    Field,
    /// A property
    Property,
    /// A method, including synthesized property accessors
    Method,
    /// An instance or static constructor
    Constructor,
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Member filter for the `*_with` enumerations on [`crate::TypeWrapper`].
    ///
    /// A member matches when it satisfies one of the visibility bits *and* one of the
    /// storage bits, the same way reflection's `BindingFlags` combine. An empty set of either
    /// group matches nothing.
    pub struct BindingFlags: u32 {
        /// Include instance members
        const INSTANCE = 0x0004;
        /// Include static members
        const STATIC = 0x0008;
        /// Include public members
        const PUBLIC = 0x0010;
        /// Include every non-public member
        const NON_PUBLIC = 0x0020;
        /// Every declared member
        const ALL = Self::INSTANCE.bits() | Self::STATIC.bits() | Self::PUBLIC.bits() | Self::NON_PUBLIC.bits();
    }
}

impl BindingFlags {
    /// Returns `true` if a member with this shape passes the filter.
    #[must_use]
    pub fn matches(self, visibility: Visibility, is_static: bool) -> bool {
        let visible = if visibility.is_public() {
            self.contains(BindingFlags::PUBLIC)
        } else {
            self.contains(BindingFlags::NON_PUBLIC)
        };
        let storage = if is_static {
            self.contains(BindingFlags::STATIC)
        } else {
            self.contains(BindingFlags::INSTANCE)
        };
        visible && storage
    }
}

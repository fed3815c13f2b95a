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

/// Helper macro for the accessors every member wrapper shares
///
/// The wrapper must be a tuple struct around `Arc<Inner>` where `Inner` has a
/// `core: MemberCore` field.
///
/// ```rust, ignore
///  pub struct FieldWrapper(Arc<FieldInner>);
///  impl_member_wrapper!(FieldWrapper, MemberKind::Field);
/// ```
macro_rules! impl_member_wrapper {
    ($wrapper:ident, $kind:expr) => {
        impl $wrapper {
            /// Member name, as reflection reports it.
            #[must_use]
            pub fn name(&self) -> &str {
                &self.0.core.name
            }

            /// Effective accessibility.
            #[must_use]
            pub fn visibility(&self) -> crate::metadata::typesystem::Visibility {
                self.0.core.visibility
            }

            /// Returns `true` for static members.
            #[must_use]
            pub fn is_static(&self) -> bool {
                self.0.core.is_static
            }

            /// Stable symbol identity within the producing context.
            #[must_use]
            pub fn symbol_key(&self) -> crate::metadata::loadcontext::SymbolKey {
                self.0.core.key
            }

            /// The type that declares this member.
            ///
            /// # Errors
            /// Returns [`crate::Error::ContextClosed`] if the context is gone.
            pub fn declaring_type(&self) -> crate::Result<crate::metadata::wrappers::TypeWrapper> {
                self.0
                    .core
                    .context
                    .upgrade()?
                    .resolve_type(self.0.core.declaring_type)
            }

            /// Attributes applied to this member, in source order.
            ///
            /// # Errors
            /// Returns [`crate::Error::ContextClosed`] if the context is gone.
            pub fn attributes(
                &self,
            ) -> crate::Result<std::sync::Arc<[crate::metadata::customattributes::AttributeData]>>
            {
                self.0.core.context.upgrade()?.attributes_for(self.0.core.key)
            }

            /// Returns `true` if both handles are the same object.
            #[must_use]
            pub fn ptr_eq(&self, other: &$wrapper) -> bool {
                std::sync::Arc::ptr_eq(&self.0, &other.0)
            }
        }

        impl crate::metadata::wrappers::MemberInfo for $wrapper {
            fn name(&self) -> &str {
                &self.0.core.name
            }

            fn member_kind(&self) -> crate::metadata::typesystem::MemberKind {
                $kind
            }

            fn visibility(&self) -> crate::metadata::typesystem::Visibility {
                self.0.core.visibility
            }

            fn is_static(&self) -> bool {
                self.0.core.is_static
            }

            fn symbol_key(&self) -> Option<crate::metadata::loadcontext::SymbolKey> {
                Some(self.0.core.key)
            }

            fn declaring_type(
                &self,
            ) -> crate::Result<Option<crate::metadata::wrappers::TypeWrapper>> {
                $wrapper::declaring_type(self).map(Some)
            }

            fn attributes(
                &self,
            ) -> crate::Result<std::sync::Arc<[crate::metadata::customattributes::AttributeData]>>
            {
                $wrapper::attributes(self)
            }
        }

        impl PartialEq for $wrapper {
            fn eq(&self, other: &Self) -> bool {
                self.0.core == other.0.core
            }
        }

        impl Eq for $wrapper {}

        impl std::hash::Hash for $wrapper {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.0.core.hash(state);
            }
        }

        impl std::fmt::Debug for $wrapper {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(
                    f,
                    "{}({} @ {})",
                    stringify!($wrapper),
                    self.0.core.name,
                    self.0.core.key
                )
            }
        }
    };
}

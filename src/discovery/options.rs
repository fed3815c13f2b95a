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

//! Discovery configuration

use strum::{Display, EnumString};

/// Attribute that opts a type into discovery unless configured otherwise.
pub const DEFAULT_MARKER: &str = "System.Text.Json.Serialization.JsonSerializableAttribute";

/// What happens when two distinct discovered types share a simple name.
///
/// Either way an [`crate::Error::DuplicateDiscoveredName`] is recorded in the result's
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Keep the type discovered first, skip later ones
    #[default]
    FirstWins,
    /// Drop every type with the colliding name
    Reject,
}

/// Configuration for a discovery pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Marker attribute name; namespace-qualified or simple, `Attribute` suffix optional.
    ///
    /// A qualified marker only matches attribute types in that namespace. The exception is an
    /// attribute whose type could not be resolved and was written without a namespace: it
    /// matches on its simple name, as the front end left the `using` unbound.
    pub marker: String,

    /// Collision handling for simple names
    pub duplicate_policy: DuplicatePolicy,

    /// Scan top-level types on the rayon thread pool. The result is identical to a sequential
    /// walk.
    pub parallel: bool,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            duplicate_policy: DuplicatePolicy::FirstWins,
            parallel: false,
        }
    }
}

impl DiscoveryOptions {
    /// Default options with a different marker attribute.
    #[must_use]
    pub fn with_marker(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            ..Self::default()
        }
    }

    /// Use [`DuplicatePolicy::Reject`].
    #[must_use]
    pub fn reject_duplicates(mut self) -> Self {
        self.duplicate_policy = DuplicatePolicy::Reject;
        self
    }

    /// Scan types in parallel.
    #[must_use]
    pub fn parallel(mut self) -> Self {
        self.parallel = true;
        self
    }
}

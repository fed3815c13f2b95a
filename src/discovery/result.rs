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
use tracing::{debug, warn};

use crate::{
    discovery::DuplicatePolicy,
    metadata::wrappers::TypeWrapper,
    Error,
};

/// Outcome of a discovery pass.
///
/// `types` maps each discovered type's simple name to its wrapper, in discovery order.
/// `diagnostics` collects every non-fatal condition met on the way, in the order it was met.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Discovered types keyed by simple name
    pub types: IndexMap<String, TypeWrapper>,
    /// Non-fatal conditions
    pub diagnostics: Vec<Error>,
}

impl DiscoveryResult {
    /// Look up a discovered type by simple name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeWrapper> {
        self.types.get(name)
    }

    /// Number of discovered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing was discovered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Discovered types in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeWrapper)> {
        self.types.iter().map(|(name, wrapper)| (name.as_str(), wrapper))
    }

    /// Returns `true` if any diagnostic was recorded.
    #[must_use]
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Accumulates findings and applies the duplicate policy.
///
/// A wrapper is diagnosed at most once: finding a kept or dropped type again through another
/// marker is a no-op.
pub(crate) struct Collector {
    policy: DuplicatePolicy,
    result: DiscoveryResult,
    dropped: IndexMap<String, Vec<TypeWrapper>>,
}

impl Collector {
    pub(crate) fn new(policy: DuplicatePolicy) -> Self {
        Collector {
            policy,
            result: DiscoveryResult::default(),
            dropped: IndexMap::new(),
        }
    }

    pub(crate) fn diagnostic(&mut self, error: Error) {
        warn!(%error, "discovery diagnostic");
        self.result.diagnostics.push(error);
    }

    pub(crate) fn found(&mut self, wrapper: TypeWrapper) {
        let name = wrapper.name().to_string();
        if self
            .dropped
            .get(&name)
            .is_some_and(|seen| seen.contains(&wrapper))
        {
            return;
        }

        match self.result.types.get(&name) {
            Some(existing) if *existing == wrapper => {}
            None if !self.dropped.contains_key(&name) => {
                debug!(name = %name, full_name = %wrapper.full_name(), "discovered type");
                self.result.types.insert(name, wrapper);
            }
            None => self.drop_type(&name, "", wrapper),
            Some(existing) => match self.policy {
                DuplicatePolicy::FirstWins => {
                    let kept = existing.full_name().to_string();
                    self.drop_type(&name, &kept, wrapper);
                }
                DuplicatePolicy::Reject => {
                    if let Some(first) = self.result.types.shift_remove(&name) {
                        self.drop_type(&name, "", first);
                    }
                    self.drop_type(&name, "", wrapper);
                }
            },
        }
    }

    fn drop_type(&mut self, name: &str, kept: &str, wrapper: TypeWrapper) {
        self.diagnostic(Error::DuplicateDiscoveredName {
            name: name.to_string(),
            kept: kept.to_string(),
            dropped: wrapper.full_name().to_string(),
        });
        self.dropped.entry(name.to_string()).or_default().push(wrapper);
    }

    pub(crate) fn finish(self) -> DiscoveryResult {
        self.result
    }
}

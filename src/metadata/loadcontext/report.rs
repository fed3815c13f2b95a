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

//! Module loading statistics.

use crate::{metadata::identity::AssemblyIdentity, Error};

/// One entry in the context's load log.
#[derive(Debug, Clone)]
pub(crate) enum LoadEvent {
    Loaded(AssemblyIdentity),
    Failed(Error),
}

/// Result of registering modules with a [`crate::LoadContext`].
///
/// Tracks every module that was registered (the primary unit and each reference module, but
/// not the built-in core library) and every reference module that failed to load. Failures
/// never abort the context; they are only listed here.
///
/// # Usage
///
/// ```rust
/// use metascope::prelude::*;
///
/// let context = LoadContext::builder()
///     .primary(SymbolGraphBuilder::new("App").build())
///     .reference_bytes(vec![0xDE, 0xAD])
///     .build()?;
///
/// let report = context.load_report();
/// assert_eq!(report.success_count(), 1);
/// assert_eq!(report.failure_count(), 1);
/// assert!(!report.is_complete_success());
/// # Ok::<(), metascope::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Successfully registered module identities, in registration order
    pub loaded_assemblies: Vec<AssemblyIdentity>,
    /// Failures, each an [`Error::ModuleLoad`]
    pub failed_loads: Vec<Error>,
    /// Total number of successfully registered modules
    pub loaded_count: usize,
    /// Total number of failed loading attempts
    pub failed_count: usize,
}

impl LoadReport {
    /// Create a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_events<'a>(events: impl IntoIterator<Item = &'a LoadEvent>) -> Self {
        let mut report = LoadReport::new();
        for event in events {
            match event {
                LoadEvent::Loaded(identity) => report.record_success(identity.clone()),
                LoadEvent::Failed(error) => report.record_failure(error.clone()),
            }
        }
        report
    }

    /// Check if every module loaded.
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }

    /// Check if any module failed to load.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }

    /// Get the number of successfully registered modules.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.loaded_count
    }

    /// Get the number of failed module loads.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed_count
    }

    /// Record a successful module registration.
    pub(crate) fn record_success(&mut self, identity: AssemblyIdentity) {
        self.loaded_assemblies.push(identity);
        self.loaded_count += 1;
    }

    /// Record a failed module load.
    pub(crate) fn record_failure(&mut self, error: Error) {
        self.failed_loads.push(error);
        self.failed_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_events() {
        let events = vec![
            LoadEvent::Loaded(AssemblyIdentity::simple("App")),
            LoadEvent::Failed(Error::ModuleLoad {
                module: None,
                message: "truncated".into(),
            }),
            LoadEvent::Loaded(AssemblyIdentity::simple("Lib")),
        ];

        let report = LoadReport::from_events(&events);
        assert_eq!(report.success_count(), 2);
        assert_eq!(report.failure_count(), 1);
        assert!(report.has_failures());
        assert_eq!(report.loaded_assemblies[1].name, "Lib");
    }

    #[test]
    fn empty_report_is_success() {
        let report = LoadReport::new();
        assert!(report.is_complete_success());
        assert!(!report.has_failures());
    }
}

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

//! Load context configuration
//!
//! Controls which modules a [`crate::LoadContext`] registers on its own and how it reacts to
//! reference modules that fail to load.

/// Highest number of reference modules a context can address.
///
/// Module ids are 16 bits wide; id 0 is the primary unit and `u16::MAX` is the core library.
pub const MAX_REFERENCE_MODULES: usize = (u16::MAX - 1) as usize;

/// Configuration for a [`crate::LoadContext`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Register the built-in core library so primitives and `System.Object` always resolve
    pub include_core_library: bool,

    /// Maximum number of reference modules accepted (default: 256)
    pub max_reference_modules: usize,

    /// Abort context construction on the first reference module that fails to load.
    /// Failures are recorded in the load report either way.
    pub fail_on_module_error: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            include_core_library: true,
            max_reference_modules: 256,
            fail_on_module_error: false,
        }
    }
}

impl LoadOptions {
    /// Creates a strict configuration
    ///
    /// A reference module that fails to load makes
    /// [`crate::metadata::loadcontext::LoadContextBuilder::build`] fail instead of being recorded
    /// and skipped.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            fail_on_module_error: true,
            ..Self::default()
        }
    }

    /// Creates a lenient configuration
    ///
    /// Accepts as many reference modules as module ids allow and never aborts on a failed load.
    #[must_use]
    pub fn lenient() -> Self {
        Self {
            include_core_library: true,
            max_reference_modules: MAX_REFERENCE_MODULES,
            fail_on_module_error: false,
        }
    }

    /// Effective module limit after clamping to what module ids can address.
    #[must_use]
    pub fn module_limit(&self) -> usize {
        self.max_reference_modules.min(MAX_REFERENCE_MODULES)
    }
}

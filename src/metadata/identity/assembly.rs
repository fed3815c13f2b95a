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

//! Assembly identity for compilation units and reference modules.
//!
//! Every symbol source registered with a [`crate::LoadContext`] carries an
//! [`AssemblyIdentity`]. The identity is what type references name in their assembly hint, what
//! the load report lists, and what [`crate::TypeWrapper::assembly`] returns.
//!
//! # Display Name Format
//!
//! ```text
//! AssemblyName[, Version=Major.Minor.Build.Revision][, Culture=culture]
//! ```
//!
//! `Culture=neutral` parses to `None`. Unknown components (`PublicKeyToken=...` and friends)
//! are accepted and ignored so that display names copied from real assemblies still parse.

use std::{fmt, str::FromStr};

use crate::{Error, Result};

/// Complete identity of a compilation unit or reference module.
///
/// Equality and hashing compare all three components, except that names compare
/// case-insensitively through [`AssemblyIdentity::matches_name`] during resolution.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::identity::{AssemblyIdentity, AssemblyVersion};
///
/// let identity = AssemblyIdentity::parse("Contoso.Models, Version=1.2.0.0, Culture=neutral")?;
/// assert_eq!(identity.name, "Contoso.Models");
/// assert_eq!(identity.version, AssemblyVersion::new(1, 2, 0, 0));
/// assert!(identity.is_culture_neutral());
/// # Ok::<(), metascope::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g., "System.Private.CoreLib", "Contoso.Models").
    pub name: String,

    /// Four-part version number.
    pub version: AssemblyVersion,

    /// Culture information for localized assemblies. `None` is culture-neutral.
    pub culture: Option<String>,
}

/// Four-part version numbering for assemblies.
///
/// Versions are compared component-wise in order: major, minor, build, revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build version component.
    pub build: u16,
    /// Revision version component.
    pub revision: u16,
}

impl AssemblyIdentity {
    /// Create a new identity.
    pub fn new(name: impl Into<String>, version: AssemblyVersion, culture: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
            culture,
        }
    }

    /// Create a culture-neutral identity with an unknown (`0.0.0.0`) version.
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, AssemblyVersion::UNKNOWN, None)
    }

    /// Parse an identity from its display name.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the name is empty or the version is invalid.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default();
        if name.is_empty() {
            return Err(malformed_error!("Assembly name cannot be empty"));
        }

        let mut version = AssemblyVersion::UNKNOWN;
        let mut culture = None;
        for part in parts {
            if let Some(value) = part.strip_prefix("Version=") {
                version = AssemblyVersion::parse(value)?;
            } else if let Some(value) = part.strip_prefix("Culture=") {
                if value != "neutral" && !value.is_empty() {
                    culture = Some(value.to_string());
                }
            }
        }

        Ok(Self::new(name, version, culture))
    }

    /// Generate the display name string for this identity.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!(
            "{}, Version={}, Culture={}",
            self.name,
            self.version,
            self.culture.as_deref().unwrap_or("neutral")
        )
    }

    /// Returns `true` if this assembly is culture-neutral.
    #[must_use]
    pub fn is_culture_neutral(&self) -> bool {
        self.culture.is_none()
    }

    /// Returns `true` if `hint` names this assembly.
    ///
    /// A hint may be a bare simple name or a full display name; only the simple name part is
    /// compared, case-insensitively, and a version in the hint must be satisfied by this
    /// identity's version.
    #[must_use]
    pub fn matches_name(&self, hint: &str) -> bool {
        match AssemblyIdentity::parse(hint) {
            Ok(required) => {
                self.name.eq_ignore_ascii_case(&required.name)
                    && self.version.is_compatible_with(&required.version)
            }
            Err(_) => false,
        }
    }
}

impl AssemblyVersion {
    /// Sentinel value representing an unknown or unspecified version.
    pub const UNKNOWN: AssemblyVersion = AssemblyVersion {
        major: 0,
        minor: 0,
        build: 0,
        revision: 0,
    };

    /// Create a version from its four components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Returns `true` for the `0.0.0.0` sentinel.
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        *self == Self::UNKNOWN
    }

    /// Check if this version satisfies a requirement.
    ///
    /// The major version must match and this version must be at least the required one. An
    /// unknown requirement accepts any version.
    #[must_use]
    pub fn is_compatible_with(&self, required: &AssemblyVersion) -> bool {
        if required.is_unknown() {
            return true;
        }

        self.major == required.major && *self >= *required
    }

    /// Parse a version from one to four dotted components; missing components are zero.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the version string has an invalid format.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();
        if parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for AssemblyIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

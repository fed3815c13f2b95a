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

use thiserror::Error;

use crate::metadata::{loadcontext::ModuleId, token::Token};

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

macro_rules! out_of_bounds_error {
    () => {
        crate::Error::OutOfBounds {
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most variants are *non-fatal* during a discovery pass: they are collected as diagnostics on
/// the [`crate::LoadContext`] load report or on a [`crate::discovery::DiscoveryResult`]
/// instead of aborting the pass. Only [`Error::Empty`] (no primary symbol source at all) stops
/// discovery before it starts.
///
/// # Error Categories
///
/// ## Module image decoding
/// - [`Error::Malformed`] - Corrupted or invalid module image
/// - [`Error::OutOfBounds`] - Attempted to read beyond the supplied bytes
/// - [`Error::NotSupported`] - Unknown image format version
/// - [`Error::ModuleLoad`] - A reference module could not be (fully) loaded
///
/// ## Resolution
/// - [`Error::UnresolvableReference`] - A type reference names a type no module provides
/// - [`Error::TypeNotFound`] - A token does not name a symbol in the given module
/// - [`Error::ModuleNotFound`] - A module id is not registered with the context
/// - [`Error::ContextClosed`] - A wrapper outlived the [`crate::LoadContext`] that produced it
///
/// ## Attribute data
/// - [`Error::NonConstantArgument`] - An attribute argument is not a compile-time constant
///
/// ## Discovery
/// - [`Error::DuplicateDiscoveredName`] - Two distinct discovered types share a simple name
/// - [`Error::UnexpectedMarkerArgument`] - The marker attribute carries a non-type argument
/// - [`Error::Empty`] - No primary symbol source was supplied
///
/// # Examples
///
/// ```rust
/// use metascope::{Error, metadata::image::ModuleImage};
///
/// match ModuleImage::from_bytes(&[0x00, 0x01]) {
///     Ok(_) => println!("loaded"),
///     Err(Error::OutOfBounds { .. }) => println!("truncated image"),
///     Err(Error::Malformed { message, .. }) => println!("malformed: {}", message),
///     Err(e) => println!("other error: {}", e),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The module image is damaged and could not be decoded.
    ///
    /// The error includes the source location where the malformation was detected for
    /// debugging purposes.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while decoding a module image.
    #[error("Out of Bound read would have occurred - {file}:{line}")]
    OutOfBounds {
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The module image uses a format version this library does not understand.
    #[error("Module image format version {0} is not supported")]
    NotSupported(u16),

    /// Nothing to analyze: no primary symbol source was supplied.
    ///
    /// This is the only condition that is fatal to a discovery pass.
    #[error("No primary symbol source was supplied")]
    Empty,

    /// A reference module failed to load.
    ///
    /// `module` is the display name of the module when its header could be read, or `None`
    /// when even the identity was unreadable. The module's types become unresolved; every
    /// other module stays usable.
    #[error("Failed to load reference module {}: {message}", .module.as_deref().unwrap_or("<unknown>"))]
    ModuleLoad {
        /// Display name of the failing module, if its header was readable
        module: Option<String>,
        /// Why the module failed
        message: String,
    },

    /// A symbol reference points to a type that no registered module provides.
    #[error("Unresolvable type reference '{name}': {reason}")]
    UnresolvableReference {
        /// The namespace-qualified name that was looked up
        name: String,
        /// The assembly hint carried by the reference, if any
        assembly: Option<String>,
        /// Why resolution failed
        reason: String,
    },

    /// The requested token does not name a symbol within the given module.
    #[error("No symbol with token {token} in module {module}")]
    TypeNotFound {
        /// The module that was searched
        module: ModuleId,
        /// The token that failed to resolve
        token: Token,
    },

    /// The module id is not registered with this context (or its module failed to load).
    #[error("Module {0} is not available in this context")]
    ModuleNotFound(ModuleId),

    /// An attribute argument could not be evaluated as a constant.
    #[error("Attribute '{attribute}' argument {argument} is not a constant: {expression}")]
    NonConstantArgument {
        /// Full name of the attribute type
        attribute: String,
        /// Position (`#0`, `#1`, ...) or name of the offending argument
        argument: String,
        /// The argument expression as written
        expression: String,
    },

    /// Two distinct types share a simple name and both were discovered.
    #[error("Duplicate discovered type name '{name}': kept '{kept}', dropped '{dropped}'")]
    DuplicateDiscoveredName {
        /// The colliding simple name
        name: String,
        /// Full name of the type that stays in the result (empty when every candidate was rejected)
        kept: String,
        /// Full name of the type that was not inserted
        dropped: String,
    },

    /// The marker attribute carries a positional argument that is not a type reference.
    #[error("Marker on '{carrier}' has a non-type argument: {found}")]
    UnexpectedMarkerArgument {
        /// Full name of the type carrying the marker
        carrier: String,
        /// Description of the argument found instead
        found: String,
    },

    /// The [`crate::LoadContext`] that produced a wrapper has been closed.
    #[error("The load context has been closed")]
    ContextClosed,

    /// Recursion limit reached.
    ///
    /// Base-type chains are walked with a depth limit to survive cyclic declarations in
    /// erroneous input.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}

impl Error {
    /// Returns `true` if this error would abort a discovery pass.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Empty)
    }
}

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

//! Precompiled reference module images.
//!
//! A reference module is the "loaded binary" backing store: declarations that were analysed
//! once, emitted, and handed to later discovery runs as raw bytes. Decoding produces a
//! [`crate::metadata::image::ModuleImage`], which implements the same
//! [`crate::metadata::symbols::SymbolSource`] capability set as an analysed graph.
//!
//! # Layout
//!
//! ```text
//! magic            4 bytes  "MSYM"
//! format version   u16 LE
//! identity         name: string, version: 4 x u16 LE, culture: optional string
//! module attrs     count, attribute*
//! types            count, type*
//! ```
//!
//! Counts and string lengths use the ECMA-335 compressed unsigned encoding. Attribute
//! arguments are tagged with the `SERIALIZATION_TYPE` values from
//! [`crate::metadata::customattributes`]. Only constants can be stored.
//!
//! # Failure modes
//!
//! Decoding is split in two so that the load context can tell them apart:
//!
//! - [`crate::metadata::image::ModuleImage::peek_identity`] fails when even the header is
//!   unreadable; the module is anonymous
//! - [`crate::metadata::image::ModuleImage::from_bytes`] can additionally fail in the body; the
//!   identity is known and references into the module report why they are unresolved

mod reader;
mod writer;

pub use writer::ModuleWriter;

use crate::{
    metadata::{
        identity::AssemblyIdentity,
        symbols::{AttributeDecl, SymbolGraph, SymbolSource, TypeDecl},
    },
    Result,
};
use reader::ImageReader;

/// Accessor visibility byte meaning "inherits the property's visibility".
pub(crate) const NO_VISIBILITY: u8 = 0xFF;

/// A decoded reference module.
///
/// # Examples
///
/// ```rust
/// use metascope::metadata::image::ModuleImage;
/// use metascope::Error;
///
/// assert!(matches!(ModuleImage::from_bytes(b"NOPE\x01\x00"), Err(Error::Malformed { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct ModuleImage {
    graph: SymbolGraph,
}

impl ModuleImage {
    /// Leading bytes of every image.
    pub const MAGIC: [u8; 4] = *b"MSYM";

    /// Format version written and accepted by this library.
    pub const FORMAT_VERSION: u16 = 1;

    /// Decode only the header and return the module's identity.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] for a damaged
    /// header, [`crate::Error::NotSupported`] for a foreign format version.
    pub fn peek_identity(data: &[u8]) -> Result<AssemblyIdentity> {
        ImageReader::new(data).read_header()
    }

    /// Decode a complete image.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`], [`crate::Error::OutOfBounds`] or
    /// [`crate::Error::RecursionLimit`] for damaged input and [`crate::Error::NotSupported`] for a
    /// foreign format version.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut reader = ImageReader::new(data);
        let identity = reader.read_header()?;
        let (module_attributes, types) = reader.read_body()?;

        Ok(ModuleImage {
            graph: SymbolGraph::new(identity, types, module_attributes, Vec::new()),
        })
    }

    /// Convert into a plain [`SymbolGraph`].
    #[must_use]
    pub fn into_graph(self) -> SymbolGraph {
        self.graph
    }
}

impl SymbolSource for ModuleImage {
    fn identity(&self) -> &AssemblyIdentity {
        self.graph.identity()
    }

    fn types(&self) -> &[TypeDecl] {
        self.graph.types()
    }

    fn module_attributes(&self) -> &[AttributeDecl] {
        self.graph.module_attributes()
    }

    fn find_type(&self, full_name: &str) -> Option<usize> {
        self.graph.find_type(full_name)
    }
}

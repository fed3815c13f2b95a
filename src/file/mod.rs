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

//! Binary primitives for module images.
//!
//! Reference modules reach the [`crate::LoadContext`] as raw bytes that are already in memory;
//! this module never touches the filesystem. It provides the two halves of the image codec's
//! byte layer:
//!
//! - [`crate::file::parser::Parser`] - bounds-checked cursor over a borrowed byte slice
//! - [`crate::file::writer::Writer`] - growable sink producing the same encodings
//! - [`crate::file::io`] - little-endian scalar conversion shared by both
//!
//! Integers that describe counts and indices use the ECMA-335 compressed unsigned encoding,
//! strings are UTF-8 with a compressed length prefix.

pub mod io;
pub mod parser;
pub mod writer;

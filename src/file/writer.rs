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

//! Growable byte sink, the encoding counterpart of [`crate::file::parser::Parser`].
//!
//! Every primitive written here is read back by the method of the same shape on `Parser`.

use crate::{file::io::ImageIO, Result};

/// Largest value the ECMA-335 compressed unsigned integer encoding can represent.
pub const MAX_COMPRESSED_UINT: u32 = 0x1FFF_FFFF;

/// Append-only binary writer used to emit module images.
#[derive(Debug, Default)]
pub struct Writer {
    data: Vec<u8>,
}

impl Writer {
    /// Create an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Writer::default()
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if nothing has been written yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the writer and return the encoded bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }

    /// Write a value of type `T` in little-endian byte order.
    pub fn write_le<T: ImageIO>(&mut self, value: T) {
        self.data.extend_from_slice(value.to_le_bytes().as_ref());
    }

    /// Write a compressed unsigned integer as defined in ECMA-335 II.23.2.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `value` exceeds [`MAX_COMPRESSED_UINT`].
    pub fn write_compressed_uint(&mut self, value: u32) -> Result<()> {
        if value < 0x80 {
            self.data.push(value as u8);
        } else if value < 0x4000 {
            self.data.push(0x80 | (value >> 8) as u8);
            self.data.push(value as u8);
        } else if value <= MAX_COMPRESSED_UINT {
            self.data.push(0xC0 | (value >> 24) as u8);
            self.data.push((value >> 16) as u8);
            self.data.push((value >> 8) as u8);
            self.data.push(value as u8);
        } else {
            return Err(malformed_error!(
                "Value {:#x} is too large for a compressed uint",
                value
            ));
        }
        Ok(())
    }

    /// Write a collection length as a compressed unsigned integer.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the count does not fit the encoding.
    pub fn write_count(&mut self, count: usize) -> Result<()> {
        let Ok(count) = u32::try_from(count) else {
            return Err(malformed_error!("Count {} is too large to encode", count));
        };
        self.write_compressed_uint(count)
    }

    /// Write a compressed-length prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the string is too long to encode.
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        self.write_count(value.len())?;
        self.data.extend_from_slice(value.as_bytes());
        Ok(())
    }

    /// Write a presence byte followed by the string when present.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the string is too long to encode.
    pub fn write_optional_string(&mut self, value: Option<&str>) -> Result<()> {
        match value {
            None => {
                self.data.push(0);
                Ok(())
            }
            Some(value) => {
                self.data.push(1);
                self.write_string(value)
            }
        }
    }

    /// Write a single byte boolean.
    pub fn write_bool(&mut self, value: bool) {
        self.data.push(u8::from(value));
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{file::parser::Parser, Error};

    #[test]
    fn compressed_uint_boundaries() {
        let cases: [(u32, &[u8]); 6] = [
            (0x03, &[0x03]),
            (0x7F, &[0x7F]),
            (0x80, &[0x80, 0x80]),
            (0x3FFF, &[0xBF, 0xFF]),
            (0x4000, &[0xC0, 0x00, 0x40, 0x00]),
            (MAX_COMPRESSED_UINT, &[0xDF, 0xFF, 0xFF, 0xFF]),
        ];

        for (value, expected) in cases {
            let mut writer = Writer::new();
            writer.write_compressed_uint(value).unwrap();
            assert_eq!(writer.into_inner(), expected, "value {value:#x}");
        }
    }

    #[test]
    fn compressed_uint_overflow() {
        let mut writer = Writer::new();
        assert!(matches!(
            writer.write_compressed_uint(0x2000_0000),
            Err(Error::Malformed { .. })
        ));
        assert!(writer.is_empty());
    }

    #[test]
    fn strings_read_back() {
        let mut writer = Writer::new();
        writer.write_string("System.Int32").unwrap();
        writer.write_optional_string(None).unwrap();
        writer.write_optional_string(Some("neutral")).unwrap();
        writer.write_le::<u16>(0xBEEF);
        let bytes = writer.into_inner();

        let mut parser = Parser::new(&bytes);
        assert_eq!(parser.read_string().unwrap(), "System.Int32");
        assert_eq!(parser.read_optional_string().unwrap(), None);
        assert_eq!(
            parser.read_optional_string().unwrap().as_deref(),
            Some("neutral")
        );
        assert_eq!(parser.read_le::<u16>().unwrap(), 0xBEEF);
        assert!(!parser.has_more_data());
    }
}

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

//! Low-level byte stream parser for module image decoding.
//!
//! This module provides the [`crate::file::parser::Parser`] type, a cursor-based binary data
//! parser used to decode precompiled reference modules. It offers bounds-checked access to
//! binary data, the ECMA-335 compressed integer encoding, and length-prefixed UTF-8 strings.
//!
//! # Examples
//!
//! ```rust
//! use metascope::Parser;
//!
//! let data = [0x01, 0x02, 0x03, 0x04];
//! let mut parser = Parser::new(&data);
//!
//! let value = parser.read_le::<u16>()?;
//! assert_eq!(value, 0x0201);
//! # Ok::<(), metascope::Error>(())
//! ```

use crate::{
    file::io::{read_le_at, ImageIO},
    Result,
};

/// A generic binary data parser for reading module images.
///
/// `Parser` maintains an internal position cursor and validates every read against the
/// remaining data, so truncated or corrupt images surface as [`crate::Error::OutOfBounds`] or
/// [`crate::Error::Malformed`] instead of panicking.
pub struct Parser<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new `Parser` over the provided data, positioned at its start.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Parser { data, position: 0 }
    }

    /// Returns the total length of the underlying data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the underlying data is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if there is more data to read.
    #[must_use]
    pub fn has_more_data(&self) -> bool {
        self.position < self.data.len()
    }

    /// Get the current cursor position.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.position
    }

    /// Number of bytes left after the cursor.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Read a value of type `T` in little-endian byte order.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length.
    pub fn read_le<T: ImageIO>(&mut self) -> Result<T> {
        read_le_at::<T>(self.data, &mut self.position)
    }

    /// Read a compressed unsigned integer as defined in ECMA-335 II.23.2.
    ///
    /// Values below `0x80` occupy one byte, below `0x4000` two bytes, and up to `0x1FFF_FFFF`
    /// four bytes.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if reading would exceed the data length or
    /// [`crate::Error::Malformed`] for an invalid leading byte.
    pub fn read_compressed_uint(&mut self) -> Result<u32> {
        let first_byte = self.read_le::<u8>()?;

        // 1-byte encoding: 0xxxxxxx
        if (first_byte & 0x80) == 0 {
            return Ok(u32::from(first_byte));
        }

        // 2-byte encoding: 10xxxxxx xxxxxxxx
        if (first_byte & 0xC0) == 0x80 {
            let second_byte = self.read_le::<u8>()?;
            let value = ((u32::from(first_byte) & 0x3F) << 8) | u32::from(second_byte);
            return Ok(value);
        }

        // 4-byte encoding: 110xxxxx xxxxxxxx xxxxxxxx xxxxxxxx
        if (first_byte & 0xE0) == 0xC0 {
            let b1 = u32::from(self.read_le::<u8>()?);
            let b2 = u32::from(self.read_le::<u8>()?);
            let b3 = u32::from(self.read_le::<u8>()?);
            let value = ((u32::from(first_byte) & 0x1F) << 24) | (b1 << 16) | (b2 << 8) | b3;
            return Ok(value);
        }

        Err(malformed_error!("Invalid compressed uint - {}", first_byte))
    }

    /// Read an element count and check it against the bytes that are left.
    ///
    /// Every encoded element takes at least `min_element_size` bytes, so a count that cannot
    /// possibly fit is rejected before anything is allocated for it.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the count exceeds what the remaining data can hold.
    pub fn read_count(&mut self, min_element_size: usize) -> Result<usize> {
        let count = self.read_compressed_uint()? as usize;
        if count.saturating_mul(min_element_size.max(1)) > self.remaining() {
            return Err(malformed_error!(
                "Element count {} at offset {} exceeds remaining data ({} bytes)",
                count,
                self.position,
                self.remaining()
            ));
        }
        Ok(count)
    }

    /// Read a compressed-length prefixed UTF-8 string.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the string exceeds the data, or
    /// [`crate::Error::Malformed`] for invalid UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        let length = self.read_compressed_uint()? as usize;
        let bytes = self.read_bytes(length)?;

        String::from_utf8(bytes.to_vec()).map_err(|e| {
            malformed_error!(
                "Invalid UTF-8 string at offset {}-{}: {}",
                self.position - length,
                self.position,
                e.utf8_error()
            )
        })
    }

    /// Read a presence byte followed by a string when the byte is non-zero.
    ///
    /// # Errors
    /// Propagates errors from [`Parser::read_string`]; a presence byte other than 0 or 1 is
    /// [`crate::Error::Malformed`].
    pub fn read_optional_string(&mut self) -> Result<Option<String>> {
        match self.read_le::<u8>()? {
            0 => Ok(None),
            1 => Ok(Some(self.read_string()?)),
            other => Err(malformed_error!("Invalid presence marker - {}", other)),
        }
    }

    /// Read a single byte boolean (0 or 1).
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] for any other byte value.
    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_le::<u8>()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(malformed_error!("Invalid boolean - {}", other)),
        }
    }

    /// Read `length` raw bytes, borrowing from the underlying buffer.
    ///
    /// # Errors
    /// Returns [`crate::Error::OutOfBounds`] if the range exceeds the data.
    pub fn read_bytes(&mut self, length: usize) -> Result<&'a [u8]> {
        let Some(end) = self.position.checked_add(length) else {
            return Err(out_of_bounds_error!());
        };
        if end > self.data.len() {
            return Err(out_of_bounds_error!());
        }

        let slice = &self.data[self.position..end];
        self.position = end;
        Ok(slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_read_compressed_uint() {
        let test_cases = vec![
            (vec![0x03], 3),
            (vec![0x7F], 0x7F),
            (vec![0x80, 0x80], 0x80),
            (vec![0xBF, 0xFF], 0x3FFF),
            (vec![0xC0, 0x00, 0x40, 0x00], 0x4000),
            (vec![0xDF, 0xFF, 0xFF, 0xFF], 0x1FFF_FFFF),
        ];

        for (input, expected) in test_cases {
            let mut parser = Parser::new(&input);
            assert_eq!(parser.read_compressed_uint().unwrap(), expected);
            assert!(!parser.has_more_data());
        }
    }

    #[test]
    fn test_invalid_compressed_uint() {
        let mut parser = Parser::new(&[0xE0, 0x00, 0x00, 0x00]);
        assert!(matches!(
            parser.read_compressed_uint(),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_read_string() {
        let data = [0x05, b'H', b'e', b'l', b'l', b'o', 0x00];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_string().unwrap(), "Hello");
        assert_eq!(parser.pos(), 6);
    }

    #[test]
    fn test_read_string_truncated() {
        let data = [0x05, b'H', b'e'];
        let mut parser = Parser::new(&data);
        assert!(matches!(
            parser.read_string(),
            Err(Error::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_read_string_invalid_utf8() {
        let data = [0x02, 0xC3, 0x28];
        let mut parser = Parser::new(&data);
        assert!(matches!(parser.read_string(), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_read_count_rejects_oversized() {
        // Claims 100 elements of at least 2 bytes with only 3 bytes left
        let data = [0x64, 0x00, 0x00, 0x00];
        let mut parser = Parser::new(&data);
        assert!(matches!(parser.read_count(2), Err(Error::Malformed { .. })));
    }

    #[test]
    fn test_optional_string_and_bool() {
        let data = [0x00, 0x01, 0x02, b'o', b'k', 0x01, 0x07];
        let mut parser = Parser::new(&data);
        assert_eq!(parser.read_optional_string().unwrap(), None);
        assert_eq!(parser.read_optional_string().unwrap().as_deref(), Some("ok"));
        assert!(parser.read_bool().unwrap());
        assert!(matches!(parser.read_bool(), Err(Error::Malformed { .. })));
    }
}

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

//! Fixed-width scalar conversion used by the image [`crate::file::parser::Parser`] and
//! [`crate::file::writer::Writer`].
//!
//! Module images store every fixed-width scalar in little-endian order. The [`ImageIO`] trait
//! gives the parser and writer a single generic entry point for all primitive widths.

use crate::Result;

/// Conversion between a primitive scalar and its little-endian byte representation.
///
/// Implemented for all integer widths and both float widths. The associated `Bytes` type is the
/// fixed-size array matching the scalar's width, so reads never allocate.
pub trait ImageIO: Sized + Copy {
    /// Associated type representing the byte array type for this numeric type.
    type Bytes: Sized + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Read T from a byte buffer in little-endian
    fn from_le_bytes(bytes: Self::Bytes) -> Self;

    /// Write T to a byte buffer in little-endian
    fn to_le_bytes(self) -> Self::Bytes;
}

macro_rules! impl_image_io {
    ($($ty:ty => $len:expr),* $(,)?) => {
        $(
            impl ImageIO for $ty {
                type Bytes = [u8; $len];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }

                fn to_le_bytes(self) -> Self::Bytes {
                    <$ty>::to_le_bytes(self)
                }
            }
        )*
    };
}

impl_image_io! {
    u8 => 1,
    i8 => 1,
    u16 => 2,
    i16 => 2,
    u32 => 4,
    i32 => 4,
    u64 => 8,
    i64 => 8,
    f32 => 4,
    f64 => 8,
}

/// Safely reads a value of type `T` in little-endian byte order from a data buffer.
///
/// The offset is advanced past the value on success and left untouched on failure.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if there are insufficient bytes in the buffer.
pub fn read_le_at<T: ImageIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(out_of_bounds_error!());
    };
    if end > data.len() {
        return Err(out_of_bounds_error!());
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(out_of_bounds_error!());
    };

    *offset = end;
    Ok(T::from_le_bytes(read))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn read_le_u32() {
        let data = [0x01, 0x02, 0x03, 0x04, 0xFF];
        let mut offset = 0;
        let value: u32 = read_le_at(&data, &mut offset).unwrap();
        assert_eq!(value, 0x0403_0201);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_le_floats() {
        let bytes = 1.5f64.to_le_bytes();
        let mut offset = 0;
        let value: f64 = read_le_at(&bytes, &mut offset).unwrap();
        assert_eq!(value, 1.5);
    }

    #[test]
    fn read_past_end_leaves_offset() {
        let data = [0x01, 0x02];
        let mut offset = 1;
        let result: Result<u16> = read_le_at(&data, &mut offset);
        assert!(matches!(result, Err(Error::OutOfBounds { .. })));
        assert_eq!(offset, 1);
    }
}

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

//! Symbol tokens.
//!
//! Every declaration a [`crate::LoadContext`] can hand out is addressed by a [`Token`] that is
//! stable for the lifetime of its module. Tokens follow the ECMA-335 layout: the high byte names
//! the table ([`TableId`]) and the low 24 bits hold a 1-based row within that table.
//!
//! Rows are assigned by flattening the module's declarations in order:
//!
//! - `Module` has a single row addressing the module's own attributes
//! - `TypeDef` rows number the module's types in declaration order
//! - `Field` and `Property` rows run across all types, each type owning a contiguous range
//! - `MethodDef` rows run across all types; inside a type's range the property accessors come
//!   first (getter then setter, per property), then declared methods, then constructors
//!
//! # Examples
//!
//! ```rust
//! use metascope::metadata::token::{TableId, Token};
//!
//! let token = Token::from_parts(TableId::TypeDef, 3);
//! assert_eq!(token.value(), 0x0200_0003);
//! assert_eq!(token.table_id(), Some(TableId::TypeDef));
//! assert_eq!(token.row(), 3);
//! ```

use std::fmt;

use strum::{Display, EnumIter, FromRepr};

/// Metadata tables a [`Token`] can point into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, FromRepr)]
#[repr(u8)]
pub enum TableId {
    /// The module itself, row 1 is the only row
    Module = 0x00,
    /// Declared types
    TypeDef = 0x02,
    /// Declared fields
    Field = 0x04,
    /// Declared methods, property accessors and constructors
    MethodDef = 0x06,
    /// Declared properties
    Property = 0x17,
}

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Largest row index a token can carry.
    pub const MAX_ROW: u32 = 0x00FF_FFFF;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table and a 1-based row. The row is truncated to 24 bits.
    #[must_use]
    pub fn from_parts(table: TableId, row: u32) -> Self {
        Token((u32::from(table as u8) << 24) | (row & Self::MAX_ROW))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// The table as a [`TableId`], or `None` if the high byte names no known table.
    #[must_use]
    pub fn table_id(&self) -> Option<TableId> {
        TableId::from_repr(self.table())
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & Self::MAX_ROW
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if the token points into `table` with a non-zero row.
    #[must_use]
    pub fn is_table(&self, table: TableId) -> bool {
        self.table() == table as u8 && self.row() != 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use strum::IntoEnumIterator;

    #[test]
    fn test_token_parts() {
        let token = Token::from_parts(TableId::MethodDef, 1);
        assert_eq!(token.value(), 0x0600_0001);
        assert_eq!(token.table(), 0x06);
        assert_eq!(token.row(), 1);
        assert!(token.is_table(TableId::MethodDef));
        assert!(!token.is_table(TableId::Field));
    }

    #[test]
    fn test_token_row_truncated() {
        let token = Token::from_parts(TableId::Field, 0x0100_0002);
        assert_eq!(token.table_id(), Some(TableId::Field));
        assert_eq!(token.row(), 2);
    }

    #[test]
    fn test_table_id_round_trip() {
        for table in TableId::iter() {
            let token = Token::from_parts(table, 7);
            assert_eq!(token.table_id(), Some(table));
        }
        assert_eq!(Token(0x0A00_0001).table_id(), None);
    }

    #[test]
    fn test_token_is_null() {
        assert!(Token(0).is_null());
        assert!(!Token::from_parts(TableId::TypeDef, 1).is_null());
        assert!(!Token::from_parts(TableId::TypeDef, 0).is_table(TableId::TypeDef));
    }

    #[test]
    fn test_token_from_conversion() {
        let value = 0x0600_0001u32;
        let token: Token = value.into();
        assert_eq!(token.value(), value);

        let back_to_u32: u32 = token.into();
        assert_eq!(back_to_u32, value);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(format!("{}", Token(0x0600_0001)), "0x06000001");
        assert_eq!(TableId::Property.to_string(), "Property");
    }

    #[test]
    fn test_token_debug() {
        let debug_str = format!("{:?}", Token(0x0600_0001));
        assert!(debug_str.contains("Token(0x06000001"));
        assert!(debug_str.contains("table: 0x06"));
        assert!(debug_str.contains("row: 1"));
    }

    #[test]
    fn test_token_ordering() {
        let token1 = Token(0x0600_0001);
        let token2 = Token(0x0600_0002);
        let token3 = Token(0x0700_0001);

        assert!(token1 < token2);
        assert!(token2 < token3);
    }

    #[test]
    fn test_token_hash() {
        let mut map = HashMap::new();
        map.insert(Token(0x0600_0001), "Method1");
        map.insert(Token(0x0600_0002), "Method2");

        assert_eq!(map.get(&Token(0x0600_0001)), Some(&"Method1"));
        assert_eq!(map.get(&Token(0x0600_0002)), Some(&"Method2"));
    }
}

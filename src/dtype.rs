//! Dtype descriptor codes.
//!
//! The `descr` value of an `.npy` header is a short ASCII code such as
//! `<f8`: one byte-order character, one type-family character, and a decimal
//! element width in bytes. This module parses those codes into a
//! [`TypeDescriptor`] and renders them back.
//!
//! Endianness and element type are kept as independent fields rather than
//! folding the byte order into every multi-byte variant; the two models are
//! semantically equivalent and this one avoids an optional field on every
//! variant.
//!
//! ## Examples
//!
//! ```rust
//! use npy_header::{ElementType, Endianness, TypeDescriptor};
//!
//! let descr = TypeDescriptor::parse("<f8").unwrap();
//! assert_eq!(descr.endianness, Endianness::Little);
//! assert_eq!(descr.element_type, ElementType::Float64);
//! assert_eq!(descr.element_type.size_bytes(), 8);
//! assert_eq!(descr.code(), "<f8");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DescrError;

/// Byte order of a multi-byte element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endianness {
    /// `<`
    Little,
    /// `>`
    Big,
    /// `=`: the platform's native order, requested explicitly.
    Native,
    /// `|`: single-byte and boolean types, where byte order is
    /// meaningless.
    NotApplicable,
}

/// The closed set of fixed-width element types this crate understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
    Float128,
    Complex64,
    Complex128,
}

impl ElementType {
    /// Size of one element in bytes; a fixed constant per variant.
    #[must_use]
    pub const fn size_bytes(&self) -> usize {
        match self {
            ElementType::Bool | ElementType::Int8 | ElementType::UInt8 => 1,
            ElementType::Int16 | ElementType::UInt16 => 2,
            ElementType::Int32 | ElementType::UInt32 | ElementType::Float32 => 4,
            ElementType::Int64
            | ElementType::UInt64
            | ElementType::Float64
            | ElementType::Complex64 => 8,
            ElementType::Float128 | ElementType::Complex128 => 16,
        }
    }
}

/// A parsed dtype code: element type plus byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    pub endianness: Endianness,
    pub element_type: ElementType,
}

impl TypeDescriptor {
    /// Parses a dtype code string such as `<f8` or `|b1`.
    ///
    /// The first byte selects endianness (`<`, `>`, `=`, `|`), the second
    /// the type family (`b`, `i`, `u`, `f`, `c`), and the remainder the
    /// element width in bytes. Single-byte widths demand `|`; multi-byte
    /// widths forbid it; a violation on either side is
    /// [`DescrError::InvalidEndianness`]. A family or width outside the
    /// supported set is [`DescrError::InvalidType`].
    ///
    /// # Errors
    ///
    /// Returns a [`DescrError`] for any code outside the supported
    /// fixed-width numeric/boolean/complex grammar.
    pub fn parse(code: &str) -> Result<Self, DescrError> {
        let bytes = code.as_bytes();
        if bytes.len() < 3 {
            return Err(DescrError::TooShort);
        }

        let endianness = match bytes[0] {
            b'<' => Endianness::Little,
            b'>' => Endianness::Big,
            b'=' => Endianness::Native,
            b'|' => Endianness::NotApplicable,
            _ => return Err(DescrError::InvalidEndianness(code.to_string())),
        };
        let family = bytes[1];
        // Version-3 headers admit multi-byte UTF-8 in string literals, so
        // byte index 2 is not guaranteed to be a char boundary. A
        // non-boundary index means the family byte starts a multi-byte
        // character, which no supported family does.
        let width = code
            .get(2..)
            .ok_or_else(|| DescrError::InvalidType(code.to_string()))?;

        let element_type = match family {
            b'b' => {
                if endianness != Endianness::NotApplicable {
                    return Err(DescrError::InvalidEndianness(code.to_string()));
                }
                if width != "1" {
                    return Err(DescrError::InvalidType(code.to_string()));
                }
                ElementType::Bool
            }
            b'i' | b'u' => {
                let signed = family == b'i';
                let element_type = match width {
                    "1" if signed => ElementType::Int8,
                    "2" if signed => ElementType::Int16,
                    "4" if signed => ElementType::Int32,
                    "8" if signed => ElementType::Int64,
                    "1" => ElementType::UInt8,
                    "2" => ElementType::UInt16,
                    "4" => ElementType::UInt32,
                    "8" => ElementType::UInt64,
                    _ => return Err(DescrError::InvalidType(code.to_string())),
                };
                // Width 1 demands '|'; wider demands a real byte order.
                let needs_order = width != "1";
                if needs_order == (endianness == Endianness::NotApplicable) {
                    return Err(DescrError::InvalidEndianness(code.to_string()));
                }
                element_type
            }
            b'f' => {
                if endianness == Endianness::NotApplicable {
                    return Err(DescrError::InvalidEndianness(code.to_string()));
                }
                match width {
                    "4" => ElementType::Float32,
                    "8" => ElementType::Float64,
                    "16" => ElementType::Float128,
                    _ => return Err(DescrError::InvalidType(code.to_string())),
                }
            }
            b'c' => {
                if endianness == Endianness::NotApplicable {
                    return Err(DescrError::InvalidEndianness(code.to_string()));
                }
                match width {
                    "8" => ElementType::Complex64,
                    "16" => ElementType::Complex128,
                    _ => return Err(DescrError::InvalidType(code.to_string())),
                }
            }
            _ => return Err(DescrError::InvalidType(code.to_string())),
        };

        Ok(TypeDescriptor {
            endianness,
            element_type,
        })
    }

    /// Renders the canonical code string for this descriptor.
    ///
    /// For every descriptor obtained from [`TypeDescriptor::parse`],
    /// `parse(&descr.code())` yields the descriptor back. A descriptor
    /// constructed by hand with an endianness/width pairing the grammar
    /// forbids (say `Little` + `Bool`) renders a code that will not parse.
    #[must_use]
    pub fn code(&self) -> String {
        let order = match self.endianness {
            Endianness::Little => '<',
            Endianness::Big => '>',
            Endianness::Native => '=',
            Endianness::NotApplicable => '|',
        };
        let (family, width) = match self.element_type {
            ElementType::Bool => ('b', 1),
            ElementType::Int8 => ('i', 1),
            ElementType::Int16 => ('i', 2),
            ElementType::Int32 => ('i', 4),
            ElementType::Int64 => ('i', 8),
            ElementType::UInt8 => ('u', 1),
            ElementType::UInt16 => ('u', 2),
            ElementType::UInt32 => ('u', 4),
            ElementType::UInt64 => ('u', 8),
            ElementType::Float32 => ('f', 4),
            ElementType::Float64 => ('f', 8),
            ElementType::Float128 => ('f', 16),
            ElementType::Complex64 => ('c', 8),
            ElementType::Complex128 => ('c', 16),
        };
        format!("{}{}{}", order, family, width)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_codes_round_trip() {
        let codes = [
            "|b1", "|i1", "<i2", "<i4", "<i8", "|u1", ">u2", ">u4", ">u8", "<f4", "<f8", "=f16",
            "<c8", ">c16", "=i4",
        ];
        for code in codes {
            let descr = TypeDescriptor::parse(code).unwrap();
            assert_eq!(descr.code(), code, "round-trip failed for {}", code);
        }
    }

    #[test]
    fn element_sizes() {
        assert_eq!(TypeDescriptor::parse("|b1").unwrap().element_type.size_bytes(), 1);
        assert_eq!(TypeDescriptor::parse("<i2").unwrap().element_type.size_bytes(), 2);
        assert_eq!(TypeDescriptor::parse("<f8").unwrap().element_type.size_bytes(), 8);
        assert_eq!(TypeDescriptor::parse("<c8").unwrap().element_type.size_bytes(), 8);
        assert_eq!(TypeDescriptor::parse(">c16").unwrap().element_type.size_bytes(), 16);
    }

    #[test]
    fn too_short() {
        assert_eq!(TypeDescriptor::parse(""), Err(DescrError::TooShort));
        assert_eq!(TypeDescriptor::parse("<f"), Err(DescrError::TooShort));
    }

    #[test]
    fn unknown_order_character() {
        assert!(matches!(
            TypeDescriptor::parse("?f8"),
            Err(DescrError::InvalidEndianness(_))
        ));
    }

    #[test]
    fn unknown_family() {
        assert!(matches!(
            TypeDescriptor::parse("<x8"),
            Err(DescrError::InvalidType(_))
        ));
    }

    #[test]
    fn bool_pairing() {
        assert!(matches!(
            TypeDescriptor::parse("<b1"),
            Err(DescrError::InvalidEndianness(_))
        ));
        assert!(matches!(
            TypeDescriptor::parse("|b2"),
            Err(DescrError::InvalidType(_))
        ));
    }

    #[test]
    fn integer_pairing_fails_from_either_side() {
        // Single-byte width with a real byte order.
        assert!(matches!(
            TypeDescriptor::parse("<i1"),
            Err(DescrError::InvalidEndianness(_))
        ));
        assert!(matches!(
            TypeDescriptor::parse("=u1"),
            Err(DescrError::InvalidEndianness(_))
        ));
        // Multi-byte width with '|'.
        assert!(matches!(
            TypeDescriptor::parse("|i4"),
            Err(DescrError::InvalidEndianness(_))
        ));
        // Width outside {1, 2, 4, 8}.
        assert!(matches!(
            TypeDescriptor::parse("<i3"),
            Err(DescrError::InvalidType(_))
        ));
    }

    #[test]
    fn float_and_complex_reject_not_applicable() {
        assert!(matches!(
            TypeDescriptor::parse("|f8"),
            Err(DescrError::InvalidEndianness(_))
        ));
        assert!(matches!(
            TypeDescriptor::parse("|c16"),
            Err(DescrError::InvalidEndianness(_))
        ));
    }

    #[test]
    fn multibyte_utf8_never_panics() {
        // 'é' spans bytes 1..3, putting byte index 2 inside a character.
        assert!(matches!(
            TypeDescriptor::parse("<é8"),
            Err(DescrError::InvalidType(_))
        ));
        // Multi-byte order character: caught as endianness, not a slice.
        assert!(matches!(
            TypeDescriptor::parse("é8x"),
            Err(DescrError::InvalidEndianness(_))
        ));
        // Multi-byte width on a valid family.
        assert!(matches!(
            TypeDescriptor::parse("<f€"),
            Err(DescrError::InvalidType(_))
        ));
    }

    #[test]
    fn unsupported_widths() {
        assert!(matches!(
            TypeDescriptor::parse("<f2"),
            Err(DescrError::InvalidType(_))
        ));
        assert!(matches!(
            TypeDescriptor::parse("<c24"),
            Err(DescrError::InvalidType(_))
        ));
        assert!(matches!(
            TypeDescriptor::parse("<c32"),
            Err(DescrError::InvalidType(_))
        ));
    }
}

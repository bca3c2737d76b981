//! Binary framing and header assembly.
//!
//! An `.npy` file begins with a fixed preamble:
//!
//! | Offset | Size   | Meaning                                          |
//! |--------|--------|--------------------------------------------------|
//! | 0      | 6      | Magic bytes `\x93NUMPY`                          |
//! | 6      | 1      | Major version (1, 2, or 3)                       |
//! | 7      | 1      | Minor version (must be 0)                        |
//! | 8      | 2 or 4 | Header text length, little-endian unsigned       |
//! | 8+w    | length | Header text, ending with `\n`                    |
//!
//! Major version 1 uses a 2-byte length field; 2 and 3 use 4 bytes.
//! Versions 1 and 2 declare the text ASCII, version 3 UTF-8. The text is
//! right-padded with spaces before its trailing newline so the array data
//! starts at an aligned offset.
//!
//! [`Header::from_reader`] walks this framing, hands the trimmed text to
//! the grammar parser, and extracts the three required keys from the
//! resulting tree. [`Header::to_vec`] goes the other way, emitting a
//! complete 64-byte-aligned preamble.

use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

use crate::dtype::{ElementType, Endianness, TypeDescriptor};
use crate::error::{DescrError, Error, Result};
use crate::lexer::{Encoding, Literal};
use crate::parser::{parse, Ast};

/// The six-byte signature every `.npy` file starts with.
pub const MAGIC: [u8; 6] = *b"\x93NUMPY";

/// Memory layout of the stored array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Row-major (`fortran_order: False`).
    C,
    /// Column-major (`fortran_order: True`).
    F,
}

/// Format version, dispatching length-field width and text encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Version {
    V1,
    V2,
    V3,
}

impl Version {
    fn from_bytes(major: u8, minor: u8) -> Result<Self> {
        match (major, minor) {
            (1, 0) => Ok(Version::V1),
            (2, 0) => Ok(Version::V2),
            (3, 0) => Ok(Version::V3),
            _ => Err(Error::UnsupportedVersion { major, minor }),
        }
    }

    fn encoding(self) -> Encoding {
        match self {
            Version::V1 | Version::V2 => Encoding::Ascii,
            Version::V3 => Encoding::Utf8,
        }
    }
}

/// The parsed metadata record describing an array stored in a `.npy` file.
///
/// Constructed once per file and immutable thereafter. The array engine
/// needs nothing else from the file header: element type plus byte order,
/// the shape, and the memory order.
///
/// # Examples
///
/// ```rust
/// use npy_header::{from_slice, ElementType, Endianness, Order};
///
/// let bytes = b"\x93NUMPY\x01\x00\x3c\x00\
///     {'descr': '<i4', 'fortran_order': False, 'shape': (2, 3), }\n";
/// let header = from_slice(bytes).unwrap();
/// assert_eq!(header.shape, vec![2, 3]);
/// assert_eq!(header.element_type, ElementType::Int32);
/// assert_eq!(header.endianness, Endianness::Little);
/// assert_eq!(header.order, Order::C);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// Extent of each dimension. Empty means a scalar (rank 0).
    pub shape: Vec<usize>,
    pub element_type: ElementType,
    pub endianness: Endianness,
    pub order: Order,
}

impl Header {
    /// Reads and parses a complete header from the start of a reader.
    ///
    /// On success the reader is positioned at the first byte of array
    /// data. The only blocking work is the raw byte reads; everything
    /// after that is pure computation over the buffered text.
    ///
    /// # Errors
    ///
    /// Framing problems (bad magic, unknown version, short reads, missing
    /// trailing newline) and semantic problems (missing or ill-typed
    /// keys, unsupported dtype) each get their own [`Error`] variant;
    /// every lexer/parser failure surfaces as
    /// [`Error::InvalidHeaderFormat`].
    pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self> {
        let mut preamble = [0u8; 8];
        reader.read_exact(&mut preamble)?;
        if preamble[..6] != MAGIC {
            return Err(Error::MagicMismatch);
        }
        let version = Version::from_bytes(preamble[6], preamble[7])?;

        let declared = match version {
            Version::V1 => {
                let mut field = [0u8; 2];
                reader.read_exact(&mut field)?;
                u64::from(u16::from_le_bytes(field))
            }
            Version::V2 | Version::V3 => {
                let mut field = [0u8; 4];
                reader.read_exact(&mut field)?;
                u64::from(u32::from_le_bytes(field))
            }
        };
        let length =
            usize::try_from(declared).map_err(|_| Error::HeaderSizeOverflow(declared))?;

        let mut text = vec![0u8; length];
        reader.read_exact(&mut text)?;

        Self::from_text(&text, version.encoding())
    }

    /// Parses the header text region (already stripped of the framing).
    fn from_text(text: &[u8], encoding: Encoding) -> Result<Self> {
        let mut end = match text.last() {
            Some(b'\n') => text.len() - 1,
            _ => return Err(Error::MissingNewline),
        };
        // The format right-pads with spaces before the newline for
        // alignment.
        while end > 0 && text[end - 1] == b' ' {
            end -= 1;
        }

        let ast = parse(&text[..end], encoding).map_err(Error::InvalidHeaderFormat)?;
        let entries = match ast {
            Ast::Map(entries) => entries,
            _ => return Err(Error::ExpectedDict),
        };

        let descriptor = match entries.get("descr") {
            Some(Ast::Literal(Literal::Str(code))) => {
                TypeDescriptor::parse(code).map_err(|e| match e {
                    DescrError::InvalidType(code) => Error::UnsupportedType(code),
                    other => Error::invalid_value("descr", other.to_string()),
                })?
            }
            Some(other) => {
                return Err(Error::invalid_value(
                    "descr",
                    format!("expected string literal, found {}", describe(other)),
                ))
            }
            None => return Err(Error::MissingKey("descr")),
        };

        let order = match entries.get("fortran_order") {
            Some(Ast::Literal(Literal::Bool(true))) => Order::F,
            Some(Ast::Literal(Literal::Bool(false))) => Order::C,
            Some(other) => {
                return Err(Error::invalid_value(
                    "fortran_order",
                    format!("expected boolean literal, found {}", describe(other)),
                ))
            }
            None => return Err(Error::MissingKey("fortran_order")),
        };

        let shape = match entries.get("shape") {
            Some(Ast::Tuple(dims)) => dims.clone(),
            Some(other) => {
                return Err(Error::invalid_value(
                    "shape",
                    format!("expected tuple, found {}", describe(other)),
                ))
            }
            None => return Err(Error::MissingKey("shape")),
        };

        // Unrecognized keys are accepted and ignored; the AST (and the
        // borrowed header text) can be dropped now that shape is copied
        // out.
        Ok(Header {
            shape,
            element_type: descriptor.element_type,
            endianness: descriptor.endianness,
            order,
        })
    }

    /// The array rank; zero denotes a scalar.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Whether the header describes a rank-0 (scalar) array.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        self.shape.is_empty()
    }

    /// Size of one element in bytes.
    #[must_use]
    pub fn element_size(&self) -> usize {
        self.element_type.size_bytes()
    }

    /// Total number of elements, or `None` if the product overflows.
    ///
    /// A scalar has one element; any zero extent makes the whole array
    /// empty.
    #[must_use]
    pub fn num_elements(&self) -> Option<usize> {
        self.shape
            .iter()
            .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
    }

    /// The dtype descriptor for this header.
    #[must_use]
    pub fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor {
            endianness: self.endianness,
            element_type: self.element_type,
        }
    }

    /// Renders the complete framed preamble for this header.
    ///
    /// The dict text is padded with spaces so the total preamble length is
    /// a multiple of 64, and ends with a newline. Version 1 is emitted
    /// when the padded text fits its 2-byte length field, version 2
    /// otherwise (the rendered dict is always ASCII, so version 3 is never
    /// needed). Array data is the caller's business; rendering stops at
    /// the end of the preamble.
    ///
    /// A header whose descriptor is canonically representable round-trips:
    /// parsing the rendered bytes yields an equal `Header`.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        let dims = self
            .shape
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        let shape = match dims.as_slice() {
            [] => String::new(),
            [dim] => format!("{},", dim),
            _ => dims.join(", "),
        };
        let dict = format!(
            "{{'descr': '{}', 'fortran_order': {}, 'shape': ({}), }}",
            self.descriptor().code(),
            match self.order {
                Order::F => "True",
                Order::C => "False",
            },
            shape,
        );

        // Pad so the full preamble is 64-byte aligned, newline included.
        let pad_to = |prefix: usize| {
            let unpadded = prefix + dict.len() + 1;
            (64 - unpadded % 64) % 64
        };
        let v1_padding = pad_to(10);
        let v1_text_len = dict.len() + v1_padding + 1;

        let mut out = Vec::with_capacity(12 + dict.len() + 64);
        out.extend_from_slice(&MAGIC);
        let padding = if v1_text_len <= usize::from(u16::MAX) {
            out.extend_from_slice(&[1, 0]);
            out.extend_from_slice(&(v1_text_len as u16).to_le_bytes());
            v1_padding
        } else {
            let padding = pad_to(12);
            out.extend_from_slice(&[2, 0]);
            out.extend_from_slice(&((dict.len() + padding + 1) as u32).to_le_bytes());
            padding
        };
        out.extend_from_slice(dict.as_bytes());
        out.resize(out.len() + padding, b' ');
        out.push(b'\n');
        out
    }

    /// Writes the framed preamble to a writer. See [`Header::to_vec`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the writer fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_vec())?;
        Ok(())
    }
}

fn describe(node: &Ast<'_>) -> &'static str {
    match node {
        Ast::Map(_) => "dict",
        Ast::Tuple(_) => "tuple",
        Ast::Literal(Literal::Str(_)) => "string literal",
        Ast::Literal(Literal::Number(_)) => "number literal",
        Ast::Literal(Literal::Bool(_)) => "boolean literal",
    }
}

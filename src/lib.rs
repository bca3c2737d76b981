//! # npy_header
//!
//! A parser and renderer for the header of the NumPy [`.npy`] binary array
//! format.
//!
//! ## What is an .npy header?
//!
//! Every `.npy` file starts with a length-prefixed, versioned preamble
//! followed by a Python-dict-shaped text describing the stored array:
//!
//! ```text
//! \x93NUMPY \x01 \x00 \x3c\x00 {'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), }\n
//! ```
//!
//! This crate parses that preamble byte-exactly (magic, version, length
//! field) and then runs the dict text through a real little pipeline: a
//! lexer with one-token lookahead, a recursive-descent parser producing a
//! borrowed AST, a dtype-descriptor micro-parser, and a semantic extractor
//! yielding an immutable [`Header`]. Array *data* is out of scope: the
//! output contract is exactly what an array engine needs to interpret the
//! bytes that follow (element type, byte order, shape, memory order).
//!
//! ## Key Features
//!
//! - **Byte-exact framing**: format versions 1.0, 2.0, and 3.0, with the
//!   2- vs 4-byte length field and ASCII vs UTF-8 encoding each implies
//! - **Typed errors**: malformed input never panics; every failure mode
//!   has its own [`Error`] variant, layered so parser internals never leak
//! - **Zero-copy text handling**: string payloads in the AST borrow from
//!   the header buffer
//! - **Round-trip rendering**: [`Header::to_vec`] emits a complete,
//!   64-byte-aligned preamble that parses back to an equal header
//! - **No Unsafe Code**: written entirely in safe Rust
//!
//! ## Quick Start
//!
//! ```rust
//! use std::io::Cursor;
//! use npy_header::{from_reader, ElementType, Endianness, Order};
//!
//! let file = b"\x93NUMPY\x01\x00\x3c\x00\
//!     {'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), }\n";
//! let mut reader = Cursor::new(&file[..]);
//!
//! let header = from_reader(&mut reader).unwrap();
//! assert_eq!(header.shape, vec![3, 4]);
//! assert_eq!(header.element_type, ElementType::Float64);
//! assert_eq!(header.endianness, Endianness::Little);
//! assert_eq!(header.order, Order::C);
//! // The reader now sits at the first data byte.
//! ```
//!
//! ## Writing a header
//!
//! ```rust
//! use npy_header::{from_slice, ElementType, Endianness, Header, Order};
//!
//! let header = Header {
//!     shape: vec![2, 3],
//!     element_type: ElementType::Int32,
//!     endianness: Endianness::Little,
//!     order: Order::C,
//! };
//! let bytes = npy_header::to_vec(&header);
//! assert_eq!(bytes.len() % 64, 0);
//! assert_eq!(from_slice(&bytes).unwrap(), header);
//! ```
//!
//! ## Error Layering
//!
//! Each pipeline stage maps its failures into the vocabulary of the stage
//! above. Lexical and grammatical problems collapse into
//! [`Error::InvalidHeaderFormat`] (with the cause retained as
//! [`std::error::Error::source`]); dtype problems split into
//! [`Error::UnsupportedType`] ("understood but can't support") versus
//! [`Error::InvalidValue`] ("the file is corrupt") so callers can react
//! differently.
//!
//! ## Performance Characteristics
//!
//! - **Parsing**: single pass, O(n) in the header text length
//! - **Memory**: the AST borrows string payloads; only map/tuple storage
//!   and the output `shape` allocate
//! - **Concurrency**: no shared state; the pipeline is synchronous and
//!   pure once the text is buffered
//!
//! [`.npy`]: https://numpy.org/doc/stable/reference/generated/numpy.lib.format.html

pub mod dtype;
pub mod error;
pub mod header;
pub mod lexer;
pub mod parser;

pub use dtype::{ElementType, Endianness, TypeDescriptor};
pub use error::{DescrError, Error, Result, SyntaxError};
pub use header::{Header, Order, MAGIC};
pub use lexer::{Encoding, Lexer, Literal, Token};
pub use parser::{parse, Ast};

use std::io::{Read, Write};

/// Reads and parses a `.npy` header from the start of a reader.
///
/// On success the reader is left positioned at the first byte of array
/// data.
///
/// # Examples
///
/// ```rust
/// use std::io::Cursor;
/// use npy_header::from_reader;
///
/// let file = b"\x93NUMPY\x01\x00\x3c\x00\
///     {'descr': '|u1', 'fortran_order': False, 'shape': (128,), }\n";
/// let header = from_reader(&mut Cursor::new(&file[..])).unwrap();
/// assert_eq!(header.shape, vec![128]);
/// ```
///
/// # Errors
///
/// Returns an [`Error`] describing the first framing, syntactic, or
/// semantic problem encountered.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R: Read>(reader: &mut R) -> Result<Header> {
    Header::from_reader(reader)
}

/// Parses a `.npy` header from an in-memory byte slice.
///
/// The slice must start at the magic bytes; trailing bytes after the
/// header text (i.e. array data) are ignored.
///
/// # Errors
///
/// Returns an [`Error`]; a slice shorter than the framing declares is an
/// [`Error::Io`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_slice(bytes: &[u8]) -> Result<Header> {
    let mut reader = bytes;
    Header::from_reader(&mut reader)
}

/// Renders the complete framed preamble for a header.
///
/// See [`Header::to_vec`].
#[must_use]
pub fn to_vec(header: &Header) -> Vec<u8> {
    header.to_vec()
}

/// Writes the complete framed preamble for a header to a writer.
///
/// # Errors
///
/// Returns [`Error::Io`] if the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W: Write>(writer: &mut W, header: &Header) -> Result<()> {
    header.write_to(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_ignores_trailing_data() {
        let header = Header {
            shape: vec![4],
            element_type: ElementType::UInt16,
            endianness: Endianness::Little,
            order: Order::C,
        };
        let mut bytes = to_vec(&header);
        bytes.extend_from_slice(&[0u8; 8]); // fake array data
        assert_eq!(from_slice(&bytes).unwrap(), header);
    }

    #[test]
    fn to_writer_matches_to_vec() {
        let header = Header {
            shape: vec![2, 2],
            element_type: ElementType::Complex64,
            endianness: Endianness::Big,
            order: Order::F,
        };
        let mut written = Vec::new();
        to_writer(&mut written, &header).unwrap();
        assert_eq!(written, to_vec(&header));
    }
}

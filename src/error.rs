//! Error types for `.npy` header parsing.
//!
//! The crate reports failures in three layers, mirroring the parsing
//! pipeline:
//!
//! - [`SyntaxError`]: lexical and grammatical problems inside the header
//!   text itself (bad bytes, unterminated strings, misplaced tokens).
//! - [`DescrError`]: problems with the dtype code string (`descr` value).
//! - [`Error`]: everything the caller sees: binary framing failures,
//!   semantic failures, and the two lower layers folded into single
//!   variants so the internal vocabulary never leaks into the public
//!   contract.
//!
//! Every error is a deterministic function of the input bytes; nothing here
//! is transient or worth retrying.
//!
//! ## Examples
//!
//! ```rust
//! use npy_header::{from_slice, Error};
//!
//! let result = from_slice(b"not an npy file at all");
//! assert!(matches!(result, Err(Error::MagicMismatch)));
//! ```

use thiserror::Error;

/// Top-level error for reading and assembling a `.npy` header.
///
/// Lexer and grammar failures are collapsed into
/// [`Error::InvalidHeaderFormat`]; the specific cause stays reachable
/// through [`std::error::Error::source`] for diagnostics but is not part of
/// the public contract.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O failure while reading the preamble or header text.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The first six bytes are not the `\x93NUMPY` magic.
    #[error("magic mismatch: not an npy file")]
    MagicMismatch,

    /// Version pair outside the supported set (1.0, 2.0, 3.0).
    #[error("unsupported npy format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// The declared header length does not fit in `usize`.
    #[error("header length {0} overflows the platform size type")]
    HeaderSizeOverflow(u64),

    /// The header text does not end with a newline.
    #[error("header text is missing the trailing newline")]
    MissingNewline,

    /// The header text failed to lex or parse.
    #[error("invalid header format")]
    InvalidHeaderFormat(#[source] SyntaxError),

    /// The header text parsed, but its top-level value is not a dict.
    #[error("expected the header to be a dict")]
    ExpectedDict,

    /// A required key (`descr`, `fortran_order`, or `shape`) is absent.
    #[error("missing required header key '{0}'")]
    MissingKey(&'static str),

    /// A required key is present but holds the wrong kind of value.
    #[error("invalid value for header key '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },

    /// The `descr` string names a dtype this crate does not support.
    #[error("unsupported dtype '{0}'")]
    UnsupportedType(String),
}

impl Error {
    pub(crate) fn invalid_value(key: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidValue {
            key,
            reason: reason.into(),
        }
    }
}

/// Lexical or grammatical error inside the header text.
///
/// Offsets are byte positions into the trimmed header text. Token
/// descriptions are short human-readable names like `'}'` or
/// `string literal`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// A byte that can never start a token, or a non-ASCII byte outside a
    /// string literal.
    #[error("invalid byte 0x{byte:02x} at offset {offset}")]
    InvalidByte { byte: u8, offset: usize },

    /// Malformed UTF-8 (including overlong encodings) inside a string
    /// literal, with the header declaring UTF-8 encoding.
    #[error("malformed UTF-8 in string literal at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// Input ended before the closing quote of a string literal.
    #[error("unterminated string literal starting at offset {offset}")]
    UnterminatedString { offset: usize },

    /// A decimal digit run whose value exceeds the platform word size.
    #[error("integer literal at offset {offset} overflows")]
    NumberOverflow { offset: usize },

    /// An identifier other than `True` or `False`.
    #[error("unsupported identifier '{ident}' at offset {offset}")]
    UnknownIdentifier { ident: String, offset: usize },

    /// A closing or separator token at the top level, where a value was
    /// expected.
    #[error("misplaced token {found}")]
    MisplacedToken { found: &'static str },

    /// A map body expected a string key and found something else.
    #[error("invalid map key: expected string literal, found {found}")]
    InvalidKey { found: &'static str },

    /// A map key was not followed by `:`.
    #[error("missing ':' after map key, found {found}")]
    MissingColon { found: &'static str },

    /// A map value was not a literal, tuple, or nested map.
    #[error("invalid map value: found {found}")]
    InvalidValue { found: &'static str },

    /// A map entry was not followed by `,` or `}`.
    #[error("missing ',' between map entries, found {found}")]
    MissingComma { found: &'static str },

    /// A tuple element that is not an unsigned integer literal.
    #[error("invalid tuple element: expected number, found {found}")]
    InvalidTupleElement { found: &'static str },

    /// A single-element tuple closed without the disambiguating comma, as
    /// in `(5)`.
    #[error("single-element tuple requires a trailing comma")]
    MissingTrailingComma,

    /// Tokens remained after a complete top-level literal.
    #[error("trailing {found} after top-level value")]
    TrailingTokens { found: &'static str },

    /// The header text contained no tokens at all.
    #[error("empty header text")]
    EmptyInput,
}

/// Error from the dtype descriptor micro-parser.
///
/// The header assembler maps [`DescrError::InvalidType`] to
/// [`Error::UnsupportedType`] ("we understood the request but cannot
/// support it") and the other variants to [`Error::InvalidValue`] ("the
/// file is corrupt").
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescrError {
    /// Descriptor strings are at least three bytes (`<f8`).
    #[error("descriptor too short")]
    TooShort,

    /// The byte-order character is unknown, or legal but paired with an
    /// element width that forbids it.
    #[error("invalid endianness in descriptor '{0}'")]
    InvalidEndianness(String),

    /// The type family or width is outside the supported fixed-width set.
    #[error("unsupported type in descriptor '{0}'")]
    InvalidType(String),
}

pub type Result<T> = std::result::Result<T, Error>;

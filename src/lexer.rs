//! Tokenizer for the `.npy` header text.
//!
//! The header text is a Python-dict-shaped literal such as
//! `{'descr': '<f8', 'fortran_order': False, 'shape': (3, 4), }`. The lexer
//! turns its bytes into [`Token`]s on demand with one token of lookahead
//! ([`Lexer::peek`] / [`Lexer::advance`]).
//!
//! Two encoding modes exist because format version 3 allows UTF-8 inside
//! string literals while versions 1 and 2 are strictly ASCII. No unescaping
//! is performed: string payloads are the raw bytes between the quotes,
//! borrowed from the input buffer.

use crate::error::SyntaxError;

/// Character encoding of the header text, selected by the format version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Versions 1.0 and 2.0: any byte ≥ 0x80 is invalid, even inside
    /// string literals.
    Ascii,
    /// Version 3.0: string literals may contain multi-byte UTF-8; overlong
    /// or truncated sequences are rejected. Outside string literals the
    /// grammar is still pure ASCII.
    Utf8,
}

/// A literal value appearing in the header text.
///
/// String payloads borrow from the input buffer; numbers and booleans are
/// copied by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal<'a> {
    /// Raw content between single quotes, not unescaped.
    Str(&'a str),
    /// A maximal decimal digit run. Values beyond `usize::MAX` are a
    /// lexical error, never silently truncated.
    Number(usize),
    /// The identifiers `True` and `False`, exactly.
    Bool(bool),
}

/// A single token of the header grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    LBrace,
    RBrace,
    Colon,
    Comma,
    LParen,
    RParen,
    Literal(Literal<'a>),
    /// End of input. Terminal and repeatable: scanning past it keeps
    /// yielding `Eof`.
    Eof,
}

impl Token<'_> {
    /// Short human-readable name used in error messages.
    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Token::LBrace => "'{'",
            Token::RBrace => "'}'",
            Token::Colon => "':'",
            Token::Comma => "','",
            Token::LParen => "'('",
            Token::RParen => "')'",
            Token::Literal(Literal::Str(_)) => "string literal",
            Token::Literal(Literal::Number(_)) => "number literal",
            Token::Literal(Literal::Bool(_)) => "boolean literal",
            Token::Eof => "end of input",
        }
    }
}

/// On-demand tokenizer with a single cached lookahead token.
pub struct Lexer<'a> {
    input: &'a [u8],
    position: usize,
    encoding: Encoding,
    peeked: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8], encoding: Encoding) -> Self {
        Lexer {
            input,
            position: 0,
            encoding,
            peeked: None,
        }
    }

    /// Returns the next token without consuming it.
    ///
    /// Repeated calls return the identical token.
    pub fn peek(&mut self) -> Result<Token<'a>, SyntaxError> {
        match self.peeked {
            Some(token) => Ok(token),
            None => {
                let token = self.scan()?;
                self.peeked = Some(token);
                Ok(token)
            }
        }
    }

    /// Returns and consumes the next token.
    pub fn advance(&mut self) -> Result<Token<'a>, SyntaxError> {
        match self.peeked.take() {
            Some(token) => Ok(token),
            None => self.scan(),
        }
    }

    fn current_byte(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.current_byte() {
            self.position += 1;
        }
    }

    fn scan(&mut self) -> Result<Token<'a>, SyntaxError> {
        self.skip_whitespace();

        let byte = match self.current_byte() {
            // Position stays put, so scanning past the end keeps
            // producing Eof.
            None => return Ok(Token::Eof),
            Some(byte) => byte,
        };

        match byte {
            b'{' => {
                self.position += 1;
                Ok(Token::LBrace)
            }
            b'}' => {
                self.position += 1;
                Ok(Token::RBrace)
            }
            b':' => {
                self.position += 1;
                Ok(Token::Colon)
            }
            b',' => {
                self.position += 1;
                Ok(Token::Comma)
            }
            b'(' => {
                self.position += 1;
                Ok(Token::LParen)
            }
            b')' => {
                self.position += 1;
                Ok(Token::RParen)
            }
            b'\'' => self.scan_string(),
            b'0'..=b'9' => self.scan_number(),
            b'A'..=b'Z' | b'a'..=b'z' | b'_' => self.scan_identifier(),
            _ => Err(SyntaxError::InvalidByte {
                byte,
                offset: self.position,
            }),
        }
    }

    fn scan_string(&mut self) -> Result<Token<'a>, SyntaxError> {
        let quote = self.position;
        let start = quote + 1;

        // A `'` byte can never occur inside a multi-byte UTF-8 sequence,
        // so a plain byte scan finds the terminator in both encodings.
        let len = match self.input[start..].iter().position(|&b| b == b'\'') {
            Some(len) => len,
            None => return Err(SyntaxError::UnterminatedString { offset: quote }),
        };
        let content = &self.input[start..start + len];

        if self.encoding == Encoding::Ascii {
            if let Some(i) = content.iter().position(|&b| b >= 0x80) {
                return Err(SyntaxError::InvalidByte {
                    byte: content[i],
                    offset: start + i,
                });
            }
        }
        let text = std::str::from_utf8(content).map_err(|e| SyntaxError::InvalidUtf8 {
            offset: start + e.valid_up_to(),
        })?;

        self.position = start + len + 1;
        Ok(Token::Literal(Literal::Str(text)))
    }

    fn scan_number(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.position;
        let mut value: usize = 0;

        while let Some(byte @ b'0'..=b'9') = self.current_byte() {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(usize::from(byte - b'0')))
                .ok_or(SyntaxError::NumberOverflow { offset: start })?;
            self.position += 1;
        }

        Ok(Token::Literal(Literal::Number(value)))
    }

    fn scan_identifier(&mut self) -> Result<Token<'a>, SyntaxError> {
        let start = self.position;
        while let Some(b'A'..=b'Z' | b'a'..=b'z' | b'_') = self.current_byte() {
            self.position += 1;
        }
        let ident = &self.input[start..self.position];

        match ident {
            b"True" => Ok(Token::Literal(Literal::Bool(true))),
            b"False" => Ok(Token::Literal(Literal::Bool(false))),
            _ => Err(SyntaxError::UnknownIdentifier {
                ident: String::from_utf8_lossy(ident).into_owned(),
                offset: start,
            }),
        }
    }
}

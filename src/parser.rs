//! Recursive-descent parser for the header text grammar.
//!
//! The grammar (whitespace elided):
//!
//! ```text
//! top      ::= map | tuple | literal
//! map      ::= "{" (pair ("," pair)* ","?)? "}"
//! pair     ::= string ":" (literal | tuple | map)
//! tuple    ::= "(" (number ("," number)* ","?)? ")"
//! literal  ::= string | number | boolean
//! ```
//!
//! A single-element tuple requires the trailing comma: `(5)` is a
//! parenthesized scalar in the source format and is rejected here, while
//! `(5,)` is a 1-tuple. The trailing comma is optional at every other
//! arity, including zero.
//!
//! Map and tuple bodies are driven by explicit state machines rather than
//! ad hoc flags so that every grammar branch is a reachable, testable
//! transition.

use indexmap::IndexMap;

use crate::error::SyntaxError;
use crate::lexer::{Encoding, Lexer, Literal, Token};

/// Parsed representation of the header text.
///
/// The tree is single-owner: each map or tuple exclusively owns its
/// children and frees them recursively on drop. String payloads stay
/// borrowed from the input buffer, which must outlive the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast<'a> {
    /// Insertion-ordered map; later duplicate keys overwrite earlier ones.
    Map(IndexMap<&'a str, Ast<'a>>),
    /// Ordered sequence of unsigned integers; empty is allowed.
    Tuple(Vec<usize>),
    Literal(Literal<'a>),
}

/// Parses a complete header text buffer into an [`Ast`].
///
/// The input admits exactly one top-level value: a map, a tuple, or a lone
/// literal followed immediately by end of input.
///
/// # Examples
///
/// ```rust
/// use npy_header::{parse, Ast, Encoding};
///
/// let ast = parse(b"{'shape': (3, 4)}", Encoding::Ascii).unwrap();
/// match ast {
///     Ast::Map(entries) => assert_eq!(entries["shape"], Ast::Tuple(vec![3, 4])),
///     _ => panic!("expected map"),
/// }
/// ```
pub fn parse(input: &[u8], encoding: Encoding) -> Result<Ast<'_>, SyntaxError> {
    let mut lexer = Lexer::new(input, encoding);
    match lexer.peek()? {
        Token::LBrace => parse_map(&mut lexer),
        Token::LParen => parse_tuple(&mut lexer),
        Token::Literal(literal) => {
            lexer.advance()?;
            match lexer.peek()? {
                Token::Eof => Ok(Ast::Literal(literal)),
                other => Err(SyntaxError::TrailingTokens {
                    found: other.describe(),
                }),
            }
        }
        Token::Eof => Err(SyntaxError::EmptyInput),
        other => Err(SyntaxError::MisplacedToken {
            found: other.describe(),
        }),
    }
}

/// Map body states. `Key` carries the pending key until its value lands.
enum MapState<'a> {
    Start,
    Key(&'a str),
    Value,
}

fn parse_map<'a>(lexer: &mut Lexer<'a>) -> Result<Ast<'a>, SyntaxError> {
    lexer.advance()?; // '{'
    let mut entries = IndexMap::new();
    let mut state = MapState::Start;

    loop {
        match state {
            MapState::Start => match lexer.advance()? {
                Token::RBrace => return Ok(Ast::Map(entries)),
                Token::Literal(Literal::Str(key)) => state = MapState::Key(key),
                other => {
                    return Err(SyntaxError::InvalidKey {
                        found: other.describe(),
                    })
                }
            },
            MapState::Key(key) => {
                match lexer.advance()? {
                    Token::Colon => {}
                    other => {
                        return Err(SyntaxError::MissingColon {
                            found: other.describe(),
                        })
                    }
                }
                let value = match lexer.peek()? {
                    Token::Literal(literal) => {
                        lexer.advance()?;
                        Ast::Literal(literal)
                    }
                    Token::LParen => parse_tuple(lexer)?,
                    Token::LBrace => parse_map(lexer)?,
                    other => {
                        return Err(SyntaxError::InvalidValue {
                            found: other.describe(),
                        })
                    }
                };
                entries.insert(key, value);
                state = MapState::Value;
            }
            MapState::Value => match lexer.advance()? {
                Token::RBrace => return Ok(Ast::Map(entries)),
                Token::Comma => match lexer.advance()? {
                    Token::Literal(Literal::Str(key)) => state = MapState::Key(key),
                    Token::RBrace => return Ok(Ast::Map(entries)),
                    other => {
                        return Err(SyntaxError::InvalidKey {
                            found: other.describe(),
                        })
                    }
                },
                other => {
                    return Err(SyntaxError::MissingComma {
                        found: other.describe(),
                    })
                }
            },
        }
    }
}

/// Tuple body states.
enum TupleState {
    Start,
    Element,
    Comma,
}

fn parse_tuple<'a>(lexer: &mut Lexer<'a>) -> Result<Ast<'a>, SyntaxError> {
    lexer.advance()?; // '('
    let mut elements = Vec::new();
    let mut state = TupleState::Start;

    loop {
        match state {
            TupleState::Start => match lexer.advance()? {
                Token::RParen => return Ok(Ast::Tuple(elements)),
                Token::Literal(Literal::Number(n)) => {
                    elements.push(n);
                    state = TupleState::Element;
                }
                other => {
                    return Err(SyntaxError::InvalidTupleElement {
                        found: other.describe(),
                    })
                }
            },
            TupleState::Element => match lexer.advance()? {
                Token::Comma => state = TupleState::Comma,
                Token::RParen => {
                    // `(5)` is a parenthesized scalar in the source format,
                    // not a 1-tuple.
                    if elements.len() == 1 {
                        return Err(SyntaxError::MissingTrailingComma);
                    }
                    return Ok(Ast::Tuple(elements));
                }
                other => {
                    return Err(SyntaxError::MissingComma {
                        found: other.describe(),
                    })
                }
            },
            TupleState::Comma => match lexer.advance()? {
                Token::RParen => return Ok(Ast::Tuple(elements)),
                Token::Literal(Literal::Number(n)) => {
                    elements.push(n);
                    state = TupleState::Element;
                }
                other => {
                    return Err(SyntaxError::InvalidTupleElement {
                        found: other.describe(),
                    })
                }
            },
        }
    }
}

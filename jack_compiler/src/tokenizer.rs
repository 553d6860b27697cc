//! Lexical analysis for Jack source files.
//!
//! Whitespace, `//` line comments, and non-nesting `/* ... */` block comments
//! are skipped between tokens. The tokenizer keeps exactly one token of
//! look-ahead: [`Tokenizer::advance`] scans the next token eagerly, matching
//! the one-token-lookahead the parser needs for every production.

use crate::error::{JackCompilerError, Position, Result};
use crate::token::{Keyword, Token, SYMBOLS};

pub struct Tokenizer<'a> {
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    current: Option<Token>,
    current_pos: Position,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Result<Self> {
        let mut tokenizer = Self {
            bytes: source.as_bytes(),
            pos: 0,
            line: 1,
            current: None,
            current_pos: Position { line: 1 },
        };
        tokenizer.advance()?;
        Ok(tokenizer)
    }

    #[must_use]
    pub fn has_more_tokens(&self) -> bool {
        self.current.is_some()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Token> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.current_pos
    }

    /// Moves the look-ahead window forward by one token.
    pub fn advance(&mut self) -> Result<()> {
        self.skip_trivia()?;
        if self.pos >= self.bytes.len() {
            self.current = None;
            return Ok(());
        }
        self.current_pos = Position { line: self.line };
        self.current = Some(self.scan_token()?);
        Ok(())
    }

    fn peek_byte(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Skips whitespace and comments, tracking line numbers through both.
    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.peek_byte() {
                Some(b) if b.is_ascii_whitespace() => {
                    if b == b'\n' {
                        self.line += 1;
                    }
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(b) = self.peek_byte() {
                        if b == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start_line = self.line;
                    self.pos += 2;
                    loop {
                        match self.peek_byte() {
                            None => {
                                return Err(JackCompilerError::Unterminated {
                                    pos: Position { line: start_line },
                                    what: "block comment",
                                })
                            }
                            Some(b'\n') => {
                                self.line += 1;
                                self.pos += 1;
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_token(&mut self) -> Result<Token> {
        let byte = self.bytes[self.pos];

        if SYMBOLS.contains(&byte) {
            self.pos += 1;
            return Ok(Token::Symbol(byte as char));
        }
        if byte == b'"' {
            return self.scan_string();
        }
        if byte.is_ascii_digit() {
            return self.scan_int();
        }
        if byte.is_ascii_alphabetic() || byte == b'_' {
            return Ok(self.scan_word());
        }

        Err(JackCompilerError::InvalidChar {
            pos: self.current_pos,
            ch: byte as char,
        })
    }

    fn scan_string(&mut self) -> Result<Token> {
        let start_line = self.line;
        self.pos += 1; // opening quote
        let start = self.pos;
        loop {
            match self.peek_byte() {
                None | Some(b'\n') => {
                    return Err(JackCompilerError::Unterminated {
                        pos: Position { line: start_line },
                        what: "string constant",
                    })
                }
                Some(b'"') => break,
                Some(_) => self.pos += 1,
            }
        }
        let value = std::str::from_utf8(&self.bytes[start..self.pos])
            .expect("source was valid utf-8")
            .to_string();
        self.pos += 1; // closing quote
        Ok(Token::StringConst(value))
    }

    fn scan_int(&mut self) -> Result<Token> {
        let start = self.pos;
        while self.peek_byte().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let text = std::str::from_utf8(&self.bytes[start..self.pos]).expect("ascii digits");
        let value: i64 = text.parse().expect("digit run parses as an integer");
        if !(0..=32767).contains(&value) {
            return Err(JackCompilerError::IntOutOfRange {
                pos: self.current_pos,
                value,
            });
        }
        Ok(Token::IntConst(value as i16))
    }

    fn scan_word(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek_byte()
            .is_some_and(|b| b.is_ascii_alphanumeric() || b == b'_')
        {
            self.pos += 1;
        }
        let word = std::str::from_utf8(&self.bytes[start..self.pos]).expect("ascii word");
        Keyword::lookup(word).map_or_else(|| Token::Identifier(word.to_string()), Token::Keyword)
    }
}

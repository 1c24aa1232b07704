use std::str::Chars;

use thiserror::Error;
use tracing::debug;

use crate::stream::Stream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Unknown,
    Instruction,
    Register,
    Number,
    Semicolon,
    Eof,
}

/// One lexed token. `text` holds the raw characters; for numbers it is
/// already normalized to a `0x`-prefixed or plain-decimal literal (binary
/// literals are converted to hexadecimal text while lexing).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }
}

/// Lexical failures. All of these are fatal: the run aborts before any
/// instruction is parsed or emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("expected register-type after '%'")]
    ExpectedRegisterType,
    #[error("expected register-number after register-type")]
    ExpectedRegisterNumber,
    #[error("expected separator after register-number")]
    ExpectedSeparator,
    #[error("expected a hex value after '0x'")]
    ExpectedHexDigits,
    #[error("expected a binary value after '0b'")]
    ExpectedBinaryDigits,
    #[error("unexpected character '{0}' after '#'")]
    UnexpectedCharacter(char),
}

/// Character-stream lexer. Holds a single current-character cursor with
/// one character of lookahead; driven to completion once per assembly run.
pub struct Lexer<'a> {
    chars: Chars<'a>,
    current: Option<char>,
    data: String,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut chars = source.chars();
        let current = chars.next();
        Self {
            chars,
            current,
            data: String::new(),
        }
    }

    /// Drains the whole source into a token queue terminated by exactly one
    /// end-of-input token, or fails on the first lexical error.
    pub fn lex(mut self) -> Result<Stream<Token>, LexError> {
        let mut out = Stream::new();
        loop {
            self.skip_whitespace();
            let Some(c) = self.current else {
                out.put(Token::eof());
                debug!(tokens = out.len(), "source lexed");
                return Ok(out);
            };
            self.data.clear();
            let kind = match c {
                ';' => {
                    self.append_advance();
                    Some(TokenKind::Semicolon)
                }
                // operand separator, never emitted
                ',' => {
                    self.advance();
                    None
                }
                '%' => Some(self.lex_register()?),
                '#' => Some(self.lex_number()?),
                _ if c.is_ascii_alphabetic() => Some(self.lex_instruction()),
                _ => {
                    self.append_advance();
                    Some(TokenKind::Unknown)
                }
            };
            if let Some(kind) = kind {
                out.put(Token::new(kind, std::mem::take(&mut self.data)));
            }
        }
    }

    fn advance(&mut self) {
        self.current = self.chars.next();
    }

    fn peek(&self) -> Option<char> {
        self.chars.clone().next()
    }

    fn append_advance(&mut self) {
        if let Some(c) = self.current {
            self.data.push(c);
        }
        self.advance();
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current, Some(c) if c.is_whitespace()) {
            self.advance();
        }
    }

    fn lex_instruction(&mut self) -> TokenKind {
        while matches!(self.current, Some(c) if c.is_ascii_alphabetic()) {
            self.append_advance();
        }
        TokenKind::Instruction
    }

    // Type tag then number, e.g. "%r0" or "%fpr12". A following ',' or ';'
    // is mandatory; it stays in the stream. '%' is dropped from the token
    // text.
    fn lex_register(&mut self) -> Result<TokenKind, LexError> {
        if !matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            return Err(LexError::ExpectedRegisterType);
        }
        self.advance(); // '%'

        while matches!(self.current, Some(c) if c.is_ascii_alphabetic()) {
            self.append_advance();
        }

        // no whitespace allowed between the type tag and the number
        if !matches!(self.current, Some(c) if c.is_ascii_digit()) {
            return Err(LexError::ExpectedRegisterNumber);
        }
        while matches!(self.current, Some(c) if c.is_ascii_digit()) {
            self.append_advance();
        }

        self.skip_whitespace();
        match self.current {
            Some(',') | Some(';') => Ok(TokenKind::Register),
            _ => Err(LexError::ExpectedSeparator),
        }
    }

    // "#" with optional sign, then a decimal run, "0x" + hex digits, or
    // "0b" + binary digits.
    fn lex_number(&mut self) -> Result<TokenKind, LexError> {
        self.advance(); // '#'

        match self.current {
            Some('-') => self.append_advance(),
            Some('+') => self.advance(),
            _ => {}
        }

        let Some(c) = self.current else {
            return Ok(TokenKind::Number);
        };
        if !c.is_ascii_digit() {
            // A bare '#' before a separator yields an empty literal, which
            // the parser skips.
            return if is_separator_or_space(c) {
                Ok(TokenKind::Number)
            } else {
                Err(LexError::UnexpectedCharacter(c))
            };
        }

        match self.peek() {
            Some('x') => self.lex_hex(),
            Some('b') => self.lex_binary(),
            Some(d) if d.is_ascii_digit() => {
                while matches!(self.current, Some(c) if c.is_ascii_digit()) {
                    self.append_advance();
                }
                Ok(TokenKind::Number)
            }
            Some(d) if is_separator_or_space(d) => {
                self.append_advance();
                Ok(TokenKind::Number)
            }
            None => {
                self.append_advance();
                Ok(TokenKind::Number)
            }
            Some(d) => Err(LexError::UnexpectedCharacter(d)),
        }
    }

    fn lex_hex(&mut self) -> Result<TokenKind, LexError> {
        self.data.push_str("0x");
        self.advance(); // radix digit
        self.advance(); // 'x'

        if !matches!(self.current, Some(c) if c.is_ascii_hexdigit()) {
            return Err(LexError::ExpectedHexDigits);
        }
        while matches!(self.current, Some(c) if c.is_ascii_hexdigit()) {
            self.append_advance();
        }
        Ok(TokenKind::Number)
    }

    // Binary literals leave the lexer as hexadecimal text.
    fn lex_binary(&mut self) -> Result<TokenKind, LexError> {
        self.advance(); // radix digit
        self.advance(); // 'b'

        if !matches!(self.current, Some('0') | Some('1')) {
            return Err(LexError::ExpectedBinaryDigits);
        }
        let mut value: u64 = 0;
        while let Some(bit @ ('0' | '1')) = self.current {
            value = (value << 1) | (bit as u64 - '0' as u64);
            self.advance();
        }
        self.data.push_str(&format!("0x{value:x}"));
        Ok(TokenKind::Number)
    }
}

fn is_separator_or_space(c: char) -> bool {
    c == ';' || c == ',' || c.is_whitespace()
}

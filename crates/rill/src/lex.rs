//! Lexer: source text to a flat token stream.
//!
//! A single forward pass over the source with two cursors, `start` anchoring
//! the current lexeme and `current` marking the scan position. Bad input is
//! reported and skipped so one pass can surface every lexical error; the
//! stream always ends with a single [`TokenKind::Eof`] token.

use std::{rc::Rc, str::FromStr};

use strum::EnumString;

use crate::{
    error::{Diagnostics, SyntaxError},
    intern::{Interner, Symbol},
    value::LiteralValue,
};

/// Lexical category of a token.
///
/// Keyword variants carry their source spelling for [`FromStr`], which is how
/// the lexer tells reserved words apart from identifiers. Every other variant
/// is disabled there so an identifier can never collide with a variant name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, serde::Serialize, serde::Deserialize)]
pub enum TokenKind {
    // Single-character punctuation.
    #[strum(disabled)]
    LeftParen,
    #[strum(disabled)]
    RightParen,
    #[strum(disabled)]
    LeftBrace,
    #[strum(disabled)]
    RightBrace,
    #[strum(disabled)]
    Comma,
    #[strum(disabled)]
    Dot,
    #[strum(disabled)]
    Minus,
    #[strum(disabled)]
    Plus,
    #[strum(disabled)]
    Semicolon,
    #[strum(disabled)]
    Slash,
    #[strum(disabled)]
    Star,

    // One- or two-character operators.
    #[strum(disabled)]
    Bang,
    #[strum(disabled)]
    BangEqual,
    #[strum(disabled)]
    Equal,
    #[strum(disabled)]
    EqualEqual,
    #[strum(disabled)]
    Greater,
    #[strum(disabled)]
    GreaterEqual,
    #[strum(disabled)]
    Less,
    #[strum(disabled)]
    LessEqual,

    // Literals and names.
    #[strum(disabled)]
    Identifier,
    #[strum(disabled)]
    Str,
    #[strum(disabled)]
    Number,

    // Reserved words.
    #[strum(serialize = "and")]
    And,
    #[strum(serialize = "class")]
    Class,
    #[strum(serialize = "else")]
    Else,
    #[strum(serialize = "false")]
    False,
    #[strum(serialize = "fun")]
    Fun,
    #[strum(serialize = "for")]
    For,
    #[strum(serialize = "if")]
    If,
    #[strum(serialize = "nil")]
    Nil,
    #[strum(serialize = "or")]
    Or,
    #[strum(serialize = "print")]
    Print,
    #[strum(serialize = "return")]
    Return,
    #[strum(serialize = "super")]
    Super,
    #[strum(serialize = "this")]
    This,
    #[strum(serialize = "true")]
    True,
    #[strum(serialize = "var")]
    Var,
    #[strum(serialize = "while")]
    While,

    #[strum(disabled)]
    Eof,
}

/// One lexical unit: kind, interned lexeme, optional literal payload, and
/// the 1-based line it ended on. Immutable after construction.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: Symbol,
    pub literal: Option<LiteralValue>,
    pub line: u32,
}

/// Scans `source` into tokens, interning every lexeme.
///
/// Lexical errors go to `diagnostics`; scanning continues past them, so the
/// returned stream is always well formed and Eof-terminated.
pub(crate) fn lex(source: &str, interner: &mut Interner, diagnostics: &mut Diagnostics) -> Vec<Token> {
    let mut lexer = Lexer {
        source,
        interner,
        diagnostics,
        tokens: Vec::new(),
        start: 0,
        current: 0,
        line: 1,
    };
    lexer.scan();
    lexer.tokens
}

struct Lexer<'src, 'ctx> {
    source: &'src str,
    interner: &'ctx mut Interner,
    diagnostics: &'ctx mut Diagnostics,
    tokens: Vec<Token>,
    /// Byte offset of the first character of the lexeme being scanned.
    start: usize,
    /// Byte offset of the next character to consume.
    current: usize,
    line: u32,
}

impl Lexer<'_, '_> {
    fn scan(&mut self) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        let lexeme = self.interner.intern("");
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            lexeme,
            literal: None,
            line: self.line,
        });
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenKind::LeftParen),
            ')' => self.add_token(TokenKind::RightParen),
            '{' => self.add_token(TokenKind::LeftBrace),
            '}' => self.add_token(TokenKind::RightBrace),
            ',' => self.add_token(TokenKind::Comma),
            '.' => self.add_token(TokenKind::Dot),
            '-' => self.add_token(TokenKind::Minus),
            '+' => self.add_token(TokenKind::Plus),
            ';' => self.add_token(TokenKind::Semicolon),
            '*' => self.add_token(TokenKind::Star),
            '!' => {
                let kind = if self.match_char('=') { TokenKind::BangEqual } else { TokenKind::Bang };
                self.add_token(kind);
            }
            '=' => {
                let kind = if self.match_char('=') { TokenKind::EqualEqual } else { TokenKind::Equal };
                self.add_token(kind);
            }
            '<' => {
                let kind = if self.match_char('=') { TokenKind::LessEqual } else { TokenKind::Less };
                self.add_token(kind);
            }
            '>' => {
                let kind = if self.match_char('=') { TokenKind::GreaterEqual } else { TokenKind::Greater };
                self.add_token(kind);
            }
            '/' => {
                if self.match_char('/') {
                    // Line comment, discarded without producing a token.
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            _ => {
                if c.is_ascii_digit() {
                    self.number();
                } else if c.is_ascii_alphabetic() || c == '_' {
                    self.identifier();
                } else {
                    self.diagnostics
                        .report(SyntaxError::in_source(self.line, format!("Unexpected character: {c}")));
                }
            }
        }
    }

    /// Scans a string literal. The opening quote has been consumed; strings
    /// may span newlines, each of which bumps the line counter.
    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.diagnostics
                .report(SyntaxError::in_source(self.line, "Unterminated string."));
            return;
        }

        // Closing quote.
        self.advance();

        let value = &self.source[self.start + 1..self.current - 1];
        let literal = LiteralValue::Str(Rc::from(value));
        self.add_literal_token(TokenKind::Str, literal);
    }

    /// Scans a decimal number with an optional fractional part. A trailing
    /// dot is not consumed, so `123.` lexes as a number followed by a dot.
    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let value: f64 = self.source[self.start..self.current]
            .parse()
            .expect("scanned lexeme is a valid decimal literal");
        self.add_literal_token(TokenKind::Number, LiteralValue::Number(value));
    }

    fn identifier(&mut self) {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let kind = TokenKind::from_str(text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn add_token(&mut self, kind: TokenKind) {
        let lexeme = self.interner.intern(&self.source[self.start..self.current]);
        self.tokens.push(Token {
            kind,
            lexeme,
            literal: None,
            line: self.line,
        });
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: LiteralValue) {
        let lexeme = self.interner.intern(&self.source[self.start..self.current]);
        self.tokens.push(Token {
            kind,
            lexeme,
            literal: Some(literal),
            line: self.line,
        });
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current..]
            .chars()
            .next()
            .expect("advance past end of source");
        self.current += c.len_utf8();
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += expected.len_utf8();
        true
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }
}

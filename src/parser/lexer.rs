//! Logos-based lexer for the text model format.
//!
//! The grammar has only four significant characters (`,` `;` `!` and line
//! breaks), so every other run of characters is a single `Text` token whose
//! surrounding whitespace the parser trims.

use logos::Logos;

/// Token kinds of the text format.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    #[token(",")]
    Comma,

    #[token(";")]
    Semicolon,

    /// `!` to end of line; `!-` marks a field annotation.
    #[regex(r"![^\r\n]*")]
    Comment,

    #[regex(r"\r\n|\n|\r")]
    Newline,

    #[regex(r"[^,;!\r\n]+")]
    Text,
}

/// A token with its kind, text, and 1-based line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub line: usize,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    line: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
            line: 1,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let kind = self.inner.next()?.unwrap_or(TokenKind::Text);
        let text = self.inner.slice();
        let line = self.line;
        if kind == TokenKind::Newline {
            self.line += 1;
        }
        Some(Token { kind, text, line })
    }
}

/// Tokenize an entire string into a Vec.
#[allow(dead_code)]
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

//! RS-274X tokenizer
//!
//! Line breaks carry no meaning in a Gerber document, so lines are joined
//! before splitting. `*` ends a block and is dropped; `%` opens or closes an
//! extended command and is kept as a [`Token::Toggle`].

/// One fragment of the command stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `%`: switch between normal and extended mode.
    Toggle,
    /// Text of a single block, trimmed, never empty.
    Command(String),
}

/// Split raw document text into tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in source.chars() {
        match ch {
            '\r' | '\n' => {}
            '*' => flush(&mut current, &mut tokens),
            '%' => {
                flush(&mut current, &mut tokens);
                tokens.push(Token::Toggle);
            }
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn flush(current: &mut String, tokens: &mut Vec<Token>) {
    let text = current.trim();
    if !text.is_empty() {
        tokens.push(Token::Command(text.to_string()));
    }
    current.clear();
}

/// Ordered tokens with a read cursor.
///
/// The cursor position doubles as the token index reported in errors.
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    cursor: usize,
}

impl TokenStream {
    pub fn new(source: &str) -> Self {
        Self {
            tokens: tokenize(source),
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the next token to be read.
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    /// Take the next token together with its index.
    pub fn next_token(&mut self) -> Option<(usize, Token)> {
        let token = self.tokens.get(self.cursor)?.clone();
        let position = self.cursor;
        self.cursor += 1;
        Some((position, token))
    }

    /// Number of tokens not yet read.
    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.cursor)
    }
}

use url::Url;

use crate::lexer::{is_white_space, LexerState, Pos, RawToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Ident,
    AtKeyword,
    /// A whole well-formed `@charset "...";` statement as one token.
    Charset,
    String,
    /// Placeholder emitted after a string was broken by a line terminator.
    InvalidString,
    /// A string terminated by end of input; carries synthesized text with the
    /// missing closing quote appended.
    UnclosedString,
    Hash,
    ClassKeyword,
    Number,
    Percentage,
    Dimension,
    Uri,
    /// A `url(` whose unquoted body ran into end of input.
    UnclosedUri,
    Function,
    LParen,
    RParen,
    LCurly,
    RCurly,
    LBracket,
    RBracket,
    Semicolon,
    Colon,
    Comma,
    Slash,
    Greater,
    Plus,
    Tilde,
    Minus,
    Asterisk,
    Equals,
    Includes,
    DashMatch,
    PrefixMatch,
    SuffixMatch,
    SubstringMatch,
    Exclamation,
    Space,
    Cdo,
    Cdc,
    /// Synthesized closing quotes, produced only by end-of-input recovery.
    Apos,
    Quot,
    Delim,
    Eof,
}

/// Token kinds whose text carries syntactic wrapping that consumers never
/// want to see. The mapping is bidirectional so a category observed on a
/// token can be traced back to the kind that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Function,
    Uri,
    String,
    ClassKeyword,
    Hash,
    UnclosedString,
    UnclosedUri,
}

impl Category {
    pub fn of(kind: TokenKind) -> Option<Category> {
        match kind {
            TokenKind::Function => Some(Category::Function),
            TokenKind::Uri => Some(Category::Uri),
            TokenKind::String => Some(Category::String),
            TokenKind::ClassKeyword => Some(Category::ClassKeyword),
            TokenKind::Hash => Some(Category::Hash),
            TokenKind::UnclosedString => Some(Category::UnclosedString),
            TokenKind::UnclosedUri => Some(Category::UnclosedUri),
            _ => None,
        }
    }

    pub fn token_kind(self) -> TokenKind {
        match self {
            Category::Function => TokenKind::Function,
            Category::Uri => TokenKind::Uri,
            Category::String => TokenKind::String,
            Category::ClassKeyword => TokenKind::ClassKeyword,
            Category::Hash => TokenKind::Hash,
            Category::UnclosedString => TokenKind::UnclosedString,
            Category::UnclosedUri => TokenKind::UnclosedUri,
        }
    }
}

/// A scanned or synthesized token. Real tokens borrow their text from the
/// input via the byte span; synthesized ones carry owned text because they
/// have no faithful span to point at.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: Pos,
    pub end: Pos,
    pub line: u32,
    pub column: u32,
    /// Scanner state right after this token's characters were processed.
    pub state: LexerState,
    /// Base URL of the source, carried so relative URIs in values can be
    /// resolved later without replumbing context.
    pub base: Option<Url>,
    /// Cleared when recovery decides the token cannot mean what it says.
    pub valid: bool,
    synthetic_text: Option<Box<str>>,
}

impl Token {
    pub fn new(raw: RawToken, base: Option<Url>) -> Self {
        Self {
            kind: raw.kind,
            start: raw.start,
            end: raw.end,
            line: raw.line,
            column: raw.column,
            state: raw.state,
            base,
            valid: true,
            synthetic_text: None,
        }
    }

    pub fn synthetic(
        kind: TokenKind,
        text: &str,
        start: Pos,
        end: Pos,
        line: u32,
        column: u32,
        state: LexerState,
        base: Option<Url>,
    ) -> Self {
        Self {
            kind,
            start,
            end,
            line,
            column,
            state,
            base,
            valid: true,
            synthetic_text: Some(text.into()),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.synthetic_text.is_some()
    }

    /// Raw token text as scanned or synthesized.
    pub fn raw_text<'a>(&'a self, input: &'a str) -> &'a str {
        match &self.synthetic_text {
            Some(text) => text,
            None => input.get(self.start as usize..self.end as usize).unwrap_or(""),
        }
    }

    /// Token text with the category's syntactic wrapping stripped.
    pub fn text<'a>(&'a self, input: &'a str) -> &'a str {
        let raw = self.raw_text(input);
        match Category::of(self.kind) {
            Some(Category::Function) => extract_function(raw),
            Some(Category::Uri) => extract_uri(raw),
            Some(Category::String) => extract_string(raw),
            Some(Category::ClassKeyword) => extract_class_keyword(raw),
            Some(Category::Hash) => extract_hash(raw),
            Some(Category::UnclosedString) => extract_unclosed_string(raw),
            Some(Category::UnclosedUri) => extract_unclosed_uri(raw),
            None => raw,
        }
    }
}

/// `"value"` or `'value'`, both delimiters present.
pub fn extract_string(raw: &str) -> &str {
    strip_quotes(raw)
}

/// Like `extract_string` for a string that may have lost its closing quote.
pub fn extract_unclosed_string(raw: &str) -> &str {
    strip_quotes(raw)
}

/// `url( value )` with optional quotes around the value.
pub fn extract_uri(raw: &str) -> &str {
    let inner = strip_url_prefix(raw);
    let inner = inner.strip_suffix(')').unwrap_or(inner);
    let inner = inner.trim_matches(is_white_space);
    strip_quotes(inner)
}

/// `url(` content that ran to end of input, possibly still carrying a lone
/// opening quote.
pub fn extract_unclosed_uri(raw: &str) -> &str {
    let inner = strip_url_prefix(raw);
    let inner = inner.trim_start_matches(is_white_space);
    strip_quotes(inner)
}

/// `name(` with the trailing paren.
pub fn extract_function(raw: &str) -> &str {
    raw.strip_suffix('(').unwrap_or(raw)
}

/// `#name`.
pub fn extract_hash(raw: &str) -> &str {
    raw.strip_prefix('#').unwrap_or(raw)
}

/// `.name`.
pub fn extract_class_keyword(raw: &str) -> &str {
    raw.strip_prefix('.').unwrap_or(raw)
}

/// Strips a matched quote pair, or a lone leading quote when the trailing
/// one never arrived.
fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match chars.next() {
        Some(q @ ('"' | '\'')) => {
            let rest = chars.as_str();
            match rest.chars().last() {
                Some(last) if last == q => &rest[..rest.len() - 1],
                _ => rest,
            }
        }
        _ => value,
    }
}

fn strip_url_prefix(raw: &str) -> &str {
    // Compared as bytes: slicing the str could split a multibyte character
    // when the input does not actually start with `url(`.
    let bytes = raw.as_bytes();
    if bytes.len() >= 4 && bytes[..4].eq_ignore_ascii_case(b"url(") {
        &raw[4..]
    } else {
        raw
    }
}

use std::fmt::Display;

use smallvec::SmallVec;
use url::Url;

use crate::lexer::{
    Lexer, LexerState, Pos, RawToken, RecoveryMode, Scanned, C_APOSTROPHE, C_CARRIAGE_RETURN,
    C_FORM_FEED, C_LEFT_CURLY, C_LEFT_PARENTHESIS, C_LEFT_SQUARE, C_LINE_FEED, C_QUOTATION_MARK,
    C_RIGHT_CURLY, C_RIGHT_PARENTHESIS, C_RIGHT_SQUARE, C_SEMICOLON,
};
use crate::token::{Token, TokenKind};

pub const INVALID_STRING_TEXT: &str = "INVALID_STRING";

/// What the token stream is committed to finishing. `Charset` and `Import`
/// cover the bodies of those statements, whose lexical damage is junked at
/// character level; `String` covers an unterminated string literal anywhere
/// else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    Charset,
    Import,
    String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub kind: WarningKind,
    pub line: u32,
    pub column: u32,
}

impl Warning {
    pub fn new(kind: WarningKind, line: u32, column: u32) -> Self {
        Self { kind, line, column }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WarningKind {
    UnterminatedString,
    MalformedStatement,
    UnexpectedToken { context: &'static str, found: String },
    InvalidStatement,
    InvalidDeclaration { property: String },
    InvalidSelector,
    InvalidMediaQuery,
    InvalidPseudo { name: String },
    DuplicatePseudoElement,
    InvalidKeyframeSelector { value: String },
    UnknownAtRule { name: String },
    StrayToken { found: String },
    ImportAfterContent,
    ImportCycle { uri: String },
    ImportFailed { uri: String, reason: String },
    UnsupportedEncoding { encoding: String },
    InvalidData { reason: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: ", self.line, self.column)?;
        match &self.kind {
            WarningKind::UnterminatedString => write!(f, "unterminated string"),
            WarningKind::MalformedStatement => {
                write!(f, "malformed statement skipped to next boundary")
            }
            WarningKind::UnexpectedToken { context, found } => {
                write!(f, "unexpected '{found}' in {context}")
            }
            WarningKind::InvalidStatement => write!(f, "invalid statement dropped"),
            WarningKind::InvalidDeclaration { property } => {
                write!(f, "invalid declaration '{property}' dropped")
            }
            WarningKind::InvalidSelector => write!(f, "invalid selector, rule dropped"),
            WarningKind::InvalidMediaQuery => {
                write!(f, "invalid media query treated as 'not all'")
            }
            WarningKind::InvalidPseudo { name } => write!(f, "unknown pseudo '{name}'"),
            WarningKind::DuplicatePseudoElement => {
                write!(f, "more than one pseudo element in a selector")
            }
            WarningKind::InvalidKeyframeSelector { value } => {
                write!(f, "invalid keyframe selector '{value}'")
            }
            WarningKind::UnknownAtRule { name } => write!(f, "unknown at-rule '{name}' skipped"),
            WarningKind::StrayToken { found } => write!(f, "stray '{found}' skipped"),
            WarningKind::ImportAfterContent => {
                write!(f, "@import ignored, rules already present")
            }
            WarningKind::ImportCycle { uri } => write!(f, "import cycle at '{uri}'"),
            WarningKind::ImportFailed { uri, reason } => {
                write!(f, "failed to import '{uri}': {reason}")
            }
            WarningKind::UnsupportedEncoding { encoding } => {
                write!(f, "unsupported encoding '{encoding}', decoded as utf-8")
            }
            WarningKind::InvalidData { reason } => write!(f, "invalid data: {reason}"),
        }
    }
}

/// Token source that repairs lexically broken input instead of failing on
/// it. Sits between the scanner and the parser: well-formed tokens pass
/// through, broken strings are turned into placeholder or completed tokens,
/// malformed `@charset`/`@import` bodies are junked at character level, and
/// at end of input any still-open constructs get their closers synthesized
/// one by one.
#[derive(Debug)]
pub struct TokenRecovery<'s> {
    lexer: Lexer<'s>,
    base: Option<Url>,
    expected: SmallVec<[Expect; 2]>,
    eof_reached: bool,
    warnings: Vec<Warning>,
}

impl<'s> TokenRecovery<'s> {
    pub fn new(input: &'s str, base: Option<Url>) -> Self {
        let mut lexer = Lexer::from(input);
        let _ = lexer.consume();
        Self {
            lexer,
            base,
            expected: SmallVec::new(),
            eof_reached: false,
            warnings: Vec::new(),
        }
    }

    pub fn input(&self) -> &'s str {
        self.lexer.value()
    }

    pub fn state(&self) -> &LexerState {
        self.lexer.state()
    }

    pub fn state_mut(&mut self) -> &mut LexerState {
        self.lexer.state_mut()
    }

    pub fn expecting(&mut self, expect: Expect) {
        self.expected.push(expect);
    }

    pub fn end(&mut self) {
        self.expected.pop();
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }

    /// Next token, synthesized closers included. After the first `Eof` every
    /// further call returns `Eof` again.
    pub fn next_token(&mut self) -> Token {
        loop {
            if self.eof_reached {
                return self.make_eof();
            }
            match self.lexer.next_raw() {
                Scanned::Token(raw) => match raw.kind {
                    TokenKind::AtKeyword => {
                        let text = self
                            .lexer
                            .slice(raw.start, raw.end)
                            .unwrap_or_default();
                        if text == "@charset" {
                            match self.assemble_charset(&raw) {
                                Some(token) => return token,
                                None => continue,
                            }
                        }
                        if text.eq_ignore_ascii_case("@import") {
                            self.expecting(Expect::Import);
                        }
                        return Token::new(raw, self.base.clone());
                    }
                    TokenKind::Semicolon | TokenKind::LCurly | TokenKind::RCurly => {
                        if self.expected.last() == Some(&Expect::Import)
                            && raw.state.is_balanced(
                                RecoveryMode::RuleBody,
                                &LexerState::default(),
                                raw.kind,
                            )
                        {
                            self.end();
                        }
                        return Token::new(raw, self.base.clone());
                    }
                    _ => return Token::new(raw, self.base.clone()),
                },
                Scanned::BrokenString {
                    start,
                    line,
                    column,
                    quote,
                    at_eof,
                } => {
                    if !matches!(
                        self.expected.last(),
                        Some(Expect::Charset) | Some(Expect::Import)
                    ) {
                        self.expecting(Expect::String);
                    }
                    match self.recover(start, line, column, quote, at_eof) {
                        Some(token) => return token,
                        None => continue,
                    }
                }
                Scanned::End => {
                    self.expected.clear();
                    if let Some(token) = self.generate_eof_recover() {
                        return token;
                    }
                    self.eof_reached = true;
                    return self.make_eof();
                }
            }
        }
    }

    /// Runs the stream to completion; the last token is always `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Warning>) {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            log::trace!(
                target: "css.recovery",
                "{}:{}: {:?}",
                token.line,
                token.column,
                token.kind
            );
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, self.warnings)
    }

    /// Synthesizes exactly one closing token for the most urgent still-open
    /// construct, or `None` once the state is fully balanced. Open quotes
    /// close first, then parens, braces and brackets.
    pub fn generate_eof_recover(&mut self) -> Option<Token> {
        let state = self.lexer.state_mut();
        // Closes unconditionally; the guarded toggles would no-op while the
        // other quote is also open.
        let (kind, text) = if state.single_quote_open {
            state.single_quote_open = false;
            (TokenKind::Apos, "'")
        } else if state.double_quote_open {
            state.double_quote_open = false;
            (TokenKind::Quot, "\"")
        } else if state.paren_depth > 0 {
            state.decrement_paren();
            (TokenKind::RParen, ")")
        } else if state.curly_depth > 0 {
            state.decrement_curly();
            (TokenKind::RCurly, "}")
        } else if state.bracket_depth > 0 {
            state.decrement_bracket();
            (TokenKind::RBracket, "]")
        } else {
            return None;
        };
        log::debug!(
            target: "css.recovery",
            "synthesized '{}' at end of input, state now {:?}",
            text,
            self.lexer.state()
        );
        Some(self.synthetic_here(kind, text))
    }

    /// Handles a string broken by a line terminator or end of input. The
    /// popped expectation decides the repair: inside a `@charset`/`@import`
    /// body the rest of the statement is junked at character level, anywhere
    /// else the string itself is patched up.
    fn recover(
        &mut self,
        start: Pos,
        line: u32,
        column: u32,
        quote: char,
        at_eof: bool,
    ) -> Option<Token> {
        match self.expected.pop() {
            Some(Expect::Charset) | Some(Expect::Import) => {
                self.warnings
                    .push(Warning::new(WarningKind::MalformedStatement, line, column));
                let reference = *self.lexer.state();
                self.skip_statement_tail(&reference)
            }
            Some(Expect::String) | None => {
                if at_eof {
                    // Complete the string with the quote it was missing.
                    let scanned = self
                        .lexer
                        .slice(start, self.lexer.end_pos())
                        .unwrap_or_default();
                    let mut text = String::with_capacity(scanned.len() + 1);
                    text.push_str(scanned);
                    text.push(quote);
                    let state = self.lexer.state_mut();
                    state.single_quote_open = false;
                    state.double_quote_open = false;
                    log::debug!(
                        target: "css.recovery",
                        "{line}:{column}: string ran to end of input, closing quote synthesized"
                    );
                    Some(Token::synthetic(
                        TokenKind::UnclosedString,
                        &text,
                        start,
                        self.lexer.end_pos(),
                        line,
                        column,
                        *self.lexer.state(),
                        self.base.clone(),
                    ))
                } else {
                    let _ = self.lexer.consume();
                    let state = self.lexer.state_mut();
                    state.single_quote_open = false;
                    state.double_quote_open = false;
                    self.warnings
                        .push(Warning::new(WarningKind::UnterminatedString, line, column));
                    let mut token = Token::synthetic(
                        TokenKind::InvalidString,
                        INVALID_STRING_TEXT,
                        start,
                        self.lexer.end_pos(),
                        line,
                        column,
                        *self.lexer.state(),
                        self.base.clone(),
                    );
                    token.valid = false;
                    Some(token)
                }
            }
        }
    }

    /// Assembles `@charset S* STRING S* ;` into one token. On any deviation
    /// the statement is junked at character level and nothing of it reaches
    /// the parser beyond a synthesized boundary token.
    fn assemble_charset(&mut self, at: &RawToken) -> Option<Token> {
        self.expecting(Expect::Charset);
        let mut string_seen = false;
        loop {
            match self.lexer.next_raw() {
                Scanned::Token(raw) => match raw.kind {
                    TokenKind::Space => continue,
                    TokenKind::String if !string_seen => {
                        string_seen = true;
                        continue;
                    }
                    TokenKind::Semicolon if string_seen => {
                        self.end();
                        return Some(Token::new(
                            RawToken {
                                kind: TokenKind::Charset,
                                start: at.start,
                                end: raw.end,
                                line: at.line,
                                column: at.column,
                                state: raw.state,
                            },
                            self.base.clone(),
                        ));
                    }
                    _ => {
                        self.end();
                        self.warnings.push(Warning::new(
                            WarningKind::MalformedStatement,
                            at.line,
                            at.column,
                        ));
                        return self.junk_charset_tail(&at.state);
                    }
                },
                Scanned::BrokenString { line, column, .. } => {
                    self.end();
                    self.warnings
                        .push(Warning::new(WarningKind::MalformedStatement, line, column));
                    return self.junk_charset_tail(&at.state);
                }
                Scanned::End => {
                    self.expected.clear();
                    self.warnings.push(Warning::new(
                        WarningKind::MalformedStatement,
                        at.line,
                        at.column,
                    ));
                    return None;
                }
            }
        }
    }

    /// Character-level skip to the `;` or `}` ending the current statement,
    /// tracking nesting and quoting while it goes. The terminator itself is
    /// consumed and resurfaced as a synthesized token so the statement
    /// structure stays intact for the parser; at end of input there is no
    /// terminator and `None` is returned.
    fn skip_statement_tail(&mut self, reference: &LexerState) -> Option<Token> {
        loop {
            let c = self.lexer.cur()?;
            let state = self.lexer.state_mut();
            match c {
                C_APOSTROPHE => state.toggle_single_quote(),
                C_QUOTATION_MARK => state.toggle_double_quote(),
                C_LINE_FEED | C_CARRIAGE_RETURN | C_FORM_FEED => {
                    // A bare line terminator ends any open string.
                    state.single_quote_open = false;
                    state.double_quote_open = false;
                }
                _ if state.quote_open() => {}
                C_LEFT_CURLY => state.increment_curly(),
                C_RIGHT_CURLY => {
                    if state.paren_depth == 0
                        && state.bracket_depth == 0
                        && state.curly_depth == reference.curly_depth
                    {
                        state.decrement_curly();
                        let _ = self.lexer.consume();
                        return Some(self.synthetic_here(TokenKind::RCurly, "}"));
                    }
                    state.decrement_curly();
                }
                C_LEFT_PARENTHESIS => state.increment_paren(),
                C_RIGHT_PARENTHESIS => state.decrement_paren(),
                C_LEFT_SQUARE => state.increment_bracket(),
                C_RIGHT_SQUARE => state.decrement_bracket(),
                C_SEMICOLON => {
                    if state.paren_depth == 0
                        && state.bracket_depth == 0
                        && state.curly_depth == reference.curly_depth
                    {
                        let _ = self.lexer.consume();
                        return Some(self.synthetic_here(TokenKind::Semicolon, ";"));
                    }
                }
                _ => {}
            }
            let _ = self.lexer.consume();
        }
    }

    /// Junk the tail of a malformed `@charset` statement. The parser never
    /// saw the statement start, so its `;` is swallowed along with the rest;
    /// a `}` belongs to the enclosing block and is still surfaced.
    fn junk_charset_tail(&mut self, reference: &LexerState) -> Option<Token> {
        match self.skip_statement_tail(reference) {
            Some(token) if token.kind == TokenKind::RCurly => Some(token),
            _ => None,
        }
    }

    fn synthetic_here(&self, kind: TokenKind, text: &str) -> Token {
        let at = self.lexer.end_pos();
        Token::synthetic(
            kind,
            text,
            at,
            at,
            self.lexer.line(),
            self.lexer.column(),
            *self.lexer.state(),
            self.base.clone(),
        )
    }

    fn make_eof(&self) -> Token {
        self.synthetic_here(TokenKind::Eof, "")
    }
}

use std::str::Chars;

use crate::token::TokenKind;

pub const C_LINE_FEED: char = '\n';
pub const C_CARRIAGE_RETURN: char = '\r';
pub const C_FORM_FEED: char = '\u{c}';

pub const C_TAB: char = '\t';
pub const C_SPACE: char = ' ';

pub const C_SOLIDUS: char = '/';
pub const C_REVERSE_SOLIDUS: char = '\\';
pub const C_ASTERISK: char = '*';

pub const C_LEFT_PARENTHESIS: char = '(';
pub const C_RIGHT_PARENTHESIS: char = ')';
pub const C_LEFT_CURLY: char = '{';
pub const C_RIGHT_CURLY: char = '}';
pub const C_LEFT_SQUARE: char = '[';
pub const C_RIGHT_SQUARE: char = ']';

pub const C_QUOTATION_MARK: char = '"';
pub const C_APOSTROPHE: char = '\'';

pub const C_FULL_STOP: char = '.';
pub const C_COLON: char = ':';
pub const C_SEMICOLON: char = ';';
pub const C_COMMA: char = ',';
pub const C_PERCENTAGE: char = '%';
pub const C_AT_SIGN: char = '@';

pub const C_LOW_LINE: char = '_';
pub const C_LOWER_A: char = 'a';
pub const C_LOWER_E: char = 'e';
pub const C_LOWER_F: char = 'f';
pub const C_LOWER_Z: char = 'z';
pub const C_UPPER_A: char = 'A';
pub const C_UPPER_E: char = 'E';
pub const C_UPPER_F: char = 'F';
pub const C_UPPER_Z: char = 'Z';
pub const C_0: char = '0';
pub const C_9: char = '9';

pub const C_NUMBER_SIGN: char = '#';
pub const C_PLUS_SIGN: char = '+';
pub const C_HYPHEN_MINUS: char = '-';

pub const C_LESS_THAN_SIGN: char = '<';
pub const C_GREATER_THAN_SIGN: char = '>';

pub const C_EQUALS_SIGN: char = '=';
pub const C_TILDE: char = '~';
pub const C_VERTICAL_LINE: char = '|';
pub const C_CIRCUMFLEX: char = '^';
pub const C_DOLLAR_SIGN: char = '$';
pub const C_EXCLAMATION: char = '!';

pub type Pos = u32;

/// Nesting and quoting balance carried by the scanner and stamped into every
/// emitted token. Depths never go negative: every decrement is guarded so
/// recovery can trust the counters after arbitrarily malformed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerState {
    pub curly_depth: u32,
    pub paren_depth: u32,
    pub bracket_depth: u32,
    pub single_quote_open: bool,
    pub double_quote_open: bool,
}

/// Determines which counters must be level for a skipped token to count as a
/// resynchronization point. The parser recovers with `RuleBody` and
/// `DeclarationBody`; `Full` and `FunctionArgs` are for callers driving
/// recovery over the token stream themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryMode {
    /// Everything closed: no open quote, all depths zero.
    Full,
    /// Only parens and brackets must be closed, as within a function
    /// argument list where the surrounding rule braces are irrelevant.
    FunctionArgs,
    /// Everything but curly braces must be closed; used while skipping the
    /// remainder of a malformed rule prelude.
    RuleBody,
    /// Like `RuleBody`, but the curly depth must match the depth recorded
    /// when the malformed construct started, so recovery stops at the brace
    /// belonging to the construct's own block and not to a nested or
    /// enclosing one.
    DeclarationBody,
}

impl LexerState {
    pub fn increment_curly(&mut self) {
        self.curly_depth += 1;
    }

    pub fn decrement_curly(&mut self) {
        if self.curly_depth > 0 {
            self.curly_depth -= 1;
        }
    }

    pub fn increment_paren(&mut self) {
        self.paren_depth += 1;
    }

    pub fn decrement_paren(&mut self) {
        if self.paren_depth > 0 {
            self.paren_depth -= 1;
        }
    }

    pub fn increment_bracket(&mut self) {
        self.bracket_depth += 1;
    }

    pub fn decrement_bracket(&mut self) {
        if self.bracket_depth > 0 {
            self.bracket_depth -= 1;
        }
    }

    /// Quotes do not nest across kinds: a single quote inside an open
    /// double-quoted string is content, not a delimiter, and vice versa.
    pub fn toggle_single_quote(&mut self) {
        if !self.double_quote_open {
            self.single_quote_open = !self.single_quote_open;
        }
    }

    pub fn toggle_double_quote(&mut self) {
        if !self.single_quote_open {
            self.double_quote_open = !self.double_quote_open;
        }
    }

    pub fn quote_open(&self) -> bool {
        self.single_quote_open || self.double_quote_open
    }

    /// Whether this state counts as balanced under `mode`. `reference` is the
    /// state captured when recovery started and `kind` is the kind of the
    /// token this state was stamped on; both matter only for
    /// `DeclarationBody`, where a closing brace has already decremented the
    /// counter by the time the snapshot is taken.
    pub fn is_balanced(&self, mode: RecoveryMode, reference: &LexerState, kind: TokenKind) -> bool {
        match mode {
            RecoveryMode::Full => {
                !self.quote_open()
                    && self.curly_depth == 0
                    && self.paren_depth == 0
                    && self.bracket_depth == 0
            }
            RecoveryMode::FunctionArgs => self.paren_depth == 0 && self.bracket_depth == 0,
            RecoveryMode::RuleBody => {
                !self.quote_open() && self.paren_depth == 0 && self.bracket_depth == 0
            }
            RecoveryMode::DeclarationBody => {
                let wanted = if kind == TokenKind::RCurly {
                    reference.curly_depth.saturating_sub(1)
                } else {
                    reference.curly_depth
                };
                !self.quote_open()
                    && self.paren_depth == 0
                    && self.bracket_depth == 0
                    && self.curly_depth == wanted
            }
        }
    }
}

/// A token fresh out of the scanner: kind, byte span, position and a copy of
/// the scanner state taken after the token's characters were consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    pub kind: TokenKind,
    pub start: Pos,
    pub end: Pos,
    pub line: u32,
    pub column: u32,
    pub state: LexerState,
}

/// Result of one scan step. A broken string (newline or end of input before
/// the closing quote) is surfaced to the caller instead of being repaired
/// here, because the correct repair depends on what the token consumer is
/// currently expecting.
#[derive(Debug, Clone, PartialEq)]
pub enum Scanned {
    Token(RawToken),
    BrokenString {
        start: Pos,
        line: u32,
        column: u32,
        quote: char,
        at_eof: bool,
    },
    End,
}

#[derive(Debug, Clone)]
pub struct Lexer<'s> {
    value: &'s str,
    iter: Chars<'s>,
    cur_pos: Option<Pos>,
    cur: Option<char>,
    peek: Option<char>,
    peek2: Option<char>,
    line: u32,
    column: u32,
    state: LexerState,
}

impl<'s> From<&'s str> for Lexer<'s> {
    fn from(value: &'s str) -> Self {
        let mut iter = value.chars();
        let peek = iter.next();
        let peek2 = iter.next();
        Self {
            value,
            iter,
            cur_pos: None,
            cur: None,
            peek,
            peek2,
            line: 1,
            column: 1,
            state: LexerState::default(),
        }
    }
}

impl<'s> Lexer<'s> {
    #[must_use]
    pub fn consume(&mut self) -> Option<char> {
        if self.cur == Some(C_LINE_FEED) {
            self.line += 1;
            self.column = 1;
        } else if self.cur.is_some() {
            self.column += 1;
        }
        self.cur_pos = self.peek_pos();
        self.cur = self.peek;
        self.peek = self.peek2;
        self.peek2 = self.iter.next();
        self.cur()
    }

    pub fn cur_pos(&self) -> Option<Pos> {
        self.cur_pos
    }

    pub fn cur(&self) -> Option<char> {
        self.cur
    }

    pub fn peek_pos(&self) -> Option<Pos> {
        if let Some(pos) = self.cur_pos() {
            self.cur().map(|c| pos + c.len_utf8() as u32)
        } else {
            Some(0)
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.peek
    }

    pub fn peek2(&self) -> Option<char> {
        self.peek2
    }

    pub fn slice(&self, start: Pos, end: Pos) -> Option<&'s str> {
        self.value.get(start as usize..end as usize)
    }

    pub fn value(&self) -> &'s str {
        self.value
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn state(&self) -> &LexerState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut LexerState {
        &mut self.state
    }

    /// Position just past the last consumed character; the exclusive end of
    /// the token currently being finished.
    pub fn end_pos(&self) -> Pos {
        self.cur_pos.unwrap_or(self.value.len() as Pos)
    }

    /// Reposition so that the current character is the one at `pos` again.
    /// Used when a speculative `url(...)` scan fails and the content must be
    /// re-scanned as ordinary tokens.
    fn rewind(&mut self, pos: Pos, line: u32, column: u32) {
        let mut iter = self.value[pos as usize..].chars();
        self.cur = iter.next();
        self.peek = iter.next();
        self.peek2 = iter.next();
        self.iter = iter;
        self.cur_pos = Some(pos);
        self.line = line;
        self.column = column;
    }

    fn make(&self, kind: TokenKind, start: Pos, line: u32, column: u32) -> RawToken {
        RawToken {
            kind,
            start,
            end: self.end_pos(),
            line,
            column,
            state: self.state,
        }
    }
}

impl<'s> Lexer<'s> {
    /// Scan one token. The scanner must have been primed with one `consume`
    /// call so that the current character is the first unprocessed one.
    pub fn next_raw(&mut self) -> Scanned {
        loop {
            if self.consume_comments().is_none() {
                return Scanned::End;
            }
            let Some(c) = self.cur() else {
                return Scanned::End;
            };
            let start = self.end_pos();
            let line = self.line;
            let column = self.column;
            let scanned = match c {
                c if is_white_space(c) => {
                    while matches!(self.consume(), Some(c) if is_white_space(c)) {}
                    self.make(TokenKind::Space, start, line, column)
                }
                C_QUOTATION_MARK | C_APOSTROPHE => {
                    return self.consume_string_token(c, start, line, column);
                }
                C_NUMBER_SIGN => self.consume_number_sign(start, line, column),
                C_LEFT_PARENTHESIS => {
                    self.state.increment_paren();
                    self.single(TokenKind::LParen, start, line, column)
                }
                C_RIGHT_PARENTHESIS => {
                    self.state.decrement_paren();
                    self.single(TokenKind::RParen, start, line, column)
                }
                C_LEFT_CURLY => {
                    self.state.increment_curly();
                    self.single(TokenKind::LCurly, start, line, column)
                }
                C_RIGHT_CURLY => {
                    self.state.decrement_curly();
                    self.single(TokenKind::RCurly, start, line, column)
                }
                C_LEFT_SQUARE => {
                    self.state.increment_bracket();
                    self.single(TokenKind::LBracket, start, line, column)
                }
                C_RIGHT_SQUARE => {
                    self.state.decrement_bracket();
                    self.single(TokenKind::RBracket, start, line, column)
                }
                C_SEMICOLON => self.single(TokenKind::Semicolon, start, line, column),
                C_COLON => self.single(TokenKind::Colon, start, line, column),
                C_COMMA => self.single(TokenKind::Comma, start, line, column),
                C_SOLIDUS => self.single(TokenKind::Slash, start, line, column),
                C_GREATER_THAN_SIGN => self.single(TokenKind::Greater, start, line, column),
                C_PLUS_SIGN => self.single(TokenKind::Plus, start, line, column),
                C_EXCLAMATION => self.single(TokenKind::Exclamation, start, line, column),
                C_EQUALS_SIGN => self.single(TokenKind::Equals, start, line, column),
                C_TILDE => self.either(TokenKind::Includes, TokenKind::Tilde, start, line, column),
                C_VERTICAL_LINE => {
                    self.either(TokenKind::DashMatch, TokenKind::Delim, start, line, column)
                }
                C_CIRCUMFLEX => {
                    self.either(TokenKind::PrefixMatch, TokenKind::Delim, start, line, column)
                }
                C_DOLLAR_SIGN => {
                    self.either(TokenKind::SuffixMatch, TokenKind::Delim, start, line, column)
                }
                C_ASTERISK => self.either(
                    TokenKind::SubstringMatch,
                    TokenKind::Asterisk,
                    start,
                    line,
                    column,
                ),
                C_FULL_STOP => self.consume_full_stop(start, line, column),
                C_HYPHEN_MINUS => self.consume_minus(start, line, column),
                C_LESS_THAN_SIGN => self.consume_less_than_sign(start, line, column),
                C_AT_SIGN => self.consume_at_sign(start, line, column),
                C_REVERSE_SOLIDUS => {
                    if are_valid_escape(c, self.peek().unwrap_or(C_LINE_FEED)) {
                        return self.consume_ident_like(start, line, column);
                    }
                    self.single(TokenKind::Delim, start, line, column)
                }
                c if is_digit(c) => self.consume_numeric(start, line, column),
                c if is_ident_start(c) => return self.consume_ident_like(start, line, column),
                _ => self.single(TokenKind::Delim, start, line, column),
            };
            return Scanned::Token(scanned);
        }
    }

    fn single(&mut self, kind: TokenKind, start: Pos, line: u32, column: u32) -> RawToken {
        let _ = self.consume();
        self.make(kind, start, line, column)
    }

    /// Two-character operator when `=` follows, otherwise the fallback kind.
    fn either(
        &mut self,
        with_equals: TokenKind,
        alone: TokenKind,
        start: Pos,
        line: u32,
        column: u32,
    ) -> RawToken {
        let _ = self.consume();
        if self.cur() == Some(C_EQUALS_SIGN) {
            let _ = self.consume();
            self.make(with_equals, start, line, column)
        } else {
            self.make(alone, start, line, column)
        }
    }

    pub fn consume_comments(&mut self) -> Option<()> {
        while self.cur() == Some(C_SOLIDUS) && self.peek() == Some(C_ASTERISK) {
            loop {
                let c = self.consume()?;
                if c == C_ASTERISK && self.peek() == Some(C_SOLIDUS) {
                    self.consume()?;
                    self.consume()?;
                    break;
                }
            }
        }
        Some(())
    }

    fn consume_string_token(&mut self, quote: char, start: Pos, line: u32, column: u32) -> Scanned {
        if quote == C_APOSTROPHE {
            self.state.toggle_single_quote();
        } else {
            self.state.toggle_double_quote();
        }
        let _ = self.consume();
        loop {
            let Some(c) = self.cur() else {
                return Scanned::BrokenString {
                    start,
                    line,
                    column,
                    quote,
                    at_eof: true,
                };
            };
            if c == quote {
                if quote == C_APOSTROPHE {
                    self.state.toggle_single_quote();
                } else {
                    self.state.toggle_double_quote();
                }
                let _ = self.consume();
                return Scanned::Token(self.make(TokenKind::String, start, line, column));
            }
            if is_new_line(c) {
                return Scanned::BrokenString {
                    start,
                    line,
                    column,
                    quote,
                    at_eof: false,
                };
            }
            if c == C_REVERSE_SOLIDUS {
                match self.consume() {
                    None => continue,
                    Some(c2) if is_new_line(c2) => {
                        if c2 == C_CARRIAGE_RETURN && self.peek() == Some(C_LINE_FEED) {
                            let _ = self.consume();
                        }
                        let _ = self.consume();
                    }
                    Some(_) => {
                        let _ = self.consume_escaped();
                    }
                }
            } else {
                let _ = self.consume();
            }
        }
    }

    fn consume_number_sign(&mut self, start: Pos, line: u32, column: u32) -> RawToken {
        let c2 = self.peek().unwrap_or(C_LINE_FEED);
        let c3 = self.peek2().unwrap_or(C_LINE_FEED);
        if is_ident(c2) || are_valid_escape(c2, c3) {
            let _ = self.consume();
            let _ = self.consume_ident_sequence();
            self.make(TokenKind::Hash, start, line, column)
        } else {
            self.single(TokenKind::Delim, start, line, column)
        }
    }

    fn consume_full_stop(&mut self, start: Pos, line: u32, column: u32) -> RawToken {
        let c2 = self.peek().unwrap_or(C_LINE_FEED);
        let c3 = self.peek2().unwrap_or(C_LINE_FEED);
        if is_digit(c2) {
            return self.consume_numeric(start, line, column);
        }
        if is_ident_start(c2) || are_valid_escape(c2, c3) {
            let _ = self.consume();
            let _ = self.consume_ident_sequence();
            return self.make(TokenKind::ClassKeyword, start, line, column);
        }
        self.single(TokenKind::Delim, start, line, column)
    }

    /// `-->` closes an HTML comment wrapper, `-ident` opens an identifier,
    /// and a minus before a number is emitted on its own so the value layer
    /// can apply it as numeric negation.
    fn consume_minus(&mut self, start: Pos, line: u32, column: u32) -> RawToken {
        let c2 = self.peek().unwrap_or(C_LINE_FEED);
        let c3 = self.peek2().unwrap_or(C_LINE_FEED);
        if c2 == C_HYPHEN_MINUS && c3 == C_GREATER_THAN_SIGN {
            let _ = self.consume();
            let _ = self.consume();
            let _ = self.consume();
            return self.make(TokenKind::Cdc, start, line, column);
        }
        if start_ident_sequence(C_HYPHEN_MINUS, c2, c3) {
            let _ = self.consume_ident_sequence();
            return self.make(TokenKind::Ident, start, line, column);
        }
        self.single(TokenKind::Minus, start, line, column)
    }

    fn consume_less_than_sign(&mut self, start: Pos, line: u32, column: u32) -> RawToken {
        if self.peek() == Some(C_EXCLAMATION)
            && self.peek2() == Some(C_HYPHEN_MINUS)
            && self
                .slice(start + 3, start + 4)
                .map_or(false, |s| s.starts_with(C_HYPHEN_MINUS))
        {
            for _ in 0..4 {
                let _ = self.consume();
            }
            return self.make(TokenKind::Cdo, start, line, column);
        }
        self.single(TokenKind::Delim, start, line, column)
    }

    fn consume_at_sign(&mut self, start: Pos, line: u32, column: u32) -> RawToken {
        let c2 = self.peek().unwrap_or(C_LINE_FEED);
        let c3 = self.peek2().unwrap_or(C_LINE_FEED);
        if start_ident_sequence(c2, c3, C_LINE_FEED) {
            let _ = self.consume();
            let _ = self.consume_ident_sequence();
            self.make(TokenKind::AtKeyword, start, line, column)
        } else {
            self.single(TokenKind::Delim, start, line, column)
        }
    }

    fn consume_numeric(&mut self, start: Pos, line: u32, column: u32) -> RawToken {
        let _ = self.consume_number();
        let c = self.cur().unwrap_or(C_LINE_FEED);
        if c == C_PERCENTAGE {
            let _ = self.consume();
            return self.make(TokenKind::Percentage, start, line, column);
        }
        if start_ident_sequence(
            c,
            self.peek().unwrap_or(C_LINE_FEED),
            self.peek2().unwrap_or(C_LINE_FEED),
        ) {
            let _ = self.consume_ident_sequence();
            return self.make(TokenKind::Dimension, start, line, column);
        }
        self.make(TokenKind::Number, start, line, column)
    }

    pub fn consume_number(&mut self) -> Option<()> {
        while matches!(self.consume(), Some(c) if is_digit(c)) {}
        if self.cur()? == C_FULL_STOP && is_digit(self.peek()?) {
            self.consume()?;
            while matches!(self.consume(), Some(c) if is_digit(c)) {}
        }
        let c = self.cur()?;
        if c == C_LOWER_E || c == C_UPPER_E {
            let c = self.peek()?;
            if is_digit(c) {
                self.consume()?;
            } else if c == C_HYPHEN_MINUS || c == C_PLUS_SIGN {
                let c = self.peek2()?;
                if is_digit(c) {
                    self.consume()?;
                    self.consume()?;
                } else {
                    return Some(());
                }
            } else {
                return Some(());
            }
        } else {
            return Some(());
        }
        while matches!(self.consume(), Some(c) if is_digit(c)) {}
        Some(())
    }

    pub fn consume_ident_sequence(&mut self) -> Option<()> {
        loop {
            let c = self.cur()?;
            if maybe_valid_escape(c) {
                self.consume()?;
                self.consume_escaped()?;
            } else if is_ident(c) {
                self.consume()?;
            } else {
                return Some(());
            }
        }
    }

    pub fn consume_escaped(&mut self) -> Option<()> {
        if is_hex_digit(self.cur()?) {
            for _ in 1..5 {
                if !is_hex_digit(self.consume()?) {
                    break;
                }
            }
            if is_white_space(self.cur()?) {
                self.consume()?;
            }
        } else {
            self.consume()?;
        }
        Some(())
    }

    fn consume_ident_like(&mut self, start: Pos, line: u32, column: u32) -> Scanned {
        let _ = self.consume_ident_sequence();
        let end = self.end_pos();
        if self.cur() == Some(C_LEFT_PARENTHESIS) {
            if end == start + 3
                && self
                    .slice(start, end)
                    .map_or(false, |s| s.eq_ignore_ascii_case("url"))
            {
                let _ = self.consume();
                return self.consume_url(start, line, column);
            }
            let _ = self.consume();
            self.state.increment_paren();
            return Scanned::Token(self.make(TokenKind::Function, start, line, column));
        }
        Scanned::Token(self.make(TokenKind::Ident, start, line, column))
    }

    /// Speculative scan of a `url(...)` body. Anything that disqualifies the
    /// content from forming a URI token rewinds to just past the opening
    /// paren and emits a plain function token instead, leaving the content to
    /// be re-scanned as ordinary tokens.
    fn consume_url(&mut self, start: Pos, line: u32, column: u32) -> Scanned {
        let restart = self.end_pos();
        let restart_line = self.line;
        let restart_column = self.column;
        while matches!(self.cur(), Some(c) if is_white_space(c)) {
            let _ = self.consume();
        }
        match self.cur() {
            Some(q) if q == C_QUOTATION_MARK || q == C_APOSTROPHE => {
                let _ = self.consume();
                loop {
                    let Some(c) = self.cur() else {
                        return self.url_fallback(start, restart, restart_line, restart_column);
                    };
                    if c == q {
                        let _ = self.consume();
                        break;
                    }
                    if is_new_line(c) {
                        return self.url_fallback(start, restart, restart_line, restart_column);
                    }
                    if c == C_REVERSE_SOLIDUS {
                        let _ = self.consume();
                        if self.cur().is_some() {
                            let _ = self.consume_escaped();
                        }
                    } else {
                        let _ = self.consume();
                    }
                }
                while matches!(self.cur(), Some(c) if is_white_space(c)) {
                    let _ = self.consume();
                }
                if self.cur() == Some(C_RIGHT_PARENTHESIS) {
                    let _ = self.consume();
                    Scanned::Token(self.make(TokenKind::Uri, start, line, column))
                } else {
                    self.url_fallback(start, restart, restart_line, restart_column)
                }
            }
            _ => loop {
                let Some(c) = self.cur() else {
                    return Scanned::Token(self.make(TokenKind::UnclosedUri, start, line, column));
                };
                if c == C_RIGHT_PARENTHESIS {
                    let _ = self.consume();
                    return Scanned::Token(self.make(TokenKind::Uri, start, line, column));
                }
                if is_white_space(c) {
                    while matches!(self.cur(), Some(c) if is_white_space(c)) {
                        let _ = self.consume();
                    }
                    match self.cur() {
                        Some(C_RIGHT_PARENTHESIS) => {
                            let _ = self.consume();
                            return Scanned::Token(self.make(TokenKind::Uri, start, line, column));
                        }
                        None => {
                            return Scanned::Token(self.make(
                                TokenKind::UnclosedUri,
                                start,
                                line,
                                column,
                            ));
                        }
                        Some(_) => {
                            return self.url_fallback(
                                start,
                                restart,
                                restart_line,
                                restart_column,
                            );
                        }
                    }
                }
                if c == C_QUOTATION_MARK || c == C_APOSTROPHE || c == C_LEFT_PARENTHESIS {
                    return self.url_fallback(start, restart, restart_line, restart_column);
                }
                if c == C_REVERSE_SOLIDUS {
                    let _ = self.consume();
                    if self.cur().is_some() {
                        let _ = self.consume_escaped();
                    }
                } else {
                    let _ = self.consume();
                }
            },
        }
    }

    fn url_fallback(&mut self, start: Pos, restart: Pos, line: u32, column: u32) -> Scanned {
        self.rewind(restart, line, column);
        self.state.increment_paren();
        let mut token = self.make(TokenKind::Function, start, line, column);
        token.end = restart;
        Scanned::Token(token)
    }
}

pub fn is_new_line(c: char) -> bool {
    c == C_LINE_FEED || c == C_CARRIAGE_RETURN || c == C_FORM_FEED
}

pub fn is_space(c: char) -> bool {
    c == C_TAB || c == C_SPACE
}

pub fn is_white_space(c: char) -> bool {
    is_new_line(c) || is_space(c)
}

pub fn is_digit(c: char) -> bool {
    c >= C_0 && c <= C_9
}

pub fn is_hex_digit(c: char) -> bool {
    is_digit(c) || (c >= C_UPPER_A && c <= C_UPPER_F) || (c >= C_LOWER_A && c <= C_LOWER_F)
}

pub fn is_ident_start(c: char) -> bool {
    c == C_LOW_LINE
        || (c >= C_LOWER_A && c <= C_LOWER_Z)
        || (c >= C_UPPER_A && c <= C_UPPER_Z)
        || c > '\u{80}'
}

pub fn is_ident(c: char) -> bool {
    is_ident_start(c) || is_digit(c) || c == C_HYPHEN_MINUS
}

pub fn start_ident_sequence(c1: char, c2: char, c3: char) -> bool {
    if c1 == C_HYPHEN_MINUS {
        is_ident_start(c2) || c2 == C_HYPHEN_MINUS || are_valid_escape(c2, c3)
    } else {
        is_ident_start(c1) || are_valid_escape(c1, c2)
    }
}

pub fn maybe_valid_escape(c: char) -> bool {
    c == C_REVERSE_SOLIDUS
}

pub fn are_valid_escape(c1: char, c2: char) -> bool {
    c1 == C_REVERSE_SOLIDUS && !is_new_line(c2)
}

pub fn start_number(c1: char, c2: char, c3: char) -> bool {
    if c1 == C_PLUS_SIGN || c1 == C_HYPHEN_MINUS {
        is_digit(c2) || (c2 == C_FULL_STOP && is_digit(c3))
    } else {
        is_digit(c1) || (c1 == C_FULL_STOP && is_digit(c2))
    }
}

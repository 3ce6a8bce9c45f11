//! Recursive-descent parser over the recovered token stream. Errors never
//! abort the parse: each statement, declaration and media query catches its
//! own failures, records a warning, resynchronizes on the token stream using
//! the balance snapshots the scanner left on every token, and carries on
//! with its siblings.

use crate::lexer::{LexerState, RecoveryMode};
use crate::recovery::{Warning, WarningKind};
use crate::token::{Token, TokenKind};
use crate::tree::{
    AttributeNode, AttributeOpNode, CombinatorNode, CombinedSelectorNode, DeclarationNode,
    FontFaceNode, FunctionNode, ImportNode, KeyframeBlockNode, KeyframesNode, MarginNode,
    MediaAtomNode, MediaExpressionNode, MediaNode, MediaQueryNode, PageNode, PseudoNode,
    RulesetNode, SelectorNode, SelectorPartNode, StatementNode, StylesheetNode, TermItemNode,
    TermNode, ViewportNode,
};

/// Internal parse failure, always caught at a statement, declaration or
/// query boundary. Tokens are never invented to paper over one.
#[derive(Debug)]
pub struct SyntaxError {
    pub line: u32,
    pub column: u32,
    pub found: String,
}

type Parsed<T> = Result<T, SyntaxError>;

#[derive(Debug)]
pub struct Parser<'s> {
    input: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    warnings: Vec<Warning>,
}

impl<'s> Parser<'s> {
    /// `tokens` must come from the recovery layer: terminated by `Eof`, with
    /// end-of-input closers already synthesized.
    pub fn new(input: &'s str, tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof));
        Self {
            input,
            tokens,
            pos: 0,
            warnings: Vec::new(),
        }
    }

    pub fn parse_stylesheet(mut self) -> (StylesheetNode, Vec<Warning>) {
        let mut statements = Vec::new();
        loop {
            self.skip_space_and_markers();
            if self.at(TokenKind::Eof) {
                break;
            }
            if let Some(statement) = self.statement() {
                statements.push(statement);
            }
        }
        (StylesheetNode { statements }, self.warnings)
    }

    /// A bare declaration list, as found in a style attribute.
    pub fn parse_inline_style(mut self) -> (Vec<DeclarationNode>, Vec<Warning>) {
        let mut declarations = Vec::new();
        loop {
            self.skip_space();
            match self.kind() {
                TokenKind::Eof => break,
                TokenKind::Semicolon => self.advance(),
                TokenKind::RCurly => {
                    let token = self.cur();
                    self.warnings.push(Warning::new(
                        WarningKind::StrayToken {
                            found: token.raw_text(self.input).to_string(),
                        },
                        token.line,
                        token.column,
                    ));
                    self.advance();
                }
                _ => {
                    if let Some(declaration) = self.declaration() {
                        declarations.push(declaration);
                    }
                }
            }
        }
        (declarations, self.warnings)
    }

    /// A standalone media query list, as found in a media attribute.
    pub fn parse_media_list(mut self) -> (Vec<MediaQueryNode>, Vec<Warning>) {
        self.skip_space();
        let queries = if self.at(TokenKind::Eof) {
            Vec::new()
        } else {
            self.media_query_list()
        };
        (queries, self.warnings)
    }

    fn statement(&mut self) -> Option<StatementNode> {
        log::trace!(
            target: "css.parser",
            "{}:{}: statement starts with {:?}",
            self.cur().line,
            self.cur().column,
            self.kind()
        );
        match self.kind() {
            TokenKind::AtKeyword => self.at_statement(),
            TokenKind::Charset => {
                let token = self.cur().clone();
                self.advance();
                Some(StatementNode::Charset(token))
            }
            TokenKind::Semicolon | TokenKind::RCurly => {
                let token = self.cur();
                self.warnings.push(Warning::new(
                    WarningKind::StrayToken {
                        found: token.raw_text(self.input).to_string(),
                    },
                    token.line,
                    token.column,
                ));
                self.advance();
                None
            }
            TokenKind::Ident
            | TokenKind::Asterisk
            | TokenKind::Hash
            | TokenKind::ClassKeyword
            | TokenKind::LBracket
            | TokenKind::Colon => self.ruleset(),
            _ => {
                let token = self.cur().clone();
                self.warnings.push(Warning::new(
                    WarningKind::InvalidStatement,
                    token.line,
                    token.column,
                ));
                log::debug!(
                    target: "css.parser",
                    "{}:{}: statement cannot start with '{}'",
                    token.line,
                    token.column,
                    token.raw_text(self.input)
                );
                let reference = self.reference();
                self.skip_statement(reference);
                None
            }
        }
    }

    fn at_statement(&mut self) -> Option<StatementNode> {
        let at = self.cur().clone();
        let name = at.raw_text(self.input).to_ascii_lowercase();
        self.advance();
        match strip_vendor_prefix(name.trim_start_matches('@')) {
            "import" => self.import_statement(&at),
            "media" => self.media(&at),
            "page" => self.page(&at),
            "font-face" => self.font_face(&at),
            "viewport" => self.viewport(&at),
            "keyframes" => self.keyframes(&at),
            other => {
                self.warnings.push(Warning::new(
                    WarningKind::UnknownAtRule {
                        name: other.to_string(),
                    },
                    at.line,
                    at.column,
                ));
                self.skip_statement(at.state);
                None
            }
        }
    }

    fn import_statement(&mut self, at: &Token) -> Option<StatementNode> {
        match self.import_body() {
            Ok(node) => Some(StatementNode::Import(node)),
            Err(err) => {
                self.report_invalid_statement(at, &err);
                self.skip_statement(at.state);
                None
            }
        }
    }

    fn import_body(&mut self) -> Parsed<ImportNode> {
        self.skip_space();
        let uri = match self.kind() {
            TokenKind::String
            | TokenKind::Uri
            | TokenKind::UnclosedString
            | TokenKind::UnclosedUri => {
                let token = self.cur().clone();
                self.advance();
                token
            }
            _ => return Err(self.syntax_error()),
        };
        self.skip_space();
        let queries = if self.at(TokenKind::Semicolon) {
            Vec::new()
        } else {
            self.media_query_list()
        };
        if !self.eat(TokenKind::Semicolon) {
            return Err(self.syntax_error());
        }
        Ok(ImportNode { uri, queries })
    }

    fn media(&mut self, at: &Token) -> Option<StatementNode> {
        self.skip_space();
        let queries = if self.at(TokenKind::LCurly) {
            Vec::new()
        } else {
            self.media_query_list()
        };
        if !self.eat(TokenKind::LCurly) {
            let err = self.syntax_error();
            self.report_invalid_statement(at, &err);
            self.skip_statement(at.state);
            return None;
        }
        let mut statements = Vec::new();
        loop {
            self.skip_space_and_markers();
            match self.kind() {
                TokenKind::RCurly => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                _ => {
                    if let Some(statement) = self.statement() {
                        statements.push(statement);
                    }
                }
            }
        }
        Some(StatementNode::Media(MediaNode { queries, statements }))
    }

    fn media_query_list(&mut self) -> Vec<MediaQueryNode> {
        let mut queries = Vec::new();
        loop {
            queries.push(self.media_query());
            if !self.eat(TokenKind::Comma) {
                break;
            }
        }
        queries
    }

    /// One comma-separated query. A failure invalidates this query alone and
    /// resynchronizes to the next comma or block so its siblings survive.
    fn media_query(&mut self) -> MediaQueryNode {
        let reference = self.reference();
        let mut atoms = Vec::new();
        let mut invalid = false;
        loop {
            self.skip_space();
            match self.kind() {
                TokenKind::Comma | TokenKind::LCurly | TokenKind::Semicolon | TokenKind::Eof => {
                    break;
                }
                TokenKind::Ident => {
                    atoms.push(MediaAtomNode::Ident(self.cur().clone()));
                    self.advance();
                }
                TokenKind::LParen => match self.media_expression() {
                    Ok(expression) => atoms.push(MediaAtomNode::Expression(expression)),
                    Err(err) => {
                        invalid = true;
                        self.report_invalid_query(&err);
                        self.consume_until(
                            &[TokenKind::Comma, TokenKind::LCurly, TokenKind::Semicolon],
                            RecoveryMode::RuleBody,
                            reference,
                        );
                        break;
                    }
                },
                _ => {
                    invalid = true;
                    let err = self.syntax_error();
                    self.report_invalid_query(&err);
                    self.consume_until(
                        &[TokenKind::Comma, TokenKind::LCurly, TokenKind::Semicolon],
                        RecoveryMode::RuleBody,
                        reference,
                    );
                    break;
                }
            }
        }
        MediaQueryNode { atoms, invalid }
    }

    fn media_expression(&mut self) -> Parsed<MediaExpressionNode> {
        self.advance();
        self.skip_space();
        let feature = self.expect(TokenKind::Ident)?;
        self.skip_space();
        let terms = if self.eat(TokenKind::Colon) {
            self.skip_space();
            self.terms(&[TokenKind::RParen])?
        } else {
            Vec::new()
        };
        self.expect(TokenKind::RParen)?;
        Ok(MediaExpressionNode { feature, terms })
    }

    fn page(&mut self, at: &Token) -> Option<StatementNode> {
        self.skip_space();
        let name = if self.at(TokenKind::Ident) {
            let token = self.cur().clone();
            self.advance();
            Some(token)
        } else {
            None
        };
        let pseudo = if self.eat(TokenKind::Colon) {
            match self.expect(TokenKind::Ident) {
                Ok(token) => Some(token),
                Err(err) => {
                    self.report_invalid_statement(at, &err);
                    self.skip_statement(at.state);
                    return None;
                }
            }
        } else {
            None
        };
        self.skip_space();
        if !self.eat(TokenKind::LCurly) {
            let err = self.syntax_error();
            self.report_invalid_statement(at, &err);
            self.skip_statement(at.state);
            return None;
        }
        let mut declarations = Vec::new();
        let mut margins = Vec::new();
        loop {
            self.skip_space();
            match self.kind() {
                TokenKind::RCurly => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                TokenKind::Semicolon => self.advance(),
                TokenKind::AtKeyword => {
                    if let Some(margin) = self.margin_rule() {
                        margins.push(margin);
                    }
                }
                _ => {
                    if let Some(declaration) = self.declaration() {
                        declarations.push(declaration);
                    }
                }
            }
        }
        Some(StatementNode::Page(PageNode {
            name,
            pseudo,
            declarations,
            margins,
        }))
    }

    /// A page margin box like `@top-center { ... }`. The area name is
    /// validated during extraction.
    fn margin_rule(&mut self) -> Option<MarginNode> {
        let area = self.cur().clone();
        self.advance();
        self.skip_space();
        if !self.at(TokenKind::LCurly) {
            self.warnings.push(Warning::new(
                WarningKind::InvalidStatement,
                area.line,
                area.column,
            ));
            self.skip_statement(area.state);
            return None;
        }
        let declarations = self.declaration_block();
        Some(MarginNode { area, declarations })
    }

    fn font_face(&mut self, at: &Token) -> Option<StatementNode> {
        self.skip_space();
        if !self.at(TokenKind::LCurly) {
            let err = self.syntax_error();
            self.report_invalid_statement(at, &err);
            self.skip_statement(at.state);
            return None;
        }
        let declarations = self.declaration_block();
        Some(StatementNode::FontFace(FontFaceNode { declarations }))
    }

    fn viewport(&mut self, at: &Token) -> Option<StatementNode> {
        self.skip_space();
        if !self.at(TokenKind::LCurly) {
            let err = self.syntax_error();
            self.report_invalid_statement(at, &err);
            self.skip_statement(at.state);
            return None;
        }
        let declarations = self.declaration_block();
        Some(StatementNode::Viewport(ViewportNode { declarations }))
    }

    fn keyframes(&mut self, at: &Token) -> Option<StatementNode> {
        self.skip_space();
        let name = if self.at(TokenKind::Ident) {
            let token = self.cur().clone();
            self.advance();
            Some(token)
        } else {
            let err = self.syntax_error();
            self.report_invalid_statement(at, &err);
            self.skip_statement(at.state);
            return None;
        };
        self.skip_space();
        if !self.eat(TokenKind::LCurly) {
            let err = self.syntax_error();
            self.report_invalid_statement(at, &err);
            self.skip_statement(at.state);
            return None;
        }
        let mut blocks = Vec::new();
        loop {
            self.skip_space();
            match self.kind() {
                TokenKind::RCurly => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                _ => {
                    if let Some(block) = self.keyframe_block() {
                        blocks.push(block);
                    }
                }
            }
        }
        Some(StatementNode::Keyframes(KeyframesNode { name, blocks }))
    }

    /// One `from|to|<percentage> [, ...] { declarations }` block. A bad
    /// selector list drops this block alone.
    fn keyframe_block(&mut self) -> Option<KeyframeBlockNode> {
        let first = self.cur().clone();
        let mut selectors = Vec::new();
        loop {
            self.skip_space();
            match self.kind() {
                TokenKind::Percentage | TokenKind::Ident => {
                    selectors.push(self.cur().clone());
                    self.advance();
                    self.skip_space();
                    if !self.eat(TokenKind::Comma) {
                        break;
                    }
                }
                _ => break,
            }
        }
        if selectors.is_empty() || !self.at(TokenKind::LCurly) {
            self.warnings.push(Warning::new(
                WarningKind::InvalidKeyframeSelector {
                    value: first.raw_text(self.input).to_string(),
                },
                first.line,
                first.column,
            ));
            self.consume_until(
                &[TokenKind::LCurly, TokenKind::RCurly],
                RecoveryMode::RuleBody,
                first.state,
            );
            if self.at(TokenKind::LCurly) {
                self.skip_block();
            }
            return None;
        }
        let declarations = self.declaration_block();
        Some(KeyframeBlockNode {
            selectors,
            declarations,
        })
    }

    fn ruleset(&mut self) -> Option<StatementNode> {
        let reference = self.reference();
        let mut invalid = false;
        let selectors = match self.selector_list() {
            Ok(selectors) => selectors,
            Err(err) => {
                invalid = true;
                self.warnings
                    .push(Warning::new(WarningKind::InvalidSelector, err.line, err.column));
                log::debug!(
                    target: "css.parser",
                    "{}:{}: invalid selector near '{}', rule will be dropped",
                    err.line,
                    err.column,
                    err.found
                );
                self.consume_until(&[TokenKind::LCurly], RecoveryMode::RuleBody, reference);
                Vec::new()
            }
        };
        if !self.at(TokenKind::LCurly) {
            return None;
        }
        let declarations = self.declaration_block();
        Some(StatementNode::Ruleset(RulesetNode {
            selectors,
            declarations,
            invalid,
        }))
    }

    fn selector_list(&mut self) -> Parsed<Vec<CombinedSelectorNode>> {
        let mut selectors = vec![self.combined_selector()?];
        while self.eat(TokenKind::Comma) {
            self.skip_space();
            selectors.push(self.combined_selector()?);
        }
        Ok(selectors)
    }

    fn combined_selector(&mut self) -> Parsed<CombinedSelectorNode> {
        let first = self.selector()?;
        let mut rest = Vec::new();
        loop {
            let saw_space = self.at(TokenKind::Space);
            self.skip_space();
            match self.kind() {
                TokenKind::Greater => {
                    self.advance();
                    self.skip_space();
                    rest.push((CombinatorNode::Child, self.selector()?));
                }
                TokenKind::Plus => {
                    self.advance();
                    self.skip_space();
                    rest.push((CombinatorNode::Adjacent, self.selector()?));
                }
                TokenKind::Tilde => {
                    self.advance();
                    self.skip_space();
                    rest.push((CombinatorNode::Sibling, self.selector()?));
                }
                TokenKind::Comma | TokenKind::LCurly | TokenKind::Eof => break,
                _ if saw_space && self.at_selector_start() => {
                    rest.push((CombinatorNode::Descendant, self.selector()?));
                }
                _ => return Err(self.syntax_error()),
            }
        }
        Ok(CombinedSelectorNode { first, rest })
    }

    fn at_selector_start(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Ident
                | TokenKind::Asterisk
                | TokenKind::Hash
                | TokenKind::ClassKeyword
                | TokenKind::LBracket
                | TokenKind::Colon
        )
    }

    fn selector(&mut self) -> Parsed<SelectorNode> {
        let mut parts = Vec::new();
        loop {
            match self.kind() {
                TokenKind::Ident if parts.is_empty() => {
                    parts.push(SelectorPartNode::Element(self.cur().clone()));
                    self.advance();
                }
                TokenKind::Asterisk if parts.is_empty() => {
                    parts.push(SelectorPartNode::Universal(self.cur().clone()));
                    self.advance();
                }
                TokenKind::Hash => {
                    let token = self.cur().clone();
                    if !token.valid {
                        return Err(self.syntax_error());
                    }
                    parts.push(SelectorPartNode::Id(token));
                    self.advance();
                }
                TokenKind::ClassKeyword => {
                    parts.push(SelectorPartNode::Class(self.cur().clone()));
                    self.advance();
                }
                TokenKind::LBracket => parts.push(self.attribute()?),
                TokenKind::Colon => parts.push(self.pseudo()?),
                _ => break,
            }
        }
        if parts.is_empty() {
            return Err(self.syntax_error());
        }
        Ok(SelectorNode { parts })
    }

    fn attribute(&mut self) -> Parsed<SelectorPartNode> {
        self.advance();
        self.skip_space();
        let name = self.expect(TokenKind::Ident)?;
        self.skip_space();
        let op = match self.kind() {
            TokenKind::Equals => Some(AttributeOpNode::Equals),
            TokenKind::Includes => Some(AttributeOpNode::Includes),
            TokenKind::DashMatch => Some(AttributeOpNode::DashMatch),
            TokenKind::PrefixMatch => Some(AttributeOpNode::Prefix),
            TokenKind::SuffixMatch => Some(AttributeOpNode::Suffix),
            TokenKind::SubstringMatch => Some(AttributeOpNode::Substring),
            _ => None,
        };
        let value = if op.is_some() {
            self.advance();
            self.skip_space();
            match self.kind() {
                TokenKind::Ident | TokenKind::String => {
                    let token = self.cur().clone();
                    if !token.valid {
                        return Err(self.syntax_error());
                    }
                    self.advance();
                    Some(token)
                }
                _ => return Err(self.syntax_error()),
            }
        } else {
            None
        };
        self.skip_space();
        self.expect(TokenKind::RBracket)?;
        Ok(SelectorPartNode::Attribute(AttributeNode { name, op, value }))
    }

    fn pseudo(&mut self) -> Parsed<SelectorPartNode> {
        self.advance();
        let element = self.eat(TokenKind::Colon);
        match self.kind() {
            TokenKind::Ident => {
                let name = self.cur().clone();
                self.advance();
                Ok(SelectorPartNode::Pseudo(PseudoNode {
                    element,
                    name,
                    arg: None,
                }))
            }
            TokenKind::Function => {
                let name = self.cur().clone();
                self.advance();
                let arg = self.pseudo_argument()?;
                Ok(SelectorPartNode::Pseudo(PseudoNode {
                    element,
                    name,
                    arg: Some(arg),
                }))
            }
            _ => Err(self.syntax_error()),
        }
    }

    /// Collects the raw argument of a functional pseudo up to its closing
    /// paren, dropping whitespace so `nth-child( 2n + 1 )` reads `2n+1`.
    fn pseudo_argument(&mut self) -> Parsed<String> {
        let mut depth = 0u32;
        let mut arg = String::new();
        loop {
            match self.kind() {
                TokenKind::RParen if depth == 0 => {
                    self.advance();
                    return Ok(arg);
                }
                TokenKind::RParen => {
                    depth -= 1;
                    arg.push_str(self.cur().raw_text(self.input));
                    self.advance();
                }
                TokenKind::Function | TokenKind::LParen => {
                    depth += 1;
                    arg.push_str(self.cur().raw_text(self.input));
                    self.advance();
                }
                TokenKind::Space => self.advance(),
                TokenKind::Eof => return Err(self.syntax_error()),
                _ => {
                    let token = self.cur();
                    if !token.valid {
                        return Err(self.syntax_error());
                    }
                    arg.push_str(token.raw_text(self.input));
                    self.advance();
                }
            }
        }
    }

    /// Consumes `{ ... }` and returns the declarations that parsed; bad ones
    /// are dropped individually.
    fn declaration_block(&mut self) -> Vec<DeclarationNode> {
        self.advance();
        let mut declarations = Vec::new();
        loop {
            self.skip_space();
            match self.kind() {
                TokenKind::Semicolon => self.advance(),
                TokenKind::RCurly => {
                    self.advance();
                    break;
                }
                TokenKind::Eof => break,
                _ => {
                    if let Some(declaration) = self.declaration() {
                        declarations.push(declaration);
                    }
                }
            }
        }
        declarations
    }

    fn declaration(&mut self) -> Option<DeclarationNode> {
        let reference = self.reference();
        let start = self.pos;
        match self.declaration_inner() {
            Ok(node) => Some(node),
            Err(err) => {
                let property = self
                    .tokens
                    .get(start)
                    .map(|t| t.raw_text(self.input).to_string())
                    .unwrap_or_default();
                log::debug!(
                    target: "css.parser",
                    "{}:{}: dropping declaration '{}', unexpected '{}'",
                    err.line,
                    err.column,
                    property,
                    err.found
                );
                self.warnings.push(Warning::new(
                    WarningKind::InvalidDeclaration { property },
                    err.line,
                    err.column,
                ));
                self.consume_until(
                    &[TokenKind::Semicolon, TokenKind::RCurly],
                    RecoveryMode::DeclarationBody,
                    reference,
                );
                None
            }
        }
    }

    fn declaration_inner(&mut self) -> Parsed<DeclarationNode> {
        let property = self.expect(TokenKind::Ident)?;
        self.skip_space();
        self.expect(TokenKind::Colon)?;
        self.skip_space();
        let items = self.terms(&[
            TokenKind::Semicolon,
            TokenKind::RCurly,
            TokenKind::Exclamation,
        ])?;
        let important = if self.at(TokenKind::Exclamation) {
            self.advance();
            self.skip_space();
            let keyword = self.expect(TokenKind::Ident)?;
            if !keyword.raw_text(self.input).eq_ignore_ascii_case("important") {
                return Err(self.syntax_error());
            }
            self.skip_space();
            if !matches!(
                self.kind(),
                TokenKind::Semicolon | TokenKind::RCurly | TokenKind::Eof
            ) {
                return Err(self.syntax_error());
            }
            true
        } else {
            false
        };
        if !items
            .iter()
            .any(|item| matches!(item, TermItemNode::Term(_)))
        {
            return Err(self.syntax_error());
        }
        Ok(DeclarationNode {
            property,
            items,
            important,
        })
    }

    /// Value stream until one of `terminators`; the terminator is left in
    /// place. Structural tokens that cannot appear in a value raise.
    fn terms(&mut self, terminators: &[TokenKind]) -> Parsed<Vec<TermItemNode>> {
        let mut items = Vec::new();
        loop {
            let kind = self.kind();
            if terminators.contains(&kind) || kind == TokenKind::Eof {
                break;
            }
            match kind {
                TokenKind::Space => {
                    self.advance();
                    items.push(TermItemNode::Space);
                }
                TokenKind::Comma => {
                    self.advance();
                    items.push(TermItemNode::Comma);
                }
                TokenKind::Slash => {
                    self.advance();
                    items.push(TermItemNode::Slash);
                }
                TokenKind::Minus => {
                    self.advance();
                    items.push(TermItemNode::Minus);
                }
                TokenKind::Plus => {
                    self.advance();
                    items.push(TermItemNode::Plus);
                }
                TokenKind::Equals => {
                    // Tolerated inside values for legacy filter syntax.
                    self.advance();
                    items.push(TermItemNode::Space);
                }
                _ => items.push(TermItemNode::Term(self.term()?)),
            }
        }
        Ok(items)
    }

    fn term(&mut self) -> Parsed<TermNode> {
        match self.kind() {
            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::Percentage
            | TokenKind::Dimension
            | TokenKind::String
            | TokenKind::UnclosedString
            | TokenKind::Uri
            | TokenKind::UnclosedUri
            | TokenKind::Hash => {
                let token = self.cur().clone();
                if !token.valid {
                    return Err(self.syntax_error());
                }
                self.advance();
                Ok(TermNode::Atom(token))
            }
            TokenKind::Function => {
                let name = self.cur().clone();
                self.advance();
                self.skip_space();
                let args = self.terms(&[TokenKind::RParen])?;
                self.expect(TokenKind::RParen)?;
                Ok(TermNode::Function(FunctionNode { name, args }))
            }
            _ => Err(self.syntax_error()),
        }
    }

    fn report_invalid_statement(&mut self, at: &Token, err: &SyntaxError) {
        log::debug!(
            target: "css.parser",
            "{}:{}: invalid statement near '{}'",
            err.line,
            err.column,
            err.found
        );
        self.warnings.push(Warning::new(
            WarningKind::InvalidStatement,
            at.line,
            at.column,
        ));
    }

    fn report_invalid_query(&mut self, err: &SyntaxError) {
        log::debug!(
            target: "css.parser",
            "{}:{}: invalid media query near '{}'",
            err.line,
            err.column,
            err.found
        );
        self.warnings.push(Warning::new(
            WarningKind::InvalidMediaQuery,
            err.line,
            err.column,
        ));
    }

    /// Junk one malformed statement: up to a `;` on the statement's own
    /// level (consumed), a block (consumed whole), or the closing brace of
    /// the enclosing block (left for its owner).
    fn skip_statement(&mut self, reference: LexerState) {
        self.consume_until(
            &[TokenKind::Semicolon, TokenKind::LCurly, TokenKind::RCurly],
            RecoveryMode::RuleBody,
            reference,
        );
        match self.kind() {
            TokenKind::Semicolon => self.advance(),
            TokenKind::LCurly => self.skip_block(),
            _ => {}
        }
    }

    /// Consumes a balanced `{ ... }` with the opening brace current.
    fn skip_block(&mut self) {
        let reference = self.cur().state;
        self.advance();
        self.consume_until_greedy(
            &[TokenKind::RCurly],
            RecoveryMode::DeclarationBody,
            reference,
        );
    }

    /// Skip tokens until one in `follow` whose own balance snapshot
    /// satisfies `mode` against `reference`; that token stays current.
    fn consume_until(&mut self, follow: &[TokenKind], mode: RecoveryMode, reference: LexerState) {
        loop {
            let token = self.cur();
            if token.kind == TokenKind::Eof {
                return;
            }
            if follow.contains(&token.kind)
                && token.state.is_balanced(mode, &reference, token.kind)
            {
                return;
            }
            self.advance();
        }
    }

    /// Like `consume_until`, but the matched token is consumed too.
    fn consume_until_greedy(
        &mut self,
        follow: &[TokenKind],
        mode: RecoveryMode,
        reference: LexerState,
    ) {
        loop {
            let token = self.cur();
            if token.kind == TokenKind::Eof {
                return;
            }
            let done = follow.contains(&token.kind)
                && token.state.is_balanced(mode, &reference, token.kind);
            self.advance();
            if done {
                return;
            }
        }
    }

    fn cur(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn kind(&self) -> TokenKind {
        self.cur().kind
    }

    fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Parsed<Token> {
        if self.at(kind) {
            let token = self.cur().clone();
            self.advance();
            Ok(token)
        } else {
            Err(self.syntax_error())
        }
    }

    fn skip_space(&mut self) {
        while self.at(TokenKind::Space) {
            self.advance();
        }
    }

    fn skip_space_and_markers(&mut self) {
        while matches!(
            self.kind(),
            TokenKind::Space | TokenKind::Cdo | TokenKind::Cdc
        ) {
            self.advance();
        }
    }

    /// Balance state in effect before the current token: the snapshot of the
    /// previous one, since snapshots are taken after a token's characters
    /// have been processed.
    fn reference(&self) -> LexerState {
        if self.pos == 0 {
            LexerState::default()
        } else {
            self.tokens[self.pos - 1].state
        }
    }

    fn syntax_error(&self) -> SyntaxError {
        let token = self.cur();
        SyntaxError {
            line: token.line,
            column: token.column,
            found: token.raw_text(self.input).to_string(),
        }
    }
}

/// `-moz-keyframes` and friends compare equal to their unprefixed name.
fn strip_vendor_prefix(name: &str) -> &str {
    if let Some(rest) = name.strip_prefix('-') {
        if let Some(i) = rest.find('-') {
            return &rest[i + 1..];
        }
    }
    name
}
